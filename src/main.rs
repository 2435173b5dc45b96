use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use crossterm::{
    cursor::{Hide, Show},
    terminal::{disable_raw_mode, enable_raw_mode, size},
};
use log::{error, info};

use term_asteroids::config::GameConfig;
use term_asteroids::constants::{DEFAULT_PREFS_FILE, LOG_FILE};
use term_asteroids::error::GameError;
use term_asteroids::game::{Game, terminal_bounds};
use term_asteroids::prefs::FilePreferences;
use term_asteroids::rendering::{OutputTarget, ScreenBuffer};
use term_asteroids::scene::Session;
use term_asteroids::terminal_io::SimulatedInput;

#[derive(Debug, Default)]
struct CliArgs {
    debug: bool,
    debug_size: Option<(u16, u16)>,
    max_frames: Option<u64>,
    config_path: Option<PathBuf>,
    write_config: Option<PathBuf>,
    prefs_path: Option<PathBuf>,
    seed: Option<u64>,
    verbose: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs, GameError> {
    let mut cli = CliArgs::default();
    let mut positional: Vec<&str> = Vec::new();
    let mut iter = args.iter().skip(1);

    let value_for = |flag: &str, next: Option<&String>| {
        next.cloned()
            .ok_or_else(|| GameError::Configuration(format!("{flag} needs a value")))
    };

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--debug" => cli.debug = true,
            "--verbose" => cli.verbose = true,
            "--config" => {
                cli.config_path = Some(PathBuf::from(value_for("--config", iter.next())?))
            }
            "--write-config" => {
                cli.write_config = Some(PathBuf::from(value_for("--write-config", iter.next())?))
            }
            "--prefs" => cli.prefs_path = Some(PathBuf::from(value_for("--prefs", iter.next())?)),
            "--seed" => {
                let raw = value_for("--seed", iter.next())?;
                let seed = raw
                    .parse()
                    .map_err(|_| GameError::Configuration(format!("invalid seed '{raw}'")))?;
                cli.seed = Some(seed);
            }
            other => positional.push(other),
        }
    }

    // --debug [width height [frames]], or a bare frame limit outside debug mode
    if cli.debug {
        if positional.len() >= 2 {
            let width = positional[0].parse::<u16>().unwrap_or(80);
            let height = positional[1].parse::<u16>().unwrap_or(24);
            cli.debug_size = Some((width, height));
        }
        cli.max_frames = positional.get(2).and_then(|raw| raw.parse().ok());
    } else {
        cli.max_frames = positional.first().and_then(|raw| raw.parse().ok());
    }
    Ok(cli)
}

fn main() -> Result<(), GameError> {
    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args)?;

    let level = if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    simple_logging::log_to_file(LOG_FILE, level)?;
    info!("Starting term-asteroids.");

    let config = match &cli.config_path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            GameConfig::load_from_file(path).map_err(|e| {
                error!("Failed to load config {}: {}", path.display(), e);
                e
            })?
        }
        None => GameConfig::default(),
    };
    config.validate()?;

    if let Some(path) = &cli.write_config {
        config.save_to_file(path)?;
        info!("Wrote config to {}", path.display());
        return Ok(());
    }

    let prefs_path = cli.prefs_path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_PREFS_FILE));
    let prefs = FilePreferences::load(&prefs_path)?;

    let (terminal_width, terminal_height, stdout_target, simulated_input) = if cli.debug {
        let (width, height) = cli.debug_size.unwrap_or((80, 24));
        info!("Debug mode enabled at {}x{}.", width, height);
        let script = SimulatedInput::demo_script(cli.max_frames.unwrap_or(120).saturating_sub(1));
        (
            width,
            height,
            OutputTarget::ScreenBuffer(ScreenBuffer::new(width, height)),
            Some(script),
        )
    } else {
        enable_raw_mode().map_err(|e| {
            error!("Failed to enable raw mode: {}", e);
            e
        })?;
        let (width, height) = size().map_err(|e| {
            error!("Failed to get terminal size: {}", e);
            e
        })?;
        info!("Terminal size: {}x{}", width, height);
        (width, height, OutputTarget::Stdout(io::stdout()), None)
    };

    let half_height = config.arena.orthographic_half_height;
    let bounds = terminal_bounds(half_height, terminal_width, terminal_height)?;
    let mut session = Session::new(config, bounds, prefs)?;
    if let Some(seed) = cli.seed {
        session = session.with_seed(seed);
    }

    let mut game = Game::new(
        terminal_width,
        terminal_height,
        stdout_target,
        simulated_input,
        cli.debug,
        cli.max_frames,
        session,
        half_height,
    );

    if !cli.debug {
        game.stdout_target.clear_screen(terminal_width, terminal_height)?;
        game.stdout_target.execute_other_command(Hide)?;
        game.stdout_target.flush()?;
    }

    let result = game.run();
    if let Err(e) = &result {
        error!("Game stopped with an error: {}", e);
    }

    if !cli.debug {
        game.stdout_target.clear_screen(game.terminal_width, game.terminal_height)?;
        game.stdout_target.execute_other_command(Show)?;
        game.stdout_target.flush()?;
        disable_raw_mode().map_err(|e| {
            error!("Failed to disable raw mode on exit: {}", e);
            e
        })?;
    }

    info!("Exiting term-asteroids.");
    result
}
