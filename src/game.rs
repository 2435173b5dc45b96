use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use log::{error, info, warn};

use crate::constants::{FRAME_POLL_MILLIS, TERMINAL_ASPECT_RATIO_COMPENSATION};
use crate::error::GameError;
use crate::input::InputState;
use crate::prefs::Preferences;
use crate::rendering::{GameGrid, HUD_ROWS, OutputTarget, WorldView, draw_menu, hud_line};
use crate::scene::{Scene, Session};
use crate::terminal_io::{
    HostAction, KeyHoldTracker, SimulatedInput, command_for_key, host_action_for_key, is_key_press,
};
use crate::types::Bounds;

// Long enough to bridge the usual 250-500 ms auto-repeat delay.
const KEY_HOLD_WINDOW_SECONDS: f64 = 0.55;

/// Field bounds for a terminal of `width` x `height` cells, leaving the HUD
/// row free and correcting for tall character cells.
pub fn terminal_bounds(
    orthographic_half_height: f64,
    width: u16,
    height: u16,
) -> Result<Bounds, GameError> {
    let rows = f64::from(height.saturating_sub(HUD_ROWS));
    let columns = f64::from(width) / TERMINAL_ASPECT_RATIO_COMPENSATION;
    Bounds::from_viewport(orthographic_half_height, columns, rows)
}

pub struct Game<P: Preferences> {
    pub terminal_width: u16,
    pub terminal_height: u16,
    pub stdout_target: OutputTarget,
    simulated_input: Option<SimulatedInput>,
    debug_mode_active: bool,
    max_frames: Option<u64>,
    session: Session<P>,
    orthographic_half_height: f64,
    input: InputState,
    keys: KeyHoldTracker,
    menu_dirty: bool,
    frames_run: u64,
}

impl<P: Preferences> Game<P> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        terminal_width: u16,
        terminal_height: u16,
        stdout_target: OutputTarget,
        simulated_input: Option<SimulatedInput>,
        debug_mode_active: bool,
        max_frames: Option<u64>,
        session: Session<P>,
        orthographic_half_height: f64,
    ) -> Self {
        Game {
            terminal_width,
            terminal_height,
            stdout_target,
            simulated_input,
            debug_mode_active,
            max_frames,
            session,
            orthographic_half_height,
            input: InputState::new(),
            keys: KeyHoldTracker::new(KEY_HOLD_WINDOW_SECONDS),
            menu_dirty: true,
            frames_run: 0,
        }
    }

    pub fn session(&self) -> &Session<P> {
        &self.session
    }

    /// Frames completed by the last call to `run`.
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    pub fn run(&mut self) -> Result<(), GameError> {
        let mut game_grid = GameGrid::new(self.terminal_width, self.terminal_height);
        let mut frame_count: u64 = 0;
        let mut running = true;
        let mut last_frame = Instant::now();
        let debug_frame_dt = FRAME_POLL_MILLIS as f64 / 1000.0;

        while running && self.max_frames.is_none_or(|max| frame_count < max) {
            let events = self.collect_events(frame_count)?;
            let frame_dt = if self.debug_mode_active {
                debug_frame_dt
            } else {
                let now = Instant::now();
                let dt = now.duration_since(last_frame).as_secs_f64();
                last_frame = now;
                dt
            };

            for event in events {
                if !self.handle_event(event, &mut game_grid)? {
                    running = false;
                }
            }

            match self.session.scene() {
                Scene::Menu => {
                    self.keys.clear();
                    if self.menu_dirty {
                        self.render_menu()?;
                        self.menu_dirty = false;
                    }
                }
                Scene::Main => {
                    let held = self.keys.end_frame(frame_dt);
                    self.input.update(&held);
                    self.session.advance(frame_dt, &self.input)?;
                    match self.session.arena() {
                        Some(_) => self.render_main(&mut game_grid)?,
                        None => {
                            info!("Run ended; back to the menu.");
                            self.input.release_all();
                            self.menu_dirty = true;
                        }
                    }
                }
            }

            frame_count += 1;
        }
        self.frames_run = frame_count;

        info!("Game loop ended after {} frames.", frame_count);
        Ok(())
    }

    fn collect_events(&mut self, frame_count: u64) -> Result<Vec<Event>, GameError> {
        let mut events = Vec::new();
        if self.debug_mode_active {
            if let Some(sim_input) = &mut self.simulated_input {
                if sim_input.poll(frame_count)? {
                    events.extend(sim_input.read()?);
                }
            }
            return Ok(events);
        }

        let mut timeout = Duration::from_millis(FRAME_POLL_MILLIS);
        while event::poll(timeout).map_err(|e| {
            error!("Failed to poll event: {}", e);
            e
        })? {
            events.push(event::read().map_err(|e| {
                error!("Failed to read event: {}", e);
                e
            })?);
            timeout = Duration::ZERO;
        }
        Ok(events)
    }

    /// Returns `false` when the player asked to quit.
    fn handle_event(&mut self, event: Event, game_grid: &mut GameGrid) -> Result<bool, GameError> {
        match event {
            Event::Key(key_event) if is_key_press(&key_event) => {
                if host_action_for_key(key_event.code) == Some(HostAction::Quit) {
                    info!("Quit requested.");
                    return Ok(false);
                }
                match self.session.scene() {
                    Scene::Menu => {
                        if host_action_for_key(key_event.code) == Some(HostAction::Play) {
                            self.stdout_target
                                .clear_screen(self.terminal_width, self.terminal_height)?;
                            self.session.play()?;
                        }
                    }
                    Scene::Main => {
                        if let Some(command) = command_for_key(key_event.code) {
                            self.keys.record(command);
                        }
                    }
                }
            }
            Event::Resize(new_width, new_height) => {
                self.terminal_width = new_width;
                self.terminal_height = new_height;
                *game_grid = GameGrid::new(new_width, new_height);
                match terminal_bounds(self.orthographic_half_height, new_width, new_height) {
                    Ok(bounds) => self.session.set_bounds(bounds),
                    Err(e) => warn!(
                        "Keeping the previous field after resize to {}x{}: {}",
                        new_width, new_height, e
                    ),
                }
                self.menu_dirty = true;
                info!("Terminal resized to {}x{}", new_width, new_height);
            }
            _ => {}
        }
        Ok(true)
    }

    fn render_main(&mut self, game_grid: &mut GameGrid) -> Result<(), GameError> {
        let Some(arena) = self.session.arena() else {
            return Ok(());
        };
        let view = WorldView::new(
            *arena.bounds(),
            self.terminal_width,
            self.terminal_height.saturating_sub(HUD_ROWS),
            HUD_ROWS,
        );
        game_grid.clear();
        game_grid.draw_arena(arena, &view);
        let hud = hud_line(arena);
        for (i, c) in hud.chars().enumerate() {
            game_grid.set_char(i as u16, 0, c);
        }

        game_grid.render(&mut self.stdout_target).map_err(|e| {
            error!("Failed to render game grid: {}", e);
            e
        })?;
        self.stdout_target.flush()?;
        if let OutputTarget::ScreenBuffer(sb) = &self.stdout_target {
            sb.print_to_log();
        }
        Ok(())
    }

    fn render_menu(&mut self) -> io::Result<()> {
        let high_score = self.session.stored_high_score();
        let last_run = self.session.last_run().copied();
        draw_menu(
            &mut self.stdout_target,
            self.terminal_width,
            self.terminal_height,
            high_score,
            last_run.as_ref(),
        )
        .map_err(|e| {
            error!("Failed to draw menu: {}", e);
            e
        })?;
        if let OutputTarget::ScreenBuffer(sb) = &self.stdout_target {
            sb.print_to_log();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crossterm::event::KeyCode;

    use crate::config::GameConfig;
    use crate::physics::CollisionEvent;
    use crate::prefs::MemoryPreferences;
    use crate::rendering::ScreenBuffer;

    fn debug_game(frames: u64) -> Game<MemoryPreferences> {
        let config = GameConfig::default();
        let half_height = config.arena.orthographic_half_height;
        let bounds = terminal_bounds(half_height, 80, 24).expect("bounds");
        let session = Session::new(config, bounds, MemoryPreferences::new())
            .expect("session")
            .with_seed(4);
        Game::new(
            80,
            24,
            OutputTarget::ScreenBuffer(ScreenBuffer::new(80, 24)),
            Some(SimulatedInput::demo_script(frames + 100)),
            true,
            Some(frames),
            session,
            half_height,
        )
    }

    #[test]
    fn terminal_bounds_compensate_for_cell_shape() {
        let bounds = terminal_bounds(12.0, 80, 25).expect("bounds");
        assert!((bounds.max_x - 12.0 * 40.0 / 24.0).abs() < 1e-9);
    }

    #[test]
    fn scripted_session_starts_a_run() {
        let mut game = debug_game(12);
        game.run().expect("run");
        assert_eq!(game.session().scene(), Scene::Main);
        let arena = game.session().arena().expect("arena");
        assert!(arena.asteroids().len() >= 4);
    }

    #[test]
    fn quit_key_stops_the_loop() {
        let mut game = debug_game(1_000);
        game.simulated_input = Some(SimulatedInput::demo_script(5));
        game.run().expect("run");
        assert_eq!(game.session().scene(), Scene::Main);
        assert_eq!(game.frames_run(), 6);
    }

    #[test]
    fn space_on_the_menu_after_a_lost_run_does_not_restart() {
        let mut config = GameConfig::default();
        config.ship.lives = 1;
        let half_height = config.arena.orthographic_half_height;
        let bounds = terminal_bounds(half_height, 80, 24).expect("bounds");
        let mut session = Session::new(config, bounds, MemoryPreferences::new())
            .expect("session")
            .with_seed(4);
        session.play().expect("play");
        let asteroid = session.arena().expect("arena").asteroids()[0].id;
        session
            .handle_collision(CollisionEvent::ShipHitAsteroid { asteroid })
            .expect("ship hit");
        assert_eq!(session.scene(), Scene::Menu);

        let space = || Event::Key(KeyCode::Char(' ').into());
        let events: HashMap<u64, Vec<Event>> = (0..4).map(|frame| (frame, vec![space()])).collect();
        let mut game = Game::new(
            80,
            24,
            OutputTarget::ScreenBuffer(ScreenBuffer::new(80, 24)),
            Some(SimulatedInput::new(events)),
            true,
            Some(6),
            session,
            half_height,
        );
        game.run().expect("run");
        assert_eq!(game.session().scene(), Scene::Menu);
        assert!(game.session().last_run().is_some());
    }

    #[test]
    fn resize_below_the_hud_keeps_the_previous_field() {
        let mut game = debug_game(3);
        let before = *game.session().bounds();
        let mut events = HashMap::new();
        events.insert(1, vec![Event::Resize(80, HUD_ROWS)]);
        game.simulated_input = Some(SimulatedInput::new(events));
        game.run().expect("run");
        assert_eq!(*game.session().bounds(), before);
        assert_eq!(game.frames_run(), 3);
    }
}
