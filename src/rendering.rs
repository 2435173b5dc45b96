use std::io::{self, Write};

use crossterm::{cursor::MoveTo, execute};
use log::info;

use crate::arena::{Arena, RunSummary};
use crate::entities::{Asteroid, Ship};
use crate::flash::ShipColor;
use crate::types::{Bounds, Vector2D};

pub const HUD_ROWS: u16 = 1;

// --- ScreenBuffer for simulated rendering ---
pub struct ScreenBuffer {
    pub buffer: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
    pub cursor_x: u16,
    pub cursor_y: u16,
}

impl ScreenBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        ScreenBuffer {
            buffer: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
            cursor_x: 0,
            cursor_y: 0,
        }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            if self.cursor_y < self.height && self.cursor_x < self.width {
                self.buffer[self.cursor_y as usize][self.cursor_x as usize] = c;
            }
            self.cursor_x = self.cursor_x.saturating_add(1);
        }
    }

    pub fn clear(&mut self) {
        self.buffer = vec![vec![' '; self.width as usize]; self.height as usize];
        self.cursor_x = 0;
        self.cursor_y = 0;
    }

    pub fn row(&self, y: u16) -> String {
        self.buffer.get(y as usize).map(|row| row.iter().collect()).unwrap_or_default()
    }

    pub fn print_to_log(&self) {
        info!("--- Screen Buffer ---");
        for row in &self.buffer {
            info!("{}", row.iter().collect::<String>());
        }
        info!("---------------------");
    }
}

// --- OutputTarget enum to handle stdout or ScreenBuffer ---
pub enum OutputTarget {
    Stdout(io::Stdout),
    ScreenBuffer(ScreenBuffer),
}

impl OutputTarget {
    pub fn execute_move_to(&mut self, command: MoveTo) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(sb) => {
                sb.move_to(command.0, command.1);
                Ok(())
            }
        }
    }

    pub fn execute_other_command(&mut self, command: impl crossterm::Command) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => execute!(s, command),
            OutputTarget::ScreenBuffer(_) => Ok(()), // Ignore in debug mode
        }
    }

    pub fn write_at(&mut self, x: u16, y: u16, text: &str) -> io::Result<()> {
        self.execute_move_to(MoveTo(x, y))?;
        write!(self, "{}", text)
    }

    /// Blanks the whole screen, or the buffer in debug mode.
    pub fn clear_screen(&mut self, width: u16, height: u16) -> io::Result<()> {
        if let OutputTarget::ScreenBuffer(sb) = self {
            sb.clear();
            return Ok(());
        }
        let blank = " ".repeat(width as usize);
        for y in 0..height {
            self.write_at(0, y, &blank)?;
        }
        self.execute_move_to(MoveTo(0, 0))
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputTarget::Stdout(s) => s.write(buf),
            OutputTarget::ScreenBuffer(sb) => {
                let s = String::from_utf8_lossy(buf);
                sb.write_str(&s);
                Ok(buf.len())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputTarget::Stdout(s) => s.flush(),
            OutputTarget::ScreenBuffer(_) => Ok(()),
        }
    }
}

// --- World to character-cell mapping ---
/// Maps the play field onto the terminal rows below the HUD. World +y is up,
/// terminal rows grow downwards.
#[derive(Clone, Copy, Debug)]
pub struct WorldView {
    bounds: Bounds,
    columns: u16,
    rows: u16,
    top: u16,
}

impl WorldView {
    pub fn new(bounds: Bounds, columns: u16, rows: u16, top: u16) -> Self {
        WorldView { bounds, columns, rows, top }
    }

    pub fn cell(&self, point: Vector2D) -> Option<(u16, u16)> {
        if self.columns == 0 || self.rows == 0 || !self.bounds.contains(point) {
            return None;
        }
        let fx = (point.x - self.bounds.min_x) / self.bounds.width();
        let fy = (self.bounds.max_y - point.y) / self.bounds.height();
        let col = (fx * f64::from(self.columns - 1)).round() as u16;
        let row = (fy * f64::from(self.rows - 1)).round() as u16;
        Some((col, row + self.top))
    }

    fn cells_per_unit(&self) -> (f64, f64) {
        (
            f64::from(self.columns) / self.bounds.width(),
            f64::from(self.rows) / self.bounds.height(),
        )
    }
}

// --- GameGrid for geometric rendering ---
pub struct GameGrid {
    pub grid: Vec<Vec<char>>,
    pub width: u16,
    pub height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            grid: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn set_char(&mut self, x: u16, y: u16, c: char) {
        if y < self.height && x < self.width {
            self.grid[y as usize][x as usize] = c;
        }
    }

    pub fn get_char(&self, x: u16, y: u16) -> Option<char> {
        self.grid.get(y as usize).and_then(|row| row.get(x as usize)).copied()
    }

    pub fn clear(&mut self) {
        for row in &mut self.grid {
            row.fill(' ');
        }
    }

    pub fn render(&self, stdout: &mut OutputTarget) -> io::Result<()> {
        for y in 0..self.height {
            stdout.execute_move_to(MoveTo(0, y))?;
            write!(stdout, "{}", self.grid[y as usize].iter().collect::<String>())?;
        }
        Ok(())
    }

    pub fn draw_arena(&mut self, arena: &Arena, view: &WorldView) {
        for asteroid in arena.asteroids() {
            self.draw_asteroid(asteroid, view);
        }
        for bullet in arena.bullets() {
            if let Some((x, y)) = view.cell(bullet.body.position) {
                self.set_char(x, y, '*');
            }
        }
        if arena.ship_color() == ShipColor::White {
            self.draw_ship(arena.ship(), view);
        }
    }

    fn draw_asteroid(&mut self, asteroid: &Asteroid, view: &WorldView) {
        let (per_x, per_y) = view.cells_per_unit();
        let half_cols = ((asteroid.size.x * per_x) / 2.0).floor().max(0.0) as i32;
        let half_rows = ((asteroid.size.y * per_y) / 2.0).floor().max(0.0) as i32;
        let Some((cx, cy)) = view.cell(asteroid.body.position) else {
            return;
        };
        for dy in -half_rows..=half_rows {
            for dx in -half_cols..=half_cols {
                let x = i32::from(cx) + dx;
                let y = i32::from(cy) + dy;
                if x >= 0 && y >= i32::from(view.top) {
                    self.set_char(x as u16, y as u16, asteroid.glyph);
                }
            }
        }
    }

    fn draw_ship(&mut self, ship: &Ship, view: &WorldView) {
        if ship.is_thrusting {
            let (per_x, _) = view.cells_per_unit();
            let back = ship.body.up().scale(1.0 / per_x.max(f64::EPSILON));
            let exhaust = ship.body.position.sub(back);
            if let Some((x, y)) = view.cell(exhaust) {
                self.set_char(x, y, '~');
            }
        }
        if let Some((x, y)) = view.cell(ship.body.position) {
            self.set_char(x, y, ship_glyph(ship.body.rotation));
        }
    }
}

/// Arrow for the ship's nose, one per octant. Rotation is counter-clockwise
/// from +y.
pub fn ship_glyph(rotation: f64) -> char {
    let octant = ((rotation.rem_euclid(360.0) + 22.5) / 45.0).floor() as u32 % 8;
    match octant {
        0 => '^',
        1 => '\u{2196}', // ↖
        2 => '<',
        3 => '\u{2199}', // ↙
        4 => 'v',
        5 => '\u{2198}', // ↘
        6 => '>',
        _ => '\u{2197}', // ↗
    }
}

/// Score, high score and one icon per remaining life.
pub fn hud_line(arena: &Arena) -> String {
    let icons = vec!["A"; arena.lives() as usize].join(" ");
    format!(
        "Score: {}  High Score: {}  Lives: {}",
        arena.score(),
        arena.displayed_high_score(),
        icons
    )
}

pub fn draw_menu(
    target: &mut OutputTarget,
    width: u16,
    height: u16,
    high_score: u32,
    last_run: Option<&RunSummary>,
) -> io::Result<()> {
    let title_art = [
        r"    _    ____ _____ _____ ____   ___ ___ ____  ____",
        r"   / \  / ___|_   _| ____|  _ \ / _ \_ _|  _ \/ ___|",
        r"  / _ \ \___ \ | | |  _| | |_) | | | | || | | \___ \",
        r" / ___ \ ___) || | | |___|  _ <| |_| | || |_| |___) |",
        r"/_/   \_\____/ |_| |_____|_| \_\\___/___|____/|____/",
    ];

    target.clear_screen(width, height)?;
    let centered = |text: &str| (width / 2).saturating_sub(text.chars().count() as u16 / 2);

    let title_start_y = (height / 2).saturating_sub(title_art.len() as u16 + 2);
    for (i, line) in title_art.iter().enumerate() {
        target.write_at(centered(line), title_start_y + i as u16, line)?;
    }

    let mut y = title_start_y + title_art.len() as u16 + 2;
    let high_score_msg = format!("High Score: {}", high_score);
    target.write_at(centered(&high_score_msg), y, &high_score_msg)?;

    if let Some(run) = last_run {
        y += 1;
        let last_msg = if run.new_high_score {
            format!("Last run: {} (new high score!)", run.final_score)
        } else {
            format!("Last run: {}", run.final_score)
        };
        target.write_at(centered(&last_msg), y, &last_msg)?;
    }

    let controls = "Enter: Play   q: Quit   Arrows: Steer/Thrust   Space: Fire";
    target.write_at(centered(controls), height.saturating_sub(3), controls)?;
    target.flush()
}
