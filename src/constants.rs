// --- Arena Constants ---
pub const SPAWN_OFFSET: f64 = 20.0; // Units beyond a bound where new asteroids appear
pub const DEFAULT_ORTHOGRAPHIC_HALF_HEIGHT: f64 = 12.0;
// Terminal cells are about twice as tall as wide
pub const TERMINAL_ASPECT_RATIO_COMPENSATION: f64 = 2.0;
pub const FIXED_TIMESTEP: f64 = 1.0 / 50.0; // Seconds per physics tick
pub const MAX_FIXED_STEPS_PER_FRAME: u32 = 8;
pub const FRAME_POLL_MILLIS: u64 = 33;

// --- Spawner Constants ---
pub const INITIAL_ASTEROID_COUNT: usize = 4;
pub const FIRST_SPAWN_DELAY_SECONDS: f64 = 1.0;
pub const ASTEROID_SPAWN_INTERVAL_SECONDS: f64 = 3.0;
pub const ASTEROID_MIN_FORCE: f64 = 1.0;
pub const ASTEROID_MAX_FORCE: f64 = 5.0;
pub const ASTEROID_MASS: f64 = 1.0;
pub const SMALL_ASTEROID_SIZE_DIVISOR: f64 = 4.5;

// --- Ship Constants ---
pub const SHIP_LIVES: u32 = 3;
pub const SHIP_ROTATION_SPEED: f64 = 200.0; // Degrees per second
pub const SHIP_FORCE: f64 = 5.0;
pub const SHIP_MASS: f64 = 1.0;
pub const SHIP_SIZE: f64 = 1.5;

// --- Bullet Constants ---
pub const BULLET_SPEED: f64 = 30.0;
pub const BULLET_MASS: f64 = 0.02;
pub const BULLET_TIME_TO_LIVE: f64 = 1.0; // Seconds
pub const BULLET_SIZE: f64 = 0.5;

// --- Scoring Constants ---
pub const SCORE_INCREMENT: u32 = 100; // Per asteroid destroyed, any size
pub const HIGH_SCORE_KEY: &str = "HighScore";

// --- Hit Flash Constants ---
pub const FLASH_DURATION_SECONDS: f64 = 0.2;
pub const FLASH_INTERVAL_SECONDS: f64 = 0.1;

// --- Files ---
pub const LOG_FILE: &str = "asteroids.log";
pub const DEFAULT_PREFS_FILE: &str = "asteroids_prefs.toml";
