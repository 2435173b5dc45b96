//! Asteroid population: template catalog, spawn timer, off-screen placement
//! and launch.

use log::{debug, info};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::config::SpawnerConfig;
use crate::constants::{SMALL_ASTEROID_SIZE_DIVISOR, SPAWN_OFFSET};
use crate::entities::{Asteroid, AsteroidSize, EntityId};
use crate::error::GameError;
use crate::types::{Bounds, Vector2D};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AsteroidTemplate {
    pub name: String,
    pub size: Vector2D,
    pub glyph: char,
}

impl AsteroidTemplate {
    pub fn new(name: &str, size: Vector2D, glyph: char) -> Self {
        AsteroidTemplate { name: name.to_string(), size, glyph }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Top, Side::Right, Side::Bottom];
}

/// Picks the screen side the next asteroid enters from.
pub trait SideSelector {
    fn select(&mut self, rng: &mut dyn RngCore) -> Side;
}

pub struct FixedSide(pub Side);

impl SideSelector for FixedSide {
    fn select(&mut self, _rng: &mut dyn RngCore) -> Side {
        self.0
    }
}

pub struct UniformSide;

impl SideSelector for UniformSide {
    fn select(&mut self, rng: &mut dyn RngCore) -> Side {
        Side::ALL[rng.gen_range(0..Side::ALL.len())]
    }
}

/// Configurable choice of [`SideSelector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidePolicy {
    Fixed(Side),
    Uniform,
}

impl Default for SidePolicy {
    fn default() -> Self {
        SidePolicy::Fixed(Side::Left)
    }
}

impl SidePolicy {
    pub fn selector(&self) -> Box<dyn SideSelector> {
        match *self {
            SidePolicy::Fixed(side) => Box::new(FixedSide(side)),
            SidePolicy::Uniform => Box::new(UniformSide),
        }
    }
}

/// Repeating callback schedule: fires once after `delay`, then every `period`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepeatingTimer {
    until_next: f64,
    period: f64,
    cancelled: bool,
}

impl RepeatingTimer {
    pub fn new(delay: f64, period: f64) -> Self {
        RepeatingTimer { until_next: delay, period, cancelled: false }
    }

    /// Advances the clock and returns how many times the timer fired.
    pub fn advance(&mut self, dt: f64) -> u32 {
        if self.cancelled {
            return 0;
        }
        self.until_next -= dt;
        let mut fired = 0;
        while self.until_next <= 0.0 {
            fired += 1;
            self.until_next += self.period;
        }
        fired
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

pub struct AsteroidSpawner {
    catalog: Vec<AsteroidTemplate>,
    selector: Box<dyn SideSelector>,
    timer: RepeatingTimer,
    initial_count: usize,
    min_force: f64,
    max_force: f64,
    asteroid_mass: f64,
    max_asteroids: Option<usize>,
    launch_dt: f64,
}

impl AsteroidSpawner {
    /// `launch_dt` is the tick length over which the launch force acts.
    pub fn new(config: &SpawnerConfig, launch_dt: f64) -> Result<Self, GameError> {
        if config.catalog.is_empty() {
            return Err(GameError::Configuration("asteroid catalog is empty".to_string()));
        }
        Ok(AsteroidSpawner {
            catalog: config.catalog.clone(),
            selector: config.side_policy.selector(),
            timer: RepeatingTimer::new(config.first_spawn_delay, config.interval_seconds),
            initial_count: config.initial_count,
            min_force: config.min_force,
            max_force: config.max_force,
            asteroid_mass: config.asteroid_mass,
            max_asteroids: config.max_asteroids,
            launch_dt,
        })
    }

    pub fn with_selector(mut self, selector: Box<dyn SideSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn initial_count(&self) -> usize {
        self.initial_count
    }

    /// Advances the spawn timer and returns how many asteroids are due,
    /// honoring the population cap.
    pub fn due_spawns(&mut self, dt: f64, population: usize) -> usize {
        let fired = self.timer.advance(dt) as usize;
        match self.max_asteroids {
            Some(cap) => {
                let allowed = fired.min(cap.saturating_sub(population));
                if allowed < fired {
                    debug!(
                        "Population cap {} reached, skipping {} spawn(s).",
                        cap,
                        fired - allowed
                    );
                }
                allowed
            }
            None => fired,
        }
    }

    pub fn cancel(&mut self) {
        if !self.timer.is_cancelled() {
            info!("Asteroid spawning cancelled.");
        }
        self.timer.cancel();
    }

    /// A point `SPAWN_OFFSET` units beyond the selected side, with the other
    /// coordinate uniform across the field.
    pub fn spawn_position(&mut self, bounds: &Bounds, rng: &mut impl Rng) -> Vector2D {
        let side = self.selector.select(rng);
        let x = rng.gen_range(bounds.min_x..bounds.max_x);
        let y = rng.gen_range(bounds.min_y..bounds.max_y);
        match side {
            Side::Left => Vector2D::new(bounds.min_x - SPAWN_OFFSET, y),
            Side::Right => Vector2D::new(bounds.max_x + SPAWN_OFFSET, y),
            Side::Top => Vector2D::new(x, bounds.max_y + SPAWN_OFFSET),
            Side::Bottom => Vector2D::new(x, bounds.min_y - SPAWN_OFFSET),
        }
    }

    fn pick_template(&self, rng: &mut impl Rng) -> &AsteroidTemplate {
        &self.catalog[rng.gen_range(0..self.catalog.len())]
    }

    /// Launch scales with the spawn position, so asteroids placed farther
    /// from the origin move faster.
    fn launch(&self, asteroid: &mut Asteroid, rng: &mut impl Rng) {
        let magnitude = rng.gen_range(self.min_force..=self.max_force);
        let force = asteroid.body.position.scale(magnitude);
        asteroid.body.apply_force(force, self.launch_dt);
    }

    pub fn create_large(&mut self, id: EntityId, bounds: &Bounds, rng: &mut impl Rng) -> Asteroid {
        let position = self.spawn_position(bounds, rng);
        let rotation = rng.gen_range(0.0..360.0);
        let template = self.pick_template(rng);
        let mut asteroid = Asteroid::new(
            id,
            &template.name,
            template.glyph,
            AsteroidSize::Large,
            position,
            rotation,
            template.size,
            self.asteroid_mass,
        );
        self.launch(&mut asteroid, rng);
        debug!(
            "Spawned {} {} ({}) at ({:.2}, {:.2})",
            asteroid.size_class.tag(),
            id,
            asteroid.template,
            position.x,
            position.y
        );
        asteroid
    }

    /// The fragment left behind when `source` is shot: same position, new
    /// random heading, bounding box shrunk by `SMALL_ASTEROID_SIZE_DIVISOR`.
    pub fn create_small_from(
        &self,
        id: EntityId,
        source: &Asteroid,
        rng: &mut impl Rng,
    ) -> Asteroid {
        let rotation = rng.gen_range(0.0..360.0);
        let template = self.pick_template(rng);
        let size = source.size.scale(1.0 / SMALL_ASTEROID_SIZE_DIVISOR);
        let mut asteroid = Asteroid::new(
            id,
            &template.name,
            template.glyph,
            AsteroidSize::Small,
            source.body.position,
            rotation,
            size,
            self.asteroid_mass,
        );
        self.launch(&mut asteroid, rng);
        debug!(
            "Split {} into {} at ({:.2}, {:.2})",
            source.id, id, asteroid.body.position.x, asteroid.body.position.y
        );
        asteroid
    }
}
