//! The arena simulation: ship, asteroid population, bullets, lives and score.
//!
//! The arena is driven from outside through three entry points, always
//! called on one thread:
//!
//! * [`Arena::fixed_update`] once per physics tick (steering, thrust,
//!   integration, screen wrap),
//! * [`Arena::frame_update`] once per rendered frame (firing, bullet
//!   lifetimes, the spawn timer, the hit flash),
//! * [`Arena::handle_collision`] for every overlap the physics side reports.
//!
//! Entities removed by a collision are gone for every later call, including
//! later events in the same batch.

use log::{error, info, warn};
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::constants::SCORE_INCREMENT;
use crate::entities::{Asteroid, AsteroidSize, Bullet, EntityId, Ship};
use crate::error::{GameError, InvariantViolation};
use crate::flash::{FlashTimer, ShipColor};
use crate::input::{Command, InputSource};
use crate::physics::{Body, CollisionEvent};
use crate::spawner::{AsteroidSpawner, SideSelector};
use crate::types::{Bounds, Vector2D};

/// Result of a finished run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub final_score: u32,
    pub previous_high_score: u32,
    /// `final_score` beat the high score the run started with.
    pub new_high_score: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// One of the participants was already destroyed, or the run is over.
    Ignored,
    AsteroidDestroyed { score: u32, fragment: Option<EntityId> },
    LifeLost { lives_remaining: u32 },
    RunOver(RunSummary),
}

pub struct Arena {
    bounds: Bounds,
    ship: Ship,
    asteroids: Vec<Asteroid>,
    bullets: Vec<Bullet>,
    spawner: AsteroidSpawner,
    flash: FlashTimer,
    rng: StdRng,
    score: u32,
    high_score: u32,
    next_id: u64,
    run_over: bool,
    rotation_speed: f64,
    ship_force: f64,
    bullet_speed: f64,
    bullet_mass: f64,
    bullet_time_to_live: f64,
    bullet_size: f64,
    fixed_timestep: f64,
}

impl Arena {
    /// Starts a run: the ship sits at the origin and the initial asteroids
    /// are placed off-screen. `high_score` is the stored value at run start.
    pub fn new(
        config: &GameConfig,
        bounds: Bounds,
        high_score: u32,
        rng: StdRng,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let spawner = AsteroidSpawner::new(&config.spawner, config.arena.fixed_timestep)?;
        Ok(Self::start(config, bounds, high_score, rng, spawner))
    }

    /// Like [`Arena::new`] with a custom side-selection strategy.
    pub fn with_side_selector(
        config: &GameConfig,
        bounds: Bounds,
        high_score: u32,
        rng: StdRng,
        selector: Box<dyn SideSelector>,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let spawner = AsteroidSpawner::new(&config.spawner, config.arena.fixed_timestep)?
            .with_selector(selector);
        Ok(Self::start(config, bounds, high_score, rng, spawner))
    }

    fn start(
        config: &GameConfig,
        bounds: Bounds,
        high_score: u32,
        rng: StdRng,
        spawner: AsteroidSpawner,
    ) -> Self {
        let ship = Ship::new(
            EntityId(0),
            Vector2D::ZERO,
            config.ship.lives,
            config.ship.mass,
            config.ship.size,
        );
        let mut arena = Arena {
            bounds,
            ship,
            asteroids: Vec::new(),
            bullets: Vec::new(),
            spawner,
            flash: FlashTimer::new(config.flash.duration, config.flash.interval),
            rng,
            score: 0,
            high_score,
            next_id: 1,
            run_over: false,
            rotation_speed: config.ship.rotation_speed,
            ship_force: config.ship.force,
            bullet_speed: config.bullet.speed,
            bullet_mass: config.bullet.mass,
            bullet_time_to_live: config.bullet.time_to_live,
            bullet_size: config.bullet.size,
            fixed_timestep: config.arena.fixed_timestep,
        };

        for _ in 0..arena.spawner.initial_count() {
            arena.spawn_large();
        }
        info!(
            "Run started with {} asteroids, {} lives, high score {}.",
            arena.asteroids.len(),
            arena.ship.lives,
            arena.high_score
        );
        arena
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn spawn_large(&mut self) {
        let id = self.allocate_id();
        let asteroid = self.spawner.create_large(id, &self.bounds, &mut self.rng);
        self.asteroids.push(asteroid);
    }

    /// Steering, thrust, integration and screen wrap for one physics tick.
    pub fn fixed_update(&mut self, dt: f64, input: &impl InputSource) {
        if self.run_over {
            return;
        }

        self.ship.steer(
            input.is_held(Command::RotateLeft),
            input.is_held(Command::RotateRight),
            self.rotation_speed,
        );
        self.ship.thrust(input.is_held(Command::Thrust), self.ship_force, dt);

        let bounds = self.bounds;
        let bodies = std::iter::once(&mut self.ship.body)
            .chain(self.asteroids.iter_mut().map(|a| &mut a.body))
            .chain(self.bullets.iter_mut().map(|b| &mut b.body));
        for body in bodies {
            body.integrate(dt);
            wrap_body(body, &bounds);
        }
    }

    /// Firing, bullet lifetimes, scheduled spawns and the hit flash for one frame.
    pub fn frame_update(&mut self, dt: f64, input: &impl InputSource) {
        if self.run_over {
            return;
        }

        // A bullet fired this frame starts counting down on the next one.
        self.bullets.retain_mut(|bullet| !bullet.age(dt));

        if input.was_pressed(Command::Fire) {
            self.fire();
        }

        let due = self.spawner.due_spawns(dt, self.asteroids.len());
        for _ in 0..due {
            self.spawn_large();
        }

        self.flash.advance(dt);
    }

    fn fire(&mut self) {
        let id = self.allocate_id();
        let mut bullet = Bullet::new(
            id,
            self.ship.body.position,
            self.ship.body.rotation,
            self.bullet_mass,
            self.bullet_time_to_live,
            self.bullet_size,
        );
        let launch = bullet.body.up().scale(self.bullet_speed);
        bullet.body.apply_force(launch, self.fixed_timestep);
        self.bullets.push(bullet);
    }

    pub fn handle_collision(&mut self, event: CollisionEvent) -> CollisionOutcome {
        if self.run_over {
            return CollisionOutcome::Ignored;
        }
        match event {
            CollisionEvent::BulletHitAsteroid { bullet, asteroid } => {
                self.bullet_hit(bullet, asteroid)
            }
            CollisionEvent::ShipHitAsteroid { asteroid } => self.ship_hit(asteroid),
        }
    }

    fn bullet_hit(&mut self, bullet_id: EntityId, asteroid_id: EntityId) -> CollisionOutcome {
        let Some(bullet_index) = self.bullets.iter().position(|b| b.id == bullet_id) else {
            return CollisionOutcome::Ignored;
        };
        let Some(asteroid_index) = self.asteroids.iter().position(|a| a.id == asteroid_id) else {
            return CollisionOutcome::Ignored;
        };

        self.bullets.swap_remove(bullet_index);
        let asteroid = self.asteroids.swap_remove(asteroid_index);
        self.score += SCORE_INCREMENT;

        let fragment = match asteroid.size_class {
            AsteroidSize::Large => {
                let id = self.allocate_id();
                let small = self.spawner.create_small_from(id, &asteroid, &mut self.rng);
                self.asteroids.push(small);
                Some(id)
            }
            AsteroidSize::Small => None,
        };
        info!(
            "Bullet {} destroyed {} {}. Score: {}",
            bullet_id,
            asteroid.size_class.tag(),
            asteroid_id,
            self.score
        );

        CollisionOutcome::AsteroidDestroyed { score: self.score, fragment }
    }

    fn ship_hit(&mut self, asteroid_id: EntityId) -> CollisionOutcome {
        let Some(asteroid_index) = self.asteroids.iter().position(|a| a.id == asteroid_id) else {
            return CollisionOutcome::Ignored;
        };
        self.asteroids.swap_remove(asteroid_index);

        if self.ship.lives == 0 {
            error!("Ship hit with no lives left; clamping to 0.");
        }
        self.ship.lives = self.ship.lives.saturating_sub(1);
        info!("Ship hit by asteroid {}. Lives: {}", asteroid_id, self.ship.lives);

        if self.ship.lives > 0 {
            self.flash.start();
            return CollisionOutcome::LifeLost { lives_remaining: self.ship.lives };
        }

        self.run_over = true;
        self.spawner.cancel();
        let summary = RunSummary {
            final_score: self.score,
            previous_high_score: self.high_score,
            new_high_score: self.score > self.high_score,
        };
        info!(
            "Run over. Final score: {} (high score {}).",
            summary.final_score, summary.previous_high_score
        );
        CollisionOutcome::RunOver(summary)
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.ship.lives
    }

    /// High score as shown on screen: the stored value until the current
    /// score passes it. Nothing is persisted before the run ends.
    pub fn displayed_high_score(&self) -> u32 {
        self.score.max(self.high_score)
    }

    pub fn ship_color(&self) -> ShipColor {
        self.flash.color()
    }

    pub fn is_run_over(&self) -> bool {
        self.run_over
    }

    pub fn validate_invariants(&self) -> Result<(), InvariantViolation> {
        if (self.ship.lives == 0) != self.run_over {
            return Err(InvariantViolation::LivesRunStateMismatch {
                lives: self.ship.lives,
                run_over: self.run_over,
            });
        }
        if let Some(bullet) = self.bullets.iter().find(|b| b.time_to_live <= 0.0) {
            return Err(InvariantViolation::LiveBulletExpired { time_to_live: bullet.time_to_live });
        }
        if !self.bounds.contains(self.ship.body.position) {
            let p = self.ship.body.position;
            return Err(InvariantViolation::WrappedEntityOutOfBounds { x: p.x, y: p.y });
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn ship_mut(&mut self) -> &mut Ship {
        &mut self.ship
    }

    #[cfg(test)]
    pub(crate) fn asteroids_mut(&mut self) -> &mut Vec<Asteroid> {
        &mut self.asteroids
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }
}

fn wrap_body(body: &mut Body, bounds: &Bounds) {
    if !body.wraps {
        return;
    }
    let wrapped = bounds.wrap(body.position);
    if wrapped != body.position {
        if !bounds.contains(wrapped) {
            warn!("Wrapped position ({}, {}) still outside the field.", wrapped.x, wrapped.y);
        }
        body.position = wrapped;
    }
}
