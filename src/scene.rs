//! Scene host: the Menu and Main scenes, the fixed-timestep accumulator that
//! drives the arena, and high-score persistence at the end of a run.

use std::fmt;

use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::arena::{Arena, CollisionOutcome, RunSummary};
use crate::config::GameConfig;
use crate::constants::{HIGH_SCORE_KEY, MAX_FIXED_STEPS_PER_FRAME};
use crate::error::GameError;
use crate::input::InputSource;
use crate::physics::{CollisionEvent, detect_overlaps};
use crate::prefs::Preferences;
use crate::types::Bounds;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scene {
    Menu,
    Main,
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scene::Menu => write!(f, "Menu"),
            Scene::Main => write!(f, "Main"),
        }
    }
}

pub struct Session<P: Preferences> {
    config: GameConfig,
    bounds: Bounds,
    prefs: P,
    scene: Scene,
    arena: Option<Arena>,
    accumulator: f64,
    seed: Option<u64>,
    last_run: Option<RunSummary>,
}

impl<P: Preferences> Session<P> {
    /// Opens on the menu scene.
    pub fn new(config: GameConfig, bounds: Bounds, prefs: P) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Session {
            config,
            bounds,
            prefs,
            scene: Scene::Menu,
            arena: None,
            accumulator: 0.0,
            seed: None,
            last_run: None,
        })
    }

    /// Seeds every future run from `seed` instead of OS entropy.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    pub fn arena(&self) -> Option<&Arena> {
        self.arena.as_ref()
    }

    pub fn last_run(&self) -> Option<&RunSummary> {
        self.last_run.as_ref()
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    pub fn stored_high_score(&self) -> u32 {
        u32::try_from(self.prefs.get_int(HIGH_SCORE_KEY).max(0)).unwrap_or(u32::MAX)
    }

    /// New viewport geometry, used from the next run on.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Replaces the current scene. All state of the previous run is dropped.
    pub fn load_scene(&mut self, scene: Scene) -> Result<(), GameError> {
        info!("Loading scene {}.", scene);
        self.arena = None;
        self.accumulator = 0.0;
        if scene == Scene::Main {
            let rng = match self.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let high_score = self.stored_high_score();
            self.arena = Some(Arena::new(&self.config, self.bounds, high_score, rng)?);
        }
        self.scene = scene;
        Ok(())
    }

    /// Menu "play" action.
    pub fn play(&mut self) -> Result<(), GameError> {
        if self.scene != Scene::Menu {
            warn!("Play requested from scene {}; ignoring.", self.scene);
            return Ok(());
        }
        self.load_scene(Scene::Main)
    }

    /// Advances the Main scene by one rendered frame: as many fixed ticks as
    /// the accumulated time allows, one frame update, then overlap events.
    pub fn advance(&mut self, frame_dt: f64, input: &impl InputSource) -> Result<(), GameError> {
        let timestep = self.config.arena.fixed_timestep;
        let Some(arena) = self.arena.as_mut() else {
            return Ok(());
        };

        self.accumulator += frame_dt;
        let mut steps = 0;
        while self.accumulator >= timestep && steps < MAX_FIXED_STEPS_PER_FRAME {
            arena.fixed_update(timestep, input);
            self.accumulator -= timestep;
            steps += 1;
        }
        if steps == MAX_FIXED_STEPS_PER_FRAME && self.accumulator >= timestep {
            warn!("Dropping {:.3}s of simulation after a slow frame.", self.accumulator);
            self.accumulator = 0.0;
        }

        arena.frame_update(frame_dt, input);

        let events = detect_overlaps(arena.ship(), arena.asteroids(), arena.bullets());
        for event in events {
            self.handle_collision(event)?;
            if self.scene != Scene::Main {
                break;
            }
        }
        Ok(())
    }

    /// Feeds one overlap to the arena. A finished run stores a better high
    /// score and returns to the menu.
    pub fn handle_collision(
        &mut self,
        event: CollisionEvent,
    ) -> Result<CollisionOutcome, GameError> {
        let Some(arena) = self.arena.as_mut() else {
            return Ok(CollisionOutcome::Ignored);
        };
        let outcome = arena.handle_collision(event);
        if let CollisionOutcome::RunOver(summary) = outcome {
            self.end_run(summary)?;
        }
        Ok(outcome)
    }

    fn end_run(&mut self, summary: RunSummary) -> Result<(), GameError> {
        if i64::from(summary.final_score) > self.prefs.get_int(HIGH_SCORE_KEY) {
            info!("New high score: {}", summary.final_score);
            self.prefs.set_int(HIGH_SCORE_KEY, i64::from(summary.final_score))?;
        }
        self.last_run = Some(summary);
        self.load_scene(Scene::Menu)
    }
}
