use std::fmt;

use crate::physics::Body;
use crate::types::Vector2D;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// --- Ship ---
pub struct Ship {
    pub id: EntityId,
    pub body: Body,
    pub lives: u32,
    pub is_thrusting: bool,
    pub size: f64,
}

impl Ship {
    pub fn new(id: EntityId, position: Vector2D, lives: u32, mass: f64, size: f64) -> Self {
        Ship {
            id,
            body: Body::new(position, 0.0, mass, true),
            lives,
            is_thrusting: false,
            size,
        }
    }

    pub fn bounds_size(&self) -> Vector2D {
        Vector2D::new(self.size, self.size)
    }

    /// Sets the turn rate from the rotate commands. Left wins when both are held.
    pub fn steer(&mut self, rotate_left: bool, rotate_right: bool, rotation_speed: f64) {
        self.body.angular_velocity = if rotate_left {
            rotation_speed
        } else if rotate_right {
            -rotation_speed
        } else {
            0.0
        };
    }

    pub fn thrust(&mut self, engaged: bool, force: f64, dt: f64) {
        self.is_thrusting = engaged;
        if engaged {
            let push = self.body.up().scale(force);
            self.body.apply_force(push, dt);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsteroidSize {
    Large,
    Small,
}

impl AsteroidSize {
    pub fn tag(&self) -> &'static str {
        match self {
            AsteroidSize::Large => "AsteroidLarge",
            AsteroidSize::Small => "AsteroidSmall",
        }
    }
}

// --- Asteroid ---
#[derive(Clone, Debug)]
pub struct Asteroid {
    pub id: EntityId,
    pub template: String,
    pub glyph: char,
    pub size_class: AsteroidSize,
    pub body: Body,
    /// Bounding-box width and height in world units
    pub size: Vector2D,
}

impl Asteroid {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EntityId,
        template: &str,
        glyph: char,
        size_class: AsteroidSize,
        position: Vector2D,
        rotation: f64,
        size: Vector2D,
        mass: f64,
    ) -> Self {
        Asteroid {
            id,
            template: template.to_string(),
            glyph,
            size_class,
            body: Body::new(position, rotation, mass, true),
            size,
        }
    }
}

// --- Bullet ---
#[derive(Clone, Debug)]
pub struct Bullet {
    pub id: EntityId,
    pub body: Body,
    pub time_to_live: f64, // Seconds
    pub size: f64,
}

impl Bullet {
    pub fn new(
        id: EntityId,
        position: Vector2D,
        rotation: f64,
        mass: f64,
        time_to_live: f64,
        size: f64,
    ) -> Self {
        Bullet {
            id,
            body: Body::new(position, rotation, mass, false),
            time_to_live,
            size,
        }
    }

    pub fn bounds_size(&self) -> Vector2D {
        Vector2D::new(self.size, self.size)
    }

    /// Counts the lifetime down and reports whether the bullet is spent.
    pub fn age(&mut self, dt: f64) -> bool {
        self.time_to_live -= dt;
        self.time_to_live <= 0.0
    }
}
