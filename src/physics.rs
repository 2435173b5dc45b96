//! Minimal rigid-body stand-in for a host physics engine: force integration
//! and bounding-box overlap reporting.

use crate::entities::{Asteroid, Bullet, EntityId, Ship};
use crate::types::{Vector2D, normalize_degrees};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub rotation: f64, // Degrees, counter-clockwise, 0 faces +y
    pub angular_velocity: f64, // Degrees per second
    pub mass: f64,
    /// Whether the screen wrap rule applies to this body.
    pub wraps: bool,
}

impl Body {
    pub fn new(position: Vector2D, rotation: f64, mass: f64, wraps: bool) -> Self {
        Body {
            position,
            velocity: Vector2D::ZERO,
            rotation: normalize_degrees(rotation),
            angular_velocity: 0.0,
            mass,
            wraps,
        }
    }

    /// Applies `force` for `dt` seconds.
    pub fn apply_force(&mut self, force: Vector2D, dt: f64) {
        self.velocity = self.velocity.add(force.scale(dt / self.mass));
    }

    pub fn integrate(&mut self, dt: f64) {
        self.position = self.position.add(self.velocity.scale(dt));
        self.rotation = normalize_degrees(self.rotation + self.angular_velocity * dt);
    }

    pub fn up(&self) -> Vector2D {
        Vector2D::up_from_degrees(self.rotation)
    }
}

/// Trigger-volume overlap reported to the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionEvent {
    BulletHitAsteroid { bullet: EntityId, asteroid: EntityId },
    ShipHitAsteroid { asteroid: EntityId },
}

fn boxes_overlap(
    a_center: Vector2D,
    a_size: Vector2D,
    b_center: Vector2D,
    b_size: Vector2D,
) -> bool {
    let dx = (a_center.x - b_center.x).abs();
    let dy = (a_center.y - b_center.y).abs();
    dx * 2.0 <= a_size.x + b_size.x && dy * 2.0 <= a_size.y + b_size.y
}

/// Reports every bullet/asteroid and ship/asteroid overlap. A bullet reports
/// at most one asteroid, the first it overlaps.
pub fn detect_overlaps(
    ship: &Ship,
    asteroids: &[Asteroid],
    bullets: &[Bullet],
) -> Vec<CollisionEvent> {
    let mut events = Vec::new();

    for bullet in bullets {
        let hit = asteroids
            .iter()
            .find(|asteroid| {
                boxes_overlap(
                    bullet.body.position,
                    bullet.bounds_size(),
                    asteroid.body.position,
                    asteroid.size,
                )
            });
        if let Some(asteroid) = hit {
            events.push(CollisionEvent::BulletHitAsteroid {
                bullet: bullet.id,
                asteroid: asteroid.id,
            });
        }
    }

    for asteroid in asteroids {
        if boxes_overlap(
            ship.body.position,
            ship.bounds_size(),
            asteroid.body.position,
            asteroid.size,
        ) {
            events.push(CollisionEvent::ShipHitAsteroid { asteroid: asteroid.id });
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AsteroidSize;
    use approx::assert_relative_eq;

    #[test]
    fn force_scales_with_time_and_mass() {
        let mut body = Body::new(Vector2D::ZERO, 0.0, 2.0, true);
        body.apply_force(Vector2D::new(10.0, 0.0), 0.5);
        assert_relative_eq!(body.velocity.x, 2.5);
        body.integrate(2.0);
        assert_relative_eq!(body.position.x, 5.0);
    }

    #[test]
    fn rotation_stays_within_one_turn() {
        let mut body = Body::new(Vector2D::ZERO, 350.0, 1.0, true);
        body.angular_velocity = 200.0;
        body.integrate(0.1);
        assert_relative_eq!(body.rotation, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn overlaps_report_bullets_and_ship() {
        let ship = Ship::new(EntityId(1), Vector2D::ZERO, 3, 1.0, 1.0);
        let near = Asteroid::new(
            EntityId(2),
            "rock",
            '@',
            AsteroidSize::Large,
            Vector2D::new(1.0, 0.0),
            0.0,
            Vector2D::new(2.0, 2.0),
            1.0,
        );
        let far = Asteroid::new(
            EntityId(3),
            "rock",
            '@',
            AsteroidSize::Large,
            Vector2D::new(8.0, 8.0),
            0.0,
            Vector2D::new(2.0, 2.0),
            1.0,
        );
        let bullet = Bullet::new(EntityId(4), Vector2D::new(8.2, 8.0), 0.0, 0.02, 1.0, 0.5);

        let events = detect_overlaps(&ship, &[near, far], &[bullet]);

        assert_eq!(
            events,
            vec![
                CollisionEvent::BulletHitAsteroid { bullet: EntityId(4), asteroid: EntityId(3) },
                CollisionEvent::ShipHitAsteroid { asteroid: EntityId(2) },
            ]
        );
    }
}
