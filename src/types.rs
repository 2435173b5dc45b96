use serde::{Deserialize, Serialize};

use crate::error::GameError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    pub fn scale(&self, scalar: f64) -> Self {
        Vector2D::new(self.x * scalar, self.y * scalar)
    }

    pub fn add(&self, other: Vector2D) -> Self {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(&self, other: Vector2D) -> Self {
        Vector2D::new(self.x - other.x, self.y - other.y)
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector the "up" axis points along after rotating by `degrees`
    /// counter-clockwise. Zero degrees faces +y.
    pub fn up_from_degrees(degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Vector2D::new(-radians.sin(), radians.cos())
    }
}

/// Normalizes an angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Axis-aligned play field, centered on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Derives the field from an orthographic camera: the half-height is the
    /// camera's vertical extent, the half-width follows the viewport aspect.
    pub fn from_viewport(
        half_height: f64,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<Self, GameError> {
        if !(half_height > 0.0) {
            return Err(GameError::Configuration(format!(
                "orthographic half-height must be positive, got {half_height}"
            )));
        }
        if !(viewport_width > 0.0) || !(viewport_height > 0.0) {
            return Err(GameError::Configuration(format!(
                "viewport must have a positive size, got {viewport_width}x{viewport_height}"
            )));
        }
        let half_width = half_height * viewport_width / viewport_height;
        Ok(Bounds {
            min_x: -half_width,
            max_x: half_width,
            min_y: -half_height,
            max_y: half_height,
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, point: Vector2D) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Teleports a point that left the field to the opposite edge. Each axis
    /// is handled independently; points inside the field are returned as is.
    pub fn wrap(&self, point: Vector2D) -> Vector2D {
        let mut x = point.x;
        let mut y = point.y;

        if x < self.min_x {
            x = self.max_x;
        } else if x > self.max_x {
            x = self.min_x;
        }

        if y < self.min_y {
            y = self.max_y;
        } else if y > self.max_y {
            y = self.min_y;
        }

        Vector2D::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn field() -> Bounds {
        Bounds::from_viewport(10.0, 160.0, 90.0).expect("valid viewport")
    }

    #[test]
    fn bounds_follow_viewport_aspect() {
        let bounds = field();
        assert_relative_eq!(bounds.max_y, 10.0);
        assert_relative_eq!(bounds.min_y, -10.0);
        assert_relative_eq!(bounds.max_x, 10.0 * 160.0 / 90.0);
        assert_relative_eq!(bounds.min_x, -bounds.max_x);
    }

    #[test]
    fn degenerate_viewport_is_rejected() {
        assert!(matches!(Bounds::from_viewport(10.0, 0.0, 90.0), Err(GameError::Configuration(_))));
        assert!(matches!(
            Bounds::from_viewport(10.0, 160.0, -1.0),
            Err(GameError::Configuration(_))
        ));
        assert!(matches!(
            Bounds::from_viewport(0.0, 160.0, 90.0),
            Err(GameError::Configuration(_))
        ));
    }

    #[test]
    fn wrap_teleports_across_every_edge() {
        let bounds = field();
        let eps = 0.01;

        let right = bounds.wrap(Vector2D::new(bounds.max_x + eps, 0.0));
        assert_eq!(right, Vector2D::new(bounds.min_x, 0.0));

        let left = bounds.wrap(Vector2D::new(bounds.min_x - eps, 1.0));
        assert_eq!(left, Vector2D::new(bounds.max_x, 1.0));

        let top = bounds.wrap(Vector2D::new(2.0, bounds.max_y + eps));
        assert_eq!(top, Vector2D::new(2.0, bounds.min_y));

        let bottom = bounds.wrap(Vector2D::new(-3.0, bounds.min_y - eps));
        assert_eq!(bottom, Vector2D::new(-3.0, bounds.max_y));
    }

    #[test]
    fn wrap_leaves_inside_points_alone() {
        let bounds = field();
        let inside = Vector2D::new(1.5, -2.5);
        assert_eq!(bounds.wrap(inside), inside);
        let on_edge = Vector2D::new(bounds.max_x, bounds.min_y);
        assert_eq!(bounds.wrap(on_edge), on_edge);
    }

    #[test]
    fn up_vector_rotates_counter_clockwise() {
        let up = Vector2D::up_from_degrees(0.0);
        assert_relative_eq!(up.x, 0.0);
        assert_relative_eq!(up.y, 1.0);

        let left = Vector2D::up_from_degrees(90.0);
        assert_relative_eq!(left.x, -1.0);
        assert_relative_eq!(left.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn degrees_normalize_into_one_turn() {
        assert_relative_eq!(normalize_degrees(-90.0), 270.0);
        assert_relative_eq!(normalize_degrees(720.0), 0.0);
    }
}
