use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("cannot derive a direction between coincident points ({x}, {y})")]
    CoincidentPoints { x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    x: f32,
    y: f32,
}

impl Direction {
    pub fn from_point_to_point(from: Point, to: Point) -> Result<Self, GeometryError> {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON {
            return Err(GeometryError::CoincidentPoints { x: from.x, y: from.y });
        }

        Ok(Self {
            x: dx / length,
            y: dy / length,
        })
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    // Rotation that maps the local +y axis onto the opposite of this direction,
    // so a tail drawn along +y trails behind the head.
    pub fn trailing_angle(&self) -> f32 {
        std::f32::consts::FRAC_PI_2 - (-self.y).atan2(self.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!(close(a.distance_to(b), 5.0));
        assert!(close(b.distance_to(a), 5.0));
        assert_eq!(a.distance_to(a), 0.0);
    }

    #[test]
    fn direction_normalizes_difference() {
        let dir = Direction::from_point_to_point(Point::ORIGIN, Point::new(3.0, 4.0)).unwrap();
        assert!(close(dir.x(), 0.6));
        assert!(close(dir.y(), 0.8));
    }

    #[test]
    fn direction_is_unit_length() {
        let dir = Direction::from_point_to_point(Point::new(-12.5, 300.0), Point::new(410.0, 7.25))
            .unwrap();
        assert!(close(dir.x() * dir.x() + dir.y() * dir.y(), 1.0));
    }

    #[test]
    fn coincident_points_are_rejected() {
        let p = Point::new(10.0, 20.0);
        assert_eq!(
            Direction::from_point_to_point(p, p),
            Err(GeometryError::CoincidentPoints { x: 10.0, y: 20.0 })
        );
    }

    #[test]
    fn straight_up_has_no_rotation() {
        let dir = Direction::from_point_to_point(Point::new(0.0, 100.0), Point::ORIGIN).unwrap();
        assert!(close(dir.trailing_angle(), 0.0));

        let right = Direction::from_point_to_point(Point::ORIGIN, Point::new(10.0, 0.0)).unwrap();
        assert!(close(right.trailing_angle(), std::f32::consts::FRAC_PI_2));
    }
}
