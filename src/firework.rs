use crate::geometry::{Direction, GeometryError, Point};
use crate::surface::Rgba;

// Distance to the target at which a rocket bursts.
pub const EXPLODE_DISTANCE: f32 = 20.0;
// Growth of the burst radius per frame once exploded.
pub const EXPANSION_STEP: f32 = 5.0;
// Burst radius at which a firework has faded out.
pub const EXPIRED_EXPANSION: f32 = 240.0;
pub const MIN_SPEED: f32 = 4.0;

// Gradient stops for the burst particles, inner color first.
pub const PALETTE: [(Rgba, Rgba); 5] = [
    (Rgba::new(255, 200, 100, 0.5), Rgba::new(255, 0, 0, 0.2)),
    (Rgba::new(255, 255, 100, 0.5), Rgba::new(255, 0, 255, 0.2)),
    (Rgba::new(100, 255, 100, 0.5), Rgba::new(0, 255, 255, 0.2)),
    (Rgba::new(100, 100, 255, 0.5), Rgba::new(255, 255, 0, 0.2)),
    (Rgba::new(255, 100, 255, 0.5), Rgba::new(0, 255, 0, 0.2)),
];

pub fn random_between(rng: &mut fastrand::Rng, min: f32, max: f32) -> f32 {
    rng.f32() * (max - min) + min
}

#[derive(Debug, Clone, PartialEq)]
pub struct Firework {
    pub now_point: Point,
    to_point: Point,
    direction: Direction,
    exploded: bool,
    color_from: Rgba,
    color_end: Rgba,
    expansion: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    Moved,
    Exploded,
    Expanded,
}

impl Firework {
    pub fn new(
        from: Point,
        to: Point,
        (color_from, color_end): (Rgba, Rgba),
        expansion: f32,
    ) -> Result<Self, GeometryError> {
        Ok(Self {
            now_point: from,
            to_point: to,
            direction: Direction::from_point_to_point(from, to)?,
            exploded: false,
            color_from,
            color_end,
            expansion,
        })
    }

    pub fn launch(rng: &mut fastrand::Rng, width: f32, height: f32) -> Result<Self, GeometryError> {
        let colors = PALETTE[rng.usize(0..PALETTE.len())];
        let from = Point::new(
            random_between(rng, width / 6.0, width * 5.0 / 6.0),
            random_between(rng, height * 5.0 / 6.0, height),
        );
        let to = Point::new(
            random_between(rng, width / 6.0, width * 5.0 / 6.0),
            random_between(rng, height / 6.0, height * 2.0 / 6.0),
        );
        let expansion = random_between(rng, 10.0, 20.0);
        Self::new(from, to, colors, expansion)
    }

    pub fn to_point(&self) -> Point {
        self.to_point
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn exploded(&self) -> bool {
        self.exploded
    }

    pub fn colors(&self) -> (Rgba, Rgba) {
        (self.color_from, self.color_end)
    }

    pub fn expansion(&self) -> f32 {
        self.expansion
    }

    // Speed grows with the remaining distance but never drops below `MIN_SPEED`.
    pub fn speed(&self) -> f32 {
        (self.now_point.distance_to(self.to_point) / 100.0).max(MIN_SPEED)
    }

    pub fn advance(&mut self) -> Advance {
        let distance = self.now_point.distance_to(self.to_point);
        if distance < EXPLODE_DISTANCE {
            let first = !self.exploded;
            self.exploded = true;
            self.expansion += EXPANSION_STEP;
            return if first { Advance::Exploded } else { Advance::Expanded };
        }

        let speed = self.speed();
        self.now_point.x += self.direction.x() * speed;
        self.now_point.y += self.direction.y() * speed;
        Advance::Moved
    }

    pub fn is_expired(&self) -> bool {
        self.exploded && self.expansion >= EXPIRED_EXPANSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn firework(from: Point, to: Point, expansion: f32) -> Firework {
        Firework::new(from, to, PALETTE[0], expansion).unwrap()
    }

    #[test]
    fn moves_towards_target_with_min_speed() {
        let mut fw = firework(Point::new(0.0, 100.0), Point::ORIGIN, 15.0);
        assert_eq!(fw.advance(), Advance::Moved);
        assert!((fw.now_point.y - 96.0).abs() < 1e-4);
        assert_eq!(fw.now_point.x, 0.0);
        assert!(!fw.exploded());
        assert_eq!(fw.expansion(), 15.0);
    }

    #[test]
    fn far_fireworks_travel_faster() {
        let mut fw = firework(Point::new(0.0, 1000.0), Point::ORIGIN, 15.0);
        assert!((fw.speed() - 10.0).abs() < 1e-4);
        fw.advance();
        assert!((fw.now_point.y - 990.0).abs() < 1e-3);
    }

    #[test]
    fn explodes_inside_threshold_instead_of_moving() {
        let mut fw = firework(Point::new(0.0, 19.9), Point::ORIGIN, 12.0);
        assert_eq!(fw.advance(), Advance::Exploded);
        assert!(fw.exploded());
        assert_eq!(fw.now_point, Point::new(0.0, 19.9));
        assert_eq!(fw.expansion(), 17.0);

        assert_eq!(fw.advance(), Advance::Expanded);
        assert!(fw.exploded());
        assert_eq!(fw.expansion(), 22.0);
    }

    #[test]
    fn threshold_is_exclusive() {
        let mut fw = firework(Point::new(0.0, 20.0), Point::ORIGIN, 12.0);
        assert_eq!(fw.advance(), Advance::Moved);
    }

    #[test]
    fn expires_at_full_expansion() {
        let mut fw = firework(Point::new(0.0, 5.0), Point::ORIGIN, 230.0);
        fw.advance();
        assert_eq!(fw.expansion(), 235.0);
        assert!(!fw.is_expired());
        fw.advance();
        assert_eq!(fw.expansion(), 240.0);
        assert!(fw.is_expired());
    }

    #[test]
    fn unexploded_never_expires() {
        let fw = firework(Point::new(0.0, 500.0), Point::ORIGIN, 400.0);
        assert!(!fw.is_expired());
    }

    #[test]
    fn launch_stays_in_bands() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let fw = Firework::launch(&mut rng, 600.0, 1200.0).unwrap();
            assert!((100.0..500.0).contains(&fw.now_point.x));
            assert!((1000.0..1200.0).contains(&fw.now_point.y));
            assert!((100.0..500.0).contains(&fw.to_point().x));
            assert!((200.0..400.0).contains(&fw.to_point().y));
            assert!((10.0..20.0).contains(&fw.expansion()));
            assert!(PALETTE.contains(&fw.colors()));
            assert!(!fw.exploded());
        }
    }

    #[test]
    fn launch_on_empty_area_fails() {
        let mut rng = fastrand::Rng::with_seed(1);
        assert!(matches!(
            Firework::launch(&mut rng, 0.0, 0.0),
            Err(GeometryError::CoincidentPoints { .. })
        ));
    }
}
