use crate::geometry::Point;

pub mod terminal;

// Straight (non-premultiplied) color, channels 0-255 and alpha 0-1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);
    pub const RED: Rgba = Rgba::new(255, 0, 0, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32,
            g: g as f32,
            b: b as f32,
            a,
        }
    }

    pub const fn opaque((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn to_rgb(self) -> (u8, u8, u8) {
        (
            self.r.round().clamp(0.0, 255.0) as u8,
            self.g.round().clamp(0.0, 255.0) as u8,
            self.b.round().clamp(0.0, 255.0) as u8,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub from: Rgba,
    pub to: Rgba,
}

impl RadialGradient {
    pub fn new(center: Point, inner_radius: f32, outer_radius: f32, from: Rgba, to: Rgba) -> Self {
        Self {
            center,
            inner_radius,
            outer_radius,
            from,
            to,
        }
    }

    // Color at a point in the gradient's own coordinate space. Points inside the
    // inner circle take the first stop and points past the outer circle the last.
    pub fn color_at(&self, p: Point) -> Rgba {
        let span = self.outer_radius - self.inner_radius;
        let d = self.center.distance_to(p);
        let t = if span <= 0.0 {
            if d < self.inner_radius { 0.0 } else { 1.0 }
        } else {
            (d - self.inner_radius) / span
        };
        self.from.lerp(self.to, t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

impl Paint {
    pub fn color_at(&self, p: Point) -> Rgba {
        match self {
            Paint::Solid(color) => *color,
            Paint::Radial(gradient) => gradient.color_at(p),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Rgba,
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub fill: Rgba,
    pub shadow: Option<Shadow>,
}

// 2x3 affine matrix, canvas convention: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.e += self.a * dx + self.c * dy;
        self.f += self.b * dx + self.d * dy;
    }

    pub fn rotate(&mut self, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        let (a, b, c, d) = (self.a, self.b, self.c, self.d);
        self.a = a * cos + c * sin;
        self.b = b * cos + d * sin;
        self.c = c * cos - a * sin;
        self.d = d * cos - b * sin;
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    pub fn scale(&self) -> f32 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }

    pub fn invert(&self) -> Option<Transform> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() <= f32::EPSILON {
            return None;
        }
        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Some(Transform {
            a,
            b,
            c,
            d,
            e: -(a * self.e + c * self.f),
            f: -(b * self.e + d * self.f),
        })
    }
}

pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    // Fills the whole surface, ignoring the current transform.
    fn clear(&mut self, color: Rgba);

    fn translate(&mut self, dx: f32, dy: f32);
    fn rotate(&mut self, angle: f32);

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint);
    fn stroke_line(&mut self, from: Point, to: Point, width: f32, paint: &Paint);
    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle);
}
