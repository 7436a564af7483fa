use crate::firework::Firework;
use crate::geometry::Point;
use crate::state::AnimationState;
use crate::surface::{Paint, RadialGradient, Rgba, Shadow, Surface, TextStyle};
use std::f32::consts::TAU;

pub const BACKGROUND: (u8, u8, u8) = (0x20, 0x21, 0x24);
pub const CAPTION: &str = "新年快乐";
pub const CAPTION_ANCHOR: Point = Point { x: 300.0, y: 300.0 };

const HEAD_RADIUS: f32 = 5.0;
const TAIL_LENGTH: f32 = 80.0;
const TAIL_WIDTH: f32 = 2.0;
const RING_SPACING: f32 = 50.0;

// What stays fixed between frames: the clear color and the closing caption.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenery {
    pub background: Rgba,
    pub caption: String,
}

impl Default for Scenery {
    fn default() -> Self {
        Self {
            background: Rgba::opaque(BACKGROUND),
            caption: CAPTION.to_string(),
        }
    }
}

pub fn draw<S: Surface>(surface: &mut S, state: &AnimationState, scenery: &Scenery) {
    surface.clear(scenery.background);

    if state.shows_fireworks() {
        for firework in &state.fireworks {
            if firework.exploded() {
                draw_burst(surface, firework);
            } else {
                draw_rocket(surface, firework);
            }
        }
    } else {
        draw_caption(surface, state.font_size, &scenery.caption);
    }
}

fn draw_caption<S: Surface>(surface: &mut S, font_size: f32, caption: &str) {
    let style = TextStyle {
        size: font_size,
        bold: true,
        italic: true,
        fill: Rgba::RED,
        shadow: Some(Shadow {
            color: Rgba::new(255, 100, 100, 0.3),
            offset_x: 5.0,
            offset_y: 5.0,
            blur: 10.0,
        }),
    };
    surface.fill_text(caption, CAPTION_ANCHOR, &style);
}

fn draw_rocket<S: Surface>(surface: &mut S, firework: &Firework) {
    let at = firework.now_point;
    let angle = firework.direction().trailing_angle();
    surface.translate(at.x, at.y);
    surface.rotate(angle);

    let head = Paint::Radial(RadialGradient::new(
        Point::ORIGIN,
        1.0,
        3.0,
        Rgba::WHITE,
        Rgba::new(255, 255, 255, 0.1),
    ));
    surface.fill_circle(Point::ORIGIN, HEAD_RADIUS, &head);

    let flame = Paint::Radial(RadialGradient::new(
        Point::new(0.0, 100.0),
        20.0,
        60.0,
        Rgba::new(255, 255, 255, 0.0),
        Rgba::new(255, 255, 255, 0.5),
    ));
    surface.stroke_line(Point::ORIGIN, Point::new(0.0, TAIL_LENGTH), TAIL_WIDTH, &flame);

    surface.rotate(-angle);
    surface.translate(-at.x, -at.y);
}

pub fn ring_count(expansion: f32) -> usize {
    (expansion / RING_SPACING).floor().max(0.0) as usize
}

fn draw_burst<S: Surface>(surface: &mut S, firework: &Firework) {
    let (from, end) = firework.colors();
    let center = firework.to_point();
    for i in 0..ring_count(firework.expansion()) {
        draw_ring(surface, from, end, center, firework.expansion() - 5.0 * i as f32);
    }
}

pub fn ring_layout(radius: f32) -> (f32, usize) {
    let size = (radius / 200.0).max(4.0);
    let count = (radius * TAU / size / 5.0).ceil().max(0.0) as usize;
    (size, count)
}

fn draw_ring<S: Surface>(surface: &mut S, from: Rgba, end: Rgba, center: Point, radius: f32) {
    let (size, count) = ring_layout(radius);
    if count == 0 {
        return;
    }
    let paint = Paint::Radial(RadialGradient::new(Point::ORIGIN, 0.5, size - 0.5, from, end));

    surface.translate(center.x, center.y);
    for i in 0..count {
        let angle = TAU / count as f32 * i as f32;
        let (sin, cos) = angle.sin_cos();
        let (x, y) = (cos * radius, sin * radius);

        surface.translate(x, y);
        surface.rotate(angle);
        surface.fill_circle(Point::ORIGIN, size, &paint);
        surface.rotate(-angle);
        surface.translate(-x, -y);
    }
    surface.translate(-center.x, -center.y);
}
