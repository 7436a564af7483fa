use super::{Paint, Rgba, Surface, TextStyle, Transform};
use crate::geometry::Point;
use std::io::Write;
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Glyph {
    ch: char,
    fg: (u8, u8, u8),
    bold: bool,
    italic: bool,
    width: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TextCell {
    Empty,
    Glyph(Glyph),
    // right half of a double-width glyph
    Continuation,
}

// Half-block terminal canvas: each cell holds two vertically stacked pixels,
// and one pixel spans `scale` logical units in both directions.
pub struct TerminalSurface {
    cols: usize,
    rows: usize,
    scale: f32,
    pixels: Vec<[f32; 3]>,
    text: Vec<TextCell>,
    transform: Transform,
    output_buf: Vec<u8>,
}

impl TerminalSurface {
    pub fn new(cols: usize, rows: usize, scale: f32) -> Self {
        let scale = scale.max(1.0);
        Self {
            cols,
            rows,
            scale,
            pixels: vec![[0.0; 3]; cols * rows * 2],
            text: vec![TextCell::Empty; cols * rows],
            transform: Transform::IDENTITY,
            output_buf: Vec::with_capacity(cols * rows * 25),
        }
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.pixels = vec![[0.0; 3]; cols * rows * 2];
        self.text = vec![TextCell::Empty; cols * rows];
        self.output_buf = Vec::with_capacity(cols * rows * 25);
    }

    fn pixel_height(&self) -> usize {
        self.rows * 2
    }

    pub fn pixel(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let [r, g, b] = self.pixels[y * self.cols + x];
        Rgba { r, g, b, a: 1.0 }.to_rgb()
    }

    #[cfg(test)]
    pub fn glyph_at(&self, col: usize, row: usize) -> Option<char> {
        match self.text.get(row * self.cols + col) {
            Some(TextCell::Glyph(glyph)) => Some(glyph.ch),
            _ => None,
        }
    }

    fn blend(&mut self, x: isize, y: isize, color: Rgba) {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.pixel_height() {
            return;
        }
        let a = color.a.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let px = &mut self.pixels[y as usize * self.cols + x as usize];
        px[0] = px[0] * (1.0 - a) + color.r * a;
        px[1] = px[1] * (1.0 - a) + color.g * a;
        px[2] = px[2] * (1.0 - a) + color.b * a;
    }

    fn to_device(&self, world: Point) -> Point {
        Point::new(world.x / self.scale, world.y / self.scale)
    }

    // Removes whatever glyph covers `idx`, including the other half of a wide glyph.
    fn evict(&mut self, idx: usize) {
        match self.text[idx] {
            TextCell::Empty => {}
            TextCell::Glyph(glyph) => {
                self.text[idx] = TextCell::Empty;
                if glyph.width == 2 && idx + 1 < self.text.len() {
                    self.text[idx + 1] = TextCell::Empty;
                }
            }
            TextCell::Continuation => {
                self.text[idx] = TextCell::Empty;
                if idx > 0 {
                    self.text[idx - 1] = TextCell::Empty;
                }
            }
        }
    }

    fn put_glyph(&mut self, col: usize, row: usize, glyph: Glyph) {
        if row >= self.rows || col + glyph.width > self.cols {
            return;
        }
        let idx = row * self.cols + col;
        for i in 0..glyph.width {
            self.evict(idx + i);
        }
        self.text[idx] = TextCell::Glyph(glyph);
        if glyph.width == 2 {
            self.text[idx + 1] = TextCell::Continuation;
        }
    }

    fn cell_background(&self, col: usize, row: usize) -> Rgba {
        let top = self.pixels[row * 2 * self.cols + col];
        let bot = self.pixels[(row * 2 + 1) * self.cols + col];
        Rgba {
            r: (top[0] + bot[0]) / 2.0,
            g: (top[1] + bot[1]) / 2.0,
            b: (top[2] + bot[2]) / 2.0,
            a: 1.0,
        }
    }

    fn write_run(
        &mut self,
        text: &str,
        col: isize,
        row: isize,
        gap: usize,
        color: Rgba,
        style: &TextStyle,
    ) {
        if row < 0 || self.cols == 0 || self.rows == 0 {
            return;
        }
        let mut col = col;
        for ch in text.chars() {
            let Some(width) = ch.width().filter(|w| *w > 0) else {
                continue;
            };
            if col >= 0 {
                let fg = self
                    .cell_background(
                        (col as usize).min(self.cols.saturating_sub(1)),
                        (row as usize).min(self.rows.saturating_sub(1)),
                    )
                    .lerp(Rgba { a: 1.0, ..color }, color.a)
                    .to_rgb();
                self.put_glyph(
                    col as usize,
                    row as usize,
                    Glyph {
                        ch,
                        fg,
                        bold: style.bold,
                        italic: style.italic,
                        width,
                    },
                );
            }
            col += (width + gap) as isize;
        }
    }

    // Tints the pixels under each glyph cell; glyphs drawn later sit on top.
    fn shade_run(&mut self, text: &str, col: isize, row: isize, gap: usize, color: Rgba) {
        let mut col = col;
        for ch in text.chars() {
            let Some(width) = ch.width().filter(|w| *w > 0) else {
                continue;
            };
            for x in col..col + width as isize {
                self.blend(x, row * 2, color);
                self.blend(x, row * 2 + 1, color);
            }
            col += (width + gap) as isize;
        }
    }

    pub fn present<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_top: Option<(u8, u8, u8)> = None;
        let mut prev_bot: Option<(u8, u8, u8)> = None;

        for row in 0..self.rows {
            let mut col = 0;
            while col < self.cols {
                if let TextCell::Glyph(glyph) = self.text[row * self.cols + col] {
                    let bg = self.cell_background(col, row).to_rgb();
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", bg.0, bg.1, bg.2)?;
                    write!(
                        self.output_buf,
                        "\x1b[38;2;{};{};{}m",
                        glyph.fg.0, glyph.fg.1, glyph.fg.2
                    )?;
                    if glyph.bold {
                        self.output_buf.extend_from_slice(b"\x1b[1m");
                    }
                    if glyph.italic {
                        self.output_buf.extend_from_slice(b"\x1b[3m");
                    }
                    let mut utf8 = [0u8; 4];
                    self.output_buf
                        .extend_from_slice(glyph.ch.encode_utf8(&mut utf8).as_bytes());
                    self.output_buf.extend_from_slice(b"\x1b[22;23m");
                    prev_top = Some(bg);
                    prev_bot = Some(glyph.fg);
                    col += glyph.width;
                    continue;
                }

                let top = self.pixel(col, row * 2);
                let bot = self.pixel(col, row * 2 + 1);
                if prev_top != Some(top) {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = Some(bot);
                }
                self.output_buf.extend_from_slice("▄".as_bytes());
                col += 1;
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            // colors are reset at the end of every row
            prev_top = None;
            prev_bot = None;
            if row + 1 < self.rows {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()
    }
}

impl Surface for TerminalSurface {
    fn width(&self) -> f32 {
        self.cols as f32 * self.scale
    }

    fn height(&self) -> f32 {
        self.pixel_height() as f32 * self.scale
    }

    fn clear(&mut self, color: Rgba) {
        let rgb = [color.r, color.g, color.b];
        self.pixels.fill(rgb);
        self.text.fill(TextCell::Empty);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.transform.translate(dx, dy);
    }

    fn rotate(&mut self, angle: f32) {
        self.transform.rotate(angle);
    }

    fn fill_circle(&mut self, center: Point, radius: f32, paint: &Paint) {
        let Some(inverse) = self.transform.invert() else {
            return;
        };
        let units_per_pixel = self.scale / self.transform.scale();
        let c = self.to_device(self.transform.apply(center));
        // Shapes smaller than a pixel still cover the pixel they sit in.
        let reach = radius / units_per_pixel + 0.5;
        // The gradient is squeezed onto the rasterized footprint so that
        // sub-pixel particles still show their inner colors.
        let squeeze = radius / (reach * units_per_pixel);

        let x0 = (c.x - reach).floor() as isize;
        let x1 = (c.x + reach).ceil() as isize;
        let y0 = (c.y - reach).floor() as isize;
        let y1 = (c.y + reach).ceil() as isize;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let sample = Point::new(px as f32 + 0.5, py as f32 + 0.5);
                if sample.distance_to(c) > reach {
                    continue;
                }
                let local = inverse.apply(Point::new(sample.x * self.scale, sample.y * self.scale));
                let squeezed = Point::new(
                    center.x + (local.x - center.x) * squeeze,
                    center.y + (local.y - center.y) * squeeze,
                );
                let color = paint.color_at(squeezed);
                self.blend(px, py, color);
            }
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f32, paint: &Paint) {
        let a = self.to_device(self.transform.apply(from));
        let b = self.to_device(self.transform.apply(to));
        let steps = (a.distance_to(b) * 2.0).ceil().max(1.0) as usize;
        let half = (width * self.transform.scale() / self.scale / 2.0).floor() as isize;

        let mut last = None;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (a.x + (b.x - a.x) * t).floor() as isize;
            let y = (a.y + (b.y - a.y) * t).floor() as isize;
            if last == Some((x, y)) {
                continue;
            }
            last = Some((x, y));

            let local = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
            let color = paint.color_at(local);
            for dy in -half..=half {
                for dx in -half..=half {
                    self.blend(x + dx, y + dy, color);
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        let world = self.transform.apply(at);
        let cell_w = self.scale;
        let cell_h = self.scale * 2.0;
        let col = (world.x / cell_w).floor() as isize;
        // anchor is the baseline; glyphs sit half a font size above it
        let row = ((world.y - style.size / 2.0) / cell_h).floor() as isize;

        let gap = (style.size / self.scale / 4.0).round().max(0.0) as usize;
        let brightness = 0.55 + 0.45 * ((style.size - 40.0) / 60.0).clamp(0.0, 1.0);

        if let Some(shadow) = style.shadow {
            let dx = (shadow.offset_x / cell_w).round() as isize;
            let dy = (shadow.offset_y / cell_h).round() as isize;
            // a cell cannot blur, so a wider blur just spreads the shadow thinner
            let color = Rgba {
                a: shadow.color.a / (1.0 + shadow.blur.max(0.0) / cell_w),
                ..shadow.color
            };
            self.shade_run(text, col + dx, row + dy, gap, color);
        }

        let fill = Rgba {
            a: style.fill.a * brightness,
            ..style.fill
        };
        self.write_run(text, col, row, gap, fill, style);
    }
}
