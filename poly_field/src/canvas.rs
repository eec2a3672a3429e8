//! Immediate-mode drawing surface abstraction.
//!
//! The render pass draws through the [`Canvas`] trait, so the same code can
//! target the on-screen software surface ([`BufferCanvas`], presented by
//! the windowed front end) or a command recorder ([`RecordingCanvas`]) that
//! tests inspect for exact primitive streams.
//!
//! A canvas carries a stack of translate-then-rotate frames.  Shape anchors
//! (polygon vertices, circle centres, rect origins, text anchors) are mapped
//! through the current frame; rects and text stay axis-aligned, only their
//! anchor moves.

use std::ops::{Deref, DerefMut};

use crate::color::Hsba;

// ════════════════════════════════════════════════════════════════════════
//                              Canvas trait
// ════════════════════════════════════════════════════════════════════════

/// An immediate-mode drawing surface with alpha blending.
pub trait Canvas {
    /// Surface size in pixels, `(width, height)`.
    fn size(&self) -> (f32, f32);

    /// Wash the whole surface with a translucent color.  At low alpha this
    /// is the classic trail fade: previous frames linger and decay.
    fn fade(&mut self, color: Hsba);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Hsba);

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Hsba);

    /// Stroke a closed polygon outline.  Weights below one pixel render as
    /// single-pixel lines at proportionally reduced opacity.
    fn stroke_polygon(&mut self, points: &[(f32, f32)], weight: f32, color: Hsba);

    /// Draw text centred on `(x, y)` at an integer pixel scale.
    fn text_centered(&mut self, text: &str, x: f32, y: f32, scale: u32, color: Hsba);

    /// Enter a new frame, positioned and rotated relative to the current one.
    fn push_transform(&mut self, dx: f32, dy: f32, rotation: f32);

    fn pop_transform(&mut self);

    /// Enter a frame for the lifetime of the returned guard; the matching
    /// pop happens when the guard drops.
    fn scoped(&mut self, dx: f32, dy: f32, rotation: f32) -> TransformScope<'_, Self>
    where
        Self: Sized,
    {
        TransformScope::new(self, dx, dy, rotation)
    }
}

// ════════════════════════════════════════════════════════════════════════
//                         Coordinate frames
// ════════════════════════════════════════════════════════════════════════

/// A translate-then-rotate coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub dx: f32,
    pub dy: f32,
    pub rotation: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { dx: 0.0, dy: 0.0, rotation: 0.0 };

    /// Map a local point into this frame's parent space.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let (sin, cos) = self.rotation.sin_cos();
        (self.dx + x * cos - y * sin, self.dy + x * sin + y * cos)
    }

    /// Compose a child frame whose offset is expressed in this frame's
    /// local coordinates.
    pub fn then(&self, dx: f32, dy: f32, rotation: f32) -> Transform {
        let (ox, oy) = self.apply(dx, dy);
        Transform { dx: ox, dy: oy, rotation: self.rotation + rotation }
    }
}

/// Guard returned by [`Canvas::scoped`]; pops its frame on drop.
pub struct TransformScope<'c, C: Canvas> {
    canvas: &'c mut C,
}

impl<'c, C: Canvas> TransformScope<'c, C> {
    pub fn new(canvas: &'c mut C, dx: f32, dy: f32, rotation: f32) -> Self {
        canvas.push_transform(dx, dy, rotation);
        TransformScope { canvas }
    }
}

impl<C: Canvas> Deref for TransformScope<'_, C> {
    type Target = C;
    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas> DerefMut for TransformScope<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas> Drop for TransformScope<'_, C> {
    fn drop(&mut self) {
        self.canvas.pop_transform();
    }
}

// ════════════════════════════════════════════════════════════════════════
//                           Recording canvas
// ════════════════════════════════════════════════════════════════════════

/// One recorded drawing operation, verbatim as the caller issued it.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    Fade(Hsba),
    Rect { x: f32, y: f32, w: f32, h: f32, color: Hsba },
    Circle { cx: f32, cy: f32, radius: f32, color: Hsba },
    Polygon { points: Vec<(f32, f32)>, weight: f32, color: Hsba },
    Text { text: String, x: f32, y: f32, scale: u32, color: Hsba },
    Push { dx: f32, dy: f32, rotation: f32 },
    Pop,
}

/// Canvas that records primitives instead of rasterizing them.  Transforms
/// are recorded as commands, not applied, so the stream is exactly what the
/// renderer issued.
#[derive(Debug)]
pub struct RecordingCanvas {
    width: f32,
    height: f32,
    pub commands: Vec<Cmd>,
}

impl RecordingCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        RecordingCanvas { width, height, commands: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn fade(&mut self, color: Hsba) {
        self.commands.push(Cmd::Fade(color));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Hsba) {
        self.commands.push(Cmd::Rect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Hsba) {
        self.commands.push(Cmd::Circle { cx, cy, radius, color });
    }

    fn stroke_polygon(&mut self, points: &[(f32, f32)], weight: f32, color: Hsba) {
        self.commands.push(Cmd::Polygon { points: points.to_vec(), weight, color });
    }

    fn text_centered(&mut self, text: &str, x: f32, y: f32, scale: u32, color: Hsba) {
        self.commands.push(Cmd::Text { text: text.to_string(), x, y, scale, color });
    }

    fn push_transform(&mut self, dx: f32, dy: f32, rotation: f32) {
        self.commands.push(Cmd::Push { dx, dy, rotation });
    }

    fn pop_transform(&mut self) {
        self.commands.push(Cmd::Pop);
    }
}

// ════════════════════════════════════════════════════════════════════════
//                       Software rasterizer canvas
// ════════════════════════════════════════════════════════════════════════

/// Software rasterizer over a packed `0xAARRGGBB` buffer (alpha byte fixed
/// at `0xFF`; blending happens here, the buffer stays opaque).
#[derive(Debug)]
pub struct BufferCanvas {
    width: usize,
    height: usize,
    buf: Vec<u32>,
    stack: Vec<Transform>,
}

/// Blend `src` over `dst` by `a` (0–255), per channel, keeping full opacity.
fn blend(dst: u32, src: (u32, u32, u32), a: u32) -> u32 {
    let mix = |d: u32, s: u32| (d * (255 - a) + s * a) / 255;
    let r = mix((dst >> 16) & 0xFF, src.0);
    let g = mix((dst >> 8) & 0xFF, src.1);
    let b = mix(dst & 0xFF, src.2);
    0xFF000000 | (r << 16) | (g << 8) | b
}

fn alpha8(color: Hsba) -> u32 {
    (color.alpha_unit() * 255.0).round() as u32
}

fn channels(color: Hsba) -> (u32, u32, u32) {
    let (r, g, b) = color.to_rgb();
    (u32::from(r), u32::from(g), u32::from(b))
}

impl BufferCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        BufferCanvas {
            width,
            height,
            buf: vec![0xFF000000; width * height],
            stack: vec![Transform::IDENTITY],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The pixel buffer, row-major, ready for `update_with_buffer`.
    pub fn buffer(&self) -> &[u32] {
        &self.buf
    }

    fn current(&self) -> Transform {
        self.stack.last().copied().unwrap_or(Transform::IDENTITY)
    }

    fn blend_pixel(&mut self, x: i32, y: i32, src: (u32, u32, u32), a: u32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.buf[idx] = blend(self.buf[idx], src, a);
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), src: (u32, u32, u32), a: u32) {
        let (mut x0, mut y0) = (from.0.round() as i32, from.1.round() as i32);
        let (x1, y1) = (to.0.round() as i32, to.1.round() as i32);

        // Reject segments entirely off one edge.
        let (w, h) = (self.width as i32, self.height as i32);
        if (x0 < 0 && x1 < 0) || (y0 < 0 && y1 < 0) || (x0 >= w && x1 >= w) || (y0 >= h && y1 >= h)
        {
            return;
        }

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.blend_pixel(x0, y0, src, a);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

impl Canvas for BufferCanvas {
    fn size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    fn fade(&mut self, color: Hsba) {
        let a = alpha8(color);
        if a == 0 {
            return;
        }
        let src = channels(color);
        for px in self.buf.iter_mut() {
            *px = blend(*px, src, a);
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Hsba) {
        let a = alpha8(color);
        if a == 0 || w <= 0.0 || h <= 0.0 {
            return;
        }
        let src = channels(color);
        let (x, y) = self.current().apply(x, y);

        let x0 = (x.round() as i32).max(0) as usize;
        let y0 = (y.round() as i32).max(0) as usize;
        let x1 = ((x + w).round() as i32).clamp(0, self.width as i32) as usize;
        let y1 = ((y + h).round() as i32).clamp(0, self.height as i32) as usize;
        for row in y0..y1 {
            let base = row * self.width;
            for idx in base + x0..base + x1 {
                self.buf[idx] = blend(self.buf[idx], src, a);
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Hsba) {
        let a = alpha8(color);
        if a == 0 || radius <= 0.0 {
            return;
        }
        let src = channels(color);
        let (cx, cy) = self.current().apply(cx, cy);

        let y0 = ((cy - radius).floor() as i32).max(0);
        let y1 = ((cy + radius).ceil() as i32).min(self.height as i32 - 1);
        for y in y0..=y1 {
            let dy = y as f32 - cy;
            let half = (radius * radius - dy * dy).max(0.0).sqrt();
            let x0 = ((cx - half).round() as i32).max(0);
            let x1 = ((cx + half).round() as i32).min(self.width as i32 - 1);
            let base = y as usize * self.width;
            for x in x0..=x1 {
                let idx = base + x as usize;
                self.buf[idx] = blend(self.buf[idx], src, a);
            }
        }
    }

    fn stroke_polygon(&mut self, points: &[(f32, f32)], weight: f32, color: Hsba) {
        if points.len() < 2 {
            return;
        }
        // Sub-pixel stroke weights thin the line by fading it.
        let a = (color.alpha_unit() * weight.clamp(0.0, 1.0) * 255.0).round() as u32;
        if a == 0 {
            return;
        }
        let src = channels(color);
        let t = self.current();
        // Two points make a single segment; closing it would re-blend it.
        let edges = if points.len() > 2 { points.len() } else { 1 };
        for i in 0..edges {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % points.len()];
            self.line(t.apply(x0, y0), t.apply(x1, y1), src, a);
        }
    }

    fn text_centered(&mut self, text: &str, x: f32, y: f32, scale: u32, color: Hsba) {
        let a = alpha8(color);
        if a == 0 || scale == 0 || text.is_empty() {
            return;
        }
        let src = channels(color);
        let (x, y) = self.current().apply(x, y);
        let scale = scale as i32;

        // Cells are 3 columns wide with a 1-column gap, 5 rows tall.
        let chars: Vec<char> = text.chars().collect();
        let total_w = (chars.len() as i32 * 4 - 1) * scale;
        let mut cx = x.round() as i32 - total_w / 2;
        let top = y.round() as i32 - (5 * scale) / 2;

        for ch in chars {
            let bits = glyph(ch);
            for row in 0..5i32 {
                for col in 0..3i32 {
                    if bits >> ((4 - row) * 3 + (2 - col)) & 1 == 0 {
                        continue;
                    }
                    for py in 0..scale {
                        for px in 0..scale {
                            self.blend_pixel(
                                cx + col * scale + px,
                                top + row * scale + py,
                                src,
                                a,
                            );
                        }
                    }
                }
            }
            cx += 4 * scale;
        }
    }

    fn push_transform(&mut self, dx: f32, dy: f32, rotation: f32) {
        self.stack.push(self.current().then(dx, dy, rotation));
    }

    fn pop_transform(&mut self) {
        // The root frame stays; an unbalanced pop is a no-op.
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }
}

// ════════════════════════════════════════════════════════════════════════
//                         Minimal 3×5 bitmap font
// ════════════════════════════════════════════════════════════════════════

/// Glyphs packed as 15 bits, three per row, top row in the high bits.
/// Lowercase folds to uppercase; unknown characters draw a centre dot.
fn glyph(c: char) -> u16 {
    match c.to_ascii_uppercase() {
        'A' => 0b111_101_111_101_101,
        'B' => 0b110_101_110_101_110,
        'C' => 0b111_100_100_100_111,
        'D' => 0b110_101_101_101_110,
        'E' => 0b111_100_111_100_111,
        'F' => 0b111_100_111_100_100,
        'G' => 0b111_100_101_101_111,
        'H' => 0b101_101_111_101_101,
        'I' => 0b111_010_010_010_111,
        'J' => 0b001_001_001_101_111,
        'K' => 0b101_101_110_101_101,
        'L' => 0b100_100_100_100_111,
        'M' => 0b101_111_101_101_101,
        'N' => 0b111_101_101_101_101,
        'O' => 0b111_101_101_101_111,
        'P' => 0b111_101_111_100_100,
        'Q' => 0b111_101_101_111_001,
        'R' => 0b110_101_110_101_101,
        'S' => 0b111_100_111_001_111,
        'T' => 0b111_010_010_010_010,
        'U' => 0b101_101_101_101_111,
        'V' => 0b101_101_101_010_010,
        'W' => 0b101_101_101_111_101,
        'X' => 0b101_101_010_101_101,
        'Y' => 0b101_101_010_010_010,
        'Z' => 0b111_001_010_100_111,
        '0' => 0b111_101_101_101_111,
        '1' => 0b010_110_010_010_111,
        '2' => 0b111_001_111_100_111,
        '3' => 0b111_001_111_001_111,
        '4' => 0b101_101_111_001_001,
        '5' => 0b111_100_111_001_111,
        '6' => 0b111_100_111_101_111,
        '7' => 0b111_001_001_001_001,
        '8' => 0b111_101_111_101_111,
        '9' => 0b111_101_111_001_111,
        '/' => 0b001_001_010_100_100,
        '-' => 0b000_000_111_000_000,
        '.' => 0b000_000_000_000_010,
        ':' => 0b000_010_000_010_000,
        ' ' => 0,
        _ => 0b000_000_010_000_000,
    }
}

// ════════════════════════════════════════════════════════════════════════
//                                  Tests
// ════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Hsba = Hsba::new(0.0, 0.0, 100.0, 100.0);

    fn px(canvas: &BufferCanvas, x: usize, y: usize) -> u32 {
        canvas.buffer()[y * canvas.width() + x]
    }

    #[test]
    fn transform_rotates_and_translates() {
        let t = Transform { dx: 10.0, dy: 20.0, rotation: std::f32::consts::FRAC_PI_2 };
        let (x, y) = t.apply(1.0, 0.0);
        assert!((x - 10.0).abs() < 1e-5);
        assert!((y - 21.0).abs() < 1e-5);
    }

    #[test]
    fn transform_composition_nests() {
        let outer = Transform::IDENTITY.then(100.0, 0.0, std::f32::consts::FRAC_PI_2);
        let inner = outer.then(10.0, 0.0, 0.0);
        // The child offset is rotated by the parent before translating.
        let (x, y) = (inner.dx, inner.dy);
        assert!((x - 100.0).abs() < 1e-4);
        assert!((y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn scoped_guard_pops_on_drop() {
        let mut rec = RecordingCanvas::new(10.0, 10.0);
        {
            let mut frame = rec.scoped(1.0, 2.0, 3.0);
            frame.fill_rect(0.0, 0.0, 1.0, 1.0, WHITE);
        }
        assert!(matches!(rec.commands[0], Cmd::Push { dx, dy, rotation } if dx == 1.0 && dy == 2.0 && rotation == 3.0));
        assert!(matches!(rec.commands[1], Cmd::Rect { .. }));
        assert_eq!(rec.commands[2], Cmd::Pop);
    }

    #[test]
    fn recording_preserves_issue_order() {
        let mut rec = RecordingCanvas::new(10.0, 10.0);
        rec.fade(WHITE.with_alpha(3.0));
        rec.fill_circle(5.0, 5.0, 2.0, WHITE);
        rec.text_centered("hi", 5.0, 5.0, 1, WHITE);
        assert_eq!(rec.commands.len(), 3);
        assert!(matches!(rec.commands[0], Cmd::Fade(_)));
        assert!(matches!(rec.commands[2], Cmd::Text { ref text, .. } if text == "hi"));
    }

    #[test]
    fn new_buffer_is_opaque_black() {
        let canvas = BufferCanvas::new(4, 3);
        assert_eq!(canvas.buffer().len(), 12);
        assert!(canvas.buffer().iter().all(|&p| p == 0xFF000000));
    }

    #[test]
    fn opaque_rect_overwrites_and_clips() {
        let mut canvas = BufferCanvas::new(8, 8);
        canvas.fill_rect(-2.0, -2.0, 5.0, 5.0, WHITE);
        assert_eq!(px(&canvas, 0, 0), 0xFFFFFFFF);
        assert_eq!(px(&canvas, 2, 2), 0xFFFFFFFF);
        assert_eq!(px(&canvas, 3, 3), 0xFF000000);
    }

    #[test]
    fn half_alpha_blends_half_way() {
        let mut canvas = BufferCanvas::new(2, 1);
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0, WHITE.with_alpha(50.0));
        assert_eq!(px(&canvas, 0, 0), 0xFF808080);
        assert_eq!(px(&canvas, 1, 0), 0xFF000000);
    }

    #[test]
    fn fade_darkens_everything_a_little() {
        let mut canvas = BufferCanvas::new(2, 2);
        canvas.fill_rect(0.0, 0.0, 2.0, 2.0, WHITE);
        canvas.fade(Hsba::new(0.0, 0.0, 0.0, 3.0));
        // alpha 3% rounds to 8/255; 255 * 247 / 255 = 247.
        assert!(canvas.buffer().iter().all(|&p| p == 0xFFF7F7F7));
    }

    #[test]
    fn repeated_fade_reaches_black() {
        let mut canvas = BufferCanvas::new(1, 1);
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0, WHITE);
        for _ in 0..500 {
            canvas.fade(Hsba::new(0.0, 0.0, 0.0, 3.0));
        }
        assert_eq!(px(&canvas, 0, 0), 0xFF000000);
    }

    #[test]
    fn circle_covers_centre_not_corners() {
        let mut canvas = BufferCanvas::new(40, 40);
        canvas.fill_circle(20.0, 20.0, 10.0, WHITE);
        assert_eq!(px(&canvas, 20, 20), 0xFFFFFFFF);
        assert_eq!(px(&canvas, 30, 20), 0xFFFFFFFF);
        assert_eq!(px(&canvas, 0, 0), 0xFF000000);
        assert_eq!(px(&canvas, 32, 20), 0xFF000000);
    }

    #[test]
    fn polygon_draws_under_its_transform() {
        let mut canvas = BufferCanvas::new(20, 20);
        // A diamond around the scoped origin at (10, 10).
        let points = [(5.0, 0.0), (0.0, 5.0), (-5.0, 0.0), (0.0, -5.0)];
        {
            let mut frame = canvas.scoped(10.0, 10.0, 0.0);
            frame.stroke_polygon(&points, 1.0, WHITE);
        }
        assert_eq!(px(&canvas, 15, 10), 0xFFFFFFFF);
        assert_eq!(px(&canvas, 10, 5), 0xFFFFFFFF);
        assert_eq!(px(&canvas, 10, 10), 0xFF000000);
    }

    #[test]
    fn sub_pixel_weight_thins_by_alpha() {
        let mut canvas = BufferCanvas::new(10, 3);
        canvas.stroke_polygon(&[(0.0, 1.0), (9.0, 1.0)], 0.5, WHITE);
        // Full white at half weight lands at 128 per channel.
        assert_eq!(px(&canvas, 4, 1), 0xFF808080);
    }

    #[test]
    fn degenerate_polygons_are_ignored() {
        let mut canvas = BufferCanvas::new(10, 10);
        canvas.stroke_polygon(&[], 1.0, WHITE);
        canvas.stroke_polygon(&[(5.0, 5.0)], 1.0, WHITE);
        assert!(canvas.buffer().iter().all(|&p| p == 0xFF000000));
    }

    #[test]
    fn offscreen_geometry_is_clipped_not_fatal() {
        let mut canvas = BufferCanvas::new(10, 10);
        canvas.fill_circle(-50.0, -50.0, 10.0, WHITE);
        canvas.stroke_polygon(&[(-100.0, -100.0), (-90.0, -90.0)], 1.0, WHITE);
        canvas.fill_rect(50.0, 50.0, 10.0, 10.0, WHITE);
        assert!(canvas.buffer().iter().all(|&p| p == 0xFF000000));
    }

    #[test]
    fn text_lands_centred_and_in_bounds() {
        let mut canvas = BufferCanvas::new(40, 20);
        canvas.text_centered("HI", 20.0, 10.0, 2, WHITE);
        let lit: Vec<(usize, usize)> = (0..20)
            .flat_map(|y| (0..40).map(move |x| (x, y)))
            .filter(|&(x, y)| px(&canvas, x, y) != 0xFF000000)
            .collect();
        assert!(!lit.is_empty());
        // Both glyphs are symmetric, so lit pixels centre on the anchor.
        let min_x = lit.iter().map(|&(x, _)| x).min().unwrap() as f32;
        let max_x = lit.iter().map(|&(x, _)| x).max().unwrap() as f32;
        assert!(((min_x + max_x) / 2.0 - 20.0).abs() <= 1.0);
    }

    #[test]
    fn unbalanced_pop_keeps_the_root_frame() {
        let mut canvas = BufferCanvas::new(10, 10);
        canvas.pop_transform();
        canvas.pop_transform();
        canvas.fill_rect(2.0, 2.0, 1.0, 1.0, WHITE);
        assert_eq!(px(&canvas, 2, 2), 0xFFFFFFFF);
    }
}
