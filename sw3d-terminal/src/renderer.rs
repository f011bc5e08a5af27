/// ASCII raster canvas: the pipeline's presentation sink
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use sw3d_core::{RasterSink, Triangle};

/// Character canvas the pipeline draws into. Triangles arrive back to
/// front, so later fills simply overwrite earlier ones; no depth buffer
/// is kept.
pub struct TermCanvas {
    width: usize,
    height: usize,
    glyphs: Vec<char>,
    levels: Vec<u8>,
}

impl TermCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            glyphs: vec![' '; size],
            levels: vec![0; size],
        }
    }

    pub fn clear(&mut self) {
        self.glyphs.fill(' ');
        self.levels.fill(0);
    }

    fn fill_triangle(&mut self, tri: &Triangle) {
        let (v0, v1, v2) = (
            (tri.p[0].x, tri.p[0].y),
            (tri.p[1].x, tri.p[1].y),
            (tri.p[2].x, tri.p[2].y),
        );

        // Bounding box, clamped to the canvas
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, (px, py)) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let idx = y as usize * self.width + x as usize;
                        self.glyphs[idx] = tri.shade.glyph;
                        self.levels[idx] = tri.shade.level;
                    }
                }
            }
        }
    }

    /// Write the canvas to `writer` with crossterm color commands, one
    /// colored cell at a time.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            // Raw mode: position each row explicitly.
            writer.queue(MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(level_color(self.levels[idx])))?;
                writer.queue(Print(self.glyphs[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    #[cfg(test)]
    fn glyph_at(&self, x: usize, y: usize) -> char {
        self.glyphs[y * self.width + x]
    }
}

impl RasterSink for TermCanvas {
    fn draw_triangle(&mut self, tri: &Triangle) {
        self.fill_triangle(tri);
    }
}

/// Map a shade level to a terminal color
fn level_color(level: u8) -> Color {
    match level {
        0 | 1 => Color::DarkGrey,
        2 | 3 => Color::Grey,
        4 | 5 => Color::White,
        _ => Color::Cyan,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        // Zero-area triangle: rasterizes as a no-op.
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use sw3d_core::Shade;

    fn screen_tri(x: f32, y: f32, size: f32, shade: Shade) -> Triangle {
        Triangle::with_shade(
            [
                Point3::new(x, y, 0.5),
                Point3::new(x + size, y, 0.5),
                Point3::new(x, y + size, 0.5),
            ],
            shade,
        )
    }

    #[test]
    fn test_fill_covers_interior_cells() {
        let mut canvas = TermCanvas::new(20, 20);
        let shade = Shade::from_intensity(1.0);
        canvas.draw_triangle(&screen_tri(2.0, 2.0, 10.0, shade));
        // A cell well inside the triangle takes its glyph.
        assert_eq!(canvas.glyph_at(4, 4), shade.glyph);
        // A cell outside stays blank.
        assert_eq!(canvas.glyph_at(18, 18), ' ');
    }

    #[test]
    fn test_later_triangles_overwrite_earlier_ones() {
        let mut canvas = TermCanvas::new(20, 20);
        let far = Shade::from_intensity(0.1);
        let near = Shade::from_intensity(1.0);
        canvas.draw_triangle(&screen_tri(2.0, 2.0, 10.0, far));
        canvas.draw_triangle(&screen_tri(2.0, 2.0, 10.0, near));
        assert_eq!(canvas.glyph_at(4, 4), near.glyph);
    }

    #[test]
    fn test_out_of_bounds_triangle_is_clamped_not_panicking() {
        let mut canvas = TermCanvas::new(10, 10);
        canvas.draw_triangle(&screen_tri(-5.0, -5.0, 30.0, Shade::default()));
        assert_ne!(canvas.glyph_at(0, 0), ' ');
    }

    #[test]
    fn test_degenerate_triangle_is_a_no_op() {
        let mut canvas = TermCanvas::new(10, 10);
        let tri = Triangle::new(
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(5.0, 5.0, 0.0),
            Point3::new(9.0, 9.0, 0.0),
        );
        canvas.draw_triangle(&tri);
        assert!(canvas.glyphs.iter().all(|&c| c == ' '));
    }

    #[test]
    fn test_clear_resets_all_cells() {
        let mut canvas = TermCanvas::new(10, 10);
        canvas.draw_triangle(&screen_tri(1.0, 1.0, 8.0, Shade::default()));
        canvas.clear();
        assert!(canvas.glyphs.iter().all(|&c| c == ' '));
        assert!(canvas.levels.iter().all(|&l| l == 0));
    }
}
