use tiny_skia::{
    FillRule, FilterQuality, GradientStop, LinearGradient, Mask, Paint, Path, PathBuilder,
    Pattern, Pixmap, PixmapPaint, Point, PremultipliedColorU8, Rect, SpreadMode, Stroke,
    Transform,
};

use super::text::{Typography, Weight};
use super::theme::Rgba;
use crate::error::{Result, SnapRepoError};

/// Bezier handle length for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

/// Immediate-mode drawing surface backed by a `tiny_skia::Pixmap`.
pub struct Surface {
    pixmap: Pixmap,
    typography: Typography,
}

impl Surface {
    pub fn new(width: u32, height: u32, typography: Typography) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| SnapRepoError::Render(format!("invalid canvas size {}x{}", width, height)))?;
        Ok(Surface { pixmap, typography })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixmap.fill(color.to_skia());
    }

    /// Diagonal gradient from the top-left corner to the bottom-right corner.
    pub fn fill_gradient(&mut self, stops: &[(f32, Rgba)]) -> Result<()> {
        let (w, h) = (self.width() as f32, self.height() as f32);
        let shader = LinearGradient::new(
            Point::from_xy(0.0, 0.0),
            Point::from_xy(w, h),
            stops
                .iter()
                .map(|(pos, color)| GradientStop::new(*pos, color.to_skia()))
                .collect(),
            SpreadMode::Pad,
            Transform::identity(),
        )
        .ok_or_else(|| SnapRepoError::Render("invalid gradient".to_string()))?;

        let paint = Paint {
            shader,
            ..Paint::default()
        };
        if let Some(rect) = Rect::from_xywh(0.0, 0.0, w, h) {
            self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
        Ok(())
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.fill_path(&path, color);
        }
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, width: f32, color: Rgba) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.stroke_path(&path, width, color);
        }
    }

    /// Rounded rectangle whose corner radius is half its height.
    pub fn fill_pill(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        if let Some(path) = pill_path(x, y, w, h) {
            self.fill_path(&path, color);
        }
    }

    pub fn stroke_pill(&mut self, x: f32, y: f32, w: f32, h: f32, width: f32, color: Rgba) {
        if let Some(path) = pill_path(x, y, w, h) {
            self.stroke_path(&path, width, color);
        }
    }

    /// Draw `image` scaled into the given box.
    pub fn draw_image(&mut self, image: &Pixmap, x: f32, y: f32, w: f32, h: f32, opacity: f32) {
        self.draw_image_masked(image, x, y, w, h, opacity, None);
    }

    /// Draw `image` into the square around a circle, clipped to that circle.
    pub fn draw_image_in_circle(&mut self, image: &Pixmap, cx: f32, cy: f32, radius: f32) {
        let clip = PathBuilder::from_circle(cx, cy, radius).and_then(|path| {
            let mut mask = Mask::new(self.width(), self.height())?;
            mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
            Some(mask)
        });

        if let Some(mask) = clip {
            let size = radius * 2.0;
            self.draw_image_masked(image, cx - radius, cy - radius, size, size, 1.0, Some(&mask));
        }
    }

    fn draw_image_masked(
        &mut self,
        image: &Pixmap,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        opacity: f32,
        mask: Option<&Mask>,
    ) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }

        let sx = w / image.width() as f32;
        let sy = h / image.height() as f32;
        let shader = Pattern::new(
            image.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Bicubic,
            opacity,
            Transform::from_row(sx, 0.0, 0.0, sy, x, y),
        );

        let paint = Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        };
        if let Some(rect) = Rect::from_xywh(x, y, w, h) {
            self.pixmap.fill_rect(rect, &paint, Transform::identity(), mask);
        }
    }

    pub fn measure_text(&self, text: &str, size: f32, weight: Weight) -> f32 {
        self.typography.measure(text, size, weight)
    }

    pub fn typography(&self) -> &Typography {
        &self.typography
    }

    /// Paint `text` with its top edge at `y`. Returns the advance width.
    pub fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, weight: Weight, color: Rgba) -> f32 {
        let Some(font) = self.typography.face(weight).cloned() else {
            return self.typography.measure(text, size, weight);
        };

        let baseline = y + self.typography.ascent(size, weight);
        let mut pen = x;

        for c in text.chars() {
            let (metrics, coverage) = font.rasterize(c, size);
            if metrics.width > 0 && metrics.height > 0 {
                if let Some(glyph) = glyph_pixmap(metrics.width, metrics.height, &coverage, color) {
                    let gx = (pen + metrics.xmin as f32).round() as i32;
                    let gy = (baseline - metrics.ymin as f32 - metrics.height as f32).round() as i32;
                    self.pixmap.draw_pixmap(
                        gx,
                        gy,
                        glyph.as_ref(),
                        &PixmapPaint::default(),
                        Transform::identity(),
                        None,
                    );
                }
            }
            pen += metrics.advance_width;
        }

        pen - x
    }

    fn fill_path(&mut self, path: &Path, color: Rgba) {
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn stroke_path(&mut self, path: &Path, width: f32, color: Rgba) {
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint, &stroke, Transform::identity(), None);
    }
}

fn glyph_pixmap(width: usize, height: usize, coverage: &[u8], color: Rgba) -> Option<Pixmap> {
    let mut glyph = Pixmap::new(width as u32, height as u32)?;

    for (pixel, &cov) in glyph.pixels_mut().iter_mut().zip(coverage) {
        let a = (cov as u32 * color.a as u32 / 255) as u8;
        let premul = |channel: u8| (channel as u32 * a as u32 / 255) as u8;
        if let Some(c) = PremultipliedColorU8::from_rgba(premul(color.r), premul(color.g), premul(color.b), a) {
            *pixel = c;
        }
    }

    Some(glyph)
}

fn pill_path(x: f32, y: f32, w: f32, h: f32) -> Option<Path> {
    let r = (h / 2.0).min(w / 2.0);
    let k = r * KAPPA;

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.cubic_to(x + w - r + k, y, x + w, y + r - k, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.cubic_to(x + w, y + h - r + k, x + w - r + k, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.cubic_to(x + r - k, y + h, x, y + h - r + k, x, y + h - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    pb.close();
    pb.finish()
}
