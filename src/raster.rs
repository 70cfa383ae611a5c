//! Software rasterizer.
//!
//! [`RasterSurface`] implements [`DrawSurface`] on an RGBA image, blending
//! every primitive source-over with one pixel of anti-aliased edge. It backs
//! the viewer window and can write any frame to a PNG.

use std::path::Path;

use glam::Vec2;
use image::RgbaImage;

use crate::error::RenderError;
use crate::surface::{DrawSurface, RadialGradient};
use crate::theme::Rgba;

/// Default backdrop, a near-black navy.
pub const BACKGROUND: Rgba = Rgba::hex(0x0a0a1a);

/// CPU drawing surface backed by an RGBA image.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbaImage,
    background: Rgba,
}

impl RasterSurface {
    /// Create a surface cleared to [`BACKGROUND`]. Zero dimensions become 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, BACKGROUND)
    }

    pub fn with_background(width: u32, height: u32, background: Rgba) -> Self {
        let mut surface = Self {
            image: RgbaImage::new(width.max(1), height.max(1)),
            background,
        };
        surface.clear();
        surface
    }

    /// Reallocate for new dimensions, clearing the contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width.max(1), height.max(1)) != self.image.dimensions() {
            self.image = RgbaImage::new(width.max(1), height.max(1));
        }
        self.clear();
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Color of one pixel, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.image.get_pixel_checked(x, y).map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Rgba] {
        bytemuck::cast_slice(self.image.as_raw().as_slice())
    }

    fn pixels_mut(&mut self) -> &mut [Rgba] {
        bytemuck::cast_slice_mut(&mut *self.image)
    }

    /// Write the pixels as `0x00RRGGBB` words into `out`, e.g. a softbuffer
    /// buffer of the same dimensions.
    pub fn copy_to_xrgb(&self, out: &mut [u32]) {
        for (dst, src) in out.iter_mut().zip(self.pixels()) {
            *dst = src.to_xrgb();
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Encode the current frame as PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Visit every pixel whose center may be covered by the box around
    /// `center` with half-extent `reach`, passing the pixel center.
    fn for_each_in_box(&mut self, center: Vec2, reach: Vec2, mut shade: impl FnMut(Vec2) -> Option<Rgba>) {
        let (w, h) = (self.width() as i64, self.height() as i64);
        let min_x = ((center.x - reach.x).floor() as i64).max(0);
        let max_x = ((center.x + reach.x).ceil() as i64).min(w - 1);
        let min_y = ((center.y - reach.y).floor() as i64).max(0);
        let max_y = ((center.y + reach.y).ceil() as i64).min(h - 1);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let width = w as usize;
        let pixels = self.pixels_mut();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some(color) = shade(sample) {
                    let idx = y as usize * width + x as usize;
                    pixels[idx] = blend(pixels[idx], color);
                }
            }
        }
    }
}

impl DrawSurface for RasterSurface {
    fn clear(&mut self) {
        let background = self.background;
        self.pixels_mut().fill(background);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius.is_nan() || radius <= 0.0 {
            return;
        }
        self.for_each_in_box(center, Vec2::splat(radius + 1.0), |sample| {
            let coverage = edge_coverage(radius - sample.distance(center));
            (coverage > 0.0).then(|| color.with_alpha(coverage))
        });
    }

    fn fill_radial_gradient(&mut self, gradient: &RadialGradient) {
        if gradient.outer_radius.is_nan() || gradient.outer_radius <= 0.0 {
            return;
        }
        let center = gradient.center;
        self.for_each_in_box(center, Vec2::splat(gradient.outer_radius + 1.0), |sample| {
            let distance = sample.distance(center);
            let coverage = edge_coverage(gradient.outer_radius - distance);
            if coverage <= 0.0 {
                return None;
            }
            let color = gradient.color_at(distance.min(gradient.outer_radius))?;
            Some(color.with_alpha(coverage))
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        if width.is_nan() || width <= 0.0 {
            return;
        }
        let half = width * 0.5;
        let center = (from + to) * 0.5;
        let reach = (to - from).abs() * 0.5 + Vec2::splat(half + 1.0);
        self.for_each_in_box(center, reach, |sample| {
            let coverage = edge_coverage(half + 0.5 - distance_to_segment(sample, from, to));
            // Hairlines thinner than a pixel fade instead of vanishing.
            let coverage = coverage * width.min(1.0);
            (coverage > 0.0).then(|| color.with_alpha(coverage))
        });
    }
}

/// Fraction of a pixel covered given its signed distance inside an edge.
#[inline]
fn edge_coverage(inside: f32) -> f32 {
    (inside + 0.5).clamp(0.0, 1.0)
}

fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Source-over compositing of straight-alpha colors.
fn blend(dst: Rgba, src: Rgba) -> Rgba {
    match src.a {
        0 => dst,
        255 => src,
        _ => {
            let sa = src.a as f32 / 255.0;
            let da = dst.a as f32 / 255.0;
            let out_a = sa + da * (1.0 - sa);
            if out_a <= 0.0 {
                return Rgba::new(0, 0, 0, 0);
            }
            let mix = |s: u8, d: u8| {
                ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8
            };
            Rgba::new(
                mix(src.r, dst.r),
                mix(src.g, dst.g),
                mix(src.b, dst.b),
                (out_a * 255.0).round() as u8,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_cleared() {
        let surface = RasterSurface::new(4, 3);
        assert_eq!(surface.pixels().len(), 12);
        assert!(surface.pixels().iter().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn test_zero_size_clamped() {
        let surface = RasterSurface::new(0, 0);
        assert_eq!((surface.width(), surface.height()), (1, 1));
    }

    #[test]
    fn test_fill_circle_center_and_outside() {
        let mut surface = RasterSurface::new(40, 40);
        surface.fill_circle(Vec2::new(20.0, 20.0), 5.0, Rgba::hex(0xff0000));

        assert_eq!(surface.pixel(20, 20), Some(Rgba::hex(0xff0000)));
        assert_eq!(surface.pixel(30, 20), Some(BACKGROUND));
        assert_eq!(surface.pixel(0, 0), Some(BACKGROUND));
    }

    #[test]
    fn test_circle_off_surface_is_clipped() {
        let mut surface = RasterSurface::new(10, 10);
        surface.fill_circle(Vec2::new(-50.0, -50.0), 5.0, Rgba::WHITE);
        surface.fill_circle(Vec2::new(0.0, 0.0), 3.0, Rgba::WHITE);
        assert_eq!(surface.pixel(0, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn test_line_blends_over_background() {
        let mut surface = RasterSurface::with_background(20, 20, Rgba::BLACK);
        surface.stroke_line(Vec2::new(0.0, 10.5), Vec2::new(20.0, 10.5), 2.0, Rgba::WHITE.with_alpha(0.5));

        let on = surface.pixel(10, 10).unwrap();
        assert!(on.r > 100 && on.r < 160, "half-alpha white over black, got {:?}", on);
        assert_eq!(surface.pixel(10, 2), Some(Rgba::BLACK));
    }

    #[test]
    fn test_gradient_fades_outward() {
        let mut surface = RasterSurface::with_background(60, 60, Rgba::BLACK);
        surface.fill_radial_gradient(&RadialGradient {
            center: Vec2::new(30.0, 30.0),
            inner_radius: 5.0,
            outer_radius: 25.0,
            inner_color: Rgba::hex(0x00ff00),
            outer_color: Rgba::TRANSPARENT_WHITE,
        });

        let near = surface.pixel(33, 30).unwrap();
        let far = surface.pixel(50, 30).unwrap();
        assert_eq!(near, Rgba::hex(0x00ff00));
        assert!(far.g < near.g);
        assert_eq!(surface.pixel(59, 59), Some(Rgba::BLACK));
    }

    #[test]
    fn test_blend_rules() {
        let dst = Rgba::hex(0x102030);
        assert_eq!(blend(dst, Rgba::new(255, 0, 0, 0)), dst);
        assert_eq!(blend(dst, Rgba::WHITE), Rgba::WHITE);
    }

    #[test]
    fn test_copy_to_xrgb() {
        let surface = RasterSurface::with_background(2, 1, Rgba::hex(0x0066ff));
        let mut out = [0u32; 2];
        surface.copy_to_xrgb(&mut out);
        assert_eq!(out, [0x0066ff, 0x0066ff]);
    }

    #[test]
    fn test_resize_reallocates() {
        let mut surface = RasterSurface::new(4, 4);
        surface.resize(8, 2);
        assert_eq!((surface.width(), surface.height()), (8, 2));
        assert_eq!(surface.pixels().len(), 16);
    }
}
