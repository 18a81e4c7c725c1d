//! Snapshot rasterization.
//!
//! Paints the live elements of a [`MemorySurface`] into an RGBA image:
//! - Discs with a half-pixel anti-aliased edge
//! - Quadratic-falloff halo for glowing elements
//! - Float animation offsets sampled at a given time
//! - Source-over blending in creation order on an opaque background

use std::path::Path;

use image::{Rgba, RgbaImage};
use stardust_common::{Color, StardustError, StardustResult, Vec2};
use tracing::info;

use crate::surface::{ElementState, MemorySurface, PresentationSurface};

/// Maximum snapshot width.
pub const MAX_SNAPSHOT_WIDTH: u32 = 7680;

/// Maximum snapshot height.
pub const MAX_SNAPSHOT_HEIGHT: u32 = 4320;

/// Peak halo alpha relative to the element's opacity.
const GLOW_STRENGTH: f32 = 0.5;

/// Linear RGB accumulation buffer.
struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 3]>,
}

impl Canvas {
    fn new(width: u32, height: u32, background: Color) -> Self {
        let [r, g, b, _] = background.to_f32();
        Self {
            width,
            height,
            pixels: vec![[r, g, b]; width as usize * height as usize],
        }
    }

    fn blend(&mut self, x: u32, y: u32, color: [f32; 4], alpha: f32) {
        let a = (alpha * color[3]).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        let dst = &mut self.pixels[idx];
        for c in 0..3 {
            dst[c] = color[c] * a + dst[c] * (1.0 - a);
        }
    }

    /// Visits every pixel whose center lies within `radius` of `center`.
    fn for_each_in_radius(
        &mut self,
        center: Vec2,
        radius: f32,
        mut f: impl FnMut(&mut Self, u32, u32, f32),
    ) {
        let min_x = (center.x - radius).floor().max(0.0) as u32;
        let min_y = (center.y - radius).floor().max(0.0) as u32;
        let max_x = (center.x + radius).ceil().min(self.width as f32) as u32;
        let max_y = (center.y + radius).ceil().min(self.height as f32) as u32;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let pixel_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let distance = pixel_center.distance(center);
                if distance <= radius {
                    f(self, x, y, distance);
                }
            }
        }
    }

    fn paint(&mut self, element: &ElementState, offset: Vec2) {
        let spec = &element.spec;
        let opacity = element.opacity().clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return;
        }

        let radius = (spec.size * 0.5).max(0.5);
        let center = element.transform().translate + offset + Vec2::splat(spec.size * 0.5);

        if let Some(glow) = spec.glow {
            let halo = radius + glow.blur;
            let color = glow.color.to_f32();
            self.for_each_in_radius(center, halo, |canvas, x, y, d| {
                if d > radius && glow.blur > 0.0 {
                    let falloff = 1.0 - (d - radius) / glow.blur;
                    canvas.blend(x, y, color, opacity * GLOW_STRENGTH * falloff * falloff);
                }
            });
        }

        let color = spec.color.to_f32();
        self.for_each_in_radius(center, radius + 0.5, |canvas, x, y, d| {
            let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
            canvas.blend(x, y, color, opacity * coverage);
        });
    }

    fn into_image(self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width, self.height);
        for (pixel, rgb) in image.pixels_mut().zip(self.pixels) {
            *pixel = Rgba([
                (rgb[0].clamp(0.0, 1.0) * 255.0).round() as u8,
                (rgb[1].clamp(0.0, 1.0) * 255.0).round() as u8,
                (rgb[2].clamp(0.0, 1.0) * 255.0).round() as u8,
                255,
            ]);
        }
        image
    }
}

/// Rasterizes the surface as it would look `elapsed_secs` after startup.
#[must_use]
pub fn rasterize(surface: &MemorySurface, elapsed_secs: f32, background: Color) -> RgbaImage {
    let viewport = surface.viewport();
    let width = (viewport.width.round() as u32).clamp(1, MAX_SNAPSHOT_WIDTH);
    let height = (viewport.height.round() as u32).clamp(1, MAX_SNAPSHOT_HEIGHT);

    let mut canvas = Canvas::new(width, height, background);
    for (_, element) in surface.elements() {
        let offset = element
            .spec
            .animation
            .map_or(Vec2::ZERO, |anim| anim.offset_at(elapsed_secs));
        canvas.paint(element, offset);
    }
    canvas.into_image()
}

/// Rasterizes the surface and writes it as a PNG.
pub fn save_png<P: AsRef<Path>>(
    surface: &MemorySurface,
    elapsed_secs: f32,
    background: Color,
    path: P,
) -> StardustResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let image = rasterize(surface, elapsed_secs, background);
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| StardustError::Snapshot(e.to_string()))?;

    info!(
        "Saved {}x{} snapshot to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambient::FloatAnimation;
    use crate::surface::{ElementClass, ElementSpec, Glow, Transform};
    use stardust_common::Viewport;
    use tempfile::TempDir;

    fn spec(at: Vec2, size: f32) -> ElementSpec {
        ElementSpec {
            class: ElementClass::Particle,
            size,
            color: Color::WHITE,
            glow: None,
            opacity: 1.0,
            transform: Transform::translate(at),
            animation: None,
        }
    }

    #[test]
    fn test_empty_surface_is_background() {
        let surface = MemorySurface::new(Viewport::new(8.0, 4.0));
        let image = rasterize(&surface, 0.0, Color::BLACK);
        assert_eq!(image.dimensions(), (8, 4));
        assert!(image.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn test_disc_is_painted_at_center() {
        let mut surface = MemorySurface::new(Viewport::new(20.0, 20.0));
        surface.create_element(&spec(Vec2::new(8.0, 8.0), 4.0));
        let image = rasterize(&surface, 0.0, Color::BLACK);

        assert_eq!(image.get_pixel(10, 10).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_opacity_blends() {
        let mut surface = MemorySurface::new(Viewport::new(20.0, 20.0));
        let handle = surface.create_element(&spec(Vec2::new(8.0, 8.0), 4.0));
        surface.set_opacity(handle, 0.5);
        let image = rasterize(&surface, 0.0, Color::BLACK);

        let value = image.get_pixel(10, 10).0[0];
        assert!((126..=129).contains(&value));
    }

    #[test]
    fn test_glow_lights_surroundings() {
        let mut surface = MemorySurface::new(Viewport::new(40.0, 40.0));
        let mut glowing = spec(Vec2::new(18.0, 18.0), 4.0);
        glowing.glow = Some(Glow::for_particle(4.0, Color::WHITE));
        surface.create_element(&glowing);
        let image = rasterize(&surface, 0.0, Color::BLACK);

        // Outside the disc but inside the halo
        assert!(image.get_pixel(24, 20).0[0] > 0);
    }

    #[test]
    fn test_animation_offset_applied() {
        let mut surface = MemorySurface::new(Viewport::new(40.0, 40.0));
        let mut floating = spec(Vec2::new(10.0, 20.0), 2.0);
        floating.animation = Some(FloatAnimation::new(20.0));
        surface.create_element(&floating);

        let rest = rasterize(&surface, 0.0, Color::BLACK);
        assert!(rest.get_pixel(11, 21).0[0] > 0);

        // Halfway through the loop the element sits at +10, -10
        let shifted = rasterize(&surface, 10.0, Color::BLACK);
        assert_eq!(shifted.get_pixel(11, 21).0[0], 0);
        assert!(shifted.get_pixel(21, 11).0[0] > 0);
    }

    #[test]
    fn test_offscreen_elements_are_clipped() {
        let mut surface = MemorySurface::new(Viewport::new(10.0, 10.0));
        surface.create_element(&spec(Vec2::new(-50.0, 500.0), 3.0));
        surface.create_element(&spec(Vec2::new(7.0, 7.0), 6.0));
        let image = rasterize(&surface, 0.0, Color::BLACK);
        assert!(image.get_pixel(9, 9).0[0] > 0);
    }

    #[test]
    fn test_save_png() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("shots").join("frame.png");

        let mut surface = MemorySurface::new(Viewport::new(16.0, 9.0));
        surface.create_element(&spec(Vec2::new(4.0, 4.0), 2.0));
        save_png(&surface, 0.0, Color::BLACK, &path).expect("Failed to save snapshot");

        let loaded = image::open(&path).expect("Failed to open snapshot");
        assert_eq!(loaded.width(), 16);
        assert_eq!(loaded.height(), 9);
    }
}
