//! In-memory framebuffer with change tracking.
//!
//! Pages draw into this buffer; afterwards only the rectangle containing
//! changed pixels is pushed to the real display. The viewer also reads the
//! buffer back to write headless snapshots.

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

use crate::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }
}

/// Heap-backed `DrawTarget<Color = Rgb565>` of arbitrary size
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb565>,
    dirty: Option<DirtyRect>,
}

impl Default for FrameBuffer {
    /// A buffer the size of the physical display
    fn default() -> Self {
        Self::new(Size::new(DISPLAY_WIDTH_PX as u32, DISPLAY_HEIGHT_PX as u32))
    }
}

impl FrameBuffer {
    /// Allocate a framebuffer filled with black pixels.
    pub fn new(size: Size) -> Self {
        let width = size.width as usize;
        let height = size.height as usize;
        Self {
            width,
            height,
            pixels: vec![Rgb565::BLACK; width * height],
            dirty: None,
        }
    }

    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: Rgb565) {
        let idx = y * self.width + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Color at `point`, or `None` outside the buffer
    pub fn pixel_at(&self, point: Point) -> Option<Rgb565> {
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Number of pixels currently holding `color`
    pub fn count_color(&self, color: Rgb565) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    /// Whether anything changed since the last flush
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_some()
    }

    /// Row-major 8-bit RGB triples, for image export
    pub fn to_rgb888_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&p| {
                let c = Rgb888::from(p);
                [c.r(), c.g(), c.b()]
            })
            .collect()
    }

    /// Push the changed region to `display`, then reset change tracking.
    ///
    /// No-op if nothing changed.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(());
        };

        let width = rect.max_x - rect.min_x + 1;
        let height = rect.max_y - rect.min_y + 1;

        debug!(
            "Flushing {}x{} dirty region at ({}, {})",
            width, height, rect.min_x, rect.min_y
        );

        let area = Rectangle::new(
            Point::new(rect.min_x as i32, rect.min_y as i32),
            Size::new(width as u32, height as u32),
        );

        let pixels = &self.pixels;
        let stride = self.width;
        let pixel_iter = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * stride + rect.min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        display.fill_contiguous(&area, pixel_iter)
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x >= 0
                && coord.y >= 0
                && (coord.x as usize) < self.width
                && (coord.y as usize) < self.height
            {
                self.set_pixel(coord.x as usize, coord.y as usize, color);
            }
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let mut colors = colors.into_iter();
        for row in 0..area.size.height as i32 {
            let y = area.top_left.y + row;
            for col in 0..area.size.width as i32 {
                let x = area.top_left.x + col;
                if let Some(color) = colors.next()
                    && x >= 0
                    && y >= 0
                    && (x as usize) < self.width
                    && (y as usize) < self.height
                {
                    self.set_pixel(x as usize, y as usize, color);
                }
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let clipped = area.intersection(&self.bounding_box());
        let Some(bottom_right) = clipped.bottom_right() else {
            return Ok(());
        };

        for y in clipped.top_left.y..=bottom_right.y {
            for x in clipped.top_left.x..=bottom_right.x {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        for y in 0..self.height {
            for x in 0..self.width {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;
    use embedded_graphics::primitives::PrimitiveStyle;

    #[test]
    fn test_new_buffer_is_clean_and_black() {
        let fb = FrameBuffer::new(Size::new(8, 4));
        assert!(!fb.is_dirty());
        assert_eq!(fb.count_color(Rgb565::BLACK), 32);
    }

    #[test]
    fn test_fill_solid_clips_to_bounds() {
        let mut fb = FrameBuffer::new(Size::new(8, 4));
        fb.fill_solid(
            &Rectangle::new(Point::new(6, -2), Size::new(10, 4)),
            Rgb565::RED,
        )
        .unwrap();

        assert_eq!(fb.count_color(Rgb565::RED), 4);
        assert_eq!(fb.pixel_at(Point::new(7, 1)), Some(Rgb565::RED));
        assert_eq!(fb.pixel_at(Point::new(7, 2)), Some(Rgb565::BLACK));
        assert_eq!(fb.pixel_at(Point::new(8, 0)), None);
    }

    #[test]
    fn test_flush_sends_only_changed_region() {
        let mut fb = FrameBuffer::new(Size::new(16, 16));
        Rectangle::new(Point::new(2, 3), Size::new(2, 2))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::GREEN))
            .draw(&mut fb)
            .unwrap();

        let mut display = MockDisplay::<Rgb565>::new();
        fb.flush(&mut display).unwrap();

        assert_eq!(display.affected_area(), Rectangle::new(Point::new(2, 3), Size::new(2, 2)));
        assert!(!fb.is_dirty());
    }

    #[test]
    fn test_redrawing_same_color_stays_clean() {
        let mut fb = FrameBuffer::new(Size::new(4, 4));
        fb.clear(Rgb565::BLACK).unwrap();
        assert!(!fb.is_dirty());
    }

    #[test]
    fn test_rgb888_export() {
        let mut fb = FrameBuffer::new(Size::new(2, 1));
        fb.fill_solid(&Rectangle::new(Point::zero(), Size::new(1, 1)), Rgb565::WHITE)
            .unwrap();
        assert_eq!(fb.to_rgb888_bytes(), [255, 255, 255, 0, 0, 0]);
    }
}
