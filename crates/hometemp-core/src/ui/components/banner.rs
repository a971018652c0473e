//! Transient error banner
//!
//! Shown across the bottom of a page when a fetch fails. It dismisses itself
//! after a fixed number of frames or when tapped.

use alloc::string::String;
use core::fmt::{Display, Write};

use embedded_graphics::Drawable as EgDrawable;
use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::ui::core::Drawable;
use crate::ui::styling::{CRIMSON, FONT_6X10_CHAR_WIDTH_PX, WHITE};

/// Horizontal text inset inside the banner in pixels
const TEXT_INSET_PX: u32 = 4;

pub struct ErrorBanner {
    bounds: Rectangle,
    message: Option<String>,
    remaining_frames: u32,
    lifetime_frames: u32,
}

impl ErrorBanner {
    pub fn new(bounds: Rectangle, lifetime_frames: u32) -> Self {
        Self {
            bounds,
            message: None,
            remaining_frames: 0,
            lifetime_frames,
        }
    }

    /// Show `error`, replacing any message already up
    pub fn show(&mut self, error: &impl Display) {
        let mut message = String::new();
        let _ = write!(message, "{}", error);
        truncate_to_chars(&mut message, self.max_chars());
        self.message = Some(message);
        self.remaining_frames = self.lifetime_frames.max(1);
    }

    /// Count down one frame. Returns `true` if the banner just went away.
    pub fn tick(&mut self) -> bool {
        if self.message.is_none() {
            return false;
        }
        self.remaining_frames = self.remaining_frames.saturating_sub(1);
        if self.remaining_frames == 0 {
            self.message = None;
            true
        } else {
            false
        }
    }

    /// Hide the banner. Returns `true` if it was visible.
    pub fn dismiss(&mut self) -> bool {
        self.remaining_frames = 0;
        self.message.take().is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn max_chars(&self) -> usize {
        (self.bounds.size.width.saturating_sub(2 * TEXT_INSET_PX) / FONT_6X10_CHAR_WIDTH_PX) as usize
    }
}

/// Cut `text` down to at most `max` characters
fn truncate_to_chars(text: &mut String, max: usize) {
    if let Some((idx, _)) = text.char_indices().nth(max) {
        text.truncate(idx);
    }
}

impl Drawable for ErrorBanner {
    fn draw<D: DrawTarget<Color = Rgb565>>(&self, display: &mut D) -> Result<(), D::Error> {
        let Some(message) = &self.message else {
            return Ok(());
        };

        self.bounds
            .into_styled(PrimitiveStyle::with_fill(CRIMSON))
            .draw(display)?;

        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Left)
            .baseline(Baseline::Middle)
            .build();
        let anchor = Point::new(
            self.bounds.top_left.x + TEXT_INSET_PX as i32,
            self.bounds.center().y,
        );
        Text::with_text_style(
            message,
            anchor,
            MonoTextStyle::new(&FONT_6X10, WHITE),
            text_style,
        )
        .draw(display)?;

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }
}
