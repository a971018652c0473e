//! Touch gesture interpretation
//!
//! [`SwipeTracker`] folds the raw `Press`/`Drag`/`Release` stream into a
//! finished [`Gesture`]; [`SwipeClassifier`] decides whether a fling is a
//! page navigation or a pull-down refresh.

use serde::{Deserialize, Serialize};

use crate::paging::Navigation;
use crate::ui::core::{TouchEvent, TouchPoint};

/// Pixel distances that separate taps, ignored drags and swipes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeThresholds {
    /// Travel below this on both axes is a tap
    pub tap_slop: f32,
    /// Swipe band, inclusive on both ends
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for SwipeThresholds {
    fn default() -> Self {
        Self {
            tap_slop: 10.0,
            min_distance: 100.0,
            max_distance: 1000.0,
        }
    }
}

/// A completed pointer motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fling {
    pub start: Option<TouchPoint>,
    pub end: Option<TouchPoint>,
    /// Mean travel per tracked sample in pixels; informational only
    pub velocity_x: f32,
    pub velocity_y: f32,
}

impl Fling {
    pub fn new(start: TouchPoint, end: TouchPoint) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            velocity_x: 0.0,
            velocity_y: 0.0,
        }
    }

    /// `start - end` on both axes, if both points are known
    fn displacement(&self) -> Option<(f32, f32)> {
        let (start, end) = (self.start?, self.end?);
        let dx = start.x as f32 - end.x as f32;
        let dy = start.y as f32 - end.y as f32;
        Some((dx, dy))
    }
}

/// Classifies flings against a [`SwipeThresholds`] band
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SwipeClassifier {
    thresholds: SwipeThresholds,
}

impl SwipeClassifier {
    pub fn new(thresholds: SwipeThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> SwipeThresholds {
        self.thresholds
    }

    /// Horizontal swipe classification.
    ///
    /// Leftward travel (`start.x > end.x`) moves to older readings. Vertical
    /// travel is not considered.
    pub fn classify(&self, fling: &Fling) -> Navigation {
        let Some((dx, _dy)) = fling.displacement() else {
            return Navigation::Ignore;
        };

        let distance = dx.abs();
        if distance < self.thresholds.min_distance || distance > self.thresholds.max_distance {
            return Navigation::Ignore;
        }

        if dx > 0.0 {
            Navigation::Next
        } else if dx < 0.0 {
            Navigation::Previous
        } else {
            Navigation::Ignore
        }
    }

    /// Downward drag with little sideways travel
    pub fn is_pull_down(&self, fling: &Fling) -> bool {
        match fling.displacement() {
            Some((dx, dy)) => {
                -dy >= self.thresholds.min_distance && dx.abs() < self.thresholds.min_distance
            }
            None => false,
        }
    }

    /// Travel below the tap slop on both axes
    pub fn is_tap(&self, fling: &Fling) -> bool {
        match fling.displacement() {
            Some((dx, dy)) => {
                dx.abs() < self.thresholds.tap_slop && dy.abs() < self.thresholds.tap_slop
            }
            None => false,
        }
    }
}

/// A finished gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Tap(TouchPoint),
    Fling(Fling),
}

/// Accumulates touch events until the pointer is released
#[derive(Debug, Clone, Copy, Default)]
pub struct SwipeTracker {
    start: Option<TouchPoint>,
    samples: u32,
    classifier: SwipeClassifier,
}

impl SwipeTracker {
    pub fn new(classifier: SwipeClassifier) -> Self {
        Self {
            classifier,
            ..Self::default()
        }
    }

    pub fn classifier(&self) -> &SwipeClassifier {
        &self.classifier
    }

    /// Feed one touch event; returns the gesture once the pointer lifts.
    ///
    /// A release without a preceding press yields a fling with no start
    /// point, which every classification ignores.
    pub fn track(&mut self, event: TouchEvent) -> Option<Gesture> {
        match event {
            TouchEvent::Press(point) => {
                self.start = Some(point);
                self.samples = 1;
                None
            }
            TouchEvent::Drag(_) => {
                if self.start.is_some() {
                    self.samples = self.samples.saturating_add(1);
                }
                None
            }
            TouchEvent::Release(point) => {
                let start = self.start.take();
                let samples = core::mem::take(&mut self.samples).max(1) as f32;

                let mut fling = Fling {
                    start,
                    end: Some(point),
                    velocity_x: 0.0,
                    velocity_y: 0.0,
                };
                if let Some(start) = start {
                    fling.velocity_x = (point.x as f32 - start.x as f32) / samples;
                    fling.velocity_y = (point.y as f32 - start.y as f32) / samples;
                }

                if self.classifier.is_tap(&fling) {
                    Some(Gesture::Tap(point))
                } else {
                    Some(Gesture::Fling(fling))
                }
            }
        }
    }

    /// Whether a press is being tracked
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }
}
