//! Pagination over historical readings
//!
//! Page 0 holds the newest readings; larger indices go further into the past.
//! Navigation is a pure transition on [`PageState`]; the caller decides what
//! to fetch once the state has changed.

use core::fmt;

/// Index of a page of readings, 0 being the most recent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PageIndex(u32);

impl PageIndex {
    pub const NEWEST: Self = Self(0);

    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Navigation request produced by the gesture interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Move to older readings
    Next,
    /// Move back toward the present
    Previous,
    /// Not a navigation gesture
    Ignore,
}

/// Current position in the page sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageState {
    current: PageIndex,
}

impl PageState {
    pub const fn new() -> Self {
        Self {
            current: PageIndex::NEWEST,
        }
    }

    pub const fn at(page: PageIndex) -> Self {
        Self { current: page }
    }

    pub const fn current(&self) -> PageIndex {
        self.current
    }

    /// Apply a navigation request and return the resulting state.
    ///
    /// `Next` always moves one page older; there is no upper bound, an index
    /// beyond the stored data simply fetches nothing. `Previous` stops at the
    /// newest page.
    #[must_use]
    pub fn apply(self, navigation: Navigation) -> Self {
        let index = self.current.get();
        let current = match navigation {
            Navigation::Next => PageIndex(index.saturating_add(1)),
            Navigation::Previous if index > 0 => PageIndex(index - 1),
            Navigation::Previous | Navigation::Ignore => self.current,
        };
        Self { current }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_page_is_newest() {
        assert_eq!(PageState::new().current(), PageIndex::NEWEST);
        assert_eq!(PageState::default(), PageState::new());
    }

    #[test]
    fn test_previous_at_newest_is_noop() {
        let state = PageState::new().apply(Navigation::Previous);
        assert_eq!(state.current().get(), 0);
    }

    #[test]
    fn test_previous_from_page_two() {
        let state = PageState::at(PageIndex::new(2)).apply(Navigation::Previous);
        assert_eq!(state.current().get(), 1);
    }

    #[test]
    fn test_next_always_increments() {
        let mut state = PageState::new();
        for expected in 1..=20 {
            state = state.apply(Navigation::Next);
            assert_eq!(state.current().get(), expected);
        }
    }

    #[test]
    fn test_ignore_is_noop() {
        let state = PageState::at(PageIndex::new(4));
        assert_eq!(state.apply(Navigation::Ignore), state);
    }

    #[test]
    fn test_next_saturates() {
        let state = PageState::at(PageIndex::new(u32::MAX)).apply(Navigation::Next);
        assert_eq!(state.current().get(), u32::MAX);
    }
}
