//! Platform-independent core of the hometemp viewer
//!
//! This crate holds everything that does not touch a window or a socket:
//! the reading model and its rounding, the spreadsheet gateway, chart series
//! construction, pagination, gesture interpretation, fetch tickets and the
//! fetch mailbox, and the two screens with their page manager.
//!
//! It is `#![no_std]` with `extern crate alloc` so the same pages render in
//! the desktop viewer, in tests, and on a display controller.

#![no_std]

extern crate alloc;

pub mod config;
pub mod fetch;
pub mod framebuffer;
pub mod gesture;
pub mod pages;
pub mod paging;
pub mod reading;
pub mod series;
pub mod sheets;
pub mod ui;
