pub mod components;
pub mod core;
pub mod styling;

pub use self::core::{
    Action, DisplayMode, Drawable, PageEvent, PageId, TouchEvent, TouchPoint, WARM_THRESHOLD,
};
pub use styling::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
