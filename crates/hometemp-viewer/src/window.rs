//! SDL2 window loop
//!
//! # Key bindings
//!
//! | Key              | Action                 |
//! |------------------|------------------------|
//! | Left             | Older page (chart)     |
//! | Right            | Newer page (chart)     |
//! | Backspace / Esc  | Back to status         |
//! | Q                | Quit                   |
//!
//! Mouse press, drag and release are forwarded as touch events.

use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use hometemp_core::framebuffer::FrameBuffer;
use hometemp_core::ui::{Action, TouchEvent, TouchPoint};
use log::info;

use crate::app::{App, next_page_swipe, previous_page_swipe};

/// Pixel scale factor for the window.
const WINDOW_SCALE: u32 = 2;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

fn touch_point(point: Point) -> TouchPoint {
    TouchPoint::new(point.x.max(0) as u16, point.y.max(0) as u16)
}

pub fn run(app: &mut App) {
    let size = app.display_size();
    let mut display = SimulatorDisplay::<Rgb565>::new(size);
    let mut framebuffer = FrameBuffer::new(size);

    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Hometemp Viewer", &output_settings);

    app.start();

    // The SDL window is lazily initialized on the first `update()` call,
    // which must happen before `events()`.
    app.frame(&mut framebuffer);
    let _ = framebuffer.flush(&mut display);
    window.update(&display);

    let mut pressed = false;

    'running: loop {
        let frame_start = Instant::now();

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q => break 'running,
                    Keycode::Backspace | Keycode::Escape => app.act(Action::GoBack),
                    Keycode::Left => {
                        let (from, to) = next_page_swipe();
                        app.swipe(from, to);
                    }
                    Keycode::Right => {
                        let (from, to) = previous_page_swipe();
                        app.swipe(from, to);
                    }
                    _ => {}
                },

                SimulatorEvent::MouseButtonDown { point, .. } => {
                    pressed = true;
                    app.touch(TouchEvent::Press(touch_point(point)));
                }

                SimulatorEvent::MouseMove { point } if pressed => {
                    app.touch(TouchEvent::Drag(touch_point(point)));
                }

                SimulatorEvent::MouseButtonUp { point, .. } => {
                    pressed = false;
                    app.touch(TouchEvent::Release(touch_point(point)));
                }

                _ => {}
            }
        }

        if app.frame(&mut framebuffer) {
            let _ = framebuffer.flush(&mut display);
        }
        window.update(&display);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("Viewer exiting");
}
