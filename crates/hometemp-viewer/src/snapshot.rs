//! Headless rendering to a PPM image

use std::path::Path;
use std::time::{Duration, Instant};

use clap::ValueEnum;
use hometemp_core::framebuffer::FrameBuffer;
use hometemp_core::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, TouchPoint};
use log::{info, warn};

use crate::app::App;
use crate::error::ViewerError;

/// Poll interval while waiting for fetches
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Which screen ends up in the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Screen {
    Status,
    Chart,
}

/// Render `screen` once its data has arrived and write it to `path`
pub fn write_snapshot(
    app: &mut App,
    screen: Screen,
    path: &Path,
    wait: Duration,
) -> Result<(), ViewerError> {
    let mut framebuffer = FrameBuffer::new(app.display_size());

    app.start();
    settle(app, &mut framebuffer, wait);

    if screen == Screen::Chart {
        let center = TouchPoint::new(DISPLAY_WIDTH_PX / 2, DISPLAY_HEIGHT_PX / 2);
        app.swipe(center, center);
        settle(app, &mut framebuffer, wait);
    }

    app.frame(&mut framebuffer);
    let size = app.display_size();
    let image = encode_ppm(size.width, size.height, &framebuffer.to_rgb888_bytes());
    std::fs::write(path, image).map_err(|source| ViewerError::Snapshot {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Wrote {:?} snapshot to {}", app.current_page(), path.display());
    Ok(())
}

fn settle(app: &mut App, framebuffer: &mut FrameBuffer, wait: Duration) {
    let deadline = Instant::now() + wait;
    while !app.is_settled() {
        if Instant::now() >= deadline {
            warn!("Gave up waiting for fetches after {:?}", wait);
            break;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
    app.frame(framebuffer);
}

/// Binary PPM (`P6`) image from row-major RGB triples
pub fn encode_ppm(width: u32, height: u32, rgb: &[u8]) -> Vec<u8> {
    let mut image = format!("P6\n{} {}\n255\n", width, height).into_bytes();
    image.extend_from_slice(rgb);
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ppm_header() {
        let image = encode_ppm(2, 1, &[255, 0, 0, 0, 0, 255]);
        assert_eq!(&image[..11], b"P6\n2 1\n255\n");
        assert_eq!(image.len(), 11 + 6);
    }

    #[test]
    fn test_framebuffer_snapshot_size() {
        let framebuffer = FrameBuffer::default();
        let image = encode_ppm(
            DISPLAY_WIDTH_PX as u32,
            DISPLAY_HEIGHT_PX as u32,
            &framebuffer.to_rgb888_bytes(),
        );
        let header = format!("P6\n{} {}\n255\n", DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX);
        assert_eq!(
            image.len(),
            header.len() + 3 * DISPLAY_WIDTH_PX as usize * DISPLAY_HEIGHT_PX as usize
        );
    }
}
