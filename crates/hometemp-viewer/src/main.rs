//! Desktop viewer for temperature and humidity readings kept in a spreadsheet.
//!
//! Renders hometemp-core pages in an SDL2 window via
//! `embedded-graphics-simulator`, or headlessly into a PPM snapshot. Sheet
//! reads run on a tokio runtime and report back through the fetch mailbox,
//! so the frame loop never waits on the network.
//!
//! `--demo` swaps the Sheets API for a synthetic sheet.

mod app;
mod demo_source;
mod dispatcher;
mod error;
mod http_source;
mod snapshot;
mod source;
#[cfg(feature = "window")]
mod window;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use hometemp_core::config::Config;
use hometemp_core::fetch::{fetch_receiver, fetch_sender};
use hometemp_core::sheets::SheetGateway;
use hometemp_core::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
use log::{error, info};

use crate::app::{App, build_manager};
use crate::demo_source::{DEFAULT_DEMO_ROWS, DemoSheetSource};
use crate::dispatcher::FetchDispatcher;
use crate::error::ViewerError;
use crate::http_source::{Credentials, HttpSheetSource};
use crate::snapshot::Screen;
use crate::source::ViewerSource;

/// Worker threads for background fetches
const FETCH_WORKER_THREADS: usize = 2;

/// Extra time a snapshot waits beyond the request timeout
const SNAPSHOT_GRACE: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file; defaults apply to anything it leaves out
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Credentials for the Sheets API (`access_token` or `api_key`)
    #[arg(long, value_name = "PATH", default_value = "credentials.json")]
    credentials: PathBuf,

    /// Read from a synthetic sheet instead of the Sheets API
    #[arg(long)]
    demo: bool,

    /// Rows in the synthetic sheet
    #[arg(long, default_value_t = DEFAULT_DEMO_ROWS)]
    demo_rows: u32,

    /// Artificial delay of every synthetic read, in milliseconds
    #[arg(long, default_value_t = 0)]
    demo_latency_ms: u64,

    /// Sheet row whose temperature cell the synthetic sheet corrupts
    #[arg(long, value_name = "ROW")]
    demo_malformed_row: Option<u32>,

    /// Render one screen to a PPM image and exit
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// Screen to capture with --snapshot
    #[arg(long, value_enum, default_value_t = Screen::Status)]
    screen: Screen,
}

fn load_config(path: Option<&Path>) -> Result<Config, ViewerError> {
    let Some(path) = path else {
        info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };
    let text = std::fs::read(path).map_err(|e| ViewerError::io(path, e))?;
    Ok(Config::from_json(&text)?)
}

fn build_source(args: &Args, config: &Config) -> Result<ViewerSource, ViewerError> {
    if args.demo {
        let source = DemoSheetSource::new(config.sheet.layout, args.demo_rows)
            .with_latency(Duration::from_millis(args.demo_latency_ms))
            .with_malformed_row(args.demo_malformed_row);
        return Ok(ViewerSource::Demo(source));
    }

    let bytes =
        std::fs::read(&args.credentials).map_err(|e| ViewerError::io(&args.credentials, e))?;
    let credentials = Credentials::from_json(&bytes)?;
    let source = HttpSheetSource::new(&config.http, &config.sheet.spreadsheet_id, credentials)?;
    Ok(ViewerSource::Http(source))
}

fn run(args: Args) -> Result<(), ViewerError> {
    let config = load_config(args.config.as_deref())?;
    let source = build_source(&args, &config)?;
    info!("Reading from the {}", source.describe());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(FETCH_WORKER_THREADS)
        .enable_all()
        .build()
        .map_err(ViewerError::Runtime)?;

    let gateway = Arc::new(SheetGateway::new(source, &config.sheet));
    let dispatcher = FetchDispatcher::new(runtime.handle().clone(), gateway, fetch_sender());
    let mut app = App::new(build_manager(&config), dispatcher, fetch_receiver());

    let result = match &args.snapshot {
        Some(path) => {
            let wait = Duration::from_secs(config.http.timeout_secs) + SNAPSHOT_GRACE;
            snapshot::write_snapshot(&mut app, args.screen, path, wait)
        }
        None => run_window(&mut app),
    };

    app.shutdown();
    result
}

#[cfg(feature = "window")]
fn run_window(app: &mut App) -> Result<(), ViewerError> {
    info!("Keys: Left/Right=page  Backspace/Esc=back  Q=quit");
    window::run(app);
    Ok(())
}

#[cfg(not(feature = "window"))]
fn run_window(_app: &mut App) -> Result<(), ViewerError> {
    Err(ViewerError::WindowUnavailable)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    info!("Starting hometemp viewer");
    info!("Display: {}×{}", DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
