use hometemp_core::sheets::{FetchError, SheetRange, SheetSource, ValueRange};

use crate::demo_source::DemoSheetSource;
use crate::http_source::HttpSheetSource;

/// The sheet the viewer reads from
pub enum ViewerSource {
    Http(HttpSheetSource),
    Demo(DemoSheetSource),
}

impl ViewerSource {
    pub fn describe(&self) -> &'static str {
        match self {
            ViewerSource::Http(_) => "Sheets API",
            ViewerSource::Demo(_) => "demo sheet",
        }
    }
}

impl SheetSource for ViewerSource {
    async fn read_range(&self, range: &SheetRange) -> Result<ValueRange, FetchError> {
        match self {
            ViewerSource::Http(source) => source.read_range(range).await,
            ViewerSource::Demo(source) => source.read_range(range).await,
        }
    }
}
