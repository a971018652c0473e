use alloc::string::String;
use alloc::vec::Vec;
use log::{debug, warn};

use crate::config::SheetConfig;
use crate::fetch::{FetchOutcome, FetchTarget, FetchTicket};
use crate::paging::PageIndex;
use crate::reading::{Centi, Reading};

use super::{FetchError, RowDefect, SheetLayout, SheetRange, SheetSource};

/// Column positions within a data row
const IDX_DATE: usize = 0;
const IDX_TEMPERATURE: usize = 1;
const IDX_HUMIDITY: usize = 2;
const CELLS_PER_ROW: usize = 3;

/// Turns page requests into sheet reads and sheet rows into readings
pub struct SheetGateway<S> {
    source: S,
    sheet_name: String,
    layout: SheetLayout,
}

impl<S: SheetSource> SheetGateway<S> {
    pub fn new(source: S, config: &SheetConfig) -> Self {
        Self {
            source,
            sheet_name: config.sheet_name.clone(),
            layout: config.layout,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Range expression covering a page
    pub fn page_range(&self, page: PageIndex) -> SheetRange {
        SheetRange::new(&self.sheet_name, self.layout.page_rows(page))
    }

    /// Fetch one page of readings, newest first.
    ///
    /// A range that holds no rows at all is [`FetchError::NoData`]; an
    /// explicit empty row list is a valid empty page.
    pub async fn fetch(&self, page: PageIndex) -> Result<Vec<Reading>, FetchError> {
        let range = self.page_range(page);
        debug!("Fetching page {} ({})", page, range.as_str());

        let response = self.source.read_range(&range).await?;
        let rows = response.values.ok_or(FetchError::NoData)?;
        parse_rows(&rows, range.rows().start)
    }

    /// Fetch the newest reading for the status screen
    pub async fn fetch_latest(&self) -> Result<Reading, FetchError> {
        let range = SheetRange::new(&self.sheet_name, self.layout.latest_row());
        debug!("Fetching latest reading ({})", range.as_str());

        let response = self.source.read_range(&range).await?;
        let rows = response.values.ok_or(FetchError::NoData)?;
        let first = rows.first().ok_or(FetchError::NoData)?;
        parse_row(first, range.rows().start)
    }

    /// Run the fetch a ticket asks for and tag the result with it
    pub async fn run(&self, ticket: FetchTicket) -> FetchOutcome {
        let result = match ticket.target {
            FetchTarget::Latest => self.fetch_latest().await.map(|reading| alloc::vec![reading]),
            FetchTarget::Page(page) => self.fetch(page).await,
        };

        if let Err(e) = &result {
            warn!("Fetch {:?} failed: {}", ticket, e);
        }

        FetchOutcome { ticket, result }
    }
}

/// Parse a block of rows whose first row sits at sheet row `first_row`
pub fn parse_rows(rows: &[Vec<String>], first_row: u32) -> Result<Vec<Reading>, FetchError> {
    rows.iter()
        .enumerate()
        .map(|(i, cells)| parse_row(cells, first_row.saturating_add(i as u32)))
        .collect()
}

/// Parse a single `date, temperature, humidity` row
pub fn parse_row(cells: &[String], row: u32) -> Result<Reading, FetchError> {
    if cells.len() != CELLS_PER_ROW {
        return Err(FetchError::MalformedRow {
            row,
            defect: RowDefect::CellCount { found: cells.len() },
        });
    }

    let temperature = Centi::parse_half_even(&cells[IDX_TEMPERATURE]).map_err(|e| {
        FetchError::MalformedRow {
            row,
            defect: RowDefect::Temperature(e),
        }
    })?;
    let humidity =
        Centi::parse_half_even(&cells[IDX_HUMIDITY]).map_err(|e| FetchError::MalformedRow {
            row,
            defect: RowDefect::Humidity(e),
        })?;

    Ok(Reading::new(cells[IDX_DATE].clone(), temperature, humidity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::DecimalError;
    use crate::sheets::ValueRange;
    use alloc::string::ToString;
    use alloc::vec;
    use core::cell::RefCell;
    use embassy_futures::block_on;

    /// Source that answers every read with a canned response and records
    /// the ranges it was asked for
    struct CannedSource {
        response: Result<ValueRange, FetchError>,
        requested: RefCell<Vec<String>>,
    }

    impl CannedSource {
        fn new(response: Result<ValueRange, FetchError>) -> Self {
            Self {
                response,
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl SheetSource for CannedSource {
        async fn read_range(&self, range: &SheetRange) -> Result<ValueRange, FetchError> {
            self.requested.borrow_mut().push(range.as_str().to_string());
            self.response.clone()
        }
    }

    fn row(date: &str, temperature: &str, humidity: &str) -> Vec<String> {
        vec![date.to_string(), temperature.to_string(), humidity.to_string()]
    }

    fn gateway(source: &CannedSource) -> SheetGateway<&CannedSource> {
        SheetGateway::new(source, &SheetConfig::default())
    }

    #[test]
    fn test_fetch_requests_page_range() {
        let source = CannedSource::new(Ok(ValueRange::with_rows("Sheet1!A152:C201", vec![])));
        let result = block_on(gateway(&source).fetch(PageIndex::new(3)));

        assert_eq!(result, Ok(vec![]));
        assert_eq!(*source.requested.borrow(), vec!["Sheet1!A152:C201"]);
    }

    #[test]
    fn test_fetch_keeps_source_order_and_rounds() {
        let source = CannedSource::new(Ok(ValueRange::with_rows(
            "Sheet1!A2:C51",
            vec![
                row("2021-03-04 12:10:00", "23.125", "40.005"),
                row("2021-03-04 12:00:00", "23.135", "41"),
                row("2021-03-04 11:50:00", "23.0", "40.125"),
            ],
        )));

        let readings = block_on(gateway(&source).fetch(PageIndex::NEWEST)).unwrap();

        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].timestamp(), "2021-03-04 12:10:00");
        assert_eq!(readings[0].temperature(), Centi::from_hundredths(2312));
        // 40.005 parses slightly above the midpoint
        assert_eq!(readings[0].humidity(), Centi::from_hundredths(4001));
        assert_eq!(readings[1].temperature(), Centi::from_hundredths(2314));
        assert_eq!(readings[1].humidity(), Centi::from_units(41));
        // 40.125 is exact in binary, so the tie goes to the even digit
        assert_eq!(readings[2].humidity(), Centi::from_hundredths(4012));
    }

    #[test]
    fn test_missing_values_is_no_data() {
        let source = CannedSource::new(Ok(ValueRange::empty("Sheet1!A9002:C9051")));
        let result = block_on(gateway(&source).fetch(PageIndex::new(180)));
        assert_eq!(result, Err(FetchError::NoData));
    }

    #[test]
    fn test_malformed_cell_reports_sheet_row() {
        let source = CannedSource::new(Ok(ValueRange::with_rows(
            "Sheet1!A52:C101",
            vec![
                row("2021-03-04 12:10:00", "22.0", "40.0"),
                row("2021-03-04 12:00:00", "--", "40.0"),
            ],
        )));

        let result = block_on(gateway(&source).fetch(PageIndex::new(1)));
        assert_eq!(
            result,
            Err(FetchError::MalformedRow {
                row: 53,
                defect: RowDefect::Temperature(DecimalError::Invalid),
            })
        );
    }

    #[test]
    fn test_short_row_is_malformed() {
        let source = CannedSource::new(Ok(ValueRange::with_rows(
            "Sheet1!A2:C51",
            vec![vec!["2021-03-04 12:10:00".to_string(), "22.0".to_string()]],
        )));

        let result = block_on(gateway(&source).fetch(PageIndex::NEWEST));
        assert_eq!(
            result,
            Err(FetchError::MalformedRow {
                row: 2,
                defect: RowDefect::CellCount { found: 2 },
            })
        );
    }

    #[test]
    fn test_transport_error_propagates() {
        let source = CannedSource::new(Err(FetchError::Transport("timed out".to_string())));
        let result = block_on(gateway(&source).fetch(PageIndex::NEWEST));
        assert_eq!(result, Err(FetchError::Transport("timed out".to_string())));
    }

    #[test]
    fn test_fetch_latest_reads_single_row() {
        let source = CannedSource::new(Ok(ValueRange::with_rows(
            "Sheet1!A2:C2",
            vec![row("2021-03-04 12:10:00", "24.51", "38.2")],
        )));

        let reading = block_on(gateway(&source).fetch_latest()).unwrap();

        assert_eq!(*source.requested.borrow(), vec!["Sheet1!A2:C2"]);
        assert_eq!(reading.temperature(), Centi::from_hundredths(2451));
    }

    #[test]
    fn test_fetch_latest_without_rows_is_no_data() {
        let source = CannedSource::new(Ok(ValueRange::with_rows("Sheet1!A2:C2", vec![])));
        assert_eq!(
            block_on(gateway(&source).fetch_latest()),
            Err(FetchError::NoData)
        );
    }

    #[test]
    fn test_run_tags_outcome_with_ticket() {
        let source = CannedSource::new(Ok(ValueRange::with_rows(
            "Sheet1!A52:C101",
            vec![row("2021-03-04 12:10:00", "22.0", "40.0")],
        )));
        let ticket = FetchTicket {
            target: FetchTarget::Page(PageIndex::new(1)),
            generation: 7,
        };

        let outcome = block_on(gateway(&source).run(ticket));

        assert_eq!(outcome.ticket, ticket);
        assert_eq!(outcome.result.map(|r| r.len()), Ok(1));
    }

    #[test]
    fn test_refetch_is_identical() {
        let source = CannedSource::new(Ok(ValueRange::with_rows(
            "Sheet1!A2:C51",
            vec![
                row("2021-03-04 12:10:00", "22.0", "40.0"),
                row("2021-03-04 12:00:00", "21.5", "41.5"),
            ],
        )));
        let gateway = gateway(&source);

        let first = block_on(gateway.fetch(PageIndex::NEWEST));
        let second = block_on(gateway.fetch(PageIndex::NEWEST));
        assert_eq!(first, second);
    }
}
