pub mod chart;
pub mod constants;
pub mod page;
pub mod page_manager;
pub mod status;

pub use chart::ChartPage;
pub use page::{Page, PageWrapper};
pub use page_manager::{PageManager, owner_of};
pub use status::StatusPage;
