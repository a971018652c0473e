pub mod banner;
pub mod chart;

pub use banner::ErrorBanner;
pub use chart::{AxisSide, ChartError, ChartLine, LineChart};
