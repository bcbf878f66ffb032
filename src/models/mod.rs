pub mod aligned;
pub mod correlation;
pub mod series;

pub use aligned::{AlignedRow, AlignedTable};
pub use correlation::{Column, CorrelationMatrix};
pub use series::{InterestPoint, OhlcvBar, OhlcvSeries, SearchInterestSeries};
