pub mod date;
pub mod logger;

pub use date::{format_date, parse_date, Timeframe};
pub use logger::{init_logger, Timer};
