pub mod correlate;
pub mod normalize;
pub mod pct_change;
pub mod trend;

pub use correlate::{correlate, pearson};
pub use normalize::{normalize_volume, CONSTANT_VOLUME_SENTINEL};
pub use pct_change::derive_interest_pct_change;
pub use trend::{
    exponential_moving_average, moving_average, percentage_trend, trend_sentiment, TrendSentiment,
};
