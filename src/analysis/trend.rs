use crate::models::SearchInterestSeries;

/// Direction of the interest trend over the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendSentiment {
    Positive,
    Negative,
    Neutral,
}

impl TrendSentiment {
    fn from_delta(delta: f64) -> Self {
        if delta > 0.0 {
            TrendSentiment::Positive
        } else if delta < 0.0 {
            TrendSentiment::Negative
        } else {
            TrendSentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendSentiment::Positive => "Positive",
            TrendSentiment::Negative => "Negative",
            TrendSentiment::Neutral => "Neutral",
        }
    }
}

/// Simple moving average over the interest values.
///
/// A window is defined only when all of its samples are defined; the first
/// `window - 1` positions are always `None`.
pub fn moving_average(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let mut sum = 0.0;
            for v in slice {
                match v {
                    Some(x) => sum += x,
                    None => return None,
                }
            }
            Some(sum / window as f64)
        })
        .collect()
}

/// Exponential moving average with `alpha = 2 / (window + 1)`, seeded at the
/// first defined value. Missing samples keep the previous EMA.
pub fn exponential_moving_average(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    let alpha = 2.0 / (window as f64 + 1.0);
    let mut ema: Option<f64> = None;
    values
        .iter()
        .map(|v| {
            if let Some(x) = v {
                ema = Some(match ema {
                    Some(prev) => alpha * x + (1.0 - alpha) * prev,
                    None => *x,
                });
            }
            ema
        })
        .collect()
}

/// Classify the trend from the first vs last defined moving-average value.
pub fn trend_sentiment(series: &SearchInterestSeries, ma_window: usize) -> Option<TrendSentiment> {
    let ma = moving_average(&series.interest_values(), ma_window);
    let mut defined = ma.iter().flatten();
    let first = defined.next()?;
    let last = ma.iter().flatten().last()?;
    Some(TrendSentiment::from_delta(last - first))
}

/// Overall percentage change of interest over the window, with its sentiment.
///
/// Uses the first and last defined samples; `None` when the series has fewer
/// than two defined values or the first value is zero.
pub fn percentage_trend(series: &SearchInterestSeries) -> Option<(f64, TrendSentiment)> {
    let values = series.interest_values();
    let mut defined = values.iter().flatten();
    let first = *defined.next()?;
    let last = *values.iter().flatten().last()?;
    if first == 0.0 || values.iter().flatten().count() < 2 {
        return None;
    }
    let change = (last - first) / first * 100.0;
    Some((change, TrendSentiment::from_delta(change)))
}
