//! The rate series as seen by readers of the append store.

/// One row of the stored dataset, reduced to what the chart needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RatePoint {
    /// The raw `hora` cell, kept for labelling.
    pub time: String,
    /// The `taxa` cell.
    pub rate: f64,
}

/// Rows of the dataset in collection order.
///
/// The position of a point is its x coordinate; `time` is not used as an axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSeries {
    points: Vec<RatePoint>,
}

impl RateSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, time: impl Into<String>, rate: f64) {
        self.points.push(RatePoint {
            time: time.into(),
            rate,
        });
    }

    pub fn points(&self) -> &[RatePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(min, max)` of the rates, or `None` for an empty series.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.rate).fold(None, |acc, r| match acc {
            None => Some((r, r)),
            Some((lo, hi)) => Some((lo.min(r), hi.max(r))),
        })
    }
}
