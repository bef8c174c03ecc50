use serde::{Deserialize, Serialize};

/// Common time range covered by every shifted recording.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AlignmentWindow {
    pub beam_start: f64,
    pub beam_end: f64,
}

impl AlignmentWindow {
    /// Intersects a set of `[start, end]` intervals.
    ///
    /// An empty iterator yields the unbounded window `(-inf, +inf)`.
    pub fn intersect<I>(intervals: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        intervals.into_iter().fold(
            Self {
                beam_start: f64::NEG_INFINITY,
                beam_end: f64::INFINITY,
            },
            |window, (start, end)| Self {
                beam_start: window.beam_start.max(start),
                beam_end: window.beam_end.min(end),
            },
        )
    }

    pub fn duration(&self) -> f64 {
        self.beam_end - self.beam_start
    }

    /// True when the sensors share no common overlap.
    pub fn is_degenerate(&self) -> bool {
        let duration = self.duration();
        !(duration.is_finite() && duration > 0.0)
    }

    pub fn contains(&self, other: &AlignmentWindow) -> bool {
        self.beam_start <= other.beam_start && other.beam_end <= self.beam_end
    }
}
