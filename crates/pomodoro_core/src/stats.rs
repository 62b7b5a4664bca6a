//! Pomodoro segments, completed cycles and duration statistics.

use serde::{Deserialize, Serialize};

/// Median of `values`; `0.0` for an empty slice.
///
/// Sorts a copy ascending. Odd lengths return the middle element, even
/// lengths the mean of the two middle elements.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let midpoint = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[midpoint]
    } else {
        (sorted[midpoint - 1] + sorted[midpoint]) / 2.0
    }
}

/// Timer segment kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Segment {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Pomodoro, Segment::ShortBreak, Segment::LongBreak];

    /// Stable id, matching the preference ref holding the segment length.
    pub fn id(self) -> &'static str {
        match self {
            Self::Pomodoro => "pomodoro",
            Self::ShortBreak => "shortBreak",
            Self::LongBreak => "longBreak",
        }
    }

    /// Label shown by the timer UI.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Pomodoro => "Pomodoro",
            Self::ShortBreak => "Īsā pauze",
            Self::LongBreak => "Garā pauze",
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, Self::Pomodoro)
    }
}

/// One finished timer segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroCycle {
    #[serde(rename = "type")]
    pub segment: Segment,
    /// Unix epoch milliseconds.
    pub start_time: i64,
    /// Unix epoch milliseconds.
    pub end_time: i64,
    /// Planned segment length in milliseconds.
    pub original_length: i64,
}

impl PomodoroCycle {
    /// Actual elapsed time; zero when the end precedes the start.
    pub fn duration_ms(&self) -> i64 {
        self.end_time.saturating_sub(self.start_time).max(0)
    }
}

/// Completed cycles in recording order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub cycles: Vec<PomodoroCycle>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, cycle: PomodoroCycle) {
        self.cycles.push(cycle);
    }

    pub fn cycles_of(&self, segment: Segment) -> impl Iterator<Item = &PomodoroCycle> {
        self.cycles
            .iter()
            .filter(move |cycle| cycle.segment == segment)
    }

    /// Median actual duration of `segment` cycles, in milliseconds.
    pub fn median_duration_ms(&self, segment: Segment) -> f64 {
        let durations: Vec<f64> = self
            .cycles_of(segment)
            .map(|cycle| cycle.duration_ms() as f64)
            .collect();
        median(&durations)
    }
}
