//! Generator kinds and their deduplication windows.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// The kinds of article the pipeline can generate.
///
/// Each kind carries its own candidate-selection rule (see
/// `marquee_pipeline::strategies`) but all funnel into the same
/// orchestration shape.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GeneratorKind {
    /// New releases in the trailing week or two.
    Weekly,
    /// What is trending right now, topped up by platform-popular titles.
    Trending,
    /// A single featured title.
    Spotlight,
    /// A calendar-month roundup with derived statistics.
    Monthly,
    /// A ranked top-ten list over a rolling window.
    Top10,
    /// A seasonal roundup (holiday specials, summer blockbusters).
    Seasonal,
}

impl GeneratorKind {
    /// Trailing window inside which a prior success blocks a new run.
    ///
    /// Weekly articles dedup over a full week; monthly roundups over
    /// roughly a month. Everything else uses a 12 hour default so a
    /// twice-daily cron cannot double-publish.
    pub fn dedup_window(&self) -> Duration {
        match self {
            GeneratorKind::Weekly => Duration::days(7),
            GeneratorKind::Monthly => Duration::days(28),
            GeneratorKind::Top10 => Duration::days(7),
            _ => Duration::hours(12),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn kind_round_trips_through_strings() {
        for kind in [
            GeneratorKind::Weekly,
            GeneratorKind::Trending,
            GeneratorKind::Spotlight,
            GeneratorKind::Monthly,
            GeneratorKind::Top10,
            GeneratorKind::Seasonal,
        ] {
            let s = kind.to_string();
            assert_eq!(GeneratorKind::from_str(&s).unwrap(), kind);
        }
    }

    #[test]
    fn weekly_window_is_seven_days() {
        assert_eq!(GeneratorKind::Weekly.dedup_window(), Duration::days(7));
        assert_eq!(GeneratorKind::Trending.dedup_window(), Duration::hours(12));
    }
}
