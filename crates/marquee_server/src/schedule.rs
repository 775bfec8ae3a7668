//! Cadence types for the scheduled trigger.
//!
//! Best-effort scheduling: the trigger loop polls each cadence, so runs
//! land on the poll after their due time, not at the exact instant.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Answer to "should this job run now, and when should we look again?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CadenceCheck {
    /// Whether the job is due
    pub should_run: bool,
    /// Next time worth checking, when one exists
    pub next_run: Option<DateTime<Utc>>,
}

impl CadenceCheck {
    fn due(next_run: Option<DateTime<Utc>>) -> Self {
        Self { should_run: true, next_run }
    }

    fn wait(next_run: Option<DateTime<Utc>>) -> Self {
        Self { should_run: false, next_run }
    }
}

/// When a scheduled job fires.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cadence {
    /// Cron expression (7 fields: sec min hour day month weekday year).
    Cron {
        /// Cron expression string
        expression: String,
    },
    /// Fixed interval in seconds.
    Interval {
        /// Seconds between runs
        seconds: u64,
    },
    /// Never fires.
    Disabled,
}

impl Cadence {
    /// Decide whether a job with the given last run time is due now.
    ///
    /// An unparseable cron expression behaves like `Disabled`; config
    /// validation reports it separately.
    pub fn check(&self, last_run: Option<DateTime<Utc>>) -> CadenceCheck {
        self.check_at(last_run, Utc::now())
    }

    fn check_at(&self, last_run: Option<DateTime<Utc>>, now: DateTime<Utc>) -> CadenceCheck {
        match self {
            Cadence::Disabled => CadenceCheck::wait(None),
            Cadence::Interval { seconds } => {
                let interval = Duration::seconds(*seconds as i64);
                match last_run {
                    None => CadenceCheck::due(Some(now + interval)),
                    Some(last) => {
                        let next = last + interval;
                        if now >= next {
                            CadenceCheck::due(Some(now + interval))
                        } else {
                            CadenceCheck::wait(Some(next))
                        }
                    }
                }
            }
            Cadence::Cron { expression } => match cron::Schedule::from_str(expression) {
                Ok(schedule) => {
                    let after = last_run.unwrap_or(now - Duration::seconds(1));
                    match schedule.after(&after).next() {
                        Some(next) if now >= next => {
                            CadenceCheck::due(schedule.after(&now).next())
                        }
                        Some(next) => CadenceCheck::wait(Some(next)),
                        None => CadenceCheck::wait(None),
                    }
                }
                Err(_) => CadenceCheck::wait(None),
            },
        }
    }

    /// Next fire time after the reference instant, if any.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Cadence::Disabled => None,
            Cadence::Interval { seconds } => Some(after + Duration::seconds(*seconds as i64)),
            Cadence::Cron { expression } => cron::Schedule::from_str(expression)
                .ok()
                .and_then(|s| s.after(&after).next()),
        }
    }

    /// Whether the cadence can ever fire.
    pub fn is_enabled(&self) -> bool {
        match self {
            Cadence::Disabled => false,
            Cadence::Interval { seconds } => *seconds > 0,
            Cadence::Cron { expression } => cron::Schedule::from_str(expression).is_ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_never_fires() {
        let check = Cadence::Disabled.check(None);
        assert!(!check.should_run);
        assert!(check.next_run.is_none());
        assert!(!Cadence::Disabled.is_enabled());
    }

    #[test]
    fn interval_fires_on_first_check() {
        let cadence = Cadence::Interval { seconds: 3600 };
        let check = cadence.check(None);
        assert!(check.should_run);
        assert!(check.next_run.is_some());
    }

    #[test]
    fn interval_waits_until_elapsed() {
        let cadence = Cadence::Interval { seconds: 3600 };
        let now = Utc::now();

        let overdue = cadence.check_at(Some(now - Duration::hours(2)), now);
        assert!(overdue.should_run);

        let fresh = cadence.check_at(Some(now - Duration::minutes(5)), now);
        assert!(!fresh.should_run);
        assert_eq!(fresh.next_run, Some(now + Duration::minutes(55)));
    }

    #[test]
    fn cron_schedules_a_future_run() {
        let cadence = Cadence::Cron { expression: "0 0 9 * * * *".to_string() };
        let check = cadence.check(Some(Utc::now()));
        assert!(check.should_run || check.next_run.is_some());
        assert!(cadence.next_after(Utc::now()).is_some());
    }

    #[test]
    fn cron_fires_when_a_tick_passed_since_last_run() {
        // Every-second expression: any gap since last_run contains a tick.
        let cadence = Cadence::Cron { expression: "* * * * * * *".to_string() };
        let now = Utc::now();
        let check = cadence.check_at(Some(now - Duration::minutes(1)), now);
        assert!(check.should_run);
    }

    #[test]
    fn invalid_cron_behaves_like_disabled() {
        let cadence = Cadence::Cron { expression: "not a cron".to_string() };
        let check = cadence.check(None);
        assert!(!check.should_run);
        assert!(check.next_run.is_none());
        assert!(!cadence.is_enabled());
    }

    #[test]
    fn cadence_round_trips_through_toml() {
        let cadence = Cadence::Cron { expression: "0 0 9 * * * *".to_string() };
        let text = toml::to_string(&cadence).unwrap();
        let parsed: Cadence = toml::from_str(&text).unwrap();
        assert_eq!(cadence, parsed);

        let interval: Cadence = toml::from_str("type = \"interval\"\nseconds = 900").unwrap();
        assert_eq!(interval, Cadence::Interval { seconds: 900 });
    }
}
