//! Persisted UI preferences.
//!
//! Holds only what the dashboard needs between sessions: the selected
//! display currency, the selected date range and the premium flag. The
//! premium flag is a hint refreshed from the subscription endpoint;
//! last write wins, nothing is merged.

use std::{fs, path::Path};

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

const DEFAULT_STATE_PATH: &str = "config/client_state.json";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PreferredCurrency {
    #[default]
    Inr,
    Usd,
    Eur,
}

/// The dashboard's date window selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "preset", rename_all = "snake_case")]
pub enum DateRangeSelection {
    #[default]
    ThisMonth,
    LastMonth,
    LastThreeMonths,
    ThisYear,
    Custom {
        from: NaiveDate,
        /// Inclusive end date as shown in the picker.
        to: NaiveDate,
    },
}

impl DateRangeSelection {
    /// Resolves the selection to a `[from, to)` UTC window, interpreting
    /// calendar boundaries in the user's timezone.
    pub fn resolve(self, timezone: &str, today: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| AppError::Invalid(format!("unknown timezone: {timezone}")))?;
        let local_today = today.with_timezone(&tz).date_naive();

        let (start, end) = match self {
            Self::ThisMonth => {
                let start = first_of_month(local_today);
                (start, next_month(start))
            }
            Self::LastMonth => {
                let this = first_of_month(local_today);
                (previous_month(this), this)
            }
            Self::LastThreeMonths => {
                let this = first_of_month(local_today);
                let start = previous_month(previous_month(previous_month(this)));
                (start, next_month(this))
            }
            Self::ThisYear => {
                let start = NaiveDate::from_ymd_opt(local_today.year(), 1, 1)
                    .ok_or_else(|| AppError::Invalid("invalid year start".to_string()))?;
                let end = NaiveDate::from_ymd_opt(local_today.year() + 1, 1, 1)
                    .ok_or_else(|| AppError::Invalid("invalid year end".to_string()))?;
                (start, end)
            }
            Self::Custom { from, to } => {
                if to < from {
                    return Err(AppError::Invalid(
                        "custom range end precedes start".to_string(),
                    ));
                }
                (from, to + chrono::Days::new(1))
            }
        };

        Ok((day_start_utc(&tz, start)?, day_start_utc(&tz, end)?))
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn next_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(first)
}

fn previous_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 1 {
        (first.year() - 1, 12)
    } else {
        (first.year(), first.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(first)
}

fn day_start_utc(tz: &Tz, date: NaiveDate) -> Result<DateTime<Utc>> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::Invalid("invalid date".to_string()))?;
    let local = tz
        .from_local_datetime(&midnight)
        .earliest()
        .ok_or_else(|| AppError::Invalid("ambiguous local midnight".to_string()))?;
    Ok(local.with_timezone(&Utc))
}

/// Premium gate hint as last reported by the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumFlag {
    pub premium: bool,
    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub currency: PreferredCurrency,
    pub date_range: DateRangeSelection,
    pub premium: PremiumFlag,
}

impl Preferences {
    /// Loads preferences, returning defaults when the file is missing.
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    /// Overwrites the premium hint with the server's latest answer.
    pub fn set_premium(&mut self, premium: bool, refreshed_at: DateTime<Utc>) {
        self.premium = PremiumFlag {
            premium,
            refreshed_at: Some(refreshed_at),
        };
    }
}

pub fn default_state_path() -> &'static str {
    DEFAULT_STATE_PATH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferences_survive_a_save_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("fintrack-prefs-{}", std::process::id()));
        let path = dir.join("state.json");
        let path = path.to_string_lossy().to_string();

        let mut prefs = Preferences {
            currency: PreferredCurrency::Usd,
            date_range: DateRangeSelection::LastMonth,
            premium: PremiumFlag::default(),
        };
        prefs.set_premium(true, Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap());
        prefs.save(&path).unwrap();

        let loaded = Preferences::load(&path).unwrap();
        assert_eq!(loaded, prefs);
        assert!(loaded.premium.premium);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_file_loads_defaults() {
        let loaded = Preferences::load("definitely/not/here.json").unwrap();
        assert_eq!(loaded, Preferences::default());
    }

    #[test]
    fn this_month_resolves_in_the_user_timezone() {
        let today = Utc.with_ymd_and_hms(2026, 7, 15, 12, 0, 0).unwrap();
        let (from, to) = DateRangeSelection::ThisMonth
            .resolve("Asia/Kolkata", today)
            .unwrap();
        // Midnight IST is 18:30 UTC the previous day.
        assert_eq!(from, Utc.with_ymd_and_hms(2026, 6, 30, 18, 30, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2026, 7, 31, 18, 30, 0).unwrap());
        assert!(from < to);
    }

    #[test]
    fn custom_range_is_inclusive_of_the_end_day() {
        let today = Utc.with_ymd_and_hms(2026, 7, 15, 12, 0, 0).unwrap();
        let selection = DateRangeSelection::Custom {
            from: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2026, 7, 10).unwrap(),
        };
        let (from, to) = selection.resolve("UTC", today).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2026, 7, 11, 0, 0, 0).unwrap());
    }

    #[test]
    fn inverted_custom_range_is_rejected() {
        let today = Utc.with_ymd_and_hms(2026, 7, 15, 12, 0, 0).unwrap();
        let selection = DateRangeSelection::Custom {
            from: NaiveDate::from_ymd_opt(2026, 7, 10).unwrap(),
            to: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
        };
        assert!(selection.resolve("UTC", today).is_err());
    }
}
