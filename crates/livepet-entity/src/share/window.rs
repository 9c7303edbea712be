//! Allowed share lifetimes.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// A grant lifetime chosen from a fixed set of windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ExpirationWindow {
    /// 1 hour.
    OneHour,
    /// 6 hours.
    SixHours,
    /// 12 hours.
    TwelveHours,
    /// 24 hours.
    #[default]
    OneDay,
    /// 48 hours.
    TwoDays,
    /// 72 hours.
    ThreeDays,
    /// 168 hours.
    OneWeek,
    /// 720 hours.
    ThirtyDays,
}

impl ExpirationWindow {
    /// Every accepted window, shortest first.
    pub const ALL: [Self; 8] = [
        Self::OneHour,
        Self::SixHours,
        Self::TwelveHours,
        Self::OneDay,
        Self::TwoDays,
        Self::ThreeDays,
        Self::OneWeek,
        Self::ThirtyDays,
    ];

    /// Length of the window in hours.
    pub fn hours(self) -> u32 {
        match self {
            Self::OneHour => 1,
            Self::SixHours => 6,
            Self::TwelveHours => 12,
            Self::OneDay => 24,
            Self::TwoDays => 48,
            Self::ThreeDays => 72,
            Self::OneWeek => 168,
            Self::ThirtyDays => 720,
        }
    }

    /// Length of the window as a duration.
    pub fn duration(self) -> Duration {
        Duration::hours(i64::from(self.hours()))
    }
}

impl TryFrom<u32> for ExpirationWindow {
    type Error = String;

    fn try_from(hours: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|w| w.hours() == hours)
            .ok_or_else(|| {
                format!("Unsupported expiration window: {hours} hours (allowed: 1, 6, 12, 24, 48, 72, 168, 720)")
            })
    }
}

impl From<ExpirationWindow> for u32 {
    fn from(window: ExpirationWindow) -> u32 {
        window.hours()
    }
}

impl fmt::Display for ExpirationWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} hours", self.hours())
    }
}
