// libs/scheduling-cell/src/models.rs
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

// ==============================================================================
// TIME OF DAY
// ==============================================================================

const MINUTES_PER_HOUR: u32 = 60;
const ISO_WEEKDAYS: std::ops::RangeInclusive<u8> = 1..=7;

/// Wall-clock time with minute precision, local to the provider.
///
/// Adding minutes never wraps around midnight, so a value past `23:59` is
/// only ever used as an upper bound while walking the slot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u32,
}

impl TimeOfDay {
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self, SchedulingError> {
        if hour > 23 || minute > 59 {
            return Err(SchedulingError::InvalidTime(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(Self { minutes: hour * MINUTES_PER_HOUR + minute })
    }

    /// Seconds are truncated.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self { minutes: time.hour() * MINUTES_PER_HOUR + time.minute() }
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.minutes
    }

    pub fn hour(&self) -> u32 {
        self.minutes / MINUTES_PER_HOUR
    }

    pub fn minute(&self) -> u32 {
        self.minutes % MINUTES_PER_HOUR
    }

    /// Returns `None` only on integer overflow.
    pub fn checked_add_minutes(self, minutes: u32) -> Option<Self> {
        self.minutes.checked_add(minutes).map(|minutes| Self { minutes })
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = SchedulingError;

    /// Accepts `HH:mm`, and `HH:mm:ss` as long as the seconds are zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map_err(|_| SchedulingError::InvalidTime(s.to_string()))?;

        if parsed.second() != 0 {
            return Err(SchedulingError::InvalidTime(s.to_string()));
        }

        Ok(Self::from_naive_time(parsed))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A bookable start time. Serializes as `HH:mm`.
pub type Slot = TimeOfDay;

// ==============================================================================
// APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Missed,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::Completed,
        AppointmentStatus::Missed,
    ];

    /// Statuses reachable in a single staff action.
    pub fn valid_transitions(&self) -> &'static [AppointmentStatus] {
        match self {
            AppointmentStatus::Pending => &[
                AppointmentStatus::Confirmed,
                AppointmentStatus::Cancelled,
            ],
            AppointmentStatus::Confirmed => &[
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::Missed,
            ],
            // Terminal states
            AppointmentStatus::Cancelled
            | AppointmentStatus::Completed
            | AppointmentStatus::Missed => &[],
        }
    }

    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        self.valid_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Missed => write!(f, "missed"),
        }
    }
}

/// Per-status totals. Every status is present, zero when unseen.
pub type StatusCounts = BTreeMap<AppointmentStatus, usize>;

/// Occupied wall-clock interval of a booking. Either bound may still be
/// missing on records that are being written.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentInterval {
    #[serde(default, deserialize_with = "wall_clock::deserialize")]
    pub start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "wall_clock::deserialize")]
    pub end: Option<NaiveDateTime>,
}

impl AppointmentInterval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start: Some(start), end: Some(end) }
    }

    /// `[start, end)` in minutes after midnight of the start's calendar day.
    /// An end on a later day therefore stays after the start.
    pub fn minute_bounds(&self) -> Option<(i64, i64)> {
        let (start, end) = (self.start?, self.end?);
        let start_minutes = i64::from(TimeOfDay::from_naive_time(start.time()).minutes_since_midnight());
        let day_start = start.date().and_time(NaiveTime::MIN);
        let end_minutes = (end - day_start).num_minutes();
        Some((start_minutes, end_minutes))
    }
}

/// Booking timestamps arrive either as offset-free wall-clock values
/// (`2024-03-04T08:00:00`) or as RFC 3339 (`2024-03-04T08:00:00+02:00`).
/// An offset is dropped and the local wall-clock reading kept.
mod wall_clock {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    fn parse(raw: &str) -> Option<NaiveDateTime> {
        raw.parse::<NaiveDateTime>()
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
        }
    }
}

/// An appointment as handed over by the store collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentRecord {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub status: AppointmentStatus,
    #[serde(default, deserialize_with = "wall_clock::deserialize")]
    pub start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "wall_clock::deserialize")]
    pub end: Option<NaiveDateTime>,
}

impl AppointmentRecord {
    pub fn interval(&self) -> AppointmentInterval {
        AppointmentInterval { start: self.start, end: self.end }
    }

    /// Calendar day the appointment starts on, if known.
    pub fn day(&self) -> Option<NaiveDate> {
        self.start.map(|start| start.date())
    }
}

// ==============================================================================
// WORKING HOURS
// ==============================================================================

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkingWindow {
    #[serde(default)]
    pub start_time: Option<TimeOfDay>,
    #[serde(default)]
    pub end_time: Option<TimeOfDay>,
}

impl WorkingWindow {
    pub fn open(start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self { start_time: Some(start_time), end_time: Some(end_time) }
    }

    pub fn closed() -> Self {
        Self::default()
    }

    /// Both times are needed to open the day.
    pub fn bounds(&self) -> Option<(TimeOfDay, TimeOfDay)> {
        Some((self.start_time?, self.end_time?))
    }
}

/// Weekly opening hours keyed by ISO weekday number (1 = Monday .. 7 = Sunday).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(
    try_from = "BTreeMap<u8, WorkingWindow>",
    into = "BTreeMap<u8, WorkingWindow>"
)]
pub struct WorkingHours {
    days: BTreeMap<u8, WorkingWindow>,
}

impl WorkingHours {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_day(mut self, weekday: u8, window: WorkingWindow) -> Result<Self, SchedulingError> {
        if !ISO_WEEKDAYS.contains(&weekday) {
            return Err(SchedulingError::InvalidWeekday(weekday));
        }
        self.days.insert(weekday, window);
        Ok(self)
    }

    pub fn window_for_weekday(&self, weekday: u8) -> Option<(TimeOfDay, TimeOfDay)> {
        self.days.get(&weekday).and_then(WorkingWindow::bounds)
    }

    pub fn window_for_date(&self, date: NaiveDate) -> Option<(TimeOfDay, TimeOfDay)> {
        // number_from_monday is always in 1..=7
        let weekday = date.weekday().number_from_monday() as u8;
        self.window_for_weekday(weekday)
    }
}

impl TryFrom<BTreeMap<u8, WorkingWindow>> for WorkingHours {
    type Error = SchedulingError;

    fn try_from(days: BTreeMap<u8, WorkingWindow>) -> Result<Self, Self::Error> {
        days.into_iter()
            .try_fold(Self::new(), |hours, (weekday, window)| hours.with_day(weekday, window))
    }
}

impl From<WorkingHours> for BTreeMap<u8, WorkingWindow> {
    fn from(hours: WorkingHours) -> Self {
        hours.days
    }
}

// ==============================================================================
// CALENDAR MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CalendarView {
    Month,
    Week,
    Day,
}

impl fmt::Display for CalendarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarView::Month => write!(f, "month"),
            CalendarView::Week => write!(f, "week"),
            CalendarView::Day => write!(f, "day"),
        }
    }
}

impl FromStr for CalendarView {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" => Ok(CalendarView::Month),
            "week" => Ok(CalendarView::Week),
            "day" => Ok(CalendarView::Day),
            other => Err(SchedulingError::UnsupportedView(other.to_string())),
        }
    }
}

/// Inclusive on both ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulingError {
    #[error("Slot duration must be a positive number of minutes, got {0}")]
    InvalidDuration(i32),

    #[error("Unsupported calendar view: {0}")]
    UnsupportedView(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Month index must be between 0 and 11, got {0}")]
    InvalidMonth(u32),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Weekday must be between 1 (Monday) and 7 (Sunday), got {0}")]
    InvalidWeekday(u8),

    #[error("Date range around {0} is not representable")]
    DateOutOfRange(NaiveDate),
}
