// libs/scheduling-cell/src/services/slots.rs
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::{
    AppointmentInterval, AppointmentRecord, SchedulingError, Slot, TimeOfDay, WorkingHours,
};
use crate::services::lifecycle::AppointmentLifecycleService;

/// Fixed-grid slot walker for one provider window.
///
/// Construction validates the inputs once; every call to [`SlotGenerator::iter`]
/// starts a fresh, lazy pass over the grid.
#[derive(Debug, Clone)]
pub struct SlotGenerator {
    duration_minutes: u32,
    window_start: TimeOfDay,
    window_end: TimeOfDay,
    booked: Vec<(i64, i64)>,
}

impl SlotGenerator {
    pub fn new(
        duration_minutes: i32,
        window_start: TimeOfDay,
        window_end: TimeOfDay,
        existing_appointments: &[AppointmentInterval],
    ) -> Result<Self, SchedulingError> {
        let duration = u32::try_from(duration_minutes)
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or_else(|| {
                warn!("Rejected slot duration of {} minutes", duration_minutes);
                SchedulingError::InvalidDuration(duration_minutes)
            })?;

        let booked: Vec<(i64, i64)> = existing_appointments
            .iter()
            .filter_map(AppointmentInterval::minute_bounds)
            .collect();

        let skipped = existing_appointments.len() - booked.len();
        if skipped > 0 {
            debug!("Ignoring {} appointment(s) without both start and end", skipped);
        }

        debug!(
            "Slot grid {}-{} every {} minutes against {} booking(s)",
            window_start, window_end, duration, booked.len()
        );

        Ok(Self {
            duration_minutes: duration,
            window_start,
            window_end,
            booked,
        })
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn iter(&self) -> Slots<'_> {
        Slots {
            generator: self,
            cursor: Some(self.window_start),
        }
    }

    /// Whether a candidate starting at `start` fits the window and clears
    /// every booking.
    pub fn is_available(&self, start: TimeOfDay) -> bool {
        let candidate_start = i64::from(start.minutes_since_midnight());
        let candidate_end = candidate_start + i64::from(self.duration_minutes);

        if candidate_start < i64::from(self.window_start.minutes_since_midnight())
            || candidate_end > i64::from(self.window_end.minutes_since_midnight())
        {
            return false;
        }

        !self.booked.iter().any(|&(booked_start, booked_end)| {
            conflicts(candidate_start, candidate_end, booked_start, booked_end)
        })
    }
}

impl<'a> IntoIterator for &'a SlotGenerator {
    type Item = Slot;
    type IntoIter = Slots<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Slots<'a> {
    generator: &'a SlotGenerator,
    cursor: Option<TimeOfDay>,
}

impl Iterator for Slots<'_> {
    type Item = Slot;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let cursor = self.cursor?;
            if cursor > self.generator.window_end {
                self.cursor = None;
                return None;
            }

            // The grid advances whether or not the candidate is free.
            self.cursor = cursor.checked_add_minutes(self.generator.duration_minutes);

            if self.generator.is_available(cursor) {
                return Some(cursor);
            }
        }
    }
}

/// A candidate `[start, end)` is rejected when it begins inside a booking,
/// ends inside or exactly at a booking's close, shares a start or an end
/// with it, or swallows it whole. Back-to-back placement is allowed.
fn conflicts(start: i64, end: i64, booked_start: i64, booked_end: i64) -> bool {
    let begins_inside = booked_start <= start && start < booked_end;
    let ends_inside = booked_start < end && end <= booked_end;
    let encloses = start < booked_start && booked_end < end;

    begins_inside || ends_inside || start == booked_start || end == booked_end || encloses
}

/// Build the slot sequence for a working window.
pub fn generate_slots(
    duration_minutes: i32,
    window_start: TimeOfDay,
    window_end: TimeOfDay,
    existing_appointments: &[AppointmentInterval],
) -> Result<SlotGenerator, SchedulingError> {
    SlotGenerator::new(duration_minutes, window_start, window_end, existing_appointments)
}

/// Single-candidate check used when re-validating a booking request.
pub fn is_slot_available(
    duration_minutes: i32,
    start: TimeOfDay,
    window_start: TimeOfDay,
    window_end: TimeOfDay,
    existing_appointments: &[AppointmentInterval],
) -> Result<bool, SchedulingError> {
    let generator = SlotGenerator::new(duration_minutes, window_start, window_end, existing_appointments)?;
    Ok(generator.is_available(start))
}

/// Free slots for `date`, using the weekday's working window and only the
/// records whose status still occupies the calendar.
///
/// Records starting on another day, or with no start at all, are ignored.
pub fn available_slots_for_day(
    duration_minutes: i32,
    date: NaiveDate,
    working_hours: &WorkingHours,
    records: &[AppointmentRecord],
    today: NaiveDate,
) -> Result<Vec<Slot>, SchedulingError> {
    if duration_minutes <= 0 {
        warn!("Rejected slot duration of {} minutes", duration_minutes);
        return Err(SchedulingError::InvalidDuration(duration_minutes));
    }

    let Some((window_start, window_end)) = working_hours.window_for_date(date) else {
        debug!("No working window on {}", date);
        return Ok(Vec::new());
    };

    let lifecycle = AppointmentLifecycleService::new();
    let blocking: Vec<AppointmentInterval> = records
        .iter()
        .filter(|record| record.day() == Some(date))
        .filter(|record| lifecycle.blocks_calendar(record.status, date, today))
        .map(AppointmentRecord::interval)
        .collect();

    debug!(
        "{} of {} record(s) block the calendar on {}",
        blocking.len(),
        records.len(),
        date
    );

    let generator = SlotGenerator::new(duration_minutes, window_start, window_end, &blocking)?;
    Ok(generator.iter().collect())
}
