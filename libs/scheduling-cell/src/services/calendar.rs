// libs/scheduling-cell/src/services/calendar.rs
use chrono::{Datelike, Days, NaiveDate};
use tracing::debug;

use crate::models::{CalendarView, DateRange, SchedulingError};

/// Resolve the inclusive fetch window for a calendar view tag.
///
/// `selected_month` is zero-based. Only the `month` view reads month and
/// year, the other views work from `selected_day` alone.
pub fn resolve_date_range(
    view: &str,
    selected_day: NaiveDate,
    selected_month: u32,
    selected_year: i32,
) -> Result<DateRange, SchedulingError> {
    let view: CalendarView = view.parse()?;
    range_for_view(view, selected_day, selected_month, selected_year)
}

pub fn range_for_view(
    view: CalendarView,
    selected_day: NaiveDate,
    selected_month: u32,
    selected_year: i32,
) -> Result<DateRange, SchedulingError> {
    let range = match view {
        CalendarView::Month => month_range(selected_month, selected_year)?,
        CalendarView::Week => week_range(selected_day)?,
        CalendarView::Day => DateRange {
            start: selected_day,
            end: selected_day,
        },
    };

    debug!("Resolved {} view to {} .. {}", view, range.start, range.end);
    Ok(range)
}

fn month_range(month0: u32, year: i32) -> Result<DateRange, SchedulingError> {
    if month0 > 11 {
        return Err(SchedulingError::InvalidMonth(month0));
    }

    let start = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .ok_or(SchedulingError::InvalidMonth(month0))?;

    // Day zero of the following month.
    let (next_year, next_month) = if month0 == 11 { (year + 1, 1) } else { (year, month0 + 2) };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .ok_or(SchedulingError::DateOutOfRange(start))?;

    Ok(DateRange { start, end })
}

/// Sunday through Saturday around `day`.
fn week_range(day: NaiveDate) -> Result<DateRange, SchedulingError> {
    let offset = u64::from(day.weekday().num_days_from_sunday());

    let start = day
        .checked_sub_days(Days::new(offset))
        .ok_or(SchedulingError::DateOutOfRange(day))?;
    let end = start
        .checked_add_days(Days::new(6))
        .ok_or(SchedulingError::DateOutOfRange(day))?;

    Ok(DateRange { start, end })
}
