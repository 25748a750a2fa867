// libs/scheduling-cell/tests/calendar_range_test.rs

use assert_matches::assert_matches;
use chrono::{Datelike, NaiveDate, Weekday};

use scheduling_cell::models::{CalendarView, DateRange, SchedulingError};
use scheduling_cell::services::{range_for_view, resolve_date_range};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn test_day_view_is_single_day() {
    let day = date(2024, 7, 17);
    let range = resolve_date_range("day", day, 0, 1999).unwrap();
    assert_eq!(range, DateRange { start: day, end: day });
    assert_eq!(range.num_days(), 1);
}

#[test]
fn test_week_view_runs_sunday_to_saturday() {
    // Wednesday
    let range = resolve_date_range("week", date(2024, 7, 17), 6, 2024).unwrap();
    assert_eq!(range.start, date(2024, 7, 14));
    assert_eq!(range.end, date(2024, 7, 20));
}

#[test]
fn test_week_view_on_sunday_starts_same_day() {
    let sunday = date(2024, 7, 14);
    let range = resolve_date_range("week", sunday, 6, 2024).unwrap();
    assert_eq!(range.start, sunday);
}

#[test]
fn test_week_view_crosses_year_boundary() {
    // Wednesday 1 January 2025
    let range = resolve_date_range("week", date(2025, 1, 1), 0, 2025).unwrap();
    assert_eq!(range.start, date(2024, 12, 29));
    assert_eq!(range.end, date(2025, 1, 4));
}

#[test]
fn test_week_view_always_seven_days_from_sunday() {
    let mut day = date(2023, 12, 1);
    while day < date(2024, 3, 1) {
        let range = range_for_view(CalendarView::Week, day, 0, 0).unwrap();
        assert_eq!(range.start.weekday(), Weekday::Sun);
        assert_eq!(range.num_days(), 7);
        assert!(range.contains(day));
        day = day.succ_opt().unwrap();
    }
}

#[test]
fn test_month_view_leap_february() {
    let range = resolve_date_range("month", date(2024, 6, 1), 1, 2024).unwrap();
    assert_eq!(range.start, date(2024, 2, 1));
    assert_eq!(range.end, date(2024, 2, 29));
}

#[test]
fn test_month_view_common_february() {
    let range = resolve_date_range("month", date(2023, 6, 1), 1, 2023).unwrap();
    assert_eq!(range.end, date(2023, 2, 28));
}

#[test]
fn test_month_view_december_rolls_year() {
    let range = resolve_date_range("month", date(2024, 12, 5), 11, 2024).unwrap();
    assert_eq!(range.start, date(2024, 12, 1));
    assert_eq!(range.end, date(2024, 12, 31));
}

#[test]
fn test_month_view_ignores_selected_day() {
    let range = resolve_date_range("month", date(2030, 1, 1), 3, 2024).unwrap();
    assert_eq!(range, DateRange { start: date(2024, 4, 1), end: date(2024, 4, 30) });
}

#[test]
fn test_month_view_ends_on_last_day_for_every_month() {
    let expected = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    for (month0, last_day) in expected.iter().enumerate() {
        let range = resolve_date_range("month", date(2024, 1, 1), month0 as u32, 2024).unwrap();
        assert_eq!(range.end.day(), *last_day);
        assert_eq!(range.end.month0(), month0 as u32);
    }
}

#[test]
fn test_month_out_of_range_is_rejected() {
    assert_matches!(
        resolve_date_range("month", date(2024, 1, 1), 12, 2024),
        Err(SchedulingError::InvalidMonth(12))
    );
}

#[test]
fn test_unknown_view_is_rejected() {
    assert_matches!(
        resolve_date_range("agenda", date(2024, 1, 1), 0, 2024),
        Err(SchedulingError::UnsupportedView(tag)) if tag == "agenda"
    );
    assert_matches!(
        resolve_date_range("Month", date(2024, 1, 1), 0, 2024),
        Err(SchedulingError::UnsupportedView(_))
    );
}

#[test]
fn test_week_before_first_representable_day_is_rejected() {
    // NaiveDate::MIN is not a Sunday, so its week starts before the calendar does.
    assert_matches!(
        resolve_date_range("week", NaiveDate::MIN, 0, 0),
        Err(SchedulingError::DateOutOfRange(day)) if day == NaiveDate::MIN
    );
}

#[test]
fn test_week_after_last_representable_day_is_rejected() {
    assert_matches!(
        resolve_date_range("week", NaiveDate::MAX, 0, 0),
        Err(SchedulingError::DateOutOfRange(_))
    );
}

#[test]
fn test_month_with_unrepresentable_year_is_rejected() {
    assert_matches!(
        resolve_date_range("month", date(2024, 1, 1), 0, 300_000),
        Err(SchedulingError::InvalidMonth(0))
    );
}

#[test]
fn test_month_without_following_month_is_rejected() {
    let last_year = NaiveDate::MAX.year();
    assert_matches!(
        resolve_date_range("month", date(2024, 1, 1), 11, last_year),
        Err(SchedulingError::DateOutOfRange(start)) if start == date(last_year, 12, 1)
    );
}
