//! Year-calendar grid generation for the frontend.
//!
//! Months are Sunday-first week grids with `None` padding cells, the layout
//! the calendar UI renders directly.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const WEEKDAY_LABELS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub day: u32,
    #[serde(rename = "isoDate")]
    pub iso_date: String,
    #[serde(rename = "isToday")]
    pub is_today: bool,
}

/// One week row, Sunday through Saturday; `None` cells pad the month edges.
pub type CalendarWeek = Vec<Option<CalendarDay>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub month: u32,
    pub title: String,
    pub weeks: Vec<CalendarWeek>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarYear {
    pub year: i32,
    pub months: Vec<CalendarMonth>,
}

#[derive(Debug, Error)]
pub enum YearParseError {
    #[error("year must be a number: {0:?}")]
    NotANumber(String),
    #[error("year must be a positive integer: {0:?}")]
    NotPositive(String),
}

/// Parse the `year` query parameter; absent or blank falls back to the
/// caller-supplied current year.
pub fn parse_year(value: Option<&str>, fallback_year: i32) -> Result<i32, YearParseError> {
    let Some(value) = value else {
        return Ok(fallback_year);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(fallback_year);
    }

    let year: i32 = trimmed
        .parse()
        .map_err(|_| YearParseError::NotANumber(value.to_string()))?;
    if year <= 0 {
        return Err(YearParseError::NotPositive(value.to_string()));
    }
    Ok(year)
}

/// Build the twelve-month grid for a year.
pub fn create_year_calendar(year: i32) -> CalendarYear {
    let today = Local::now().date_naive();
    CalendarYear {
        year,
        months: (1..=12).map(|month| create_month(year, month, today)).collect(),
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    // Day before the first of the next month.
    next.and_then(|d| d.pred_opt()).map(|d| d.day()).unwrap_or(0)
}

fn build_calendar_day(year: i32, month: u32, day: u32, today: NaiveDate) -> CalendarDay {
    let iso_date = format!("{year:04}-{month:02}-{day:02}");
    CalendarDay {
        day,
        is_today: today.year() == year && today.month() == month && today.day() == day,
        iso_date,
    }
}

fn create_month(year: i32, month: u32, today: NaiveDate) -> CalendarMonth {
    let title = format!("{year}年{month:02}月");
    let days = days_in_month(year, month);
    let first_weekday = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.weekday().num_days_from_sunday() as usize)
        .unwrap_or(0);

    let mut weeks: Vec<CalendarWeek> = Vec::new();
    let mut current_week: CalendarWeek = vec![None; 7];
    let mut weekday = first_weekday;

    for day in 1..=days {
        current_week[weekday] = Some(build_calendar_day(year, month, day, today));
        weekday += 1;
        if weekday == 7 {
            weeks.push(current_week);
            current_week = vec![None; 7];
            weekday = 0;
        }
    }
    if current_week.iter().any(Option::is_some) {
        weeks.push(current_week);
    }

    CalendarMonth {
        month,
        title,
        weeks,
    }
}
