use std::fmt::{Display, Formatter};

use time::{Date, Duration, Month, Weekday};

/// Day of week numbered 0=Monday .. 6=Sunday, the numbering used throughout
/// the hour-rule expansion algorithm. Distinct from `time::Weekday`, which
/// numbers from Monday=1.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn to_number(self) -> u8 {
        match self {
            DayOfWeek::Monday => 0,
            DayOfWeek::Tuesday => 1,
            DayOfWeek::Wednesday => 2,
            DayOfWeek::Thursday => 3,
            DayOfWeek::Friday => 4,
            DayOfWeek::Saturday => 5,
            DayOfWeek::Sunday => 6,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            0 => Some(DayOfWeek::Monday),
            1 => Some(DayOfWeek::Tuesday),
            2 => Some(DayOfWeek::Wednesday),
            3 => Some(DayOfWeek::Thursday),
            4 => Some(DayOfWeek::Friday),
            5 => Some(DayOfWeek::Saturday),
            6 => Some(DayOfWeek::Sunday),
            _ => None,
        }
    }
}

impl Display for DayOfWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DayOfWeek::Monday => "Monday",
                DayOfWeek::Tuesday => "Tuesday",
                DayOfWeek::Wednesday => "Wednesday",
                DayOfWeek::Thursday => "Thursday",
                DayOfWeek::Friday => "Friday",
                DayOfWeek::Saturday => "Saturday",
                DayOfWeek::Sunday => "Sunday",
            }
        )
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Monday => Self::Monday,
            Weekday::Tuesday => Self::Tuesday,
            Weekday::Wednesday => Self::Wednesday,
            Weekday::Thursday => Self::Thursday,
            Weekday::Friday => Self::Friday,
            Weekday::Saturday => Self::Saturday,
            Weekday::Sunday => Self::Sunday,
        }
    }
}

impl From<DayOfWeek> for Weekday {
    fn from(day_of_week: DayOfWeek) -> Self {
        match day_of_week {
            DayOfWeek::Monday => Self::Monday,
            DayOfWeek::Tuesday => Self::Tuesday,
            DayOfWeek::Wednesday => Self::Wednesday,
            DayOfWeek::Thursday => Self::Thursday,
            DayOfWeek::Friday => Self::Friday,
            DayOfWeek::Saturday => Self::Saturday,
            DayOfWeek::Sunday => Self::Sunday,
        }
    }
}

/// Weekday of `date`, numbered 0=Monday .. 6=Sunday.
pub fn weekday(date: Date) -> DayOfWeek {
    DayOfWeek::from(date.weekday())
}

/// Monday of the nominal week, using the pragmatic (non-ISO-8601) convention:
/// take the Monday on or before Jan 1 of `year`; if that Monday falls in the
/// previous year, advance by 7 days; then add `(week - 1) * 7` days.
///
/// This intentionally does not match `time::Date::from_iso_week_date` — week
/// 1 here is always the week containing or immediately following Jan 1, never
/// a week that starts in the prior year.
pub fn week_start(week: u32, year: i32) -> Date {
    let jan1 = Date::from_calendar_date(year, Month::January, 1)
        .expect("every year has a January 1st");
    let days_to_monday = jan1.weekday().number_days_from_monday() as i64;
    let mut first_monday = jan1 - Duration::days(days_to_monday);
    if first_monday.year() < year {
        first_monday += Duration::weeks(1);
    }
    first_monday + Duration::weeks(i64::from(week) - 1)
}

/// Ordered, deduplicated union of the 7 consecutive days starting at each
/// `week_start(week, year)` for `weeks`.
pub fn dates_for_weeks(weeks: &[u32], year: i32) -> Vec<Date> {
    let mut dates: Vec<Date> = weeks
        .iter()
        .flat_map(|&week| {
            let start = week_start(week, year);
            (0..7).map(move |offset| start + Duration::days(offset))
        })
        .collect();
    dates.sort();
    dates.dedup();
    dates
}

/// First-of-month to last-of-month, inclusive, handling the December ->
/// January year rollover.
pub fn month_range(year: i32, month: u8) -> (Date, Date) {
    let month = Month::try_from(month).expect("month must be 1..=12");
    let first = Date::from_calendar_date(year, month, 1).expect("valid first-of-month");
    let (next_year, next_month) = if month == Month::December {
        (year + 1, Month::January)
    } else {
        (year, month.next())
    };
    let next_first =
        Date::from_calendar_date(next_year, next_month, 1).expect("valid first-of-next-month");
    (first, next_first - Duration::days(1))
}
