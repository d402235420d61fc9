use dao::DaoError;
use time::{format_description::FormatItem, macros::format_description, Date, Time};

use crate::ResultDbErrorExt;

const DATE_FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[FormatItem<'_>] = format_description!("[hour]:[minute]:[second]");

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).expect("date always formats")
}

pub fn parse_date(value: &str) -> Result<Date, DaoError> {
    Date::parse(value, DATE_FORMAT).map_db_error()
}

pub fn format_time(time: Time) -> String {
    time.format(TIME_FORMAT).expect("time always formats")
}

pub fn parse_time(value: &str) -> Result<Time, DaoError> {
    Time::parse(value, TIME_FORMAT).map_db_error()
}
