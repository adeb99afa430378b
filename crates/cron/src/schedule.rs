use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::{
    error::{Error, ErrorKind},
    ordinal::OrdinalSet,
    parsing::parse_field,
    time_unit::TimeUnit,
};

const FIELD_UNITS: [TimeUnit; 7] = [
    TimeUnit::Seconds,
    TimeUnit::Minutes,
    TimeUnit::Hours,
    TimeUnit::DaysOfMonth,
    TimeUnit::Months,
    TimeUnit::DaysOfWeek,
    TimeUnit::Years,
];

/// A parsed cron schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    source: String,
    seconds: OrdinalSet,
    minutes: OrdinalSet,
    hours: OrdinalSet,
    days_of_month: OrdinalSet,
    months: OrdinalSet,
    days_of_week: OrdinalSet,
    years: OrdinalSet,
}

impl Schedule {
    /// The first moment strictly after `after` that matches this schedule.
    ///
    /// Returns `None` when the schedule has no matching moment before the end of its year range.
    pub fn next_after(&self, after: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        let start = after.naive_utc().with_nanosecond(0)? + Duration::seconds(1);
        let mut candidate = start;
        let last_year = *self.years.iter().next_back()? as i32;

        // Calendars repeat every 28 years between 1901 and 2099. A year scanned in full without a
        // match rules out every later year at the same position of the cycle.
        let mut scanning_year = candidate.year();
        let mut exhausted_positions: u32 = 0;

        loop {
            if candidate.year() > last_year {
                return None;
            }
            if candidate.year() != scanning_year {
                if scanning_year != start.year() && self.years.contains(&(scanning_year as u32)) {
                    exhausted_positions |= 1 << calendar_position(scanning_year);
                }
                scanning_year = candidate.year();
            }
            if !self.years.contains(&(candidate.year() as u32))
                || exhausted_positions & (1 << calendar_position(candidate.year())) != 0
            {
                candidate = start_of_year(candidate.year() + 1)?;
                continue;
            }
            if !self.months.contains(&candidate.month()) {
                candidate = start_of_next_month(&candidate)?;
                continue;
            }
            if !self.days_of_month.contains(&candidate.day()) {
                candidate = match self.days_of_month.range(candidate.day() + 1..).next() {
                    Some(day) => match candidate.date().with_day(*day) {
                        Some(date) => start_of_day(&date)?,
                        None => start_of_next_month(&candidate)?,
                    },
                    None => start_of_next_month(&candidate)?,
                };
                continue;
            }
            let weekday = candidate.weekday().num_days_from_sunday();
            if !self.days_of_week.contains(&weekday) {
                candidate = start_of_day(&(candidate.date() + Duration::days(1)))?;
                continue;
            }
            if !self.hours.contains(&candidate.hour()) {
                candidate = truncate(&candidate, TimeUnit::Hours)? + Duration::hours(1);
                continue;
            }
            if !self.minutes.contains(&candidate.minute()) {
                candidate = truncate(&candidate, TimeUnit::Minutes)? + Duration::minutes(1);
                continue;
            }
            if !self.seconds.contains(&candidate.second()) {
                candidate += Duration::seconds(1);
                continue;
            }
            return Some(candidate.and_utc());
        }
    }

    /// Lazily yields matching moments after `after`.
    pub fn after<'a>(&'a self, after: &DateTime<Utc>) -> impl Iterator<Item = DateTime<Utc>> + 'a {
        let mut cursor = *after;
        std::iter::from_fn(move || {
            let next = self.next_after(&cursor)?;
            cursor = next;
            Some(next)
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

fn calendar_position(year: i32) -> u32 {
    year.rem_euclid(28) as u32
}

fn start_of_year(year: i32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)
}

fn start_of_next_month(moment: &NaiveDateTime) -> Option<NaiveDateTime> {
    let (year, month) = if moment.month() == 12 {
        (moment.year() + 1, 1)
    } else {
        (moment.year(), moment.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)
}

fn start_of_day(date: &NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}

fn truncate(moment: &NaiveDateTime, unit: TimeUnit) -> Option<NaiveDateTime> {
    match unit {
        TimeUnit::Hours => moment.date().and_hms_opt(moment.hour(), 0, 0),
        TimeUnit::Minutes => moment.date().and_hms_opt(moment.hour(), moment.minute(), 0),
        _ => Some(*moment),
    }
}

impl FromStr for Schedule {
    type Err = Error;

    fn from_str(expression: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = expression.split_whitespace().collect();
        if fields.len() != 6 && fields.len() != 7 {
            return Err(ErrorKind::FieldCount(fields.len()).into());
        }

        let mut sets = Vec::with_capacity(FIELD_UNITS.len());
        for (index, unit) in FIELD_UNITS.iter().enumerate() {
            let field = fields.get(index).copied().unwrap_or("*");
            sets.push(parse_field(field, *unit)?);
        }
        let mut sets = sets.into_iter();
        let mut next = || sets.next().unwrap_or_default();

        Ok(Schedule {
            source: expression.to_string(),
            seconds: next(),
            minutes: next(),
            hours: next(),
            days_of_month: next(),
            months: next(),
            days_of_week: next(),
            years: next(),
        })
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
