use crate::{
    error::{Error, ErrorKind},
    ordinal::{Ordinal, OrdinalSet},
    specifier::{RootSpecifier, Specifier},
};

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const WEEKDAY_NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// The fields of a cron expression, in expression order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    DaysOfMonth,
    Months,
    DaysOfWeek,
    Years,
}

impl TimeUnit {
    pub fn name(&self) -> &'static str {
        match self {
            TimeUnit::Seconds => "Seconds",
            TimeUnit::Minutes => "Minutes",
            TimeUnit::Hours => "Hours",
            TimeUnit::DaysOfMonth => "Days of Month",
            TimeUnit::Months => "Months",
            TimeUnit::DaysOfWeek => "Days of Week",
            TimeUnit::Years => "Years",
        }
    }

    pub fn inclusive_min(&self) -> Ordinal {
        match self {
            TimeUnit::Seconds | TimeUnit::Minutes | TimeUnit::Hours => 0,
            TimeUnit::DaysOfMonth | TimeUnit::Months => 1,
            TimeUnit::DaysOfWeek => 0,
            TimeUnit::Years => 1970,
        }
    }

    /// Sunday may be written as 0 or 7.
    pub fn inclusive_max(&self) -> Ordinal {
        match self {
            TimeUnit::Seconds | TimeUnit::Minutes => 59,
            TimeUnit::Hours => 23,
            TimeUnit::DaysOfMonth => 31,
            TimeUnit::Months => 12,
            TimeUnit::DaysOfWeek => 7,
            TimeUnit::Years => 2099,
        }
    }

    /// Resolves a numeric or named token to an ordinal of this unit.
    pub fn ordinal_from_token(&self, token: &str) -> Option<Ordinal> {
        if let Ok(value) = token.parse::<Ordinal>() {
            return Some(value);
        }
        let lowered = token.to_ascii_lowercase();
        let names: &[&str] = match self {
            TimeUnit::Months => &MONTH_NAMES,
            TimeUnit::DaysOfWeek => &WEEKDAY_NAMES,
            _ => return None,
        };
        let index = names.iter().position(|name| *name == lowered.as_str())? as Ordinal;
        match self {
            TimeUnit::Months => Some(index + 1),
            _ => Some(index),
        }
    }

    fn validate_ordinal(&self, ordinal: Ordinal) -> Result<Ordinal, Error> {
        if ordinal < self.inclusive_min() || ordinal > self.inclusive_max() {
            return Err(ErrorKind::Expression(format!(
                "{} must be between {} and {}, found {}",
                self.name(),
                self.inclusive_min(),
                self.inclusive_max(),
                ordinal
            ))
            .into());
        }
        Ok(ordinal)
    }

    fn bounds(&self, specifier: Specifier) -> Result<(Ordinal, Ordinal), Error> {
        match specifier {
            Specifier::All => Ok((self.inclusive_min(), self.inclusive_max())),
            Specifier::Point(point) => {
                let point = self.validate_ordinal(point)?;
                Ok((point, point))
            }
            Specifier::Range(start, end) => {
                let start = self.validate_ordinal(start)?;
                let end = self.validate_ordinal(end)?;
                if start > end {
                    return Err(ErrorKind::Expression(format!(
                        "{} range {}-{} is reversed",
                        self.name(),
                        start,
                        end
                    ))
                    .into());
                }
                Ok((start, end))
            }
        }
    }

    /// Expands a list of root specifiers into the set of ordinals they match.
    pub(crate) fn ordinals_from_root_specifiers(
        &self,
        specifiers: &[RootSpecifier],
    ) -> Result<OrdinalSet, Error> {
        let mut ordinals = OrdinalSet::new();
        for root in specifiers {
            match *root {
                RootSpecifier::Specifier(specifier) => {
                    let (start, end) = self.bounds(specifier)?;
                    ordinals.extend(start..=end);
                }
                RootSpecifier::Period(specifier, step) => {
                    if step == 0 {
                        return Err(ErrorKind::Expression(format!(
                            "{} step must be greater than zero",
                            self.name()
                        ))
                        .into());
                    }
                    // A bare point with a step runs from the point to the end of the unit.
                    let (start, end) = match specifier {
                        Specifier::Point(point) => {
                            (self.validate_ordinal(point)?, self.inclusive_max())
                        }
                        other => self.bounds(other)?,
                    };
                    ordinals.extend((start..=end).step_by(step as usize));
                }
            }
        }
        if *self == TimeUnit::DaysOfWeek && ordinals.remove(&7) {
            ordinals.insert(0);
        }
        Ok(ordinals)
    }
}
