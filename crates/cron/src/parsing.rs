use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alphanumeric1, char, digit1},
    combinator::{all_consuming, map_res, opt},
    multi::separated_list1,
    sequence::preceded,
    IResult,
};

use crate::{
    error::{Error, ErrorKind},
    ordinal::{Ordinal, OrdinalSet},
    specifier::{RootSpecifier, Specifier},
    time_unit::TimeUnit,
};

fn step(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |digits: &str| digits.parse::<u32>())(input)
}

fn wildcard(input: &str) -> IResult<&str, &str> {
    alt((tag("*"), tag("?")))(input)
}

fn ordinal(input: &str, unit: TimeUnit) -> IResult<&str, Ordinal> {
    let (rest, token) = alphanumeric1(input)?;
    match unit.ordinal_from_token(token) {
        Some(ordinal) => Ok((rest, ordinal)),
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        ))),
    }
}

fn specifier(input: &str, unit: TimeUnit) -> IResult<&str, Specifier> {
    if let Ok((rest, _)) = wildcard(input) {
        return Ok((rest, Specifier::All));
    }
    let (rest, start) = ordinal(input, unit)?;
    let (rest, end) = opt(preceded(char('-'), |i| ordinal(i, unit)))(rest)?;
    match end {
        Some(end) => Ok((rest, Specifier::Range(start, end))),
        None => Ok((rest, Specifier::Point(start))),
    }
}

fn root_specifier(input: &str, unit: TimeUnit) -> IResult<&str, RootSpecifier> {
    let (rest, specifier) = specifier(input, unit)?;
    let (rest, period) = opt(preceded(char('/'), step))(rest)?;
    match period {
        Some(period) => Ok((rest, RootSpecifier::Period(specifier, period))),
        None => Ok((rest, RootSpecifier::Specifier(specifier))),
    }
}

fn root_specifiers(input: &str, unit: TimeUnit) -> IResult<&str, Vec<RootSpecifier>> {
    all_consuming(separated_list1(char(','), |i| root_specifier(i, unit)))(input)
}

/// Parses one field of an expression into the ordinals it matches.
pub(crate) fn parse_field(field: &str, unit: TimeUnit) -> Result<OrdinalSet, Error> {
    let (_, specifiers) = root_specifiers(field, unit).map_err(|_| {
        Error::from(ErrorKind::Expression(format!(
            "Invalid {} field: {}",
            unit.name(),
            field
        )))
    })?;
    unit.ordinals_from_root_specifiers(&specifiers)
}
