//! Parsers for user-typed numeric fields.
//!
//! Built on `winnow` 0.7. Spacing fields hold whitespace-separated positive
//! numbers (`"1 2 5 6"`); force value fields hold one number. Rejected input
//! never partially applies.

use crate::error::ValidationError;
use crate::grid::Spacings;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// Parse a whitespace-separated list of positive spacings.
pub fn parse_spacings(text: &str) -> Result<Spacings, ValidationError> {
    let mut rest = text;
    let mut values = Spacings::new();

    skip_ws(&mut rest);
    while !rest.is_empty() {
        let value = number_token(text, &mut rest)?;
        if !(value.is_finite() && value > 0.0) {
            return Err(ValidationError::InvalidSpacing { value });
        }
        values.push(value);
        skip_ws(&mut rest);
    }

    if values.is_empty() {
        return Err(ValidationError::Empty);
    }
    Ok(values)
}

/// Parse a single finite force value.
pub fn parse_force_value(text: &str) -> Result<f64, ValidationError> {
    let mut rest = text;
    skip_ws(&mut rest);
    if rest.is_empty() {
        return Err(ValidationError::Empty);
    }
    let value = number_token(text, &mut rest)?;
    skip_ws(&mut rest);
    if !rest.is_empty() {
        return Err(ValidationError::Malformed {
            input: text.to_string(),
            offset: text.len() - rest.len(),
        });
    }
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { value });
    }
    Ok(value)
}

/// One number that must end at whitespace or end of input.
fn number_token(text: &str, rest: &mut &str) -> Result<f64, ValidationError> {
    let offset = text.len() - rest.len();
    let malformed = || ValidationError::Malformed {
        input: text.to_string(),
        offset,
    };
    let value = parse_number.parse_next(rest).map_err(|_| malformed())?;
    if rest.chars().next().is_some_and(|c| !c.is_whitespace()) {
        return Err(malformed());
    }
    Ok(value)
}

fn skip_ws(input: &mut &str) {
    let _: Result<&str, ErrMode<ContextError>> =
        take_while(0.., char::is_whitespace).parse_next(input);
}

fn digits<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(0.., |c: char| c.is_ascii_digit()).parse_next(input)
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`, with at least one mantissa digit.
fn parse_number(input: &mut &str) -> ModalResult<f64> {
    let start = *input;
    if input.starts_with(['-', '+']) {
        *input = &input[1..];
    }
    let int_part = digits(input)?;
    let mut frac_part = "";
    if input.starts_with('.') {
        *input = &input[1..];
        frac_part = digits(input)?;
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    if input.starts_with(['e', 'E']) {
        *input = &input[1..];
        if input.starts_with(['-', '+']) {
            *input = &input[1..];
        }
        if digits(input)?.is_empty() {
            return Err(ErrMode::Backtrack(ContextError::new()));
        }
    }
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<f64>()
        .map_err(|_| ErrMode::Backtrack(ContextError::new()))
}
