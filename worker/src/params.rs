use serde::Deserialize;
use shared::dtos::fragment_query::FragmentQuery;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("{name}: `{value}` is not a decimal number")]
    NotDecimal { name: &'static str, value: String },

    #[error("{name}: `{value}` is not a finite number")]
    NonFinite { name: &'static str, value: String },

    #[error("{name}: `{value}` is not a positive integer")]
    NotCount { name: &'static str, value: String },

    #[error("{name} must be at least 1")]
    Zero { name: &'static str },

    #[error("{points} points requested, this node accepts at most {limit}")]
    TooLarge { points: u64, limit: u64 },
}

/// Compute parameters exactly as they arrived, before any validation.
///
/// Both the query-string and the positional-path routes deserialize into this.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFragmentQuery {
    pub min_re: String,
    pub min_im: String,
    pub max_re: String,
    pub max_im: String,
    pub col_count: String,
    pub row_count: String,
    pub max_iter: String,
}

impl RawFragmentQuery {
    pub fn parse(&self) -> Result<FragmentQuery, ParamError> {
        Ok(FragmentQuery {
            min_re: parse_decimal("min_re", &self.min_re)?,
            min_im: parse_decimal("min_im", &self.min_im)?,
            max_re: parse_decimal("max_re", &self.max_re)?,
            max_im: parse_decimal("max_im", &self.max_im)?,
            col_count: parse_count("col_count", &self.col_count)?,
            row_count: parse_count("row_count", &self.row_count)?,
            max_iter: parse_count("max_iter", &self.max_iter)?,
        })
    }
}

/// Accepts `[+-]?(digits[.digits?] | .digits)([eE][+-]?digits)?` and nothing else,
/// so spellings like `inf`, `NaN` or `0x10` never reach the float parser.
pub fn parse_decimal(name: &'static str, raw: &str) -> Result<f64, ParamError> {
    if !is_decimal(raw) {
        return Err(ParamError::NotDecimal {
            name,
            value: raw.to_string(),
        });
    }
    let value: f64 = raw.parse().map_err(|_| ParamError::NotDecimal {
        name,
        value: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ParamError::NonFinite {
            name,
            value: raw.to_string(),
        });
    }
    Ok(value)
}

pub fn parse_count(name: &'static str, raw: &str) -> Result<u32, ParamError> {
    let digits = raw.strip_prefix('+').unwrap_or(raw);
    let not_count = || ParamError::NotCount {
        name,
        value: raw.to_string(),
    };
    if digits.is_empty() || !all_digits(digits) {
        return Err(not_count());
    }
    match digits.parse::<u32>() {
        Ok(0) => Err(ParamError::Zero { name }),
        Ok(count) => Ok(count),
        Err(_) => Err(not_count()),
    }
}

fn is_decimal(raw: &str) -> bool {
    let unsigned = strip_sign(raw);
    let (mantissa, exponent) = match unsigned.find(&['e', 'E'][..]) {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa, ""),
    };

    let mantissa_ok = all_digits(int_part)
        && all_digits(frac_part)
        && !(int_part.is_empty() && frac_part.is_empty());
    let exponent_ok = exponent.map_or(true, |exponent| {
        let digits = strip_sign(exponent);
        !digits.is_empty() && all_digits(digits)
    });

    mantissa_ok && exponent_ok
}

fn strip_sign(raw: &str) -> &str {
    raw.strip_prefix(&['+', '-'][..]).unwrap_or(raw)
}

fn all_digits(part: &str) -> bool {
    part.bytes().all(|b| b.is_ascii_digit())
}
