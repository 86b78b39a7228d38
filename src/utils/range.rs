use crate::core::ValueRange;
use crate::error::AppError;

fn invalid(input: &str, reason: &str) -> AppError {
    AppError::InvalidRange {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

/// Split "MIN..MAX" into optional bounds; either side may be left empty
fn split_bounds(input: &str) -> Result<(Option<&str>, Option<&str>), AppError> {
    let (lo, hi) = input
        .trim()
        .split_once("..")
        .ok_or_else(|| invalid(input, "expected MIN..MAX, MIN.. or ..MAX"))?;
    Ok((non_empty(lo), non_empty(hi)))
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

pub(crate) fn parse_f64_range(input: &str) -> Result<ValueRange<f64>, AppError> {
    let (lo, hi) = split_bounds(input)?;
    let parse = |s: Option<&str>, open: f64| -> Result<f64, AppError> {
        match s {
            None => Ok(open),
            Some(v) => match v.parse::<f64>() {
                Ok(n) if !n.is_nan() => Ok(n),
                _ => Err(invalid(input, "bounds must be numbers")),
            },
        }
    };
    let min = parse(lo, f64::NEG_INFINITY)?;
    let max = parse(hi, f64::INFINITY)?;
    ValueRange::new(min, max).map_err(|_| invalid(input, "min must not exceed max"))
}

pub(crate) fn parse_u64_range(input: &str) -> Result<ValueRange<u64>, AppError> {
    let (lo, hi) = split_bounds(input)?;
    let parse = |s: Option<&str>, open: u64| -> Result<u64, AppError> {
        match s {
            None => Ok(open),
            Some(v) => v
                .parse::<u64>()
                .map_err(|_| invalid(input, "bounds must be non-negative integers")),
        }
    };
    let min = parse(lo, 0)?;
    let max = parse(hi, u64::MAX)?;
    ValueRange::new(min, max).map_err(|_| invalid(input, "min must not exceed max"))
}
