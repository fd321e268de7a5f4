//! Typed reading of the input cell.

use calamine::{Data, Range};
use std::fmt;

use super::errors::ValidationFailure;

/// Largest magnitude at which every integer is exactly representable as an f64 (2^53)
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A numeric cell value with its subtype preserved.
///
/// xlsx stores every number as an IEEE double, so a stored value with no fractional part
/// inside the exactly-representable range is treated as an integer. Formats with native
/// integers (reported by calamine as `Data::Int`) are integers as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellNumber {
    Integer(i64),
    Float(f64),
}

impl CellNumber {
    /// Classify a raw cell. `None` means the cell is not numeric.
    pub fn from_data(data: &Data) -> Option<Self> {
        match data {
            Data::Int(i) => Some(CellNumber::Integer(*i)),
            Data::Float(f) => Some(Self::from_f64(*f)),
            _ => None,
        }
    }

    fn from_f64(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
            CellNumber::Integer(value as i64)
        } else {
            CellNumber::Float(value)
        }
    }

    /// Twice this value, in the same subtype
    pub fn doubled(self) -> Result<Self, ValidationFailure> {
        match self {
            CellNumber::Integer(i) => i
                .checked_mul(2)
                .map(CellNumber::Integer)
                .ok_or(ValidationFailure::Overflow { value: i }),
            CellNumber::Float(f) => Ok(CellNumber::Float(f * 2.0)),
        }
    }

    /// Value as written to a worksheet (spreadsheet numbers are doubles)
    pub fn as_f64(self) -> f64 {
        match self {
            CellNumber::Integer(i) => i as f64,
            CellNumber::Float(f) => f,
        }
    }
}

impl fmt::Display for CellNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellNumber::Integer(i) => write!(f, "{i}"),
            CellNumber::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Result of reading the input cell: a usable number or the reason it is unusable
#[derive(Debug, Clone, PartialEq)]
pub enum A1Outcome {
    Number(CellNumber),
    Invalid(ValidationFailure),
}

impl A1Outcome {
    pub fn into_result(self) -> Result<CellNumber, ValidationFailure> {
        match self {
            A1Outcome::Number(n) => Ok(n),
            A1Outcome::Invalid(failure) => Err(failure),
        }
    }
}

/// Read cell A1 (absolute row 0, column 0) from a worksheet range.
///
/// A range whose used area starts past A1 simply has no value there, which reads as empty.
pub fn read_a1(range: &Range<Data>) -> A1Outcome {
    match range.get_value((0, 0)) {
        None | Some(Data::Empty) => A1Outcome::Invalid(ValidationFailure::Empty),
        Some(data) => match CellNumber::from_data(data) {
            Some(number) => A1Outcome::Number(number),
            None => A1Outcome::Invalid(ValidationFailure::NotNumeric {
                found: describe(data),
            }),
        },
    }
}

// Text is quoted so leading/trailing whitespace stays visible in the message. Dates are stored
// as day serials, so printing the raw value would look like a number.
fn describe(data: &Data) -> String {
    match data {
        Data::String(s) => format!("{s:?}"),
        Data::DateTime(dt) if dt.is_duration() => "a duration".to_string(),
        Data::DateTime(_) => "a date".to_string(),
        Data::DateTimeIso(s) => format!("a date ({s})"),
        Data::DurationIso(s) => format!("a duration ({s})"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    fn range_with(a1: Data) -> Range<Data> {
        let mut range = Range::new((0, 0), (0, 0));
        range.set_value((0, 0), a1);
        range
    }

    #[test]
    fn test_integral_float_reads_as_integer() {
        assert_eq!(CellNumber::from_data(&Data::Float(21.0)), Some(CellNumber::Integer(21)));
        assert_eq!(CellNumber::from_data(&Data::Float(-4.0)), Some(CellNumber::Integer(-4)));
    }

    #[test]
    fn test_fractional_float_stays_float() {
        assert_eq!(CellNumber::from_data(&Data::Float(2.5)), Some(CellNumber::Float(2.5)));
    }

    #[test]
    fn test_huge_float_stays_float() {
        assert_eq!(CellNumber::from_data(&Data::Float(1e20)), Some(CellNumber::Float(1e20)));
    }

    #[test]
    fn test_native_int() {
        assert_eq!(CellNumber::from_data(&Data::Int(7)), Some(CellNumber::Integer(7)));
    }

    #[test]
    fn test_non_numeric_data() {
        assert_eq!(CellNumber::from_data(&Data::String("3".to_string())), None);
        assert_eq!(CellNumber::from_data(&Data::Bool(true)), None);
        assert_eq!(CellNumber::from_data(&Data::Empty), None);
    }

    #[test]
    fn test_doubling_preserves_subtype() {
        assert_eq!(CellNumber::Integer(21).doubled(), Ok(CellNumber::Integer(42)));
        assert_eq!(CellNumber::Float(1.25).doubled(), Ok(CellNumber::Float(2.5)));
        assert_eq!(CellNumber::Integer(-3).doubled(), Ok(CellNumber::Integer(-6)));
    }

    #[test]
    fn test_doubling_overflow() {
        assert_eq!(
            CellNumber::Integer(i64::MAX).doubled(),
            Err(ValidationFailure::Overflow { value: i64::MAX })
        );
    }

    #[test]
    fn test_read_a1_number() {
        assert_eq!(read_a1(&range_with(Data::Float(21.0))), A1Outcome::Number(CellNumber::Integer(21)));
    }

    #[test]
    fn test_read_a1_empty() {
        assert_eq!(read_a1(&range_with(Data::Empty)), A1Outcome::Invalid(ValidationFailure::Empty));
        assert_eq!(read_a1(&Range::empty()), A1Outcome::Invalid(ValidationFailure::Empty));
    }

    #[test]
    fn test_read_a1_outside_used_range_is_empty() {
        let mut range = Range::new((2, 1), (2, 1));
        range.set_value((2, 1), Data::Float(5.0));
        assert_eq!(read_a1(&range), A1Outcome::Invalid(ValidationFailure::Empty));
    }

    #[test]
    fn test_read_a1_text_mentions_value() {
        let outcome = read_a1(&range_with(Data::String("hello".to_string())));
        let failure = outcome.into_result().unwrap_err();
        assert_eq!(
            failure,
            ValidationFailure::NotNumeric {
                found: "\"hello\"".to_string()
            }
        );
        assert!(failure.to_string().contains("hello"));
    }

    #[test]
    fn test_read_a1_date_is_labelled() {
        let date = ExcelDateTime::new(45293.0, ExcelDateTimeType::DateTime, false);
        let failure = read_a1(&range_with(Data::DateTime(date))).into_result().unwrap_err();
        assert_eq!(failure.to_string(), "Cell A1 must be a number. Got: a date");

        let duration = ExcelDateTime::new(1.5, ExcelDateTimeType::TimeDelta, false);
        let failure = read_a1(&range_with(Data::DateTime(duration))).into_result().unwrap_err();
        assert_eq!(failure.to_string(), "Cell A1 must be a number. Got: a duration");

        let iso = read_a1(&range_with(Data::DateTimeIso("2024-01-03T00:00:00".to_string())));
        assert_eq!(
            iso.into_result().unwrap_err().to_string(),
            "Cell A1 must be a number. Got: a date (2024-01-03T00:00:00)"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(CellNumber::Integer(42).to_string(), "42");
        assert_eq!(CellNumber::Float(2.5).to_string(), "2.5");
    }
}
