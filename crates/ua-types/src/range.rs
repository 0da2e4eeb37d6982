//! Index ranges over array values.
//!
//! The text form is either a single index (`"3"`) or an inclusive span
//! (`"1:4"`, low strictly less than high). Multi-dimensional ranges are not
//! supported and fail to parse.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::status::StatusCode;
use crate::variant::Variant;

/// A parsed index range. A `Span` whose `low` is not below `high` is invalid
/// and fails every read and write with `Bad_IndexRangeInvalid`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericRange {
    Index(u32),
    Span { low: u32, high: u32 },
}

impl NumericRange {
    fn bounds(&self) -> Result<(usize, usize), StatusCode> {
        match *self {
            Self::Index(i) => Ok((i as usize, i as usize)),
            Self::Span { low, high } if low < high => Ok((low as usize, high as usize)),
            Self::Span { .. } => Err(StatusCode::BAD_INDEX_RANGE_INVALID),
        }
    }

    /// Extract the addressed elements of an array or string value.
    ///
    /// A range that starts past the end yields `Bad_IndexRangeNoData`; one
    /// that overlaps the end is clipped. Scalars yield `Bad_IndexRangeInvalid`.
    pub fn read(&self, value: &Variant) -> Result<Variant, StatusCode> {
        let (low, high) = self.bounds()?;
        match value {
            Variant::Array(items) => {
                if low >= items.len() {
                    return Err(StatusCode::BAD_INDEX_RANGE_NO_DATA);
                }
                let end = (high + 1).min(items.len());
                Ok(Variant::Array(items[low..end].to_vec()))
            }
            Variant::String(s) => {
                let chars: Vec<char> = s.chars().collect();
                if low >= chars.len() {
                    return Err(StatusCode::BAD_INDEX_RANGE_NO_DATA);
                }
                let end = (high + 1).min(chars.len());
                Ok(Variant::String(chars[low..end].iter().collect()))
            }
            _ => Err(StatusCode::BAD_INDEX_RANGE_INVALID),
        }
    }

    /// Replace the addressed elements of `target` with the elements of `patch`.
    ///
    /// `patch` must be an array with exactly as many elements as the range
    /// addresses, and the range must lie within `target`.
    pub fn write(&self, target: &Variant, patch: &Variant) -> Result<Variant, StatusCode> {
        let (low, high) = self.bounds()?;
        let Variant::Array(items) = target else {
            return Err(StatusCode::BAD_INDEX_RANGE_INVALID);
        };
        let Variant::Array(replacement) = patch else {
            return Err(StatusCode::BAD_TYPE_MISMATCH);
        };
        if replacement.len() != high - low + 1 {
            return Err(StatusCode::BAD_INDEX_RANGE_INVALID);
        }
        if high >= items.len() {
            return Err(StatusCode::BAD_INDEX_RANGE_NO_DATA);
        }
        let mut updated = items.clone();
        updated[low..=high].clone_from_slice(replacement);
        Ok(Variant::Array(updated))
    }
}

impl FromStr for NumericRange {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypeError::InvalidIndexRange(s.to_string());
        match s.split_once(':') {
            None => Ok(Self::Index(s.parse().map_err(|_| invalid())?)),
            Some((low, high)) => {
                let low: u32 = low.parse().map_err(|_| invalid())?;
                let high: u32 = high.parse().map_err(|_| invalid())?;
                if low >= high {
                    return Err(invalid());
                }
                Ok(Self::Span { low, high })
            }
        }
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Span { low, high } => write!(f, "{low}:{high}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(values: &[i32]) -> Variant {
        Variant::from(values.to_vec())
    }

    #[test]
    fn parse_forms() {
        assert_eq!("3".parse::<NumericRange>().unwrap(), NumericRange::Index(3));
        assert_eq!(
            "1:4".parse::<NumericRange>().unwrap(),
            NumericRange::Span { low: 1, high: 4 }
        );
        assert!("4:1".parse::<NumericRange>().is_err());
        assert!("2:2".parse::<NumericRange>().is_err());
        assert!("1:2,0:1".parse::<NumericRange>().is_err());
        assert!("x".parse::<NumericRange>().is_err());
    }

    #[test]
    fn read_slice_and_clip() {
        let v = array(&[10, 11, 12, 13]);
        let r: NumericRange = "1:2".parse().unwrap();
        assert_eq!(r.read(&v).unwrap(), array(&[11, 12]));

        let clipped: NumericRange = "2:9".parse().unwrap();
        assert_eq!(clipped.read(&v).unwrap(), array(&[12, 13]));

        let past: NumericRange = "7".parse().unwrap();
        assert_eq!(past.read(&v), Err(StatusCode::BAD_INDEX_RANGE_NO_DATA));
    }

    #[test]
    fn read_scalar_is_invalid() {
        let r = NumericRange::Index(0);
        assert_eq!(
            r.read(&Variant::Double(1.0)),
            Err(StatusCode::BAD_INDEX_RANGE_INVALID)
        );
    }

    #[test]
    fn read_string_substring() {
        let r: NumericRange = "0:2".parse().unwrap();
        assert_eq!(r.read(&Variant::from("pump")).unwrap(), Variant::from("pum"));
    }

    #[test]
    fn write_replaces_slice() {
        let v = array(&[1, 2, 3, 4]);
        let r: NumericRange = "1:2".parse().unwrap();
        assert_eq!(r.write(&v, &array(&[8, 9])).unwrap(), array(&[1, 8, 9, 4]));
    }

    #[test]
    fn inverted_span_is_invalid() {
        let v = array(&[1, 2, 3, 4, 5]);
        for r in [
            NumericRange::Span { low: 3, high: 1 },
            NumericRange::Span { low: 2, high: 2 },
        ] {
            assert_eq!(r.read(&v), Err(StatusCode::BAD_INDEX_RANGE_INVALID));
            assert_eq!(r.read(&Variant::from("pump")), Err(StatusCode::BAD_INDEX_RANGE_INVALID));
            assert_eq!(
                r.write(&v, &array(&[9])),
                Err(StatusCode::BAD_INDEX_RANGE_INVALID)
            );
        }
    }

    #[test]
    fn write_length_mismatch() {
        let v = array(&[1, 2, 3, 4]);
        let r: NumericRange = "1:2".parse().unwrap();
        assert_eq!(
            r.write(&v, &array(&[8])),
            Err(StatusCode::BAD_INDEX_RANGE_INVALID)
        );
        let out: NumericRange = "3:4".parse().unwrap();
        assert_eq!(
            out.write(&v, &array(&[8, 9])),
            Err(StatusCode::BAD_INDEX_RANGE_NO_DATA)
        );
    }
}
