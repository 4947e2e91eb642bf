//! Quantization level (K): how many palette entries are addressable.
//!
//! A [`QuantLevel`] can only be constructed inside `[MIN, MAX]`, so range
//! validation happens exactly once, where configuration is read, and never
//! per image or per pixel.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use crate::palette::PALETTE_SIZE;

/// A validated palette size K in `[4, 10]`.
///
/// # Example
///
/// ```
/// use intensity_quant::QuantLevel;
///
/// let level: QuantLevel = "6".parse().unwrap();
/// assert_eq!(level.get(), 6);
/// assert!(QuantLevel::new(3).is_err());
/// assert!(QuantLevel::new(11).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuantLevel(u8);

impl QuantLevel {
    /// Smallest accepted K.
    pub const MIN: u8 = 4;
    /// Largest accepted K; equals the palette size.
    pub const MAX: u8 = PALETTE_SIZE as u8;

    /// Validate `k` and wrap it.
    pub fn new(k: u8) -> Result<Self, LevelError> {
        if (Self::MIN..=Self::MAX).contains(&k) {
            Ok(Self(k))
        } else {
            Err(LevelError::OutOfRange {
                value: k as i64,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// The raw K value.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// K as a slice length.
    #[inline]
    pub const fn count(self) -> usize {
        self.0 as usize
    }

    /// Every valid level, smallest first.
    pub fn all() -> impl Iterator<Item = QuantLevel> {
        (Self::MIN..=Self::MAX).map(QuantLevel)
    }
}

impl Default for QuantLevel {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl fmt::Display for QuantLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for QuantLevel {
    type Error = LevelError;

    fn try_from(k: u8) -> Result<Self, Self::Error> {
        Self::new(k)
    }
}

impl TryFrom<i64> for QuantLevel {
    type Error = LevelError;

    fn try_from(k: i64) -> Result<Self, Self::Error> {
        match u8::try_from(k) {
            Ok(k) => Self::new(k),
            Err(_) => Err(LevelError::OutOfRange {
                value: k,
                min: Self::MIN,
                max: Self::MAX,
            }),
        }
    }
}

impl FromStr for QuantLevel {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let k: i64 = s.trim().parse()?;
        Self::try_from(k)
    }
}

impl From<QuantLevel> for u8 {
    fn from(level: QuantLevel) -> Self {
        level.0
    }
}

/// Error type for an invalid quantization level.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    /// K lies outside `[min, max]`
    OutOfRange {
        /// The rejected value
        value: i64,
        /// Smallest accepted K
        min: u8,
        /// Largest accepted K
        max: u8,
    },
    /// K is not an integer
    Parse(ParseIntError),
}

impl From<ParseIntError> for LevelError {
    fn from(err: ParseIntError) -> Self {
        LevelError::Parse(err)
    }
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::OutOfRange { value, min, max } => write!(
                f,
                "quantization level {} out of range (allowed: {}-{})",
                value, min, max
            ),
            LevelError::Parse(err) => write!(f, "invalid quantization level: {}", err),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_full_range() {
        for k in 4..=10u8 {
            assert_eq!(QuantLevel::new(k).unwrap().get(), k);
        }
        assert_eq!(QuantLevel::all().count(), 7);
    }

    #[test]
    fn test_rejects_neighbours_of_range() {
        assert_eq!(
            QuantLevel::new(3),
            Err(LevelError::OutOfRange {
                value: 3,
                min: 4,
                max: 10
            })
        );
        assert!(QuantLevel::new(11).is_err());
        assert!(QuantLevel::new(0).is_err());
        assert!(QuantLevel::new(255).is_err());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("10".parse::<QuantLevel>().unwrap().get(), 10);
        assert_eq!(" 4 ".parse::<QuantLevel>().unwrap().get(), 4);
        assert!(matches!(
            "-1".parse::<QuantLevel>(),
            Err(LevelError::OutOfRange { value: -1, .. })
        ));
        assert!(matches!(
            "1000".parse::<QuantLevel>(),
            Err(LevelError::OutOfRange { value: 1000, .. })
        ));
        assert!(matches!("ten".parse::<QuantLevel>(), Err(LevelError::Parse(_))));
    }

    #[test]
    fn test_display() {
        assert_eq!(QuantLevel::default().to_string(), "10");
        let err = QuantLevel::new(11).unwrap_err();
        assert_eq!(
            err.to_string(),
            "quantization level 11 out of range (allowed: 4-10)"
        );
    }
}
