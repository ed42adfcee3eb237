//! Value types and attributes.

use std::fmt;

/// Bit width used for `index` values.
pub const INDEX_WIDTH: u32 = 64;

/// A value type in the IR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Type {
    /// Target-sized integer, modelled as 64 bits.
    Index,
    /// Signless integer of the given width (`i1` through `i64`).
    Integer(u32),
}

impl Type {
    /// Parses a type keyword (`index`, `i32`, ...).
    pub fn parse(text: &str) -> Option<Self> {
        if text == "index" {
            return Some(Self::Index);
        }
        let width: u32 = text.strip_prefix('i')?.parse().ok()?;
        if (1..=64).contains(&width) {
            Some(Self::Integer(width))
        } else {
            None
        }
    }

    pub fn width(self) -> u32 {
        match self {
            Self::Index => INDEX_WIDTH,
            Self::Integer(width) => width,
        }
    }

    /// Truncates `value` to this type's width and sign-extends it back to `i64`.
    pub fn wrap(self, value: i64) -> i64 {
        let width = self.width();
        if width >= 64 {
            return value;
        }
        let shift = 64 - width;
        (value << shift) >> shift
    }

    /// Returns true when `value` is representable without wrapping.
    pub fn fits(self, value: i64) -> bool {
        self.wrap(value) == value
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index => write!(f, "index"),
            Self::Integer(width) => write!(f, "i{}", width),
        }
    }
}

/// Compile-time attribute attached to an operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Integer(i64),
}

impl Attribute {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
        }
    }
}
