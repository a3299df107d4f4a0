// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scalar values that can be attached to log records.
//!
//! Extra info is deliberately restricted to scalars: strings, integers, floats and
//! booleans. Anything richer is not representable as an [`InfoValue`], so a caller can't
//! hand the emission pipeline a value it doesn't know how to render.
//!
//! ```rust
//! use goodlog::InfoValue;
//!
//! let v: InfoValue = "checkout".into();
//! assert_eq!(v.to_string(), "checkout");
//!
//! let v: InfoValue = 42u16.into();
//! assert_eq!(v, InfoValue::UInt(42));
//! ```

use std::collections::BTreeMap;
use std::fmt::Display;

/// A mapping from attribute name to value.
///
/// Keys are kept sorted so that rendered records are stable between runs.
pub type InfoMap = BTreeMap<String, InfoValue>;

/// A single scalar attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum InfoValue {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl InfoValue {
    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            InfoValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for InfoValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InfoValue::Str(s) => write!(f, "{}", s),
            InfoValue::Int(i) => write!(f, "{}", i),
            InfoValue::UInt(u) => write!(f, "{}", u),
            InfoValue::Float(x) => write!(f, "{}", x),
            InfoValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl PartialEq<&str> for InfoValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<str> for InfoValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl From<&str> for InfoValue {
    fn from(value: &str) -> Self {
        InfoValue::Str(value.to_string())
    }
}

impl From<String> for InfoValue {
    fn from(value: String) -> Self {
        InfoValue::Str(value)
    }
}

impl From<&String> for InfoValue {
    fn from(value: &String) -> Self {
        InfoValue::Str(value.clone())
    }
}

impl From<bool> for InfoValue {
    fn from(value: bool) -> Self {
        InfoValue::Bool(value)
    }
}

impl From<f32> for InfoValue {
    fn from(value: f32) -> Self {
        InfoValue::Float(value as f64)
    }
}

impl From<f64> for InfoValue {
    fn from(value: f64) -> Self {
        InfoValue::Float(value)
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for InfoValue {
                fn from(value: $t) -> Self {
                    InfoValue::Int(value as i64)
                }
            }
        )*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for InfoValue {
                fn from(value: $t) -> Self {
                    InfoValue::UInt(value as u64)
                }
            }
        )*
    };
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

/*
Boilerplate notes for InfoValue:

- Eq/Hash: not implemented, Float holds an f64.
- PartialOrd: no meaningful ordering across variants.
- Default: there is no obvious empty scalar.
- PartialEq<&str>: lets tests write `info["k"] == "v"`.
*/
