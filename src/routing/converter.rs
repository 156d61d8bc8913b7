//! Typed path converters.
//!
//! # Responsibilities
//! - Name the capture types a pattern may declare (`int`, `str`, `slug`, `uuid`, `path`)
//! - Decide which characters a capture may consume
//! - Turn a raw path fragment into a typed [`ParamValue`]
//!
//! # Design Decisions
//! - Character-class checks only, no regex
//! - `int` values that overflow `u64` do not match
//! - `uuid` accepts only the lowercase hyphenated form

use std::fmt;

use crate::routing::params::ParamValue;

/// Capture type declared inside `<converter:name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    Int,
    Str,
    Slug,
    Uuid,
    Path,
}

impl Converter {
    /// Look up a converter by the name used in pattern templates.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Self::Int),
            "str" => Some(Self::Str),
            "slug" => Some(Self::Slug),
            "uuid" => Some(Self::Uuid),
            "path" => Some(Self::Path),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Str => "str",
            Self::Slug => "slug",
            Self::Uuid => "uuid",
            Self::Path => "path",
        }
    }

    /// Returns true if a capture of this type may contain `c`.
    pub fn admits(self, c: char) -> bool {
        match self {
            Self::Int => c.is_ascii_digit(),
            Self::Str => c != '/',
            Self::Slug => c.is_ascii_alphanumeric() || c == '-' || c == '_',
            Self::Uuid => c.is_ascii_digit() || ('a'..='f').contains(&c) || c == '-',
            Self::Path => true,
        }
    }

    /// Convert a raw fragment into a typed value.
    ///
    /// Returns `None` when the fragment is not a complete value of this type.
    pub fn convert(self, raw: &str) -> Option<ParamValue> {
        if raw.is_empty() || !raw.chars().all(|c| self.admits(c)) {
            return None;
        }

        match self {
            Self::Int => raw.parse::<u64>().ok().map(ParamValue::Int),
            Self::Uuid => {
                if !is_hyphenated_uuid(raw) {
                    return None;
                }
                uuid::Uuid::parse_str(raw).ok().map(ParamValue::Uuid)
            }
            Self::Str | Self::Slug | Self::Path => Some(ParamValue::Str(raw.to_string())),
        }
    }
}

impl fmt::Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 8-4-4-4-12 layout check.
fn is_hyphenated_uuid(raw: &str) -> bool {
    raw.len() == 36
        && raw
            .char_indices()
            .all(|(i, c)| matches!(i, 8 | 13 | 18 | 23) == (c == '-'))
}
