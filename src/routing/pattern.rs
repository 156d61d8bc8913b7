//! Path templates with typed captures.
//!
//! # Responsibilities
//! - Parse templates like `org/<int:id>/` into literal and capture pieces
//! - Match a relative request path against the template (anchored at both ends)
//! - Render a concrete path from parameter values (reverse)
//!
//! # Design Decisions
//! - Templates are compiled once at registration; matching never re-parses
//! - Captures are greedy and backtrack, so `<str:a>-<int:b>` works
//! - No regex; each capture scans with its converter's character class

use std::fmt;

use crate::routing::converter::Converter;
use crate::routing::params::Params;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Capture { name: String, converter: Converter },
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    pieces: Vec<Piece>,
}

/// Why a template failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError(pub String);

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl RoutePattern {
    /// Parse a template.
    pub fn parse(template: &str) -> Result<Self, PatternError> {
        if template.starts_with('/') {
            return Err(PatternError("pattern must not begin with '/'".into()));
        }

        let mut pieces = Vec::new();
        let mut rest = template;

        while let Some(open) = rest.find('<') {
            if open > 0 {
                pieces.push(Piece::Literal(rest[..open].to_string()));
            }

            let after = &rest[open + 1..];
            let close = after
                .find('>')
                .ok_or_else(|| PatternError("unterminated '<' in capture".into()))?;
            let (converter, name) = parse_capture(&after[..close])?;

            let duplicate = pieces.iter().any(|p| matches!(p, Piece::Capture { name: n, .. } if *n == name));
            if duplicate {
                return Err(PatternError(format!("capture '{}' appears more than once", name)));
            }

            pieces.push(Piece::Capture { name, converter });
            rest = &after[close + 1..];
        }

        if !rest.is_empty() {
            pieces.push(Piece::Literal(rest.to_string()));
        }

        Ok(Self {
            source: template.to_string(),
            pieces,
        })
    }

    /// The template text as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Capture names in declaration order, with their converters.
    pub fn captures(&self) -> impl Iterator<Item = (&str, Converter)> {
        self.pieces.iter().filter_map(|p| match p {
            Piece::Capture { name, converter } => Some((name.as_str(), *converter)),
            Piece::Literal(_) => None,
        })
    }

    /// Match the whole of `path`, returning the captured values.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let mut params = Params::new();
        match_pieces(&self.pieces, path, &mut params).then_some(params)
    }

    /// Render a concrete path, validating every value against its converter.
    ///
    /// `params` must name exactly the captures of this pattern.
    pub fn render(&self, params: &Params) -> Result<String, String> {
        if let Some(extra) = params
            .names()
            .find(|n| !self.captures().any(|(c, _)| c == *n))
        {
            return Err(format!("unexpected parameter '{}'", extra));
        }

        let mut out = String::with_capacity(self.source.len());
        for piece in &self.pieces {
            match piece {
                Piece::Literal(lit) => out.push_str(lit),
                Piece::Capture { name, converter } => {
                    let value = params
                        .get(name)
                        .ok_or_else(|| format!("missing parameter '{}'", name))?
                        .to_string();
                    if converter.convert(&value).is_none() {
                        return Err(format!(
                            "value {:?} for '{}' is not a valid {}",
                            value, name, converter
                        ));
                    }
                    out.push_str(&value);
                }
            }
        }

        Ok(out)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Split `conv:name` (or bare `name`) and validate both halves.
fn parse_capture(inner: &str) -> Result<(Converter, String), PatternError> {
    let (converter_name, name) = match inner.split_once(':') {
        Some((conv, name)) => (conv, name),
        None => ("str", inner),
    };

    let converter = Converter::from_name(converter_name)
        .ok_or_else(|| PatternError(format!("unknown converter '{}'", converter_name)))?;

    if !is_identifier(name) {
        return Err(PatternError(format!("invalid capture name '{}'", name)));
    }

    Ok((converter, name.to_string()))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn match_pieces(pieces: &[Piece], input: &str, params: &mut Params) -> bool {
    let Some((first, rest)) = pieces.split_first() else {
        return input.is_empty();
    };

    match first {
        Piece::Literal(lit) => input
            .strip_prefix(lit.as_str())
            .is_some_and(|tail| match_pieces(rest, tail, params)),
        Piece::Capture { name, converter } => {
            let run = input
                .char_indices()
                .find(|(_, c)| !converter.admits(*c))
                .map_or(input.len(), |(i, _)| i);

            // Longest candidate first
            let mut ends: Vec<usize> = input[..run]
                .char_indices()
                .map(|(i, c)| i + c.len_utf8())
                .collect();

            while let Some(end) = ends.pop() {
                let (raw, tail) = input.split_at(end);
                let Some(value) = converter.convert(raw) else {
                    continue;
                };
                params.push(name.clone(), value);
                if match_pieces(rest, tail, params) {
                    return true;
                }
                params.pop();
            }

            false
        }
    }
}
