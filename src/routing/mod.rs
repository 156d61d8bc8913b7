//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Declaration (at startup):
//!     (template, handler, name)[]
//!     → pattern.rs (compile template, converter.rs per capture)
//!     → table.rs builder (reject duplicate names)
//!     → Freeze as immutable RouteTable
//!
//! Incoming relative path
//!     → table.rs (scan in declaration order)
//!     → pattern.rs (anchored match, typed captures)
//!     → Return: ResolvedRoute { route, params } or NoMatchingRoute
//!
//! Reverse:
//!     (name, Params) → table.rs (name index) → pattern.rs (render) → path
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (character-class scans only)
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod converter;
pub mod error;
pub mod params;
pub mod pattern;
pub mod table;

pub use converter::Converter;
pub use error::{RouteError, RouteResult};
pub use params::{ParamValue, Params};
pub use pattern::RoutePattern;
pub use table::{ResolvedRoute, Route, RouteTable, RouteTableBuilder};
