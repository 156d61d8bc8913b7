//! Organization resource.
//!
//! # Data Flow
//! ```text
//! urls.rs   → declares the six routes, binding names to handlers
//! views.rs  → ResourceHandler implementations per route
//! model.rs  → in-memory OrganizationDirectory backing the handlers
//! ```

pub mod model;
pub mod urls;
pub mod views;

pub use model::{Organization, OrganizationDirectory};
pub use urls::url_patterns;
