//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, trace span)
//!     → dispatch.rs (mount prefix, route table lookup, handler call)
//!     → response.rs (JSON rendering, status mapping)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::AppState;
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
