//! # eco-web
//!
//! HTTP server for Ecosphere: the public site, the signed-in dashboard, and
//! the form actions that write to the database.
//!
//! Pages render HTML on the server from [`components`]. Actions answer with a
//! JSON `ActionResult` (`{ success, error }`) and a status code matching the
//! failure kind.

pub mod actions;
pub mod bootstrap;
pub mod components;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::WebError;
pub use router::build_router;
pub use state::AppState;
