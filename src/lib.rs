//! Host-aware cookie overrides for captured HTTP requests.
//!
//! An operator supplies replacement cookie values as JSON; [`CookieMerger`]
//! substitutes them into a request's `Cookie` header and [`OverrideStore`]
//! remembers the payload per destination host so it can be recalled by the
//! next [`EditorTab`] showing a request to that host.

pub mod cli;
pub mod config;
pub mod cookie;
pub mod editor;
pub mod http;
pub mod store;

pub use cookie::{CookieMap, CookieMerger, CookieOverride, MergeError, Outcome};
pub use editor::EditorTab;
pub use store::OverrideStore;
