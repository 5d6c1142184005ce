//! Path-template compilation and first-match URL routing.
//!
//! Templates are strings of literal segments and `:name` tokens. Each token
//! captures one path segment:
//!
//! ```rust
//! use deeplinker_routers::Router;
//!
//! let mut router = Router::new();
//! router.bind("/users/:id", |req| {
//!     assert_eq!(req.path_param("id"), Some("42"));
//! });
//!
//! let route = router.match_url("/users/42").unwrap();
//! assert_eq!(route.template(), "/users/:id");
//! ```
//!
//! Scheme-qualified templates (`myapp://orders/:id`) are matched against the
//! host+path form of incoming URLs, where the host is the first segment.
//!
//! ## Matching order
//!
//! Routes are tried in registration order and the first full match wins.
//! Register narrow templates before broad ones.

pub mod error;
pub mod pattern;
pub mod request;
pub mod route;
pub mod router;
pub mod uri;

pub use error::{PatternError, PatternResult, UrlError};
pub use pattern::CompiledPattern;
pub use request::{Request, RequestContext};
pub use route::Route;
pub use router::{RouteHandler, Router};
pub use uri::{DecomposedUrl, decompose};
