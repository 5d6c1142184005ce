//! # Deeplinker
//!
//! Typed deep-link routing for applications that receive URLs such as
//! `myapp://inbox?thread=12` from the outside world.
//!
//! Declare the app's routes as an enumeration, register them, and hand every
//! incoming URL to the linker. A match becomes a pending request in a
//! single-slot mailbox and is announced on the main context to consumers that
//! service its route.
//!
//! ## Feature Flags
//!
//! - `routers` - Template compilation and first-match URL routing
//! - `full` (default) - Adds the typed registry, mailbox, event bus and consumers
//!
//! ## Crates
//!
//! - [`deeplinker_routers`] - [`Router`], [`Route`], [`CompiledPattern`] and URL decomposition
//! - `deeplinker_core` - [`DeepLinker`], [`LinkerRegistry`], [`MainContext`] and consumers
//!
//! ## Quick Example
//!
//! ```rust
//! use deeplinker::prelude::*;
//! use std::sync::Arc;
//!
//! link_routes! {
//!     pub enum AppRoute: "myapp" {
//!         Home => "home",
//!         Inbox => "inbox",
//!     }
//! }
//!
//! let (main, mut main_loop) = MainContext::new();
//! let registry = LinkerRegistry::new(main);
//! let linker = registry.linker::<AppRoute>();
//! linker.register_routes(None);
//!
//! assert!(linker.route_url("myapp://inbox?thread=12"));
//! main_loop.run_pending();
//!
//! let pending = linker.take_pending().unwrap();
//! assert_eq!(pending.route(), AppRoute::Inbox);
//! assert_eq!(pending.query_param("thread"), Some("12"));
//! ```

// Routing layer - always available
pub use deeplinker_routers::{
	CompiledPattern, DecomposedUrl, PatternError, PatternResult, Request, RequestContext, Route,
	RouteHandler, Router, UrlError, decompose,
};

#[cfg(feature = "full")]
pub use deeplinker_core::{
	AuthorizationTest, ConsumerHandle, DeepLink, DeepLinkConsumer, DeepLinkRequest, DeepLinker,
	EventBus, LinkRoute, LinkerRegistry, LinkerSettings, Listener, LogNotice, Mailbox,
	MainContext, MainLoop, NoticePresenter, SettingsError, SettingsResult, SubscriptionId,
	link_routes,
};

/// Prelude module for convenient imports
///
/// Import everything needed to declare, register and consume deep links:
/// ```rust
/// use deeplinker::prelude::*;
/// ```
pub mod prelude {
	pub use crate::{Request, Router};

	#[cfg(feature = "full")]
	pub use crate::{
		AuthorizationTest, ConsumerHandle, DeepLink, DeepLinkConsumer, DeepLinkRequest,
		DeepLinker, LinkRoute, LinkerRegistry, LinkerSettings, MainContext, MainLoop,
		NoticePresenter, link_routes,
	};
}
