//! Typed deep-link registry for Deeplinker.
//!
//! This crate layers a route enumeration over
//! [`deeplinker_routers::Router`]:
//!
//! - **Route enumerations**: [`LinkRoute`] declares a closed set of cases
//!   sharing one scheme; [`link_routes!`] generates one
//! - **Authorization**: each [`DeepLink`] may carry a predicate evaluated at
//!   publish time
//! - **Mailbox**: one pending [`DeepLinkRequest`] per linker, overwritten on
//!   each new match
//! - **Events**: availability is published on the [`MainContext`] through a
//!   typed [`EventBus`]
//!
//! # Quick Start
//!
//! ```rust
//! use deeplinker_core::{DeepLinkConsumer, DeepLinkRequest, LinkerRegistry, MainContext, link_routes};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! link_routes! {
//!     pub enum AppRoute: "myapp" {
//!         Home => "home",
//!         Inbox => "inbox",
//!     }
//! }
//!
//! struct InboxScreen {
//!     opened: AtomicUsize,
//! }
//!
//! impl DeepLinkConsumer<AppRoute> for InboxScreen {
//!     fn serviced_routes(&self) -> Vec<AppRoute> {
//!         vec![AppRoute::Inbox]
//!     }
//!
//!     fn service(&self, _request: &DeepLinkRequest<AppRoute>) {
//!         self.opened.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let (main, mut main_loop) = MainContext::new();
//! let registry = LinkerRegistry::new(main);
//! let linker = registry.linker::<AppRoute>();
//! linker.register_routes(None);
//!
//! let screen = Arc::new(InboxScreen { opened: AtomicUsize::new(0) });
//! let _handle = linker.attach(Arc::clone(&screen));
//!
//! assert!(linker.route_url("myapp://inbox"));
//! main_loop.run_pending();
//! assert_eq!(screen.opened.load(Ordering::SeqCst), 1);
//! ```

pub mod consumer;
pub mod events;
pub mod link;
pub mod linker;
pub mod mailbox;
pub mod main_context;
pub mod notice;
pub mod registry;
pub mod request;
pub mod settings;

// Re-export main types for convenience
pub use consumer::{ConsumerHandle, DeepLinkConsumer};
pub use events::{EventBus, Listener, SubscriptionId};
pub use link::{AuthorizationTest, DeepLink, LinkRoute};
pub use linker::DeepLinker;
pub use mailbox::Mailbox;
pub use main_context::{MainContext, MainLoop};
pub use notice::{LogNotice, NoticePresenter};
pub use registry::LinkerRegistry;
pub use request::DeepLinkRequest;
pub use settings::{LinkerSettings, SettingsError, SettingsResult};
