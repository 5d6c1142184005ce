//! Typed deep-link registry and dispatcher.
//!
//! # Data Flow
//! ```text
//! route_url("myapp://inbox?id=3")
//!     → Router::match_with_context (first registered match)
//!     → bound handler builds DeepLinkRequest
//!     → Mailbox::put (drops any unconsumed request)
//!     → is_actionable()? → EventBus::publish_if (deferred to main context)
//!                        → otherwise retained, no event
//! ```
//!
//! The mailbox holds one request. A second match before a consumer takes
//! the first replaces it, and the first request's pending event is dropped
//! when it reaches the main context.

use crate::consumer::{ConsumerHandle, DeepLinkConsumer, service_if_ready};
use crate::events::EventBus;
use crate::link::{AuthorizationTest, DeepLink, LinkRoute};
use crate::main_context::MainContext;
use crate::mailbox::Mailbox;
use crate::notice::{LogNotice, NoticePresenter};
use crate::request::DeepLinkRequest;
use crate::settings::LinkerSettings;
use deeplinker_routers::{Request, RequestContext, Router, decompose};
use parking_lot::RwLock;
use std::sync::Arc;

/// Registry and dispatcher for one route enumeration `R`.
pub struct DeepLinker<R: LinkRoute> {
	links: RwLock<Vec<DeepLink<R>>>,
	router: RwLock<Router>,
	mailbox: Arc<Mailbox<DeepLinkRequest<R>>>,
	events: EventBus<R>,
	notices: Arc<dyn NoticePresenter>,
	settings: LinkerSettings,
}

impl<R: LinkRoute> std::fmt::Debug for DeepLinker<R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DeepLinker")
			.field("scheme", &R::SCHEME)
			.field("links", &*self.links.read())
			.field("has_pending", &!self.mailbox.is_empty())
			.field("settings", &self.settings)
			.finish()
	}
}

impl<R: LinkRoute> DeepLinker<R> {
	/// Creates a linker with default settings that publishes on `main`.
	pub fn new(main: MainContext) -> Self {
		Self::with_settings(main, LinkerSettings::default())
	}

	/// Creates a linker with explicit settings.
	pub fn with_settings(main: MainContext, settings: LinkerSettings) -> Self {
		Self {
			links: RwLock::new(Vec::new()),
			router: RwLock::new(Router::new().with_strict_templates(settings.strict_templates)),
			mailbox: Arc::new(Mailbox::new()),
			events: EventBus::new(main),
			notices: Arc::new(LogNotice),
			settings,
		}
	}

	/// Replaces the presenter used for unmatched links.
	pub fn with_notice_presenter(mut self, presenter: Arc<dyn NoticePresenter>) -> Self {
		self.notices = presenter;
		self
	}

	/// Returns the settings this linker was built with.
	pub fn settings(&self) -> &LinkerSettings {
		&self.settings
	}

	/// Returns the event bus, for subscribers that manage their own listeners.
	pub fn events(&self) -> &EventBus<R> {
		&self.events
	}

	/// Returns the registered deep links in registration order.
	pub fn links(&self) -> Vec<DeepLink<R>> {
		self.links.read().clone()
	}

	/// Registers each deep link under its canonical `<scheme>://<id>` template.
	///
	/// # Panics
	///
	/// Panics if a case's canonical URL does not read back as its own id, so
	/// that [`DeepLinker::route_to`] succeeds for every registered case. Ids
	/// are `/`-separated segments of ASCII letters, digits, `_`, `.`, `~`
	/// and `-`.
	pub fn register<I>(&self, deep_links: I)
	where
		I: IntoIterator<Item = DeepLink<R>>,
	{
		let mut router = self.router.write();
		let mut links = self.links.write();
		for link in deep_links {
			let route = link.route();
			if let Err(reason) = check_route_id(route) {
				panic!("Invalid deep link id '{}' for {:?}: {}", route.id(), route, reason);
			}
			let mailbox = Arc::clone(&self.mailbox);
			let events = self.events.clone();
			let bound = link.clone();
			router.bind(&link.template(), move |request: &Request| {
				deliver(&mailbox, &events, bound.clone(), request);
			});
			links.push(link);
		}
	}

	/// Registers every case of `R` behind the same authorization predicate.
	///
	/// # Panics
	///
	/// See [`DeepLinker::register`].
	pub fn register_routes(&self, authorization_test: Option<AuthorizationTest>) {
		self.register(
			R::all()
				.iter()
				.map(|&route| DeepLink::gated_by(route, authorization_test.clone())),
		);
	}

	/// Routes a raw URL string.
	///
	/// Presents the invalid-link notice and returns `false` if no route
	/// matches. Otherwise returns whether a request is pending.
	pub fn route_url(&self, url: &str) -> bool {
		self.route_url_with_context(url, None)
	}

	/// Routes a raw URL string, carrying an opaque context into the request.
	pub fn route_url_with_context(&self, url: &str, context: Option<RequestContext>) -> bool {
		let matched = self.router.read().match_with_context(url, context);
		if matched.is_none() {
			self.notices
				.present_invalid_link(url, &self.settings.invalid_link_notice);
			return false;
		}
		!self.mailbox.is_empty()
	}

	/// Routes the canonical URL of `route` through the same pipeline.
	pub fn route_to(&self, route: R) -> bool {
		self.route_url(&route.canonical_url())
	}

	/// Canonical URL for `route`.
	pub fn canonical_url(&self, route: R) -> String {
		route.canonical_url()
	}

	/// Returns the pending request without consuming it.
	pub fn pending(&self) -> Option<Arc<DeepLinkRequest<R>>> {
		self.mailbox.peek()
	}

	/// Removes and returns the pending request.
	pub fn take_pending(&self) -> Option<Arc<DeepLinkRequest<R>>> {
		self.mailbox.take()
	}

	/// Drops the pending request, if any.
	pub fn clear_pending(&self) {
		self.mailbox.clear();
	}

	/// Re-evaluates the pending request's authorization and publishes it if it
	/// is now actionable. Returns whether an event was published.
	pub fn recheck_pending(&self) -> bool {
		match self.mailbox.peek() {
			Some(request) if request.is_actionable() => {
				publish_current(&self.mailbox, &self.events, request)
			}
			_ => false,
		}
	}

	/// Attaches a consumer.
	///
	/// A pending request for one of its routes is serviced immediately when
	/// actionable; the consumer is then subscribed to future events for each
	/// of its routes. Events are serviced on the main context.
	pub fn attach<C>(&self, consumer: Arc<C>) -> ConsumerHandle<R>
	where
		C: DeepLinkConsumer<R> + 'static,
	{
		let routes: Arc<[R]> = consumer.serviced_routes().into();

		let serviced_on_attach = self
			.mailbox
			.peek()
			.is_some_and(|pending| service_if_ready(&*consumer, &routes, &self.mailbox, &pending));

		let subscriptions = routes
			.iter()
			.map(|&route| {
				let consumer = Arc::clone(&consumer);
				let routes = Arc::clone(&routes);
				let mailbox = Arc::clone(&self.mailbox);
				self.events.subscribe(route, move |request| {
					service_if_ready(&*consumer, &routes, &mailbox, request);
				})
			})
			.collect();

		ConsumerHandle::new(self.events.clone(), subscriptions, serviced_on_attach)
	}
}

/// Checks that `route`'s canonical URL decomposes back to `/<id>`.
fn check_route_id<R: LinkRoute>(route: R) -> Result<(), String> {
	let id = route.id();
	let plain = id.split('/').all(|segment| {
		!segment.is_empty()
			&& segment
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '~' | '-'))
	});
	if !plain {
		return Err(
			"ids may only contain ASCII letters, digits, '_', '.', '~', '-' and '/'".to_string(),
		);
	}

	let parts = decompose(&route.canonical_url()).map_err(|e| e.to_string())?;
	let expected = format!("/{}", id);
	if parts.host_path != expected {
		return Err(format!(
			"canonical URL reads back as '{}' instead of '{}'",
			parts.host_path, expected
		));
	}
	Ok(())
}

/// Mailbox write plus its publish side effect.
fn deliver<R: LinkRoute>(
	mailbox: &Arc<Mailbox<DeepLinkRequest<R>>>,
	events: &EventBus<R>,
	link: DeepLink<R>,
	request: &Request,
) {
	let pending = Arc::new(DeepLinkRequest::from_match(link, request));

	if let Some(dropped) = mailbox.put(Arc::clone(&pending)) {
		tracing::warn!(
			dropped = %dropped.url(),
			url = %pending.url(),
			"unconsumed deep link overwritten"
		);
	}

	if pending.is_actionable() {
		publish_current(mailbox, events, pending);
	} else {
		tracing::debug!(route = ?pending.route(), "deep link retained, not authorized");
	}
}

/// Publishes `request`, delivering only if it is still the pending request
/// when the main context runs the event.
fn publish_current<R: LinkRoute>(
	mailbox: &Arc<Mailbox<DeepLinkRequest<R>>>,
	events: &EventBus<R>,
	request: Arc<DeepLinkRequest<R>>,
) -> bool {
	let mailbox = Arc::clone(mailbox);
	events.publish_if(request, move |request| mailbox.holds(request))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::link_routes;
	use parking_lot::Mutex;
	use rstest::rstest;
	use std::sync::atomic::{AtomicBool, Ordering};

	link_routes! {
		enum AppRoute: "myapp" {
			Home => "home",
			Inbox => "inbox",
			Settings => "settings",
		}
	}

	link_routes! {
		enum PlainRoute: "myapp" {
			Home => "home",
			Profile => "user_profile",
			Settings => "UserSettings",
			Recent => "orders/recent",
			Versioned => "v1.2",
			Tilde => "a~b",
			Dashed => "x-y",
		}
	}

	link_routes! {
		enum SpacedRoute: "myapp" {
			Name => "John Doe",
		}
	}

	link_routes! {
		enum TokenRoute: "myapp" {
			Order => "orders/:id",
		}
	}

	link_routes! {
		enum PercentRoute: "myapp" {
			Discount => "100%",
		}
	}

	link_routes! {
		enum WebRoute: "http" {
			Profile => "userProfile",
		}
	}

	fn register_all<R: LinkRoute>() -> DeepLinker<R> {
		let (main, _main_loop) = MainContext::new();
		let linker = DeepLinker::new(main);
		linker.register_routes(None);
		linker
	}

	#[derive(Default)]
	struct RecordingNotice {
		shown: Mutex<Vec<(String, String)>>,
	}

	impl NoticePresenter for RecordingNotice {
		fn present_invalid_link(&self, url: &str, message: &str) {
			self.shown.lock().push((url.to_string(), message.to_string()));
		}
	}

	#[rstest]
	fn test_register_routes_binds_every_case() {
		let (main, _main_loop) = MainContext::new();
		let linker = DeepLinker::<AppRoute>::new(main);

		linker.register_routes(None);

		let routes: Vec<AppRoute> = linker.links().iter().map(DeepLink::route).collect();
		assert_eq!(routes, AppRoute::all());
	}

	#[rstest]
	#[case(AppRoute::Home)]
	#[case(AppRoute::Inbox)]
	#[case(AppRoute::Settings)]
	fn test_route_to_any_case(#[case] route: AppRoute) {
		let (main, _main_loop) = MainContext::new();
		let linker = DeepLinker::new(main);
		linker.register_routes(None);

		assert!(linker.route_to(route));
		assert_eq!(linker.pending().unwrap().route(), route);
	}

	#[rstest]
	fn test_every_accepted_id_round_trips_through_route_to() {
		let linker = register_all::<PlainRoute>();

		for &route in PlainRoute::all() {
			assert!(linker.route_to(route), "route_to({:?})", route);
			assert_eq!(linker.take_pending().unwrap().route(), route);
		}
	}

	#[rstest]
	#[should_panic(expected = "Invalid deep link id 'John Doe'")]
	fn test_id_with_space_rejected() {
		register_all::<SpacedRoute>();
	}

	#[rstest]
	#[should_panic(expected = "Invalid deep link id 'orders/:id'")]
	fn test_id_with_parameter_token_rejected() {
		register_all::<TokenRoute>();
	}

	#[rstest]
	#[should_panic(expected = "Invalid deep link id '100%'")]
	fn test_id_with_percent_rejected() {
		register_all::<PercentRoute>();
	}

	#[rstest]
	#[should_panic(expected = "canonical URL reads back as")]
	fn test_id_rewritten_by_special_scheme_rejected() {
		register_all::<WebRoute>();
	}

	#[rstest]
	fn test_unmatched_url_presents_notice() {
		// Arrange
		let (main, _main_loop) = MainContext::new();
		let notices = Arc::new(RecordingNotice::default());
		let settings = LinkerSettings::default().with_invalid_link_notice("Bad link");
		let linker = DeepLinker::<AppRoute>::with_settings(main, settings)
			.with_notice_presenter(Arc::clone(&notices) as Arc<dyn NoticePresenter>);
		linker.register_routes(None);

		// Act
		let routed = linker.route_url("myapp://nowhere");

		// Assert
		assert!(!routed);
		assert!(linker.pending().is_none());
		assert_eq!(
			*notices.shown.lock(),
			vec![("myapp://nowhere".to_string(), "Bad link".to_string())]
		);
	}

	#[rstest]
	fn test_query_and_context_reach_request() {
		let (main, _main_loop) = MainContext::new();
		let linker = DeepLinker::<AppRoute>::new(main);
		linker.register_routes(None);

		linker.route_url_with_context("myapp://inbox?thread=12", Some(Arc::new(5_u8)));

		let pending = linker.pending().unwrap();
		assert_eq!(pending.route(), AppRoute::Inbox);
		assert_eq!(pending.url(), "myapp://inbox?thread=12");
		assert_eq!(pending.query_param("thread"), Some("12"));
		assert!(pending.path_params().is_empty());
		assert!(pending.context().is_some());
	}

	#[rstest]
	fn test_unauthorized_request_retained_without_event() {
		// Arrange
		let (main, mut main_loop) = MainContext::new();
		let linker = DeepLinker::<AppRoute>::new(main);
		let allowed = Arc::new(AtomicBool::new(false));
		let flag = Arc::clone(&allowed);
		linker.register([DeepLink::with_authorization(AppRoute::Inbox, move || {
			flag.load(Ordering::SeqCst)
		})]);
		let events = Arc::new(Mutex::new(0));
		let counter = Arc::clone(&events);
		linker.events().subscribe(AppRoute::Inbox, move |_| *counter.lock() += 1);

		// Act
		let routed = linker.route_to(AppRoute::Inbox);
		main_loop.run_pending();

		// Assert
		assert!(routed);
		assert!(linker.pending().is_some());
		assert_eq!(*events.lock(), 0);
		assert!(!linker.recheck_pending());

		allowed.store(true, Ordering::SeqCst);
		assert!(linker.recheck_pending());
		main_loop.run_pending();
		assert_eq!(*events.lock(), 1);
	}

	#[rstest]
	fn test_take_and_clear_pending() {
		let (main, _main_loop) = MainContext::new();
		let linker = DeepLinker::<AppRoute>::new(main);
		linker.register_routes(None);

		linker.route_to(AppRoute::Home);
		assert_eq!(linker.take_pending().unwrap().route(), AppRoute::Home);
		assert!(linker.pending().is_none());

		linker.route_to(AppRoute::Home);
		linker.clear_pending();
		assert!(linker.pending().is_none());
	}

	#[rstest]
	#[should_panic(expected = "Invalid route template")]
	fn test_strict_settings_reach_router() {
		let (main, _main_loop) = MainContext::new();
		let linker = DeepLinker::<AppRoute>::with_settings(
			main,
			LinkerSettings::default().with_strict_templates(true),
		);
		linker.router.write().bind_route("/:id/:id");
	}
}
