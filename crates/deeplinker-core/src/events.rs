//! Typed publish events keyed by route case.
//!
//! Listeners subscribe to one route case and receive the request itself, so
//! nobody has to re-read shared state to learn what arrived. Delivery always
//! happens on the [`MainContext`], never on the publishing thread.

use crate::link::LinkRoute;
use crate::main_context::MainContext;
use crate::request::DeepLinkRequest;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Listener invoked with a newly available request.
pub type Listener<R> = Arc<dyn Fn(&Arc<DeepLinkRequest<R>>) + Send + Sync>;

/// Identifies one subscription for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ListenerTable<R> = HashMap<R, Vec<(SubscriptionId, Listener<R>)>>;

/// Publish/subscribe bus for deep-link availability events.
pub struct EventBus<R: LinkRoute> {
	listeners: Arc<RwLock<ListenerTable<R>>>,
	next_id: Arc<AtomicU64>,
	main: MainContext,
}

impl<R: LinkRoute> Clone for EventBus<R> {
	fn clone(&self) -> Self {
		Self {
			listeners: Arc::clone(&self.listeners),
			next_id: Arc::clone(&self.next_id),
			main: self.main.clone(),
		}
	}
}

impl<R: LinkRoute> std::fmt::Debug for EventBus<R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let listeners = self.listeners.read();
		f.debug_struct("EventBus")
			.field("routes", &listeners.keys().collect::<Vec<_>>())
			.field(
				"listener_count",
				&listeners.values().map(Vec::len).sum::<usize>(),
			)
			.finish()
	}
}

impl<R: LinkRoute> EventBus<R> {
	/// Creates a bus that delivers on `main`.
	pub fn new(main: MainContext) -> Self {
		Self {
			listeners: Arc::new(RwLock::new(HashMap::new())),
			next_id: Arc::new(AtomicU64::new(1)),
			main,
		}
	}

	/// Subscribes `listener` to events for `route`.
	pub fn subscribe<F>(&self, route: R, listener: F) -> SubscriptionId
	where
		F: Fn(&Arc<DeepLinkRequest<R>>) + Send + Sync + 'static,
	{
		let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.listeners
			.write()
			.entry(route)
			.or_default()
			.push((id, Arc::new(listener)));
		id
	}

	/// Removes a subscription. Returns `false` if it was not found.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut listeners = self.listeners.write();
		let mut removed = false;
		for entries in listeners.values_mut() {
			let before = entries.len();
			entries.retain(|(entry_id, _)| *entry_id != id);
			removed |= entries.len() != before;
		}
		listeners.retain(|_, entries| !entries.is_empty());
		removed
	}

	/// Returns the number of listeners subscribed to `route`.
	pub fn listener_count(&self, route: R) -> usize {
		self.listeners.read().get(&route).map_or(0, Vec::len)
	}

	/// Defers delivery of `request` to the listeners of its route.
	///
	/// Listeners are looked up when the job runs, so a subscription added
	/// between publish and delivery still sees the event.
	pub fn publish(&self, request: Arc<DeepLinkRequest<R>>) -> bool {
		self.publish_if(request, |_| true)
	}

	/// Like [`EventBus::publish`], but `still_current` is evaluated when the
	/// job runs and the event is dropped if it returns `false`.
	pub fn publish_if<F>(&self, request: Arc<DeepLinkRequest<R>>, still_current: F) -> bool
	where
		F: FnOnce(&Arc<DeepLinkRequest<R>>) -> bool + Send + 'static,
	{
		let listeners = Arc::clone(&self.listeners);
		let route = request.route();
		tracing::debug!(route = ?route, "publish deferred to main context");
		self.main.dispatch(move || {
			if !still_current(&request) {
				tracing::debug!(route = ?route, "stale deep link event dropped");
				return;
			}
			// Snapshot so listeners may subscribe or unsubscribe while running.
			let targets: Vec<Listener<R>> = listeners
				.read()
				.get(&route)
				.map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)).collect())
				.unwrap_or_default();
			for listener in targets {
				listener(&request);
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::link::DeepLink;
	use crate::link_routes;
	use deeplinker_routers::Router;
	use parking_lot::Mutex;
	use rstest::rstest;

	link_routes! {
		enum BusRoute: "bus" {
			Home => "home",
			Inbox => "inbox",
		}
	}

	fn request_for(route: BusRoute) -> Arc<DeepLinkRequest<BusRoute>> {
		let mut router = Router::new();
		router.bind_route(&route.canonical_url());
		let request = router.resolve(&route.canonical_url(), None).unwrap();
		Arc::new(DeepLinkRequest::from_match(DeepLink::new(route), &request))
	}

	#[rstest]
	fn test_delivery_is_deferred_and_keyed() {
		// Arrange
		let (main, mut main_loop) = MainContext::new();
		let bus = EventBus::new(main);
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = Arc::clone(&seen);
		bus.subscribe(BusRoute::Inbox, move |req| sink.lock().push(req.route()));

		// Act
		bus.publish(request_for(BusRoute::Home));
		bus.publish(request_for(BusRoute::Inbox));

		// Assert
		assert!(seen.lock().is_empty());
		main_loop.run_pending();
		assert_eq!(*seen.lock(), vec![BusRoute::Inbox]);
	}

	#[rstest]
	fn test_unsubscribe() {
		let (main, mut main_loop) = MainContext::new();
		let bus = EventBus::new(main);
		let hits = Arc::new(Mutex::new(0));
		let counter = Arc::clone(&hits);
		let id = bus.subscribe(BusRoute::Home, move |_| *counter.lock() += 1);

		assert_eq!(bus.listener_count(BusRoute::Home), 1);
		assert!(bus.unsubscribe(id));
		assert!(!bus.unsubscribe(id));
		assert_eq!(bus.listener_count(BusRoute::Home), 0);

		bus.publish(request_for(BusRoute::Home));
		main_loop.run_pending();
		assert_eq!(*hits.lock(), 0);
	}

	#[rstest]
	#[case(false, 0)]
	#[case(true, 1)]
	fn test_publish_if_checked_at_delivery(#[case] current: bool, #[case] expected: usize) {
		// Arrange
		let (main, mut main_loop) = MainContext::new();
		let bus = EventBus::new(main);
		let hits = Arc::new(Mutex::new(0));
		let counter = Arc::clone(&hits);
		bus.subscribe(BusRoute::Home, move |_| *counter.lock() += 1);
		let flag = Arc::new(Mutex::new(true));
		let check = Arc::clone(&flag);

		// Act
		assert!(bus.publish_if(request_for(BusRoute::Home), move |_| *check.lock()));
		*flag.lock() = current;
		main_loop.run_pending();

		// Assert
		assert_eq!(*hits.lock(), expected);
	}

	#[rstest]
	fn test_payload_is_the_request() {
		let (main, mut main_loop) = MainContext::new();
		let bus = EventBus::new(main);
		let received = Arc::new(Mutex::new(None));
		let slot = Arc::clone(&received);
		bus.subscribe(BusRoute::Home, move |req| *slot.lock() = Some(Arc::clone(req)));

		let published = request_for(BusRoute::Home);
		bus.publish(Arc::clone(&published));
		main_loop.run_pending();

		let received = received.lock().take().unwrap();
		assert!(Arc::ptr_eq(&received, &published));
	}
}
