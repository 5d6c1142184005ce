//! Consumers that service pending deep links.

use crate::events::{EventBus, SubscriptionId};
use crate::link::LinkRoute;
use crate::mailbox::Mailbox;
use crate::request::DeepLinkRequest;
use std::sync::Arc;

/// A collaborator that services deep links for a subset of route cases.
pub trait DeepLinkConsumer<R: LinkRoute>: Send + Sync {
	/// Route cases this consumer services.
	fn serviced_routes(&self) -> Vec<R>;

	/// Acts on a request. Called at most once per request.
	fn service(&self, request: &DeepLinkRequest<R>);
}

/// Services `request` with `consumer` if it is relevant, actionable, and
/// still the pending one. The request leaves the mailbox when serviced.
pub(crate) fn service_if_ready<R, C>(
	consumer: &C,
	routes: &[R],
	mailbox: &Mailbox<DeepLinkRequest<R>>,
	request: &Arc<DeepLinkRequest<R>>,
) -> bool
where
	R: LinkRoute,
	C: DeepLinkConsumer<R> + ?Sized,
{
	if !routes.contains(&request.route()) {
		return false;
	}
	if !request.is_actionable() {
		tracing::debug!(route = ?request.route(), "pending deep link not actionable yet");
		return false;
	}
	if !mailbox.take_exact(request) {
		// Overwritten or already serviced since publish.
		return false;
	}
	consumer.service(request);
	true
}

/// Keeps a consumer subscribed. Dropping it removes every subscription.
#[must_use = "dropping the handle detaches the consumer"]
pub struct ConsumerHandle<R: LinkRoute> {
	events: EventBus<R>,
	subscriptions: Vec<SubscriptionId>,
	serviced_on_attach: bool,
}

impl<R: LinkRoute> ConsumerHandle<R> {
	pub(crate) fn new(
		events: EventBus<R>,
		subscriptions: Vec<SubscriptionId>,
		serviced_on_attach: bool,
	) -> Self {
		Self {
			events,
			subscriptions,
			serviced_on_attach,
		}
	}

	/// Returns whether a pending request was serviced during attach.
	pub fn serviced_on_attach(&self) -> bool {
		self.serviced_on_attach
	}

	/// Returns the number of live subscriptions.
	pub fn subscription_count(&self) -> usize {
		self.subscriptions.len()
	}

	/// Detaches the consumer now.
	pub fn detach(self) {}
}

impl<R: LinkRoute> Drop for ConsumerHandle<R> {
	fn drop(&mut self) {
		for id in self.subscriptions.drain(..) {
			self.events.unsubscribe(id);
		}
	}
}

impl<R: LinkRoute> std::fmt::Debug for ConsumerHandle<R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ConsumerHandle")
			.field("subscriptions", &self.subscriptions)
			.field("serviced_on_attach", &self.serviced_on_attach)
			.finish()
	}
}
