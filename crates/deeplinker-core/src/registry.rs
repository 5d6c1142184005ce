//! One [`DeepLinker`] per route enumeration.
//!
//! The registry is an ordinary value: build it once at startup and hand it
//! (or the linkers it returns) to whatever registers or consumes deep links.
//! Linkers are created on first request for a type and live as long as the
//! registry.

use crate::link::LinkRoute;
use crate::linker::DeepLinker;
use crate::main_context::MainContext;
use crate::notice::{LogNotice, NoticePresenter};
use crate::settings::LinkerSettings;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Lazily created linkers keyed by route type.
pub struct LinkerRegistry {
	main: MainContext,
	settings: LinkerSettings,
	notices: Arc<dyn NoticePresenter>,
	linkers: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl std::fmt::Debug for LinkerRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LinkerRegistry")
			.field("linkers_count", &self.linkers.read().len())
			.field("settings", &self.settings)
			.finish()
	}
}

impl LinkerRegistry {
	/// Creates a registry whose linkers publish on `main`.
	pub fn new(main: MainContext) -> Self {
		Self::with_settings(main, LinkerSettings::default())
	}

	/// Creates a registry whose linkers share `settings`.
	pub fn with_settings(main: MainContext, settings: LinkerSettings) -> Self {
		Self {
			main,
			settings,
			notices: Arc::new(LogNotice),
			linkers: RwLock::new(HashMap::new()),
		}
	}

	/// Sets the notice presenter handed to linkers created from now on.
	pub fn with_notice_presenter(mut self, presenter: Arc<dyn NoticePresenter>) -> Self {
		self.notices = presenter;
		self
	}

	/// Returns the linker for `R`, creating it on first access.
	///
	/// Concurrent first calls for the same `R` all receive the same instance.
	pub fn linker<R: LinkRoute>(&self) -> Arc<DeepLinker<R>> {
		let key = TypeId::of::<R>();

		// Try to get existing linker
		{
			let linkers = self.linkers.read();
			if let Some(existing) = linkers.get(&key)
				&& let Ok(linker) = Arc::clone(existing).downcast::<DeepLinker<R>>()
			{
				return linker;
			}
		}

		// Re-check under the write lock: another thread may have won the race.
		let mut linkers = self.linkers.write();
		let entry = linkers.entry(key).or_insert_with(|| {
			tracing::debug!(scheme = R::SCHEME, "creating deep linker");
			let linker = DeepLinker::<R>::with_settings(self.main.clone(), self.settings.clone())
				.with_notice_presenter(Arc::clone(&self.notices));
			Arc::new(linker) as Arc<dyn Any + Send + Sync>
		});
		match Arc::clone(entry).downcast::<DeepLinker<R>>() {
			Ok(linker) => linker,
			Err(_) => unreachable!("linker registry entry keyed by TypeId has a different type"),
		}
	}

	/// Returns whether a linker for `R` has been created.
	pub fn contains<R: LinkRoute>(&self) -> bool {
		self.linkers.read().contains_key(&TypeId::of::<R>())
	}

	/// Returns the number of linkers created so far.
	pub fn len(&self) -> usize {
		self.linkers.read().len()
	}

	/// Returns whether no linker has been created yet.
	pub fn is_empty(&self) -> bool {
		self.linkers.read().is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::link_routes;
	use rstest::rstest;

	link_routes! {
		enum ShopRoute: "shop" {
			Cart => "cart",
		}
	}

	link_routes! {
		enum MailRoute: "mail" {
			Inbox => "inbox",
		}
	}

	#[rstest]
	fn test_same_type_same_instance() {
		// Arrange
		let (main, _main_loop) = MainContext::new();
		let registry = LinkerRegistry::new(main);

		// Act
		let a = registry.linker::<ShopRoute>();
		let b = registry.linker::<ShopRoute>();

		// Assert
		assert!(Arc::ptr_eq(&a, &b));
		assert_eq!(registry.len(), 1);
	}

	#[rstest]
	fn test_types_are_isolated() {
		let (main, _main_loop) = MainContext::new();
		let registry = LinkerRegistry::new(main);

		registry.linker::<ShopRoute>().register_routes(None);
		let mail = registry.linker::<MailRoute>();

		assert!(registry.contains::<ShopRoute>());
		assert!(registry.contains::<MailRoute>());
		assert!(mail.links().is_empty());
		assert!(!mail.route_url("shop://cart"));
	}

	#[rstest]
	fn test_concurrent_first_access_creates_once() {
		// Arrange
		let (main, _main_loop) = MainContext::new();
		let registry = LinkerRegistry::new(main);

		// Act
		let linkers: Vec<Arc<DeepLinker<ShopRoute>>> = std::thread::scope(|scope| {
			let handles: Vec<_> = (0..8)
				.map(|_| scope.spawn(|| registry.linker::<ShopRoute>()))
				.collect();
			handles.into_iter().map(|h| h.join().unwrap()).collect()
		});

		// Assert
		assert_eq!(registry.len(), 1);
		assert!(linkers.iter().all(|l| Arc::ptr_eq(l, &linkers[0])));
	}

	#[rstest]
	fn test_settings_shared_with_linkers() {
		let (main, _main_loop) = MainContext::new();
		let settings = LinkerSettings::default().with_invalid_link_notice("Unknown link");
		let registry = LinkerRegistry::with_settings(main, settings.clone());

		assert_eq!(registry.linker::<MailRoute>().settings(), &settings);
	}
}
