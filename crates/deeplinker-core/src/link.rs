//! Route enumerations and authorization-gated deep links.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Predicate deciding whether a matched deep link may be acted on right now.
pub type AuthorizationTest = Arc<dyn Fn() -> bool + Send + Sync>;

/// A closed set of logical routes sharing one URL scheme.
///
/// Implementors declare their cases explicitly through [`LinkRoute::all`];
/// the [`link_routes!`](crate::link_routes) macro generates both the enum and
/// the list.
pub trait LinkRoute: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
	/// Scheme shared by every case, without `://`.
	const SCHEME: &'static str;

	/// Raw identifier of this case. Unique within the set.
	fn id(&self) -> &'static str;

	/// Every case, in declaration order.
	fn all() -> &'static [Self];

	/// Looks a case up by its raw identifier.
	fn from_id(id: &str) -> Option<Self> {
		Self::all().iter().copied().find(|route| route.id() == id)
	}

	/// The canonical `<scheme>://<id>` URL of this case.
	fn canonical_url(&self) -> String {
		format!("{}://{}", Self::SCHEME, self.id())
	}
}

/// Declares a route enumeration and implements [`LinkRoute`] for it.
///
/// ```rust
/// use deeplinker_core::{LinkRoute, link_routes};
///
/// link_routes! {
///     /// Routes of the example app.
///     pub enum AppRoute: "myapp" {
///         Home => "home",
///         Settings => "settings",
///     }
/// }
///
/// assert_eq!(AppRoute::all(), &[AppRoute::Home, AppRoute::Settings]);
/// assert_eq!(AppRoute::Settings.canonical_url(), "myapp://settings");
/// ```
#[macro_export]
macro_rules! link_routes {
	(
		$(#[$meta:meta])*
		$vis:vis enum $name:ident : $scheme:literal {
			$( $(#[$vmeta:meta])* $variant:ident => $id:literal ),+ $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		$vis enum $name {
			$( $(#[$vmeta])* $variant ),+
		}

		impl $crate::LinkRoute for $name {
			const SCHEME: &'static str = $scheme;

			fn id(&self) -> &'static str {
				match self {
					$( Self::$variant => $id ),+
				}
			}

			fn all() -> &'static [Self] {
				&[ $( Self::$variant ),+ ]
			}
		}
	};
}

/// One route case paired with an optional authorization predicate.
#[derive(Clone)]
pub struct DeepLink<R> {
	route: R,
	authorization: Option<AuthorizationTest>,
}

impl<R: LinkRoute> DeepLink<R> {
	/// Creates an ungated deep link.
	pub fn new(route: R) -> Self {
		Self {
			route,
			authorization: None,
		}
	}

	/// Creates a deep link gated by `test`.
	pub fn with_authorization<F>(route: R, test: F) -> Self
	where
		F: Fn() -> bool + Send + Sync + 'static,
	{
		Self {
			route,
			authorization: Some(Arc::new(test)),
		}
	}

	/// Creates a deep link from an already shared predicate.
	pub fn gated_by(route: R, authorization: Option<AuthorizationTest>) -> Self {
		Self {
			route,
			authorization,
		}
	}

	/// Returns the route case.
	pub fn route(&self) -> R {
		self.route
	}

	/// Returns whether an authorization predicate is attached.
	pub fn is_gated(&self) -> bool {
		self.authorization.is_some()
	}

	/// Evaluates the predicate now. Ungated links are always actionable.
	pub fn is_actionable(&self) -> bool {
		self.authorization.as_ref().is_none_or(|test| test())
	}

	/// The template this link is registered under.
	pub fn template(&self) -> String {
		self.route.canonical_url()
	}
}

impl<R: fmt::Debug> fmt::Debug for DeepLink<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DeepLink")
			.field("route", &self.route)
			.field("is_gated", &self.authorization.is_some())
			.finish()
	}
}
