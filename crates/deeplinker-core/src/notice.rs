//! User-facing notice for links that match no route.

/// Presents the "invalid deep link" notice.
pub trait NoticePresenter: Send + Sync {
	/// Called once per URL that matched no registered route.
	fn present_invalid_link(&self, url: &str, message: &str);
}

/// Default presenter: logs the notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotice;

impl NoticePresenter for LogNotice {
	fn present_invalid_link(&self, url: &str, message: &str) {
		tracing::warn!(url = %url, "{}", message);
	}
}
