//! Single-slot, drop-old mailbox.
//!
//! A [`Mailbox`] holds at most one value. Every [`put`](Mailbox::put)
//! replaces whatever is there and hands the displaced value back; once the
//! caller drops it, the old value is gone for good. There is no queue.

use parking_lot::Mutex;
use std::sync::Arc;

/// A single-slot cell whose writes overwrite the previous value.
#[derive(Debug)]
pub struct Mailbox<T> {
	slot: Mutex<Option<Arc<T>>>,
}

impl<T> Default for Mailbox<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Mailbox<T> {
	/// Creates an empty mailbox.
	pub fn new() -> Self {
		Self {
			slot: Mutex::new(None),
		}
	}

	/// Stores `value`, returning the value it displaced.
	pub fn put(&self, value: Arc<T>) -> Option<Arc<T>> {
		self.slot.lock().replace(value)
	}

	/// Returns the current value without removing it.
	pub fn peek(&self) -> Option<Arc<T>> {
		self.slot.lock().clone()
	}

	/// Removes and returns the current value.
	pub fn take(&self) -> Option<Arc<T>> {
		self.slot.lock().take()
	}

	/// Removes the current value only if it is `expected` (by identity).
	///
	/// Returns `false` when the slot is empty or holds a newer value.
	pub fn take_exact(&self, expected: &Arc<T>) -> bool {
		let mut slot = self.slot.lock();
		match slot.as_ref() {
			Some(current) if Arc::ptr_eq(current, expected) => {
				*slot = None;
				true
			}
			_ => false,
		}
	}

	/// Returns whether the slot currently holds `expected` (by identity).
	pub fn holds(&self, expected: &Arc<T>) -> bool {
		self.slot
			.lock()
			.as_ref()
			.is_some_and(|current| Arc::ptr_eq(current, expected))
	}

	/// Empties the mailbox.
	pub fn clear(&self) {
		self.slot.lock().take();
	}

	/// Returns whether the mailbox is empty.
	pub fn is_empty(&self) -> bool {
		self.slot.lock().is_none()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_starts_empty() {
		let mailbox: Mailbox<u32> = Mailbox::new();
		assert!(mailbox.is_empty());
		assert!(mailbox.peek().is_none());
	}

	#[rstest]
	fn test_put_overwrites_and_returns_displaced() {
		// Arrange
		let mailbox = Mailbox::new();

		// Act
		let first = mailbox.put(Arc::new("first"));
		let second = mailbox.put(Arc::new("second"));

		// Assert
		assert!(first.is_none());
		assert_eq!(second.as_deref(), Some(&"first"));
		assert_eq!(mailbox.peek().as_deref(), Some(&"second"));
	}

	#[rstest]
	fn test_take_empties() {
		let mailbox = Mailbox::new();
		mailbox.put(Arc::new(1));
		assert_eq!(mailbox.take().as_deref(), Some(&1));
		assert!(mailbox.is_empty());
		assert!(mailbox.take().is_none());
	}

	#[rstest]
	fn test_take_exact_ignores_newer_value() {
		let mailbox = Mailbox::new();
		let old = Arc::new(1);
		mailbox.put(Arc::clone(&old));
		mailbox.put(Arc::new(1));

		assert!(!mailbox.take_exact(&old));
		assert!(!mailbox.is_empty());
	}

	#[rstest]
	fn test_holds_checks_identity() {
		let mailbox = Mailbox::new();
		let old = Arc::new(7);
		mailbox.put(Arc::clone(&old));
		assert!(mailbox.holds(&old));

		let newer = Arc::new(7);
		mailbox.put(Arc::clone(&newer));
		assert!(!mailbox.holds(&old));
		assert!(mailbox.holds(&newer));

		mailbox.clear();
		assert!(!mailbox.holds(&newer));
	}

	#[rstest]
	fn test_take_exact_removes_same_value() {
		let mailbox = Mailbox::new();
		let value = Arc::new(1);
		mailbox.put(Arc::clone(&value));

		assert!(mailbox.take_exact(&value));
		assert!(mailbox.is_empty());
	}

	#[rstest]
	fn test_clear() {
		let mailbox = Mailbox::new();
		mailbox.put(Arc::new(1));
		mailbox.clear();
		assert!(mailbox.is_empty());
	}
}
