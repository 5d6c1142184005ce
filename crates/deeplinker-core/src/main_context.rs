//! The main serial execution context.
//!
//! Publish events are never delivered on the thread that triggered them.
//! They are queued on a [`MainContext`] and run, in order, by whoever owns
//! the matching [`MainLoop`]: either by draining it from the UI thread with
//! [`MainLoop::run_pending`] or by driving [`MainLoop::run`] on a tokio task.
//!
//! ```rust
//! use deeplinker_core::MainContext;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let (context, mut main_loop) = MainContext::new();
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&hits);
//! context.dispatch(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! assert_eq!(hits.load(Ordering::SeqCst), 0);
//! assert_eq!(main_loop.run_pending(), 1);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use tokio::sync::mpsc;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Handle used to defer work onto the main serial context.
#[derive(Debug, Clone)]
pub struct MainContext {
	sender: mpsc::UnboundedSender<Job>,
}

/// The receiving end of a [`MainContext`]. Whoever owns it *is* the main context.
#[derive(Debug)]
pub struct MainLoop {
	receiver: mpsc::UnboundedReceiver<Job>,
}

impl MainContext {
	/// Creates a context handle and the loop that executes its jobs.
	///
	/// The queue is unbounded and nothing runs until the [`MainLoop`] is
	/// driven. A loop that is kept alive but never driven retains every
	/// published event, so drive it regularly or drop it.
	#[allow(clippy::new_ret_no_self)]
	pub fn new() -> (Self, MainLoop) {
		let (sender, receiver) = mpsc::unbounded_channel();
		(Self { sender }, MainLoop { receiver })
	}

	/// Queues `job` to run on the main context.
	///
	/// Returns `false` if the [`MainLoop`] has been dropped; the job is discarded.
	pub fn dispatch<F>(&self, job: F) -> bool
	where
		F: FnOnce() + Send + 'static,
	{
		if self.sender.send(Box::new(job)).is_err() {
			tracing::warn!("main loop is gone, dropping deferred job");
			return false;
		}
		true
	}

	/// Returns whether the [`MainLoop`] has been dropped.
	pub fn is_closed(&self) -> bool {
		self.sender.is_closed()
	}
}

impl MainLoop {
	/// Runs every queued job on the calling thread, including jobs queued by
	/// the jobs themselves. Returns the number of jobs run.
	pub fn run_pending(&mut self) -> usize {
		let mut ran = 0;
		while let Ok(job) = self.receiver.try_recv() {
			job();
			ran += 1;
		}
		ran
	}

	/// Runs jobs as they arrive until every [`MainContext`] handle is dropped.
	pub async fn run(mut self) {
		while let Some(job) = self.receiver.recv().await {
			job();
		}
		tracing::debug!("main loop finished, all context handles dropped");
	}
}
