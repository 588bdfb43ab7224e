//! Progress reporting for long-running build phases
//!
//! Build phases report through a [`ProgressSink`]. The terminal bar is backed
//! by indicatif and becomes a no-op when the `progress` feature is disabled.

use std::borrow::Cow;

#[cfg(feature = "progress")]
pub use indicatif::{ProgressBar, ProgressStyle};

#[cfg(not(feature = "progress"))]
pub use self::noop::*;

/// Receiver of progress updates
///
/// `current` never decreases between two calls for the same task, and the
/// last call for a task has `finished == true` and `current == total`.
pub trait ProgressSink: Send + Sync {
    fn report(&self, task: &str, current: u64, total: u64, finished: bool);
}

/// Discards all updates
#[derive(Debug, Default, Clone, Copy)]
pub struct QuietProgress;

impl ProgressSink for QuietProgress {
    fn report(&self, _task: &str, _current: u64, _total: u64, _finished: bool) {}
}

/// Tracks one task and forwards monotone updates to a sink
pub struct Progress<'a> {
    task: &'static str,
    current: u64,
    total: u64,
    sink: &'a dyn ProgressSink,
}

impl<'a> Progress<'a> {
    pub fn new(task: &'static str, total: u64, sink: &'a dyn ProgressSink) -> Self {
        sink.report(task, 0, total, false);
        Self {
            task,
            current: 0,
            total,
            sink,
        }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    /// Report an absolute count; values below the last one are dropped
    pub fn set(&mut self, count: u64) {
        if count < self.current {
            return;
        }
        self.current = count;
        self.sink.report(self.task, count, self.total, false);
    }

    pub fn advance(&mut self, delta: u64) {
        self.set(self.current + delta);
    }

    pub fn finish(self) {
        self.sink.report(self.task, self.total, self.total, true);
    }
}

/// Terminal progress bar, one bar per task
pub struct BarProgress {
    bar: parking_lot::Mutex<Option<(String, ProgressBar)>>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self {
            bar: parking_lot::Mutex::new(None),
        }
    }

    fn start(task: &str, total: u64) -> ProgressBar {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:8} {percent:>3}% [{bar:40.cyan/blue}] {elapsed_precise} (eta {eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_message(Cow::Owned(task.to_string()));
        bar
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for BarProgress {
    fn report(&self, task: &str, current: u64, total: u64, finished: bool) {
        let mut slot = self.bar.lock();

        let stale = slot.as_ref().is_none_or(|(name, _)| name != task);
        if stale {
            if let Some((_, old)) = slot.take() {
                old.finish_and_clear();
            }
            *slot = Some((task.to_string(), Self::start(task, total)));
        }

        if let Some((_, bar)) = slot.as_ref() {
            bar.set_position(current);
            if finished {
                bar.finish_with_message(Cow::Owned(format!("{task} done")));
            }
        }
        if finished {
            slot.take();
        }
    }
}

#[cfg(not(feature = "progress"))]
mod noop {
    /// No-op progress bar when `progress` feature is disabled
    #[derive(Clone)]
    pub struct ProgressBar;

    impl ProgressBar {
        pub fn new(_len: u64) -> Self {
            ProgressBar
        }

        pub fn set_style(&self, _style: ProgressStyle) {}
        pub fn set_message(&self, _msg: impl Into<std::borrow::Cow<'static, str>>) {}
        pub fn set_position(&self, _pos: u64) {}
        pub fn finish_with_message(&self, _msg: impl Into<std::borrow::Cow<'static, str>>) {}
        pub fn finish_and_clear(&self) {}
    }

    /// No-op progress style
    pub struct ProgressStyle;

    impl ProgressStyle {
        pub fn default_bar() -> Self {
            ProgressStyle
        }

        pub fn template(self, _template: &str) -> Result<Self, std::convert::Infallible> {
            Ok(self)
        }

        pub fn progress_chars(self, _chars: &str) -> Self {
            self
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Records every update for assertions
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub events: Mutex<Vec<(String, u64, u64, bool)>>,
    }

    impl ProgressSink for RecordingSink {
        fn report(&self, task: &str, current: u64, total: u64, finished: bool) {
            self.events
                .lock()
                .push((task.to_string(), current, total, finished));
        }
    }

    impl RecordingSink {
        pub(crate) fn assert_monotone(&self) {
            let events = self.events.lock();
            for pair in events.windows(2) {
                if pair[0].0 == pair[1].0 {
                    assert!(pair[0].1 <= pair[1].1, "progress went backwards: {:?}", pair);
                }
            }
        }
    }

    #[test]
    fn test_progress_is_monotone() {
        let sink = RecordingSink::default();
        let mut progress = Progress::new("sort", 10, &sink);
        progress.set(4);
        progress.set(2);
        progress.advance(3);
        progress.finish();

        let events = sink.events.lock().clone();
        let counts: Vec<u64> = events.iter().map(|e| e.1).collect();
        assert_eq!(counts, vec![0, 4, 7, 10]);
        assert!(events.last().unwrap().3);
        sink.assert_monotone();
    }

    #[test]
    fn test_bar_progress_switches_tasks() {
        let sink = BarProgress::new();
        sink.report("index", 0, 5, false);
        sink.report("index", 5, 5, true);
        sink.report("sort", 0, 5, false);
        assert!(sink.bar.lock().is_some());
        sink.report("sort", 5, 5, true);
        assert!(sink.bar.lock().is_none());
    }
}
