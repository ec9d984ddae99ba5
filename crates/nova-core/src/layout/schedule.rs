//! Relayout scheduling.
//!
//! Any render-affecting change recomputes positions immediately and also
//! arms a single trailing recompute once the view has settled. Further
//! changes push the deadline back. A resize only recomputes immediately.

use std::time::{Duration, Instant};

/// What caused a relayout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutTrigger {
    PlanChanged,
    /// A status or log update while the pipeline runs
    ExecutionActivity,
    ExpandToggled,
    Resized,
}

impl LayoutTrigger {
    fn needs_settle(&self) -> bool {
        !matches!(self, LayoutTrigger::Resized)
    }
}

/// Debounced trailing recompute.
#[derive(Debug, Clone)]
pub struct RelayoutScheduler {
    settle: Duration,
    deadline: Option<Instant>,
}

impl RelayoutScheduler {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            deadline: None,
        }
    }

    /// Registers a change at `now`. Returns whether a trailing recompute was
    /// armed.
    pub fn notify(&mut self, trigger: LayoutTrigger, now: Instant) -> bool {
        if !trigger.needs_settle() {
            return false;
        }
        self.deadline = Some(now + self.settle);
        true
    }

    /// Returns `true` exactly once when the trailing deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_recompute_fires_once() {
        let mut scheduler = RelayoutScheduler::new(Duration::from_millis(400));
        let start = Instant::now();
        assert!(scheduler.notify(LayoutTrigger::PlanChanged, start));
        assert!(scheduler.is_pending());

        assert!(!scheduler.poll(start + Duration::from_millis(399)));
        assert!(scheduler.poll(start + Duration::from_millis(400)));
        assert!(!scheduler.poll(start + Duration::from_secs(2)));
    }

    #[test]
    fn test_new_change_pushes_deadline_back() {
        let mut scheduler = RelayoutScheduler::new(Duration::from_millis(400));
        let start = Instant::now();
        scheduler.notify(LayoutTrigger::ExecutionActivity, start);
        scheduler.notify(LayoutTrigger::ExpandToggled, start + Duration::from_millis(300));

        assert!(!scheduler.poll(start + Duration::from_millis(500)));
        assert_eq!(
            scheduler.next_deadline(),
            Some(start + Duration::from_millis(700))
        );
        assert!(scheduler.poll(start + Duration::from_millis(700)));
    }

    #[test]
    fn test_resize_is_immediate_only() {
        let mut scheduler = RelayoutScheduler::new(Duration::from_millis(400));
        let start = Instant::now();
        assert!(!scheduler.notify(LayoutTrigger::Resized, start));
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = RelayoutScheduler::new(Duration::from_millis(400));
        let start = Instant::now();
        scheduler.notify(LayoutTrigger::PlanChanged, start);
        scheduler.cancel();
        assert!(!scheduler.poll(start + Duration::from_secs(1)));
    }
}
