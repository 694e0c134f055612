//! Cancellable delayed work.
//!
//! Holds at most one pending work item. Scheduling cancels the outstanding item first,
//! so a handle that was replaced or cancelled never runs.

/// Handle of a scheduled work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WorkHandle(u32);

#[derive(Debug, Clone, Copy)]
struct Pending {
    handle: WorkHandle,
    due_at: u64,
}

/// A single delayed work item.
#[derive(Debug, Default)]
pub struct DelayedWork {
    sequence: u32,
    pending: Option<Pending>,
}

impl DelayedWork {
    /// Create an idle work item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the work to run `delay` milliseconds after `now`.
    ///
    /// An outstanding item is cancelled first.
    pub fn schedule(&mut self, now: u64, delay: u64) -> WorkHandle {
        if self.cancel() {
            trace!("Replaced pending work");
        }

        self.sequence = self.sequence.wrapping_add(1);
        let handle = WorkHandle(self.sequence);
        self.pending = Some(Pending {
            handle,
            due_at: now.saturating_add(delay),
        });

        handle
    }

    /// Cancel the outstanding item, if any. Returns whether an item was cancelled.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Whether an item is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The handle of the outstanding item.
    pub fn pending(&self) -> Option<WorkHandle> {
        self.pending.map(|pending| pending.handle)
    }

    /// The point in time when the outstanding item is due.
    pub fn due_at(&self) -> Option<u64> {
        self.pending.map(|pending| pending.due_at)
    }

    /// Claim the outstanding item for execution.
    ///
    /// Returns `false` for stale handles, i.e. items that were cancelled or replaced.
    pub fn claim(&mut self, handle: WorkHandle) -> bool {
        match self.pending {
            Some(pending) if pending.handle == handle => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DelayedWork;

    #[test]
    fn test_schedule_replaces_pending() {
        let mut work = DelayedWork::new();

        let first = work.schedule(0, 200);
        let second = work.schedule(50, 200);

        assert_ne!(first, second);
        assert_eq!(work.pending(), Some(second));
        assert_eq!(work.due_at(), Some(250));

        // The replaced item never runs.
        assert!(!work.claim(first));
        assert!(work.claim(second));
        assert!(!work.is_pending());
    }

    #[test]
    fn test_cancel() {
        let mut work = DelayedWork::new();
        assert!(!work.cancel());

        let handle = work.schedule(10, 0);
        assert!(work.cancel());
        assert!(!work.claim(handle));
        assert_eq!(work.due_at(), None);
    }
}
