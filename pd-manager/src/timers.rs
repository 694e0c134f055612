//! Timers that are used by the manager.

use core::future::Future;

/// The timer trait to implement by the user application.
pub trait Timer {
    /// Expire after the specified number of milliseconds.
    fn after_millis(milliseconds: u64) -> impl Future<Output = ()>;

    /// Monotonic time in milliseconds.
    fn now_millis() -> u64;
}

/// Types of timers that are used for delays.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerType {
    /// Interval between charger type polls while attached as device.
    ChargerTypePoll,
    /// Sleep between retries of a deferred probe step.
    ProbeRetry,
    /// Role transitions run on the next turn of the work queue.
    RoleTransition,
}

impl TimerType {
    /// The duration of a timer type in milliseconds.
    pub fn millis(self) -> u64 {
        match self {
            TimerType::ChargerTypePoll => 200,
            TimerType::ProbeRetry => 100,
            TimerType::RoleTransition => 0,
        }
    }

    /// Create a new timer for a given type.
    pub fn get_timer<TIMER: Timer>(timer_type: TimerType) -> impl Future<Output = ()> {
        TIMER::after_millis(timer_type.millis())
    }
}
