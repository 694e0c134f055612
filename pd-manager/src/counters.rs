//! Bounded counters, used for retry attempts and polling budgets.

/// Errors of counter operations.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The counter exceeded its maximum value and wrapped to zero.
    Overrun,
}

/// A counter that wraps after reaching its maximum value.
#[derive(Debug, Clone, Copy)]
pub struct Counter {
    value: u8,
    max_value: u8,
}

/// Types of counters.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CounterType {
    /// Charger type polling cycles while attached as device.
    ChargerTypePoll,
    /// Retries of a deferred probe step.
    ProbeRetry,
}

impl Counter {
    /// Create a new counter of a given type, starting at zero.
    pub fn new(counter_type: CounterType) -> Self {
        let max_value = match counter_type {
            CounterType::ChargerTypePoll => 5,
            CounterType::ProbeRetry => 5,
        };

        Self { value: 0, max_value }
    }

    /// Set the counter value, wrapping at the maximum.
    pub fn set(&mut self, value: u8) {
        self.value = value % (self.max_value + 1);
    }

    /// The present value.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// The maximum value before wrapping.
    pub fn max_value(&self) -> u8 {
        self.max_value
    }

    /// Increment the counter.
    ///
    /// Fails with [`Error::Overrun`] when the increment wraps the counter back to zero.
    pub fn increment(&mut self) -> Result<(), Error> {
        self.set(self.value + 1);

        if self.value == 0 { Err(Error::Overrun) } else { Ok(()) }
    }

    /// Reset to zero.
    pub fn reset(&mut self) {
        self.value = 0;
    }
}
