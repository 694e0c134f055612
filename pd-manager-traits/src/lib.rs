//! USB PD manager boundary traits.
//!
//! Provides the traits through which the PD manager talks to the port controller,
//! the host Type-C class, the external connector publisher, the charger strategy
//! and the USB display queue.
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

pub mod class;
pub mod tcpc;

/// Power role of a port, also used for the VCONN role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerRole {
    /// Consumes power (or VCONN off).
    Sink,
    /// Provides power (or VCONN on).
    Source,
}

impl From<bool> for PowerRole {
    fn from(value: bool) -> Self {
        match value {
            false => Self::Sink,
            true => Self::Source,
        }
    }
}

impl From<PowerRole> for bool {
    fn from(role: PowerRole) -> bool {
        match role {
            PowerRole::Sink => false,
            PowerRole::Source => true,
        }
    }
}

/// Data role of a port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRole {
    /// Upstream facing port, acts as USB device.
    Ufp,
    /// Downstream facing port, acts as USB host.
    Dfp,
}

impl From<bool> for DataRole {
    fn from(value: bool) -> Self {
        match value {
            false => Self::Ufp,
            true => Self::Dfp,
        }
    }
}

impl From<DataRole> for bool {
    fn from(role: DataRole) -> bool {
        match role {
            DataRole::Ufp => false,
            DataRole::Dfp => true,
        }
    }
}

/// Orientation of the plug, given by the CC line that carries the connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Connected through CC1.
    #[default]
    Cc1,
    /// Connected through CC2 (flipped plug).
    Cc2,
}

/// Port type, as configured or as requested by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PortType {
    /// Source only.
    Source,
    /// Sink only.
    Sink,
    /// Dual role power.
    Dual,
}

/// USB data capability of a port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PortData {
    /// Host only.
    Host,
    /// Device only.
    Device,
    /// Dual role data.
    Dual,
}

/// Errors of registration steps, e.g. during probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationError {
    /// A dependency is not available yet. The step may be retried later.
    Defer,
    /// The step failed and shall not be retried.
    Failed,
}
