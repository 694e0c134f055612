//! Configuration of a managed port.
use pd_manager_traits::class::PortCapability;
use pd_manager_traits::{DataRole, PortData, PortType, PowerRole};

use crate::units::{ElectricCurrent, ElectricPotential, from_milliamps, from_millivolts};

/// Configuration of a managed port.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Power capability of the port.
    pub port_type: PortType,
    /// Data capability of the port.
    pub data: PortData,
    /// Preferred power role. The port returns to it when detached.
    pub preferred_role: Option<PowerRole>,
    /// Supported PD revision in BCD.
    pub pd_revision: u16,
    /// Lower bound of the voltage that is announced to the charger strategy.
    pub min_request_voltage: ElectricPotential,
    /// Lower bound of the current that is announced to the charger strategy.
    pub min_request_current: ElectricCurrent,
    /// Relay DisplayPort alternate mode events to the display queue.
    pub display_port: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port_type: PortType::Dual,
            data: PortData::Dual,
            preferred_role: Some(PowerRole::Sink),
            pd_revision: 0x0300,
            min_request_voltage: from_millivolts(5000),
            min_request_current: from_milliamps(500),
            display_port: true,
        }
    }
}

impl Config {
    /// The capability that is announced when registering the port.
    pub fn capability(&self) -> PortCapability {
        PortCapability {
            port_type: self.port_type,
            data: self.data,
            preferred_role: self.preferred_role,
            pd_revision: self.pd_revision,
        }
    }

    /// Whether the port can take a power role.
    pub fn supports_power_role(&self, role: PowerRole) -> bool {
        matches!(
            (self.port_type, role),
            (PortType::Dual, _) | (PortType::Source, PowerRole::Source) | (PortType::Sink, PowerRole::Sink)
        )
    }

    /// Whether the port can take a data role.
    pub fn supports_data_role(&self, role: DataRole) -> bool {
        matches!(
            (self.data, role),
            (PortData::Dual, _) | (PortData::Host, DataRole::Dfp) | (PortData::Device, DataRole::Ufp)
        )
    }

    /// Whether the port can be switched to a port type.
    pub fn supports_port_type(&self, port_type: PortType) -> bool {
        self.port_type == PortType::Dual || self.port_type == port_type
    }
}
