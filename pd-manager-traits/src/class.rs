//! Consumers of the manager: the host Type-C class, the external connector publisher,
//! the charger strategy and the USB display queue.
use crate::{DataRole, Polarity, PortData, PortType, PowerRole, RegistrationError};

/// Power operation mode of a Type-C port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerOpMode {
    /// Default USB current.
    Usb,
    /// Type-C current at 1.5 A.
    Current1_5A,
    /// Type-C current at 3.0 A.
    Current3_0A,
    /// Power Delivery contract.
    Pd,
}

/// Accessory classification of a partner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Accessory {
    /// Not an accessory.
    #[default]
    None,
    /// Audio adapter accessory.
    Audio,
    /// Debug accessory.
    Debug,
}

/// Capability of the port, announced when it is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortCapability {
    /// Power capability.
    pub port_type: PortType,
    /// Data capability.
    pub data: PortData,
    /// Preferred power role of a dual role port.
    pub preferred_role: Option<PowerRole>,
    /// Supported PD revision in BCD, e.g. `0x0300`.
    pub pd_revision: u16,
}

/// Description of a partner, announced when it is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PartnerDescription {
    /// Accessory classification.
    pub accessory: Accessory,
    /// Whether the partner is known to support PD.
    pub usb_pd: bool,
}

/// Raw identity data objects of a partner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Identity {
    /// ID header VDO.
    pub id_header: u32,
    /// Cert stat VDO.
    pub cert_stat: u32,
    /// Product VDO.
    pub product: u32,
}

/// Host Type-C class.
pub trait TypecClass {
    /// Handle of a registered port.
    type Port;

    /// Handle of a registered partner.
    ///
    /// Partners are unregistered by handing the handle back, so they can only be
    /// unregistered once.
    type Partner;

    /// Register a port.
    fn register_port(&mut self, capability: &PortCapability) -> Result<Self::Port, RegistrationError>;

    /// Unregister a port.
    fn unregister_port(&mut self, port: Self::Port);

    /// Register a partner on a port.
    fn register_partner(
        &mut self,
        port: &Self::Port,
        description: &PartnerDescription,
    ) -> Result<Self::Partner, RegistrationError>;

    /// Unregister a partner.
    fn unregister_partner(&mut self, partner: Self::Partner);

    /// Publish the identity of a partner.
    fn set_partner_identity(&mut self, partner: &Self::Partner, identity: &Identity) -> Result<(), RegistrationError>;

    /// Publish the data role of a port.
    fn set_data_role(&mut self, port: &Self::Port, role: DataRole);

    /// Publish the power role of a port.
    fn set_power_role(&mut self, port: &Self::Port, role: PowerRole);

    /// Publish the VCONN role of a port.
    fn set_vconn_role(&mut self, port: &Self::Port, role: PowerRole);

    /// Publish the power operation mode of a port.
    fn set_power_opmode(&mut self, port: &Self::Port, mode: PowerOpMode);
}

/// Cables that the external connector publisher knows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cable {
    /// USB device (peripheral) connection.
    Usb,
    /// USB host connection.
    UsbHost,
}

/// Properties of a cable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CableProperty {
    /// Plug orientation.
    Polarity(Polarity),
    /// SuperSpeed lanes are usable.
    SuperSpeed(bool),
}

/// External connector publisher.
pub trait Extcon {
    /// Register the publisher for a set of cables.
    fn register(&mut self, cables: &[Cable]) -> Result<(), RegistrationError>;

    /// Set a property of a cable. Properties are consumed on the next state change.
    fn set_property(&mut self, cable: Cable, property: CableProperty);

    /// Set the attach state of a cable.
    fn set_state(&mut self, cable: Cable, attached: bool);
}

/// PD activity, as announced to the charger strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PdActive {
    /// No PD contract.
    #[default]
    Inactive,
    /// Fixed supply PD contract.
    Pd,
    /// Programmable power supply contract.
    Pps,
}

/// Charger types, as detected by BC1.2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChargerType {
    /// Detection did not finish yet.
    #[default]
    Unknown,
    /// Standard downstream port.
    Sdp,
    /// Charging downstream port.
    Cdp,
    /// Dedicated charging port.
    Dcp,
    /// Non-standard charger.
    NonStandard,
}

/// Charger strategy.
pub trait ChargerClass {
    /// Present charger type.
    fn charger_type(&self) -> ChargerType;

    /// Announce PD activity.
    fn set_pd_active(&mut self, active: PdActive);

    /// Announce the requested voltage.
    fn set_requested_voltage(&mut self, millivolts: u32);

    /// Announce the requested current.
    fn set_requested_current(&mut self, milliamps: u32);

    /// Announce the Type-C power mode, or `None` when detached.
    fn set_typec_mode(&mut self, mode: Option<PowerOpMode>);

    /// Announce the accessory classification.
    fn set_accessory_mode(&mut self, accessory: Accessory);

    /// Announce the presence of an OTG (sink) partner.
    fn set_otg_present(&mut self, present: bool);

    /// Enable or disable sourcing VBUS.
    fn set_vbus_source(&mut self, enable: bool);

    /// Announce that the charge capability changed, e.g. after new source capabilities.
    fn charge_capability_changed(&mut self);
}

/// Lane configuration for DisplayPort over Type-C.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComboMode {
    /// Two lanes DisplayPort, SuperSpeed USB on the other two.
    UsbAndDp2Lane,
    /// Four lanes DisplayPort.
    Dp4Lane,
}

/// Hot-plug detect events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HpdEvent {
    /// Monitor plugged in.
    PlugIn,
    /// Monitor plugged out.
    PlugOut,
    /// HPD interrupt.
    Irq,
}

/// Events for the USB display queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayEvent {
    /// Configure the combo PHY.
    Combo {
        /// Lane configuration.
        mode: ComboMode,
        /// Plug orientation.
        polarity: Polarity,
    },
    /// Forward a hot-plug detect event.
    Hpd(HpdEvent),
}

/// USB display queue.
pub trait DisplayQueue {
    /// Queue an event.
    fn queue(&mut self, event: DisplayEvent);
}

/// Port operations that the host Type-C class invokes.
pub trait PortOperations {
    /// Error type.
    type Error;

    /// Set the role to try first when toggling. `None` means no preference.
    fn try_role(&mut self, role: Option<PowerRole>) -> Result<(), Self::Error>;

    /// Set the data role.
    fn dr_set(&mut self, role: DataRole) -> Result<(), Self::Error>;

    /// Set the power role.
    fn pr_set(&mut self, role: PowerRole) -> Result<(), Self::Error>;

    /// Set the VCONN role.
    fn vconn_set(&mut self, role: PowerRole) -> Result<(), Self::Error>;

    /// Set the port type.
    fn port_type_set(&mut self, port_type: PortType) -> Result<(), Self::Error>;
}
