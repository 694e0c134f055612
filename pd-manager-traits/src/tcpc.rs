//! The port controller (TCPC) boundary.
//!
//! The port controller owns the electrical Type-C and PD state machines. It reports
//! changes as [`Notification`]s and answers role inquiries and swap requests.
use core::future::Future;

use crate::{DataRole, Polarity, PowerRole, RegistrationError};

/// Type-C connection states, as reported by the port controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TypecState {
    /// Nothing attached.
    Unattached,
    /// Attached as sink to a source.
    AttachedSnk,
    /// Attached as source to a sink.
    AttachedSrc,
    /// Audio adapter accessory attached.
    AttachedAudio,
    /// Debug accessory attached, local port acts as source.
    AttachedDebug,
    /// Debug accessory attached, local port acts as sink.
    AttachedDbgAccSnk,
    /// Attached as sink to a custom (non-standard) source.
    AttachedCustomSrc,
    /// Attached as sink to a source without Rp (VBUS only).
    AttachedNorpSrc,
}

/// CC line voltage levels. Sink-side levels encode the Rp value of the partner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CcVoltage {
    /// No termination.
    Open,
    /// Ra termination (cable/VCONN).
    Ra,
    /// Rd termination (sink).
    Rd,
    /// Partner advertises default USB current.
    SinkDefault,
    /// Partner advertises 1.5 A.
    Sink1_5A,
    /// Partner advertises 3.0 A.
    Sink3_0A,
    /// The port is toggling as dual role.
    DrpToggling,
}

/// Rp value that the local port advertises while acting as source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LocalRp {
    /// Default USB current.
    Default,
    /// 1.5 A.
    Rp1_5A,
    /// 3.0 A.
    Rp3_0A,
}

/// PD connection sub-states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PdConnectState {
    /// No PD connection.
    #[default]
    None,
    /// A hard reset occurred.
    HardReset,
    /// Sink ready with a PD 2.0 contract.
    PeReadySnk,
    /// Sink ready with a PD 3.0 contract.
    PeReadySnkPd30,
    /// Sink ready with a programmable (APDO) contract.
    PeReadySnkApdo,
    /// Source ready with a PD 2.0 contract.
    PeReadySrc,
    /// Source ready with a PD 3.0 contract.
    PeReadySrcPd30,
}

impl PdConnectState {
    /// Whether the policy engine reached a ready state.
    pub fn is_ready(self) -> bool {
        matches!(
            self,
            Self::PeReadySnk | Self::PeReadySnkPd30 | Self::PeReadySnkApdo | Self::PeReadySrc | Self::PeReadySrcPd30
        )
    }

    /// Whether the contract is based on a programmable power supply.
    pub fn is_programmable(self) -> bool {
        self == Self::PeReadySnkApdo
    }
}

/// Progress of a hard reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardResetState {
    /// Hard reset signaled or received.
    Begin,
    /// Hard reset completed.
    Done,
    /// Hard reset failed.
    Failed,
}

/// Type-C state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TypecStateChange {
    /// The previous state.
    pub old_state: TypecState,
    /// The new state.
    pub new_state: TypecState,
    /// Plug orientation.
    pub polarity: Polarity,
    /// Rp level of the partner, as seen on the CC line.
    pub rp_level: CcVoltage,
}

/// VBUS state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VbusState {
    /// Voltage in millivolts.
    pub millivolts: u32,
    /// Current in milliamperes.
    pub milliamps: u32,
    /// Set when the values were negotiated via PD.
    pub pd_detect: bool,
}

/// DisplayPort alternate mode state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DpState {
    /// DisplayPort mode is configured.
    pub active: bool,
    /// Selected pin assignment, one bit per assignment (A = bit 0 .. F = bit 5).
    pub pin_assignment: u8,
    /// Plug orientation.
    pub polarity: Polarity,
}

/// DisplayPort hot-plug detect state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DpHpdState {
    /// HPD interrupt requested.
    pub irq: bool,
    /// HPD level.
    pub state: bool,
}

/// Notifications that the port controller emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notification {
    /// The Type-C connection state changed.
    TypecState(TypecStateChange),
    /// The PD connection sub-state changed.
    PdState(PdConnectState),
    /// VBUS is sunk with the given values.
    SinkVbus(VbusState),
    /// VBUS shall be sourced with the given values. Zero volts means off.
    SourceVbus(VbusState),
    /// Source capabilities were received.
    SourceCapabilities,
    /// A data role swap completed, carrying the new role.
    DataRoleSwap(DataRole),
    /// A power role swap completed, carrying the new role.
    PowerRoleSwap(PowerRole),
    /// A VCONN swap completed, carrying the new VCONN role.
    VconnSwap(PowerRole),
    /// Hard reset progress.
    HardReset(HardResetState),
    /// DisplayPort alternate mode state.
    AmaDpState(DpState),
    /// DisplayPort hot-plug detect state.
    AmaDpHpdState(DpHpdState),
}

/// Type-C role for (re)negotiating the connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TypecRole {
    /// Sink only.
    Sink,
    /// Source only.
    Source,
    /// Dual role, no preference.
    Drp,
    /// Dual role, try source first.
    TrySrc,
    /// Dual role, try sink first.
    TrySnk,
}

/// Errors that the port controller reports for swap and role change requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwapError {
    /// The port partner rejected the request.
    Rejected,
    /// The port partner asked to wait.
    Wait,
    /// No response in time.
    Timeout,
    /// The request could not be issued in the present state.
    InvalidState,
}

/// Port controller trait, through which the manager talks to the TCPC/TCPM layer.
pub trait Tcpc {
    /// Look up the port controller device.
    fn lookup(&mut self) -> Result<(), RegistrationError>;

    /// Subscribe the manager to port controller notifications.
    fn register_notifier(&mut self) -> Result<(), RegistrationError>;

    /// Stop notifications.
    fn unregister_notifier(&mut self);

    /// Wait for the next notification.
    fn wait_notification(&mut self) -> impl Future<Output = Notification>;

    /// Present CC polarity.
    fn cc_polarity(&self) -> Polarity;

    /// Rp that the local port advertises as source.
    fn local_rp(&self) -> LocalRp;

    /// Present data role, as known by the PD layer.
    fn data_role(&self) -> DataRole;

    /// Present power role, as known by the PD layer.
    fn power_role(&self) -> PowerRole;

    /// Present VCONN role, as known by the PD layer.
    fn vconn_role(&self) -> PowerRole;

    /// Read the identity data objects of the partner's Discover Identity response.
    ///
    /// Writes the little-endian data objects that follow the VDM header into `buffer` and
    /// returns the number of bytes written, or `None` if no response is available. The buffer
    /// holds up to six data objects.
    fn partner_identity(&mut self, buffer: &mut [u8]) -> Option<usize>;

    /// Request a data role swap.
    fn request_data_swap(&mut self, role: DataRole) -> Result<(), SwapError>;

    /// Request a power role swap.
    fn request_power_swap(&mut self, role: PowerRole) -> Result<(), SwapError>;

    /// Request a VCONN swap.
    fn request_vconn_swap(&mut self, role: PowerRole) -> Result<(), SwapError>;

    /// Renegotiate the Type-C connection with a new role.
    fn change_typec_role(&mut self, role: TypecRole) -> Result<(), SwapError>;
}
