//! Implements a dummy platform and timer for testing.
//!
//! A single [`DummyPlatform`] stands in for every collaborator of the manager. All of its
//! clones share one [`State`], which records the calls in order and holds scripted replies.
use std::cell::{RefCell, RefMut};
use std::collections::VecDeque;
use std::future::pending;
use std::rc::Rc;
use std::vec::Vec;

use pd_manager_traits::class::{
    Accessory, Cable, CableProperty, ChargerClass, ChargerType, DisplayEvent, DisplayQueue, Extcon, Identity,
    PartnerDescription, PdActive, PortCapability, PowerOpMode, TypecClass,
};
use pd_manager_traits::tcpc::{LocalRp, Notification, SwapError, Tcpc, TypecRole};
use pd_manager_traits::{DataRole, Polarity, PowerRole, RegistrationError};

use crate::timers::Timer;

/// A call that the manager made into the platform.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    ExtconRegister,
    TcpcLookup,
    RegisterNotifier,
    UnregisterNotifier,
    RegisterPort,
    UnregisterPort,
    RegisterPartner(PartnerDescription),
    UnregisterPartner(u32),
    PartnerIdentity(Identity),
    DataRole(DataRole),
    PowerRole(PowerRole),
    VconnRole(PowerRole),
    PowerOpMode(PowerOpMode),
    CableProperty(Cable, CableProperty),
    CableState(Cable, bool),
    PdActive(PdActive),
    RequestedVoltage(u32),
    RequestedCurrent(u32),
    TypecMode(Option<PowerOpMode>),
    AccessoryMode(Accessory),
    OtgPresent(bool),
    VbusSource(bool),
    ChargeCapabilityChanged,
    DataSwap(DataRole),
    PowerSwap(PowerRole),
    VconnSwap(PowerRole),
    TypecRole(TypecRole),
    Display(DisplayEvent),
}

/// Shared state of the dummy platform.
pub struct State {
    /// Recorded calls, oldest first.
    pub events: Vec<Event>,
    /// Notifications to deliver, oldest first.
    pub notifications: VecDeque<Notification>,

    /// Errors to return from successive extcon registrations. Empty means success.
    pub extcon_errors: VecDeque<RegistrationError>,
    /// Errors to return from successive port controller lookups.
    pub lookup_errors: VecDeque<RegistrationError>,
    /// Errors to return from successive port registrations.
    pub port_errors: VecDeque<RegistrationError>,
    /// Errors to return from successive notifier registrations.
    pub notifier_errors: VecDeque<RegistrationError>,
    /// Errors to return from successive partner registrations.
    pub partner_errors: VecDeque<RegistrationError>,

    /// Error to return from swap requests and role changes.
    pub swap_error: Option<SwapError>,

    /// CC polarity.
    pub polarity: Polarity,
    /// Local Rp.
    pub local_rp: LocalRp,
    /// Data role as known by the PD layer.
    pub data_role: DataRole,
    /// Power role as known by the PD layer.
    pub power_role: PowerRole,
    /// VCONN role as known by the PD layer.
    pub vconn_role: PowerRole,
    /// Discover Identity response data objects, if any.
    pub identity: Option<Vec<u8>>,
    /// BC1.2 charger type.
    pub charger_type: ChargerType,

    partner_sequence: u32,
    live_partners: u32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            notifications: VecDeque::new(),
            extcon_errors: VecDeque::new(),
            lookup_errors: VecDeque::new(),
            port_errors: VecDeque::new(),
            notifier_errors: VecDeque::new(),
            partner_errors: VecDeque::new(),
            swap_error: None,
            polarity: Polarity::Cc1,
            local_rp: LocalRp::Default,
            data_role: DataRole::Ufp,
            power_role: PowerRole::Sink,
            vconn_role: PowerRole::Sink,
            identity: None,
            charger_type: ChargerType::Unknown,
            partner_sequence: 0,
            live_partners: 0,
        }
    }
}

impl State {
    /// Number of partners that are registered and not yet unregistered.
    pub fn live_partners(&self) -> u32 {
        self.live_partners
    }

    /// Number of recorded calls that match `predicate`.
    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }

    /// The most recent recorded call that matches `predicate`.
    pub fn last(&self, predicate: impl Fn(&Event) -> bool) -> Option<Event> {
        self.events.iter().rev().find(|event| predicate(event)).copied()
    }
}

/// A dummy platform, implementing every collaborator trait.
#[derive(Clone, Default)]
pub struct DummyPlatform {
    state: Rc<RefCell<State>>,
}

impl DummyPlatform {
    /// Create a new dummy platform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the shared state.
    pub fn state(&self) -> RefMut<'_, State> {
        self.state.borrow_mut()
    }

    /// Queue a notification for delivery.
    pub fn notify(&self, notification: Notification) {
        self.state().notifications.push_back(notification);
    }

    /// Take all recorded calls.
    pub fn take_events(&self) -> Vec<Event> {
        core::mem::take(&mut self.state().events)
    }

    fn record(&self, event: Event) {
        self.state().events.push(event);
    }

    fn swap_result(&self, event: Event) -> Result<(), SwapError> {
        let mut state = self.state();
        state.events.push(event);

        match state.swap_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn scripted(errors: &mut VecDeque<RegistrationError>) -> Result<(), RegistrationError> {
    match errors.pop_front() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

impl Tcpc for DummyPlatform {
    fn lookup(&mut self) -> Result<(), RegistrationError> {
        self.record(Event::TcpcLookup);
        scripted(&mut self.state().lookup_errors)
    }

    fn register_notifier(&mut self) -> Result<(), RegistrationError> {
        self.record(Event::RegisterNotifier);
        scripted(&mut self.state().notifier_errors)
    }

    fn unregister_notifier(&mut self) {
        self.record(Event::UnregisterNotifier);
    }

    async fn wait_notification(&mut self) -> Notification {
        let next = self.state().notifications.pop_front();

        match next {
            Some(notification) => notification,
            // Nothing left to deliver.
            None => pending().await,
        }
    }

    fn cc_polarity(&self) -> Polarity {
        self.state.borrow().polarity
    }

    fn local_rp(&self) -> LocalRp {
        self.state.borrow().local_rp
    }

    fn data_role(&self) -> DataRole {
        self.state.borrow().data_role
    }

    fn power_role(&self) -> PowerRole {
        self.state.borrow().power_role
    }

    fn vconn_role(&self) -> PowerRole {
        self.state.borrow().vconn_role
    }

    fn partner_identity(&mut self, buffer: &mut [u8]) -> Option<usize> {
        let state = self.state();
        let identity = state.identity.as_ref()?;

        buffer[..identity.len()].copy_from_slice(identity);
        Some(identity.len())
    }

    fn request_data_swap(&mut self, role: DataRole) -> Result<(), SwapError> {
        self.swap_result(Event::DataSwap(role))
    }

    fn request_power_swap(&mut self, role: PowerRole) -> Result<(), SwapError> {
        self.swap_result(Event::PowerSwap(role))
    }

    fn request_vconn_swap(&mut self, role: PowerRole) -> Result<(), SwapError> {
        self.swap_result(Event::VconnSwap(role))
    }

    fn change_typec_role(&mut self, role: TypecRole) -> Result<(), SwapError> {
        self.swap_result(Event::TypecRole(role))
    }
}

/// A dummy Type-C port handle.
#[derive(Debug)]
pub struct DummyPort;

/// A dummy partner handle. Carries the registration sequence number.
#[derive(Debug)]
pub struct DummyPartner(pub u32);

impl TypecClass for DummyPlatform {
    type Port = DummyPort;
    type Partner = DummyPartner;

    fn register_port(&mut self, _capability: &PortCapability) -> Result<Self::Port, RegistrationError> {
        self.record(Event::RegisterPort);
        scripted(&mut self.state().port_errors).map(|_| DummyPort)
    }

    fn unregister_port(&mut self, _port: Self::Port) {
        self.record(Event::UnregisterPort);
    }

    fn register_partner(
        &mut self,
        _port: &Self::Port,
        description: &PartnerDescription,
    ) -> Result<Self::Partner, RegistrationError> {
        let mut state = self.state();
        state.events.push(Event::RegisterPartner(*description));
        scripted(&mut state.partner_errors)?;

        state.partner_sequence += 1;
        state.live_partners += 1;
        Ok(DummyPartner(state.partner_sequence))
    }

    fn unregister_partner(&mut self, partner: Self::Partner) {
        let mut state = self.state();
        state.events.push(Event::UnregisterPartner(partner.0));
        state.live_partners -= 1;
    }

    fn set_partner_identity(&mut self, _partner: &Self::Partner, identity: &Identity) -> Result<(), RegistrationError> {
        self.record(Event::PartnerIdentity(*identity));
        Ok(())
    }

    fn set_data_role(&mut self, _port: &Self::Port, role: DataRole) {
        self.record(Event::DataRole(role));
    }

    fn set_power_role(&mut self, _port: &Self::Port, role: PowerRole) {
        self.record(Event::PowerRole(role));
    }

    fn set_vconn_role(&mut self, _port: &Self::Port, role: PowerRole) {
        self.record(Event::VconnRole(role));
    }

    fn set_power_opmode(&mut self, _port: &Self::Port, mode: PowerOpMode) {
        self.record(Event::PowerOpMode(mode));
    }
}

impl Extcon for DummyPlatform {
    fn register(&mut self, _cables: &[Cable]) -> Result<(), RegistrationError> {
        self.record(Event::ExtconRegister);
        scripted(&mut self.state().extcon_errors)
    }

    fn set_property(&mut self, cable: Cable, property: CableProperty) {
        self.record(Event::CableProperty(cable, property));
    }

    fn set_state(&mut self, cable: Cable, attached: bool) {
        self.record(Event::CableState(cable, attached));
    }
}

impl ChargerClass for DummyPlatform {
    fn charger_type(&self) -> ChargerType {
        self.state.borrow().charger_type
    }

    fn set_pd_active(&mut self, active: PdActive) {
        self.record(Event::PdActive(active));
    }

    fn set_requested_voltage(&mut self, millivolts: u32) {
        self.record(Event::RequestedVoltage(millivolts));
    }

    fn set_requested_current(&mut self, milliamps: u32) {
        self.record(Event::RequestedCurrent(milliamps));
    }

    fn set_typec_mode(&mut self, mode: Option<PowerOpMode>) {
        self.record(Event::TypecMode(mode));
    }

    fn set_accessory_mode(&mut self, accessory: Accessory) {
        self.record(Event::AccessoryMode(accessory));
    }

    fn set_otg_present(&mut self, present: bool) {
        self.record(Event::OtgPresent(present));
    }

    fn set_vbus_source(&mut self, enable: bool) {
        self.record(Event::VbusSource(enable));
    }

    fn charge_capability_changed(&mut self) {
        self.record(Event::ChargeCapabilityChanged);
    }
}

impl DisplayQueue for DummyPlatform {
    fn queue(&mut self, event: DisplayEvent) {
        self.record(Event::Display(event));
    }
}

/// A dummy timer for testing.
pub struct DummyTimer {}

impl Timer for DummyTimer {
    async fn after_millis(_milliseconds: u64) {
        // Expire immediately.
    }

    fn now_millis() -> u64 {
        0
    }
}

/// Identity of a PD hub, as the data objects of a Discover Identity response.
///
/// - ID header: host and device data, UFP hub, VID 0x2109
/// - Cert stat: XID 0x00000123
/// - Product: PID 0x0103, bcdDevice 0x0100
pub const DUMMY_IDENTITY: [u8; 12] = [
    0x09, 0x21, 0x00, 0xC8, // ID header
    0x23, 0x01, 0x00, 0x00, // Cert stat
    0x00, 0x01, 0x03, 0x01, // Product
];
