//! Publication of the negotiated PD contract to the charger strategy.
use pd_manager_traits::class::{ChargerClass, DisplayQueue, Extcon, PdActive, PowerOpMode, TypecClass};
use pd_manager_traits::tcpc::{HardResetState, PdConnectState, Tcpc, VbusState};

use super::Manager;
use crate::identity::Identity;
use crate::timers::Timer;
use crate::units::{ElectricCurrent, ElectricPotential, from_milliamps, from_millivolts, to_milliamps, to_millivolts};

/// Size of the buffer that receives the partner identity.
const IDENTITY_BUFFER_SIZE: usize = 24;

/// A sink request, as announced to the charger strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinkRequest {
    /// Requested voltage.
    pub voltage: ElectricPotential,
    /// Requested current.
    pub current: ElectricCurrent,
}

impl SinkRequest {
    /// Build a request from the reported VBUS, raised to the given floors.
    pub fn clamped(vbus: &VbusState, min_voltage: ElectricPotential, min_current: ElectricCurrent) -> Self {
        let voltage = from_millivolts(vbus.millivolts);
        let current = from_milliamps(vbus.milliamps);

        Self {
            voltage: if voltage < min_voltage { min_voltage } else { voltage },
            current: if current < min_current { min_current } else { current },
        }
    }
}

impl<TCPC: Tcpc, CLASS: TypecClass, EXTCON: Extcon, CHARGER: ChargerClass, DISPLAY: DisplayQueue, TIMER: Timer>
    Manager<TCPC, CLASS, EXTCON, CHARGER, DISPLAY, TIMER>
{
    /// PD activity that follows from the last PD connection sub-state.
    fn negotiated_pd_active(&self) -> PdActive {
        if self.pd_connect_state.is_programmable() {
            PdActive::Pps
        } else {
            PdActive::Pd
        }
    }

    fn publish_pd_active(&mut self, pd_active: PdActive) {
        debug!("PD active {:?}", pd_active);
        self.pd_active = pd_active;
        self.charger.set_pd_active(pd_active);
    }

    pub(super) fn handle_sink_vbus(&mut self, vbus: VbusState) {
        if !vbus.pd_detect {
            trace!("Sink VBUS without PD contract, ignored");
            return;
        }

        let request = SinkRequest::clamped(&vbus, self.config.min_request_voltage, self.config.min_request_current);
        let millivolts = to_millivolts(request.voltage);
        let milliamps = to_milliamps(request.current);

        info!("Sink request {} mV, {} mA", millivolts, milliamps);

        self.publish_pd_active(self.negotiated_pd_active());
        self.charger.set_requested_voltage(millivolts);
        self.charger.set_requested_current(milliamps);
        self.sink_request = Some(request);
    }

    pub(super) fn handle_source_vbus(&mut self, vbus: VbusState) {
        let enable = vbus.millivolts > 0;

        debug!("Source VBUS {} mV, enable {}", vbus.millivolts, enable);
        self.charger.set_vbus_source(enable);
    }

    pub(super) fn handle_source_capabilities(&mut self) {
        self.publish_pd_active(self.negotiated_pd_active());
        self.charger.charge_capability_changed();
    }

    pub(super) fn handle_pd_state(&mut self, state: PdConnectState) {
        debug!("PD state {:?} -> {:?}", self.pd_connect_state, state);
        self.pd_connect_state = state;

        if state == PdConnectState::HardReset {
            self.publish_pd_active(PdActive::Inactive);
        } else if state.is_ready() {
            self.class.set_power_opmode(&self.port, PowerOpMode::Pd);
            self.update_partner_identity();
        }
    }

    pub(super) fn handle_hard_reset(&mut self, state: HardResetState) {
        match state {
            HardResetState::Begin => {
                warn!("Hard reset");
                self.publish_pd_active(PdActive::Inactive);
            }
            HardResetState::Done => debug!("Hard reset done"),
            HardResetState::Failed => warn!("Hard reset failed"),
        }
    }

    /// Fetch the identity of the partner once, and hand it to the Type-C class.
    fn update_partner_identity(&mut self) {
        let Some(partner) = self.partner.as_mut() else {
            return;
        };

        if partner.identity.is_some() {
            return;
        }

        let mut buffer = [0u8; IDENTITY_BUFFER_SIZE];
        let Some(length) = self.tcpc.partner_identity(&mut buffer) else {
            trace!("Partner identity not yet available");
            return;
        };

        let identity = match buffer.get(..length).map(Identity::from_bytes) {
            Some(Ok(identity)) => identity,
            Some(Err(error)) => {
                warn!("Invalid partner identity: {:?}", error);
                return;
            }
            None => {
                warn!("Partner identity of {} bytes exceeds the buffer", length);
                return;
            }
        };

        if let Err(error) = self.class.set_partner_identity(&partner.handle, &(&identity).into()) {
            warn!("Failed to set partner identity: {:?}", error);
            return;
        }

        debug!("Partner identity, VID {:#x}", identity.id_header.vid());
        partner.identity = Some(identity);
    }
}
