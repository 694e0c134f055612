//! USB data role transitions.
//!
//! The work for a data role state runs deferred. Entering a state cancels the pending work
//! before scheduling new work, so at most one polling cycle is in flight.
use pd_manager_traits::class::{Cable, CableProperty, ChargerClass, ChargerType, DisplayQueue, Extcon, PdActive, TypecClass};
use pd_manager_traits::tcpc::Tcpc;
use pd_manager_traits::{DataRole, PowerRole};

use super::Manager;
use crate::timers::{Timer, TimerType};
use crate::work::WorkHandle;

/// Inferred USB data role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRoleState {
    /// Neither host nor peripheral.
    #[default]
    Idle,
    /// Peripheral, after the charger type is known.
    Device,
    /// Host.
    Host,
    /// Data role swap from device to host in progress.
    DeviceToHost,
    /// Data role swap from host to device in progress.
    HostToDevice,
}

impl<TCPC: Tcpc, CLASS: TypecClass, EXTCON: Extcon, CHARGER: ChargerClass, DISPLAY: DisplayQueue, TIMER: Timer>
    Manager<TCPC, CLASS, EXTCON, CHARGER, DISPLAY, TIMER>
{
    /// Enter a data role state and schedule its work.
    pub(super) fn enter_data_role(&mut self, state: DataRoleState) {
        if self.work.cancel() {
            debug!("Cancelled pending work of {:?}", self.data_role);
        }

        debug!("Data role {:?} -> {:?}", self.data_role, state);
        self.data_role = state;

        if state == DataRoleState::Device {
            self.charger_poll.reset();
        }

        self.schedule_work(TimerType::RoleTransition);
    }

    fn schedule_work(&mut self, timer_type: TimerType) -> WorkHandle {
        self.work.schedule(TIMER::now_millis(), timer_type.millis())
    }

    /// Whether the charger type allows to decide on the peripheral role.
    fn charger_type_decisive(&self) -> bool {
        self.pd_active != PdActive::Inactive || matches!(self.charger.charger_type(), ChargerType::Sdp | ChargerType::Cdp)
    }

    /// The deferred work of the present data role state.
    pub(super) fn run_role_work(&mut self) {
        match self.data_role {
            DataRoleState::Idle => {
                self.stop_usb(Cable::UsbHost);
                self.stop_usb(Cable::Usb);
            }
            DataRoleState::Device => {
                if !self.charger_type_decisive() {
                    if self.charger_poll.increment().is_ok() {
                        trace!(
                            "Charger type pending, poll {}/{}",
                            self.charger_poll.value(),
                            self.charger_poll.max_value()
                        );
                        self.schedule_work(TimerType::ChargerTypePoll);
                        return;
                    }

                    warn!("Charger type still undecided, enabling peripheral");
                }

                self.stop_usb(Cable::UsbHost);
                self.start_usb(Cable::Usb);
            }
            DataRoleState::Host => {
                self.stop_usb(Cable::Usb);
                self.start_usb(Cable::UsbHost);
            }
            DataRoleState::DeviceToHost => {
                self.stop_usb(Cable::Usb);
                self.start_usb(Cable::UsbHost);
                self.data_role = DataRoleState::Host;
            }
            DataRoleState::HostToDevice => {
                self.stop_usb(Cable::UsbHost);
                self.start_usb(Cable::Usb);
                self.data_role = DataRoleState::Device;
            }
        }
    }

    /// Publish a cable as attached, along with its properties.
    pub(super) fn start_usb(&mut self, cable: Cable) {
        let polarity = self.tcpc.cc_polarity();

        debug!("Start {:?}, polarity {:?}", cable, polarity);
        self.extcon.set_property(cable, CableProperty::Polarity(polarity));
        self.extcon.set_property(cable, CableProperty::SuperSpeed(true));
        self.extcon.set_state(cable, true);
    }

    /// Publish a cable as detached.
    pub(super) fn stop_usb(&mut self, cable: Cable) {
        debug!("Stop {:?}", cable);
        self.extcon.set_state(cable, false);
    }

    pub(super) fn handle_data_role_swap(&mut self, role: DataRole) {
        match (role, self.data_role) {
            (DataRole::Ufp, DataRoleState::Host | DataRoleState::DeviceToHost) => {
                self.enter_data_role(DataRoleState::HostToDevice)
            }
            (DataRole::Dfp, DataRoleState::Device | DataRoleState::HostToDevice) => {
                self.enter_data_role(DataRoleState::DeviceToHost)
            }
            (_, state) => trace!("Data role swap to {:?} in {:?}, nothing to do", role, state),
        }

        self.class.set_data_role(&self.port, role);
    }

    pub(super) fn handle_power_role_swap(&mut self, role: PowerRole) {
        debug!("Power role swapped to {:?}", role);
        self.class.set_power_role(&self.port, role);
    }

    pub(super) fn handle_vconn_swap(&mut self, role: PowerRole) {
        debug!("VCONN role swapped to {:?}", role);
        self.class.set_vconn_role(&self.port, role);
    }
}
