//! Type-C attach and detach handling.
use pd_manager_traits::class::{
    Accessory, ChargerClass, DisplayQueue, Extcon, PartnerDescription, PdActive, PowerOpMode, TypecClass,
};
use pd_manager_traits::tcpc::{CcVoltage, LocalRp, PdConnectState, Tcpc, TypecState, TypecStateChange};
use pd_manager_traits::{DataRole, PowerRole};

use super::{DataRoleState, Manager, Partner};
use crate::timers::Timer;

/// Groups of Type-C states that share their handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum Attachment {
    Unattached,
    Sink,
    Source,
    Audio,
}

impl From<TypecState> for Attachment {
    fn from(state: TypecState) -> Self {
        match state {
            TypecState::Unattached => Attachment::Unattached,
            TypecState::AttachedSnk
            | TypecState::AttachedNorpSrc
            | TypecState::AttachedCustomSrc
            | TypecState::AttachedDbgAccSnk => Attachment::Sink,
            TypecState::AttachedSrc | TypecState::AttachedDebug => Attachment::Source,
            TypecState::AttachedAudio => Attachment::Audio,
        }
    }
}

/// Accessory classification of a partner in a Type-C state.
fn accessory(state: TypecState) -> Accessory {
    match state {
        TypecState::AttachedAudio => Accessory::Audio,
        TypecState::AttachedDebug | TypecState::AttachedDbgAccSnk => Accessory::Debug,
        _ => Accessory::None,
    }
}

/// Power operation mode of a sink, given by the partner's Rp.
///
/// Levels outside of the sink range fall back to default USB.
pub(super) fn sink_power_opmode(rp_level: CcVoltage) -> PowerOpMode {
    match rp_level {
        CcVoltage::Sink1_5A => PowerOpMode::Current1_5A,
        CcVoltage::Sink3_0A => PowerOpMode::Current3_0A,
        _ => PowerOpMode::Usb,
    }
}

/// Power operation mode of a source, given by the local Rp.
pub(super) fn source_power_opmode(local_rp: LocalRp) -> PowerOpMode {
    match local_rp {
        LocalRp::Default => PowerOpMode::Usb,
        LocalRp::Rp1_5A => PowerOpMode::Current1_5A,
        LocalRp::Rp3_0A => PowerOpMode::Current3_0A,
    }
}

impl<TCPC: Tcpc, CLASS: TypecClass, EXTCON: Extcon, CHARGER: ChargerClass, DISPLAY: DisplayQueue, TIMER: Timer>
    Manager<TCPC, CLASS, EXTCON, CHARGER, DISPLAY, TIMER>
{
    pub(super) fn handle_typec_state(&mut self, change: TypecStateChange) {
        let TypecStateChange {
            old_state,
            new_state,
            polarity,
            rp_level,
        } = change;

        debug!(
            "Type-C state {:?} -> {:?}, polarity {:?}, rp {:?}",
            old_state, new_state, polarity, rp_level
        );

        if new_state != TypecState::Unattached && self.partner.is_none() {
            self.register_partner(new_state);
        }

        match (Attachment::from(old_state), Attachment::from(new_state)) {
            (Attachment::Unattached, Attachment::Sink) => self.attach_sink(rp_level),
            (Attachment::Sink, Attachment::Unattached) => self.enter_data_role(DataRoleState::Idle),
            (Attachment::Unattached, Attachment::Source) => self.attach_source(),
            (Attachment::Source, Attachment::Unattached) => self.detach_source(),
            (Attachment::Unattached, Attachment::Audio) | (Attachment::Audio, Attachment::Unattached) => {
                debug!("Audio accessory transition, no USB role change")
            }
            (old, new) => trace!("No role change for {:?} -> {:?}", old, new),
        }

        if new_state == TypecState::Unattached {
            self.reset_unattached();
        }
    }

    fn register_partner(&mut self, state: TypecState) {
        let accessory = accessory(state);
        let description = PartnerDescription {
            accessory,
            usb_pd: false,
        };

        match self.class.register_partner(&self.port, &description) {
            Ok(handle) => {
                debug!("Registered partner, accessory {:?}", accessory);
                self.partner = Some(Partner {
                    handle,
                    accessory,
                    identity: None,
                });
            }
            Err(error) => error!("Failed to register partner: {:?}", error),
        }

        self.charger.set_accessory_mode(accessory);
    }

    fn attach_sink(&mut self, rp_level: CcVoltage) {
        self.enter_data_role(DataRoleState::Device);

        self.class.set_data_role(&self.port, DataRole::Ufp);
        self.class.set_power_role(&self.port, PowerRole::Sink);
        self.class.set_vconn_role(&self.port, PowerRole::Sink);

        let mode = sink_power_opmode(rp_level);
        self.class.set_power_opmode(&self.port, mode);
        self.charger.set_typec_mode(Some(mode));
    }

    fn attach_source(&mut self) {
        self.charger.set_otg_present(true);
        self.enter_data_role(DataRoleState::Host);

        self.class.set_data_role(&self.port, DataRole::Dfp);
        self.class.set_power_role(&self.port, PowerRole::Source);
        self.class.set_vconn_role(&self.port, PowerRole::Source);

        let mode = source_power_opmode(self.tcpc.local_rp());
        self.class.set_power_opmode(&self.port, mode);
        self.charger.set_typec_mode(Some(mode));

        self.charger.set_vbus_source(true);
    }

    fn detach_source(&mut self) {
        self.charger.set_otg_present(false);
        self.charger.set_vbus_source(false);
        self.enter_data_role(DataRoleState::Idle);
        self.dp_present = false;
    }

    /// Drop the partner, clear published properties and return to the preferred role.
    fn reset_unattached(&mut self) {
        if let Some(partner) = self.partner.take() {
            debug!("Unregistering partner");
            self.class.unregister_partner(partner.handle);
        }

        self.pd_connect_state = PdConnectState::None;
        self.pd_active = PdActive::Inactive;
        self.sink_request = None;

        self.charger.set_pd_active(PdActive::Inactive);
        self.charger.set_requested_voltage(0);
        self.charger.set_requested_current(0);
        self.charger.set_typec_mode(None);
        self.charger.set_accessory_mode(Accessory::None);

        match self.preferred_role {
            Some(PowerRole::Source) => {
                self.class.set_data_role(&self.port, DataRole::Dfp);
                self.class.set_power_role(&self.port, PowerRole::Source);
                self.class.set_vconn_role(&self.port, PowerRole::Source);
            }
            _ => {
                self.class.set_data_role(&self.port, DataRole::Ufp);
                self.class.set_power_role(&self.port, PowerRole::Sink);
                self.class.set_vconn_role(&self.port, PowerRole::Sink);
            }
        }

        self.class.set_power_opmode(&self.port, PowerOpMode::Usb);
    }
}
