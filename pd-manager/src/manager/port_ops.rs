//! Port operations of the Type-C class.
//!
//! Every operation is a "swap if needed": the present role is inquired from the PD layer
//! first, and an equal role succeeds without a request.
use pd_manager_traits::class::{ChargerClass, DisplayQueue, Extcon, PortOperations, TypecClass};
use pd_manager_traits::tcpc::{SwapError, Tcpc, TypecRole};
use pd_manager_traits::{DataRole, PortType, PowerRole};

use super::{Manager, PortError};
use crate::timers::Timer;

impl From<SwapError> for PortError {
    fn from(_: SwapError) -> Self {
        PortError::PermissionDenied
    }
}

/// The Type-C role to renegotiate with, for a dual role port.
fn dual_role(preferred_role: Option<PowerRole>) -> TypecRole {
    match preferred_role {
        Some(PowerRole::Source) => TypecRole::TrySrc,
        Some(PowerRole::Sink) => TypecRole::TrySnk,
        None => TypecRole::Drp,
    }
}

impl<TCPC: Tcpc, CLASS: TypecClass, EXTCON: Extcon, CHARGER: ChargerClass, DISPLAY: DisplayQueue, TIMER: Timer>
    Manager<TCPC, CLASS, EXTCON, CHARGER, DISPLAY, TIMER>
{
    /// Swaps need a partner to negotiate with.
    fn require_partner(&self) -> Result<(), PortError> {
        if self.partner.is_none() {
            warn!("Swap without partner");
            return Err(PortError::PermissionDenied);
        }

        Ok(())
    }

    fn change_typec_role(&mut self, role: TypecRole) -> Result<(), PortError> {
        debug!("Change Type-C role to {:?}", role);

        self.tcpc.change_typec_role(role).map_err(|error| {
            warn!("Type-C role change to {:?} failed: {:?}", role, error);
            PortError::from(error)
        })
    }
}

impl<TCPC: Tcpc, CLASS: TypecClass, EXTCON: Extcon, CHARGER: ChargerClass, DISPLAY: DisplayQueue, TIMER: Timer>
    PortOperations for Manager<TCPC, CLASS, EXTCON, CHARGER, DISPLAY, TIMER>
{
    type Error = PortError;

    fn try_role(&mut self, role: Option<PowerRole>) -> Result<(), Self::Error> {
        if self.config.port_type != PortType::Dual {
            return Err(PortError::InvalidArgument);
        }

        self.change_typec_role(dual_role(role))?;
        self.preferred_role = role;
        Ok(())
    }

    fn dr_set(&mut self, role: DataRole) -> Result<(), Self::Error> {
        if self.tcpc.data_role() == role {
            trace!("Data role already {:?}", role);
            return Ok(());
        }

        if !self.config.supports_data_role(role) {
            return Err(PortError::InvalidArgument);
        }

        self.require_partner()?;

        debug!("Request data role swap to {:?}", role);
        self.tcpc.request_data_swap(role).map_err(|error| {
            warn!("Data role swap failed: {:?}", error);
            PortError::from(error)
        })
    }

    fn pr_set(&mut self, role: PowerRole) -> Result<(), Self::Error> {
        if self.tcpc.power_role() == role {
            trace!("Power role already {:?}", role);
            return Ok(());
        }

        if !self.config.supports_power_role(role) {
            return Err(PortError::InvalidArgument);
        }

        self.require_partner()?;

        debug!("Request power role swap to {:?}", role);
        self.tcpc.request_power_swap(role).map_err(|error| {
            warn!("Power role swap failed: {:?}", error);
            PortError::from(error)
        })
    }

    fn vconn_set(&mut self, role: PowerRole) -> Result<(), Self::Error> {
        if self.tcpc.vconn_role() == role {
            trace!("VCONN role already {:?}", role);
            return Ok(());
        }

        self.require_partner()?;

        debug!("Request VCONN swap to {:?}", role);
        self.tcpc.request_vconn_swap(role).map_err(|error| {
            warn!("VCONN swap failed: {:?}", error);
            PortError::from(error)
        })
    }

    fn port_type_set(&mut self, port_type: PortType) -> Result<(), Self::Error> {
        if !self.config.supports_port_type(port_type) {
            return Err(PortError::InvalidArgument);
        }

        let role = match port_type {
            PortType::Sink => PowerRole::Sink,
            PortType::Source => PowerRole::Source,
            PortType::Dual => return self.change_typec_role(dual_role(self.preferred_role)),
        };

        self.preferred_role = Some(role);

        if self.tcpc.power_role() == role {
            trace!("Power role already {:?}", role);
            return Ok(());
        }

        self.change_typec_role(match role {
            PowerRole::Sink => TypecRole::Sink,
            PowerRole::Source => TypecRole::Source,
        })
    }
}
