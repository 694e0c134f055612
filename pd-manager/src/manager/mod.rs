//! The PD manager of a single port.
//!
//! Bridges port controller notifications to the host Type-C class, the external connector
//! publisher, the charger strategy and the USB display queue.
use core::marker::PhantomData;

use embassy_futures::select::{Either, select};
use pd_manager_traits::{PowerRole, RegistrationError};
use pd_manager_traits::class::{Accessory, Cable, ChargerClass, DisplayQueue, Extcon, PdActive, TypecClass};
use pd_manager_traits::tcpc::{Notification, PdConnectState, Tcpc};

use crate::config::Config;
use crate::counters::{Counter, CounterType};
use crate::identity::Identity;
use crate::timers::{Timer, TimerType};
use crate::work::{DelayedWork, WorkHandle};

mod charger;
mod display;
mod port_ops;
mod role;
mod typec_state;


pub use charger::SinkRequest;
pub use display::PinAssignment;
pub use role::DataRoleState;

/// Cables that the manager publishes.
const SUPPORTED_CABLES: [Cable; 2] = [Cable::Usb, Cable::UsbHost];

/// Steps of the probe sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeStep {
    /// Registering the external connector publisher.
    Extcon,
    /// Looking up the port controller.
    TcpcLookup,
    /// Registering the Type-C port.
    TypecPort,
    /// Subscribing to port controller notifications.
    Notifier,
}

/// Errors of the manager lifecycle.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A probe step kept deferring until the retry budget ran out.
    #[error("probe step {0:?} still deferred after all retries")]
    ProbeDeferred(ProbeStep),
    /// A probe step failed.
    #[error("probe step {0:?} failed")]
    ProbeFailed(ProbeStep),
}

/// Errors of port operations.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortError {
    /// The swap was refused, or is not possible in the present state.
    #[error("operation not permitted")]
    PermissionDenied,
    /// The requested role is not supported by the port.
    #[error("invalid argument")]
    InvalidArgument,
}

/// A registered partner.
#[derive(Debug)]
struct Partner<P> {
    handle: P,
    accessory: Accessory,
    identity: Option<Identity>,
}

/// Retry a probe step as long as it defers, sleeping between attempts.
async fn retry_deferred<TIMER: Timer, T>(
    step: ProbeStep,
    mut attempt: impl FnMut() -> Result<T, RegistrationError>,
) -> Result<T, Error> {
    let mut retries = Counter::new(CounterType::ProbeRetry);

    loop {
        match attempt() {
            Ok(value) => return Ok(value),
            Err(RegistrationError::Failed) => {
                error!("Probe step {:?} failed", step);
                return Err(Error::ProbeFailed(step));
            }
            Err(RegistrationError::Defer) => {
                if retries.increment().is_err() {
                    error!("Probe step {:?} still deferred, giving up", step);
                    return Err(Error::ProbeDeferred(step));
                }

                debug!("Probe step {:?} deferred, retry {}", step, retries.value());
                TimerType::get_timer::<TIMER>(TimerType::ProbeRetry).await;
            }
        }
    }
}

/// The manager of a single port.
pub struct Manager<
    TCPC: Tcpc,
    CLASS: TypecClass,
    EXTCON: Extcon,
    CHARGER: ChargerClass,
    DISPLAY: DisplayQueue,
    TIMER: Timer,
> {
    config: Config,
    tcpc: TCPC,
    class: CLASS,
    extcon: EXTCON,
    charger: CHARGER,
    display: DISPLAY,
    port: CLASS::Port,
    partner: Option<Partner<CLASS::Partner>>,
    preferred_role: Option<PowerRole>,

    data_role: DataRoleState,
    charger_poll: Counter,
    work: DelayedWork,

    pd_connect_state: PdConnectState,
    pd_active: PdActive,
    sink_request: Option<SinkRequest>,
    dp_present: bool,

    _timer: PhantomData<TIMER>,
}

impl<TCPC: Tcpc, CLASS: TypecClass, EXTCON: Extcon, CHARGER: ChargerClass, DISPLAY: DisplayQueue, TIMER: Timer>
    Manager<TCPC, CLASS, EXTCON, CHARGER, DISPLAY, TIMER>
{
    /// Bring up the manager.
    ///
    /// Registers the external connector cables, looks up the port controller, registers the
    /// Type-C port and subscribes to notifications. Steps that defer are retried after a
    /// fixed sleep, up to a fixed number of times.
    pub async fn probe(
        config: Config,
        mut tcpc: TCPC,
        mut class: CLASS,
        mut extcon: EXTCON,
        charger: CHARGER,
        display: DISPLAY,
    ) -> Result<Self, Error> {
        retry_deferred::<TIMER, _>(ProbeStep::Extcon, || extcon.register(&SUPPORTED_CABLES)).await?;
        retry_deferred::<TIMER, _>(ProbeStep::TcpcLookup, || tcpc.lookup()).await?;

        let capability = config.capability();
        let port = retry_deferred::<TIMER, _>(ProbeStep::TypecPort, || class.register_port(&capability)).await?;

        if let Err(error) = retry_deferred::<TIMER, _>(ProbeStep::Notifier, || tcpc.register_notifier()).await {
            class.unregister_port(port);
            return Err(error);
        }

        info!("Probed port, preferred role {:?}", config.preferred_role);

        Ok(Self {
            preferred_role: config.preferred_role,
            config,
            tcpc,
            class,
            extcon,
            charger,
            display,
            port,
            partner: None,
            data_role: DataRoleState::Idle,
            charger_poll: Counter::new(CounterType::ChargerTypePoll),
            work: DelayedWork::new(),
            pd_connect_state: PdConnectState::None,
            pd_active: PdActive::Inactive,
            sink_request: None,
            dp_present: false,
            _timer: PhantomData,
        })
    }

    /// Tear down the manager.
    ///
    /// Cancels pending work, stops notifications and unregisters the partner and the port.
    pub fn remove(mut self) {
        self.work.cancel();
        self.tcpc.unregister_notifier();

        if let Some(partner) = self.partner.take() {
            self.class.unregister_partner(partner.handle);
        }

        self.class.unregister_port(self.port);
        info!("Removed port");
    }

    /// Quiesce the port for system shutdown.
    ///
    /// Cancels pending work, stops both USB roles and stops sourcing VBUS.
    pub fn shutdown(&mut self) {
        self.work.cancel();
        self.data_role = DataRoleState::Idle;
        self.stop_usb(Cable::UsbHost);
        self.stop_usb(Cable::Usb);
        self.charger.set_vbus_source(false);
        info!("Shut down port");
    }

    /// Run the manager continuously.
    ///
    /// Serves port controller notifications and the debounced role work. Never returns.
    pub async fn run(&mut self) {
        loop {
            self.run_step().await;
        }
    }

    /// Wait for either the next notification or the pending work, and handle it.
    async fn run_step(&mut self) {
        let remaining = self
            .work
            .due_at()
            .map(|due_at| due_at.saturating_sub(TIMER::now_millis()));

        let work_fut = async {
            match remaining {
                Some(milliseconds) => TIMER::after_millis(milliseconds).await,
                None => core::future::pending().await,
            }
        };

        match select(self.tcpc.wait_notification(), work_fut).await {
            Either::First(notification) => self.handle_notification(notification),
            Either::Second(()) => {
                if let Some(handle) = self.work.pending() {
                    self.run_work(handle);
                }
            }
        }
    }

    /// Dispatch a notification of the port controller.
    pub fn handle_notification(&mut self, notification: Notification) {
        trace!("Notification {:?}", notification);

        match notification {
            Notification::TypecState(change) => self.handle_typec_state(change),
            Notification::PdState(state) => self.handle_pd_state(state),
            Notification::SinkVbus(vbus) => self.handle_sink_vbus(vbus),
            Notification::SourceVbus(vbus) => self.handle_source_vbus(vbus),
            Notification::SourceCapabilities => self.handle_source_capabilities(),
            Notification::DataRoleSwap(role) => self.handle_data_role_swap(role),
            Notification::PowerRoleSwap(role) => self.handle_power_role_swap(role),
            Notification::VconnSwap(role) => self.handle_vconn_swap(role),
            Notification::HardReset(state) => self.handle_hard_reset(state),
            Notification::AmaDpState(state) => self.handle_dp_state(state),
            Notification::AmaDpHpdState(state) => self.handle_dp_hpd_state(state),
        }
    }

    /// The pending work, with the point in time when it is due.
    ///
    /// For integrations that run the work on their own work queue instead of [`Manager::run`].
    pub fn pending_work(&self) -> Option<(WorkHandle, u64)> {
        self.work.pending().zip(self.work.due_at())
    }

    /// Run the work that belongs to `handle`.
    ///
    /// Returns `false` without doing anything if the work was cancelled or replaced.
    pub fn run_work(&mut self, handle: WorkHandle) -> bool {
        if !self.work.claim(handle) {
            trace!("Stale work {:?}", handle);
            return false;
        }

        self.run_role_work();
        true
    }

    /// The configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The inferred data role.
    pub fn data_role(&self) -> DataRoleState {
        self.data_role
    }

    /// Whether a partner is registered.
    pub fn has_partner(&self) -> bool {
        self.partner.is_some()
    }

    /// Accessory classification of the registered partner.
    pub fn partner_accessory(&self) -> Option<Accessory> {
        self.partner.as_ref().map(|partner| partner.accessory)
    }

    /// Identity of the registered partner, once known.
    pub fn partner_identity(&self) -> Option<&Identity> {
        self.partner.as_ref().and_then(|partner| partner.identity.as_ref())
    }

    /// The last announced PD activity.
    pub fn pd_active(&self) -> PdActive {
        self.pd_active
    }

    /// The last observed PD connection sub-state.
    pub fn pd_connect_state(&self) -> PdConnectState {
        self.pd_connect_state
    }

    /// The last announced sink request.
    pub fn sink_request(&self) -> Option<SinkRequest> {
        self.sink_request
    }

    /// Whether DisplayPort alternate mode is present.
    pub fn dp_present(&self) -> bool {
        self.dp_present
    }

    /// The preferred power role, as last set by the host.
    pub fn preferred_role(&self) -> Option<PowerRole> {
        self.preferred_role
    }
}
