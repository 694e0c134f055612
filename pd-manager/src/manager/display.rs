//! DisplayPort alternate mode relay.
use pd_manager_traits::class::{
    ChargerClass, ComboMode, DisplayEvent, DisplayQueue, Extcon, HpdEvent, TypecClass,
};
use pd_manager_traits::tcpc::{DpHpdState, DpState, Tcpc};
use proc_bitfield::bitfield;

use super::Manager;
use crate::timers::Timer;

bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    /// DisplayPort pin assignments, as selected by a DP configure command.
    pub struct PinAssignment(pub u8): Debug, FromStorage, IntoStorage {
        /// Pin assignment A
        pub a: bool @ 0,
        /// Pin assignment B
        pub b: bool @ 1,
        /// Pin assignment C
        pub c: bool @ 2,
        /// Pin assignment D
        pub d: bool @ 3,
        /// Pin assignment E
        pub e: bool @ 4,
        /// Pin assignment F
        pub f: bool @ 5,
        /// Bits that do not name an assignment
        pub reserved: u8 @ 6..=7,
    }
}

impl PinAssignment {
    /// The combo PHY lane configuration for a single selected assignment.
    ///
    /// Returns `None` unless exactly one assignment is selected.
    pub fn combo_mode(self) -> Option<ComboMode> {
        if self.reserved() != 0 || self.0.count_ones() != 1 {
            return None;
        }

        if self.d() {
            Some(ComboMode::UsbAndDp2Lane)
        } else {
            Some(ComboMode::Dp4Lane)
        }
    }
}

/// The hot-plug detect event to forward. An interrupt takes precedence over the level.
fn hpd_event(state: DpHpdState) -> HpdEvent {
    match (state.irq, state.state) {
        (true, _) => HpdEvent::Irq,
        (false, true) => HpdEvent::PlugIn,
        (false, false) => HpdEvent::PlugOut,
    }
}

impl<TCPC: Tcpc, CLASS: TypecClass, EXTCON: Extcon, CHARGER: ChargerClass, DISPLAY: DisplayQueue, TIMER: Timer>
    Manager<TCPC, CLASS, EXTCON, CHARGER, DISPLAY, TIMER>
{
    pub(super) fn handle_dp_state(&mut self, state: DpState) {
        if !self.config.display_port {
            trace!("DisplayPort relay disabled, ignoring {:?}", state);
            return;
        }

        if !state.active {
            debug!("DisplayPort inactive");
            self.dp_present = false;
            return;
        }

        let pins = PinAssignment(state.pin_assignment);
        let Some(mode) = pins.combo_mode() else {
            warn!("Invalid DisplayPort pin assignment {:?}", pins);
            return;
        };

        debug!("DisplayPort {:?}, polarity {:?}", mode, state.polarity);
        self.dp_present = true;
        self.display.queue(DisplayEvent::Combo {
            mode,
            polarity: state.polarity,
        });
    }

    pub(super) fn handle_dp_hpd_state(&mut self, state: DpHpdState) {
        if !self.config.display_port {
            trace!("DisplayPort relay disabled, ignoring {:?}", state);
            return;
        }

        let event = hpd_event(state);
        debug!("DisplayPort HPD {:?}", event);
        self.display.queue(DisplayEvent::Hpd(event));
    }
}
