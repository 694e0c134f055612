//! Quantities used by the manager.
//!
//! The port controller and the charger boundary use plain millivolts and milliamperes.
pub use uom::si::electric_current::milliampere;
pub use uom::si::electric_potential::millivolt;
pub use uom::si::f32::{ElectricCurrent, ElectricPotential};

/// Voltage from integer millivolts.
pub fn from_millivolts(millivolts: u32) -> ElectricPotential {
    ElectricPotential::new::<millivolt>(millivolts as f32)
}

/// Current from integer milliamperes.
pub fn from_milliamps(milliamps: u32) -> ElectricCurrent {
    ElectricCurrent::new::<milliampere>(milliamps as f32)
}

/// Voltage as integer millivolts, rounded.
pub fn to_millivolts(voltage: ElectricPotential) -> u32 {
    (voltage.get::<millivolt>() + 0.5) as u32
}

/// Current as integer milliamperes, rounded.
pub fn to_milliamps(current: ElectricCurrent) -> u32 {
    (current.get::<milliampere>() + 0.5) as u32
}
