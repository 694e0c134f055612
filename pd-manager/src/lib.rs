//! USB Power Delivery and Type-C port manager for `[no_std]`.
//!
//! Bridges the notifications of a Type-C port controller to a host Type-C class, an external
//! connector publisher, a charger strategy and a USB display queue. The collaborators are
//! reached through the traits of [`pd_manager_traits`].
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod config;
pub mod counters;
pub mod identity;
pub mod manager;
pub mod timers;
pub mod units;
pub mod work;

#[cfg(test)]
mod dummy;

pub use config::Config;
pub use manager::Manager;
pub use pd_manager_traits;
