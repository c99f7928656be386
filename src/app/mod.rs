//! Application core — pure domain policies, zero I/O.
//!
//! This module contains the business rules around the status LED: the
//! button-hold reset escalation, the settings session, the persisted
//! LED enable preference, and the battery indication policy.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod battery;
pub mod escalation;
pub mod events;
pub mod ports;
pub mod preferences;
