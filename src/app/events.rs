//! Outbound application events.
//!
//! Subsystems report noteworthy moments through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — the serial log always records
//! them, and the LED sink turns them into the activity flashes users
//! actually see.

/// Structured events emitted by the application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// Something logged at error severity.
    ErrorLogged,

    /// Something logged at warning severity.
    WarningLogged,

    /// A reading batch went out over the network.
    NetworkSent,

    /// A reading batch was committed to local storage.
    SampleStored,

    /// Periodic battery report, percent state of charge.
    BatteryLevel(f32),
}
