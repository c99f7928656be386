//! Stable per-unit identity for the boot banner and log lines.
//!
//! Loggers ship in batches and get mixed up on the bench, so every log
//! capture starts with a name that survives reflashes: `EL-XXYYZZ`,
//! built from the last three octets of the factory-burned eFuse MAC.
//! Host builds have no eFuse and fall back to one fixed name.

use core::fmt;

/// Short device name, `EL-` plus six uppercase hex digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId(heapless::String<12>);

impl DeviceId {
    /// Identity of this unit, read once from the eFuse MAC.
    pub fn from_efuse() -> Self {
        Self::from_mac(factory_mac())
    }

    /// Derive the name from a raw 6-byte MAC.  Only the last three
    /// octets vary within a production batch, so only those appear.
    pub fn from_mac(mac: [u8; 6]) -> Self {
        let mut name = heapless::String::new();
        use core::fmt::Write;
        let _ = write!(name, "EL-{:02X}{:02X}{:02X}", mac[3], mac[4], mac[5]);
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(target_os = "espidf")]
fn factory_mac() -> [u8; 6] {
    let mut mac = [0u8; 6];
    // SAFETY: esp_efuse_mac_get_default only writes the 6 bytes of the
    // buffer it is handed.
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

#[cfg(not(target_os = "espidf"))]
fn factory_mac() -> [u8; 6] {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}
