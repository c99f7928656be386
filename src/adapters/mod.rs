//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements    | Connects to              |
//! |-------------|---------------|--------------------------|
//! | `gauge`     | FuelGaugePort | MAX17048 over I2C        |
//! | `led_sink`  | EventSink     | Status LED flashes       |
//! | `nvs`       | ConfigPort    | NVS / in-memory store    |
//! |             | StoragePort   |                          |
//! | `time`      | (helpers)     | ESP32 system timer       |
//! | `device_id` | (helpers)     | eFuse factory MAC        |

pub mod device_id;
pub mod gauge;
pub mod led_sink;
pub mod nvs;
pub mod time;
