mod serial_api_started;
pub use serial_api_started::*;
