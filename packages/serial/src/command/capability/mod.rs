mod get_controller_id;
pub use get_controller_id::*;

mod get_controller_version;
pub use get_controller_version::*;

mod get_serial_api_capabilities;
pub use get_serial_api_capabilities::*;

mod get_serial_api_init_data;
pub use get_serial_api_init_data::*;
