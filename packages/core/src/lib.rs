pub mod cache;
pub mod checksum;
pub mod definitions;
pub mod encoding;
pub mod log;
pub mod prelude;
pub mod state_machine;
pub mod util;
pub mod value_id;
pub mod values;
pub mod wrapping_counter;
