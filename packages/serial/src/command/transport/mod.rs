mod application_command;
pub use application_command::*;

mod send_data;
pub use send_data::*;
