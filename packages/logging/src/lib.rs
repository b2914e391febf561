mod definitions;
pub use definitions::*;

pub use zwave_core::log::*;

mod formatters;
pub use formatters::*;

pub mod loggers;
