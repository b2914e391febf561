mod codec;
mod controller;
mod driver;
mod node;
mod notification;
mod options;
mod persistence;
mod send_queue;
mod tasks;
mod transmit;
mod value_registry;

pub mod error;

pub use controller::ControllerInfo;
pub use driver::Driver;
pub use node::{NodeCommandClassInfo, NodeState, NodeTable};
pub use notification::Notification;
pub use options::DriverOptions;
pub use send_queue::Priority;
pub use value_registry::ReportOutcome;
