mod base;
pub use base::*;

mod driver;
pub use driver::*;

mod controller;
pub use controller::*;

mod node;
pub use node::*;

mod serial;
pub use serial::*;
