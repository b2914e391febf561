pub mod commandclass;
pub mod frame;

pub use commandclass::*;
pub use frame::CommandClassFrame;
