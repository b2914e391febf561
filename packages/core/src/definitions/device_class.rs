use derive_try_from_primitive::TryFromPrimitive;
use std::fmt::Display;

/// The coarse role a node plays in the network, reported alongside its
/// generic/specific device class in `GetNodeProtocolInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum BasicDeviceType {
    Controller = 0x01,
    StaticController = 0x02,
    Slave = 0x03,
    RoutingSlave = 0x04,
}

impl Display for BasicDeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BasicDeviceType::Controller => write!(f, "Controller"),
            BasicDeviceType::StaticController => write!(f, "Static Controller"),
            BasicDeviceType::Slave => write!(f, "Slave"),
            BasicDeviceType::RoutingSlave => write!(f, "Routing Slave"),
        }
    }
}

/// The generic/specific/basic device-type triple of spec §3's `Node` model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceClass {
    pub basic: u8,
    pub generic: u8,
    pub specific: u8,
}
