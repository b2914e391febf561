use crate::prelude::*;
use derive_try_from_primitive::TryFromPrimitive;
use nom::{combinator::map_res, error::context, number::complete::be_u8};

/// Serial-API function ids this driver knows how to speak. Z-Wave defines
/// many more; only the ones the core engine actually issues or must decode
/// are listed here (see spec §1 — the remaining ~100 are out of scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum FunctionType {
    /// Returns the list of nodes known to the controller.
    GetSerialApiInitData = 0x02,
    /// A message from another node, dispatched to the command-class registry.
    ApplicationCommand = 0x04,
    GetSerialApiCapabilities = 0x07,
    SoftReset = 0x08,
    /// Sent by the controller once the serial API is ready to accept commands.
    SerialApiStarted = 0x0a,
    /// Send a frame to a node, with controller callback.
    SendData = 0x13,
    GetControllerVersion = 0x15,
    /// Returns the controller's `HomeId` and own `NodeId`.
    GetControllerId = 0x20,
    /// Returns protocol info (listening, beaming, basic/generic/specific
    /// device class) for a given node — the §4.4 `ProtocolInfo` stage.
    GetNodeProtocolInfo = 0x41,
    /// Asks a node to send its unsolicited Node Information Frame.
    RequestNodeInfo = 0x60,
}

impl Parsable for FunctionType {
    fn parse(i: Input) -> ParseResult<Self> {
        context("FunctionType", map_res(be_u8, FunctionType::try_from))(i)
    }
}

impl Serializable for FunctionType {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        cookie_factory::bytes::be_u8(*self as u8)
    }
}
