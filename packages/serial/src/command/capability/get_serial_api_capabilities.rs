use crate::command::{Command, CommandFrame, CommandType};
use nom::{bytes::complete::take, number::complete::be_u16};
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::{FunctionType, Version};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GetSerialApiCapabilitiesRequest;

impl Command for GetSerialApiCapabilitiesRequest {
    fn command_type(&self) -> CommandType {
        CommandType::Request
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::GetSerialApiCapabilities
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayload::empty()
    }
}

impl From<&GetSerialApiCapabilitiesRequest> for CommandFrame {
    fn from(cmd: &GetSerialApiCapabilitiesRequest) -> Self {
        CommandFrame {
            command_type: cmd.command_type(),
            function_type: cmd.function_type(),
            payload: Vec::new(),
            checksum: 0,
        }
    }
}

/// Manufacturer/product identification and the bitmask of supported
/// function ids, as reported by the stick at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetSerialApiCapabilitiesResponse {
    pub firmware_version: Version,
    pub manufacturer_id: u16,
    pub product_type: u16,
    pub product_id: u16,
    pub supported_function_types: Vec<u8>,
}

impl Parsable for GetSerialApiCapabilitiesResponse {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, major) = nom::number::complete::be_u8(i)?;
        let (i, minor) = nom::number::complete::be_u8(i)?;
        let (i, manufacturer_id) = be_u16(i)?;
        let (i, product_type) = be_u16(i)?;
        let (i, product_id) = be_u16(i)?;
        let (i, bitmask) = take(32usize)(i)?;

        let mut supported_function_types = Vec::new();
        for (byte_index, byte) in bitmask.iter().enumerate() {
            for bit_index in 0..8 {
                if byte & (1 << bit_index) != 0 {
                    supported_function_types.push((byte_index * 8 + bit_index + 1) as u8);
                }
            }
        }

        Ok((
            i,
            Self {
                firmware_version: Version {
                    major,
                    minor,
                    patch: 0,
                },
                manufacturer_id,
                product_type,
                product_id,
                supported_function_types,
            },
        ))
    }
}

impl TryFrom<&CommandFrame> for GetSerialApiCapabilitiesResponse {
    type Error = EncodingError;

    fn try_from(frame: &CommandFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl Command for GetSerialApiCapabilitiesResponse {
    fn command_type(&self) -> CommandType {
        CommandType::Response
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::GetSerialApiCapabilities
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("firmware version", self.firmware_version.to_string())
            .with_entry("manufacturer ID", format!("0x{:04x}", self.manufacturer_id))
            .with_entry("product type", format!("0x{:04x}", self.product_type))
            .with_entry("product ID", format!("0x{:04x}", self.product_id))
            .with_entry(
                "supported function types",
                self.supported_function_types.len(),
            )
            .into()
    }
}
