use crate::command::{Command, CommandFrame, CommandType};
use nom::bytes::complete::take_till;
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::FunctionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GetControllerVersionRequest;

impl Command for GetControllerVersionRequest {
    fn command_type(&self) -> CommandType {
        CommandType::Request
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::GetControllerVersion
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayload::empty()
    }
}

impl From<&GetControllerVersionRequest> for CommandFrame {
    fn from(cmd: &GetControllerVersionRequest) -> Self {
        CommandFrame {
            command_type: cmd.command_type(),
            function_type: cmd.function_type(),
            payload: Vec::new(),
            checksum: 0,
        }
    }
}

/// A NUL-terminated library version string, followed by a library type byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetControllerVersionResponse {
    pub library_version: String,
    pub library_type: u8,
}

impl Parsable for GetControllerVersionResponse {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, raw) = take_till(|b| b == 0)(i)?;
        let (i, _) = nom::bytes::complete::tag([0u8])(i)?;
        let (i, library_type) = nom::number::complete::be_u8(i)?;
        Ok((
            i,
            Self {
                library_version: String::from_utf8_lossy(raw).into_owned(),
                library_type,
            },
        ))
    }
}

impl TryFrom<&CommandFrame> for GetControllerVersionResponse {
    type Error = EncodingError;

    fn try_from(frame: &CommandFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl Command for GetControllerVersionResponse {
    fn command_type(&self) -> CommandType {
        CommandType::Response
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::GetControllerVersion
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("Z-Wave library version", self.library_version.clone())
            .with_entry("library type", format!("0x{:02x}", self.library_type))
            .into()
    }
}
