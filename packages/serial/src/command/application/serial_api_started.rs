use crate::command::{Command, CommandFrame, CommandType};
use nom::number::complete::be_u8;
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::{FunctionType, WakeupReason};

/// Sent unprompted by the stick once the serial API is ready to accept
/// commands; also sent after a `SoftReset` and after the module wakes up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialApiStartedRequest {
    pub wake_up_reason: WakeupReason,
    pub watchdog_enabled: bool,
    pub is_listening: bool,
    pub supports_long_range: bool,
}

impl Parsable for SerialApiStartedRequest {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, wake_up_reason) = WakeupReason::parse(i)?;
        let (i, watchdog_byte) = be_u8(i)?;
        let (i, capabilities) = be_u8(i)?;
        let (i, _generic_device_class) = be_u8(i)?;
        let (i, _specific_device_class) = be_u8(i)?;
        let (i, supports_long_range) = be_u8(i)?;

        Ok((
            i,
            Self {
                wake_up_reason,
                watchdog_enabled: watchdog_byte == 0x01,
                is_listening: capabilities & 0b1000_0000 != 0,
                supports_long_range: supports_long_range & 0b0000_0001 != 0,
            },
        ))
    }
}

impl TryFrom<&CommandFrame> for SerialApiStartedRequest {
    type Error = EncodingError;

    fn try_from(frame: &CommandFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl Command for SerialApiStartedRequest {
    fn command_type(&self) -> CommandType {
        CommandType::Request
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::SerialApiStarted
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("wake up reason", self.wake_up_reason.to_string())
            .with_entry("watchdog enabled", self.watchdog_enabled)
            .with_entry("always listening", self.is_listening)
            .with_entry("supports Long Range", self.supports_long_range)
            .into()
    }
}
