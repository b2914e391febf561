use crate::command::{Command, CommandFrame, CommandType};
use zwave_core::log::LogPayload;
use zwave_core::prelude::FunctionType;

/// Soft-resets the Z-Wave module. No response is expected; the module
/// becomes unresponsive for a moment and then re-sends `SerialApiStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoftResetRequest;

impl Command for SoftResetRequest {
    fn command_type(&self) -> CommandType {
        CommandType::Request
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::SoftReset
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayload::empty()
    }
}

impl From<&SoftResetRequest> for CommandFrame {
    fn from(cmd: &SoftResetRequest) -> Self {
        CommandFrame {
            command_type: cmd.command_type(),
            function_type: cmd.function_type(),
            payload: Vec::new(),
            checksum: 0,
        }
    }
}
