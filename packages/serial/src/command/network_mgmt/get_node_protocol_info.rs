use crate::command::{Command, CommandFrame, CommandType};
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult, Serializable};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::{FunctionType, NodeId, NodeProtocolInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetNodeProtocolInfoRequest {
    pub node_id: NodeId,
}

impl Command for GetNodeProtocolInfoRequest {
    fn command_type(&self) -> CommandType {
        CommandType::Request
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::GetNodeProtocolInfo
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("node ID", self.node_id.to_string())
            .into()
    }
}

impl From<&GetNodeProtocolInfoRequest> for CommandFrame {
    fn from(cmd: &GetNodeProtocolInfoRequest) -> Self {
        CommandFrame {
            command_type: cmd.command_type(),
            function_type: cmd.function_type(),
            payload: cmd.node_id.try_to_vec().expect("NodeId always serializes"),
            checksum: 0,
        }
    }
}

/// Capability flags and device class for a given node — the §4.4
/// `ProtocolInfo` stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetNodeProtocolInfoResponse {
    pub protocol_info: NodeProtocolInfo,
}

impl Parsable for GetNodeProtocolInfoResponse {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, protocol_info) = NodeProtocolInfo::parse(i)?;
        Ok((i, Self { protocol_info }))
    }
}

impl TryFrom<&CommandFrame> for GetNodeProtocolInfoResponse {
    type Error = EncodingError;

    fn try_from(frame: &CommandFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl Command for GetNodeProtocolInfoResponse {
    fn command_type(&self) -> CommandType {
        CommandType::Response
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::GetNodeProtocolInfo
    }

    fn to_log_payload(&self) -> LogPayload {
        let info = &self.protocol_info;
        let listening = if info.capabilities.listening {
            "always listening".to_string()
        } else if info.capabilities.is_frequent_listening {
            "frequent listening".to_string()
        } else {
            "sleeping".to_string()
        };

        LogPayloadDict::new()
            .with_entry("basic device class", format!("0x{:02x}", info.device_class.basic))
            .with_entry("generic device class", format!("0x{:02x}", info.device_class.generic))
            .with_entry("specific device class", format!("0x{:02x}", info.device_class.specific))
            .with_entry("listening", listening)
            .with_entry("can route", info.capabilities.routing)
            .with_entry("supports beaming", info.capabilities.is_beaming)
            .into()
    }
}
