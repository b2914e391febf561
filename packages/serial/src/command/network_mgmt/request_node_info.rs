use crate::command::{Command, CommandFrame, CommandType};
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult, Serializable};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::{FunctionType, NodeId};

/// Asks a node to send its unsolicited Node Information Frame. The node
/// replies out-of-band via `ApplicationCommand`, not via a response here;
/// this command's own response is just a request-accepted acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestNodeInfoRequest {
    pub node_id: NodeId,
}

impl Command for RequestNodeInfoRequest {
    fn command_type(&self) -> CommandType {
        CommandType::Request
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::RequestNodeInfo
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("node ID", self.node_id.to_string())
            .into()
    }
}

impl From<&RequestNodeInfoRequest> for CommandFrame {
    fn from(cmd: &RequestNodeInfoRequest) -> Self {
        CommandFrame {
            command_type: cmd.command_type(),
            function_type: cmd.function_type(),
            payload: cmd.node_id.try_to_vec().expect("NodeId always serializes"),
            checksum: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestNodeInfoResponse {
    pub was_sent: bool,
}

impl Parsable for RequestNodeInfoResponse {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, byte) = nom::number::complete::be_u8(i)?;
        Ok((
            i,
            Self {
                was_sent: byte != 0,
            },
        ))
    }
}

impl TryFrom<&CommandFrame> for RequestNodeInfoResponse {
    type Error = EncodingError;

    fn try_from(frame: &CommandFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl Command for RequestNodeInfoResponse {
    fn command_type(&self) -> CommandType {
        CommandType::Response
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::RequestNodeInfo
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("request was sent", self.was_sent)
            .into()
    }
}
