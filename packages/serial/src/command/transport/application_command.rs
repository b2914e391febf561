use crate::command::{Command, CommandFrame, CommandType};
use nom::{bytes::complete::take, number::complete::be_u8};
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::{FunctionType, NodeId};

/// An unsolicited command from another node, still in undecoded form; the
/// command-class registry decodes `command_data` once this reaches the
/// driver's dispatch layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationCommandRequest {
    pub status: u8,
    pub source_node_id: NodeId,
    pub command_data: Vec<u8>,
}

impl ApplicationCommandRequest {
    /// Bit 0 of `status` signals that more frames belonging to a multicast
    /// transmission are expected.
    pub fn is_multicast_followup(&self) -> bool {
        self.status & 0b0000_0001 != 0
    }
}

impl Parsable for ApplicationCommandRequest {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, status) = be_u8(i)?;
        let (i, source_node_id) = NodeId::parse(i)?;
        let (i, len) = be_u8(i)?;
        let (i, command_data) = take(len)(i)?;

        Ok((
            i,
            Self {
                status,
                source_node_id,
                command_data: command_data.to_vec(),
            },
        ))
    }
}

impl TryFrom<&CommandFrame> for ApplicationCommandRequest {
    type Error = EncodingError;

    fn try_from(frame: &CommandFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl Command for ApplicationCommandRequest {
    fn command_type(&self) -> CommandType {
        CommandType::Request
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::ApplicationCommand
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("source node ID", self.source_node_id.to_string())
            .with_entry("payload", format!("0x{}", hex::encode(&self.command_data)))
            .into()
    }
}
