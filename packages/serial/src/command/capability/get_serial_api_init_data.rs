use crate::command::{Command, CommandFrame, CommandType};
use nom::{bytes::complete::take, number::complete::be_u8};
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::{FunctionType, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GetSerialApiInitDataRequest;

impl Command for GetSerialApiInitDataRequest {
    fn command_type(&self) -> CommandType {
        CommandType::Request
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::GetSerialApiInitData
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayload::empty()
    }
}

impl From<&GetSerialApiInitDataRequest> for CommandFrame {
    fn from(cmd: &GetSerialApiInitDataRequest) -> Self {
        CommandFrame {
            command_type: cmd.command_type(),
            function_type: cmd.function_type(),
            payload: Vec::new(),
            checksum: 0,
        }
    }
}

/// The list of node ids the controller already knows about, reported via a
/// bitmask of up to 232 bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetSerialApiInitDataResponse {
    pub api_version: u8,
    pub is_primary_controller: bool,
    pub node_ids: Vec<NodeId>,
}

impl Parsable for GetSerialApiInitDataResponse {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, api_version) = be_u8(i)?;
        let (i, capabilities) = be_u8(i)?;
        let (i, bitmask_len) = be_u8(i)?;
        let (i, bitmask) = take(bitmask_len)(i)?;

        let mut node_ids = Vec::new();
        for (byte_index, byte) in bitmask.iter().enumerate() {
            for bit_index in 0..8 {
                if byte & (1 << bit_index) != 0 {
                    node_ids.push(NodeId::new((byte_index * 8 + bit_index + 1) as u8));
                }
            }
        }

        Ok((
            i,
            Self {
                api_version,
                is_primary_controller: capabilities & 0b0000_0010 == 0,
                node_ids,
            },
        ))
    }
}

impl TryFrom<&CommandFrame> for GetSerialApiInitDataResponse {
    type Error = EncodingError;

    fn try_from(frame: &CommandFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl Command for GetSerialApiInitDataResponse {
    fn command_type(&self) -> CommandType {
        CommandType::Response
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::GetSerialApiInitData
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("Z-Wave API version", self.api_version)
            .with_entry("controller role", if self.is_primary_controller { "primary" } else { "secondary" })
            .with_entry(
                "nodes in the network",
                self.node_ids
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
            .into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        let input = hex::decode("0500028902").unwrap();
        let (_, parsed) = GetSerialApiInitDataResponse::parse(&input).unwrap();
        assert_eq!(
            parsed.node_ids,
            vec![1u8, 4, 8, 10]
                .into_iter()
                .map(NodeId::new)
                .collect::<Vec<_>>()
        );
    }
}
