use crate::command::{Command, CommandFrame, CommandType};
use nom::number::complete::be_u32;
use zwave_core::encoding::{Input, Parsable, ParseResult, Serializable};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::{FunctionType, HomeId, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GetControllerIdRequest;

impl Command for GetControllerIdRequest {
    fn command_type(&self) -> CommandType {
        CommandType::Request
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::GetControllerId
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayload::empty()
    }
}

impl From<&GetControllerIdRequest> for CommandFrame {
    fn from(cmd: &GetControllerIdRequest) -> Self {
        CommandFrame {
            command_type: cmd.command_type(),
            function_type: cmd.function_type(),
            payload: Vec::new(),
            checksum: 0,
        }
    }
}

/// The controller's home id and its own node id, returned once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetControllerIdResponse {
    pub home_id: HomeId,
    pub own_node_id: NodeId,
}

impl Parsable for GetControllerIdResponse {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, home_id) = be_u32(i)?;
        let (i, own_node_id) = NodeId::parse(i)?;
        Ok((
            i,
            Self {
                home_id: HomeId::new(home_id),
                own_node_id,
            },
        ))
    }
}

impl TryFrom<&CommandFrame> for GetControllerIdResponse {
    type Error = zwave_core::encoding::EncodingError;

    fn try_from(frame: &CommandFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl Command for GetControllerIdResponse {
    fn command_type(&self) -> CommandType {
        CommandType::Response
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::GetControllerId
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("home ID", self.home_id.to_string())
            .with_entry("own node ID", self.own_node_id.to_string())
            .into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        let input = hex::decode("deadbeef05").unwrap();
        let (_, parsed) = GetControllerIdResponse::parse(&input).unwrap();
        assert_eq!(parsed.home_id, HomeId::new(0xdead_beef));
        assert_eq!(parsed.own_node_id, NodeId::new(5));
    }
}
