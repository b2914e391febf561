use crate::command::{Command, CommandFrame, CommandType};
use derive_try_from_primitive::TryFromPrimitive;
use nom::number::complete::{be_u16, be_u8};
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult, Serializable};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::{FunctionType, NodeId};

/// Flags controlling how a `SendData` transmission is routed. Defaults
/// match the serial API's own default of `0x25`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitOptions {
    pub ack: bool,
    pub auto_route: bool,
    pub explore: bool,
}

impl Default for TransmitOptions {
    fn default() -> Self {
        Self {
            ack: true,
            auto_route: true,
            explore: true,
        }
    }
}

impl Parsable for TransmitOptions {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, byte) = be_u8(i)?;
        Ok((
            i,
            Self {
                ack: byte & 0b0000_0001 != 0,
                auto_route: byte & 0b0000_0100 != 0,
                explore: byte & 0b0010_0000 != 0,
            },
        ))
    }
}

impl Serializable for TransmitOptions {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        let byte = (self.ack as u8)
            | (self.auto_route as u8) << 2
            | (self.explore as u8) << 5;
        cookie_factory::bytes::be_u8(byte)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum TransmitStatus {
    Ok = 0x00,
    NoAck = 0x01,
    Fail = 0x02,
    NotIdle = 0x03,
    NoRoute = 0x04,
}

impl Parsable for TransmitStatus {
    fn parse(i: Input) -> ParseResult<Self> {
        nom::combinator::map_res(be_u8, TransmitStatus::try_from)(i)
    }
}

/// Sends a command-class payload to a node, addressed by node id, with the
/// transmit engine's chosen routing options (spec §4.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendDataRequest {
    pub node_id: NodeId,
    pub payload: Vec<u8>,
    pub transmit_options: TransmitOptions,
    pub callback_id: u8,
}

impl Command for SendDataRequest {
    fn command_type(&self) -> CommandType {
        CommandType::Request
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::SendData
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("node ID", self.node_id.to_string())
            .with_entry("payload", format!("0x{}", hex::encode(&self.payload)))
            .with_entry("callback ID", self.callback_id)
            .into()
    }
}

impl From<&SendDataRequest> for CommandFrame {
    fn from(cmd: &SendDataRequest) -> Self {
        let mut payload = cmd.node_id.try_to_vec().expect("NodeId always serializes");
        payload.push(cmd.payload.len() as u8);
        payload.extend_from_slice(&cmd.payload);
        payload.extend_from_slice(&cmd.transmit_options.try_to_vec().unwrap());
        payload.push(cmd.callback_id);

        CommandFrame {
            command_type: cmd.command_type(),
            function_type: cmd.function_type(),
            payload,
            checksum: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendDataResponse {
    pub was_accepted: bool,
}

impl Parsable for SendDataResponse {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, byte) = be_u8(i)?;
        Ok((
            i,
            Self {
                was_accepted: byte != 0,
            },
        ))
    }
}

impl TryFrom<&CommandFrame> for SendDataResponse {
    type Error = EncodingError;

    fn try_from(frame: &CommandFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl Command for SendDataResponse {
    fn command_type(&self) -> CommandType {
        CommandType::Response
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::SendData
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("was accepted", self.was_accepted)
            .into()
    }
}

/// The eventual callback reporting whether the transmission succeeded, with
/// routing statistics. Correlated back to its request by `callback_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendDataCallback {
    pub callback_id: u8,
    pub transmit_status: TransmitStatus,
    pub tx_ticks: u16,
}

impl Parsable for SendDataCallback {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, callback_id) = be_u8(i)?;
        let (i, transmit_status) = TransmitStatus::parse(i)?;
        let (i, tx_ticks) = if transmit_status != TransmitStatus::NoAck {
            be_u16(i)?
        } else {
            (i, 0)
        };

        Ok((
            i,
            Self {
                callback_id,
                transmit_status,
                tx_ticks,
            },
        ))
    }
}

impl TryFrom<&CommandFrame> for SendDataCallback {
    type Error = EncodingError;

    fn try_from(frame: &CommandFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl Command for SendDataCallback {
    fn command_type(&self) -> CommandType {
        CommandType::Request
    }

    fn function_type(&self) -> FunctionType {
        FunctionType::SendData
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("callback ID", self.callback_id)
            .with_entry(
                "transmit status",
                format!("{:?}, took {} ms", self.transmit_status, self.tx_ticks / 100),
            )
            .into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_transmit_options_roundtrip() {
        let opts = TransmitOptions::default();
        let bytes = opts.try_to_vec().unwrap();
        assert_eq!(TransmitOptions::try_from_slice(&bytes).unwrap(), opts);
    }
}
