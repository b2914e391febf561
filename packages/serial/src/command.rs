use crate::frame::SerialControlByte;
use custom_debug_derive::Debug;
use derive_try_from_primitive::TryFromPrimitive;
use nom::{
    bytes::complete::{tag, take},
    combinator::peek,
    number::complete::be_u8,
    sequence::tuple,
};
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult, Serializable};
use zwave_core::log::LogPayloadDict;
use zwave_core::prelude::FunctionType;

use crate::util::hex_fmt;

pub mod capability;
pub mod misc;
pub mod network_mgmt;
pub mod transport;
pub mod application;

/// Whether a serial-API command is a host-initiated request or a
/// controller-initiated response/callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum CommandType {
    Request = 0x00,
    Response = 0x01,
}

impl Parsable for CommandType {
    fn parse(i: Input) -> ParseResult<Self> {
        nom::combinator::map_res(be_u8, CommandType::try_from)(i)
    }
}

impl Serializable for CommandType {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        cookie_factory::bytes::be_u8(*self as u8)
    }
}

/// Behavior shared by every decoded serial-API command, independent of its
/// concrete payload. Implemented by [`CommandFrame`] directly, and by the
/// typed commands under [`crate::command`] once they wrap one.
pub trait Command: std::fmt::Debug {
    fn command_type(&self) -> CommandType;
    fn function_type(&self) -> FunctionType;
    fn to_log_payload(&self) -> zwave_core::log::LogPayload;
}

fn compute_checksum(data: &[u8]) -> u8 {
    data[1..data.len() - 1].iter().fold(0xff, |acc, x| acc ^ x)
}

/// The generic SOF-framed envelope: command type, function id and an
/// undecoded payload. Typed commands are parsed from `payload` once
/// `function_type` identifies which one applies.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandFrame {
    pub command_type: CommandType,
    pub function_type: FunctionType,
    #[debug(with = "hex_fmt")]
    pub payload: Vec<u8>,
    #[debug(format = "{:#04x}")]
    pub checksum: u8,
}

impl CommandFrame {
    fn parse_with_checksum(expected: u8) -> impl FnMut(Input) -> ParseResult<u8> {
        move |i| {
            let (i, checksum) = be_u8(i)?;
            if checksum != expected {
                use nom::error::ParseError;
                return Err(nom::Err::Failure(nom::error::Error::from_error_kind(
                    i,
                    nom::error::ErrorKind::Verify,
                )));
            }
            Ok((i, checksum))
        }
    }
}

impl Parsable for CommandFrame {
    fn parse(i: Input) -> ParseResult<Self> {
        // Ensure that the buffer contains at least 5 bytes
        peek(take(5usize))(i)?;

        // Ensure that it starts with a SOF byte and extract the length of the rest of the command
        let (_, (_, len)) = peek(tuple((tag([SerialControlByte::SOF as u8]), be_u8)))(i)?;
        let (rem, raw_data) = peek(take(len + 2))(i)?;

        // Skip the SOF and length bytes
        let (i, _) = take(2usize)(i)?;

        let (i, command_type) = CommandType::parse(i)?;
        let (i, function_type) = FunctionType::parse(i)?;
        let (i, payload) = take(len - 3)(i)?;
        let expected_checksum = compute_checksum(raw_data);
        let (i, checksum) = Self::parse_with_checksum(expected_checksum)(i)?;
        let _ = rem;

        Ok((
            i,
            Self {
                command_type,
                function_type,
                payload: payload.to_vec(),
                checksum,
            },
        ))
    }
}

impl Serializable for CommandFrame {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        use cookie_factory::{bytes::be_u8, combinator::slice, sequence::tuple};

        move |out| {
            let sof = be_u8(SerialControlByte::SOF as u8);
            let len = be_u8(self.payload.len() as u8 + 3);
            let command_type = self.command_type.serialize();
            let function_type = self.function_type.serialize();
            let payload = slice(&self.payload);
            let checksum = be_u8(0); // placeholder, patched below

            let mut buf = cookie_factory::gen_simple(
                tuple((sof, len, command_type, function_type, payload, checksum)),
                Vec::new(),
            )?;
            let checksum = compute_checksum(&buf);
            let buf_len = buf.len();
            cookie_factory::gen_simple(be_u8(checksum), &mut buf[buf_len - 1..])?;
            slice(buf)(out)
        }
    }
}

impl Command for CommandFrame {
    fn command_type(&self) -> CommandType {
        self.command_type
    }

    fn function_type(&self) -> FunctionType {
        self.function_type
    }

    fn to_log_payload(&self) -> zwave_core::log::LogPayload {
        LogPayloadDict::new()
            .with_entry("payload", format!("0x{}", hex::encode(&self.payload)))
            .into()
    }
}

impl TryFrom<&[u8]> for CommandFrame {
    type Error = EncodingError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from_slice(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_checksum() {
        // This is an actual message with a correct checksum
        let input = hex::decode("01030002fe").unwrap();
        let expected = 0xfe;
        assert_eq!(compute_checksum(&input), expected);
    }

    #[test]
    fn test_parse_invalid_checksum() {
        // This is an actual message with a correct checksum
        let input = hex::decode("01030002fe").unwrap();
        let result = CommandFrame::try_from_slice(&input);
        assert!(result.is_ok());

        // Now it is wrong
        let input = hex::decode("01030002ff").unwrap();
        let result = CommandFrame::try_from_slice(&input);
        assert!(result.is_err());
    }

    #[test]
    fn test_roundtrip() {
        let input = hex::decode("01030002fe").unwrap();
        let parsed = CommandFrame::try_from_slice(&input).unwrap();
        let serialized = parsed.try_to_vec().unwrap();
        assert_eq!(serialized, input);
    }
}
