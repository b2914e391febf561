use crate::commandclass::CommandClass;
use crate::frame::CommandClassFrame;
use derive_try_from_primitive::TryFromPrimitive;
use nom::{bytes::complete::take, number::complete::be_u8};
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult, Serializable};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::CommandClasses;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ConfigurationCCCommand {
    Set = 0x04,
    Get = 0x05,
    Report = 0x06,
}

fn value_to_bytes(value: i32, size: u8) -> Vec<u8> {
    value.to_be_bytes()[4 - size as usize..].to_vec()
}

fn bytes_to_value(raw: &[u8]) -> i32 {
    let mut value: i32 = match raw.first() {
        Some(b) if b & 0x80 != 0 => -1,
        _ => 0,
    };
    for &byte in raw {
        value = (value << 8) | byte as i32;
    }
    value
}

/// Writes a single device-configuration parameter. `default_value` requests
/// that the device reset the parameter to its factory default instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationCCSet {
    pub parameter: u8,
    pub size: u8,
    pub value: i32,
    pub default_value: bool,
}

impl Parsable for ConfigurationCCSet {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, parameter) = be_u8(i)?;
        let (i, level) = be_u8(i)?;
        let default_value = level & 0b1000_0000 != 0;
        let size = level & 0b0000_0111;
        let (i, raw) = take(size as usize)(i)?;

        Ok((
            i,
            Self {
                parameter,
                size,
                value: bytes_to_value(raw),
                default_value,
            },
        ))
    }
}

impl Serializable for ConfigurationCCSet {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        use cookie_factory::{bytes::be_u8, combinator::slice, sequence::tuple};
        let level = (self.default_value as u8) << 7 | (self.size & 0b0000_0111);
        tuple((
            be_u8(self.parameter),
            be_u8(level),
            slice(value_to_bytes(self.value, self.size)),
        ))
    }
}

impl CommandClass for ConfigurationCCSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Configuration
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ConfigurationCCCommand::Set as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("parameter", self.parameter)
            .with_entry("value", self.value)
            .with_entry("reset to default", self.default_value)
            .into()
    }
}

impl From<&ConfigurationCCSet> for CommandClassFrame {
    fn from(cmd: &ConfigurationCCSet) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: cmd.try_to_vec().expect("ConfigurationCCSet always serializes"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigurationCCGet {
    pub parameter: u8,
}

impl Parsable for ConfigurationCCGet {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, parameter) = be_u8(i)?;
        Ok((i, Self { parameter }))
    }
}

impl Serializable for ConfigurationCCGet {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        cookie_factory::bytes::be_u8(self.parameter)
    }
}

impl CommandClass for ConfigurationCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Configuration
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ConfigurationCCCommand::Get as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("parameter", self.parameter)
            .into()
    }
}

impl From<&ConfigurationCCGet> for CommandClassFrame {
    fn from(cmd: &ConfigurationCCGet) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: cmd.try_to_vec().expect("ConfigurationCCGet always serializes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationCCReport {
    pub parameter: u8,
    pub size: u8,
    pub value: i32,
}

impl Parsable for ConfigurationCCReport {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, parameter) = be_u8(i)?;
        let (i, level) = be_u8(i)?;
        let size = level & 0b0000_0111;
        let (i, raw) = take(size as usize)(i)?;

        Ok((
            i,
            Self {
                parameter,
                size,
                value: bytes_to_value(raw),
            },
        ))
    }
}

impl TryFrom<&CommandClassFrame> for ConfigurationCCReport {
    type Error = EncodingError;

    fn try_from(frame: &CommandClassFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl CommandClass for ConfigurationCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Configuration
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ConfigurationCCCommand::Report as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("parameter", self.parameter)
            .with_entry("value", self.value)
            .into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_set_roundtrip() {
        let cmd = ConfigurationCCSet {
            parameter: 3,
            size: 2,
            value: -1,
            default_value: false,
        };
        assert_eq!(cmd.try_to_vec().unwrap(), vec![0x03, 0x02, 0xff, 0xff]);
    }

    #[test]
    fn test_report_parse() {
        let report = ConfigurationCCReport::try_from_slice(&[0x03, 0x01, 0x0a]).unwrap();
        assert_eq!(
            report,
            ConfigurationCCReport {
                parameter: 3,
                size: 1,
                value: 10,
            }
        );
    }
}
