use crate::commandclass::CommandClass;
use crate::frame::CommandClassFrame;
use derive_try_from_primitive::TryFromPrimitive;
use nom::{combinator::map, number::complete::be_u8};
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult, Serializable};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::CommandClasses;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum BinarySwitchCCCommand {
    Set = 0x01,
    Get = 0x02,
    Report = 0x03,
}

/// Turns a binary switch on or off, with an optional transition duration
/// (added in v2; `0xff` means "device default").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinarySwitchCCSet {
    pub target_value: bool,
    pub duration: Option<u8>,
}

impl Parsable for BinarySwitchCCSet {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, target_value) = parse_binary(i)?;
        let (i, duration) = nom::combinator::opt(be_u8)(i)?;
        Ok((
            i,
            Self {
                target_value,
                duration,
            },
        ))
    }
}

impl Serializable for BinarySwitchCCSet {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        use cookie_factory::{bytes::be_u8, sequence::tuple};
        tuple((
            be_u8(self.target_value as u8 * 0xff),
            move |out| match self.duration {
                Some(duration) => be_u8(duration)(out),
                None => Ok(out),
            },
        ))
    }
}

impl CommandClass for BinarySwitchCCSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::BinarySwitch
    }

    fn cc_command(&self) -> Option<u8> {
        Some(BinarySwitchCCCommand::Set as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        let mut ret = LogPayloadDict::new().with_entry("target value", self.target_value);
        if let Some(duration) = self.duration {
            ret = ret.with_entry("duration", duration);
        }
        ret.into()
    }
}

impl From<&BinarySwitchCCSet> for CommandClassFrame {
    fn from(cmd: &BinarySwitchCCSet) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: cmd.try_to_vec().expect("BinarySwitchCCSet always serializes"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinarySwitchCCGet {}

impl CommandClass for BinarySwitchCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::BinarySwitch
    }

    fn cc_command(&self) -> Option<u8> {
        Some(BinarySwitchCCCommand::Get as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayload::empty()
    }
}

impl From<&BinarySwitchCCGet> for CommandClassFrame {
    fn from(cmd: &BinarySwitchCCGet) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinarySwitchCCReport {
    pub current_value: bool,
    pub target_value: Option<bool>,
    pub duration: Option<u8>,
}

fn parse_binary(i: Input) -> ParseResult<bool> {
    map(be_u8, |b| b != 0)(i)
}

impl Parsable for BinarySwitchCCReport {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, current_value) = parse_binary(i)?;
        let (i, target_value) = nom::combinator::opt(parse_binary)(i)?;
        let (i, duration) = if target_value.is_some() {
            map(be_u8, Some)(i)?
        } else {
            (i, None)
        };

        Ok((
            i,
            Self {
                current_value,
                target_value,
                duration,
            },
        ))
    }
}

impl TryFrom<&CommandClassFrame> for BinarySwitchCCReport {
    type Error = EncodingError;

    fn try_from(frame: &CommandClassFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl CommandClass for BinarySwitchCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::BinarySwitch
    }

    fn cc_command(&self) -> Option<u8> {
        Some(BinarySwitchCCCommand::Report as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        let mut ret = LogPayloadDict::new().with_entry("current value", self.current_value);
        if let Some(target_value) = self.target_value {
            ret = ret.with_entry("target value", target_value);
        }
        if let Some(duration) = self.duration {
            ret = ret.with_entry("duration", duration);
        }
        ret.into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_set_roundtrip() {
        let cmd = BinarySwitchCCSet {
            target_value: true,
            duration: Some(5),
        };
        assert_eq!(cmd.try_to_vec().unwrap(), vec![0xff, 0x05]);
    }

    #[test]
    fn test_report_without_transition() {
        let report = BinarySwitchCCReport::try_from_slice(&[0x00]).unwrap();
        assert_eq!(
            report,
            BinarySwitchCCReport {
                current_value: false,
                target_value: None,
                duration: None,
            }
        );
    }
}
