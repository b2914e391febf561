use crate::commandclass::CommandClass;
use crate::frame::CommandClassFrame;
use derive_try_from_primitive::TryFromPrimitive;
use nom::{combinator::map, number::complete::be_u8};
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult, Serializable};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::CommandClasses;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum BasicCCCommand {
    Set = 0x01,
    Get = 0x02,
    Report = 0x03,
}

/// Sets a device's primary, application-agnostic value: on/off for a
/// switch, brightness for a dimmer, and so on. `0x00` is off/minimum,
/// `0x01..=0x63` a relative level, `0xff` means "restore previous value".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicCCSet {
    pub target_value: u8,
}

impl Parsable for BasicCCSet {
    fn parse(i: Input) -> ParseResult<Self> {
        map(be_u8, |target_value| Self { target_value })(i)
    }
}

impl CommandClass for BasicCCSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Basic
    }

    fn cc_command(&self) -> Option<u8> {
        Some(BasicCCCommand::Set as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("target value", self.target_value)
            .into()
    }
}

impl From<&BasicCCSet> for CommandClassFrame {
    fn from(cmd: &BasicCCSet) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: vec![cmd.target_value],
        }
    }
}

/// Requests the current and, if in transition, target value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasicCCGet {}

impl CommandClass for BasicCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Basic
    }

    fn cc_command(&self) -> Option<u8> {
        Some(BasicCCCommand::Get as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayload::empty()
    }
}

impl From<&BasicCCGet> for CommandClassFrame {
    fn from(cmd: &BasicCCGet) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: Vec::new(),
        }
    }
}

/// The current value, and if a transition is in progress, the value it is
/// transitioning to and how many seconds remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicCCReport {
    pub current_value: u8,
    pub target_value: Option<u8>,
    pub duration: Option<u8>,
}

impl Parsable for BasicCCReport {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, current_value) = be_u8(i)?;
        let (i, target_value) = nom::combinator::opt(be_u8)(i)?;
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

impl TryFrom<&CommandClassFrame> for BasicCCReport {
    type Error = EncodingError;

    fn try_from(frame: &CommandClassFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl CommandClass for BasicCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Basic
    }

    fn cc_command(&self) -> Option<u8> {
        Some(BasicCCCommand::Report as u8)
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
    fn test_report_without_transition() {
        let report = BasicCCReport::try_from_slice(&[0x63]).unwrap();
        assert_eq!(
            report,
            BasicCCReport {
                current_value: 0x63,
                target_value: None,
                duration: None,
            }
        );
    }

    #[test]
    fn test_report_with_transition() {
        let report = BasicCCReport::try_from_slice(&[0x00, 0x63, 0x05]).unwrap();
        assert_eq!(
            report,
            BasicCCReport {
                current_value: 0x00,
                target_value: Some(0x63),
                duration: Some(0x05),
            }
        );
    }
}
