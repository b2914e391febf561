use crate::commandclass::CommandClass;
use crate::frame::CommandClassFrame;
use derive_try_from_primitive::TryFromPrimitive;
use nom::{multi::many0, number::complete::be_u8, sequence::pair};
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult, Serializable};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::CommandClasses;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum VersionCCCommand {
    Get = 0x11,
    Report = 0x12,
    CommandClassGet = 0x13,
    CommandClassReport = 0x14,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionCCGet {}

impl CommandClass for VersionCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Version
    }

    fn cc_command(&self) -> Option<u8> {
        Some(VersionCCCommand::Get as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayload::empty()
    }
}

impl From<&VersionCCGet> for CommandClassFrame {
    fn from(cmd: &VersionCCGet) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: Vec::new(),
        }
    }
}

fn fmt_major_minor((major, minor): (u8, u8)) -> String {
    format!("{}.{}", major, minor)
}

/// The Z-Wave library type, protocol version and one firmware version per
/// chip on the node. Most nodes only have one firmware target, so
/// `firmware_versions` usually has a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCCReport {
    pub library_type: u8,
    pub protocol_version: (u8, u8),
    pub firmware_versions: Vec<(u8, u8)>,
    pub hardware_version: Option<u8>,
}

impl Parsable for VersionCCReport {
    fn parse(i: Input) -> ParseResult<Self> {
        let major_minor = |i| pair(be_u8, be_u8)(i);

        let (i, library_type) = be_u8(i)?;
        let (i, protocol_version) = major_minor(i)?;
        let (i, firmware_0_version) = major_minor(i)?;
        let (i, hardware_version) = nom::combinator::opt(be_u8)(i)?;
        let (i, additional_firmware_versions) = if hardware_version.is_some() {
            many0(major_minor)(i)?
        } else {
            (i, Vec::new())
        };

        let mut firmware_versions = vec![firmware_0_version];
        firmware_versions.extend(additional_firmware_versions);

        Ok((
            i,
            Self {
                library_type,
                protocol_version,
                firmware_versions,
                hardware_version,
            },
        ))
    }
}

impl TryFrom<&CommandClassFrame> for VersionCCReport {
    type Error = EncodingError;

    fn try_from(frame: &CommandClassFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl CommandClass for VersionCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Version
    }

    fn cc_command(&self) -> Option<u8> {
        Some(VersionCCCommand::Report as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        let mut ret = LogPayloadDict::new()
            .with_entry("library type", self.library_type)
            .with_entry("protocol version", fmt_major_minor(self.protocol_version))
            .with_entry(
                "firmware versions",
                self.firmware_versions
                    .iter()
                    .map(|&v| fmt_major_minor(v))
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        if let Some(hardware_version) = self.hardware_version {
            ret = ret.with_entry("hardware version", hardware_version);
        }
        ret.into()
    }
}

/// Asks for the implemented version of a specific command class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionCCCommandClassGet {
    pub requested_cc: CommandClasses,
}

impl Parsable for VersionCCCommandClassGet {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, requested_cc) = CommandClasses::parse(i)?;
        Ok((i, Self { requested_cc }))
    }
}

impl Serializable for VersionCCCommandClassGet {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        self.requested_cc.serialize()
    }
}

impl CommandClass for VersionCCCommandClassGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Version
    }

    fn cc_command(&self) -> Option<u8> {
        Some(VersionCCCommand::CommandClassGet as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("requested CC", self.requested_cc.to_string())
            .into()
    }
}

impl From<&VersionCCCommandClassGet> for CommandClassFrame {
    fn from(cmd: &VersionCCCommandClassGet) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: cmd
                .try_to_vec()
                .expect("VersionCCCommandClassGet always serializes"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionCCCommandClassReport {
    pub requested_cc: CommandClasses,
    pub version: u8,
}

impl Parsable for VersionCCCommandClassReport {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, requested_cc) = CommandClasses::parse(i)?;
        let (i, version) = be_u8(i)?;

        Ok((
            i,
            Self {
                requested_cc,
                version,
            },
        ))
    }
}

impl TryFrom<&CommandClassFrame> for VersionCCCommandClassReport {
    type Error = EncodingError;

    fn try_from(frame: &CommandClassFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl CommandClass for VersionCCCommandClassReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Version
    }

    fn cc_command(&self) -> Option<u8> {
        Some(VersionCCCommand::CommandClassReport as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("requested CC", self.requested_cc.to_string())
            .with_entry("version", self.version)
            .into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_report_single_firmware() {
        let report = VersionCCReport::try_from_slice(&[0x03, 0x06, 0x01, 0x01, 0x04]).unwrap();
        assert_eq!(report.library_type, 0x03);
        assert_eq!(report.protocol_version, (6, 1));
        assert_eq!(report.firmware_versions, vec![(1, 4)]);
        assert_eq!(report.hardware_version, None);
    }

    #[test]
    fn test_cc_report_parse() {
        let report =
            VersionCCCommandClassReport::try_from_slice(&[CommandClasses::Basic as u8, 0x02])
                .unwrap();
        assert_eq!(report.requested_cc, CommandClasses::Basic);
        assert_eq!(report.version, 2);
    }
}
