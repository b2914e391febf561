use crate::commandclass::CommandClass;
use crate::frame::CommandClassFrame;
use derive_try_from_primitive::TryFromPrimitive;
use nom::number::complete::be_u16;
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult, Serializable};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::CommandClasses;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ManufacturerSpecificCCCommand {
    Get = 0x04,
    Report = 0x05,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManufacturerSpecificCCGet {}

impl CommandClass for ManufacturerSpecificCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ManufacturerSpecific
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ManufacturerSpecificCCCommand::Get as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayload::empty()
    }
}

impl From<&ManufacturerSpecificCCGet> for CommandClassFrame {
    fn from(cmd: &ManufacturerSpecificCCGet) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: Vec::new(),
        }
    }
}

/// Identifies the manufacturer and product of a node, used to look up its
/// device configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManufacturerSpecificCCReport {
    pub manufacturer_id: u16,
    pub product_type: u16,
    pub product_id: u16,
}

impl Parsable for ManufacturerSpecificCCReport {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, manufacturer_id) = be_u16(i)?;
        let (i, product_type) = be_u16(i)?;
        let (i, product_id) = be_u16(i)?;

        Ok((
            i,
            Self {
                manufacturer_id,
                product_type,
                product_id,
            },
        ))
    }
}

impl TryFrom<&CommandClassFrame> for ManufacturerSpecificCCReport {
    type Error = EncodingError;

    fn try_from(frame: &CommandClassFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl CommandClass for ManufacturerSpecificCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ManufacturerSpecific
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ManufacturerSpecificCCCommand::Report as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("manufacturer id", format!("0x{:04x}", self.manufacturer_id))
            .with_entry("product type", format!("0x{:04x}", self.product_type))
            .with_entry("product id", format!("0x{:04x}", self.product_id))
            .into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse() {
        let report =
            ManufacturerSpecificCCReport::try_from_slice(&[0x01, 0x23, 0x00, 0x01, 0x00, 0x02])
                .unwrap();
        assert_eq!(
            report,
            ManufacturerSpecificCCReport {
                manufacturer_id: 0x0123,
                product_type: 0x0001,
                product_id: 0x0002,
            }
        );
    }
}
