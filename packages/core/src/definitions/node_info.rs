use crate::definitions::{CommandClasses, DeviceClass};
use crate::prelude::{Parsable, ParseResult, Serializable};
use cookie_factory::{combinator::slice, sequence::tuple, SerializeFn};
use nom::{
    bytes::complete::take,
    multi::many0,
    number::complete::be_u8,
};
use std::io::Write;

/// Capability flags carried in byte 0 of a `GetNodeProtocolInfo` reply.
/// Bit layout matches the serial API, not the bitstream order of the spec
/// on the wire, so it is decoded with plain masks rather than a bit-level
/// parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeCapabilities {
    pub listening: bool,
    pub routing: bool,
    pub max_baud_rate: u8,
    pub is_frequent_listening: bool,
    pub is_beaming: bool,
}

impl Parsable for NodeCapabilities {
    fn parse(i: crate::encoding::Input) -> ParseResult<Self> {
        let (i, byte) = be_u8(i)?;
        let listening = byte & 0b1000_0000 != 0;
        let max_baud_rate = (byte & 0b0110_0000) >> 5;
        let routing = byte & 0b0001_0000 != 0;
        let is_frequent_listening = byte & 0b0000_0010 != 0;
        let is_beaming = byte & 0b0000_0001 != 0;
        Ok((
            i,
            Self {
                listening,
                routing,
                max_baud_rate,
                is_frequent_listening,
                is_beaming,
            },
        ))
    }
}

impl Serializable for NodeCapabilities {
    fn serialize<'a, W: Write + 'a>(&'a self) -> impl SerializeFn<W> + 'a {
        let byte = (self.listening as u8) << 7
            | (self.max_baud_rate & 0b11) << 5
            | (self.routing as u8) << 4
            | (self.is_frequent_listening as u8) << 1
            | self.is_beaming as u8;
        cookie_factory::bytes::be_u8(byte)
    }
}

/// The reply to `GetNodeProtocolInfo`: capability flags plus device class
/// triple, enough to start the interview pipeline (spec §4.4, stage
/// `ProtocolInfo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeProtocolInfo {
    pub capabilities: NodeCapabilities,
    pub device_class: DeviceClass,
}

impl Parsable for NodeProtocolInfo {
    fn parse(i: crate::encoding::Input) -> ParseResult<Self> {
        let (i, capabilities) = NodeCapabilities::parse(i)?;
        let (i, _reserved) = be_u8(i)?;
        let (i, basic) = be_u8(i)?;
        let (i, generic) = be_u8(i)?;
        let (i, specific) = be_u8(i)?;
        Ok((
            i,
            Self {
                capabilities,
                device_class: DeviceClass {
                    basic,
                    generic,
                    specific,
                },
            },
        ))
    }
}

impl Serializable for NodeProtocolInfo {
    fn serialize<'a, W: Write + 'a>(&'a self) -> impl SerializeFn<W> + 'a {
        tuple((
            self.capabilities.serialize(),
            cookie_factory::bytes::be_u8(0),
            cookie_factory::bytes::be_u8(self.device_class.basic),
            cookie_factory::bytes::be_u8(self.device_class.generic),
            cookie_factory::bytes::be_u8(self.device_class.specific),
        ))
    }
}

/// The reply to `RequestNodeInfo`/the unsolicited `ApplicationUpdate`: device
/// class plus the node's supported command-class list, used to populate
/// stage `NodeInfo` (spec §4.4).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeInformationFrame {
    pub device_class: DeviceClass,
    pub supported_command_classes: Vec<CommandClasses>,
}

impl Parsable for NodeInformationFrame {
    fn parse(i: crate::encoding::Input) -> ParseResult<Self> {
        let (i, _capabilities) = be_u8(i)?;
        let (i, _reserved) = be_u8(i)?;
        let (i, basic) = be_u8(i)?;
        let (i, generic) = be_u8(i)?;
        let (i, specific) = be_u8(i)?;
        let (i, rest) = take(i.len())(i)?;
        let (_, command_classes) = many0(be_u8)(rest)?;
        let supported_command_classes = command_classes
            .into_iter()
            .filter_map(|b| CommandClasses::try_from(b as u16).ok())
            .collect();
        Ok((
            i,
            Self {
                device_class: DeviceClass {
                    basic,
                    generic,
                    specific,
                },
                supported_command_classes,
            },
        ))
    }
}

impl Serializable for NodeInformationFrame {
    fn serialize<'a, W: Write + 'a>(&'a self) -> impl SerializeFn<W> + 'a {
        let ccs: Vec<u8> = self
            .supported_command_classes
            .iter()
            .map(|cc| *cc as u8)
            .collect();
        tuple((
            cookie_factory::bytes::be_u8(0x80),
            cookie_factory::bytes::be_u8(0),
            cookie_factory::bytes::be_u8(self.device_class.basic),
            cookie_factory::bytes::be_u8(self.device_class.generic),
            cookie_factory::bytes::be_u8(self.device_class.specific),
            slice(ccs),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_roundtrip() {
        let caps = NodeCapabilities {
            listening: true,
            routing: true,
            max_baud_rate: 1,
            is_frequent_listening: false,
            is_beaming: true,
        };
        let bytes = caps.try_to_vec().unwrap();
        let (_, parsed) = NodeCapabilities::parse(&bytes).unwrap();
        assert_eq!(caps, parsed);
    }

    #[test]
    fn test_node_information_frame_roundtrip() {
        let frame = NodeInformationFrame {
            device_class: DeviceClass {
                basic: 0x04,
                generic: 0x10,
                specific: 0x01,
            },
            supported_command_classes: vec![CommandClasses::Basic, CommandClasses::BinarySwitch],
        };
        let bytes = frame.try_to_vec().unwrap();
        let (_, parsed) = NodeInformationFrame::parse(&bytes).unwrap();
        assert_eq!(frame, parsed);
    }
}
