use crate::commandclass::CommandClass;
use crate::frame::CommandClassFrame;
use derive_try_from_primitive::TryFromPrimitive;
use nom::number::complete::be_u8;
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult, Serializable};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::{CommandClasses, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum WakeUpCCCommand {
    IntervalSet = 0x04,
    IntervalGet = 0x05,
    IntervalReport = 0x06,
    Notification = 0x07,
    NoMoreInformation = 0x08,
}

fn parse_u24(i: Input) -> ParseResult<u32> {
    let (i, hi) = be_u8(i)?;
    let (i, mid) = be_u8(i)?;
    let (i, lo) = be_u8(i)?;
    Ok((i, (hi as u32) << 16 | (mid as u32) << 8 | lo as u32))
}

fn serialize_u24(value: u32) -> [u8; 3] {
    let bytes = value.to_be_bytes();
    [bytes[1], bytes[2], bytes[3]]
}

/// Tells the node how often to wake up, and which node to notify when it
/// does (almost always the controller).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeUpCCIntervalSet {
    pub wake_up_interval: u32,
    pub node_id: NodeId,
}

impl Parsable for WakeUpCCIntervalSet {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, wake_up_interval) = parse_u24(i)?;
        let (i, node_id) = nom::combinator::map(be_u8, NodeId::new)(i)?;

        Ok((
            i,
            Self {
                wake_up_interval,
                node_id,
            },
        ))
    }
}

impl Serializable for WakeUpCCIntervalSet {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        use cookie_factory::{bytes::be_u8, combinator::slice, sequence::tuple};
        tuple((
            slice(serialize_u24(self.wake_up_interval)),
            be_u8(self.node_id.as_u8()),
        ))
    }
}

impl CommandClass for WakeUpCCIntervalSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::WakeUp
    }

    fn cc_command(&self) -> Option<u8> {
        Some(WakeUpCCCommand::IntervalSet as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("wake up interval", format!("{}s", self.wake_up_interval))
            .with_entry("notify node", self.node_id.to_string())
            .into()
    }
}

impl From<&WakeUpCCIntervalSet> for CommandClassFrame {
    fn from(cmd: &WakeUpCCIntervalSet) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: cmd
                .try_to_vec()
                .expect("WakeUpCCIntervalSet always serializes"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WakeUpCCIntervalGet {}

impl CommandClass for WakeUpCCIntervalGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::WakeUp
    }

    fn cc_command(&self) -> Option<u8> {
        Some(WakeUpCCCommand::IntervalGet as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayload::empty()
    }
}

impl From<&WakeUpCCIntervalGet> for CommandClassFrame {
    fn from(cmd: &WakeUpCCIntervalGet) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeUpCCIntervalReport {
    pub wake_up_interval: u32,
    pub node_id: NodeId,
}

impl Parsable for WakeUpCCIntervalReport {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, wake_up_interval) = parse_u24(i)?;
        let (i, node_id) = nom::combinator::map(be_u8, NodeId::new)(i)?;

        Ok((
            i,
            Self {
                wake_up_interval,
                node_id,
            },
        ))
    }
}

impl TryFrom<&CommandClassFrame> for WakeUpCCIntervalReport {
    type Error = EncodingError;

    fn try_from(frame: &CommandClassFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl CommandClass for WakeUpCCIntervalReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::WakeUp
    }

    fn cc_command(&self) -> Option<u8> {
        Some(WakeUpCCCommand::IntervalReport as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("wake up interval", format!("{}s", self.wake_up_interval))
            .with_entry("notify node", self.node_id.to_string())
            .into()
    }
}

/// Sent by the node right after it wakes up, so the controller can flush its
/// queued commands for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WakeUpCCNotification {}

impl CommandClass for WakeUpCCNotification {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::WakeUp
    }

    fn cc_command(&self) -> Option<u8> {
        Some(WakeUpCCCommand::Notification as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayload::empty()
    }
}

impl TryFrom<&CommandClassFrame> for WakeUpCCNotification {
    type Error = EncodingError;

    fn try_from(_frame: &CommandClassFrame) -> Result<Self, Self::Error> {
        Ok(Self {})
    }
}

/// Sent by the controller to tell the node it can go back to sleep; the
/// queue for that node has been drained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WakeUpCCNoMoreInformation {}

impl CommandClass for WakeUpCCNoMoreInformation {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::WakeUp
    }

    fn cc_command(&self) -> Option<u8> {
        Some(WakeUpCCCommand::NoMoreInformation as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayload::empty()
    }
}

impl From<&WakeUpCCNoMoreInformation> for CommandClassFrame {
    fn from(cmd: &WakeUpCCNoMoreInformation) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: Vec::new(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_interval_set_roundtrip() {
        let cmd = WakeUpCCIntervalSet {
            wake_up_interval: 3600,
            node_id: NodeId::new(1),
        };
        let bytes = cmd.try_to_vec().unwrap();
        assert_eq!(bytes, vec![0x00, 0x0e, 0x10, 0x01]);
    }

    #[test]
    fn test_interval_report_parse() {
        let report =
            WakeUpCCIntervalReport::try_from_slice(&[0x00, 0x0e, 0x10, 0x01]).unwrap();
        assert_eq!(report.wake_up_interval, 3600);
        assert_eq!(report.node_id, NodeId::new(1));
    }
}
