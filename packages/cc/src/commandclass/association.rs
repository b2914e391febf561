use crate::commandclass::CommandClass;
use crate::frame::CommandClassFrame;
use derive_try_from_primitive::TryFromPrimitive;
use nom::{combinator::map, multi::many0, number::complete::be_u8};
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult, Serializable};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::{CommandClasses, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum AssociationCCCommand {
    Set = 0x01,
    Get = 0x02,
    Report = 0x03,
    Remove = 0x04,
    SupportedGroupingsGet = 0x05,
    SupportedGroupingsReport = 0x06,
}

fn node_ids_payload(node_ids: &[NodeId]) -> Vec<u8> {
    node_ids.iter().map(|n| n.as_u8()).collect()
}

/// Adds nodes to a node's association group, so that node sends it reports
/// directly instead of the controller having to poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationCCSet {
    pub group_id: u8,
    pub node_ids: Vec<NodeId>,
}

impl Parsable for AssociationCCSet {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, group_id) = be_u8(i)?;
        let (i, node_ids) = many0(map(be_u8, NodeId::new))(i)?;

        Ok((i, Self { group_id, node_ids }))
    }
}

impl Serializable for AssociationCCSet {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        use cookie_factory::{bytes::be_u8, combinator::slice, sequence::tuple};
        tuple((be_u8(self.group_id), slice(node_ids_payload(&self.node_ids))))
    }
}

impl CommandClass for AssociationCCSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Association
    }

    fn cc_command(&self) -> Option<u8> {
        Some(AssociationCCCommand::Set as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("group id", self.group_id)
            .with_entry(
                "node ids",
                self.node_ids
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
            .into()
    }
}

impl From<&AssociationCCSet> for CommandClassFrame {
    fn from(cmd: &AssociationCCSet) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: cmd.try_to_vec().expect("AssociationCCSet always serializes"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociationCCGet {
    pub group_id: u8,
}

impl Parsable for AssociationCCGet {
    fn parse(i: Input) -> ParseResult<Self> {
        map(be_u8, |group_id| Self { group_id })(i)
    }
}

impl Serializable for AssociationCCGet {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        cookie_factory::bytes::be_u8(self.group_id)
    }
}

impl CommandClass for AssociationCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Association
    }

    fn cc_command(&self) -> Option<u8> {
        Some(AssociationCCCommand::Get as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("group id", self.group_id)
            .into()
    }
}

impl From<&AssociationCCGet> for CommandClassFrame {
    fn from(cmd: &AssociationCCGet) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: cmd.try_to_vec().expect("AssociationCCGet always serializes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationCCReport {
    pub group_id: u8,
    pub max_nodes: u8,
    pub reports_to_follow: u8,
    pub node_ids: Vec<NodeId>,
}

impl Parsable for AssociationCCReport {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, group_id) = be_u8(i)?;
        let (i, max_nodes) = be_u8(i)?;
        let (i, reports_to_follow) = be_u8(i)?;
        let (i, node_ids) = many0(map(be_u8, NodeId::new))(i)?;

        Ok((
            i,
            Self {
                group_id,
                max_nodes,
                reports_to_follow,
                node_ids,
            },
        ))
    }
}

impl TryFrom<&CommandClassFrame> for AssociationCCReport {
    type Error = EncodingError;

    fn try_from(frame: &CommandClassFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl CommandClass for AssociationCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Association
    }

    fn cc_command(&self) -> Option<u8> {
        Some(AssociationCCCommand::Report as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("group id", self.group_id)
            .with_entry("max nodes", self.max_nodes)
            .with_entry("reports to follow", self.reports_to_follow)
            .with_entry(
                "node ids",
                self.node_ids
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
            .into()
    }
}

/// Removes nodes from an association group. An empty `node_ids` list removes
/// all nodes from the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationCCRemove {
    pub group_id: u8,
    pub node_ids: Vec<NodeId>,
}

impl Parsable for AssociationCCRemove {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, group_id) = be_u8(i)?;
        let (i, node_ids) = many0(map(be_u8, NodeId::new))(i)?;

        Ok((i, Self { group_id, node_ids }))
    }
}

impl Serializable for AssociationCCRemove {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        use cookie_factory::{bytes::be_u8, combinator::slice, sequence::tuple};
        tuple((be_u8(self.group_id), slice(node_ids_payload(&self.node_ids))))
    }
}

impl CommandClass for AssociationCCRemove {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Association
    }

    fn cc_command(&self) -> Option<u8> {
        Some(AssociationCCCommand::Remove as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("group id", self.group_id)
            .with_entry(
                "node ids",
                self.node_ids
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
            .into()
    }
}

impl From<&AssociationCCRemove> for CommandClassFrame {
    fn from(cmd: &AssociationCCRemove) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: cmd
                .try_to_vec()
                .expect("AssociationCCRemove always serializes"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_report_parse() {
        let report = AssociationCCReport::try_from_slice(&[0x01, 0x05, 0x00, 0x02, 0x03]).unwrap();
        assert_eq!(report.group_id, 1);
        assert_eq!(report.max_nodes, 5);
        assert_eq!(report.node_ids, vec![NodeId::new(2), NodeId::new(3)]);
    }
}
