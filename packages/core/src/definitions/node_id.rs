use crate::prelude::*;
use nom::number::complete::be_u8;
use std::fmt::{Debug, Display};

/// 8-bit device identifier within a [`HomeId`](super::HomeId). Valid node ids
/// run from 1 to 232; node 1 is conventionally the controller itself.
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u8);

pub const MAX_NODE_ID: u8 = 232;
pub const NODE_ID_BROADCAST: NodeId = NodeId(0xff);

impl NodeId {
    pub fn new(id: u8) -> Self {
        Self(id)
    }

    pub fn broadcast() -> Self {
        NODE_ID_BROADCAST
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    pub fn is_controller(&self) -> bool {
        self.0 == 1
    }
}

impl From<u8> for NodeId {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<NodeId> for u8 {
    fn from(value: NodeId) -> Self {
        value.0
    }
}

impl Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0>3}", self.0)
    }
}

impl Parsable for NodeId {
    fn parse(i: Input) -> ParseResult<Self> {
        nom::combinator::map(be_u8, NodeId)(i)
    }
}

impl Serializable for NodeId {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        cookie_factory::bytes::be_u8(self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let id = NodeId::new(5);
        let bytes = id.try_to_vec().unwrap();
        assert_eq!(bytes, vec![5]);
        assert_eq!(NodeId::try_from_slice(&bytes).unwrap(), id);
    }
}
