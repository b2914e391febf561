use crate::prelude::*;
use nom::number::complete::be_u32;
use std::fmt::{Debug, Display};

/// 32-bit identifier of the controller's logical network, handed out by the
/// stick at startup (`GetControllerId`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HomeId(u32);

impl HomeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for HomeId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<HomeId> for u32 {
    fn from(value: HomeId) -> Self {
        value.0
    }
}

impl Debug for HomeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Display for HomeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(self, f)
    }
}

impl Parsable for HomeId {
    fn parse(i: Input) -> ParseResult<Self> {
        nom::combinator::map(be_u32, HomeId)(i)
    }
}

impl Serializable for HomeId {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        cookie_factory::bytes::be_u32(self.0)
    }
}
