use crate::prelude::{Parsable, ParseResult, Serializable};
use cookie_factory::{sequence::tuple, SerializeFn};
use nom::number::complete::be_u8;
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Parsable for Version {
    fn parse(i: crate::encoding::Input) -> ParseResult<Self> {
        let (i, major) = be_u8(i)?;
        let (i, minor) = be_u8(i)?;
        let (i, patch) = be_u8(i)?;
        Ok((i, Self { major, minor, patch }))
    }
}

impl Serializable for Version {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl SerializeFn<W> + 'a {
        tuple((
            cookie_factory::bytes::be_u8(self.major),
            cookie_factory::bytes::be_u8(self.minor),
            cookie_factory::bytes::be_u8(self.patch),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let v = Version { major: 1, minor: 2, patch: 3 };
        let bytes = v.try_to_vec().unwrap();
        let (_, parsed) = Version::parse(&bytes).unwrap();
        assert_eq!(v, parsed);
    }
}
