use std::fmt::Display;

/// Discriminates the payload carried by a [`crate::values::Value`]; also the
/// `Type` component of a [`crate::value_id::ValueId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueType {
    Bool = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Decimal = 4,
    String = 5,
    List = 6,
    Schedule = 7,
    Button = 8,
    Raw = 9,
}

impl TryFrom<u8> for ValueType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use ValueType::*;
        Ok(match value {
            0 => Bool,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Decimal,
            5 => String,
            6 => List,
            7 => Schedule,
            8 => Button,
            9 => Raw,
            other => return Err(other),
        })
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
