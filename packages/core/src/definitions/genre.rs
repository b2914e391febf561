use std::fmt::Display;

/// Coarse classification of a [`crate::value_id::ValueId`], carried over from
/// the value classes of the original engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Genre {
    /// A value every device of this command class has, regardless of config.
    Basic = 0,
    /// A value that is meaningful to show directly to a user.
    User = 1,
    /// A device-configuration parameter.
    Config = 2,
    /// An internal value not normally shown to the user.
    System = 3,
}

impl TryFrom<u8> for Genre {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Genre::Basic),
            1 => Ok(Genre::User),
            2 => Ok(Genre::Config),
            3 => Ok(Genre::System),
            other => Err(other),
        }
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Genre::Basic => write!(f, "Basic"),
            Genre::User => write!(f, "User"),
            Genre::Config => write!(f, "Config"),
            Genre::System => write!(f, "System"),
        }
    }
}
