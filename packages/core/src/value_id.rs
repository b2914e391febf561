use crate::prelude::*;

/// Identifies a single value on a single node: which command class exposes
/// it, which instance/endpoint, its genre and index within that CC, and its
/// underlying [`ValueType`]. Packs into a 64-bit integer via [`as_u64`] for
/// cheap hashing and as a stable external identifier (spec's data model),
/// following the single-packed-integer identity of OpenZWave's `ValueID`.
///
/// `HomeId` is not part of the packed form: a single running driver only
/// ever has one, so it travels alongside rather than eating into the 64-bit
/// budget. See [`ValueId::as_u64`] for the exact bit layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueId {
    pub home_id: HomeId,
    pub node_id: NodeId,
    pub genre: Genre,
    pub command_class: CommandClasses,
    pub instance: u8,
    pub index: u32,
    pub value_type: ValueType,
}

impl ValueId {
    pub fn new(
        home_id: HomeId,
        node_id: NodeId,
        genre: Genre,
        command_class: CommandClasses,
        instance: u8,
        index: u32,
        value_type: ValueType,
    ) -> Self {
        Self {
            home_id,
            node_id,
            genre,
            command_class,
            instance,
            index,
            value_type,
        }
    }

    /// Packs everything but `home_id` into a single 64-bit integer:
    /// `[NodeId:8][Genre:4][CommandClassId:8][Instance:8][Index:32][Type:4]`,
    /// MSB first. Command-class ids above `0xff` (the rare Z/IP-only
    /// extended classes) are truncated to their low byte; none of the
    /// representative classes this crate ships are affected.
    pub fn as_u64(&self) -> u64 {
        let node_id = self.node_id.as_u8() as u64;
        let genre = (self.genre as u64) & 0xf;
        let cc = (self.command_class as u64) & 0xff;
        let instance = self.instance as u64;
        let index = self.index as u64;
        let value_type = (self.value_type as u64) & 0xf;

        (node_id << 56)
            | (genre << 52)
            | (cc << 44)
            | (instance << 36)
            | (index << 4)
            | value_type
    }

    /// Reconstructs a [`ValueId`] from a packed integer and the `HomeId` of
    /// the driver it came from. The command-class id is looked up through
    /// [`CommandClasses::try_from`]; an id with no known mapping is an error
    /// since a `ValueId` without a command class is meaningless.
    pub fn from_u64(home_id: HomeId, packed: u64) -> Result<Self, EncodingError> {
        let node_id = NodeId::new((packed >> 56) as u8);
        let genre = Genre::try_from(((packed >> 52) & 0xf) as u8)
            .map_err(|_| EncodingError::Parse("invalid genre in packed ValueId".into()))?;
        let cc_id = ((packed >> 44) & 0xff) as u16;
        let command_class = CommandClasses::try_from(cc_id)
            .map_err(|_| EncodingError::Parse("invalid command class in packed ValueId".into()))?;
        let instance = ((packed >> 36) & 0xff) as u8;
        let index = ((packed >> 4) & 0xffff_ffff) as u32;
        let value_type = ValueType::try_from((packed & 0xf) as u8)
            .map_err(|_| EncodingError::Parse("invalid value type in packed ValueId".into()))?;

        Ok(Self {
            home_id,
            node_id,
            genre,
            command_class,
            instance,
            index,
            value_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_roundtrip() {
        let id = ValueId::new(
            HomeId::new(0xdead_beef),
            NodeId::new(5),
            Genre::User,
            CommandClasses::BinarySwitch,
            1,
            0,
            ValueType::Bool,
        );
        let packed = id.as_u64();
        let restored = ValueId::from_u64(id.home_id, packed).unwrap();
        assert_eq!(id, restored);
    }

    #[test]
    fn test_distinct_ids_pack_distinctly() {
        let a = ValueId::new(
            HomeId::new(1),
            NodeId::new(1),
            Genre::User,
            CommandClasses::Basic,
            0,
            0,
            ValueType::Byte,
        );
        let b = ValueId::new(
            HomeId::new(1),
            NodeId::new(2),
            Genre::User,
            CommandClasses::Basic,
            0,
            0,
            ValueType::Byte,
        );
        assert_ne!(a.as_u64(), b.as_u64());
    }
}
