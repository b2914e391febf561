use nom::{combinator::map, number::complete::be_u8};
use zwave_core::encoding::{Input, Parsable, ParseResult, Serializable};
use zwave_core::prelude::CommandClasses;

/// The undecoded command-class payload as carried inside a node-to-node
/// frame: a command class id, a command id (absent only for `NoOperation`,
/// which has none), and the remaining payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClassFrame {
    pub cc_id: CommandClasses,
    pub cc_command: Option<u8>,
    pub payload: Vec<u8>,
}

impl Parsable for CommandClassFrame {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, cc_id) = CommandClasses::parse(i)?;
        let (i, cc_command) = match cc_id {
            CommandClasses::NoOperation => (i, None),
            _ => map(be_u8, Some)(i)?,
        };

        Ok((
            &[],
            Self {
                cc_id,
                cc_command,
                payload: i.to_vec(),
            },
        ))
    }
}

impl Serializable for CommandClassFrame {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        use cookie_factory::{bytes::be_u8, combinator::slice, sequence::tuple};

        move |out| {
            let cc_id = self.cc_id.serialize();
            let cc_command = move |out| match self.cc_command {
                Some(cmd) => be_u8(cmd)(out),
                None => Ok(out),
            };
            tuple((cc_id, cc_command, slice(&self.payload)))(out)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let frame = CommandClassFrame {
            cc_id: CommandClasses::Basic,
            cc_command: Some(0x01),
            payload: vec![0xff],
        };
        let bytes = frame.try_to_vec().unwrap();
        assert_eq!(bytes, vec![0x20, 0x01, 0xff]);
        assert_eq!(CommandClassFrame::try_from_slice(&bytes).unwrap(), frame);
    }

    #[test]
    fn test_no_operation_has_no_command_byte() {
        let frame = CommandClassFrame {
            cc_id: CommandClasses::NoOperation,
            cc_command: None,
            payload: vec![],
        };
        let bytes = frame.try_to_vec().unwrap();
        assert_eq!(bytes, vec![0x00]);
    }
}
