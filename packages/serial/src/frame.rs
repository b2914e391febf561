use derive_try_from_primitive::TryFromPrimitive;
use nom::{
    branch::alt,
    bytes::streaming::{tag, take, take_till1},
    combinator::{map, peek, value},
    error::context,
    number::streaming::be_u8,
    sequence::tuple,
};
use zwave_core::encoding::{EncodingError, Input, ParseResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum SerialControlByte {
    SOF = 0x01,
    ACK = 0x06,
    NAK = 0x15,
    CAN = 0x18,
}

pub const ACK_BUFFER: [u8; 1] = [SerialControlByte::ACK as u8];
pub const NAK_BUFFER: [u8; 1] = [SerialControlByte::NAK as u8];
pub const CAN_BUFFER: [u8; 1] = [SerialControlByte::CAN as u8];

/// One of the three single-byte flow-control symbols, exchanged outside of
/// the SOF-framed request/response protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ControlFlow {
    Ack = 0x06,
    Nak = 0x15,
    Can = 0x18,
}

impl std::fmt::Display for ControlFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ControlFlow::Ack => "ACK",
            ControlFlow::Nak => "NAK",
            ControlFlow::Can => "CAN",
        };
        write!(f, "{}", s)
    }
}

/// A frame as it crosses the wire, before the payload of a data frame has
/// been decoded into a [`crate::command::CommandFrame`].
#[derive(Clone, Debug, PartialEq)]
pub enum RawSerialFrame {
    ControlFlow(ControlFlow),
    Data(SerialData),
    Garbage(Vec<u8>),
}

fn consume_garbage(i: Input) -> ParseResult<RawSerialFrame> {
    map(
        take_till1(|b| SerialControlByte::try_from(b).is_ok()),
        |g: &[u8]| RawSerialFrame::Garbage(g.to_vec()),
    )(i)
}

fn parse_control(i: Input) -> ParseResult<RawSerialFrame> {
    alt((
        value(RawSerialFrame::ControlFlow(ControlFlow::Ack), tag(&ACK_BUFFER)),
        value(RawSerialFrame::ControlFlow(ControlFlow::Nak), tag(&NAK_BUFFER)),
        value(RawSerialFrame::ControlFlow(ControlFlow::Can), tag(&CAN_BUFFER)),
    ))(i)
}

fn parse_data(i: Input) -> ParseResult<RawSerialFrame> {
    // Ensure that the buffer contains at least 5 bytes
    peek(take(5usize))(i)?;

    // Ensure that it starts with a SOF byte and extract the length of the rest of the command
    let (_, (_, len)) = peek(tuple((tag([SerialControlByte::SOF as u8]), be_u8)))(i)?;

    // Take the whole command
    let (i, data) = take(len + 2)(i)?;

    Ok((i, RawSerialFrame::Data(SerialData::new(data.to_vec()))))
}

impl RawSerialFrame {
    pub fn parse(i: Input) -> ParseResult<Self> {
        // A serial frame is either a control byte, data starting with SOF, or skipped garbage
        context(
            "Serial Frame",
            alt((consume_garbage, parse_control, parse_data)),
        )(i)
    }

    /// Parses a frame out of a mutable buffer, removing the consumed bytes.
    /// Used by the [`tokio_util::codec::Decoder`] implementation.
    pub fn parse_mut(buf: &mut bytes::BytesMut) -> Result<Option<Self>, EncodingError> {
        match Self::parse(buf) {
            Ok((rest, frame)) => {
                let consumed = buf.len() - rest.len();
                let _ = buf.split_to(consumed);
                Ok(Some(frame))
            }
            Err(nom::Err::Incomplete(_)) => Ok(None),
            Err(e) => Err(EncodingError::Parse(format!("{:?}", e))),
        }
    }

    pub fn serialize(&self, dst: &mut bytes::BytesMut) {
        match self {
            RawSerialFrame::ControlFlow(ControlFlow::Ack) => dst.extend_from_slice(&ACK_BUFFER),
            RawSerialFrame::ControlFlow(ControlFlow::Nak) => dst.extend_from_slice(&NAK_BUFFER),
            RawSerialFrame::ControlFlow(ControlFlow::Can) => dst.extend_from_slice(&CAN_BUFFER),
            RawSerialFrame::Data(data) => dst.extend_from_slice(data.as_ref()),
            RawSerialFrame::Garbage(data) => dst.extend_from_slice(data),
        }
    }
}

impl AsRef<[u8]> for RawSerialFrame {
    fn as_ref(&self) -> &[u8] {
        match self {
            RawSerialFrame::ControlFlow(ControlFlow::Ack) => &ACK_BUFFER,
            RawSerialFrame::ControlFlow(ControlFlow::Nak) => &NAK_BUFFER,
            RawSerialFrame::ControlFlow(ControlFlow::Can) => &CAN_BUFFER,
            RawSerialFrame::Data(cmd) => cmd.as_ref(),
            RawSerialFrame::Garbage(data) => data,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SerialData {
    data: Vec<u8>,
}

impl SerialData {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn payload(&self) -> &[u8] {
        &self.data[2..self.data.len() - 1]
    }

    pub fn checksum(&self) -> u8 {
        *self.data.last().unwrap()
    }
}

impl AsRef<[u8]> for SerialData {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_garbage() {
        let data = hex::decode("07080901").unwrap();
        let expected = hex::decode("070809").unwrap();
        let remaining = hex::decode("01").unwrap();
        assert_eq!(
            consume_garbage(&data),
            Ok((remaining.as_slice(), RawSerialFrame::Garbage(expected)))
        );
    }

    #[test]
    fn test_control() {
        let data = hex::decode("0606151801").unwrap();
        let remaining = hex::decode("01").unwrap();
        assert_eq!(
            nom::multi::many0(parse_control)(&data),
            Ok((
                remaining.as_slice(),
                vec![
                    RawSerialFrame::ControlFlow(ControlFlow::Ack),
                    RawSerialFrame::ControlFlow(ControlFlow::Ack),
                    RawSerialFrame::ControlFlow(ControlFlow::Nak),
                    RawSerialFrame::ControlFlow(ControlFlow::Can),
                ]
            )),
        );
    }

    #[test]
    fn test_data() {
        let data = hex::decode("01030008f406").unwrap();
        let expected = hex::decode("01030008f4").unwrap();
        let remaining = hex::decode("06").unwrap();
        assert_eq!(
            parse_data(&data),
            Ok((
                remaining.as_slice(),
                RawSerialFrame::Data(SerialData { data: expected }),
            ))
        );
    }

    #[test]
    fn test_many() {
        let data = hex::decode("01030008f406180000000801").unwrap();
        let expected = hex::decode("01030008f4").unwrap();
        let garbage = hex::decode("00000008").unwrap();

        let mut results: Vec<RawSerialFrame> = Vec::new();
        let mut input = data.as_slice();
        while let Ok((remaining, frame)) = RawSerialFrame::parse(input) {
            results.push(frame);
            input = remaining;
        }
        assert_eq!(input, vec![0x01]);
        assert_eq!(
            results,
            vec![
                RawSerialFrame::Data(SerialData { data: expected }),
                RawSerialFrame::ControlFlow(ControlFlow::Ack),
                RawSerialFrame::ControlFlow(ControlFlow::Can),
                RawSerialFrame::Garbage(garbage),
            ]
        );
    }

    #[test]
    fn test_parse_mut_consumes_buffer() {
        let mut buf = bytes::BytesMut::from(hex::decode("0601030008f4").unwrap().as_slice());
        let frame = RawSerialFrame::parse_mut(&mut buf).unwrap().unwrap();
        assert_eq!(frame, RawSerialFrame::ControlFlow(ControlFlow::Ack));
        assert_eq!(buf.as_ref(), hex::decode("01030008f4").unwrap().as_slice());
    }
}
