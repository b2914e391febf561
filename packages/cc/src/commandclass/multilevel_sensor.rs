use crate::commandclass::CommandClass;
use crate::frame::CommandClassFrame;
use derive_try_from_primitive::TryFromPrimitive;
use nom::{
    bytes::complete::take,
    number::complete::be_u8,
};
use zwave_core::encoding::{EncodingError, Input, Parsable, ParseResult, Serializable};
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::CommandClasses;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum MultilevelSensorCCCommand {
    Get = 0x04,
    Report = 0x05,
    SupportedGetSensor = 0x01,
    SupportedGetScale = 0x06,
}

/// Requests a reading. `sensor_type` is `None` for v1 devices, which only
/// ever have one sensor and report it unconditionally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultilevelSensorCCGet {
    pub sensor_type: Option<u8>,
}

impl Parsable for MultilevelSensorCCGet {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, sensor_type) = nom::combinator::opt(be_u8)(i)?;
        Ok((i, Self { sensor_type }))
    }
}

impl Serializable for MultilevelSensorCCGet {
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a {
        use cookie_factory::bytes::be_u8;
        move |out| match self.sensor_type {
            Some(sensor_type) => be_u8(sensor_type)(out),
            None => Ok(out),
        }
    }
}

impl CommandClass for MultilevelSensorCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::MultilevelSensor
    }

    fn cc_command(&self) -> Option<u8> {
        Some(MultilevelSensorCCCommand::Get as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        match self.sensor_type {
            Some(sensor_type) => LogPayloadDict::new()
                .with_entry("sensor type", sensor_type)
                .into(),
            None => LogPayload::empty(),
        }
    }
}

impl From<&MultilevelSensorCCGet> for CommandClassFrame {
    fn from(cmd: &MultilevelSensorCCGet) -> Self {
        CommandClassFrame {
            cc_id: cmd.cc_id(),
            cc_command: cmd.cc_command(),
            payload: cmd
                .try_to_vec()
                .expect("MultilevelSensorCCGet always serializes"),
        }
    }
}

/// A single reading: which sensor, how many fractional digits it carries,
/// the measurement scale and the raw value. `value` is the integer wire
/// value, already shifted by `precision` decimal digits by the caller if
/// needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultilevelSensorCCReport {
    pub sensor_type: u8,
    pub scale: u8,
    pub precision: u8,
    pub value: f32,
}

impl Parsable for MultilevelSensorCCReport {
    fn parse(i: Input) -> ParseResult<Self> {
        let (i, sensor_type) = be_u8(i)?;
        let (i, level) = be_u8(i)?;
        let precision = (level & 0b1110_0000) >> 5;
        let scale = (level & 0b0001_1000) >> 3;
        let size = (level & 0b0000_0111) as usize;
        let (i, raw) = take(size)(i)?;

        let mut value: i32 = match raw.first() {
            Some(b) if b & 0x80 != 0 => -1,
            _ => 0,
        };
        for &byte in raw {
            value = (value << 8) | byte as i32;
        }
        let value = value as f32 / 10f32.powi(precision as i32);

        Ok((
            i,
            Self {
                sensor_type,
                scale,
                precision,
                value,
            },
        ))
    }
}

impl TryFrom<&CommandClassFrame> for MultilevelSensorCCReport {
    type Error = EncodingError;

    fn try_from(frame: &CommandClassFrame) -> Result<Self, Self::Error> {
        Self::try_from_slice(&frame.payload)
    }
}

impl CommandClass for MultilevelSensorCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::MultilevelSensor
    }

    fn cc_command(&self) -> Option<u8> {
        Some(MultilevelSensorCCCommand::Report as u8)
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayloadDict::new()
            .with_entry("sensor type", self.sensor_type)
            .with_entry("scale", self.scale)
            .with_entry("value", self.value.to_string())
            .into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_positive_reading() {
        // sensor type 1 (temperature), precision 1, scale 0, size 2, value 215 -> 21.5
        let input = [0x01, 0x22, 0x00, 0xd7];
        let report = MultilevelSensorCCReport::try_from_slice(&input).unwrap();
        assert_eq!(report.sensor_type, 0x01);
        assert_eq!(report.scale, 0);
        assert_eq!(report.precision, 1);
        assert!((report.value - 21.5).abs() < f32::EPSILON);
    }
}
