//! A flat table of command-class commands, one variant per decoded command,
//! keyed by command class id and command id. Unlike the upstream Z-Wave
//! specification's per-CC inheritance hierarchies, every command here is a
//! plain struct that implements [`CommandClass`] directly; there is no
//! shared base behavior to override beyond what the trait itself declares.

pub mod association;
pub mod basic;
pub mod binary_switch;
pub mod configuration;
pub mod manufacturer_specific;
pub mod multilevel_sensor;
pub mod no_operation;
pub mod version;
pub mod wake_up;

pub use association::*;
pub use basic::*;
pub use binary_switch::*;
pub use configuration::*;
pub use manufacturer_specific::*;
pub use multilevel_sensor::*;
pub use no_operation::*;
pub use version::*;
pub use wake_up::*;

use crate::frame::CommandClassFrame;
use zwave_core::encoding::EncodingError;
use zwave_core::log::{LogPayload, LogPayloadDict};
use zwave_core::prelude::CommandClasses;

/// Behavior shared by every decoded command-class command, independent of
/// its concrete payload.
pub trait CommandClass: std::fmt::Debug {
    fn cc_id(&self) -> CommandClasses;
    fn cc_command(&self) -> Option<u8>;
    fn to_log_payload(&self) -> LogPayload;
}

/// A command this crate has no decoder for. Carries the raw payload through
/// unchanged so it can still be logged, forwarded or re-serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unknown {
    pub cc_id: CommandClasses,
    pub cc_command: Option<u8>,
    pub payload: Vec<u8>,
}

impl CommandClass for Unknown {
    fn cc_id(&self) -> CommandClasses {
        self.cc_id
    }

    fn cc_command(&self) -> Option<u8> {
        self.cc_command
    }

    fn to_log_payload(&self) -> LogPayload {
        let mut ret = LogPayloadDict::new().with_entry("CC", self.cc_id.to_string());
        if let Some(cc_command) = self.cc_command {
            ret = ret.with_entry("command", format!("0x{:02x}", cc_command));
        }
        ret.with_entry("payload", format!("0x{}", hex::encode(&self.payload)))
            .into()
    }
}

/// Every command class command this crate knows how to decode, plus
/// [`Unknown`] for everything else. Decoding dispatches on `(cc_id,
/// cc_command)`; there's deliberately no enum-per-CC nesting.
#[derive(Debug, Clone, PartialEq)]
pub enum CC {
    NoOperation(NoOperationCC),
    BasicSet(BasicCCSet),
    BasicGet(BasicCCGet),
    BasicReport(BasicCCReport),
    BinarySwitchSet(BinarySwitchCCSet),
    BinarySwitchGet(BinarySwitchCCGet),
    BinarySwitchReport(BinarySwitchCCReport),
    MultilevelSensorGet(MultilevelSensorCCGet),
    MultilevelSensorReport(MultilevelSensorCCReport),
    ConfigurationSet(ConfigurationCCSet),
    ConfigurationGet(ConfigurationCCGet),
    ConfigurationReport(ConfigurationCCReport),
    ManufacturerSpecificGet(ManufacturerSpecificCCGet),
    ManufacturerSpecificReport(ManufacturerSpecificCCReport),
    AssociationSet(AssociationCCSet),
    AssociationGet(AssociationCCGet),
    AssociationReport(AssociationCCReport),
    AssociationRemove(AssociationCCRemove),
    VersionGet(VersionCCGet),
    VersionReport(VersionCCReport),
    VersionCommandClassGet(VersionCCCommandClassGet),
    VersionCommandClassReport(VersionCCCommandClassReport),
    WakeUpIntervalSet(WakeUpCCIntervalSet),
    WakeUpIntervalGet(WakeUpCCIntervalGet),
    WakeUpIntervalReport(WakeUpCCIntervalReport),
    WakeUpNotification(WakeUpCCNotification),
    WakeUpNoMoreInformation(WakeUpCCNoMoreInformation),
    Unknown(Unknown),
}

macro_rules! delegate {
    ($self:expr, $method:ident $(, $arg:expr)*) => {
        match $self {
            CC::NoOperation(c) => c.$method($($arg),*),
            CC::BasicSet(c) => c.$method($($arg),*),
            CC::BasicGet(c) => c.$method($($arg),*),
            CC::BasicReport(c) => c.$method($($arg),*),
            CC::BinarySwitchSet(c) => c.$method($($arg),*),
            CC::BinarySwitchGet(c) => c.$method($($arg),*),
            CC::BinarySwitchReport(c) => c.$method($($arg),*),
            CC::MultilevelSensorGet(c) => c.$method($($arg),*),
            CC::MultilevelSensorReport(c) => c.$method($($arg),*),
            CC::ConfigurationSet(c) => c.$method($($arg),*),
            CC::ConfigurationGet(c) => c.$method($($arg),*),
            CC::ConfigurationReport(c) => c.$method($($arg),*),
            CC::ManufacturerSpecificGet(c) => c.$method($($arg),*),
            CC::ManufacturerSpecificReport(c) => c.$method($($arg),*),
            CC::AssociationSet(c) => c.$method($($arg),*),
            CC::AssociationGet(c) => c.$method($($arg),*),
            CC::AssociationReport(c) => c.$method($($arg),*),
            CC::AssociationRemove(c) => c.$method($($arg),*),
            CC::VersionGet(c) => c.$method($($arg),*),
            CC::VersionReport(c) => c.$method($($arg),*),
            CC::VersionCommandClassGet(c) => c.$method($($arg),*),
            CC::VersionCommandClassReport(c) => c.$method($($arg),*),
            CC::WakeUpIntervalSet(c) => c.$method($($arg),*),
            CC::WakeUpIntervalGet(c) => c.$method($($arg),*),
            CC::WakeUpIntervalReport(c) => c.$method($($arg),*),
            CC::WakeUpNotification(c) => c.$method($($arg),*),
            CC::WakeUpNoMoreInformation(c) => c.$method($($arg),*),
            CC::Unknown(c) => c.$method($($arg),*),
        }
    };
}

impl CommandClass for CC {
    fn cc_id(&self) -> CommandClasses {
        delegate!(self, cc_id)
    }

    fn cc_command(&self) -> Option<u8> {
        delegate!(self, cc_command)
    }

    fn to_log_payload(&self) -> LogPayload {
        delegate!(self, to_log_payload)
    }
}

impl TryFrom<CommandClassFrame> for CC {
    type Error = EncodingError;

    fn try_from(frame: CommandClassFrame) -> Result<Self, Self::Error> {
        use CommandClasses::*;

        Ok(match (frame.cc_id, frame.cc_command) {
            (NoOperation, _) => CC::NoOperation(NoOperationCC {}),

            (Basic, Some(c)) if c == BasicCCCommand::Set as u8 => {
                CC::BasicSet(BasicCCSet::try_from_slice(&frame.payload)?)
            }
            (Basic, Some(c)) if c == BasicCCCommand::Get as u8 => CC::BasicGet(BasicCCGet {}),
            (Basic, Some(c)) if c == BasicCCCommand::Report as u8 => {
                CC::BasicReport(BasicCCReport::try_from_slice(&frame.payload)?)
            }

            (BinarySwitch, Some(c)) if c == BinarySwitchCCCommand::Set as u8 => {
                CC::BinarySwitchSet(BinarySwitchCCSet::try_from_slice(&frame.payload)?)
            }
            (BinarySwitch, Some(c)) if c == BinarySwitchCCCommand::Get as u8 => {
                CC::BinarySwitchGet(BinarySwitchCCGet {})
            }
            (BinarySwitch, Some(c)) if c == BinarySwitchCCCommand::Report as u8 => {
                CC::BinarySwitchReport(BinarySwitchCCReport::try_from_slice(&frame.payload)?)
            }

            (MultilevelSensor, Some(c)) if c == MultilevelSensorCCCommand::Get as u8 => {
                CC::MultilevelSensorGet(MultilevelSensorCCGet::try_from_slice(&frame.payload)?)
            }
            (MultilevelSensor, Some(c)) if c == MultilevelSensorCCCommand::Report as u8 => {
                CC::MultilevelSensorReport(MultilevelSensorCCReport::try_from_slice(
                    &frame.payload,
                )?)
            }

            (Configuration, Some(c)) if c == ConfigurationCCCommand::Set as u8 => {
                CC::ConfigurationSet(ConfigurationCCSet::try_from_slice(&frame.payload)?)
            }
            (Configuration, Some(c)) if c == ConfigurationCCCommand::Get as u8 => {
                CC::ConfigurationGet(ConfigurationCCGet::try_from_slice(&frame.payload)?)
            }
            (Configuration, Some(c)) if c == ConfigurationCCCommand::Report as u8 => {
                CC::ConfigurationReport(ConfigurationCCReport::try_from_slice(&frame.payload)?)
            }

            (ManufacturerSpecific, Some(c)) if c == ManufacturerSpecificCCCommand::Get as u8 => {
                CC::ManufacturerSpecificGet(ManufacturerSpecificCCGet {})
            }
            (ManufacturerSpecific, Some(c))
                if c == ManufacturerSpecificCCCommand::Report as u8 =>
            {
                CC::ManufacturerSpecificReport(ManufacturerSpecificCCReport::try_from_slice(
                    &frame.payload,
                )?)
            }

            (Association, Some(c)) if c == AssociationCCCommand::Set as u8 => {
                CC::AssociationSet(AssociationCCSet::try_from_slice(&frame.payload)?)
            }
            (Association, Some(c)) if c == AssociationCCCommand::Get as u8 => {
                CC::AssociationGet(AssociationCCGet::try_from_slice(&frame.payload)?)
            }
            (Association, Some(c)) if c == AssociationCCCommand::Report as u8 => {
                CC::AssociationReport(AssociationCCReport::try_from_slice(&frame.payload)?)
            }
            (Association, Some(c)) if c == AssociationCCCommand::Remove as u8 => {
                CC::AssociationRemove(AssociationCCRemove::try_from_slice(&frame.payload)?)
            }

            (Version, Some(c)) if c == VersionCCCommand::Get as u8 => CC::VersionGet(VersionCCGet {}),
            (Version, Some(c)) if c == VersionCCCommand::Report as u8 => {
                CC::VersionReport(VersionCCReport::try_from_slice(&frame.payload)?)
            }
            (Version, Some(c)) if c == VersionCCCommand::CommandClassGet as u8 => {
                CC::VersionCommandClassGet(VersionCCCommandClassGet::try_from_slice(
                    &frame.payload,
                )?)
            }
            (Version, Some(c)) if c == VersionCCCommand::CommandClassReport as u8 => {
                CC::VersionCommandClassReport(VersionCCCommandClassReport::try_from_slice(
                    &frame.payload,
                )?)
            }

            (WakeUp, Some(c)) if c == WakeUpCCCommand::IntervalSet as u8 => {
                CC::WakeUpIntervalSet(WakeUpCCIntervalSet::try_from_slice(&frame.payload)?)
            }
            (WakeUp, Some(c)) if c == WakeUpCCCommand::IntervalGet as u8 => {
                CC::WakeUpIntervalGet(WakeUpCCIntervalGet {})
            }
            (WakeUp, Some(c)) if c == WakeUpCCCommand::IntervalReport as u8 => {
                CC::WakeUpIntervalReport(WakeUpCCIntervalReport::try_from_slice(&frame.payload)?)
            }
            (WakeUp, Some(c)) if c == WakeUpCCCommand::Notification as u8 => {
                CC::WakeUpNotification(WakeUpCCNotification {})
            }
            (WakeUp, Some(c)) if c == WakeUpCCCommand::NoMoreInformation as u8 => {
                CC::WakeUpNoMoreInformation(WakeUpCCNoMoreInformation {})
            }

            (cc_id, cc_command) => CC::Unknown(Unknown {
                cc_id,
                cc_command,
                payload: frame.payload,
            }),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_try_from_frame_known_command() {
        let frame = CommandClassFrame {
            cc_id: CommandClasses::Basic,
            cc_command: Some(BasicCCCommand::Get as u8),
            payload: Vec::new(),
        };
        let cc = CC::try_from(frame).unwrap();
        assert_eq!(cc, CC::BasicGet(BasicCCGet {}));
    }

    #[test]
    fn test_try_from_frame_unknown_command() {
        let frame = CommandClassFrame {
            cc_id: CommandClasses::Meter,
            cc_command: Some(0x01),
            payload: vec![0xaa],
        };
        let cc = CC::try_from(frame).unwrap();
        assert!(matches!(cc, CC::Unknown(_)));
    }
}
