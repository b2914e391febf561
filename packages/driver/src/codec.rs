//! Command-class payload encoding shared by the main loop (`Set`/explicit
//! `refreshValue`) and the polling task (periodic `Get`), so both issue the
//! exact same bytes for a given value (spec §4.5/§4.7).

use zwave_cc::{
    BasicCCGet, BasicCCSet, BinarySwitchCCGet, BinarySwitchCCSet, CommandClassFrame,
    ConfigurationCCGet, ConfigurationCCSet,
};
use zwave_core::definitions::{CommandClasses, FunctionType};
use zwave_core::encoding::{Parsable, Serializable};
use zwave_core::value_id::ValueId;
use zwave_core::values::ValueVariant;

use crate::error::{Error, Result};
use crate::send_queue::ReplyExpectation;

/// What a command-class `Get` waits for: one more frame off the wire
/// carrying an application command, i.e. the node's report (spec §4.2).
pub fn application_reply() -> ReplyExpectation {
    ReplyExpectation {
        callback_id: None,
        function_type: Some(FunctionType::ApplicationCommand),
    }
}

pub fn encode_set(value_id: &ValueId, value: &ValueVariant) -> Result<Vec<u8>> {
    let frame: CommandClassFrame = match (value_id.command_class, value) {
        (CommandClasses::BinarySwitch, ValueVariant::Bool(b)) => (&BinarySwitchCCSet {
            target_value: *b,
            duration: None,
        })
            .into(),
        (CommandClasses::Basic, ValueVariant::Byte(b)) => (&BasicCCSet { target_value: *b }).into(),
        (CommandClasses::Configuration, ValueVariant::Int(v)) => (&ConfigurationCCSet {
            parameter: value_id.index as u8,
            size: 4,
            value: *v,
            default_value: false,
        })
            .into(),
        _ => {
            return Err(Error::Protocol(format!(
                "{:?} values cannot be set",
                value_id.command_class
            )))
        }
    };
    Ok(frame.try_to_vec()?)
}

pub fn encode_get(value_id: &ValueId) -> Result<Vec<u8>> {
    let frame: CommandClassFrame = match value_id.command_class {
        CommandClasses::BinarySwitch => (&BinarySwitchCCGet {}).into(),
        CommandClasses::Basic => (&BasicCCGet {}).into(),
        CommandClasses::Configuration => (&ConfigurationCCGet {
            parameter: value_id.index as u8,
        })
            .into(),
        other => return Err(Error::Protocol(format!("{other:?} values cannot be refreshed"))),
    };
    Ok(frame.try_to_vec()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zwave_cc::{CommandClass, CC};
    use zwave_core::definitions::{Genre, HomeId, NodeId, ValueType};

    fn vid(cc: CommandClasses, value_type: ValueType) -> ValueId {
        ValueId::new(HomeId::new(1), NodeId::new(5), Genre::User, cc, 0, 0, value_type)
    }

    #[test]
    fn encodes_a_binary_switch_set() {
        let payload = encode_set(&vid(CommandClasses::BinarySwitch, ValueType::Bool), &ValueVariant::Bool(true)).unwrap();
        let frame = CommandClassFrame::try_from_slice(&payload).unwrap();
        let cc = CC::try_from(frame).unwrap();
        assert_eq!(
            cc,
            CC::BinarySwitchSet(zwave_cc::BinarySwitchCCSet {
                target_value: true,
                duration: None,
            })
        );
    }

    #[test]
    fn encodes_a_basic_get() {
        let payload = encode_get(&vid(CommandClasses::Basic, ValueType::Byte)).unwrap();
        let frame = CommandClassFrame::try_from_slice(&payload).unwrap();
        let cc = CC::try_from(frame).unwrap();
        assert_eq!(cc, CC::BasicGet(zwave_cc::BasicCCGet {}));
    }

    #[test]
    fn rejects_an_unsupported_command_class() {
        let value_id = vid(CommandClasses::MultilevelSensor, ValueType::Decimal);
        assert!(encode_set(&value_id, &ValueVariant::Decimal(1.0)).is_err());
        assert!(encode_get(&value_id).is_err());
    }
}
