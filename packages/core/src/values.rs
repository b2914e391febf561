use crate::definitions::ValueType;
use typed_builder::TypedBuilder;

/// A single selectable entry of a `List` value, as exposed by command
/// classes like `Configuration` and `Thermostat Mode`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueListItem {
    pub value: i32,
    pub label: String,
}

/// The decoded payload of a value. The variant always matches the
/// [`ValueType`] declared in the owning [`crate::value_id::ValueId`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValueVariant {
    Bool(bool),
    Byte(u8),
    Short(i16),
    Int(i32),
    Decimal(f32),
    String(String),
    List(Vec<ValueListItem>, i32),
    /// Minimal representation of a Schedule CC entry; the wire format is
    /// reproduced verbatim rather than decoded field-by-field.
    Schedule(Vec<u8>),
    /// A momentary value with no persisted state (e.g. a scene-activation
    /// button).
    Button,
    Raw(Vec<u8>),
}

impl ValueVariant {
    pub fn value_type(&self) -> ValueType {
        match self {
            ValueVariant::Bool(_) => ValueType::Bool,
            ValueVariant::Byte(_) => ValueType::Byte,
            ValueVariant::Short(_) => ValueType::Short,
            ValueVariant::Int(_) => ValueType::Int,
            ValueVariant::Decimal(_) => ValueType::Decimal,
            ValueVariant::String(_) => ValueType::String,
            ValueVariant::List(..) => ValueType::List,
            ValueVariant::Schedule(_) => ValueType::Schedule,
            ValueVariant::Button => ValueType::Button,
            ValueVariant::Raw(_) => ValueType::Raw,
        }
    }
}

/// The user/GUI-facing description of a value: everything about it that
/// doesn't change as its reading changes.
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct ValueMetadata {
    #[builder(default, setter(into, strip_option))]
    pub label: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub units: Option<String>,
    #[builder(default, setter(into, strip_option))]
    pub help: Option<String>,
    #[builder(default)]
    pub read_only: bool,
    #[builder(default)]
    pub write_only: bool,
    #[builder(default)]
    pub polling_intensity: u8,
}

/// A value's full runtime record in the value registry (spec §4.6): its
/// static description, the last confirmed reading, and the state of any
/// in-flight `Set`.
#[derive(Debug, Clone)]
pub struct Value {
    pub metadata: ValueMetadata,
    pub current_value: Option<ValueVariant>,
    pub pending_value: Option<ValueVariant>,
    pub is_set: bool,
    pub checking_change: bool,
}

impl Value {
    pub fn new(metadata: ValueMetadata) -> Self {
        Self {
            metadata,
            current_value: None,
            pending_value: None,
            is_set: false,
            checking_change: false,
        }
    }

    /// Stages a requested value and enters the change-confirmation window:
    /// the caller's `Set` has been sent, but nothing is reported as changed
    /// until the device's own report is observed and confirmed.
    pub fn begin_set(&mut self, value: ValueVariant) {
        self.pending_value = Some(value);
        self.checking_change = true;
    }

    /// Applies a value reported by the device, closing out any in-flight
    /// `Set`. Returns whether the report matched the pending value (a
    /// confirmed `Set`) as opposed to an unsolicited external change.
    pub fn apply_report(&mut self, reported: ValueVariant) -> bool {
        let confirmed = self.pending_value.as_ref() == Some(&reported);
        self.current_value = Some(reported);
        self.is_set = true;
        self.checking_change = false;
        self.pending_value = None;
        confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_report_confirms_matching_set() {
        let mut value = Value::new(ValueMetadata::builder().build());
        value.begin_set(ValueVariant::Bool(true));
        assert!(value.checking_change);
        let confirmed = value.apply_report(ValueVariant::Bool(true));
        assert!(confirmed);
        assert!(!value.checking_change);
        assert_eq!(value.current_value, Some(ValueVariant::Bool(true)));
    }

    #[test]
    fn test_apply_report_detects_mismatch() {
        let mut value = Value::new(ValueMetadata::builder().build());
        value.begin_set(ValueVariant::Byte(99));
        let confirmed = value.apply_report(ValueVariant::Byte(0));
        assert!(!confirmed);
        assert_eq!(value.current_value, Some(ValueVariant::Byte(0)));
    }
}
