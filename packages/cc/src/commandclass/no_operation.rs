use crate::commandclass::CommandClass;
use zwave_core::log::LogPayload;
use zwave_core::prelude::CommandClasses;

/// Carries no payload and expects no response; used by the driver to probe
/// whether a node is reachable at all before running the rest of discovery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOperationCC {}

impl CommandClass for NoOperationCC {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::NoOperation
    }

    fn cc_command(&self) -> Option<u8> {
        None
    }

    fn to_log_payload(&self) -> LogPayload {
        LogPayload::empty()
    }
}
