use zwave_core::definitions::{DeviceClass, NodeId};
use zwave_core::value_id::ValueId;
use zwave_core::values::ValueVariant;

/// The sixteen notification kinds a client can observe through a watcher
/// (spec §6). Emitted only from the notification-dispatcher thread, never
/// directly from the transmit engine or the interview pipeline, so watcher
/// callbacks never race the state they read back from the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    NodeAdded {
        node_id: NodeId,
    },
    NodeRemoved {
        node_id: NodeId,
    },
    NodeProtocolInfo {
        node_id: NodeId,
        device_class: DeviceClass,
    },
    NodeReady {
        node_id: NodeId,
    },
    ValueAdded {
        value_id: ValueId,
    },
    ValueChanged {
        value_id: ValueId,
        old_value: Option<ValueVariant>,
        new_value: ValueVariant,
    },
    ValueRemoved {
        value_id: ValueId,
    },
    Group {
        node_id: NodeId,
        group_id: u8,
    },
    PollingEnabled {
        value_id: ValueId,
    },
    DriverReady,
    DriverReset,
    DriverFailed {
        reason: String,
    },
    AwakeNodesQueried,
    AllNodesQueried,
    NodeQueriesComplete {
        node_id: NodeId,
    },
    SendFailed {
        node_id: NodeId,
        reason: String,
    },
    DnsResult {
        node_id: NodeId,
        hostname: Option<String>,
    },
}
