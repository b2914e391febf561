use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;

use zwave_core::value_id::ValueId;

use crate::codec::{application_reply, encode_get};
use crate::node::NodeTable;
use crate::send_queue::{Msg, Priority, SendQueues};
use crate::value_registry::ValueRegistry;

/// Round-robins through every value with a nonzero polling intensity,
/// issuing one `Poll`-priority "get" per tick (spec §4.7). Paused while any
/// node is still short of `Complete`, so it never competes with discovery
/// for the wire.
pub struct PollingTask {
    values: Arc<ValueRegistry>,
    nodes: Arc<NodeTable>,
    queues: Arc<Mutex<SendQueues>>,
    interval: Duration,
    cursor: usize,
}

impl PollingTask {
    pub fn new(
        values: Arc<ValueRegistry>,
        nodes: Arc<NodeTable>,
        queues: Arc<Mutex<SendQueues>>,
        interval: Duration,
    ) -> Self {
        Self {
            values,
            nodes,
            queues,
            interval,
            cursor: 0,
        }
    }

    /// Advances the cursor by one tick, enqueueing at most one poll. Split
    /// out from [`Self::run`] so tests can drive it without a clock.
    pub fn tick(&mut self) -> Option<ValueId> {
        if !self.nodes.all_queries_complete() {
            return None;
        }
        let pollable = self.values.pollable_values();
        if pollable.is_empty() {
            return None;
        }
        if self.cursor >= pollable.len() {
            self.cursor = 0;
        }
        let value_id = pollable[self.cursor];
        self.cursor = (self.cursor + 1) % pollable.len();

        let Ok(payload) = encode_get(&value_id) else {
            return None;
        };
        let msg = Msg {
            payload,
            expected_reply: application_reply(),
            ..Msg::new(Some(value_id.node_id), Priority::Poll)
        };
        self.queues.lock().unwrap().push(msg);
        Some(value_id)
    }

    pub async fn run(mut self, shutdown: Arc<Notify>) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                }
                _ = shutdown.notified() => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zwave_core::definitions::{
        CommandClasses, DeviceClass, Genre, HomeId, NodeCapabilities, NodeId, QueryStage, ValueType,
    };
    use zwave_core::values::ValueMetadata;

    fn make(node_id: u8, index: u32) -> ValueId {
        ValueId::new(
            HomeId::new(1),
            NodeId::new(node_id),
            Genre::User,
            CommandClasses::BinarySwitch,
            0,
            index,
            ValueType::Bool,
        )
    }

    fn complete_node(id: u8) -> crate::node::NodeState {
        let mut node = crate::node::NodeState::new(
            NodeId::new(id),
            NodeCapabilities::default(),
            DeviceClass::default(),
        );
        node.query_stage = QueryStage::Complete;
        node
    }

    #[test]
    fn paused_while_discovery_incomplete() {
        let values = Arc::new(ValueRegistry::new(HomeId::new(1)));
        let nodes = Arc::new(NodeTable::new());
        let queues = Arc::new(Mutex::new(SendQueues::new()));
        nodes.insert(crate::node::NodeState::new(
            NodeId::new(2),
            NodeCapabilities::default(),
            DeviceClass::default(),
        ));
        values.ensure(
            make(2, 0),
            ValueMetadata::builder().polling_intensity(1).build(),
        );

        let mut task = PollingTask::new(values, nodes, queues, Duration::from_secs(1));
        assert_eq!(task.tick(), None);
    }

    #[test]
    fn round_robins_fairly_across_values() {
        let values = Arc::new(ValueRegistry::new(HomeId::new(1)));
        let nodes = Arc::new(NodeTable::new());
        let queues = Arc::new(Mutex::new(SendQueues::new()));
        nodes.insert(complete_node(5));
        nodes.insert(complete_node(7));
        values.ensure(
            make(5, 0),
            ValueMetadata::builder().polling_intensity(1).build(),
        );
        values.ensure(
            make(7, 0),
            ValueMetadata::builder().polling_intensity(1).build(),
        );

        let mut task = PollingTask::new(values, nodes, queues, Duration::from_secs(1));
        let mut counts = std::collections::HashMap::new();
        for _ in 0..20 {
            if let Some(id) = task.tick() {
                *counts.entry(id.node_id).or_insert(0) += 1;
            }
        }
        let a = counts[&NodeId::new(5)];
        let b = counts[&NodeId::new(7)];
        assert!((a - b).abs() <= 1);
    }
}
