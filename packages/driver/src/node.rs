use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use zwave_core::definitions::{CommandClasses, DeviceClass, NodeCapabilities, NodeId, QueryStage};

/// Per-command-class bookkeeping the interview pipeline fills in during
/// stages `Versions`/`Instances` (spec §4.4).
#[derive(Debug, Clone, Default)]
pub struct NodeCommandClassInfo {
    pub version: u8,
    pub instance_count: u8,
}

/// A single node's state (spec §3 `Node`). Reachable only through
/// [`NodeTable`]; callers never hold a `&mut NodeState` across an `.await`
/// point, since the table's lock is a plain `std::sync::RwLock`.
#[derive(Debug, Clone)]
pub struct NodeState {
    pub id: NodeId,
    pub capabilities: NodeCapabilities,
    pub device_class: DeviceClass,
    pub query_stage: QueryStage,
    pub stage_attempts: u8,
    pub command_classes: HashMap<CommandClasses, NodeCommandClassInfo>,
    pub neighbors: Vec<NodeId>,
    pub awake: bool,
    pub wake_up_interval: Option<u32>,
    pub last_nonce_seen: Option<u32>,
    pub last_rx_timestamp: Option<std::time::Instant>,
}

impl NodeState {
    pub fn new(id: NodeId, capabilities: NodeCapabilities, device_class: DeviceClass) -> Self {
        Self {
            id,
            capabilities,
            device_class,
            query_stage: QueryStage::ProtocolInfo,
            stage_attempts: 0,
            command_classes: HashMap::new(),
            neighbors: Vec::new(),
            // Listening nodes are always reachable; sleeping nodes start
            // out presumed awake until the first send proves otherwise.
            awake: capabilities.listening || capabilities.is_frequent_listening,
            wake_up_interval: None,
            last_nonce_seen: None,
            last_rx_timestamp: None,
        }
    }

    pub fn can_sleep(&self) -> bool {
        !self.capabilities.listening && !self.capabilities.is_frequent_listening
    }

    /// Advances to the next query stage, resetting the per-stage retry
    /// counter. A node's `query_stage` only moves forward (spec §3
    /// invariant), except for an explicit `reset_interview`.
    pub fn advance_stage(&mut self) {
        if let Some(next) = self.query_stage.next() {
            self.query_stage = next;
            self.stage_attempts = 0;
        }
    }

    pub fn reset_interview(&mut self) {
        self.query_stage = QueryStage::ProtocolInfo;
        self.stage_attempts = 0;
    }

    pub fn supports_cc(&self, cc: CommandClasses) -> bool {
        self.command_classes.contains_key(&cc)
    }
}

/// The set of known nodes, keyed by id (spec §3). A plain `RwLock` around a
/// `BTreeMap` is enough: reads (most traffic) never block each other, and
/// node add/remove is rare compared to per-value traffic, which lives in
/// [`crate::value_registry::ValueRegistry`] instead.
#[derive(Default)]
pub struct NodeTable {
    nodes: RwLock<BTreeMap<NodeId, NodeState>>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, node: NodeState) {
        self.nodes.write().unwrap().insert(node.id, node);
    }

    pub fn remove(&self, node_id: NodeId) -> Option<NodeState> {
        self.nodes.write().unwrap().remove(&node_id)
    }

    pub fn contains(&self, node_id: NodeId) -> bool {
        self.nodes.read().unwrap().contains_key(&node_id)
    }

    pub fn get_clone(&self, node_id: NodeId) -> Option<NodeState> {
        self.nodes.read().unwrap().get(&node_id).cloned()
    }

    pub fn all_ids(&self) -> Vec<NodeId> {
        self.nodes.read().unwrap().keys().copied().collect()
    }

    pub fn with_mut<R>(&self, node_id: NodeId, f: impl FnOnce(&mut NodeState) -> R) -> Option<R> {
        self.nodes.write().unwrap().get_mut(&node_id).map(f)
    }

    pub fn is_awake(&self, node_id: NodeId) -> bool {
        self.nodes
            .read()
            .unwrap()
            .get(&node_id)
            .map(|n| n.awake)
            .unwrap_or(true)
    }

    pub fn set_awake(&self, node_id: NodeId, awake: bool) {
        if let Some(node) = self.nodes.write().unwrap().get_mut(&node_id) {
            node.awake = awake;
        }
    }

    pub fn all_queries_complete(&self) -> bool {
        self.nodes
            .read()
            .unwrap()
            .values()
            .all(|n| n.query_stage.is_complete())
    }

    pub fn awake_queries_complete(&self) -> bool {
        self.nodes
            .read()
            .unwrap()
            .values()
            .all(|n| n.can_sleep() || n.query_stage.is_complete())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u8, listening: bool) -> NodeState {
        NodeState::new(
            NodeId::new(id),
            NodeCapabilities {
                listening,
                ..Default::default()
            },
            DeviceClass::default(),
        )
    }

    #[test]
    fn sleeping_node_starts_not_awake() {
        let n = node(2, false);
        assert!(!n.awake);
        assert!(n.can_sleep());
    }

    #[test]
    fn stage_advances_monotonically_and_resets_attempts() {
        let mut n = node(2, true);
        n.stage_attempts = 2;
        n.advance_stage();
        assert_eq!(n.query_stage, QueryStage::WakeUp);
        assert_eq!(n.stage_attempts, 0);
    }

    #[test]
    fn table_tracks_completion_across_nodes() {
        let table = NodeTable::new();
        table.insert(node(2, true));
        table.insert(node(3, true));
        assert!(!table.all_queries_complete());
        table.with_mut(NodeId::new(2), |n| n.query_stage = QueryStage::Complete);
        table.with_mut(NodeId::new(3), |n| n.query_stage = QueryStage::Complete);
        assert!(table.all_queries_complete());
    }
}
