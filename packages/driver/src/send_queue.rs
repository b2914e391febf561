use std::collections::{HashMap, VecDeque};

use zwave_core::definitions::{NodeId, QueryStage};

/// A unit of outbound work (spec §3 `Msg`). `node_id` of `None` addresses the
/// controller itself.
#[derive(Debug, Clone)]
pub struct Msg {
    pub node_id: Option<NodeId>,
    pub payload: Vec<u8>,
    pub expected_reply: ReplyExpectation,
    pub priority: Priority,
    pub attempt: u8,
    pub max_attempts: u8,
    /// The interview stage this message satisfies, if any. Set on the
    /// request a node's discovery pipeline is currently waiting on, so the
    /// report handler that completes it knows which stage to advance (spec
    /// §4.4).
    pub stage_hint: Option<QueryStage>,
}

impl Msg {
    pub fn new(node_id: Option<NodeId>, priority: Priority) -> Self {
        Self {
            node_id,
            payload: Vec::new(),
            expected_reply: ReplyExpectation::default(),
            priority,
            attempt: 0,
            max_attempts: 3,
            stage_hint: None,
        }
    }
}

/// What the transmit engine watches for once a `Msg`'s ACK has been
/// received, to know it reached `Done` (spec §4.2).
#[derive(Debug, Clone, Default)]
pub struct ReplyExpectation {
    pub callback_id: Option<u8>,
    pub function_type: Option<zwave_core::definitions::FunctionType>,
}

/// Queue selection order, highest first (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    WakeUp,
    Poll,
    NodeQuery,
    Command,
    Immediate,
}

/// Five FIFO queues per node-address slot, selected highest-priority-first,
/// with round-robin tie-break across node slots to prevent one busy node
/// from starving another (spec §4.3). The controller itself (`node_id =
/// None`) is just another slot.
#[derive(Default)]
pub struct SendQueues {
    slots: HashMap<Option<NodeId>, [VecDeque<Msg>; 5]>,
    order: VecDeque<Option<NodeId>>,
}

fn slot_index(priority: Priority) -> usize {
    match priority {
        Priority::Immediate => 0,
        Priority::Command => 1,
        Priority::NodeQuery => 2,
        Priority::Poll => 3,
        Priority::WakeUp => 4,
    }
}

impl SendQueues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, msg: Msg) {
        let key = msg.node_id;
        let slot = self
            .slots
            .entry(key)
            .or_insert_with(|| std::array::from_fn(|_| VecDeque::new()));
        slot[slot_index(msg.priority)].push_back(msg);
        if !self.order.contains(&key) {
            self.order.push_back(key);
        }
    }

    /// Pops the next message to send, honoring per-slot priority order and
    /// round-robining across slots. A slot is skipped if `is_awake` returns
    /// false and the only non-empty queue there is anything but `WakeUp`.
    pub fn pop_next(&mut self, is_awake: impl Fn(Option<NodeId>) -> bool) -> Option<Msg> {
        let slot_count = self.order.len();
        for _ in 0..slot_count {
            let Some(key) = self.order.pop_front() else {
                break;
            };
            self.order.push_back(key);

            let Some(slot) = self.slots.get_mut(&key) else {
                continue;
            };
            let awake = key.is_none() || is_awake(key);
            let priorities = if awake {
                [
                    Priority::Immediate,
                    Priority::Command,
                    Priority::NodeQuery,
                    Priority::Poll,
                    Priority::WakeUp,
                ]
            } else {
                // A sleeping node only drains its WakeUp queue; other
                // priorities stay parked until it wakes.
                [
                    Priority::WakeUp,
                    Priority::WakeUp,
                    Priority::WakeUp,
                    Priority::WakeUp,
                    Priority::WakeUp,
                ]
            };
            for priority in priorities {
                let idx = slot_index(priority);
                if let Some(msg) = slot[idx].pop_front() {
                    return Some(msg);
                }
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.slots
            .values()
            .all(|slot| slot.iter().all(VecDeque::is_empty))
    }

    /// Whether every queue belonging to `node_id` is drained. Used to decide
    /// when a sleeping node can be told to go back to sleep (spec §8
    /// scenario 3).
    pub fn is_empty_for(&self, node_id: NodeId) -> bool {
        self.slots
            .get(&Some(node_id))
            .map(|slot| slot.iter().all(VecDeque::is_empty))
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(node_id: u8, priority: Priority) -> Msg {
        Msg {
            node_id: Some(NodeId::new(node_id)),
            payload: vec![],
            expected_reply: ReplyExpectation::default(),
            priority,
            attempt: 0,
            max_attempts: 3,
            stage_hint: None,
        }
    }

    #[test]
    fn higher_priority_wins_within_a_node() {
        let mut q = SendQueues::new();
        q.push(msg(2, Priority::Poll));
        q.push(msg(2, Priority::Immediate));
        let next = q.pop_next(|_| true).unwrap();
        assert_eq!(next.priority, Priority::Immediate);
    }

    #[test]
    fn round_robins_across_nodes() {
        let mut q = SendQueues::new();
        q.push(msg(2, Priority::Command));
        q.push(msg(3, Priority::Command));
        let first = q.pop_next(|_| true).unwrap();
        assert_eq!(first.node_id, Some(NodeId::new(2)));
        let second = q.pop_next(|_| true).unwrap();
        assert_eq!(second.node_id, Some(NodeId::new(3)));
    }

    #[test]
    fn sleeping_node_only_drains_wakeup_queue() {
        let mut q = SendQueues::new();
        q.push(msg(2, Priority::Command));
        q.push(msg(2, Priority::WakeUp));
        let next = q.pop_next(|_| false).unwrap();
        assert_eq!(next.priority, Priority::WakeUp);
    }
}
