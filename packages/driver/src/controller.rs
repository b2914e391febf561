use std::sync::RwLock;

use zwave_core::definitions::{HomeId, NodeId};

/// The controller stick's own identity, learned once at startup from
/// `GetControllerId` (spec §4.4's `ProtocolInfo`-adjacent bootstrap) and
/// otherwise read-only for the life of the driver.
#[derive(Debug, Clone, Copy)]
pub struct ControllerInfo {
    pub home_id: HomeId,
    pub own_node_id: NodeId,
    pub suc_node_id: Option<NodeId>,
}

/// Mutable controller-wide state the main loop updates as replies to its
/// bootstrap commands arrive. Wrapped in a single `RwLock` since it changes
/// only during startup.
#[derive(Default)]
pub struct Controller {
    info: RwLock<Option<ControllerInfo>>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_info(&self, info: ControllerInfo) {
        *self.info.write().unwrap() = Some(info);
    }

    pub fn info(&self) -> Option<ControllerInfo> {
        *self.info.read().unwrap()
    }

    pub fn home_id(&self) -> Option<HomeId> {
        self.info().map(|i| i.home_id)
    }

    pub fn own_node_id(&self) -> Option<NodeId> {
        self.info().map(|i| i.own_node_id)
    }
}
