use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use zwave_core::definitions::NodeId;

use crate::notification::Notification;
use crate::value_registry::ValueRegistry;

/// A single outstanding lookup (spec's `DNSLookup`: `{node_id, query_string,
/// result, status}`). `status` is folded into `result` being `None` on
/// failure, since the driver only ever reports success/failure plus the
/// resolved hostname.
#[derive(Debug, Clone)]
pub struct DnsLookup {
    pub node_id: NodeId,
    pub query_string: String,
    pub result: Option<String>,
}

/// Performs the actual lookup. Device-database refresh only needs the
/// device's reverse hostname, not a full TXT record decode, so the default
/// resolver is a thin wrapper over `tokio::net::lookup_host`.
#[async_trait::async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, query: &str) -> Option<String>;
}

pub struct SystemResolver;

#[async_trait::async_trait]
impl DnsResolver for SystemResolver {
    async fn resolve(&self, query: &str) -> Option<String> {
        let target = format!("{query}:0");
        tokio::net::lookup_host(target)
            .await
            .ok()
            .and_then(|mut addrs| addrs.next())
            .map(|addr| addr.ip().to_string())
    }
}

/// Drains a request FIFO one lookup at a time, posting every result back
/// onto the shared notification stream so it interleaves with wire traffic
/// in a single serialised event order (spec §4.9). A lookup that errors
/// still produces a `DnsResult` with `hostname: None` rather than being
/// dropped, so callers never block waiting on one that silently vanished.
pub struct DnsTask {
    queue: Mutex<VecDeque<DnsLookup>>,
    notify: Arc<Notify>,
    resolver: Box<dyn DnsResolver>,
    notifications: Arc<ValueRegistry>,
}

impl DnsTask {
    pub fn new(resolver: Box<dyn DnsResolver>, notifications: Arc<ValueRegistry>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            notify: Arc::new(Notify::new()),
            resolver,
            notifications,
        }
    }

    pub fn enqueue(&self, node_id: NodeId, query_string: String) {
        self.queue.lock().unwrap().push_back(DnsLookup {
            node_id,
            query_string,
            result: None,
        });
        self.notify.notify_one();
    }

    fn pop(&self) -> Option<DnsLookup> {
        self.queue.lock().unwrap().pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }

    /// Resolves the next queued lookup, if any, notifying watchers either
    /// way.
    pub async fn process_one(&self) -> Option<DnsLookup> {
        let lookup = self.pop()?;
        let result = self.resolver.resolve(&lookup.query_string).await;
        self.notifications.notify(Notification::DnsResult {
            node_id: lookup.node_id,
            hostname: result.clone(),
        });
        Some(DnsLookup { result, ..lookup })
    }

    pub async fn run(self: Arc<Self>, shutdown: Arc<Notify>) {
        loop {
            tokio::select! {
                _ = self.notify.notified() => {
                    while self.process_one().await.is_some() {}
                }
                _ = shutdown.notified() => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zwave_core::definitions::HomeId;

    struct StubResolver(Option<String>);

    #[async_trait::async_trait]
    impl DnsResolver for StubResolver {
        async fn resolve(&self, _query: &str) -> Option<String> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn successful_lookup_posts_hostname() {
        let registry = Arc::new(ValueRegistry::new(HomeId::new(1)));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = seen.clone();
        registry.add_watcher(move |n| seen2.lock().unwrap().push(n.clone()));

        let task = DnsTask::new(Box::new(StubResolver(Some("10.0.0.5".into()))), registry);
        task.enqueue(NodeId::new(2), "node2.local".into());
        let result = task.process_one().await.unwrap();
        assert_eq!(result.result, Some("10.0.0.5".into()));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_lookup_still_posts_a_result() {
        let registry = Arc::new(ValueRegistry::new(HomeId::new(1)));
        let task = DnsTask::new(Box::new(StubResolver(None)), registry);
        task.enqueue(NodeId::new(2), "unresolvable.local".into());
        let result = task.process_one().await.unwrap();
        assert_eq!(result.result, None);
    }

    #[tokio::test]
    async fn drains_fifo_in_order() {
        let registry = Arc::new(ValueRegistry::new(HomeId::new(1)));
        let task = DnsTask::new(Box::new(StubResolver(Some("x".into()))), registry);
        task.enqueue(NodeId::new(2), "a".into());
        task.enqueue(NodeId::new(3), "b".into());
        let first = task.process_one().await.unwrap();
        assert_eq!(first.node_id, NodeId::new(2));
        let second = task.process_one().await.unwrap();
        assert_eq!(second.node_id, NodeId::new(3));
        assert!(task.is_empty());
    }
}
