use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use zwave_core::definitions::HomeId;
use zwave_core::value_id::ValueId;
use zwave_core::values::{Value, ValueMetadata, ValueVariant};

use crate::error::{Error, Result};
use crate::notification::Notification;

/// What calling code should do after [`ValueRegistry::on_report`] runs.
/// `RequestRefresh` means the caller must issue one additional `Get` at the
/// command-class layer before anything is reported to watchers (spec §4.5).
pub enum ReportOutcome {
    Added(ValueVariant),
    Unchanged,
    Changed {
        old_value: Option<ValueVariant>,
        new_value: ValueVariant,
    },
    RequestRefresh,
}

/// Per-node-id, per-`ValueId` store of every value's metadata and reading,
/// plus the list of registered watchers (spec §4.6). A single `Mutex`
/// guards the value map; watchers are invoked only from the notification
/// dispatcher thread, never while the value-map lock is held, matching the
/// lock-order rule in spec §5 (no I/O, and no further locking, under a held
/// lock).
pub struct ValueRegistry {
    home_id: HomeId,
    values: Mutex<HashMap<u64, Value>>,
    watchers: RwLock<Vec<Box<dyn Fn(&Notification) + Send + Sync>>>,
}

impl ValueRegistry {
    pub fn new(home_id: HomeId) -> Self {
        Self {
            home_id,
            values: Mutex::new(HashMap::new()),
            watchers: RwLock::new(Vec::new()),
        }
    }

    pub fn add_watcher(&self, watcher: impl Fn(&Notification) + Send + Sync + 'static) {
        self.watchers.write().unwrap().push(Box::new(watcher));
    }

    pub fn notify(&self, notification: Notification) {
        for watcher in self.watchers.read().unwrap().iter() {
            watcher(&notification);
        }
    }

    /// Registers a value's static metadata, without touching any reading
    /// already on file. Returns whether the value is new.
    pub fn ensure(&self, value_id: ValueId, metadata: ValueMetadata) -> bool {
        let mut values = self.values.lock().unwrap();
        let is_new = !values.contains_key(&value_id.as_u64());
        values
            .entry(value_id.as_u64())
            .or_insert_with(|| Value::new(metadata));
        if is_new {
            drop(values);
            self.notify(Notification::ValueAdded { value_id });
        }
        is_new
    }

    pub fn remove(&self, value_id: &ValueId) -> bool {
        let removed = self.values.lock().unwrap().remove(&value_id.as_u64()).is_some();
        if removed {
            self.notify(Notification::ValueRemoved {
                value_id: *value_id,
            });
        }
        removed
    }

    pub fn get(&self, value_id: &ValueId) -> Option<ValueVariant> {
        self.values
            .lock()
            .unwrap()
            .get(&value_id.as_u64())
            .and_then(|v| v.current_value.clone())
    }

    /// Marks a value as the target of a user-initiated `Set`: the stored
    /// reading will only update once the device's own report round-trips
    /// through [`Self::on_report`] and agrees with `target`.
    pub fn begin_set(&self, value_id: &ValueId, target: ValueVariant) -> Result<()> {
        let mut values = self.values.lock().unwrap();
        let value = values
            .get_mut(&value_id.as_u64())
            .ok_or(Error::Stale {
                value_id: *value_id,
            })?;
        value.begin_set(target);
        Ok(())
    }

    /// Applies a report observed on the wire, running the change-confirmation
    /// protocol (spec §4.5): a never-seen value is stored and reported
    /// immediately; a reading that matches what's on file just clears any
    /// pending confirmation; a first-seen mismatch starts a confirmation
    /// window and asks the caller to request one more refresh; a refresh
    /// that agrees with the pending candidate commits; one that disagrees
    /// restarts the window against the newest candidate.
    pub fn on_report(&self, value_id: &ValueId, reported: ValueVariant) -> ReportOutcome {
        let mut values = self.values.lock().unwrap();
        let Some(value) = values.get_mut(&value_id.as_u64()) else {
            return ReportOutcome::Unchanged;
        };

        let outcome = match value.current_value.clone() {
            None => {
                value.current_value = Some(reported.clone());
                ReportOutcome::Added(reported)
            }
            Some(current) if current == reported => {
                if value.checking_change {
                    value.checking_change = false;
                    value.pending_value = None;
                }
                ReportOutcome::Unchanged
            }
            Some(current) => {
                if !value.checking_change {
                    value.checking_change = true;
                    value.pending_value = Some(reported);
                    ReportOutcome::RequestRefresh
                } else if value.pending_value.as_ref() == Some(&reported) {
                    value.current_value = Some(reported.clone());
                    value.checking_change = false;
                    value.pending_value = None;
                    ReportOutcome::Changed {
                        old_value: Some(current),
                        new_value: reported,
                    }
                } else {
                    value.pending_value = Some(reported);
                    ReportOutcome::RequestRefresh
                }
            }
        };
        drop(values);

        if let ReportOutcome::Changed {
            ref old_value,
            ref new_value,
        } = outcome
        {
            self.notify(Notification::ValueChanged {
                value_id: *value_id,
                old_value: old_value.clone(),
                new_value: new_value.clone(),
            });
        } else if let ReportOutcome::Added(ref new_value) = outcome {
            self.notify(Notification::ValueChanged {
                value_id: *value_id,
                old_value: None,
                new_value: new_value.clone(),
            });
        }

        outcome
    }

    /// Updates the polling intensity of an already-registered value (spec
    /// §4.7 `enablePoll`). Returns `false` if the value doesn't exist yet,
    /// since there is no metadata to update.
    pub fn set_polling_intensity(&self, value_id: &ValueId, intensity: u8) -> bool {
        let mut values = self.values.lock().unwrap();
        let Some(value) = values.get_mut(&value_id.as_u64()) else {
            return false;
        };
        value.metadata.polling_intensity = intensity;
        true
    }

    pub fn home_id(&self) -> HomeId {
        self.home_id
    }

    pub fn all_for_node(&self, node_id: zwave_core::definitions::NodeId) -> Vec<ValueId> {
        self.values
            .lock()
            .unwrap()
            .keys()
            .filter_map(|&packed| ValueId::from_u64(self.home_id, packed).ok())
            .filter(|id| id.node_id == node_id)
            .collect()
    }

    /// Every value flagged for periodic refresh (spec §4.7), in a stable
    /// order so the polling cursor advances deterministically.
    pub fn pollable_values(&self) -> Vec<ValueId> {
        let mut ids: Vec<ValueId> = self
            .values
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, value)| value.metadata.polling_intensity > 0)
            .filter_map(|(&packed, _)| ValueId::from_u64(self.home_id, packed).ok())
            .collect();
        ids.sort_by_key(|id| id.as_u64());
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zwave_core::definitions::{CommandClasses, Genre, NodeId, ValueType};

    fn vid() -> ValueId {
        ValueId::new(
            HomeId::new(1),
            NodeId::new(2),
            Genre::User,
            CommandClasses::BinarySwitch,
            0,
            0,
            ValueType::Bool,
        )
    }

    #[test]
    fn first_report_is_stored_without_refresh() {
        let reg = ValueRegistry::new(HomeId::new(1));
        reg.ensure(vid(), ValueMetadata::builder().build());
        let outcome = reg.on_report(&vid(), ValueVariant::Bool(true));
        assert!(matches!(outcome, ReportOutcome::Added(ValueVariant::Bool(true))));
        assert_eq!(reg.get(&vid()), Some(ValueVariant::Bool(true)));
    }

    #[test]
    fn mismatch_requests_refresh_then_commits_on_agreement() {
        let reg = ValueRegistry::new(HomeId::new(1));
        reg.ensure(vid(), ValueMetadata::builder().build());
        reg.on_report(&vid(), ValueVariant::Bool(false));

        let outcome = reg.on_report(&vid(), ValueVariant::Bool(true));
        assert!(matches!(outcome, ReportOutcome::RequestRefresh));
        // Still showing the old value until confirmed
        assert_eq!(reg.get(&vid()), Some(ValueVariant::Bool(false)));

        let outcome = reg.on_report(&vid(), ValueVariant::Bool(true));
        assert!(matches!(outcome, ReportOutcome::Changed { .. }));
        assert_eq!(reg.get(&vid()), Some(ValueVariant::Bool(true)));
    }

    #[test]
    fn disagreement_restarts_the_window() {
        let reg = ValueRegistry::new(HomeId::new(1));
        reg.ensure(vid(), ValueMetadata::builder().build());
        reg.on_report(&vid(), ValueVariant::Byte(1));

        // First mismatch starts the window, candidate = 2
        reg.on_report(&vid(), ValueVariant::Byte(2));
        // Confirming refresh disagrees (candidate moves to 3), still pending
        let outcome = reg.on_report(&vid(), ValueVariant::Byte(3));
        assert!(matches!(outcome, ReportOutcome::RequestRefresh));
        assert_eq!(reg.get(&vid()), Some(ValueVariant::Byte(1)));

        // Now it agrees with the latest candidate
        let outcome = reg.on_report(&vid(), ValueVariant::Byte(3));
        assert!(matches!(outcome, ReportOutcome::Changed { .. }));
        assert_eq!(reg.get(&vid()), Some(ValueVariant::Byte(3)));
    }
}
