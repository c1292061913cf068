//! Mutation Observers
//!
//! Registrations and queued [`MutationRecord`]s. The tree feeds every
//! mutation through [`MutationObservers::notify`]; the owner of the event
//! loop drains the queues at its microtask checkpoint.

use crate::NodeId;
use std::collections::BTreeMap;

/// Mutation observer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MutationObserverId(u32);

/// Mutation observer options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub character_data: bool,
    pub subtree: bool,
    pub attribute_old_value: bool,
    pub attribute_filter: Option<Vec<String>>,
}

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    CharacterData,
    ChildList,
}

impl MutationRecord {
    /// Child list change on `target`
    pub fn child_list(target: NodeId, added: Vec<NodeId>, removed: Vec<NodeId>) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes: added,
            removed_nodes: removed,
            attribute_name: None,
            old_value: None,
        }
    }

    /// Attribute change on `target`
    pub fn attribute(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            attribute_name: Some(name.to_string()),
            old_value,
        }
    }
}

#[derive(Debug, Default)]
struct ObserverState {
    registrations: Vec<(NodeId, MutationObserverInit)>,
    pending: Vec<MutationRecord>,
}

impl ObserverState {
    /// Registrations interested in `record`
    fn matching<'a>(
        &'a self,
        record: &'a MutationRecord,
        ancestors: &'a [NodeId],
    ) -> impl Iterator<Item = &'a MutationObserverInit> + 'a {
        self.registrations.iter().filter_map(move |(target, options)| {
            let depth = ancestors.iter().position(|id| id == target)?;
            if depth > 0 && !options.subtree {
                return None;
            }
            let wanted = match record.mutation_type {
                MutationType::ChildList => options.child_list,
                MutationType::CharacterData => options.character_data,
                MutationType::Attributes => {
                    options.attributes
                        && match (&options.attribute_filter, &record.attribute_name) {
                            (Some(filter), Some(name)) => filter.iter().any(|f| f == name),
                            _ => true,
                        }
                }
            };
            wanted.then_some(options)
        })
    }
}

/// All mutation observers attached to one tree
#[derive(Debug, Default)]
pub struct MutationObservers {
    next_id: u32,
    observers: BTreeMap<MutationObserverId, ObserverState>,
}

impl MutationObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Create an observer with no registrations
    pub fn create(&mut self) -> MutationObserverId {
        let id = MutationObserverId(self.next_id);
        self.next_id += 1;
        self.observers.insert(id, ObserverState::default());
        id
    }

    /// Observe `target`. Observing the same target again replaces its options.
    pub fn observe(&mut self, id: MutationObserverId, target: NodeId, options: MutationObserverInit) -> bool {
        let Some(state) = self.observers.get_mut(&id) else {
            return false;
        };
        match state.registrations.iter_mut().find(|(t, _)| *t == target) {
            Some(existing) => existing.1 = options,
            None => state.registrations.push((target, options)),
        }
        true
    }

    /// Drop the observer, its registrations and any undelivered records
    pub fn disconnect(&mut self, id: MutationObserverId) -> bool {
        self.observers.remove(&id).is_some()
    }

    /// Take pending records for one observer
    pub fn take_records(&mut self, id: MutationObserverId) -> Vec<MutationRecord> {
        self.observers
            .get_mut(&id)
            .map(|state| std::mem::take(&mut state.pending))
            .unwrap_or_default()
    }

    /// Observers with undelivered records, in creation order
    pub fn pending(&self) -> Vec<MutationObserverId> {
        self.observers
            .iter()
            .filter(|(_, state)| !state.pending.is_empty())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Queue `record` for every interested observer.
    ///
    /// `ancestors` is the inclusive ancestor chain of the record target,
    /// starting with the target itself.
    /// Old attribute values are kept only for observers that asked for them.
    pub fn notify(&mut self, record: &MutationRecord, ancestors: &[NodeId]) {
        for state in self.observers.values_mut() {
            let mut matched = false;
            let mut old_value = false;
            for options in state.matching(record, ancestors) {
                matched = true;
                old_value |= options.attribute_old_value;
            }
            if !matched {
                continue;
            }
            let mut queued = record.clone();
            if record.mutation_type == MutationType::Attributes && !old_value {
                queued.old_value = None;
            }
            state.pending.push(queued);
        }
    }
}
