//! Insertion-ordered option registry.

use crate::option_id::{OptionEntry, OptionId};

/// Maps option ids to their content in the order options first registered.
///
/// Registering an id again replaces its content but keeps its position.
/// Entries are never removed.
#[derive(Debug, Clone)]
pub struct OptionRegistry<C> {
    entries: Vec<OptionEntry<C>>,
}

impl<C> Default for OptionRegistry<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C> OptionRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `id`. Returns `true` if the id was new.
    pub fn insert(&mut self, id: OptionId, content: C) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.content = content;
                false
            }
            None => {
                self.entries.push(OptionEntry { id, content });
                true
            }
        }
    }

    pub fn get(&self, id: &OptionId) -> Option<&C> {
        self.entries
            .iter()
            .find(|entry| &entry.id == id)
            .map(|entry| &entry.content)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionEntry<C>> {
        self.entries.iter()
    }
}
