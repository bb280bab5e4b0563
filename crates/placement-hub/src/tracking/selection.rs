use std::collections::HashSet;

use super::domain::ApplicationId;

/// Tracks record ids marked for bulk action.
///
/// The set survives aggregation reloads untouched: ids that vanish from the
/// board stay selected until toggled or cleared.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: HashSet<ApplicationId>,
}

impl SelectionManager {
    /// Flips one id; returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: ApplicationId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Replaces the whole selection with the supplied ids.
    pub fn select_all<T>(&mut self, ids: T)
    where
        T: IntoIterator<Item = ApplicationId>,
    {
        self.selected = ids.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: &ApplicationId) -> bool {
        self.selected.contains(id)
    }

    /// Selected ids in a stable order.
    pub fn ids(&self) -> Vec<ApplicationId> {
        let mut ids: Vec<ApplicationId> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
