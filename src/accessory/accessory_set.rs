// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Identifier-keyed set of the accessories a platform instance knows about.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{Accessory, AccessoryId};

/// Whether the host currently holds an accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    /// Not known to the host (never created, or removed).
    Unregistered,
    /// Registered with the host, either restored from its cache or newly created.
    Registered,
}

impl RegistrationState {
    /// Returns true if the accessory is registered.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered)
    }
}

/// All accessories known to one platform instance, host-restored and newly
/// created alike.
///
/// At most one entry exists per [`AccessoryId`]. Only startup and explicit
/// removal mutate the set; reads never do. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct AccessorySet {
    accessories: Arc<RwLock<HashMap<AccessoryId, Accessory>>>,
}

impl AccessorySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `accessory` unless an entry with the same id already exists.
    ///
    /// Returns `true` if it was added.
    pub fn insert_if_absent(&self, accessory: Accessory) -> bool {
        let mut accessories = self.accessories.write();
        if accessories.contains_key(&accessory.id()) {
            return false;
        }
        accessories.insert(accessory.id(), accessory);
        true
    }

    /// Adds or replaces the entry for `accessory`'s id.
    ///
    /// Returns the entry it replaced, if any.
    pub fn upsert(&self, accessory: Accessory) -> Option<Accessory> {
        self.accessories.write().insert(accessory.id(), accessory)
    }

    /// Removes and returns the entry for `id`.
    pub fn remove(&self, id: AccessoryId) -> Option<Accessory> {
        self.accessories.write().remove(&id)
    }

    /// Returns a copy of the entry for `id`.
    #[must_use]
    pub fn get(&self, id: AccessoryId) -> Option<Accessory> {
        self.accessories.read().get(&id).cloned()
    }

    /// Returns true if an entry exists for `id`.
    #[must_use]
    pub fn contains(&self, id: AccessoryId) -> bool {
        self.accessories.read().contains_key(&id)
    }

    /// Returns the registration state of `id`.
    #[must_use]
    pub fn state(&self, id: AccessoryId) -> RegistrationState {
        if self.contains(id) {
            RegistrationState::Registered
        } else {
            RegistrationState::Unregistered
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accessories.read().len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accessories.read().is_empty()
    }

    /// Returns all identifiers.
    #[must_use]
    pub fn ids(&self) -> Vec<AccessoryId> {
        self.accessories.read().keys().copied().collect()
    }

    /// Returns a copy of every entry.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Accessory> {
        self.accessories.read().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn accessory(n: u128, name: &str) -> Accessory {
        Accessory::new(name, AccessoryId::from_uuid(Uuid::from_u128(n)))
    }

    #[test]
    fn new_set_is_empty() {
        let set = AccessorySet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.ids().is_empty());
    }

    #[test]
    fn insert_if_absent_keeps_first_entry() {
        let set = AccessorySet::new();

        assert!(set.insert_if_absent(accessory(1, "Awake")));
        assert!(!set.insert_if_absent(accessory(1, "Renamed")));

        assert_eq!(set.len(), 1);
        let id = AccessoryId::from_uuid(Uuid::from_u128(1));
        assert_eq!(set.get(id).unwrap().display_name(), "Awake");
    }

    #[test]
    fn upsert_replaces_entry() {
        let set = AccessorySet::new();
        set.upsert(accessory(1, "awake"));

        let previous = set.upsert(accessory(1, "Awake"));
        assert_eq!(previous.unwrap().display_name(), "awake");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_returns_entry() {
        let set = AccessorySet::new();
        let id = AccessoryId::from_uuid(Uuid::from_u128(1));
        set.upsert(accessory(1, "Awake"));

        assert!(set.remove(id).is_some());
        assert!(set.remove(id).is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn state_follows_membership() {
        let set = AccessorySet::new();
        let id = AccessoryId::from_uuid(Uuid::from_u128(7));
        assert_eq!(set.state(id), RegistrationState::Unregistered);

        set.upsert(accessory(7, "Awake"));
        assert!(set.state(id).is_registered());

        set.remove(id);
        assert!(!set.state(id).is_registered());
    }

    #[test]
    fn clones_share_entries() {
        let set = AccessorySet::new();
        let other = set.clone();

        set.upsert(accessory(1, "Awake"));
        assert_eq!(other.len(), 1);
        assert_eq!(other.snapshot().len(), 1);
    }
}
