// Copyright 2026 the glmirror Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handle assignment for JS-owned objects.
//!
//! WebGL objects are JS values with no stable numeric identity, so each kind
//! gets a [`Registry`] that hands out `index + 1` as its handle. Zero is never
//! assigned; it would be indistinguishable from "nothing bound" on the native
//! side. Slots are never reused, so a stale handle can not alias a newer
//! object.

use alloc::vec::Vec;

/// Identity-keyed table of registered objects.
pub(crate) struct Registry<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T: PartialEq + Clone> Registry<T> {
    /// Returns the handle of `object`, registering it first if needed.
    pub(crate) fn register(&mut self, object: &T) -> u32 {
        if let Some(id) = self.lookup(object) {
            return id;
        }
        self.slots.push(Some(object.clone()));
        #[expect(
            clippy::cast_possible_truncation,
            reason = "fewer than 2^32 objects are registered in one context"
        )]
        let id = self.slots.len() as u32;
        id
    }

    /// Returns the handle of an already registered object.
    pub(crate) fn lookup(&self, object: &T) -> Option<u32> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.as_ref() == Some(object))?;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "indices come from register, which keeps them below 2^32"
        )]
        let id = index as u32 + 1;
        Some(id)
    }

    /// Returns the object behind `id`.
    pub(crate) fn get(&self, id: u32) -> Option<&T> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.slots.get(index)?.as_ref()
    }

    /// Drops the object behind `id` and returns it. The handle stays retired.
    pub(crate) fn remove(&mut self, id: u32) -> Option<T> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.slots.get_mut(index)?.take()
    }

    /// Number of live registrations.
    pub(crate) fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}
