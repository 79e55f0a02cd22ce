//! Per-type cache of state instances.
//!
//! Each slot owns the boxed instance plus its lock flag and display name.
//! While a state's own hook runs, the instance is checked out of its slot so
//! the hook can receive `&mut StateMachine` without aliasing it; the slot
//! itself stays in the map, keeping name and lock flag addressable. A
//! parameter write aimed at a checked-out instance is staged on the slot and
//! applied at checkin.

use std::any::TypeId;
use std::collections::HashMap;

use crate::core::{ParameterizedState, State};

pub(crate) type PendingWrite = Box<dyn FnOnce(&mut dyn State)>;

pub(crate) struct Slot {
    pub(crate) instance: Option<Box<dyn State>>,
    pub(crate) locked: bool,
    pub(crate) name: &'static str,
    pub(crate) pending_write: Option<PendingWrite>,
}

#[derive(Default)]
pub(crate) struct StateRegistry {
    slots: HashMap<TypeId, Slot>,
}

impl StateRegistry {
    pub(crate) fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    pub(crate) fn contains(&self, id: TypeId) -> bool {
        self.slots.contains_key(&id)
    }

    pub(crate) fn insert(&mut self, id: TypeId, instance: Box<dyn State>) {
        let name = instance.name();
        self.slots.insert(
            id,
            Slot {
                instance: Some(instance),
                locked: false,
                name,
                pending_write: None,
            },
        );
    }

    pub(crate) fn remove(&mut self, id: TypeId) -> Option<Slot> {
        self.slots.remove(&id)
    }

    pub(crate) fn name_of(&self, id: TypeId) -> Option<&'static str> {
        self.slots.get(&id).map(|slot| slot.name)
    }

    pub(crate) fn is_locked(&self, id: TypeId) -> bool {
        self.slots.get(&id).map(|slot| slot.locked).unwrap_or(false)
    }

    /// Returns false when no slot exists for `id`.
    pub(crate) fn set_locked(&mut self, id: TypeId, locked: bool) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) => {
                slot.locked = locked;
                true
            }
            None => false,
        }
    }

    pub(crate) fn checkout(&mut self, id: TypeId) -> Option<Box<dyn State>> {
        self.slots.get_mut(&id).and_then(|slot| slot.instance.take())
    }

    pub(crate) fn checkin(&mut self, id: TypeId, mut instance: Box<dyn State>) {
        if let Some(slot) = self.slots.get_mut(&id) {
            if let Some(write) = slot.pending_write.take() {
                write(&mut *instance);
            }
            slot.instance = Some(instance);
        }
    }

    /// Defers a parameter write until `id`'s instance is checked back in.
    /// Replaces any write already staged; discarded if the slot is removed
    /// first.
    pub(crate) fn stage_write<T>(&mut self, id: TypeId, params: T::Params)
    where
        T: ParameterizedState,
    {
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.pending_write = Some(Box::new(move |state: &mut dyn State| {
                if let Some(instance) = state.as_any_mut().downcast_mut::<T>() {
                    instance.write_params(params);
                }
            }));
        }
    }

    /// None when the slot is missing, holds a different type, or its
    /// instance is currently checked out.
    pub(crate) fn downcast_ref<T: State>(&self, id: TypeId) -> Option<&T> {
        let slot = self.slots.get(&id)?;
        let state: &dyn State = slot.instance.as_deref()?;
        state.as_any().downcast_ref::<T>()
    }

    pub(crate) fn downcast_mut<T: State>(&mut self, id: TypeId) -> Option<&mut T> {
        let slot = self.slots.get_mut(&id)?;
        let state: &mut dyn State = slot.instance.as_deref_mut()?;
        state.as_any_mut().downcast_mut::<T>()
    }

    pub(crate) fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.slots.values().map(|slot| slot.name).collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }
}
