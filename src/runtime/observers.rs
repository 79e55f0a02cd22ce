//! Observer channels for machine lifecycle notifications.
//!
//! Three channels exist: "state will change", "state changed", and "state
//! unlocked". Dispatch is synchronous and in registration order. Emission
//! works on a snapshot of the channel, so subscribing or unsubscribing from
//! inside a callback only affects later emissions.
//!
//! One-shot unlock callbacks are ordinary subscriptions on the unlocked
//! channel whose ids are tracked separately; after an unlock fires they are
//! unsubscribed in bulk unless the caller opted to keep them.

use std::rc::Rc;

use crate::runtime::StateMachine;

/// Handle returned by the subscription methods, usable with
/// [`StateMachine::unsubscribe`](crate::StateMachine::unsubscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Channel {
    WillChange,
    Changed,
    Unlocked,
}

pub(crate) type ObserverFn = Rc<dyn Fn(&mut StateMachine)>;

pub(crate) struct ObserverSet {
    channels: [Vec<(ObserverId, ObserverFn)>; 3],
    pending_unlock: Vec<ObserverId>,
    next_id: u64,
}

impl ObserverSet {
    pub(crate) fn new() -> Self {
        Self {
            channels: [Vec::new(), Vec::new(), Vec::new()],
            pending_unlock: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn subscribe(&mut self, channel: Channel, callback: ObserverFn) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.channels[channel as usize].push((id, callback));
        id
    }

    /// Returns false when the id is unknown or already unsubscribed.
    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        for channel in &mut self.channels {
            if let Some(index) = channel.iter().position(|(existing, _)| *existing == id) {
                channel.remove(index);
                return true;
            }
        }
        false
    }

    /// The delivery list for one emission, fixed at call time.
    pub(crate) fn snapshot(&self, channel: Channel) -> Vec<ObserverFn> {
        self.channels[channel as usize]
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect()
    }

    /// Marks `id` as a one-shot unlock subscription.
    pub(crate) fn push_pending_unlock(&mut self, id: ObserverId) {
        self.pending_unlock.push(id);
    }

    /// Takes the one-shot ids registered so far. Ids registered while an
    /// unlock is dispatching land in the emptied list and survive it.
    pub(crate) fn take_pending_unlock(&mut self) -> Vec<ObserverId> {
        std::mem::take(&mut self.pending_unlock)
    }

    /// Puts taken one-shot ids back, ahead of any registered since.
    pub(crate) fn restore_pending_unlock(&mut self, mut ids: Vec<ObserverId>) {
        ids.append(&mut self.pending_unlock);
        self.pending_unlock = ids;
    }

    #[cfg(test)]
    pub(crate) fn observer_count(&self, channel: Channel) -> usize {
        self.channels[channel as usize].len()
    }

    #[cfg(test)]
    pub(crate) fn pending_unlock_count(&self) -> usize {
        self.pending_unlock.len()
    }
}
