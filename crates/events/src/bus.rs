//! Publish/subscribe abstraction for real-time portal events.
//!
//! Broadcast semantics: every subscription receives its own copy of every
//! message published after it subscribed. Delivery is best-effort and
//! in-process; nothing is persisted, and a consumer that subscribes late simply
//! misses earlier events (the façade is the source of truth for state).

use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// One consumer's view of an event stream.
///
/// Meant to be drained by a single consumer; messages from one publisher
/// arrive in publish order.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Everything published so far and not yet received.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Transport-agnostic event bus.
///
/// `Send + Sync` so a background simulator task and UI-side consumers can
/// share one bus.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
