//! Inter-task communication channels
//!
//! Board binaries use the statics below; tests build their own channels on
//! `NoopRawMutex`.

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::channel::Channel;
use vigil_core::state::LifecycleEvent;
use vigil_core::PowerError;
use vigil_drivers::modem::{ModemCommand, ModemStatus};

use crate::fmt::*;

/// Lifecycle event queue depth
pub const EVENT_CHANNEL_SIZE: usize = 8;

/// Modem command queue depth (one power-on plus one power-off)
pub const MODEM_CHANNEL_SIZE: usize = 2;

pub type EventChannel<M> = Channel<M, LifecycleEvent, EVENT_CHANNEL_SIZE>;
pub type ModemChannel<M> = Channel<M, ModemCommand, MODEM_CHANNEL_SIZE>;

/// Events for the lifecycle worker
pub static EVENT_CHANNEL: EventChannel<CriticalSectionRawMutex> = Channel::new();

/// Commands for the modem worker
pub static MODEM_CHANNEL: ModemChannel<CriticalSectionRawMutex> = Channel::new();

/// Modem rail state, written by the modem worker
pub static MODEM_STATUS: ModemStatus = ModemStatus::new();

/// Producer side of the lifecycle event queue
///
/// Posting never blocks: a full queue drops the event.
pub struct EventSender<'a, M: RawMutex> {
    channel: &'a EventChannel<M>,
}

impl<'a, M: RawMutex> EventSender<'a, M> {
    pub fn new(channel: &'a EventChannel<M>) -> Self {
        Self { channel }
    }

    pub fn post(&self, event: LifecycleEvent) -> Result<(), PowerError> {
        self.channel.try_send(event).map_err(|_| {
            warn!("event {:?} dropped, queue full", event);
            PowerError::ChannelFull
        })
    }
}

impl<M: RawMutex> Clone for EventSender<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: RawMutex> Copy for EventSender<'_, M> {}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn test_post_until_full() {
        let channel = EventChannel::<NoopRawMutex>::new();
        let sender = EventSender::new(&channel);
        for _ in 0..EVENT_CHANNEL_SIZE {
            sender.post(LifecycleEvent::WakeUp).unwrap();
        }
        assert_eq!(
            sender.post(LifecycleEvent::Shutdown),
            Err(PowerError::ChannelFull)
        );

        // Dropped, not queued behind the others
        for _ in 0..EVENT_CHANNEL_SIZE {
            assert_eq!(channel.try_receive().ok(), Some(LifecycleEvent::WakeUp));
        }
        assert!(channel.try_receive().is_err());
    }

    #[test]
    fn test_copies_share_the_queue() {
        let channel = EventChannel::<NoopRawMutex>::new();
        let a = EventSender::new(&channel);
        let b = a;
        a.post(LifecycleEvent::Sleep).unwrap();
        b.post(LifecycleEvent::WakeUp).unwrap();
        assert_eq!(channel.try_receive().ok(), Some(LifecycleEvent::Sleep));
        assert_eq!(channel.try_receive().ok(), Some(LifecycleEvent::WakeUp));
    }
}
