//! Outbound progression notifications.
//!
//! The store publishes two kinds of events. Consumers either register a
//! synchronous [`ProgressionListener`] or [`subscribe`](EventBus::subscribe)
//! to a channel and drain it on their own thread, which keeps slow consumers
//! off the award path.

mod listener;

pub use listener::*;

use crossbeam_channel::{unbounded, Receiver, Sender};
use leveling_rules::PlayerId;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use uuid::Uuid;

/// Notifications emitted by the player store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProgressionEvent {
    /// A positive award was applied.
    ExperienceGained { player: PlayerId, amount: f64 },

    /// The stored level changed (gain, admin set or reset).
    LevelChanged {
        player: PlayerId,
        old_level: u32,
        new_level: u32,
    },
}

impl ProgressionEvent {
    /// Get the player this event concerns.
    pub fn player(&self) -> PlayerId {
        match self {
            ProgressionEvent::ExperienceGained { player, .. } => *player,
            ProgressionEvent::LevelChanged { player, .. } => *player,
        }
    }

    /// Check if this is a level increase.
    pub fn is_level_up(&self) -> bool {
        matches!(
            self,
            ProgressionEvent::LevelChanged {
                old_level,
                new_level,
                ..
            } if new_level > old_level
        )
    }
}

/// Handle returned by [`EventBus::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fan-out point for progression events.
#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<Vec<(SubscriptionId, Arc<dyn ProgressionListener>)>>,
    channels: Mutex<Vec<Sender<ProgressionEvent>>>,
}

impl EventBus {
    /// Create a bus with no consumers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a synchronous listener.
    pub fn add_listener(&self, listener: impl ProgressionListener + 'static) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Unregister a listener. Returns false if the id was unknown.
    pub fn remove_listener(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Open an unbounded queue that receives every subsequent event.
    ///
    /// Dropping the receiver unsubscribes it.
    pub fn subscribe(&self) -> Receiver<ProgressionEvent> {
        let (tx, rx) = unbounded();
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Number of listeners plus open channels.
    pub fn consumer_count(&self) -> usize {
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner).len();
        let channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner).len();
        listeners + channels
    }

    /// Deliver events in order to every consumer.
    pub fn publish(&self, events: &[ProgressionEvent]) {
        if events.is_empty() {
            return;
        }

        {
            let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
            channels.retain(|tx| events.iter().all(|event| tx.send(event.clone()).is_ok()));
        }

        // Listeners are cloned out so a callback may register or remove listeners.
        let listeners: Vec<_> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for event in events {
            for listener in &listeners {
                listener.on_event(event);
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("consumers", &self.consumer_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gained(player: u64, amount: f64) -> ProgressionEvent {
        ProgressionEvent::ExperienceGained {
            player: PlayerId(player),
            amount,
        }
    }

    #[test]
    fn test_channel_receives_in_order() {
        let bus = EventBus::new();
        let rx = bus.subscribe();

        let level_up = ProgressionEvent::LevelChanged {
            player: PlayerId(1),
            old_level: 0,
            new_level: 1,
        };
        bus.publish(&[gained(1, 150.0), level_up.clone()]);

        assert_eq!(rx.try_recv().unwrap(), gained(1, 150.0));
        assert_eq!(rx.try_recv().unwrap(), level_up);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_pruned() {
        let bus = EventBus::new();
        let rx = bus.subscribe();
        assert_eq!(bus.consumer_count(), 1);

        drop(rx);
        bus.publish(&[gained(1, 1.0)]);

        assert_eq!(bus.consumer_count(), 0);
    }

    #[test]
    fn test_listener_registration() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = bus.add_listener(move |event: &ProgressionEvent| {
            sink.lock().unwrap().push(event.player());
        });

        bus.publish(&[gained(4, 2.0)]);
        assert!(bus.remove_listener(id));
        assert!(!bus.remove_listener(id));
        bus.publish(&[gained(5, 2.0)]);

        assert_eq!(*seen.lock().unwrap(), vec![PlayerId(4)]);
    }

    #[test]
    fn test_is_level_up() {
        let up = ProgressionEvent::LevelChanged {
            player: PlayerId(1),
            old_level: 2,
            new_level: 3,
        };
        let down = ProgressionEvent::LevelChanged {
            player: PlayerId(1),
            old_level: 3,
            new_level: 0,
        };

        assert!(up.is_level_up());
        assert!(!down.is_level_up());
        assert!(!gained(1, 5.0).is_level_up());
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_string(&gained(9, 12.5)).unwrap();
        assert!(json.contains("ExperienceGained"));

        let back: ProgressionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, gained(9, 12.5));
    }
}
