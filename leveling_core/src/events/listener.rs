//! Synchronous event consumers.

use leveling_rules::LevelingConfig;

use super::ProgressionEvent;

/// Receives progression events on the thread that produced them.
///
/// Implementations should return quickly; slow consumers belong on a
/// channel from [`EventBus::subscribe`](super::EventBus::subscribe).
pub trait ProgressionListener: Send + Sync {
    fn on_event(&self, event: &ProgressionEvent);
}

impl<F> ProgressionListener for F
where
    F: Fn(&ProgressionEvent) + Send + Sync,
{
    fn on_event(&self, event: &ProgressionEvent) {
        self(event)
    }
}

/// Writes progression events to the `tracing` log.
#[derive(Debug, Clone, Copy)]
pub struct TracingListener {
    log_experience: bool,
}

impl TracingListener {
    pub fn new(log_experience: bool) -> Self {
        Self { log_experience }
    }

    /// Honour the `show_experience_log` toggle.
    pub fn from_config(config: &LevelingConfig) -> Self {
        Self::new(config.show_experience_log)
    }
}

impl Default for TracingListener {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ProgressionListener for TracingListener {
    fn on_event(&self, event: &ProgressionEvent) {
        match event {
            ProgressionEvent::ExperienceGained { player, amount } => {
                if self.log_experience {
                    tracing::debug!(%player, amount, "experience gained");
                }
            }
            ProgressionEvent::LevelChanged {
                player,
                old_level,
                new_level,
            } => {
                tracing::info!(%player, old_level, new_level, "level changed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leveling_rules::PlayerId;

    #[test]
    fn test_tracing_listener_honours_config() {
        let quiet = TracingListener::from_config(&LevelingConfig {
            show_experience_log: false,
            ..Default::default()
        });
        assert!(!quiet.log_experience);
        assert!(TracingListener::default().log_experience);

        // Without a subscriber installed this is a no-op
        quiet.on_event(&ProgressionEvent::ExperienceGained {
            player: PlayerId(1),
            amount: 3.0,
        });
    }

    #[test]
    fn test_closure_listener() {
        let hits = std::sync::atomic::AtomicUsize::new(0);
        let listener = |_: &ProgressionEvent| {
            hits.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        };

        listener.on_event(&ProgressionEvent::LevelChanged {
            player: PlayerId(2),
            old_level: 0,
            new_level: 1,
        });

        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
