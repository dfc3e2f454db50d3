//! Append-only buffer of game events, drained by the transport layer.

use super::GameEvent;

/// Events emitted since the last drain.
#[derive(Clone, Debug, Default)]
pub struct GameLog {
    events: Vec<GameEvent>,
}

impl GameLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Pending events, oldest first.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Take every pending event.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take every pending event rendered as text, one line each.
    pub fn drain(&mut self) -> String {
        self.drain_events()
            .iter()
            .map(|event| format!("{}\n", event))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_clears() {
        let mut log = GameLog::new();
        log.push(GameEvent::Welcome);
        log.push(GameEvent::NewRoot);
        assert_eq!(log.len(), 2);

        let text = log.drain();
        assert_eq!(text, "Hello and welcome to this amazing game!\nThat's a new root!\n");
        assert!(log.is_empty());
        assert_eq!(log.drain(), "");
    }

    #[test]
    fn test_drain_events() {
        let mut log = GameLog::new();
        log.push(GameEvent::ScoreReset);

        assert_eq!(log.events(), &[GameEvent::ScoreReset]);
        assert_eq!(log.drain_events(), vec![GameEvent::ScoreReset]);
        assert!(log.events().is_empty());
    }
}
