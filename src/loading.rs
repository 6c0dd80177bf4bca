//! Loading state machine gating page fetches.

use serde::{Deserialize, Serialize};

/// Four-valued status of the list pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingState {
    /// Idle; has or may have content.
    Normal,
    /// A fetch is in flight.
    Loading,
    /// Idle with zero accumulated items.
    Empty,
    /// The last fetch failed.
    Error,
}

impl LoadingState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Loading => "loading",
            Self::Empty => "empty",
            Self::Error => "error",
        }
    }
}

impl Default for LoadingState {
    fn default() -> Self {
        Self::Normal
    }
}

/// The sole concurrency gate for fetches.
///
/// At most one fetch is in flight: `try_begin` refuses while Loading, and
/// every completed fetch resolves back to an idle state before the next one
/// may start. No other component decides whether a fetch proceeds.
#[derive(Debug, Default)]
pub struct LoadingGate {
    current: LoadingState,
}

impl LoadingGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> LoadingState {
        self.current
    }

    /// Enter Loading unless a fetch is already in flight.
    ///
    /// Returns `false` (and changes nothing) when called while Loading.
    pub fn try_begin(&mut self) -> bool {
        if self.current == LoadingState::Loading {
            return false;
        }
        self.current = LoadingState::Loading;
        true
    }

    /// Resolve a successful fetch given the TOTAL accumulated item count.
    pub fn finish_success(&mut self, total_items: usize) -> LoadingState {
        self.current = if total_items > 0 {
            LoadingState::Normal
        } else {
            LoadingState::Empty
        };
        self.current
    }

    /// Resolve a failed fetch.
    pub fn finish_failure(&mut self) -> LoadingState {
        self.current = LoadingState::Error;
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_normal() {
        assert_eq!(LoadingGate::new().current(), LoadingState::Normal);
    }

    #[test]
    fn test_begin_refused_while_loading() {
        let mut gate = LoadingGate::new();
        assert!(gate.try_begin());
        assert_eq!(gate.current(), LoadingState::Loading);
        assert!(!gate.try_begin());
        assert_eq!(gate.current(), LoadingState::Loading);
    }

    #[test]
    fn test_begin_allowed_from_every_idle_state() {
        let mut gate = LoadingGate::new();
        assert!(gate.try_begin());
        gate.finish_success(0);
        assert_eq!(gate.current(), LoadingState::Empty);
        assert!(gate.try_begin());

        gate.finish_failure();
        assert_eq!(gate.current(), LoadingState::Error);
        assert!(gate.try_begin());

        gate.finish_success(3);
        assert_eq!(gate.current(), LoadingState::Normal);
        assert!(gate.try_begin());
    }

    #[test]
    fn test_success_resolution_uses_total_count() {
        let mut gate = LoadingGate::new();
        assert!(gate.try_begin());
        assert_eq!(gate.finish_success(2), LoadingState::Normal);

        // An empty page on top of existing items stays Normal.
        assert!(gate.try_begin());
        assert_eq!(gate.finish_success(2), LoadingState::Normal);

        assert!(gate.try_begin());
        assert_eq!(gate.finish_success(0), LoadingState::Empty);
    }
}
