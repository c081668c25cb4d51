//! Navigation decision states.

/// State of the navigation decision machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    /// Following the exploration stack.
    #[default]
    Exploring,

    /// Routing toward a commanded target.
    TargetSeeking,

    /// Exploration reported complete; waiting for the server's verdict.
    AwaitingCompletion,

    /// Mission finished. No further decisions are made.
    Done,
}

impl NavState {
    /// Check if the mission is over.
    pub fn is_terminal(&self) -> bool {
        matches!(self, NavState::Done)
    }

    /// Convert to string for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            NavState::Exploring => "EXPLORING",
            NavState::TargetSeeking => "TARGET_SEEKING",
            NavState::AwaitingCompletion => "AWAITING_COMPLETION",
            NavState::Done => "DONE",
        }
    }
}

/// Outcome of one decision cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Heading proposed to the server; commit it after the override window.
    Proceed(crate::planet::Heading),
    /// The agent stands on the target; `targetReached` was emitted.
    TargetReached,
    /// Nothing left to explore; `explorationCompleted` was emitted.
    ExplorationCompleted,
    /// No decision possible yet (start unknown or awaiting completion).
    Wait,
    /// Mission is done.
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_and_terminal() {
        assert_eq!(NavState::default(), NavState::Exploring);
        assert!(NavState::Done.is_terminal());
        assert!(!NavState::AwaitingCompletion.is_terminal());
        assert_eq!(NavState::TargetSeeking.as_str(), "TARGET_SEEKING");
    }
}
