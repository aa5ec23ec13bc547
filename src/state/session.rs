use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Penalty counters are clamped to this many slots per side.
pub const MAX_PENALTIES: u8 = 4;

/// Authoritative state of one scoreboard session.
///
/// Instances only change by going through [`Session::apply`] (reducer) or
/// [`Session::tick`] (countdown), both of which return a fresh value and
/// leave their input untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Caller-supplied identifier, immutable for the session's lifetime.
    pub id: String,
    /// Whether a remote controller has announced itself. Informational only.
    pub remote_connected: bool,
    /// Blue side score, never below zero.
    pub blue_score: u32,
    /// Red side score, never below zero.
    pub red_score: u32,
    /// Blue side penalty slots in `[0, MAX_PENALTIES]`.
    pub blue_penalties: u8,
    /// Red side penalty slots in `[0, MAX_PENALTIES]`.
    pub red_penalties: u8,
    /// Seconds left on the countdown clock.
    pub remaining: u32,
    /// True only while a tick driver is counting this session down.
    pub timer_running: bool,
    /// Configured countdown length in seconds; the value a reset returns to.
    pub timer_duration: u32,
}

impl Session {
    /// Build a fresh session with invariant defaults and a full clock.
    pub fn new(id: impl Into<String>, timer_duration: u32) -> Self {
        Self {
            id: id.into(),
            remote_connected: false,
            blue_score: 0,
            red_score: 0,
            blue_penalties: 0,
            red_penalties: 0,
            remaining: timer_duration,
            timer_running: false,
            timer_duration,
        }
    }

    /// Reduce an action into the next session state.
    ///
    /// Total over every action: clamp-boundary adjustments and unrecognized
    /// kinds reduce to the unchanged state rather than an error.
    #[must_use]
    pub fn apply(&self, action: &SessionAction) -> Self {
        let mut next = self.clone();

        match *action {
            SessionAction::ConnectRemote { state } => next.remote_connected = state,
            SessionAction::ScoreBlue { amount } => {
                next.blue_score = next.blue_score.saturating_add_signed(amount);
            }
            SessionAction::ScoreRed { amount } => {
                next.red_score = next.red_score.saturating_add_signed(amount);
            }
            SessionAction::PenaltyBlue { add } => {
                next.blue_penalties = adjust_penalties(next.blue_penalties, add);
            }
            SessionAction::PenaltyRed { add } => {
                next.red_penalties = adjust_penalties(next.red_penalties, add);
            }
            SessionAction::TimerStart => next.timer_running = true,
            SessionAction::TimerStop => next.timer_running = false,
            SessionAction::TimerReset => {
                next.remaining = next.timer_duration;
                next.timer_running = false;
            }
            // Rebases a countdown in flight: the clock keeps running.
            SessionAction::TimerSetDuration { seconds } => {
                next.timer_duration = seconds;
                next.remaining = seconds;
            }
            SessionAction::ResetGame => {
                next.blue_score = 0;
                next.red_score = 0;
                next.blue_penalties = 0;
                next.red_penalties = 0;
                next.remaining = next.timer_duration;
                next.timer_running = false;
            }
            SessionAction::Unknown => {}
        }

        next
    }

    /// Advance the countdown by one second, flooring at zero.
    ///
    /// Reaching zero forces `timer_running` off so the driver knows to wind
    /// down. Ticking a stopped session returns it unchanged.
    #[must_use]
    pub fn tick(&self) -> Self {
        if !self.timer_running {
            return self.clone();
        }

        let remaining = self.remaining.saturating_sub(1);
        Self {
            remaining,
            timer_running: remaining > 0,
            ..self.clone()
        }
    }
}

fn adjust_penalties(current: u8, add: bool) -> u8 {
    if add && current < MAX_PENALTIES {
        current + 1
    } else if !add && current > 0 {
        current - 1
    } else {
        current
    }
}

/// Requests to transition a session, tagged with the wire protocol's names.
///
/// Tags a client might send that we do not know about collapse into
/// [`SessionAction::Unknown`] and reduce to a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionAction {
    /// Flag whether a remote controller is attached.
    ConnectRemote {
        /// New value of the flag.
        state: bool,
    },
    /// Adjust the blue score by a signed amount, floored at zero.
    ScoreBlue {
        /// Signed score delta.
        amount: i32,
    },
    /// Adjust the red score by a signed amount, floored at zero.
    ScoreRed {
        /// Signed score delta.
        amount: i32,
    },
    /// Add or remove one blue penalty slot within the clamp range.
    PenaltyBlue {
        /// True to add a penalty, false to remove one.
        add: bool,
    },
    /// Add or remove one red penalty slot within the clamp range.
    PenaltyRed {
        /// True to add a penalty, false to remove one.
        add: bool,
    },
    /// Start the countdown.
    TimerStart,
    /// Stop the countdown, keeping the remaining time.
    TimerStop,
    /// Restore the clock to the configured duration and stop it.
    TimerReset,
    /// Reconfigure the countdown length, rebasing the clock to it.
    TimerSetDuration {
        /// New duration in seconds.
        seconds: u32,
    },
    /// Zero scores and penalties, restore the clock, stop the countdown.
    ResetGame,
    /// Catch-all for unrecognized action tags; reduces to a no-op.
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_invariant_defaults() {
        let session = Session::new("alpha", 180);
        assert_eq!(session.id, "alpha");
        assert!(!session.remote_connected);
        assert_eq!((session.blue_score, session.red_score), (0, 0));
        assert_eq!((session.blue_penalties, session.red_penalties), (0, 0));
        assert_eq!(session.remaining, 180);
        assert_eq!(session.timer_duration, 180);
        assert!(!session.timer_running);
    }

    #[test]
    fn apply_never_mutates_its_input() {
        let session = Session::new("alpha", 60);
        let before = session.clone();
        let _ = session.apply(&SessionAction::ScoreBlue { amount: 3 });
        let _ = session.apply(&SessionAction::ResetGame);
        assert_eq!(session, before);
    }

    #[test]
    fn scores_adjust_and_floor_at_zero() {
        let mut session = Session::new("alpha", 60);
        session = session.apply(&SessionAction::ScoreBlue { amount: 2 });
        assert_eq!(session.blue_score, 2);
        session = session.apply(&SessionAction::ScoreBlue { amount: -5 });
        assert_eq!(session.blue_score, 0);
        session = session.apply(&SessionAction::ScoreRed { amount: -1 });
        assert_eq!(session.red_score, 0);
    }

    #[test]
    fn penalties_clamp_to_range() {
        let mut session = Session::new("alpha", 60);
        for _ in 0..6 {
            session = session.apply(&SessionAction::PenaltyBlue { add: true });
        }
        assert_eq!(session.blue_penalties, MAX_PENALTIES);

        for _ in 0..6 {
            session = session.apply(&SessionAction::PenaltyBlue { add: false });
        }
        assert_eq!(session.blue_penalties, 0);

        // Decrementing at zero stays a no-op for the red side too.
        session = session.apply(&SessionAction::PenaltyRed { add: false });
        assert_eq!(session.red_penalties, 0);
    }

    #[test]
    fn timer_reset_restores_clock_only() {
        let mut session = Session::new("alpha", 90);
        session = session.apply(&SessionAction::ScoreBlue { amount: 4 });
        session = session.apply(&SessionAction::TimerStart);
        session.remaining = 12;

        session = session.apply(&SessionAction::TimerReset);
        assert_eq!(session.remaining, 90);
        assert!(!session.timer_running);
        assert_eq!(session.blue_score, 4);
    }

    #[test]
    fn set_duration_rebases_without_stopping() {
        let mut session = Session::new("alpha", 60);
        session = session.apply(&SessionAction::TimerStart);
        session = session.apply(&SessionAction::TimerSetDuration { seconds: 30 });
        assert_eq!(session.timer_duration, 30);
        assert_eq!(session.remaining, 30);
        assert!(session.timer_running);
    }

    #[test]
    fn reset_game_restores_everything_and_stops() {
        let mut session = Session::new("alpha", 45);
        session = session.apply(&SessionAction::ScoreBlue { amount: 7 });
        session = session.apply(&SessionAction::ScoreRed { amount: 3 });
        session = session.apply(&SessionAction::PenaltyBlue { add: true });
        session = session.apply(&SessionAction::TimerStart);
        session.remaining = 5;

        session = session.apply(&SessionAction::ResetGame);
        assert_eq!((session.blue_score, session.red_score), (0, 0));
        assert_eq!((session.blue_penalties, session.red_penalties), (0, 0));
        assert_eq!(session.remaining, 45);
        assert!(!session.timer_running);
    }

    #[test]
    fn reset_game_targets_the_current_duration() {
        let mut session = Session::new("alpha", 60);
        session = session.apply(&SessionAction::TimerSetDuration { seconds: 30 });
        session = session.apply(&SessionAction::ResetGame);
        assert_eq!(session.remaining, 30);
    }

    #[test]
    fn unknown_action_is_a_no_op() {
        let session = Session::new("alpha", 60);
        let next = session.apply(&SessionAction::Unknown);
        assert_eq!(next, session);
    }

    #[test]
    fn tick_counts_down_and_self_stops_at_zero() {
        let mut session = Session::new("alpha", 2);
        session = session.apply(&SessionAction::TimerStart);

        session = session.tick();
        assert_eq!(session.remaining, 1);
        assert!(session.timer_running);

        session = session.tick();
        assert_eq!(session.remaining, 0);
        assert!(!session.timer_running);
    }

    #[test]
    fn tick_on_stopped_session_changes_nothing() {
        let session = Session::new("alpha", 10);
        assert_eq!(session.tick(), session);

        let mut exhausted = Session::new("beta", 0);
        exhausted = exhausted.apply(&SessionAction::TimerStart);
        let ticked = exhausted.tick();
        assert_eq!(ticked.remaining, 0);
        assert!(!ticked.timer_running);
    }

    #[test]
    fn action_wire_tags_round_trip() {
        let parsed: SessionAction =
            serde_json::from_str(r#"{"type":"SCORE_BLUE","amount":-2}"#).unwrap();
        assert_eq!(parsed, SessionAction::ScoreBlue { amount: -2 });

        let parsed: SessionAction =
            serde_json::from_str(r#"{"type":"TIMER_SET_DURATION","seconds":120}"#).unwrap();
        assert_eq!(parsed, SessionAction::TimerSetDuration { seconds: 120 });

        let parsed: SessionAction = serde_json::from_str(r#"{"type":"TIMER_START"}"#).unwrap();
        assert_eq!(parsed, SessionAction::TimerStart);
    }

    #[test]
    fn unrecognized_wire_tag_parses_to_unknown() {
        let parsed: SessionAction =
            serde_json::from_str(r#"{"type":"LASER_SHOW","intensity":11}"#).unwrap();
        assert_eq!(parsed, SessionAction::Unknown);
    }
}
