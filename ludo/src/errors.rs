use crate::{InvalidSettings, TokenRef};

/// Why a single token cannot make the requested move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidMoveReason {
    TokenFinished,
    TokenNotOnTrack,
    OvershootsFinish { destination: u8 },
    CannotMoveWithRoll,
    NotAnAvailableMove,
}

impl std::error::Error for InvalidMoveReason {}

impl std::fmt::Display for InvalidMoveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidMoveReason::TokenFinished => write!(f, "The token has already finished"),
            InvalidMoveReason::TokenNotOnTrack => {
                write!(f, "The token has not entered the board yet")
            }
            InvalidMoveReason::OvershootsFinish { destination } => write!(
                f,
                "The move would end on {}, which is beyond the finish",
                destination
            ),
            InvalidMoveReason::CannotMoveWithRoll => {
                write!(f, "This token cannot be moved with the current roll")
            }
            InvalidMoveReason::NotAnAvailableMove => {
                write!(f, "This token is not among the available moves")
            }
        }
    }
}

/// The error type for actions on the [`TurnController`](crate::TurnController).
///
/// An illegal action never changes the game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IllegalMove {
    GameOver,
    /// A roll was requested while the previous one is still unused.
    RollPending,
    /// A token was selected before rolling.
    NoRoll,
    /// A die value was selected that was not rolled, or outside choice mode.
    DieNotSelectable { value: u8 },
    UnknownToken { token: TokenRef },
    NotCurrentPlayersToken { token: TokenRef },
    InvalidMove {
        token: TokenRef,
        reason: InvalidMoveReason,
    },
    MandatoryCaptureViolation {
        required: TokenRef,
        selected: TokenRef,
    },
    NoMandatoryCapturePending,
    /// The turn can only be passed on when the roll left no legal move.
    NotAwaitingAdvance,
}

impl std::error::Error for IllegalMove {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IllegalMove::InvalidMove { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::GameOver => write!(f, "The game is already over"),
            IllegalMove::RollPending => write!(f, "The dice were already rolled for this turn"),
            IllegalMove::NoRoll => write!(f, "Roll the dice before moving"),
            IllegalMove::DieNotSelectable { value } => {
                write!(f, "A die showing {} cannot be selected", value)
            }
            IllegalMove::UnknownToken { token } => write!(f, "There is no {}", token),
            IllegalMove::NotCurrentPlayersToken { token } => {
                write!(f, "It is not the turn of the owner of {}", token)
            }
            IllegalMove::InvalidMove { token, .. } => write!(f, "Invalid move with {}", token),
            IllegalMove::MandatoryCaptureViolation { required, selected } => write!(
                f,
                "A capture is mandatory: {} has to move, not {}",
                required, selected
            ),
            IllegalMove::NoMandatoryCapturePending => {
                write!(f, "There is no mandatory capture to forfeit")
            }
            IllegalMove::NotAwaitingAdvance => {
                write!(f, "The turn cannot be passed while a move is possible")
            }
        }
    }
}

/// The error type for [`TurnController::from_state()`](crate::TurnController::from_state).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidState {
    Settings(InvalidSettings),
    /// The number of players differs from the settings.
    PlayerCount { expected: u8, found: usize },
    CurrentPlayerOutOfRange(usize),
    WinnerOutOfRange(usize),
    /// The winner, the game phase and the finished tokens disagree.
    WinnerMismatch,
    /// A token or the active flags break the state invariants.
    Inconsistent,
}

impl From<InvalidSettings> for InvalidState {
    fn from(err: InvalidSettings) -> Self {
        InvalidState::Settings(err)
    }
}

impl std::error::Error for InvalidState {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InvalidState::Settings(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvalidState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidState::Settings(_) => write!(f, "The game settings are invalid"),
            InvalidState::PlayerCount { expected, found } => write!(
                f,
                "The settings ask for {} players, but the state has {}",
                expected, found
            ),
            InvalidState::CurrentPlayerOutOfRange(idx) => {
                write!(f, "There is no player with index {} to take the turn", idx)
            }
            InvalidState::WinnerOutOfRange(idx) => {
                write!(f, "The winner index {} does not name a player", idx)
            }
            InvalidState::WinnerMismatch => {
                write!(f, "The winner does not match the finished tokens")
            }
            InvalidState::Inconsistent => write!(f, "The tokens or active players are inconsistent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn invalid_move_chains_reason() {
        let err = IllegalMove::InvalidMove {
            token: TokenRef::new(1, 3),
            reason: InvalidMoveReason::OvershootsFinish { destination: 59 },
        };
        assert_eq!(err.to_string(), "Invalid move with token 3 of player 2");
        assert_eq!(
            err.source().map(|e| e.to_string()),
            Some(String::from("The move would end on 59, which is beyond the finish"))
        );
        assert!(IllegalMove::GameOver.source().is_none());
    }
}
