use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    is_safe_position, new_position, owned_safe_spots, DiceCount, DiceMode, DiceRoll,
    GameSettings, InvalidMoveReason, Player, Token, TokenRef, FINISH_POSITION,
};

/// A candidate move: which token, and by how many cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub token: TokenRef,
    pub move_value: u8,
}

/// Whether `token` may be moved with this roll.
///
/// The distance is the roll's [default move value](DiceRoll::default_move_value).
pub fn can_move(
    token: &Token,
    roll: &DiceRoll,
    settings: &GameSettings,
    all_tokens: &[Token],
) -> bool {
    let move_value = roll.default_move_value(settings.dice_mode);
    can_move_by(token, roll, move_value, settings, all_tokens)
}

fn can_move_by(
    token: &Token,
    roll: &DiceRoll,
    move_value: u8,
    settings: &GameSettings,
    all_tokens: &[Token],
) -> bool {
    if token.is_finished {
        return false;
    }
    if token.is_home {
        return !settings.custom_rules.must_roll_six_to_start || roll.contains_six();
    }
    if settings.custom_rules.block_other_color_safe_spots {
        let destination = new_position(token, move_value, token.player_id);
        if is_destination_blocked(destination, token.player_id, all_tokens) {
            return false;
        }
    }
    true
}

/// A safe cell that belongs to another color is blocked while an opponent
/// stands on it.
pub fn is_destination_blocked(position: u8, player_id: usize, all_tokens: &[Token]) -> bool {
    if !is_safe_position(position) || owned_safe_spots(player_id).contains(&position) {
        return false;
    }
    all_tokens
        .iter()
        .any(|t| t.player_id != player_id && t.is_on_main_track() && t.position == position)
}

/// Checks that a token already on the track can walk `move_value` cells
/// without overshooting the finish, and returns its destination.
pub fn check_move(token: &Token, move_value: u8) -> Result<u8, InvalidMoveReason> {
    if token.is_finished {
        return Err(InvalidMoveReason::TokenFinished);
    }
    if token.is_home {
        return Err(InvalidMoveReason::TokenNotOnTrack);
    }
    let destination = new_position(token, move_value, token.player_id);
    if destination > FINISH_POSITION {
        return Err(InvalidMoveReason::OvershootsFinish { destination });
    }
    Ok(destination)
}

pub fn is_valid_move(token: &Token, move_value: u8) -> bool {
    check_move(token, move_value).is_ok()
}

/// The destination of a move as the turn controller applies it.
///
/// Finishing is exact, except when two dice are added up: a sum is never
/// below 2, so a move past the end of the home stretch finishes there.
pub fn resolve_move(
    token: &Token,
    move_value: u8,
    settings: &GameSettings,
) -> Result<u8, InvalidMoveReason> {
    match check_move(token, move_value) {
        Err(InvalidMoveReason::OvershootsFinish { .. }) if sums_dice(settings) => {
            Ok(FINISH_POSITION)
        }
        result => result,
    }
}

fn sums_dice(settings: &GameSettings) -> bool {
    settings.number_of_dice == DiceCount::Two && settings.dice_mode == DiceMode::Sum
}

/// Lists every legal move, in token order and then die order.
pub fn available_moves(
    player: &Player,
    roll: &DiceRoll,
    settings: &GameSettings,
    all_tokens: &[Token],
) -> Vec<Move> {
    let mut moves = Vec::new();
    match (roll.dice2, settings.dice_mode) {
        (Some(_), DiceMode::Sum) => {
            for token in &player.tokens {
                if can_move_by(token, roll, roll.total, settings, all_tokens) {
                    moves.push(Move {
                        token: token.token_ref(),
                        move_value: roll.total,
                    });
                }
            }
        }
        (Some(dice2), DiceMode::Choice | DiceMode::Both) => {
            // Each die is checked on its own, so only a die showing a six
            // can bring a token out.
            for token in &player.tokens {
                for value in [roll.dice1, dice2] {
                    if can_move_by(token, &DiceRoll::single(value), value, settings, all_tokens) {
                        moves.push(Move {
                            token: token.token_ref(),
                            move_value: value,
                        });
                    }
                }
            }
        }
        (None, _) => {
            for token in &player.tokens {
                if can_move_by(token, roll, roll.dice1, settings, all_tokens) {
                    moves.push(Move {
                        token: token.token_ref(),
                        move_value: roll.dice1,
                    });
                }
            }
        }
    }
    trace!(player = player.id, %roll, num_moves = moves.len(), "Enumerated moves");
    moves
}
