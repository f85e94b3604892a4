use serde::{Deserialize, Serialize};

use crate::{
    available_moves, is_safe_position, new_position, DiceRoll, GameSettings, Player, Token,
    TokenRef,
};

/// A capture that the current player is forced to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandatoryCapture {
    /// The token that has to move.
    pub token: TokenRef,
    /// An opponent token standing on the destination.
    pub capture_target: TokenRef,
    pub move_value: u8,
}

/// Whether a token of `player_id` arriving on `position` would capture `other`.
fn is_capturable(other: &Token, position: u8, player_id: usize, settings: &GameSettings) -> bool {
    other.player_id != player_id
        && other.is_on_main_track()
        && other.position == position
        && !(settings.custom_rules.safe_spots && is_safe_position(position))
}

/// The opponent tokens displaced by `moved_token` at its current position.
///
/// Home stretch cells are private to each color, so nothing is captured there.
pub fn captures_at(moved_token: &Token, all_tokens: &[Token], settings: &GameSettings) -> Vec<Token> {
    if !settings.custom_rules.capture_returns_to_start || !moved_token.is_on_main_track() {
        return Vec::new();
    }
    all_tokens
        .iter()
        .filter(|t| is_capturable(t, moved_token.position, moved_token.player_id, settings))
        .copied()
        .collect()
}

/// Finds the first available move that would capture, if captures are mandatory.
pub fn mandatory_capture_move(
    player: &Player,
    roll: &DiceRoll,
    all_tokens: &[Token],
    settings: &GameSettings,
) -> Option<MandatoryCapture> {
    if !settings.custom_rules.mandatory_capture || !settings.custom_rules.capture_returns_to_start
    {
        return None;
    }
    available_moves(player, roll, settings, all_tokens)
        .into_iter()
        .find_map(|mv| {
            let token = all_tokens.iter().find(|t| t.token_ref() == mv.token)?;
            let destination = new_position(token, mv.move_value, token.player_id);
            all_tokens
                .iter()
                .find(|other| is_capturable(other, destination, player.id, settings))
                .map(|target| MandatoryCapture {
                    token: mv.token,
                    capture_target: target.token_ref(),
                    move_value: mv.move_value,
                })
        })
}
