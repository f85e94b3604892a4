use crate::{GameState, BOARD_SIZE, SAFE_POSITIONS};

/// Renders the occupied cells and the per-player token counts as text.
///
/// Tokens are written as `<seat><token>`, e.g. `2.3` for token 3 of the second
/// player. Safe cells are marked with `*`.
pub fn visualize_board(state: &GameState) -> String {
    let mut result = String::from("Track:");
    let all_tokens = state.all_tokens();
    let mut any_on_track = false;
    for cell in 1..=BOARD_SIZE {
        let occupants: Vec<String> = all_tokens
            .iter()
            .filter(|t| t.is_on_main_track() && t.position == cell)
            .map(|t| format!("{}.{}", t.player_id + 1, t.id))
            .collect();
        if occupants.is_empty() {
            continue;
        }
        any_on_track = true;
        let marker = if SAFE_POSITIONS.contains(&cell) { "*" } else { "" };
        result += &format!(" [{}{}: {}]", cell, marker, occupants.join(" "));
    }
    if !any_on_track {
        result += " empty";
    }

    for player in &state.players {
        let stretch: Vec<String> = player
            .tokens
            .iter()
            .filter(|t| t.is_on_track() && !t.is_on_main_track())
            .map(|t| format!("{}@{}", t.id, t.position - BOARD_SIZE))
            .collect();
        result += &format!(
            "\n{} {:<9} home {} | playing {} | finished {}",
            if player.is_active { ">" } else { " " },
            player.name,
            player.tokens_at_home(),
            player.tokens_playing(),
            player.tokens_finished(),
        );
        if !stretch.is_empty() {
            result += &format!(" | home stretch {}", stretch.join(" "));
        }
    }
    result
}
