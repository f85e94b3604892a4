use crate::Token;

/// Number of cells of the shared loop.
pub const BOARD_SIZE: u8 = 52;
pub const HOME_STRETCH_SIZE: u8 = 4;
/// The last cell of every home stretch.
pub const HOME_STRETCH_END: u8 = BOARD_SIZE + HOME_STRETCH_SIZE;
/// Where a token ends up when it walks off the end of its home stretch.
pub const FINISH_POSITION: u8 = HOME_STRETCH_END + 1;
pub const TOKENS_PER_PLAYER: usize = 4;

/// How many cells a token walks on the main track, counted from its start
/// cell, before turning into its home stretch.
const HOME_ENTRY_DISTANCE: u8 = BOARD_SIZE - 1;

/// Cells where a token cannot be captured.
pub const SAFE_POSITIONS: [u8; 8] = [1, 9, 14, 22, 27, 35, 40, 48];

const START_POSITIONS: [u8; 4] = [1, 14, 27, 40];

/// Each color owns two safe cells. Neighbouring colors share one.
const OWNED_SAFE_SPOTS: [[u8; 2]; 4] = [[1, 14], [14, 27], [27, 40], [40, 1]];

/// The cell where the tokens of this seat enter the board.
pub fn start_position(player_id: usize) -> u8 {
    START_POSITIONS.get(player_id).copied().unwrap_or(START_POSITIONS[0])
}

pub fn is_safe_position(position: u8) -> bool {
    SAFE_POSITIONS.contains(&position)
}

pub fn owned_safe_spots(player_id: usize) -> &'static [u8] {
    OWNED_SAFE_SPOTS.get(player_id).map_or(&[], |spots| spots.as_slice())
}

/// The cell on which the token's home stretch branches off.
pub fn home_entry_position(player_id: usize) -> u8 {
    start_position(player_id) + HOME_ENTRY_DISTANCE
}

/// Computes where `token` lands when moved by `move_value` cells.
///
/// The home stretch is entered after 51 cells walked from the seat's own start
/// cell, not when the raw position passes 51. For seat 0 both agree, the other
/// seats only get home this way: seat 1 on cell 10 moving 3 lands on 53.
///
/// A token at home always lands on its start cell, whatever the roll. Whether
/// it may leave home at all is decided by [`can_move()`](crate::can_move).
///
/// The result may lie beyond [`FINISH_POSITION`]; such moves are rejected by
/// [`is_valid_move()`](crate::is_valid_move).
pub fn new_position(token: &Token, move_value: u8, player_id: usize) -> u8 {
    if token.is_home {
        return start_position(player_id);
    }

    let current = token.position;
    if current > BOARD_SIZE {
        // Already in the home stretch, there is no wrapping any more.
        return current + move_value;
    }

    // Distance walked since the start cell. The home entry lies
    // HOME_ENTRY_DISTANCE cells after the start, which for seats other than
    // the first is on the far side of the wrap.
    let walked = (current + BOARD_SIZE - start_position(player_id)) % BOARD_SIZE;
    let new_pos = current + move_value;
    if walked + move_value >= HOME_ENTRY_DISTANCE {
        let overflow = walked + move_value - HOME_ENTRY_DISTANCE;
        BOARD_SIZE + overflow + 1
    } else if new_pos <= BOARD_SIZE {
        new_pos
    } else {
        new_pos - BOARD_SIZE
    }
}
