use serde::{Deserialize, Serialize};

use crate::{DiceRoll, GameSettings, InvalidSettings, HOME_STRETCH_END, TOKENS_PER_PLAYER};

/// Stable identifier of a token: the owner's seat and the token number (1..=4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenRef {
    pub player: usize,
    pub token: u8,
}

impl TokenRef {
    pub fn new(player: usize, token: u8) -> Self {
        Self { player, token }
    }
}

impl std::fmt::Display for TokenRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "token {} of player {}", self.token, self.player + 1)
    }
}

/// A single piece.
///
/// `position` is 0 while at home, 1..=52 on the main track, 53..=56 in the
/// home stretch, and larger than 56 once finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: u8,
    pub player_id: usize,
    pub position: u8,
    pub is_home: bool,
    pub is_finished: bool,
}

impl Token {
    pub fn new(player_id: usize, id: u8) -> Self {
        Self {
            id,
            player_id,
            position: 0,
            is_home: true,
            is_finished: false,
        }
    }

    pub fn token_ref(&self) -> TokenRef {
        TokenRef::new(self.player_id, self.id)
    }

    /// On the main track or in the home stretch.
    pub fn is_on_track(&self) -> bool {
        !self.is_home && !self.is_finished
    }

    /// Only tokens on the shared loop can meet tokens of other players.
    pub fn is_on_main_track(&self) -> bool {
        self.is_on_track() && self.position <= crate::BOARD_SIZE
    }

    pub fn send_home(&mut self) {
        self.position = 0;
        self.is_home = true;
        self.is_finished = false;
    }

    /// Moves the token to a position computed by [`new_position()`](crate::new_position).
    pub fn place_at(&mut self, position: u8) {
        self.position = position;
        self.is_home = false;
        if position > HOME_STRETCH_END {
            self.is_finished = true;
        }
    }

    pub fn is_consistent(&self) -> bool {
        let home_matches = self.is_home == (self.position == 0);
        let finished_matches = self.is_finished == (self.position > HOME_STRETCH_END);
        home_matches && finished_matches && !(self.is_home && self.is_finished)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: usize,
    pub name: String,
    /// Hex color from the selected theme.
    pub color: String,
    pub tokens: [Token; TOKENS_PER_PLAYER],
    pub is_active: bool,
}

impl Player {
    pub fn new(id: usize, name: String, color: String) -> Self {
        Self {
            id,
            name,
            color,
            tokens: std::array::from_fn(|i| Token::new(id, i as u8 + 1)),
            is_active: false,
        }
    }

    pub fn tokens_at_home(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_home).count()
    }

    pub fn tokens_playing(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_on_track()).count()
    }

    pub fn tokens_finished(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_finished).count()
    }

    pub fn has_won(&self) -> bool {
        self.tokens.iter().all(|t| t.is_finished)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Playing,
    Finished,
}

/// Everything that changes during a game.
///
/// Only the [`TurnController`](crate::TurnController) mutates it, everything
/// else gets a shared reference or a copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub players: Vec<Player>,
    pub current_player_index: usize,
    pub game_phase: GamePhase,
    pub last_roll: Option<DiceRoll>,
    pub settings: GameSettings,
    /// Index of the winning player.
    pub winner: Option<usize>,
}

impl GameState {
    /// All tokens start at home and player 0 begins.
    pub fn new(settings: GameSettings) -> Result<Self, InvalidSettings> {
        settings.validate()?;
        let colors = settings.color_theme.colors();
        let mut players: Vec<Player> = (0..settings.number_of_players as usize)
            .map(|i| Player::new(i, format!("Player {}", i + 1), String::from(colors[i])))
            .collect();
        players[0].is_active = true;

        Ok(Self {
            players,
            current_player_index: 0,
            game_phase: GamePhase::Playing,
            last_roll: None,
            settings,
            winner: None,
        })
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_index]
    }

    pub fn token(&self, token_ref: TokenRef) -> Option<&Token> {
        let idx = usize::from(token_ref.token).checked_sub(1)?;
        self.players.get(token_ref.player)?.tokens.get(idx)
    }

    pub fn token_mut(&mut self, token_ref: TokenRef) -> Option<&mut Token> {
        let idx = usize::from(token_ref.token).checked_sub(1)?;
        self.players.get_mut(token_ref.player)?.tokens.get_mut(idx)
    }

    /// A copy of every token on the board, in seat order.
    pub fn all_tokens(&self) -> Vec<Token> {
        self.players.iter().flat_map(|p| p.tokens).collect()
    }

    pub fn is_finished(&self) -> bool {
        self.game_phase == GamePhase::Finished
    }

    /// Hands the turn to the next seat and clears the roll.
    pub(crate) fn advance_player(&mut self) {
        self.current_player_index = (self.current_player_index + 1) % self.players.len();
        let current = self.current_player_index;
        for (idx, player) in self.players.iter_mut().enumerate() {
            player.is_active = idx == current;
        }
        self.last_roll = None;
    }

    /// Checks the token invariants, the seat and token numbering, and that
    /// exactly the current player is active.
    pub fn is_consistent(&self) -> bool {
        let one_active = self.players.iter().filter(|p| p.is_active).count() == 1
            && self
                .players
                .get(self.current_player_index)
                .is_some_and(|p| p.is_active);
        let numbered = self.players.iter().enumerate().all(|(idx, p)| {
            p.id == idx
                && p.tokens
                    .iter()
                    .zip(1..)
                    .all(|(t, id)| t.player_id == idx && t.id == id)
        });
        one_active
            && numbered
            && self.players.iter().all(|p| p.tokens.iter().all(Token::is_consistent))
    }
}
