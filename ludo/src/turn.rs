use serde::Serialize;
use tracing::{debug, info};

use crate::{
    available_moves, can_move, captures_at, mandatory_capture_move, new_position, resolve_move,
    DiceRoll, DiceRoller, GamePhase, GameSettings, GameState, IllegalMove, InvalidMoveReason,
    InvalidSettings, InvalidState, MandatoryCapture, Move, Player, Token, TokenRef,
};

/// After this many sixes in a row, a six no longer earns another roll
/// unless [`three_sixes_extra_turn`](crate::CustomRules::three_sixes_extra_turn) is set.
const MAX_SIXES_IN_A_ROW: u8 = 3;

/// What the controller is waiting for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TurnPhase {
    AwaitingRoll,
    /// The current player has to pick one of these moves.
    AwaitingMove { moves: Vec<Move> },
    /// Only this capture may be played. If the player does not act, the
    /// caller reports [`TurnController::accept_mandatory_capture_timeout()`].
    MandatoryCapture(MandatoryCapture),
    /// The roll allows no move. The caller reports the end of the grace
    /// period with [`TurnController::advance_without_move()`].
    NoLegalMoves,
    GameOver { winner: usize },
}

/// Who rolls next after a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextTurn {
    /// The same player rolls again.
    ExtraTurn,
    NextPlayer(usize),
    GameWon { winner: usize },
}

/// Summarizes the outcome of an action that ended a move or a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Moved {
        token: TokenRef,
        from: u8,
        to: u8,
        finished: bool,
        captured: Vec<TokenRef>,
        next: NextTurn,
    },
    /// A mandatory capture was not played, and the token was sent home.
    Penalty { token: TokenRef, next_player: usize },
    /// The roll allowed no move.
    Passed { next_player: usize },
}

/// The turn state machine, and the only owner of the [`GameState`].
///
/// Every action either succeeds and returns what happened, or fails with an
/// [`IllegalMove`] and leaves the state as it was. There are no timers: the
/// two waits that the UI bounds in time are ended by explicit calls.
pub struct TurnController<D> {
    state: GameState,
    phase: TurnPhase,
    dice: D,
    sixes_in_a_row: u8,
}

impl<D> TurnController<D> {
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    /// The legal moves for the current roll.
    pub fn available_moves(&self) -> &[Move] {
        match &self.phase {
            TurnPhase::AwaitingMove { moves } => moves,
            _ => &[],
        }
    }

    /// The moves a renderer should highlight, which is none at all if
    /// [`show_available_moves`](crate::CustomRules::show_available_moves) is off.
    pub fn highlighted_moves(&self) -> &[Move] {
        if self.state.settings.custom_rules.show_available_moves {
            self.available_moves()
        } else {
            &[]
        }
    }

    pub fn pending_mandatory_capture(&self) -> Option<&MandatoryCapture> {
        match &self.phase {
            TurnPhase::MandatoryCapture(capture) => Some(capture),
            _ => None,
        }
    }

    pub fn winner(&self) -> Option<&Player> {
        self.state.winner.map(|idx| &self.state.players[idx])
    }
}

impl<D: DiceRoller> TurnController<D> {
    pub fn new(settings: GameSettings, dice: D) -> Result<Self, InvalidSettings> {
        Ok(Self::with_state(GameState::new(settings)?, dice))
    }

    /// Continues from an existing position, with the current player about to roll.
    ///
    /// The state is checked first, since it may come from a snapshot.
    pub fn from_state(mut state: GameState, dice: D) -> Result<Self, InvalidState> {
        state.settings.validate()?;
        let expected = state.settings.number_of_players;
        let found = state.players.len();
        if found != usize::from(expected) {
            return Err(InvalidState::PlayerCount { expected, found });
        }
        if state.current_player_index >= found {
            return Err(InvalidState::CurrentPlayerOutOfRange(state.current_player_index));
        }
        match state.winner {
            Some(winner) if winner >= found => return Err(InvalidState::WinnerOutOfRange(winner)),
            Some(winner) if !state.is_finished() || !state.players[winner].has_won() => {
                return Err(InvalidState::WinnerMismatch)
            }
            None if state.is_finished() || state.players.iter().any(Player::has_won) => {
                return Err(InvalidState::WinnerMismatch)
            }
            _ => {}
        }
        if !state.is_consistent() {
            return Err(InvalidState::Inconsistent);
        }
        state.last_roll = None;
        Ok(Self::with_state(state, dice))
    }

    fn with_state(state: GameState, dice: D) -> Self {
        let phase = match state.winner {
            Some(winner) => TurnPhase::GameOver { winner },
            None => TurnPhase::AwaitingRoll,
        };
        Self {
            state,
            phase,
            dice,
            sixes_in_a_row: 0,
        }
    }

    /// Rolls the dice for the current player and works out what may be played.
    pub fn request_roll(&mut self) -> Result<DiceRoll, IllegalMove> {
        self.ensure_running()?;
        if self.phase != TurnPhase::AwaitingRoll {
            return Err(IllegalMove::RollPending);
        }
        let roll = self.dice.roll(self.state.settings.number_of_dice);
        debug!(player = self.state.current_player_index, %roll, "Rolled");

        self.sixes_in_a_row = if roll.contains_six() {
            self.sixes_in_a_row.saturating_add(1)
        } else {
            0
        };
        self.state.last_roll = Some(roll);
        self.phase = self.phase_after_roll(&roll);
        Ok(roll)
    }

    fn phase_after_roll(&self, roll: &DiceRoll) -> TurnPhase {
        let settings = &self.state.settings;
        let player = self.state.current_player();
        let all_tokens = self.state.all_tokens();

        if let Some(capture) = mandatory_capture_move(player, roll, &all_tokens, settings) {
            debug!(token = %capture.token, target = %capture.capture_target, "Capture is mandatory");
            return TurnPhase::MandatoryCapture(capture);
        }

        // Moves that would overshoot the finish are dropped here, so that a
        // roll which only allows such moves passes the turn.
        let moves: Vec<Move> = available_moves(player, roll, settings, &all_tokens)
            .into_iter()
            .filter(|mv| {
                all_tokens
                    .iter()
                    .find(|t| t.token_ref() == mv.token)
                    .is_some_and(|t| {
                        t.is_home || resolve_move(t, mv.move_value, settings).is_ok()
                    })
            })
            .collect();
        if moves.is_empty() {
            debug!(player = player.id, "No legal moves");
            TurnPhase::NoLegalMoves
        } else {
            TurnPhase::AwaitingMove { moves }
        }
    }

    /// Picks which die to use in choice mode.
    pub fn select_die(&mut self, value: u8) -> Result<(), IllegalMove> {
        self.ensure_running()?;
        let roll = self.state.last_roll.ok_or(IllegalMove::NoRoll)?;
        let selectable = self.state.settings.uses_dice_separately()
            && matches!(self.phase, TurnPhase::AwaitingMove { .. });
        let selected = roll
            .select(value)
            .filter(|_| selectable)
            .ok_or(IllegalMove::DieNotSelectable { value })?;
        self.state.last_roll = Some(selected);
        Ok(())
    }

    /// Moves a token of the current player.
    ///
    /// With the available moves shown, the token has to be one of them. If
    /// several dice apply, the selected die wins, then the first die. With the
    /// moves hidden, the token is checked on the spot and moved by the roll's
    /// default value.
    pub fn select_move(&mut self, token_ref: TokenRef) -> Result<TurnOutcome, IllegalMove> {
        self.ensure_running()?;
        if let Some(&capture) = self.pending_mandatory_capture() {
            if capture.token != token_ref {
                return Err(IllegalMove::MandatoryCaptureViolation {
                    required: capture.token,
                    selected: token_ref,
                });
            }
            return self.apply_move(token_ref, capture.move_value);
        }
        if self.phase == TurnPhase::AwaitingRoll {
            return Err(IllegalMove::NoRoll);
        }
        let roll = self.state.last_roll.ok_or(IllegalMove::NoRoll)?;

        let token = self.lookup(token_ref)?;
        if token.player_id != self.state.current_player_index {
            return Err(IllegalMove::NotCurrentPlayersToken { token: token_ref });
        }
        let invalid = |reason| IllegalMove::InvalidMove {
            token: token_ref,
            reason,
        };

        let move_value = if self.state.settings.custom_rules.show_available_moves {
            let candidates: Vec<&Move> = self
                .available_moves()
                .iter()
                .filter(|mv| mv.token == token_ref)
                .collect();
            candidates
                .iter()
                .find(|mv| Some(mv.move_value) == roll.selected_value)
                .or_else(|| candidates.first())
                .map(|mv| mv.move_value)
                .ok_or(invalid(InvalidMoveReason::NotAnAvailableMove))?
        } else {
            let settings = &self.state.settings;
            if !can_move(&token, &roll, settings, &self.state.all_tokens()) {
                return Err(invalid(InvalidMoveReason::CannotMoveWithRoll));
            }
            roll.default_move_value(settings.dice_mode)
        };
        self.apply_move(token_ref, move_value)
    }

    /// The player did not play the mandatory capture in time: the token that
    /// should have captured goes home, and the turn ends.
    pub fn accept_mandatory_capture_timeout(&mut self) -> Result<TurnOutcome, IllegalMove> {
        self.ensure_running()?;
        let Some(&capture) = self.pending_mandatory_capture() else {
            return Err(IllegalMove::NoMandatoryCapturePending);
        };
        self.token_mut(capture.token)?.send_home();
        debug!(token = %capture.token, "Mandatory capture not played, token returned home");
        let next_player = self.end_turn();
        Ok(TurnOutcome::Penalty {
            token: capture.token,
            next_player,
        })
    }

    /// Passes the turn after a roll that allowed no move.
    pub fn advance_without_move(&mut self) -> Result<TurnOutcome, IllegalMove> {
        self.ensure_running()?;
        if self.phase != TurnPhase::NoLegalMoves {
            return Err(IllegalMove::NotAwaitingAdvance);
        }
        let next_player = self.end_turn();
        Ok(TurnOutcome::Passed { next_player })
    }

    fn apply_move(&mut self, token_ref: TokenRef, move_value: u8) -> Result<TurnOutcome, IllegalMove> {
        let roll = self.state.last_roll.ok_or(IllegalMove::NoRoll)?;
        let token = self.lookup(token_ref)?;
        // Leaving home was already allowed by can_move(), everything else has
        // to stay within the track.
        let destination = if token.is_home {
            new_position(&token, move_value, token.player_id)
        } else {
            resolve_move(&token, move_value, &self.state.settings).map_err(|reason| {
                IllegalMove::InvalidMove {
                    token: token_ref,
                    reason,
                }
            })?
        };

        let moved = {
            let t = self.token_mut(token_ref)?;
            t.place_at(destination);
            *t
        };
        let captured: Vec<TokenRef> =
            captures_at(&moved, &self.state.all_tokens(), &self.state.settings)
                .iter()
                .map(Token::token_ref)
                .collect();
        for &victim in &captured {
            self.token_mut(victim)?.send_home();
            debug!(by = %token_ref, victim = %victim, cell = destination, "Captured");
        }
        debug!(token = %token_ref, from = token.position, to = destination, "Moved");

        let next = self.next_turn(&roll, !captured.is_empty());
        debug_assert!(self.state.is_consistent());
        Ok(TurnOutcome::Moved {
            token: token_ref,
            from: token.position,
            to: destination,
            finished: moved.is_finished,
            captured,
            next,
        })
    }

    fn next_turn(&mut self, roll: &DiceRoll, captured: bool) -> NextTurn {
        let mover = self.state.current_player_index;
        if self.state.players[mover].has_won() {
            self.state.game_phase = GamePhase::Finished;
            self.state.winner = Some(mover);
            self.phase = TurnPhase::GameOver { winner: mover };
            info!(winner = %self.state.players[mover].name, "Game over");
            return NextTurn::GameWon { winner: mover };
        }

        let six_counts = self.state.settings.custom_rules.three_sixes_extra_turn
            || self.sixes_in_a_row < MAX_SIXES_IN_A_ROW;
        if (roll.contains_six() && six_counts) || captured {
            self.state.last_roll = None;
            self.phase = TurnPhase::AwaitingRoll;
            debug!(player = mover, "Extra turn");
            NextTurn::ExtraTurn
        } else {
            NextTurn::NextPlayer(self.end_turn())
        }
    }

    fn end_turn(&mut self) -> usize {
        self.state.advance_player();
        self.sixes_in_a_row = 0;
        self.phase = TurnPhase::AwaitingRoll;
        self.state.current_player_index
    }

    fn ensure_running(&self) -> Result<(), IllegalMove> {
        if self.state.is_finished() {
            Err(IllegalMove::GameOver)
        } else {
            Ok(())
        }
    }

    fn lookup(&self, token_ref: TokenRef) -> Result<Token, IllegalMove> {
        self.state
            .token(token_ref)
            .copied()
            .ok_or(IllegalMove::UnknownToken { token: token_ref })
    }

    fn token_mut(&mut self, token_ref: TokenRef) -> Result<&mut Token, IllegalMove> {
        self.state
            .token_mut(token_ref)
            .ok_or(IllegalMove::UnknownToken { token: token_ref })
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::{CustomRules, DiceMode, RandomDice, ScriptedDice, FINISH_POSITION};

    fn rules(rules: CustomRules) -> GameSettings {
        GameSettings {
            custom_rules: rules,
            ..GameSettings::default()
        }
    }

    /// A two player game with some tokens already placed.
    fn controller(
        settings: GameSettings,
        placed: &[(usize, u8, u8)],
        faces: &[u8],
    ) -> TurnController<ScriptedDice> {
        let settings = GameSettings {
            number_of_players: 2,
            ..settings
        };
        let mut state = GameState::new(settings).unwrap();
        for &(player, token, position) in placed {
            state.token_mut(TokenRef::new(player, token)).unwrap().place_at(position);
        }
        TurnController::from_state(state, ScriptedDice::new(faces.iter().copied())).unwrap()
    }

    #[test]
    fn rejects_bad_settings() {
        let settings = GameSettings {
            number_of_players: 5,
            ..GameSettings::default()
        };
        assert!(TurnController::new(settings, ScriptedDice::new([1])).is_err());
    }

    #[test]
    fn no_legal_moves_waits_for_advance() {
        let mut ctrl = TurnController::new(GameSettings::default(), ScriptedDice::new([3])).unwrap();
        assert_eq!(ctrl.request_roll(), Ok(DiceRoll::single(3)));
        assert_eq!(ctrl.phase(), &TurnPhase::NoLegalMoves);
        assert_eq!(ctrl.request_roll(), Err(IllegalMove::RollPending));
        assert!(matches!(
            ctrl.select_move(TokenRef::new(0, 1)),
            Err(IllegalMove::InvalidMove {
                reason: InvalidMoveReason::NotAnAvailableMove,
                ..
            })
        ));
        assert_eq!(ctrl.state().current_player_index, 0);

        assert_eq!(ctrl.advance_without_move(), Ok(TurnOutcome::Passed { next_player: 1 }));
        assert_eq!(ctrl.state().current_player_index, 1);
        assert!(ctrl.state().players[1].is_active && !ctrl.state().players[0].is_active);
        assert!(ctrl.state().last_roll.is_none());
        assert_eq!(ctrl.advance_without_move(), Err(IllegalMove::NotAwaitingAdvance));
    }

    #[test]
    fn six_brings_token_out_and_grants_extra_turn() {
        let mut ctrl = TurnController::new(GameSettings::default(), ScriptedDice::new([6, 2])).unwrap();
        assert_eq!(ctrl.select_move(TokenRef::new(0, 1)), Err(IllegalMove::NoRoll));
        ctrl.request_roll().unwrap();
        assert_eq!(ctrl.available_moves().len(), 4);
        let outcome = ctrl.select_move(TokenRef::new(0, 1)).unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::Moved {
                token: TokenRef::new(0, 1),
                from: 0,
                to: 1,
                finished: false,
                captured: vec![],
                next: NextTurn::ExtraTurn,
            }
        );
        assert_eq!(ctrl.state().current_player_index, 0);
        assert_eq!(ctrl.phase(), &TurnPhase::AwaitingRoll);
        assert!(ctrl.state().last_roll.is_none());

        // The next roll is a two, which moves the token and ends the turn.
        ctrl.request_roll().unwrap();
        let outcome = ctrl.select_move(TokenRef::new(0, 1)).unwrap();
        assert!(matches!(
            outcome,
            TurnOutcome::Moved { to: 3, next: NextTurn::NextPlayer(1), .. }
        ));
    }

    #[test]
    fn cannot_move_other_players_tokens() {
        let mut ctrl = controller(GameSettings::default(), &[(1, 1, 20)], &[6]);
        ctrl.request_roll().unwrap();
        let before = ctrl.state().clone();
        assert_eq!(
            ctrl.select_move(TokenRef::new(1, 1)),
            Err(IllegalMove::NotCurrentPlayersToken { token: TokenRef::new(1, 1) })
        );
        assert_eq!(
            ctrl.select_move(TokenRef::new(0, 9)),
            Err(IllegalMove::UnknownToken { token: TokenRef::new(0, 9) })
        );
        assert_eq!(ctrl.state(), &before);
    }

    #[test]
    fn capture_sends_victim_home_and_grants_extra_turn() {
        let mut ctrl = controller(GameSettings::default(), &[(0, 1, 10), (1, 1, 13)], &[3]);
        ctrl.request_roll().unwrap();
        let outcome = ctrl.select_move(TokenRef::new(0, 1)).unwrap();
        assert!(matches!(
            outcome,
            TurnOutcome::Moved { ref captured, next: NextTurn::ExtraTurn, .. }
                if captured == &vec![TokenRef::new(1, 1)]
        ));
        let victim = ctrl.state().token(TokenRef::new(1, 1)).unwrap();
        assert_eq!((victim.position, victim.is_home, victim.is_finished), (0, true, false));
        assert_eq!(ctrl.state().current_player_index, 0);
    }

    #[test]
    fn no_capture_on_safe_spot() {
        let mut ctrl = controller(GameSettings::default(), &[(0, 1, 10), (1, 1, 14)], &[4]);
        ctrl.request_roll().unwrap();
        let outcome = ctrl.select_move(TokenRef::new(0, 1)).unwrap();
        assert!(matches!(
            outcome,
            TurnOutcome::Moved { ref captured, next: NextTurn::NextPlayer(1), .. }
                if captured.is_empty()
        ));
        assert_eq!(ctrl.state().token(TokenRef::new(1, 1)).unwrap().position, 14);
    }

    fn mandatory_setup() -> TurnController<ScriptedDice> {
        let settings = rules(CustomRules {
            mandatory_capture: true,
            ..CustomRules::default()
        });
        controller(settings, &[(0, 1, 5), (0, 2, 16), (1, 4, 20)], &[4])
    }

    #[test]
    fn mandatory_capture_rejects_other_tokens() {
        let mut ctrl = mandatory_setup();
        ctrl.request_roll().unwrap();
        let expected = MandatoryCapture {
            token: TokenRef::new(0, 2),
            capture_target: TokenRef::new(1, 4),
            move_value: 4,
        };
        assert_eq!(ctrl.pending_mandatory_capture(), Some(&expected));
        assert!(ctrl.available_moves().is_empty());

        let before = ctrl.state().clone();
        assert_eq!(
            ctrl.select_move(TokenRef::new(0, 1)),
            Err(IllegalMove::MandatoryCaptureViolation {
                required: TokenRef::new(0, 2),
                selected: TokenRef::new(0, 1),
            })
        );
        assert_eq!(ctrl.state(), &before);

        let outcome = ctrl.select_move(TokenRef::new(0, 2)).unwrap();
        assert!(matches!(
            outcome,
            TurnOutcome::Moved { to: 20, next: NextTurn::ExtraTurn, .. }
        ));
        assert!(ctrl.state().token(TokenRef::new(1, 4)).unwrap().is_home);
    }

    #[test]
    fn mandatory_capture_timeout_is_penalized() {
        let mut ctrl = mandatory_setup();
        assert_eq!(
            ctrl.accept_mandatory_capture_timeout(),
            Err(IllegalMove::NoMandatoryCapturePending)
        );
        ctrl.request_roll().unwrap();
        assert_eq!(
            ctrl.accept_mandatory_capture_timeout(),
            Ok(TurnOutcome::Penalty {
                token: TokenRef::new(0, 2),
                next_player: 1,
            })
        );
        let penalized = ctrl.state().token(TokenRef::new(0, 2)).unwrap();
        assert!(penalized.is_home && penalized.position == 0);
        assert_eq!(ctrl.state().token(TokenRef::new(1, 4)).unwrap().position, 20);
        assert_eq!(ctrl.state().current_player_index, 1);
        assert!(ctrl.pending_mandatory_capture().is_none());
    }

    #[test]
    fn finishing_last_token_wins() {
        let placed = [(0, 1, 57), (0, 2, 57), (0, 3, 57), (0, 4, 54)];
        let mut ctrl = controller(GameSettings::default(), &placed, &[3]);
        ctrl.request_roll().unwrap();
        let outcome = ctrl.select_move(TokenRef::new(0, 4)).unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::Moved {
                token: TokenRef::new(0, 4),
                from: 54,
                to: FINISH_POSITION,
                finished: true,
                captured: vec![],
                next: NextTurn::GameWon { winner: 0 },
            }
        );
        assert_eq!(ctrl.state().game_phase, GamePhase::Finished);
        assert_eq!(ctrl.winner().map(|p| p.name.as_str()), Some("Player 1"));
        assert_eq!(ctrl.phase(), &TurnPhase::GameOver { winner: 0 });
        assert_eq!(ctrl.request_roll(), Err(IllegalMove::GameOver));
        assert_eq!(ctrl.select_move(TokenRef::new(0, 4)), Err(IllegalMove::GameOver));
    }

    #[test]
    fn overshooting_moves_are_not_offered() {
        let mut ctrl = controller(GameSettings::default(), &[(0, 1, 55)], &[5]);
        ctrl.request_roll().unwrap();
        assert_eq!(ctrl.phase(), &TurnPhase::NoLegalMoves);
    }

    #[test]
    fn third_six_in_a_row_ends_turn_without_rule() {
        let cases = [
            (false, NextTurn::NextPlayer(1)),
            (true, NextTurn::ExtraTurn),
        ];
        for (three_sixes_extra_turn, expected) in cases {
            let settings = rules(CustomRules {
                three_sixes_extra_turn,
                ..CustomRules::default()
            });
            let mut ctrl = controller(settings, &[(0, 1, 2)], &[6]);
            let mut last = None;
            for _ in 0..3 {
                ctrl.request_roll().unwrap();
                if let Ok(TurnOutcome::Moved { next, .. }) = ctrl.select_move(TokenRef::new(0, 1)) {
                    last = Some(next);
                }
            }
            assert_eq!(last, Some(expected));
            assert_eq!(ctrl.state().token(TokenRef::new(0, 1)).unwrap().position, 20);
        }
    }

    #[test]
    fn hidden_moves_are_validated_on_selection() {
        let settings = rules(CustomRules {
            show_available_moves: false,
            ..CustomRules::default()
        });
        let mut ctrl = controller(settings, &[(0, 1, 30)], &[4]);
        ctrl.request_roll().unwrap();
        assert_eq!(ctrl.available_moves().len(), 1);
        assert!(ctrl.highlighted_moves().is_empty());
        assert!(matches!(
            ctrl.select_move(TokenRef::new(0, 2)),
            Err(IllegalMove::InvalidMove {
                reason: InvalidMoveReason::CannotMoveWithRoll,
                ..
            })
        ));
        assert!(matches!(
            ctrl.select_move(TokenRef::new(0, 1)),
            Ok(TurnOutcome::Moved { to: 34, .. })
        ));
    }

    #[test]
    fn choice_mode_uses_selected_die() {
        let settings = GameSettings {
            number_of_dice: crate::DiceCount::Two,
            dice_mode: DiceMode::Choice,
            ..GameSettings::default()
        };
        let mut ctrl = controller(settings, &[(0, 1, 10)], &[6, 2]);
        assert_eq!(ctrl.select_die(2), Err(IllegalMove::NoRoll));
        assert_eq!(ctrl.request_roll(), Ok(DiceRoll::double(6, 2)));
        assert_eq!(ctrl.select_die(4), Err(IllegalMove::DieNotSelectable { value: 4 }));
        ctrl.select_die(2).unwrap();
        assert_eq!(ctrl.state().last_roll.unwrap().selected_value, Some(2));
        let outcome = ctrl.select_move(TokenRef::new(0, 1)).unwrap();
        // The other die showed a six, so the player rolls again.
        assert!(matches!(
            outcome,
            TurnOutcome::Moved { from: 10, to: 12, next: NextTurn::ExtraTurn, .. }
        ));
    }

    #[test]
    fn sum_mode_cannot_select_die() {
        let settings = GameSettings {
            number_of_dice: crate::DiceCount::Two,
            ..GameSettings::default()
        };
        let mut ctrl = controller(settings, &[(0, 1, 10)], &[3, 2]);
        ctrl.request_roll().unwrap();
        assert_eq!(ctrl.select_die(3), Err(IllegalMove::DieNotSelectable { value: 3 }));
        assert!(matches!(
            ctrl.select_move(TokenRef::new(0, 1)),
            Ok(TurnOutcome::Moved { to: 15, .. })
        ));
    }

    #[test]
    fn summed_dice_always_finish_the_last_token() {
        let settings = GameSettings {
            number_of_dice: crate::DiceCount::Two,
            ..GameSettings::default()
        };
        let placed = [(0, 1, 57), (0, 2, 57), (0, 3, 57), (0, 4, 56)];
        for dice1 in 1..=6 {
            for dice2 in 1..=6 {
                let mut ctrl = controller(settings, &placed, &[dice1, dice2]);
                ctrl.request_roll().unwrap();
                assert!(matches!(ctrl.phase(), TurnPhase::AwaitingMove { .. }));
                assert!(matches!(
                    ctrl.select_move(TokenRef::new(0, 4)),
                    Ok(TurnOutcome::Moved {
                        to: FINISH_POSITION,
                        finished: true,
                        next: NextTurn::GameWon { winner: 0 },
                        ..
                    })
                ));
                assert!(ctrl.state().is_consistent());
            }
        }
    }

    #[test]
    fn from_state_rejects_broken_snapshots() {
        let settings = GameSettings {
            number_of_players: 2,
            ..GameSettings::default()
        };
        let fresh = GameState::new(settings).unwrap();
        let dice = || ScriptedDice::new([6]);

        let mut state = fresh.clone();
        state.current_player_index = 7;
        assert_eq!(
            TurnController::from_state(state, dice()).err(),
            Some(InvalidState::CurrentPlayerOutOfRange(7))
        );

        let mut state = fresh.clone();
        state.winner = Some(4);
        assert_eq!(
            TurnController::from_state(state, dice()).err(),
            Some(InvalidState::WinnerOutOfRange(4))
        );

        let mut state = fresh.clone();
        state.winner = Some(1);
        state.game_phase = GamePhase::Finished;
        assert_eq!(
            TurnController::from_state(state, dice()).err(),
            Some(InvalidState::WinnerMismatch)
        );

        let mut state = fresh.clone();
        state.players[1].is_active = true;
        assert_eq!(
            TurnController::from_state(state, dice()).err(),
            Some(InvalidState::Inconsistent)
        );

        let mut state = fresh.clone();
        state.players[0].tokens[2].is_home = false;
        assert_eq!(
            TurnController::from_state(state, dice()).err(),
            Some(InvalidState::Inconsistent)
        );

        let mut state = fresh.clone();
        state.players.pop();
        assert_eq!(
            TurnController::from_state(state, dice()).err(),
            Some(InvalidState::PlayerCount {
                expected: 2,
                found: 1
            })
        );

        let mut state = fresh.clone();
        state.settings.number_of_players = 9;
        assert_eq!(
            TurnController::from_state(state, dice()).err(),
            Some(InvalidState::Settings(InvalidSettings::PlayerCount(9)))
        );

        let mut ctrl = TurnController::from_state(fresh, dice()).unwrap();
        assert_eq!(ctrl.request_roll(), Ok(DiceRoll::single(6)));
    }

    #[test]
    fn from_state_resumes_a_finished_game() {
        let settings = GameSettings {
            number_of_players: 2,
            ..GameSettings::default()
        };
        let mut state = GameState::new(settings).unwrap();
        for token in &mut state.players[1].tokens {
            token.place_at(FINISH_POSITION);
        }
        state.game_phase = GamePhase::Finished;
        state.winner = Some(1);
        let mut ctrl = TurnController::from_state(state, ScriptedDice::new([6])).unwrap();
        assert_eq!(ctrl.phase(), &TurnPhase::GameOver { winner: 1 });
        assert_eq!(ctrl.request_roll(), Err(IllegalMove::GameOver));
    }

    quickcheck! {
        fn invariants_hold_during_random_games(settings: GameSettings, seed: u64) -> bool {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut ctrl = TurnController::new(settings, RandomDice::from_seed(seed)).unwrap();
            for _ in 0..2000 {
                let result = match ctrl.phase().clone() {
                    TurnPhase::AwaitingRoll => ctrl.request_roll().map(|_| ()),
                    TurnPhase::AwaitingMove { moves } => {
                        let mv = moves[rng.gen_range(0..moves.len())];
                        if settings.uses_dice_separately() && ctrl.select_die(mv.move_value).is_err() {
                            return false;
                        }
                        ctrl.select_move(mv.token).map(|_| ())
                    }
                    TurnPhase::MandatoryCapture(capture) => {
                        if rng.gen_bool(0.8) {
                            ctrl.select_move(capture.token).map(|_| ())
                        } else {
                            ctrl.accept_mandatory_capture_timeout().map(|_| ())
                        }
                    }
                    TurnPhase::NoLegalMoves => ctrl.advance_without_move().map(|_| ()),
                    TurnPhase::GameOver { winner } => {
                        return ctrl.state().players[winner].has_won()
                            && ctrl.request_roll() == Err(IllegalMove::GameOver);
                    }
                };
                if result.is_err() || !ctrl.state().is_consistent() {
                    return false;
                }
            }
            true
        }
    }
}
