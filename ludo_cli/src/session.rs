use std::io::{BufRead, Write};

use ludo::{
    visualize_board, DiceRoller, GameState, NextTurn, TokenRef, TurnController, TurnOutcome,
    TurnPhase,
};
use tracing::{debug, trace};

use crate::command::{Command, HELP};

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Won { winner: usize },
    Quit,
    EndOfInput,
}

/// Plays a game by reading commands from `input` and writing to `output`.
///
/// Returns an error only on I/O failure. Rejected commands are reported to
/// the player and the game goes on.
pub fn run_session<D: DiceRoller>(
    ctrl: &mut TurnController<D>,
    input: impl BufRead,
    output: &mut impl Write,
) -> anyhow::Result<SessionEnd> {
    writeln!(output, "{}", describe_theme(ctrl.state()))?;
    writeln!(output, "{}", visualize_board(ctrl.state()))?;
    writeln!(output, "{}", describe_phase(ctrl))?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        trace!(%line, "Received command");
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "{}", err)?;
                continue;
            }
        };

        let player = ctrl.state().current_player_index;
        let result = match command {
            Command::Roll => ctrl
                .request_roll()
                .map(|roll| format!("{} rolled {}", ctrl.state().players[player].name, roll)),
            Command::Move(token) => ctrl
                .select_move(TokenRef::new(player, token))
                .map(|outcome| describe_outcome(ctrl, &outcome)),
            Command::Die(value) => ctrl
                .select_die(value)
                .map(|()| format!("Using the die showing {}", value)),
            Command::Skip => ctrl
                .accept_mandatory_capture_timeout()
                .map(|outcome| describe_outcome(ctrl, &outcome)),
            Command::Next => ctrl
                .advance_without_move()
                .map(|outcome| describe_outcome(ctrl, &outcome)),
            Command::Board => Ok(visualize_board(ctrl.state())),
            Command::Help => Ok(String::from(HELP)),
            Command::Quit => {
                debug!("Session quit");
                return Ok(SessionEnd::Quit);
            }
        };

        match result {
            Ok(message) => writeln!(output, "{}", message)?,
            Err(err) => {
                debug!(?command, %err, "Rejected");
                write!(output, "Rejected: {}", err)?;
                let mut err_dyn = &err as &dyn std::error::Error;
                while let Some(src_err) = err_dyn.source() {
                    write!(output, ": {}", src_err)?;
                    err_dyn = src_err;
                }
                writeln!(output)?;
            }
        }

        if let TurnPhase::GameOver { winner } = ctrl.phase() {
            writeln!(output, "{}", visualize_board(ctrl.state()))?;
            writeln!(output, "{} wins!", ctrl.state().players[*winner].name)?;
            return Ok(SessionEnd::Won { winner: *winner });
        }
        writeln!(output, "{}", describe_phase(ctrl))?;
    }
    Ok(SessionEnd::EndOfInput)
}

/// The colors of the theme, and which player plays which color.
pub fn describe_theme(state: &GameState) -> String {
    let theme = state.settings.color_theme;
    let seats: Vec<String> = state
        .players
        .iter()
        .map(|p| format!("{} {}", p.name, p.color))
        .collect();
    format!(
        "{} theme, board {}, path {}: {}",
        theme.name(),
        theme.board_color(),
        theme.path_color(),
        seats.join(", ")
    )
}

/// A prompt telling the current player what to do next.
pub fn describe_phase<D>(ctrl: &TurnController<D>) -> String {
    let state = ctrl.state();
    let name = &state.current_player().name;
    match ctrl.phase() {
        TurnPhase::AwaitingRoll => format!("{}: roll the dice", name),
        TurnPhase::AwaitingMove { .. } => {
            let shown: Vec<String> = ctrl
                .highlighted_moves()
                .iter()
                .map(|mv| format!("token {} +{}", mv.token.token, mv.move_value))
                .collect();
            if shown.is_empty() {
                format!("{}: pick a token to move", name)
            } else {
                format!("{}: pick a token to move ({})", name, shown.join(", "))
            }
        }
        TurnPhase::MandatoryCapture(capture) => format!(
            "{}: you must capture {} with your token {}, or 'skip' to send it home",
            name, capture.capture_target, capture.token.token
        ),
        TurnPhase::NoLegalMoves => format!("{}: nothing can move, type 'next'", name),
        TurnPhase::GameOver { winner } => format!("{} has won", state.players[*winner].name),
    }
}

pub fn describe_outcome<D>(ctrl: &TurnController<D>, outcome: &TurnOutcome) -> String {
    let state = ctrl.state();
    match outcome {
        TurnOutcome::Moved {
            token,
            from,
            to,
            finished,
            captured,
            next,
        } => {
            let mut message = if *from == 0 {
                format!("Token {} enters the board on {}", token.token, to)
            } else if *finished {
                format!("Token {} reaches the finish", token.token)
            } else {
                format!("Token {} moves from {} to {}", token.token, from, to)
            };
            for victim in captured {
                message += &format!(", capturing {}", victim);
            }
            match next {
                NextTurn::ExtraTurn => message += ". Roll again!",
                NextTurn::NextPlayer(idx) => {
                    message += &format!(". Next up: {}", state.players[*idx].name)
                }
                NextTurn::GameWon { .. } => message += ".",
            }
            message
        }
        TurnOutcome::Penalty { token, next_player } => format!(
            "Penalty! {} goes back home. Next up: {}",
            token, state.players[*next_player].name
        ),
        TurnOutcome::Passed { next_player } => {
            format!("Turn passed. Next up: {}", state.players[*next_player].name)
        }
    }
}
