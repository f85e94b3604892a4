use std::str::FromStr;

/// One line of player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Roll,
    /// Move the current player's token with this number (1..=4).
    Move(u8),
    /// Use this die in choice mode.
    Die(u8),
    /// Give up a mandatory capture and take the penalty.
    Skip,
    /// Pass the turn after a roll without legal moves.
    Next,
    Board,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  roll (r)         roll the dice
  move <n> (m, n)  move your token number n
  die <v> (d)      use the die showing v (choice mode)
  skip             do not capture, the capturing token goes home
  next             pass the turn when nothing can move
  board (b)        show the board
  quit (q)         leave the game";

/// The error type for the [`FromStr`] instance of [`Command`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandFromStrErr {
    Empty,
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidArgument(String),
    TrailingInput(String),
}

impl std::error::Error for CommandFromStrErr {}

impl std::fmt::Display for CommandFromStrErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandFromStrErr::Empty => write!(f, "No command given"),
            CommandFromStrErr::UnknownCommand(cmd) => {
                write!(f, "Unknown command '{}', type 'help' for a list", cmd)
            }
            CommandFromStrErr::MissingArgument(cmd) => {
                write!(f, "The command '{}' needs a number", cmd)
            }
            CommandFromStrErr::InvalidArgument(arg) => write!(f, "'{}' is not a valid number", arg),
            CommandFromStrErr::TrailingInput(rest) => write!(f, "Unexpected input '{}'", rest),
        }
    }
}

fn parse_number(arg: Option<&str>, cmd: &'static str) -> Result<u8, CommandFromStrErr> {
    let arg = arg.ok_or(CommandFromStrErr::MissingArgument(cmd))?;
    arg.parse()
        .map_err(|_| CommandFromStrErr::InvalidArgument(String::from(arg)))
}

impl FromStr for Command {
    type Err = CommandFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let first = words.next().ok_or(CommandFromStrErr::Empty)?;
        let command = match first.to_lowercase().as_str() {
            "roll" | "r" => Command::Roll,
            "move" | "m" => Command::Move(parse_number(words.next(), "move")?),
            "die" | "d" => Command::Die(parse_number(words.next(), "die")?),
            "skip" => Command::Skip,
            "next" | "pass" => Command::Next,
            "board" | "b" => Command::Board,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => match other.parse() {
                Ok(token) => Command::Move(token),
                Err(_) => return Err(CommandFromStrErr::UnknownCommand(String::from(first))),
            },
        };
        let rest: Vec<&str> = words.collect();
        if !rest.is_empty() {
            return Err(CommandFromStrErr::TrailingInput(rest.join(" ")));
        }
        Ok(command)
    }
}
