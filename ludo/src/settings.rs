use serde::{Deserialize, Serialize};

/// How many dice are thrown per roll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiceCount {
    #[default]
    One,
    Two,
}

impl DiceCount {
    pub fn get(self) -> u8 {
        match self {
            DiceCount::One => 1,
            DiceCount::Two => 2,
        }
    }
}

/// How the values of two dice are turned into moves.
///
/// Only relevant when playing with [`DiceCount::Two`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiceMode {
    /// Move one token by the sum of both dice.
    #[default]
    Sum,
    /// Pick one of the two dice and move by its value.
    Choice,
    /// Both dice values are offered separately.
    Both,
}

/// The color palette used for the four seats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Classic,
    Neon,
    Pastel,
    Ocean,
}

impl ColorTheme {
    pub const ALL: [ColorTheme; 4] = [
        ColorTheme::Classic,
        ColorTheme::Neon,
        ColorTheme::Pastel,
        ColorTheme::Ocean,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorTheme::Classic => "Classic",
            ColorTheme::Neon => "Neon",
            ColorTheme::Pastel => "Pastel",
            ColorTheme::Ocean => "Ocean",
        }
    }

    /// The seat colors as hex strings, indexed by player id.
    pub fn colors(self) -> [&'static str; 4] {
        match self {
            ColorTheme::Classic => ["#FF0000", "#00FF00", "#0000FF", "#FFFF00"],
            ColorTheme::Neon => ["#FF1493", "#00FFFF", "#FF4500", "#ADFF2F"],
            ColorTheme::Pastel => ["#FFB6C1", "#98FB98", "#87CEEB", "#F0E68C"],
            ColorTheme::Ocean => ["#20B2AA", "#4682B4", "#1E90FF", "#00CED1"],
        }
    }

    pub fn board_color(self) -> &'static str {
        match self {
            ColorTheme::Classic => "#FFF8DC",
            ColorTheme::Neon => "#1A1A1A",
            ColorTheme::Pastel => "#F8F8FF",
            ColorTheme::Ocean => "#F0F8FF",
        }
    }

    pub fn path_color(self) -> &'static str {
        match self {
            ColorTheme::Classic => "#F5F5F5",
            ColorTheme::Neon => "#333333",
            ColorTheme::Pastel => "#E6E6FA",
            ColorTheme::Ocean => "#E0F6FF",
        }
    }
}

/// Optional rule variants. Every combination is valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomRules {
    /// A token may only leave home when a six was rolled.
    pub must_roll_six_to_start: bool,
    /// Sixes keep granting extra rolls, even after the third in a row.
    pub three_sixes_extra_turn: bool,
    /// Landing on an opponent sends it back home.
    pub capture_returns_to_start: bool,
    /// Tokens on one of the safe cells cannot be captured.
    pub safe_spots: bool,
    /// A token may not land on an occupied safe cell owned by another color.
    pub block_other_color_safe_spots: bool,
    /// If a capture is possible, it has to be played.
    pub mandatory_capture: bool,
    /// Whether the legal moves are offered to the player.
    pub show_available_moves: bool,
}

impl Default for CustomRules {
    fn default() -> Self {
        Self {
            must_roll_six_to_start: true,
            three_sixes_extra_turn: true,
            capture_returns_to_start: true,
            safe_spots: true,
            block_other_color_safe_spots: false,
            mandatory_capture: false,
            show_available_moves: true,
        }
    }
}

/// The settings of one game. They never change while the game is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub number_of_dice: DiceCount,
    pub dice_mode: DiceMode,
    pub number_of_players: u8,
    pub color_theme: ColorTheme,
    pub custom_rules: CustomRules,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            number_of_dice: DiceCount::One,
            dice_mode: DiceMode::Sum,
            number_of_players: 4,
            color_theme: ColorTheme::Classic,
            custom_rules: CustomRules::default(),
        }
    }
}

pub const MIN_PLAYERS: u8 = 2;
pub const MAX_PLAYERS: u8 = 4;

impl GameSettings {
    pub fn validate(&self) -> Result<(), InvalidSettings> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.number_of_players) {
            return Err(InvalidSettings::PlayerCount(self.number_of_players));
        }
        Ok(())
    }

    /// True if the dice values are offered as separate moves.
    pub fn uses_dice_separately(&self) -> bool {
        self.number_of_dice == DiceCount::Two
            && matches!(self.dice_mode, DiceMode::Choice | DiceMode::Both)
    }
}

/// The error type for [`GameSettings::validate()`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidSettings {
    PlayerCount(u8),
}

impl std::error::Error for InvalidSettings {}

impl std::fmt::Display for InvalidSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidSettings::PlayerCount(n) => write!(
                f,
                "A game needs between {} and {} players, but {} were requested",
                MIN_PLAYERS, MAX_PLAYERS, n
            ),
        }
    }
}
