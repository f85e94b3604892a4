use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use ludo::{ColorTheme, DiceCount, DiceMode, GameSettings};
use serde::de::DeserializeOwned;

/// Settings given on the command line. They take precedence over the file.
#[derive(Clone, Copy, Debug, Default)]
pub struct SettingsOverrides {
    pub number_of_players: Option<u8>,
    pub number_of_dice: Option<DiceCount>,
    pub dice_mode: Option<DiceMode>,
    pub color_theme: Option<ColorTheme>,
    pub mandatory_capture: bool,
    pub block_other_color_safe_spots: bool,
    pub hide_available_moves: bool,
    pub free_start: bool,
}

/// Reads settings from a JSON file. Missing keys keep their default values.
pub fn load_settings(path: &Path) -> anyhow::Result<GameSettings> {
    let file = File::open(path)
        .with_context(|| format!("Could not open settings file '{}'", path.display()))?;
    let settings = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Could not parse settings file '{}'", path.display()))?;
    Ok(settings)
}

impl SettingsOverrides {
    pub fn apply(&self, mut settings: GameSettings) -> GameSettings {
        if let Some(n) = self.number_of_players {
            settings.number_of_players = n;
        }
        if let Some(count) = self.number_of_dice {
            settings.number_of_dice = count;
        }
        if let Some(mode) = self.dice_mode {
            settings.dice_mode = mode;
        }
        if let Some(theme) = self.color_theme {
            settings.color_theme = theme;
        }
        let rules = &mut settings.custom_rules;
        rules.mandatory_capture |= self.mandatory_capture;
        rules.block_other_color_safe_spots |= self.block_other_color_safe_spots;
        if self.hide_available_moves {
            rules.show_available_moves = false;
        }
        if self.free_start {
            rules.must_roll_six_to_start = false;
        }
        settings
    }
}

/// Parses a command line value with the same names as the settings file.
pub fn parse_option<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_lowercase()))
        .map_err(|_| format!("unknown value '{}'", s))
}

pub fn parse_dice_count(s: &str) -> Result<DiceCount, String> {
    match s {
        "1" => Ok(DiceCount::One),
        "2" => Ok(DiceCount::Two),
        _ => parse_option(s),
    }
}
