use quickcheck::{Arbitrary, Gen};

use crate::{
    ColorTheme, CustomRules, DiceCount, DiceMode, GameSettings, Token, HOME_STRETCH_END,
    MAX_PLAYERS, MIN_PLAYERS,
};

/// A token of a random seat standing somewhere on its route, home stretch included.
#[derive(Clone, Debug)]
pub struct TrackToken(pub Token);

impl Arbitrary for TrackToken {
    fn arbitrary(g: &mut Gen) -> Self {
        let player_id = usize::from(u8::arbitrary(g) % MAX_PLAYERS);
        let mut token = Token::new(player_id, u8::arbitrary(g) % 4 + 1);
        token.place_at(u8::arbitrary(g) % HOME_STRETCH_END + 1);
        TrackToken(token)
    }
}

impl Arbitrary for DiceCount {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&[DiceCount::One, DiceCount::Two]).unwrap()
    }
}

impl Arbitrary for DiceMode {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&[DiceMode::Sum, DiceMode::Choice, DiceMode::Both])
            .unwrap()
    }
}

impl Arbitrary for ColorTheme {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&ColorTheme::ALL).unwrap()
    }
}

impl Arbitrary for CustomRules {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            must_roll_six_to_start: bool::arbitrary(g),
            three_sixes_extra_turn: bool::arbitrary(g),
            capture_returns_to_start: bool::arbitrary(g),
            safe_spots: bool::arbitrary(g),
            block_other_color_safe_spots: bool::arbitrary(g),
            mandatory_capture: bool::arbitrary(g),
            show_available_moves: bool::arbitrary(g),
        }
    }
}

impl Arbitrary for GameSettings {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            number_of_dice: DiceCount::arbitrary(g),
            dice_mode: DiceMode::arbitrary(g),
            number_of_players: MIN_PLAYERS + u8::arbitrary(g) % (MAX_PLAYERS - MIN_PLAYERS + 1),
            color_theme: ColorTheme::arbitrary(g),
            custom_rules: CustomRules::arbitrary(g),
        }
    }
}
