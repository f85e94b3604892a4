use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{DiceCount, DiceMode};

/// The result of throwing one or two dice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub dice1: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub dice2: Option<u8>,
    pub total: u8,
    /// The die picked by the player in [`DiceMode::Choice`].
    ///
    /// If present, this is always one of the rolled values.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub selected_value: Option<u8>,
}

impl DiceRoll {
    pub fn single(dice1: u8) -> Self {
        debug_assert!((1..=6).contains(&dice1));
        Self {
            dice1,
            dice2: None,
            total: dice1,
            selected_value: None,
        }
    }

    pub fn double(dice1: u8, dice2: u8) -> Self {
        debug_assert!((1..=6).contains(&dice1) && (1..=6).contains(&dice2));
        Self {
            dice1,
            dice2: Some(dice2),
            total: dice1 + dice2,
            selected_value: None,
        }
    }

    /// The face values in die order.
    pub fn values(&self) -> impl Iterator<Item = u8> {
        std::iter::once(self.dice1).chain(self.dice2)
    }

    pub fn contains_six(&self) -> bool {
        self.values().any(|v| v == 6)
    }

    /// Picks one of the rolled dice. Returns `None` if nothing with that value was rolled.
    #[must_use]
    pub fn select(self, value: u8) -> Option<Self> {
        self.values().any(|v| v == value).then_some(Self {
            selected_value: Some(value),
            ..self
        })
    }

    /// The distance used when a token is moved without going through the
    /// list of available moves.
    pub fn default_move_value(&self, mode: DiceMode) -> u8 {
        match (self.selected_value, self.dice2, mode) {
            (Some(value), _, _) => value,
            (None, Some(_), DiceMode::Sum) => self.total,
            _ => self.dice1,
        }
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.dice2 {
            Some(dice2) => write!(f, "{} + {} = {}", self.dice1, dice2, self.total)?,
            None => write!(f, "{}", self.dice1)?,
        }
        if let Some(selected) = self.selected_value {
            write!(f, " (using {})", selected)?;
        }
        Ok(())
    }
}

/// A source of dice rolls.
///
/// The turn controller only ever draws rolls through this trait, so tests and
/// other headless callers can replace the randomness.
pub trait DiceRoller {
    fn roll(&mut self, count: DiceCount) -> DiceRoll;
}

/// Uniformly random dice.
#[derive(Clone, Debug)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl DiceRoller for RandomDice {
    fn roll(&mut self, count: DiceCount) -> DiceRoll {
        let dice1 = self.rng.gen_range(1..=6);
        match count {
            DiceCount::One => DiceRoll::single(dice1),
            DiceCount::Two => DiceRoll::double(dice1, self.rng.gen_range(1..=6)),
        }
    }
}

/// Replays a fixed list of die faces, starting over at the end.
///
/// Each roll consumes as many faces as there are dice.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    next: usize,
}

impl ScriptedDice {
    /// Panics if `faces` is empty or contains values outside 1..=6.
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        let faces: Vec<u8> = faces.into_iter().collect();
        assert!(!faces.is_empty());
        assert!(faces.iter().all(|f| (1..=6).contains(f)));
        Self { faces, next: 0 }
    }

    fn next_face(&mut self) -> u8 {
        let face = self.faces[self.next];
        self.next = (self.next + 1) % self.faces.len();
        face
    }
}

impl DiceRoller for ScriptedDice {
    fn roll(&mut self, count: DiceCount) -> DiceRoll {
        let dice1 = self.next_face();
        match count {
            DiceCount::One => DiceRoll::single(dice1),
            DiceCount::Two => DiceRoll::double(dice1, self.next_face()),
        }
    }
}
