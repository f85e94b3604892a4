pub use board::*;
pub use capture::*;
pub use dice::*;
pub use errors::*;
pub use moves::*;
pub use settings::*;
pub use state::*;
pub use turn::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod board;
mod capture;
mod dice;
mod errors;
mod moves;
mod settings;
mod state;
mod turn;
mod visualization;
