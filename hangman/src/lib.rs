pub mod codec;
pub mod dictionary;
mod error;
pub mod lifecycle;
mod session;

pub use dictionary::{WordSelector, WordSource};
pub use error::{Error, Result};
pub use lifecycle::{GameLifecycle, GameState, Prompter, SaveDecision};
pub use session::{GameSession, GuessOutcome, HARD_DISTINCT_LETTERS, TOTAL_GUESSES_ALLOWED};
