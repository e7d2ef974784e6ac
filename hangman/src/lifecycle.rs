//! The game's lifecycle state machine.
//!
//! `GameLifecycle` owns the current session and is the only thing that mutates it in response to
//! user actions. Front ends drive it and render the session afterward; anything that needs the
//! user (a save prompt, a file picker) is supplied by the caller through [`Prompter`].

use std::{
    fmt,
    path::{Path, PathBuf},
};

use tracing::{debug, info, instrument};

use crate::{codec, Error, GameSession, GuessOutcome, Result, WordSource};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameState {
    /// No game has been started yet, or the last one was discarded.
    #[default]
    Uninitialized,
    /// A game is in progress with nothing to lose since it was started, saved or loaded.
    InitializedUnmodified,
    /// A game is in progress with unsaved moves.
    InitializedModified,
    /// The last game was won or lost.
    Ended,
}

impl GameState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::InitializedUnmodified => "in progress",
            Self::InitializedModified => "in progress with unsaved changes",
            Self::Ended => "over",
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self, Self::InitializedUnmodified | Self::InitializedModified)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's answer when asked whether to save unsaved work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveDecision {
    Save,
    Discard,
    Cancel,
}

/// User-facing collaborators the lifecycle consults before throwing work away.
pub trait Prompter {
    fn save_unsaved_work(&mut self) -> SaveDecision;

    /// Asks where to save a game that has never been saved. `None` means the user backed out.
    fn choose_save_path(&mut self) -> Option<PathBuf>;
}

#[derive(Debug)]
pub struct GameLifecycle<W> {
    words: W,
    session: Option<GameSession>,
    state: GameState,
    work_file: Option<PathBuf>,
}

impl<W: WordSource> GameLifecycle<W> {
    pub fn new(words: W) -> Self {
        Self {
            words,
            session: None,
            state: GameState::Uninitialized,
            work_file: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// The file this game was last saved to or loaded from.
    pub fn work_file(&self) -> Option<&Path> {
        self.work_file.as_deref()
    }

    pub fn hint_available(&self) -> bool {
        self.state.is_initialized()
            && self.session.as_ref().map_or(false, |session| {
                session.hint_reserved() && session.remaining_guesses() > 1 && !session.is_over()
            })
    }

    #[instrument(skip(self), fields(state = %self.state))]
    pub fn start(&mut self) -> Result<()> {
        self.require("start a game", &[GameState::Uninitialized, GameState::Ended])?;

        let word = self.words.select_word()?;
        let session = GameSession::new(word)?;
        info!(
            length = session.target_word().len(),
            hard = session.is_hard(),
            "started game"
        );

        self.session = Some(session);
        self.work_file = None;
        self.state = GameState::InitializedUnmodified;
        Ok(())
    }

    #[instrument(skip(self), fields(state = %self.state))]
    pub fn guess(&mut self, letter: char) -> Result<GuessOutcome> {
        let session = self.active_session("guess")?;
        let outcome = session.apply_guess(letter)?;

        if outcome.session_ended {
            self.end(outcome.won);
        } else if !outcome.repeated {
            self.state = GameState::InitializedModified;
        }

        Ok(outcome)
    }

    #[instrument(skip(self), fields(state = %self.state))]
    pub fn hint(&mut self) -> Result<char> {
        if !self.hint_available() {
            self.require(
                "take a hint",
                &[
                    GameState::InitializedUnmodified,
                    GameState::InitializedModified,
                ],
            )?;
            return Err(Error::NoHintAvailable);
        }

        let session = self.active_session("take a hint")?;
        let letter = session.apply_hint()?;
        let (over, won) = (session.is_over(), session.is_won());

        if over {
            self.end(won);
        } else {
            self.state = GameState::InitializedModified;
        }

        Ok(letter)
    }

    /// Saves the current game to `path` and remembers it as the work file.
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn save_to(&mut self, path: &Path) -> Result<()> {
        let session = self.active_session("save")?;
        codec::write_file(path, session)?;

        self.work_file = Some(path.to_owned());
        self.state = GameState::InitializedUnmodified;
        Ok(())
    }

    /// Replaces the current game with a saved one. A malformed save leaves everything as it was.
    #[instrument(skip(self, bytes), fields(state = %self.state, len = bytes.len()))]
    pub fn load(&mut self, bytes: &[u8]) -> Result<()> {
        let session = codec::decode(bytes)?;
        self.install(session, None);
        Ok(())
    }

    #[instrument(skip(self), fields(state = %self.state))]
    pub fn load_from(&mut self, path: &Path) -> Result<()> {
        let session = codec::read_file(path)?;
        self.install(session, Some(path.to_owned()));
        Ok(())
    }

    /// Discards the current game so a new one can be started. Returns `false` if the user
    /// cancelled.
    #[instrument(skip(self, prompter), fields(state = %self.state))]
    pub fn new_game(&mut self, prompter: &mut impl Prompter) -> Result<bool> {
        self.require(
            "set up a new game",
            &[
                GameState::Uninitialized,
                GameState::InitializedUnmodified,
                GameState::InitializedModified,
            ],
        )?;

        if !self.confirm_discard(prompter)? {
            return Ok(false);
        }

        self.session = None;
        self.work_file = None;
        self.state = GameState::Uninitialized;
        Ok(true)
    }

    /// Returns whether the application may exit. Nothing is torn down here.
    #[instrument(skip(self, prompter), fields(state = %self.state))]
    pub fn exit(&mut self, prompter: &mut impl Prompter) -> Result<bool> {
        self.confirm_discard(prompter)
    }

    /// Gives the user a chance to save unsaved work before it is thrown away. Returns `false` if
    /// they cancelled; a failed save is returned as an error and nothing is thrown away.
    pub fn confirm_discard(&mut self, prompter: &mut impl Prompter) -> Result<bool> {
        if self.state != GameState::InitializedModified {
            return Ok(true);
        }

        match prompter.save_unsaved_work() {
            SaveDecision::Cancel => Ok(false),
            SaveDecision::Discard => Ok(true),
            SaveDecision::Save => {
                let path = self
                    .work_file
                    .clone()
                    .or_else(|| prompter.choose_save_path());

                // Backing out of the picker still lets the action go ahead.
                match path {
                    Some(path) => self.save_to(&path)?,
                    None => debug!("no save destination chosen"),
                }
                Ok(true)
            }
        }
    }

    fn install(&mut self, session: GameSession, work_file: Option<PathBuf>) {
        info!(
            remaining = session.remaining_guesses(),
            over = session.is_over(),
            "loaded game"
        );
        self.session = Some(session);
        self.work_file = work_file;
        self.state = GameState::InitializedUnmodified;
    }

    fn end(&mut self, won: bool) {
        info!(won, "game over");
        self.state = GameState::Ended;
    }

    fn active_session(&mut self, action: &'static str) -> Result<&mut GameSession> {
        self.require(
            action,
            &[
                GameState::InitializedUnmodified,
                GameState::InitializedModified,
            ],
        )?;
        self.session.as_mut().ok_or(Error::IllegalAction {
            action,
            state: self.state,
        })
    }

    fn require(&self, action: &'static str, legal: &[GameState]) -> Result<()> {
        if legal.contains(&self.state) {
            Ok(())
        } else {
            Err(Error::IllegalAction {
                action,
                state: self.state,
            })
        }
    }
}
