//! The JSON save format.
//!
//! A saved game carries exactly four fields. Derived state such as difficulty is recomputed on
//! load, and a restored game never has a hint pending.

use std::{fs, io::Write, path::Path};

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::{
    dictionary::is_valid_word, session::is_hard_word, Error, GameSession, Result,
    TOTAL_GUESSES_ALLOWED,
};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct PersistedGame {
    #[serde(rename = "TARGET_WORD")]
    target_word: String,
    #[serde(rename = "GOOD_GUESSES")]
    good_guesses: Vec<char>,
    #[serde(rename = "BAD_GUESSES")]
    bad_guesses: Vec<char>,
    #[serde(rename = "REMAINING_GUESSES")]
    remaining_guesses: u32,
}

impl From<&GameSession> for PersistedGame {
    fn from(session: &GameSession) -> Self {
        let sorted = |letters: &HashSet<char>| {
            let mut letters: Vec<_> = letters.iter().copied().collect();
            letters.sort_unstable();
            letters
        };

        Self {
            target_word: session.target_word().to_owned(),
            good_guesses: sorted(session.good_guesses()),
            bad_guesses: sorted(session.bad_guesses()),
            remaining_guesses: session.remaining_guesses(),
        }
    }
}

impl PersistedGame {
    fn into_session(self) -> Result<GameSession> {
        let PersistedGame {
            target_word,
            good_guesses,
            bad_guesses,
            remaining_guesses,
        } = self;

        if !is_valid_word(&target_word) {
            return Err(malformed(format!(
                "target word {target_word:?} must be made of ASCII letters"
            )));
        }
        let target_word = target_word.to_ascii_lowercase();

        let mut seen = HashSet::new();
        let mut good = HashSet::new();
        let mut bad = HashSet::new();

        for (letters, set, expected) in [
            (good_guesses, &mut good, true),
            (bad_guesses, &mut bad, false),
        ] {
            for letter in letters {
                if !letter.is_ascii_alphabetic() {
                    return Err(malformed(format!("{letter:?} is not a letter")));
                }
                let letter = letter.to_ascii_lowercase();
                if !seen.insert(letter) {
                    return Err(malformed(format!("{letter:?} was guessed more than once")));
                }
                if target_word.contains(letter) != expected {
                    return Err(malformed(format!(
                        "{letter:?} is recorded as a {} guess",
                        if expected { "good" } else { "bad" }
                    )));
                }
                set.insert(letter);
            }
        }

        // A spent hint costs one guess without leaving a bad guess behind. Only hard words
        // have a hint, and spending it always reveals a letter.
        let hint_spendable = is_hard_word(&target_word) && !good.is_empty();
        let most = TOTAL_GUESSES_ALLOWED.saturating_sub(bad.len() as u32);
        let least = if hint_spendable {
            most.saturating_sub(1)
        } else {
            most
        };
        if bad.len() as u32 > TOTAL_GUESSES_ALLOWED || !(least..=most).contains(&remaining_guesses)
        {
            return Err(malformed(format!(
                "{remaining_guesses} remaining guesses does not match {} bad guesses",
                bad.len()
            )));
        }

        Ok(GameSession::restore(target_word, good, bad, remaining_guesses))
    }
}

pub fn encode(session: &GameSession) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(&PersistedGame::from(session))?)
}

pub fn decode(bytes: &[u8]) -> Result<GameSession> {
    let game: PersistedGame = serde_json::from_slice(bytes).map_err(malformed)?;
    game.into_session()
}

/// Writes the session to `path`, replacing any existing file only once the new contents are
/// fully on disk.
pub fn write_file(path: &Path, session: &GameSession) -> Result<()> {
    let bytes = encode(session)?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| Error::io(path, e))?;
    file.write_all(&bytes).map_err(|e| Error::io(path, e))?;
    file.as_file().sync_all().map_err(|e| Error::io(path, e))?;
    file.persist(path).map_err(|e| Error::io(path, e.error))?;

    info!(path = %path.display(), "saved game");
    Ok(())
}

pub fn read_file(path: &Path) -> Result<GameSession> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    decode(&bytes).map_err(|e| {
        warn!(path = %path.display(), error = %e, "rejected save file");
        e
    })
}

fn malformed(reason: impl ToString) -> Error {
    Error::MalformedSaveFile(reason.to_string())
}
