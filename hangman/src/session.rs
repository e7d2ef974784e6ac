use hashbrown::HashSet;
use tracing::debug;

use crate::{dictionary::is_valid_word, Error, Result};

pub const TOTAL_GUESSES_ALLOWED: u32 = 10;

/// Words with more distinct letters than this are considered hard and come with a hint.
pub const HARD_DISTINCT_LETTERS: usize = 7;

/// The state of a single game in progress.
///
/// Guesses are tracked by letter rather than by position: a correct guess reveals every
/// occurrence of that letter in the target word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSession {
    target_word: String,
    good_guesses: HashSet<char>,
    bad_guesses: HashSet<char>,
    remaining_guesses: u32,
    hint_reserved: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuessOutcome {
    pub letter: char,
    pub matched: bool,
    /// The letter had already been guessed. Neither a repeat nor a guess on a finished
    /// session changes anything.
    pub repeated: bool,
    pub session_ended: bool,
    pub won: bool,
}

impl GameSession {
    /// Starts a fresh game. Hard words reserve a single hint.
    pub fn new(target_word: impl AsRef<str>) -> Result<Self> {
        let target_word = target_word.as_ref();
        if !is_valid_word(target_word) {
            return Err(Error::InvalidWord(target_word.to_owned()));
        }

        let target_word = target_word.to_ascii_lowercase();
        let hint_reserved = is_hard_word(&target_word);
        Ok(Self {
            target_word,
            good_guesses: HashSet::new(),
            bad_guesses: HashSet::new(),
            remaining_guesses: TOTAL_GUESSES_ALLOWED,
            hint_reserved,
        })
    }

    /// Rebuilds a session from persisted parts. Callers are responsible for validation.
    pub(crate) fn restore(
        target_word: String,
        good_guesses: HashSet<char>,
        bad_guesses: HashSet<char>,
        remaining_guesses: u32,
    ) -> Self {
        Self {
            target_word,
            good_guesses,
            bad_guesses,
            remaining_guesses,
            hint_reserved: false,
        }
    }

    pub fn target_word(&self) -> &str {
        &self.target_word
    }

    pub fn good_guesses(&self) -> &HashSet<char> {
        &self.good_guesses
    }

    pub fn bad_guesses(&self) -> &HashSet<char> {
        &self.bad_guesses
    }

    pub fn remaining_guesses(&self) -> u32 {
        self.remaining_guesses
    }

    pub fn hint_reserved(&self) -> bool {
        self.hint_reserved
    }

    pub fn is_hard(&self) -> bool {
        is_hard_word(&self.target_word)
    }

    pub fn is_won(&self) -> bool {
        self.target_word
            .chars()
            .all(|c| self.good_guesses.contains(&c))
    }

    pub fn is_lost(&self) -> bool {
        self.remaining_guesses == 0 && !self.is_won()
    }

    pub fn is_over(&self) -> bool {
        self.remaining_guesses == 0 || self.is_won()
    }

    pub fn has_guessed(&self, letter: char) -> bool {
        let letter = letter.to_ascii_lowercase();
        self.good_guesses.contains(&letter) || self.bad_guesses.contains(&letter)
    }

    /// Every guessed letter, good or bad, in alphabetical order.
    pub fn guessed_letters(&self) -> Vec<char> {
        let mut letters: Vec<_> = self
            .good_guesses
            .iter()
            .chain(self.bad_guesses.iter())
            .copied()
            .collect();
        letters.sort_unstable();
        letters
    }

    pub fn masked_word(&self) -> String {
        self.target_word
            .chars()
            .map(|c| if self.good_guesses.contains(&c) { c } else { '*' })
            .collect()
    }

    pub fn apply_guess(&mut self, letter: char) -> Result<GuessOutcome> {
        if !letter.is_ascii_alphabetic() {
            return Err(Error::IllegalGuess(letter));
        }

        let letter = letter.to_ascii_lowercase();
        let matched = self.target_word.contains(letter);

        if self.is_over() || self.has_guessed(letter) {
            return Ok(self.outcome(letter, matched, self.has_guessed(letter)));
        }

        if matched {
            self.good_guesses.insert(letter);
        } else {
            self.bad_guesses.insert(letter);
            self.remaining_guesses -= 1;
        }

        debug!(
            letter = %letter,
            matched,
            remaining = self.remaining_guesses,
            "applied guess"
        );

        Ok(self.outcome(letter, matched, false))
    }

    /// Reveals the alphabetically smallest undiscovered letter at the cost of one guess.
    pub fn apply_hint(&mut self) -> Result<char> {
        if !self.hint_reserved || self.is_over() {
            return Err(Error::NoHintAvailable);
        }

        let letter = self
            .target_word
            .chars()
            .filter(|c| !self.good_guesses.contains(c))
            .min();

        // An unfinished game always has an undiscovered letter.
        debug_assert!(letter.is_some(), "unfinished game has nothing left to reveal");
        let letter = letter.ok_or(Error::NoHintAvailable)?;

        self.good_guesses.insert(letter);
        self.remaining_guesses -= 1;
        self.hint_reserved = false;

        debug!(letter = %letter, remaining = self.remaining_guesses, "applied hint");
        Ok(letter)
    }

    fn outcome(&self, letter: char, matched: bool, repeated: bool) -> GuessOutcome {
        let won = self.is_won();
        GuessOutcome {
            letter,
            matched,
            repeated,
            session_ended: won || self.remaining_guesses == 0,
            won,
        }
    }
}

pub(crate) fn is_hard_word(word: &str) -> bool {
    word.chars().collect::<HashSet<_>>().len() > HARD_DISTINCT_LETTERS
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn letters(s: &str) -> HashSet<char> {
        s.chars().collect()
    }

    #[test]
    fn good_guess_reveals_every_occurrence() {
        let mut session = GameSession::new("banana").unwrap();
        let outcome = session.apply_guess('a').unwrap();

        assert!(outcome.matched);
        assert!(!outcome.session_ended);
        assert_eq!(session.masked_word(), "*a*a*a");
        assert_eq!(session.remaining_guesses(), TOTAL_GUESSES_ALLOWED);
    }

    #[test]
    fn bad_guess_costs_exactly_one() {
        let mut session = GameSession::new("banana").unwrap();
        let outcome = session.apply_guess('z').unwrap();

        assert!(!outcome.matched);
        assert_eq!(session.bad_guesses(), &letters("z"));
        assert!(session.good_guesses().is_empty());
        assert_eq!(session.remaining_guesses(), TOTAL_GUESSES_ALLOWED - 1);
    }

    #[test]
    fn every_fresh_guess_lands_in_one_set() {
        for letter in 'a'..='z' {
            let mut session = GameSession::new("quartz").unwrap();
            let before = session.remaining_guesses();
            let outcome = session.apply_guess(letter).unwrap();

            let good = session.good_guesses().contains(&letter);
            let bad = session.bad_guesses().contains(&letter);
            assert!(good ^ bad, "{letter} should land in exactly one set");
            assert_eq!(outcome.matched, good);
            assert_eq!(before - session.remaining_guesses(), u32::from(bad));
        }
    }

    #[test]
    fn repeated_guesses_are_noops() {
        let mut session = GameSession::new("banana").unwrap();
        session.apply_guess('a').unwrap();
        session.apply_guess('q').unwrap();
        let snapshot = session.clone();

        let outcome = session.apply_guess('q').unwrap();
        assert!(outcome.repeated);
        let outcome = session.apply_guess('A').unwrap();
        assert!(outcome.repeated);
        assert!(outcome.matched);

        assert_eq!(session, snapshot);
    }

    #[test]
    fn guesses_are_case_insensitive() {
        let mut session = GameSession::new("Cat").unwrap();
        assert_eq!(session.target_word(), "cat");

        let outcome = session.apply_guess('C').unwrap();
        assert!(outcome.matched);
        assert_eq!(outcome.letter, 'c');
    }

    #[test]
    fn non_letters_are_rejected() {
        let mut session = GameSession::new("cat").unwrap();
        for letter in ['1', ' ', '-', 'é'] {
            assert!(matches!(
                session.apply_guess(letter),
                Err(Error::IllegalGuess(c)) if c == letter
            ));
        }
        assert_eq!(session.remaining_guesses(), TOTAL_GUESSES_ALLOWED);
    }

    #[test]
    fn win_requires_every_distinct_letter() {
        let mut session = GameSession::new("cat").unwrap();
        session.apply_guess('c').unwrap();
        session.apply_guess('a').unwrap();
        assert!(!session.is_won());

        let outcome = session.apply_guess('t').unwrap();
        assert!(outcome.won);
        assert!(outcome.session_ended);
        assert!(!session.is_lost());
    }

    #[test]
    fn guesses_stop_applying_once_out_of_guesses() {
        let mut session = GameSession::new("dog").unwrap();
        for letter in "qwxjvzbfkp".chars() {
            session.apply_guess(letter).unwrap();
        }
        assert!(session.is_lost());
        assert_eq!(session.remaining_guesses(), 0);

        let outcome = session.apply_guess('d').unwrap();
        assert!(outcome.session_ended);
        assert!(!outcome.won);
        assert!(session.good_guesses().is_empty());
        assert_eq!(session.remaining_guesses(), 0);
    }

    #[test]
    fn target_word_must_be_letters() {
        for word in ["", "r2d2", "ice cream", "naïve"] {
            assert!(matches!(
                GameSession::new(word),
                Err(Error::InvalidWord(w)) if w == word
            ));
        }
    }

    #[test]
    fn only_hard_words_reserve_a_hint() {
        assert!(!GameSession::new("cat").unwrap().hint_reserved());
        // seven distinct letters is not enough
        assert!(!GameSession::new("abcdefga").unwrap().hint_reserved());
        assert!(GameSession::new("abcdefgh").unwrap().hint_reserved());
        assert!(GameSession::new("playground").unwrap().is_hard());
    }

    #[test]
    fn hint_reveals_smallest_undiscovered_letter() {
        let mut session = GameSession::new("playground").unwrap();
        session.apply_guess('a').unwrap();

        let letter = session.apply_hint().unwrap();
        assert_eq!(letter, 'd');
        assert!(session.good_guesses().contains(&'d'));
        assert_eq!(session.remaining_guesses(), TOTAL_GUESSES_ALLOWED - 1);
        assert!(!session.hint_reserved());
    }

    #[test]
    fn hint_is_single_use() {
        let mut session = GameSession::new("playground").unwrap();
        session.apply_hint().unwrap();
        assert!(matches!(session.apply_hint(), Err(Error::NoHintAvailable)));
    }

    #[test]
    fn easy_words_have_no_hint() {
        let mut session = GameSession::new("cat").unwrap();
        assert!(matches!(session.apply_hint(), Err(Error::NoHintAvailable)));
        assert_eq!(session.remaining_guesses(), TOTAL_GUESSES_ALLOWED);
    }

    #[test]
    fn hint_eligibility_is_fixed_at_creation() {
        let mut session = GameSession::new("playground").unwrap();
        for letter in "playgroun".chars() {
            session.apply_guess(letter).unwrap();
        }
        assert!(session.hint_reserved());
        assert_eq!(session.apply_hint().unwrap(), 'd');
        assert!(session.is_won());
    }
}
