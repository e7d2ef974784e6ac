use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
    str,
};

use rand::Rng;
use squirrel_rng::SquirrelRng;
use tracing::{debug, trace};

use crate::{Error, Result};

/// Anything that can hand out target words.
pub trait WordSource {
    fn select_word(&mut self) -> Result<String>;
}

/// Picks words from a newline-delimited word list on disk.
///
/// The list is streamed rather than held in memory; only its line count is kept between
/// selections. Entries are read as raw bytes, and any that are empty or contain anything other
/// than ASCII letters (including bytes that are not UTF-8 at all) are skipped.
#[derive(Debug)]
pub struct WordSelector<R = SquirrelRng> {
    path: PathBuf,
    rng: R,
    line_count: Option<usize>,
}

impl WordSelector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_rng(path, SquirrelRng::new())
    }
}

impl<R: Rng> WordSelector<R> {
    pub fn with_rng(path: impl Into<PathBuf>, rng: R) -> Self {
        Self {
            path: path.into(),
            rng,
            line_count: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn line_count(&mut self) -> Result<usize> {
        if let Some(count) = self.line_count {
            return Ok(count);
        }

        let count = self.lines()?.count();
        debug!(path = %self.path.display(), count, "counted word list");
        self.line_count = Some(count);
        Ok(count)
    }

    fn lines(&self) -> Result<io::Split<BufReader<File>>> {
        let file = File::open(&self.path).map_err(|e| Error::dictionary(&self.path, e))?;
        Ok(BufReader::new(file).split(b'\n'))
    }
}

impl<R: Rng> WordSource for WordSelector<R> {
    /// Starts at a uniformly random line and scans forward, wrapping once, until it finds a
    /// valid word.
    fn select_word(&mut self) -> Result<String> {
        let count = self.line_count()?;
        if count == 0 {
            return Err(Error::dictionary(&self.path, "word list is empty"));
        }

        let start = self.rng.gen_range(0..count);
        let candidates = self.lines()?.skip(start).chain(self.lines()?.take(start));

        for line in candidates {
            let mut line = line.map_err(|e| Error::dictionary(&self.path, e))?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }

            match str::from_utf8(&line) {
                Ok(word) if is_valid_word(word) => return Ok(word.to_ascii_lowercase()),
                _ => {
                    trace!(line = %String::from_utf8_lossy(&line), "rejected word list entry")
                }
            }
        }

        Err(Error::dictionary(&self.path, "no valid words in word list"))
    }
}

pub fn is_valid_word(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|u| u.is_ascii_alphabetic())
}
