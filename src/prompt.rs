use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use hangman::{Prompter, SaveDecision};
use read_input::{shortcut::input, InputBuild};

const SAVE_PROMPT: &str = "Save unsaved work? [y]es / [n]o / [c]ancel: ";

/// Prints `msg` and reads a line from the terminal. Returns `None` once stdin is closed.
pub fn read_line(msg: &str) -> Option<String> {
    print!("{msg}");
    io::stdout().flush().ok();

    if at_eof(&mut io::stdin().lock()) {
        println!();
        return None;
    }
    Some(input::<String>().get())
}

fn at_eof(reader: &mut impl BufRead) -> bool {
    reader.fill_buf().map_or(true, |buf| buf.is_empty())
}

fn parse_decision(answer: &str) -> Option<SaveDecision> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(SaveDecision::Save),
        "n" | "no" => Some(SaveDecision::Discard),
        "c" | "cancel" => Some(SaveDecision::Cancel),
        _ => None,
    }
}

/// Asks the player at the terminal.
pub struct TerminalPrompter {
    save_dir: PathBuf,
}

impl TerminalPrompter {
    pub fn new(save_dir: PathBuf) -> Self {
        Self { save_dir }
    }

    /// Asks for a file name, resolved against the save directory. An empty answer backs out.
    pub fn ask_path(&self, msg: &str) -> Option<PathBuf> {
        let name = read_line(msg)?;
        let name = name.trim();
        (!name.is_empty()).then(|| self.save_dir.join(name))
    }
}

impl Prompter for TerminalPrompter {
    fn save_unsaved_work(&mut self) -> SaveDecision {
        loop {
            // Nobody left to answer.
            let answer = match read_line(SAVE_PROMPT) {
                Some(answer) => answer,
                None => return SaveDecision::Cancel,
            };

            match parse_decision(&answer) {
                Some(decision) => return decision,
                None => println!("Try entering y, n or c"),
            }
        }
    }

    fn choose_save_path(&mut self) -> Option<PathBuf> {
        self.ask_path(&format!(
            "Save as (in {}, blank to skip): ",
            self.save_dir.display()
        ))
    }
}
