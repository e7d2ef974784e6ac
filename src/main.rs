use std::{fs, io, path::PathBuf, process};

use clap::Parser;
use hangman::{Error, GameLifecycle, GameState, WordSelector, WordSource};
use prompt::TerminalPrompter;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod prompt;

#[derive(Clone, Debug, Parser)]
struct Args {
    /// path to word list
    dictionary: PathBuf,

    /// saved game to resume instead of starting a new one
    #[clap(long)]
    load: Option<PathBuf>,

    /// directory new save files are placed in
    #[clap(long, default_value = "saved")]
    save_dir: PathBuf,
}

enum Command {
    Guess(char),
    Hint,
    Start,
    New,
    Save,
    Load,
    Quit,
    Help,
    Unknown(String),
}

impl Command {
    fn parse(text: &str) -> Self {
        let text = text.trim();
        let mut chars = text.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return match c {
                '?' => Command::Hint,
                c => Command::Guess(c),
            };
        }

        match text.to_ascii_lowercase().as_str() {
            "hint" => Command::Hint,
            "start" => Command::Start,
            "new" => Command::New,
            "save" => Command::Save,
            "load" => Command::Load,
            "quit" | "exit" => Command::Quit,
            "help" => Command::Help,
            _ => Command::Unknown(text.to_owned()),
        }
    }
}

const HELP: &str = "\
Type a letter to guess it, or one of:
  ?, hint   reveal a letter (hard words only, costs a guess)
  start     start a game
  new       put the current game away
  save      save the current game
  load      load a saved game
  quit      leave";

fn main() {
    let args = Args::parse();
    init_tracing();

    if let Err(e) = run(&args) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> anyhow::Result<()> {
    fs::create_dir_all(&args.save_dir)?;

    let mut game = GameLifecycle::new(WordSelector::new(&args.dictionary));
    let mut prompter = TerminalPrompter::new(args.save_dir.clone());

    let opened = match &args.load {
        Some(path) => game.load_from(path),
        None => game.start(),
    };
    report(opened);

    println!("{HELP}");
    loop {
        render(&game);

        let line = match prompt::read_line("> ") {
            Some(line) => line,
            None => {
                // End of input reads as quit, even if the save prompt is cancelled.
                report(game.exit(&mut prompter).map(|_| ()));
                break;
            }
        };
        let result = match Command::parse(&line) {
            Command::Guess(letter) => game.guess(letter).map(|outcome| {
                if outcome.repeated {
                    println!("You already guessed {}.", outcome.letter);
                }
            }),
            Command::Hint => game
                .hint()
                .map(|letter| println!("Hint: the word contains {letter}.")),
            Command::Start => game.start(),
            Command::New => game.new_game(&mut prompter).map(|_| ()),
            Command::Save => save(&mut game, &mut prompter),
            Command::Load => load(&mut game, &mut prompter),
            Command::Quit => match game.exit(&mut prompter) {
                Ok(true) => break,
                other => other.map(|_| ()),
            },
            Command::Help => {
                println!("{HELP}");
                Ok(())
            }
            Command::Unknown(text) => {
                println!("I don't know how to {text:?}. Type help for a list of commands.");
                Ok(())
            }
        };
        report(result);
    }

    Ok(())
}

fn save<W: WordSource>(
    game: &mut GameLifecycle<W>,
    prompter: &mut TerminalPrompter,
) -> hangman::Result<()> {
    let path = match game.work_file() {
        Some(path) => Some(path.to_owned()),
        None => prompter.ask_path("Save as (blank to cancel): "),
    };

    if let Some(path) = path {
        game.save_to(&path)?;
        println!("Saved to {}.", path.display());
    }
    Ok(())
}

fn load<W: WordSource>(
    game: &mut GameLifecycle<W>,
    prompter: &mut TerminalPrompter,
) -> hangman::Result<()> {
    if !game.confirm_discard(prompter)? {
        return Ok(());
    }

    if let Some(path) = prompter.ask_path("Load from (blank to cancel): ") {
        game.load_from(&path)?;
        println!("Loaded {}.", path.display());
    }
    Ok(())
}

fn render<W: WordSource>(game: &GameLifecycle<W>) {
    let session = match game.session() {
        Some(session) if game.state() != GameState::Uninitialized => session,
        _ => {
            println!("\nNo game in progress. Type start or load.");
            return;
        }
    };

    if game.state() == GameState::Ended {
        println!("\nThe word was: {}", session.target_word());
        if session.is_won() {
            if session.remaining_guesses() >= 3 {
                println!("FLAWLESS VICTORY!");
            } else {
                println!("Victory is yours!");
            }
        } else {
            println!("Sorry, friend. You've been hanged!");
        }
        println!("Type start to play again, load, or quit.");
        return;
    }

    let guessed: String = ('a'..='z')
        .map(|c| if session.has_guessed(c) { '-' } else { c })
        .collect();

    println!();
    println!("{}", session.masked_word());
    println!("Remaining guesses: {}", session.remaining_guesses());
    println!("Letters: {guessed}");
    let misses: String = session
        .guessed_letters()
        .into_iter()
        .filter(|c| session.bad_guesses().contains(c))
        .collect();
    if !misses.is_empty() {
        println!("Misses: {misses}");
    }
    if game.hint_available() {
        println!("A hint is available (type ?).");
    }
}

fn report(result: hangman::Result<()>) {
    match result {
        Ok(()) => {}
        Err(e @ Error::MalformedSaveFile(_)) => {
            println!("That file doesn't hold a saved game. Nothing was changed.");
            error!("{e}");
        }
        Err(e) => println!("{e}"),
    }
}
