use crate::requester::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, RequesterConfig};
use crate::session::{AppInterface, BankNotice, TriggerState, UserAction};
use crate::wordbank::DEFAULT_WORDBANK_PATH;
use clap::Parser;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

const BUSY_POLL_INTERVAL_MS: u64 = 20;

/// Pull ten sacred words and ask a local model to interpret them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited word bank file
    #[arg(short = 'i', long = "input", default_value = DEFAULT_WORDBANK_PATH)]
    pub wordbank_path: PathBuf,

    /// Chat-completions endpoint of the local inference service
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Model identifier sent with each request
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Use plain line-based input/output instead of the terminal UI
    #[arg(long)]
    pub plain: bool,

    /// Create the fallback word bank without asking when none exists
    #[arg(short, long)]
    pub yes: bool,
}

impl Cli {
    pub fn requester_config(&self) -> RequesterConfig {
        RequesterConfig {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// Line-mode input/output

pub enum CommandInput {
    Pull,
    Exit,
    Invalid,
}

fn parse_command(input: &str) -> CommandInput {
    match input.trim().to_lowercase().as_str() {
        "" | "p" | "pull" => CommandInput::Pull,
        "exit" | "quit" | "q" => CommandInput::Exit,
        _ => CommandInput::Invalid,
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Read one line. `None` on end of input or a read error.
fn read_line<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) => None,
        Ok(_) => Some(input),
        Err(e) => {
            log::warn!("failed to read input: {e}");
            None
        }
    }
}

pub fn read_command<R: BufRead>(reader: &mut R, trigger: TriggerState) -> Option<UserAction> {
    println!("\nPress ENTER (or type 'pull') to pull the string, 'exit' to quit:");
    let Some(input) = read_line(reader) else {
        return Some(UserAction::Exit);
    };

    match parse_command(&input) {
        CommandInput::Exit => Some(UserAction::Exit),
        CommandInput::Pull if trigger == TriggerState::Ready => Some(UserAction::Pull),
        CommandInput::Pull => {
            println!("The string cannot be pulled: the word bank needs at least 10 words.");
            None
        }
        CommandInput::Invalid => {
            println!("Unknown command. Type 'pull' or 'exit'.");
            None
        }
    }
}

pub fn display_wordbank_status(notice: &BankNotice) {
    match notice {
        BankNotice::Loaded(count) => println!("✓ Loaded {count} words"),
        BankNotice::TooSmall(count) => println!("⚠ Not enough words in the word bank ({count} loaded)"),
        BankNotice::Missing(path) => println!("⚠ {} not found", path.display()),
        BankNotice::Created(path) => println!("✓ Created sample {}", path.display()),
        BankNotice::Failed(reason) => println!("Error loading word bank: {reason}"),
    }
}

pub fn display_words(words: &[String]) {
    println!("Sacred Words: {}", words.join(" • "));
}

pub fn display_pulling() {
    println!("The string is being pulled...");
}

pub fn display_message(message: &str) {
    println!("\nDivine Message:\n\n{message}");
}

pub fn display_failure(text: &str) {
    println!("\n{text}");
}

pub fn display_exit_message() {
    println!("Exiting.");
}

/// Line-based implementation of [`AppInterface`] over any `BufRead`.
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> AppInterface for CliInterface<R> {
    fn display_wordbank_status(&mut self, notice: &BankNotice) {
        display_wordbank_status(notice);
    }

    fn offer_default_wordbank(&mut self, path: &Path) -> bool {
        println!(
            "{} not found. Would you like to use the fallback word bank? [y/N]",
            path.display()
        );
        read_line(&mut self.reader).is_some_and(|answer| is_yes(&answer))
    }

    fn next_action(&mut self, trigger: TriggerState) -> Option<UserAction> {
        if trigger == TriggerState::Busy {
            thread::sleep(Duration::from_millis(BUSY_POLL_INTERVAL_MS));
            return None;
        }
        read_command(&mut self.reader, trigger)
    }

    fn display_words(&mut self, words: &[String]) {
        display_words(words);
    }

    fn display_pulling(&mut self) {
        display_pulling();
    }

    fn display_message(&mut self, message: &str) {
        display_message(message);
    }

    fn display_failure(&mut self, text: &str) {
        display_failure(text);
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}
