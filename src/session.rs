use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::formatter::format_message;
use crate::relay::{PendingRequest, spawn_request};
use crate::requester::{MessageSource, RequestError, RequestOutcome};
use crate::sampler::{SampleError, sample_words};
use crate::wordbank::{WordBank, WordBankStatus, load_wordbank, write_default_wordbank};

pub const FAILURE_HINT: &str = "Please verify the local inference service is running with a model loaded.";
const CONNECTION_FAILURE: &str = "Cannot connect to the local inference service.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Pull,
    Exit,
}

/// Whether the pull trigger may be used right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Ready,
    Busy,
    Disabled,
}

/// What startup found out about the word bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankNotice {
    Loaded(usize),
    TooSmall(usize),
    Missing(PathBuf),
    Created(PathBuf),
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PullError {
    #[error("a request is already in flight")]
    Busy,
    #[error(transparent)]
    Sample(#[from] SampleError),
}

/// The surface a session talks to: a terminal UI or plain line I/O.
pub trait AppInterface {
    fn display_wordbank_status(&mut self, notice: &BankNotice);
    /// Ask whether to write the fallback word bank to `path`.
    fn offer_default_wordbank(&mut self, path: &Path) -> bool;
    /// Wait briefly for user input. `None` means nothing happened yet.
    fn next_action(&mut self, trigger: TriggerState) -> Option<UserAction>;
    fn display_words(&mut self, words: &[String]);
    fn display_pulling(&mut self);
    fn display_message(&mut self, message: &str);
    fn display_failure(&mut self, text: &str);
    fn display_exit_message(&mut self);
}

/// Owns the word bank and at most one in-flight request.
pub struct Session {
    bank: WordBank,
    source: Arc<dyn MessageSource>,
    rng: StdRng,
    pending: Option<PendingRequest>,
}

impl Session {
    pub fn new(bank: WordBank, source: Arc<dyn MessageSource>) -> Self {
        Self::with_rng(bank, source, StdRng::from_entropy())
    }

    pub fn with_rng(bank: WordBank, source: Arc<dyn MessageSource>, rng: StdRng) -> Self {
        Self {
            bank,
            source,
            rng,
            pending: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn can_pull(&self) -> bool {
        !self.is_busy() && self.bank.is_usable()
    }

    pub fn trigger(&self) -> TriggerState {
        if self.is_busy() {
            TriggerState::Busy
        } else if self.can_pull() {
            TriggerState::Ready
        } else {
            TriggerState::Disabled
        }
    }

    /// Sample ten words and start a background request for them.
    pub fn pull(&mut self) -> Result<Vec<String>, PullError> {
        if self.pending.is_some() {
            return Err(PullError::Busy);
        }
        let words = sample_words(self.bank.words(), &mut self.rng)?;
        log::info!("pulling string with words: {}", words.join(", "));
        self.pending = Some(spawn_request(Arc::clone(&self.source), words.clone()));
        Ok(words)
    }

    /// Take the outcome of the in-flight request if it has resolved.
    pub fn poll(&mut self) -> Option<RequestOutcome> {
        let outcome = self.pending.as_mut()?.try_outcome()?;
        self.pending = None;
        Some(outcome)
    }
}

/// User-facing text for a failed request, always followed by [`FAILURE_HINT`].
pub fn failure_text(err: &RequestError) -> String {
    let summary = match err {
        RequestError::Api { .. } => format!("API Error:\n{}", err.detail()),
        RequestError::Connection => CONNECTION_FAILURE.to_string(),
        RequestError::Unknown(_) => err.detail(),
    };
    format!("Error: {summary}\n\n{FAILURE_HINT}")
}

/// Load the word bank, offering to create the fallback list when it is missing.
///
/// Never fails: problems are reported through the interface and leave an
/// empty bank behind, which keeps the trigger disabled.
pub fn prepare_wordbank<I: AppInterface>(path: &Path, auto_accept: bool, interface: &mut I) -> WordBank {
    match load_wordbank(path) {
        Ok(WordBankStatus::Loaded(bank)) => {
            interface.display_wordbank_status(&BankNotice::Loaded(bank.len()));
            bank
        }
        Ok(WordBankStatus::TooSmall(bank)) => {
            interface.display_wordbank_status(&BankNotice::TooSmall(bank.len()));
            bank
        }
        Ok(WordBankStatus::Missing) => {
            interface.display_wordbank_status(&BankNotice::Missing(path.to_path_buf()));
            if !(auto_accept || interface.offer_default_wordbank(path)) {
                return WordBank::default();
            }
            if let Err(e) = write_default_wordbank(path) {
                log::error!("could not write default word bank: {e}");
                interface.display_wordbank_status(&BankNotice::Failed(e.to_string()));
                return WordBank::default();
            }
            interface.display_wordbank_status(&BankNotice::Created(path.to_path_buf()));
            match load_wordbank(path) {
                Ok(WordBankStatus::Loaded(bank) | WordBankStatus::TooSmall(bank)) => {
                    interface.display_wordbank_status(&BankNotice::Loaded(bank.len()));
                    bank
                }
                Ok(WordBankStatus::Missing) => WordBank::default(),
                Err(e) => {
                    interface.display_wordbank_status(&BankNotice::Failed(e.to_string()));
                    WordBank::default()
                }
            }
        }
        Err(e) => {
            log::error!("{e}");
            interface.display_wordbank_status(&BankNotice::Failed(e.to_string()));
            WordBank::default()
        }
    }
}

fn deliver_outcome<I: AppInterface>(interface: &mut I, outcome: RequestOutcome) {
    match outcome {
        Ok(message) => interface.display_message(&format_message(&message)),
        Err(e) => interface.display_failure(&failure_text(&e)),
    }
}

/// Drive the interactive loop until the user exits.
///
/// Outcomes are picked up here, on the caller's thread, between input polls.
pub fn run_session<I: AppInterface>(session: &mut Session, interface: &mut I) {
    loop {
        if let Some(outcome) = session.poll() {
            deliver_outcome(interface, outcome);
        }

        match interface.next_action(session.trigger()) {
            Some(UserAction::Exit) => {
                if session.is_busy() {
                    log::info!("exiting with a request still in flight");
                }
                interface.display_exit_message();
                break;
            }
            Some(UserAction::Pull) => match session.pull() {
                Ok(words) => {
                    interface.display_words(&words);
                    interface.display_pulling();
                }
                Err(PullError::Busy) => log::debug!("pull ignored while busy"),
                Err(PullError::Sample(e)) => interface.display_failure(&e.to_string()),
            },
            None => {}
        }
    }
}
