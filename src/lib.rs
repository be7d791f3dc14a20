// Library interface for godstring
// This allows integration tests to access internal modules

pub mod cli;
pub mod formatter;
pub mod logging;
pub mod prompt;
pub mod relay;
pub mod requester;
pub mod sampler;
pub mod session;
pub mod tui;
pub mod wordbank;

// Re-export commonly used functions for easier testing
pub use formatter::format_message;
pub use prompt::build_prompt;
pub use relay::{PendingRequest, spawn_request};
pub use requester::{
    FailureKind, MessageRequester, MessageSource, RequestError, RequestOutcome, RequesterConfig,
    extract_message,
};
pub use sampler::{SAMPLE_SIZE, SampleError, sample_words};
pub use session::{AppInterface, Session, TriggerState, UserAction, prepare_wordbank, run_session};
pub use wordbank::{WordBank, load_wordbank, load_wordbank_from_file, load_wordbank_from_str};
