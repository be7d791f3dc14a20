use godstring::cli::{CliInterface, parse_cli};
use godstring::logging::init_logging;
use godstring::requester::{MessageRequester, MessageSource};
use godstring::session::{AppInterface, Session, prepare_wordbank, run_session};
use godstring::tui::TuiInterface;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

fn run<I: AppInterface>(
    interface: &mut I,
    wordbank_path: &std::path::Path,
    auto_accept: bool,
    source: Arc<dyn MessageSource>,
) {
    let bank = prepare_wordbank(wordbank_path, auto_accept, interface);
    let mut session = Session::new(bank, source);
    run_session(&mut session, interface);
}

fn main() -> ExitCode {
    let cli = parse_cli();
    if let Some(path) = init_logging(!cli.plain) {
        eprintln!("Logging to {}", path.display());
    }

    let requester = match MessageRequester::new(cli.requester_config()) {
        Ok(requester) => requester,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("using endpoint {}", requester.config().endpoint);
    let source: Arc<dyn MessageSource> = Arc::new(requester);

    if cli.plain {
        let stdin = io::stdin();
        let mut interface = CliInterface::new(stdin.lock());
        run(&mut interface, &cli.wordbank_path, cli.yes, source);
        return ExitCode::SUCCESS;
    }

    match TuiInterface::new() {
        Ok(mut interface) => {
            run(&mut interface, &cli.wordbank_path, cli.yes, source);
            if let Err(e) = interface.cleanup() {
                eprintln!("Failed to restore terminal: {e}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to initialize terminal UI: {e}");
            eprintln!("Run with --plain for line-based mode.");
            ExitCode::FAILURE
        }
    }
}
