mod cli;
mod inspect;
mod locale;
mod monitor;
mod report;
mod session;

use std::io;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

use locale::Language;
use monitor::Monitor;
use report::Reporter;
use session::X11Session;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let Cli {} = Cli::parse();

    let language = Language::from_env();
    let reporter = Reporter::new(language.messages());
    tracing::debug!(?language, "output language selected");

    if let Err(e) = reporter.banner(&mut io::stdout().lock()) {
        tracing::error!(error = %e, "cannot write to stdout");
        std::process::exit(1);
    }

    let session = match X11Session::open() {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "display connection failed");
            eprintln!("{}", reporter.messages().cannot_open_display);
            std::process::exit(1);
        }
    };
    tracing::info!(screen = session.screen_num(), "connected to X11 display");

    let monitor = Monitor::new(session, reporter);
    if let Err(e) = monitor::run(monitor, monitor::POLL_INTERVAL).await {
        eprintln!("xclipmon: {e}");
        std::process::exit(1);
    }
}
