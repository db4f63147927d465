use data::DEFAULT_PATH;
use prompt::Console;
use read::load_accounts;
use session::{Session, Status};
use std::path::Path;
use tracing_subscriber::EnvFilter;
use write::save_accounts;

mod data;
mod prompt;
mod read;
mod registry;
mod session;
mod write;

fn main() -> Result<(), anyhow::Error> {
    // Diagnostics go to stderr; stdout belongs to the session.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = Path::new(DEFAULT_PATH);
    let accounts = load_accounts(path)?;

    let console = Console::new(std::io::stdin().lock(), std::io::stdout());
    let mut session = Session::new(accounts, console);
    while session.advance()? == Status::Continue {}

    let (accounts, _) = session.into_inner();
    save_accounts(path, &accounts)?;
    Ok(())
}
