use crate::{data::Error, registry::Accounts};
use std::path::Path;
use tracing::info;

/// Rewrites the file at `path` with the whole registry.
pub(crate) fn save_accounts(path: &Path, accounts: &Accounts) -> Result<(), anyhow::Error> {
    let file = std::fs::File::create(path)?;
    write_accounts(file, accounts)?;
    info!(path = %path.display(), count = accounts.len(), "accounts saved");
    Ok(())
}

/// Basic `;`-separated exporter for `Accounts`, one record per line, no header.
pub(crate) fn write_accounts<W: std::io::Write>(
    writer: W,
    accounts: &Accounts,
) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(writer);
    for account in accounts.iter() {
        wtr.serialize(account)?;
    }
    wtr.flush()?;
    Ok(())
}
