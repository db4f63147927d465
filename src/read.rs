use crate::{
    data::{Account, Error, SIGNIFICANT_DIGITS},
    registry::Accounts,
};
use std::{io::ErrorKind, path::Path};
use tracing::{info, warn};

/// Number of fields in a `name;address;balance` record.
const FIELDS: usize = 3;

/// Loads the registry stored at `path`. A missing file is an empty registry.
pub(crate) fn load_accounts(path: &Path) -> Result<Accounts, anyhow::Error> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no account file, starting empty");
            return Ok(Accounts::new());
        }
        Err(e) => return Err(e.into()),
    };
    let accounts = read_accounts(file)?;
    info!(path = %path.display(), count = accounts.len(), "accounts loaded");
    Ok(accounts)
}

/// Headerless `;`-separated importer for `Account`s. Records with the wrong number of
/// fields are skipped with a warning; a balance that isn't a number stops the load.
pub(crate) fn read_accounts<R: std::io::Read>(reader: R) -> Result<Accounts, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut accounts = Accounts::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != FIELDS {
            warn!(
                line,
                fields = record.len(),
                "expected {FIELDS} fields, skipping record"
            );
            continue;
        }
        let mut account: Account = record
            .deserialize(None)
            .map_err(|_| Error::BadBalance { line })?;
        account.balance.rescale(SIGNIFICANT_DIGITS);
        if account.balance.scale() != SIGNIFICANT_DIGITS {
            return Err(Error::BadBalance { line });
        }
        accounts.push(account);
    }
    Ok(accounts)
}

#[cfg(test)]
mod tests {
    use super::read_accounts;
    use crate::data::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn read_accounts_in_order() {
        let adb = b"\
Jane Doe;1 Main St;150.000000
John Roe;2 Side St;-50.5
jane doe;3 High St;0
";
        let accounts = read_accounts(&adb[..]).unwrap();
        let rows: Vec<_> = accounts
            .iter()
            .map(|a| (a.name.as_str(), a.address.as_str(), a.balance))
            .collect();
        assert_eq!(
            rows,
            [
                ("Jane Doe", "1 Main St", dec!(150)),
                ("John Roe", "2 Side St", dec!(-50.50)),
                ("jane doe", "3 High St", dec!(0)),
            ]
        );
        assert_eq!(accounts.iter().next().unwrap().balance.to_string(), "150.00");
    }

    #[test]
    fn wrong_field_count_is_skipped() {
        let adb = b"\
Jane Doe;1 Main St;10
only two;fields
John Roe;2 Side St;20
one;two;three;four

Max Poe;4 Low St;30
";
        let accounts = read_accounts(&adb[..]).unwrap();
        let names: Vec<_> = accounts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Jane Doe", "John Roe", "Max Poe"]);
    }

    #[test]
    fn malformed_balance_is_fatal() {
        let adb = b"\
Jane Doe;1 Main St;10
John Roe;2 Side St;lots
";
        assert!(matches!(
            read_accounts(&adb[..]),
            Err(Error::BadBalance { line: 2 })
        ));
    }

    #[test]
    fn balance_without_room_for_cents_is_fatal() {
        let adb = b"Jane Doe;1 Main St;79228162514264337593543950335\n";
        assert!(matches!(
            read_accounts(&adb[..]),
            Err(Error::BadBalance { line: 1 })
        ));
    }

    #[test]
    fn empty_input_is_empty_registry() {
        assert_eq!(read_accounts(&b""[..]).unwrap().len(), 0);
    }
}
