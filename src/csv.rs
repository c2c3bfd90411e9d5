use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::bank::{Account, AccountError};
use crate::{AccountId, Amount};

/// Errors that can occur when reading the account seed file
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("failed to open account file: {0}")]
    Open(#[source] csv::Error),

    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: balance {balance} is not a representable amount")]
    InvalidBalance { line: usize, balance: f64 },

    #[error("line {line}: {source}")]
    Account { line: usize, source: AccountError },
}

#[derive(Debug, Deserialize)]
struct AccountRow {
    account: AccountId,
    balance: f64,
}

#[derive(Debug, Serialize)]
struct BalanceRow {
    account: AccountId,
    balance: String,
}

/// Read opening accounts from a csv file with an `account,balance` header
pub fn read_accounts(
    path: impl AsRef<Path>,
) -> Result<impl Iterator<Item = Result<Account, CsvError>>, CsvError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(CsvError::Open)?;

    Ok(reader
        .into_deserialize::<AccountRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            let Some(balance) = Amount::checked_from_float(row.balance) else {
                return Err(CsvError::InvalidBalance {
                    line,
                    balance: row.balance,
                });
            };
            Account::new(row.account, balance)
                .map_err(|source| CsvError::Account { line, source })
        }))
}

/// Write final balances in csv format
pub fn write_balances<W: io::Write>(
    writer: W,
    balances: impl IntoIterator<Item = (AccountId, Amount)>,
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);

    for (account, balance) in balances {
        writer.serialize(BalanceRow {
            account,
            balance: balance.to_string(),
        })?;
    }

    writer.flush()?;
    Ok(())
}
