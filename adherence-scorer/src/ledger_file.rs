//! Binary persistence for allowance ledgers.

use std::io::BufReader;

use adherence_core::WeeklyAllowanceLedger;
use adherence_fs::{ensure_parent_dir, open_utf8_file, replace_file};
use bincode::Options;
use camino::Utf8Path;

use crate::{LedgerFileError, bincode_options};

/// Write `ledger` to `path` with `bincode`, creating the parent directory
/// when missing.
///
/// The ledger is encoded in memory and swapped in whole, so a failed write
/// keeps the previous ledger readable.
///
/// # Errors
/// Returns [`LedgerFileError`] when the directory or file cannot be created
/// or the ledger cannot be encoded.
pub fn write_ledger_file(
    path: &Utf8Path,
    ledger: &WeeklyAllowanceLedger,
) -> Result<(), LedgerFileError> {
    ensure_parent_dir(path).map_err(|source| LedgerFileError::CreateParent {
        path: path
            .parent()
            .map_or_else(|| Utf8Path::new(".").to_path_buf(), Utf8Path::to_path_buf),
        source,
    })?;
    let bytes = bincode_options()
        .serialize(ledger)
        .map_err(|source| LedgerFileError::Serialise {
            path: path.to_path_buf(),
            source,
        })?;
    replace_file(path, &bytes).map_err(|source| LedgerFileError::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("wrote {} ledger weeks to {path}", ledger.len());
    Ok(())
}

/// Read a ledger written by [`write_ledger_file`].
///
/// # Errors
/// Returns [`LedgerFileError::ReadFile`] when the file cannot be opened and
/// [`LedgerFileError::Deserialise`] when its contents do not decode.
pub fn read_ledger_file(path: &Utf8Path) -> Result<WeeklyAllowanceLedger, LedgerFileError> {
    let file = open_utf8_file(path).map_err(|source| LedgerFileError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let ledger: WeeklyAllowanceLedger = bincode_options()
        .deserialize_from(BufReader::new(file))
        .map_err(|source| LedgerFileError::Deserialise {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("read {} ledger weeks from {path}", ledger.len());
    Ok(ledger)
}
