pub mod hash;
pub mod instance;
pub mod table;
pub mod types;

#[cfg(test)]
mod hash_tests;
#[cfg(test)]
mod types_tests;

use typelib_format::DecodeError;
use typelib_lib::{AssetError, ComponentError};

/// Anything a command can fail with. Printed as `error: {e}`.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Component(#[from] ComponentError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Print the command output, or the error and exit with status 1.
pub fn finish(result: Result<String, CommandError>) {
    match result {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
