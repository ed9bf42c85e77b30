//! Interactive prompts.

use crate::core::error::{Error, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Prompt shown when no folder was given on the command line.
pub const FOLDER_PROMPT: &str = "Masukkan path folder untuk dipindai:";

/// Write the folder prompt to `output` and read the answer from `input`.
///
/// A blank answer is reported as [`Error::PathNotFound`].
pub fn read_folder_path<R, W>(mut input: R, mut output: W) -> Result<PathBuf>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", FOLDER_PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let folder = line.trim();
    if folder.is_empty() {
        return Err(Error::PathNotFound(PathBuf::new()));
    }
    Ok(PathBuf::from(folder))
}
