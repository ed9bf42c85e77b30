//! User interface components.

pub mod cli;
pub mod prompt;

pub use cli::Cli;
pub use prompt::read_folder_path;
