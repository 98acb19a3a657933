//! Error handling for fanout.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building, rendering, or writing a template tree.
///
/// Skipped nodes (a filename variable bound to null) and unresolved placeholders
/// under the lenient policy are not errors; they are reported through `log`.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading the source tree failed.
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Writing a node to its destination failed. Aborts the remaining write pass.
    #[error("Failed to write '{}': {source}.", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A template body could not be evaluated.
    #[error("Template error in '{path}': {message}.")]
    RenderError { path: String, message: String },

    /// A zero-padded placeholder received a value that is not an integer,
    /// or a value that cannot be written into a path at all.
    #[error("Cannot format placeholder '{placeholder}': {reason}.")]
    FormatError { placeholder: String, reason: String },

    /// The accessor of a placeholder is neither a key nor an operation of the bound value.
    #[error("Value bound to '{name}' has no key or operation named '{accessor}'.")]
    UnknownAccessor { name: String, accessor: String },

    /// A filename placeholder names a variable that is not bound (strict policy only).
    #[error("Placeholder '{placeholder}' in '{path}' is not bound to any value.")]
    UnresolvedPlaceholder { path: String, placeholder: String },

    /// Bindings file or `KEY=VALUE` override could not be understood.
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    #[error("Output directory '{output_dir}' already exists. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },

    #[error("Template source '{}' does not exist.", path.display())]
    SourceNotFound { path: PathBuf },
}

/// Convenience type alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Prints the error to stderr and exits with status code 1.
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
