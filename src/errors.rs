/*!
 * Error types for the yadt application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error returned by the API itself (non-success HTTP status)
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Response body returned by the API
        message: String
    },

    /// Transport failure reaching the provider (DNS, TLS, refused, timeout)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The provider returned a different number of translations than it was sent
    #[error("Provider returned {actual} translations for a batch of {expected}")]
    CountMismatch {
        /// Number of texts submitted
        expected: usize,
        /// Number of translations received
        actual: usize,
    },
}

/// Errors raised while converting legacy `.ppt` files
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The conversion command is not installed or not on PATH
    #[error("Conversion tool '{0}' was not found; install LibreOffice or convert the file to .pptx")]
    ToolMissing(String),

    /// The conversion command did not finish in time
    #[error("Conversion timed out after {0} seconds")]
    Timeout(u64),

    /// The conversion command exited with a failure status
    #[error("Conversion failed (exit status {status}): {stderr}")]
    Failed {
        /// Exit status as reported by the OS
        status: String,
        /// Captured error output
        stderr: String,
    },

    /// The command succeeded but no .pptx file was produced
    #[error("Conversion produced no .pptx file for {0}")]
    OutputMissing(String),

    /// Any other I/O failure while spawning the tool
    #[error("Conversion I/O error: {0}")]
    Io(String),
}

/// Errors raised while reading, walking or writing documents
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The zip container could not be read or written
    #[error("Archive error: {0}")]
    Archive(String),

    /// An XML part could not be parsed or written
    #[error("XML error in {part}: {message}")]
    Xml {
        /// Part name inside the package
        part: String,
        /// Parser message
        message: String,
    },

    /// A part referenced by the package is missing
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// The notebook JSON is malformed or unsupported
    #[error("Notebook error: {0}")]
    Notebook(String),

    /// Translations do not line up with collected units
    #[error("Got {translations} translations for {units} units")]
    UnitCountMismatch {
        /// Number of collected units
        units: usize,
        /// Number of translations supplied
        translations: usize,
    },

    /// The file type is not handled
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or incomplete configuration (e.g. missing API key)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Legacy format conversion failed
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from document handling
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// No translatable text was found
    #[error("Nothing to translate in {0}")]
    EmptyInput(String),

    /// The translated document could not be written
    #[error("Failed to save translated document: {0}")]
    Serialization(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<zip::result::ZipError> for DocumentError {
    fn from(error: zip::result::ZipError) -> Self {
        Self::Archive(error.to_string())
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(error: serde_json::Error) -> Self {
        Self::Notebook(error.to_string())
    }
}
