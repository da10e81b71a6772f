use thiserror::Error;

// ---------------------------------------------------------------------------
// Import errors
// ---------------------------------------------------------------------------

/// Why a raw data file could not be imported.
///
/// Parsing is all-or-nothing: any of these means no `RawFile` was produced.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: malformed header ({reason})")]
    MalformedHeader { line: usize, reason: String },

    #[error("line {line}: expected {expected} cells but found {found}")]
    InconsistentRowLength {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, column {column}: '{text}' is not a number")]
    NonNumericCell {
        line: usize,
        column: usize,
        text: String,
    },

    #[error("file contains no data")]
    EmptyFile,

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("reading file: {0}")]
    Io(#[from] std::io::Error),

    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Trace set / algebra errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum TraceError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("index {index} out of range for {len} traces")]
    IndexOutOfRange { index: usize, len: usize },

    /// Some selected traces do not share the reference x axis.
    #[error("{count} selected trace(s) have different x-axis points")]
    IncompatibleAxis { count: usize },

    /// A trace a pending operation was planned on is no longer in the set.
    #[error("a source trace was removed before the operation was applied")]
    SourceRemoved { seed: u64 },
}

// ---------------------------------------------------------------------------
// SVD errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum SvdError {
    #[error("no rows selected for SVD")]
    EmptyMatrix,

    #[error("row {row} has {found} values, expected {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("singular value decomposition did not converge")]
    NoConvergence,
}

// ---------------------------------------------------------------------------
// Plot command errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' expects {expected}")]
    BadArguments {
        command: &'static str,
        expected: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing export: {0}")]
    Io(#[from] std::io::Error),

    #[error("writing export: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

/// Any failure of an [`AppState`](crate::state::AppState) action.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no file selected")]
    NoFile,

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Svd(#[from] SvdError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Command(#[from] CommandError),
}
