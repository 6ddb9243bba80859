//! Error types for the allocation pipeline.
//!
//! This module defines the central `Error` enum, which captures every
//! recoverable and reportable error case within the pipeline. No variant is
//! fatal to a session: callers surface the error and keep their existing
//! state, with the exception of input errors, which must prevent a batch
//! replacement from happening at all.
//!
//! ## Error Cases
//! - `Input` / `EmptyInput`: The source file was malformed or contained no
//!   data rows.
//! - `Selection`: A prerequisite (file, column choice) was missing or did
//!   not resolve against the loaded rows.
//! - `NoRowsSelected`: The resolved value column yielded zero non-empty
//!   rows; nothing was allocated.
//! - `NothingSelected` / `NothingLabeled`: The print filter produced an
//!   empty set — distinguished so the user learns *why* nothing printed.
//! - `Render`: A single symbol failed to render. Per-symbol and non-fatal.
//! - `Network`: The authority was unreachable. Recoverable; callers fall
//!   back to the cached counter.
//! - `AuthorityRejection`: The authority answered `success: false`. The
//!   batch stays allocated locally.

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the allocation pipeline.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The source file could not be parsed.
    #[error("input error: {reason}")]
    Input { reason: String },

    /// The source file parsed but contained zero data rows.
    #[error("input contains no data rows")]
    EmptyInput,

    /// A prerequisite for the requested action was missing.
    #[error("selection error: {reason}")]
    Selection { reason: String },

    /// The chosen value column produced no rows to allocate.
    #[error("no rows with a non-empty value in column `{column}`")]
    NoRowsSelected { column: String },

    /// Printing was requested with no records selected.
    #[error("no records selected for printing")]
    NothingSelected,

    /// Records were selected, but none carried a printable label.
    #[error("none of the selected records carry a label")]
    NothingLabeled,

    /// A single symbol could not be rendered.
    #[error("symbol render failed: {context}")]
    Render { context: String },

    /// The authority could not be reached at the transport level.
    #[error("authority unreachable: {context}")]
    Network { context: String },

    /// The authority answered the request with `success: false`.
    #[error("authority rejected batch: {description}")]
    AuthorityRejection { description: String },
}
