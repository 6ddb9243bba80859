//! Artifact generation: the printable document and the replayable export.
//!
//! - [`print`] builds a standalone HTML document with one symbol block per
//!   printable record.
//! - [`export`] builds the tabular export used for offline reconciliation
//!   with the authority.
//! - [`symbol`] is the rendering seam: a trait per-symbol renderers plug
//!   into, with a Code 128 script renderer shipped by default.

mod export;
mod print;
mod symbol;

pub use export::*;
pub use print::*;
pub use symbol::*;
