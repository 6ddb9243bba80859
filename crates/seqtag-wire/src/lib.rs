#![doc = include_str!("../README.md")]

mod common;
pub use common::*;
// Public re-export so downstream crates can access `seqtag` via
// `seqtag_wire::seqtag`
pub use seqtag;
