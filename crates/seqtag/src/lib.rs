#![doc = include_str!("../README.md")]

mod allocator;
mod artifact;
mod counter;
mod error;
mod identifier;
mod record;
mod rows;
mod store;

pub use crate::allocator::*;
pub use crate::artifact::*;
pub use crate::counter::*;
pub use crate::error::*;
pub use crate::identifier::*;
pub use crate::record::*;
pub use crate::rows::*;
pub use crate::store::*;
