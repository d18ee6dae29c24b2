#![doc = include_str!("../README.md")]

mod base62;
mod generator;
mod id;
mod mutex;
mod node;
mod resolve;
mod time;

pub use crate::base62::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::node::*;
pub use crate::resolve::*;
pub use crate::time::*;
