//! Cache-aside resolution of short codes.
//!
//! The durable store owns every [`MappingRecord`]. The fast cache is a
//! disposable overlay: entries expire and are refilled from the store, never
//! the reverse. Records are immutable once written, so a cached value is
//! either absent, expired, or correct; it is never stale.
//!
//! - [`interface`]: the [`DurableStore`] and [`FastCache`] collaborator traits.
//! - [`memory`]: in-process implementations of both.
//! - [`shortener`]: [`Shortener`], the caller-facing create/resolve API.

mod error;
mod interface;
mod memory;
mod record;
mod shortener;

pub use error::*;
pub use interface::*;
pub use memory::*;
pub use record::*;
pub use shortener::*;
