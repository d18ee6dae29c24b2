mod error;
mod resolver;
mod source;

pub use error::*;
pub use resolver::*;
pub use source::*;
