mod codec;
mod error;
mod interface;
mod short_code;

pub use codec::*;
pub use error::*;
pub use interface::*;
pub use short_code::*;
