mod chunks;
mod decoder;
mod sanitize;
mod validate;

pub use chunks::*;
pub use decoder::*;
pub use sanitize::*;
pub use validate::*;
