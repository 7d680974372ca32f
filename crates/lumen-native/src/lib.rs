//! The native-function bridge: turning `"ret name(t1,t2)"`-style
//! signature strings and a native closure into a linkable module of
//! the same shape a compiled one produces.

pub mod error;
pub mod module;
pub mod sig;

pub use error::NativeError;
pub use module::{create_module, NativeFuncDesc};
pub use sig::{parse_signature, ParsedSignature};
