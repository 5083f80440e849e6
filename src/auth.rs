//! Secret handling and inbound request signature verification.

pub mod secret;
pub mod signature;

pub use secret::*;
pub use signature::*;
