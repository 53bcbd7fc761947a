//! Secret values exchanged with the MBI service.

pub mod secret;

pub use secret::*;
