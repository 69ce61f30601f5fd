//! Text and HTML bodies for outbound email and SMS.

pub mod account;
pub mod alert;
pub mod digest;

pub use digest::DigestContent;
