//! Request and response bodies. All fields are camelCase on the wire.

pub mod request;
pub mod response;
