//! Built-in jobs.

pub mod digest;
pub mod dispatcher;
pub mod outcome;

pub use digest::{DailyDigestJob, DigestDelivery, DigestReport};
pub use dispatcher::{AlertDelivery, DeliveryDispatcher, DispatchReport};
pub use outcome::ChannelOutcome;
