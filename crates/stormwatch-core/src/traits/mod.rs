//! Traits defined in `stormwatch-core` and implemented by other crates.

pub mod clock;
pub mod messaging;
pub mod weather;

pub use clock::{Clock, FixedClock, SystemClock};
pub use messaging::{EmailMessage, EmailSender, SmsMessage, SmsSender};
pub use weather::{RecommendationProvider, WeatherProvider};
