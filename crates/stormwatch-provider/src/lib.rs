//! # stormwatch-provider
//!
//! Outbound integrations: the OpenWeatherMap REST API, the AI
//! recommendation server, the SMTP relay and the Fast2SMS gateway.
//! Every client implements one of the provider traits from
//! `stormwatch-core`, so services never see a concrete transport.
//!
//! With the `mock` feature the crate also exports in-process fakes used by
//! the service, worker and API test suites.

pub mod email;
mod http;
pub mod sms;
pub mod weather;

#[cfg(feature = "mock")]
pub mod mock;

pub use email::{LogEmailSender, SmtpEmailSender, build_email_sender};
pub use sms::{Fast2SmsSender, LogSmsSender, build_sms_sender};
pub use weather::{AiRecommendationClient, OpenWeatherClient};
