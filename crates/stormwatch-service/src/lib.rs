//! # stormwatch-service
//!
//! Business logic layer for Stormwatch. Services orchestrate the store
//! traits from `stormwatch-database`, the provider traits from
//! `stormwatch-core` and the auth primitives to implement the use cases
//! behind the HTTP API and the background jobs.
//!
//! Services take all collaborators at construction time as `Arc<dyn Trait>`.

pub mod account;
pub mod context;
pub mod notification;
pub mod task;
pub mod templates;
pub mod weather;

pub use account::{AccountService, AuthSession, Registration};
pub use context::RequestContext;
pub use notification::{NewNotification, NotificationService};
pub use task::{AddedTask, TaskService};
pub use weather::{AlertScheduler, Assessment, ForecastWindow, classify};
