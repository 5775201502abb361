//! # rollback-client
//!
//! Typed client for the slice of the CircleCI v2 API the rollback tool
//! consumes: project lookup, deploy settings, components, environments,
//! component versions, the rollback pipeline trigger, and workflow reruns.
//!
//! All network calls go through a single transport helper that applies the
//! configured retry policy (transient failures only) and races every request
//! against the caller's cancellation token.
//!
//! The [`CircleCiApi`] trait is the seam between the resolution engine and
//! the wire: the engine only ever sees the trait, so tests substitute a mock
//! without touching HTTP.

pub mod api;
pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use api::CircleCiApi;
pub use client::CircleCiClient;
pub use error::ApiError;
pub use types::{DeploySettings, Paged, ProjectDetail, RerunWorkflowResponse, RollbackRun};
