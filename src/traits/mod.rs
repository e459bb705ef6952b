//! Traits shared across the crate.
//!
//! - [`Healthcheck`]: verify that rendering can work before taking traffic
//!
//! Process spawning sits behind [`CommandRunner`](crate::runner::CommandRunner),
//! which lives with its implementations in [`runner`](crate::runner).

mod healthcheck;

pub use healthcheck::Healthcheck;
