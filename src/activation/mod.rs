//! Activation of not-ready subscribers.
//!
//! Internal modules:
//! - [`plan`]: pure branch selection from (installed?, enabled?,
//!   installable-found?);
//! - [`coordinator`]: gathers the facts and executes the selected branch
//!   through the lifecycle, confirmation, notification, and restart
//!   collaborators.

pub(crate) mod coordinator;
pub(crate) mod plan;

pub(crate) use coordinator::Coordinator;
