//! # Activation plan: pure branch selection for an unhandled message.
//!
//! The resolution policy for a message whose subscriber is not part of the
//! running session is a pure function of three facts — installed?,
//! enabled?, installable-found? — kept free of dialog and notification
//! collaborators so it stays testable as a truth table. The coordinator
//! gathers the facts and executes the selected branch.

/// Resolution branch for an unhandled message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ActivationPlan {
    /// Installed and enabled but not part of the running session: offer a
    /// host restart.
    RestartHost,
    /// Installed but disabled: offer to enable, then restart.
    EnableAndRestart,
    /// Not installed, compatible package available: offer to install.
    Install,
    /// Not installed and nothing compatible: stop silently.
    Ignore,
}

/// Selects the resolution branch from the gathered facts.
///
/// `installable` only matters when the subscriber is not installed.
pub(crate) fn resolve_plan(installed: bool, enabled: bool, installable: bool) -> ActivationPlan {
    match (installed, enabled, installable) {
        (true, true, _) => ActivationPlan::RestartHost,
        (true, false, _) => ActivationPlan::EnableAndRestart,
        (false, _, true) => ActivationPlan::Install,
        (false, _, false) => ActivationPlan::Ignore,
    }
}
