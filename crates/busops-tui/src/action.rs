//! All possible UI actions. Actions are the sole mechanism for state mutation.

use crate::screen::Route;

/// Every state transition in the console is expressed as an Action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    /// Mount the page at this route, pushing the current one on history.
    Navigate(Route),
    GoBack,

    // ── Page tasks ────────────────────────────────────────────────
    /// A spawned backend call finished and the page model changed.
    PageUpdated,

    // ── Confirm dialog ────────────────────────────────────────────
    /// Show a yes/no modal with this prompt. The answer goes back to
    /// the active screen as `ConfirmYes` / `ConfirmNo`.
    ShowConfirm(String),
    ConfirmYes,
    ConfirmNo,

    // ── Help ──────────────────────────────────────────────────────
    ToggleHelp,
}
