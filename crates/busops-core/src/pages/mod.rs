// ── Page state ──
//
// Headless models of each console page. A page loads what it shows when
// mounted, keeps its own form and list state, and reloads after every
// successful mutation. Nothing is shared between pages.
//
// Errors are returned to the caller *and* recorded in the page's banner,
// so the CLI can propagate them while the TUI simply re-renders.

pub mod categories;
pub mod dashboard;
pub mod line_detail;
pub mod lines;
pub mod purchase;
pub mod stops;
pub mod tickets;

pub use categories::{CategoriesPage, CategoryForm};
pub use dashboard::DashboardPage;
pub use line_detail::LineDetailPage;
pub use lines::{LineForm, LinesPage};
pub use purchase::{PurchaseForm, PurchasePage};
pub use stops::{StopForm, StopsPage};
pub use tickets::{StatusFilter, TicketsPage};

use crate::error::CoreError;

// ── Banner ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Error,
}

/// Inline message area at the top of a page.
#[derive(Debug, Clone, Default)]
pub struct Banner {
    message: Option<(BannerKind, String)>,
}

impl Banner {
    pub fn info(&mut self, message: impl Into<String>) {
        self.message = Some((BannerKind::Info, message.into()));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.message = Some((BannerKind::Error, message.into()));
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|(_, m)| m.as_str())
    }

    pub fn kind(&self) -> Option<BannerKind> {
        self.message.as_ref().map(|(k, _)| *k)
    }

    pub fn is_error(&self) -> bool {
        self.kind() == Some(BannerKind::Error)
    }

    /// Record a failed result in the banner and hand the result back.
    pub fn track<T>(&mut self, result: Result<T, CoreError>) -> Result<T, CoreError> {
        if let Err(e) = &result {
            self.error(e.to_string());
        }
        result
    }
}

// ── Confirmation ─────────────────────────────────────────────────────

/// A destructive action waiting for an operator yes/no.
///
/// Pages only perform the action when the pending confirmation is
/// resolved with `true`; declining drops it without a backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirm<T> {
    pub subject: T,
    pub prompt: String,
}

// ── Forms ────────────────────────────────────────────────────────────

/// Text-field view over a form, for generic rendering and editing.
pub trait Form {
    fn labels(&self) -> &'static [&'static str];
    fn value(&self, field: usize) -> &str;
    /// `None` for fields that are not free text (pickers, toggles).
    fn value_mut(&mut self, field: usize) -> Option<&mut String>;

    fn field_count(&self) -> usize {
        self.labels().len()
    }
}

pub(crate) fn required(raw: &str, message: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(CoreError::validation(message))
    } else {
        Ok(trimmed.to_owned())
    }
}

pub(crate) fn optional(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Blank input is `None`; anything else must parse.
pub(crate) fn optional_number<T: std::str::FromStr>(
    raw: &str,
    field: &str,
) -> Result<Option<T>, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| CoreError::validation(format!("{field} must be a number")))
}

pub(crate) fn number<T: std::str::FromStr>(raw: &str, field: &str) -> Result<T, CoreError> {
    optional_number(raw, field)?
        .ok_or_else(|| CoreError::validation(format!("{field} is required")))
}
