use chrono::NaiveDateTime;

use crate::backend::TicketingApi;
use crate::error::CoreError;
use crate::model::{BusLine, CategoryId, LineId, Ticket, TicketCategory};
use crate::requests::PurchaseInput;

use super::{Banner, Form, required};

const VALID_FROM_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Parse an operator-typed start of validity. Blank means "now".
pub fn parse_valid_from(raw: &str) -> Result<Option<NaiveDateTime>, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    VALID_FROM_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(Some)
        .ok_or_else(|| CoreError::validation("Valid from must look like 2026-02-10T08:00"))
}

/// Purchase form. Category and line are picked from the loaded catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseForm {
    pub passenger_name: String,
    pub passenger_email: String,
    pub category_id: Option<CategoryId>,
    /// `None` means valid on all lines.
    pub line_id: Option<LineId>,
    pub valid_from: String,
}

impl PurchaseForm {
    pub const CATEGORY_FIELD: usize = 2;
    pub const LINE_FIELD: usize = 3;

    pub fn to_input(&self) -> Result<PurchaseInput, CoreError> {
        Ok(PurchaseInput {
            passenger_name: required(&self.passenger_name, "Passenger name is required")?,
            passenger_email: required(&self.passenger_email, "Passenger email is required")?,
            category_id: self
                .category_id
                .ok_or_else(|| CoreError::validation("Ticket category is required"))?,
            line_id: self.line_id,
            valid_from: parse_valid_from(&self.valid_from)?,
        })
    }
}

impl Form for PurchaseForm {
    fn labels(&self) -> &'static [&'static str] {
        &["Passenger name", "Email", "Category", "Bus line", "Valid from"]
    }

    fn value(&self, field: usize) -> &str {
        match field {
            0 => &self.passenger_name,
            1 => &self.passenger_email,
            4 => &self.valid_from,
            _ => "",
        }
    }

    fn value_mut(&mut self, field: usize) -> Option<&mut String> {
        match field {
            0 => Some(&mut self.passenger_name),
            1 => Some(&mut self.passenger_email),
            4 => Some(&mut self.valid_from),
            _ => None,
        }
    }
}

/// Buy-ticket page: form, then a summary of the created ticket.
#[derive(Debug, Default)]
pub struct PurchasePage {
    pub categories: Vec<TicketCategory>,
    pub lines: Vec<BusLine>,
    pub form: PurchaseForm,
    /// The ticket just bought; the form is hidden while this is set.
    pub result: Option<Ticket>,
    pub banner: Banner,
}

impl PurchasePage {
    pub async fn mount(&mut self, api: &dyn TicketingApi) -> Result<(), CoreError> {
        self.categories = self.banner.track(api.list_categories().await)?;
        self.lines = self.banner.track(api.list_lines().await)?;
        if self.form.category_id.is_none() {
            self.form.category_id = self.categories.first().map(|c| c.id);
        }
        Ok(())
    }

    /// Lines that may be picked. Inactive lines are not sold.
    pub fn line_options(&self) -> impl Iterator<Item = &BusLine> {
        self.lines.iter().filter(|l| l.active)
    }

    pub fn selected_category(&self) -> Option<&TicketCategory> {
        let id = self.form.category_id?;
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn line_label(&self) -> String {
        self.form
            .line_id
            .and_then(|id| self.lines.iter().find(|l| l.id == id))
            .map_or_else(|| "All lines".into(), |l| l.name.clone())
    }

    pub fn cycle_category(&mut self, forward: bool) {
        let ids: Vec<Option<CategoryId>> = self.categories.iter().map(|c| Some(c.id)).collect();
        self.form.category_id = cycle(&ids, self.form.category_id, forward).flatten();
    }

    /// Step through `All lines` followed by each active line.
    pub fn cycle_line(&mut self, forward: bool) {
        let ids: Vec<Option<LineId>> = std::iter::once(None)
            .chain(self.line_options().map(|l| Some(l.id)))
            .collect();
        self.form.line_id = cycle(&ids, self.form.line_id, forward).flatten();
    }

    pub async fn submit(&mut self, api: &dyn TicketingApi) -> Result<Ticket, CoreError> {
        let input = self.banner.track(self.form.to_input())?;
        let ticket = self.banner.track(api.purchase_ticket(&input).await)?;
        self.banner.info(format!("Ticket #{} purchased", ticket.id));
        self.result = Some(ticket.clone());
        Ok(ticket)
    }

    /// Back to an empty form, keeping the loaded catalogs.
    pub fn buy_another(&mut self) {
        self.result = None;
        self.banner.clear();
        self.form = PurchaseForm {
            category_id: self.categories.first().map(|c| c.id),
            ..PurchaseForm::default()
        };
    }
}

fn cycle<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> Option<T> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let next = match options.iter().position(|o| *o == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    options.get(next).copied()
}
