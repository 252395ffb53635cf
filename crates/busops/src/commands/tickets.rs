//! Ticket command handlers.

use tabled::Tabled;

use busops_core::pages::{StatusFilter, TicketsPage};
use busops_core::{Ticket, TicketId, TicketingApi};

use crate::cli::{StatusArg, TicketsArgs, TicketsCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: TicketId,
    #[tabled(rename = "Passenger")]
    passenger: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Line")]
    line: String,
    #[tabled(rename = "Valid from")]
    valid_from: String,
    #[tabled(rename = "Expires")]
    expires: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Ticket> for TicketRow {
    fn from(t: &Ticket) -> Self {
        Self {
            id: t.id,
            passenger: t.passenger_name.clone(),
            email: t.passenger_email.clone(),
            category: t.category_name.clone(),
            line: t.line_label().to_owned(),
            valid_from: t.valid_from.format(DATE_FORMAT).to_string(),
            expires: t.expiration_date.format(DATE_FORMAT).to_string(),
            status: t.status().to_string(),
        }
    }
}

pub(super) fn detail(t: &Ticket) -> String {
    format!(
        "Ticket #{}\n\
         Passenger:   {} <{}>\n\
         Category:    {}\n\
         Line:        {}\n\
         Purchased:   {}\n\
         Valid from:  {}\n\
         Expires:     {}\n\
         Status:      {}",
        t.id,
        t.passenger_name,
        t.passenger_email,
        t.category_name,
        t.line_label(),
        t.purchase_date.format(DATE_FORMAT),
        t.valid_from.format(DATE_FORMAT),
        t.expiration_date.format(DATE_FORMAT),
        t.status(),
    )
}

impl From<StatusArg> for StatusFilter {
    fn from(s: StatusArg) -> Self {
        match s {
            StatusArg::All => Self::All,
            StatusArg::Active => Self::Active,
            StatusArg::Inactive => Self::Inactive,
        }
    }
}

fn single(ticket: &Ticket, settings: &Settings) -> Result<(), CliError> {
    let out = output::render_single(settings.output, ticket, detail, |t| t.id.to_string())?;
    output::print_output(&out, settings.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    api: &dyn TicketingApi,
    args: TicketsArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    match args.command {
        TicketsCommand::List {
            email,
            status,
            line,
            page,
            size,
        } => {
            let mut tickets = TicketsPage::with_page_size(size.unwrap_or(settings.page_size));
            tickets.email = email.unwrap_or_default();
            tickets.status = status.into();
            tickets.line_id = line;
            tickets.page = page;
            tickets.fetch(api).await?;

            if let Some(empty) = tickets.empty_state() {
                output::print_status(empty, settings.quiet);
                return Ok(());
            }
            let out = output::render_list(
                settings.output,
                tickets.tickets(),
                |t| TicketRow::from(t),
                |t| t.id.to_string(),
            )?;
            output::print_output(&out, settings.quiet);
            if let Some(results) = tickets.results.as_ref() {
                let footer = format!(
                    "{} ({} tickets)",
                    results.position_label(),
                    results.total_elements
                );
                eprintln!("{}", output::dim(&footer, settings.color));
            }
            Ok(())
        }

        TicketsCommand::Get { id } => {
            let ticket = api
                .get_ticket(id)
                .await
                .map_err(|e| CliError::from(e).with_list_hint("tickets list"))?;
            single(&ticket, settings)
        }

        TicketsCommand::Renew { id } => {
            let renewed = api.renew_ticket(id).await?;
            output::print_status(&TicketsPage::renewed_message(&renewed), settings.quiet);
            single(&renewed, settings)
        }

        TicketsCommand::Cancel { id } => {
            let ticket = api
                .get_ticket(id)
                .await
                .map_err(|e| CliError::from(e).with_list_hint("tickets list"))?;
            if !TicketsPage::can_cancel(&ticket) {
                return Err(CliError::InvalidInput(format!(
                    "Ticket #{id} is {} and cannot be cancelled",
                    ticket.status().to_string().to_lowercase()
                )));
            }
            let mut tickets = TicketsPage::default();
            let pending = tickets.request_cancel_for(&ticket);
            let accepted = util::confirm(pending, settings.yes)?;
            if tickets.resolve_cancel(api, accepted).await? {
                output::print_status(&format!("Ticket #{id} cancelled"), settings.quiet);
            }
            Ok(())
        }
    }
}
