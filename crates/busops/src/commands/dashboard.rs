//! Dashboard handler.

use serde::Serialize;

use busops_core::TicketingApi;
use busops_core::pages::DashboardPage;

use crate::config::Settings;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct Summary {
    lines: usize,
    active_lines: usize,
    categories: usize,
    tickets: u64,
}

pub async fn handle(api: &dyn TicketingApi, settings: &Settings) -> Result<(), CliError> {
    let mut page = DashboardPage::default();
    page.load(api).await?;

    let summary = Summary {
        lines: page.line_count.unwrap_or_default(),
        active_lines: page.active_line_count.unwrap_or_default(),
        categories: page.category_count.unwrap_or_default(),
        tickets: page.ticket_count.unwrap_or_default(),
    };
    let color = settings.color;
    let out = output::render_single(
        settings.output,
        &summary,
        |s| {
            format!(
                "{}\nBus lines:         {} ({} active)\nTicket categories: {}\nTickets sold:      {}",
                output::heading("Bus ticketing overview", color),
                s.lines,
                s.active_lines,
                s.categories,
                s.tickets
            )
        },
        |s| s.tickets.to_string(),
    )?;
    output::print_output(&out, settings.quiet);
    Ok(())
}
