//! Ticket purchase handler.

use busops_core::TicketingApi;
use busops_core::pages::PurchasePage;

use crate::cli::BuyArgs;
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::tickets;

pub async fn handle(
    api: &dyn TicketingApi,
    args: BuyArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    let mut page = PurchasePage::default();
    page.mount(api).await?;

    if let Some(line_id) = args.line {
        if !page.line_options().any(|l| l.id == line_id) {
            return Err(CliError::Validation {
                field: "line".into(),
                reason: format!("bus line #{line_id} is not an active line"),
            });
        }
    }

    page.form.passenger_name = args.name;
    page.form.passenger_email = args.email;
    page.form.category_id = Some(args.category);
    page.form.line_id = args.line;
    page.form.valid_from = args.valid_from.unwrap_or_default();

    let ticket = page.submit(api).await?;
    if let Some(message) = page.banner.message() {
        output::print_status(message, settings.quiet);
    }
    let out = output::render_single(settings.output, &ticket, tickets::detail, |t| {
        t.id.to_string()
    })?;
    output::print_output(&out, settings.quiet);
    Ok(())
}
