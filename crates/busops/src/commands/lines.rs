//! Bus line command handlers.

use std::fmt::Write;

use tabled::Tabled;

use busops_core::pages::{LineDetailPage, LinesPage};
use busops_core::{BusLine, LineId, TicketingApi};

use crate::cli::{LinesArgs, LinesCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "ID")]
    id: LineId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Stops")]
    stops: usize,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Route")]
    route: String,
}

impl From<&BusLine> for LineRow {
    fn from(l: &BusLine) -> Self {
        Self {
            id: l.id,
            name: l.name.clone(),
            stops: l.stops.len(),
            status: l.status_label(),
            route: l.route_summary(),
        }
    }
}

pub(super) fn detail(l: &BusLine, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", output::heading(&l.name, color));
    let _ = writeln!(out, "ID:          {}", l.id);
    let _ = writeln!(
        out,
        "Description: {}",
        util::or_dash(l.description.as_deref())
    );
    let _ = writeln!(out, "Status:      {}", l.status_label());
    let _ = writeln!(out, "Route:");
    if l.stops.is_empty() {
        let _ = write!(out, "  (no stops)");
    }
    for (i, stop) in l.stops.iter().enumerate() {
        let sep = if i + 1 == l.stops.len() { "" } else { "\n" };
        let _ = write!(
            out,
            "  {:>2}. {} (#{}){sep}",
            stop.order, stop.stop_name, stop.stop_id
        );
    }
    out
}

fn not_found(id: LineId) -> CliError {
    CliError::NotFound {
        message: format!("Bus line not found with id: {id}"),
        list_command: "lines list".into(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    api: &dyn TicketingApi,
    args: LinesArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    match args.command {
        LinesCommand::Get { id } => show(api, id, settings).await,
        command => manage(api, command, settings).await,
    }
}

async fn show(api: &dyn TicketingApi, id: LineId, settings: &Settings) -> Result<(), CliError> {
    let color = settings.color;
    let mut page = LineDetailPage::new(id);
    page.load(api)
        .await
        .map_err(|e| CliError::from(e).with_list_hint("lines list"))?;
    if let Some(line) = page.line.as_ref() {
        let out = output::render_single(
            settings.output,
            line,
            |l| detail(l, color),
            |l| l.id.to_string(),
        )?;
        output::print_output(&out, settings.quiet);
    }
    Ok(())
}

async fn manage(
    api: &dyn TicketingApi,
    command: LinesCommand,
    settings: &Settings,
) -> Result<(), CliError> {
    let color = settings.color;
    let mut page = LinesPage::default();
    page.load(api).await?;

    match command {
        LinesCommand::List => {
            let out = output::render_list(
                settings.output,
                &page.lines,
                |l| LineRow::from(l),
                |l| l.id.to_string(),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        LinesCommand::Create {
            name,
            description,
            stops,
        } => {
            page.open_create();
            if let Some(form) = page.form.as_mut() {
                form.name = name;
                form.description = description.unwrap_or_default();
                for stop in stops {
                    form.route.append(stop);
                }
            }
            let line = page.submit(api).await?;
            output::print_status(&format!("Bus line #{} created", line.id), settings.quiet);
            let out = output::render_single(
                settings.output,
                &line,
                |l| detail(l, color),
                |l| l.id.to_string(),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        LinesCommand::Update {
            id,
            name,
            description,
        } => {
            page.open_edit(id);
            let form = page.form.as_mut().ok_or_else(|| not_found(id))?;
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(description) = description {
                form.description = description;
            }
            let line = page.submit(api).await?;
            output::print_status(&format!("Bus line #{} updated", line.id), settings.quiet);
            Ok(())
        }

        LinesCommand::Delete { id } => {
            let pending = page.request_delete(id).ok_or_else(|| not_found(id))?;
            let accepted = util::confirm(pending, settings.yes)?;
            if !page.resolve_delete(api, accepted).await? {
                return Ok(());
            }
            // Lines with active tickets come back deactivated, not gone.
            let message = if page.lines.iter().any(|l| l.id == id) {
                format!("Bus line #{id} has active tickets; deactivated instead")
            } else {
                format!("Bus line #{id} deleted")
            };
            output::print_status(&message, settings.quiet);
            Ok(())
        }

        LinesCommand::Get { id } => show(api, id, settings).await,
    }
}
