//! Bus stop command handlers.

use tabled::Tabled;

use busops_core::pages::StopsPage;
use busops_core::{BusStop, StopId, TicketingApi};

use crate::cli::{StopsArgs, StopsCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct StopRow {
    #[tabled(rename = "ID")]
    id: StopId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Coordinates")]
    coordinates: String,
}

impl From<&BusStop> for StopRow {
    fn from(s: &BusStop) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            coordinates: s.coordinates_label(),
        }
    }
}

fn detail(s: &BusStop) -> String {
    format!(
        "ID:          {}\nName:        {}\nCoordinates: {}",
        s.id,
        s.name,
        s.coordinates_label()
    )
}

fn not_found(id: StopId) -> CliError {
    CliError::NotFound {
        message: format!("Bus stop not found with id: {id}"),
        list_command: "stops list".into(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    api: &dyn TicketingApi,
    args: StopsArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    let mut page = StopsPage::default();
    page.load(api).await?;

    match args.command {
        StopsCommand::List => {
            let out = output::render_list(
                settings.output,
                &page.stops,
                |s| StopRow::from(s),
                |s| s.id.to_string(),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        StopsCommand::Create { name, lat, lon } => {
            page.open_create();
            if let Some(form) = page.form.as_mut() {
                form.name = name;
                form.latitude = lat.unwrap_or_default();
                form.longitude = lon.unwrap_or_default();
            }
            let stop = page.submit(api).await?;
            output::print_status(&format!("Bus stop #{} created", stop.id), settings.quiet);
            let out = output::render_single(settings.output, &stop, detail, |s| s.id.to_string())?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        StopsCommand::Update { id, name, lat, lon } => {
            page.open_edit(id);
            let form = page.form.as_mut().ok_or_else(|| not_found(id))?;
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(lat) = lat {
                form.latitude = lat;
            }
            if let Some(lon) = lon {
                form.longitude = lon;
            }
            let stop = page.submit(api).await?;
            output::print_status(&format!("Bus stop #{} updated", stop.id), settings.quiet);
            Ok(())
        }

        StopsCommand::Delete { id } => {
            let pending = page.request_delete(id).ok_or_else(|| not_found(id))?;
            let accepted = util::confirm(pending, settings.yes)?;
            if page.resolve_delete(api, accepted).await? {
                output::print_status(&format!("Bus stop #{id} deleted"), settings.quiet);
            }
            Ok(())
        }
    }
}
