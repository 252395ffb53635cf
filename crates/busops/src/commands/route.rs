//! Route command handlers.
//!
//! Each mutating command loads the line, edits a working copy through the
//! route editor and commits it with one replace-route request.

use busops_core::pages::LineDetailPage;
use busops_core::{Direction, LineId, TicketingApi};

use crate::cli::{MoveDirection, RouteArgs, RouteCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::{lines, util};

impl From<MoveDirection> for Direction {
    fn from(d: MoveDirection) -> Self {
        match d {
            MoveDirection::Up => Self::Up,
            MoveDirection::Down => Self::Down,
        }
    }
}

async fn load(api: &dyn TicketingApi, line: LineId) -> Result<LineDetailPage, CliError> {
    let mut page = LineDetailPage::new(line);
    page.load(api)
        .await
        .map_err(|e| CliError::from(e).with_list_hint("lines list"))?;
    Ok(page)
}

fn no_stop_at(position: usize, len: usize) -> CliError {
    CliError::Validation {
        field: "position".into(),
        reason: format!("no stop at position {position} (route has {len})"),
    }
}

pub async fn handle(
    api: &dyn TicketingApi,
    args: RouteArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    let (line, mut page) = match &args.command {
        RouteCommand::Show { line }
        | RouteCommand::Set { line, .. }
        | RouteCommand::Append { line, .. }
        | RouteCommand::Remove { line, .. }
        | RouteCommand::Move { line, .. } => (*line, load(api, *line).await?),
    };

    match args.command {
        RouteCommand::Show { .. } => {
            let route = api.get_route(line).await?;
            let out = output::render_list(
                settings.output,
                &route,
                |s| RouteRow {
                    order: s.order,
                    stop: s.stop_name.clone(),
                    id: s.stop_id,
                },
                |s| s.stop_id.to_string(),
            )?;
            output::print_output(&out, settings.quiet);
            return Ok(());
        }

        RouteCommand::Set { stops, .. } => {
            page.editor.begin_empty();
            for stop in stops {
                page.append(stop);
            }
        }

        RouteCommand::Append { stops, .. } => {
            page.begin_edit();
            for stop in stops {
                page.append(stop);
            }
        }

        RouteCommand::Remove { position, .. } => {
            page.begin_edit();
            let len = page.editor.len();
            if !page.editor.remove_at(util::position_index(position)?) {
                return Err(no_stop_at(position, len));
            }
        }

        RouteCommand::Move {
            position,
            direction,
            ..
        } => {
            page.begin_edit();
            let len = page.editor.len();
            let index = util::position_index(position)?;
            if index >= len {
                return Err(no_stop_at(position, len));
            }
            if !page.editor.move_adjacent(index, direction.into()) {
                return Err(CliError::Validation {
                    field: "direction".into(),
                    reason: format!("the stop at position {position} is already at that end"),
                });
            }
        }
    }

    page.save(api).await?;
    output::print_status(&format!("Route of line #{line} saved"), settings.quiet);
    if let Some(saved) = page.line.as_ref() {
        let color = settings.color;
        let out = output::render_single(
            settings.output,
            saved,
            |l| lines::detail(l, color),
            |l| l.stop_ids().iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"),
        )?;
        output::print_output(&out, settings.quiet);
    }
    Ok(())
}

#[derive(tabled::Tabled)]
struct RouteRow {
    #[tabled(rename = "#")]
    order: u32,
    #[tabled(rename = "Stop")]
    stop: String,
    #[tabled(rename = "Stop ID")]
    id: i64,
}
