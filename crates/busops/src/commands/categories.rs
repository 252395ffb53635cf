//! Ticket category command handlers.

use tabled::Tabled;

use busops_core::pages::CategoriesPage;
use busops_core::{CategoryId, TicketCategory, TicketingApi};

use crate::cli::{CategoriesArgs, CategoriesCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: CategoryId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Validity")]
    validity: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Renewable")]
    renewable: &'static str,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&TicketCategory> for CategoryRow {
    fn from(c: &TicketCategory) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            validity: c.validity_label(),
            price: c.price_label(),
            renewable: if c.is_renewable() { "yes" } else { "no" },
            description: util::or_dash(c.description.as_deref()).to_owned(),
        }
    }
}

fn detail(c: &TicketCategory) -> String {
    format!(
        "ID:          {}\nName:        {}\nValidity:    {}\nPrice:       {}\nDescription: {}",
        c.id,
        c.name,
        c.validity_label(),
        c.price_label(),
        util::or_dash(c.description.as_deref())
    )
}

fn not_found(id: CategoryId) -> CliError {
    CliError::NotFound {
        message: format!("Ticket category not found with id: {id}"),
        list_command: "categories list".into(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    api: &dyn TicketingApi,
    args: CategoriesArgs,
    settings: &Settings,
) -> Result<(), CliError> {
    let mut page = CategoriesPage::default();
    page.load(api).await?;

    match args.command {
        CategoriesCommand::List => {
            let out = output::render_list(
                settings.output,
                &page.categories,
                |c| CategoryRow::from(c),
                |c| c.id.to_string(),
            )?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        CategoriesCommand::Create {
            name,
            days,
            price,
            description,
        } => {
            page.open_create();
            if let Some(form) = page.form.as_mut() {
                form.name = name;
                form.duration_days = days;
                form.price = price;
                form.description = description.unwrap_or_default();
            }
            let category = page.submit(api).await?;
            output::print_status(
                &format!("Ticket category #{} created", category.id),
                settings.quiet,
            );
            let out =
                output::render_single(settings.output, &category, detail, |c| c.id.to_string())?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        CategoriesCommand::Update {
            id,
            name,
            days,
            price,
            description,
        } => {
            page.open_edit(id);
            let form = page.form.as_mut().ok_or_else(|| not_found(id))?;
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(days) = days {
                form.duration_days = days;
            }
            if let Some(price) = price {
                form.price = price;
            }
            if let Some(description) = description {
                form.description = description;
            }
            let category = page.submit(api).await?;
            output::print_status(
                &format!("Ticket category #{} updated", category.id),
                settings.quiet,
            );
            Ok(())
        }

        CategoriesCommand::Delete { id } => {
            let pending = page.request_delete(id).ok_or_else(|| not_found(id))?;
            let accepted = util::confirm(pending, settings.yes)?;
            if page.resolve_delete(api, accepted).await? {
                output::print_status(&format!("Ticket category #{id} deleted"), settings.quiet);
            }
            Ok(())
        }
    }
}
