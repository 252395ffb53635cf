use tracing::debug;

use crate::backend::TicketingApi;
use crate::error::CoreError;
use crate::model::{BusLine, BusStop, LineId, StopId};
use crate::requests::LineInput;
use crate::route_editor::RouteEditor;

use super::{Banner, Form, PendingConfirm, optional, required};

/// Create/edit form for a bus line, with an optional route.
///
/// The route is only sent when it is non-empty and differs from the
/// persisted one, as a single replace request after the line is saved.
#[derive(Debug, Clone, Default)]
pub struct LineForm {
    pub editing: Option<LineId>,
    pub name: String,
    pub description: String,
    pub route: RouteEditor,
    original_route: Vec<StopId>,
}

impl LineForm {
    pub fn new_line() -> Self {
        let mut form = Self::default();
        form.route.begin_empty();
        form
    }

    pub fn for_line(line: &BusLine) -> Self {
        let mut route = RouteEditor::new();
        route.begin(line);
        Self {
            editing: Some(line.id),
            name: line.name.clone(),
            description: line.description.clone().unwrap_or_default(),
            route,
            original_route: line.stop_ids(),
        }
    }

    pub fn to_input(&self) -> Result<LineInput, CoreError> {
        Ok(LineInput {
            name: required(&self.name, "Bus line name is required")?,
            description: optional(&self.description),
        })
    }

    pub fn route_changed(&self) -> bool {
        !self.route.is_empty() && self.route.working() != self.original_route.as_slice()
    }
}

impl Form for LineForm {
    fn labels(&self) -> &'static [&'static str] {
        &["Name", "Description"]
    }

    fn value(&self, field: usize) -> &str {
        match field {
            0 => &self.name,
            1 => &self.description,
            _ => "",
        }
    }

    fn value_mut(&mut self, field: usize) -> Option<&mut String> {
        match field {
            0 => Some(&mut self.name),
            1 => Some(&mut self.description),
            _ => None,
        }
    }
}

/// Bus lines list with create/edit (including route) and delete.
#[derive(Debug, Default)]
pub struct LinesPage {
    pub lines: Vec<BusLine>,
    /// Stop catalog for the route picker and labels.
    pub stops: Vec<BusStop>,
    pub form: Option<LineForm>,
    pub banner: Banner,
    pending_delete: Option<PendingConfirm<LineId>>,
}

impl LinesPage {
    pub async fn load(&mut self, api: &dyn TicketingApi) -> Result<(), CoreError> {
        self.lines = self.banner.track(api.list_lines().await)?;
        self.stops = self.banner.track(api.list_stops().await)?;
        Ok(())
    }

    pub fn open_create(&mut self) {
        self.form = Some(LineForm::new_line());
        self.banner.clear();
    }

    pub fn open_edit(&mut self, id: LineId) {
        if let Some(line) = self.lines.iter().find(|l| l.id == id) {
            self.form = Some(LineForm::for_line(line));
            self.banner.clear();
        }
    }

    pub fn close_form(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.route.cancel();
        }
        self.form = None;
    }

    /// Save the line, then its route if one was edited, then reload.
    ///
    /// If the line saves but the route does not, the form stays open in
    /// edit mode for the saved line so the route can be retried.
    pub async fn submit(&mut self, api: &dyn TicketingApi) -> Result<BusLine, CoreError> {
        let Some(form) = self.form.as_mut() else {
            return Err(CoreError::Internal("no line form is open".into()));
        };
        let input = self.banner.track(form.to_input())?;
        let result = match form.editing {
            Some(id) => api.update_line(id, &input).await,
            None => api.create_line(&input).await,
        };
        let mut saved = self.banner.track(result)?;
        form.editing = Some(saved.id);

        if form.route_changed() {
            debug!(line_id = saved.id, "saving route with line");
            if let Some(line) = self.banner.track(form.route.commit(api, saved.id).await)? {
                saved = line;
            }
        }

        self.form = None;
        self.banner.clear();
        self.load(api).await?;
        Ok(saved)
    }

    pub fn request_delete(&mut self, id: LineId) -> Option<&PendingConfirm<LineId>> {
        let line = self.lines.iter().find(|l| l.id == id)?;
        self.pending_delete = Some(PendingConfirm {
            subject: id,
            prompt: format!("Delete bus line \"{}\"?", line.name),
        });
        self.pending_delete.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&PendingConfirm<LineId>> {
        self.pending_delete.as_ref()
    }

    /// Delete the pending line if `accepted`, then reload. A line that
    /// still has active tickets comes back deactivated rather than gone.
    pub async fn resolve_delete(
        &mut self,
        api: &dyn TicketingApi,
        accepted: bool,
    ) -> Result<bool, CoreError> {
        let Some(pending) = self.pending_delete.take() else {
            return Ok(false);
        };
        if !accepted {
            return Ok(false);
        }
        self.banner.track(api.delete_line(pending.subject).await)?;
        self.load(api).await?;
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fake::FakeBackend;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn load_fetches_lines_and_stop_catalog() {
        let api = FakeBackend::new();
        let mut page = LinesPage::default();
        page.load(&api).await.unwrap();
        assert_eq!(page.lines.len(), 3);
        assert_eq!(page.stops.len(), 3);
        assert_eq!(page.lines[0].route_summary(), "Central Station → City Hall");
    }

    #[tokio::test]
    async fn create_with_route_issues_one_route_request() {
        let api = FakeBackend::new();
        let mut page = LinesPage::default();
        page.load(&api).await.unwrap();

        page.open_create();
        let form = page.form.as_mut().unwrap();
        form.name = "Line 4 - Riverside".into();
        form.route.append(3);
        form.route.append(1);
        let before = api.call_count().await;
        let saved = page.submit(&api).await.unwrap();

        assert_eq!(saved.stop_ids(), vec![3, 1]);
        let calls = api.calls().await;
        let route_calls: Vec<&String> = calls[before..]
            .iter()
            .filter(|c| c.starts_with("set_route"))
            .collect();
        assert_eq!(route_calls, vec!["set_route(4, [3, 1])"]);
        assert!(page.form.is_none());
        assert_eq!(page.lines.len(), 4);
    }

    #[tokio::test]
    async fn create_without_route_skips_route_request() {
        let api = FakeBackend::new();
        let mut page = LinesPage::default();
        page.open_create();
        page.form.as_mut().unwrap().name = "Line 5".into();
        page.submit(&api).await.unwrap();

        assert!(api.calls().await.iter().all(|c| !c.starts_with("set_route")));
    }

    #[tokio::test]
    async fn blank_name_is_caught_before_any_call() {
        let api = FakeBackend::new();
        let mut page = LinesPage::default();
        page.open_create();
        assert!(page.submit(&api).await.is_err());
        assert_eq!(page.banner.message(), Some("Bus line name is required"));
        assert_eq!(api.call_count().await, 0);
    }

    #[tokio::test]
    async fn delete_with_active_tickets_deactivates() {
        let api = FakeBackend::new();
        let mut page = LinesPage::default();
        page.load(&api).await.unwrap();

        let prompt = page.request_delete(1).unwrap().prompt.clone();
        assert_eq!(prompt, "Delete bus line \"Line 1 - Downtown Loop\"?");
        assert!(page.resolve_delete(&api, true).await.unwrap());

        let line = page.lines.iter().find(|l| l.id == 1).unwrap();
        assert!(!line.active);
    }

    #[tokio::test]
    async fn declined_delete_makes_no_call() {
        let api = FakeBackend::new();
        let mut page = LinesPage::default();
        page.load(&api).await.unwrap();
        let before = api.call_count().await;

        page.request_delete(3);
        page.resolve_delete(&api, false).await.unwrap();

        assert_eq!(api.call_count().await, before);
        assert_eq!(page.lines.len(), 3);
    }
}
