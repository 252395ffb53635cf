use crate::backend::TicketingApi;
use crate::error::CoreError;
use crate::model::{BusLine, BusStop, LineId, StopId};
use crate::route_editor::{Direction, RouteEditor, stop_label};

use super::Banner;

const RELOAD_FAILED: &str = "Route saved, but the line could not be reloaded";

/// One line and its route editor.
#[derive(Debug, Default)]
pub struct LineDetailPage {
    pub line_id: LineId,
    pub line: Option<BusLine>,
    /// Stop catalog for the picker and labels.
    pub stops: Vec<BusStop>,
    pub editor: RouteEditor,
    pub banner: Banner,
    not_found: bool,
}

impl LineDetailPage {
    pub fn new(line_id: LineId) -> Self {
        Self {
            line_id,
            ..Self::default()
        }
    }

    pub async fn load(&mut self, api: &dyn TicketingApi) -> Result<(), CoreError> {
        match api.get_line(self.line_id).await {
            Ok(line) => {
                self.line = Some(line);
                self.not_found = false;
            }
            Err(e) => {
                self.line = None;
                self.not_found = e.is_not_found();
                return self.banner.track(Err(e));
            }
        }
        self.stops = self.banner.track(api.list_stops().await)?;
        Ok(())
    }

    /// `true` once a load has failed because the line does not exist.
    pub fn is_not_found(&self) -> bool {
        self.not_found
    }

    pub fn title(&self) -> String {
        match &self.line {
            Some(line) => line.name.clone(),
            None if self.not_found => "Line not found".into(),
            None => format!("Line #{}", self.line_id),
        }
    }

    pub fn begin_edit(&mut self) {
        if let Some(line) = &self.line {
            self.editor.begin(line);
            self.banner.clear();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editor.cancel();
        self.banner.clear();
    }

    pub fn append(&mut self, stop_id: StopId) {
        self.editor.append(stop_id);
    }

    pub fn remove_selected(&mut self) -> bool {
        self.editor.remove_selected()
    }

    pub fn move_selected(&mut self, direction: Direction) -> bool {
        self.editor.move_selected(direction)
    }

    /// Persist the working route, replacing the shown line with the refetch.
    pub async fn save(&mut self, api: &dyn TicketingApi) -> Result<(), CoreError> {
        match self.banner.track(self.editor.commit(api, self.line_id).await)? {
            Some(line) => {
                self.line = Some(line);
                self.banner.info("Route saved");
            }
            None => self.banner.info(RELOAD_FAILED),
        }
        Ok(())
    }

    /// Labels for what is on screen: the working copy while editing,
    /// the persisted route otherwise.
    pub fn route_labels(&self) -> Vec<String> {
        if self.editor.is_editing() {
            self.editor
                .working()
                .iter()
                .map(|&id| stop_label(id, &self.stops))
                .collect()
        } else {
            self.line
                .as_ref()
                .map(|l| l.stops.iter().map(|s| s.stop_name.clone()).collect())
                .unwrap_or_default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fake::FakeBackend;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn missing_line_reads_not_found() {
        let api = FakeBackend::new();
        let mut page = LineDetailPage::new(99);
        assert!(page.load(&api).await.is_err());
        assert!(page.is_not_found());
        assert_eq!(page.title(), "Line not found");
        assert_eq!(page.banner.message(), Some("Bus line not found with id: 99"));
    }

    #[tokio::test]
    async fn edit_and_save_route() {
        let api = FakeBackend::new();
        let mut page = LineDetailPage::new(2);
        page.load(&api).await.unwrap();

        page.begin_edit();
        page.append(3);
        page.append(3);
        assert_eq!(
            page.route_labels(),
            vec!["Central Station", "Old Market Square", "Old Market Square"]
        );
        page.save(&api).await.unwrap();

        assert!(!page.editor.is_editing());
        let orders: Vec<u32> = page.line.as_ref().unwrap().stops.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(page.banner.message(), Some("Route saved"));
    }

    #[tokio::test]
    async fn rejected_save_keeps_editing() {
        let api = FakeBackend::new();
        let mut page = LineDetailPage::new(2);
        page.load(&api).await.unwrap();

        page.begin_edit();
        page.remove_selected();
        assert!(page.save(&api).await.is_err());

        assert!(page.editor.is_editing());
        assert!(page.editor.is_empty());
        assert_eq!(page.banner.message(), Some("Route must have at least one stop"));
        assert_eq!(page.line.as_ref().unwrap().stop_ids(), vec![1]);
    }

    #[tokio::test]
    async fn reload_failure_after_save_is_not_an_error() {
        let api = FakeBackend::new();
        let mut page = LineDetailPage::new(1);
        page.load(&api).await.unwrap();

        page.begin_edit();
        page.append(3);
        api.fail_after(1, 503, "Service Unavailable").await;
        page.save(&api).await.unwrap();

        assert!(!page.editor.is_editing());
        assert!(!page.banner.is_error());
        assert_eq!(page.banner.message(), Some(RELOAD_FAILED));
        assert_eq!(api.get_line(1).await.unwrap().stop_ids(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn cancel_restores_persisted_view() {
        let api = FakeBackend::new();
        let mut page = LineDetailPage::new(1);
        page.load(&api).await.unwrap();
        let before = api.call_count().await;

        page.begin_edit();
        page.move_selected(Direction::Down);
        page.cancel_edit();

        assert_eq!(page.route_labels(), vec!["Central Station", "City Hall"]);
        assert_eq!(api.call_count().await, before);
    }
}
