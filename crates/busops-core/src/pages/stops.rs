use crate::backend::TicketingApi;
use crate::error::CoreError;
use crate::model::{BusStop, StopId};
use crate::requests::StopInput;

use super::{Banner, Form, PendingConfirm, optional_number, required};

/// Create/edit form for a bus stop. Blank coordinates are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopForm {
    /// `Some` when editing an existing stop.
    pub editing: Option<StopId>,
    pub name: String,
    pub latitude: String,
    pub longitude: String,
}

impl StopForm {
    pub fn for_stop(stop: &BusStop) -> Self {
        Self {
            editing: Some(stop.id),
            name: stop.name.clone(),
            latitude: stop.latitude.map(|v| v.to_string()).unwrap_or_default(),
            longitude: stop.longitude.map(|v| v.to_string()).unwrap_or_default(),
        }
    }

    pub fn to_input(&self) -> Result<StopInput, CoreError> {
        Ok(StopInput {
            name: required(&self.name, "Stop name is required")?,
            latitude: optional_number(&self.latitude, "Latitude")?,
            longitude: optional_number(&self.longitude, "Longitude")?,
        })
    }
}

impl Form for StopForm {
    fn labels(&self) -> &'static [&'static str] {
        &["Name", "Latitude", "Longitude"]
    }

    fn value(&self, field: usize) -> &str {
        match field {
            0 => &self.name,
            1 => &self.latitude,
            2 => &self.longitude,
            _ => "",
        }
    }

    fn value_mut(&mut self, field: usize) -> Option<&mut String> {
        match field {
            0 => Some(&mut self.name),
            1 => Some(&mut self.latitude),
            2 => Some(&mut self.longitude),
            _ => None,
        }
    }
}

/// Bus stops list with create, edit and delete.
#[derive(Debug, Default)]
pub struct StopsPage {
    pub stops: Vec<BusStop>,
    pub form: Option<StopForm>,
    pub banner: Banner,
    pending_delete: Option<PendingConfirm<StopId>>,
}

impl StopsPage {
    pub async fn load(&mut self, api: &dyn TicketingApi) -> Result<(), CoreError> {
        self.stops = self.banner.track(api.list_stops().await)?;
        Ok(())
    }

    pub fn open_create(&mut self) {
        self.form = Some(StopForm::default());
        self.banner.clear();
    }

    pub fn open_edit(&mut self, id: StopId) {
        if let Some(stop) = self.stops.iter().find(|s| s.id == id) {
            self.form = Some(StopForm::for_stop(stop));
            self.banner.clear();
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Create or update from the open form, then close it and reload.
    /// On failure the form stays open with the error in the banner.
    pub async fn submit(&mut self, api: &dyn TicketingApi) -> Result<BusStop, CoreError> {
        let Some(form) = self.form.as_ref() else {
            return Err(CoreError::Internal("no stop form is open".into()));
        };
        let input = self.banner.track(form.to_input())?;
        let result = match form.editing {
            Some(id) => api.update_stop(id, &input).await,
            None => api.create_stop(&input).await,
        };
        let saved = self.banner.track(result)?;

        self.form = None;
        self.banner.clear();
        self.load(api).await?;
        Ok(saved)
    }

    pub fn request_delete(&mut self, id: StopId) -> Option<&PendingConfirm<StopId>> {
        let stop = self.stops.iter().find(|s| s.id == id)?;
        self.pending_delete = Some(PendingConfirm {
            subject: id,
            prompt: format!("Delete bus stop \"{}\"?", stop.name),
        });
        self.pending_delete.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&PendingConfirm<StopId>> {
        self.pending_delete.as_ref()
    }

    /// Delete the pending stop if `accepted`, then reload.
    /// Returns whether a delete was performed.
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
        self.banner.track(api.delete_stop(pending.subject).await)?;
        self.load(api).await?;
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fake::FakeBackend;

    #[tokio::test]
    async fn create_closes_form_and_reloads() {
        let api = FakeBackend::new();
        let mut page = StopsPage::default();
        page.load(&api).await.unwrap();

        page.open_create();
        let form = page.form.as_mut().unwrap();
        form.name = "Depot".into();
        let saved = page.submit(&api).await.unwrap();

        assert_eq!(saved.latitude, None);
        assert!(page.form.is_none());
        assert_eq!(page.stops.len(), 4);
    }

    #[tokio::test]
    async fn unparseable_coordinate_keeps_form_open_without_call() {
        let api = FakeBackend::new();
        let mut page = StopsPage::default();
        page.load(&api).await.unwrap();
        let before = api.call_count().await;

        page.open_edit(1);
        page.form.as_mut().unwrap().latitude = "north".into();
        assert!(page.submit(&api).await.is_err());

        assert!(page.form.is_some());
        assert_eq!(page.banner.message(), Some("Latitude must be a number"));
        assert_eq!(api.call_count().await, before);
    }

    #[tokio::test]
    async fn declined_delete_makes_no_call() {
        let api = FakeBackend::new();
        let mut page = StopsPage::default();
        page.load(&api).await.unwrap();
        let before = api.call_count().await;

        let prompt = page.request_delete(3).unwrap().prompt.clone();
        assert_eq!(prompt, "Delete bus stop \"Old Market Square\"?");
        assert!(!page.resolve_delete(&api, false).await.unwrap());

        assert_eq!(api.call_count().await, before);
        assert!(page.pending_delete().is_none());
    }

    #[tokio::test]
    async fn server_rejection_lands_in_banner() {
        let api = FakeBackend::new();
        let mut page = StopsPage::default();
        page.load(&api).await.unwrap();

        page.request_delete(1);
        assert!(page.resolve_delete(&api, true).await.is_err());
        assert!(page.banner.is_error());
        assert_eq!(page.stops.len(), 3);
    }
}
