use crate::backend::TicketingApi;
use crate::error::CoreError;
use crate::model::{CategoryId, TicketCategory};
use crate::requests::CategoryInput;

use super::{Banner, Form, PendingConfirm, number, optional, required};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub editing: Option<CategoryId>,
    pub name: String,
    /// Whole days; `0` for single-ride.
    pub duration_days: String,
    pub price: String,
    pub description: String,
}

impl CategoryForm {
    pub fn for_category(category: &TicketCategory) -> Self {
        Self {
            editing: Some(category.id),
            name: category.name.clone(),
            duration_days: category.duration_days.to_string(),
            price: format!("{:.2}", category.price),
            description: category.description.clone().unwrap_or_default(),
        }
    }

    pub fn to_input(&self) -> Result<CategoryInput, CoreError> {
        Ok(CategoryInput {
            name: required(&self.name, "Category name is required")?,
            duration_days: number(&self.duration_days, "Duration (days)")?,
            price: number(&self.price, "Price")?,
            description: optional(&self.description),
        })
    }
}

impl Form for CategoryForm {
    fn labels(&self) -> &'static [&'static str] {
        &["Name", "Duration (days)", "Price", "Description"]
    }

    fn value(&self, field: usize) -> &str {
        match field {
            0 => &self.name,
            1 => &self.duration_days,
            2 => &self.price,
            3 => &self.description,
            _ => "",
        }
    }

    fn value_mut(&mut self, field: usize) -> Option<&mut String> {
        match field {
            0 => Some(&mut self.name),
            1 => Some(&mut self.duration_days),
            2 => Some(&mut self.price),
            3 => Some(&mut self.description),
            _ => None,
        }
    }
}

/// Ticket categories list with create, edit and delete.
#[derive(Debug, Default)]
pub struct CategoriesPage {
    pub categories: Vec<TicketCategory>,
    pub form: Option<CategoryForm>,
    pub banner: Banner,
    pending_delete: Option<PendingConfirm<CategoryId>>,
}

impl CategoriesPage {
    pub async fn load(&mut self, api: &dyn TicketingApi) -> Result<(), CoreError> {
        self.categories = self.banner.track(api.list_categories().await)?;
        Ok(())
    }

    pub fn open_create(&mut self) {
        self.form = Some(CategoryForm::default());
        self.banner.clear();
    }

    pub fn open_edit(&mut self, id: CategoryId) {
        if let Some(category) = self.categories.iter().find(|c| c.id == id) {
            self.form = Some(CategoryForm::for_category(category));
            self.banner.clear();
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    pub async fn submit(&mut self, api: &dyn TicketingApi) -> Result<TicketCategory, CoreError> {
        let Some(form) = self.form.as_ref() else {
            return Err(CoreError::Internal("no category form is open".into()));
        };
        let input = self.banner.track(form.to_input())?;
        let result = match form.editing {
            Some(id) => api.update_category(id, &input).await,
            None => api.create_category(&input).await,
        };
        let saved = self.banner.track(result)?;

        self.form = None;
        self.banner.clear();
        self.load(api).await?;
        Ok(saved)
    }

    pub fn request_delete(&mut self, id: CategoryId) -> Option<&PendingConfirm<CategoryId>> {
        let category = self.categories.iter().find(|c| c.id == id)?;
        self.pending_delete = Some(PendingConfirm {
            subject: id,
            prompt: format!("Delete ticket category \"{}\"?", category.name),
        });
        self.pending_delete.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&PendingConfirm<CategoryId>> {
        self.pending_delete.as_ref()
    }

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
        self.banner.track(api.delete_category(pending.subject).await)?;
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
    async fn create_single_ride_category() {
        let api = FakeBackend::new();
        let mut page = CategoriesPage::default();
        page.load(&api).await.unwrap();

        page.open_create();
        let form = page.form.as_mut().unwrap();
        form.name = "Night Ride".into();
        form.duration_days = "0".into();
        form.price = "2.10".into();
        let saved = page.submit(&api).await.unwrap();

        assert!(!saved.is_renewable());
        assert_eq!(saved.description, None);
        assert_eq!(page.categories.len(), 4);
    }

    #[tokio::test]
    async fn edit_form_round_trips_values() {
        let api = FakeBackend::new();
        let mut page = CategoriesPage::default();
        page.load(&api).await.unwrap();

        page.open_edit(2);
        let form = page.form.as_ref().unwrap();
        assert_eq!(form.duration_days, "30");
        assert_eq!(form.price, "45.00");
    }

    #[tokio::test]
    async fn negative_duration_is_a_local_parse_error() {
        let api = FakeBackend::new();
        let mut page = CategoriesPage::default();
        page.open_create();
        let form = page.form.as_mut().unwrap();
        form.name = "Broken".into();
        form.duration_days = "-1".into();
        form.price = "1".into();

        assert!(page.submit(&api).await.is_err());
        assert_eq!(page.banner.message(), Some("Duration (days) must be a number"));
        assert_eq!(api.call_count().await, 0);
    }

    #[tokio::test]
    async fn declined_delete_makes_no_call() {
        let api = FakeBackend::new();
        let mut page = CategoriesPage::default();
        page.load(&api).await.unwrap();
        let before = api.call_count().await;

        let prompt = page.request_delete(3).unwrap().prompt.clone();
        assert_eq!(prompt, "Delete ticket category \"Weekly Pass\"?");
        assert!(!page.resolve_delete(&api, false).await.unwrap());

        assert_eq!(api.call_count().await, before);
        assert!(page.pending_delete().is_none());
        assert_eq!(page.categories.len(), 3);
    }

    #[tokio::test]
    async fn accepted_delete_reloads() {
        let api = FakeBackend::new();
        let mut page = CategoriesPage::default();
        page.open_create();
        let form = page.form.as_mut().unwrap();
        form.name = "Unused".into();
        form.duration_days = "1".into();
        form.price = "3".into();
        let saved = page.submit(&api).await.unwrap();

        page.request_delete(saved.id);
        assert!(page.resolve_delete(&api, true).await.unwrap());
        assert!(page.categories.iter().all(|c| c.id != saved.id));
    }
}
