//! School service - business rules around the store
//!
//! Every operation returns a `ServiceError` tag on failure; raw store
//! errors never escape this layer.

use std::sync::Arc;

use crate::db::{School, SchoolStore};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{ListQuery, NewSchool, Paginated, SchoolPatch, ValidationError};

#[derive(Clone)]
pub struct SchoolService {
    store: Arc<dyn SchoolStore>,
}

impl SchoolService {
    pub fn new(store: Arc<dyn SchoolStore>) -> Self {
        Self { store }
    }

    /// Create a school.
    ///
    /// `uploaded_image` is the stored filename of an uploaded file and
    /// takes precedence over any `image` text field.
    pub async fn create(
        &self,
        input: NewSchool,
        uploaded_image: Option<String>,
    ) -> ServiceResult<School> {
        let draft = input.into_draft()?.with_uploaded_image(uploaded_image);

        if self
            .store
            .find_id_by_name(&draft.school_name, None)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict {
                name: draft.school_name,
            });
        }

        // The unique index still catches a concurrent insert of the same name.
        let school = self
            .store
            .insert(&draft)
            .await
            .map_err(|e| ServiceError::from_store(e, Some(&draft.school_name)))?;

        tracing::info!(id = school.id, name = %school.school_name, "school created");
        Ok(school)
    }

    pub async fn list(&self, query: ListQuery) -> ServiceResult<Paginated<School>> {
        let page = self.store.list(&query).await?;
        tracing::debug!(
            search = query.search.as_ref().map(|s| s.as_str()),
            page = page.page,
            returned = page.items.len(),
            total = page.total,
            "schools listed"
        );
        Ok(page)
    }

    /// Name of the backing store.
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn ping(&self) -> ServiceResult<()> {
        Ok(self.store.ping().await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<School> {
        ensure_valid_id(id)?;
        self.store
            .get(id)
            .await?
            .ok_or(ServiceError::NotFound { id })
    }

    /// Apply a partial update and return the refreshed row.
    ///
    /// Checks run in order: id, existence, name taken by another row,
    /// non-empty change set.
    pub async fn update(&self, id: i64, patch: SchoolPatch) -> ServiceResult<School> {
        ensure_valid_id(id)?;

        if self.store.get(id).await?.is_none() {
            return Err(ServiceError::NotFound { id });
        }

        let new_name = patch.school_name.as_deref().filter(|n| !n.is_empty());
        if let Some(name) = new_name {
            if self.store.find_id_by_name(name, Some(id)).await?.is_some() {
                return Err(ServiceError::Conflict {
                    name: name.to_owned(),
                });
            }
        }

        let changes = patch.into_changes()?;
        let school = self
            .store
            .update(id, &changes)
            .await
            .map_err(|e| ServiceError::from_store(e, changes.school_name.as_deref()))?
            .ok_or(ServiceError::NotFound { id })?;

        tracing::info!(id, "school updated");
        Ok(school)
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        ensure_valid_id(id)?;
        if !self.store.delete(id).await? {
            return Err(ServiceError::NotFound { id });
        }
        tracing::info!(id, "school deleted");
        Ok(())
    }
}

fn ensure_valid_id(id: i64) -> Result<(), ValidationError> {
    if id > 0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidId)
    }
}
