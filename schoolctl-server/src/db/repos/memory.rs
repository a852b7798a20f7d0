//! In-memory school store
//!
//! Same contract as the Postgres repository, including the unique name
//! constraint and newest-first ordering. Each instance is independent.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{DbError, School, SchoolStore};
use crate::models::{ListQuery, Paginated, Patch, SchoolChanges, SchoolDraft};

const NAME_CONSTRAINT: &str = "schools_school_name_key";

#[derive(Default)]
struct Inner {
    /// Last issued id; ids are never reused after delete
    last_id: i64,
    rows: BTreeMap<i64, School>,
}

impl Inner {
    fn name_taken(&self, name: &str, excluding: Option<i64>) -> Option<i64> {
        self.rows
            .values()
            .find(|s| s.school_name == name && Some(s.id) != excluding)
            .map(|s| s.id)
    }
}

/// In-process store
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

}

fn unique_violation() -> DbError {
    DbError::UniqueViolation {
        constraint: NAME_CONSTRAINT.to_owned(),
    }
}

fn apply_patch(column: &mut Option<String>, patch: &Patch<String>) {
    if let Some(value) = patch.as_column() {
        *column = value.cloned();
    }
}

#[async_trait]
impl SchoolStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn insert(&self, draft: &SchoolDraft) -> Result<School, DbError> {
        let mut inner = self.inner.write().await;
        if inner.name_taken(&draft.school_name, None).is_some() {
            return Err(unique_violation());
        }

        inner.last_id += 1;
        let school = School {
            id: inner.last_id,
            school_name: draft.school_name.clone(),
            address: draft.address.clone(),
            city: draft.city.clone(),
            state: draft.state.clone(),
            contact: draft.contact.clone(),
            email: draft.email.clone(),
            image: draft.image.clone(),
            created_at: Utc::now(),
            updated_at: None,
        };
        inner.rows.insert(school.id, school.clone());
        Ok(school)
    }

    async fn list(&self, query: &ListQuery) -> Result<Paginated<School>, DbError> {
        let inner = self.inner.read().await;

        let mut matching: Vec<&School> = inner
            .rows
            .values()
            .filter(|s| match &query.search {
                None => true,
                Some(term) => [&s.school_name, &s.address, &s.city, &s.state]
                    .into_iter()
                    .any(|field| term.matches(field)),
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.limit() as usize)
            .cloned()
            .collect();

        Ok(Paginated {
            items,
            total,
            page: query.page.page,
            limit: query.page.limit,
        })
    }

    async fn get(&self, id: i64) -> Result<Option<School>, DbError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn find_id_by_name(
        &self,
        name: &str,
        excluding: Option<i64>,
    ) -> Result<Option<i64>, DbError> {
        Ok(self.inner.read().await.name_taken(name, excluding))
    }

    async fn update(&self, id: i64, changes: &SchoolChanges) -> Result<Option<School>, DbError> {
        let mut inner = self.inner.write().await;
        if let Some(name) = &changes.school_name {
            if inner.name_taken(name, Some(id)).is_some() {
                return Err(unique_violation());
            }
        }

        let Some(school) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };

        let required = [
            (&mut school.school_name, &changes.school_name),
            (&mut school.address, &changes.address),
            (&mut school.city, &changes.city),
            (&mut school.state, &changes.state),
        ];
        for (column, value) in required {
            if let Some(v) = value {
                column.clone_from(v);
            }
        }
        apply_patch(&mut school.contact, &changes.contact);
        apply_patch(&mut school.email, &changes.email);
        apply_patch(&mut school.image, &changes.image);
        school.updated_at = Some(Utc::now());

        Ok(Some(school.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }
}
