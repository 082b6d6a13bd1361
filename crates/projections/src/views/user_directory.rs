//! In-memory user directory, the read replica behind the query port.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use common::{PagedResult, PaginationParams, SortDirection, UserId};
use domain::{Birthdate, Filter, Location, Specification};
use tokio::sync::RwLock;

use crate::document::UserDocument;
use crate::error::Result;
use crate::read_model::{DocumentStore, UserReadRepository};

/// The denormalized replica of user documents.
///
/// Implements both read-side ports: the projector writes through
/// [`DocumentStore`], query handlers read through [`UserReadRepository`].
/// Specifications are answered by compiling their expression form against
/// the documents; the aggregate predicate is never used here.
#[derive(Clone, Default)]
pub struct UserDirectoryView {
    documents: Arc<RwLock<HashMap<UserId, UserDocument>>>,
}

impl UserDirectoryView {
    /// Creates a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents, deleted ones included.
    pub async fn count(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Fetches a document by id without going through the query port.
    pub async fn get(&self, id: UserId) -> Option<UserDocument> {
        self.documents.read().await.get(&id).cloned()
    }

    /// Drops every document. The replica is disposable; a rebuild replays
    /// the change log.
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }
}

#[async_trait]
impl DocumentStore for UserDirectoryView {
    async fn upsert(&self, document: UserDocument) -> Result<()> {
        self.documents.write().await.insert(document.id, document);
        Ok(())
    }

    async fn mark_deleted(&self, id: UserId, deleted_at: DateTime<Utc>) -> Result<()> {
        if let Some(document) = self.documents.write().await.get_mut(&id) {
            document.is_deleted = true;
            document.deleted_at = Some(deleted_at);
        }
        Ok(())
    }
}

#[async_trait]
impl UserReadRepository for UserDirectoryView {
    async fn get_by_id(&self, id: UserId) -> Result<Option<UserDocument>> {
        Ok(self.documents.read().await.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserDocument>> {
        let email = email.trim().to_lowercase();
        Ok(self
            .documents
            .read()
            .await
            .values()
            .find(|document| document.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        Ok(self.get_by_email(email).await?.is_some())
    }

    async fn exists_by_phone_number(&self, phone_number: &str) -> Result<bool> {
        Ok(self
            .documents
            .read()
            .await
            .values()
            .any(|document| document.phone_number == phone_number))
    }

    async fn get_users(
        &self,
        specification: &dyn Specification,
        pagination: &PaginationParams,
    ) -> Result<PagedResult<UserDocument>> {
        let filter = specification.to_filter();
        let today = Utc::now().date_naive();

        let mut matched: Vec<UserDocument> = {
            let documents = self.documents.read().await;
            documents
                .values()
                .filter(|document| matches(&filter, document, today))
                .cloned()
                .collect()
        };

        let total_count = matched.len() as u64;
        sort_documents(&mut matched, pagination);

        let items = matched
            .into_iter()
            .skip(pagination.skip() as usize)
            .take(pagination.take() as usize)
            .collect();

        Ok(PagedResult::new(items, total_count, pagination))
    }

    async fn count_users(&self, specification: &dyn Specification) -> Result<u64> {
        let filter = specification.to_filter();
        let today = Utc::now().date_naive();
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .filter(|document| matches(&filter, document, today))
            .count() as u64)
    }

    async fn any_users(&self, specification: &dyn Specification) -> Result<bool> {
        let filter = specification.to_filter();
        let today = Utc::now().date_naive();
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .any(|document| matches(&filter, document, today)))
    }
}

/// Evaluates a filter expression against one document.
///
/// This is the directory's native translation of the specification
/// expression form; age and radius clauses reuse the same date and
/// haversine arithmetic as the write-side predicates.
fn matches(filter: &Filter, document: &UserDocument, today: NaiveDate) -> bool {
    match filter {
        Filter::All => true,
        Filter::ActiveOnly => !document.is_deleted,
        Filter::Adult => birthdate_of(document, today)
            .is_some_and(|birthdate| birthdate.is_adult_on(today)),
        Filter::CompleteProfile => {
            document.birthdate.is_some()
                && document.about_me.is_some()
                && document.profile_image.is_some()
        }
        Filter::AgeBetween { min, max } => birthdate_of(document, today)
            .is_some_and(|birthdate| birthdate.is_age_between_on(*min, *max, today)),
        Filter::WithinRadius {
            latitude,
            longitude,
            radius_km,
        } => {
            let center = Location::new(*latitude, *longitude);
            let position = Location::new(document.latitude, document.longitude);
            match (center, position) {
                (Ok(center), Ok(position)) => position.is_within_km(&center, *radius_km),
                _ => false,
            }
        }
        Filter::MatchesText { term } => {
            term.is_empty()
                || document.first_name.to_lowercase().contains(term)
                || document.last_name.to_lowercase().contains(term)
                || document.email.contains(term)
                || document.phone_number.contains(term)
        }
        Filter::EmailEquals { email } => document.email == *email,
        Filter::PhoneEquals { phone_number } => document.phone_number == *phone_number,
        Filter::IdEquals { user_id } => document.id == *user_id,
        Filter::And(filters) => filters
            .iter()
            .all(|filter| matches(filter, document, today)),
    }
}

fn birthdate_of(document: &UserDocument, today: NaiveDate) -> Option<Birthdate> {
    document
        .birthdate
        .and_then(|date| Birthdate::new(date, today).ok())
}

fn sort_documents(documents: &mut [UserDocument], pagination: &PaginationParams) {
    match pagination.sort_by().unwrap_or("created_at") {
        "first_name" => documents.sort_by(|a, b| a.first_name.cmp(&b.first_name)),
        "last_name" => documents.sort_by(|a, b| a.last_name.cmp(&b.last_name)),
        "email" => documents.sort_by(|a, b| a.email.cmp(&b.email)),
        "updated_at" => documents.sort_by_key(|d| d.updated_at),
        "last_login" => documents.sort_by_key(|d| d.last_login),
        _ => documents.sort_by_key(|d| d.created_at),
    }

    if pagination.sort_direction() == SortDirection::Desc {
        documents.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{ActiveOnly, MatchAll, MatchesText, SpecificationBuilder, WithEmail};

    fn document(n: u32, email: &str, deleted: bool) -> UserDocument {
        UserDocument {
            id: UserId::new(),
            first_name: format!("First{n:03}"),
            last_name: format!("Last{n:03}"),
            email: email.to_string(),
            phone_number: format!("+1555{n:07}"),
            birthdate: NaiveDate::from_ymd_opt(1990, 6, 15),
            latitude: 40.7128,
            longitude: -74.0060,
            about_me: None,
            profile_image: None,
            created_at: Utc::now() + chrono::Duration::milliseconds(i64::from(n)),
            updated_at: None,
            last_login: None,
            deleted_at: None,
            is_deleted: deleted,
        }
    }

    async fn populate(view: &UserDirectoryView, active: u32, deleted: u32) {
        for n in 0..active {
            view.upsert(document(n, &format!("user{n}@example.com"), false))
                .await
                .unwrap();
        }
        for n in 0..deleted {
            view.upsert(document(
                active + n,
                &format!("gone{n}@example.com"),
                true,
            ))
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn upsert_replaces_by_id() {
        let view = UserDirectoryView::new();
        let mut doc = document(1, "alice@example.com", false);
        view.upsert(doc.clone()).await.unwrap();

        doc.first_name = "Renamed".to_string();
        view.upsert(doc.clone()).await.unwrap();

        assert_eq!(view.count().await, 1);
        assert_eq!(view.get(doc.id).await.unwrap().first_name, "Renamed");
    }

    #[tokio::test]
    async fn mark_deleted_is_in_place_and_tolerates_missing_ids() {
        let view = UserDirectoryView::new();
        let doc = document(1, "alice@example.com", false);
        view.upsert(doc.clone()).await.unwrap();

        view.mark_deleted(doc.id, Utc::now()).await.unwrap();
        let stored = view.get(doc.id).await.unwrap();
        assert!(stored.is_deleted);
        assert!(stored.deleted_at.is_some());
        assert_eq!(view.count().await, 1);

        // Unknown id: no-op, no error.
        view.mark_deleted(UserId::new(), Utc::now()).await.unwrap();
    }

    #[tokio::test]
    async fn get_by_email_normalizes_the_lookup() {
        let view = UserDirectoryView::new();
        view.upsert(document(1, "alice@example.com", false))
            .await
            .unwrap();

        let found = view.get_by_email("  ALICE@example.com ").await.unwrap();
        assert!(found.is_some());
        assert!(view.exists_by_email("alice@example.com").await.unwrap());
        assert!(!view.exists_by_email("bob@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn exists_by_phone_number_matches_exactly() {
        let view = UserDirectoryView::new();
        view.upsert(document(7, "alice@example.com", false))
            .await
            .unwrap();

        assert!(view.exists_by_phone_number("+15550000007").await.unwrap());
        assert!(!view.exists_by_phone_number("+15550000008").await.unwrap());
    }

    #[tokio::test]
    async fn total_count_is_computed_over_the_filtered_set() {
        let view = UserDirectoryView::new();
        populate(&view, 25, 5).await;

        let spec = SpecificationBuilder::new().with(ActiveOnly).build();
        let pagination = PaginationParams::new(2, 10).unwrap();
        let page = view.get_users(spec.as_ref(), &pagination).await.unwrap();

        // 25 active documents, not 30 stored ones.
        assert_eq!(page.total_count, 25);
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next_page());
        assert!(page.has_previous_page());
        assert!(page.items.iter().all(|d| !d.is_deleted));
    }

    #[tokio::test]
    async fn last_page_is_short() {
        let view = UserDirectoryView::new();
        populate(&view, 25, 0).await;

        let pagination = PaginationParams::new(3, 10).unwrap();
        let page = view.get_users(&MatchAll, &pagination).await.unwrap();

        assert_eq!(page.items.len(), 5);
        assert!(!page.has_next_page());
    }

    #[tokio::test]
    async fn sorting_follows_the_requested_field_and_direction() {
        let view = UserDirectoryView::new();
        populate(&view, 5, 0).await;

        let pagination = PaginationParams::new(1, 10)
            .unwrap()
            .with_sort("last_name", SortDirection::Desc);
        let page = view.get_users(&MatchAll, &pagination).await.unwrap();

        let names: Vec<_> = page.items.iter().map(|d| d.last_name.clone()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.reverse();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn unknown_sort_field_falls_back_to_created_at() {
        let view = UserDirectoryView::new();
        populate(&view, 5, 0).await;

        let pagination = PaginationParams::new(1, 10)
            .unwrap()
            .with_sort("shoe_size", SortDirection::Asc);
        let page = view.get_users(&MatchAll, &pagination).await.unwrap();

        let created: Vec<_> = page.items.iter().map(|d| d.created_at).collect();
        let mut sorted = created.clone();
        sorted.sort();
        assert_eq!(created, sorted);
    }

    #[tokio::test]
    async fn count_and_any_follow_the_specification() {
        let view = UserDirectoryView::new();
        populate(&view, 3, 2).await;

        assert_eq!(view.count_users(&MatchAll).await.unwrap(), 5);
        assert_eq!(view.count_users(&ActiveOnly).await.unwrap(), 3);
        assert!(view.any_users(&ActiveOnly).await.unwrap());
        assert!(
            !view
                .any_users(&MatchesText::new("does-not-exist"))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn exact_email_specification_translates_to_the_native_filter() {
        let view = UserDirectoryView::new();
        populate(&view, 3, 0).await;

        let email = domain::Email::new("user1@example.com").unwrap();
        let spec = WithEmail::new(email);
        assert_eq!(view.count_users(&spec).await.unwrap(), 1);
    }
}
