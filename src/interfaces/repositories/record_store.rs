use async_trait::async_trait;
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    entities::{
        event::{EventRecord, NewEvent},
        poster::{NewPoster, PosterRecord},
    },
    errors::StoreError,
    repositories::supabase::{check_response, SupabaseClient},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Events,
    Posters,
}

impl Collection {
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Events => "events",
            Collection::Posters => "posters",
        }
    }
}

/// Structured rows for events and posters. Listings are newest-first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_events(&self) -> Result<Vec<EventRecord>, StoreError>;
    async fn insert_event(&self, event: &NewEvent) -> Result<EventRecord, StoreError>;
    async fn list_posters(&self) -> Result<Vec<PosterRecord>, StoreError>;
    async fn insert_poster(&self, poster: &NewPoster) -> Result<PosterRecord, StoreError>;
    async fn delete(&self, collection: Collection, id: i64) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct SupabaseRecordStore {
    client: SupabaseClient,
}

impl SupabaseRecordStore {
    pub fn new(client: SupabaseClient) -> Self {
        SupabaseRecordStore { client }
    }

    async fn select_all<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, StoreError> {
        let mut url = self.client.endpoint(&format!("rest/v1/{}", collection.table()))?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "created_at.desc");

        let response = self.client.request(Method::GET, url).send().await?;
        let rows = check_response(response).await?.json::<Vec<T>>().await?;

        tracing::debug!(table = collection.table(), count = rows.len(), "Fetched records");
        Ok(rows)
    }

    async fn insert_one<N, T>(&self, collection: Collection, row: &N) -> Result<T, StoreError>
    where
        N: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.client.endpoint(&format!("rest/v1/{}", collection.table()))?;

        let response = self.client
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await?;

        check_response(response)
            .await?
            .json::<Vec<T>>()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode(format!("Insert into {} returned no rows", collection.table())))
    }
}

#[async_trait]
impl RecordStore for SupabaseRecordStore {
    async fn list_events(&self) -> Result<Vec<EventRecord>, StoreError> {
        self.select_all(Collection::Events).await
    }

    async fn insert_event(&self, event: &NewEvent) -> Result<EventRecord, StoreError> {
        self.insert_one(Collection::Events, event).await
    }

    async fn list_posters(&self) -> Result<Vec<PosterRecord>, StoreError> {
        self.select_all(Collection::Posters).await
    }

    async fn insert_poster(&self, poster: &NewPoster) -> Result<PosterRecord, StoreError> {
        self.insert_one(Collection::Posters, poster).await
    }

    async fn delete(&self, collection: Collection, id: i64) -> Result<(), StoreError> {
        let mut url = self.client.endpoint(&format!("rest/v1/{}", collection.table()))?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));

        let response = self.client.request(Method::DELETE, url).send().await?;
        check_response(response).await?;

        tracing::info!(table = collection.table(), id, "Deleted record");
        Ok(())
    }
}
