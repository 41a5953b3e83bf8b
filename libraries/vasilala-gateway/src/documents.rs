//! Document database operations.
//!
//! REST surface over the hosted document store: CRUD by ID, filtered
//! queries with cursor pagination, atomic increments, and array
//! union/remove. Every operation carries the bearer token and retries once
//! through the token-refresh path on 401.

use crate::client::{response_error, transport_error, GatewayClient};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;
use vasilala_core::{CoreError, Document, DocumentGateway, DocumentPatch, QueryFilter};

impl GatewayClient {
    async fn document_url(&self, collection: &str, suffix: &str) -> String {
        let base = self.base_url().await;
        format!("{base}/api/documents/{collection}{suffix}")
    }

    async fn do_get(&self, collection: &str, id: &str) -> Result<Document> {
        let url = self.document_url(collection, &format!("/{id}")).await;
        let token = self.access_token().await?;

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().as_u16() == 404 {
            return Err(GatewayError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::ParseError(format!("document body: {e}")))?;
        Document::from_value(value).map_err(|e| GatewayError::ParseError(e.to_string()))
    }

    async fn do_query(
        &self,
        collection: &str,
        filter: &QueryFilter,
        after_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Document>> {
        let url = self.document_url(collection, "/query").await;
        let token = self.access_token().await?;

        debug!(collection, limit, after = ?after_id, "querying documents");

        let body = json!({
            "filter": filter,
            "limit": limit,
            "after": after_id,
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        let values: Vec<Value> = response
            .json()
            .await
            .map_err(|e| GatewayError::ParseError(format!("query body: {e}")))?;

        values
            .into_iter()
            .map(|value| {
                Document::from_value(value).map_err(|e| GatewayError::ParseError(e.to_string()))
            })
            .collect()
    }

    async fn do_create(&self, collection: &str, document: &Document) -> Result<String> {
        let url = self.document_url(collection, "").await;
        let token = self.access_token().await?;

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&document.clone().into_value())
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }

        #[derive(serde::Deserialize)]
        struct CreateResponse {
            id: String,
        }
        let created: CreateResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::ParseError(format!("create body: {e}")))?;

        debug!(collection, id = %created.id, "document created");
        Ok(created.id)
    }

    async fn do_update(&self, collection: &str, id: &str, patch: &Document) -> Result<()> {
        let url = self.document_url(collection, &format!("/{id}")).await;
        let token = self.access_token().await?;

        let response = self
            .http
            .patch(&url)
            .bearer_auth(token)
            .json(&patch.clone().into_value())
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        Ok(())
    }

    async fn do_delete(&self, collection: &str, id: &str) -> Result<()> {
        let url = self.document_url(collection, &format!("/{id}")).await;
        let token = self.access_token().await?;

        let response = self
            .http
            .delete(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        Ok(())
    }

    async fn do_field_op(
        &self,
        collection: &str,
        id: &str,
        op: &str,
        body: Value,
    ) -> Result<()> {
        let url = self
            .document_url(collection, &format!("/{id}/{op}"))
            .await;
        let token = self.access_token().await?;

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(response_error(response).await);
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentGateway for GatewayClient {
    async fn get(&self, collection: &str, id: &str) -> vasilala_core::Result<Document> {
        self.with_auto_refresh(|| self.do_get(collection, id))
            .await
            .map_err(CoreError::from)
    }

    async fn query(
        &self,
        collection: &str,
        filter: &QueryFilter,
        limit: usize,
    ) -> vasilala_core::Result<Vec<Document>> {
        self.with_auto_refresh(|| self.do_query(collection, filter, None, limit))
            .await
            .map_err(CoreError::from)
    }

    async fn query_after(
        &self,
        collection: &str,
        filter: &QueryFilter,
        after_id: &str,
        limit: usize,
    ) -> vasilala_core::Result<Vec<Document>> {
        self.with_auto_refresh(|| self.do_query(collection, filter, Some(after_id), limit))
            .await
            .map_err(CoreError::from)
    }

    async fn create(&self, collection: &str, document: Document) -> vasilala_core::Result<String> {
        self.with_auto_refresh(|| self.do_create(collection, &document))
            .await
            .map_err(CoreError::from)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: DocumentPatch,
    ) -> vasilala_core::Result<()> {
        self.with_auto_refresh(|| self.do_update(collection, id, &patch))
            .await
            .map_err(CoreError::from)
    }

    async fn delete(&self, collection: &str, id: &str) -> vasilala_core::Result<()> {
        self.with_auto_refresh(|| self.do_delete(collection, id))
            .await
            .map_err(CoreError::from)
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> vasilala_core::Result<()> {
        self.with_auto_refresh(|| {
            self.do_field_op(
                collection,
                id,
                "increment",
                json!({ "field": field, "delta": delta }),
            )
        })
        .await
        .map_err(CoreError::from)
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> vasilala_core::Result<()> {
        self.with_auto_refresh(|| {
            self.do_field_op(
                collection,
                id,
                "array-union",
                json!({ "field": field, "value": value }),
            )
        })
        .await
        .map_err(CoreError::from)
    }

    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
    ) -> vasilala_core::Result<()> {
        self.with_auto_refresh(|| {
            self.do_field_op(
                collection,
                id,
                "array-remove",
                json!({ "field": field, "value": value }),
            )
        })
        .await
        .map_err(CoreError::from)
    }
}
