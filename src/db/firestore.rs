// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for the three planner tables, all
//! scoped by an opaque user id:
//! - Activity catalog (append-only name set)
//! - Plans (per-date ordered activity lists)
//! - Completions (per-date completion maps)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{CatalogEntryDoc, CompletionDoc, PlanDoc};

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Document id for a per-date row, unique per `(user, date)`.
    fn date_doc_id(user_id: &str, date: &str) -> String {
        format!("{}:{}", urlencoding::encode(user_id), date)
    }

    /// Document id for a catalog row, unique per `(user, name)`.
    fn catalog_doc_id(user_id: &str, name: &str) -> String {
        format!(
            "{}:{}",
            urlencoding::encode(user_id),
            urlencoding::encode(name)
        )
    }

    // ─── Catalog Operations ──────────────────────────────────────

    /// Get all catalog entries for a user, sorted by name.
    pub async fn get_catalog(&self, user_id: &str) -> Result<Vec<CatalogEntryDoc>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITY_CATALOG)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id.clone())]))
            .order_by([(
                "activity_name",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a catalog entry. Idempotent: the document id is derived from
    /// `(user, name)`, so re-inserting overwrites the same row.
    pub async fn insert_catalog_entry(&self, entry: &CatalogEntryDoc) -> Result<(), AppError> {
        let doc_id = Self::catalog_doc_id(&entry.user_id, &entry.activity_name);
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ACTIVITY_CATALOG)
            .document_id(&doc_id)
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Plan Operations ─────────────────────────────────────────

    /// Get all plan rows for a user (initial hydration).
    pub async fn get_plans(&self, user_id: &str) -> Result<Vec<PlanDoc>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PLANS)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Upsert the full ordered plan for one date.
    pub async fn upsert_plan(&self, doc: &PlanDoc) -> Result<(), AppError> {
        let doc_id = Self::date_doc_id(&doc.user_id, &doc.date);
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PLANS)
            .document_id(&doc_id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Completion Operations ───────────────────────────────────

    /// Get all completion rows for a user (initial hydration).
    pub async fn get_completions(&self, user_id: &str) -> Result<Vec<CompletionDoc>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::COMPLETIONS)
            .filter(move |q| q.for_all([q.field("user_id").eq(user_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Upsert the full completion map for one date.
    pub async fn upsert_completion(&self, doc: &CompletionDoc) -> Result<(), AppError> {
        let doc_id = Self::date_doc_id(&doc.user_id, &doc.date);
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::COMPLETIONS)
            .document_id(&doc_id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    // ─── Bulk Per-User Deletion (reset-all) ────────────────────────

    /// Delete every catalog entry for a user. Returns the row count.
    pub async fn delete_catalog_for_user(&self, user_id: &str) -> Result<usize, AppError> {
        let rows = self.get_catalog(user_id).await?;
        self.batch_delete(
            &rows,
            collections::ACTIVITY_CATALOG,
            |row: &CatalogEntryDoc| Self::catalog_doc_id(&row.user_id, &row.activity_name),
        )
        .await?;
        tracing::debug!(user_id, count = rows.len(), "Deleted catalog entries");
        Ok(rows.len())
    }

    /// Delete every plan row for a user. Returns the row count.
    pub async fn delete_plans_for_user(&self, user_id: &str) -> Result<usize, AppError> {
        let rows = self.get_plans(user_id).await?;
        self.batch_delete(&rows, collections::PLANS, |row: &PlanDoc| {
            Self::date_doc_id(&row.user_id, &row.date)
        })
        .await?;
        tracing::debug!(user_id, count = rows.len(), "Deleted plan rows");
        Ok(rows.len())
    }

    /// Delete every completion row for a user. Returns the row count.
    pub async fn delete_completions_for_user(&self, user_id: &str) -> Result<usize, AppError> {
        let rows = self.get_completions(user_id).await?;
        self.batch_delete(&rows, collections::COMPLETIONS, |row: &CompletionDoc| {
            Self::date_doc_id(&row.user_id, &row.date)
        })
        .await?;
        tracing::debug!(user_id, count = rows.len(), "Deleted completion rows");
        Ok(rows.len())
    }
}
