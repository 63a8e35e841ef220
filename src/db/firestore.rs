// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper implementing [`JourneyStore`].
//!
//! Collections:
//! - `journeys` (document ID = journey ID)
//! - `users` (document ID = identity provider user ID)
//! - `counters` (journey ID allocation)

use async_trait::async_trait;
use firestore::errors::{BackoffError, FirestoreError};
use firestore::FirestoreWritePrecondition;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::db::{collections, JourneyStore};
use crate::error::{AppError, Result};
use crate::models::{Journey, JourneyQuery, NewJourney, User};

/// Counter document holding the last allocated journey ID.
const JOURNEY_COUNTER_ID: &str = "journeys";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IdCounter {
    last_id: u64,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self> {
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
    async fn create_emulator_client(project_id: &str) -> Result<Self> {
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

    /// Create an offline client. Every operation returns a database error.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Users whose username equals `username`, keyed by user ID.
    async fn users_named(&self, username: &str) -> Result<HashMap<String, User>> {
        let username = username.to_string();
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("username").eq(username.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
    }
}

#[async_trait]
impl JourneyStore for FirestoreDb {
    /// Allocate the next journey ID and insert the journey in one transaction.
    ///
    /// The counter is read through the transaction, so a concurrent
    /// allocation makes the commit fail and the whole closure is retried.
    /// The journey write is create-only.
    async fn add_journey(&self, owner_id: &str, input: &NewJourney) -> Result<Journey> {
        let owner_id = owner_id.to_string();
        let input = input.clone();

        let journey = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let owner_id = owner_id.clone();
                let input = input.clone();

                Box::pin(async move {
                    let counter: Option<IdCounter> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::COUNTERS)
                        .obj()
                        .one(JOURNEY_COUNTER_ID)
                        .await?;

                    let next = IdCounter {
                        last_id: counter.unwrap_or_default().last_id + 1,
                    };
                    let journey = Journey::from_new(next.last_id, &owner_id, &input);

                    db.fluent()
                        .update()
                        .in_col(collections::COUNTERS)
                        .document_id(JOURNEY_COUNTER_ID)
                        .object(&next)
                        .add_to_transaction(transaction)?;

                    db.fluent()
                        .update()
                        .in_col(collections::JOURNEYS)
                        .precondition(FirestoreWritePrecondition::Exists(false))
                        .document_id(journey.id.to_string())
                        .object(&journey)
                        .add_to_transaction(transaction)?;

                    Ok::<Journey, BackoffError<FirestoreError>>(journey)
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert journey: {}", e)))?;

        tracing::debug!(journey_id = journey.id, "Allocated journey ID");
        Ok(journey)
    }

    async fn update_journey(&self, journey: &Journey) -> Result<()> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::JOURNEYS)
            .document_id(journey.id.to_string())
            .object(journey)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn remove_journey(&self, journey: &Journey) -> Result<()> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::JOURNEYS)
            .document_id(journey.id.to_string())
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn find_journey(&self, journey_id: u64) -> Result<Option<Journey>> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::JOURNEYS)
            .obj()
            .one(&journey_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn find_journey_for_owner(
        &self,
        owner_id: &str,
        journey_id: u64,
    ) -> Result<Option<Journey>> {
        Ok(self
            .find_journey(journey_id)
            .await?
            .filter(|j| j.user_id == owner_id))
    }

    /// Equality predicates are pushed to Firestore; date predicates and the
    /// username join are evaluated here with `JourneyQuery::matches`.
    async fn query_journeys(&self, query: &JourneyQuery) -> Result<Vec<Journey>> {
        let owners = match &query.owner_username {
            Some(username) => {
                let owners = self.users_named(username).await?;
                if owners.is_empty() {
                    return Ok(Vec::new());
                }
                owners
            }
            None => HashMap::new(),
        };

        let owner_id = query.owner_id.clone();
        let mode = query.transportation_type.map(i64::from);

        let journeys: Vec<Journey> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::JOURNEYS)
            .filter(move |q| {
                q.for_all([
                    owner_id
                        .clone()
                        .and_then(|id| q.field("user_id").eq(id)),
                    mode.and_then(|m| q.field("transportation_type").eq(m)),
                ])
            })
            .order_by([("id", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(journeys
            .into_iter()
            .filter(|j| query.matches(j, owners.get(&j.user_id)))
            .collect())
    }

    async fn find_user(&self, user_id: &str) -> Result<Option<User>> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
