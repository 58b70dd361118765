//! Share code issuance and redemption.
//!
//! Issuing a code stores only its SHA-256 digest next to the project ID;
//! redeeming hashes the entered code the same way and looks the digest up.
//! Codes never expire and re-issuing does not revoke earlier codes.

use std::sync::Arc;

use share_code::{AccessCode, ShareCodeConfig};
use uuid::Uuid;

use crate::error::ShareError;
use crate::metric::{ShareMetrics, ShareOutcome};
use crate::records::{ShareRecord, SharedProject};
use crate::store::{ContentStore, ShareStore};

/// Issues and redeems share codes against an injected record store.
pub struct ShareService<S> {
    store: Arc<S>,
    config: ShareCodeConfig,
    metrics: Arc<ShareMetrics>,
}

impl<S> ShareService<S>
where
    S: ShareStore + ContentStore,
{
    pub fn new(store: Arc<S>, config: ShareCodeConfig) -> Self {
        Self {
            store,
            config,
            metrics: Arc::new(ShareMetrics::new()),
        }
    }

    /// Share metrics with another component instead of keeping private ones.
    pub fn with_metrics(mut self, metrics: Arc<ShareMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<ShareMetrics> {
        &self.metrics
    }

    /// Issue a new code for a project.
    ///
    /// The returned code is the only copy of the plaintext. If the record
    /// cannot be stored the code is dropped and the store error returned.
    pub async fn issue(&self, project_id: Uuid) -> Result<AccessCode, ShareError> {
        let exists = match self.store.get_project(project_id).await {
            Ok(project) => project.is_some(),
            Err(e) => {
                self.metrics.record(ShareOutcome::Failed);
                log::warn!("Failed to look up project {}: {}", project_id, e);
                return Err(e.into());
            }
        };
        if !exists {
            return Err(ShareError::UnknownProject(project_id));
        }

        let (code, digest) = share_code::generate_with_digest(&self.config);
        let record = ShareRecord::new(digest, project_id);

        if let Err(e) = self.store.insert_share(&record).await {
            self.metrics.record(ShareOutcome::Failed);
            log::warn!("Failed to store share for project {}: {}", project_id, e);
            return Err(e.into());
        }

        self.metrics.record(ShareOutcome::Issued);
        log::info!("Issued share {} for project {}", record.id, project_id);
        Ok(code)
    }

    /// Issue a code on behalf of a user, who must own the project.
    pub async fn issue_as(&self, user_id: Uuid, project_id: Uuid) -> Result<AccessCode, ShareError> {
        let project = match self.store.get_project(project_id).await {
            Ok(project) => project.ok_or(ShareError::UnknownProject(project_id))?,
            Err(e) => {
                self.metrics.record(ShareOutcome::Failed);
                log::warn!("Failed to look up project {}: {}", project_id, e);
                return Err(e.into());
            }
        };
        if project.user_id != user_id {
            return Err(ShareError::NotOwner {
                project_id,
                user_id,
            });
        }
        self.issue(project_id).await
    }

    /// Resolve an entered code to the project it unlocks.
    ///
    /// # Returns
    /// * `Ok(Some(project_id))` if the code was issued
    /// * `Ok(None)` if no share matches (a normal outcome)
    /// * `Err` for empty input or a backend failure
    pub async fn redeem(&self, entered: &str) -> Result<Option<Uuid>, ShareError> {
        let parsed = share_code::parse(entered)?;
        let digest = parsed.digest();

        let record = match self.store.find_share(&digest).await {
            Ok(record) => record,
            Err(e) => {
                self.metrics.record(ShareOutcome::Failed);
                log::warn!("Failed to look up share code: {}", e);
                return Err(e.into());
            }
        };

        match record {
            Some(record) if share_code::digests_equal(&record.digest, &digest) => {
                self.metrics.record(ShareOutcome::Redeemed);
                log::info!(
                    "Redeemed share {} for project {}",
                    record.id,
                    record.project_id
                );
                Ok(Some(record.project_id))
            }
            _ => {
                self.metrics.record(ShareOutcome::NotFound);
                log::debug!("No share matches entered code");
                Ok(None)
            }
        }
    }

    /// Redeem a code and load everything the partner's view needs.
    pub async fn unlock(&self, entered: &str) -> Result<Option<SharedProject>, ShareError> {
        let Some(project_id) = self.redeem(entered).await? else {
            return Ok(None);
        };

        let project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or(ShareError::UnknownProject(project_id))?;
        let analytics = self.store.list_analytics(project_id).await?;
        let quiz = self.store.list_quiz(project_id).await?;
        let terminal = self.store.list_terminal(project_id).await?;

        Ok(Some(SharedProject {
            project,
            analytics,
            quiz,
            terminal,
        }))
    }
}
