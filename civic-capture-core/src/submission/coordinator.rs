use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::models::artifact::{CaptureArtifact, MediaKind};
use crate::models::complaint::{ComplaintDraft, ComplaintId, ComplaintRow, ComplaintStatus, NO_LOCATION_LABEL};
use crate::models::config::SubmissionConfig;
use crate::models::error::{FailedUpload, InsertError, SubmissionError, UploadError, ValidationError};
use crate::submission::keys::fresh_object_key;
use crate::traits::storage::{ComplaintStore, ObjectStore};

/// Turns a validated draft into a stored complaint.
///
/// Every attachment is uploaded concurrently and all uploads are awaited
/// before anything is decided. Only when every upload succeeded is the
/// complaint row inserted; that insert is the single commit point. Objects
/// uploaded by an attempt that later fails are left in storage.
pub struct SubmissionCoordinator {
    user_id: String,
    objects: Arc<dyn ObjectStore>,
    complaints: Arc<dyn ComplaintStore>,
    config: SubmissionConfig,
}

impl SubmissionCoordinator {
    pub fn new(
        user_id: impl Into<String>,
        objects: Arc<dyn ObjectStore>,
        complaints: Arc<dyn ComplaintStore>,
        config: SubmissionConfig,
    ) -> Result<Self, SubmissionError> {
        config.validate().map_err(SubmissionError::ConfigurationFailed)?;
        Ok(Self {
            user_id: user_id.into(),
            objects,
            complaints,
            config,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Submit the draft. The draft is only borrowed, so a failed attempt
    /// can be retried as-is; each retry uploads under fresh keys.
    pub async fn submit(&self, draft: &ComplaintDraft) -> Result<ComplaintId, SubmissionError> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError { field: "user_id" }.into());
        }
        draft.validate()?;
        let Some(category) = draft.category else {
            return Err(ValidationError { field: "category" }.into());
        };

        log::info!(
            "Submitting complaint \"{}\" with {} attachment(s)",
            draft.title,
            draft.attachments().count()
        );

        let (image, voice) = futures::join!(
            self.upload_optional(draft.image.as_ref()),
            self.upload_optional(draft.voice.as_ref()),
        );

        let mut failures = Vec::new();
        let image_key = collect_upload(MediaKind::Image, image, &mut failures);
        let voice_key = collect_upload(MediaKind::Voice, voice, &mut failures);
        if !failures.is_empty() {
            let err = SubmissionError::PartialUploadFailure(failures);
            log::warn!("Complaint not saved: {}", err);
            return Err(err);
        }

        let location = draft.location.as_ref();
        let row = ComplaintRow {
            user_id: self.user_id.clone(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            category,
            priority: draft.priority,
            image_key,
            voice_key,
            latitude: location.map(|l| l.latitude),
            longitude: location.map(|l| l.longitude),
            location_label: location
                .and_then(|l| l.address.as_deref())
                .map(str::trim)
                .filter(|address| !address.is_empty())
                .unwrap_or(NO_LOCATION_LABEL)
                .to_string(),
            status: ComplaintStatus::Pending,
        };

        let insert = self.complaints.insert_complaint(&row);
        let inserted = match with_limit(self.config.insert_timeout, insert).await {
            Some(result) => result,
            None => Err(InsertError::NetworkFailure(format!(
                "insert timed out after {:?}",
                self.config.insert_timeout.unwrap_or_default()
            ))),
        };

        match inserted {
            Ok(id) => {
                log::info!("Complaint {} saved", id);
                Ok(id)
            }
            Err(e) => {
                log::error!(
                    "Failed to save complaint, uploaded objects left in place (image: {:?}, voice: {:?}): {}",
                    row.image_key,
                    row.voice_key,
                    e
                );
                Err(SubmissionError::PersistenceFailure(e))
            }
        }
    }

    async fn upload_optional(&self, artifact: Option<&CaptureArtifact>) -> Option<Result<String, UploadError>> {
        let artifact = artifact?;
        Some(self.upload(artifact).await)
    }

    async fn upload(&self, artifact: &CaptureArtifact) -> Result<String, UploadError> {
        let kind = artifact.kind();
        let key = fresh_object_key(&self.user_id, kind);
        log::debug!("Uploading {} ({} bytes) to {}/{}", kind, artifact.bytes().len(), self.config.bucket, key);

        let upload = self
            .objects
            .upload(&self.config.bucket, &key, artifact.bytes(), artifact.mime_type());
        match with_limit(self.config.upload_timeout, upload).await {
            Some(Ok(stored)) => {
                log::info!("Uploaded {} to {}", kind, stored);
                Ok(stored)
            }
            Some(Err(e)) => {
                log::warn!("Upload of {} failed: {}", kind, e);
                Err(e)
            }
            None => {
                log::warn!("Upload of {} timed out", kind);
                Err(UploadError::NetworkFailure(format!(
                    "upload timed out after {:?}",
                    self.config.upload_timeout.unwrap_or_default()
                )))
            }
        }
    }
}

/// Runs `fut`, giving up after `limit` when one is set. `None` means timed out.
async fn with_limit<F: Future>(limit: Option<Duration>, fut: F) -> Option<F::Output> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await.ok(),
        None => Some(fut.await),
    }
}

fn collect_upload(
    kind: MediaKind,
    outcome: Option<Result<String, UploadError>>,
    failures: &mut Vec<FailedUpload>,
) -> Option<String> {
    match outcome? {
        Ok(key) => Some(key),
        Err(error) => {
            failures.push(FailedUpload { kind, error });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::models::complaint::{Category, Priority};
    use crate::models::location::LocationResult;

    #[derive(Default)]
    struct MemoryObjects {
        uploads: Mutex<Vec<(String, String, usize)>>,
        failures: Mutex<HashMap<MediaKind, UploadError>>,
        delays: HashMap<MediaKind, Duration>,
        finished: Mutex<Vec<MediaKind>>,
    }

    fn kind_of(key: &str) -> MediaKind {
        if key.ends_with(".jpg") {
            MediaKind::Image
        } else {
            MediaKind::Voice
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryObjects {
        async fn upload(&self, bucket: &str, key: &str, bytes: &[u8], _content_type: &str) -> Result<String, UploadError> {
            let kind = kind_of(key);
            if let Some(delay) = self.delays.get(&kind) {
                tokio::time::sleep(*delay).await;
            }
            self.uploads.lock().push((bucket.to_string(), key.to_string(), bytes.len()));
            self.finished.lock().push(kind);
            match self.failures.lock().get(&kind) {
                Some(error) => Err(error.clone()),
                None => Ok(key.to_string()),
            }
        }
    }

    #[derive(Default)]
    struct MemoryComplaints {
        rows: Mutex<Vec<ComplaintRow>>,
        reject: Mutex<Option<InsertError>>,
    }

    #[async_trait]
    impl ComplaintStore for MemoryComplaints {
        async fn insert_complaint(&self, row: &ComplaintRow) -> Result<ComplaintId, InsertError> {
            if let Some(error) = self.reject.lock().clone() {
                return Err(error);
            }
            let mut rows = self.rows.lock();
            rows.push(row.clone());
            Ok(ComplaintId(format!("c-{}", rows.len())))
        }
    }

    fn coordinator(objects: Arc<MemoryObjects>, complaints: Arc<MemoryComplaints>) -> SubmissionCoordinator {
        SubmissionCoordinator::new("user-1", objects, complaints, SubmissionConfig::default()).unwrap()
    }

    fn draft() -> ComplaintDraft {
        ComplaintDraft::new("Broken streetlight", "Dark since Monday", Category::Streetlights)
    }

    fn photo() -> CaptureArtifact {
        CaptureArtifact::image(vec![0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg", 4, 4)
    }

    fn clip() -> CaptureArtifact {
        CaptureArtifact::audio_clip(vec![0x1A, 0x45, 0xDF, 0xA3], "audio/webm", 3000)
    }

    #[tokio::test]
    async fn text_only_draft_inserts_once_without_uploads() {
        let objects = Arc::new(MemoryObjects::default());
        let complaints = Arc::new(MemoryComplaints::default());
        let coordinator = coordinator(objects.clone(), complaints.clone());

        let id = coordinator.submit(&draft()).await.unwrap();
        assert_eq!(id, ComplaintId("c-1".into()));
        assert!(objects.uploads.lock().is_empty());

        let rows = complaints.rows.lock();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.user_id, "user-1");
        assert_eq!(row.category, Category::Streetlights);
        assert_eq!(row.priority, Priority::Medium);
        assert_eq!(row.image_key, None);
        assert_eq!(row.voice_key, None);
        assert_eq!(row.latitude, None);
        assert_eq!(row.location_label, NO_LOCATION_LABEL);
        assert_eq!(row.status, ComplaintStatus::Pending);
    }

    #[tokio::test]
    async fn row_references_uploaded_keys_and_location() {
        let objects = Arc::new(MemoryObjects::default());
        let complaints = Arc::new(MemoryComplaints::default());
        let coordinator = coordinator(objects.clone(), complaints.clone());

        let draft = draft()
            .with_priority(Priority::High)
            .with_image(photo())
            .with_voice(clip())
            .with_location(LocationResult {
                latitude: 28.6139,
                longitude: 77.209,
                address: Some("Connaught Place".into()),
            });
        coordinator.submit(&draft).await.unwrap();

        let uploads = objects.uploads.lock();
        assert_eq!(uploads.len(), 2);
        assert!(uploads.iter().all(|(bucket, _, _)| bucket == "complaint-images"));

        let row = complaints.rows.lock()[0].clone();
        let image_key = row.image_key.unwrap();
        let voice_key = row.voice_key.unwrap();
        assert!(image_key.starts_with("user-1/image_") && image_key.ends_with(".jpg"));
        assert!(voice_key.starts_with("user-1/voice_") && voice_key.ends_with(".webm"));
        assert_eq!(row.latitude, Some(28.6139));
        assert_eq!(row.location_label, "Connaught Place");
        assert_eq!(row.priority, Priority::High);
    }

    #[tokio::test]
    async fn blank_address_falls_back_to_default_label() {
        let objects = Arc::new(MemoryObjects::default());
        let complaints = Arc::new(MemoryComplaints::default());
        let coordinator = coordinator(objects, complaints.clone());

        for address in [Some(""), Some("   "), None] {
            let draft = draft().with_location(LocationResult {
                latitude: 12.97,
                longitude: 77.59,
                address: address.map(str::to_string),
            });
            coordinator.submit(&draft).await.unwrap();
        }

        let rows = complaints.rows.lock();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.location_label == NO_LOCATION_LABEL));
        assert!(rows.iter().all(|row| row.latitude == Some(12.97)));
    }

    #[tokio::test]
    async fn failed_voice_upload_skips_insert_and_retry_uses_fresh_keys() {
        let objects = Arc::new(MemoryObjects::default());
        objects
            .failures
            .lock()
            .insert(MediaKind::Voice, UploadError::NetworkFailure("connection reset".into()));
        let complaints = Arc::new(MemoryComplaints::default());
        let coordinator = coordinator(objects.clone(), complaints.clone());
        let draft = draft().with_image(photo()).with_voice(clip());

        let err = coordinator.submit(&draft).await.unwrap_err();
        assert_eq!(err.failed_kinds(), vec![MediaKind::Voice]);
        assert!(complaints.rows.lock().is_empty());

        objects.failures.lock().clear();
        coordinator.submit(&draft).await.unwrap();
        assert_eq!(complaints.rows.lock().len(), 1);

        let uploads = objects.uploads.lock();
        assert_eq!(uploads.len(), 4);
        let mut keys: Vec<&String> = uploads.iter().map(|(_, key, _)| key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn fast_failure_waits_for_slow_upload() {
        let objects = Arc::new(MemoryObjects {
            delays: HashMap::from([(MediaKind::Image, Duration::from_secs(5))]),
            ..Default::default()
        });
        objects.failures.lock().insert(MediaKind::Voice, UploadError::QuotaExceeded);
        objects.failures.lock().insert(MediaKind::Image, UploadError::Unknown("500".into()));
        let complaints = Arc::new(MemoryComplaints::default());
        let coordinator = coordinator(objects.clone(), complaints.clone());

        let err = coordinator
            .submit(&draft().with_image(photo()).with_voice(clip()))
            .await
            .unwrap_err();

        assert_eq!(err.failed_kinds(), vec![MediaKind::Image, MediaKind::Voice]);
        assert_eq!(*objects.finished.lock(), vec![MediaKind::Voice, MediaKind::Image]);
        assert!(complaints.rows.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn hung_upload_times_out_as_network_failure() {
        let objects = Arc::new(MemoryObjects {
            delays: HashMap::from([(MediaKind::Image, Duration::from_secs(600))]),
            ..Default::default()
        });
        let complaints = Arc::new(MemoryComplaints::default());
        let coordinator = coordinator(objects, complaints.clone());

        let err = coordinator.submit(&draft().with_image(photo())).await.unwrap_err();
        match err {
            SubmissionError::PartialUploadFailure(failures) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].kind, MediaKind::Image);
                assert!(matches!(failures[0].error, UploadError::NetworkFailure(_)));
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(complaints.rows.lock().is_empty());
    }

    #[tokio::test]
    async fn validation_fails_before_any_upload() {
        let objects = Arc::new(MemoryObjects::default());
        let complaints = Arc::new(MemoryComplaints::default());
        let coordinator = coordinator(objects.clone(), complaints.clone());

        let mut missing_title = draft().with_image(photo());
        missing_title.title = "   ".into();
        let err = coordinator.submit(&missing_title).await.unwrap_err();
        assert_eq!(err, SubmissionError::Validation(ValidationError { field: "title" }));

        let mut missing_category = draft().with_voice(clip());
        missing_category.category = None;
        let err = coordinator.submit(&missing_category).await.unwrap_err();
        assert_eq!(err, SubmissionError::Validation(ValidationError { field: "category" }));

        assert!(objects.uploads.lock().is_empty());
        assert!(complaints.rows.lock().is_empty());
    }

    #[tokio::test]
    async fn empty_user_id_is_rejected() {
        let objects = Arc::new(MemoryObjects::default());
        let coordinator =
            SubmissionCoordinator::new("", objects.clone(), Arc::new(MemoryComplaints::default()), SubmissionConfig::default())
                .unwrap();

        let err = coordinator.submit(&draft().with_image(photo())).await.unwrap_err();
        assert_eq!(err, SubmissionError::Validation(ValidationError { field: "user_id" }));
        assert!(objects.uploads.lock().is_empty());
    }

    #[tokio::test]
    async fn insert_failure_is_persistence_failure() {
        let objects = Arc::new(MemoryObjects::default());
        let complaints = Arc::new(MemoryComplaints::default());
        *complaints.reject.lock() = Some(InsertError::Rejected("row violates policy".into()));
        let coordinator = coordinator(objects.clone(), complaints);

        let err = coordinator.submit(&draft().with_image(photo())).await.unwrap_err();
        assert_eq!(
            err,
            SubmissionError::PersistenceFailure(InsertError::Rejected("row violates policy".into()))
        );
        assert_eq!(objects.uploads.lock().len(), 1);
    }

    #[test]
    fn empty_bucket_is_a_configuration_error() {
        let config = SubmissionConfig {
            bucket: String::new(),
            ..Default::default()
        };
        let result = SubmissionCoordinator::new(
            "user-1",
            Arc::new(MemoryObjects::default()),
            Arc::new(MemoryComplaints::default()),
            config,
        );
        assert!(matches!(result, Err(SubmissionError::ConfigurationFailed(_))));
    }
}
