//! Shared store and background tasks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use health_records::{
    apply_parsed, export_to_path, parse_path, AddReportOutcome, ExportStats, ImportConfig,
    ImportReport, PatientStore, RecordResult, Summary,
};
use health_types::{HealthReport, Patient, PatientId};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::error::{MonitorError, MonitorResult};

/// Store shared between the shell and background tasks.
pub type SharedStore = Arc<RwLock<PatientStore>>;

/// Handle to a background task.
///
/// Dropping the handle detaches the task; it keeps running to completion.
#[derive(Debug)]
pub struct TaskHandle<T> {
    inner: JoinHandle<MonitorResult<T>>,
}

impl<T> TaskHandle<T> {
    fn new(inner: JoinHandle<MonitorResult<T>>) -> Self {
        Self { inner }
    }

    /// Waits for the task and returns its result.
    pub async fn join(self) -> MonitorResult<T> {
        self.inner.await?
    }

    /// Waits at most `limit` for the task.
    ///
    /// On timeout the task is left running.
    pub async fn join_timeout(self, limit: Duration) -> MonitorResult<T> {
        match tokio::time::timeout(limit, self.inner).await {
            Ok(joined) => joined?,
            Err(_) => Err(MonitorError::Timeout(limit)),
        }
    }
}

/// Patient store plus the background operations that run against it.
#[derive(Clone, Debug)]
pub struct HealthMonitor {
    store: SharedStore,
    import_config: ImportConfig,
}

impl HealthMonitor {
    /// Creates a monitor around `store`.
    pub fn new(store: PatientStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            import_config: ImportConfig::default(),
        }
    }

    /// Sets the config used by [`import`](Self::import).
    pub fn with_import_config(mut self, config: ImportConfig) -> Self {
        self.import_config = config;
        self
    }

    /// Returns the shared store.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Appends a patient.
    pub async fn add_patient(&self, patient: Patient) {
        self.store.write().await.add_patient(patient);
    }

    /// Appends a report to the first patient with `id`.
    pub async fn add_report_to_patient(
        &self,
        id: PatientId,
        report: HealthReport,
    ) -> AddReportOutcome {
        self.store.write().await.add_report_to_patient(id, report)
    }

    /// Renders the first patient with `id`.
    pub async fn render_reports_for(&self, id: PatientId) -> Option<String> {
        self.store.read().await.render_reports_for(id)
    }

    /// Returns copies of every patient whose name matches, ignoring case.
    pub async fn find_by_name(&self, name: &str) -> Vec<Patient> {
        self.store
            .read()
            .await
            .find_by_name(name)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Writes a snapshot of the store to `path` in the background.
    ///
    /// The snapshot is taken under the read lock; the file is written after
    /// the lock is released.
    pub fn export(&self, path: impl Into<PathBuf>) -> TaskHandle<ExportStats> {
        let store = Arc::clone(&self.store);
        let path = path.into();

        TaskHandle::new(tokio::task::spawn_blocking(move || {
            let snapshot = store.blocking_read().clone();
            export_to_path(&snapshot, &path).map_err(|e| {
                tracing::error!("Error exporting data to {}: {}", path.display(), e);
                MonitorError::from(e)
            })
        }))
    }

    /// Imports `path` into the store in the background.
    ///
    /// The file is read and parsed without holding the lock. The rows are
    /// then merged under one write lock, so other users never see a
    /// half-applied import.
    pub fn import(&self, path: impl Into<PathBuf>) -> TaskHandle<ImportReport> {
        let store = Arc::clone(&self.store);
        let config = self.import_config.clone();
        let path = path.into();

        TaskHandle::new(tokio::task::spawn_blocking(move || {
            let merged: RecordResult<ImportReport> = parse_path(&path).and_then(|parsed| {
                let mut guard = store.blocking_write();
                apply_parsed(&mut guard, parsed, &config)
            });

            match merged {
                Ok(report) => {
                    tracing::info!(
                        "Imported {} rows ({} new patients, {} rejected) from {}",
                        report.rows_applied,
                        report.patients_created,
                        report.failures.len(),
                        path.display()
                    );
                    Ok(report)
                }
                Err(e) => {
                    tracing::error!("Error importing data from {}: {}", path.display(), e);
                    Err(MonitorError::from(e))
                }
            }
        }))
    }

    /// Counts patients and reports in the background.
    pub fn summary(&self) -> TaskHandle<Summary> {
        let store = Arc::clone(&self.store);
        TaskHandle::new(tokio::spawn(async move {
            Ok(store.read().await.summarize())
        }))
    }
}
