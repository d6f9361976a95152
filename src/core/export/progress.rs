//! Pipeline stages and progress reporting
//!
//! The export runs as an explicit state machine: stages advance one at a
//! time, every transition emits a monotonically non-decreasing progress
//! percentage with a human-readable label, and the shutdown signal is
//! checked on every transition so a run can be cancelled between stages.

use crate::domain::{KaryaError, Result};
use std::sync::Arc;
use tokio::sync::watch;

/// Sequential pipeline stages
///
/// The happy path is strictly linear; `Error` is reachable from any stage
/// on a fatal failure. Only `Done` reports 100 percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Idle,
    FetchingDataset,
    GeneratingCodes,
    FetchingBrandingAsset,
    MaterializingImages,
    ComposingDocument,
    Finalizing,
    Done,
    Error,
}

/// Progress band reserved for asset batches
const MATERIALIZING_BASE: u8 = 40;
const MATERIALIZING_CEIL: u8 = 75;

impl ExportStage {
    /// Percentage reported on entering the stage
    pub fn base_percent(self) -> u8 {
        match self {
            ExportStage::Idle => 0,
            ExportStage::FetchingDataset => 5,
            ExportStage::GeneratingCodes => 20,
            ExportStage::FetchingBrandingAsset => 30,
            ExportStage::MaterializingImages => MATERIALIZING_BASE,
            ExportStage::ComposingDocument => 80,
            ExportStage::Finalizing => 90,
            ExportStage::Done => 100,
            ExportStage::Error => 0,
        }
    }

    /// Short human-readable stage label
    pub fn label(self) -> &'static str {
        match self {
            ExportStage::Idle => "Idle",
            ExportStage::FetchingDataset => "Fetching export dataset",
            ExportStage::GeneratingCodes => "Generating verification codes",
            ExportStage::FetchingBrandingAsset => "Fetching branding asset",
            ExportStage::MaterializingImages => "Fetching images",
            ExportStage::ComposingDocument => "Composing document",
            ExportStage::Finalizing => "Finalizing document",
            ExportStage::Done => "Done",
            ExportStage::Error => "Export failed",
        }
    }
}

/// One progress emission
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub stage: ExportStage,
    pub percent: u8,
    pub label: &'static str,
}

/// Observer for progress emissions
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, update: &ProgressUpdate);
}

/// Observer that discards all updates
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn on_progress(&self, _update: &ProgressUpdate) {}
}

/// Drives stage transitions for one run
///
/// Owned by a single pipeline invocation. The reported percentage never
/// decreases, even if a caller-supplied batch callback reports out of
/// order.
pub struct StageMachine {
    stage: ExportStage,
    percent: u8,
    observer: Arc<dyn ProgressObserver>,
    shutdown: watch::Receiver<bool>,
}

impl StageMachine {
    pub fn new(observer: Arc<dyn ProgressObserver>, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            stage: ExportStage::Idle,
            percent: 0,
            observer,
            shutdown,
        }
    }

    pub fn stage(&self) -> ExportStage {
        self.stage
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    /// Transition into the next stage
    ///
    /// Checks the shutdown signal first (except when entering `Done`:
    /// a finished run is never retroactively cancelled) and emits the
    /// stage's base percentage.
    pub fn enter(&mut self, stage: ExportStage) -> Result<()> {
        if stage != ExportStage::Done && *self.shutdown.borrow() {
            tracing::info!(stage = stage.label(), "Cancellation requested, aborting run");
            self.stage = ExportStage::Error;
            return Err(KaryaError::Cancelled);
        }

        self.stage = stage;
        self.emit(stage.base_percent(), stage.label());
        Ok(())
    }

    /// Report completion of one asset batch
    ///
    /// Interpolates within the materializing band; never reaches the next
    /// stage's base percentage.
    pub fn asset_batch(&mut self, done: usize, total: usize) {
        if total == 0 {
            return;
        }
        let span = (MATERIALIZING_CEIL - MATERIALIZING_BASE) as usize;
        let percent = MATERIALIZING_BASE + (span * done.min(total) / total) as u8;
        self.emit(percent, ExportStage::MaterializingImages.label());
    }

    /// Mark the run as failed, keeping the last reported percentage
    pub fn fail(&mut self) {
        self.stage = ExportStage::Error;
        self.observer.on_progress(&ProgressUpdate {
            stage: ExportStage::Error,
            percent: self.percent,
            label: ExportStage::Error.label(),
        });
    }

    fn emit(&mut self, percent: u8, label: &'static str) {
        self.percent = self.percent.max(percent);
        self.observer.on_progress(&ProgressUpdate {
            stage: self.stage,
            percent: self.percent,
            label,
        });
    }
}
