// 進捗監視の具象実装

use crate::core::{ProgressReporter, RunSummary};
use async_trait::async_trait;
use tracing::{info, warn};

/// tracingログによる進捗報告実装
#[derive(Debug, Clone)]
pub struct TracingProgressReporter {
    interval: usize,
}

impl TracingProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `interval` 件ごとに進捗を出力する
    pub fn with_interval(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }

    pub fn interval(&self) -> usize {
        self.interval
    }
}

impl Default for TracingProgressReporter {
    fn default() -> Self {
        Self { interval: 1000 }
    }
}

#[async_trait]
impl ProgressReporter for TracingProgressReporter {
    async fn report_started(&self, num_workers: usize) {
        info!(num_workers, "scheduler started");
    }

    async fn report_progress(&self, written: usize) {
        if written % self.interval == 0 {
            info!(written, "progress");
        }
    }

    async fn report_error(&self, worker_id: usize, error: &str) {
        warn!(worker_id, error, "task reported an error");
    }

    async fn report_completed(&self, summary: &RunSummary) {
        info!(
            submitted = summary.submitted,
            executed = summary.executed,
            written = summary.written,
            serialize_errors = summary.serialize_errors,
            elapsed_ms = summary.elapsed_ms,
            "scheduler terminated"
        );
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _num_workers: usize) {}

    async fn report_progress(&self, _written: usize) {}

    async fn report_error(&self, _worker_id: usize, _error: &str) {}

    async fn report_completed(&self, _summary: &RunSummary) {}
}
