// Pipeline - ワーカー → マージ → ライターの配線

use super::consumer::spawn_workers;
use crate::{
    combinators::merge_with_capacity,
    core::{PipelineStats, ProgressReporter, QueueReceiver, SchedulerResult, Task},
    services::{persistence::spawn_writer, SchedulerConfig},
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// 起動済みステージのハンドル
pub struct PipelineHandles {
    pub workers: Vec<JoinHandle<()>>,
    pub writer: JoinHandle<SchedulerResult<usize>>,
}

/// 入力キューからシンクまでの全ステージを起動する
pub fn spawn_pipeline<T, R>(
    input: QueueReceiver<T>,
    config: &SchedulerConfig,
    cancel: CancellationToken,
    stats: Arc<PipelineStats>,
    reporter: Arc<R>,
) -> PipelineHandles
where
    T: Task,
    R: ProgressReporter + ?Sized + 'static,
{
    let (outputs, workers) = spawn_workers(
        input,
        config.num_workers(),
        config.buffer_size(),
        cancel.clone(),
        Arc::clone(&stats),
        Arc::clone(&reporter),
    );

    let merged = merge_with_capacity(outputs, config.buffer_size());
    let writer = spawn_writer(merged, config.output().clone(), cancel, stats, reporter);

    PipelineHandles { workers, writer }
}
