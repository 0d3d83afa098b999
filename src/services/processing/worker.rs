// Worker - 単一タスクの処理機能

use crate::core::{PipelineStats, ProgressReporter, Task};
use tracing::warn;

/// 単一タスクの実行とシリアライズ
///
/// シリアライズ結果のバイト列はそのまま返す。
/// シリアライズに失敗した場合は警告を出し、空のレコードを返す。
/// パイプラインは1タスクの失敗では止まらない。
pub async fn process_task<T, R>(
    mut task: T,
    worker_id: usize,
    stats: &PipelineStats,
    reporter: &R,
) -> Vec<u8>
where
    T: Task,
    R: ProgressReporter + ?Sized,
{
    task.execute().await;
    stats.record_executed();

    match task.serialize() {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!(worker_id, error = %error, "error occurred while serializing task");
            stats.record_serialize_error();
            reporter.report_error(worker_id, &error.to_string()).await;
            Vec::new()
        }
    }
}
