// Consumer - 並列ワーカー機能

use crate::{
    core::{bounded, PipelineStats, ProgressReporter, QueueReceiver, Task},
    services::processing::process_task,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// 単一ワーカー
///
/// 共有入力キューから1件ずつ取り出して処理し、自分専用の出力キューへ送る。
/// 入力が尽きるかキャンセルされると出力キューを閉じて終了する。
pub fn spawn_single_worker<T, R>(
    worker_id: usize,
    input: QueueReceiver<T>,
    buffer_size: usize,
    cancel: CancellationToken,
    stats: Arc<PipelineStats>,
    reporter: Arc<R>,
) -> (QueueReceiver<Vec<u8>>, tokio::task::JoinHandle<()>)
where
    T: Task,
    R: ProgressReporter + ?Sized + 'static,
{
    let (output_tx, output_rx) = bounded(buffer_size);

    let handle = tokio::spawn(async move {
        debug!(worker_id, "worker started");
        let mut processed = 0usize;

        loop {
            // タスクの実行途中では中断しない。判定はタスク間でのみ行う
            let task = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                next = input.recv() => match next {
                    Some(task) => task,
                    None => break,
                },
            };

            let record = process_task(task, worker_id, &stats, reporter.as_ref()).await;
            processed += 1;

            if output_tx.send(record).await.is_err() {
                // 下流が閉じられた場合は終了
                break;
            }
        }

        debug!(worker_id, processed, "worker stopped");
    });

    (output_rx, handle)
}

/// Workers: 並列ワーカープール
///
/// ワーカーごとの出力キューと JoinHandle を返す。
pub fn spawn_workers<T, R>(
    input: QueueReceiver<T>,
    worker_count: usize,
    buffer_size: usize,
    cancel: CancellationToken,
    stats: Arc<PipelineStats>,
    reporter: Arc<R>,
) -> (Vec<QueueReceiver<Vec<u8>>>, Vec<tokio::task::JoinHandle<()>>)
where
    T: Task,
    R: ProgressReporter + ?Sized + 'static,
{
    let mut outputs = Vec::with_capacity(worker_count);
    let mut handles = Vec::with_capacity(worker_count);

    for worker_id in 0..worker_count {
        let (output, handle) = spawn_single_worker(
            worker_id,
            input.clone(),
            buffer_size,
            cancel.clone(),
            Arc::clone(&stats),
            Arc::clone(&reporter),
        );
        outputs.push(output);
        handles.push(handle);
    }

    (outputs, handles)
}
