// Producer - レコード配信機能

use super::scheduler::Scheduler;
use crate::core::{ProgressReporter, QueueReceiver, Task};
use std::sync::Arc;
use tracing::{debug, warn};

/// Producer: ソースキューのレコードをタスクに変換してスケジューラへ投入
///
/// ソースが尽きるか投入が拒否されるまで続け、投入できた件数を返す。
/// 投入が拒否された場合はソースを閉じて上流を停止させる。
pub fn spawn_producer<T, R, S, F>(
    source: QueueReceiver<S>,
    scheduler: Arc<Scheduler<T, R>>,
    mut make_task: F,
) -> tokio::task::JoinHandle<usize>
where
    T: Task,
    R: ProgressReporter + 'static,
    S: Send + 'static,
    F: FnMut(S) -> T + Send + 'static,
{
    tokio::spawn(async move {
        let mut submitted = 0usize;

        while let Some(record) = source.recv().await {
            if let Err(error) = scheduler.submit(make_task(record)).await {
                warn!(%error, submitted, "submission rejected, stopping producer");
                source.close();
                break;
            }
            submitted += 1;
        }

        debug!(submitted, "producer finished");
        submitted
    })
}
