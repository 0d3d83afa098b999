// Writer - マージ済みの行を出力先へ逐次書き込む

use super::sink::{open_sink, SinkWriter};
use crate::core::{
    PipelineStats, ProgressReporter, QueueReceiver, SchedulerError, SchedulerResult, SinkTarget,
};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Writer: 出力先への唯一の書き込み手
///
/// 受信したレコードのバイト列を順に改行付きで書き込み、書き込んだ行数を返す。
/// 出力先を開けない・書き込めない場合はパイプライン全体をキャンセルし、
/// どのステージも送信待ちで止まらないようにしてからエラーを返す。
pub fn spawn_writer<R>(
    lines: QueueReceiver<Vec<u8>>,
    target: SinkTarget,
    cancel: CancellationToken,
    stats: Arc<PipelineStats>,
    reporter: Arc<R>,
) -> tokio::task::JoinHandle<SchedulerResult<usize>>
where
    R: ProgressReporter + ?Sized + 'static,
{
    tokio::spawn(async move {
        let path = target.display_path();

        let mut sink = match open_sink(&target).await {
            Ok(sink) => sink,
            Err(err) => {
                error!(path = %path, error = %err, "error occurred while opening sink");
                lines.close();
                cancel.cancel();
                return Err(SchedulerError::sink_open(path, &err));
            }
        };

        let mut written = 0usize;
        loop {
            let line = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(path = %path, written, "writer cancelled");
                    break;
                }
                next = lines.recv() => match next {
                    Some(line) => line,
                    None => break,
                },
            };

            if let Err(err) = write_line(&mut sink, &line).await {
                error!(path = %path, error = %err, "error occurred while writing sink");
                lines.close();
                cancel.cancel();
                return Err(SchedulerError::sink_write(path, &err));
            }

            written += 1;
            let total = stats.record_written();
            reporter.report_progress(total).await;
        }

        if let Err(err) = sink.flush().await {
            error!(path = %path, error = %err, "error occurred while flushing sink");
            return Err(SchedulerError::sink_write(path, &err));
        }

        debug!(path = %path, written, "writer finished");
        Ok(written)
    })
}

async fn write_line(sink: &mut SinkWriter, line: &[u8]) -> std::io::Result<()> {
    sink.write_all(line).await?;
    sink.write_all(b"\n").await
}
