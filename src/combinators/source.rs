// Source - ファイルを行単位で配信する

use super::STAGE_CAPACITY;
use crate::core::{bounded, QueueReceiver};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error};

/// ファイルの各行（前後の空白を除去）を順に流すキューを返す
///
/// オープン・読み込みエラーはログに出してその時点でキューを閉じる。
/// 下流がキューを閉じた場合も読み込みを打ち切る。
pub fn line_source(path: impl AsRef<Path>) -> QueueReceiver<String> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let (tx, rx) = bounded(STAGE_CAPACITY);

    tokio::spawn(async move {
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(err) => {
                error!(path = %path.display(), error = %err, "failed to open line source");
                return;
            }
        };

        let mut lines = BufReader::new(file).lines();
        let mut count = 0usize;
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line.trim().to_string()).await.is_err() {
                        debug!(path = %path.display(), count, "line source stopped by downstream");
                        return;
                    }
                    count += 1;
                }
                Ok(None) => break,
                Err(err) => {
                    error!(path = %path.display(), error = %err, "failed to read line source");
                    return;
                }
            }
        }
        debug!(path = %path.display(), count, "line source exhausted");
    });

    rx
}
