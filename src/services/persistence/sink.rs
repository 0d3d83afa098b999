// Sink - 出力先のオープン

use crate::core::SinkTarget;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWrite, BufWriter};

/// 出力先のライター
pub type SinkWriter = BufWriter<Box<dyn AsyncWrite + Unpin + Send>>;

/// 出力先を開く
///
/// ファイルは追記モード（存在しなければ作成）、`Stdout` はプロセスの標準出力。
pub async fn open_sink(target: &SinkTarget) -> std::io::Result<SinkWriter> {
    let inner: Box<dyn AsyncWrite + Unpin + Send> = match target {
        SinkTarget::Stdout => Box::new(tokio::io::stdout()),
        SinkTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await?;
            Box::new(file)
        }
    };

    Ok(BufWriter::new(inner))
}
