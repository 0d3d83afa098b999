// スケジューラに関連するデータ型定義

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

/// スケジューラのライフサイクル状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// 入力キューのみ確保済み、ステージは未起動
    Created,
    /// ワーカー・マージ・ライターが稼働中
    Running,
    /// 投入締め切り済み、残りのタスクを処理中
    Draining,
    /// 全ステージ終了
    Terminated,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "Created",
            Self::Running => "Running",
            Self::Draining => "Draining",
            Self::Terminated => "Terminated",
        };
        f.write_str(name)
    }
}

/// 出力先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    /// プロセスの標準出力（パス `-`）
    Stdout,
    /// 追記モードで開くファイル
    File(PathBuf),
}

impl SinkTarget {
    /// ログ・エラー表示用のパス表現
    pub fn display_path(&self) -> String {
        match self {
            Self::Stdout => "-".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

impl From<&str> for SinkTarget {
    fn from(value: &str) -> Self {
        if value == "-" {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

impl From<PathBuf> for SinkTarget {
    fn from(path: PathBuf) -> Self {
        if path.as_os_str() == "-" {
            Self::Stdout
        } else {
            Self::File(path)
        }
    }
}

impl From<&Path> for SinkTarget {
    fn from(path: &Path) -> Self {
        Self::from(path.to_path_buf())
    }
}

impl FromStr for SinkTarget {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// 実行全体のサマリー
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub submitted: usize,
    pub executed: usize,
    pub written: usize,
    pub serialize_errors: usize,
    pub elapsed_ms: u64,
}

/// ステージ間で共有するカウンター
#[derive(Debug, Default)]
pub struct PipelineStats {
    submitted: AtomicUsize,
    executed: AtomicUsize,
    written: AtomicUsize,
    serialize_errors: AtomicUsize,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_executed(&self) {
        self.executed.fetch_add(1, Ordering::Relaxed);
    }

    /// 書き込み件数を加算し、加算後の値を返す
    pub fn record_written(&self) -> usize {
        self.written.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_serialize_error(&self) {
        self.serialize_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, elapsed_ms: u64) -> RunSummary {
        RunSummary {
            submitted: self.submitted.load(Ordering::Relaxed),
            executed: self.executed.load(Ordering::Relaxed),
            written: self.written.load(Ordering::Relaxed),
            serialize_errors: self.serialize_errors.load(Ordering::Relaxed),
            elapsed_ms,
        }
    }
}
