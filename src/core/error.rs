// Custom error types for the scheduler lifecycle
// スケジューラとシンク専用のエラー型定義

use super::types::SchedulerState;
use thiserror::Error;

/// スケジューラ固有のエラー型
///
/// 同じ終了結果を複数の待機者に返せるよう `Clone` を実装する。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("状態エラー: {operation} は {state} 状態では実行できません")]
    InvalidState {
        operation: &'static str,
        state: SchedulerState,
    },

    #[error("投入エラー: 入力キューは既に閉じられています")]
    Closed,

    #[error("キャンセル: パイプラインは中断されました")]
    Cancelled,

    #[error("シンクオープンエラー: {path} - {reason}")]
    SinkOpen { path: String, reason: String },

    #[error("シンク書き込みエラー: {path} - {reason}")]
    SinkWrite { path: String, reason: String },

    #[error("設定エラー: {message}")]
    Configuration { message: String },

    #[error("ステージ異常終了: {stage}")]
    StagePanicked { stage: String },
}

impl SchedulerError {
    /// 状態エラーの作成
    pub fn invalid_state(operation: &'static str, state: SchedulerState) -> Self {
        Self::InvalidState { operation, state }
    }

    /// シンクオープンエラーの作成
    pub fn sink_open(path: impl Into<String>, source: &std::io::Error) -> Self {
        Self::SinkOpen {
            path: path.into(),
            reason: source.to_string(),
        }
    }

    /// シンク書き込みエラーの作成
    pub fn sink_write(path: impl Into<String>, source: &std::io::Error) -> Self {
        Self::SinkWrite {
            path: path.into(),
            reason: source.to_string(),
        }
    }

    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// ステージ異常終了エラーの作成
    pub fn stage_panicked(stage: impl Into<String>) -> Self {
        Self::StagePanicked {
            stage: stage.into(),
        }
    }
}

/// スケジューラの結果型
pub type SchedulerResult<T> = std::result::Result<T, SchedulerError>;
