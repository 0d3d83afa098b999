// jobpipe - 有界キューとワーカープールによる並行タスク実行エンジン
//
// 投入されたタスクを複数のワーカーで実行し、シリアライズ結果を
// 単一のライターが1行ずつ出力先へ書き出す。

pub mod cli;
pub mod combinators;
pub mod core;
pub mod engine;
pub mod services;
pub mod tasks;
pub mod telemetry;

// 公開API - 主要な型を明示的にエクスポート
pub use crate::core::{
    bounded, ProgressReporter, QueueClosed, QueueReceiver, QueueSender, RunSummary,
    SchedulerError, SchedulerResult, SchedulerState, SinkTarget, Task,
};
pub use crate::engine::{spawn_producer, Scheduler};
pub use crate::services::{NoOpProgressReporter, SchedulerConfig, TracingProgressReporter};
pub use crate::tasks::LineTask;
