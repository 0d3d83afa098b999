// 進捗監視機能
// 起動、書き込み進捗、タスクエラー、完了の通知

pub mod implementations;

pub use implementations::{NoOpProgressReporter, TracingProgressReporter};
