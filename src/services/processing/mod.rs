// タスク処理機能
// 単一タスクの実行、シリアライズ、失敗時のマーカー生成

pub mod worker;

// 公開API
pub use worker::process_task;
