// テストユーティリティとタスク実装
// 統合テスト用のタスクとヘルパー

pub mod tasks;

// 公開API
pub use tasks::*;
