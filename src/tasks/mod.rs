// 組み込みタスク
// CLIから利用する行単位のタスク実装

pub mod line;

pub use line::LineTask;
