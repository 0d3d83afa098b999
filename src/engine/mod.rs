// エンジン層 - ワーカープールとスケジューラのオーケストレーション
// サービス層とコンビネータを組み合わせてパイプライン全体を構成する

pub mod consumer;
mod pipeline;
pub mod producer;
pub mod scheduler;

// 公開API
pub use producer::spawn_producer;
pub use scheduler::Scheduler;
