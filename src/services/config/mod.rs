// 設定管理機能

pub mod implementations;

pub use implementations::SchedulerConfig;
