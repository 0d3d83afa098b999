// コアレイヤー - 基盤となるキュー、トレイト、型、エラー定義
// 他のレイヤーから参照される基本的な抽象化を提供

pub mod error;
pub mod queue;
pub mod traits;
pub mod types;

// 公開API
pub use error::{SchedulerError, SchedulerResult};
pub use queue::{bounded, QueueClosed, QueueReceiver, QueueSender};
pub use traits::{ProgressReporter, Task};
pub use types::{PipelineStats, RunSummary, SchedulerState, SinkTarget};
