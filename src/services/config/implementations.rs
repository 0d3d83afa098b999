// 設定管理の具象実装

use crate::core::{SchedulerError, SchedulerResult, SinkTarget};

/// スケジューラの設定
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    num_workers: usize,
    buffer_size: usize,
    output: SinkTarget,
}

impl SchedulerConfig {
    pub fn new(output: impl Into<SinkTarget>) -> Self {
        Self {
            output: output.into(),
            ..Self::default()
        }
    }

    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_output(mut self, output: impl Into<SinkTarget>) -> Self {
        self.output = output.into();
        self
    }

    /// ワーカー数。入力キューの容量もこの値になる
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// ワーカー出力とマージ後キューの容量
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    pub fn output(&self) -> &SinkTarget {
        &self.output
    }

    /// 設定値の検証
    pub fn validate(&self) -> SchedulerResult<()> {
        if self.num_workers == 0 {
            return Err(SchedulerError::configuration(
                "ワーカー数は1以上である必要があります",
            ));
        }
        if self.buffer_size == 0 {
            return Err(SchedulerError::configuration(
                "バッファサイズは1以上である必要があります",
            ));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get().max(1),
            buffer_size: 64,
            output: SinkTarget::Stdout,
        }
    }
}
