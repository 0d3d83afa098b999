// パイプラインのトレイト定義
// タスク契約と進捗報告の抽象化インターフェース

use super::types::RunSummary;
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

/// スケジューラに投入できる作業単位
///
/// 1つのタスクは1つのワーカーだけが所有し、`execute` は高々1回しか呼ばれない。
#[automock]
#[async_trait]
pub trait Task: Send + 'static {
    /// 作業を実行する
    ///
    /// 失敗はタスク自身の状態として記録し、呼び出し元へは伝播させない。
    async fn execute(&mut self);

    /// 最終状態を1レコードに変換する
    fn serialize(&self) -> Result<Vec<u8>>;
}

// Task for Box<dyn Task>
#[async_trait]
impl Task for Box<dyn Task> {
    async fn execute(&mut self) {
        self.as_mut().execute().await
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        self.as_ref().serialize()
    }
}

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// パイプライン起動時の報告
    async fn report_started(&self, num_workers: usize);

    /// 書き込み件数の報告
    async fn report_progress(&self, written: usize);

    /// タスク単位のエラー報告
    async fn report_error(&self, worker_id: usize, error: &str);

    /// 全ステージ終了時の報告
    async fn report_completed(&self, summary: &RunSummary);
}

// ProgressReporter for Box<dyn ProgressReporter>
#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, num_workers: usize) {
        self.as_ref().report_started(num_workers).await
    }

    async fn report_progress(&self, written: usize) {
        self.as_ref().report_progress(written).await
    }

    async fn report_error(&self, worker_id: usize, error: &str) {
        self.as_ref().report_error(worker_id, error).await
    }

    async fn report_completed(&self, summary: &RunSummary) {
        self.as_ref().report_completed(summary).await
    }
}
