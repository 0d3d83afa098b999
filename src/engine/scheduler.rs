// Scheduler - 入力キューを所有し、パイプラインのライフサイクルを管理する
//
// Created → Running → Draining → Terminated
// 出力先の障害やキャンセル時は Running から直接 Terminated へ遷移する

use super::pipeline::{spawn_pipeline, PipelineHandles};
use crate::{
    core::{
        bounded, PipelineStats, ProgressReporter, QueueReceiver, QueueSender, RunSummary,
        SchedulerError, SchedulerResult, SchedulerState, Task,
    },
    services::{SchedulerConfig, TracingProgressReporter},
};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// スーパーバイザーと共有する状態
struct Shared {
    state: watch::Sender<SchedulerState>,
    outcome: Mutex<Option<SchedulerResult<RunSummary>>>,
}

impl Shared {
    fn set_outcome(&self, outcome: SchedulerResult<RunSummary>) {
        *self.outcome.lock().unwrap_or_else(PoisonError::into_inner) = Some(outcome);
    }

    fn outcome(&self) -> Option<SchedulerResult<RunSummary>> {
        self.outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `from` 状態の場合のみ `to` へ遷移する
    fn transition(&self, from: SchedulerState, to: SchedulerState) -> bool {
        self.state.send_if_modified(|state| {
            if *state == from {
                *state = to;
                true
            } else {
                false
            }
        })
    }
}

/// タスクスケジューラ
///
/// 入力キューの容量はワーカー数と同じで、投入側はワーカーの処理を待つ
/// （バックプレッシャー）。全メソッドは `&self` で呼べるため、`Arc` で包んで
/// 複数の投入タスクから共有できる。
pub struct Scheduler<T, R = TracingProgressReporter>
where
    T: Task,
{
    config: SchedulerConfig,
    input_tx: QueueSender<T>,
    input_rx: QueueReceiver<T>,
    cancel: CancellationToken,
    stats: Arc<PipelineStats>,
    reporter: Arc<R>,
    shared: Arc<Shared>,
}

impl<T> Scheduler<T>
where
    T: Task,
{
    /// tracingログで進捗を報告するスケジューラを作成
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_reporter(config, TracingProgressReporter::default())
    }
}

impl<T, R> Scheduler<T, R>
where
    T: Task,
    R: ProgressReporter + 'static,
{
    /// 進捗報告の実装を指定してスケジューラを作成
    pub fn with_reporter(config: SchedulerConfig, reporter: R) -> Self {
        let (input_tx, input_rx) = bounded(config.num_workers());
        let (state, _) = watch::channel(SchedulerState::Created);

        Self {
            config,
            input_tx,
            input_rx,
            cancel: CancellationToken::new(),
            stats: Arc::new(PipelineStats::new()),
            reporter: Arc::new(reporter),
            shared: Arc::new(Shared {
                state,
                outcome: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// 現在の状態
    pub fn state(&self) -> SchedulerState {
        *self.shared.state.borrow()
    }

    /// 状態遷移の購読
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.shared.state.subscribe()
    }

    /// ワーカー・マージ・ライターを起動して Running へ遷移する
    ///
    /// tokioランタイム上で呼び出す必要がある。
    pub fn start(&self) -> SchedulerResult<()> {
        self.config.validate()?;

        if !self
            .shared
            .transition(SchedulerState::Created, SchedulerState::Running)
        {
            return Err(SchedulerError::invalid_state("start", self.state()));
        }

        let handles = spawn_pipeline(
            self.input_rx.clone(),
            &self.config,
            self.cancel.clone(),
            Arc::clone(&self.stats),
            Arc::clone(&self.reporter),
        );

        tokio::spawn(supervise(
            handles,
            self.input_rx.clone(),
            self.config.num_workers(),
            Arc::clone(&self.shared),
            Arc::clone(&self.stats),
            Arc::clone(&self.reporter),
            self.cancel.clone(),
        ));

        debug!(num_workers = self.config.num_workers(), "scheduler running");
        Ok(())
    }

    /// タスクを投入する。入力キューが満杯なら空きが出るまで待機する
    ///
    /// Created 状態ではキュー容量分までバッファされる。
    /// 投入締め切り後は [`SchedulerError::Closed`]、キャンセル後は
    /// [`SchedulerError::Cancelled`] を返す。
    pub async fn submit(&self, task: T) -> SchedulerResult<()> {
        if self.cancel.is_cancelled() {
            return Err(SchedulerError::Cancelled);
        }
        if matches!(
            self.state(),
            SchedulerState::Draining | SchedulerState::Terminated
        ) {
            return Err(SchedulerError::Closed);
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(SchedulerError::Cancelled),
            sent = self.input_tx.send(task) => {
                sent.map_err(|_| SchedulerError::Closed)?;
                self.stats.record_submitted();
                Ok(())
            }
        }
    }

    /// [`Scheduler::submit`] の別名
    pub async fn add(&self, task: T) -> SchedulerResult<()> {
        self.submit(task).await
    }

    /// 投入を締め切り Draining へ遷移する
    ///
    /// キュー済みのタスクは全て処理される。既に締め切り済みなら何もしない。
    pub fn close(&self) -> SchedulerResult<()> {
        match self.state() {
            SchedulerState::Created => Err(SchedulerError::invalid_state(
                "close",
                SchedulerState::Created,
            )),
            SchedulerState::Running => {
                self.shared
                    .transition(SchedulerState::Running, SchedulerState::Draining);
                self.input_rx.close();
                debug!("scheduler draining");
                Ok(())
            }
            SchedulerState::Draining | SchedulerState::Terminated => Ok(()),
        }
    }

    /// パイプライン全体を中断する
    ///
    /// 実行中のタスクは完了まで走るが、キュー済みのタスクは実行されない。
    pub fn cancel(&self) {
        self.cancel.cancel();
        self.input_rx.close();

        if self
            .shared
            .transition(SchedulerState::Created, SchedulerState::Terminated)
        {
            // 未起動のまま中断された場合はスーパーバイザーがいない
            self.shared.set_outcome(Err(SchedulerError::Cancelled));
        } else {
            self.shared
                .transition(SchedulerState::Running, SchedulerState::Draining);
        }
    }

    /// Terminated まで待機し、実行結果を返す
    ///
    /// Running 中に呼ばれた場合は先に投入を締め切る。
    pub async fn wait(&self) -> SchedulerResult<RunSummary> {
        match self.state() {
            SchedulerState::Created => {
                return Err(SchedulerError::invalid_state("wait", SchedulerState::Created))
            }
            SchedulerState::Running => self.close()?,
            SchedulerState::Draining | SchedulerState::Terminated => {}
        }

        let mut state_rx = self.subscribe();
        state_rx
            .wait_for(|state| *state == SchedulerState::Terminated)
            .await
            .map_err(|_| SchedulerError::stage_panicked("supervisor"))?;

        self.shared
            .outcome()
            .unwrap_or_else(|| Err(SchedulerError::stage_panicked("supervisor")))
    }
}

/// Supervisor: 全ステージの終了を待ち、結果を確定して Terminated へ遷移する
///
/// 終了時には入力キューを閉じ、投入待ちの呼び出し元を必ず解放する。
async fn supervise<T, R>(
    handles: PipelineHandles,
    input: QueueReceiver<T>,
    num_workers: usize,
    shared: Arc<Shared>,
    stats: Arc<PipelineStats>,
    reporter: Arc<R>,
    cancel: CancellationToken,
) where
    R: ProgressReporter + ?Sized + 'static,
{
    let started_at = Instant::now();
    reporter.report_started(num_workers).await;

    let writer_result = match handles.writer.await {
        Ok(result) => result,
        Err(join_error) => {
            error!(error = %join_error, "writer terminated abnormally");
            cancel.cancel();
            Err(SchedulerError::stage_panicked("writer"))
        }
    };

    let mut panicked_worker = None;
    for (worker_id, worker) in handles.workers.into_iter().enumerate() {
        if let Err(join_error) = worker.await {
            error!(worker_id, error = %join_error, "worker terminated abnormally");
            panicked_worker.get_or_insert(worker_id);
        }
    }

    // 処理するワーカーがもういないため、以降の投入は受け付けない
    input.close();

    let summary = stats.snapshot(started_at.elapsed().as_millis() as u64);
    reporter.report_completed(&summary).await;

    let outcome = match (writer_result, panicked_worker) {
        (Err(error), _) => Err(error),
        (Ok(_), Some(worker_id)) => Err(SchedulerError::stage_panicked(format!(
            "worker-{worker_id}"
        ))),
        (Ok(_), None) if cancel.is_cancelled() => Err(SchedulerError::Cancelled),
        (Ok(_), None) => Ok(summary),
    };
    if panicked_worker.is_some() {
        cancel.cancel();
    }

    shared.set_outcome(outcome);
    shared.state.send_replace(SchedulerState::Terminated);
}
