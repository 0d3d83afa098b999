use crate::cli::Cli;
use crate::combinators::{filter, line_source, map, tail_window, take};
use crate::core::{QueueReceiver, RunSummary};
use crate::engine::{spawn_producer, Scheduler};
use crate::services::SchedulerConfig;
use crate::tasks::LineTask;
use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 引数を検証する
pub fn validate_args(args: &Cli) -> Result<()> {
    if args.num_workers == 0 {
        bail!("--num-workers must be at least 1");
    }
    if args.num_shards == 0 {
        bail!("--num-shards must be at least 1");
    }
    if args.shard >= args.num_shards {
        bail!(
            "--shard {} is out of range for {} shards",
            args.shard,
            args.num_shards
        );
    }
    if !args.input.is_file() {
        bail!("input file not found: {}", args.input.display());
    }
    Ok(())
}

/// 入力ファイルから投入対象の行を流すキューを組み立てる
///
/// line_source → 空行除外 → シャード選択 → 先頭N行 → 末尾N行
pub fn build_source(args: &Cli) -> QueueReceiver<String> {
    let mut lines = line_source(&args.input);

    if args.skip_empty {
        lines = filter(lines, |line: &String| !line.is_empty());
    }

    if args.num_shards > 1 {
        let (num_shards, shard) = (args.num_shards, args.shard);
        let mut next_index = 0usize;
        let indexed = map(lines, move |line: String| {
            let index = next_index;
            next_index += 1;
            (index, line)
        });
        let selected = filter(indexed, move |(index, _): &(usize, String)| {
            index % num_shards == shard
        });
        lines = map(selected, |(_, line)| line);
    }

    if let Some(n) = args.head {
        lines = take(lines, n);
    }
    if let Some(n) = args.tail {
        lines = tail_window(lines, n);
    }

    lines
}

/// 入力の各行に LineTask を実行し、結果を出力先へ書き出す
pub async fn execute_run(args: Cli) -> Result<RunSummary> {
    validate_args(&args)?;

    let config = SchedulerConfig::new(args.output.as_path()).with_num_workers(args.num_workers);
    info!(
        input = %args.input.display(),
        output = %config.output().display_path(),
        num_workers = config.num_workers(),
        "starting run"
    );

    let scheduler: Arc<Scheduler<LineTask>> = Arc::new(Scheduler::new(config));
    scheduler.start()?;

    let interrupt = {
        let scheduler = Arc::clone(&scheduler);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, cancelling");
                scheduler.cancel();
            }
        })
    };

    let command: Option<Arc<str>> = args.command.as_deref().map(Arc::from);
    let timeout = args.timeout_secs.map(Duration::from_secs);
    let make_task = move |line: String| {
        let mut task = LineTask::new(line);
        if let Some(command) = &command {
            task = task.with_command(Arc::clone(command));
        }
        if let Some(timeout) = timeout {
            task = task.with_timeout(timeout);
        }
        task
    };
    let producer = spawn_producer(build_source(&args), Arc::clone(&scheduler), make_task);

    let submitted = producer.await?;
    let result = scheduler.wait().await;
    interrupt.abort();

    let summary = result?;
    info!(submitted, written = summary.written, "run finished");
    Ok(summary)
}
