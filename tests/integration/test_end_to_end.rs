// エンドツーエンドの統合テスト
use crate::fixtures::{read_lines, CountingTask, IdentityTask, RawBytesTask};
use jobpipe::{
    LineTask, NoOpProgressReporter, Scheduler, SchedulerConfig, SchedulerError, SchedulerState,
    Task,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::time::{timeout, Duration};

fn quiet_scheduler<T: Task>(
    output: &std::path::Path,
    num_workers: usize,
) -> Scheduler<T, NoOpProgressReporter> {
    let config = SchedulerConfig::new(output).with_num_workers(num_workers);
    Scheduler::with_reporter(config, NoOpProgressReporter::new())
}

#[tokio::test]
async fn test_single_worker_writes_lines_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.txt");
    let scheduler = quiet_scheduler::<IdentityTask>(&output, 1);

    scheduler.start().unwrap();
    for line in ["a", "b", "c"] {
        scheduler.submit(IdentityTask::new(line)).await.unwrap();
    }
    scheduler.close().unwrap();
    let summary = scheduler.wait().await.unwrap();

    assert_eq!(read_lines(&output), vec!["a", "b", "c"]);
    assert_eq!(summary.written, 3);
    assert_eq!(scheduler.state(), SchedulerState::Terminated);
}

#[tokio::test]
async fn test_every_task_executes_exactly_once() {
    for num_workers in [1, 4, 8] {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.txt");
        let scheduler = quiet_scheduler::<CountingTask>(&output, num_workers);
        let executions = Arc::new(AtomicUsize::new(0));

        const N: usize = 200;
        scheduler.start().unwrap();
        for id in 0..N {
            scheduler
                .submit(CountingTask::new(id, Arc::clone(&executions)))
                .await
                .unwrap();
        }
        let summary = timeout(Duration::from_secs(10), scheduler.wait())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(executions.load(Ordering::SeqCst), N);
        assert_eq!(summary.executed, N);
        assert_eq!(summary.written, N);

        let lines = read_lines(&output);
        assert_eq!(lines.len(), N);
        let ids: HashSet<usize> = lines
            .iter()
            .map(|line| {
                let (id, count) = line.split_once(':').unwrap();
                // 各タスクインスタンスは1回だけ実行される
                assert_eq!(count, "1");
                id.parse().unwrap()
            })
            .collect();
        assert_eq!(ids, (0..N).collect::<HashSet<_>>());
    }
}

#[tokio::test]
async fn test_concurrent_submitters_share_scheduler() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.txt");
    let scheduler = Arc::new(quiet_scheduler::<IdentityTask>(&output, 3));
    scheduler.start().unwrap();

    let mut submitters = Vec::new();
    for submitter in 0..4 {
        let scheduler = Arc::clone(&scheduler);
        submitters.push(tokio::spawn(async move {
            for i in 0..25 {
                scheduler
                    .submit(IdentityTask::new(format!("{submitter}-{i}")))
                    .await
                    .unwrap();
            }
        }));
    }
    for submitter in submitters {
        submitter.await.unwrap();
    }

    let summary = scheduler.wait().await.unwrap();
    assert_eq!(summary.submitted, 100);
    assert_eq!(read_lines(&output).len(), 100);
}

#[tokio::test]
async fn test_close_reaches_terminated_in_bounded_time() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.txt");
    let scheduler = quiet_scheduler::<IdentityTask>(&output, 4);
    let mut states = scheduler.subscribe();

    scheduler.start().unwrap();
    for i in 0..4 {
        scheduler
            .submit(IdentityTask::new(format!("queued{i}")))
            .await
            .unwrap();
    }
    scheduler.close().unwrap();

    timeout(
        Duration::from_secs(5),
        states.wait_for(|state| *state == SchedulerState::Terminated),
    )
    .await
    .unwrap()
    .unwrap();

    // キュー済みのタスクは締め切り後も全て書き出される
    assert_eq!(read_lines(&output).len(), 4);
    assert_eq!(
        scheduler.submit(IdentityTask::new("late")).await,
        Err(SchedulerError::Closed)
    );
}

#[tokio::test]
async fn test_line_tasks_write_json_records() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("records.jsonl");
    let scheduler = quiet_scheduler::<LineTask>(&output, 2);

    scheduler.start().unwrap();
    for line in ["one", "two"] {
        scheduler
            .submit(LineTask::new(line).with_command("echo \"$1$1\""))
            .await
            .unwrap();
    }
    scheduler.wait().await.unwrap();

    let mut outputs: Vec<String> = read_lines(&output)
        .iter()
        .map(|line| {
            let json: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(json["exit_code"], 0);
            json["output"].as_str().unwrap().to_string()
        })
        .collect();
    outputs.sort();
    assert_eq!(outputs, vec!["oneone", "twotwo"]);
}

#[tokio::test]
async fn test_record_bytes_reach_sink_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("raw.bin");
    let scheduler = quiet_scheduler::<RawBytesTask>(&output, 1);

    scheduler.start().unwrap();
    scheduler
        .submit(RawBytesTask(vec![b'a', 0xFF, b'b']))
        .await
        .unwrap();
    scheduler.wait().await.unwrap();

    assert_eq!(std::fs::read(&output).unwrap(), vec![b'a', 0xFF, b'b', b'\n']);
}
