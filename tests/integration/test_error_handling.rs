// エラーハンドリングの統合テスト
use crate::fixtures::{read_lines, FailingSerializeTask, IdentityTask};
use jobpipe::{
    NoOpProgressReporter, Scheduler, SchedulerConfig, SchedulerError, SchedulerState, Task,
};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::time::{timeout, Duration};

#[tokio::test]
async fn test_serialize_failures_write_marker_lines() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.txt");
    let config = SchedulerConfig::new(output.as_path()).with_num_workers(8);
    let scheduler: Scheduler<FailingSerializeTask, _> =
        Scheduler::with_reporter(config, NoOpProgressReporter::new());

    scheduler.start().unwrap();
    for _ in 0..100 {
        scheduler.submit(FailingSerializeTask).await.unwrap();
    }
    let summary = timeout(Duration::from_secs(10), scheduler.wait())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(scheduler.state(), SchedulerState::Terminated);
    assert_eq!(summary.serialize_errors, 100);
    assert_eq!(summary.written, 100);

    let lines = read_lines(&output);
    assert_eq!(lines.len(), 100);
    assert!(lines.iter().all(String::is_empty));
}

#[tokio::test]
async fn test_mixed_failures_do_not_stop_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.txt");
    let config = SchedulerConfig::new(output.as_path()).with_num_workers(4);
    let scheduler: Scheduler<Box<dyn Task>, _> =
        Scheduler::with_reporter(config, NoOpProgressReporter::new());

    scheduler.start().unwrap();
    for i in 0..20 {
        let task: Box<dyn Task> = if i % 2 == 0 {
            Box::new(IdentityTask::new(format!("ok{i}")))
        } else {
            Box::new(FailingSerializeTask)
        };
        scheduler.submit(task).await.unwrap();
    }
    let summary = scheduler.wait().await.unwrap();

    let lines = read_lines(&output);
    assert_eq!(lines.len(), 20);
    assert_eq!(lines.iter().filter(|line| line.is_empty()).count(), 10);
    assert_eq!(summary.serialize_errors, 10);
}

#[tokio::test]
async fn test_unwritable_sink_terminates_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("no_such_dir").join("out.txt");
    let config = SchedulerConfig::new(output.as_path()).with_num_workers(8);
    let scheduler: Scheduler<IdentityTask, _> =
        Scheduler::with_reporter(config, NoOpProgressReporter::new());

    scheduler.start().unwrap();
    for i in 0..20 {
        // 出力先の障害後は投入が拒否される
        let _ = timeout(
            Duration::from_secs(1),
            scheduler.submit(IdentityTask::new(format!("t{i}"))),
        )
        .await
        .unwrap();
    }

    let result = timeout(Duration::from_secs(5), scheduler.wait())
        .await
        .unwrap();

    assert!(matches!(result, Err(SchedulerError::SinkOpen { .. })));
    assert_eq!(scheduler.state(), SchedulerState::Terminated);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_cancel_stops_running_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.txt");
    let config = SchedulerConfig::new(output.as_path()).with_num_workers(2);
    let scheduler: Arc<Scheduler<IdentityTask, _>> = Arc::new(Scheduler::with_reporter(
        config,
        NoOpProgressReporter::new(),
    ));
    scheduler.start().unwrap();

    let submitter = {
        let scheduler = Arc::clone(&scheduler);
        tokio::spawn(async move {
            let mut accepted = 0usize;
            loop {
                match scheduler
                    .submit(IdentityTask::new(format!("t{accepted}")))
                    .await
                {
                    Ok(()) => accepted += 1,
                    Err(error) => break (accepted, error),
                }
            }
        })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    scheduler.cancel();

    let (accepted, error) = timeout(Duration::from_secs(1), submitter)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(error, SchedulerError::Cancelled);

    let result = timeout(Duration::from_secs(5), scheduler.wait())
        .await
        .unwrap();
    assert_eq!(result, Err(SchedulerError::Cancelled));
    assert_eq!(scheduler.state(), SchedulerState::Terminated);
    let written = std::fs::read_to_string(&output)
        .map(|content| content.lines().count())
        .unwrap_or(0);
    assert!(written <= accepted);
}
