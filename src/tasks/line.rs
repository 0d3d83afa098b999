// LineTask - 入力1行を処理するタスク
// コマンド未指定なら行をそのまま記録し、指定時は `sh -c` で実行して結果を記録する

use crate::core::Task;
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;

/// 行単位のタスク。結果は1つのJSONオブジェクトとして出力される
#[derive(Debug, Clone, Serialize)]
pub struct LineTask {
    line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    started_at: i64,
    finished_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip)]
    command: Option<Arc<str>>,
    #[serde(skip)]
    timeout: Option<Duration>,
}

impl LineTask {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            exit_code: None,
            output: None,
            started_at: 0,
            finished_at: 0,
            error: None,
            command: None,
            timeout: None,
        }
    }

    /// 行を `$1` として渡すシェルコマンドを設定
    pub fn with_command(mut self, command: impl Into<Arc<str>>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// コマンドのタイムアウトを設定
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    async fn run_command(&mut self, command: &str) {
        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .arg("jobpipe")
            .arg(&self.line)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child).await {
                Ok(result) => result,
                Err(_) => {
                    self.error = Some(format!("timed out after {}ms", limit.as_millis()));
                    return;
                }
            },
            None => child.await,
        };

        match result {
            Ok(output) => {
                self.exit_code = output.status.code();
                self.output = Some(String::from_utf8_lossy(&output.stdout).trim().to_string());
                if !output.status.success() {
                    self.error = Some(format!("command exited with {}", output.status));
                }
            }
            Err(error) => {
                self.error = Some(format!("failed to spawn command: {error}"));
            }
        }
    }
}

#[async_trait]
impl Task for LineTask {
    async fn execute(&mut self) {
        self.started_at = Utc::now().timestamp_millis();
        if let Some(command) = self.command.clone() {
            self.run_command(&command).await;
        }
        self.finished_at = Utc::now().timestamp_millis();
    }

    fn serialize(&self) -> anyhow::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
