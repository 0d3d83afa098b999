use anyhow::anyhow;
use async_trait::async_trait;
use jobpipe::Task;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// 行をそのまま出力するタスク
pub struct IdentityTask {
    line: String,
    executed: bool,
}

impl IdentityTask {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            executed: false,
        }
    }
}

#[async_trait]
impl Task for IdentityTask {
    async fn execute(&mut self) {
        self.executed = true;
    }

    fn serialize(&self) -> anyhow::Result<Vec<u8>> {
        anyhow::ensure!(self.executed, "serialize called before execute");
        Ok(self.line.clone().into_bytes())
    }
}

/// 任意のバイト列をそのままレコードにするタスク
pub struct RawBytesTask(pub Vec<u8>);

#[async_trait]
impl Task for RawBytesTask {
    async fn execute(&mut self) {}

    fn serialize(&self) -> anyhow::Result<Vec<u8>> {
        Ok(self.0.clone())
    }
}

/// シリアライズが必ず失敗するタスク
pub struct FailingSerializeTask;

#[async_trait]
impl Task for FailingSerializeTask {
    async fn execute(&mut self) {}

    fn serialize(&self) -> anyhow::Result<Vec<u8>> {
        Err(anyhow!("record cannot be encoded"))
    }
}

/// 実行回数を共有カウンタに記録するタスク
pub struct CountingTask {
    id: usize,
    executions: Arc<AtomicUsize>,
    own_executions: usize,
}

impl CountingTask {
    pub fn new(id: usize, executions: Arc<AtomicUsize>) -> Self {
        Self {
            id,
            executions,
            own_executions: 0,
        }
    }
}

#[async_trait]
impl Task for CountingTask {
    async fn execute(&mut self) {
        self.own_executions += 1;
        self.executions.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
    }

    fn serialize(&self) -> anyhow::Result<Vec<u8>> {
        Ok(format!("{}:{}", self.id, self.own_executions).into_bytes())
    }
}

/// 内容を書き込んだ入力ファイルを作成
#[allow(dead_code)]
pub fn write_input(temp_dir: &TempDir, lines: &[&str]) -> PathBuf {
    let path = temp_dir.path().join("input.txt");
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(&path, content).unwrap();
    path
}

/// 出力ファイルの行一覧
pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
