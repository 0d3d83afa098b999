// Queue - 有界の並行キュー
// tokio::mpsc を土台に、複数コンシューマでの受信と受信側からのクローズを提供する

use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// 有界キューを作成
///
/// 送信側・受信側ともに Clone 可能。全ての送信ハンドルがドロップされるか
/// 受信側で [`QueueReceiver::close`] が呼ばれると、それ以降の送信は失敗する。
/// バッファ済みの要素は受信側で最後まで取り出せる。
pub fn bounded<T>(capacity: usize) -> (QueueSender<T>, QueueReceiver<T>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let closed = CancellationToken::new();

    (
        QueueSender {
            inner: tx,
            closed: closed.clone(),
        },
        QueueReceiver {
            inner: Arc::new(Mutex::new(rx)),
            closed,
        },
    )
}

/// 送信に失敗した要素をそのまま返すエラー
pub struct QueueClosed<T>(pub T);

impl<T> QueueClosed<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for QueueClosed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("QueueClosed(..)")
    }
}

impl<T> fmt::Display for QueueClosed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("キューは閉じられています")
    }
}

impl<T> std::error::Error for QueueClosed<T> {}

/// 送信ハンドル
pub struct QueueSender<T> {
    inner: mpsc::Sender<T>,
    closed: CancellationToken,
}

impl<T> Clone for QueueSender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            closed: self.closed.clone(),
        }
    }
}

impl<T> QueueSender<T> {
    /// 要素を送信（満杯なら空きが出るまで待機）
    pub async fn send(&self, item: T) -> Result<(), QueueClosed<T>> {
        if self.closed.is_cancelled() {
            return Err(QueueClosed(item));
        }

        tokio::select! {
            biased;
            _ = self.closed.cancelled() => Err(QueueClosed(item)),
            permit = self.inner.reserve() => match permit {
                Ok(permit) => {
                    permit.send(item);
                    Ok(())
                }
                Err(_) => Err(QueueClosed(item)),
            },
        }
    }

    /// 受信側が閉じられたかどうか
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled() || self.inner.is_closed()
    }
}

/// 受信ハンドル
///
/// 複数のワーカーで共有できるよう、レシーバーは非同期Mutexで保護する。
/// 1つの要素は必ず1つのコンシューマにだけ渡る。
pub struct QueueReceiver<T> {
    inner: Arc<Mutex<mpsc::Receiver<T>>>,
    closed: CancellationToken,
}

impl<T> Clone for QueueReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            closed: self.closed.clone(),
        }
    }
}

impl<T> QueueReceiver<T> {
    /// 次の要素を受信。キューが閉じられ空になったら `None`
    pub async fn recv(&self) -> Option<T> {
        let mut rx = self.inner.lock().await;
        if !self.closed.is_cancelled() {
            let received = tokio::select! {
                biased;
                item = rx.recv() => Some(item),
                _ = self.closed.cancelled() => None,
            };
            if let Some(item) = received {
                return item;
            }
        }

        // クローズ後はバッファ分と予約済みの送信分だけを返す
        rx.close();
        rx.recv().await
    }

    /// キューを閉じる。以降の送信は失敗し、待機中の送信者も起こされる
    pub fn close(&self) {
        self.closed.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}
