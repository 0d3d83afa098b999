// Transform - filter / map / reduce

use super::STAGE_CAPACITY;
use crate::core::{bounded, QueueReceiver};

/// 述語を満たす要素だけを到着順に流す
pub fn filter<T, F>(input: QueueReceiver<T>, mut predicate: F) -> QueueReceiver<T>
where
    T: Send + 'static,
    F: FnMut(&T) -> bool + Send + 'static,
{
    let (tx, rx) = bounded(STAGE_CAPACITY);

    tokio::spawn(async move {
        while let Some(item) = input.recv().await {
            let downstream_closed = if predicate(&item) {
                tx.send(item).await.is_err()
            } else {
                tx.is_closed()
            };
            if downstream_closed {
                input.close();
                break;
            }
        }
    });

    rx
}

/// 全要素に関数を適用して到着順に流す
pub fn map<T, U, F>(input: QueueReceiver<T>, mut f: F) -> QueueReceiver<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> U + Send + 'static,
{
    let (tx, rx) = bounded(STAGE_CAPACITY);

    tokio::spawn(async move {
        while let Some(item) = input.recv().await {
            if tx.send(f(item)).await.is_err() {
                input.close();
                break;
            }
        }
    });

    rx
}

/// 入力を最後まで畳み込む終端オペレータ
///
/// 初期値は結果型の `Default`。空の入力ではそのまま初期値を返す。
pub async fn reduce<T, U, F>(input: QueueReceiver<T>, mut combine: F) -> U
where
    U: Default,
    F: FnMut(U, T) -> U,
{
    let mut acc = U::default();
    while let Some(item) = input.recv().await {
        acc = combine(acc, item);
    }
    acc
}
