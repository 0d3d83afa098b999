// Fan - 複数キューの合流（fan-in）と分配（fan-out）

use super::STAGE_CAPACITY;
use crate::core::{bounded, QueueReceiver};

/// 全入力キューの要素を1つのキューへ合流させる
pub fn merge<T>(inputs: Vec<QueueReceiver<T>>) -> QueueReceiver<T>
where
    T: Send + 'static,
{
    merge_with_capacity(inputs, STAGE_CAPACITY)
}

/// 出力キューの容量を指定して合流させる
///
/// 入力ごとにリーダーを1つ起動する。各リーダーが送信ハンドルを1つずつ持ち、
/// 最後のリーダーが終了してハンドルが全て破棄された時点で出力が閉じる。
pub fn merge_with_capacity<T>(inputs: Vec<QueueReceiver<T>>, capacity: usize) -> QueueReceiver<T>
where
    T: Send + 'static,
{
    let (tx, rx) = bounded(capacity);

    for input in inputs {
        let tx = tx.clone();
        tokio::spawn(async move {
            while let Some(item) = input.recv().await {
                if tx.send(item).await.is_err() {
                    input.close();
                    break;
                }
            }
        });
    }

    rx
}

/// 入力キューの要素を `n` 個の出力キューへ重複なく分配する
///
/// 各出力にフォワーダーが1つずつ付き、先に受信できたフォワーダーが要素を受け取る。
/// 入力が尽きると全出力が閉じる。
pub fn split<T>(input: QueueReceiver<T>, n: usize) -> Vec<QueueReceiver<T>>
where
    T: Send + 'static,
{
    if n == 0 {
        input.close();
        return Vec::new();
    }

    let mut outputs = Vec::with_capacity(n);
    for _ in 0..n {
        let (tx, rx) = bounded(STAGE_CAPACITY);
        let input = input.clone();
        tokio::spawn(async move {
            while let Some(item) = input.recv().await {
                // 1つの出力が閉じても他の出力への分配は続ける
                if tx.send(item).await.is_err() {
                    break;
                }
            }
        });
        outputs.push(rx);
    }

    outputs
}
