// Window - 先頭N件 / 末尾N件

use super::STAGE_CAPACITY;
use crate::core::{bounded, QueueReceiver};
use std::collections::VecDeque;

/// 先頭 `n` 件だけを流す
///
/// `n` 件目を流した時点で入力キューを閉じ、上流の生産を止める。
pub fn take<T>(input: QueueReceiver<T>, n: usize) -> QueueReceiver<T>
where
    T: Send + 'static,
{
    let (tx, rx) = bounded(STAGE_CAPACITY);

    tokio::spawn(async move {
        let mut forwarded = 0;
        while forwarded < n {
            let Some(item) = input.recv().await else {
                return;
            };
            if tx.send(item).await.is_err() {
                break;
            }
            forwarded += 1;
        }
        input.close();
    });

    rx
}

/// 末尾 `n` 件を保持し、入力が尽きた後に元の順序で流す
pub fn tail_window<T>(input: QueueReceiver<T>, n: usize) -> QueueReceiver<T>
where
    T: Send + 'static,
{
    let (tx, rx) = bounded(STAGE_CAPACITY);

    tokio::spawn(async move {
        let mut window = VecDeque::with_capacity(n.min(STAGE_CAPACITY));
        while let Some(item) = input.recv().await {
            // 下流が閉じられたら窓を埋める意味はない
            if tx.is_closed() {
                input.close();
                return;
            }
            if n == 0 {
                continue;
            }
            if window.len() == n {
                window.pop_front();
            }
            window.push_back(item);
        }

        for item in window {
            if tx.send(item).await.is_err() {
                break;
            }
        }
    });

    rx
}
