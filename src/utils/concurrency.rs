// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::any::Any;
use std::future::Future;
use std::panic;

use tokio::task::JoinSet;
use tracing::debug;

enum Trigger<E> {
    Failed(E),
    Panicked(Box<dyn Any + Send + 'static>),
}

/// 在同一个任务组中并发运行一组互相独立的异步操作
///
/// 所有操作全部成功时返回 `Ok(())`。任一操作失败时，组内其余仍在运行的
/// 操作会被取消，等待全部操作结束后返回第一个失败的错误。
/// 成员 panic 时同样取消其余成员，并在全部结束后继续传播该 panic。
///
/// 取消范围仅限于本次调用创建的任务组。
pub async fn gather<I, F, E>(operations: I) -> Result<(), E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Send + 'static,
{
    let mut group = JoinSet::new();
    for operation in operations {
        group.spawn(operation);
    }

    let mut trigger: Option<Trigger<E>> = None;
    while let Some(joined) = group.join_next().await {
        let outcome = match joined {
            Ok(Ok(())) => continue,
            Ok(Err(err)) => Trigger::Failed(err),
            Err(join_err) if join_err.is_cancelled() => continue,
            Err(join_err) => Trigger::Panicked(join_err.into_panic()),
        };

        if trigger.is_none() {
            debug!(
                in_flight = group.len(),
                "Operation failed, cancelling remaining operations"
            );
            group.abort_all();
            trigger = Some(outcome);
        }
    }

    match trigger {
        None => Ok(()),
        Some(Trigger::Failed(err)) => Err(err),
        Some(Trigger::Panicked(payload)) => panic::resume_unwind(payload),
    }
}
