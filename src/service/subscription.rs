use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::report::{Outcome, Report};
use crate::biz::Repository;
use crate::error::AppError;

/// 一次订阅：只执行一次 `process`，句柄释放时取消未完成的调用
#[derive(Debug)]
pub struct Subscription {
    id: Uuid,
    token: CancellationToken,
    handle: JoinHandle<Option<Outcome>>,
    _guard: DropGuard,
}

impl Subscription {
    pub fn spawn<R>(repository: Arc<R>) -> Self
    where
        R: Repository + 'static,
    {
        let id = Uuid::new_v4();
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    debug!(subscription_id = %id, "subscription cancelled before completion");
                    None
                }
                result = repository.process() => Some(Outcome::from(result)),
            }
        });
        info!(subscription_id = %id, "subscribed");

        Self {
            id,
            _guard: token.clone().drop_guard(),
            token,
            handle,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn store_in(self, subscriptions: &mut Subscriptions) {
        subscriptions.store(self);
    }

    /// 等待唯一一次结果
    #[instrument(skip(self), fields(subscription_id = %self.id))]
    pub async fn wait(self) -> crate::Result<Report> {
        let Subscription {
            id, handle, _guard, ..
        } = self;

        match handle.await? {
            Some(outcome) => Ok(Report::new(id, outcome)),
            None => Err(AppError::Cancelled(id)),
        }
    }
}

/// 持有全部订阅，drop 时取消所有未完成的订阅
#[derive(Debug, Default)]
pub struct Subscriptions {
    inner: Vec<Subscription>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&mut self, subscription: Subscription) {
        self.inner.push(subscription);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn cancel_all(&self) {
        for subscription in &self.inner {
            subscription.cancel();
        }
    }

    /// 等待并移出全部订阅，顺序与存入顺序一致
    pub async fn drain(&mut self) -> Vec<Result<Report, AppError>> {
        join_all(self.inner.drain(..).map(Subscription::wait)).await
    }
}
