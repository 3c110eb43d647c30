use shared::config::DEFAULT_FALLBACK_MESSAGE;
use shared::AppConfig;
use tracing::{debug, info, instrument, warn};

use super::{CoreDataSource, DataSource, LocalDataSource, NetworkDataSource};
use crate::biz::{RandomSelector, Repository, SourceKind, SourceSelector};
use crate::error::{AppError, RepositoryError, SourceError};

/// 默认组合：三个桩数据源 + 随机选择器
pub type DefaultRepository =
    RepositoryImpl<NetworkDataSource, LocalDataSource, CoreDataSource, RandomSelector>;

#[derive(Debug)]
pub struct RepositoryImpl<N, L, C, S> {
    network: N,
    local: L,
    core: C,
    selector: S,
    fallback_message: String,
}

impl<N, L, C, S> RepositoryImpl<N, L, C, S>
where
    N: DataSource,
    L: DataSource,
    C: DataSource,
    S: SourceSelector,
{
    pub fn new(network: N, local: L, core: C, selector: S) -> Self {
        Self {
            network,
            local,
            core,
            selector,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }

    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    async fn dispatch(&self, kind: SourceKind) -> Result<(), SourceError> {
        match kind {
            SourceKind::Local => self.local.process().await.map_err(Into::into),
            SourceKind::Network => self.network.process().await.map_err(Into::into),
            SourceKind::Core => self.core.process().await.map_err(Into::into),
        }
    }
}

impl DefaultRepository {
    pub fn from_config(cfg: &AppConfig) -> Result<Self, AppError> {
        let selector = RandomSelector::from_config(cfg)?;
        let repo = Self::new(
            NetworkDataSource::new(),
            LocalDataSource::new(),
            CoreDataSource::new(),
            selector,
        )
        .with_fallback_message(cfg.fallback_message.clone());

        Ok(repo)
    }
}

impl<N, L, C, S> Repository for RepositoryImpl<N, L, C, S>
where
    N: DataSource,
    L: DataSource,
    C: DataSource,
    S: SourceSelector,
{
    #[instrument(skip(self))]
    async fn process(&self) -> Result<(), RepositoryError> {
        if self.selector.short_circuit() {
            warn!("availability gate tripped, skipping data sources");
            return Err(RepositoryError::NotAvailable);
        }

        let Some(kind) = self.selector.pick(&SourceKind::ALL) else {
            warn!("selector returned no data source");
            return Err(RepositoryError::NotAvailable);
        };
        info!(source = %kind, "dispatching to data source");

        self.dispatch(kind).await.map_err(|err| {
            let mapped = RepositoryError::from_source(err.clone(), &self.fallback_message);
            debug!(source = %kind, source_error = %err, error = %mapped, "translated source error");
            mapped
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::biz::PinnedSelector;
    use crate::error::{CoreDataError, NetworkDataError, StorageDataError};

    /// 记录调用次数的数据源包装
    #[derive(Debug)]
    struct Counting<D> {
        inner: D,
        calls: Arc<AtomicUsize>,
    }

    impl<D: DataSource> DataSource for Counting<D> {
        type Error = D::Error;

        async fn process(&self) -> Result<(), D::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.process().await
        }
    }

    #[derive(Debug)]
    struct Succeeding;

    impl DataSource for Succeeding {
        type Error = anyhow::Error;

        async fn process(&self) -> Result<(), anyhow::Error> {
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl DataSource for Broken {
        type Error = anyhow::Error;

        async fn process(&self) -> Result<(), anyhow::Error> {
            Err(anyhow::anyhow!("connection reset"))
        }
    }

    fn client(code: u16, message: &str) -> NetworkDataSource {
        NetworkDataSource::failing_with(NetworkDataError::Client {
            code,
            message: message.to_string(),
        })
    }

    fn pinned<N: DataSource>(
        network: N,
        kind: SourceKind,
    ) -> RepositoryImpl<N, LocalDataSource, CoreDataSource, PinnedSelector> {
        RepositoryImpl::new(
            network,
            LocalDataSource::new(),
            CoreDataSource::new(),
            PinnedSelector::new(kind),
        )
    }

    #[tokio::test]
    async fn test_default_sources_through_repository() {
        let result = pinned(NetworkDataSource::new(), SourceKind::Network)
            .process()
            .await;
        assert_eq!(
            result,
            Err(RepositoryError::NoData {
                message: "not found".to_string()
            })
        );

        let result = pinned(NetworkDataSource::new(), SourceKind::Local)
            .process()
            .await;
        assert_eq!(result, Err(RepositoryError::NoFound));

        let result = pinned(NetworkDataSource::new(), SourceKind::Core)
            .process()
            .await;
        assert_eq!(result, Err(RepositoryError::NotAvailable));
    }

    #[tokio::test]
    async fn test_network_client_codes_through_repository() {
        let cases = [
            (401, RepositoryError::NotAuthorized),
            (403, RepositoryError::NotAuthorized),
            (500, RepositoryError::NotAvailable),
            (999, RepositoryError::NoFound),
        ];
        for (code, expected) in cases {
            let result = pinned(client(code, "anything"), SourceKind::Network)
                .process()
                .await;
            assert_eq!(result, Err(expected), "code {}", code);
        }
    }

    #[tokio::test]
    async fn test_network_unauthorized_uses_configured_fallback() {
        let repo = pinned(
            NetworkDataSource::failing_with(NetworkDataError::Unauthorized),
            SourceKind::Network,
        )
        .with_fallback_message("please retry");

        assert_eq!(
            repo.process().await,
            Err(RepositoryError::NoData {
                message: "please retry".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_core_empty_is_not_available() {
        let repo = RepositoryImpl::new(
            NetworkDataSource::new(),
            LocalDataSource::new(),
            CoreDataSource::failing_with(CoreDataError::Empty),
            PinnedSelector::new(SourceKind::Core),
        );
        assert_eq!(repo.process().await, Err(RepositoryError::NotAvailable));
    }

    #[tokio::test]
    async fn test_gate_invokes_no_data_source() {
        let calls = Arc::new(AtomicUsize::new(0));
        let repo = RepositoryImpl::new(
            Counting {
                inner: NetworkDataSource::new(),
                calls: calls.clone(),
            },
            Counting {
                inner: LocalDataSource::new(),
                calls: calls.clone(),
            },
            Counting {
                inner: CoreDataSource::new(),
                calls: calls.clone(),
            },
            PinnedSelector::gated(),
        );

        for _ in 0..10 {
            assert_eq!(repo.process().await, Err(RepositoryError::NotAvailable));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_exactly_one_source_invoked_per_call() {
        let network_calls = Arc::new(AtomicUsize::new(0));
        let local_calls = Arc::new(AtomicUsize::new(0));
        let core_calls = Arc::new(AtomicUsize::new(0));
        let repo = RepositoryImpl::new(
            Counting {
                inner: NetworkDataSource::new(),
                calls: network_calls.clone(),
            },
            Counting {
                inner: LocalDataSource::new(),
                calls: local_calls.clone(),
            },
            Counting {
                inner: CoreDataSource::new(),
                calls: core_calls.clone(),
            },
            RandomSelector::seeded(0.0, 3).unwrap(),
        );

        for _ in 0..30 {
            assert!(repo.process().await.is_err());
        }
        let total = network_calls.load(Ordering::SeqCst)
            + local_calls.load(Ordering::SeqCst)
            + core_calls.load(Ordering::SeqCst);
        assert_eq!(total, 30);
    }

    #[tokio::test]
    async fn test_random_repository_only_yields_documented_errors() {
        let repo = RepositoryImpl::new(
            NetworkDataSource::new(),
            LocalDataSource::new(),
            CoreDataSource::new(),
            RandomSelector::seeded(0.5, 11).unwrap(),
        );

        for _ in 0..100 {
            let err = repo.process().await.unwrap_err();
            assert!(
                matches!(
                    &err,
                    RepositoryError::NotAvailable
                        | RepositoryError::NoFound
                        | RepositoryError::NoData { .. }
                ),
                "unexpected error {:?}",
                err
            );
        }
    }

    #[tokio::test]
    async fn test_success_propagates() {
        let repo = RepositoryImpl::new(
            NetworkDataSource::new(),
            Succeeding,
            CoreDataSource::new(),
            PinnedSelector::new(SourceKind::Local),
        );
        assert_eq!(repo.process().await, Ok(()));
    }

    #[tokio::test]
    async fn test_unknown_source_error_is_not_available() {
        let repo = RepositoryImpl::new(
            Broken,
            LocalDataSource::new(),
            CoreDataSource::new(),
            PinnedSelector::new(SourceKind::Network),
        );
        assert_eq!(repo.process().await, Err(RepositoryError::NotAvailable));
    }

    #[tokio::test]
    async fn test_from_config() {
        let cfg = AppConfig {
            gate_probability: 0.0,
            pinned_source: Some("local".to_string()),
            fallback_message: "x".to_string(),
            ..AppConfig::default()
        };
        let repo = DefaultRepository::from_config(&cfg).unwrap();
        assert_eq!(repo.process().await, Err(RepositoryError::NoFound));

        let storage_err: SourceError = StorageDataError::Empty.into();
        assert_eq!(
            RepositoryError::from_source(storage_err, "x"),
            RepositoryError::NoFound
        );
    }
}
