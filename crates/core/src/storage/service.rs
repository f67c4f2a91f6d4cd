//! Storage service implementation using Apache OpenDAL.

use std::sync::Arc;

use futures::TryStreamExt;
use opendal::{Operator, services};
use tracing::{info, warn};

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use super::listing::{ListPage, ObjectListing, RemoteObject};

/// Read-only view of the remote object store.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Build the store client when a provider is configured.
    ///
    /// A provider that cannot be initialized is logged and yields `None`, so
    /// reconciliation reports database totals instead of refusing to run.
    #[must_use]
    pub fn from_optional_provider(
        provider: Option<StorageProvider>,
        page_size: usize,
    ) -> Option<Arc<Self>> {
        let Some(provider) = provider else {
            warn!("No object storage configured; reconciliation will report database totals only");
            return None;
        };

        match Self::from_config(StorageConfig::new(provider).with_page_size(page_size)) {
            Ok(service) => {
                info!(
                    provider = service.provider_name(),
                    bucket = service.bucket(),
                    "Object storage configured"
                );
                Some(Arc::new(service))
            }
            Err(e) => {
                warn!(error = %e, "Object storage could not be initialized");
                None
            }
        }
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
        };

        Ok(operator)
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Raw operator, for fixtures that need to seed a store.
    #[must_use]
    pub fn operator(&self) -> &Operator {
        &self.operator
    }
}

impl ObjectListing for StorageService {
    async fn list_page(
        &self,
        prefix: Option<&str>,
        continuation: Option<&str>,
    ) -> Result<ListPage, StorageError> {
        let capability = self.operator.info().full_capability();
        // Backends without start_after cannot resume, so they list in one page.
        let paged = capability.list_with_start_after;
        let page_size = self.config.page_size;

        let mut request = self
            .operator
            .lister_with(prefix.unwrap_or("/"))
            .recursive(true);
        if paged {
            request = request.limit(page_size);
            if let Some(token) = continuation {
                request = request.start_after(token);
            }
        }
        let mut lister = request.await?;

        let mut objects = Vec::new();
        while let Some(entry) = lister.try_next().await? {
            if entry.metadata().is_dir() {
                continue;
            }

            // Some listers (fs) leave the length unset, which reads as 0.
            // Confirm zero-length entries with a stat.
            let listed = entry.metadata().content_length();
            let size_bytes = if listed > 0 {
                listed
            } else {
                self.operator.stat(entry.path()).await?.content_length()
            };
            objects.push(RemoteObject::new(entry.path(), size_bytes));

            if paged && objects.len() >= page_size {
                break;
            }
        }

        let next_continuation = if paged && objects.len() >= page_size {
            objects.last().map(|o| o.key.clone())
        } else {
            None
        };

        Ok(ListPage {
            objects,
            next_continuation,
        })
    }
}
