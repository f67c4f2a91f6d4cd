//! Storage configuration types.

pub use lumora_shared::StorageProvider;

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Objects requested per listing page.
    pub page_size: usize,
}

impl StorageConfig {
    /// Default listing page size, matching the S3 `ListObjectsV2` maximum.
    pub const DEFAULT_PAGE_SIZE: usize = 1000;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the listing page size. Zero is raised to one.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage"));
        assert_eq!(config.page_size, StorageConfig::DEFAULT_PAGE_SIZE);
        assert_eq!(config.provider.name(), "local");
    }

    #[test]
    fn test_page_size_never_zero() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage")).with_page_size(0);
        assert_eq!(config.page_size, 1);
    }

    #[test]
    fn test_page_size_override() {
        let config =
            StorageConfig::new(StorageProvider::local_fs("./storage")).with_page_size(250);
        assert_eq!(config.page_size, 250);
    }
}
