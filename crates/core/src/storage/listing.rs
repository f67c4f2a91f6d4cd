//! Paginated object listing.

use std::future::Future;

use serde::Serialize;
use tracing::debug;

use super::error::StorageError;

/// An object present in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RemoteObject {
    /// Object key, unique within the store.
    pub key: String,
    /// Object size in bytes.
    pub size_bytes: u64,
}

impl RemoteObject {
    /// Create a remote object.
    #[must_use]
    pub fn new(key: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            key: key.into(),
            size_bytes,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    /// Objects in this page.
    pub objects: Vec<RemoteObject>,
    /// Token for the next page, `None` when the listing is exhausted.
    pub next_continuation: Option<String>,
}

/// Read-only listing capability over a remote store.
///
/// Implemented by [`super::StorageService`] for real stores and by in-memory
/// fakes in tests.
pub trait ObjectListing: Send + Sync {
    /// Fetch one page of objects under `prefix`, starting after `continuation`.
    fn list_page(
        &self,
        prefix: Option<&str>,
        continuation: Option<&str>,
    ) -> impl Future<Output = Result<ListPage, StorageError>> + Send;
}

/// List every object under `prefix`, following continuation tokens.
///
/// Pages are fetched strictly in sequence since each token depends on the
/// page before it.
///
/// # Errors
///
/// Returns an error if any page fails, or if the store hands back the same
/// continuation token twice in a row.
pub async fn list_all_objects<L>(
    listing: &L,
    prefix: Option<&str>,
) -> Result<Vec<RemoteObject>, StorageError>
where
    L: ObjectListing + ?Sized,
{
    let mut objects = Vec::new();
    let mut continuation: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = listing.list_page(prefix, continuation.as_deref()).await?;
        pages += 1;

        debug!(
            page = pages,
            page_objects = page.objects.len(),
            has_more = page.next_continuation.is_some(),
            "Fetched listing page"
        );

        objects.extend(page.objects);

        match page.next_continuation {
            Some(next) if continuation.as_deref() == Some(next.as_str()) => {
                return Err(StorageError::StalledPagination { token: next });
            }
            Some(next) => continuation = Some(next),
            None => break,
        }
    }

    debug!(
        pages,
        total_objects = objects.len(),
        prefix = prefix.unwrap_or(""),
        "Listing exhausted"
    );

    Ok(objects)
}
