//! CatalogClient trait definition

use async_trait::async_trait;

use super::{CatalogError, MediaResult, RootFolder, SeriesOverview};

/// One media catalog backend (Radarr for movies, Sonarr for series)
///
/// The conversation core depends only on this trait. Result ordering from
/// `search` is the backend's relevance order and is preserved verbatim.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search the catalog for candidates matching a title
    async fn search(&self, title: &str) -> Result<Vec<MediaResult>, CatalogError>;

    /// List the library locations media can be added to
    ///
    /// An empty list is a deployment error, judged at the call site.
    async fn root_folders(&self) -> Result<Vec<RootFolder>, CatalogError>;

    /// Check whether a candidate is already in the library
    async fn in_library(&self, remote_id: u64) -> Result<bool, CatalogError>;

    /// Add a candidate to the library under the given root folder
    ///
    /// Returns false when the backend rejected the add (no partial-success
    /// state exists).
    async fn add_to_library(&self, remote_id: u64, path: &str) -> Result<bool, CatalogError>;
}

/// Enumeration of the whole series library, for the "list all series" view
#[async_trait]
pub trait SeriesLister: Send + Sync {
    async fn list_series(&self) -> Result<Vec<SeriesOverview>, CatalogError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock catalog backend for unit tests
    ///
    /// Returns canned data and records the adds it was asked to perform.
    pub struct MockCatalog {
        pub results: Vec<MediaResult>,
        pub folders: Vec<RootFolder>,
        pub in_library: bool,
        pub add_succeeds: bool,
        pub series: Vec<SeriesOverview>,
        pub adds: Mutex<Vec<(u64, String)>>,
        search_calls: AtomicUsize,
    }

    impl MockCatalog {
        pub fn new(results: Vec<MediaResult>, folders: Vec<RootFolder>) -> Self {
            Self {
                results,
                folders,
                in_library: false,
                add_succeeds: true,
                series: Vec::new(),
                adds: Mutex::new(Vec::new()),
                search_calls: AtomicUsize::new(0),
            }
        }

        pub fn search_calls(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogClient for MockCatalog {
        async fn search(&self, _title: &str) -> Result<Vec<MediaResult>, CatalogError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.results.clone())
        }

        async fn root_folders(&self) -> Result<Vec<RootFolder>, CatalogError> {
            Ok(self.folders.clone())
        }

        async fn in_library(&self, _remote_id: u64) -> Result<bool, CatalogError> {
            Ok(self.in_library)
        }

        async fn add_to_library(&self, remote_id: u64, path: &str) -> Result<bool, CatalogError> {
            self.adds.lock().unwrap().push((remote_id, path.to_string()));
            Ok(self.add_succeeds)
        }
    }

    #[async_trait]
    impl SeriesLister for MockCatalog {
        async fn list_series(&self) -> Result<Vec<SeriesOverview>, CatalogError> {
            Ok(self.series.clone())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_records_adds() {
            let mock = MockCatalog::new(vec![], vec![]);
            assert!(mock.add_to_library(42, "/movies").await.unwrap());
            let adds = mock.adds.lock().unwrap();
            assert_eq!(adds.as_slice(), &[(42, "/movies".to_string())]);
        }

        #[tokio::test]
        async fn test_mock_counts_searches() {
            let mock = MockCatalog::new(vec![], vec![]);
            let _ = mock.search("dune").await.unwrap();
            let _ = mock.search("dune").await.unwrap();
            assert_eq!(mock.search_calls(), 2);
        }
    }
}
