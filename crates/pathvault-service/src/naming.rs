//! Collision-free entry names within a folder.

use tracing::debug;

use pathvault_core::result::AppResult;
use pathvault_database::RecordRepository;
use pathvault_entity::file::RecordFilter;

/// Picks the first free `name (n).ext` in a folder.
///
/// Queries the store once per candidate. Two callers racing for the same
/// slot may both be handed the same name.
#[derive(Debug, Clone)]
pub struct UniqueNameResolver {
    repo: RecordRepository,
}

impl UniqueNameResolver {
    /// Creates a new resolver.
    pub fn new(repo: RecordRepository) -> Self {
        Self { repo }
    }

    /// Return `desired` if it is free in `folder_path`, otherwise the
    /// smallest numbered variant that is.
    pub async fn resolve(
        &self,
        desired: &str,
        folder_path: &str,
        namespace: Option<&str>,
    ) -> AppResult<String> {
        if !self.is_taken(desired, folder_path, namespace).await? {
            return Ok(desired.to_string());
        }

        let mut n = 1u64;
        loop {
            let candidate = numbered_name(desired, n);
            if !self.is_taken(&candidate, folder_path, namespace).await? {
                debug!(desired, resolved = %candidate, folder_path, "Resolved name collision");
                return Ok(candidate);
            }
            n += 1;
        }
    }

    /// Whether an entry named `file_name` exists in `folder_path`.
    pub async fn is_taken(
        &self,
        file_name: &str,
        folder_path: &str,
        namespace: Option<&str>,
    ) -> AppResult<bool> {
        let filter = RecordFilter::at(file_name, folder_path, namespace);
        Ok(self.repo.find_one(&filter).await?.is_some())
    }
}

/// Insert ` (n)` before the last extension: `test.png` becomes `test (1).png`.
pub fn numbered_name(name: &str, n: u64) -> String {
    match name.rsplit_once('.') {
        Some((base, ext)) => format!("{base} ({n}).{ext}"),
        None => format!("{name} ({n})"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use pathvault_database::{FieldMapper, MemoryMetadataStore};
    use pathvault_entity::file::NewRecord;

    fn resolver() -> (UniqueNameResolver, RecordRepository) {
        let repo = RecordRepository::new(
            Arc::new(MemoryMetadataStore::new()),
            Arc::new(FieldMapper::identity()),
        );
        (UniqueNameResolver::new(repo.clone()), repo)
    }

    #[test]
    fn test_numbered_name() {
        assert_eq!(numbered_name("test.png", 1), "test (1).png");
        assert_eq!(numbered_name("archive.tar.gz", 2), "archive.tar (2).gz");
        assert_eq!(numbered_name("README", 3), "README (3)");
        assert_eq!(numbered_name(".env", 1), " (1).env");
    }

    #[tokio::test]
    async fn test_free_name_is_kept() {
        let (resolver, _) = resolver();
        let name = resolver.resolve("test.png", "/", None).await.unwrap();
        assert_eq!(name, "test.png");
    }

    #[tokio::test]
    async fn test_smallest_free_suffix_is_chosen() {
        let (resolver, repo) = resolver();
        repo.create(NewRecord::file("test.png", "/img/")).await.unwrap();

        let name = resolver.resolve("test.png", "/img/", None).await.unwrap();
        assert_eq!(name, "test (1).png");

        repo.create(NewRecord::file("test (1).png", "/img/")).await.unwrap();
        let name = resolver.resolve("test.png", "/img/", None).await.unwrap();
        assert_eq!(name, "test (2).png");

        // Another folder is unaffected.
        let name = resolver.resolve("test.png", "/", None).await.unwrap();
        assert_eq!(name, "test.png");
    }

    #[tokio::test]
    async fn test_namespaces_do_not_collide() {
        let (resolver, repo) = resolver();
        repo.create(NewRecord::file("a.txt", "/").with_namespace(Some("t1")))
            .await
            .unwrap();

        let name = resolver.resolve("a.txt", "/", Some("t2")).await.unwrap();
        assert_eq!(name, "a.txt");
        let name = resolver.resolve("a.txt", "/", Some("t1")).await.unwrap();
        assert_eq!(name, "a (1).txt");
    }
}
