use hostel_gate::storage::{FileStorage, MemoryStorage, SessionStorage, TOKEN_KEY, USER_KEY};
use std::fs;

#[cfg(test)]
mod file_tests {
    use super::*;

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let storage = FileStorage::new(&path);
        storage.set(TOKEN_KEY, "abc").unwrap();
        storage.set(USER_KEY, r#"{"id":"1"}"#).unwrap();

        // A new instance over the same file is a process restart.
        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("abc"));
        assert_eq!(reopened.get(USER_KEY).as_deref(), Some(r#"{"id":"1"}"#));
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn test_file_storage_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("never-written.json"));
        assert_eq!(storage.get(TOKEN_KEY), None);
    }

    #[test]
    fn test_file_storage_corrupt_file_reads_empty_and_recovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json at all").unwrap();

        let storage = FileStorage::new(&path);
        assert_eq!(storage.get(TOKEN_KEY), None);

        storage.set(TOKEN_KEY, "fresh").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("fresh"));
    }

    #[test]
    fn test_file_storage_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));
        storage.set(TOKEN_KEY, "abc").unwrap();
        storage.set(USER_KEY, "{}").unwrap();

        storage.remove(TOKEN_KEY).unwrap();

        assert_eq!(storage.get(TOKEN_KEY), None);
        assert_eq!(storage.get(USER_KEY).as_deref(), Some("{}"));
        // Removing what is not there is fine.
        assert!(storage.remove(TOKEN_KEY).is_ok());
    }

    #[test]
    fn test_file_storage_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state").join("session.json");

        let storage = FileStorage::new(&path);
        storage.set(TOKEN_KEY, "abc").unwrap();

        assert!(path.exists());
    }
}

#[cfg(test)]
mod mock_tests {
    use super::*;

    #[test]
    fn test_mock_clones_share_entries() {
        let storage = MemoryStorage::new();
        let view = storage.clone();

        storage.set(TOKEN_KEY, "abc").unwrap();

        assert_eq!(view.get(TOKEN_KEY).as_deref(), Some("abc"));
        assert!(!view.is_empty());
    }

    #[test]
    fn test_mock_failure() {
        let storage = MemoryStorage::new_failing();
        assert!(storage.set(TOKEN_KEY, "abc").is_err());
        assert!(storage.remove(TOKEN_KEY).is_err());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_mock_seed_bypasses_failure() {
        let storage = MemoryStorage::new_failing();
        storage.seed(TOKEN_KEY, "abc");
        assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("abc"));
    }
}
