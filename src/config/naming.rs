//! Random identifiers for per-test cloud resources

use rand::distributions::Alphanumeric;
use rand::Rng;

const SUFFIX_LEN: usize = 8;

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// Dataset id of the form `test_<8 lowercase alphanumerics>`
pub fn random_dataset_id() -> String {
    format!("test_{}", random_suffix())
}

/// Staging path of the form `<prefix>/test_<yyyyMMdd>_<8 alphanumerics>`
///
/// Leading and trailing slashes on `prefix` are dropped; an empty prefix
/// yields a path at the bucket root.
pub fn random_staging_path(prefix: &str) -> String {
    let leaf = format!(
        "test_{}_{}",
        chrono::Utc::now().format("%Y%m%d"),
        random_suffix()
    );
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        leaf
    } else {
        format!("{}/{}", prefix, leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_id_shape() {
        let id = random_dataset_id();
        assert!(id.starts_with("test_"));
        assert_eq!(id.len(), "test_".len() + SUFFIX_LEN);
        assert!(id[5..].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_staging_path_prefix_handling() {
        assert!(random_staging_path("/tmp/runs/").starts_with("tmp/runs/test_"));
        assert!(random_staging_path("").starts_with("test_"));
    }

    #[test]
    fn test_ids_differ() {
        assert_ne!(random_dataset_id(), random_dataset_id());
    }
}
