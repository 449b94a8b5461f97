use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::error::{DescriptorError, Result};

/// Read and deserialize a YAML document.
///
/// A missing file maps to [`DescriptorError::ConfigNotFound`] so callers can
/// report which resource is absent.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML for `T`.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let input = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DescriptorError::ConfigNotFound {
            path: path.to_path_buf(),
        },
        _ => DescriptorError::io(path, e),
    })?;
    serde_yaml::from_str(&input).map_err(|source| DescriptorError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` as YAML and replace `destination` with it.
///
/// The document is written to a temporary file next to the destination and
/// renamed over it only once fully written, so a failure never leaves a
/// truncated file behind.
///
/// # Errors
///
/// Returns [`DescriptorError::Serialization`] if serialization, writing, or
/// the final rename fails.
pub fn write_yaml_atomic<T: Serialize>(value: &T, destination: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(value)
        .map_err(|e| DescriptorError::Serialization(format!("yaml serialization failed: {e}")))?;

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
        DescriptorError::Serialization(format!(
            "failed to create temporary file in {}: {e}",
            dir.display()
        ))
    })?;
    tmp.write_all(yaml.as_bytes())
        .and_then(|()| tmp.flush())
        .map_err(|e| DescriptorError::Serialization(format!("failed to write: {e}")))?;
    tmp.persist(destination).map_err(|e| {
        DescriptorError::Serialization(format!(
            "failed to write {}: {}",
            destination.display(),
            e.error
        ))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn missing_file_is_config_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.yaml");
        let err = load_yaml::<BTreeMap<String, String>>(&path).unwrap_err();
        assert!(matches!(err, DescriptorError::ConfigNotFound { .. }), "got: {err}");
    }

    #[test]
    fn malformed_yaml_is_reported_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "tests: [unclosed").expect("write");
        let err = load_yaml::<BTreeMap<String, Vec<String>>>(&path).unwrap_err();
        assert!(matches!(err, DescriptorError::Yaml { .. }));
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn atomic_write_overwrites_previous_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.yaml");
        std::fs::write(&path, "stale: true\nmore: stuff\n").expect("write");

        let mut doc = BTreeMap::new();
        doc.insert("fresh", 1);
        write_yaml_atomic(&doc, &path).expect("write succeeds");

        let contents = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(contents, "fresh: 1\n");
    }

    #[test]
    fn atomic_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nope").join("out.yaml");
        let err = write_yaml_atomic(&BTreeMap::<String, String>::new(), &path).unwrap_err();
        assert!(matches!(err, DescriptorError::Serialization(_)));
        assert!(!path.exists());
    }
}
