pub mod nsd;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{DescriptorError, Result};
use crate::io::load_yaml;

use self::nsd::{DEFAULT_FLAVOUR, NsdDocument};

/// An addressable interface tag, `{{ns_id|vnf_id|interface_id}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionPoint(String);

impl ConnectionPoint {
    pub fn new(ns_id: &str, vnf_id: &str, interface_id: &str) -> Self {
        Self(format!("{{{{{ns_id}|{vnf_id}|{interface_id}}}}}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Connection points discovered during a session and the values that can
/// be injected into them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferredTags {
    pub connection_points: Vec<ConnectionPoint>,
    pub values: Vec<String>,
}

impl InferredTags {
    /// True when nothing was inferred; injectable variables then stay unset.
    pub fn is_empty(&self) -> bool {
        self.connection_points.is_empty()
    }
}

/// Extract connection point tags from network service descriptors.
///
/// Tags are returned in traversal order, file after file, without
/// deduplication. Only the `default-df` flavour of each network service
/// is inspected, and only the first constituent of each virtual link.
///
/// # Errors
///
/// Returns [`DescriptorError::FileNotFound`] for a missing descriptor and
/// [`DescriptorError::Schema`] when a descriptor does not have the expected
/// structure. No partial result is returned.
pub fn infer_connection_points<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<ConnectionPoint>> {
    let mut tags = Vec::new();
    for path in paths {
        let path = path.as_ref();
        let found = parse_descriptor(path)?;
        debug!(descriptor = %path.display(), count = found.len(), "inferred connection points");
        tags.extend(found);
    }
    Ok(tags)
}

fn parse_descriptor(path: &Path) -> Result<Vec<ConnectionPoint>> {
    let document: NsdDocument = load_yaml(path).map_err(|e| match e {
        DescriptorError::ConfigNotFound { path } => DescriptorError::FileNotFound { path },
        DescriptorError::Yaml { path, source } => DescriptorError::Schema {
            path,
            message: format!("not a network service descriptor: {source}"),
        },
        other => other,
    })?;

    let mut tags = Vec::new();
    for service in &document.nsd.nsd {
        let flavour = service.default_flavour().ok_or_else(|| {
            DescriptorError::schema(
                path,
                format!(
                    "network service '{}' has no '{DEFAULT_FLAVOUR}' deployment flavour",
                    service.id
                ),
            )
        })?;

        for vnf in &flavour.vnf_profile {
            for link in &vnf.virtual_link_connectivity {
                let first = link.constituent_cpd_id.first().ok_or_else(|| {
                    DescriptorError::schema(
                        path,
                        format!(
                            "virtual link of '{}' in '{}' has no constituent connection point",
                            vnf.vnfd_id, service.id
                        ),
                    )
                })?;
                tags.push(ConnectionPoint::new(
                    &service.id,
                    &vnf.vnfd_id,
                    &first.constituent_cpd_id,
                ));
            }
        }
    }
    Ok(tags)
}

#[derive(Debug, Deserialize)]
struct ConnectionPointValues {
    values: Vec<String>,
}

/// Load the vocabulary of values that can be injected into a connection point.
///
/// # Errors
///
/// Returns [`DescriptorError::ConfigNotFound`] if the file is missing.
pub fn load_connection_point_values(path: &Path) -> Result<Vec<String>> {
    let document: ConnectionPointValues = load_yaml(path)?;
    Ok(document.values)
}

/// Infer tags from `paths` and pair them with the value vocabulary at
/// `values_path`.
///
/// # Errors
///
/// Propagates inference and loading errors.
pub fn infer_tags(paths: &[PathBuf], values_path: &Path) -> Result<InferredTags> {
    let connection_points = infer_connection_points(paths)?;
    let values = load_connection_point_values(values_path)?;
    Ok(InferredTags {
        connection_points,
        values,
    })
}
