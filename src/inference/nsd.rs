//! The subset of an ETSI SOL006 network service descriptor that tag
//! inference reads.

use serde::Deserialize;

/// Deployment flavour every descriptor is expected to carry.
pub const DEFAULT_FLAVOUR: &str = "default-df";

#[derive(Debug, Deserialize)]
pub struct NsdDocument {
    pub nsd: NsdCatalog,
}

#[derive(Debug, Deserialize)]
pub struct NsdCatalog {
    pub nsd: Vec<NetworkService>,
}

#[derive(Debug, Deserialize)]
pub struct NetworkService {
    pub id: String,
    #[serde(default)]
    pub df: Vec<DeploymentFlavour>,
}

impl NetworkService {
    pub fn default_flavour(&self) -> Option<&DeploymentFlavour> {
        self.df.iter().find(|df| df.id == DEFAULT_FLAVOUR)
    }
}

#[derive(Debug, Deserialize)]
pub struct DeploymentFlavour {
    pub id: String,
    #[serde(default, rename = "vnf-profile")]
    pub vnf_profile: Vec<VnfProfile>,
}

#[derive(Debug, Deserialize)]
pub struct VnfProfile {
    #[serde(rename = "vnfd-id")]
    pub vnfd_id: String,
    #[serde(default, rename = "virtual-link-connectivity")]
    pub virtual_link_connectivity: Vec<VirtualLinkConnectivity>,
}

#[derive(Debug, Deserialize)]
pub struct VirtualLinkConnectivity {
    #[serde(default, rename = "constituent-cpd-id")]
    pub constituent_cpd_id: Vec<ConstituentCpd>,
}

#[derive(Debug, Deserialize)]
pub struct ConstituentCpd {
    #[serde(rename = "constituent-cpd-id")]
    pub constituent_cpd_id: String,
}
