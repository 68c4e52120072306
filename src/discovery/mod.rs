//! Discovery of existing VPC networking from the cloud provider.
//!
//! Discovery is read-only and never cached: every run queries the live API
//! and builds a fresh [`NetworkTopology`]. Failures are never retried here;
//! retry/backoff policy belongs to the caller.

pub mod ec2;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use ec2::Ec2NetworkDiscovery;

/// The networking resource kinds this tool adopts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Vpc,
    Subnet,
    InternetGateway,
    RouteTable,
    SecurityGroup,
}

impl ResourceKind {
    /// The Terraform resource type for this kind
    pub fn terraform_type(&self) -> &'static str {
        match self {
            ResourceKind::Vpc => "aws_vpc",
            ResourceKind::Subnet => "aws_subnet",
            ResourceKind::InternetGateway => "aws_internet_gateway",
            ResourceKind::RouteTable => "aws_route_table",
            ResourceKind::SecurityGroup => "aws_security_group",
        }
    }

    /// The tfvars map variable that carries this kind's configurations
    pub fn config_key(&self) -> &'static str {
        match self {
            ResourceKind::Vpc => "vpc_configs",
            ResourceKind::Subnet => "subnet_configs",
            ResourceKind::InternetGateway => "internet_gateway_configs",
            ResourceKind::RouteTable => "route_table_configs",
            ResourceKind::SecurityGroup => "security_group_configs",
        }
    }

    /// All kinds, parent first. Import directives are issued in this order
    /// so the VPC is bound before any of its children.
    pub fn ordered() -> [ResourceKind; 5] {
        [
            ResourceKind::Vpc,
            ResourceKind::Subnet,
            ResourceKind::InternetGateway,
            ResourceKind::RouteTable,
            ResourceKind::SecurityGroup,
        ]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.terraform_type())
    }
}

/// A discovered networking resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredResource {
    /// The resource kind
    pub kind: ResourceKind,
    /// The provider-issued resource ID (e.g. vpc-0d522ed84b46c719d)
    pub resource_id: String,
    /// CIDR block, for kinds that carry one
    pub cidr_block: Option<String>,
    /// Resource tags
    pub tags: BTreeMap<String, String>,
    /// Additional attributes (availability zone, DNS flags, group name, ...)
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl DiscoveredResource {
    pub fn new(kind: ResourceKind, resource_id: impl Into<String>) -> Self {
        Self {
            kind,
            resource_id: resource_id.into(),
            cidr_block: None,
            tags: BTreeMap::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_cidr_block(mut self, cidr: impl Into<String>) -> Self {
        self.cidr_block = Some(cidr.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_tags(mut self, tags: BTreeMap<String, String>) -> Self {
        self.tags.extend(tags);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// String attribute lookup, empty when absent or non-string
    pub fn attribute_str(&self, key: &str) -> &str {
        self.attributes
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }

    /// Boolean attribute lookup with a default for absent values
    pub fn attribute_bool(&self, key: &str, default: bool) -> bool {
        self.attributes
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    /// Get a display string for the resource
    pub fn display_string(&self) -> String {
        match self.tags.get("Name") {
            Some(name) => format!("{} ({}) - {}", self.kind, self.resource_id, name),
            None => format!("{} ({})", self.kind, self.resource_id),
        }
    }
}

/// The full set of networking resources owned by one VPC.
///
/// Built once per run from live describe calls and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkTopology {
    /// Region the topology was discovered in
    pub region: String,
    /// The parent VPC
    pub vpc: DiscoveredResource,
    pub subnets: Vec<DiscoveredResource>,
    pub internet_gateways: Vec<DiscoveredResource>,
    pub route_tables: Vec<DiscoveredResource>,
    pub security_groups: Vec<DiscoveredResource>,
}

impl NetworkTopology {
    /// Child resources of the given kind. The VPC itself is not a child.
    pub fn children_of(&self, kind: ResourceKind) -> &[DiscoveredResource] {
        match kind {
            ResourceKind::Vpc => &[],
            ResourceKind::Subnet => &self.subnets,
            ResourceKind::InternetGateway => &self.internet_gateways,
            ResourceKind::RouteTable => &self.route_tables,
            ResourceKind::SecurityGroup => &self.security_groups,
        }
    }

    /// Every resource, VPC first, then children in kind order
    pub fn resources(&self) -> Vec<&DiscoveredResource> {
        let mut all = vec![&self.vpc];
        for kind in ResourceKind::ordered() {
            all.extend(self.children_of(kind).iter());
        }
        all
    }

    /// Total number of resource instances, the VPC included
    pub fn resource_count(&self) -> usize {
        1 + self.subnets.len()
            + self.internet_gateways.len()
            + self.route_tables.len()
            + self.security_groups.len()
    }
}

/// Error kinds for topology discovery
#[derive(Debug)]
pub enum DiscoveryError {
    /// The parent VPC ID did not resolve to any resource. Distinct from a
    /// VPC that exists but has no children, which succeeds with an empty
    /// topology.
    NotFound { vpc_id: String },

    /// Transport, auth, or throttling failure from the provider API
    Provider { message: String },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::NotFound { vpc_id } => {
                write!(f, "VPC '{}' not found", vpc_id)
            }
            DiscoveryError::Provider { message } => {
                write!(f, "Provider API error: {}", message)
            }
        }
    }
}

impl std::error::Error for DiscoveryError {}

/// Result type for discovery operations
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Trait for network topology discovery.
///
/// Note: this trait uses `async fn` and is not dyn-compatible. Use concrete
/// types or generics; tests supply their own implementations.
pub trait NetworkDiscovery {
    /// Return the full topology owned by `vpc_id`.
    ///
    /// Must fail with [`DiscoveryError::NotFound`] when the VPC ID does not
    /// resolve, never with an empty topology.
    fn discover(
        &self,
        vpc_id: &str,
    ) -> impl std::future::Future<Output = DiscoveryResult<NetworkTopology>> + Send;
}

#[cfg(test)]
pub(crate) fn sample_topology() -> NetworkTopology {
    NetworkTopology {
        region: "us-east-1".to_string(),
        vpc: DiscoveredResource::new(ResourceKind::Vpc, "net-123")
            .with_cidr_block("10.0.0.0/16")
            .with_tag("Name", "main")
            .with_attribute("enable_dns_support", serde_json::Value::Bool(true))
            .with_attribute("enable_dns_hostnames", serde_json::Value::Bool(true)),
        subnets: vec![
            DiscoveredResource::new(ResourceKind::Subnet, "sub-2")
                .with_cidr_block("10.0.2.0/24")
                .with_attribute("vpc_id", serde_json::json!("net-123"))
                .with_attribute("availability_zone", serde_json::json!("us-east-1b")),
            DiscoveredResource::new(ResourceKind::Subnet, "sub-1")
                .with_cidr_block("10.0.1.0/24")
                .with_attribute("vpc_id", serde_json::json!("net-123"))
                .with_attribute("availability_zone", serde_json::json!("us-east-1a")),
        ],
        internet_gateways: vec![
            DiscoveredResource::new(ResourceKind::InternetGateway, "igw-1")
                .with_attribute("vpc_id", serde_json::json!("net-123")),
        ],
        route_tables: vec![],
        security_groups: vec![],
    }
}
