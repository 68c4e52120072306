use crate::discovery::{DiscoveredResource, NetworkTopology, ResourceKind};
use crate::scaffold::NETWORK_MODULE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a resource kind is addressed in the declared configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressMode {
    /// Keyed map access for resources declared with for_each:
    /// `module.network.aws_vpc.this["vpc-…"]`
    ForEach,
    /// Flat access for modules that declare the resource once:
    /// `module.network.aws_internet_gateway.this`
    Singleton,
}

/// Address construction settings.
///
/// Whether a kind is one-to-many or singleton-per-network is a property of
/// the declared module, so it is configuration here, not an assumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressingConfig {
    /// Name of the module the adopted resources live in
    pub module: String,
    /// Per-kind address mode; kinds not listed use for_each
    pub modes: BTreeMap<ResourceKind, AddressMode>,
}

impl Default for AddressingConfig {
    fn default() -> Self {
        Self {
            module: NETWORK_MODULE.to_string(),
            modes: BTreeMap::new(),
        }
    }
}

impl AddressingConfig {
    pub fn mode_for(&self, kind: ResourceKind) -> AddressMode {
        self.modes
            .get(&kind)
            .copied()
            .unwrap_or(AddressMode::ForEach)
    }

    /// The fully-qualified configuration address for one resource instance
    pub fn address_for(&self, kind: ResourceKind, resource_id: &str) -> String {
        match self.mode_for(kind) {
            AddressMode::ForEach => format!(
                "module.{}.{}.this[\"{}\"]",
                self.module,
                kind.terraform_type(),
                resource_id
            ),
            AddressMode::Singleton => {
                format!("module.{}.{}.this", self.module, kind.terraform_type())
            }
        }
    }
}

/// One binding of a declared configuration address to an existing resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDirective {
    pub kind: ResourceKind,
    pub address: String,
    pub resource_id: String,
}

/// Derive the import directives for a topology: one per resource instance,
/// VPC first, then children in kind order with IDs sorted for deterministic
/// output. Directives carry no state; they are consumed by the workflow and
/// discarded.
pub fn directives_for(
    topology: &NetworkTopology,
    addressing: &AddressingConfig,
) -> Vec<ImportDirective> {
    let mut directives = Vec::with_capacity(topology.resource_count());
    directives.push(directive(addressing, &topology.vpc));

    for kind in ResourceKind::ordered() {
        let mut children: Vec<&DiscoveredResource> = topology.children_of(kind).iter().collect();
        children.sort_by(|a, b| a.resource_id.cmp(&b.resource_id));
        directives.extend(children.into_iter().map(|r| directive(addressing, r)));
    }

    directives
}

fn directive(addressing: &AddressingConfig, resource: &DiscoveredResource) -> ImportDirective {
    ImportDirective {
        kind: resource.kind,
        address: addressing.address_for(resource.kind, &resource.resource_id),
        resource_id: resource.resource_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::sample_topology;
    use std::collections::HashSet;

    #[test]
    fn test_one_directive_per_resource_instance() {
        let topology = sample_topology();
        let directives = directives_for(&topology, &AddressingConfig::default());

        assert_eq!(directives.len(), topology.resource_count());
    }

    #[test]
    fn test_directive_order_parent_first_then_sorted_children() {
        let directives = directives_for(&sample_topology(), &AddressingConfig::default());

        let ids: Vec<&str> = directives.iter().map(|d| d.resource_id.as_str()).collect();
        assert_eq!(ids, vec!["net-123", "sub-1", "sub-2", "igw-1"]);
    }

    #[test]
    fn test_for_each_address_shape() {
        let addressing = AddressingConfig::default();

        assert_eq!(
            addressing.address_for(ResourceKind::Vpc, "vpc-1"),
            "module.network.aws_vpc.this[\"vpc-1\"]"
        );
        assert_eq!(
            addressing.address_for(ResourceKind::Subnet, "subnet-9"),
            "module.network.aws_subnet.this[\"subnet-9\"]"
        );
    }

    #[test]
    fn test_singleton_override() {
        let mut addressing = AddressingConfig::default();
        addressing
            .modes
            .insert(ResourceKind::InternetGateway, AddressMode::Singleton);

        assert_eq!(
            addressing.address_for(ResourceKind::InternetGateway, "igw-1"),
            "module.network.aws_internet_gateway.this"
        );
        // Other kinds keep the default
        assert_eq!(
            addressing.mode_for(ResourceKind::Subnet),
            AddressMode::ForEach
        );
    }

    #[test]
    fn test_custom_module_name() {
        let addressing = AddressingConfig {
            module: "vpc".to_string(),
            modes: BTreeMap::new(),
        };

        assert_eq!(
            addressing.address_for(ResourceKind::Vpc, "vpc-1"),
            "module.vpc.aws_vpc.this[\"vpc-1\"]"
        );
    }

    #[test]
    fn test_addresses_are_unique() {
        let directives = directives_for(&sample_topology(), &AddressingConfig::default());

        let addresses: HashSet<&str> = directives.iter().map(|d| d.address.as_str()).collect();
        assert_eq!(addresses.len(), directives.len());
    }

    #[test]
    fn test_addressing_config_yaml_round_trip() {
        let yaml = "module: network\nmodes:\n  internet_gateway: singleton\n";
        let addressing: AddressingConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(
            addressing.mode_for(ResourceKind::InternetGateway),
            AddressMode::Singleton
        );
        assert_eq!(addressing.mode_for(ResourceKind::Vpc), AddressMode::ForEach);
    }
}
