//! Rendering of discovered attributes into terraform.tfvars.
//!
//! Emission is deterministic: kinds in import order, entries sorted by
//! resource ID, tag keys sorted. String values are always quoted and
//! escaped; a malformed render would poison every later step, so the
//! escaping rules get their own tests.

use crate::discovery::{DiscoveredResource, NetworkTopology, ResourceKind};
use crate::traits::FileSystem;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Render the variable file for a discovered topology
pub fn render_tfvars(topology: &NetworkTopology) -> String {
    let mut out = String::new();
    out.push_str(&format!("aws_region = {}\n", hcl_string(&topology.region)));

    for kind in ResourceKind::ordered() {
        out.push('\n');
        render_kind_block(&mut out, topology, kind);
    }

    out
}

/// Write terraform.tfvars into the scaffolded root, overwriting any
/// existing file
pub fn write_tfvars(
    fs: &dyn FileSystem,
    root: &Path,
    topology: &NetworkTopology,
) -> Result<PathBuf> {
    let path = root.join("terraform.tfvars");
    fs.write(&path, &render_tfvars(topology))?;
    Ok(path)
}

fn render_kind_block(out: &mut String, topology: &NetworkTopology, kind: ResourceKind) {
    let mut resources: Vec<&DiscoveredResource> = match kind {
        ResourceKind::Vpc => vec![&topology.vpc],
        _ => topology.children_of(kind).iter().collect(),
    };
    resources.sort_by(|a, b| a.resource_id.cmp(&b.resource_id));

    out.push_str(&format!("{} = {{", kind.config_key()));

    if resources.is_empty() {
        out.push_str("}\n");
        return;
    }

    out.push('\n');
    for resource in resources {
        out.push_str(&format!("  {} = {{\n", hcl_string(&resource.resource_id)));
        for (key, value) in entry_fields(resource) {
            out.push_str(&format!("    {} = {}\n", key, value));
        }
        out.push_str(&render_tags(resource));
        out.push_str("  }\n");
    }
    out.push_str("}\n");
}

/// Per-kind field list, matching the object types the scaffolded variables
/// declare
fn entry_fields(resource: &DiscoveredResource) -> Vec<(&'static str, String)> {
    let cidr = hcl_string(resource.cidr_block.as_deref().unwrap_or_default());

    match resource.kind {
        ResourceKind::Vpc => vec![
            ("cidr_block", cidr),
            (
                "enable_dns_support",
                resource.attribute_bool("enable_dns_support", true).to_string(),
            ),
            (
                "enable_dns_hostnames",
                resource
                    .attribute_bool("enable_dns_hostnames", true)
                    .to_string(),
            ),
        ],
        ResourceKind::Subnet => vec![
            ("vpc_id", hcl_string(resource.attribute_str("vpc_id"))),
            ("cidr_block", cidr),
            (
                "availability_zone",
                hcl_string(resource.attribute_str("availability_zone")),
            ),
        ],
        ResourceKind::InternetGateway | ResourceKind::RouteTable => vec![(
            "vpc_id",
            hcl_string(resource.attribute_str("vpc_id")),
        )],
        ResourceKind::SecurityGroup => vec![
            ("name", hcl_string(resource.attribute_str("name"))),
            (
                "description",
                hcl_string(resource.attribute_str("description")),
            ),
            ("vpc_id", hcl_string(resource.attribute_str("vpc_id"))),
        ],
    }
}

fn render_tags(resource: &DiscoveredResource) -> String {
    if resource.tags.is_empty() {
        return "    tags = {}\n".to_string();
    }

    let mut out = String::from("    tags = {\n");
    // BTreeMap iteration keeps tag keys sorted
    for (key, value) in &resource.tags {
        out.push_str(&format!(
            "      {} = {}\n",
            hcl_string(key),
            hcl_string(value)
        ));
    }
    out.push_str("    }\n");
    out
}

fn hcl_string(s: &str) -> String {
    format!("\"{}\"", escape_hcl_string(s))
}

/// Escape special characters in HCL strings
fn escape_hcl_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::sample_topology;
    use crate::traits::MockFileSystem;

    #[test]
    fn test_escape_hcl_string() {
        assert_eq!(escape_hcl_string("plain"), "plain");
        assert_eq!(escape_hcl_string("a\"b"), "a\\\"b");
        assert_eq!(escape_hcl_string("a\\b"), "a\\\\b");
        assert_eq!(escape_hcl_string("line1\nline2"), "line1\\nline2");
        assert_eq!(escape_hcl_string("tab\there"), "tab\\there");
    }

    #[test]
    fn test_render_region_and_vpc_entry() {
        let rendered = render_tfvars(&sample_topology());

        assert!(rendered.starts_with("aws_region = \"us-east-1\"\n"));
        assert!(rendered.contains("vpc_configs = {\n  \"net-123\" = {"));
        assert!(rendered.contains("    cidr_block = \"10.0.0.0/16\"\n"));
        assert!(rendered.contains("    enable_dns_support = true\n"));
        assert!(rendered.contains("    enable_dns_hostnames = true\n"));
        assert!(rendered.contains("      \"Name\" = \"main\"\n"));
    }

    #[test]
    fn test_render_sorts_entries_by_id() {
        let rendered = render_tfvars(&sample_topology());

        // sample_topology lists sub-2 before sub-1; the render must not
        let pos_1 = rendered.find("\"sub-1\"").unwrap();
        let pos_2 = rendered.find("\"sub-2\"").unwrap();
        assert!(pos_1 < pos_2);
    }

    #[test]
    fn test_render_empty_kinds_as_empty_maps() {
        let rendered = render_tfvars(&sample_topology());

        assert!(rendered.contains("route_table_configs = {}\n"));
        assert!(rendered.contains("security_group_configs = {}\n"));
    }

    #[test]
    fn test_render_subnet_fields() {
        let rendered = render_tfvars(&sample_topology());

        let subnet_block = &rendered[rendered.find("\"sub-1\"").unwrap()..];
        assert!(subnet_block.contains("    vpc_id = \"net-123\"\n"));
        assert!(subnet_block.contains("    cidr_block = \"10.0.1.0/24\"\n"));
        assert!(subnet_block.contains("    availability_zone = \"us-east-1a\"\n"));
        assert!(subnet_block.contains("    tags = {}\n"));
    }

    #[test]
    fn test_render_escapes_tag_values() {
        let mut topology = sample_topology();
        topology.vpc = topology.vpc.with_tag("Team", "core \"platform\"");

        let rendered = render_tfvars(&topology);
        assert!(rendered.contains("\"Team\" = \"core \\\"platform\\\"\""));
    }

    #[test]
    fn test_write_tfvars_overwrites() {
        let fs = MockFileSystem::new();
        let root = Path::new("/work");
        fs.write(&root.join("terraform.tfvars"), "stale").unwrap();

        let path = write_tfvars(&fs, root, &sample_topology()).unwrap();

        let contents = fs.get_file_contents(&path).unwrap();
        assert!(!contents.contains("stale"));
        assert!(contents.contains("aws_region"));
    }
}
