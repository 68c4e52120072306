use crate::config::{self, AdoptConfig};
use crate::context::Context;
use crate::discovery::{Ec2NetworkDiscovery, NetworkDiscovery, NetworkTopology, ResourceKind};
use crate::traits::Output;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Query AWS for an existing VPC's networking topology
#[derive(Debug, Args)]
pub struct DiscoverCommand {
    /// AWS region to query
    #[arg(short, long, env = "AWS_REGION")]
    region: Option<String>,

    /// ID of the VPC to discover
    #[arg(long)]
    vpc_id: Option<String>,

    /// Path to the configuration file
    #[arg(short, long, default_value = config::CONFIG_FILE)]
    config: PathBuf,

    /// Print the topology as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

impl DiscoverCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let file_config = AdoptConfig::load(ctx.fs.as_ref(), &self.config)?;
        let region = config::resolve_region(self.region.as_deref(), &file_config)?;
        let vpc_id =
            config::resolve_vpc_id(self.vpc_id.as_deref(), &file_config, ctx.input.as_ref())?;

        ctx.output.info(&format!(
            "Discovering network of {} in {}...",
            vpc_id, region
        ));

        let discovery = Ec2NetworkDiscovery::new(region).await;
        let topology = discovery.discover(&vpc_id).await?;

        if self.json {
            ctx.output.raw(&serde_json::to_string_pretty(&topology)?);
            return Ok(());
        }

        print_topology(ctx.output.as_ref(), &topology);
        Ok(())
    }
}

fn print_topology(output: &dyn Output, topology: &NetworkTopology) {
    output.section("Discovered topology");
    output.key_value("Region", &topology.region);
    output.key_value("VPC", &topology.vpc.display_string());
    if let Some(cidr) = &topology.vpc.cidr_block {
        output.key_value("CIDR", cidr);
    }

    for kind in ResourceKind::ordered() {
        if kind == ResourceKind::Vpc {
            continue;
        }

        let children = topology.children_of(kind);
        output.blank();
        output.key_value(kind.terraform_type(), &children.len().to_string());
        for child in children {
            output.info(&child.display_string());
        }
    }
}
