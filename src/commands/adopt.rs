use crate::config::{self, AdoptConfig};
use crate::context::Context;
use crate::discovery::{Ec2NetworkDiscovery, NetworkDiscovery, NetworkTopology};
use crate::reconcile::{
    AddressingConfig, ReconcileOptions, ReconcileWorkflow, directives_for, write_import_script,
};
use crate::scaffold::{ModuleScaffolder, tfvars};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Full pipeline: discover the VPC's network, scaffold the module tree,
/// render variables, then drive init/import/plan/apply
#[derive(Debug, Args)]
pub struct AdoptCommand {
    /// AWS region to query
    #[arg(short, long, env = "AWS_REGION")]
    region: Option<String>,

    /// ID of the VPC to adopt
    #[arg(long)]
    vpc_id: Option<String>,

    /// Target directory for the module tree (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Path to the configuration file
    #[arg(short, long, default_value = config::CONFIG_FILE)]
    config: PathBuf,

    /// Provisioning tool to drive (terraform or opentofu)
    #[arg(short, long)]
    executor: Option<String>,

    /// Stop after plan instead of applying
    #[arg(long)]
    skip_apply: bool,

    /// Write an executable import script instead of running the imports
    #[arg(long)]
    script_only: bool,
}

impl AdoptCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let file_config = AdoptConfig::load(ctx.fs.as_ref(), &self.config)?;
        let region = config::resolve_region(self.region.as_deref(), &file_config)?;
        let vpc_id =
            config::resolve_vpc_id(self.vpc_id.as_deref(), &file_config, ctx.input.as_ref())?;
        let executor_name = config::resolve_executor(self.executor.as_deref(), &file_config);

        // Discovery runs before anything touches the filesystem, so an
        // unknown VPC ID aborts with a clean tree.
        ctx.output.info(&format!(
            "Discovering network of {} in {}...",
            vpc_id, region
        ));
        let discovery = Ec2NetworkDiscovery::new(region).await;
        let topology = discovery.discover(&vpc_id).await?;
        ctx.output.success(&format!(
            "Discovered {} resources",
            topology.resource_count()
        ));

        self.reconcile(ctx, &topology, &file_config.addressing, &executor_name)
    }

    fn reconcile(
        &self,
        ctx: &Context,
        topology: &NetworkTopology,
        addressing: &AddressingConfig,
        executor_name: &str,
    ) -> Result<()> {
        ctx.output.section("Scaffold");
        let written = ModuleScaffolder::new(ctx.fs.as_ref()).scaffold(&self.dir)?;
        for path in &written {
            ctx.output.success(&format!("Generated: {}", path.display()));
        }

        let tfvars_path = tfvars::write_tfvars(ctx.fs.as_ref(), &self.dir, topology)?;
        ctx.output
            .success(&format!("Generated: {}", tfvars_path.display()));

        let directives = directives_for(topology, addressing);
        let executor = ctx.executor_registry.get(executor_name)?;

        if self.script_only {
            let script_path = self.dir.join("import.sh");
            write_import_script(ctx.fs.as_ref(), &script_path, executor.binary(), &directives)?;
            ctx.output
                .success(&format!("Generated: {}", script_path.display()));
            ctx.output
                .info("Review and run the script, then plan and apply manually");
            return Ok(());
        }

        ctx.output.section("Reconcile");
        let options = ReconcileOptions {
            run_apply: !self.skip_apply,
        };
        let workflow = ReconcileWorkflow::new(executor.as_ref(), ctx.output.as_ref(), options);
        let report = workflow.execute(&directives, &self.dir)?;

        ctx.output.section("Summary");
        ctx.output
            .key_value("Imports attempted", &report.outcomes.len().to_string());
        ctx.output
            .key_value("Succeeded", &report.succeeded_count().to_string());
        ctx.output
            .key_value("Failed", &report.failed_count().to_string());

        if report.failed_count() > 0 {
            ctx.output.info(
                "Failed attempts usually mean the resource is already under management; the plan above is authoritative",
            );
        }

        ctx.output.success(&format!(
            "Adoption of {} complete",
            topology.vpc.resource_id
        ));
        Ok(())
    }
}
