use crate::context::Context;
use crate::scaffold::ModuleScaffolder;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Write the Terraform module tree for an adoption target
#[derive(Debug, Args)]
pub struct ScaffoldCommand {
    /// Target directory for the module tree (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,
}

impl ScaffoldCommand {
    pub fn execute(self, ctx: &Context) -> Result<()> {
        let written = ModuleScaffolder::new(ctx.fs.as_ref()).scaffold(&self.dir)?;

        for path in &written {
            ctx.output.success(&format!("Generated: {}", path.display()));
        }

        ctx.output
            .info("Next: run 'tfadopt adopt' to discover and import the network");
        Ok(())
    }
}
