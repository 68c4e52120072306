use crate::reconcile::directive::ImportDirective;
use crate::traits::FileSystem;
use anyhow::Result;
use std::path::Path;

/// Write a standalone import script: one tool invocation per directive,
/// with executable permission bits set. An alternative to running the
/// imports directly, for operators who want to review or stage them.
pub fn write_import_script(
    fs: &dyn FileSystem,
    path: &Path,
    binary: &str,
    directives: &[ImportDirective],
) -> Result<()> {
    let mut script = String::from("#!/usr/bin/env bash\nset -euo pipefail\n\n");

    for directive in directives {
        script.push_str(&format!(
            "{} import {} {}\n",
            binary,
            shell_quote(&directive.address),
            shell_quote(&directive.resource_id)
        ));
    }

    fs.write(path, &script)?;
    fs.set_executable(path)?;
    Ok(())
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
