//! Matches command implementation

use super::loader_options;
use anyhow::{Result, bail};
use std::path::PathBuf;
use stitch_import::{GlobMatch, ImportLoader};

pub fn execute(pattern: &str, root: Option<PathBuf>, sorted: bool) -> Result<()> {
    let mut loader = ImportLoader::new(loader_options(root, sorted));

    let matches = match loader.resolver_mut().resolve(pattern) {
        Ok(matches) => matches,
        Err(err) => {
            eprint!("{}", err.to_diagnostic().to_text(None));
            bail!("failed to resolve {pattern}");
        }
    };

    for m in &matches {
        print!("{}", format_match(m));
    }
    Ok(())
}

fn format_match(m: &GlobMatch) -> String {
    let mut out = format!("{}\n", m.path.display());
    for (name, value) in &m.captures {
        out.push_str(&format!("  {name}: {value}\n"));
    }
    out
}
