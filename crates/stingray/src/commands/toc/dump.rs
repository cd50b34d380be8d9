use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::Write, path::PathBuf};
use tracing::info;

use super::ArchiveArgs;

#[derive(Args)]
pub struct DumpArgs {
    #[command(flatten)]
    archive: ArchiveArgs,

    /// A target JSON file, stdout when missing
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Indent the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl DumpArgs {
    pub fn handle(&self) -> Result<()> {
        let toc = self.archive.read()?;

        let json = if self.pretty {
            toc.to_json_pretty()?
        } else {
            toc.to_json()?
        };

        let Some(output) = &self.output else {
            println!("{}", json);
            return Ok(());
        };

        info!("writing {}", output.display());
        let mut out = if !self.overwrite {
            File::create_new(output)
                .into_diagnostic()
                .context(format!("creating {}", output.display()))?
        } else {
            File::create(output)
                .into_diagnostic()
                .context(format!("creating {}", output.display()))?
        };

        out.write_all(json.as_bytes())
            .into_diagnostic()
            .context(format!("writing {}", output.display()))?;

        Ok(())
    }
}
