use clap::Args;
use itertools::Itertools;
use miette::{miette, Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use std::{
    collections::HashMap,
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};
use stingray_toc::{Region, ToCFile, MAGIC};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::DecodeArgs;

#[derive(Args)]
pub struct ScanArgs {
    /// A directory holding ToC files
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    #[command(flatten)]
    decode: DecodeArgs,
}

fn starts_with_magic(path: &Path) -> bool {
    let mut magic = [0u8; 4];
    File::open(path)
        .and_then(|mut f| f.read_exact(&mut magic))
        .map(|_| u32::from_le_bytes(magic) == MAGIC)
        .unwrap_or(false)
}

/// Whether `path` looks like a ToC file, one without an extension next to its data files
fn is_candidate(path: &Path) -> bool {
    if path.extension().is_some() {
        return false;
    }

    [Region::Stream, Region::GpuResource]
        .iter()
        .any(|r| r.companion_path(path).is_file())
        || starts_with_magic(path)
}

#[derive(Debug, Default)]
struct ScanReport {
    decoded: Vec<(PathBuf, usize)>,
    failed: Vec<(PathBuf, String)>,
    owners: HashMap<u64, Vec<PathBuf>>,
}

impl ScanReport {
    fn add(&mut self, path: &Path, toc: &ToCFile) {
        for file_id in toc.file_ids() {
            self.owners
                .entry(file_id)
                .or_default()
                .push(path.to_path_buf());
        }
        self.decoded.push((path.to_path_buf(), toc.len()));
    }

    fn shared(&self) -> Vec<(&u64, &Vec<PathBuf>)> {
        self.owners
            .iter()
            .filter(|(_, paths)| paths.len() > 1)
            .sorted_by_key(|(id, _)| **id)
            .collect()
    }
}

impl ScanArgs {
    pub fn handle(&self) -> Result<()> {
        if !self.directory.is_dir() {
            return Err(miette!("{} is not a directory", self.directory.display()));
        }

        let candidates = WalkDir::new(&self.directory)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| is_candidate(p))
            .sorted()
            .collect::<Vec<_>>();

        if candidates.is_empty() {
            return Err(miette!("no ToC files found"));
        }

        let options = self.decode.options();
        let mut report = ScanReport::default();
        for path in candidates {
            let f = File::open(&path)
                .into_diagnostic()
                .context(format!("opening {}", path.display()))?;

            match ToCFile::with_options(f, options) {
                Ok(toc) => {
                    info!("{}: {} records", path.display(), toc.len());
                    report.add(&path, &toc);
                }
                Err(e) => {
                    warn!("{}: {}", path.display(), e);
                    report.failed.push((path, e.to_string()));
                }
            }
        }

        let shared = report.shared();
        for (file_id, paths) in &shared {
            debug!(
                "{:016x} is in {}",
                file_id,
                paths.iter().map(|p| p.display()).join(", ")
            );
        }

        let records: usize = report.decoded.iter().map(|(_, n)| n).sum();
        println!(
            "{} archives, {} records, {} file ids in more than one archive",
            report.decoded.len().green(),
            records,
            shared.len()
        );
        for (path, e) in &report.failed {
            println!("❌ {}: {}", path.display(), e.red());
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use stingray_toc::{ToCFile, ToCHeader};

    use super::ScanReport;

    fn toc(ids: &[u64]) -> ToCFile {
        ToCFile {
            num_files: ids.len() as u32,
            entries: ids
                .iter()
                .map(|id| {
                    (
                        *id,
                        ToCHeader {
                            file_id: *id,
                            ..Default::default()
                        },
                    )
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn shared_file_ids() {
        let mut report = ScanReport::default();
        report.add(&PathBuf::from("a"), &toc(&[1, 2, 3]));
        report.add(&PathBuf::from("b"), &toc(&[3, 4]));
        report.add(&PathBuf::from("c"), &toc(&[3, 1]));

        let shared = report.shared();

        assert_eq!(shared.len(), 2);
        assert_eq!(*shared[0].0, 1);
        assert_eq!(shared[0].1.len(), 2);
        assert_eq!(*shared[1].0, 3);
        assert_eq!(shared[1].1.len(), 3);
        assert_eq!(report.decoded.len(), 3);
    }
}
