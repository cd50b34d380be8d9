pub mod diff;
pub mod dump;
pub mod scan;
pub mod show;

use clap::{Args, ValueEnum};
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use stingray_toc::{DecodeOptions, ToCFile, TypeTableSkip};
use tracing::{error, info};

#[derive(clap::Subcommand)]
pub enum ToCCommands {
    /// Print a summary of a ToC file
    Show(show::ShowArgs),
    /// Write a ToC file as JSON
    Dump(dump::DumpArgs),
    /// Compare two ToC files
    Diff(diff::DiffArgs),
    /// Read every ToC file in a directory
    Scan(scan::ScanArgs),
}

impl ToCCommands {
    pub fn handle(&self) -> Result<()> {
        match self {
            ToCCommands::Show(show) => show.handle(),
            ToCCommands::Dump(dump) => dump.handle(),
            ToCCommands::Diff(diff) => diff.handle(),
            ToCCommands::Scan(scan) => scan.handle(),
        }
    }
}

/// How to skip the type description table
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TypeTable {
    /// 32 bytes plus one byte per type
    #[default]
    Bytewise,
    /// One 32 byte descriptor per type
    Descriptors,
}

impl From<TypeTable> for TypeTableSkip {
    fn from(value: TypeTable) -> Self {
        match value {
            TypeTable::Bytewise => TypeTableSkip::Bytewise,
            TypeTable::Descriptors => TypeTableSkip::Descriptors,
        }
    }
}

/// Options shared by every command reading ToC files
#[derive(Args, Debug, Default, Clone, Copy)]
pub struct DecodeArgs {
    /// How to skip the type description table
    #[arg(long, value_enum, default_value_t = TypeTable::Bytewise)]
    type_table: TypeTable,
}

impl DecodeArgs {
    pub fn options(&self) -> DecodeOptions {
        DecodeOptions::builder()
            .type_table(self.type_table.into())
            .build()
    }
}

/// A single input ToC file
#[derive(Args, Debug)]
pub struct ArchiveArgs {
    /// An input ToC file
    #[arg(short, long, value_name = "FILE", alias = "game-archive-id")]
    file: PathBuf,

    #[command(flatten)]
    decode: DecodeArgs,
}

impl ArchiveArgs {
    pub fn read(&self) -> Result<ToCFile> {
        read_toc(&self.file, self.decode.options())
    }

    pub fn path(&self) -> &Path {
        &self.file
    }
}

/// Open and decode the ToC at `path`
pub fn read_toc(path: &Path, options: DecodeOptions) -> Result<ToCFile> {
    if !path.try_exists().into_diagnostic()? {
        error!("{} does not exist", path.display());
        return Err(miette!("{} does not exist", path.display()));
    }

    let f = File::open(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))?;

    info!("reading {}", path.display());
    ToCFile::with_options(f, options).map_err(|e| {
        error!("failed to parse {}: {}", path.display(), e);
        miette::Report::new(e)
    })
}
