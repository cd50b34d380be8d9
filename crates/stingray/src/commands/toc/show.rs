use clap::Args;
use itertools::Itertools;
use miette::Result;
use owo_colors::OwoColorize;
use stingray_toc::{Region, ToCFile};

use super::ArchiveArgs;

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    archive: ArchiveArgs,

    /// List every record
    #[arg(short, long, default_value_t = false)]
    entries: bool,
}

impl ShowArgs {
    pub fn handle(&self) -> Result<()> {
        let toc = self.archive.read()?;

        println!("{}", self.archive.path().display().bold());
        print!("{}", summary(&toc));

        if self.entries {
            println!();
            print!("{}", entry_table(&toc));
        }

        Ok(())
    }
}

fn summary(toc: &ToCFile) -> String {
    let mut out = String::new();
    out.push_str(&format!("  magic:    {:#010x}\n", toc.magic));
    out.push_str(&format!("  types:    {}\n", toc.num_types));
    out.push_str(&format!("  files:    {}\n", toc.num_files));
    out.push_str(&format!("  unknown:  {:#010x}\n", toc.unknown));

    for region in Region::ALL {
        let present = toc.iter().filter(|(_, h)| h.region(region).is_some()).count();
        let total = toc
            .total_size(region)
            .map(|t| t.to_string())
            .unwrap_or("overflow".into());
        out.push_str(&format!(
            "  {}: {} records, {} bytes\n",
            region, present, total
        ));
    }

    out.push_str("  type ids:\n");
    for (type_id, count) in toc
        .type_counts()
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
    {
        out.push_str(&format!("    {:016x}: {}\n", type_id, count));
    }

    out
}

fn entry_table(toc: &ToCFile) -> String {
    let header = format!(
        "{:>6} {:>16} {:>16} {:>10} {:>10} {:>10}",
        "index", "file id", "type id", "toc data", "stream", "gpu"
    );

    std::iter::once(header.dimmed().to_string())
        .chain(toc.iter().map(|(file_id, h)| {
            format!(
                "{:>6} {:016x} {:016x} {:>10} {:>10} {:>10}",
                h.entry_index,
                file_id,
                h.type_id,
                h.toc_data_size,
                h.stream_size,
                h.gpu_resource_size
            )
        }))
        .map(|l| l + "\n")
        .collect()
}

#[cfg(test)]
mod test {
    use stingray_toc::{ToCFile, ToCHeader};

    use super::{entry_table, summary};

    fn toc() -> ToCFile {
        let records = [
            ToCHeader {
                file_id: 1,
                type_id: 0xAA,
                toc_data_size: 8,
                ..Default::default()
            },
            ToCHeader {
                file_id: 2,
                type_id: 0xAA,
                stream_size: 100,
                entry_index: 1,
                ..Default::default()
            },
        ];
        ToCFile {
            num_files: 2,
            entries: records.into_iter().map(|r| (r.file_id, r)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn summary_counts_regions() {
        let text = summary(&toc());

        assert!(text.contains("files:    2"));
        assert!(text.contains("toc data: 1 records, 8 bytes"));
        assert!(text.contains("stream: 1 records, 100 bytes"));
        assert!(text.contains("gpu resource: 0 records, 0 bytes"));
        assert!(text.contains("00000000000000aa: 2"));
    }

    #[test]
    fn entry_table_has_a_line_per_record() {
        let table = entry_table(&toc());

        assert_eq!(table.lines().count(), 3);
        assert!(table.contains("0000000000000002"));
    }
}
