//! Base types for structure of ToC file.

use binrw::{BinRead, BinWrite};
use derive_more::Display;
use std::{
    ops::Range,
    path::{Path, PathBuf},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the storage areas an asset's bytes can live in
#[derive(Display, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    /// Data stored inside the ToC file itself
    #[display("toc data")]
    ToCData,

    /// Data stored in the `.stream` file
    #[display("stream")]
    Stream,

    /// Data stored in the `.gpu_resources` file
    #[display("gpu resource")]
    GpuResource,
}

impl Region {
    /// Every region, in on-disk field order
    pub const ALL: [Region; 3] = [Region::ToCData, Region::Stream, Region::GpuResource];

    /// Path of the file holding this region's data for the ToC at `toc_path`
    pub fn companion_path(&self, toc_path: impl AsRef<Path>) -> PathBuf {
        let toc_path = toc_path.as_ref();
        let extension = match self {
            Region::ToCData => return toc_path.to_path_buf(),
            Region::Stream => "stream",
            Region::GpuResource => "gpu_resources",
        };

        let mut name = toc_path.as_os_str().to_owned();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    }
}

/// ToC file record
///
/// Defines an entry in the record table. Every record is exactly [`crate::RECORD_SIZE`] bytes.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ToCHeader {
    /// Identifier of the asset, unique within a ToC
    #[cfg_attr(feature = "serde", serde(rename = "fileID", alias = "FileID"))]
    pub file_id: u64,

    /// Asset type tag
    #[cfg_attr(feature = "serde", serde(rename = "typeID", alias = "TypeID"))]
    pub type_id: u64,

    /// Offset of the asset's data inside the ToC file
    #[cfg_attr(feature = "serde", serde(alias = "ToCDataOffset"))]
    pub toc_data_offset: u64,

    /// Offset of the asset's data inside the `.stream` file
    #[cfg_attr(feature = "serde", serde(alias = "StreamFileOffset"))]
    pub stream_file_offset: u64,

    /// Offset of the asset's data inside the `.gpu_resources` file
    #[cfg_attr(feature = "serde", serde(alias = "GPUResourceOffset"))]
    pub gpu_resource_offset: u64,

    #[cfg_attr(feature = "serde", serde(alias = "Unknown1"))]
    pub unknown1: u64,

    #[cfg_attr(feature = "serde", serde(alias = "Unknown2"))]
    pub unknown2: u64,

    /// Size of the asset's data inside the ToC file
    #[cfg_attr(feature = "serde", serde(alias = "ToCDataSize"))]
    pub toc_data_size: u32,

    /// Size of the asset's data inside the `.stream` file
    #[cfg_attr(feature = "serde", serde(alias = "StreamSize"))]
    pub stream_size: u32,

    /// Size of the asset's data inside the `.gpu_resources` file
    #[cfg_attr(feature = "serde", serde(alias = "GPUResourceSize"))]
    pub gpu_resource_size: u32,

    #[cfg_attr(feature = "serde", serde(alias = "Unknown3"))]
    pub unknown3: u32,

    #[cfg_attr(feature = "serde", serde(alias = "Unknown4"))]
    pub unknown4: u32,

    /// Declared position of this record, independent of where it sits in the table
    #[cfg_attr(feature = "serde", serde(alias = "EntryIndex"))]
    pub entry_index: u32,
}

impl ToCHeader {
    /// Offset of the asset's data in the given region
    pub fn offset(&self, region: Region) -> u64 {
        match region {
            Region::ToCData => self.toc_data_offset,
            Region::Stream => self.stream_file_offset,
            Region::GpuResource => self.gpu_resource_offset,
        }
    }

    /// Size of the asset's data in the given region
    pub fn size(&self, region: Region) -> u32 {
        match region {
            Region::ToCData => self.toc_data_size,
            Region::Stream => self.stream_size,
            Region::GpuResource => self.gpu_resource_size,
        }
    }

    /// Byte range of the asset's data in the given region, `None` when it has no data there
    pub fn region(&self, region: Region) -> Option<Range<u64>> {
        let size = self.size(region);
        if size == 0 {
            return None;
        }

        let start = self.offset(region);
        start.checked_add(size as u64).map(|end| start..end)
    }

    /// Byte range of the asset's data inside the ToC file
    pub fn toc_data_range(&self) -> Option<Range<u64>> {
        self.region(Region::ToCData)
    }

    /// Byte range of the asset's data inside the `.stream` file
    pub fn stream_range(&self) -> Option<Range<u64>> {
        self.region(Region::Stream)
    }

    /// Byte range of the asset's data inside the `.gpu_resources` file
    pub fn gpu_resource_range(&self) -> Option<Range<u64>> {
        self.region(Region::GpuResource)
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;
    use std::path::PathBuf;

    use binrw::BinRead;
    use binrw::BinWrite;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::{Region, ToCHeader};
    use crate::RECORD_SIZE;

    #[rustfmt::skip]
    const RECORD: [u8; 80] = [
        0x2A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // file id
        0x0E, 0x2B, 0x40, 0x6D, 0xFF, 0x34, 0x4B, 0x50, // type id
        0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // toc data offset
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // stream offset
        0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // gpu resource offset
        0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // unknown 1
        0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // unknown 2
        0x10, 0x00, 0x00, 0x00, // toc data size
        0x00, 0x00, 0x00, 0x00, // stream size
        0x20, 0x00, 0x00, 0x00, // gpu resource size
        0x03, 0x00, 0x00, 0x00, // unknown 3
        0x04, 0x00, 0x00, 0x00, // unknown 4
        0x07, 0x00, 0x00, 0x00, // entry index
    ];

    fn expected() -> ToCHeader {
        ToCHeader {
            file_id: 42,
            type_id: 0x504B_34FF_6D40_2B0E,
            toc_data_offset: 0x100,
            gpu_resource_offset: 0x1000,
            unknown1: 1,
            unknown2: 2,
            toc_data_size: 0x10,
            gpu_resource_size: 0x20,
            unknown3: 3,
            unknown4: 4,
            entry_index: 7,
            ..Default::default()
        }
    }

    #[test]
    fn read_record() -> Result<()> {
        let mut input = Cursor::new(RECORD.to_vec());

        assert_eq!(ToCHeader::read(&mut input)?, expected());
        assert_eq!(input.position(), RECORD_SIZE);

        Ok(())
    }

    #[test]
    fn write_record() -> Result<()> {
        let mut actual = Vec::new();
        expected().write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, RECORD.to_vec());

        Ok(())
    }

    #[test]
    fn read_short_record() {
        let mut input = Cursor::new(RECORD[..79].to_vec());
        assert!(ToCHeader::read(&mut input).is_err());
    }

    #[test]
    fn regions() {
        let header = expected();

        assert_eq!(header.toc_data_range(), Some(0x100..0x110));
        assert_eq!(header.stream_range(), None);
        assert_eq!(header.gpu_resource_range(), Some(0x1000..0x1020));
    }

    #[test]
    fn region_overflow_has_no_range() {
        let header = ToCHeader {
            stream_file_offset: u64::MAX,
            stream_size: 1,
            ..Default::default()
        };

        assert_eq!(header.stream_range(), None);
    }

    #[test]
    fn companion_paths() {
        let toc = PathBuf::from("data/2e24ba9dd702da5c");

        assert_eq!(Region::ToCData.companion_path(&toc), toc);
        assert_eq!(
            Region::Stream.companion_path(&toc),
            PathBuf::from("data/2e24ba9dd702da5c.stream")
        );
        assert_eq!(
            Region::GpuResource.companion_path(&toc),
            PathBuf::from("data/2e24ba9dd702da5c.gpu_resources")
        );
    }
}
