//! Types for reading ToC files
//!

use bon::Builder;
use indexmap::{map::Entry, IndexMap};
use std::io::{Read, Seek};
use tracing::{debug, instrument, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    cursor::AssetCursor,
    error::{Error, Field, Result},
    types::{Region, ToCHeader},
    MAGIC, RECORD_SIZE, RESERVED_BLOCK_SIZE, TYPE_TABLE_HEADER_SIZE,
};

/// Upper bound on records allocated up front, the declared count is not trusted
const MAX_PREALLOCATED_RECORDS: u32 = 1 << 16;

/// How the type description table in front of the record table is skipped
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum TypeTableSkip {
    /// Skip 32 bytes plus one byte per type
    #[default]
    Bytewise,

    /// Skip one 32 byte descriptor per type
    Descriptors,
}

impl TypeTableSkip {
    /// Number of bytes between the end of the reserved block and the record table
    pub fn skip_len(&self, num_types: u32) -> i64 {
        // TODO: confirm the bytewise layout against an archive with a non-zero type count
        match self {
            TypeTableSkip::Bytewise => TYPE_TABLE_HEADER_SIZE + num_types as i64,
            TypeTableSkip::Descriptors => TYPE_TABLE_HEADER_SIZE * num_types as i64,
        }
    }
}

/// Options used while decoding a ToC file
///
/// ```
/// use stingray_toc::{DecodeOptions, TypeTableSkip};
///
/// let options = DecodeOptions::builder()
///     .type_table(TypeTableSkip::Descriptors)
///     .build();
/// assert_eq!(options.type_table, TypeTableSkip::Descriptors);
/// ```
#[derive(Debug, Default, Clone, Copy, Builder)]
pub struct DecodeOptions {
    /// How to skip the type description table
    #[builder(default)]
    pub type_table: TypeTableSkip,
}

/// Decoded table of contents of a StingRay archive
///
/// ```no_run
/// use std::io::prelude::*;
///
/// fn list_toc_contents(reader: impl Read + Seek) -> stingray_toc::error::Result<()> {
///     let toc = stingray_toc::ToCFile::new(reader)?;
///
///     for (file_id, header) in toc.iter() {
///         println!("{:016x}: type {:016x}", file_id, header.type_id);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ToCFile {
    /// Always [`MAGIC`] for a decoded file
    #[cfg_attr(feature = "serde", serde(alias = "Magic"))]
    pub magic: u32,

    /// Number of types in the type description table
    #[cfg_attr(feature = "serde", serde(alias = "NumTypes"))]
    pub num_types: u32,

    /// Number of records the header declares
    #[cfg_attr(feature = "serde", serde(alias = "NumFiles"))]
    pub num_files: u32,

    #[cfg_attr(feature = "serde", serde(alias = "Unknown"))]
    pub unknown: u32,

    #[cfg_attr(
        feature = "serde",
        serde(alias = "Unk4Data", with = "crate::interchange::reserved_block")
    )]
    pub reserved_block: [u8; RESERVED_BLOCK_SIZE],

    /// Records keyed by file id, in record table order
    #[cfg_attr(
        feature = "serde",
        serde(
            alias = "ToCEntries",
            default,
            deserialize_with = "crate::interchange::entries::deserialize"
        )
    )]
    pub entries: IndexMap<u64, ToCHeader>,
}

impl Default for ToCFile {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            num_types: Default::default(),
            num_files: Default::default(),
            unknown: Default::default(),
            reserved_block: [0; RESERVED_BLOCK_SIZE],
            entries: Default::default(),
        }
    }
}

impl ToCFile {
    /// Read a ToC file from the current position of `reader`.
    pub fn new<R: Read + Seek>(reader: R) -> Result<ToCFile> {
        Self::with_options(reader, DecodeOptions::default())
    }

    /// Read a ToC file from the current position of `reader` using custom options.
    pub fn with_options<R: Read + Seek>(reader: R, options: DecodeOptions) -> Result<ToCFile> {
        let mut cursor = AssetCursor::new(reader)?;
        Self::decode_with(&mut cursor, options)
    }

    /// Decode a ToC file from a cursor positioned at its magic number.
    pub fn decode<R: Read + Seek>(cursor: &mut AssetCursor<R>) -> Result<ToCFile> {
        Self::decode_with(cursor, DecodeOptions::default())
    }

    /// Decode a ToC file from a cursor positioned at its magic number using custom options.
    ///
    /// Either every declared record is decoded or an error is returned, no partial table is kept.
    #[instrument(skip(cursor), err)]
    pub fn decode_with<R: Read + Seek>(
        cursor: &mut AssetCursor<R>,
        options: DecodeOptions,
    ) -> Result<ToCFile> {
        let magic = cursor
            .read_u32()
            .map_err(Error::truncated(Field::Magic))?;
        if magic != MAGIC {
            return Err(Error::FormatMismatch { found: magic });
        }

        let num_types = cursor
            .read_u32()
            .map_err(Error::truncated(Field::NumTypes))?;
        let num_files = cursor
            .read_u32()
            .map_err(Error::truncated(Field::NumFiles))?;
        let unknown = cursor
            .read_u32()
            .map_err(Error::truncated(Field::Unknown))?;

        let mut reserved_block = [0u8; RESERVED_BLOCK_SIZE];
        cursor
            .read_bytes(&mut reserved_block)
            .map_err(Error::truncated(Field::ReservedBlock))?;

        cursor
            .seek_relative(options.type_table.skip_len(num_types))
            .map_err(Error::truncated(Field::TypeTable))?;
        let table_start = cursor.position();
        debug!(num_types, num_files, table_start, "read toc header");

        let entries = Self::get_entries(cursor, table_start, num_files)?;

        Ok(ToCFile {
            magic,
            num_types,
            num_files,
            unknown,
            reserved_block,
            entries,
        })
    }

    fn get_entries<R: Read + Seek>(
        cursor: &mut AssetCursor<R>,
        table_start: u64,
        num_files: u32,
    ) -> Result<IndexMap<u64, ToCHeader>> {
        let mut entries =
            IndexMap::with_capacity(num_files.min(MAX_PREALLOCATED_RECORDS) as usize);

        for index in 0..num_files {
            cursor
                .seek_absolute(table_start + index as u64 * RECORD_SIZE)
                .map_err(Error::truncated(Field::Record(index)))?;

            let header = cursor
                .read_record::<ToCHeader>()
                .map_err(|source| Error::TruncatedInput {
                    field: Field::Record(index),
                    source,
                })?;
            debug!(file_id = header.file_id, index, "read record");

            match entries.entry(header.file_id) {
                Entry::Occupied(_) => {
                    warn!(
                        file_id = header.file_id,
                        index,
                        count = num_files,
                        "duplicate file id"
                    );
                    return Err(Error::DuplicateFileId {
                        file_id: header.file_id,
                        index,
                        count: num_files,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(header);
                }
            }
        }

        Ok(entries)
    }

    /// Number of records contained in this ToC.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether this ToC contains no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a reference to the records in this file
    pub fn entries(&self) -> &IndexMap<u64, ToCHeader> {
        &self.entries
    }

    /// Iterate over the records in record table order
    pub fn iter(&self) -> impl Iterator<Item = (&u64, &ToCHeader)> {
        self.entries.iter()
    }

    /// Returns an iterator over all the file ids in this ToC.
    pub fn file_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }

    /// Whether a record exists for this file id
    pub fn contains(&self, file_id: u64) -> bool {
        self.entries.contains_key(&file_id)
    }

    /// Try to get a record by it's file id
    pub fn by_id(&self, file_id: u64) -> Option<&ToCHeader> {
        self.entries.get(&file_id)
    }

    /// Get a record by it's position in the record table
    #[inline(always)]
    pub fn by_index(&self, index: usize) -> Option<&ToCHeader> {
        self.entries.get_index(index).map(|(_, header)| header)
    }

    /// Total size of every record's data in a region, if it fits in a `u64`.
    pub fn total_size(&self, region: Region) -> Option<u64> {
        let mut total = 0u64;
        for header in self.entries.values() {
            total = total.checked_add(header.size(region) as u64)?;
        }
        Some(total)
    }

    /// Number of records for each type id, in order of first appearance
    pub fn type_counts(&self) -> IndexMap<u64, usize> {
        let mut counts = IndexMap::new();
        for header in self.entries.values() {
            *counts.entry(header.type_id).or_insert(0) += 1;
        }
        counts
    }
}
