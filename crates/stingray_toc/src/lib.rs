//! This library handles reading the **ToC** (table of contents) of *StingRay* game asset archives.
//!
//! # ToC Format Documentation
//!
//! A StingRay asset archive is split across up to three files sharing a base name: the ToC file
//! itself (no extension), a `.stream` file and a `.gpu_resources` file. The ToC file carries the
//! index of every asset in the archive along with any data small enough to live next to it.
//!
//! ## File Structure
//!
//! A ToC file consists of a header, a type description table, the record table, and ToC resident data.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: 0xF0000011                                        |
//! | 0x0004         | Type Count             | 4 bytes: Number of entries in the type description table   |
//! | 0x0008         | File Count             | 4 bytes: Number of records in the archive                  |
//! | 0x000C         | Unknown                | 4 bytes: Currently unknown purpose                         |
//! | 0x0010         | Reserved               | 56 bytes: Currently unknown purpose                        |
//! | 0x0048         | Type Table             | 32 bytes plus a region sized by the type count             |
//!
//! ### Header
//!
//! - **Magic Number**: A 4-byte identifier set to `0xF0000011`. Nothing past it is trusted unless it matches.
//! - **Type Count**: A 4-byte unsigned integer used to size the type description table.
//! - **File Count**: A 4-byte unsigned integer indicating the number of records in the archive.
//! - **Unknown** and **Reserved**: Preserved verbatim, never interpreted.
//!
//! ### Type Table
//!
//! The type description table is not modeled. It is skipped according to
//! [`read::TypeTableSkip`], and the position right after it is where the record table starts.
//!
//! ### Record Table
//!
//! The record table is a sequence of fixed size records, one per file. Record `i` always starts at
//! `table_start + i * 80`. Each record has the following structure:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | File ID                | 8 bytes: Identifier of the asset, unique in the archive |
//! | 0x0008         | Type ID                | 8 bytes: Asset type tag                                 |
//! | 0x0010         | ToC Data Offset        | 8 bytes: Offset of the data inside the ToC file         |
//! | 0x0018         | Stream Offset          | 8 bytes: Offset of the data inside the `.stream` file   |
//! | 0x0020         | GPU Resource Offset    | 8 bytes: Offset inside the `.gpu_resources` file        |
//! | 0x0028         | Unknown 1              | 8 bytes: Currently unknown purpose                      |
//! | 0x0030         | Unknown 2              | 8 bytes: Currently unknown purpose                      |
//! | 0x0038         | ToC Data Size          | 4 bytes: Size of the data inside the ToC file           |
//! | 0x003C         | Stream Size            | 4 bytes: Size of the data inside the `.stream` file     |
//! | 0x0040         | GPU Resource Size      | 4 bytes: Size inside the `.gpu_resources` file          |
//! | 0x0044         | Unknown 3              | 4 bytes: Currently unknown purpose                      |
//! | 0x0048         | Unknown 4              | 4 bytes: Currently unknown purpose                      |
//! | 0x004C         | Entry Index            | 4 bytes: Declared position of the record                |
//!
//! A size of zero means the asset has no data in that region.
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Record Size**: 80 bytes
//!

pub mod cursor;
pub mod error;
pub mod read;
#[cfg(feature = "serde")]
pub mod interchange;
pub mod types;

pub use cursor::AssetCursor;
pub use read::{DecodeOptions, ToCFile, TypeTableSkip};
pub use types::{Region, ToCHeader};

/// Magic number every ToC file starts with
pub const MAGIC: u32 = 0xF000_0011;

/// Size of a single record in the record table
pub const RECORD_SIZE: u64 = 80;

/// Size of the fixed part of the type description table
pub const TYPE_TABLE_HEADER_SIZE: i64 = 32;

/// Size of the reserved block following the header fields
pub const RESERVED_BLOCK_SIZE: usize = 56;
