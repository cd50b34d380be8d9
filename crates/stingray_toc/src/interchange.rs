//! JSON representation of a decoded ToC
//!
//! Field names follow the record layout (`fileID`, `tocDataOffset`, ...). The names written by
//! older tooling (`FileID`, `ToCDataOffset`, `Unk4Data`, ...) are accepted when reading.
//!
//! Parsing holds a document to what decoding an archive could produce: the magic must match,
//! every entry is keyed by its own file id, no key repeats and the record count agrees with
//! `numFiles`.

use tracing::warn;

use crate::{
    error::{Error, Result},
    read::ToCFile,
    MAGIC,
};

impl ToCFile {
    /// Serialize to a compact JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to an indented JSON string
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a ToC previously written with [`ToCFile::to_json`]
    pub fn from_json(json: impl AsRef<str>) -> Result<ToCFile> {
        let toc: ToCFile = serde_json::from_str(json.as_ref())?;

        if toc.magic != MAGIC {
            return Err(Error::FormatMismatch { found: toc.magic });
        }

        if toc.len() != toc.num_files as usize {
            warn!(
                declared = toc.num_files,
                found = toc.len(),
                "record count mismatch"
            );
            return Err(Error::RecordCountMismatch {
                declared: toc.num_files,
                found: toc.len(),
            });
        }

        Ok(toc)
    }
}

/// Deserializes the entry map, rejecting repeated keys and keys that differ from the record
pub(crate) mod entries {
    use std::fmt;

    use indexmap::{map::Entry, IndexMap};
    use serde::{
        de::{self, MapAccess, Visitor},
        Deserializer,
    };

    use crate::types::ToCHeader;

    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = IndexMap<u64, ToCHeader>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "a map of file ids to records")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = IndexMap::with_capacity(access.size_hint().unwrap_or(0));

            while let Some((file_id, header)) = access.next_entry::<u64, ToCHeader>()? {
                if header.file_id != file_id {
                    return Err(de::Error::custom(format!(
                        "entry {:#018x} holds the record of file id {:#018x}",
                        file_id, header.file_id
                    )));
                }

                match entries.entry(file_id) {
                    Entry::Occupied(_) => {
                        return Err(de::Error::custom(format!(
                            "duplicate file id {:#018x}",
                            file_id
                        )));
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(header);
                    }
                }
            }

            Ok(entries)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<IndexMap<u64, ToCHeader>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// (De)serializes the reserved block as a list of byte values
pub(crate) mod reserved_block {
    use std::fmt;

    use serde::{
        de::{self, SeqAccess, Visitor},
        ser::SerializeSeq,
        Deserializer, Serializer,
    };

    use crate::RESERVED_BLOCK_SIZE;

    pub fn serialize<S>(block: &[u8; RESERVED_BLOCK_SIZE], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(RESERVED_BLOCK_SIZE))?;
        for byte in block {
            seq.serialize_element(byte)?;
        }
        seq.end()
    }

    struct ReservedBlockVisitor;

    impl<'de> Visitor<'de> for ReservedBlockVisitor {
        type Value = [u8; RESERVED_BLOCK_SIZE];

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "a list of {} bytes", RESERVED_BLOCK_SIZE)
        }

        fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut block = [0u8; RESERVED_BLOCK_SIZE];
            for (i, byte) in block.iter_mut().enumerate() {
                *byte = access
                    .next_element()?
                    .ok_or_else(|| <A::Error as de::Error>::invalid_length(i, &self))?;
            }

            if access.next_element::<u8>()?.is_some() {
                return Err(de::Error::invalid_length(RESERVED_BLOCK_SIZE + 1, &self));
            }

            Ok(block)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; RESERVED_BLOCK_SIZE], D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(ReservedBlockVisitor)
    }
}
