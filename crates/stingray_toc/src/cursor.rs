//! Positioned reader used to walk a ToC file
//!

use binrw::{meta::ReadEndian, BinRead, BinResult};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read, Seek, SeekFrom};

/// A reader over a ToC byte source that keeps track of its head
///
/// All integers are read as little endian. A failed read leaves the head where it was. The cursor is also [`Read`] and [`Seek`] so records
/// can be decoded straight from it with [`binrw::BinRead`].
///
/// ```no_run
/// use std::io::Cursor;
/// use stingray_toc::AssetCursor;
///
/// fn read_magic(data: Vec<u8>) -> std::io::Result<u32> {
///     let mut cursor = AssetCursor::new(Cursor::new(data))?;
///     cursor.read_u32()
/// }
/// ```
#[derive(Debug)]
pub struct AssetCursor<R> {
    inner: R,
    head: u64,
}

impl<R: Read + Seek> AssetCursor<R> {
    /// Wrap a byte source, starting from its current position
    pub fn new(mut inner: R) -> io::Result<Self> {
        let head = inner.stream_position()?;
        Ok(AssetCursor { inner, head })
    }

    /// Current absolute offset in the byte source
    pub fn position(&self) -> u64 {
        self.head
    }

    fn rewind_on_error<T, E: From<io::Error>>(
        &mut self,
        read: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let start = self.head;
        read(self).or_else(|e| {
            self.seek_absolute(start)?;
            Err(e)
        })
    }

    /// Read a little endian `u32`
    pub fn read_u32(&mut self) -> io::Result<u32> {
        self.rewind_on_error(|c| ReadBytesExt::read_u32::<LittleEndian>(c))
    }

    /// Read a little endian `u64`
    pub fn read_u64(&mut self) -> io::Result<u64> {
        self.rewind_on_error(|c| ReadBytesExt::read_u64::<LittleEndian>(c))
    }

    /// Fill `buf` completely, failing on a short read
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<()> {
        self.rewind_on_error(|c| c.read_exact(buf))
    }

    /// Decode a fixed-endian binrw record at the head
    pub fn read_record<T>(&mut self) -> BinResult<T>
    where
        T: BinRead + ReadEndian,
        for<'a> T::Args<'a>: Default,
    {
        self.rewind_on_error(|c| T::read(c))
    }

    /// Move the head by `offset` bytes from its current position
    pub fn seek_relative(&mut self, offset: i64) -> io::Result<u64> {
        self.seek(SeekFrom::Current(offset))
    }

    /// Move the head to `offset` bytes from the start of the byte source
    pub fn seek_absolute(&mut self, offset: u64) -> io::Result<u64> {
        self.seek(SeekFrom::Start(offset))
    }

    /// Unwrap and return the inner reader object
    ///
    /// The reader is left wherever the last operation put it.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for AssetCursor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.head += read as u64;
        Ok(read)
    }
}

impl<R: Seek> Seek for AssetCursor<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.head = self.inner.seek(pos)?;
        Ok(self.head)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.head)
    }
}

#[cfg(test)]
mod test {
    use std::io::{Cursor, ErrorKind};

    use pretty_assertions::assert_eq;

    use super::AssetCursor;
    use crate::{types::ToCHeader, RECORD_SIZE};

    #[test]
    fn read_integers_little_endian() -> std::io::Result<()> {
        #[rustfmt::skip]
        let mut cursor = AssetCursor::new(Cursor::new(vec![
            0x11, 0x00, 0x00, 0xF0,
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08,
        ]))?;

        assert_eq!(cursor.read_u32()?, 0xF000_0011);
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.read_u64()?, 0x0807_0605_0403_0201);
        assert_eq!(cursor.position(), 12);

        Ok(())
    }

    #[test]
    fn read_bytes_fills_buffer() -> std::io::Result<()> {
        let mut cursor = AssetCursor::new(Cursor::new(vec![1, 2, 3, 4, 5]))?;

        let mut buf = [0u8; 3];
        cursor.read_bytes(&mut buf)?;

        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(cursor.position(), 3);

        Ok(())
    }

    #[test]
    fn short_read_fails() -> std::io::Result<()> {
        let mut cursor = AssetCursor::new(Cursor::new(vec![1, 2, 3]))?;

        let err = cursor.read_u32().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
        assert_eq!(cursor.position(), 0);

        cursor.seek_absolute(1)?;
        let err = cursor.read_u64().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
        assert_eq!(cursor.position(), 1);

        let mut buf = [0u8; 4];
        cursor.seek_absolute(0)?;
        let err = cursor.read_bytes(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
        assert_eq!(cursor.position(), 0);

        // the head still matches the inner reader after a failed read
        assert_eq!(cursor.read_u32().unwrap_err().kind(), ErrorKind::UnexpectedEof);
        cursor.read_bytes(&mut buf[..2])?;
        assert_eq!(&buf[..2], &[1, 2]);
        assert_eq!(cursor.position(), 2);

        Ok(())
    }

    #[test]
    fn read_record_at_head() -> binrw::BinResult<()> {
        let mut data = vec![0xEEu8; 3];
        data.extend_from_slice(&42u64.to_le_bytes());
        data.extend_from_slice(&7u64.to_le_bytes());
        data.resize(3 + RECORD_SIZE as usize, 0);
        data[3 + 0x4C] = 5;

        let mut cursor = AssetCursor::new(Cursor::new(data))?;
        cursor.seek_absolute(3)?;
        let header: ToCHeader = cursor.read_record()?;

        assert_eq!(header.file_id, 42);
        assert_eq!(header.type_id, 7);
        assert_eq!(header.entry_index, 5);
        assert_eq!(cursor.position(), 3 + RECORD_SIZE);

        Ok(())
    }

    #[test]
    fn short_record_keeps_head() -> std::io::Result<()> {
        let mut cursor = AssetCursor::new(Cursor::new(vec![0u8; RECORD_SIZE as usize + 10]))?;
        cursor.seek_absolute(20)?;

        assert!(cursor.read_record::<ToCHeader>().is_err());
        assert_eq!(cursor.position(), 20);

        Ok(())
    }

    #[test]
    fn seeks_track_position() -> std::io::Result<()> {
        let mut cursor = AssetCursor::new(Cursor::new(vec![0u8; 16]))?;

        assert_eq!(cursor.seek_relative(6)?, 6);
        assert_eq!(cursor.seek_relative(-2)?, 4);
        assert_eq!(cursor.seek_absolute(12)?, 12);
        assert_eq!(cursor.position(), 12);

        Ok(())
    }

    #[test]
    fn seek_before_start_fails() -> std::io::Result<()> {
        let mut cursor = AssetCursor::new(Cursor::new(vec![0u8; 16]))?;
        cursor.seek_absolute(2)?;

        assert!(cursor.seek_relative(-3).is_err());
        assert_eq!(cursor.position(), 2);

        Ok(())
    }

    #[test]
    fn starts_at_current_position() -> std::io::Result<()> {
        let mut inner = Cursor::new(vec![0u8; 8]);
        inner.set_position(5);

        let cursor = AssetCursor::new(inner)?;
        assert_eq!(cursor.position(), 5);
        assert_eq!(cursor.into_inner().position(), 5);

        Ok(())
    }
}
