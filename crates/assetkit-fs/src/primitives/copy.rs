use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::{Error, Result};

/// Chunk size used for every stream copy.
pub const COPY_BUFFER_SIZE: usize = 4096;

/// Copy `reader` into `writer` in fixed-size chunks until end-of-stream.
///
/// `on_chunk` receives the running byte total after every write.
pub fn copy_stream<R, W>(reader: &mut R, writer: &mut W, mut on_chunk: impl FnMut(u64)) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = [0u8; COPY_BUFFER_SIZE];
    let mut copied = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Stream(e)),
        };
        writer.write_all(&buffer[..n]).map_err(Error::Stream)?;
        copied += n as u64;
        on_chunk(copied);
    }

    writer.flush().map_err(Error::Stream)?;
    Ok(copied)
}

/// Create (or truncate) `path` and fill it from `reader`.
///
/// Missing parent directories are created first. On error the partially
/// written file is left in place.
pub fn copy_to_file<R>(reader: &mut R, path: impl AsRef<Path>, on_chunk: impl FnMut(u64)) -> Result<u64>
where
    R: Read + ?Sized,
{
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut file = fs::File::create(path).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    copy_stream(reader, &mut file, on_chunk).map_err(|e| match e {
        Error::Stream(source) => Error::Copy {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

pub fn ensure_parent(path: impl AsRef<Path>) -> Result<()> {
    match path.as_ref().parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        fs::create_dir_all(path).map_err(|e| Error::CreateDir {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.0.len().min(buf.len()).min(7);
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn copies_across_many_chunks() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let mut out = Vec::new();
        let mut calls = 0;
        let copied = copy_stream(&mut Cursor::new(&data), &mut out, |_| calls += 1).unwrap();
        assert_eq!(copied, data.len() as u64);
        assert_eq!(out, data);
        assert_eq!(calls, data.len().div_ceil(COPY_BUFFER_SIZE));
    }

    #[test]
    fn short_reads_still_reach_end_of_stream() {
        let data = b"a stream that never reports its full length up front";
        let mut out = Vec::new();
        copy_stream(&mut Trickle(data), &mut out, |_| {}).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn copy_to_file_creates_parents_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/c.bin");
        copy_to_file(&mut Cursor::new(b"first version"), &path, |_| {}).unwrap();
        copy_to_file(&mut Cursor::new(b"second"), &path, |_| {}).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn running_total_is_reported() {
        let mut totals = Vec::new();
        let data = vec![1u8; COPY_BUFFER_SIZE + 10];
        copy_stream(&mut Cursor::new(&data), &mut io::sink(), |n| totals.push(n)).unwrap();
        assert_eq!(totals, vec![COPY_BUFFER_SIZE as u64, data.len() as u64]);
    }
}
