use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::PersistError;

pub(crate) fn write_i32(w: &mut impl Write, v: i32) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

pub(crate) fn write_u32(w: &mut impl Write, v: u32) -> io::Result<()> {
    w.write_all(&v.to_le_bytes())
}

pub(crate) fn read_i32(r: &mut impl Read) -> Result<i32, PersistError> {
    let mut b = [0u8; 4];
    read_exact(r, &mut b)?;
    Ok(i32::from_le_bytes(b))
}

pub(crate) fn read_u32(r: &mut impl Read) -> Result<u32, PersistError> {
    let mut b = [0u8; 4];
    read_exact(r, &mut b)?;
    Ok(u32::from_le_bytes(b))
}

/// Like `Read::read_exact`, but a short read is reported as corrupt data.
pub(crate) fn read_exact(r: &mut impl Read, buf: &mut [u8]) -> Result<(), PersistError> {
    r.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            PersistError::Corrupt("unexpected end of file".to_string())
        } else {
            PersistError::Io(e)
        }
    })
}

/// Writes through a uniquely named sibling temp file and renames it over `path`,
/// so concurrent saves of the same file never share a temp file.
pub(crate) fn write_atomic(
    path: &Path,
    body: impl FnOnce(&mut io::BufWriter<&mut File>) -> io::Result<()>,
) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut w = io::BufWriter::new(tmp.as_file_mut());
        body(&mut w)?;
        w.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
