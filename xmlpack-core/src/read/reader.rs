use crate::codec::DocumentCodec;
use crate::domain::{MemberRow, ParsedRecord};
use crate::error::{Result, XmlpackError};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

fn open_err(path: &Path, source: ZipError) -> XmlpackError {
    XmlpackError::ArchiveOpen {
        path: path.to_path_buf(),
        source,
    }
}

pub fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let f = File::open(path).map_err(|e| open_err(path, ZipError::Io(e)))?;
    ZipArchive::new(f).map_err(|e| open_err(path, e))
}

/// Visits every file member in central-directory order. Directory order is
/// whatever the archive recorded; it need not follow the numeric member names.
pub fn for_each_member<F>(path: &Path, mut f: F) -> Result<()>
where
    F: FnMut(&str, &[u8]) -> Result<()>,
{
    let mut za = open_archive(path)?;
    let mut buf = Vec::new();
    for i in 0..za.len() {
        let mut m = za.by_index(i).map_err(|e| open_err(path, e))?;
        if m.is_dir() {
            continue;
        }
        buf.clear();
        m.read_to_end(&mut buf)?;
        f(m.name(), &buf)?;
    }
    Ok(())
}

/// Decodes every member of the archive. The first member that fails to
/// decode aborts the read; no partial result is returned.
pub fn read_all(path: &Path, codec: &dyn DocumentCodec) -> Result<Vec<ParsedRecord>> {
    let mut out = Vec::new();
    for_each_member(path, |_, doc| {
        out.push(codec.decode(doc)?);
        Ok(())
    })?;
    tracing::debug!(archive = %path.display(), records = out.len(), "archive read");
    Ok(out)
}

pub fn read_member(path: &Path, member: &str, codec: &dyn DocumentCodec) -> Result<ParsedRecord> {
    let mut za = open_archive(path)?;
    let mut m = za.by_name(member).map_err(|e| open_err(path, e))?;
    // declared sizes come from the archive itself; let the buffer grow as data arrives
    let mut buf = Vec::new();
    m.read_to_end(&mut buf)?;
    codec.decode(&buf)
}

pub fn list_members(path: &Path) -> Result<Vec<MemberRow>> {
    let mut za = open_archive(path)?;
    let mut rows = Vec::with_capacity(za.len());
    for i in 0..za.len() {
        let m = za.by_index_raw(i).map_err(|e| open_err(path, e))?;
        rows.push(MemberRow {
            name: m.name().to_string(),
            c_size: m.compressed_size(),
            u_size: m.size(),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::xml::XmlCodec;
    use crate::pack::writer::pack_members;

    const GOOD: &[u8] = br#"<root><var name="id" value="ab"/><var name="level" value="3"/><objects><object name="o"/></objects></root>"#;

    #[test]
    fn missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_all(&dir.path().join("nope.zip"), &XmlCodec).unwrap_err();
        assert!(matches!(err, XmlpackError::ArchiveOpen { .. }));
    }

    #[test]
    fn non_archive_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("junk.zip");
        std::fs::write(&p, b"definitely not a zip").unwrap();
        assert!(matches!(
            read_all(&p, &XmlCodec),
            Err(XmlpackError::ArchiveOpen { .. })
        ));
    }

    #[test]
    fn one_bad_member_fails_whole_read() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("0.zip");
        let members = vec![
            Ok(("0.xml".to_string(), GOOD.to_vec())),
            Ok(("1.xml".to_string(), b"<root/>".to_vec())),
        ];
        pack_members(&p, members).unwrap();
        assert!(matches!(
            read_all(&p, &XmlCodec),
            Err(XmlpackError::MalformedDocument(_))
        ));
    }

    #[test]
    fn listing_and_single_member() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("0.zip");
        pack_members(&p, vec![Ok(("0.xml".to_string(), GOOD.to_vec()))]).unwrap();

        let rows = list_members(&p).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "0.xml");
        assert_eq!(rows[0].u_size, GOOD.len() as u64);

        let r = read_member(&p, "0.xml", &XmlCodec).unwrap();
        assert_eq!(r.id, "ab");
        assert!(matches!(
            read_member(&p, "9.xml", &XmlCodec),
            Err(XmlpackError::ArchiveOpen { .. })
        ));
    }

    #[test]
    fn declared_member_size_is_not_trusted() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("0.zip");
        pack_members(&p, vec![Ok(("0.xml".to_string(), GOOD.to_vec()))]).unwrap();

        // claim a ~2 GiB uncompressed size in the central directory entry
        let mut raw = std::fs::read(&p).unwrap();
        let cd = raw
            .windows(4)
            .position(|w| w == b"PK\x01\x02")
            .expect("central directory entry");
        raw[cd + 24..cd + 28].copy_from_slice(&0x7FFF_FFF0u32.to_le_bytes());
        std::fs::write(&p, &raw).unwrap();
        assert_eq!(list_members(&p).unwrap()[0].u_size, 0x7FFF_FFF0);

        match read_member(&p, "0.xml", &XmlCodec) {
            Ok(r) => assert_eq!(r.id, "ab"),
            Err(e) => assert!(
                matches!(e, XmlpackError::ArchiveOpen { .. } | XmlpackError::Io(_)),
                "unexpected {e:?}"
            ),
        }
    }
}
