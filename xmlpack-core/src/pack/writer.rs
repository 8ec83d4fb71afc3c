use crate::codec::DocumentCodec;
use crate::config::{archive_name, member_name};
use crate::domain::ArchiveHandle;
use crate::error::{Result, XmlpackError};
use crate::generate::RecordGenerator;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

fn write_err(path: &Path) -> impl Fn(ZipError) -> XmlpackError + '_ {
    move |source| XmlpackError::ArchiveWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes `(name, bytes)` members into a new deflate archive at `out`, in
/// iteration order. Returns the member count.
pub fn pack_members<I>(out: &Path, members: I) -> Result<usize>
where
    I: IntoIterator<Item = Result<(String, Vec<u8>)>>,
{
    let on_err = write_err(out);
    let file = File::create(out).map_err(|e| on_err(ZipError::Io(e)))?;
    let mut zw = ZipWriter::new(file);
    let file_opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut n = 0usize;
    for member in members {
        let (name, bytes) = member?;
        zw.start_file(name, file_opts).map_err(&on_err)?;
        zw.write_all(&bytes).map_err(|e| on_err(ZipError::Io(e)))?;
        n += 1;
    }
    zw.finish().map_err(&on_err)?;
    Ok(n)
}

/// Builds archive `index` in `out_dir` from `record_count` freshly generated
/// records, one `{i}.xml` member each.
pub fn build_archive(
    out_dir: &Path,
    index: usize,
    record_count: usize,
    generator: &RecordGenerator,
    codec: &dyn DocumentCodec,
) -> Result<ArchiveHandle> {
    let name = archive_name(index);
    let path: PathBuf = out_dir.join(&name);

    let members = generator
        .generate(record_count)
        .enumerate()
        .map(|(i, rec)| -> Result<(String, Vec<u8>)> {
            Ok((member_name(i), codec.encode(&rec?)?))
        });
    let written = pack_members(&path, members)?;

    tracing::debug!(archive = %name, members = written, "archive built");
    Ok(ArchiveHandle { index, name, path })
}
