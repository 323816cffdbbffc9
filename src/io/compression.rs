//! Pluggable, transparent compression around adapter file handles.
//!
//! Adapters never see compressed bytes: [`auto_detect_reader`] and
//! [`auto_detect_writer`] wrap the raw file in a decoder/encoder picked from
//! the codec registry.
//!
//! ## Built-in Codecs
//!
//! - **Gzip** (`.gz`) - via `flate2` (feature: `compression-gzip`)
//! - **Zstd** (`.zst`) - via `zstd` (feature: `compression-zstd`)
//!
//! ## Detection
//!
//! Reads check the path extension first and fall back to magic bytes, so a
//! gzip file without a `.gz` suffix still decodes. Writes only look at the
//! extension. Format selection by extension uses
//! [`strip_codec_extension`] so `sales.csv.gz` resolves to the CSV adapter.
//!
//! ## Custom Codecs
//!
//! ```
//! use data_handling::io::compression::{register_codec, CompressionCodec, FinishWrite};
//! use std::io::{BufWriter, Read, Write};
//! use std::sync::Arc;
//!
//! struct Identity;
//!
//! impl CompressionCodec for Identity {
//!     fn name(&self) -> &str { "identity" }
//!     fn extensions(&self) -> &[&str] { &[".id"] }
//!     fn magic_bytes(&self) -> Option<&[u8]> { None }
//!     fn wrap_reader_dyn(&self, r: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> { Ok(r) }
//!     fn wrap_writer_dyn(&self, w: Box<dyn Write>) -> std::io::Result<Box<dyn FinishWrite>> {
//!         Ok(Box::new(BufWriter::new(w)))
//!     }
//! }
//!
//! register_codec(Arc::new(Identity));
//! ```

use crate::error::{DataIoError, Result};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

static CODEC_REGISTRY: RwLock<Option<Vec<Arc<dyn CompressionCodec>>>> = RwLock::new(None);

fn builtin_codecs() -> Vec<Arc<dyn CompressionCodec>> {
    vec![
        #[cfg(feature = "compression-gzip")]
        Arc::new(GzipCodec),
        #[cfg(feature = "compression-zstd")]
        Arc::new(ZstdCodec),
    ]
}

fn codecs() -> Vec<Arc<dyn CompressionCodec>> {
    if let Some(codecs) = CODEC_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return codecs.clone();
    }
    let mut lock = CODEC_REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    lock.get_or_insert_with(builtin_codecs).clone()
}

/// Register a custom compression codec for every subsequent read and write.
pub fn register_codec(codec: Arc<dyn CompressionCodec>) {
    log::debug!("registering compression codec '{}'", codec.name());
    let mut lock = CODEC_REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    lock.get_or_insert_with(builtin_codecs).push(codec);
}

/// A compression algorithm that can wrap readers and writers.
///
/// Implementations live in a process-wide registry and must be `Send + Sync`.
pub trait CompressionCodec: Send + Sync {
    /// Codec name used in log and error messages (e.g. "gzip").
    fn name(&self) -> &str;

    /// Lowercase extensions with the leading dot (e.g. `&[".gz"]`).
    fn extensions(&self) -> &[&str];

    /// Signature at the start of a compressed stream, if the format has one.
    fn magic_bytes(&self) -> Option<&[u8]>;

    /// Wrap a reader with decompression.
    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>>;

    /// Wrap a writer with compression.
    fn wrap_writer_dyn(&self, writer: Box<dyn Write>) -> std::io::Result<Box<dyn FinishWrite>>;
}

/// A writer that must be explicitly completed.
///
/// `finish` writes any trailer, flushes the underlying file and reports the
/// outcome. Dropping a writer without calling it is not an error, but a
/// failure during implicit completion is then lost.
pub trait FinishWrite: Write {
    /// Complete the stream and flush everything down to the file.
    fn finish(self: Box<Self>) -> std::io::Result<()>;
}

impl<W: Write> FinishWrite for BufWriter<W> {
    fn finish(self: Box<Self>) -> std::io::Result<()> {
        let mut inner = (*self).into_inner().map_err(|e| e.into_error())?;
        inner.flush()
    }
}

/// The codec whose extension ends `path`, if any. Case-insensitive.
pub fn codec_for_path(path: impl AsRef<Path>) -> Option<Arc<dyn CompressionCodec>> {
    let path_str = path.as_ref().to_string_lossy().to_lowercase();
    codecs()
        .into_iter()
        .find(|codec| codec.extensions().iter().any(|ext| path_str.ends_with(ext)))
}

/// The lowercase file name of `path` without a trailing codec extension.
///
/// `data/Sales.CSV.gz` becomes `sales.csv`; a path without a codec
/// extension is returned lowercased and otherwise unchanged.
pub fn strip_codec_extension(path: impl AsRef<Path>) -> String {
    let name = path
        .as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    for codec in codecs() {
        for ext in codec.extensions() {
            if let Some(stem) = name.strip_suffix(ext) {
                return stem.to_string();
            }
        }
    }
    name
}

fn detect_from_magic<R: BufRead>(reader: &mut R) -> Option<Arc<dyn CompressionCodec>> {
    let buf = reader.fill_buf().ok()?;
    if buf.is_empty() {
        return None;
    }
    codecs()
        .into_iter()
        .find(|codec| codec.magic_bytes().is_some_and(|magic| buf.starts_with(magic)))
}

/// Wrap `reader` with decompression when `path_hint` or the stream's first
/// bytes name a registered codec; otherwise return it buffered.
///
/// # Errors
/// Returns the classified I/O error if the codec cannot initialise.
pub fn auto_detect_reader<R: Read + 'static>(
    reader: R,
    path_hint: impl AsRef<Path>,
) -> Result<Box<dyn Read>> {
    let path = path_hint.as_ref();
    if let Some(codec) = codec_for_path(path) {
        log::debug!("decompressing {} with {}", path.display(), codec.name());
        return codec
            .wrap_reader_dyn(Box::new(reader))
            .map_err(|e| DataIoError::from_io(e, path));
    }

    let mut buf_reader = BufReader::new(reader);
    if let Some(codec) = detect_from_magic(&mut buf_reader) {
        log::debug!(
            "decompressing {} with {} (magic bytes)",
            path.display(),
            codec.name()
        );
        return codec
            .wrap_reader_dyn(Box::new(buf_reader))
            .map_err(|e| DataIoError::from_io(e, path));
    }

    Ok(Box::new(buf_reader))
}

/// Wrap `writer` with compression when `path_hint` ends in a codec
/// extension; otherwise return it buffered.
///
/// # Errors
/// Returns the classified I/O error if the codec cannot initialise.
pub fn auto_detect_writer<W: Write + 'static>(
    writer: W,
    path_hint: impl AsRef<Path>,
) -> Result<Box<dyn FinishWrite>> {
    let path = path_hint.as_ref();
    if let Some(codec) = codec_for_path(path) {
        log::debug!("compressing {} with {}", path.display(), codec.name());
        return codec
            .wrap_writer_dyn(Box::new(writer))
            .map_err(|e| DataIoError::from_write_io(e, path));
    }
    Ok(Box::new(BufWriter::new(writer)))
}

#[cfg(feature = "compression-gzip")]
struct GzipCodec;

#[cfg(feature = "compression-gzip")]
impl CompressionCodec for GzipCodec {
    fn name(&self) -> &str {
        "gzip"
    }

    fn extensions(&self) -> &[&str] {
        &[".gz", ".gzip"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(&[0x1f, 0x8b])
    }

    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
        use flate2::read::GzDecoder;
        Ok(Box::new(GzDecoder::new(reader)))
    }

    fn wrap_writer_dyn(&self, writer: Box<dyn Write>) -> std::io::Result<Box<dyn FinishWrite>> {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        Ok(Box::new(GzEncoder::new(writer, Compression::default())))
    }
}

#[cfg(feature = "compression-gzip")]
impl<W: Write> FinishWrite for flate2::write::GzEncoder<W> {
    fn finish(self: Box<Self>) -> std::io::Result<()> {
        let mut inner = flate2::write::GzEncoder::finish(*self)?;
        inner.flush()
    }
}

#[cfg(feature = "compression-zstd")]
struct ZstdCodec;

#[cfg(feature = "compression-zstd")]
impl CompressionCodec for ZstdCodec {
    fn name(&self) -> &str {
        "zstd"
    }

    fn extensions(&self) -> &[&str] {
        &[".zst", ".zstd"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(&[0x28, 0xb5, 0x2f, 0xfd])
    }

    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
        zstd::stream::read::Decoder::new(reader).map(|d| Box::new(d) as Box<dyn Read>)
    }

    fn wrap_writer_dyn(&self, writer: Box<dyn Write>) -> std::io::Result<Box<dyn FinishWrite>> {
        zstd::stream::write::Encoder::new(writer, 3).map(|e| Box::new(e) as Box<dyn FinishWrite>)
    }
}

#[cfg(feature = "compression-zstd")]
impl<W: Write> FinishWrite for zstd::stream::write::Encoder<'static, W> {
    fn finish(self: Box<Self>) -> std::io::Result<()> {
        let mut inner = zstd::stream::write::Encoder::finish(*self)?;
        inner.flush()
    }
}
