#![cfg(all(feature = "io-csv", feature = "io-jsonl"))]

use data_handling::io::compression::{CompressionCodec, FinishWrite, register_codec};
use data_handling::testing::*;
use data_handling::*;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::sync::Arc;

#[cfg(feature = "compression-gzip")]
#[test]
fn gzip_csv_round_trip() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("sample.csv.gz");

    save_data(&sample_table(), &path, "csv")?;
    let raw = fs::read(&path)?;
    assert_eq!(&raw[..2], &[0x1f, 0x8b]);

    assert_tables_equal(&load_data(&path, "csv")?, &sample_table());
    Ok(())
}

#[cfg(feature = "compression-gzip")]
#[test]
fn gzip_detected_by_magic_bytes() -> anyhow::Result<()> {
    use flate2::Compression;
    use flate2::write::GzEncoder;

    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("disguised.csv");
    let mut enc = GzEncoder::new(File::create(&path)?, Compression::default());
    enc.write_all(b"id,name\n1,Neo\n")?;
    enc.finish()?;

    let t = load_data(&path, "csv")?;
    assert_eq!(t.get(0, "name"), Some(&Cell::from("Neo")));
    Ok(())
}

#[cfg(feature = "compression-zstd")]
#[test]
fn zstd_jsonl_round_trip() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("events.jsonl.zst");

    save_data(&mixed_table(), &path, "jsonl")?;
    assert_eq!(resolve_path(&path)?.id(), "jsonl");
    assert_tables_equal(&load_data(&path, "jsonl")?, &mixed_table());
    Ok(())
}

struct Reverse;

impl CompressionCodec for Reverse {
    fn name(&self) -> &str {
        "reverse"
    }

    fn extensions(&self) -> &[&str] {
        &[".rev"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        None
    }

    fn wrap_reader_dyn(&self, mut reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        buf.reverse();
        Ok(Box::new(std::io::Cursor::new(buf)))
    }

    fn wrap_writer_dyn(&self, writer: Box<dyn Write>) -> std::io::Result<Box<dyn FinishWrite>> {
        Ok(Box::new(ReverseWriter {
            inner: writer,
            buf: Vec::new(),
        }))
    }
}

struct ReverseWriter {
    inner: Box<dyn Write>,
    buf: Vec<u8>,
}

impl Write for ReverseWriter {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl FinishWrite for ReverseWriter {
    fn finish(mut self: Box<Self>) -> std::io::Result<()> {
        self.buf.reverse();
        self.inner.write_all(&self.buf)?;
        self.inner.flush()
    }
}

#[test]
fn custom_codec_is_applied() -> anyhow::Result<()> {
    register_codec(Arc::new(Reverse));

    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("data.csv.rev");
    let table = Table::with_rows(["k"], vec![vec!["ab".into()]])?;

    save_data(&table, &path, "csv")?;
    assert_eq!(fs::read_to_string(&path)?, "\nba\nk");
    assert_eq!(load_data(&path, "csv")?, table);
    Ok(())
}

#[cfg(feature = "compression-gzip")]
#[test]
fn plain_bytes_behind_gz_extension_are_parse_errors() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("bad.csv.gz");
    fs::write(&path, "id,name\n1,Neo\n")?;

    let err = load_data(&path, "csv").unwrap_err();
    assert!(err.is_parse(), "{err}");
    Ok(())
}

struct FullDisk;

impl CompressionCodec for FullDisk {
    fn name(&self) -> &str {
        "full-disk"
    }

    fn extensions(&self) -> &[&str] {
        &[".full"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        None
    }

    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
        Ok(reader)
    }

    fn wrap_writer_dyn(&self, writer: Box<dyn Write>) -> std::io::Result<Box<dyn FinishWrite>> {
        Ok(Box::new(TrailerFails(writer)))
    }
}

struct TrailerFails(Box<dyn Write>);

impl Write for TrailerFails {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.0.write(data)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.flush()
    }
}

impl FinishWrite for TrailerFails {
    fn finish(self: Box<Self>) -> std::io::Result<()> {
        Err(std::io::Error::other("no space left for trailer"))
    }
}

#[test]
fn failure_while_finishing_reaches_the_caller() -> anyhow::Result<()> {
    register_codec(Arc::new(FullDisk));

    let tmp = tempfile::tempdir()?;
    for format in ["csv", "jsonl"] {
        let path = tmp.path().join(format!("out.{format}.full"));
        let err = save_data(&sample_table(), &path, format).unwrap_err();
        assert!(matches!(err, DataIoError::Io { .. }), "{format}: {err}");
    }
    Ok(())
}
