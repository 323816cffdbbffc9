use data_handling::testing::*;
use data_handling::*;
use std::path::Path;
use std::sync::Arc;

/// Writes nothing and reads back the path it was given, like a stub
/// database driver.
struct Echo;

impl FormatAdapter for Echo {
    fn id(&self) -> &str {
        "echo"
    }

    fn extensions(&self) -> &[&str] {
        &[".echo"]
    }

    fn read(&self, path: &Path, _options: &ReadOptions) -> Result<Table> {
        Table::with_rows(["source"], vec![vec![path.display().to_string().into()]])
    }

    fn write(&self, _path: &Path, table: &Table, _options: &WriteOptions) -> Result<usize> {
        Ok(table.num_rows())
    }
}

#[test]
fn get_reader_invalid_format() {
    let err = load_data("file.txt", "unknown_format").unwrap_err();
    assert!(err.is_unsupported_format());
    assert!(err.to_string().contains("no adapter registered"), "{err}");
}

#[test]
fn resolve_unknown_identifier() {
    for id in ["xyz", "", "csv2", "parquet"] {
        assert!(resolve(id).err().unwrap().is_unsupported_format(), "{id}");
    }
}

#[test]
fn custom_extension_registration() -> anyhow::Result<()> {
    register_format(Arc::new(Echo));

    let t = load_data("fake.echo", "echo")?;
    assert_eq!(t.get(0, "source"), Some(&Cell::from("fake.echo")));
    assert!(registered_formats().contains(&"echo".to_string()));
    assert_eq!(save_data(&sample_table(), "fake.echo", "ECHO")?, 3);
    Ok(())
}

#[cfg(all(feature = "io-csv", feature = "io-json"))]
#[test]
fn new_adapter_does_not_change_existing_formats() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let before = FormatRegistry::new();
    let mut after = FormatRegistry::new();
    after.register(Arc::new(Echo));

    for (id, file) in [("csv", "t.csv"), ("json", "t.json")] {
        let a = DataStore::with_registry(
            IoConfig::new(tmp.path().join("before").join(file), id)?,
            Arc::new(before.clone()),
        );
        let b = DataStore::with_registry(
            IoConfig::new(tmp.path().join("after").join(file), id)?,
            Arc::new(after.clone()),
        );
        a.save(&mixed_table())?;
        b.save(&mixed_table())?;

        assert_eq!(
            std::fs::read(a.config().base_path())?,
            std::fs::read(b.config().base_path())?
        );
        assert_eq!(a.load()?, b.load()?);
    }
    Ok(())
}

#[cfg(feature = "io-jsonl")]
#[test]
fn config_for_path_uses_registry() -> anyhow::Result<()> {
    let config = IoConfig::for_path("logs/2024/app.ndjson")?;
    assert_eq!(config.format_type(), "jsonl");
    assert_eq!("jsonl".parse::<FormatType>()?, FormatType::Jsonl);
    Ok(())
}
