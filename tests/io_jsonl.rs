#![cfg(feature = "io-jsonl")]

use data_handling::testing::*;
use data_handling::*;
use std::fs;

#[test]
fn jsonl_round_trip() -> anyhow::Result<()> {
    let (_dir, config) = temp_config(FormatType::Jsonl.as_str(), "out.jsonl")?;
    let store = DataStore::new(config);

    assert_eq!(store.save(&mixed_table())?, 2);
    assert_tables_equal(&store.load()?, &mixed_table());
    Ok(())
}

#[test]
fn jsonl_sparse_records_fill_nulls() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("sparse.jsonl");
    fs::write(&path, "{\"id\":1,\"name\":\"A\"}\n{\"id\":2,\"tag\":\"x\"}\n")?;

    let t = load_data(&path, "jsonl")?;
    assert_eq!(t.columns(), ["id", "name", "tag"]);
    assert_eq!(t.get(0, "tag"), Some(&Cell::Null));
    assert_eq!(t.get(1, "name"), Some(&Cell::Null));
    Ok(())
}

#[test]
fn jsonl_empty_file_is_empty_table() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("empty.jsonl");
    fs::write(&path, "")?;

    assert_eq!(load_data(&path, "jsonl")?, Table::default());
    Ok(())
}

#[test]
fn jsonl_malformed_content_is_parse_error() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("bad.jsonl");

    fs::write(&path, "{\"id\":1}\n{\"id\":\n")?;
    let err = load_data(&path, "jsonl").unwrap_err();
    assert!(err.is_parse(), "{err}");

    fs::write(&path, b"{\"id\":\"\xff\xfe\"}\n")?;
    let err = load_data(&path, "jsonl").unwrap_err();
    assert!(err.is_parse(), "{err}");
    assert!(err.to_string().contains("line 1"), "{err}");
    Ok(())
}
