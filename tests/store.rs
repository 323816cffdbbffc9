#![cfg(all(feature = "io-csv", feature = "io-json", feature = "io-jsonl"))]

use data_handling::testing::*;
use data_handling::*;
use std::fs;

#[test]
fn round_trip_for_every_builtin_format() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    for format in FormatType::ALL {
        let store = DataStore::new(IoConfig::new(tmp.path(), format)?);
        let file = format!("sample.{format}");

        assert_eq!(store.save_to(&file, &sample_table())?, 3);
        assert_tables_equal(&store.load_from(&file)?, &sample_table());
    }
    Ok(())
}

#[test]
fn overwrite_leaves_only_the_latest_table() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let t2 = Table::with_rows(["x"], vec![vec![true.into()]])?;
    for format in FormatType::ALL {
        let store = DataStore::new(IoConfig::new(tmp.path().join(format!("data.{format}")), format)?);

        store.save(&sample_table())?;
        store.save(&t2)?;
        assert_eq!(store.load()?, t2, "{format}");
    }
    Ok(())
}

#[test]
fn missing_file_is_not_found_for_every_format() {
    for format in FormatType::ALL {
        let store = DataStore::new(IoConfig::new("/nonexistent/path", format).unwrap());
        assert!(store.load().unwrap_err().is_not_found(), "{format}");
    }
}

#[test]
fn config_loaded_from_file_drives_io() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let cfg_path = tmp.path().join("io.json");
    let data_dir = tmp.path().join("data");
    fs::write(
        &cfg_path,
        serde_json::json!({"base_path": data_dir.display().to_string(), "format_type": "json"})
            .to_string(),
    )?;

    let store = DataStore::new(IoConfig::from_json_file(&cfg_path)?);
    store.save_to("a.json", &sample_table())?;
    assert!(data_dir.join("a.json").exists());
    assert_eq!(store.load_from("a.json")?, sample_table());
    Ok(())
}

#[test]
fn same_table_switches_format_via_config() -> anyhow::Result<()> {
    let (_dir, csv_cfg) = temp_config("csv", "t.out")?;
    let json_cfg = csv_cfg.with_format_type("json")?;

    DataStore::new(csv_cfg.clone()).save(&sample_table())?;
    assert!(DataStore::new(json_cfg.clone()).load().unwrap_err().is_parse());

    DataStore::new(json_cfg.clone()).save(&sample_table())?;
    assert_eq!(DataStore::new(json_cfg).load()?, sample_table());
    Ok(())
}

#[test]
fn disabled_create_dirs_surfaces_io_error() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let store = DataStore::new(IoConfig::new(tmp.path(), "csv")?);
    let err = store
        .save_with(
            Some(std::path::Path::new("missing/dir/out.csv")),
            &sample_table(),
            &WriteOptions::new().create_dirs(false),
        )
        .unwrap_err();
    assert!(matches!(err, DataIoError::Io { .. }), "{err}");
    Ok(())
}

#[cfg(unix)]
#[test]
fn read_only_directory_is_permission_denied() -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir()?;
    let locked = tmp.path().join("locked");
    fs::create_dir(&locked)?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555))?;

    // Privileged users bypass directory permissions.
    if fs::File::create(locked.join("canary")).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
        return Ok(());
    }

    let err = save_data(&sample_table(), locked.join("out.csv"), "csv").unwrap_err();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
    assert!(matches!(err, DataIoError::PermissionDenied { .. }), "{err}");
    Ok(())
}
