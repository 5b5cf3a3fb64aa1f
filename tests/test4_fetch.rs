use chrono::NaiveDate;
use sql_handle::prelude::*;

fn memory_db() -> Result<Database, SqlHandleError> {
    Database::connect(ConnectOptions::in_memory())
}

#[test]
fn fetch_before_execute_fails_clearly() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db()?;
    assert!(matches!(db.fetch(), Err(SqlHandleError::NoStatement)));
    assert!(matches!(db.fetch_all(), Err(SqlHandleError::NoStatement)));

    db.prepare("SELECT 1")?;
    assert!(matches!(db.fetch(), Err(SqlHandleError::NotExecuted)));
    assert!(matches!(db.fetch_all(), Err(SqlHandleError::NotExecuted)));
    assert!(matches!(db.column_names(), Err(SqlHandleError::NotExecuted)));
    Ok(())
}

#[test]
fn fetch_and_fetch_all_share_one_cursor() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db()?;
    db.prepare("SELECT 1 AS n UNION ALL SELECT 2 UNION ALL SELECT 3")?;
    db.execute(None)?;
    let first = db.fetch()?.ok_or("expected a row")?;
    assert_eq!(first.get("n"), Some(&RowValues::Int(1)));
    let rest = db.fetch_all()?;
    assert_eq!(rest.len(), 2);
    assert_eq!(rest[1].get("n"), Some(&RowValues::Int(3)));
    assert!(db.fetch()?.is_none());
    assert!(db.fetch_all()?.is_empty());

    // executing again rewinds to a fresh result
    db.execute(None)?;
    assert_eq!(db.fetch_all()?.len(), 3);
    Ok(())
}

#[test]
fn duplicate_columns_follow_the_fetch_mode() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db()?;
    db.prepare("SELECT 1 AS id, 'x' AS label, 2 AS id")?;
    db.execute(None)?;
    assert_eq!(db.column_names()?, vec!["id".to_string(), "label".to_string()]);

    let named = db.fetch_with(FetchMode::Named)?.ok_or("expected a row")?;
    assert_eq!(named.len(), 2);
    assert_eq!(named.get("id"), Some(&RowValues::Int(2)));

    db.execute(None)?;
    db.set_fetch_mode(FetchMode::Positional);
    let positional = db.fetch()?.ok_or("expected a row")?;
    assert_eq!(
        positional.values(),
        [RowValues::Int(1), RowValues::Text("x".into()), RowValues::Int(2)]
    );
    assert_eq!(db.column_names()?.len(), 3);
    Ok(())
}

#[test]
fn values_round_trip_through_storage() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db()?;
    db.write(
        "CREATE TABLE events (id INTEGER PRIMARY KEY, at TEXT, payload TEXT, flag INTEGER, raw BLOB, score REAL)",
        None,
    )?;
    let at = NaiveDate::from_ymd_opt(2024, 2, 29)
        .ok_or("bad date")?
        .and_hms_opt(12, 30, 0)
        .ok_or("bad time")?;
    let payload = serde_json::json!({"kind": "signup", "tags": ["a", "b"]});

    let id = db.write(
        "INSERT INTO events (at, payload, flag, raw, score) VALUES (?, ?, ?, ?, ?)",
        Some(ParamSet::Positional(vec![
            RowValues::Timestamp(at),
            RowValues::JSON(payload.clone()),
            RowValues::Bool(true),
            RowValues::Blob(vec![0, 159, 255]),
            RowValues::Float(9.5),
        ])),
    )?;

    let row = db
        .read(
            "SELECT * FROM events WHERE id = ?",
            Some(ParamSet::positional([id])),
            false,
        )?
        .into_row()
        .ok_or("row missing")?;
    assert_eq!(row.get("at").and_then(RowValues::as_timestamp), Some(at));
    let stored: serde_json::Value =
        serde_json::from_str(row.get("payload").and_then(RowValues::as_text).ok_or("no payload")?)?;
    assert_eq!(stored, payload);
    assert_eq!(row.get("flag").and_then(RowValues::as_bool), Some(true));
    assert_eq!(row.get("raw").and_then(RowValues::as_blob), Some(&[0_u8, 159, 255][..]));
    assert_eq!(row.get("score").and_then(RowValues::as_float), Some(9.5));
    Ok(())
}

#[test]
fn null_options_bind_as_sql_null() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db()?;
    let missing: Option<i64> = None;
    db.prepare("SELECT :v IS NULL AS is_null")?;
    db.bind_value("v", missing, ParamType::Int)?;
    db.execute(None)?;
    let row = db.fetch()?.ok_or("expected a row")?;
    assert_eq!(row.get("is_null"), Some(&RowValues::Int(1)));
    Ok(())
}

#[test]
fn rows_serialize_as_json_objects() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db()?;
    let row = db
        .read("SELECT 7 AS id, 'ada' AS name, NULL AS note", None, false)?
        .into_row()
        .ok_or("expected a row")?;
    assert_eq!(
        serde_json::to_string(&row)?,
        r#"{"id":7,"name":"ada","note":null}"#
    );
    assert_eq!(row.to_json()["name"], serde_json::json!("ada"));
    Ok(())
}

#[test]
fn statement_errors_are_tracked_per_statement() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_db()?;
    assert!(!db.error(ErrorSource::Statement).is_error());

    db.write("CREATE TABLE t (v INTEGER NOT NULL)", None)?;
    db.prepare("INSERT INTO t (v) VALUES (?)")?;
    let err = db.execute(Some(ParamSet::Positional(vec![RowValues::Null])));
    assert!(err.is_err());
    assert_eq!(db.error(ErrorSource::Statement).sqlstate, "23000");
    // prepare succeeded, so the connection reports no error
    assert!(!db.error(ErrorSource::Connection).is_error());

    db.execute(Some(ParamSet::positional([1])))?;
    assert!(!db.error(ErrorSource::Statement).is_error());
    assert_eq!(db.query(), Some("INSERT INTO t (v) VALUES (?)"));
    Ok(())
}
