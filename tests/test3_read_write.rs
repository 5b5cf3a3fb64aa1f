use sql_handle::prelude::*;

fn seeded_db() -> Result<Database, SqlHandleError> {
    let mut db = Database::connect(ConnectOptions::in_memory())?;
    db.write(
        "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE, age INTEGER)",
        None,
    )?;
    Ok(db)
}

fn names(rows: &[Row]) -> Vec<&str> {
    rows.iter()
        .filter_map(|r| r.get("name").and_then(RowValues::as_text))
        .collect()
}

#[test]
fn write_returns_the_inserted_id() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_db()?;
    let first = db.write(
        "INSERT INTO users (name, age) VALUES (:name, :age)",
        Some(ParamSet::named([
            ("name", RowValues::from("alice")),
            ("age", RowValues::Int(30)),
        ])),
    )?;
    let second = db.write(
        "INSERT INTO users (name, age) VALUES (?, ?)",
        Some(ParamSet::Positional(vec!["bob".into(), 25.into()])),
    )?;
    assert_eq!(second, first + 1);
    assert_eq!(db.last_insert_id(), second);

    let row = db
        .read(
            "SELECT name FROM users WHERE id = :id",
            Some(ParamSet::named([("id", second)])),
            false,
        )?
        .into_row()
        .ok_or("inserted row not found")?;
    assert_eq!(row.get("name"), Some(&RowValues::Text("bob".into())));
    Ok(())
}

#[test]
fn read_all_preserves_server_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_db()?;
    for (name, age) in [("carol", 41), ("alice", 30), ("bob", 25)] {
        db.write(
            "INSERT INTO users (name, age) VALUES (?, ?)",
            Some(ParamSet::positional([RowValues::from(name), RowValues::from(age)])),
        )?;
    }

    let by_age = db
        .read("SELECT name FROM users ORDER BY age", None, true)?
        .into_rows();
    assert_eq!(names(&by_age), vec!["bob", "alice", "carol"]);

    let filtered = db
        .read(
            "SELECT name FROM users WHERE age > ? ORDER BY name DESC",
            Some(ParamSet::positional([26])),
            true,
        )?
        .into_rows();
    assert_eq!(names(&filtered), vec!["carol", "alice"]);
    Ok(())
}

#[test]
fn read_one_returns_a_row_or_end_of_results() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_db()?;
    db.write("INSERT INTO users (name) VALUES ('dave')", None)?;

    let found = db.read("SELECT name FROM users", None, false)?;
    assert!(matches!(found, ReadResult::Row(Some(_))));

    let missing = db.read("SELECT name FROM users WHERE name = 'nobody'", None, false)?;
    assert_eq!(missing, ReadResult::Row(None));

    let none = db.read("SELECT name FROM users WHERE 0", None, true)?;
    assert_eq!(none, ReadResult::Rows(Vec::new()));
    Ok(())
}

#[test]
fn read_short_circuits_on_prepare_failure() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_db()?;
    let err = db.read("SELECT * FROM no_such_table", None, true).unwrap_err();
    let detail = err.detail().ok_or("expected an operation error")?;
    assert!(detail.message.as_deref().unwrap_or_default().contains("no_such_table"));
    assert_eq!(&db.error(ErrorSource::Connection), detail);
    Ok(())
}

#[test]
fn write_short_circuits_on_execute_failure() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_db()?;
    let id = db.write("INSERT INTO users (name) VALUES ('erin')", None)?;

    let err = db
        .write("INSERT INTO users (name) VALUES ('erin')", None)
        .unwrap_err();
    let detail = err.detail().ok_or("expected an operation error")?;
    assert_eq!(detail.sqlstate, "23000");
    assert!(detail.message.as_deref().unwrap_or_default().contains("UNIQUE"));
    assert_eq!(&db.error(ErrorSource::Statement), detail);

    // the failed insert leaves the previous id in place
    assert_eq!(db.last_insert_id(), id);
    Ok(())
}

#[test]
fn row_count_reports_affected_and_selected_rows() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_db()?;
    for name in ["a", "b", "c"] {
        db.write(
            "INSERT INTO users (name, age) VALUES (?, 20)",
            Some(ParamSet::positional([name])),
        )?;
    }

    db.prepare("UPDATE users SET age = age + 1 WHERE name <> ?")?;
    db.bind_value(1, "a", ParamType::Str)?;
    db.execute(None)?;
    assert_eq!(db.row_count()?, 2);
    assert!(db.fetch()?.is_none());

    db.prepare("SELECT * FROM users")?;
    db.execute(None)?;
    assert_eq!(db.row_count()?, 3);

    db.prepare("DELETE FROM users")?;
    assert!(matches!(db.row_count(), Err(SqlHandleError::NotExecuted)));
    db.execute(None)?;
    assert_eq!(db.row_count()?, 3);
    Ok(())
}

#[test]
fn row_count_without_a_statement_fails() -> Result<(), Box<dyn std::error::Error>> {
    let db = seeded_db()?;
    assert!(matches!(db.row_count(), Err(SqlHandleError::NoStatement)));
    Ok(())
}

#[test]
fn statements_can_be_executed_repeatedly() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_db()?;
    db.prepare("INSERT INTO users (name, age) VALUES (:name, :age)")?;
    for (i, name) in ["x", "y", "z"].into_iter().enumerate() {
        db.bind_value("name", name, ParamType::Str)?;
        db.bind_value("age", i64::try_from(i)?, ParamType::Int)?;
        db.execute(None)?;
        assert_eq!(db.row_count()?, 1);
    }
    let total = db
        .read("SELECT COUNT(*) AS cnt FROM users", None, false)?
        .into_row()
        .ok_or("count row missing")?;
    assert_eq!(total.get("cnt"), Some(&RowValues::Int(3)));
    Ok(())
}

#[test]
fn transactions_pass_through_to_the_driver() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_db()?;
    db.write("BEGIN", None)?;
    db.write("INSERT INTO users (name) VALUES ('temp')", None)?;
    db.write("ROLLBACK", None)?;
    let rows = db.read("SELECT * FROM users", None, true)?.into_rows();
    assert!(rows.is_empty());
    Ok(())
}
