use sqlite_bridge::{Connection, StepResult, Value};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn create_insert_select_scenario() -> TestResult {
    let conn = Connection::open(":memory:")?;

    let create = conn.prepare("CREATE TABLE t(a INTEGER, b TEXT)")?;
    assert_eq!(create.step()?, StepResult::Done(0));
    create.finalize()?;

    let insert = conn.prepare("INSERT INTO t VALUES (?, ?)")?;
    insert.bind(&[Value::Integer(42), Value::Text("hi".into())])?;
    assert_eq!(insert.step()?, StepResult::Done(1));
    insert.finalize()?;

    let select = conn.prepare("SELECT a, b FROM t")?;
    assert_eq!(select.column_info()?, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(
        select.step()?,
        StepResult::Row(vec![Value::Integer(42), Value::Text("hi".into())])
    );
    // The change count reported at completion reflects the last row-mutating
    // statement on the connection, even though this SELECT mutated nothing.
    assert_eq!(select.step()?, StepResult::Done(1));
    select.finalize()?;

    conn.close()?;
    Ok(())
}

#[test]
fn integer_roundtrip_covers_the_signed_64_bit_range() -> TestResult {
    let conn = Connection::open(":memory:")?;
    let stmt = conn.prepare("SELECT ?")?;
    for v in [0i64, 1, -1, i64::MAX, i64::MIN] {
        stmt.reset()?;
        stmt.bind(&[Value::Integer(v)])?;
        assert_eq!(stmt.step()?, StepResult::Row(vec![Value::Integer(v)]));
    }
    stmt.finalize()?;
    conn.close()?;
    Ok(())
}

#[test]
fn blob_roundtrip_preserves_length_and_zero_bytes() -> TestResult {
    let conn = Connection::open(":memory:")?;
    let stmt = conn.prepare("SELECT ?")?;
    let cases: Vec<Vec<u8>> = vec![
        Vec::new(),
        vec![0],
        vec![0, 1, 2, 255, 0],
        (0..=255).collect(),
    ];
    for blob in cases {
        stmt.reset()?;
        stmt.bind(&[Value::Blob(blob.clone())])?;
        assert_eq!(stmt.step()?, StepResult::Row(vec![Value::Blob(blob)]));
    }
    stmt.finalize()?;
    conn.close()?;
    Ok(())
}

#[test]
fn float_text_and_null_roundtrip() -> TestResult {
    let conn = Connection::open(":memory:")?;
    let stmt = conn.prepare("SELECT ?, ?, ?")?;
    stmt.bind(&[
        Value::Float(-2.25),
        Value::Text("héllo wörld".into()),
        Value::Null,
    ])?;
    assert_eq!(
        stmt.step()?,
        StepResult::Row(vec![
            Value::Float(-2.25),
            Value::Text("héllo wörld".into()),
            Value::Null,
        ])
    );
    stmt.finalize()?;
    conn.close()?;
    Ok(())
}

#[test]
fn text_with_interior_nul_is_copied_at_declared_length() -> TestResult {
    let conn = Connection::open(":memory:")?;
    let stmt = conn.prepare("SELECT ?")?;
    stmt.bind(&[Value::Text("a\u{0}b".into())])?;
    assert_eq!(
        stmt.step()?,
        StepResult::Row(vec![Value::Text("a\u{0}b".into())])
    );
    stmt.finalize()?;
    conn.close()?;
    Ok(())
}

#[test]
fn file_backed_database_survives_reopen() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bridge.db");
    let path = path.to_str().ok_or("non-utf8 temp path")?;

    let conn = Connection::open(path)?;
    let create = conn.prepare("CREATE TABLE t(a INTEGER)")?;
    create.step()?;
    create.finalize()?;
    let insert = conn.prepare("INSERT INTO t VALUES (?)")?;
    insert.bind(&[Value::Integer(7)])?;
    assert_eq!(insert.step()?, StepResult::Done(1));
    insert.finalize()?;
    conn.close()?;

    let conn = Connection::open(path)?;
    let select = conn.prepare("SELECT a FROM t")?;
    assert_eq!(select.step()?, StepResult::Row(vec![Value::Integer(7)]));
    select.finalize()?;
    conn.close()?;
    Ok(())
}
