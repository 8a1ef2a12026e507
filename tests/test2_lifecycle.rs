use sqlite_bridge::{Connection, SqliteBridgeError, StepResult, Value, version};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn collect_rows(conn: &Connection, sql: &str) -> Result<Vec<Vec<Value>>, SqliteBridgeError> {
    let stmt = conn.prepare(sql)?;
    let mut rows = Vec::new();
    loop {
        match stmt.step()? {
            StepResult::Row(row) => rows.push(row),
            StepResult::Done(_) => break,
        }
    }
    stmt.finalize()?;
    Ok(rows)
}

#[test]
fn reset_and_rebind_matches_reprepare() -> TestResult {
    let conn = Connection::open(":memory:")?;
    for table in ["via_reset", "via_reprepare"] {
        let create = conn.prepare(&format!("CREATE TABLE {table}(a INTEGER, b TEXT)"))?;
        create.step()?;
        create.finalize()?;
    }

    // Route one: a single statement, reset and rebound between executions.
    let insert = conn.prepare("INSERT INTO via_reset VALUES (?, ?)")?;
    insert.bind(&[Value::Integer(1), Value::Text("one".into())])?;
    assert_eq!(insert.step()?, StepResult::Done(1));
    insert.reset()?;
    insert.bind(&[Value::Integer(2), Value::Text("two".into())])?;
    assert_eq!(insert.step()?, StepResult::Done(1));
    insert.finalize()?;

    // Route two: finalize and re-prepare between executions.
    for (a, b) in [(1, "one"), (2, "two")] {
        let insert = conn.prepare("INSERT INTO via_reprepare VALUES (?, ?)")?;
        insert.bind(&[Value::Integer(a), Value::Text(b.into())])?;
        assert_eq!(insert.step()?, StepResult::Done(1));
        insert.finalize()?;
    }

    let reset_rows = collect_rows(&conn, "SELECT a, b FROM via_reset ORDER BY a")?;
    let reprepare_rows = collect_rows(&conn, "SELECT a, b FROM via_reprepare ORDER BY a")?;
    assert_eq!(reset_rows, reprepare_rows);
    assert_eq!(reset_rows.len(), 2);

    conn.close()?;
    Ok(())
}

#[test]
fn reset_is_idempotent_and_clears_bindings() -> TestResult {
    let conn = Connection::open(":memory:")?;
    let stmt = conn.prepare("SELECT ?")?;
    stmt.bind(&[Value::Integer(5)])?;
    assert_eq!(stmt.step()?, StepResult::Row(vec![Value::Integer(5)]));
    stmt.reset()?;
    stmt.reset()?;
    // Cleared slots read back as NULL.
    assert_eq!(stmt.step()?, StepResult::Row(vec![Value::Null]));
    stmt.finalize()?;
    conn.close()?;
    Ok(())
}

#[test]
fn close_force_finalizes_open_statements() -> TestResult {
    let conn = Connection::open(":memory:")?;
    let create = conn.prepare("CREATE TABLE t(a INTEGER)")?;
    create.step()?;
    create.finalize()?;

    let s1 = conn.prepare("SELECT a FROM t")?;
    let s2 = conn.prepare("INSERT INTO t VALUES (?)")?;
    let s3 = conn.prepare("SELECT count(*) FROM t")?;

    // Three statements still open; close must sweep them and succeed anyway.
    conn.close()?;

    // The orphaned proxies are inert: every operation errors, nothing crashes.
    assert!(s1.step().is_err());
    assert!(s2.bind(&[Value::Integer(1)]).is_err());
    assert!(s3.column_info().is_err());

    // Explicit finalize after the sweep is a silent no-op.
    s1.finalize()?;
    s2.finalize()?;
    s3.finalize()?;
    Ok(())
}

#[test]
fn dropping_a_statement_releases_it_before_close() -> TestResult {
    let conn = Connection::open(":memory:")?;
    {
        let stmt = conn.prepare("SELECT 1")?;
        assert_eq!(stmt.step()?, StepResult::Row(vec![Value::Integer(1)]));
        // Dropped without finalize; the drop path must release the native
        // resource so close has nothing left to sweep.
    }
    conn.close()?;
    Ok(())
}

#[test]
fn statements_survive_connection_drop_without_crashing() -> TestResult {
    let conn = Connection::open(":memory:")?;
    let stmt = conn.prepare("SELECT 1")?;
    drop(conn);
    assert!(stmt.step().is_err());
    stmt.finalize()?;
    Ok(())
}

#[test]
fn version_reports_the_engine_version() {
    let v = version();
    assert!(v.starts_with('3'), "unexpected version string: {v}");
    assert!(v.contains('.'));
}
