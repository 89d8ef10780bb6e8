#![cfg(feature = "sqlite")]

mod common;

use common::{Student, context_with_students, sqlite_engine};
use lazy_orm::prelude::*;

#[tokio::test]
async fn each_top_level_call_opens_and_releases_one_connection() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;
    let engine = std::sync::Arc::clone(ctx.engine());
    let before = engine.stats();

    select(&mut ctx, "SELECT * FROM `student`", &[]).await?;
    select(&mut ctx, "SELECT * FROM `student`", &[]).await?;

    let after = engine.stats();
    assert_eq!(after.opened - before.opened, 2);
    assert_eq!(after.in_use(), 0);
    assert!(!ctx.is_active());
    Ok(())
}

#[tokio::test]
async fn nested_calls_share_the_outer_connection() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;
    let engine = std::sync::Arc::clone(ctx.engine());
    let before = engine.stats();

    {
        let mut scope = ctx.scope();
        let mut student = Student::new().with("name", "nested").with("score", 7_i64);
        student.insert(&mut scope).await?;
        let id = student.id().expect("id assigned");
        let row = select_one(&mut scope, "SELECT * FROM `student` WHERE `id`=?", &[id.into()])
            .await?
            .expect("inserted row is visible in the same scope");
        assert_eq!(row["name"], RowValues::from("nested"));
        Student::filter(&mut scope, &[("score", 7_i64.into())]).await?;

        assert_eq!(engine.stats().opened - before.opened, 1);
        assert_eq!(engine.stats().in_use(), 1);
    }

    assert_eq!(engine.stats().opened - before.opened, 1);
    assert_eq!(engine.stats().in_use(), 0);
    Ok(())
}

#[tokio::test]
async fn failing_statement_still_releases_the_connection() -> Result<(), OrmError> {
    let (_dir, engine) = sqlite_engine().await?;
    let mut ctx = ExecutionContext::new(std::sync::Arc::clone(&engine));

    let err = select(&mut ctx, "SELECT * FROM `missing_table`", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::Sqlite(_)), "backend error passes through: {err}");
    assert!(!ctx.is_active());
    assert_eq!(engine.stats().opened, 1);
    assert_eq!(engine.stats().released, 1);

    let err = update(&mut ctx, "DELETE FROM `student` WHERE `id`=?", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, OrmError::ParameterError(_)));
    assert_eq!(engine.stats().in_use(), 0);
    Ok(())
}

#[tokio::test]
async fn explicitly_initialised_context_keeps_its_connection() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;
    let engine = std::sync::Arc::clone(ctx.engine());
    let before = engine.stats();

    ctx.init()?;
    insert(
        &mut ctx,
        "student",
        &[
            ("name", "a".into()),
            ("score", 60_i64.into()),
            ("subject", "math".into()),
        ],
    )
    .await?;
    insert(
        &mut ctx,
        "student",
        &[
            ("name", "b".into()),
            ("score", 60_i64.into()),
            ("subject", "math".into()),
        ],
    )
    .await?;
    let rows = select(&mut ctx, "SELECT `name` FROM `student` ORDER BY `id`", &[]).await?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["name"], RowValues::from("b"));
    assert!(ctx.is_active());
    assert_eq!(engine.stats().opened - before.opened, 1);

    ctx.cleanup();
    assert_eq!(engine.stats().in_use(), 0);
    Ok(())
}

#[tokio::test]
async fn select_on_no_rows_is_empty_not_missing() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;
    let sql = "SELECT * FROM `student` WHERE `score`=?";
    let rows = select(&mut ctx, sql, &[1_i64.into()]).await?;
    assert!(rows.is_empty());
    let row = select_one(&mut ctx, sql, &[1_i64.into()]).await?;
    assert!(row.is_none());
    Ok(())
}

#[tokio::test]
async fn select_one_takes_the_first_row_in_order() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;
    for (name, score) in [("x", 3_i64), ("y", 1), ("z", 2)] {
        Student::create(&mut ctx, &[("name", name.into()), ("score", score.into())]).await?;
    }
    let engine = std::sync::Arc::clone(ctx.engine());
    let before = engine.stats();

    let sql = "SELECT `name` FROM `student` ORDER BY `score`";
    let row = select_one(&mut ctx, sql, &[]).await?.expect("rows exist");
    assert_eq!(row["name"], RowValues::from("y"));
    assert_eq!(engine.stats().opened - before.opened, 1);
    assert_eq!(engine.stats().in_use(), 0);
    Ok(())
}
