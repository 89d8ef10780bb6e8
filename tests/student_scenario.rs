#![cfg(feature = "sqlite")]

mod common;

use common::{Student, context_with_students};
use lazy_orm::prelude::*;

#[tokio::test]
async fn insert_get_update_delete() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;

    let affected = insert(
        &mut ctx,
        Student::table_name(),
        &[
            ("name", "zj".into()),
            ("score", 104_i64.into()),
            ("subject", "yuwen".into()),
        ],
    )
    .await?;
    assert_eq!(affected, 1);

    let mut student = Student::get(&mut ctx, &[("score", 104_i64.into())]).await?;
    assert_eq!(student.get("name")?, &RowValues::Text("zj".into()));
    assert!(student.id().is_some());

    student.set("name", "zj2");
    assert_eq!(student.update(&mut ctx).await?, 1);

    let reloaded = Student::get(&mut ctx, &[("score", 104_i64.into())]).await?;
    assert_eq!(reloaded.get("name")?.as_text(), Some("zj2"));
    assert_eq!(reloaded.id(), student.id());

    assert_eq!(reloaded.delete(&mut ctx).await?, 1);
    let remaining = Student::filter(&mut ctx, &[("score", 104_i64.into())]).await?;
    assert!(remaining.is_empty());

    let err = Student::get(&mut ctx, &[("score", 104_i64.into())])
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
    Ok(())
}

#[tokio::test]
async fn create_round_trips_through_filter() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;
    let fields = [
        ("name", RowValues::from("lisi")),
        ("score", RowValues::Int(88)),
        ("subject", RowValues::from("shuxue")),
    ];

    let created = Student::create(&mut ctx, &fields).await?;
    let id = created.id().expect("create assigns an id");

    let found = Student::filter(&mut ctx, &fields).await?;
    assert_eq!(found.len(), 1);
    for (name, value) in &fields {
        assert_eq!(found[0].get(name)?, value);
    }
    assert_eq!(found[0].id(), Some(id));

    // create always inserts, even for identical content
    let again = Student::create(&mut ctx, &fields).await?;
    assert_ne!(again.id(), Some(id));
    assert_eq!(Student::filter(&mut ctx, &fields).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn instance_insert_fills_defaults_and_takes_its_own_id() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;

    let mut first = Student::new().with("name", "same");
    let mut second = Student::new().with("name", "same");
    first.insert(&mut ctx).await?;
    second.insert(&mut ctx).await?;

    assert_eq!(first.get("score")?, &RowValues::Int(0));
    assert_eq!(first.get("subject")?.as_text(), Some(""));
    let (a, b) = (first.id().unwrap(), second.id().unwrap());
    assert!(b > a);

    let row = select_one(&mut ctx, "SELECT `id` FROM `student` WHERE `id`=?", &[b.into()])
        .await?
        .expect("row for the second id");
    assert_eq!(row["id"], RowValues::Int(b));
    Ok(())
}

#[tokio::test]
async fn unknown_fields_and_missing_ids_are_errors() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;

    let err = Student::create(&mut ctx, &[("age", 3_i64.into())]).await.unwrap_err();
    assert!(matches!(err, OrmError::ParameterError(_)));

    let unsaved = Student::new().with("name", "x");
    assert!(matches!(
        unsaved.delete(&mut ctx).await,
        Err(OrmError::MissingKey { ref key }) if key == "id"
    ));
    assert!(matches!(unsaved.get("score"), Err(OrmError::MissingKey { .. })));

    let err = Student::filter(&mut ctx, &[]).await.unwrap_err();
    assert!(matches!(err, OrmError::ParameterError(_)));
    Ok(())
}

#[tokio::test]
async fn get_or_create_creates_once() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;
    let fields = [("name", RowValues::from("ww")), ("score", RowValues::Int(60))];

    let (first, created) = Student::get_or_create(&mut ctx, &fields).await?;
    assert!(created);
    let (second, created) = Student::get_or_create(&mut ctx, &fields).await?;
    assert!(!created);
    assert_eq!(first.id(), second.id());
    Ok(())
}

#[tokio::test]
async fn backslash_literal_does_not_hide_later_markers() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;
    Student::create(&mut ctx, &[("name", "C:\\".into()), ("score", 1_i64.into())]).await?;

    let rows = select(
        &mut ctx,
        "SELECT * FROM `student` WHERE `name` = 'C:\\' AND `score` = ?",
        &[1_i64.into()],
    )
    .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], RowValues::from("C:\\"));
    Ok(())
}
