#![cfg(feature = "sqlite")]

mod common;

use common::{Blog, context_with_students};
use lazy_orm::prelude::*;

#[tokio::test]
async fn field_flags_are_honoured() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;

    let mut blog = Blog::new().with("title", "first").with("slug", "ignored");
    blog.insert(&mut ctx).await?;
    let id = blog.id().expect("id assigned");

    let stored = Blog::get(&mut ctx, &[("id", id.into())]).await?;
    assert_eq!(stored.get("views")?, &RowValues::Int(7));
    assert_eq!(stored.get("content")?, &RowValues::Text(String::new()));
    // slug is not insertable, so the database default (NULL) stands
    assert_eq!(stored.get("slug")?, &RowValues::Null);
    assert!(stored.get("create_time")?.as_float().is_some_and(|t| t > 0.0));

    let mut edited = stored.clone();
    edited.set("title", "second");
    edited.set("views", 1000_i64);
    assert_eq!(edited.update(&mut ctx).await?, 1);

    let reloaded = Blog::get(&mut ctx, &[("id", id.into())]).await?;
    assert_eq!(reloaded.get("title")?.as_text(), Some("second"));
    // views is not updatable
    assert_eq!(reloaded.get("views")?, &RowValues::Int(7));
    Ok(())
}

#[tokio::test]
async fn explicit_table_name_is_used_for_delete() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;
    let blog = Blog::create(&mut ctx, &[("title", "bye".into())]).await?;
    assert_eq!(Blog::table_name(), "blogs");
    assert_eq!(blog.delete(&mut ctx).await?, 1);
    assert!(Blog::filter(&mut ctx, &[("title", "bye".into())]).await?.is_empty());
    Ok(())
}

#[test]
fn generated_ddl_is_stable() -> Result<(), OrmError> {
    let first = Blog::create_table_sql(DatabaseType::Mysql, "utf8")?;
    assert_eq!(first, Blog::create_table_sql(DatabaseType::Mysql, "utf8")?);
    assert_eq!(
        first,
        "CREATE TABLE `blogs` (\n\
         \x20 `id` INT AUTO_INCREMENT NOT NULL,\n\
         \x20 `title` VARCHAR(255) NOT NULL,\n\
         \x20 `create_time` double NOT NULL,\n\
         \x20 `content` text,\n\
         \x20 `views` int NOT NULL,\n\
         \x20 `slug` VARCHAR(255),\n\
         \x20 PRIMARY KEY (`id`)\n\
         ) DEFAULT CHARSET utf8;"
    );
    Ok(())
}

#[tokio::test]
async fn timestamps_read_back_from_sqlite_text() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;
    let when = chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
        .and_then(|d| d.and_hms_opt(8, 30, 5))
        .expect("valid date");

    insert(
        &mut ctx,
        "student",
        &[
            ("name", when.into()),
            ("score", true.into()),
            ("subject", vec![1_u8, 2].into()),
        ],
    )
    .await?;
    let row = select_one(&mut ctx, "SELECT * FROM `student`", &[])
        .await?
        .expect("one row");
    assert_eq!(row["name"].as_timestamp(), Some(when));
    assert_eq!(row["score"].as_bool(), Some(&true));
    assert_eq!(row["subject"].as_blob(), Some(&[1_u8, 2][..]));
    Ok(())
}
