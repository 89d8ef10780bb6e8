#![allow(dead_code)]

use std::sync::Arc;

use lazy_orm::prelude::*;
use tempfile::TempDir;

lazy_orm::model! {
    pub struct Student {
        name: Field::text(),
        score: Field::integer(),
        subject: Field::text(),
    }
}

lazy_orm::model! {
    pub struct Blog as "blogs" {
        title: Field::char(),
        create_time: Field::time(),
        content: Field::text().nullable(true),
        views: Field::integer().default(7_i64).updatable(false),
        slug: Field::char().insertable(false).nullable(true),
    }
}

/// A private engine on a fresh `SQLite` file; keep the `TempDir` alive for the test.
pub async fn sqlite_engine() -> Result<(TempDir, Arc<Engine>), OrmError> {
    let dir = tempfile::tempdir()
        .map_err(|e| OrmError::ConfigError(format!("tempdir: {e}")))?;
    let path = dir.path().join("lazy_orm.db");
    let engine = Engine::new(DatabaseOptions::sqlite(path.to_string_lossy())).await?;
    Ok((dir, engine))
}

/// Engine plus a context with the given model tables created.
pub async fn context_with_students() -> Result<(TempDir, ExecutionContext), OrmError> {
    let (dir, engine) = sqlite_engine().await?;
    let mut ctx = ExecutionContext::new(engine);
    Student::create_table(&mut ctx).await?;
    Blog::create_table(&mut ctx).await?;
    Ok((dir, ctx))
}
