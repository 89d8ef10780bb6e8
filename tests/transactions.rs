#![cfg(feature = "sqlite")]

mod common;

use common::{Student, context_with_students};
use lazy_orm::prelude::*;

async fn count(ctx: &mut ExecutionContext) -> Result<i64, OrmError> {
    let row = select_one(ctx, "SELECT COUNT(*) AS n FROM `student`", &[])
        .await?
        .expect("count row");
    Ok(*row.try_get("n")?.as_int().expect("integer count"))
}

#[tokio::test]
async fn rollback_discards_writes() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;
    {
        let mut scope = ctx.scope();
        scope.begin().await?;
        Student::create(&mut scope, &[("name", "gone".into())]).await?;
        assert_eq!(count(&mut scope).await?, 1);
        scope.rollback().await?;
    }
    assert_eq!(count(&mut ctx).await?, 0);
    Ok(())
}

#[tokio::test]
async fn nested_commit_only_commits_at_the_outermost_level() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;
    {
        let mut scope = ctx.scope();
        scope.begin().await?;
        scope.begin().await?;
        Student::create(&mut scope, &[("name", "kept".into())]).await?;
        scope.commit().await?;
        assert_eq!(scope.transaction_depth(), 1);
        scope.commit().await?;
        assert_eq!(scope.transaction_depth(), 0);
    }
    assert_eq!(count(&mut ctx).await?, 1);
    Ok(())
}

#[tokio::test]
async fn leaving_a_scope_with_an_open_transaction_discards_it() -> Result<(), OrmError> {
    let (_dir, mut ctx) = context_with_students().await?;
    {
        let mut scope = ctx.scope();
        scope.begin().await?;
        Student::create(&mut scope, &[("name", "abandoned".into())]).await?;
    }
    assert!(!ctx.is_active());
    assert_eq!(count(&mut ctx).await?, 0);
    Ok(())
}
