use std::ops::{Deref, DerefMut};

use crate::context::ExecutionContext;

/// Scoped use of an [`ExecutionContext`].
///
/// Entering a scope on an inactive context activates it and makes this scope its owner;
/// dropping the owning scope cleans the context up on every exit path. Entering on an
/// already active context borrows it, so nested operations share the caller's
/// connection and only the outermost scope releases it.
///
/// ```rust,no_run
/// # async fn demo(ctx: &mut lazy_orm::ExecutionContext) -> Result<(), lazy_orm::OrmError> {
/// let mut scope = ctx.scope();
/// let sql = "UPDATE `student` SET `score`=? WHERE `id`=?";
/// lazy_orm::update(&mut scope, sql, &[90_i64.into(), 1_i64.into()]).await?;
/// let sql = "SELECT * FROM `student` WHERE `id`=?";
/// let row = lazy_orm::select_one(&mut scope, sql, &[1_i64.into()]).await?;
/// # drop(row);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConnectionScope<'a> {
    ctx: &'a mut ExecutionContext,
    owner: bool,
}

impl<'a> ConnectionScope<'a> {
    pub fn enter(ctx: &'a mut ExecutionContext) -> Self {
        let owner = !ctx.is_active();
        if owner {
            ctx.activate();
        }
        ConnectionScope { ctx, owner }
    }

    /// True when this scope activated the context and will clean it up.
    #[must_use]
    pub fn owns_context(&self) -> bool {
        self.owner
    }
}

impl Deref for ConnectionScope<'_> {
    type Target = ExecutionContext;

    fn deref(&self) -> &ExecutionContext {
        self.ctx
    }
}

impl DerefMut for ConnectionScope<'_> {
    fn deref_mut(&mut self) -> &mut ExecutionContext {
        self.ctx
    }
}

impl Drop for ConnectionScope<'_> {
    fn drop(&mut self) {
        if self.owner {
            self.ctx.cleanup();
        }
    }
}
