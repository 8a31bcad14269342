use async_trait::async_trait;
use sqlx::PgConnection;

use super::{missing_target, require_target, Applied, ChangeHandler};
use crate::domains::change_requests::error::Result;
use crate::domains::change_requests::models::ChangeRequest;
use crate::domains::dictionary::models::delete_by_id;

/// Deletes the target row of one table. Dependent rows go with it through
/// the schema's cascades.
pub struct DeleteHandler {
    pub table: &'static str,
}

impl DeleteHandler {
    pub fn new(table: &'static str) -> Self {
        Self { table }
    }
}

#[async_trait]
impl ChangeHandler for DeleteHandler {
    async fn handle(&self, conn: &mut PgConnection, request: &ChangeRequest) -> Result<Applied> {
        let target = require_target(request)?;
        if !delete_by_id(self.table, target, conn).await? {
            return Err(missing_target(request, target));
        }
        Ok(Applied::new(target))
    }
}
