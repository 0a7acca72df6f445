use serde_json::Value;
use tracing::{debug, info};

use crate::drive::Drive;
use crate::error::Result;
use crate::types::{AboutQuota, StorageQuota};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Account information
pub struct About<'a> {
    drive: &'a Drive,
}

impl<'a> About<'a> {
    pub(crate) fn new(drive: &'a Drive) -> Self {
        Self { drive }
    }

    /// Raw `about` resource; `fields` defaults to `*`
    pub async fn get(&self, fields: Option<&str>) -> Result<Value> {
        self.drive
            .connector()
            .get_json("about", &[("fields", fields.unwrap_or("*"))])
            .await
    }

    pub async fn storage_quota(&self) -> Result<StorageQuota> {
        let about: AboutQuota = self
            .drive
            .connector()
            .get_json("about", &[("fields", "storageQuota")])
            .await?;
        let quota = about.storage_quota;

        match (quota.limit, quota.usage_percent()) {
            (Some(limit), Some(percent)) => info!(
                usage_gb = %format!("{:.2}", quota.usage.unwrap_or(0) as f64 / GIB),
                limit_gb = %format!("{:.2}", limit as f64 / GIB),
                percent,
                "Storage quota"
            ),
            _ => debug!(usage = ?quota.usage, "Storage quota is unlimited"),
        }
        Ok(quota)
    }
}
