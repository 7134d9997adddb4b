//! Whole-store status and reset.

use tracing::{info, instrument};

use super::{ForumService, Result};
use crate::domain::Status;

impl ForumService {
    #[instrument(name = "service.status", skip(self))]
    pub async fn status(&self) -> Result<Status> {
        Ok(self.stores.service.status().await?)
    }

    /// Delete everything. All-or-nothing.
    #[instrument(name = "service.clear", skip(self))]
    pub async fn clear(&self) -> Result<()> {
        self.stores.service.clear().await?;
        info!("all forum data cleared");
        Ok(())
    }
}
