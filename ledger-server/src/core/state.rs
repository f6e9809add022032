//! Server state shared by every handler

use std::sync::Arc;

use super::{Config, Result};
use crate::db::DbService;
use crate::gateway::{LedgerGateway, SqliteGateway};
use crate::services::LedgerService;

/// 服务器状态 (cheap to clone)
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub ledger: LedgerService,
}

impl ServerState {
    /// Open the database and wire the ledger on top of it
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path).await?;
        let gateway: Arc<dyn LedgerGateway> = Arc::new(SqliteGateway::new(db.pool));
        Ok(Self::with_gateway(config.clone(), gateway))
    }

    /// State over any gateway (tests, demos)
    pub fn with_gateway(config: Config, gateway: Arc<dyn LedgerGateway>) -> Self {
        let ledger = LedgerService::new(gateway, config.business_timezone);
        Self { config, ledger }
    }
}
