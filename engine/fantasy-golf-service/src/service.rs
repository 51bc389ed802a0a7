//! Service state management and component initialization

use anyhow::{Context, Result};
use golf_data_fetcher::GolfDataFetcher;
use player_registry::{PlayerRegistry, TournamentSchedule};
use roster_gateway::{create_routes, GatewayState};
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ServiceConfig;

/// Loaded data plus the shared gateway state
pub struct ServiceState {
    pub config: ServiceConfig,

    pub gateway: Arc<GatewayState>,
}

impl ServiceState {
    /// Load cached data and build the gateway state.
    ///
    /// A missing rankings file is fatal. A missing schedule only leaves the
    /// tournament list empty. When the feed API is configured the gateway
    /// can also refresh both at runtime.
    pub async fn new(config: ServiceConfig) -> Result<Self> {
        info!("Initializing service components...");

        let fetcher = build_fetcher(&config);
        if config.data.fetch_missing {
            if let Some(fetcher) = &fetcher {
                let fetched = fetcher.ensure_cached().await;
                if !fetched.is_empty() {
                    info!("Fetched {} missing feed(s)", fetched.len());
                }
            }
        }

        let rankings_path = config.rankings_path();
        let registry = PlayerRegistry::load_rankings_from_file(&rankings_path)
            .await
            .with_context(|| format!("Failed to load rankings from {:?}", rankings_path))?;
        if registry.is_empty() {
            warn!("Rankings file has no pickable players");
        }

        let schedule = match TournamentSchedule::load_from_file(config.schedule_path()).await {
            Ok(schedule) => schedule,
            Err(e) => {
                warn!("Tournament schedule unavailable ({}), continuing without it", e);
                TournamentSchedule::default()
            }
        };

        let mut gateway = GatewayState::from_config(registry, schedule, &config.gateway_config());
        if let Some(fetcher) = fetcher {
            gateway = gateway.with_feed_source(fetcher);
        }
        let gateway = Arc::new(gateway);
        info!(
            "Loaded {} players, restricted mode {}, live refresh {}",
            gateway.registry().len(),
            if gateway.restricted_mode() { "on" } else { "off" },
            if gateway.can_refresh() { "available" } else { "unavailable" }
        );

        Ok(Self { config, gateway })
    }

    /// Serve the REST API until `shutdown` resolves
    pub async fn run<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.gateway_config().server_addr().context("Invalid server address")?;
        let routes = create_routes(self.gateway.clone());

        let (bound, server) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(addr, shutdown)
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("RosterGateway listening on http://{}", bound);

        server.await;
        info!("RosterGateway stopped, {} rosters in memory", self.gateway.roster_count());
        Ok(())
    }
}

/// Live feed client for this data directory. Without an API key the service
/// still runs from the cached files, with refresh disabled.
fn build_fetcher(config: &ServiceConfig) -> Option<Arc<GolfDataFetcher>> {
    match config
        .fetcher_config()
        .and_then(|c| GolfDataFetcher::new(c).map_err(anyhow::Error::from))
    {
        Ok(fetcher) => Some(Arc::new(fetcher)),
        Err(e) => {
            warn!("Golf data API unavailable, refresh disabled: {:#}", e);
            None
        }
    }
}
