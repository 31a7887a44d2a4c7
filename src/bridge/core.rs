//! Module `core`
//!
//! The assembled bridge. The protocol engine calls [`Bridge::login`] once
//! per connection and drives the returned filesystem; everything else here
//! is lookup state the engine consults per command.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use log::info;

use crate::auth::{Authorizer, LoginOutcome};
use crate::config::BridgeConfig;
use crate::error::{AuthError, BridgeError};
use crate::net::AddrResolver;
use crate::publish::{KafkaBus, MessageBus, Publisher};

pub struct Bridge {
    config: BridgeConfig,
    authorizer: Authorizer,
    publisher: Arc<Publisher>,
    resolver: AddrResolver,
}

impl Bridge {
    /// Builds the core and starts the background Kafka connection. Logins
    /// are accepted immediately; uploads that complete before the bus is up
    /// are dropped and counted. Must run inside the tokio runtime.
    pub fn new(config: BridgeConfig) -> Result<Self, BridgeError> {
        let bus = Arc::new(KafkaBus::new(&config.kafka)?);
        bus.connect_in_background();
        Ok(Self::with_bus(config, bus))
    }

    /// Wires the core over an already-built bus transport.
    pub fn with_bus(config: BridgeConfig, bus: Arc<dyn MessageBus>) -> Self {
        let publisher = Arc::new(Publisher::new(bus));
        let authorizer = Authorizer::from_config(&config, Arc::clone(&publisher));
        let resolver = AddrResolver::new(config.pasv_address);

        info!(
            "Bridge ready: uploads under {} publish to topic {}",
            config.root.display(),
            config.kafka.topic
        );

        Self {
            config,
            authorizer,
            publisher,
            resolver,
        }
    }

    /// Login hook for the protocol engine; one call per connection attempt.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        self.authorizer.authorize(username, password).await
    }

    /// Address to advertise for a passive data connection from `peer`.
    pub fn passive_address(&self, peer: IpAddr) -> Ipv4Addr {
        self.resolver.resolve(peer)
    }

    /// Verbs the engine must refuse for this run.
    pub fn disabled_verbs(&self) -> &'static [&'static str] {
        self.config.disabled_verbs()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Publisher handle for external delivery monitoring.
    pub fn publisher(&self) -> &Arc<Publisher> {
        &self.publisher
    }
}
