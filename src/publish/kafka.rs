//! Kafka transport
//!
//! Wraps the rdkafka producer behind the [`MessageBus`] contract. The
//! connection is brought up in the background at process start: a metadata
//! probe loops until the broker answers, then flips the readiness flag the
//! publisher checks before every dispatch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use rdkafka::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};

use super::bus::{MessageBus, PublishedMessage};
use crate::config::KafkaConfig;
use crate::error::PublishError;

const METADATA_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const METADATA_PROBE_INTERVAL: Duration = Duration::from_secs(5);

pub struct KafkaBus {
    producer: FutureProducer,
    brokers: String,
    topic: String,
    ready: AtomicBool,
}

impl KafkaBus {
    pub fn new(config: &KafkaConfig) -> Result<Self, rdkafka::error::KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("client.id", "kafkatp")
            .set("message.timeout.ms", "30000")
            .create()?;

        Ok(Self {
            producer,
            brokers: config.brokers.clone(),
            topic: config.topic.clone(),
            ready: AtomicBool::new(false),
        })
    }

    /// Probes broker metadata until the first answer, then marks the bus
    /// ready. Runs concurrently with the server accepting connections, so
    /// logins are never held up by a slow or absent broker.
    pub fn connect_in_background(self: &Arc<Self>) {
        let bus = Arc::clone(self);
        tokio::spawn(async move {
            info!("Connecting Kafka producer to {}", bus.brokers);
            loop {
                let probe = Arc::clone(&bus);
                let result = tokio::task::spawn_blocking(move || {
                    probe
                        .producer
                        .client()
                        .fetch_metadata(Some(probe.topic.as_str()), METADATA_PROBE_TIMEOUT)
                })
                .await;

                match result {
                    Ok(Ok(metadata)) => {
                        bus.ready.store(true, Ordering::SeqCst);
                        info!(
                            "Kafka producer connected to {} ({} topics visible)",
                            bus.brokers,
                            metadata.topics().len()
                        );
                        return;
                    }
                    Ok(Err(e)) => {
                        debug!("Kafka broker not reachable yet: {}", e);
                    }
                    Err(e) => {
                        warn!("Kafka metadata probe task failed: {}", e);
                    }
                }

                tokio::time::sleep(METADATA_PROBE_INTERVAL).await;
            }
        });
    }
}

#[async_trait]
impl MessageBus for KafkaBus {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn publish(&self, message: PublishedMessage) -> Result<(), PublishError> {
        let record = FutureRecord::to(&self.topic)
            .key(&message.key)
            .payload(&message.value);

        self.producer
            .send(record, Duration::from_secs(0))
            .await
            .map(|_| ())
            .map_err(|(e, _)| PublishError::Transport(e.to_string()))
    }
}
