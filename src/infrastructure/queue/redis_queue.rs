use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::application::ports::{JobEnvelope, JobQueue, JobQueueError};

/// Job queue over a Redis list: LPUSH to enqueue, BRPOP to dequeue.
pub struct RedisJobQueue {
    connection: redis::aio::MultiplexedConnection,
    queue_name: String,
}

impl RedisJobQueue {
    pub async fn connect(url: &str, queue_name: String) -> Result<Self, JobQueueError> {
        let client = redis::Client::open(url)
            .map_err(|e| JobQueueError::ConnectionFailed(e.to_string()))?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| JobQueueError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            connection,
            queue_name,
        })
    }
}

#[async_trait]
impl JobQueue for RedisJobQueue {
    async fn enqueue(&self, envelope: &JobEnvelope) -> Result<(), JobQueueError> {
        let message = serde_json::to_string(envelope)
            .map_err(|e| JobQueueError::MalformedMessage(e.to_string()))?;

        let mut connection = self.connection.clone();
        connection
            .lpush::<_, _, ()>(&self.queue_name, message)
            .await
            .map_err(|e| JobQueueError::TransportFailed(e.to_string()))?;

        Ok(())
    }

    async fn dequeue(&self, timeout: Duration) -> Result<Option<JobEnvelope>, JobQueueError> {
        let mut connection = self.connection.clone();

        // BRPOP returns (list, element) or nil on timeout.
        let popped: Option<(String, String)> = connection
            .brpop(&self.queue_name, timeout.as_secs_f64())
            .await
            .map_err(|e| JobQueueError::TransportFailed(e.to_string()))?;

        match popped {
            Some((_, message)) => {
                let envelope = serde_json::from_str(&message)
                    .map_err(|e| JobQueueError::MalformedMessage(e.to_string()))?;
                Ok(Some(envelope))
            }
            None => Ok(None),
        }
    }
}
