use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::{
    errors::RegistrationError,
    traits::{PChainClient, PChainTxStatus},
};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 120;
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(120);

/// Bounds on waiting for a P-Chain transaction to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

/// Polls `tx_id` until it is committed, whichever bound hits first ending
/// the wait with [`RegistrationError::PollTimedOut`].
///
/// A dropped transaction fails immediately. Status query errors count as an
/// attempt and are retried.
pub async fn poll_until_committed(
    client: &dyn PChainClient,
    tx_id: &str,
    config: &PollConfig,
) -> Result<(), RegistrationError> {
    let started = Instant::now();
    let mut attempts = 0;

    loop {
        attempts += 1;
        match client.get_tx_status(tx_id).await {
            Ok(PChainTxStatus::Committed) => {
                debug!(%tx_id, %attempts, "p-chain tx committed");
                return Ok(());
            }
            Ok(PChainTxStatus::Dropped { reason }) => {
                return Err(RegistrationError::TxDropped {
                    tx_id: tx_id.to_owned(),
                    reason: reason.unwrap_or_else(|| "no reason given".into()),
                });
            }
            Ok(status) => debug!(%tx_id, ?status, %attempts, "p-chain tx pending"),
            Err(e) => warn!(%tx_id, err = %e, %attempts, "failed to query p-chain tx status"),
        }

        let elapsed = started.elapsed();
        if attempts >= config.max_attempts || elapsed + config.interval > config.timeout {
            return Err(RegistrationError::PollTimedOut {
                tx_id: tx_id.to_owned(),
                attempts,
                elapsed,
            });
        }
        sleep(config.interval).await;
    }
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;

    use super::*;
    use crate::traits::{MockPChainClient, PChainError};

    fn fast() -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(10),
            max_attempts: 5,
            timeout: Duration::from_secs(60),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_committed_after_processing() {
        let mut client = MockPChainClient::new();
        let mut seq = Sequence::new();
        client
            .expect_get_tx_status()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Ok(PChainTxStatus::Processing));
        client
            .expect_get_tx_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(PChainTxStatus::Committed));

        poll_until_committed(&client, "tx", &fast()).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_bound() {
        let mut client = MockPChainClient::new();
        client
            .expect_get_tx_status()
            .times(5)
            .returning(|_| Ok(PChainTxStatus::Unknown));

        let err = poll_until_committed(&client, "tx", &fast()).await.unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::PollTimedOut { attempts: 5, .. }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_time_bound() {
        let mut client = MockPChainClient::new();
        client
            .expect_get_tx_status()
            .returning(|_| Ok(PChainTxStatus::Processing));
        let cfg = PollConfig {
            interval: Duration::from_secs(1),
            max_attempts: 1000,
            timeout: Duration::from_secs(3),
        };

        let err = poll_until_committed(&client, "tx", &cfg).await.unwrap_err();
        match err {
            RegistrationError::PollTimedOut { attempts, elapsed, .. } => {
                assert_eq!(attempts, 4);
                assert_eq!(elapsed, Duration::from_secs(3));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_fails_fast() {
        let mut client = MockPChainClient::new();
        client
            .expect_get_tx_status()
            .times(1)
            .returning(|_| {
                Ok(PChainTxStatus::Dropped {
                    reason: Some("insufficient funds".into()),
                })
            });

        let err = poll_until_committed(&client, "tx", &fast()).await.unwrap_err();
        assert!(err.to_string().contains("insufficient funds"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_errors_retried() {
        let mut client = MockPChainClient::new();
        let mut seq = Sequence::new();
        client
            .expect_get_tx_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(PChainError::Rpc("connection reset".into())));
        client
            .expect_get_tx_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(PChainTxStatus::Committed));

        poll_until_committed(&client, "tx", &fast()).await.unwrap();
    }
}
