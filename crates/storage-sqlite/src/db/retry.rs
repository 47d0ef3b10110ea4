//! Bounded startup connection with exponential backoff.

use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

use super::{create_pool, get_connection, init, DbPool};
use crypto_ledger_core::errors::{DatabaseError, Error, Result};

/// How hard to try before giving up on the database at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            initial_backoff: Duration::from_secs(2),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Wait before attempt `attempt + 1` (attempts are 1-based).
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

fn open(db_path: &str) -> Result<Arc<DbPool>> {
    init(db_path)?;
    let pool = create_pool(db_path)?;
    // Fail the attempt early if no connection can be handed out.
    get_connection(&pool)?;
    Ok(pool)
}

/// Opens the database, retrying with exponential backoff up to `policy.max_attempts` times.
///
/// Returns the error of the last attempt when every attempt fails.
pub async fn connect_with_retry(db_path: &str, policy: &RetryPolicy) -> Result<Arc<DbPool>> {
    let attempts = policy.max_attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        match open(db_path) {
            Ok(pool) => {
                info!("Connected to database at {} (attempt {})", db_path, attempt);
                return Ok(pool);
            }
            Err(e) => {
                warn!(
                    "Database connection attempt {}/{} failed: {}",
                    attempt, attempts, e
                );
                last_error = Some(e);
            }
        }

        if attempt < attempts {
            tokio::time::sleep(policy.backoff_after(attempt)).await;
        }
    }

    Err(last_error.unwrap_or_else(|| {
        Error::Database(DatabaseError::ConnectionFailed(db_path.to_string()))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_until_cap() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(500),
        };
        assert_eq!(policy.backoff_after(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_after(2), Duration::from_millis(200));
        assert_eq!(policy.backoff_after(3), Duration::from_millis(400));
        assert_eq!(policy.backoff_after(4), Duration::from_millis(500));
        assert_eq!(policy.backoff_after(64), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_connects_on_first_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.db");
        let policy = RetryPolicy {
            max_attempts: 1,
            ..Default::default()
        };

        let pool = connect_with_retry(path.to_str().unwrap(), &policy)
            .await
            .unwrap();
        assert!(get_connection(&pool).is_ok());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where a directory is expected can never be opened.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let path = blocker.join("ledger.db");

        let policy = RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
        };

        let started = std::time::Instant::now();
        let result = connect_with_retry(path.to_str().unwrap(), &policy).await;
        assert!(matches!(result, Err(Error::Database(_))));
        assert!(started.elapsed() >= Duration::from_millis(3));
    }
}
