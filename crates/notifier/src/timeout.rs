use std::{future::Future, time::Duration};

use crate::{Error, Result};

/// Await `fut`, failing with [`Error::Timeout`] once `limit` elapses.
pub(crate) async fn with_timeout<T, E>(
    operation: &'static str,
    limit: Duration,
    fut: impl Future<Output = std::result::Result<T, E>>,
) -> Result<T>
where
    E: Into<Error>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_elapsed) => Err(Error::timeout(operation, limit)),
    }
}
