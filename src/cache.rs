//! Connection handling for the Redis cache.

use redis::aio::MultiplexedConnection;

use crate::error::ScribeError;

/// Handle to the Redis cache.
///
/// `Disabled` stands in when the bot was built without a cache. Access
/// through [Cache::connection] then reports the misconfiguration right at
/// the call site instead of failing lazily somewhere deep in a handler.
#[derive(Clone)]
pub enum Cache {
    Connected(MultiplexedConnection),
    Disabled,
}

impl Cache {
    /// Opens a connection to the Redis server and verifies it with a ping.
    pub async fn connect(url: &str) -> Result<Self, ScribeError> {
        let client = redis::Client::open(url).map_err(ScribeError::CacheConnection)?;
        let mut connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(ScribeError::CacheConnection)?;

        let _pong: String = redis::cmd("PING")
            .query_async(&mut connection)
            .await
            .map_err(ScribeError::CacheConnection)?;

        Ok(Cache::Connected(connection))
    }

    /// A cache that was turned off at build time.
    pub fn disabled() -> Self {
        Cache::Disabled
    }

    /// True when a live connection is held.
    pub fn is_connected(&self) -> bool {
        matches!(self, Cache::Connected(_))
    }

    /// The underlying connection. Cheap to clone, it multiplexes internally.
    #[allow(dead_code)]
    pub fn connection(&self) -> Result<MultiplexedConnection, ScribeError> {
        match self {
            Cache::Connected(connection) => Ok(connection.clone()),
            Cache::Disabled => Err(ScribeError::CacheDisabled),
        }
    }
}
