//! Memo Cache demo
//!
//! Memoizes a slow computation for five seconds, over Redis when
//! `MEMO_REDIS_URL` is set and over the in-process store otherwise.

use std::env;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memo_cache::{CacheConfig, CacheError, Memoizer, RedisStorage, RedisStorageConfig, Storage};

/// Entry point.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Build the storage selected by the environment
/// 3. Call the memoized computation twice (miss, then hit)
/// 4. Wait past the TTL and call it again (miss)
/// 5. Close the storage
#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memo_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig {
        ttl_seconds: 5,
        ..CacheConfig::from_env()
    };

    if env::var("MEMO_REDIS_URL").is_ok() {
        let storage = RedisStorage::connect(RedisStorageConfig::from_env()).await?;
        info!("Using Redis storage");
        run(Memoizer::with_storage(config, storage)).await
    } else {
        info!("Using in-process storage");
        run(Memoizer::new(config)).await
    }
}

async fn run<S: Storage>(memo: Memoizer<S>) -> Result<()> {
    info!("First call (should generate): {}", get_one(&memo).await?);
    info!("Second call (should use cache): {}", get_one(&memo).await?);
    info!("Waiting 6 seconds...");
    tokio::time::sleep(Duration::from_secs(6)).await;
    info!("Third call (should generate again): {}", get_one(&memo).await?);

    if let Some(stats) = memo.stats() {
        info!(
            "Stats: hits={}, misses={}, hit_rate={:.2}",
            stats.hits,
            stats.misses,
            stats.hit_rate()
        );
    }

    memo.close().await?;
    Ok(())
}

async fn get_one<S: Storage>(memo: &Memoizer<S>) -> Result<String, CacheError> {
    memo.cache(&("n", 1), || async {
        info!("Generating 1");
        tokio::time::sleep(Duration::from_secs(1)).await;
        Ok("{ n: 1 }".to_string())
    })
    .await
}
