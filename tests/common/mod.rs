//! Shared test doubles for the remote key/value client.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use memo_cache::{KeyValueClient, Result};
use tokio::time::Instant;

// == Fake Redis ==
/// In-memory stand-in for a Redis server, including server-side expiry.
#[derive(Default)]
pub struct FakeRedis {
    values: Mutex<HashMap<String, (String, Instant)>>,
    quits: AtomicUsize,
}

impl FakeRedis {
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.values.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).map(|(v, _)| v.clone())
    }

    pub fn put_raw(&self, key: &str, text: &str) {
        self.values.lock().unwrap().insert(
            key.to_string(),
            (text.to_string(), Instant::now() + Duration::from_secs(3600)),
        );
    }

    pub fn quits(&self) -> usize {
        self.quits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueClient for FakeRedis {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut values = self.values.lock().unwrap();
        match values.get(key) {
            Some((_, expires_at)) if Instant::now() >= *expires_at => {
                values.remove(key);
                Ok(None)
            }
            Some((text, _)) => Ok(Some(text.clone())),
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        if ttl_seconds == 0 {
            return Err(redis::RedisError::from((
                redis::ErrorKind::ResponseError,
                "invalid expire time in 'set' command",
            ))
            .into());
        }
        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), (value, expires_at));
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        self.quits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// == Unreachable Redis ==
/// Client whose every command fails as if the server were down.
pub struct UnreachableRedis;

fn connection_refused() -> memo_cache::CacheError {
    redis::RedisError::from((redis::ErrorKind::IoError, "connection refused")).into()
}

#[async_trait]
impl KeyValueClient for UnreachableRedis {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(connection_refused())
    }

    async fn set_ex(&self, _key: &str, _value: String, _ttl_seconds: u64) -> Result<()> {
        Err(connection_refused())
    }

    async fn del(&self, _key: &str) -> Result<()> {
        Err(connection_refused())
    }

    async fn quit(&self) -> Result<()> {
        Err(connection_refused())
    }
}
