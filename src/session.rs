//! Session store: a single persisted key, the payout rate. Read once at
//! startup, written on every rate change. An absent or unreadable store
//! defaults to a rate of 0.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(rename = "payoutRate", default)]
    payout_rate: f64,
}

#[derive(Debug)]
pub struct RateStore {
    path: PathBuf,
    rate: Mutex<f64>,
}

impl RateStore {
    /// Open the store, loading the persisted rate. Missing file or bad
    /// JSON both fall back to 0; this store is best-effort state, not a
    /// database.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let rate = fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str::<StoreFile>(&s).ok())
            .map(|f| f.payout_rate)
            .unwrap_or(0.0);
        Self {
            path,
            rate: Mutex::new(rate),
        }
    }

    pub fn get(&self) -> f64 {
        *self.rate.lock().expect("rate mutex poisoned")
    }

    /// Update and persist. The in-memory value changes even if the write
    /// fails; the caller decides whether to surface the I/O error.
    pub fn set(&self, rate: f64) -> Result<()> {
        *self.rate.lock().expect("rate mutex poisoned") = rate;
        let body = serde_json::to_string_pretty(&StoreFile { payout_rate: rate })
            .context("serializing rate store")?;
        fs::write(&self.path, body)
            .with_context(|| format!("writing rate store {}", self.path.display()))?;
        Ok(())
    }
}

/// Coerce a rate out of loose JSON: numbers pass through, numeric strings
/// parse, everything else (including parse failures) becomes 0.
pub fn coerce_rate(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_store_defaults_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = RateStore::open(dir.path().join("rate.json"));
        assert_eq!(store.get(), 0.0);
    }

    #[test]
    fn set_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rate.json");
        let store = RateStore::open(&path);
        store.set(2.5).unwrap();
        drop(store);
        let reopened = RateStore::open(&path);
        assert_eq!(reopened.get(), 2.5);
    }

    #[test]
    fn corrupt_store_falls_back_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rate.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(RateStore::open(&path).get(), 0.0);
    }

    #[test]
    fn rate_coercion_is_lenient() {
        assert_eq!(coerce_rate(&serde_json::json!(2.5)), 2.5);
        assert_eq!(coerce_rate(&serde_json::json!("3.75")), 3.75);
        assert_eq!(coerce_rate(&serde_json::json!("not a number")), 0.0);
        assert_eq!(coerce_rate(&serde_json::json!(null)), 0.0);
        // Negative rates pass through verbatim.
        assert_eq!(coerce_rate(&serde_json::json!(-1.0)), -1.0);
    }
}
