//! Runtime configuration loaded from the process environment.

use std::env;

/// Lines kept in the in-memory log store when nothing else is configured.
pub const DEFAULT_LOG_CAPACITY: usize = 1024;

/// Snapshot of configuration values consumed by the core.
#[derive(Clone, Debug)]
pub struct AppCfg {
    /// `EnvFilter` directive string, e.g. `info` or `react_native_rs=debug`.
    pub log_level: String,
    /// Size of the command runtime and the rayon pool.
    pub worker_threads: usize,
    /// Maximum number of log lines retained for the `logs` command.
    pub log_capacity: usize,
}

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let worker_threads = lookup("RNRS_WORKER_THREADS")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or_else(default_worker_threads);

        let log_capacity = lookup("RNRS_LOG_CAPACITY")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_LOG_CAPACITY)
            .max(1);

        Self {
            log_level: env_or("RNRS_LOG_LEVEL", "info"),
            worker_threads,
            log_capacity,
        }
    }
}

impl Default for AppCfg {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Leave one core to the UI thread on Android.
fn default_worker_threads() -> usize {
    #[cfg(target_os = "android")]
    let threads = num_cpus::get().saturating_sub(1).max(1);
    #[cfg(not(target_os = "android"))]
    let threads = num_cpus::get().max(1);

    threads
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_environment() {
        let cfg = AppCfg::from_lookup(|_| None);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.log_capacity, DEFAULT_LOG_CAPACITY);
        assert!(cfg.worker_threads >= 1);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let cfg = AppCfg::from_lookup(lookup_from(&[
            ("RNRS_LOG_LEVEL", "debug"),
            ("RNRS_WORKER_THREADS", "3"),
            ("RNRS_LOG_CAPACITY", "16"),
        ]));
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.worker_threads, 3);
        assert_eq!(cfg.log_capacity, 16);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let cfg = AppCfg::from_lookup(lookup_from(&[
            ("RNRS_WORKER_THREADS", "0"),
            ("RNRS_LOG_CAPACITY", "lots"),
        ]));
        assert!(cfg.worker_threads >= 1);
        assert_eq!(cfg.log_capacity, DEFAULT_LOG_CAPACITY);

        let cfg = AppCfg::from_lookup(lookup_from(&[("RNRS_LOG_CAPACITY", "0")]));
        assert_eq!(cfg.log_capacity, 1);
    }
}
