use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Dataset to load; `None` means generate a mock dataset.
    pub dataset_path: Option<PathBuf>,
    pub mock_seed: u64,
    pub mock_matches: usize,
    pub tick: Duration,
    pub timeline_step_minutes: u16,
    pub export_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_path: None,
            mock_seed: 7,
            mock_matches: 4,
            tick: Duration::from_millis(250),
            timeline_step_minutes: 1,
            export_path: None,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Loads `.env.local` then `.env` (first value wins) and reads the process environment.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Settings::default();
        let text = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let tick_ms = text("DASHBOARD_TICK_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(d.tick.as_millis() as u64)
            .clamp(50, 5_000);

        Self {
            dataset_path: text("METRICS_DATASET").map(PathBuf::from),
            mock_seed: text("METRICS_MOCK_SEED")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(d.mock_seed),
            mock_matches: text("METRICS_MOCK_MATCHES")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(d.mock_matches)
                .clamp(1, 64),
            tick: Duration::from_millis(tick_ms),
            timeline_step_minutes: text("TIMELINE_STEP_MINUTES")
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(d.timeline_step_minutes)
                .clamp(1, 15),
            export_path: text("METRICS_EXPORT_PATH").map(PathBuf::from),
            log_filter: text("METRICS_LOG").unwrap_or(d.log_filter),
        }
    }
}

/// Installs the fmt subscriber used by the command-line binaries.
pub fn init_tracing(settings: &Settings) {
    let filter = tracing_subscriber::EnvFilter::try_new(&settings.log_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(settings(&[]), Settings::default());
    }

    #[test]
    fn values_are_parsed_and_clamped() {
        let s = settings(&[
            ("METRICS_DATASET", " data/cup.json "),
            ("DASHBOARD_TICK_MS", "5"),
            ("TIMELINE_STEP_MINUTES", "90"),
            ("METRICS_MOCK_MATCHES", "abc"),
            ("METRICS_LOG", "debug"),
        ]);
        assert_eq!(s.dataset_path, Some(PathBuf::from("data/cup.json")));
        assert_eq!(s.tick, Duration::from_millis(50));
        assert_eq!(s.timeline_step_minutes, 15);
        assert_eq!(s.mock_matches, 4);
        assert_eq!(s.log_filter, "debug");
    }

    #[test]
    fn blank_values_are_ignored() {
        let s = settings(&[("METRICS_EXPORT_PATH", "   "), ("METRICS_DATASET", "")]);
        assert!(s.export_path.is_none());
        assert!(s.dataset_path.is_none());
    }
}
