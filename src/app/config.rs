use crate::app::AppError;
use crate::domain::summary::SummaryBounds;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_bind: String,
    pub http_workers: Option<usize>,
    pub summary_bounds: SummaryBounds,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let low = parse_or_default(&lookup, "SUMMARY_SECONDS_LOWER_LIMIT", 1_i64)?;
        let high = parse_or_default(&lookup, "SUMMARY_SECONDS_UPPER_LIMIT", 60_i64)?;
        let summary_bounds = SummaryBounds::new(low, high)
            .map_err(|err| AppError::config(format!("summary seconds limits: {err}")))?;

        let http_workers = match non_empty(&lookup, "HTTP_WORKERS") {
            Some(raw) => Some(
                raw.parse::<usize>()
                    .ok()
                    .filter(|workers| *workers > 0)
                    .ok_or_else(|| AppError::config("HTTP_WORKERS must be a positive number"))?,
            ),
            None => None,
        };

        Ok(Self {
            http_bind: non_empty(&lookup, "HTTP_BIND").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            http_workers,
            summary_bounds,
            cors_allowed_origins: non_empty(&lookup, "CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(ToString::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{key} must be a valid number"))),
        None => Ok(default),
    }
}
