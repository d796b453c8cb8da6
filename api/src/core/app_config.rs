//! HTTP-side configuration loaded from environment variables.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::error_handler::AppError;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_CORS_ORIGIN: &str = "https://wizedia.vercel.app";
pub const DEFAULT_FIREBASE_AUTH_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Allowed CORS origins.
#[derive(Debug, Clone)]
pub enum CorsOrigins {
    Any,
    List(Vec<HeaderValue>),
}

impl CorsOrigins {
    /// Parses a comma separated origin list; `*` means any origin.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let mut origins = Vec::new();
        for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if item == "*" {
                return Ok(CorsOrigins::Any);
            }
            // Browsers send origins without a trailing slash.
            let origin = item.trim_end_matches('/');
            let value = HeaderValue::from_str(origin)
                .map_err(|_| AppError::InvalidConfig(format!("invalid CORS origin: {item}")))?;
            origins.push(value);
        }
        if origins.is_empty() {
            return Err(AppError::InvalidConfig("CORS_ORIGINS is empty".into()));
        }
        Ok(CorsOrigins::List(origins))
    }

    pub fn layer(&self) -> CorsLayer {
        let base = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);
        match self {
            CorsOrigins::Any => base.allow_origin(Any),
            CorsOrigins::List(list) => base.allow_origin(AllowOrigin::list(list.iter().cloned())),
        }
    }
}

/// Firebase Identity Toolkit settings for optional auth.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the listener binds to, e.g. `0.0.0.0:5000`.
    pub bind_addr: String,
    pub cors: CorsOrigins,
    /// `None` disables token verification; every caller is anonymous.
    pub firebase: Option<FirebaseConfig>,
}

impl AppConfig {
    /// Load from environment.
    ///
    /// - `API_ADDRESS` wins over `PORT` (default `5000` on `0.0.0.0`)
    /// - `CORS_ORIGINS` (default the production frontend)
    /// - `FIREBASE_WEB_API_KEY`, `FIREBASE_AUTH_URL`
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`AppConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(get: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| get(k).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("API_ADDRESS") {
            Some(addr) => addr,
            None => {
                let port = match get("PORT") {
                    Some(p) => p.trim().parse::<u16>().map_err(|_| {
                        AppError::InvalidConfig(format!("PORT must be a u16, got `{p}`"))
                    })?,
                    None => DEFAULT_PORT,
                };
                format!("0.0.0.0:{port}")
            }
        };

        let cors = CorsOrigins::parse(
            get("CORS_ORIGINS")
                .as_deref()
                .unwrap_or(DEFAULT_CORS_ORIGIN),
        )?;

        let firebase = get("FIREBASE_WEB_API_KEY").map(|api_key| FirebaseConfig {
            api_key,
            base_url: get("FIREBASE_AUTH_URL")
                .unwrap_or_else(|| DEFAULT_FIREBASE_AUTH_URL.to_string()),
        });

        Ok(Self {
            bind_addr,
            cors,
            firebase,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:5000");
        assert!(cfg.firebase.is_none());
        match cfg.cors {
            CorsOrigins::List(list) => {
                assert_eq!(list, vec![HeaderValue::from_static(DEFAULT_CORS_ORIGIN)])
            }
            CorsOrigins::Any => panic!("expected explicit origin list"),
        }
    }

    #[test]
    fn port_and_address() {
        assert_eq!(load(&[("PORT", "8080")]).unwrap().bind_addr, "0.0.0.0:8080");
        assert_eq!(
            load(&[("PORT", "8080"), ("API_ADDRESS", "127.0.0.1:3000")])
                .unwrap()
                .bind_addr,
            "127.0.0.1:3000"
        );
        assert!(matches!(
            load(&[("PORT", "http")]),
            Err(AppError::InvalidConfig(_))
        ));
    }

    #[test]
    fn cors_origins_parse() {
        assert!(matches!(CorsOrigins::parse("*").unwrap(), CorsOrigins::Any));
        match CorsOrigins::parse("https://a.test/, http://localhost:3000").unwrap() {
            CorsOrigins::List(list) => {
                assert_eq!(list.len(), 2);
                assert_eq!(list[0], "https://a.test");
            }
            CorsOrigins::Any => panic!("expected list"),
        }
        assert!(CorsOrigins::parse(" , ").is_err());
    }

    #[test]
    fn firebase_enabled_by_key() {
        let cfg = load(&[("FIREBASE_WEB_API_KEY", "k")]).unwrap();
        let fb = cfg.firebase.unwrap();
        assert_eq!(fb.api_key, "k");
        assert_eq!(fb.base_url, DEFAULT_FIREBASE_AUTH_URL);
    }
}
