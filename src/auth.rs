use crate::{config::Config, error::AppError, logging::SensitiveKey};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::warn;

/// Admin identity attached to each authenticated request
#[derive(Debug, Clone)]
pub struct AdminInfo {
    /// Name of the admin key used
    pub key_name: String,
}

/// Admin authentication middleware
///
/// Accepts `Authorization: Bearer <key>` matching an enabled `admin_keys` entry.
pub async fn admin_middleware(
    State(config): State<Arc<Config>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = extract_bearer_token(auth_header)?;

    let Some(name) = find_admin_key(&config, token) else {
        warn!(key = %SensitiveKey::new(token), path = %req.uri().path(), "Rejected admin key");
        return Err(AppError::Unauthorized("Invalid or disabled admin key".to_string()));
    };

    req.extensions_mut().insert(AdminInfo { key_name: name });

    Ok(next.run(req).await)
}

fn find_admin_key(config: &Config, token: &str) -> Option<String> {
    config
        .admin_keys
        .iter()
        .filter(|k| k.enabled)
        .find(|k| bool::from(k.key.as_bytes().ct_eq(token.as_bytes())))
        .map(|k| k.name.clone())
}

fn extract_bearer_token(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Authorization header must use Bearer scheme".to_string())
    })?;

    if token.is_empty() {
        return Err(AppError::Unauthorized("Bearer token is empty".to_string()));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AdminKeyConfig, Config, DashboardConfig, RealtimeConfig, ServerConfig, SupabaseConfig,
    };
    use axum::{body::Body, http::Request, middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn create_test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                log_level: "info".to_string(),
                log_format: "text".to_string(),
            },
            supabase: SupabaseConfig {
                url: "https://demo.supabase.co".to_string(),
                service_role_key: "service-role-test".to_string(),
                schema: "public".to_string(),
                timeout_seconds: 30,
            },
            realtime: RealtimeConfig::default(),
            dashboard: DashboardConfig::default(),
            admin_keys: vec![
                AdminKeyConfig {
                    key: "admin-001".to_string(),
                    name: "owner".to_string(),
                    enabled: true,
                },
                AdminKeyConfig {
                    key: "admin-002".to_string(),
                    name: "former-staff".to_string(),
                    enabled: false,
                },
            ],
        }
    }

    fn app() -> Router {
        let config = Arc::new(create_test_config());
        Router::new()
            .route(
                "/test",
                get(|Extension(admin): Extension<AdminInfo>| async move { admin.key_name }),
            )
            .layer(middleware::from_fn_with_state(config, admin_middleware))
    }

    async fn status_for(header: Option<&str>) -> u16 {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = header {
            builder = builder.header("Authorization", value);
        }
        let response = app().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        response.status().as_u16()
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer admin-001").unwrap(), "admin-001");
        assert!(extract_bearer_token("admin-001").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
    }

    #[test]
    fn test_find_admin_key_skips_disabled() {
        let config = create_test_config();
        assert_eq!(find_admin_key(&config, "admin-001").as_deref(), Some("owner"));
        assert!(find_admin_key(&config, "admin-002").is_none());
        assert!(find_admin_key(&config, "admin-00").is_none());
    }

    #[tokio::test]
    async fn test_middleware_accepts_valid_key() {
        assert_eq!(status_for(Some("Bearer admin-001")).await, 200);
    }

    #[tokio::test]
    async fn test_middleware_rejects_bad_requests() {
        assert_eq!(status_for(None).await, 401);
        assert_eq!(status_for(Some("Bearer admin-002")).await, 401);
        assert_eq!(status_for(Some("Bearer nope")).await, 401);
        assert_eq!(status_for(Some("Basic admin-001")).await, 401);
    }
}
