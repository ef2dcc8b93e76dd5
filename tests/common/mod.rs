//! PostgREST mock helpers shared by the integration tests

#![allow(dead_code)]

use miraidev::config::{
    AdminKeyConfig, Config, DashboardConfig, RealtimeConfig, ServerConfig, SupabaseConfig,
};
use miraidev::supabase::SupabaseClient;
use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub const ADMIN_KEY: &str = "admin-test-key";

pub fn supabase_config(server: &MockServer) -> SupabaseConfig {
    SupabaseConfig {
        url: server.uri(),
        service_role_key: "service-role-test".to_string(),
        schema: "public".to_string(),
        timeout_seconds: 5,
    }
}

pub fn supabase_client(server: &MockServer) -> SupabaseClient {
    SupabaseClient::new(&supabase_config(server)).unwrap()
}

pub fn test_config(server: &MockServer) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        },
        supabase: supabase_config(server),
        realtime: RealtimeConfig::default(),
        dashboard: DashboardConfig::default(),
        admin_keys: vec![AdminKeyConfig {
            key: ADMIN_KEY.to_string(),
            name: "owner".to_string(),
            enabled: true,
        }],
    }
}

/// PostgREST `Content-Range` for `returned` rows out of `total`
fn content_range(returned: usize, total: u64) -> String {
    if returned == 0 {
        format!("*/{}", total)
    } else {
        format!("0-{}/{}", returned - 1, total)
    }
}

/// Answer every read of `table` with `rows`; exact counts see the same rows
pub async fn mount_table(server: &MockServer, table: &str, rows: Value) {
    let returned = rows.as_array().map_or(0, Vec::len);
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{}", table)))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Range", content_range(returned, returned as u64))
                .set_body_json(rows),
        )
        .mount(server)
        .await;
}

/// `count=exact` read of `table` (optionally with one filter) reporting `total`
///
/// Takes precedence over [`mount_table`] and [`mount_table_error`].
pub fn count_mock(table: &str, filter: Option<(&str, &str)>, total: u64) -> Mock {
    let mut builder = Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{}", table)))
        .and(header("Prefer", "count=exact"));
    if let Some((key, value)) = filter {
        builder = builder.and(query_param(key, value));
    }

    let returned = usize::from(total > 0);
    builder
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Range", content_range(returned, total))
                .set_body_json(if returned == 0 { json!([]) } else { json!([{"id": 1}]) }),
        )
        .with_priority(1)
}

/// Answer every read of `table` with a PostgREST error
pub async fn mount_table_error(server: &MockServer, table: &str, status: u16, message: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/v1/{}", table)))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "code": "42P01",
            "message": message,
            "hint": null,
        })))
        .mount(server)
        .await;
}

pub fn project_types() -> Value {
    json!([
        {"id": "company-profile", "name": "Company Profile", "base_price": 2000000, "is_active": true},
        {"id": "landing-page", "name": "Landing Page", "base_price": 1500000, "is_active": true}
    ])
}

pub fn page_prices() -> Value {
    json!([
        {"id": 1, "page_count": 5, "price_per_page": 75000, "is_active": true},
        {"id": 2, "page_count": 10, "price_per_page": 50000, "is_active": true}
    ])
}

pub fn feature_prices() -> Value {
    json!([
        {"id": "seo", "name": "SEO Dasar", "price": 300000, "is_active": true},
        {"id": "blog", "name": "Blog", "price": 150000, "is_active": true}
    ])
}

pub fn complexity_prices() -> Value {
    json!([
        {"id": "standard", "name": "Standar", "multiplier": 1.0, "is_active": true},
        {"id": "complex", "name": "Kompleks", "multiplier": 1.2, "is_active": true}
    ])
}

pub fn timeline_prices() -> Value {
    json!([
        {"id": "normal", "name": "Normal", "multiplier": 1.0, "is_active": true},
        {"id": "fast", "name": "Cepat", "multiplier": 1.1, "is_active": true}
    ])
}

pub fn pricing_packages() -> Value {
    json!([
        {
            "id": "starter",
            "name": "Paket Starter",
            "price": 2500000,
            "description": "Website 5 halaman",
            "features": ["5 halaman", "Domain .com", "SSL"],
            "is_popular": false,
            "is_active": true
        }
    ])
}

/// Mount all six pricing lookup tables
pub async fn mount_pricing_tables(server: &MockServer) {
    mount_table(server, "project_types", project_types()).await;
    mount_table(server, "page_prices", page_prices()).await;
    mount_table(server, "feature_prices", feature_prices()).await;
    mount_table(server, "complexity_prices", complexity_prices()).await;
    mount_table(server, "timeline_prices", timeline_prices()).await;
    mount_table(server, "pricing_packages", pricing_packages()).await;
}

/// Mount the four dashboard tables, all empty
pub async fn mount_empty_dashboard_tables(server: &MockServer) {
    for table in ["portfolio", "projects", "clients", "contact_submissions"] {
        mount_table(server, table, json!([])).await;
    }
}
