//! 日志初始化与敏感信息脱敏
//!
//! Supabase service-role keys and admin keys must never reach the logs in clear.

use std::fmt;
use tracing_subscriber::{fmt as tracing_fmt, prelude::*, EnvFilter};

/// 脱敏后的 key 表示
///
/// 只显示前 8 个字符，其余替换为 `***`
#[derive(Clone, Debug)]
pub struct SensitiveKey<'a> {
    inner: &'a str,
}

impl<'a> SensitiveKey<'a> {
    /// # 示例
    /// ```
    /// use miraidev::logging::SensitiveKey;
    ///
    /// let key = "eyJhbGciOiJIUzI1NiJ9.payload.signature";
    /// assert_eq!(format!("{}", SensitiveKey::new(key)), "eyJhbGci***");
    /// ```
    pub fn new(key: &'a str) -> Self {
        Self { inner: key }
    }
}

impl<'a> fmt::Display for SensitiveKey<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible_len = 8.min(self.inner.len());
        if self.inner.len() <= visible_len {
            // key 太短，全部脱敏
            write!(f, "***")
        } else {
            // char boundary safe slice
            let cut = self
                .inner
                .char_indices()
                .nth(visible_len)
                .map(|(idx, _)| idx)
                .unwrap_or(self.inner.len());
            write!(f, "{}***", &self.inner[..cut])
        }
    }
}

/// Initialize tracing with the configured level and output format
///
/// `RUST_LOG` takes precedence over `log_level`. Can only be called once.
pub fn init_tracing(log_level: &str, log_format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_fmt::layer().with_target(true))
            .init();
    }
}
