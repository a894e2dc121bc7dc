use axum::http::{HeaderName, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsConfig;

/// 列表型配置项的解析结果："*" 命中即任意，其余逐个解析。
enum ListRule<T> {
    Disabled,
    AllowAny,
    Explicit(Vec<T>),
}

impl<T> ListRule<T> {
    fn parse(values: &[String], mut convert: impl FnMut(&str) -> Option<T>) -> Self {
        let mut parsed = Vec::new();
        for raw in values {
            let value = raw.trim();
            if value.is_empty() {
                continue;
            }
            if value == "*" {
                return ListRule::AllowAny;
            }
            if let Some(v) = convert(value) {
                parsed.push(v);
            }
        }
        if parsed.is_empty() {
            ListRule::Disabled
        } else {
            ListRule::Explicit(parsed)
        }
    }
}

/// 根据配置构建 CORS 中间件
///
/// allowed_origins 为空时视为未启用，返回 None。
pub fn build_cors_layer(cors: &CorsConfig) -> Option<CorsLayer> {
    if !cors.enabled {
        return None;
    }

    let origins = ListRule::parse(&cors.allowed_origins, |v| match HeaderValue::from_str(v) {
        Ok(h) => Some(h),
        Err(_) => {
            tracing::warn!("CORS allowed_origins 含无效值: {}", v);
            None
        }
    });
    if matches!(origins, ListRule::Disabled) {
        tracing::warn!("CORS 已启用但 allowed_origins 为空，已跳过启用");
        return None;
    }

    let methods = ListRule::parse(&cors.allowed_methods, |v| {
        match Method::from_bytes(v.to_ascii_uppercase().as_bytes()) {
            Ok(m) => Some(m),
            Err(_) => {
                tracing::warn!("CORS allowed_methods 含无效值: {}", v);
                None
            }
        }
    });
    let headers = ListRule::parse(&cors.allowed_headers, |v| {
        match HeaderName::from_bytes(v.to_ascii_lowercase().as_bytes()) {
            Ok(h) => Some(h),
            Err(_) => {
                tracing::warn!("CORS allowed_headers 含无效值: {}", v);
                None
            }
        }
    });

    let mut layer = CorsLayer::new();

    layer = match origins {
        ListRule::AllowAny => layer.allow_origin(Any),
        ListRule::Explicit(list) => layer.allow_origin(list),
        ListRule::Disabled => unreachable!(),
    };
    layer = match methods {
        ListRule::AllowAny => layer.allow_methods(Any),
        ListRule::Explicit(list) => layer.allow_methods(list),
        ListRule::Disabled => layer,
    };
    layer = match headers {
        ListRule::AllowAny => layer.allow_headers(Any),
        ListRule::Explicit(list) => layer.allow_headers(list),
        ListRule::Disabled => layer,
    };

    if let Some(secs) = cors.max_age_secs
        && secs > 0
    {
        layer = layer.max_age(Duration::from_secs(secs));
    }

    Some(layer)
}

#[cfg(test)]
mod tests {
    use super::build_cors_layer;
    use crate::config::CorsConfig;

    #[test]
    fn build_cors_layer_skips_when_disabled() {
        let cors = CorsConfig::default();
        assert!(build_cors_layer(&cors).is_none());
    }

    #[test]
    fn build_cors_layer_skips_when_origins_empty() {
        let cors = CorsConfig {
            enabled: true,
            ..CorsConfig::default()
        };
        assert!(build_cors_layer(&cors).is_none());
    }

    #[test]
    fn build_cors_layer_accepts_wildcard_origin() {
        let cors = CorsConfig {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["get".to_string(), " POST ".to_string()],
            ..CorsConfig::default()
        };
        assert!(build_cors_layer(&cors).is_some());
    }
}
