use crate::model::ConfigError;
use std::time::Duration;

pub const DEFAULT_SHOPPING_URL: &str = "https://openapi.naver.com/v1/search/shop.json";
pub const DEFAULT_TREND_URL: &str = "https://openapi.naver.com/v1/datalab/search";

/// Representative keyword per category, in publication order.
const DEFAULT_CATEGORIES: [(&str, &str); 10] = [
    ("패션의류", "원피스"),
    ("패션잡화", "가방"),
    ("화장품/미용", "선크림"),
    ("디지털/가전", "무선이어폰"),
    ("가구/인테리어", "수납장"),
    ("출산/육아", "기저귀"),
    ("식품", "견과류"),
    ("스포츠/레저", "요가매트"),
    ("생활/건강", "손난로"),
    ("여가/생활편의", "캠핑용품"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryKeyword {
    pub category: String,
    pub keyword: String,
}

#[derive(Debug, Clone)]
pub struct QueueConfig {
    pub queue_url: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub wait_seconds: i32,
    pub error_backoff: Duration,
}

#[derive(Debug, Clone)]
pub struct MarketApiConfig {
    pub client_id: String,
    pub client_secret: String,
    pub shopping_url: String,
    pub trend_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub verify_tls: bool,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub queue: QueueConfig,
    pub market_api: MarketApiConfig,
    pub backend: BackendConfig,
    /// `None` disables ranking publication.
    pub ranking_interval: Option<Duration>,
    pub ranking_categories: Vec<CategoryKeyword>,
}

/// Loads configuration from the environment, reading a `.env` file first if one exists.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_config(|key| std::env::var(key))
}

/// Parses configuration through `lookup` so tests can feed a plain map.
pub fn build_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };
    let optional = |var: &str| lookup(var).ok().filter(|v| !v.trim().is_empty());
    let or_default = |var: &str, default: &str| optional(var).unwrap_or_else(|| default.to_string());
    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };
    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };
    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match optional(var) {
            None => Ok(default),
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
            },
        }
    };

    let wait_seconds = parse_u64("POLL_WAIT_SECONDS", "20")?;
    if wait_seconds > 20 {
        return Err(invalid("POLL_WAIT_SECONDS", "long-poll wait must be 0..=20".into()));
    }

    let ranking_secs = parse_u64("RANKING_INTERVAL_SECS", "3600")?;
    let ranking_categories = match optional("RANKING_CATEGORIES") {
        Some(raw) => parse_categories(&raw).map_err(|reason| invalid("RANKING_CATEGORIES", reason))?,
        None => default_categories(),
    };

    Ok(AppConfig {
        queue: QueueConfig {
            queue_url: require("SQS_QUEUE_URL")?,
            region: or_default("AWS_REGION", "us-east-1"),
            endpoint_url: optional("SQS_ENDPOINT_URL"),
            wait_seconds: wait_seconds as i32,
            error_backoff: Duration::from_secs(parse_u64("QUEUE_ERROR_BACKOFF_SECS", "10")?),
        },
        market_api: MarketApiConfig {
            client_id: require("NAVER_CLIENT_ID")?,
            client_secret: require("NAVER_CLIENT_SECRET")?,
            shopping_url: or_default("NAVER_SHOPPING_URL", DEFAULT_SHOPPING_URL),
            trend_url: or_default("NAVER_TREND_URL", DEFAULT_TREND_URL),
            timeout: Duration::from_secs(parse_u64("API_TIMEOUT_SECS", "10")?),
        },
        backend: BackendConfig {
            base_url: require("BACKEND_BASE_URL")?,
            verify_tls: parse_bool("BACKEND_VERIFY_TLS", true)?,
            timeout: Duration::from_secs(parse_u64("DELIVERY_TIMEOUT_SECS", "5")?),
        },
        ranking_interval: (ranking_secs > 0).then(|| Duration::from_secs(ranking_secs)),
        ranking_categories,
    })
}

pub fn default_categories() -> Vec<CategoryKeyword> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(category, keyword)| CategoryKeyword {
            category: category.to_string(),
            keyword: keyword.to_string(),
        })
        .collect()
}

/// Parses `Label=keyword;Label=keyword`, keeping the written order.
fn parse_categories(raw: &str) -> Result<Vec<CategoryKeyword>, String> {
    let mut out = Vec::new();
    for pair in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (category, keyword) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected Label=keyword, got '{pair}'"))?;
        let (category, keyword) = (category.trim(), keyword.trim());
        if category.is_empty() || keyword.is_empty() {
            return Err(format!("empty label or keyword in '{pair}'"));
        }
        out.push(CategoryKeyword {
            category: category.to_string(),
            keyword: keyword.to_string(),
        });
    }
    if out.is_empty() {
        return Err("no categories given".into());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(map: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Result<String, std::env::VarError> {
        move |key: &str| map.get(key).map(|v| v.to_string()).ok_or(std::env::VarError::NotPresent)
    }

    fn required() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SQS_QUEUE_URL", "https://sqs.us-east-1.amazonaws.com/123/jobs"),
            ("BACKEND_BASE_URL", "http://backend:8080"),
            ("NAVER_CLIENT_ID", "id"),
            ("NAVER_CLIENT_SECRET", "secret"),
        ])
    }

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let cfg = build_config(lookup_from(required())).unwrap();
        assert_eq!(cfg.queue.wait_seconds, 20);
        assert_eq!(cfg.queue.region, "us-east-1");
        assert_eq!(cfg.queue.error_backoff, Duration::from_secs(10));
        assert!(cfg.backend.verify_tls);
        assert_eq!(cfg.backend.timeout, Duration::from_secs(5));
        assert_eq!(cfg.market_api.shopping_url, DEFAULT_SHOPPING_URL);
        assert_eq!(cfg.ranking_interval, Some(Duration::from_secs(3600)));
        assert_eq!(cfg.ranking_categories.len(), 10);
    }

    #[test]
    fn missing_queue_url_is_reported() {
        let mut vars = required();
        vars.remove("SQS_QUEUE_URL");
        let err = build_config(lookup_from(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(v) if v == "SQS_QUEUE_URL"));
    }

    #[test]
    fn tls_verification_can_be_disabled_explicitly() {
        let mut vars = required();
        vars.insert("BACKEND_VERIFY_TLS", "false");
        let cfg = build_config(lookup_from(vars)).unwrap();
        assert!(!cfg.backend.verify_tls);
    }

    #[test]
    fn garbage_boolean_is_rejected() {
        let mut vars = required();
        vars.insert("BACKEND_VERIFY_TLS", "maybe");
        assert!(matches!(
            build_config(lookup_from(vars)),
            Err(ConfigError::InvalidEnvVar { .. })
        ));
    }

    #[test]
    fn wait_above_sqs_limit_is_rejected() {
        let mut vars = required();
        vars.insert("POLL_WAIT_SECONDS", "30");
        assert!(build_config(lookup_from(vars)).is_err());
    }

    #[test]
    fn zero_interval_disables_ranking() {
        let mut vars = required();
        vars.insert("RANKING_INTERVAL_SECS", "0");
        let cfg = build_config(lookup_from(vars)).unwrap();
        assert_eq!(cfg.ranking_interval, None);
    }

    #[test]
    fn custom_categories_keep_their_order() {
        let mut vars = required();
        vars.insert("RANKING_CATEGORIES", "Fashion=coat; Food = nuts ;");
        let cfg = build_config(lookup_from(vars)).unwrap();
        assert_eq!(
            cfg.ranking_categories,
            vec![
                CategoryKeyword { category: "Fashion".into(), keyword: "coat".into() },
                CategoryKeyword { category: "Food".into(), keyword: "nuts".into() },
            ]
        );
    }

    #[test]
    fn malformed_categories_are_rejected() {
        let mut vars = required();
        vars.insert("RANKING_CATEGORIES", "Fashion");
        assert!(build_config(lookup_from(vars)).is_err());
    }
}
