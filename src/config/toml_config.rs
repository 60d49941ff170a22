use crate::domain::model::PayloadShape;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ReorderError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_path_segment, validate_range, validate_url,
    Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_REORDER_PATH: &str = "reorder";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub collection: CollectionConfig,
    pub payload: Option<PayloadConfig>,
    pub http: Option<HttpConfig>,
    pub session: Option<SessionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub name: String,
    pub endpoint: String,
    pub reorder_path: Option<String>,
    pub list_field: Option<String>,
    pub id_field: Option<String>,
}

/// `preset` picks a known shape ("offers", "products"); explicit fields
/// override it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayloadConfig {
    pub preset: Option<String>,
    pub items_field: Option<String>,
    pub id_field: Option<String>,
    pub rank_field: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub token_file: String,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReorderError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_BASE})，未定義的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReorderError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn name(&self) -> &str {
        &self.collection.name
    }

    pub fn token_file(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token_file.as_str())
    }

    fn preset_shape(&self) -> Result<PayloadShape> {
        let preset = self.payload.as_ref().and_then(|p| p.preset.as_deref());
        match preset {
            None | Some("default") => Ok(PayloadShape::default()),
            Some("offers") => Ok(PayloadShape::offers()),
            Some("products") => Ok(PayloadShape::products()),
            Some(other) => Err(ReorderError::InvalidConfigValueError {
                field: "payload.preset".to_string(),
                value: other.to_string(),
                reason: "Valid presets: default, offers, products".to_string(),
            }),
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("collection.name", &self.collection.name)?;
        validate_url("collection.endpoint", &self.collection.endpoint)?;
        validate_path_segment("collection.reorder_path", self.reorder_path())?;
        validate_non_empty_string("collection.id_field", self.entity_id_field())?;
        if let Some(field) = &self.collection.list_field {
            validate_non_empty_string("collection.list_field", field)?;
        }

        let shape = self.preset_shape()?;
        if let Some(payload) = &self.payload {
            for (name, value) in [
                ("payload.items_field", &payload.items_field),
                ("payload.id_field", &payload.id_field),
                ("payload.rank_field", &payload.rank_field),
            ] {
                if let Some(value) = value {
                    validate_non_empty_string(name, value)?;
                }
            }
        }
        let shape = self.apply_overrides(shape);
        if shape.id_field == shape.rank_field {
            return Err(ReorderError::InvalidConfigValueError {
                field: "payload.rank_field".to_string(),
                value: shape.rank_field,
                reason: "id and rank fields must differ".to_string(),
            });
        }

        if let Some(timeout) = self.http.as_ref().and_then(|h| h.timeout_seconds) {
            validate_range("http.timeout_seconds", timeout, 1, 300)?;
        }

        if let Some(token_file) = self.token_file() {
            validate_path("session.token_file", token_file)?;
        }

        Ok(())
    }

    fn apply_overrides(&self, mut shape: PayloadShape) -> PayloadShape {
        if let Some(payload) = &self.payload {
            if let Some(items) = &payload.items_field {
                shape.items_field = items.clone();
            }
            if let Some(id) = &payload.id_field {
                shape.id_field = id.clone();
            }
            if let Some(rank) = &payload.rank_field {
                shape.rank_field = rank.clone();
            }
        }
        shape
    }
}

impl ConfigProvider for TomlConfig {
    fn collection_endpoint(&self) -> &str {
        &self.collection.endpoint
    }

    fn reorder_path(&self) -> &str {
        self.collection
            .reorder_path
            .as_deref()
            .unwrap_or(DEFAULT_REORDER_PATH)
    }

    fn list_field(&self) -> Option<&str> {
        self.collection.list_field.as_deref()
    }

    fn entity_id_field(&self) -> &str {
        self.collection.id_field.as_deref().unwrap_or("id")
    }

    fn payload_shape(&self) -> PayloadShape {
        // 未知 preset 在 validate 時已回報
        let shape = self.preset_shape().unwrap_or_default();
        self.apply_overrides(shape)
    }

    fn request_timeout(&self) -> Duration {
        let seconds = self
            .http
            .as_ref()
            .and_then(|h| h.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        Duration::from_secs(seconds)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[collection]
name = "offers"
endpoint = "https://api.example.com/admin/offers"
list_field = "data"

[payload]
preset = "offers"

[http]
timeout_seconds = 10
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        config.validate().unwrap();

        assert_eq!(config.name(), "offers");
        assert_eq!(config.reorder_path(), "reorder");
        assert_eq!(config.list_field(), Some("data"));
        assert_eq!(config.payload_shape(), PayloadShape::offers());
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.token_file(), None);
    }

    #[test]
    fn test_explicit_fields_override_preset() {
        let toml_content = r#"
[collection]
name = "products"
endpoint = "https://api.example.com/products"
reorder_path = "order/bulk"

[payload]
preset = "products"
items_field = "products"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        config.validate().unwrap();
        let shape = config.payload_shape();
        assert_eq!(shape.items_field, "products");
        assert_eq!(shape.rank_field, "order");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MERCH_TEST_API_BASE", "https://shop.test");

        let toml_content = r#"
[collection]
name = "offers"
endpoint = "${MERCH_TEST_API_BASE}/offers"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.collection.endpoint, "https://shop.test/offers");

        std::env::remove_var("MERCH_TEST_API_BASE");
    }

    #[test]
    fn test_config_validation() {
        let cases = [
            r#"
[collection]
name = "offers"
endpoint = "invalid-url"
"#,
            r#"
[collection]
name = "offers"
endpoint = "https://api.example.com/offers"
reorder_path = "/reorder"
"#,
            r#"
[collection]
name = "offers"
endpoint = "https://api.example.com/offers"

[payload]
preset = "banners"
"#,
            r#"
[collection]
name = "offers"
endpoint = "https://api.example.com/offers"

[http]
timeout_seconds = 0
"#,
            r#"
[collection]
name = "offers"
endpoint = "https://api.example.com/offers"

[payload]
rank_field = "id"
"#,
        ];

        for toml_content in cases {
            let config = TomlConfig::from_toml_str(toml_content).unwrap();
            assert!(config.validate().is_err(), "expected invalid: {}", toml_content);
        }
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[collection]
name = "file-test"
endpoint = "https://api.example.com/offers"

[session]
token_file = "/tmp/merch-session"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.name(), "file-test");
        assert_eq!(config.token_file(), Some("/tmp/merch-session"));
    }
}
