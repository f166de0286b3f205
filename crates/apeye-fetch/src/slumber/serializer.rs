use crate::{Error, Result};
use serde_json::Value;
use std::fmt;

/// Encodes and decodes request and response bodies for one format.
pub trait Serializer: Send + Sync {
    /// Format name, such as `json`.
    fn key(&self) -> &'static str;

    /// Content types this serializer accepts. The first is the one it sends.
    fn content_types(&self) -> &'static [&'static str];

    fn content_type(&self) -> &'static str {
        self.content_types()
            .first()
            .copied()
            .unwrap_or("application/octet-stream")
    }

    fn loads(&self, data: &str) -> Result<Value>;

    fn dumps(&self, data: &Value) -> Result<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn key(&self) -> &'static str { "json" }

    fn content_types(&self) -> &'static [&'static str] {
        &[
            "application/json",
            "application/x-javascript",
            "text/javascript",
            "text/x-javascript",
            "text/x-json",
        ]
    }

    fn loads(&self, data: &str) -> Result<Value> {
        serde_json::from_str(data).map_err(|e| Error::Serializer(format!("invalid JSON: {e}")))
    }

    fn dumps(&self, data: &Value) -> Result<String> {
        serde_json::to_string(data).map_err(|e| Error::Serializer(format!("cannot encode JSON: {e}")))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct YamlSerializer;

impl Serializer for YamlSerializer {
    fn key(&self) -> &'static str { "yaml" }

    fn content_types(&self) -> &'static [&'static str] { &["text/yaml"] }

    fn loads(&self, data: &str) -> Result<Value> {
        serde_yaml::from_str(data).map_err(|e| Error::Serializer(format!("invalid YAML: {e}")))
    }

    fn dumps(&self, data: &Value) -> Result<String> {
        serde_yaml::to_string(data).map_err(|e| Error::Serializer(format!("cannot encode YAML: {e}")))
    }
}

/// Serializers by format name, with a default format.
pub struct SerializerRegistry {
    default:     String,
    serializers: Vec<Box<dyn Serializer>>,
}

impl Default for SerializerRegistry {
    fn default() -> Self { Self::new("json") }
}

impl SerializerRegistry {
    /// JSON and YAML, defaulting to `default`.
    pub fn new(default: impl Into<String>) -> Self {
        Self::with_serializers(default, vec![Box::new(JsonSerializer), Box::new(YamlSerializer)])
    }

    pub fn with_serializers(default: impl Into<String>, serializers: Vec<Box<dyn Serializer>>) -> Self {
        Self {
            default: default.into(),
            serializers,
        }
    }

    pub fn default_format(&self) -> &str { &self.default }

    /// The serializer for `name`, or for the default format.
    pub fn get_serializer(&self, name: Option<&str>) -> Result<&dyn Serializer> {
        let name = name.unwrap_or(&self.default);
        self.serializers
            .iter()
            .find(|s| s.key() == name)
            .map(|s| &**s)
            .ok_or_else(|| Error::SerializerNotAvailable(name.to_string()))
    }

    pub fn get_serializer_for_content_type(&self, content_type: &str) -> Result<&dyn Serializer> {
        self.serializers
            .iter()
            .find(|s| s.content_types().iter().any(|ct| *ct == content_type))
            .map(|s| &**s)
            .ok_or_else(|| Error::SerializerNotAvailable(content_type.to_string()))
    }

    pub fn loads(&self, data: &str, format: Option<&str>) -> Result<Value> { self.get_serializer(format)?.loads(data) }

    pub fn dumps(&self, data: &Value, format: Option<&str>) -> Result<String> {
        self.get_serializer(format)?.dumps(data)
    }

    pub fn get_content_type(&self, format: Option<&str>) -> Result<&'static str> {
        Ok(self.get_serializer(format)?.content_type())
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<_> = self.serializers.iter().map(|s| s.key()).collect();
        f.debug_struct("SerializerRegistry")
            .field("default", &self.default)
            .field("serializers", &keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_content_types() {
        let registry = SerializerRegistry::default();
        for content_type in [
            "application/json",
            "application/x-javascript",
            "text/javascript",
            "text/x-javascript",
            "text/x-json",
        ] {
            let serializer = registry.get_serializer_for_content_type(content_type).unwrap();
            assert_eq!(serializer.key(), "json", "{content_type}");
        }

        let json = registry.get_serializer(None).unwrap();
        let data = json!({"foo": "bar"});
        assert_eq!(json.dumps(&data).unwrap(), r#"{"foo":"bar"}"#);
        assert_eq!(json.loads(r#"{"foo": "bar"}"#).unwrap(), data);
    }

    #[test]
    fn test_yaml() {
        let registry = SerializerRegistry::default();
        let yaml = registry.get_serializer_for_content_type("text/yaml").unwrap();
        assert_eq!(yaml.key(), "yaml");

        let data = json!({"foo": "bar"});
        assert_eq!(yaml.dumps(&data).unwrap(), "foo: bar\n");
        assert_eq!(yaml.loads("foo: bar\n").unwrap(), data);
    }

    #[test]
    fn test_unavailable() {
        let registry = SerializerRegistry::with_serializers("json", vec![Box::new(JsonSerializer)]);
        let Err(err) = registry.get_serializer(Some("yaml")) else {
            panic!("yaml should not be registered");
        };
        assert_eq!(err.to_string(), "No serializer available for 'yaml'.");

        let Err(err) = registry.get_serializer_for_content_type("text/yaml") else {
            panic!("text/yaml should not be registered");
        };
        assert_eq!(err.to_string(), "No serializer available for 'text/yaml'.");
    }

    #[test]
    fn test_default_format() {
        let registry = SerializerRegistry::new("yaml");
        assert_eq!(registry.get_content_type(None).unwrap(), "text/yaml");
        assert_eq!(registry.get_content_type(Some("json")).unwrap(), "application/json");
    }
}
