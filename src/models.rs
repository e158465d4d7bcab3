#![allow(non_snake_case)]

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the security scheme injected into every merged document
pub const BEARER_SCHEME: &str = "Bearer";

const BEARER_DESCRIPTION: &str = "Enter your Bearer token in the format: Bearer <token>";

/// HTTP method -> operation object. Operations stay opaque so that
/// unknown fields survive the merge untouched.
pub type MethodMap = IndexMap<String, Value>;

/// Security requirement: scheme name -> scopes
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// The merged Swagger 2.0 document
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SwaggerDoc {
    pub swagger: String,
    pub info: Info,
    pub host: String,
    pub basePath: String,
    pub schemes: Vec<String>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub securityDefinitions: IndexMap<String, SecurityScheme>,
    pub security: Vec<SecurityRequirement>,
    pub paths: IndexMap<String, MethodMap>,
    pub definitions: IndexMap<String, Value>,
    pub tags: Vec<Tag>,
}

impl SwaggerDoc {
    /// Empty document carrying the shared metadata and the Bearer scheme
    pub fn base(info: Info, host: impl Into<String>) -> Self {
        let mut securityDefinitions = IndexMap::new();
        securityDefinitions.insert(BEARER_SCHEME.to_string(), SecurityScheme::bearer());

        let mut requirement = SecurityRequirement::new();
        requirement.insert(BEARER_SCHEME.to_string(), Vec::new());

        Self {
            swagger: "2.0".to_string(),
            info,
            host: host.into(),
            basePath: "/".to_string(),
            schemes: vec!["http".to_string(), "https".to_string()],
            consumes: vec!["application/json".to_string()],
            produces: vec!["application/json".to_string()],
            securityDefinitions,
            security: vec![requirement],
            paths: IndexMap::new(),
            definitions: IndexMap::new(),
            tags: Vec::new(),
        }
    }
}

/// Information about the API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Info {
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Entry of `securityDefinitions`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: String,
    pub name: String,
    #[serde(rename = "in")]
    pub in_type: String, // header, query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SecurityScheme {
    /// API key scheme reading the `Authorization` header
    pub fn bearer() -> Self {
        Self {
            scheme_type: "apiKey".to_string(),
            name: "Authorization".to_string(),
            in_type: "header".to_string(),
            description: Some(BEARER_DESCRIPTION.to_string()),
        }
    }
}

/// Tag information for API operations. Only `name` is interpreted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One generated input file. Top-level fields other than these are ignored.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SwaggerFragment {
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub paths: IndexMap<String, MethodMap>,
    #[serde(default)]
    pub definitions: IndexMap<String, Value>,
}
