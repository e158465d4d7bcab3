pub mod error;
pub mod merger;
pub mod models;
pub mod parser;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::Path;
    use tempfile::tempdir;

    use crate::error::MergeError;
    use crate::merger::{merge, MergeConfig, MergeOptions};
    use crate::parser::parse_public_operations;

    fn write_json(path: &Path, value: &Value) {
        let mut file = File::create(path).unwrap();
        write!(file, "{}", serde_json::to_string_pretty(value).unwrap()).unwrap();
    }

    fn config(dir: &Path, public: &str) -> MergeConfig {
        MergeConfig {
            input_pattern: format!("{}/*.swagger.json", dir.display()),
            output: dir.join("out").join("swagger.json"),
            options: MergeOptions {
                title: "IAM Service API".to_string(),
                description: "Identity and Access Management Service".to_string(),
                host: "localhost:8081".to_string(),
                public_operations: parse_public_operations(public),
                ..Default::default()
            },
        }
    }

    fn read_output(config: &MergeConfig) -> Value {
        serde_json::from_str(&fs::read_to_string(&config.output).unwrap()).unwrap()
    }

    #[test]
    fn test_merge_two_services() {
        let dir = tempdir().unwrap();
        write_json(
            &dir.path().join("a.swagger.json"),
            &json!({
                "paths": {"/login": {"post": {"operationId": "AuthService_Login"}}},
                "tags": [{"name": "Auth"}]
            }),
        );
        write_json(
            &dir.path().join("b.swagger.json"),
            &json!({
                "paths": {"/users": {"get": {"operationId": "UserService_List"}}},
                "tags": [{"name": "Auth"}],
                "definitions": {"User": {"type": "object"}}
            }),
        );

        let config = config(dir.path(), "AuthService_Login");
        let summary = merge(&config).unwrap();

        assert_eq!(summary.paths, 2);
        assert_eq!(summary.operations, 2);
        assert_eq!(summary.definitions, 1);
        assert_eq!(summary.tags, 1);
        assert_eq!(summary.public_operations, Some(1));

        let output = read_output(&config);
        assert_eq!(output["info"]["title"], json!("IAM Service API"));
        assert_eq!(output["info"]["version"], json!("1.0.0"));
        assert_eq!(output["host"], json!("localhost:8081"));
        assert_eq!(output["security"], json!([{"Bearer": []}]));
        assert_eq!(output["tags"], json!([{"name": "Auth"}]));
        assert_eq!(output["definitions"], json!({"User": {"type": "object"}}));
        assert_eq!(output["paths"]["/login"]["post"]["security"], json!([]));
        assert!(output["paths"]["/users"]["get"].get("security").is_none());
    }

    #[test]
    fn test_merge_order_follows_sorted_filenames() {
        let dir = tempdir().unwrap();
        // Written in reverse so creation order differs from sort order
        write_json(
            &dir.path().join("b.swagger.json"),
            &json!({
                "paths": {"/v1/uoms": {"get": {"operationId": "List", "summary": "from b"}}},
                "definitions": {"v1Uom": {"title": "from b"}}
            }),
        );
        write_json(
            &dir.path().join("a.swagger.json"),
            &json!({
                "paths": {"/v1/uoms": {"get": {"operationId": "List", "summary": "from a"}}},
                "definitions": {"v1Uom": {"title": "from a"}}
            }),
        );

        let config = config(dir.path(), "");
        let summary = merge(&config).unwrap();
        assert_eq!(summary.public_operations, None);

        let output = read_output(&config);
        assert_eq!(output["paths"]["/v1/uoms"]["get"]["summary"], json!("from b"));
        assert_eq!(output["definitions"]["v1Uom"]["title"], json!("from a"));
    }

    #[test]
    fn test_single_file_round_trip() {
        let dir = tempdir().unwrap();
        let source = json!({
            "swagger": "2.0",
            "info": {"title": "finance/v1/uom.proto", "version": "version not set"},
            "tags": [{"name": "UomService", "description": "Units of measure"}],
            "paths": {
                "/api/v1/finance/uoms": {
                    "get": {
                        "operationId": "UomService_ListUoms",
                        "responses": {"200": {"description": "A successful response."}},
                        "security": [{"Bearer": []}]
                    },
                    "post": {
                        "operationId": "UomService_CreateUom",
                        "parameters": [{"name": "body", "in": "body", "required": true}],
                        "security": []
                    }
                }
            },
            "definitions": {
                "v1Uom": {"type": "object", "properties": {"code": {"type": "string"}}}
            }
        });
        write_json(&dir.path().join("uom.swagger.json"), &source);

        let config = config(dir.path(), "");
        merge(&config).unwrap();

        let output = read_output(&config);
        assert_eq!(output["paths"], source["paths"]);
        assert_eq!(output["definitions"], source["definitions"]);
        assert_eq!(output["tags"], source["tags"]);
        assert_eq!(output["info"]["title"], json!("IAM Service API"));
    }

    #[test]
    fn test_large_integers_survive_merge() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("big.swagger.json"),
            r#"{"definitions": {"v1Big": {
                "type": "integer",
                "maximum": 123456789012345678901234567890,
                "default": 18446744073709551617,
                "minimum": -98765432109876543210
            }}}"#,
        )
        .unwrap();

        let config = config(dir.path(), "");
        merge(&config).unwrap();

        let written = fs::read_to_string(&config.output).unwrap();
        assert!(written.contains("\"maximum\": 123456789012345678901234567890"));
        assert!(written.contains("\"default\": 18446744073709551617"));
        assert!(written.contains("\"minimum\": -98765432109876543210"));
        assert!(!written.contains("e+"));
    }

    #[test]
    fn test_reversed_range_reports_no_matches() {
        let dir = tempdir().unwrap();
        write_json(&dir.path().join("a.swagger.json"), &json!({}));

        let config = MergeConfig {
            input_pattern: format!("{}/[z-a].swagger.json", dir.path().display()),
            ..config(dir.path(), "")
        };

        assert!(matches!(merge(&config), Err(MergeError::NoMatchingFiles(_))));
        assert!(!config.output.exists());
    }

    #[test]
    fn test_no_matching_files() {
        let dir = tempdir().unwrap();
        let config = config(dir.path(), "");

        match merge(&config) {
            Err(MergeError::NoMatchingFiles(pattern)) => {
                assert_eq!(pattern, config.input_pattern)
            }
            other => panic!("expected NoMatchingFiles, got {:?}", other),
        }
        assert!(!config.output.exists());
    }

    #[test]
    fn test_malformed_input_writes_nothing() {
        let dir = tempdir().unwrap();
        write_json(
            &dir.path().join("a.swagger.json"),
            &json!({"paths": {"/ok": {"get": {}}}}),
        );
        fs::write(dir.path().join("b.swagger.json"), "not json").unwrap();

        let config = config(dir.path(), "");
        let result = merge(&config);

        assert!(matches!(result, Err(MergeError::MalformedInput { .. })));
        assert!(!config.output.exists());
    }

    #[test]
    fn test_existing_output_is_replaced() {
        let dir = tempdir().unwrap();
        write_json(
            &dir.path().join("a.swagger.json"),
            &json!({"paths": {"/ok": {"get": {}}}}),
        );

        let config = config(dir.path(), "");
        fs::create_dir_all(config.output.parent().unwrap()).unwrap();
        fs::write(&config.output, "stale").unwrap();

        merge(&config).unwrap();

        let output = read_output(&config);
        assert_eq!(output["paths"], json!({"/ok": {"get": {}}}));
    }
}
