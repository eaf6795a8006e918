//! Tests for configuration

#[cfg(test)]
mod tests {
    use super::super::config::*;
    use crate::ml::Algorithm;
    use std::io::Write;

    #[test]
    fn test_config_defaults_from_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.dir, "./Models");
        assert_eq!(config.storage.model_file, "model.json");
        assert_eq!(config.storage.training_data_file, "training_data.json");
        assert_eq!(config.storage.log_file, "prediction_log.json");
        assert_eq!(config.model.algorithm, Algorithm::Poisson);
        assert_eq!(config.model.max_iterations, 100);
    }

    #[test]
    fn test_server_config() {
        let toml_str = r#"
host = "127.0.0.1"
port = 9000
"#;
        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_storage_config_partial() {
        let toml_str = r#"
dir = "/var/lib/trend"
log_file = "log.json"
"#;
        let config: StorageConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.dir, "/var/lib/trend");
        assert_eq!(config.log_file, "log.json");
        assert_eq!(config.model_file, "model.json");
    }

    #[test]
    fn test_storage_dir_resolves_home() {
        let config = StorageConfig {
            dir: "~/models".to_string(),
            ..Default::default()
        };
        assert!(config.resolved_dir().ends_with("models"));
    }

    #[test]
    fn test_model_config_linear() {
        let toml_str = r#"
algorithm = "linear"
l2_weight = 0.5
"#;
        let config: ModelConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.algorithm, Algorithm::Linear);
        assert_eq!(config.l2_weight, 0.5);
        assert_eq!(config.tolerance, 1e-7);
    }

    #[test]
    fn test_model_config_rejects_unknown_algorithm() {
        let result: Result<ModelConfig, _> = toml::from_str(r#"algorithm = "forest""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 7001

[model]
algorithm = "linear"
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 7001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.model.algorithm, Algorithm::Linear);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.storage.model_file, "model.json");
    }
}
