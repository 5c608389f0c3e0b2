//! Command line arguments and option layering

use clap::Parser;
use mocktree_core::TreeOptions;
use mocktree_http::CorsPolicy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mocktree")]
#[command(about = "Mock HTTP server exposing a static JSON tree")]
pub struct Args {
    /// Options file (JSON or YAML) using the nodePath/idFieldName/... keys
    #[arg(short, long, env = "MOCKTREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON file holding the tree
    #[arg(short, long, env = "MOCKTREE_DATA")]
    pub data: Option<PathBuf>,

    /// Bind host
    #[arg(long, env = "MOCKTREE_HOST")]
    pub host: Option<String>,

    /// Listen port
    #[arg(short, long, env = "MOCKTREE_PORT")]
    pub port: Option<u16>,

    /// Route prefix of the element view
    #[arg(long, env = "MOCKTREE_NODE_PATH")]
    pub node_path: Option<String>,

    /// Route prefix of the collection view
    #[arg(long, env = "MOCKTREE_CHILDREN_PATH")]
    pub children_path: Option<String>,

    /// Field that addresses a node among its siblings
    #[arg(long, env = "MOCKTREE_ID_FIELD")]
    pub id_field: Option<String>,

    /// Field that holds a node's children
    #[arg(long, env = "MOCKTREE_CHILDREN_FIELD")]
    pub children_field: Option<String>,

    /// Do not attach reconstructed paths to responses
    #[arg(long, env = "MOCKTREE_NO_PATH")]
    pub no_path: bool,

    /// Acknowledge PUT requests on the element view
    #[arg(long, env = "MOCKTREE_ACCEPT_WRITES")]
    pub accept_writes: bool,

    /// Start from the /file + /folder, title/items layout
    #[arg(long, env = "MOCKTREE_LEGACY")]
    pub legacy: bool,

    /// Disable CORS
    #[arg(long, env = "MOCKTREE_NO_CORS", conflicts_with = "cors_origins")]
    pub no_cors: bool,

    /// Only send CORS headers to this origin (repeatable)
    #[arg(
        long = "cors-origin",
        env = "MOCKTREE_CORS_ORIGINS",
        value_delimiter = ','
    )]
    pub cors_origins: Vec<String>,

    /// Emit logs as JSON lines
    #[arg(long, env = "MOCKTREE_LOG_JSON")]
    pub log_json: bool,
}

impl Args {
    /// Defaults < legacy preset < options file < flags
    pub fn options(&self) -> mocktree_core::Result<TreeOptions> {
        let mut options = if self.legacy {
            TreeOptions::legacy()
        } else {
            TreeOptions::new()
        };

        if let Some(path) = &self.config {
            options = options.merge(TreeOptions::load(path)?);
        }

        Ok(options.merge(self.overrides()))
    }

    pub fn cors_policy(&self) -> mocktree_http::Result<CorsPolicy> {
        if self.no_cors {
            return Ok(CorsPolicy::Disabled);
        }
        CorsPolicy::origins(&self.cors_origins)
    }

    fn overrides(&self) -> TreeOptions {
        TreeOptions {
            data: self.data.clone(),
            node_path: self.node_path.clone(),
            children_path: self.children_path.clone(),
            id_field_name: self.id_field.clone(),
            children_field_name: self.children_field.clone(),
            include_path: self.no_path.then_some(false),
            host: self.host.clone(),
            port: self.port,
            accept_writes: self.accept_writes.then_some(true),
            ..TreeOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("mocktree").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_flags_gives_defaults() {
        let config = parse(&[]).options().unwrap().resolve().unwrap();

        assert_eq!(config.node_path, "/node");
        assert_eq!(config.port, 3000);
        assert!(config.include_path);
    }

    #[test]
    fn test_flags_override() {
        let config = parse(&[
            "--port",
            "9999",
            "--id-field",
            "name",
            "--no-path",
            "--node-path",
            "/myNode",
        ])
        .options()
        .unwrap()
        .resolve()
        .unwrap();

        assert_eq!(config.port, 9999);
        assert_eq!(config.id_field, "name");
        assert_eq!(config.node_path, "/myNode");
        assert!(!config.include_path);
    }

    #[test]
    fn test_legacy_then_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("options.yaml");
        std::fs::write(&file, "idFieldName: label\nport: 4000\n").unwrap();

        let config = parse(&[
            "--legacy",
            "--config",
            file.to_str().unwrap(),
            "--port",
            "5000",
        ])
        .options()
        .unwrap()
        .resolve()
        .unwrap();

        assert_eq!(config.node_path, "/file");
        assert_eq!(config.children_field, "items");
        assert_eq!(config.id_field, "label");
        assert_eq!(config.port, 5000);
        assert!(config.accept_writes);
    }

    #[test]
    fn test_cors_flags() {
        assert_eq!(parse(&[]).cors_policy().unwrap(), CorsPolicy::AnyOrigin);
        assert_eq!(
            parse(&["--no-cors"]).cors_policy().unwrap(),
            CorsPolicy::Disabled
        );

        let policy = parse(&[
            "--cors-origin",
            "http://localhost:8080",
            "--cors-origin",
            "http://app.test",
        ])
        .cors_policy()
        .unwrap();
        assert!(matches!(policy, CorsPolicy::Origins(ref origins) if origins.len() == 2));

        assert!(Args::try_parse_from(["mocktree", "--no-cors", "--cors-origin", "http://a.test"]).is_err());
    }

    #[test]
    fn test_missing_options_file_is_an_error() {
        let args = parse(&["--config", "/no/such/options.json"]);
        assert!(args.options().is_err());
    }
}
