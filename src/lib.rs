//! # Lambda Endpoints
//!
//! Static discovery of HTTP endpoints defined by script files in a folder
//! tree. Each file named `<route>.<verb>.<ext>` below the modules folder is
//! an endpoint; its script is parsed (never executed) to derive required
//! roles, input arguments, a description and, for generated CRUD wrappers
//! and raw SQL scripts, the output schema and endpoint type.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lambda_endpoints::{list_endpoints, EndpointsConfig};
//! use std::path::Path;
//!
//! let manifest = list_endpoints(Path::new("."), &EndpointsConfig::default())?;
//! for endpoint in &manifest {
//!     println!("{} {}", endpoint.verb, endpoint.path);
//! }
//! # Ok::<(), lambda_endpoints::ManifestError>(())
//! ```

pub mod cancel;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod manifest;
pub mod mcp;
pub mod scan;
pub mod script;

// Re-exports for convenience
pub use cancel::CancellationToken;
pub use config::{EndpointsConfig, Vocabulary};
pub use error::{ManifestError, Result};
pub use executor::{HttpExecutor, HttpRequest, HttpResponse};
pub use manifest::{
    describe, describe_file, list_endpoints, list_endpoints_blocking, list_endpoints_with,
    EndpointDescriptor, EndpointKind, Field, Verb,
};
pub use scan::{PathScanner, ScriptFile};
pub use script::{LambdaParser, Node, ScriptLoader, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// A small application tree covering every endpoint type.
    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        write(
            root,
            "modules/shop/items.get.hl",
            r#"
.description:Lists items
.arguments
   id.eq:long
   limit:long
auth.ticket.verify:admin
auth.ticket.verify:admin,root
wait.signal:magic.db.read
   database:shop
   table:items
   columns
      id
      name
"#,
        );
        write(
            root,
            "modules/shop/items.post.hl",
            "wait.signal:magic.db.create\n   database:shop\n   table:items\n",
        );
        write(
            root,
            "modules/shop/items.patch.hl",
            "wait.signal\n   database:shop\n   table:items\n",
        );
        write(
            root,
            "modules/shop/count/items-count.get.hl",
            r#"
wait.signal:magic.db.read
   database:shop
   table:items
   columns
      name
      "count(*) as count"
"#,
        );
        write(
            root,
            "modules/reports/sales.get.hl",
            ".is-statistics:bool:true\nwait.mysql.connect:shop\n   mysql.select:select sum(total) as total from orders\n",
        );
        write(
            root,
            "modules/reports/raw.get.hl",
            "wait.mssql.connect:shop\n   mssql.select:select * from orders\n",
        );
        write(
            root,
            "modules/hello/greet.post.hl",
            ".arguments\n   name:string\nreturn:ok\n",
        );
        write(root, "modules/.git/hooks.get.hl", ".description:hidden\n");
        write(root, "modules/.git/deep/more.get.hl", ".description:hidden\n");
        write(root, "modules/hello/readme.md", "not an endpoint");

        dir
    }

    fn summary(manifest: &[EndpointDescriptor]) -> Vec<String> {
        manifest
            .iter()
            .map(|e| format!("{} {}", e.verb, e.path))
            .collect()
    }

    #[test]
    fn test_manifest_order_and_filters() {
        let dir = fixture();
        let manifest = list_endpoints(dir.path(), &EndpointsConfig::default()).unwrap();

        assert_eq!(
            summary(&manifest),
            vec![
                "post magic/modules/hello/greet",
                "get magic/modules/reports/raw",
                "get magic/modules/reports/sales",
                "get magic/modules/shop/items",
                "post magic/modules/shop/items",
                "get magic/modules/shop/count/items-count",
            ]
        );
    }

    #[test]
    fn test_manifest_is_deterministic() {
        let dir = fixture();
        let config = EndpointsConfig::default();
        let first = serde_json::to_string(&list_endpoints(dir.path(), &config).unwrap()).unwrap();
        let second = serde_json::to_string(&list_endpoints(dir.path(), &config).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_crud_read_descriptor() {
        let dir = fixture();
        let manifest = list_endpoints(dir.path(), &EndpointsConfig::default()).unwrap();
        let read = manifest
            .iter()
            .find(|e| e.path == "magic/modules/shop/items" && e.verb == Verb::Get)
            .unwrap();

        assert_eq!(read.kind, Some(EndpointKind::CrudRead));
        assert_eq!(read.array, Some(true));
        assert_eq!(read.description.as_deref(), Some("Lists items"));
        assert_eq!(
            read.auth,
            Some(vec![
                "admin".to_string(),
                "admin".to_string(),
                "root".to_string()
            ])
        );
        assert_eq!(
            read.returns,
            Some(vec![
                Field::new("id", Some(Value::from("long"))),
                Field::new("name", None),
            ])
        );
    }

    #[test]
    fn test_kinds_across_manifest() {
        let dir = fixture();
        let manifest = list_endpoints(dir.path(), &EndpointsConfig::default()).unwrap();
        let kinds: Vec<Option<EndpointKind>> = manifest.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                None,
                Some(EndpointKind::CrudSql),
                Some(EndpointKind::CrudStatistics),
                Some(EndpointKind::CrudRead),
                Some(EndpointKind::CrudCreate),
                Some(EndpointKind::CrudCount),
            ]
        );

        let count = &manifest[5];
        assert_eq!(count.array, Some(false));
        assert_eq!(
            count.returns,
            Some(vec![Field::new("count", Some(Value::from("long")))])
        );

        let greet = &manifest[0];
        assert_eq!(greet.input.as_ref().map(Vec::len), Some(1));
        assert_eq!(greet.auth, None);
        assert_eq!(greet.returns, None);
    }

    #[test]
    fn test_json_manifest_shape() {
        let dir = fixture();
        let manifest = list_endpoints(dir.path(), &EndpointsConfig::default()).unwrap();
        let json = serde_json::to_value(&manifest).unwrap();

        assert_eq!(
            json[0],
            serde_json::json!({
                "path": "magic/modules/hello/greet",
                "verb": "post",
                "input": [{ "name": "name", "type": "string" }]
            })
        );
        assert_eq!(json[2]["type"], "crud-statistics");
    }

    #[test]
    fn test_unreadable_root_fails_without_partial_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = list_endpoints(&missing, &EndpointsConfig::default());
        assert!(matches!(result, Err(ManifestError::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_unenterable_folder_fails_whole_pass() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "modules/a/first.get.hl", ".description:first\n");
        write(root, "modules/shop/items.get.hl", ".description:items\n");
        write(root, "modules/shop/sub/deep.get.hl", ".description:deep\n");
        let shop = root.join("modules/shop");
        fs::set_permissions(&shop, fs::Permissions::from_mode(0o644)).unwrap();

        // Permission bits do not apply to privileged users.
        if fs::metadata(shop.join("items.get.hl")).is_ok() {
            fs::set_permissions(&shop, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = list_endpoints(root, &EndpointsConfig::default());
        fs::set_permissions(&shop, fs::Permissions::from_mode(0o755)).unwrap();

        match result {
            Err(ManifestError::Io { path, .. }) => assert!(path.starts_with(&shop)),
            other => panic!("expected I/O error, got {:?}", other),
        }
    }

    #[test]
    fn test_cancelled_pass_returns_error() {
        let dir = fixture();
        let token = CancellationToken::new();
        token.cancel();
        let result = list_endpoints_with(
            dir.path(),
            &EndpointsConfig::default(),
            &LambdaParser,
            &token,
        );
        assert!(matches!(result, Err(ManifestError::Cancelled)));
    }
}
