//! Integration tests for complete report runs
//!
//! Each test lays out a snapshot tree in a temp directory, runs the full
//! pipeline against it and inspects the written report files.

use secreport_core::config::ConfigLayer;
use secreport_core::{run, FileSink, ReportConfig, ReportError, RevisionSelector, SnapshotProvider};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SHOP_SNAPSHOT: &str = r#"{
  "model": {
    "projectSecurities": [
      {
        "userRoles": [
          { "name": "Administrator", "moduleRoles": ["Administration.Administrator", "Sales.Manager"] },
          { "name": "User", "moduleRoles": ["Sales.Clerk"] },
          { "name": "Anonymous", "moduleRoles": [] }
        ]
      }
    ],
    "domainModels": [
      {
        "module": "Administration",
        "entities": [
          {
            "name": "Account",
            "accessRules": [
              {
                "id": "adm-1",
                "documentation": "Admins manage accounts\r\n",
                "xPathConstraint": "",
                "moduleRoles": ["Administration.Administrator"],
                "memberAccesses": [
                  { "attribute": { "name": "FullName" }, "accessRights": "ReadWrite" },
                  { "attribute": { "name": "Email" }, "accessRights": "ReadWrite" }
                ]
              }
            ]
          }
        ]
      },
      {
        "module": "Sales",
        "entities": [
          {
            "name": "Order",
            "accessRules": [
              {
                "id": "sal-1",
                "documentation": "",
                "xPathConstraint": "[Sales.Order_Owner = '[%CurrentUser%]']\n",
                "moduleRoles": ["Sales.Clerk", "Sales.Manager"],
                "memberAccesses": [
                  { "attribute": { "name": "Number" }, "accessRights": "ReadOnly" },
                  { "association": { "name": "Order_Customer" }, "accessRights": "ReadOnly" },
                  { "accessRights": "None" }
                ]
              },
              {
                "id": "sal-2",
                "documentation": "empty rule",
                "xPathConstraint": "",
                "moduleRoles": ["Sales.Manager"],
                "memberAccesses": []
              }
            ]
          }
        ]
      }
    ]
  }
}"#;

fn setup(root: &Path, revision: u64) {
    let dir = root.join("snapshots").join("p-shop").join("mainline");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{}.json", revision)), SHOP_SNAPSHOT).unwrap();
}

fn config(root: &Path) -> ReportConfig {
    ReportConfig::from_layer(ConfigLayer {
        project_id: Some("p-shop".to_string()),
        project_name: Some("Shop".to_string()),
        output_dir: Some(root.join("out")),
        snapshot_root: Some(root.join("snapshots")),
        ..ConfigLayer::default()
    })
}

#[tokio::test]
async fn test_full_run_writes_role_report() {
    let temp_dir = TempDir::new().unwrap();
    setup(temp_dir.path(), 21);
    let config = config(temp_dir.path());

    let provider = SnapshotProvider::new(&config.snapshot_root);
    let sink = FileSink::new(&config.output_dir);
    let summary = run(&provider, &config, &sink).await.unwrap();

    assert_eq!(summary.roles_path, temp_dir.path().join("out/Shop_roles.csv"));
    assert_eq!(summary.role_rows, 3);
    assert_eq!(
        fs::read_to_string(&summary.roles_path).unwrap(),
        "User Role;ModuleRole\r\n\
         Administrator;Administration.Administrator\r\n\
         Administrator;Sales.Manager\r\n\
         User;Sales.Clerk\r\n"
    );
}

#[tokio::test]
async fn test_full_run_writes_entity_report() {
    let temp_dir = TempDir::new().unwrap();
    setup(temp_dir.path(), 21);
    let config = config(temp_dir.path());

    let provider = SnapshotProvider::new(&config.snapshot_root);
    let sink = FileSink::new(&config.output_dir);
    let summary = run(&provider, &config, &sink).await.unwrap();

    let content = fs::read_to_string(&summary.entities_path).unwrap();
    let lines: Vec<&str> = content.split_terminator("\r\n").collect();

    assert_eq!(
        lines,
        vec![
            "UserRole;ModuleRole;Module;Entity;Attribute;Description;XPath Constraint;Accessrights;AccessRule ID",
            "Administrator;Administration.Administrator;Administration;Account;FullName;Admins manage accounts;;ReadWrite;adm-1",
            "Administrator;Administration.Administrator;Administration;Account;Email;Admins manage accounts;;ReadWrite;adm-1",
            "Administrator;Sales.Manager;Sales;Order;Number;;[Sales.Order_Owner = '[%CurrentUser%]'];ReadOnly;sal-1",
            "Administrator;Sales.Manager;Sales;Order;Order_Customer;;[Sales.Order_Owner = '[%CurrentUser%]'];ReadOnly;sal-1",
            "User;Sales.Clerk;Sales;Order;Number;;[Sales.Order_Owner = '[%CurrentUser%]'];ReadOnly;sal-1",
            "User;Sales.Clerk;Sales;Order;Order_Customer;;[Sales.Order_Owner = '[%CurrentUser%]'];ReadOnly;sal-1",
        ]
    );
    assert_eq!(summary.entity_rows, 6);
}

#[tokio::test]
async fn test_revision_and_legacy_layout() {
    let temp_dir = TempDir::new().unwrap();
    setup(temp_dir.path(), 21);
    setup(temp_dir.path(), 34);
    let mut config = config(temp_dir.path());
    config.include_revision_in_filename = true;
    config.legacy_trailing_delimiter = true;

    let provider = SnapshotProvider::new(&config.snapshot_root);
    let sink = FileSink::new(&config.output_dir);
    let summary = run(&provider, &config, &sink).await.unwrap();

    assert_eq!(summary.revision, RevisionSelector::Number(34));
    assert_eq!(summary.roles_path, temp_dir.path().join("out/Shop_34_roles.csv"));
    assert_eq!(summary.entities_path, temp_dir.path().join("out/Shop_34_entities.csv"));

    let roles = fs::read_to_string(&summary.roles_path).unwrap();
    assert!(roles.starts_with("User Role;ModuleRole;\r\nAdministrator;Administration.Administrator;\r\n"));
}

#[tokio::test]
async fn test_run_without_security_leaves_empty_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("snapshots/p-shop/mainline");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("1.yaml"), "model:\n  projectSecurities: []\n  domainModels: []\n").unwrap();
    let config = config(temp_dir.path());

    let provider = SnapshotProvider::new(&config.snapshot_root);
    let sink = FileSink::new(&config.output_dir);
    let result = run(&provider, &config, &sink).await;

    assert!(matches!(result, Err(ReportError::SecurityAbsent(_))));
    let out = temp_dir.path().join("out");
    assert!(out.is_dir());
    assert!(fs::read_dir(&out).unwrap().next().is_none());
}

#[tokio::test]
async fn test_run_without_model_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("snapshots/p-shop/mainline");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("1.yaml"), "{}\n").unwrap();
    let config = config(temp_dir.path());

    let provider = SnapshotProvider::new(&config.snapshot_root);
    let sink = FileSink::new(&config.output_dir);
    let result = run(&provider, &config, &sink).await;

    match result {
        Err(ReportError::ModelUnavailable(msg)) => assert_eq!(msg, "What model?"),
        other => panic!("Expected ModelUnavailable, got {:?}", other.map(|s| s.role_rows)),
    }
}

#[tokio::test]
async fn test_bundled_demo_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let demo_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/snapshots");
    let config = ReportConfig::from_layer(ConfigLayer {
        project_id: Some("demo-shop".to_string()),
        project_name: Some("DemoShop".to_string()),
        output_dir: Some(temp_dir.path().to_path_buf()),
        snapshot_root: Some(demo_root),
        ..ConfigLayer::default()
    });

    let provider = SnapshotProvider::new(&config.snapshot_root);
    let sink = FileSink::new(&config.output_dir);
    let summary = run(&provider, &config, &sink).await.unwrap();

    assert_eq!(summary.role_rows, 3);
    assert_eq!(summary.entity_rows, 6);

    let entities = fs::read_to_string(&summary.entities_path).unwrap();
    assert!(entities.contains(
        "User;Sales.Clerk;Sales;Order;Order_Customer;;[Sales.Order_Owner = '[%CurrentUser%]'];ReadOnly;6f1d2c3a-0002\r\n"
    ));
    assert!(entities.contains(
        "Administrator;Administration.Administrator;Administration;Account;Email;Administrators manage all accounts.;;ReadWrite;6f1d2c3a-0001\r\n"
    ));
}
