// Report Format Contract Tests
//
// Spreadsheets and downstream scripts read these reports by column
// position. These tests pin the headers, the delimiter, the line
// terminator and the row shape.

use secreport_core::model::{AccessRights, AccessRule, DomainModel, Entity, MemberAccess, UserRole};
use secreport_core::report::{entity_report, normalize_free_text, role_report, Dialect, ENTITY_REPORT_HEADER, ROLE_REPORT_HEADER};

fn admin_scenario() -> (Vec<UserRole>, Vec<DomainModel>) {
    let roles = vec![UserRole::new("Admin", vec!["Mod.Role1".to_string()])];
    let models = vec![DomainModel {
        module: "Mod".to_string(),
        entities: vec![Entity {
            name: "Customer".to_string(),
            access_rules: vec![AccessRule {
                id: "AR1".to_string(),
                documentation: "desc\n".to_string(),
                x_path_constraint: String::new(),
                module_roles: vec!["Mod.Role1".to_string()],
                member_accesses: vec![MemberAccess::attribute("Name", AccessRights::ReadWrite)],
            }],
        }],
    }];
    (roles, models)
}

#[test]
fn role_report_header_is_fixed() {
    assert_eq!(ROLE_REPORT_HEADER.join(";"), "User Role;ModuleRole");
    let rendered = role_report(&[]).render(&Dialect::default());
    assert_eq!(rendered, "User Role;ModuleRole\r\n");
}

#[test]
fn entity_report_header_is_fixed() {
    assert_eq!(
        ENTITY_REPORT_HEADER.join(";"),
        "UserRole;ModuleRole;Module;Entity;Attribute;Description;XPath Constraint;Accessrights;AccessRule ID"
    );
}

#[test]
fn default_dialect_is_semicolon_crlf() {
    let dialect = Dialect::default();
    assert_eq!(dialect.delimiter, ';');
    assert_eq!(dialect.line_terminator, "\r\n");
    assert!(!dialect.trailing_delimiter);
}

#[test]
fn admin_scenario_yields_exactly_one_row() {
    let (roles, models) = admin_scenario();
    let rendered = entity_report(&roles, &models).render(&Dialect::default());
    let lines: Vec<&str> = rendered.split_terminator("\r\n").collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "Admin;Mod.Role1;Mod;Customer;Name;desc;;ReadWrite;AR1");
}

#[test]
fn every_entity_row_has_nine_fields() {
    let (roles, models) = admin_scenario();
    let table = entity_report(&roles, &models);
    assert!(table.rows().iter().all(|row| row.len() == ENTITY_REPORT_HEADER.len()));
}

#[test]
fn attribute_name_wins_over_association() {
    let access: MemberAccess = serde_json::from_value(serde_json::json!({
        "attribute": { "name": "Name" },
        "association": { "name": "Order_Customer" },
        "accessRights": "ReadOnly"
    }))
    .unwrap();
    let (roles, mut models) = admin_scenario();
    models[0].entities[0].access_rules[0].member_accesses = vec![access];

    let table = entity_report(&roles, &models);
    assert_eq!(table.rows()[0][4], "Name");
}

#[test]
fn normalization_is_idempotent() {
    for text in ["desc\n", "\r\n a \r\n b \r", "", "[x = 1]\n\n"] {
        let once = normalize_free_text(text);
        assert_eq!(normalize_free_text(&once), once);
        assert!(!once.contains('\n') && !once.contains('\r'));
    }
}
