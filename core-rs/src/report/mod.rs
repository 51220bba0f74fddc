//! Report builder
//!
//! Projects a loaded project security and its domain models into two
//! delimited tables: user role to module role assignments, and the
//! entity member access each user role receives.

pub mod entities;
pub mod normalize;
pub mod roles;
pub mod table;

pub use entities::{entity_access_rows, entity_report, EntityAccessRow, ENTITY_REPORT_HEADER};
pub use normalize::normalize_free_text;
pub use roles::{role_report, role_rows, RoleRow, ROLE_REPORT_HEADER};
pub use table::{Dialect, Table};
