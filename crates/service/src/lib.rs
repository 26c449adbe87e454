pub mod service;

pub use service::{
    forget_audit_session, get_audit_session, load_report, start_audit, wait_for_audit,
    AuditRequest, AuditSessionSnapshot, AuditSessionStatus,
};
