// ==============
// boathouse-backend-lib/src/metrics.rs

//! Central place for metric keys
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const SESSION_ISSUED: &str = "auth.session.issued";
pub const SESSION_REVOKED: &str = "auth.session.revoked";
pub const SESSION_EXPIRED_PURGED: &str = "auth.session.expired_purged";
pub const SESSION_LOOKUP_ERROR: &str = "auth.session.lookup_error";
