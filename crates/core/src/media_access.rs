//! Access policy for stored media.
//!
//! A single decision table, evaluated top-down, decides whether a caller may
//! see a media record. Historically this policy drifted between handler
//! revisions; it is now fixed to the strict variant: a producer viewing
//! another user's media needs the record to be both approved and public.

use crate::roles::{ROLE_ADMIN, ROLE_PRODUCER};
use crate::types::DbId;

/// The authenticated caller, or `None` for anonymous requests.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: DbId,
    /// Role name as stored in the `roles` table (`admin`, `talent`, `producer`).
    pub role: String,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// The access-relevant fields of a located media record.
#[derive(Debug, Clone, Copy)]
pub struct RecordFlags {
    pub owner_id: DbId,
    pub is_approved: bool,
    pub is_public: bool,
}

/// Outcome of evaluating the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Serve the located record.
    Grant,
    /// No record matched, but the caller is an admin: attempt a direct
    /// object-store fetch using the raw requested identifier.
    GrantDirectFetch,
    Deny(DenyReason),
}

/// Why access was denied. Maps 1:1 onto an HTTP status at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// 401 -- anonymous caller, content not publicly visible.
    AuthenticationRequired,
    /// 403 -- authenticated caller lacks rights to this record.
    Forbidden,
    /// 404 -- no matching record and caller is not an admin.
    NotFound,
}

/// Evaluate the access decision table for a request.
///
/// `record` is `None` when the locator found no matching media row.
/// Rules, first match wins:
///
/// 1. no record, admin caller        -> direct-fetch grant
/// 2. no record, anyone else         -> 404
/// 3. approved AND public            -> grant, any caller
/// 4. anonymous caller               -> 401
/// 5. caller owns the record         -> grant
/// 6. admin caller                   -> grant
/// 7. producer, approved AND public  -> grant (subsumed by rule 3)
/// 8. otherwise                      -> 403
pub fn evaluate(caller: Option<&Caller>, record: Option<&RecordFlags>) -> AccessDecision {
    let Some(record) = record else {
        return match caller {
            Some(c) if c.is_admin() => AccessDecision::GrantDirectFetch,
            _ => AccessDecision::Deny(DenyReason::NotFound),
        };
    };

    if record.is_approved && record.is_public {
        return AccessDecision::Grant;
    }

    let Some(caller) = caller else {
        return AccessDecision::Deny(DenyReason::AuthenticationRequired);
    };

    if caller.user_id == record.owner_id || caller.is_admin() {
        return AccessDecision::Grant;
    }

    // Strict producer policy: both flags required. Unreachable past the
    // approved-and-public rule above; kept so the table reads as specified.
    if caller.role == ROLE_PRODUCER && record.is_approved && record.is_public {
        return AccessDecision::Grant;
    }

    AccessDecision::Deny(DenyReason::Forbidden)
}
