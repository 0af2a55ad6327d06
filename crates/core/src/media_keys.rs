//! Object-key resolution for stored media.
//!
//! Canonical key scheme: `{user_id}/{uuid}.{ext}` for the main image and
//! `{user_id}/thumb_{uuid}.{ext}` for its thumbnail. Earlier upload
//! revisions also wrote keys under a role-scoped `talent/` prefix and stored
//! filenames that diverge from the externally visible URL, so a requested
//! identifier cannot always be mapped to its object directly. Resolution is
//! therefore best-effort: compute the most likely key, and let the caller
//! fall through an ordered list of alternates rather than fail outright.

use crate::types::DbId;

/// Filename prefix marking a thumbnail object.
pub const THUMBNAIL_PREFIX: &str = "thumb_";

/// Role-scoped path prefix used by historical talent uploads. Only consulted
/// when building fallback alternates; new keys never carry it.
pub const LEGACY_ROLE_PREFIX: &str = "talent";

/// The path segment of a key: everything up to and including the final `/`,
/// or the empty string for bare filenames.
fn path_segment(key: &str) -> &str {
    match key.rfind('/') {
        Some(idx) => &key[..=idx],
        None => "",
    }
}

/// The basename of a key: everything after the final `/`.
pub fn basename(key: &str) -> &str {
    match key.rfind('/') {
        Some(idx) => &key[idx + 1..],
        None => key,
    }
}

/// Compute the primary object-store key for a requested identifier, given
/// the located record's canonical key.
///
/// - An identifier containing `/` is treated as a full key.
/// - A `thumb_`-prefixed identifier is rebuilt on the record's path segment.
/// - Any other identifier is appended to the record's path segment, unless
///   the canonical key already ends with it (exact basename request).
pub fn resolve_object_key(requested: &str, canonical_key: &str) -> String {
    if requested.contains('/') {
        return requested.to_string();
    }

    let base = path_segment(canonical_key);

    if requested.starts_with(THUMBNAIL_PREFIX) {
        return format!("{base}{requested}").trim_start_matches('/').to_string();
    }

    if canonical_key.ends_with(requested) {
        return canonical_key.to_string();
    }

    if base.is_empty() {
        requested.to_string()
    } else {
        format!("{base}{requested}")
    }
}

/// The thumbnail key paired with a canonical main-image key: same path
/// segment, `thumb_`-prefixed basename.
pub fn thumbnail_key_for(canonical_key: &str) -> String {
    format!(
        "{}{THUMBNAIL_PREFIX}{}",
        path_segment(canonical_key),
        basename(canonical_key)
    )
}

/// The ordered list of fallback keys to try when the primary key misses.
///
/// In order: the record's canonical key, the raw requested identifier, the
/// caller's own identity prefix plus the identifier, and the legacy
/// role-scoped variant of the owner's prefix. Duplicates of `primary` (and
/// of earlier entries) are dropped so each key is fetched at most once.
pub fn alternate_keys(
    requested: &str,
    canonical_key: &str,
    owner_id: DbId,
    caller_id: Option<DbId>,
    primary: &str,
) -> Vec<String> {
    let mut candidates = vec![canonical_key.to_string(), requested.to_string()];

    if let Some(caller_id) = caller_id {
        candidates.push(format!("{caller_id}/{requested}"));
    }
    candidates.push(format!("{LEGACY_ROLE_PREFIX}/{owner_id}/{requested}"));

    let mut keys: Vec<String> = Vec::new();
    for candidate in candidates {
        if candidate.is_empty() || candidate == primary || keys.contains(&candidate) {
            continue;
        }
        keys.push(candidate);
    }
    keys
}
