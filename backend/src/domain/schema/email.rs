//! Pragmatic email address check used by string schemas.
//!
//! This is a structural check, not full RFC 5322 parsing: one `@`, a
//! non-empty local part drawn from a conservative character set, and a dotted
//! domain whose labels are non-empty and do not start or end with a hyphen.

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;

/// Whether `candidate` looks like a deliverable email address.
pub(crate) fn is_valid_email(candidate: &str) -> bool {
    if candidate.len() > MAX_EMAIL_LEN {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    valid_local_part(local) && valid_domain(domain)
}

fn valid_local_part(local: &str) -> bool {
    !local.is_empty()
        && local.len() <= MAX_LOCAL_LEN
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-' | '%' | '\''))
}

fn valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let top_level_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
    top_level_ok
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
