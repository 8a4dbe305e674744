//! Lua scripts for the compare-then-act primitives.
//!
//! Each script replies with a `{status, value}` pair so a missing key can be
//! told apart from a key held by another lease.

use once_cell::sync::Lazy;
use redis::Script;

use crate::{Compared, Result, StoreError};

/// Key is absent.
pub const STATUS_MISSING: i64 = 0;
/// Key holds a different value.
pub const STATUS_MISMATCH: i64 = 1;
/// Key holds the expected value and the action ran.
pub const STATUS_MATCHED: i64 = 2;

const COMPARE_AND_DELETE: &str = r#"
    local current = redis.call("get", KEYS[1])
    if current == false then
        return {0, 0}
    end
    if current ~= ARGV[1] then
        return {1, 0}
    end
    return {2, redis.call("del", KEYS[1])}
"#;

const COMPARE_AND_PEXPIRE: &str = r#"
    local current = redis.call("get", KEYS[1])
    if current == false then
        return {0, 0}
    end
    if current ~= ARGV[1] then
        return {1, 0}
    end
    return {2, redis.call("pexpire", KEYS[1], ARGV[2])}
"#;

const COMPARE_AND_PTTL: &str = r#"
    local current = redis.call("get", KEYS[1])
    if current == false then
        return {0, 0}
    end
    if current ~= ARGV[1] then
        return {1, 0}
    end
    return {2, redis.call("pttl", KEYS[1])}
"#;

pub(crate) static DELETE: Lazy<Script> = Lazy::new(|| Script::new(COMPARE_AND_DELETE));
pub(crate) static PEXPIRE: Lazy<Script> = Lazy::new(|| Script::new(COMPARE_AND_PEXPIRE));
pub(crate) static PTTL: Lazy<Script> = Lazy::new(|| Script::new(COMPARE_AND_PTTL));

/// Turn a `{status, value}` reply into a [`Compared`].
pub fn decode(reply: (i64, i64)) -> Result<Compared<i64>> {
    match reply {
        (STATUS_MISSING, _) => Ok(Compared::Missing),
        (STATUS_MISMATCH, _) => Ok(Compared::Mismatch),
        (STATUS_MATCHED, value) => Ok(Compared::Matched(value)),
        (status, value) => Err(StoreError::UnexpectedReply(format!(
            "script status {} with value {}",
            status, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_statuses() {
        assert_eq!(decode((0, 0)).unwrap(), Compared::Missing);
        assert_eq!(decode((1, 0)).unwrap(), Compared::Mismatch);
        assert_eq!(decode((2, 1)).unwrap(), Compared::Matched(1));
        assert_eq!(decode((2, -1)).unwrap(), Compared::Matched(-1));
    }

    #[test]
    fn test_decode_rejects_unknown_status() {
        assert!(matches!(decode((7, 0)), Err(StoreError::UnexpectedReply(_))));
    }

    #[test]
    fn test_scripts_have_distinct_hashes() {
        assert_ne!(DELETE.get_hash(), PEXPIRE.get_hash());
        assert_ne!(PEXPIRE.get_hash(), PTTL.get_hash());
    }
}
