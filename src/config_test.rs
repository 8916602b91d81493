use super::*;

// =============================================================================
// env_bool: uses unique env var names to avoid races with parallel tests.
// =============================================================================

#[test]
fn env_bool_true_variants() {
    for (i, val) in ["1", "true", "yes", "on"].iter().enumerate() {
        let key = format!("__TEST_DF_EB_TRUE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(true), "expected true for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_false_variants() {
    for (i, val) in ["0", "false", "no", "off"].iter().enumerate() {
        let key = format!("__TEST_DF_EB_FALSE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(false), "expected false for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_case_and_whitespace() {
    let key = "__TEST_DF_EB_WS__";
    unsafe { std::env::set_var(key, "  YES ") };
    assert_eq!(env_bool(key), Some(true));
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_bool_invalid_or_unset_is_none() {
    let key = "__TEST_DF_EB_INVALID__";
    unsafe { std::env::set_var(key, "maybe") };
    assert_eq!(env_bool(key), None);
    unsafe { std::env::remove_var(key) };
    assert_eq!(env_bool("__TEST_DF_EB_SURELY_UNSET__"), None);
}

// =============================================================================
// env_parse / env_parse_strict
// =============================================================================

#[test]
fn env_parse_missing_returns_default() {
    let val: usize = env_parse("__TEST_DF_EP_MISSING__", 42);
    assert_eq!(val, 42);
}

#[test]
fn env_parse_garbage_returns_default() {
    let key = "__TEST_DF_EP_GARBAGE__";
    unsafe { std::env::set_var(key, "lots") };
    let val: u64 = env_parse(key, 7);
    assert_eq!(val, 7);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_parse_strict_rejects_garbage() {
    let key = "__TEST_DF_EPS_GARBAGE__";
    unsafe { std::env::set_var(key, "eighty") };
    let result: Result<u16, _> = env_parse_strict(key, 80);
    assert!(matches!(result, Err(ConfigError::Invalid { value, .. }) if value == "eighty"));
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_parse_strict_accepts_value_and_default() {
    let key = "__TEST_DF_EPS_OK__";
    unsafe { std::env::set_var(key, " 8080 ") };
    assert_eq!(env_parse_strict::<u16>(key, 80).unwrap(), 8080);
    unsafe { std::env::remove_var(key) };
    assert_eq!(env_parse_strict::<u16>(key, 80).unwrap(), 80);
}

#[test]
fn session_ttl_outside_range_is_invalid() {
    let key = "__TEST_DF_TTL_RANGE__";
    let range = 1..=MAX_SESSION_TTL_HOURS;
    for raw in ["0", "-5", "9223372036854775807", "8761"] {
        unsafe { std::env::set_var(key, raw) };
        let result = env_parse_in_range(key, DEFAULT_SESSION_TTL_HOURS, range.clone());
        assert!(matches!(result, Err(ConfigError::Invalid { .. })), "expected rejection of {raw:?}");
    }
    unsafe { std::env::remove_var(key) };
}

#[test]
fn session_ttl_inside_range_is_kept() {
    let key = "__TEST_DF_TTL_OK__";
    let range = 1..=MAX_SESSION_TTL_HOURS;
    assert_eq!(env_parse_in_range(key, DEFAULT_SESSION_TTL_HOURS, range.clone()).unwrap(), 168);
    unsafe { std::env::set_var(key, "8760") };
    assert_eq!(env_parse_in_range(key, DEFAULT_SESSION_TTL_HOURS, range).unwrap(), MAX_SESSION_TTL_HOURS);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn bootstrap_admin_debug_hides_password() {
    let admin = BootstrapAdmin { email: "dr@example.com".into(), password: "hunter22".into() };
    let debug = format!("{admin:?}");
    assert!(debug.contains("dr@example.com"));
    assert!(!debug.contains("hunter22"));
}
