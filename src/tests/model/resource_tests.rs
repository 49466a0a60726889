use super::*;

#[test]
fn hash_bytes_is_a_stable_hex_digest() {
    let a = hash_bytes(b"alpha");
    assert_eq!(a, hash_bytes(b"alpha"));
    assert_ne!(a, hash_bytes(b"beta"));
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn now_rfc3339_produces_a_parseable_utc_timestamp() {
    let now = now_rfc3339().expect("format now");
    let parsed = time::OffsetDateTime::parse(
        &now,
        &time::format_description::well_known::Rfc3339,
    );
    assert!(parsed.is_ok(), "{}", now);
}
