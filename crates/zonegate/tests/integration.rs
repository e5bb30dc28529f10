//! End-to-end tests for record validation.
//!
//! These drive the public library API the way an external caller does and
//! run the `zonegate` binary for the command line surface.

use std::io::Write;
use std::process::Command;

use zonegate_config::{Config, DnsConfig};
use zonegate_validate::{
    for_type, supported_types, validate, ErrorKind, HostnameValidator, RecordInput, RecordValidator,
    ValidationError, ValidationReport,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn dlv_content(digest: &str) -> String {
    format!("12345 8 2 {digest}")
}

fn check(rtype: &str, name: &str, content: &str) -> Result<(), ErrorKind> {
    let config = DnsConfig::default();
    validate(rtype, &RecordInput::new(name, content), &config)
        .map(|_| ())
        .map_err(|e| e.kind())
}

fn zonegate() -> Command {
    Command::new(env!("CARGO_BIN_EXE_zonegate"))
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_dlv_scenario() {
    let config = DnsConfig::default();
    let content = dlv_content(&"a".repeat(64));
    let input = RecordInput::new("example.com", &content)
        .with_priority("")
        .with_ttl("")
        .with_default_ttl(3600);

    let record = validate("DLV", &input, &config).unwrap();
    assert_eq!(record.ttl, 3600);
    assert_eq!(record.prio, 0);
    assert_eq!(record.content, content);
    assert_eq!(record.name, "example.com");
}

#[test]
fn test_nsec3_scenario() {
    let config = DnsConfig::default();
    let input = RecordInput::new("sub.example.com", "1 0 10 - ABCDEFG A NSEC3")
        .with_ttl("")
        .with_default_ttl(3600);

    let record = validate("NSEC3", &input, &config).unwrap();
    assert_eq!(record.ttl, 3600);
    assert_eq!(record.prio, 0);
    assert_eq!(record.int_field("iterations"), Some(10));
    assert_eq!(record.text_field("salt"), Some("-"));
    assert_eq!(
        record.field("types").and_then(|v| v.as_list()),
        Some(&["A".to_string(), "NSEC3".to_string()][..])
    );
}

// ============================================================================
// DLV
// ============================================================================

#[test]
fn test_dlv_valid_combinations_echo_content() {
    let config = DnsConfig::default();
    let validator = for_type("DLV", &config).unwrap();

    for tag in ["1", "12345", "65535"] {
        for alg in ["1", "2", "3", "5", "6", "7", "8", "10", "12", "13", "14", "15", "16"] {
            for (dtype, len) in [("1", 40), ("2", 64), ("4", 96)] {
                let content = format!("{tag} {alg} {dtype} {}", "Ab".repeat(len / 2));
                let record = validator
                    .validate(&RecordInput::new("example.com", &content))
                    .unwrap_or_else(|e| panic!("{content}: {e}"));
                assert_eq!(record.content, content);
            }
        }
    }
}

#[test]
fn test_dlv_single_violations() {
    let cases = [
        (format!("0 8 1 {}", "a".repeat(40)), "key_tag", ErrorKind::Range),
        (format!("65536 8 1 {}", "a".repeat(40)), "key_tag", ErrorKind::Range),
        (format!("12345 4 1 {}", "a".repeat(40)), "algorithm", ErrorKind::Range),
        (format!("12345 8 3 {}", "a".repeat(40)), "digest_type", ErrorKind::Range),
        (format!("12345 8 1 {}", "a".repeat(39)), "digest", ErrorKind::Consistency),
        (format!("12345 8 1 {}", "g".repeat(40)), "digest", ErrorKind::Syntax),
        ("12345 8 1".to_string(), "content", ErrorKind::Structure),
    ];

    let config = DnsConfig::default();
    for (content, field, kind) in cases {
        let err = validate("DLV", &RecordInput::new("example.com", &content), &config).unwrap_err();
        assert_eq!(err.field(), field, "{content}");
        assert_eq!(err.kind(), kind, "{content}");
    }
}

#[test]
fn test_dlv_rejects_irregular_spacing() {
    let config = DnsConfig::default();
    let digest = "a".repeat(64);
    for content in [
        format!("12345\t8\t2\t{digest}"),
        format!("12345 8  2 {digest}"),
        format!("  12345 8 2 {digest}\n"),
    ] {
        let input = RecordInput::new("example.com", &content).with_default_ttl(3600);
        let err = validate("DLV", &input, &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structure, "{content:?}");
        assert_eq!(err.field(), "content", "{content:?}");
    }
}

#[test]
fn test_dlv_digest_length_message() {
    let config = DnsConfig::default();
    let content = dlv_content(&"a".repeat(63));
    let err = validate("DLV", &RecordInput::new("example.com", &content), &config).unwrap_err();
    assert!(err.to_string().contains("64"), "{err}");
}

#[test]
fn test_first_failure_wins() {
    let config = DnsConfig::default();
    // Bad key tag and bad digest: only the key tag is reported.
    let content = format!("0 8 1 {}", "z".repeat(3));
    let input = RecordInput::new("example.com", &content).with_ttl("bogus");
    let err = validate("DLV", &input, &config).unwrap_err();
    assert_eq!(err.field(), "key_tag");
}

#[test]
fn test_dlv_priority() {
    let config = DnsConfig::default();
    let content = dlv_content(&"a".repeat(64));
    let base = RecordInput::new("example.com", &content);

    assert_eq!(validate("DLV", &base.with_priority(""), &config).unwrap().prio, 0);
    assert_eq!(validate("DLV", &base.with_priority("0"), &config).unwrap().prio, 0);

    let err = validate("DLV", &base.with_priority("5"), &config).unwrap_err();
    assert_eq!(err.field(), "priority");
}

// ============================================================================
// NSEC3
// ============================================================================

#[test]
fn test_nsec3_hash_algorithm() {
    for alg in ["0", "2", "255"] {
        let content = format!("{alg} 0 10 - ABCDEFG A NSEC3");
        assert_eq!(check("NSEC3", "sub.example.com", &content), Err(ErrorKind::Range));
    }
}

#[test]
fn test_nsec3_iterations_boundary() {
    assert!(check("NSEC3", "sub.example.com", "1 0 0 - ABCDEFG A").is_ok());
    assert!(check("NSEC3", "sub.example.com", "1 0 2500 - ABCDEFG A").is_ok());
    assert!(check("NSEC3", "sub.example.com", "1 0 -1 - ABCDEFG A").is_err());
    assert_eq!(check("NSEC3", "sub.example.com", "1 0 2501 - ABCDEFG A"), Err(ErrorKind::Range));
}

#[test]
fn test_nsec3_type_bitmap() {
    assert!(check("NSEC3", "sub.example.com", "1 0 10 - ABCDEFG TLSA A NSEC3").is_ok());
    assert!(check("NSEC3", "sub.example.com", "1 0 10 - ABCDEFG 99").is_ok());

    let config = DnsConfig::default();
    let input = RecordInput::new("sub.example.com", "1 0 10 - ABCDEFG A BOGUS");
    let err = validate("NSEC3", &input, &config).unwrap_err();
    assert!(err.to_string().contains("BOGUS"), "{err}");
}

// ============================================================================
// TTL and hostname
// ============================================================================

#[test]
fn test_ttl_substitution_and_overflow() {
    let config = DnsConfig::default();
    let input = RecordInput::new("example.com", "192.0.2.1").with_default_ttl(3600);

    assert_eq!(validate("A", &input.with_ttl(""), &config).unwrap().ttl, 3600);
    assert_eq!(validate("A", &input, &config).unwrap().ttl, 3600);

    let err = validate("A", &input.with_ttl("99999999999"), &config).unwrap_err();
    assert_eq!(err.field(), "ttl");
    assert_eq!(err.kind(), ErrorKind::Range);
}

#[test]
fn test_hostname_labels() {
    let policy = DnsConfig::default().hostname;
    let hosts = HostnameValidator::new(&policy);

    assert!(hosts.validate(&format!("{}.example.com", "a".repeat(63)), false).is_ok());
    assert!(hosts.validate(&format!("{}.example.com", "a".repeat(64)), false).is_err());
    assert!(hosts.validate("-host.example.com", false).is_err());
    assert!(hosts.validate("host-.example.com", false).is_err());
}

#[test]
fn test_wildcard_follows_config() {
    assert!(check("A", "*.example.com", "192.0.2.1").is_ok());

    let mut config = DnsConfig::default();
    config.hostname.allow_wildcard = false;
    let err = validate("A", &RecordInput::new("*.example.com", "192.0.2.1"), &config).unwrap_err();
    assert_eq!(err.field(), "name");
}

// ============================================================================
// Dispatcher
// ============================================================================

#[test]
fn test_unknown_type_is_explicit() {
    let config = DnsConfig::default();
    let err = for_type("BOGUS", &config).unwrap_err();
    assert!(matches!(err, ValidationError::UnknownType { .. }));
    assert_eq!(err.kind(), ErrorKind::UnknownType);

    let err = for_type("AXFR", &config).unwrap_err();
    assert!(matches!(err, ValidationError::UnsupportedType { .. }));
}

#[test]
fn test_every_supported_type_resolves() {
    let config = DnsConfig::default();
    for rtype in supported_types() {
        let validator = for_type(&rtype.to_string().to_lowercase(), &config).unwrap();
        assert_eq!(validator.record_type(), rtype);
    }
}

#[test]
fn test_mixed_record_types() {
    assert!(check("MX", "example.com", "mail.example.com").is_ok());
    assert!(check("SRV", "_sip._tcp.example.com", "5 5060 sip.example.com").is_ok());
    assert!(check("TLSA", "_443._tcp.example.com", &format!("3 1 1 {}", "a".repeat(64))).is_ok());
    assert!(check("CAA", "example.com", "0 issue \"letsencrypt.org\"").is_ok());
    assert!(check("TXT", "example.com", "\"v=spf1 -all\"").is_ok());
    assert!(check("HTTPS", "example.com", "1 . alpn=h2,h3").is_ok());
    assert_eq!(check("SRV", "example.com", "5 5060 sip.example.com"), Err(ErrorKind::Syntax));
}

#[test]
fn test_report_json() {
    let config = DnsConfig::default();
    let report = ValidationReport::from(validate("A", &RecordInput::new("example.com", "300.0.0.1"), &config));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["valid"], false);
    assert_eq!(json["errors"][0]["field"], "address");
    assert!(json.get("data").is_none());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_file_drives_validation() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "dns:\n  default_ttl: 600\n  hostname:\n    allow_wildcard: false\n    allow_underscore: true\n"
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    config.validate().unwrap();

    let input = RecordInput::new("_dmarc.example.com", "192.0.2.1").with_default_ttl(config.dns.default_ttl);
    assert_eq!(validate("A", &input, &config.dns).unwrap().ttl, 600);

    let input = RecordInput::new("*.example.com", "192.0.2.1");
    assert!(validate("A", &input, &config.dns).is_err());
}

// ============================================================================
// Command line
// ============================================================================

#[test]
fn test_cli_check() {
    let output = zonegate()
        .args(["check", "--type", "mx", "--name", "example.com", "--content", "mail.example.com"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], true);
    assert_eq!(report["data"]["prio"], 10);
    assert_eq!(report["data"]["type"], "MX");
}

#[test]
fn test_cli_check_rejects() {
    let output = zonegate()
        .args(["check", "-t", "A", "-n", "example.com", "--content", "not-an-ip"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["errors"][0]["kind"], "syntax");
}

#[test]
fn test_cli_batch() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"[
            {{"type": "A", "name": "example.com", "content": "192.0.2.1", "ttl": 300}},
            {{"type": "BOGUS", "name": "example.com", "content": "x"}}
        ]"#
    )
    .unwrap();

    let output = zonegate().arg("batch").arg(file.path()).output().unwrap();
    assert!(!output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["valid"], true);
    assert_eq!(reports[0]["data"]["ttl"], 300);
    assert_eq!(reports[1]["valid"], false);
    assert_eq!(reports[1]["errors"][0]["field"], "type");
}

#[test]
fn test_cli_types() {
    let output = zonegate().arg("types").output().unwrap();
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("NSEC3"));
    assert!(text.contains("DLV"));
    assert!(!text.contains("AXFR"));
}
