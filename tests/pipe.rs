//! End-to-end dialogs over the pipe protocol, from YAML configuration to
//! `DATA` lines.

use autodns::config::Config;
use autodns::pdns::Pdns;
use std::io::Cursor;

const CONFIG: &str = r#"
backend:
  auto:
    - encode:
        eui64:
          oui: testdata/oui.txt
        base32: {}
      soa:
        contact: hostmaster@example.com
        serial: 2021120401
      dns: [ns1.example.com, ns2.example.com]
      answers:
        "10.0.0.0/8":
          zone: ip.example.com
        "fe80::/64":
          zone: ll.example.com
"#;

fn serve(input: &str) -> Vec<String> {
    let config: Config = serde_yaml::from_str(CONFIG).expect("config");
    let pdns = Pdns::new(config.backends().expect("backends"));

    let mut output = Vec::new();
    pdns.serve(Cursor::new(input.as_bytes()), &mut output)
        .expect("serve");

    String::from_utf8(output)
        .expect("utf8 output")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn handshake_then_forward_query() {
    let lines = serve("HELO\t2\nQ\t04.ip.example.com\tIN\tA\t-1\t127.0.0.1\t127.0.0.1\n");

    assert_eq!(
        lines,
        vec![
            "OK\tdns-pdns",
            "DATA\t04.ip.example.com\tIN\tA\t60\t-1\t10.0.0.1",
            "END",
        ]
    );
}

#[test]
fn eui64_forward_and_reverse() {
    let lines = serve(
        "HELO\t2\n\
         Q\txensource-00-16-3e-83-f1-11.ll.example.com\tIN\tAAAA\t-1\t127.0.0.1\t127.0.0.1\n\
         Q\t1.1.1.f.3.8.e.f.f.f.e.3.6.1.2.0.0.0.0.0.0.0.0.0.0.0.0.0.0.8.e.f.ip6.arpa\tIN\tPTR\t-1\t127.0.0.1\t127.0.0.1\n",
    );

    assert_eq!(
        lines,
        vec![
            "OK\tdns-pdns",
            "DATA\txensource-00-16-3e-83-f1-11.ll.example.com\tIN\tAAAA\t60\t-1\tfe80::216:3eff:fe83:f111",
            "END",
            "DATA\t1.1.1.f.3.8.e.f.f.f.e.3.6.1.2.0.0.0.0.0.0.0.0.0.0.0.0.0.0.8.e.f.ip6.arpa\tIN\tPTR\t60\t-1\txensource-00-16-3e-83-f1-11.ll.example.com",
            "END",
        ]
    );
}

#[test]
fn apex_ns_and_soa() {
    let lines = serve(
        "HELO\t2\n\
         Q\t10.in-addr.arpa\tIN\tANY\t-1\t127.0.0.1\t127.0.0.1\n",
    );

    assert_eq!(
        lines,
        vec![
            "OK\tdns-pdns",
            "DATA\t10.in-addr.arpa\tIN\tNS\t3600\t-1\tns1.example.com",
            "DATA\t10.in-addr.arpa\tIN\tNS\t3600\t-1\tns2.example.com",
            "DATA\t10.in-addr.arpa\tIN\tSOA\t3600\t-1\tns1.example.com. hostmaster.example.com. 2021120401 3600 600 86400 3600",
            "END",
        ]
    );
}

#[test]
fn axfr_ping_and_failures() {
    let lines = serve(
        "HELO\t2\n\
         AXFR\t1\n\
         PING\n\
         bogus\n\
         Q\twww.example.org\tIN\tA\t-1\t127.0.0.1\t127.0.0.1\n",
    );

    assert_eq!(
        lines,
        vec!["OK\tdns-pdns", "END", "END", "FAIL", "END"]
    );
}

#[test]
fn failed_handshake_keeps_waiting() {
    let lines = serve("HELO\t1\nHELO\t2\nPING\n");
    assert_eq!(lines, vec!["FAIL", "OK\tdns-pdns", "END"]);
}
