//! Address helpers shared by the backends: reverse-zone naming, `.arpa`
//! pointer parsing and 128-bit address arithmetic.

use ipnet::IpNet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Canonical `.arpa` zone apex for a network.
///
/// IPv4 networks produce the reversed-octet `in-addr.arpa` form with one
/// label per whole octet of the prefix, IPv6 networks the reversed-nibble
/// `ip6.arpa` form with one label per whole nibble. IPv4-mapped IPv6
/// networks are named as IPv4.
///
/// ```rust
/// use autodns::util::reverse_zone;
///
/// let net = "192.168.0.0/16".parse().unwrap();
/// assert_eq!(reverse_zone(&net), "168.192.in-addr.arpa");
/// ```
pub fn reverse_zone(net: &IpNet) -> String {
    match net {
        IpNet::V4(net) => v4_zone(net.network().octets(), net.prefix_len()),
        IpNet::V6(net) => {
            let octets = net.network().octets();
            if is_v4_mapped(&net.network()) {
                let mut v4 = [0u8; 4];
                v4.copy_from_slice(&octets[12..]);
                return v4_zone(v4, net.prefix_len().saturating_sub(96));
            }

            // The fully reversed nibble sequence runs from the host end of
            // the address up; the zone apex keeps the prefix nibbles at its
            // tail.
            let mut nibbles = Vec::with_capacity(32);
            for b in octets.iter().rev() {
                nibbles.push(format!("{:x}", b & 0x0f));
                nibbles.push(format!("{:x}", b >> 4));
            }
            let keep = usize::from(net.prefix_len() / 4);
            let mut labels = nibbles.split_off(32 - keep);
            labels.push("ip6.arpa".to_string());
            labels.join(".")
        }
    }
}

fn v4_zone(octets: [u8; 4], prefix: u8) -> String {
    let keep = usize::from(prefix / 8);
    let mut labels: Vec<String> = octets[..keep].iter().rev().map(|o| o.to_string()).collect();
    labels.push("in-addr.arpa".to_string());
    labels.join(".")
}

/// Parse a PTR query name under `.in-addr.arpa` or `.ip6.arpa` into the
/// address it points at. Anything malformed yields `None`: the query simply
/// has no answer.
pub fn parse_arpa(name: &str) -> Option<IpAddr> {
    if let Some(prefix) = name.strip_suffix(".ip6.arpa") {
        let nibbles: String = prefix.chars().filter(|&c| c != '.').collect();
        if nibbles.len() != 32 {
            return None;
        }
        let hex: String = nibbles.chars().rev().collect();
        let n = u128::from_str_radix(&hex, 16).ok()?;
        Some(IpAddr::V6(Ipv6Addr::from(n)))
    } else if let Some(prefix) = name.strip_suffix(".in-addr.arpa") {
        let mut octets: Vec<&str> = prefix.split('.').collect();
        if octets.len() != 4 {
            return None;
        }
        octets.reverse();
        octets.join(".").parse::<Ipv4Addr>().ok().map(IpAddr::V4)
    } else {
        None
    }
}

/// Numeric value of an address: its bytes read as a big-endian unsigned
/// integer. IPv4 occupies the low 32 bits.
pub fn ip_to_u128(ip: &IpAddr) -> u128 {
    match ip {
        IpAddr::V4(v4) => u128::from(u32::from(*v4)),
        IpAddr::V6(v6) => u128::from(*v6),
    }
}

/// Rebuild an address of the given family from its numeric value. Returns
/// `None` when the value does not fit the family's width.
pub fn u128_to_ip(n: u128, v4: bool) -> Option<IpAddr> {
    if v4 {
        if n > u128::from(u32::MAX) {
            return None;
        }
        Some(IpAddr::V4(Ipv4Addr::from(n as u32)))
    } else {
        Some(IpAddr::V6(Ipv6Addr::from(n)))
    }
}

/// Big-endian value of a decoded byte string. `None` when it is wider than
/// 128 bits.
pub fn bytes_to_u128(bytes: &[u8]) -> Option<u128> {
    if bytes.len() > 16 {
        return None;
    }
    Some(bytes.iter().fold(0u128, |n, &b| (n << 8) | u128::from(b)))
}

/// Minimal big-endian byte representation of a value. Zero is the empty
/// string.
pub fn u128_bytes(n: u128) -> Vec<u8> {
    let bytes = n.to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    bytes[start..].to_vec()
}

/// An address is IPv4-mapped when its first ten bytes are zero and the next
/// two are `ff`.
pub fn is_v4_mapped(ip: &Ipv6Addr) -> bool {
    let octets = ip.octets();
    octets[..10].iter().all(|&b| b == 0) && octets[10] == 0xff && octets[11] == 0xff
}
