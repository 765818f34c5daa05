//! IEEE OUI registry parsing.
//!
//! The registry is the plain-text `oui.txt` published by the IEEE. Only the
//! `(hex)` lines matter; everything else (base-16 lines, addresses, headers)
//! is skipped.

use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

lazy_static! {
    //   00-16-3E   (hex)		XENSOURCE, INC.
    static ref HEX_LINE: Regex =
        Regex::new(r"^  ([0-9A-Fa-f]{2})-([0-9A-Fa-f]{2})-([0-9A-Fa-f]{2})\s+\(hex\)\t\t(.+)$")
            .unwrap();
    static ref STRIP: Regex = Regex::new(r"[^- a-z0-9]").unwrap();
    static ref DASHES: Regex = Regex::new(r"--+").unwrap();
}

/// Corporate boilerplate dropped from company names when deriving a slug.
const STOP_WORDS: &[&str] = &[
    "bv",
    "company",
    "co",
    "communication",
    "corp",
    "corporate",
    "corporation",
    "coltd",
    "devices",
    "electronica",
    "electronics",
    "gmbh",
    "inc",
    "int",
    "international",
    "limited",
    "llg",
    "ltd",
    "manufacturing",
    "srl",
    "systemes",
    "systems",
    "technologies",
    "technology",
    "the",
];

/// Parse an IEEE OUI registry file into a map from the lowercased
/// six-hex-character OUI to the vendor slug.
pub fn parse_file(path: &Path) -> io::Result<HashMap<String, String>> {
    let file = File::open(path)?;
    let mut vendors = HashMap::new();

    for line in BufReader::new(file).lines() {
        let line = line?;
        if let Some(caps) = HEX_LINE.captures(&line) {
            let oui = format!("{}{}{}", &caps[1], &caps[2], &caps[3]).to_lowercase();
            vendors.insert(oui, vendor_slug(&caps[4]));
        }
    }

    Ok(vendors)
}

/// Derive a label-safe vendor slug from a registry company name, e.g.
/// `"XENSOURCE, INC."` becomes `"xensource"`.
pub fn vendor_slug(company: &str) -> String {
    let name = company.to_lowercase();
    let name = match name.splitn(2, '&').next() {
        Some(head) => head,
        None => "",
    };
    let name = STRIP.replace_all(name, "");

    let kept: Vec<&str> = name
        .split(' ')
        .filter(|word| !STOP_WORDS.contains(word))
        .collect();

    let slug = kept.join("-");
    let slug = DASHES.replace_all(&slug, "-");
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_registry() {
        let vendors = parse_file(Path::new("testdata/oui.txt")).expect("oui table");

        assert_eq!(vendors.get("000000").map(String::as_str), Some("xerox"));
        assert_eq!(vendors.get("00163e").map(String::as_str), Some("xensource"));
        assert_eq!(
            vendors.get("002342").map(String::as_str),
            Some("coffee-equipment")
        );
        assert_eq!(vendors.get("ffffff"), None);
    }

    #[test]
    fn slugs() {
        let tests = [
            ("XENSOURCE, INC.", "xensource"),
            ("XEROX CORPORATION", "xerox"),
            ("AUSPEX SYSTEMS INC.", "auspex"),
            ("Coffee Equipment Company", "coffee-equipment"),
            ("i Controls, Inc.", "i-controls"),
            ("Hewlett & Packard", "hewlett"),
            ("The  Dotted   Name Co.", "dotted-name"),
            ("Ltd.", ""),
        ];

        for (company, want) in &tests {
            assert_eq!(&vendor_slug(company), want, "for {:?}", company);
        }
    }
}
