use super::record::Record;
use crate::errors::ConfigError;
use crate::types::{Class, Message, Type};
use maxminddb::geoip2;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::PathBuf;

/// Answers queries for its zones with preconfigured records selected by the
/// country or continent of the querying resolver, looked up in a MaxMind
/// country database.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct GeoBackend {
    /// Forward zones answered authoritatively, matched case-insensitively.
    pub zones: Vec<String>,
    pub options: GeoOptions,

    #[serde(skip)]
    geoip: Option<maxminddb::Reader<Vec<u8>>>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct GeoOptions {
    pub database: PathBuf,
    pub answers: GeoAnswers,
    pub default: GeoDefault,
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct GeoAnswers {
    /// Continent code (e.g. `EU`) to records.
    pub continent: HashMap<String, Vec<Record>>,
    /// ISO-3166 country code (e.g. `NL`) to records.
    pub country: HashMap<String, Vec<Record>>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct GeoDefault {
    pub continent: String,
    pub country: String,
}

impl GeoBackend {
    /// Open the GeoIP database and normalize the configuration: zone names
    /// lowercase, continent/country keys uppercase, record classes and
    /// types validated.
    pub fn check(&mut self) -> Result<(), ConfigError> {
        let reader = maxminddb::Reader::open_readfile(&self.options.database)
            .map_err(|e| ConfigError::BadGeoDatabase(self.options.database.clone(), e))?;
        self.geoip = Some(reader);
        self.normalize()
    }

    fn normalize(&mut self) -> Result<(), ConfigError> {
        for zone in &mut self.zones {
            *zone = zone.to_lowercase();
        }
        self.options.default.continent = self.options.default.continent.to_uppercase();
        self.options.default.country = self.options.default.country.to_uppercase();

        check_answers(&mut self.options.answers.continent)?;
        check_answers(&mut self.options.answers.country)?;
        Ok(())
    }

    pub fn query(&self, message: &Message) -> Vec<Message> {
        if !self.zones.contains(&message.name.to_lowercase()) {
            return Vec::new();
        }

        let qtypes: Vec<Type> = match message.r#type {
            Type::ANY => vec![Type::A, Type::AAAA, Type::TXT],
            r#type => vec![r#type],
        };

        let (country, country_name, continent) = self.locate(message.remote_addr);
        debug!(
            "geo: {} resolves to {} ({})",
            message.name, country, continent
        );

        let mut answers = Vec::new();

        if qtypes.contains(&Type::TXT) {
            let addr = match message.remote_addr {
                Some(addr) => addr.to_string(),
                None => "unknown".to_string(),
            };
            answers.push(Message::answer(
                message,
                Type::TXT,
                0,
                format!("dns geo result for {} in {} ({})", addr, country_name, continent),
            ));
        }

        let mut records: Vec<&Record> = Vec::new();
        if let Some(continental) = self.options.answers.continent.get(&continent) {
            records.extend(continental);
        }
        if let Some(national) = self.options.answers.country.get(&country) {
            records.extend(national);
        }

        for record in records {
            let answer = match record.to_message() {
                Ok(answer) => answer,
                Err(e) => {
                    warn!("geo: bogus record: {}", e);
                    continue;
                }
            };
            if !qtypes.contains(&answer.r#type) {
                continue;
            }
            answers.push(Message {
                name: message.name.clone(),
                id: message.id.clone(),
                ..answer
            });
        }

        answers
    }

    /// The country oracle: ISO country code, English country name and
    /// continent code for an address. Lookup failures fall back to the
    /// configured defaults, `XX`/`Unknown`/`EU` when those are unset too.
    fn locate(&self, addr: Option<IpAddr>) -> (String, String, String) {
        let mut country = String::new();
        let mut country_name = String::new();
        let mut continent = String::new();

        if let (Some(reader), Some(addr)) = (&self.geoip, addr) {
            if let Ok(lookup) = reader.lookup::<geoip2::Country>(addr) {
                if let Some(c) = lookup.country {
                    country = c.iso_code.unwrap_or_default().to_string();
                    country_name = c
                        .names
                        .and_then(|names| names.get("en").copied())
                        .unwrap_or_default()
                        .to_string();
                }
                if let Some(c) = lookup.continent {
                    continent = c.code.unwrap_or_default().to_string();
                }
            }
        }

        if country.is_empty() {
            country_name = "Unknown".to_string();
            continent = match self.options.default.continent.as_str() {
                "" => "EU".to_string(),
                c => c.to_string(),
            };
            country = match self.options.default.country.as_str() {
                "" => "XX".to_string(),
                c => c.to_string(),
            };
        }

        (country, country_name, continent)
    }
}

/// Uppercase the answer keys in place and run record pre-flight checks.
fn check_answers(answers: &mut HashMap<String, Vec<Record>>) -> Result<(), ConfigError> {
    let keys: Vec<String> = answers.keys().cloned().collect();

    for key in keys {
        let mut records = answers.remove(&key).unwrap_or_default();
        for record in &mut records {
            if record.class.is_empty() {
                record.class = Class::Internet.to_string();
            }
            record.to_message()?;
        }
        answers.insert(key.to_uppercase(), records);
    }

    Ok(())
}
