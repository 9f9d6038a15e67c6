use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::model::{Coordinates, CountryRecord};

use super::{CountryProvider, ensure_success};

#[derive(Debug, Clone)]
pub struct RestCountriesProvider {
    base_url: String,
    http: Client,
}

impl RestCountriesProvider {
    pub fn new(base_url: String, http: Client) -> Self {
        Self { base_url, http }
    }

    /// `{base}/name/{name}` with `name` encoded as one path segment.
    fn lookup_url(&self, name: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid REST Countries base URL: {}", self.base_url))?;

        url.path_segments_mut()
            .map_err(|_| anyhow!("REST Countries base URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .push("name")
            .push(name);

        Ok(url)
    }
}

#[async_trait]
impl CountryProvider for RestCountriesProvider {
    async fn lookup(&self, name: &str) -> Result<Vec<CountryRecord>> {
        let url = self.lookup_url(name)?;
        debug!(%url, "requesting country data");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to send request to REST Countries")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read REST Countries response body")?;

        ensure_success("REST Countries", status, &body)?;
        parse_countries(&body)
    }
}

/// Parse a lookup response body into records, keeping provider order.
pub fn parse_countries(body: &str) -> Result<Vec<CountryRecord>> {
    let parsed: Vec<RcCountry> =
        serde_json::from_str(body).context("Failed to parse REST Countries JSON")?;

    if parsed.is_empty() {
        return Err(anyhow!("REST Countries returned no matching country"));
    }

    let mut parsed = parsed.into_iter();
    let mut records = Vec::with_capacity(parsed.len());

    // The first match is the one that gets displayed, so it must be complete.
    if let Some(first) = parsed.next() {
        records.push(CountryRecord::try_from(first)?);
    }

    for country in parsed {
        match CountryRecord::try_from(country) {
            Ok(record) => records.push(record),
            Err(err) => debug!("skipping incomplete secondary match: {err:#}"),
        }
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct RcName {
    common: String,
    official: String,
}

#[derive(Debug, Deserialize)]
struct RcMaps {
    #[serde(rename = "googleMaps")]
    google_maps: String,
}

#[derive(Debug, Deserialize)]
struct RcFlags {
    png: String,
    alt: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RcCapitalInfo {
    latlng: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct RcCountry {
    name: RcName,
    #[serde(default)]
    capital: Vec<String>,
    languages: Option<Map<String, Value>>,
    maps: RcMaps,
    population: u64,
    flags: RcFlags,
    #[serde(rename = "capitalInfo", default)]
    capital_info: RcCapitalInfo,
}

impl TryFrom<RcCountry> for CountryRecord {
    type Error = anyhow::Error;

    fn try_from(c: RcCountry) -> Result<Self> {
        let common_name = c.name.common;

        let capital = c
            .capital
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("{common_name} has no capital listed"))?;

        let languages = c
            .languages
            .unwrap_or_default()
            .into_iter()
            .map(|(code, value)| match value {
                Value::String(name) => Ok(name),
                other => Err(anyhow!("Language '{code}' has a non-string name: {other}")),
            })
            .collect::<Result<Vec<_>>>()?;

        if languages.is_empty() {
            return Err(anyhow!("{common_name} has no languages listed"));
        }

        let capital_coordinates = match c.capital_info.latlng.as_deref() {
            Some([latitude, longitude, ..]) => Coordinates {
                latitude: *latitude,
                longitude: *longitude,
            },
            _ => return Err(anyhow!("{common_name} has no capital coordinates")),
        };

        Ok(CountryRecord {
            common_name,
            official_name: c.name.official,
            capital,
            languages,
            map_url: c.maps.google_maps,
            population: c.population,
            flag_url: c.flags.png,
            flag_alt: c.flags.alt,
            capital_coordinates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWITZERLAND: &str = r#"[{
        "name": {"common": "Switzerland", "official": "Swiss Confederation"},
        "capital": ["Bern"],
        "languages": {"fra": "French", "gsw": "Swiss German", "ita": "Italian", "roh": "Romansh"},
        "maps": {"googleMaps": "https://goo.gl/maps/uVuZcXaxSx5jLyEC9"},
        "population": 8654622,
        "flags": {"png": "https://flagcdn.com/w320/ch.png", "alt": "The flag of Switzerland"},
        "capitalInfo": {"latlng": [46.92, 7.47]}
    }]"#;

    fn provider(base: &str) -> RestCountriesProvider {
        RestCountriesProvider::new(base.to_string(), Client::new())
    }

    #[test]
    fn lookup_url_encodes_name_as_segment() {
        let url = provider("https://restcountries.com/v3.1")
            .lookup_url("United States")
            .expect("valid url");

        assert_eq!(url.as_str(), "https://restcountries.com/v3.1/name/United%20States");
    }

    #[test]
    fn lookup_url_tolerates_trailing_slash() {
        let url = provider("http://localhost:8080/v3.1/").lookup_url("Peru").expect("valid url");
        assert_eq!(url.as_str(), "http://localhost:8080/v3.1/name/Peru");
    }

    #[test]
    fn lookup_url_rejects_garbage_base() {
        assert!(provider("not a url").lookup_url("Peru").is_err());
    }

    #[test]
    fn parses_record_fields() {
        let records = parse_countries(SWITZERLAND).expect("valid body");
        assert_eq!(records.len(), 1);

        let ch = &records[0];
        assert_eq!(ch.common_name, "Switzerland");
        assert_eq!(ch.official_name, "Swiss Confederation");
        assert_eq!(ch.capital, "Bern");
        assert_eq!(ch.languages, ["French", "Swiss German", "Italian", "Romansh"]);
        assert_eq!(ch.population, 8654622);
        assert_eq!(ch.flag_alt.as_deref(), Some("The flag of Switzerland"));
        assert_eq!(ch.capital_coordinates, Coordinates { latitude: 46.92, longitude: 7.47 });
    }

    #[test]
    fn language_order_follows_response_not_code() {
        let body = SWITZERLAND.replace(
            r#"{"fra": "French", "gsw": "Swiss German", "ita": "Italian", "roh": "Romansh"}"#,
            r#"{"roh": "Romansh", "deu": "German"}"#,
        );

        let records = parse_countries(&body).expect("valid body");
        assert_eq!(records[0].languages, ["Romansh", "German"]);
    }

    #[test]
    fn multiple_matches_keep_order() {
        let body = r#"[
            {"name": {"common": "Dominica", "official": "Commonwealth of Dominica"},
             "capital": ["Roseau"], "languages": {"eng": "English"},
             "maps": {"googleMaps": "https://goo.gl/maps/HSKdHYpFC8oHHuyV7"},
             "population": 71991, "flags": {"png": "https://flagcdn.com/w320/dm.png"},
             "capitalInfo": {"latlng": [15.3, -61.38]}},
            {"name": {"common": "Dominican Republic", "official": "Dominican Republic"},
             "capital": ["Santo Domingo"], "languages": {"spa": "Spanish"},
             "maps": {"googleMaps": "https://goo.gl/maps/soxooTHxEeiAbn3UA"},
             "population": 10847904, "flags": {"png": "https://flagcdn.com/w320/do.png"},
             "capitalInfo": {"latlng": [18.48, -69.9]}}
        ]"#;

        let records = parse_countries(body).expect("valid body");
        let names: Vec<_> = records.iter().map(|r| r.common_name.as_str()).collect();
        assert_eq!(names, ["Dominica", "Dominican Republic"]);
        assert!(records[0].flag_alt.is_none());
    }

    #[test]
    fn incomplete_secondary_match_is_skipped() {
        let body = r#"[
            {"name": {"common": "Niger", "official": "Republic of Niger"},
             "capital": ["Niamey"], "languages": {"fra": "French"},
             "maps": {"googleMaps": "https://goo.gl/maps/VKNU2TLsZcgxM49c8"},
             "population": 24206636, "flags": {"png": "https://flagcdn.com/w320/ne.png"},
             "capitalInfo": {"latlng": [13.52, 2.12]}},
            {"name": {"common": "Nowhere", "official": "Nowhere"},
             "maps": {"googleMaps": ""}, "population": 0,
             "flags": {"png": ""}, "capitalInfo": {}}
        ]"#;

        let records = parse_countries(body).expect("first match is complete");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].capital, "Niamey");
    }

    #[test]
    fn missing_capital_info_is_an_error() {
        let body = SWITZERLAND.replace(r#""capitalInfo": {"latlng": [46.92, 7.47]}"#, r#""capitalInfo": {}"#);
        let err = parse_countries(&body).unwrap_err();
        assert!(err.to_string().contains("no capital coordinates"));
    }

    #[test]
    fn empty_result_is_an_error() {
        let err = parse_countries("[]").unwrap_err();
        assert!(err.to_string().contains("no matching country"));
    }

    #[test]
    fn missing_capital_is_an_error() {
        let body = SWITZERLAND.replace(r#""capital": ["Bern"],"#, "");
        let err = parse_countries(&body).unwrap_err();
        assert!(err.to_string().contains("no capital"));
    }

    #[test]
    fn empty_languages_is_an_error() {
        let body = SWITZERLAND.replace(
            r#"{"fra": "French", "gsw": "Swiss German", "ita": "Italian", "roh": "Romansh"}"#,
            "{}",
        );
        let err = parse_countries(&body).unwrap_err();
        assert!(err.to_string().contains("no languages"));
    }

    #[test]
    fn short_latlng_is_an_error() {
        let body = SWITZERLAND.replace("[46.92, 7.47]", "[46.92]");
        let err = parse_countries(&body).unwrap_err();
        assert!(err.to_string().contains("no capital coordinates"));
    }

    #[test]
    fn malformed_body_is_an_error() {
        let err = parse_countries(r#"{"status": 404, "message": "Not Found"}"#).unwrap_err();
        assert!(err.to_string().contains("Failed to parse REST Countries JSON"));
    }
}
