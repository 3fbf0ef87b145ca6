//! LAK Brandenburg duty-roster portal (serves Berlin and Brandenburg)
//!
//! The portal answers a quick-search GET with an HTML table; one row per
//! pharmacy, three cells: name/address, contact, directions link. Rows with
//! fewer than three cells are header or footer decoration and are skipped.
//!
//! Parsing never fails: anything that cannot be extracted degrades to a
//! per-field sentinel, and fetch failures or empty result sets become a
//! single placeholder record so the caller always receives a non-empty,
//! uniformly-typed list.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::domain::duty_date::resolve_query_date;
use crate::domain::pharmacy::{Pharmacy, UNKNOWN};
use crate::infrastructure::config::{lakbb_portal, ListingConfig};
use crate::infrastructure::http_client::{HttpClient, HttpClientConfig};
use crate::infrastructure::regions::RegionProvider;

/// Placeholder returned when the portal could not be reached at all.
pub fn placeholder_unavailable() -> Pharmacy {
    Pharmacy::new(
        "Notdienst nicht verfügbar",
        "N/A",
        "Daten konnten nicht abgerufen werden.",
    )
}

/// Placeholder returned when the portal answered but listed no pharmacies.
pub fn placeholder_no_results() -> Pharmacy {
    Pharmacy::new("Keine Notdienst-Apotheken gefunden", "N/A", "N/A")
}

/// Guarantee a non-empty result list: an empty parse becomes the single
/// no-results placeholder.
pub fn records_or_placeholder(pharmacies: Vec<Pharmacy>) -> Vec<Pharmacy> {
    if pharmacies.is_empty() {
        vec![placeholder_no_results()]
    } else {
        pharmacies
    }
}

/// Parser for the portal's listing table.
///
/// Selectors and extraction patterns are compiled once at construction.
pub struct LakbbParser {
    row_selector: Selector,
    cell_selector: Selector,
    bold_selector: Selector,
    gmaps_selector: Selector,
    phone_re: Regex,
    fax_re: Regex,
    homepage_re: Regex,
    mailto_re: Regex,
    linebreak_re: Regex,
    tag_re: Regex,
    whitespace_re: Regex,
}

impl LakbbParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            row_selector: Selector::parse("table tr")
                .map_err(|e| anyhow!("invalid row selector: {}", e))?,
            cell_selector: Selector::parse("td")
                .map_err(|e| anyhow!("invalid cell selector: {}", e))?,
            bold_selector: Selector::parse("b")
                .map_err(|e| anyhow!("invalid name selector: {}", e))?,
            gmaps_selector: Selector::parse(r#"a[title="Anfahrtsplan bei Google Maps"]"#)
                .map_err(|e| anyhow!("invalid directions selector: {}", e))?,
            phone_re: Regex::new(r"Tel\.: ([\d\s/]+)")?,
            fax_re: Regex::new(r"Fax: ([\d\s/]+)")?,
            homepage_re: Regex::new(r#"Homepage: <a href="(.+?)""#)?,
            mailto_re: Regex::new(r#"<a href="mailto:(.+?)">"#)?,
            linebreak_re: Regex::new(r"<br\s*/?>")?,
            tag_re: Regex::new(r"<[^>]*>")?,
            whitespace_re: Regex::new(r"\s+")?,
        })
    }

    /// Parse the listing document into at most `limit` records, preserving
    /// source row order.
    pub fn parse(&self, html: &str, limit: usize) -> Vec<Pharmacy> {
        let document = Html::parse_document(html);
        let mut pharmacies = Vec::new();

        for row in document.select(&self.row_selector) {
            if pharmacies.len() >= limit {
                break;
            }

            let cells: Vec<ElementRef> = row.select(&self.cell_selector).collect();
            if cells.len() < 3 {
                continue;
            }

            pharmacies.push(self.extract_row(&cells));
        }

        debug!("parsed {} pharmacies from listing", pharmacies.len());
        pharmacies
    }

    fn extract_row(&self, cells: &[ElementRef]) -> Pharmacy {
        let name = cells[0]
            .select(&self.bold_selector)
            .next()
            .map(|b| b.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        // Address lines are <br>-separated inside the name cell:
        // line 0 holds the bolded name, line 1 the street, line 2 the town.
        let address_html = cells[0].inner_html();
        let address_lines: Vec<String> = self
            .linebreak_re
            .split(&address_html)
            .map(|fragment| self.strip_markup(fragment))
            .collect();
        let street = self.address_line(&address_lines, 1);
        let town = self.address_line(&address_lines, 2);

        let contact_html = cells[1].inner_html();
        let phone = self
            .capture(&self.phone_re, &contact_html)
            .map(|raw| self.normalize_number(&raw));
        let fax = self
            .capture(&self.fax_re, &contact_html)
            .map(|raw| self.normalize_number(&raw));
        let web = self.capture(&self.homepage_re, &contact_html);
        let mail = self.capture(&self.mailto_re, &contact_html);

        let gmaps = cells[2]
            .select(&self.gmaps_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(String::from);

        let mut pharmacy = Pharmacy::new(&name, &street, &town);
        pharmacy.state = Some(lakbb_portal::REGION_NAME.to_string());
        pharmacy.phone = phone;
        pharmacy.fax = fax;
        pharmacy.web = web;
        pharmacy.mail = mail;
        pharmacy.gmaps = gmaps;
        pharmacy
    }

    fn address_line(&self, lines: &[String], index: usize) -> String {
        lines
            .get(index)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    fn capture(&self, pattern: &Regex, text: &str) -> Option<String> {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Strip `/` and `-` separators from a phone or fax number and collapse
    /// whitespace runs to single spaces.
    pub fn normalize_number(&self, raw: &str) -> String {
        let stripped = raw.replace(['/', '-'], "");
        self.whitespace_re
            .replace_all(stripped.trim(), " ")
            .to_string()
    }

    fn strip_markup(&self, fragment: &str) -> String {
        let text = self.tag_re.replace_all(fragment, "");
        self.whitespace_re
            .replace_all(text.trim(), " ")
            .to_string()
    }
}

/// Region provider for the LAK Brandenburg portal.
pub struct LakbbProvider {
    http: HttpClient,
    parser: LakbbParser,
    base_url: String,
}

impl LakbbProvider {
    pub fn new(config: &ListingConfig) -> Result<Self> {
        let http = HttpClient::with_config(HttpClientConfig {
            timeout_seconds: config.request_timeout_seconds,
            user_agent: config.user_agent.clone(),
            referer: Some(config.referer.clone()),
        })?;

        Ok(Self {
            http,
            parser: LakbbParser::new()?,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl RegionProvider for LakbbProvider {
    fn region_name(&self) -> &'static str {
        lakbb_portal::REGION_NAME
    }

    fn state_aliases(&self) -> &'static [&'static str] {
        &["berlin", "brandenburg"]
    }

    async fn fetch_duty_pharmacies(
        &self,
        plz: &str,
        date: Option<DateTime<Local>>,
        limit: usize,
        morning_change: bool,
    ) -> Vec<Pharmacy> {
        let query_date = resolve_query_date(date, morning_change);
        debug!("fetching duty pharmacies for plz {} on {}", plz, query_date);

        let query = [
            (lakbb_portal::PARAM_SEARCH, plz),
            (lakbb_portal::PARAM_DATE, query_date.as_str()),
        ];

        let html = match self.http.fetch_text(&self.base_url, &query).await {
            Ok(html) => html,
            Err(e) => {
                warn!("duty roster fetch failed: {}", e);
                return vec![placeholder_unavailable()];
            }
        };

        let pharmacies = self.parser.parse(&html, limit);
        if pharmacies.is_empty() {
            warn!("no duty pharmacies listed for plz {} on {}", plz, query_date);
        }

        records_or_placeholder(pharmacies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_HTML: &str = r#"
        <html><body>
        <table>
            <tr><th>Apotheke</th><th>Kontakt</th></tr>
            <tr>
                <td><b>Engel-Apotheke</b><br>Hauptstraße 5<br>14467 Potsdam</td>
                <td>Tel.: 0331 / 123456<br>Fax: 0331 / 654 321<br>
                    Homepage: <a href="http://engel-apotheke.example">Homepage</a><br>
                    <a href="mailto:info@engel-apotheke.example">E-Mail</a></td>
                <td><a title="Anfahrtsplan bei Google Maps" href="https://maps.google.com/?q=Engel">Karte</a></td>
            </tr>
            <tr>
                <td><b>Stern-Apotheke</b><br>Bahnhofstraße 12<br>14776 Brandenburg an der Havel</td>
                <td>Tel.: 03381 / 22 33 44</td>
                <td></td>
            </tr>
            <tr>
                <td>Löwen-Apotheke ohne Hervorhebung</td>
                <td></td>
                <td></td>
            </tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn parses_qualifying_rows_in_source_order() {
        let parser = LakbbParser::new().unwrap();
        let pharmacies = parser.parse(LISTING_HTML, 10);

        assert_eq!(pharmacies.len(), 3);
        assert_eq!(pharmacies[0].name, "Engel-Apotheke");
        assert_eq!(pharmacies[1].name, "Stern-Apotheke");
        assert_eq!(pharmacies[0].street, "Hauptstraße 5");
        assert_eq!(pharmacies[0].town, "14467 Potsdam");
        assert_eq!(pharmacies[1].town, "14776 Brandenburg an der Havel");
    }

    #[test]
    fn limit_truncates_preserving_order() {
        let parser = LakbbParser::new().unwrap();
        let pharmacies = parser.parse(LISTING_HTML, 2);

        assert_eq!(pharmacies.len(), 2);
        assert_eq!(pharmacies[0].name, "Engel-Apotheke");
        assert_eq!(pharmacies[1].name, "Stern-Apotheke");
    }

    #[test]
    fn extracts_contact_fields_independently() {
        let parser = LakbbParser::new().unwrap();
        let pharmacies = parser.parse(LISTING_HTML, 10);

        let first = &pharmacies[0];
        assert_eq!(first.phone.as_deref(), Some("0331 123456"));
        assert_eq!(first.fax.as_deref(), Some("0331 654 321"));
        assert_eq!(first.web.as_deref(), Some("http://engel-apotheke.example"));
        assert_eq!(first.mail.as_deref(), Some("info@engel-apotheke.example"));
        assert_eq!(
            first.gmaps.as_deref(),
            Some("https://maps.google.com/?q=Engel")
        );
        assert_eq!(first.state.as_deref(), Some("Brandenburg"));

        let second = &pharmacies[1];
        assert_eq!(second.phone.as_deref(), Some("03381 22 33 44"));
        assert!(second.fax.is_none());
        assert!(second.web.is_none());
        assert!(second.mail.is_none());
        assert!(second.gmaps.is_none());
    }

    #[test]
    fn missing_fields_fall_back_to_sentinels() {
        let parser = LakbbParser::new().unwrap();
        let pharmacies = parser.parse(LISTING_HTML, 10);

        let third = &pharmacies[2];
        assert_eq!(third.name, UNKNOWN);
        assert_eq!(third.street, UNKNOWN);
        assert_eq!(third.town, UNKNOWN);
    }

    #[test]
    fn garbage_html_yields_no_rows() {
        let parser = LakbbParser::new().unwrap();
        assert!(parser.parse("not html at all", 10).is_empty());
        assert!(parser.parse("", 10).is_empty());
        assert!(parser
            .parse("<html><body><p>Wartungsarbeiten</p></body></html>", 10)
            .is_empty());
    }

    #[test]
    fn phone_normalization_strips_separators_and_collapses_spaces() {
        let parser = LakbbParser::new().unwrap();
        assert_eq!(parser.normalize_number("030 / 123-456"), "030 123456");
        assert_eq!(parser.normalize_number("  0331  /  97 20 20  "), "0331 97 20 20");
        assert_eq!(parser.normalize_number("030-44-55"), "0304455");
    }

    #[test]
    fn garbage_html_degrades_to_single_no_results_record() {
        let parser = LakbbParser::new().unwrap();

        for html in ["not html at all", "", "<html><body><p>Wartungsarbeiten</p></body></html>"] {
            let pharmacies = records_or_placeholder(parser.parse(html, 10));
            assert_eq!(pharmacies.len(), 1);
            assert_eq!(pharmacies[0].name, "Keine Notdienst-Apotheken gefunden");
        }
    }

    #[test]
    fn non_empty_parse_is_passed_through_unchanged() {
        let parser = LakbbParser::new().unwrap();
        let pharmacies = records_or_placeholder(parser.parse(LISTING_HTML, 10));

        assert_eq!(pharmacies.len(), 3);
        assert_eq!(pharmacies[0].name, "Engel-Apotheke");
    }

    #[test]
    fn placeholders_carry_distinct_messages() {
        assert_eq!(placeholder_unavailable().name, "Notdienst nicht verfügbar");
        assert_eq!(
            placeholder_no_results().name,
            "Keine Notdienst-Apotheken gefunden"
        );
    }
}
