//! Record extraction from listing card fragments
//!
//! Extraction is a pure, synchronous function over one card's HTML. A card
//! missing any required field yields `None`, which the walker treats as an
//! expected silent skip rather than an error. Translation enrichment does
//! not happen here; it is applied later, during persistence.

use crate::harvest::codes::normalize_title;
use crate::storage::Record;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use scraper::{ElementRef, Html, Selector};

/// Human-readable date format used by the listing (e.g. "May 09, 2024")
const POSTED_DATE_FORMAT: &str = "%B %d, %Y";

/// Extracts a record from one listing card fragment
///
/// Required fields: posting date element, title link with href, image with
/// a src attribute, size label, and the primary download link with href.
/// Tags, description, and actress names are optional and default to empty.
///
/// Returns `None` if any required field is missing.
pub fn extract_record(fragment_html: &str, base_url: &str) -> Option<Record> {
    let fragment = Html::parse_fragment(fragment_html);

    let date_text = select_text(&fragment, "p.subtitle a")?;
    let posted_at = parse_posted_date(&date_text);

    let title_link = select_first(&fragment, "h5.title a")?;
    let raw_title = element_text(&title_link);
    if raw_title.is_empty() {
        return None;
    }
    let normalized = normalize_title(&raw_title);

    let source_url = absolutize(title_link.value().attr("href")?, base_url);

    let image = select_first(&fragment, "img.image")?;
    let image_url = absolutize(image.value().attr("src")?, base_url);

    let file_size = select_text(&fragment, "span.is-size-6")?;

    let download = select_first(&fragment, "a.button.is-primary.is-fullwidth")?;
    let download_url = absolutize(download.value().attr("href")?, base_url);

    let tags = select_all_text(&fragment, "a.tag");
    let actress = select_all_text(&fragment, "div.panel a.panel-block");

    let description = select_text(&fragment, "p.level.has-text-grey-dark").unwrap_or_default();

    Some(Record {
        source_url,
        code: normalized.clone(),
        title: normalized,
        image_url,
        file_size,
        posted_at,
        tags,
        description,
        // Filled during persistence if enrichment succeeds
        translated_description: String::new(),
        actress,
        download_url,
        scraped_at: Utc::now(),
    })
}

/// Parses the listing's posting date, substituting the current instant as a
/// sentinel when the text does not match the expected calendar format
fn parse_posted_date(text: &str) -> chrono::DateTime<Utc> {
    match NaiveDate::parse_from_str(text, POSTED_DATE_FORMAT) {
        Ok(date) => Utc
            .from_utc_datetime(&date.and_time(NaiveTime::MIN)),
        Err(_) => {
            tracing::debug!("Unparsable posting date '{}', using current time", text);
            Utc::now()
        }
    }
}

/// Resolves a possibly relative URL against the fixed site base
fn absolutize(href: &str, base_url: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", base_url, href)
    }
}

fn select_first<'a>(fragment: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    fragment.select(&selector).next()
}

fn select_text(fragment: &Html, css: &str) -> Option<String> {
    let text = element_text(&select_first(fragment, css)?);
    Some(text)
}

fn select_all_text(fragment: &Html, css: &str) -> Vec<String> {
    match Selector::parse(css) {
        Ok(selector) => fragment
            .select(&selector)
            .map(|el| element_text(&el))
            .filter(|s| !s.is_empty())
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const BASE: &str = "https://example.com";

    fn full_card() -> String {
        card_with("ABCD123", "May 09, 2024", "Two people talking.")
    }

    fn card_with(title: &str, date: &str, description: &str) -> String {
        format!(
            r#"<div class="card mb-3">
              <p class="subtitle"><a href="/popular/2024-05-09">{date}</a></p>
              <h5 class="title"><a href="/torrent/{title}">{title}</a></h5>
              <img class="image" src="/thumbs/{title}.jpg" />
              <span class="is-size-6">4.54GB</span>
              <a class="tag" href="/tag/first">First</a>
              <a class="tag" href="/tag/second">Second</a>
              <p class="level has-text-grey-dark">{description}</p>
              <div class="panel">
                <a class="panel-block" href="/actress/one">One Name</a>
              </div>
              <a class="button is-primary is-fullwidth" href="/download/{title}.torrent">Download</a>
            </div>"#
        )
    }

    #[test]
    fn test_extracts_full_card() {
        let record = extract_record(&full_card(), BASE).expect("card should extract");

        assert_eq!(record.source_url, "https://example.com/torrent/ABCD123");
        assert_eq!(record.code, "ABCD-123");
        assert_eq!(record.title, "ABCD-123");
        assert_eq!(record.image_url, "https://example.com/thumbs/ABCD123.jpg");
        assert_eq!(record.file_size, "4.54GB");
        assert_eq!(record.posted_at.date_naive().to_string(), "2024-05-09");
        assert_eq!(record.tags, vec!["First", "Second"]);
        assert_eq!(record.description, "Two people talking.");
        assert_eq!(record.translated_description, "");
        assert_eq!(record.actress, vec!["One Name"]);
        assert_eq!(
            record.download_url,
            "https://example.com/download/ABCD123.torrent"
        );
    }

    #[test]
    fn test_absolute_urls_are_kept() {
        let html = full_card().replace(
            r#"href="/torrent/ABCD123""#,
            r#"href="https://mirror.example.net/torrent/ABCD123""#,
        );
        let record = extract_record(&html, BASE).unwrap();
        assert_eq!(
            record.source_url,
            "https://mirror.example.net/torrent/ABCD123"
        );
    }

    #[test]
    fn test_missing_download_link_returns_none() {
        let html = full_card().replace("button is-primary is-fullwidth", "button is-secondary");
        assert!(extract_record(&html, BASE).is_none());
    }

    #[test]
    fn test_missing_date_returns_none() {
        let html = full_card().replace(r#"class="subtitle""#, r#"class="other""#);
        assert!(extract_record(&html, BASE).is_none());
    }

    #[test]
    fn test_missing_title_returns_none() {
        let html = full_card().replace(r#"class="title""#, r#"class="headline""#);
        assert!(extract_record(&html, BASE).is_none());
    }

    #[test]
    fn test_missing_image_src_returns_none() {
        let html = full_card().replace(r#"src="/thumbs/ABCD123.jpg""#, "");
        assert!(extract_record(&html, BASE).is_none());
    }

    #[test]
    fn test_missing_size_returns_none() {
        let html = full_card().replace("is-size-6", "is-size-5");
        assert!(extract_record(&html, BASE).is_none());
    }

    #[test]
    fn test_unparsable_date_falls_back_to_now() {
        let html = card_with("ABCD123", "sometime recently", "");
        let record = extract_record(&html, BASE).unwrap();
        assert_eq!(record.posted_at.year(), Utc::now().year());
    }

    #[test]
    fn test_optional_fields_default_to_empty() {
        let html = r#"<div class="card mb-3">
              <p class="subtitle"><a href="/d">May 09, 2024</a></p>
              <h5 class="title"><a href="/torrent/XY99">XY99</a></h5>
              <img class="image" src="/thumbs/x.jpg" />
              <span class="is-size-6">1.2GB</span>
              <a class="button is-primary is-fullwidth" href="/dl/x.torrent">DL</a>
            </div>"#;
        let record = extract_record(html, BASE).unwrap();
        assert!(record.tags.is_empty());
        assert!(record.actress.is_empty());
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_title_is_normalized() {
        let html = card_with("FC2PPV12345", "May 09, 2024", "");
        let record = extract_record(&html, BASE).unwrap();
        assert_eq!(record.code, "FC2-PPV-12345");
        assert_eq!(record.title, "FC2-PPV-12345");
    }
}
