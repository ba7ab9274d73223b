// src/bulletin/client.rs
use crate::bulletin::models::{BulletinInfo, BULLETIN_LINK_SELECTOR};
use crate::utils::error::BulletinError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reqwest::{header, Url};
use scraper::{Html, Selector};
use std::time::Duration;

const USER_AGENT: &str = "metbulletin/0.1 (daily climate update archiver)";
// Be gentle with the site: one page and one PDF per day, spaced out.
const REQUEST_DELAY_MS: u64 = 250;
const REQUEST_TIMEOUT_SECS: u64 = 60;

static BULLETIN_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(BULLETIN_LINK_SELECTOR).expect("Failed to compile BULLETIN_LINK selector")
});

/// Creates a reqwest client configured for the meteorology site.
/// Certificate checks are off: the site serves an incomplete chain.
fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .danger_accept_invalid_certs(true)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
}

async fn get(client: &reqwest::Client, url: &str, accept: &str) -> Result<reqwest::Response, BulletinError> {
    tokio::time::sleep(Duration::from_millis(REQUEST_DELAY_MS)).await;

    let response = client.get(url)
        .header(header::ACCEPT, accept)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        return Err(BulletinError::Http(status, url.to_string()));
    }
    Ok(response)
}

/// Downloads the home page HTML.
pub async fn fetch_page(url: &str) -> Result<String, BulletinError> {
    let client = build_client()?;
    tracing::info!("Fetching page: {}", url);

    let body = get(&client, url, "text/html,*/*").await?.text().await?;
    tracing::debug!("Fetched {} bytes from {}", body.len(), url);
    Ok(body)
}

/// Finds the daily bulletin link in the home page and resolves it against the page URL.
pub fn find_bulletin_link(page_html: &str, page_url: &str) -> Result<Url, BulletinError> {
    let document = Html::parse_document(page_html);

    let href = document
        .select(&BULLETIN_LINK)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())
        .ok_or_else(|| BulletinError::LinkNotFound(page_url.to_string()))?;

    let base = Url::parse(page_url)
        .map_err(|e| BulletinError::Url(page_url.to_string(), e.to_string()))?;
    let link = base.join(href).map_err(|_| BulletinError::BadLink(href.to_string()))?;

    tracing::debug!("Resolved bulletin link '{}' to {}", href, link);
    Ok(link)
}

/// Downloads the bulletin PDF bytes.
pub async fn download_bulletin(url: &Url) -> Result<Vec<u8>, BulletinError> {
    let client = build_client()?;
    tracing::info!("Downloading bulletin from: {}", url);

    let bytes = get(&client, url.as_str(), "application/pdf,*/*").await?.bytes().await?;
    if !bytes.starts_with(b"%PDF") {
        tracing::warn!("Download from {} does not look like a PDF ({} bytes)", url, bytes.len());
    }
    Ok(bytes.to_vec())
}

/// Scrapes the home page for today's bulletin and downloads it.
pub async fn fetch_daily_bulletin(page_url: &str, run_date: NaiveDate) -> Result<(Vec<u8>, BulletinInfo), BulletinError> {
    let html = fetch_page(page_url).await?;
    let link = find_bulletin_link(&html, page_url)?;
    let bytes = download_bulletin(&link).await?;

    let info = BulletinInfo {
        source_url: link.to_string(),
        page_url: page_url.to_string(),
        run_date,
        size_bytes: bytes.len(),
        downloaded_at: chrono::Utc::now(),
    };
    Ok((bytes, info))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://meteo.gov.lk/index.php?lang=en";

    fn menu(href: &str) -> String {
        format!(r#"
            <html><body><ul class="menu">
              <li data-id="101" data-level="1"><a href="/index.php?lang=en">Home</a></li>
              <li data-id="567" data-level="1"><a href="/wrong-level.pdf">Wrong level</a></li>
              <li data-id="567" data-level="2"><a href="{}">Daily Climate Update</a></li>
            </ul></body></html>
        "#, href)
    }

    #[test]
    fn resolves_relative_link_against_page() {
        let link = find_bulletin_link(&menu("images/weather/daily_update.pdf"), PAGE_URL).unwrap();
        assert_eq!(link.as_str(), "https://meteo.gov.lk/images/weather/daily_update.pdf");
    }

    #[test]
    fn keeps_absolute_link() {
        let link = find_bulletin_link(&menu("https://cdn.example.org/daily.pdf"), PAGE_URL).unwrap();
        assert_eq!(link.as_str(), "https://cdn.example.org/daily.pdf");
    }

    #[test]
    fn missing_menu_entry_is_an_error() {
        let html = r#"<html><body><li data-id="567" data-level="1"><a href="x.pdf">x</a></li></body></html>"#;
        assert!(matches!(find_bulletin_link(html, PAGE_URL), Err(BulletinError::LinkNotFound(_))));
    }

    #[test]
    fn bad_page_url_is_reported() {
        assert!(matches!(find_bulletin_link(&menu("a.pdf"), "not a url"), Err(BulletinError::Url(_, _))));
    }

    #[test]
    fn unreachable_host_surfaces_network_error() {
        let result = tokio_test::block_on(fetch_page("http://127.0.0.1:9/"));
        assert!(matches!(result, Err(BulletinError::Network(_))));
    }
}
