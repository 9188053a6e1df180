use crate::parser::{ParseError, is_missing_record, parse_scholar};
use crate::throttle::Throttle;
use crate::traversal::Frontier;
use crate::types::{Lineage, Scholar, ScholarId};
use crate::utils::CrawlConfig;

use reqwest::Client;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
    #[error("Record {0} does not exist")]
    NotFound(ScholarId),
    #[error("Invalid crawl configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    base_url: String,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_base_url(crate::BASE_URL)
    }

    /// Targets a mirror of the site, or a local server in tests.
    pub fn with_base_url(base_url: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn scholar_url(&self, id: ScholarId) -> String {
        format!("{}/id.php?id={}", self.base_url, id)
    }

    pub async fn fetch_scholar(&self, id: ScholarId, level: u32) -> Result<Scholar, ScraperError> {
        let url = self.scholar_url(id);
        log::info!("Fetching record {}: {}", id, url);

        let html = self.get_html(&url).await?;
        if is_missing_record(&html) {
            return Err(ScraperError::NotFound(id));
        }

        let scholar = parse_scholar(&html, id, level, &url)?;
        log::info!(
            "Parsed {} (ID: {}, generation: {})",
            scholar.name,
            scholar.id,
            scholar.level
        );
        Ok(scholar)
    }

    /// Walks advisor links breadth-first from `config.start_id`.
    ///
    /// Pages that fail to load or parse are logged and listed in
    /// [`Lineage::failed`]; they never abort the crawl.
    pub async fn trace_lineage(&self, config: &CrawlConfig) -> Result<Lineage, ScraperError> {
        let config = config.clone().validate().map_err(ScraperError::InvalidConfig)?;
        let throttle = Throttle::new(config.wait);

        log::info!(
            "Tracing lineage from {} (end ID: {}, max depth: {})",
            config.start_id,
            config
                .end_id
                .map_or_else(|| "none".to_string(), |id| id.to_string()),
            config.end_depth
        );

        let mut frontier = Frontier::new(config.start_id, config.end_id, config.end_depth);
        let mut scholars = Vec::new();
        let mut failed = Vec::new();

        while let Some((id, level)) = frontier.next_visit() {
            throttle.pause().await;

            let scholar = match self.fetch_scholar(id, level).await {
                Ok(scholar) => scholar,
                Err(e) => {
                    log::warn!("Skipping record {}: {}", id, e);
                    failed.push(id);
                    continue;
                }
            };

            if scholar.advisors.is_empty() {
                log::info!("Advisors of {}: none", id);
            } else {
                log::info!("Advisors of {}: {}", id, scholar.descended_from());
            }

            frontier.record(id, level, &scholar.advisors);
            scholars.push(scholar);
        }

        let visited = frontier.visited_count();
        let stop = frontier.finish();
        log::info!(
            "Crawl finished after {} page(s): {}. Collected {} record(s)",
            visited,
            stop,
            scholars.len()
        );

        Ok(Lineage {
            scholars,
            failed,
            stop,
        })
    }

    async fn get_html(&self, url: &str) -> Result<String, ScraperError> {
        Ok(self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }
}
