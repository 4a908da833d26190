use futures::future::join_all;
use rand::{seq::SliceRandom, Rng};
use reqwest::{header, Client};
use url::Url;

use crate::{
    domain::ranking::{DataSpan, Ranking},
    error::{Error, Result},
    services::extractor,
};

pub const DISTROWATCH_URL: &str = "https://distrowatch.com/";

/// Rotating between a handful of realistic user agents keeps naive bot
/// blocking off our back; it is not correctness-critical.
const SAMPLE_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/42.0.2311.135 Safari/537.36 Edge/12.246",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_2) AppleWebKit/601.3.9 (KHTML, like Gecko) Version/9.0.2 Safari/601.3.9",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:15.0) Gecko/20100101 Firefox/15.0.1",
    "Mozilla/5.0 (Linux; Android 5.0.2; SAMSUNG SM-T550 Build/LRX22G) AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/3.3 Chrome/38.0.2125.102 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 12_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/12.0 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 11_0 like Mac OS X) AppleWebKit/604.1.38 (KHTML, like Gecko) Version/11.0 Mobile/15A372 Safari/604.1",
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
    "Mozilla/5.0 (compatible; bingbot/2.0; +http://www.bing.com/bingbot.htm)",
    "Mozilla/5.0 (compatible; Yahoo! Slurp; http://help.yahoo.com/help/us/ysearch/slurp)",
];

/// Fetches ranking pages from distrowatch.com and hands their bodies to
/// the extractor. One plain GET per operation, no retries, no state.
pub struct DistroWatchProvider {
    client: Client,
    base_url: Url,
    user_agents: Vec<String>,
}

impl DistroWatchProvider {
    pub fn new() -> Self {
        Self::with_base_url(Url::parse(DISTROWATCH_URL).unwrap())
    }

    /// Points the provider at a different origin. Used by tests.
    pub fn with_base_url(base_url: Url) -> Self {
        DistroWatchProvider {
            client: Client::new(),
            base_url,
            user_agents: SAMPLE_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        }
    }

    /// Replaces the user agent pool. An empty pool disables the header.
    pub fn with_user_agents(mut self, user_agents: Vec<String>) -> Self {
        self.user_agents = user_agents;
        self
    }

    /// Lists the data spans offered by the index page's selector control.
    pub async fn fetch_data_spans(&self) -> Result<Vec<DataSpan>> {
        let html_content = self.make_ranking_request(None).await?;
        Ok(extractor::parse_data_spans(&html_content))
    }

    /// Fetches the ranking for one data span. The id is passed through
    /// unvalidated; callers decide what ids are acceptable.
    pub async fn fetch_ranking(&self, data_span_id: &str) -> Result<Ranking> {
        let html_content = self.make_ranking_request(Some(data_span_id)).await?;
        Ok(extractor::parse_ranking(&html_content, &self.base_url))
    }

    /// Fetches every known ranking, one concurrent request per data span.
    /// Results come back in data span enumeration order; the first failed
    /// request fails the whole call.
    pub async fn fetch_all_rankings(&self) -> Result<Vec<Ranking>> {
        let data_spans = self.fetch_data_spans().await?;
        log::info!("Fetching rankings for {} data spans", data_spans.len());

        let requests = data_spans
            .iter()
            .map(|data_span| self.fetch_ranking(&data_span.data_span_id));
        join_all(requests).await.into_iter().collect()
    }

    async fn make_ranking_request(&self, data_span_id: Option<&str>) -> Result<String> {
        let page_path = self.create_page_path(data_span_id);

        let mut request = self.client.get(page_path.clone());
        if let Some(user_agent) = pick_user_agent(&self.user_agents, &mut rand::thread_rng()) {
            request = request.header(header::USER_AGENT, user_agent);
        }

        let response = request
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|source| Error::FetchFailed {
                url: page_path.to_string(),
                source,
            })?;

        response.text().await.map_err(|source| Error::FetchFailed {
            url: page_path.to_string(),
            source,
        })
    }

    fn create_page_path(&self, data_span_id: Option<&str>) -> Url {
        let mut page_path = self.base_url.clone();
        {
            let mut query_pairs = page_path.query_pairs_mut();
            query_pairs.append_pair("language", "EN");
            if let Some(data_span_id) = data_span_id {
                query_pairs.append_pair("dataspan", data_span_id);
            }
        }
        page_path
    }
}

impl Default for DistroWatchProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn pick_user_agent<'a, R: Rng>(pool: &'a [String], rng: &mut R) -> Option<&'a str> {
    pool.choose(rng).map(String::as_str)
}
