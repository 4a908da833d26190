use distrowatch::error::Error;
use distrowatch::services::DistroWatchProvider;
use url::Url;
use wiremock::matchers::{header, method, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RANKING_PAGE: &str = include_str!("fixtures/ranking_page.html");

fn provider_for(mock_server: &MockServer) -> DistroWatchProvider {
    DistroWatchProvider::with_base_url(Url::parse(&mock_server.uri()).unwrap())
}

/// Minimal ranking page with the given option marked as selected, for
/// telling the per-span responses apart.
fn ranking_page_for(data_span_id: &str, data_span_name: &str) -> String {
    format!(
        r#"<html><body>
<table class="News">
  <tr><th colspan="3">Page Hit Ranking</th></tr>
  <tr><td colspan="3"><form method="get" action="/">
    <select name="dataspan">
      <option value="{data_span_id}" selected>{data_span_name}</option>
    </select>
  </form></td></tr>
  <tr><th>Rank</th><th>Distribution</th><th>HPD</th></tr>
  <tr><th>1</th><td><a href="mxlinux">MX Linux</a></td><td>2667</td></tr>
</table>
</body></html>"#
    )
}

async fn mount_index_page(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(query_param("language", "EN"))
        .and(query_param_is_missing("dataspan"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RANKING_PAGE))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn fetch_ranking_span_label_round_trips() {
    let mock_server = MockServer::start().await;
    mount_index_page(&mock_server).await;
    Mock::given(method("GET"))
        .and(query_param("dataspan", "202408"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RANKING_PAGE))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let data_spans = provider.fetch_data_spans().await.unwrap();
    let august = data_spans
        .iter()
        .find(|data_span| data_span.data_span_id == "202408")
        .unwrap();

    let ranking = provider.fetch_ranking(&august.data_span_id).await.unwrap();

    assert_eq!(ranking.data_span_name, august.data_span_name);
    assert_eq!(ranking.distributions_ranking.len(), 5);
}

#[tokio::test]
async fn fetch_all_rankings_preserves_data_span_order() {
    let mock_server = MockServer::start().await;
    mount_index_page(&mock_server).await;

    let provider = provider_for(&mock_server);
    let data_spans = provider.fetch_data_spans().await.unwrap();
    assert_eq!(data_spans.len(), 4);

    for data_span in &data_spans {
        Mock::given(method("GET"))
            .and(query_param("dataspan", data_span.data_span_id.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_string(ranking_page_for(
                &data_span.data_span_id,
                &data_span.data_span_name,
            )))
            .mount(&mock_server)
            .await;
    }

    let rankings = provider.fetch_all_rankings().await.unwrap();

    assert_eq!(rankings.len(), data_spans.len());
    for (ranking, data_span) in rankings.iter().zip(&data_spans) {
        assert_eq!(ranking.data_span_name, data_span.data_span_name);
    }
}

#[tokio::test]
async fn non_success_status_maps_to_fetch_failed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let result = provider.fetch_data_spans().await;

    assert!(matches!(result, Err(Error::FetchFailed { .. })));
}

#[tokio::test]
async fn fetch_all_rankings_fails_on_first_failed_request() {
    let mock_server = MockServer::start().await;
    mount_index_page(&mock_server).await;
    Mock::given(method("GET"))
        .and(query_param("dataspan", "202408"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RANKING_PAGE))
        .mount(&mock_server)
        .await;
    // Every other span request gets a 500 from the fallback mock.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server);
    let result = provider.fetch_all_rankings().await;

    assert!(matches!(result, Err(Error::FetchFailed { .. })));
}

#[tokio::test]
async fn requests_carry_a_user_agent_from_the_injected_pool() {
    let mock_server = MockServer::start().await;
    // Only matches when the injected agent is actually sent; a missing
    // header falls through to the mock server's 404.
    Mock::given(method("GET"))
        .and(header("user-agent", "test-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RANKING_PAGE))
        .mount(&mock_server)
        .await;

    let provider =
        provider_for(&mock_server).with_user_agents(vec!["test-agent".to_string()]);
    let data_spans = provider.fetch_data_spans().await.unwrap();

    assert_eq!(data_spans.len(), 4);
}

#[tokio::test]
async fn empty_user_agent_pool_sends_no_user_agent_header() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RANKING_PAGE))
        .mount(&mock_server)
        .await;

    let provider = provider_for(&mock_server).with_user_agents(Vec::new());
    provider.fetch_data_spans().await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("user-agent"));
}
