use crossrate_core::{CrossSiteResolver, Discovery, LookupRequest, LookupResponse, Orchestrator, SearchEngine};
use crossrate_models::{MovieInfo, SiteName};
use crossrate_sites::{DisplayLocale, MemoryFetcher, SiteError};
use std::sync::Arc;

const IMDB_SHAWSHANK: &str = include_str!("../../crossrate-sites/tests/fixtures/imdb_shawshank.html");
const IMDB_CRITIC_REVIEWS: &str = include_str!("../../crossrate-sites/tests/fixtures/imdb_shawshank_criticreviews.html");
const IMDB_CSS: &str = include_str!("../../crossrate-sites/tests/fixtures/imdb_title.css");
const ROTTEN_SHAWSHANK: &str = include_str!("../../crossrate-sites/tests/fixtures/rotten_shawshank.html");
const REDIRECT_NOTICE: &str = include_str!("../../crossrate-sites/tests/fixtures/google_redirect_notice.html");
const LISTING_AMBLIN: &str = include_str!("../../crossrate-sites/tests/fixtures/google_listing_amblin.html");
const LISTING_EMPTY: &str = include_str!("../../crossrate-sites/tests/fixtures/google_listing_empty.html");

const IMDB_URL: &str = "https://www.imdb.com/title/tt0111161/";
const ROTTEN_URL: &str = "https://www.rottentomatoes.com/m/shawshank_redemption";

const AMBLIN_PAGE: &str = r#"<html><head><script type="application/ld+json">{"@type":"Movie","name":"Amblin'","dateCreated":"1968"}</script></head>
<body><score-board tomatometerscore="" audiencescore="67" audiencestate="upright"><a slot="audience-count">1,000+ Ratings</a></score-board></body></html>"#;

fn shawshank() -> MovieInfo {
    MovieInfo::new("The Shawshank Redemption", Some(1994), Some("Frank Darabont".to_string())).unwrap()
}

fn search_url(info: &MovieInfo, target: SiteName) -> String {
    SearchEngine::default().search_url(info, target)
}

/// Search for Shawshank on Rotten Tomatoes redirects to its page
fn rotten_redirect_fetcher() -> Arc<MemoryFetcher> {
    Arc::new(
        MemoryFetcher::new()
            .with_redirect(
                &search_url(&shawshank(), SiteName::RottenTomatoes),
                &format!("https://www.google.com/url?q={}&sa=D&source=editors", ROTTEN_URL),
                REDIRECT_NOTICE,
            )
            .with_page(ROTTEN_URL, ROTTEN_SHAWSHANK),
    )
}

fn orchestrator(fetcher: Arc<MemoryFetcher>) -> Orchestrator {
    Orchestrator::new(CrossSiteResolver::new(fetcher, SearchEngine::default()))
}

fn request(info: MovieInfo, remote: &str) -> LookupRequest {
    LookupRequest {
        movie_info: info,
        remote_page_name: remote.to_string(),
    }
}

#[tokio::test]
async fn test_shawshank_round_trip_through_redirect() {
    let fetcher = rotten_redirect_fetcher();
    let data = orchestrator(fetcher.clone())
        .handle(&request(shawshank(), "rotten"))
        .await
        .unwrap();

    assert_eq!(data.url(), ROTTEN_URL);
    assert_eq!(data.page_name(), SiteName::RottenTomatoes);

    let user = data.user_ratings().unwrap().score().unwrap();
    assert!((97.0..=99.0).contains(&user), "user score {}", user);
    let critic = data.critic_ratings().unwrap().score().unwrap();
    assert!((89.0..=91.0).contains(&critic), "critic score {}", critic);
    assert!(data.critic_ratings().unwrap().count().unwrap() > 0);
    assert!(data.user_ratings().unwrap().count().unwrap() > 0);
}

#[tokio::test]
async fn test_redirect_branch_skips_listing() {
    let fetcher = rotten_redirect_fetcher();
    let resolver = CrossSiteResolver::new(fetcher.clone(), SearchEngine::default());

    let (url, discovery) = resolver.locate(&shawshank(), SiteName::RottenTomatoes).await.unwrap();
    assert_eq!(url, ROTTEN_URL);
    assert_eq!(discovery, Discovery::Redirect);

    resolver.resolve(&shawshank(), SiteName::RottenTomatoes).await.unwrap();
    let requests = fetcher.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1], search_url(&shawshank(), SiteName::RottenTomatoes));
    assert_eq!(requests[2], ROTTEN_URL);
    assert!(!requests.iter().any(|r| r.contains("some_other_movie")));
}

#[tokio::test]
async fn test_listing_branch_takes_first_match() {
    let amblin = MovieInfo::new("Amblin", Some(1968), Some("Steven Spielberg".to_string())).unwrap();
    let search = search_url(&amblin, SiteName::RottenTomatoes);
    let fetcher = Arc::new(
        MemoryFetcher::new()
            .with_page(&search, LISTING_AMBLIN)
            .with_page("https://www.rottentomatoes.com/m/amblin", AMBLIN_PAGE)
            .with_page("https://www.rottentomatoes.com/m/amblin_2", ROTTEN_SHAWSHANK),
    );

    let data = orchestrator(fetcher.clone())
        .handle(&request(amblin, "rotten"))
        .await
        .unwrap();
    assert_eq!(data.url(), "https://www.rottentomatoes.com/m/amblin");
    assert!(data.critic_ratings().is_none());
    assert_eq!(data.user_ratings().unwrap().count(), Some(1000));
    assert_eq!(fetcher.requests(), vec![search, "https://www.rottentomatoes.com/m/amblin".to_string()]);
}

#[tokio::test]
async fn test_listing_without_match_is_no_match_found() {
    let info = MovieInfo::new("Nonexistent Movie", Some(1901), None).unwrap();
    let search = search_url(&info, SiteName::Imdb);
    let fetcher = Arc::new(MemoryFetcher::new().with_page(&search, LISTING_EMPTY));

    let err = orchestrator(fetcher.clone()).handle(&request(info, "imdb")).await.unwrap_err();
    match err {
        SiteError::NoMatchFound { site, search_url } => {
            assert_eq!(site, SiteName::Imdb);
            assert_eq!(search_url, search);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fetcher.requests(), vec![search]);
}

#[tokio::test]
async fn test_unknown_remote_site_fetches_nothing() {
    let fetcher = Arc::new(MemoryFetcher::new());
    let err = orchestrator(fetcher.clone())
        .handle(&request(shawshank(), "letterboxd"))
        .await
        .unwrap_err();
    assert!(matches!(err, SiteError::UnsupportedSite(ref name) if name == "letterboxd"));
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn test_search_failure_is_transient() {
    let fetcher = Arc::new(MemoryFetcher::new());
    let err = orchestrator(fetcher).handle(&request(shawshank(), "imdb")).await.unwrap_err();
    assert!(err.is_transient());
    assert!(err.to_string().contains("google.com/search"));
}

#[tokio::test]
async fn test_handle_message_round_trip() {
    let orchestrator = orchestrator(rotten_redirect_fetcher());
    let message = r#"{"movieInfo":{"title":"The Shawshank Redemption","year":1994,"director":"Frank Darabont"},"remotePageName":"rotten"}"#;

    let reply = orchestrator.handle_message(message).await;
    let json: serde_json::Value = serde_json::from_str(&reply).unwrap();
    assert_eq!(json["type"], "ratings");
    assert_eq!(json["pageName"], "rotten");
    assert_eq!(json["url"], ROTTEN_URL);
    assert_eq!(json["summary"]["title"], "Critics Consensus");

    let response: LookupResponse = serde_json::from_str(&reply).unwrap();
    assert!(matches!(response, LookupResponse::Ratings(_)));
}

#[tokio::test]
async fn test_handle_message_errors() {
    let orchestrator = orchestrator(Arc::new(MemoryFetcher::new()));

    let reply: serde_json::Value = serde_json::from_str(&orchestrator.handle_message("{not json").await).unwrap();
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["kind"], "invalidRequest");

    let message = r#"{"movieInfo":{"title":"Heat","year":1995,"director":null},"remotePageName":"metacritic"}"#;
    let reply: serde_json::Value = serde_json::from_str(&orchestrator.handle_message(message).await).unwrap();
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["kind"], "unsupportedSite");

    let message = r#"{"movieInfo":{"title":"  ","year":1995},"remotePageName":"imdb"}"#;
    let reply: serde_json::Value = serde_json::from_str(&orchestrator.handle_message(message).await).unwrap();
    assert_eq!(reply["kind"], "invalidRequest");
}

#[tokio::test]
async fn test_cross_link_imdb_page_twice() {
    let fetcher = rotten_redirect_fetcher();
    let orchestrator = orchestrator(fetcher.clone());
    let mut adapter = crossrate_sites::factory::create_for(
        SiteName::Imdb,
        crossrate_sites::Document::parse(IMDB_SHAWSHANK),
        IMDB_URL,
        fetcher,
    );
    let locale = DisplayLocale::default();

    let (data, summary) = orchestrator.cross_link(adapter.as_mut(), &locale).await.unwrap();
    assert_eq!(data.page_name(), SiteName::RottenTomatoes);
    assert_eq!(summary.inserted, vec!["mv-audience-score", "mv-tomatometer"]);

    let (_, again) = orchestrator.cross_link(adapter.as_mut(), &locale).await.unwrap();
    assert!(again.is_noop());

    let html = adapter.document().to_html();
    assert_eq!(html.matches("id=\"mv-audience-score\"").count(), 1);
    assert_eq!(html.matches("id=\"mv-tomatometer\"").count(), 1);
}

#[tokio::test]
async fn test_open_rotten_page_and_link_to_imdb() {
    let fetcher = Arc::new(
        MemoryFetcher::new()
            .with_page(ROTTEN_URL, ROTTEN_SHAWSHANK)
            .with_redirect(&search_url(&shawshank(), SiteName::Imdb), IMDB_URL, IMDB_SHAWSHANK)
            .with_page(IMDB_URL, IMDB_SHAWSHANK)
            .with_page("https://www.imdb.com/title/tt0111161/criticreviews", IMDB_CRITIC_REVIEWS)
            .with_page("https://m.media-amazon.com/images/S/imdb-title-main.css", IMDB_CSS),
    );
    let orchestrator = orchestrator(fetcher);

    let mut adapter = orchestrator.open_page(ROTTEN_URL, None).await.unwrap();
    assert_eq!(adapter.site(), SiteName::RottenTomatoes);

    let (data, summary) = orchestrator
        .cross_link(adapter.as_mut(), &DisplayLocale::default())
        .await
        .unwrap();
    assert_eq!(data.url(), IMDB_URL);
    assert_eq!(data.toplist_position(), Some(1));
    assert_eq!(data.critic_ratings().unwrap().custom(), "#66CC33");
    assert_eq!(summary.inserted, vec!["mv-imdb-rating", "mv-metascore"]);
    assert!(adapter.document().contains_id("mv-imdb-scores"));
}

#[tokio::test]
async fn test_open_page_rejects_unknown_site() {
    let fetcher = Arc::new(MemoryFetcher::new().with_page("https://letterboxd.com/film/heat/", "<html></html>"));
    let err = orchestrator(fetcher)
        .open_page("https://letterboxd.com/film/heat/", None)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, SiteError::UnsupportedSite(_)));
}
