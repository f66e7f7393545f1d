use project_muse::github::{GITHUB_ACCEPT, GitHubError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use test_utils::{TEST_TOKEN, github_client, profile_json, repo_json, starred_json};

#[tokio::test]
async fn test_profile_sends_required_headers_and_keeps_documented_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .and(header("accept", GITHUB_ACCEPT))
        .and(header("user-agent", "Project-Muse-Agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .expect(1)
        .mount(&server)
        .await;

    let profile = github_client(&server)
        .fetch_user_profile("octocat")
        .await
        .expect("profile should load");

    assert_eq!(profile.login, "octocat");
    assert_eq!(profile.id, 583_231);
    assert_eq!(profile.name.as_deref(), Some("The Octocat"));
    assert_eq!(profile.bio, None);
    assert_eq!(profile.followers, 4000);

    let projected = serde_json::to_value(&profile).expect("profile serializes");
    let keys: Vec<&str> = projected
        .as_object()
        .expect("profile is an object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys.len(), 14);
    assert!(!keys.contains(&"node_id"));
    assert!(!keys.contains(&"site_admin"));
}

#[tokio::test]
async fn test_profile_with_missing_field_is_rejected() {
    let server = MockServer::start().await;
    let mut body = profile_json();
    body.as_object_mut()
        .expect("profile is an object")
        .remove("login");
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = github_client(&server)
        .fetch_user_profile("octocat")
        .await
        .expect_err("missing login must fail");
    assert!(matches!(err, GitHubError::Decode { .. }));
}

#[tokio::test]
async fn test_not_found_reports_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ghost-user-404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let err = github_client(&server)
        .fetch_user_profile("ghost-user-404")
        .await
        .expect_err("404 must fail");
    assert_eq!(
        err.to_string(),
        "Failed to fetch GitHub user profile: Not Found"
    );
}

#[tokio::test]
async fn test_repos_query_and_projection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .and(query_param("sort", "pushed"))
        .and(query_param("per_page", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            repo_json("hello-world", Some("Rust")),
            repo_json("notes", None),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let repos = github_client(&server)
        .fetch_repos("octocat")
        .await
        .expect("repos should load");

    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].name, "hello-world");
    assert_eq!(repos[0].language.as_deref(), Some("Rust"));
    assert_eq!(repos[0].forks, 3);
    assert_eq!(repos[1].language, None);
}

#[tokio::test]
async fn test_repos_rejects_non_array_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "not-a-list"})))
        .mount(&server)
        .await;

    let err = github_client(&server)
        .fetch_repos("octocat")
        .await
        .expect_err("object body must fail");
    assert!(matches!(err, GitHubError::Decode { .. }));
}

#[tokio::test]
async fn test_language_stats_counts_only_tagged_repos() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .and(query_param("per_page", "100"))
        .and(query_param("type", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            repo_json("a", Some("TypeScript")),
            repo_json("b", Some("Rust")),
            repo_json("c", None),
            repo_json("d", Some("TypeScript")),
        ])))
        .mount(&server)
        .await;

    let stats = github_client(&server)
        .fetch_language_stats("octocat")
        .await
        .expect("stats should load");

    assert_eq!(stats.total_repos, 3);
    assert_eq!(stats.languages.get("TypeScript"), Some(&2));
    assert_eq!(stats.top_languages[0].name, "TypeScript");
    assert_eq!(stats.top_languages[0].percentage, 67);
    assert_eq!(stats.top_languages[1].name, "Rust");
    assert_eq!(stats.top_languages[1].percentage, 33);

    let wire = serde_json::to_value(&stats).expect("stats serialize");
    assert_eq!(wire["totalRepos"], 3);
    assert!(wire["topLanguages"].is_array());
}

#[tokio::test]
async fn test_starred_summary_uses_recent_ten_for_languages() {
    let server = MockServer::start().await;
    let mut starred: Vec<_> = (0..10)
        .map(|i| starred_json(&format!("go-{i}"), Some("Go")))
        .collect();
    starred.extend((0..5).map(|i| starred_json(&format!("zig-{i}"), Some("Zig"))));

    Mock::given(method("GET"))
        .and(path("/users/octocat/starred"))
        .and(query_param("per_page", "20"))
        .and(query_param("sort", "created"))
        .respond_with(ResponseTemplate::new(200).set_body_json(starred))
        .mount(&server)
        .await;

    let summary = github_client(&server)
        .fetch_starred_repos("octocat")
        .await
        .expect("starred should load");

    assert_eq!(summary.total_starred, 15);
    assert_eq!(summary.recent_stars.len(), 10);
    assert_eq!(summary.top_starred_languages, vec!["Go".to_string()]);
    assert_eq!(
        summary.recent_stars[0].description.as_deref(),
        Some("go-0 description")
    );
}

#[tokio::test]
async fn test_invalid_username_never_reaches_github() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .expect(0)
        .mount(&server)
        .await;

    let client = github_client(&server);
    for username in ["", "octo cat", "octo/cat", "../octocat", &"a".repeat(40)] {
        let err = client
            .fetch_user_profile(username)
            .await
            .expect_err("invalid username must fail");
        assert!(err.is_invalid_argument(), "{username:?} should be rejected");
    }
}

#[tokio::test]
async fn test_legacy_hyphenated_login_reaches_github() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/old--login-"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = github_client(&server);
    client
        .fetch_user_profile("old--login-")
        .await
        .expect("hyphen placement is GitHub's call");
}
