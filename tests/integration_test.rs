//! Integration tests for the landing_audit library.
//!
//! These tests exercise resolution, classification, the inventory sources and the full
//! audit run against `httptest` mock servers. They do not make real network requests.
//!
//! Tests that need the public network are marked `#[ignore]`.
//! To run them locally: `cargo test -- --ignored`

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use httptest::{all_of, cycle, matchers::*, responders::*, Expectation, Server};
    use serde_json::json;
    use tempfile::TempDir;

    use landing_audit::classify::{classify, Classification, PartnerPattern, StubRegistry};
    use landing_audit::config::ResolverConfig;
    use landing_audit::fetch::{resolve_with_recheck, HttpResolver, ProcessingContext, ResolveOnce};
    use landing_audit::initialization::{init_api_client, init_client};
    use landing_audit::inventory::{
        Campaign, CandidateLink, DirectApiSource, FileSource, InventorySource,
    };
    use landing_audit::report::IssueAggregator;
    use landing_audit::{audit_campaigns, run_audit, Config, InventoryError, ProcessingStats};

    fn resolver() -> HttpResolver {
        let client = init_client(&Config::default()).expect("client");
        HttpResolver::new(client, Arc::new(ProcessingStats::new()))
    }

    fn quick_config(recheck_attempts: u32) -> ResolverConfig {
        ResolverConfig::new(
            Duration::from_secs(1),
            Duration::from_millis(10),
            recheck_attempts,
            &[],
        )
    }

    /// Registry treating `/stub` on the mock server as a partner placeholder.
    fn local_stubs() -> StubRegistry {
        StubRegistry::new(Vec::<&str>::new(), [PartnerPattern::new("127.0.0.1", "/stub")])
    }

    fn ipv4_server() -> Server {
        httptest::ServerBuilder::new()
            .bind_addr(([127, 0, 0, 1], 0).into())
            .run()
            .unwrap()
    }

    fn html(body: &str) -> impl httptest::responders::Responder {
        status_code(200)
            .insert_header("Content-Type", "text/html; charset=utf-8")
            .body(body.to_string())
    }

    #[tokio::test]
    async fn test_pdf_body_is_not_scanned() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/brochure.pdf")).respond_with(
                status_code(200)
                    .insert_header("Content-Type", "application/pdf")
                    .body("%PDF-1.4 location.href = 'https://elsewhere.example/'"),
            ),
        );

        let url = server.url_str("/brochure.pdf");
        let attempt = resolver().resolve_once(&url, Duration::from_secs(5)).await;
        assert_eq!(attempt.status_code(), Some(200));
        assert_eq!(attempt.final_url(), Some(url.as_str()));
        assert!(!attempt.is_client_redirect());
        assert_eq!(
            classify(&attempt, StubRegistry::builtin()),
            Classification::Ok
        );
    }

    #[tokio::test]
    async fn test_not_found() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/gone"))
                .respond_with(status_code(404).insert_header("Content-Type", "text/html")),
        );

        let attempt = resolver()
            .resolve_once(&server.url_str("/gone"), Duration::from_secs(5))
            .await;
        let classification = classify(&attempt, StubRegistry::builtin());
        assert_eq!(classification, Classification::NotFound);
        assert_eq!(classification.description().as_deref(), Some("page not found"));
    }

    #[tokio::test]
    async fn test_meta_refresh_target_is_not_fetched() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/x")).respond_with(html(
                r#"<html><head><meta http-equiv="refresh" content="3; url=/offer/123"></head></html>"#,
            )),
        );
        // No expectation for /offer/123: a request to it would fail the test

        let attempt = resolver()
            .resolve_once(&server.url_str("/x"), Duration::from_secs(5))
            .await;
        assert_eq!(attempt.status_code(), Some(200));
        assert_eq!(attempt.final_url(), Some(server.url_str("/offer/123").as_str()));
        assert!(attempt.is_client_redirect());
        assert_eq!(
            classify(&attempt, StubRegistry::builtin()),
            Classification::Ok
        );
    }

    #[tokio::test]
    async fn test_sends_browser_headers() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/"),
                request::headers(contains(key("user-agent"))),
                request::headers(contains(key("accept-language"))),
            ])
            .respond_with(status_code(200)),
        );

        let attempt = resolver()
            .resolve_once(&server.url_str("/"), Duration::from_secs(5))
            .await;
        assert_eq!(attempt.status_code(), Some(200));
    }

    #[tokio::test]
    async fn test_http_redirect_to_stub() {
        let server = ipv4_server();
        let stub_url = server.url_str("/stub/closed");
        server.expect(
            Expectation::matching(request::method_path("GET", "/ad"))
                .respond_with(status_code(302).insert_header("Location", stub_url.as_str())),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/stub/closed"))
                .respond_with(html("<html><body>Offer closed</body></html>")),
        );

        let stats = ProcessingStats::new();
        let outcome = resolve_with_recheck(
            &resolver(),
            &server.url_str("/ad"),
            &quick_config(0),
            &local_stubs(),
            &stats,
        )
        .await;
        assert_eq!(outcome.status_code(), Some(200));
        assert_eq!(outcome.final_url(), Some(stub_url.as_str()));
        assert!(outcome.is_stub);
        assert_eq!(classify(&outcome.attempt, &local_stubs()), Classification::Stub);
    }

    #[tokio::test]
    async fn test_script_redirect_to_stub() {
        let server = ipv4_server();
        server.expect(
            Expectation::matching(request::method_path("GET", "/landing")).respond_with(html(
                r#"<html><script>window.location = "/stub/7";</script></html>"#,
            )),
        );

        let attempt = resolver()
            .resolve_once(&server.url_str("/landing"), Duration::from_secs(5))
            .await;
        assert_eq!(attempt.status_code(), Some(200));
        assert_eq!(attempt.final_url(), Some(server.url_str("/stub/7").as_str()));
        assert_eq!(classify(&attempt, &local_stubs()), Classification::Stub);
    }

    #[tokio::test]
    async fn test_client_redirect_ignored_on_error_status() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/broken")).respond_with(
                status_code(500)
                    .insert_header("Content-Type", "text/html")
                    .body(r#"<script>location.replace("/stub/1")</script>"#),
            ),
        );

        let url = server.url_str("/broken");
        let attempt = resolver().resolve_once(&url, Duration::from_secs(5)).await;
        assert_eq!(attempt.final_url(), Some(url.as_str()));
        assert_eq!(
            classify(&attempt, &local_stubs()),
            Classification::OtherHttpError(500)
        );
    }

    #[tokio::test]
    async fn test_redirect_loop_is_transport_error() {
        let server = Server::run();
        let loop_url = server.url_str("/loop");
        server.expect(
            Expectation::matching(request::method_path("GET", "/loop"))
                .times(1..)
                .respond_with(status_code(302).insert_header("Location", loop_url.as_str())),
        );

        let attempt = resolver().resolve_once(&loop_url, Duration::from_secs(5)).await;
        assert_eq!(attempt.status_code(), None);
        let message = attempt.transport_error().unwrap_or_default();
        assert!(message.starts_with("Redirect error"), "{message}");
    }

    #[tokio::test]
    async fn test_timeout_then_success_on_recheck() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/slow"))
                .times(2)
                .respond_with(cycle![
                    delay_and_then(Duration::from_secs(3), status_code(200)),
                    html("<html>ok</html>"),
                ]),
        );

        let stats = ProcessingStats::new();
        let url = server.url_str("/slow");
        let outcome = resolve_with_recheck(
            &resolver(),
            &url,
            &quick_config(1),
            StubRegistry::builtin(),
            &stats,
        )
        .await;
        assert_eq!(outcome.attempt_count, 2);
        assert_eq!(outcome.status_code(), Some(200));
        assert_eq!(outcome.transport_error(), None);
        assert_eq!(
            classify(&outcome.attempt, StubRegistry::builtin()),
            Classification::Ok
        );
    }

    #[tokio::test]
    async fn test_timeout_without_recheck() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/slow"))
                .respond_with(delay_and_then(Duration::from_secs(3), status_code(200))),
        );

        let attempt = resolver()
            .resolve_once(&server.url_str("/slow"), Duration::from_millis(500))
            .await;
        assert_eq!(attempt.status_code(), None);
        let message = attempt.transport_error().unwrap_or_default();
        assert!(message.starts_with("Timeout"), "{message}");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Port 1 is reserved and closed on test machines
        let attempt = resolver()
            .resolve_once("http://127.0.0.1:1/", Duration::from_secs(5))
            .await;
        assert_eq!(attempt.status_code(), None);
        assert!(matches!(
            classify(&attempt, StubRegistry::builtin()),
            Classification::TransportError(ref m) if !m.is_empty()
        ));
    }

    #[tokio::test]
    #[ignore]
    async fn test_unresolvable_host() {
        let attempt = resolver()
            .resolve_once("https://nonexistent.invalid/", Duration::from_secs(10))
            .await;
        assert_eq!(attempt.status_code(), None);
        assert!(attempt.transport_error().is_some());
    }

    fn direct_source(server: &Server) -> DirectApiSource {
        DirectApiSource::new(
            init_api_client().expect("api client"),
            server.url_str("/json/v5"),
            "token-123",
            "shop",
            "en",
        )
    }

    #[tokio::test]
    async fn test_direct_api_campaigns() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/json/v5/campaigns"),
                request::headers(contains(("authorization", "Bearer token-123"))),
                request::headers(contains(("client-login", "shop"))),
                request::headers(contains(("accept-language", "en"))),
                request::body(json_decoded(eq(json!({
                    "method": "get",
                    "params": {
                        "SelectionCriteria": { "States": ["ON"], "Statuses": ["ACCEPTED"] },
                        "FieldNames": ["Id", "Name", "State", "Status"]
                    }
                })))),
            ])
            .respond_with(json_encoded(json!({
                "result": {
                    "Campaigns": [
                        { "Id": 101, "Name": "Brand", "State": "ON", "Status": "ACCEPTED" },
                        { "Id": 102, "Name": "Retargeting", "State": "ON", "Status": "ACCEPTED" }
                    ]
                }
            }))),
        );

        let campaigns = direct_source(&server).campaigns().await.expect("campaigns");
        assert_eq!(
            campaigns,
            vec![
                Campaign { id: 101, name: "Brand".to_string() },
                Campaign { id: 102, name: "Retargeting".to_string() },
            ]
        );
    }

    fn ads_request(offset: u64) -> serde_json::Value {
        json!({
            "method": "get",
            "params": {
                "SelectionCriteria": { "CampaignIds": [101] },
                "FieldNames": ["Id", "CampaignId", "State", "Status"],
                "TextAdFieldNames": ["Href", "DisplayUrlPath"],
                "TextAdBuilderAdFieldNames": ["Href"],
                "Page": { "Limit": 10000, "Offset": offset }
            }
        })
    }

    #[tokio::test]
    async fn test_direct_api_ads_pagination() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/json/v5/ads"),
                request::body(json_decoded(eq(ads_request(0)))),
            ])
            .respond_with(json_encoded(json!({
                "result": {
                    "Ads": [
                        { "Id": 1, "CampaignId": 101, "TextAd": { "Href": "https://a.example/1", "DisplayUrlPath": "sale" } },
                        { "Id": 2, "CampaignId": 101, "TextAd": { "Href": null } }
                    ],
                    "LimitedBy": 2
                }
            }))),
        );
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/json/v5/ads"),
                request::body(json_decoded(eq(ads_request(2)))),
            ])
            .respond_with(json_encoded(json!({
                "result": {
                    "Ads": [
                        { "Id": 3, "CampaignId": 101, "TextAdBuilderAd": { "Href": "https://b.example/3" } }
                    ]
                }
            }))),
        );

        let campaign = Campaign {
            id: 101,
            name: "Brand".to_string(),
        };
        let links = direct_source(&server).links(&campaign).await.expect("links");
        assert_eq!(
            links,
            vec![
                CandidateLink {
                    entity_id: 101,
                    entity_name: "Brand".to_string(),
                    sub_entity_id: 1,
                    raw_url: "https://a.example/1".to_string(),
                },
                CandidateLink {
                    entity_id: 101,
                    entity_name: "Brand".to_string(),
                    sub_entity_id: 3,
                    raw_url: "https://b.example/3".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_direct_api_error_payload() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/json/v5/campaigns"))
                .respond_with(json_encoded(json!({
                    "error": {
                        "request_id": "8695244274068608439",
                        "error_code": 53,
                        "error_string": "Authorization error",
                        "error_detail": "Invalid OAuth token"
                    }
                }))),
        );

        let err = direct_source(&server).campaigns().await.unwrap_err();
        assert!(matches!(
            err,
            InventoryError::Api { code: 53, ref detail } if detail == "Invalid OAuth token"
        ));
        assert_eq!(err.to_string(), "API error 53: Invalid OAuth token");
    }

    #[tokio::test]
    async fn test_direct_api_client_error_status_not_retried() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/json/v5/campaigns"))
                .times(1)
                .respond_with(status_code(400)),
        );

        let err = direct_source(&server).campaigns().await.unwrap_err();
        assert!(matches!(err, InventoryError::HttpStatus { status: 400 }));
    }

    fn write_inventory(dir: &TempDir, lines: &[serde_json::Value]) -> std::path::PathBuf {
        let path = dir.path().join("links.jsonl");
        let content: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        std::fs::write(&path, content.join("\n")).expect("write inventory");
        path
    }

    #[tokio::test]
    async fn test_run_audit_end_to_end() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/ok"))
                .respond_with(html("<html><body>Welcome</body></html>")),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/missing"))
                .respond_with(status_code(404)),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/error"))
                .respond_with(status_code(503)),
        );

        let dir = TempDir::new().expect("tempdir");
        let input = write_inventory(
            &dir,
            &[
                json!({"campaign_id": 1, "campaign_name": "Brand", "ad_id": 10, "url": server.url_str("/ok")}),
                json!({"campaign_id": 1, "campaign_name": "Brand", "ad_id": 11, "url": server.url_str("/missing")}),
                json!({"campaign_id": 2, "campaign_name": "Sale", "ad_id": 20, "url": server.url_str("/error")}),
                json!({"campaign_id": 3, "campaign_name": "Excluded", "ad_id": 30, "url": server.url_str("/never")}),
            ],
        );
        let output = dir.path().join("results.txt");
        let json_output = dir.path().join("results.json");

        let config = Config {
            input: Some(input.clone()),
            output_file: output.clone(),
            json_output: Some(json_output.clone()),
            exclude_campaigns: vec![3],
            max_concurrency: 2,
            ..Default::default()
        };
        let source = FileSource::load(&input).await.expect("load inventory");
        let audit = run_audit(&config, &source).await.expect("audit");

        assert_eq!(audit.metadata.campaigns_total, 2);
        assert_eq!(audit.metadata.skipped_campaigns, 1);
        assert_eq!(audit.metadata.skipped_links, Some(1));
        assert_eq!(audit.metadata.links_checked, 3);
        assert_eq!(audit.report.total_issues(), 2);
        assert!(audit.output_written);

        let text = std::fs::read_to_string(&output).expect("report file");
        assert_eq!(text, audit.text);
        assert!(text.contains("Campaign: Brand (ID 1)"));
        assert!(text.contains("Campaign: Sale (ID 2)"));
        assert!(!text.contains("Excluded"));
        assert!(text.contains("Campaigns: 2 checked, 1 skipped (1 links). Links checked: 3."));
        assert!(text.contains("-> HTTP 404 (page not found)"));
        assert!(text.contains("-> HTTP 503 (service unavailable)"));
        assert!(text.contains("Found 2 problem link(s)."));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_output).expect("json report"))
                .expect("valid json");
        assert_eq!(json["total_issues"], 2);
        assert_eq!(json["metadata"]["skipped_links"], 1);
    }

    #[tokio::test]
    async fn test_run_audit_unwritable_output_is_not_fatal() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/ok")).respond_with(status_code(200)),
        );

        let dir = TempDir::new().expect("tempdir");
        let input = write_inventory(
            &dir,
            &[json!({"campaign_id": 1, "campaign_name": "Brand", "ad_id": 10, "url": server.url_str("/ok")})],
        );
        let config = Config {
            input: Some(input.clone()),
            output_file: dir.path().join("missing-dir").join("results.txt"),
            ..Default::default()
        };
        let source = FileSource::load(&input).await.expect("load inventory");
        let audit = run_audit(&config, &source).await.expect("audit");

        assert!(!audit.output_written);
        assert!(audit.report.is_healthy());
        assert!(audit.text.contains("All links are healthy."));
    }

    /// Lists two campaigns; listing the links of the second fails.
    struct FlakySource {
        url: String,
    }

    #[async_trait]
    impl InventorySource for FlakySource {
        async fn campaigns(&self) -> Result<Vec<Campaign>, InventoryError> {
            Ok(vec![
                Campaign { id: 1, name: "Good".to_string() },
                Campaign { id: 2, name: "Broken".to_string() },
            ])
        }

        async fn links(&self, campaign: &Campaign) -> Result<Vec<CandidateLink>, InventoryError> {
            if campaign.id == 2 {
                return Err(InventoryError::Api {
                    code: 8800,
                    detail: "Object not found".to_string(),
                });
            }
            Ok(vec![CandidateLink {
                entity_id: campaign.id,
                entity_name: campaign.name.clone(),
                sub_entity_id: 10,
                raw_url: self.url.clone(),
            }])
        }
    }

    #[tokio::test]
    async fn test_listing_failure_is_entity_level_issue() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/ok")).respond_with(status_code(200)),
        );

        let stats = Arc::new(ProcessingStats::new());
        let resolver: Arc<dyn ResolveOnce> = Arc::new(HttpResolver::new(
            init_client(&Config::default()).expect("client"),
            Arc::clone(&stats),
        ));
        let ctx = Arc::new(ProcessingContext::new(resolver, quick_config(0), stats));
        let aggregator = IssueAggregator::new();
        let source = FlakySource {
            url: server.url_str("/ok"),
        };

        let metadata = audit_campaigns(&Config::default(), &source, ctx, &aggregator).await;
        let report = aggregator.finalize();

        assert_eq!(metadata.links_checked, 1);
        assert_eq!(report.total_issues(), 0);
        assert_eq!(report.listing_failures(), 1);
        assert_eq!(report.campaigns.len(), 2);
        assert_eq!(
            report.campaigns[1].listing_error.as_deref(),
            Some("API error 8800: Object not found")
        );
    }

    /// Campaign listing fails outright.
    struct DeadSource;

    #[async_trait]
    impl InventorySource for DeadSource {
        async fn campaigns(&self) -> Result<Vec<Campaign>, InventoryError> {
            Err(InventoryError::HttpStatus { status: 401 })
        }

        async fn links(&self, _campaign: &Campaign) -> Result<Vec<CandidateLink>, InventoryError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_campaign_listing_failure_still_reports() {
        let dir = TempDir::new().expect("tempdir");
        let config = Config {
            output_file: dir.path().join("results.txt"),
            ..Default::default()
        };
        let audit = run_audit(&config, &DeadSource).await.expect("audit");

        assert_eq!(
            audit.metadata.source_error.as_deref(),
            Some("Inventory API returned HTTP 401")
        );
        assert_eq!(audit.metadata.campaigns_total, 0);
        assert!(audit.output_written);
        assert!(audit.text.contains("Failed to list campaigns: Inventory API returned HTTP 401"));
    }
}
