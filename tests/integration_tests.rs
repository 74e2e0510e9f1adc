// Integration tests for Fundmatch

use fundmatch::core::{LoadReport, MatchEngine, MatchPolicy, Snapshot};
use fundmatch::models::{
    AmountRange, BusinessIdea, BusinessStage, FindMatchesRequest, IdeaStatus, InvestmentOffer,
    MatchRecord, RiskLevel, Role, StatisticsRequest, UserProfile,
};
use fundmatch::services::{
    AppwriteClient, AppwriteCollections, AppwriteError, FeedError, MatchSink, SnapshotFile,
    SnapshotSource,
};
use fundmatch::MatchError;
use mockito::Matcher;
use serde_json::json;

async fn demo_engine() -> (MatchEngine, LoadReport) {
    let raw = SnapshotFile::new("data/snapshot.json")
        .fetch_snapshot()
        .await
        .unwrap();
    let (snapshot, report) = Snapshot::from_raw(raw);
    (MatchEngine::with_default_policy(snapshot), report)
}

fn profile(user_id: &str, role: Role, risk: Option<RiskLevel>) -> UserProfile {
    UserProfile {
        user_id: user_id.to_string(),
        role,
        industry: None,
        investment_range: None,
        preferred_industries: Vec::new(),
        risk_tolerance: risk,
        created_at: None,
    }
}

fn idea(id: &str, creator_id: &str, goal: f64, category: &str, stage: BusinessStage) -> BusinessIdea {
    BusinessIdea {
        id: id.to_string(),
        creator_id: creator_id.to_string(),
        title: None,
        funding_goal: goal,
        equity_offered: 10.0,
        category: category.to_string(),
        stage,
        status: IdeaStatus::Published,
        created_at: None,
    }
}

fn offer(id: &str, investor_id: &str, min: f64, max: f64) -> InvestmentOffer {
    InvestmentOffer {
        id: id.to_string(),
        investor_id: investor_id.to_string(),
        amount_range: AmountRange { min, max },
        preferred_equity: None,
        preferred_stages: Vec::new(),
        preferred_industries: Vec::new(),
        is_active: true,
        created_at: None,
    }
}

#[tokio::test]
async fn test_demo_snapshot_load_report() {
    let (engine, report) = demo_engine().await;

    assert_eq!(report.profiles_loaded, 5);
    assert_eq!(report.profiles_skipped, 1);
    assert_eq!(report.ideas_loaded, 3);
    assert_eq!(report.ideas_skipped, 1);
    assert_eq!(report.ideas_ineligible, 1);
    assert_eq!(report.offers_loaded, 3);
    assert_eq!(report.offers_ineligible, 1);

    assert!(engine.snapshot().idea("idea-bakery").is_some());
    assert!(engine.snapshot().profile("investor-max").is_some());
    assert!(engine.snapshot().idea("idea-draft").is_none());
    assert!(engine.snapshot().offer("offer-kim-old").is_none());
}

#[tokio::test]
async fn test_creator_matches_ranked() {
    let (engine, _) = demo_engine().await;

    let matches = engine.find_matches("creator-ana", Role::Creator, 20);
    let pairs: Vec<(&str, &str, u8)> = matches
        .iter()
        .map(|m| (m.idea_id.as_str(), m.offer_id.as_str(), m.match_score))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("idea-clinic", "offer-lee-growth", 100),
            ("idea-clinic", "offer-max-any", 100),
            ("idea-solar", "offer-max-any", 100),
            ("idea-solar", "offer-kim-seed", 93),
        ]
    );

    let solar_kim = &matches[3];
    assert_eq!(solar_kim.matching_factors.amount_compatibility, 100);
    assert_eq!(solar_kim.matching_factors.industry_alignment, 100);
    assert_eq!(solar_kim.matching_factors.stage_preference, 100);
    assert_eq!(solar_kim.matching_factors.risk_alignment, 50);
}

#[tokio::test]
async fn test_investor_matches_ranked() {
    let (engine, _) = demo_engine().await;

    let kim: Vec<(String, u8)> = engine
        .find_matches("investor-kim", Role::Investor, 20)
        .into_iter()
        .map(|m| (m.idea_id, m.match_score))
        .collect();
    assert_eq!(
        kim,
        vec![("idea-solar".to_string(), 93), ("idea-bakery".to_string(), 70)]
    );

    let max: Vec<String> = engine
        .find_matches("investor-max", Role::Investor, 20)
        .into_iter()
        .map(|m| m.idea_id)
        .collect();
    assert_eq!(max, vec!["idea-bakery", "idea-clinic", "idea-solar"]);
}

#[tokio::test]
async fn test_ineligible_records_never_surface() {
    let (engine, _) = demo_engine().await;

    let users = [
        ("creator-ana", Role::Creator),
        ("creator-ben", Role::Creator),
        ("investor-kim", Role::Investor),
        ("investor-lee", Role::Investor),
        ("investor-max", Role::Investor),
    ];

    for (user, role) in users {
        for m in engine.find_matches(user, role, 100) {
            assert_ne!(m.idea_id, "idea-draft");
            assert_ne!(m.idea_id, "idea-broken");
            assert_ne!(m.offer_id, "offer-kim-old");
            assert_ne!(m.creator_id, m.investor_id);
            assert!(m.match_score >= engine.min_score());
            assert!(m.match_score <= 100);
        }
    }
}

#[tokio::test]
async fn test_results_sorted_and_deterministic() {
    let (engine, _) = demo_engine().await;

    let first = engine.find_matches("investor-max", Role::Investor, 10);
    let second = engine.find_matches("investor-max", Role::Investor, 10);
    assert_eq!(first, second);

    for window in first.windows(2) {
        assert!(window[0].match_score >= window[1].match_score);
    }
}

#[tokio::test]
async fn test_statistics_cover_full_set() {
    let (engine, _) = demo_engine().await;

    let stats = engine.get_statistics("creator-ana", Role::Creator);
    assert_eq!(stats.count, 4);
    assert_eq!(stats.highest_score, Some(100));
    assert_eq!(stats.average_score, 98.25);
    assert_eq!(stats.distribution.from_80_to_100, 4);

    // Truncating the list does not change the statistics
    assert_eq!(engine.find_matches("creator-ana", Role::Creator, 1).len(), 1);
    assert_eq!(engine.get_statistics("creator-ana", Role::Creator), stats);

    let empty = engine.get_statistics("nobody", Role::Investor);
    assert_eq!(empty.count, 0);
    assert_eq!(empty.average_score, 0.0);
    assert_eq!(empty.highest_score, None);
}

#[tokio::test]
async fn test_request_handling() {
    let (engine, _) = demo_engine().await;

    let req: FindMatchesRequest =
        serde_json::from_value(json!({ "userId": "investor-kim", "role": "Investor", "limit": 1 }))
            .unwrap();
    let response = engine.handle_find(&req).unwrap();
    assert_eq!(response.role, Role::Investor);
    assert_eq!(response.total_results, 1);
    assert_eq!(response.matches[0].idea_id, "idea-solar");

    let bad_role: FindMatchesRequest =
        serde_json::from_value(json!({ "userId": "investor-kim", "role": "broker" })).unwrap();
    assert!(matches!(engine.handle_find(&bad_role), Err(MatchError::InvalidRole(_))));

    let no_user = StatisticsRequest {
        user_id: String::new(),
        role: "creator".to_string(),
    };
    assert!(matches!(
        engine.handle_statistics(&no_user),
        Err(MatchError::InvalidRequest(_))
    ));

    let unknown: FindMatchesRequest =
        serde_json::from_value(json!({ "userId": "ghost", "role": "creator" })).unwrap();
    let response = engine.handle_find(&unknown).unwrap();
    assert!(response.matches.is_empty());
    assert_eq!(response.total_results, 0);
}

#[test]
fn test_permissive_offer_matches_everything_in_budget() {
    let (snapshot, _) = Snapshot::from_records(
        vec![
            profile("c1", Role::Creator, None),
            profile("v1", Role::Investor, None),
        ],
        vec![
            idea("i1", "c1", 40_000.0, "Agriculture", BusinessStage::Concept),
            idea("i2", "c1", 90_000.0, "Retail", BusinessStage::Growth),
        ],
        vec![offer("o1", "v1", 10_000.0, 100_000.0)],
    );
    let engine = MatchEngine::with_default_policy(snapshot);

    let matches = engine.find_matches("v1", Role::Investor, 10);
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m.match_score == 100));
}

#[test]
fn test_custom_policy_threshold() {
    let (snapshot, _) = Snapshot::from_records(
        vec![profile("v1", Role::Investor, Some(RiskLevel::Low))],
        vec![
            idea("growth", "c1", 50_000.0, "Tech", BusinessStage::Growth),
            idea("concept", "c2", 50_000.0, "Tech", BusinessStage::Concept),
        ],
        vec![offer("o1", "v1", 10_000.0, 100_000.0)],
    );
    let policy = MatchPolicy {
        min_score: 90,
        ..MatchPolicy::default()
    };
    let engine = MatchEngine::new(snapshot, policy).unwrap();

    let matches = engine.find_matches("v1", Role::Investor, 10);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].idea_id, "growth");
}

fn collections() -> AppwriteCollections {
    AppwriteCollections {
        user_profiles: "user_profiles".to_string(),
        business_ideas: "business_ideas".to_string(),
        investment_offers: "investment_offers".to_string(),
        matches: "matches".to_string(),
    }
}

fn client_for(server: &mockito::ServerGuard) -> AppwriteClient {
    AppwriteClient::new(
        server.url(),
        "test_key".to_string(),
        "test_project".to_string(),
        "db".to_string(),
        collections(),
        100,
    )
    .unwrap()
}

#[tokio::test]
async fn test_appwrite_fetch_snapshot() {
    let mut server = mockito::Server::new_async().await;

    let profiles = server
        .mock("GET", "/databases/db/collections/user_profiles/documents")
        .match_query(Matcher::Any)
        .match_header("x-appwrite-key", "test_key")
        .match_header("x-appwrite-project", "test_project")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "total": 2,
                "documents": [
                    { "$id": "c1", "role": "creator" },
                    { "$id": "v1", "role": "investor", "riskTolerance": "high" }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let ideas = server
        .mock("GET", "/databases/db/collections/business_ideas/documents")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "total": 1,
                "documents": [{
                    "$id": "i1", "creatorId": "c1", "fundingGoal": 50000, "equityOffered": 20,
                    "category": "Tech", "stage": "mvp", "status": "published",
                    "$createdAt": "2026-01-01T00:00:00.000+00:00"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let offers = server
        .mock("GET", "/databases/db/collections/investment_offers/documents")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "total": 1,
                "documents": [{
                    "$id": "o1", "investorId": "v1", "amountRange": { "min": 20000, "max": 100000 },
                    "preferredIndustries": ["Tech"], "preferredStages": ["mvp"], "isActive": true
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let raw = client.fetch_snapshot().await.unwrap();

    profiles.assert_async().await;
    ideas.assert_async().await;
    offers.assert_async().await;

    let (snapshot, report) = Snapshot::from_raw(raw);
    assert_eq!(report.total_skipped(), 0);

    let engine = MatchEngine::with_default_policy(snapshot);
    let matches = engine.find_matches("c1", Role::Creator, 5);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].offer_id, "o1");
    assert_eq!(matches[0].match_score, 100);
}

#[tokio::test]
async fn test_appwrite_pages_until_total_when_server_caps_limit() {
    let mut server = mockito::Server::new_async().await;
    let path = "/databases/db/collections/user_profiles/documents";

    // The server hands back two documents per page even though we ask for 100
    let first_page = server
        .mock("GET", path)
        .match_query(Matcher::UrlEncoded("queries[]".into(), "offset(0)".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "total": 3,
                "documents": [
                    { "$id": "c1", "role": "creator" },
                    { "$id": "c2", "role": "creator" }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let second_page = server
        .mock("GET", path)
        .match_query(Matcher::UrlEncoded("queries[]".into(), "offset(2)".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "total": 3,
                "documents": [{ "$id": "v1", "role": "investor" }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let documents = client.list_documents("user_profiles", &[]).await.unwrap();

    first_page.assert_async().await;
    second_page.assert_async().await;

    let ids: Vec<&str> = documents
        .iter()
        .filter_map(|doc| doc["$id"].as_str())
        .collect();
    assert_eq!(ids, vec!["c1", "c2", "v1"]);
}

#[tokio::test]
async fn test_appwrite_unauthorized() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", Matcher::Any)
        .match_query(Matcher::Any)
        .with_status(401)
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client.fetch_snapshot().await;

    assert!(matches!(
        result,
        Err(FeedError::Appwrite(AppwriteError::Unauthorized))
    ));
}

#[tokio::test]
async fn test_appwrite_publish_match() {
    let mut server = mockito::Server::new_async().await;

    let (snapshot, _) = Snapshot::from_records(
        vec![profile("v1", Role::Investor, None)],
        vec![idea("i1", "c1", 50_000.0, "Tech", BusinessStage::Early)],
        vec![offer("o1", "v1", 10_000.0, 100_000.0)],
    );
    let engine = MatchEngine::with_default_policy(snapshot);
    let result = engine.find_matches("v1", Role::Investor, 1).remove(0);
    let record = MatchRecord::pending(&result, chrono::Utc::now());

    let mock = server
        .mock("POST", "/databases/db/collections/matches/documents")
        .match_header("x-appwrite-key", "test_key")
        .match_body(Matcher::PartialJson(json!({
            "data": {
                "ideaId": "i1",
                "offerId": "o1",
                "matchScore": 100,
                "status": "pending"
            }
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"$id": "ignored"}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let id = client.publish(&record).await.unwrap();

    mock.assert_async().await;
    assert!(uuid::Uuid::parse_str(&id).is_ok());
}
