// Criterion benchmarks for Fundmatch

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fundmatch::core::{MatchEngine, Scorer, Snapshot};
use fundmatch::models::{
    AmountRange, BusinessIdea, BusinessStage, IdeaStatus, InvestmentOffer, RiskLevel, Role,
    UserProfile,
};

const CATEGORIES: [&str; 5] = ["Tech", "Health", "Food", "CleanTech", "Retail"];
const STAGES: [BusinessStage; 4] = [
    BusinessStage::Concept,
    BusinessStage::Mvp,
    BusinessStage::Early,
    BusinessStage::Growth,
];

fn create_idea(id: usize) -> BusinessIdea {
    BusinessIdea {
        id: format!("idea-{}", id),
        creator_id: format!("creator-{}", id % 25),
        title: None,
        funding_goal: 10_000.0 + (id % 40) as f64 * 5_000.0,
        equity_offered: 5.0 + (id % 20) as f64,
        category: CATEGORIES[id % CATEGORIES.len()].to_string(),
        stage: STAGES[id % STAGES.len()],
        status: IdeaStatus::Published,
        created_at: None,
    }
}

fn create_offer(id: usize) -> InvestmentOffer {
    let min = 5_000.0 + (id % 10) as f64 * 10_000.0;
    InvestmentOffer {
        id: format!("offer-{}", id),
        investor_id: format!("investor-{}", id % 25),
        amount_range: AmountRange { min, max: min * 4.0 },
        preferred_equity: None,
        preferred_stages: vec![STAGES[id % STAGES.len()], STAGES[(id + 1) % STAGES.len()]],
        preferred_industries: vec![
            CATEGORIES[id % CATEGORIES.len()].to_string(),
            CATEGORIES[(id + 2) % CATEGORIES.len()].to_string(),
        ],
        is_active: true,
        created_at: None,
    }
}

fn create_engine(size: usize) -> MatchEngine {
    let profiles = (0..25)
        .flat_map(|i| {
            [
                UserProfile {
                    user_id: format!("creator-{}", i),
                    role: Role::Creator,
                    industry: None,
                    investment_range: None,
                    preferred_industries: vec![],
                    risk_tolerance: None,
                    created_at: None,
                },
                UserProfile {
                    user_id: format!("investor-{}", i),
                    role: Role::Investor,
                    industry: None,
                    investment_range: None,
                    preferred_industries: vec![],
                    risk_tolerance: Some(RiskLevel::Medium),
                    created_at: None,
                },
            ]
        })
        .collect();

    let ideas = (0..size).map(create_idea).collect();
    let offers = (0..size).map(create_offer).collect();

    let (snapshot, _) = Snapshot::from_records(profiles, ideas, offers);
    MatchEngine::with_default_policy(snapshot)
}

fn bench_score_pair(c: &mut Criterion) {
    let scorer = Scorer::default();
    let idea = create_idea(7);
    let offer = create_offer(3);

    c.bench_function("score_pair", |b| {
        b.iter(|| {
            scorer.score(
                black_box(&idea),
                black_box(&offer),
                black_box(Some(RiskLevel::Medium)),
            )
        });
    });
}

fn bench_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");

    for size in [10, 50, 100, 500, 1000].iter() {
        let engine = create_engine(*size);

        group.bench_with_input(BenchmarkId::new("creator", size), size, |b, _| {
            b.iter(|| engine.find_matches(black_box("creator-1"), Role::Creator, black_box(20)));
        });

        group.bench_with_input(BenchmarkId::new("investor", size), size, |b, _| {
            b.iter(|| engine.find_matches(black_box("investor-1"), Role::Investor, black_box(20)));
        });
    }

    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let engine = create_engine(500);

    c.bench_function("statistics_500_records", |b| {
        b.iter(|| engine.get_statistics(black_box("investor-1"), Role::Investor));
    });
}

criterion_group!(benches, bench_score_pair, bench_matching, bench_statistics);

criterion_main!(benches);
