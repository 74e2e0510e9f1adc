use crate::error::MatchError;
use crate::models::{
    AmountRange, BusinessIdea, InvestmentOffer, MatchingFactors, RiskCredit, RiskLevel,
    ScoringWeights,
};

const FULL_SCORE: u8 = 100;

/// Weights are applied in basis points so the overall score is exact integer math
const WEIGHT_SCALE: u32 = 10_000;

/// Allowed drift of the weight sum away from 1.0
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Default width of the amount falloff window, as a fraction of the violated bound
pub const DEFAULT_AMOUNT_FALLOFF: f64 = 0.5;

/// Sub-scores and combined score for one (idea, offer) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compatibility {
    pub factors: MatchingFactors,
    pub overall: u8,
}

/// Compatibility scorer
///
/// Scoring formula:
/// overall = round(
///     amount_compatibility * 0.35 +   # fundingGoal vs offer amount range
///     industry_alignment   * 0.30 +   # category in preferred industries
///     stage_preference     * 0.20 +   # stage in preferred stages
///     risk_alignment       * 0.15     # stage risk vs investor tolerance
/// )
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    weights: ScoringWeights,
    basis_points: [u32; 4],
    risk_credit: RiskCredit,
    amount_falloff: f64,
}

impl Scorer {
    pub fn new(
        weights: ScoringWeights,
        risk_credit: RiskCredit,
        amount_falloff: f64,
    ) -> Result<Self, MatchError> {
        let basis_points = weight_basis_points(&weights)?;

        if !amount_falloff.is_finite() || amount_falloff <= 0.0 {
            return Err(MatchError::InvalidWeights(format!(
                "amount falloff must be positive, got {}",
                amount_falloff
            )));
        }

        for credit in [risk_credit.exact, risk_credit.adjacent, risk_credit.opposite] {
            if credit > FULL_SCORE {
                return Err(MatchError::InvalidWeights(format!(
                    "risk credit {} exceeds {}",
                    credit, FULL_SCORE
                )));
            }
        }

        Ok(Self {
            weights,
            basis_points,
            risk_credit,
            amount_falloff,
        })
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    /// Score one pair. `risk_tolerance` is the offer owner's tolerance, if recorded.
    pub fn score(
        &self,
        idea: &BusinessIdea,
        offer: &InvestmentOffer,
        risk_tolerance: Option<RiskLevel>,
    ) -> Compatibility {
        let factors = MatchingFactors {
            amount_compatibility: calculate_amount_score(
                idea.funding_goal,
                &offer.amount_range,
                self.amount_falloff,
            ),
            industry_alignment: calculate_industry_score(&idea.category, &offer.preferred_industries),
            stage_preference: if offer.preferred_stages.is_empty()
                || offer.preferred_stages.contains(&idea.stage)
            {
                FULL_SCORE
            } else {
                0
            },
            risk_alignment: calculate_risk_score(
                idea.stage.implied_risk(),
                risk_tolerance,
                &self.risk_credit,
            ),
        };

        Compatibility {
            factors,
            overall: self.combine(&factors),
        }
    }

    /// Weighted average of the four factors, rounded half up
    pub fn combine(&self, factors: &MatchingFactors) -> u8 {
        let [amount, industry, stage, risk] = self.basis_points;
        let weighted = amount * u32::from(factors.amount_compatibility)
            + industry * u32::from(factors.industry_alignment)
            + stage * u32::from(factors.stage_preference)
            + risk * u32::from(factors.risk_alignment);

        let overall = (weighted + WEIGHT_SCALE / 2) / WEIGHT_SCALE;
        overall.min(u32::from(FULL_SCORE)) as u8
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            basis_points: [3_500, 3_000, 2_000, 1_500],
            risk_credit: RiskCredit::default(),
            amount_falloff: DEFAULT_AMOUNT_FALLOFF,
        }
    }
}

/// Convert weights to basis points summing to exactly `WEIGHT_SCALE`
fn weight_basis_points(weights: &ScoringWeights) -> Result<[u32; 4], MatchError> {
    let raw = [weights.amount, weights.industry, weights.stage, weights.risk];

    if raw.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(MatchError::InvalidWeights(format!(
            "weights must be finite and non-negative: {:?}",
            weights
        )));
    }

    let sum: f64 = raw.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(MatchError::InvalidWeights(format!(
            "weights must sum to 1.0, got {}",
            sum
        )));
    }

    let mut points = raw.map(|w| (w * f64::from(WEIGHT_SCALE)).round() as u32);

    // Rounding can leave the total a point off; settle it on the heaviest weight
    let total: u32 = points.iter().sum();
    if total != WEIGHT_SCALE {
        let heaviest = (0..points.len())
            .max_by_key(|&i| points[i])
            .unwrap_or(0);
        points[heaviest] = (points[heaviest] + WEIGHT_SCALE).saturating_sub(total);
    }

    Ok(points)
}

/// Calculate amount compatibility (0-100)
///
/// Inside the range (bounds inclusive) scores 100. Outside, the score falls
/// linearly with the distance to the violated bound and reaches 0 once that
/// distance is `falloff` times the bound.
#[inline]
fn calculate_amount_score(funding_goal: f64, range: &AmountRange, falloff: f64) -> u8 {
    if range.contains(funding_goal) {
        return FULL_SCORE;
    }

    let (distance, bound) = if funding_goal < range.min {
        (range.min - funding_goal, range.min)
    } else {
        (funding_goal - range.max, range.max)
    };

    let window = bound * falloff;
    if window <= 0.0 {
        return 0;
    }

    let score = f64::from(FULL_SCORE) * (1.0 - distance / window);
    score.clamp(0.0, f64::from(FULL_SCORE)).round() as u8
}

/// Calculate industry alignment (0 or 100)
/// An empty preference list accepts every industry
#[inline]
fn calculate_industry_score(category: &str, preferred: &[String]) -> u8 {
    if preferred.is_empty() {
        return FULL_SCORE;
    }

    let category = category.trim().to_lowercase();
    if preferred
        .iter()
        .any(|industry| industry.trim().to_lowercase() == category)
    {
        FULL_SCORE
    } else {
        0
    }
}

/// Calculate risk alignment (0-100)
/// An investor without a recorded tolerance accepts any risk
#[inline]
fn calculate_risk_score(
    implied: RiskLevel,
    tolerance: Option<RiskLevel>,
    credit: &RiskCredit,
) -> u8 {
    match tolerance.map(|t| t.distance(implied)) {
        None => FULL_SCORE,
        Some(0) => credit.exact,
        Some(1) => credit.adjacent,
        Some(_) => credit.opposite,
    }
}
