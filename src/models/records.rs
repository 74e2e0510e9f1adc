//! Loosely-typed records as they come out of the document store.
//!
//! Every field is optional and enum-valued fields are plain strings. The
//! `TryFrom` impls here are the only place these become domain values; a
//! record that fails conversion is skipped by the loader.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::models::domain::{
    AmountRange, BusinessIdea, BusinessStage, EquityRange, IdeaStatus, InvestmentOffer, Role,
    RiskLevel, UserProfile,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RangeRecord {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, rename = "$id")]
    pub document_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub investment_range: Option<RangeRecord>,
    #[serde(default)]
    pub preferred_industries: Option<Vec<String>>,
    #[serde(default)]
    pub risk_tolerance: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "$createdAt")]
    pub document_created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "$id")]
    pub document_id: Option<String>,
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub funding_goal: Option<f64>,
    #[serde(default)]
    pub equity_offered: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "$createdAt")]
    pub document_created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "$id")]
    pub document_id: Option<String>,
    #[serde(default)]
    pub investor_id: Option<String>,
    #[serde(default)]
    pub amount_range: Option<RangeRecord>,
    #[serde(default)]
    pub preferred_equity: Option<RangeRecord>,
    #[serde(default)]
    pub preferred_stages: Option<Vec<String>>,
    #[serde(default)]
    pub preferred_industries: Option<Vec<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "$createdAt")]
    pub document_created_at: Option<DateTime<Utc>>,
}

/// The three input collections, as delivered by a feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub profiles: Vec<ProfileRecord>,
    #[serde(default)]
    pub ideas: Vec<IdeaRecord>,
    #[serde(default)]
    pub offers: Vec<OfferRecord>,
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, RecordError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(v) => Err(RecordError::invalid(field, format!("{:?}", v))),
        None => Err(RecordError::MissingField(field)),
    }
}

fn amount_range(
    value: Option<RangeRecord>,
    field: &'static str,
) -> Result<AmountRange, RecordError> {
    let range = value.ok_or(RecordError::MissingField(field))?;
    let min = range.min.ok_or(RecordError::MissingField(field))?;
    let max = range.max.ok_or(RecordError::MissingField(field))?;

    if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
        return Err(RecordError::invalid(field, format!("{}..{}", min, max)));
    }

    Ok(AmountRange { min, max })
}

fn optional_amount_range(
    value: Option<RangeRecord>,
    field: &'static str,
) -> Result<Option<AmountRange>, RecordError> {
    match value {
        Some(RangeRecord { min: None, max: None }) | None => Ok(None),
        some => amount_range(some, field).map(Some),
    }
}

impl TryFrom<ProfileRecord> for UserProfile {
    type Error = RecordError;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        let user_id = required_text(record.user_id.or(record.document_id), "userId")?;
        let role = record
            .role
            .ok_or(RecordError::MissingField("role"))?
            .parse::<Role>()
            .map_err(|e| RecordError::invalid("role", e))?;

        let risk_tolerance = record
            .risk_tolerance
            .map(|r| r.parse::<RiskLevel>().map_err(|v| RecordError::invalid("riskTolerance", v)))
            .transpose()?;

        Ok(UserProfile {
            user_id,
            role,
            industry: record.industry,
            investment_range: optional_amount_range(record.investment_range, "investmentRange")?,
            preferred_industries: record.preferred_industries.unwrap_or_default(),
            risk_tolerance,
            created_at: record.created_at.or(record.document_created_at),
        })
    }
}

impl TryFrom<IdeaRecord> for BusinessIdea {
    type Error = RecordError;

    fn try_from(record: IdeaRecord) -> Result<Self, Self::Error> {
        let id = required_text(record.document_id.or(record.id), "id")?;
        let creator_id = required_text(record.creator_id, "creatorId")?;

        let funding_goal = record
            .funding_goal
            .ok_or(RecordError::MissingField("fundingGoal"))?;
        if !funding_goal.is_finite() || funding_goal <= 0.0 {
            return Err(RecordError::invalid("fundingGoal", funding_goal));
        }

        let equity_offered = record
            .equity_offered
            .ok_or(RecordError::MissingField("equityOffered"))?;
        if !(0.0..=100.0).contains(&equity_offered) {
            return Err(RecordError::invalid("equityOffered", equity_offered));
        }

        let category = required_text(record.category, "category")?;
        let stage = record
            .stage
            .ok_or(RecordError::MissingField("stage"))?
            .parse::<BusinessStage>()
            .map_err(|v| RecordError::invalid("stage", v))?;
        let status = record
            .status
            .ok_or(RecordError::MissingField("status"))?
            .parse::<IdeaStatus>()
            .map_err(|v| RecordError::invalid("status", v))?;

        Ok(BusinessIdea {
            id,
            creator_id,
            title: record.title,
            funding_goal,
            equity_offered,
            category,
            stage,
            status,
            created_at: record.created_at.or(record.document_created_at),
        })
    }
}

impl TryFrom<OfferRecord> for InvestmentOffer {
    type Error = RecordError;

    fn try_from(record: OfferRecord) -> Result<Self, Self::Error> {
        let id = required_text(record.document_id.or(record.id), "id")?;
        let investor_id = required_text(record.investor_id, "investorId")?;
        let amount_range = amount_range(record.amount_range, "amountRange")?;

        let preferred_equity = optional_amount_range(record.preferred_equity, "preferredEquity")?
            .map(|r| {
                if r.max > 100.0 {
                    Err(RecordError::invalid("preferredEquity", format!("{}..{}", r.min, r.max)))
                } else {
                    Ok(EquityRange { min: r.min, max: r.max })
                }
            })
            .transpose()?;

        let preferred_stages = record
            .preferred_stages
            .unwrap_or_default()
            .iter()
            .map(|s| s.parse::<BusinessStage>().map_err(|v| RecordError::invalid("preferredStages", v)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(InvestmentOffer {
            id,
            investor_id,
            amount_range,
            preferred_equity,
            preferred_stages,
            preferred_industries: record.preferred_industries.unwrap_or_default(),
            is_active: record.is_active.unwrap_or(true),
            created_at: record.created_at.or(record.document_created_at),
        })
    }
}
