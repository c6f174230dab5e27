use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{consts::{PERFORMANCE_BONUS_RATE, PERFORMANCE_BONUS_THRESHOLD}, entity::{bonus, kpi_assignment, kpi_record, payroll_item, payroll_period, prelude::*, sea_orm_active_enums::{BonusKind, BonusSourceKind}}, error::PayrollError, utils::round_money};

/// What a bonus line was awarded for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BonusSource {
    /// KPI achievement over the given payroll period
    KpiEvaluation { period_id: Uuid },
    Manual { reference_id: Option<Uuid> },
}

impl BonusSource {
    fn kind(&self) -> BonusSourceKind {
        match self {
            BonusSource::KpiEvaluation { .. } => BonusSourceKind::KpiEvaluation,
            BonusSource::Manual { .. } => BonusSourceKind::Manual,
        }
    }

    fn id(&self) -> Option<Uuid> {
        match self {
            BonusSource::KpiEvaluation { period_id } => Some(*period_id),
            BonusSource::Manual { reference_id } => *reference_id,
        }
    }
}

impl bonus::Model {
    /// `None` when a KPI evaluation bonus lost its period reference
    pub fn source(&self) -> Option<BonusSource> {
        match self.source_kind {
            BonusSourceKind::KpiEvaluation => self.source_id.map(|period_id| BonusSource::KpiEvaluation { period_id }),
            BonusSourceKind::Manual => Some(BonusSource::Manual { reference_id: self.source_id }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusLine {
    pub kind: BonusKind,
    pub amount: Decimal,
    pub description: String,
    pub source: BonusSource,
}

impl BonusLine {
    pub fn into_active_model(self, payroll_item_id: Uuid, now: DateTime<FixedOffset>) -> bonus::ActiveModel {
        bonus::ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            payroll_item_id: Set(payroll_item_id),
            kind: Set(self.kind),
            amount: Set(self.amount),
            description: Set(self.description),
            source_kind: Set(self.source.kind()),
            source_id: Set(self.source.id()),
            ..Default::default()
        }
    }
}

/// Facts a bonus rule may look at for one payroll item
pub struct BonusContext<'a> {
    pub item: &'a payroll_item::Model,
    pub period: &'a payroll_period::Model,
    /// Mean KPI achievement percentage in the period, `None` without records
    pub mean_achievement: Option<Decimal>,
}

pub trait BonusRule {
    fn evaluate(&self, context: &BonusContext<'_>) -> Option<BonusLine>;
}

pub struct PerformanceBonusRule {
    pub threshold: Decimal,
    pub rate: Decimal,
}

impl Default for PerformanceBonusRule {
    fn default() -> Self {
        Self {
            threshold: PERFORMANCE_BONUS_THRESHOLD,
            rate: PERFORMANCE_BONUS_RATE,
        }
    }
}

impl BonusRule for PerformanceBonusRule {
    fn evaluate(&self, context: &BonusContext<'_>) -> Option<BonusLine> {
        let mean = context.mean_achievement?;

        if mean <= self.threshold {
            return None;
        }

        Some(BonusLine {
            kind: BonusKind::Performance,
            amount: round_money(context.item.basic_salary * self.rate),
            description: format!("Performance bonus ({}% mean KPI achievement)", round_money(mean)),
            source: BonusSource::KpiEvaluation { period_id: context.period.id },
        })
    }
}

fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }

    let sum = values.iter().copied().sum::<Decimal>();

    Some(sum / Decimal::from(values.len()))
}

pub struct PerformanceBonusGenerator;

impl PerformanceBonusGenerator {
    /// Performance bonus for `item`, based on the KPI records of its employee
    /// dated inside `period`
    #[instrument(skip_all, fields(employee_id = %item.employee_id))]
    pub async fn generate<C: ConnectionTrait>(db: &C, item: &payroll_item::Model, period: &payroll_period::Model) -> Result<Option<BonusLine>, PayrollError> {
        let achievements = KpiRecord::find()
            .inner_join(KpiAssignment)
            .filter(kpi_assignment::Column::EmployeeId.eq(item.employee_id))
            .filter(kpi_record::Column::RecordDate.between(period.start_date, period.end_date))
            .all(db).await?
            .into_iter()
            .map(|record| record.achievement_percentage)
            .collect::<Vec<_>>();

        let context = BonusContext {
            item,
            period,
            mean_achievement: mean(&achievements),
        };

        debug!(records = achievements.len(), mean_achievement = ?context.mean_achievement, "Evaluating performance bonus");

        Ok(PerformanceBonusRule::default().evaluate(&context))
    }
}
