use chrono::Local;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::{Set, Unchanged}, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{entity::{bonus, deduction, payroll_item, prelude::*}, error::PayrollError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemTotals {
    pub total_deductions: Decimal,
    pub total_bonuses: Decimal,
    pub net_salary: Decimal,
}

impl ItemTotals {
    /// `net = gross - deductions + bonuses`, summed from scratch every time
    pub fn compute(
        gross_salary: Decimal,
        deductions: impl IntoIterator<Item = Decimal>,
        bonuses: impl IntoIterator<Item = Decimal>,
    ) -> Self {
        let total_deductions = deductions.into_iter().sum::<Decimal>();
        let total_bonuses = bonuses.into_iter().sum::<Decimal>();

        Self {
            total_deductions,
            total_bonuses,
            net_salary: gross_salary - total_deductions + total_bonuses,
        }
    }
}

pub struct PayrollItemAggregator;

impl PayrollItemAggregator {
    /// Recomputes the item's totals from its current deduction and bonus rows
    #[instrument(skip_all, fields(item_id = %item.id))]
    pub async fn finalize<C: ConnectionTrait>(db: &C, item: &payroll_item::Model) -> Result<payroll_item::Model, PayrollError> {
        let deductions = Deduction::find()
            .filter(deduction::Column::PayrollItemId.eq(item.id))
            .all(db).await?;

        let bonuses = Bonus::find()
            .filter(bonus::Column::PayrollItemId.eq(item.id))
            .all(db).await?;

        let totals = ItemTotals::compute(
            item.gross_salary,
            deductions.iter().map(|line| line.amount),
            bonuses.iter().map(|line| line.amount),
        );

        debug!(?totals, "Finalizing payroll item");

        let item = PayrollItem::update(payroll_item::ActiveModel {
            id: Unchanged(item.id),
            total_deductions: Set(totals.total_deductions),
            total_bonuses: Set(totals.total_bonuses),
            net_salary: Set(totals.net_salary),
            updated_at: Set(Local::now().fixed_offset()),
            ..Default::default()
        }).exec(db).await?;

        Ok(item)
    }
}
