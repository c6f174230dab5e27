use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use uuid::Uuid;

use crate::{entity::{bonus, deduction, payroll_item, prelude::*, sea_orm_active_enums::BonusKind}, error::PayrollError};

use super::bonus::BonusSource;

/// A payroll item with its deduction and bonus lines, as shown on a payslip
#[derive(Debug, Serialize)]
pub struct ItemDetail {
    #[serde(flatten)]
    pub item: payroll_item::Model,
    pub deductions: Vec<deduction::Model>,
    pub bonuses: Vec<BonusView>,
}

#[derive(Debug, Serialize)]
pub struct BonusView {
    pub id: Uuid,
    pub kind: BonusKind,
    pub amount: Decimal,
    pub description: String,
    pub source: Option<BonusSource>,
}

impl From<bonus::Model> for BonusView {
    fn from(bonus: bonus::Model) -> Self {
        Self {
            source: bonus.source(),
            id: bonus.id,
            kind: bonus.kind,
            amount: bonus.amount,
            description: bonus.description,
        }
    }
}

impl ItemDetail {
    pub async fn list<C: ConnectionTrait>(db: &C, period_id: Uuid) -> Result<Vec<ItemDetail>, PayrollError> {
        let items = PayrollItem::find()
            .filter(payroll_item::Column::PayrollPeriodId.eq(period_id))
            .order_by_asc(payroll_item::Column::CreatedAt)
            .all(db).await?;

        Self::with_lines(db, items).await
    }

    pub async fn for_employee<C: ConnectionTrait>(db: &C, period_id: Uuid, employee_id: Uuid) -> Result<Option<ItemDetail>, PayrollError> {
        let Some(item) = PayrollItem::find()
            .filter(payroll_item::Column::PayrollPeriodId.eq(period_id))
            .filter(payroll_item::Column::EmployeeId.eq(employee_id))
            .one(db).await?
        else {
            return Ok(None);
        };

        Ok(Self::with_lines(db, vec![item]).await?.pop())
    }

    async fn with_lines<C: ConnectionTrait>(db: &C, items: Vec<payroll_item::Model>) -> Result<Vec<ItemDetail>, PayrollError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let ids = items.iter().map(|item| item.id).collect::<Vec<_>>();

        let mut deductions = HashMap::<Uuid, Vec<deduction::Model>>::new();
        for line in Deduction::find().filter(deduction::Column::PayrollItemId.is_in(ids.clone())).all(db).await? {
            deductions.entry(line.payroll_item_id).or_default().push(line);
        }

        let mut bonuses = HashMap::<Uuid, Vec<BonusView>>::new();
        for line in Bonus::find().filter(bonus::Column::PayrollItemId.is_in(ids)).all(db).await? {
            bonuses.entry(line.payroll_item_id).or_default().push(line.into());
        }

        let details = items.into_iter()
            .map(|item| ItemDetail {
                deductions: deductions.remove(&item.id).unwrap_or_default(),
                bonuses: bonuses.remove(&item.id).unwrap_or_default(),
                item,
            })
            .collect();

        Ok(details)
    }
}
