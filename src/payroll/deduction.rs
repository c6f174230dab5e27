use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use uuid::Uuid;

use crate::{consts::{HEALTH_INSURANCE_RATE, PENSION_RATE, TAX_RATE}, entity::{deduction, payroll_item, sea_orm_active_enums::DeductionKind}, utils::round_money};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeductionLine {
    pub kind: DeductionKind,
    pub amount: Decimal,
    pub description: String,
}

impl DeductionLine {
    pub fn into_active_model(self, payroll_item_id: Uuid, now: DateTime<FixedOffset>) -> deduction::ActiveModel {
        deduction::ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            payroll_item_id: Set(payroll_item_id),
            kind: Set(self.kind),
            amount: Set(self.amount),
            description: Set(self.description),
            ..Default::default()
        }
    }
}

pub struct StandardDeductionGenerator;

impl StandardDeductionGenerator {
    /// Tax on gross pay, pension and health insurance on basic pay
    pub fn generate(item: &payroll_item::Model) -> [DeductionLine; 3] {
        [
            DeductionLine {
                kind: DeductionKind::Tax,
                amount: round_money(item.gross_salary * TAX_RATE),
                description: "Income tax".to_string(),
            },
            DeductionLine {
                kind: DeductionKind::Pension,
                amount: round_money(item.basic_salary * PENSION_RATE),
                description: "Pension contribution".to_string(),
            },
            DeductionLine {
                kind: DeductionKind::HealthInsurance,
                amount: round_money(item.basic_salary * HEALTH_INSURANCE_RATE),
                description: "Health insurance".to_string(),
            },
        ]
    }
}
