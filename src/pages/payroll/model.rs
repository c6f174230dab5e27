use chrono::NaiveDate;

use super::*;

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct CreatePeriod {
    pub(super) start_date: NaiveDate,
    pub(super) end_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub(super) struct PeriodItems {
    pub(super) period: payroll_period::Model,
    pub(super) items: Vec<ItemDetail>,
}

#[derive(Debug, Serialize)]
pub(super) struct Payslip {
    pub(super) period: payroll_period::Model,
    pub(super) item: ItemDetail,
}
