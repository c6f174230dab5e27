use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Income tax, applied to gross salary
pub const TAX_RATE: Decimal = dec!(0.10);
/// Pension contribution, applied to basic salary
pub const PENSION_RATE: Decimal = dec!(0.05);
/// Health insurance contribution, applied to basic salary
pub const HEALTH_INSURANCE_RATE: Decimal = dec!(0.03);

/// Mean KPI achievement (in percent) that must be exceeded to earn a performance bonus
pub const PERFORMANCE_BONUS_THRESHOLD: Decimal = dec!(90);
/// Performance bonus, applied to basic salary
pub const PERFORMANCE_BONUS_RATE: Decimal = dec!(0.05);

pub const MAX_ACHIEVEMENT: Decimal = dec!(100);

/// Money columns are `numeric(15, 2)`
pub const MONEY_SCALE: u32 = 2;
/// Largest magnitude a `numeric(15, 2)` column holds
pub const MAX_STORED_AMOUNT: Decimal = dec!(9999999999999.99);
