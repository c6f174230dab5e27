use sea_orm_migration::prelude::*;
use sha2::Digest as _;

use crate::m20250701_090000_create_payroll_schema::{Kpi, SalaryStructure, User};

const EMPLOYEES: u128 = 100;
const ADMIN_ID: u128 = 12345;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let time = Expr::val("2025-07-01T09:30:00.000Z").cast_as("timestamptz");
        let effective_date = Expr::val("2025-01-01").cast_as("date");

        // Creates 100 employees, each with a current salary structure
        for i in 1..=EMPLOYEES {
            let uuid = format!("{:032x}", i);
            let username = i.to_string();
            let hire_date = format!("2024-{:02}-{:02}", (i % 12) + 1, (i % 28) + 1);
            let basic_salary = rand::random_range(5_000..=20_000);
            let housing_allowance = rand::random_range(0..=2_000);
            let transport_allowance = rand::random_range(0..=500);
            let meal_allowance = rand::random_range(0..=300);

            let hashed_password = &sha2::Sha256::digest(&format!("{}:{}", username, username))[..];

            manager
                .exec_stmt(Query::insert()
                    .into_table(User::Table)
                    .columns([User::Id, User::CreatedAt, User::UpdatedAt, User::Username, User::Password, User::Role, User::HireDate])
                    .values_panic([Expr::val(uuid.clone()).cast_as("uuid"), time.clone(), time.clone(), username.into(), hashed_password.into(), Expr::val("employee").cast_as("role_type"), Expr::val(hire_date).cast_as("date")])
                    .to_owned()
            ).await?;

            manager
                .exec_stmt(Query::insert()
                    .into_table(SalaryStructure::Table)
                    .columns([SalaryStructure::CreatedAt, SalaryStructure::UpdatedAt, SalaryStructure::EmployeeId, SalaryStructure::BasicSalary, SalaryStructure::HousingAllowance, SalaryStructure::TransportAllowance, SalaryStructure::MealAllowance, SalaryStructure::EffectiveDate])
                    .values_panic([time.clone(), time.clone(), Expr::val(uuid).cast_as("uuid"), basic_salary.into(), housing_allowance.into(), transport_allowance.into(), meal_allowance.into(), effective_date.clone()])
                    .to_owned()
            ).await?;
        }

        // Create an admin

        let hashed_password = &sha2::Sha256::digest("admin:admin")[..];

        manager
            .exec_stmt(Query::insert()
                .into_table(User::Table)
                .columns([User::Id, User::CreatedAt, User::UpdatedAt, User::Username, User::Password, User::Role, User::HireDate])
                .values_panic([Expr::val(format!("{:032x}", ADMIN_ID)).cast_as("uuid"), time.clone(), time.clone(), "admin".into(), hashed_password.into(), Expr::val("admin").cast_as("role_type"), Expr::val("2024-01-01").cast_as("date")])
                .to_owned()
        ).await?;

        for (name, unit, points_value) in [("Tickets resolved", "tickets", 10), ("Customer satisfaction", "score", 20)] {
            manager
                .exec_stmt(Query::insert()
                    .into_table(Kpi::Table)
                    .columns([Kpi::CreatedAt, Kpi::UpdatedAt, Kpi::Name, Kpi::Unit, Kpi::PointsValue])
                    .values_panic([time.clone(), time.clone(), name.into(), unit.into(), points_value.into()])
                    .to_owned()
            ).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete()
                .from_table(Kpi::Table)
                .and_where(Expr::col(Kpi::Name).is_in(["Tickets resolved", "Customer satisfaction"]))
                .to_owned()
        ).await?;

        // Salary structures follow their employee through the cascading foreign key
        for i in (1..=EMPLOYEES).chain([ADMIN_ID]) {
            let uuid = format!("{:032x}", i);

            manager
                .exec_stmt(Query::delete()
                    .from_table(User::Table)
                    .and_where(Expr::col(User::Id).eq(Expr::val(uuid).cast_as("uuid")))
                    .to_owned()
            ).await?;
        }

        Ok(())
    }
}
