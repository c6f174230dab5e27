use sea_orm_migration::{prelude::{extension::postgres::TypeDropStatement, *}, sea_orm::{ActiveEnum, DbBackend, DeriveActiveEnum, EnumIter, Schema}};

use crate::{setup_user_table_fk, util::{default_table_statement, default_user_table_statement, foreign_key}};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(DbBackend::Postgres);

        manager.create_type(schema.create_enum_from_active_enum::<RoleType>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<PeriodStatus>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<DeductionKind>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<BonusKind>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<BonusSourceKind>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<AssignmentStatus>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<LeaveStatus>()).await?;

        manager
            .create_table(default_table_statement()
                .table(User::Table)
                .col(ColumnDef::new(User::Username)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(User::Password)
                    .binary()
                    .not_null()) // Password should be in a hashed format
                .col(ColumnDef::new(User::Role)
                    .custom(RoleType::name())
                    .not_null())
                .col(ColumnDef::new(User::HireDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(User::TerminationDate)
                    .date())
                .col(ColumnDef::new(User::IsActive)
                    .boolean()
                    .not_null()
                    .default(true))
                .take()
            ).await?;

        manager
            .create_table(default_user_table_statement()
                .table(SalaryStructure::Table)
                .col(ColumnDef::new(SalaryStructure::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(SalaryStructure::BasicSalary)
                    .decimal_len(15, 2)
                    .not_null())
                .col(ColumnDef::new(SalaryStructure::HousingAllowance)
                    .decimal_len(15, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(SalaryStructure::TransportAllowance)
                    .decimal_len(15, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(SalaryStructure::MealAllowance)
                    .decimal_len(15, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(SalaryStructure::EffectiveDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(SalaryStructure::EndDate)
                    .date())
                .col(ColumnDef::new(SalaryStructure::IsCurrent)
                    .boolean()
                    .not_null()
                    .default(true))
                .take()
            ).await?;
        setup_user_table_fk!(manager, SalaryStructure::Table);
        manager.create_foreign_key(foreign_key(SalaryStructure::Table, SalaryStructure::EmployeeId, User::Table, ForeignKeyAction::Cascade)).await?;

        // At most one current structure per employee
        manager
            .create_index(Index::create()
                .name("uq_salary_structure_current")
                .table(SalaryStructure::Table)
                .col(SalaryStructure::EmployeeId)
                .unique()
                .and_where(Expr::col(SalaryStructure::IsCurrent).eq(true))
                .take()
            ).await?;

        // One period per date range; concurrent creators rely on this to detect the race
        manager
            .create_table(default_user_table_statement()
                .table(PayrollPeriod::Table)
                .col(ColumnDef::new(PayrollPeriod::Reference)
                    .text()
                    .not_null())
                .col(ColumnDef::new(PayrollPeriod::StartDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(PayrollPeriod::EndDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(PayrollPeriod::PaymentDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(PayrollPeriod::Status)
                    .custom(PeriodStatus::name())
                    .not_null())
                .col(ColumnDef::new(PayrollPeriod::ApprovedBy)
                    .uuid())
                .col(ColumnDef::new(PayrollPeriod::ApprovedAt)
                    .timestamp_with_time_zone())
                .check(Expr::col(PayrollPeriod::StartDate).lte(Expr::col(PayrollPeriod::EndDate)))
                .index(Index::create()
                    .name("uq_payroll_period_range")
                    .col(PayrollPeriod::StartDate)
                    .col(PayrollPeriod::EndDate)
                    .unique())
                .take()
            ).await?;
        setup_user_table_fk!(manager, PayrollPeriod::Table);
        manager.create_foreign_key(foreign_key(PayrollPeriod::Table, PayrollPeriod::ApprovedBy, User::Table, ForeignKeyAction::SetNull)).await?;

        manager
            .create_table(default_table_statement()
                .table(PayrollItem::Table)
                .col(ColumnDef::new(PayrollItem::PayrollPeriodId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(PayrollItem::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(PayrollItem::SalaryStructureId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(PayrollItem::BasicSalary)
                    .decimal_len(15, 2)
                    .not_null())
                .col(ColumnDef::new(PayrollItem::TotalAllowances)
                    .decimal_len(15, 2)
                    .not_null())
                .col(ColumnDef::new(PayrollItem::TotalDeductions)
                    .decimal_len(15, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(PayrollItem::TotalBonuses)
                    .decimal_len(15, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(PayrollItem::GrossSalary)
                    .decimal_len(15, 2)
                    .not_null())
                .col(ColumnDef::new(PayrollItem::NetSalary)
                    .decimal_len(15, 2)
                    .not_null())
                .col(ColumnDef::new(PayrollItem::WorkingDays)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(PayrollItem::LeaveDays)
                    .integer()
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(PayrollItem::AbsentDays)
                    .integer()
                    .not_null()
                    .default(0))
                .index(Index::create()
                    .name("uq_payroll_item_employee")
                    .col(PayrollItem::PayrollPeriodId)
                    .col(PayrollItem::EmployeeId)
                    .unique())
                .take()
            ).await?;
        manager.create_foreign_key(foreign_key(PayrollItem::Table, PayrollItem::PayrollPeriodId, PayrollPeriod::Table, ForeignKeyAction::Cascade)).await?;
        manager.create_foreign_key(foreign_key(PayrollItem::Table, PayrollItem::EmployeeId, User::Table, ForeignKeyAction::Restrict)).await?;
        manager.create_foreign_key(foreign_key(PayrollItem::Table, PayrollItem::SalaryStructureId, SalaryStructure::Table, ForeignKeyAction::Restrict)).await?;

        manager
            .create_table(default_table_statement()
                .table(Deduction::Table)
                .col(ColumnDef::new(Deduction::PayrollItemId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Deduction::Kind)
                    .custom(DeductionKind::name())
                    .not_null())
                .col(ColumnDef::new(Deduction::Amount)
                    .decimal_len(15, 2)
                    .not_null())
                .col(ColumnDef::new(Deduction::Description)
                    .text()
                    .not_null()
                    .default(""))
                .take()
            ).await?;
        manager.create_foreign_key(foreign_key(Deduction::Table, Deduction::PayrollItemId, PayrollItem::Table, ForeignKeyAction::Cascade)).await?;

        manager
            .create_table(default_table_statement()
                .table(Bonus::Table)
                .col(ColumnDef::new(Bonus::PayrollItemId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Bonus::Kind)
                    .custom(BonusKind::name())
                    .not_null())
                .col(ColumnDef::new(Bonus::Amount)
                    .decimal_len(15, 2)
                    .not_null())
                .col(ColumnDef::new(Bonus::Description)
                    .text()
                    .not_null()
                    .default(""))
                .col(ColumnDef::new(Bonus::SourceKind)
                    .custom(BonusSourceKind::name())
                    .not_null())
                .col(ColumnDef::new(Bonus::SourceId)
                    .uuid())
                .take()
            ).await?;
        manager.create_foreign_key(foreign_key(Bonus::Table, Bonus::PayrollItemId, PayrollItem::Table, ForeignKeyAction::Cascade)).await?;

        manager
            .create_table(default_user_table_statement()
                .table(Kpi::Table)
                .col(ColumnDef::new(Kpi::Name)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Kpi::Description)
                    .text()
                    .not_null()
                    .default(""))
                .col(ColumnDef::new(Kpi::Unit)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Kpi::PointsValue)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(Kpi::IsActive)
                    .boolean()
                    .not_null()
                    .default(true))
                .take()
            ).await?;
        setup_user_table_fk!(manager, Kpi::Table);

        manager
            .create_table(default_user_table_statement()
                .table(KpiAssignment::Table)
                .col(ColumnDef::new(KpiAssignment::KpiId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(KpiAssignment::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(KpiAssignment::TargetValue)
                    .decimal_len(15, 2)
                    .not_null())
                .col(ColumnDef::new(KpiAssignment::MinValue)
                    .decimal_len(15, 2)
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(KpiAssignment::MaxValue)
                    .decimal_len(15, 2))
                .col(ColumnDef::new(KpiAssignment::Weight)
                    .decimal_len(5, 2)
                    .not_null()
                    .default(1))
                .col(ColumnDef::new(KpiAssignment::StartDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(KpiAssignment::EndDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(KpiAssignment::Status)
                    .custom(AssignmentStatus::name())
                    .not_null())
                .take()
            ).await?;
        setup_user_table_fk!(manager, KpiAssignment::Table);
        manager.create_foreign_key(foreign_key(KpiAssignment::Table, KpiAssignment::KpiId, Kpi::Table, ForeignKeyAction::Cascade)).await?;
        manager.create_foreign_key(foreign_key(KpiAssignment::Table, KpiAssignment::EmployeeId, User::Table, ForeignKeyAction::Cascade)).await?;

        manager
            .create_table(default_table_statement()
                .table(KpiRecord::Table)
                .col(ColumnDef::new(KpiRecord::KpiAssignmentId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(KpiRecord::ActualValue)
                    .decimal_len(15, 2)
                    .not_null())
                .col(ColumnDef::new(KpiRecord::AchievementPercentage)
                    .decimal_len(5, 2)
                    .not_null())
                .col(ColumnDef::new(KpiRecord::PointsEarned)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(KpiRecord::RecordDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(KpiRecord::RecordedBy)
                    .uuid())
                .col(ColumnDef::new(KpiRecord::Notes)
                    .text())
                .take()
            ).await?;
        manager.create_foreign_key(foreign_key(KpiRecord::Table, KpiRecord::KpiAssignmentId, KpiAssignment::Table, ForeignKeyAction::Cascade)).await?;
        manager.create_foreign_key(foreign_key(KpiRecord::Table, KpiRecord::RecordedBy, User::Table, ForeignKeyAction::SetNull)).await?;

        manager
            .create_table(default_table_statement()
                .table(LeaveRequest::Table)
                .col(ColumnDef::new(LeaveRequest::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(LeaveRequest::StartDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(LeaveRequest::EndDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(LeaveRequest::Status)
                    .custom(LeaveStatus::name())
                    .not_null())
                .col(ColumnDef::new(LeaveRequest::Reason)
                    .text()
                    .not_null()
                    .default(""))
                .check(Expr::col(LeaveRequest::StartDate).lte(Expr::col(LeaveRequest::EndDate)))
                .take()
            ).await?;
        manager.create_foreign_key(foreign_key(LeaveRequest::Table, LeaveRequest::EmployeeId, User::Table, ForeignKeyAction::Cascade)).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children before parents
        let tables: [DynIden; 10] = [
            LeaveRequest::Table.into_iden(),
            KpiRecord::Table.into_iden(),
            KpiAssignment::Table.into_iden(),
            Kpi::Table.into_iden(),
            Bonus::Table.into_iden(),
            Deduction::Table.into_iden(),
            PayrollItem::Table.into_iden(),
            PayrollPeriod::Table.into_iden(),
            SalaryStructure::Table.into_iden(),
            User::Table.into_iden(),
        ];

        for table in tables {
            manager.drop_table(
                TableDropStatement::new()
                    .table(table)
                    .take()
            ).await?;
        }

        let types = [
            RoleType::name(),
            PeriodStatus::name(),
            DeductionKind::name(),
            BonusKind::name(),
            BonusSourceKind::name(),
            AssignmentStatus::name(),
            LeaveStatus::name(),
        ];

        for name in types {
            manager
                .drop_type(
                    TypeDropStatement::new()
                        .name(name)
                        .to_owned()
                ).await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum User {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    Username,
    Password,
    Role,
    HireDate,
    TerminationDate,
    IsActive,
}

#[derive(Iden)]
pub(crate) enum SalaryStructure {
    Table,
    CreatedAt,
    UpdatedAt,
    EmployeeId,
    BasicSalary,
    HousingAllowance,
    TransportAllowance,
    MealAllowance,
    EffectiveDate,
    EndDate,
    IsCurrent,
}

#[derive(Iden)]
enum PayrollPeriod {
    Table,
    Reference,
    StartDate,
    EndDate,
    PaymentDate,
    Status,
    ApprovedBy,
    ApprovedAt,
}

#[derive(Iden)]
enum PayrollItem {
    Table,
    PayrollPeriodId,
    EmployeeId,
    SalaryStructureId,
    BasicSalary,
    TotalAllowances,
    TotalDeductions,
    TotalBonuses,
    GrossSalary,
    NetSalary,
    WorkingDays,
    LeaveDays,
    AbsentDays,
}

#[derive(Iden)]
enum Deduction {
    Table,
    PayrollItemId,
    Kind,
    Amount,
    Description,
}

#[derive(Iden)]
enum Bonus {
    Table,
    PayrollItemId,
    Kind,
    Amount,
    Description,
    SourceKind,
    SourceId,
}

#[derive(Iden)]
pub(crate) enum Kpi {
    Table,
    CreatedAt,
    UpdatedAt,
    Name,
    Description,
    Unit,
    PointsValue,
    IsActive,
}

#[derive(Iden)]
enum KpiAssignment {
    Table,
    KpiId,
    EmployeeId,
    TargetValue,
    MinValue,
    MaxValue,
    Weight,
    StartDate,
    EndDate,
    Status,
}

#[derive(Iden)]
enum KpiRecord {
    Table,
    KpiAssignmentId,
    ActualValue,
    AchievementPercentage,
    PointsEarned,
    RecordDate,
    RecordedBy,
    Notes,
}

#[derive(Iden)]
enum LeaveRequest {
    Table,
    EmployeeId,
    StartDate,
    EndDate,
    Status,
    Reason,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role_type")]
enum RoleType {
    #[sea_orm(string_value = "employee")]
    Employee,
    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "period_status")]
enum PeriodStatus {
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "paid")]
    Paid,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "deduction_kind")]
enum DeductionKind {
    #[sea_orm(string_value = "tax")]
    Tax,
    #[sea_orm(string_value = "pension")]
    Pension,
    #[sea_orm(string_value = "health_insurance")]
    HealthInsurance,
    #[sea_orm(string_value = "loan")]
    Loan,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "bonus_kind")]
enum BonusKind {
    #[sea_orm(string_value = "performance")]
    Performance,
    #[sea_orm(string_value = "attendance")]
    Attendance,
    #[sea_orm(string_value = "overtime")]
    Overtime,
    #[sea_orm(string_value = "holiday")]
    Holiday,
    #[sea_orm(string_value = "project")]
    Project,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "bonus_source_kind")]
enum BonusSourceKind {
    #[sea_orm(string_value = "kpi_evaluation")]
    KpiEvaluation,
    #[sea_orm(string_value = "manual")]
    Manual,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "assignment_status")]
enum AssignmentStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "pending")]
    Pending,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "leave_status")]
enum LeaveStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}
