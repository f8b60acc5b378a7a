//! Initial schema.
//!
//! - `usuarios`: staff accounts and roles
//! - `tasas_cambio`: append-only Bs/USD rates
//! - `transacciones_canchas`: court payments, credits and advances
//! - `cierres_caja`: immutable cash closings with inputs and computed totals

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Usuarios {
    Table,
    Username,
    Pin,
    Role,
    FirstName,
    LastName,
    Active,
    CreatedAt,
}

#[derive(Iden)]
enum TasasCambio {
    Table,
    Id,
    RecordedAt,
    RateScaled,
    RecordedBy,
}

#[derive(Iden)]
enum TransaccionesCanchas {
    Table,
    Id,
    Kind,
    Court,
    ClientName,
    AmountUsdMinor,
    PaymentMethod,
    Note,
    OccurredAt,
    RecordedBy,
    IdempotencyKey,
}

#[derive(Iden)]
enum CierresCaja {
    Table,
    Id,
    CashBox,
    BusinessDate,
    ClosedAt,
    RecordedBy,
    CashierName,
    CashierNameNorm,
    RateScaled,
    OpeningBs,
    OpeningUsd,
    CashBs,
    CashUsd,
    MobilePaymentBs,
    BankTransferBs,
    OtherBs,
    ZelleUsd,
    InternationalTransferUsd,
    OtherUsd,
    CreditCollectionsUsd,
    AdvancePaymentsUsd,
    TotalCashBs,
    TotalCashUsd,
    TotalElectronicBs,
    TotalElectronicUsd,
    TotalUsdGross,
    UsdGrossInBs,
    TotalCollectedBs,
    NetAdjustmentsUsd,
    DiscrepancyBs,
    Note,
    IdempotencyKey,
}

/// Amount in minor units, zero by default.
fn amount<T: IntoIden>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .big_integer()
        .not_null()
        .default(0)
        .to_owned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Usuarios::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Usuarios::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Usuarios::Pin).string().not_null())
                    .col(
                        ColumnDef::new(Usuarios::Role)
                            .string()
                            .not_null()
                            .default("cajera"),
                    )
                    .col(ColumnDef::new(Usuarios::FirstName).string().not_null())
                    .col(ColumnDef::new(Usuarios::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Usuarios::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Usuarios::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Exchange rates
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(TasasCambio::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TasasCambio::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TasasCambio::RecordedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TasasCambio::RateScaled)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TasasCambio::RecordedBy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-tasas_cambio-recorded_by")
                            .from(TasasCambio::Table, TasasCambio::RecordedBy)
                            .to(Usuarios::Table, Usuarios::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-tasas_cambio-recorded_at")
                    .table(TasasCambio::Table)
                    .col(TasasCambio::RecordedAt)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Court transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(TransaccionesCanchas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TransaccionesCanchas::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TransaccionesCanchas::Kind).string().not_null())
                    .col(
                        ColumnDef::new(TransaccionesCanchas::Court)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransaccionesCanchas::ClientName)
                            .string()
                            .not_null(),
                    )
                    .col(amount(TransaccionesCanchas::AmountUsdMinor))
                    .col(
                        ColumnDef::new(TransaccionesCanchas::PaymentMethod)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TransaccionesCanchas::Note).string())
                    .col(
                        ColumnDef::new(TransaccionesCanchas::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TransaccionesCanchas::RecordedBy)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TransaccionesCanchas::IdempotencyKey).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transacciones_canchas-recorded_by")
                            .from(TransaccionesCanchas::Table, TransaccionesCanchas::RecordedBy)
                            .to(Usuarios::Table, Usuarios::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transacciones_canchas-occurred_at")
                    .table(TransaccionesCanchas::Table)
                    .col(TransaccionesCanchas::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uidx-transacciones_canchas-recorded_by-idempotency_key")
                    .table(TransaccionesCanchas::Table)
                    .col(TransaccionesCanchas::RecordedBy)
                    .col(TransaccionesCanchas::IdempotencyKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Cash closings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CierresCaja::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CierresCaja::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CierresCaja::CashBox).string().not_null())
                    .col(ColumnDef::new(CierresCaja::BusinessDate).date().not_null())
                    .col(
                        ColumnDef::new(CierresCaja::ClosedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CierresCaja::RecordedBy).string().not_null())
                    .col(ColumnDef::new(CierresCaja::CashierName).string().not_null())
                    .col(
                        ColumnDef::new(CierresCaja::CashierNameNorm)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CierresCaja::RateScaled).big_integer().not_null())
                    .col(amount(CierresCaja::OpeningBs))
                    .col(amount(CierresCaja::OpeningUsd))
                    .col(
                        ColumnDef::new(CierresCaja::CashBs)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(
                        ColumnDef::new(CierresCaja::CashUsd)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .col(amount(CierresCaja::MobilePaymentBs))
                    .col(amount(CierresCaja::BankTransferBs))
                    .col(amount(CierresCaja::OtherBs))
                    .col(amount(CierresCaja::ZelleUsd))
                    .col(amount(CierresCaja::InternationalTransferUsd))
                    .col(amount(CierresCaja::OtherUsd))
                    .col(amount(CierresCaja::CreditCollectionsUsd))
                    .col(amount(CierresCaja::AdvancePaymentsUsd))
                    .col(amount(CierresCaja::TotalCashBs))
                    .col(amount(CierresCaja::TotalCashUsd))
                    .col(amount(CierresCaja::TotalElectronicBs))
                    .col(amount(CierresCaja::TotalElectronicUsd))
                    .col(amount(CierresCaja::TotalUsdGross))
                    .col(amount(CierresCaja::UsdGrossInBs))
                    .col(amount(CierresCaja::TotalCollectedBs))
                    .col(amount(CierresCaja::NetAdjustmentsUsd))
                    .col(amount(CierresCaja::DiscrepancyBs))
                    .col(ColumnDef::new(CierresCaja::Note).text())
                    .col(ColumnDef::new(CierresCaja::IdempotencyKey).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cierres_caja-recorded_by")
                            .from(CierresCaja::Table, CierresCaja::RecordedBy)
                            .to(Usuarios::Table, Usuarios::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cierres_caja-business_date")
                    .table(CierresCaja::Table)
                    .col(CierresCaja::BusinessDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cierres_caja-cashier_name_norm")
                    .table(CierresCaja::Table)
                    .col(CierresCaja::CashierNameNorm)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uidx-cierres_caja-recorded_by-idempotency_key")
                    .table(CierresCaja::Table)
                    .col(CierresCaja::RecordedBy)
                    .col(CierresCaja::IdempotencyKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(CierresCaja::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TransaccionesCanchas::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TasasCambio::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Usuarios::Table).to_owned())
            .await?;
        Ok(())
    }
}
