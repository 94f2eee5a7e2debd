//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Lenza:
//!
//! - `users`: authentication
//! - `items`: fishing gear listed for rental, owned by users
//! - `bookings`: rental requests/history per item (never deleted)
//! - `payment_intents`: local mirror of provider charge attempts

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Items {
    Table,
    Id,
    Name,
    OwnerId,
    DailyRateMinor,
    Currency,
    Listed,
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    ItemId,
    RenterId,
    StartDate,
    EndDate,
    Status,
    AmountMinor,
    Currency,
    CreatedAt,
}

#[derive(Iden)]
enum PaymentIntents {
    Table,
    Id,
    BookingId,
    ProviderIntentId,
    AmountMinor,
    Currency,
    Status,
    CreatedAt,
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
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Items::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Items::Name).string().not_null())
                    .col(ColumnDef::new(Items::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(Items::DailyRateMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Items::Currency)
                            .string()
                            .not_null()
                            .default("EUR"),
                    )
                    .col(
                        ColumnDef::new(Items::Listed)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-items-owner_id")
                            .from(Items::Table, Items::OwnerId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Bookings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::ItemId).string().not_null())
                    .col(ColumnDef::new(Bookings::RenterId).string().not_null())
                    .col(ColumnDef::new(Bookings::StartDate).date().not_null())
                    .col(ColumnDef::new(Bookings::EndDate).date().not_null())
                    .col(ColumnDef::new(Bookings::Status).string().not_null())
                    .col(ColumnDef::new(Bookings::AmountMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Bookings::Currency)
                            .string()
                            .not_null()
                            .default("EUR"),
                    )
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bookings-item_id")
                            .from(Bookings::Table, Bookings::ItemId)
                            .to(Items::Table, Items::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bookings-renter_id")
                            .from(Bookings::Table, Bookings::RenterId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        // Overlap queries filter on (item_id, status) before comparing dates.
        manager
            .create_index(
                Index::create()
                    .name("idx-bookings-item_id-status")
                    .table(Bookings::Table)
                    .col(Bookings::ItemId)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Payment intents
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(PaymentIntents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentIntents::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentIntents::BookingId).string().not_null())
                    .col(
                        ColumnDef::new(PaymentIntents::ProviderIntentId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentIntents::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentIntents::Currency)
                            .string()
                            .not_null()
                            .default("EUR"),
                    )
                    .col(ColumnDef::new(PaymentIntents::Status).string().not_null())
                    .col(
                        ColumnDef::new(PaymentIntents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payment_intents-booking_id")
                            .from(PaymentIntents::Table, PaymentIntents::BookingId)
                            .to(Bookings::Table, Bookings::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // The provider id is the correlation key for confirmation callbacks.
        manager
            .create_index(
                Index::create()
                    .name("idx-payment_intents-provider_intent_id-unique")
                    .table(PaymentIntents::Table)
                    .col(PaymentIntents::ProviderIntentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Not unique: a booking may accumulate intents across retries.
        manager
            .create_index(
                Index::create()
                    .name("idx-payment_intents-booking_id")
                    .table(PaymentIntents::Table)
                    .col(PaymentIntents::BookingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentIntents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
