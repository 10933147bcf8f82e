//! Initial schema migration.
//!
//! Creates every table used by the depot engine:
//!
//! - `boxes`, `products`, `wastes`: warehouse balances
//! - `employees`, `trucks`, `suppliers`: reference data
//! - `trips` and its line tables (`trip_products`, `trip_boxes`,
//!   `trip_wastes`, `trip_charges`) plus `charges`
//! - `purchases` and its line tables
//! - `payments`: one payroll record per employee and period

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Boxes {
    Table,
    Id,
    Designation,
    Kind,
    InStock,
    Empty,
    Sent,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Designation,
    Genre,
    PriceUnite,
    CapacityByBox,
    Stock,
    UniteInStock,
    BoxId,
}

#[derive(Iden)]
enum Wastes {
    Table,
    ProductId,
    Kind,
    Qtt,
}

#[derive(Iden)]
enum Employees {
    Table,
    Cin,
    Name,
    Tel,
    Address,
    SalaryFix,
    Role,
}

#[derive(Iden)]
enum Trucks {
    Table,
    Matricule,
    Capacity,
}

#[derive(Iden)]
enum Suppliers {
    Table,
    Id,
    Name,
    Tel,
    Address,
}

#[derive(Iden)]
enum Trips {
    Table,
    Id,
    TruckMatricule,
    DriverId,
    SellerId,
    AssistantId,
    Date,
    Zone,
    IsActive,
    WaitedAmount,
    ReceivedAmount,
    Benefit,
    Deff,
}

#[derive(Iden)]
enum TripProducts {
    Table,
    TripId,
    ProductId,
    QttOut,
    QttOutUnite,
    QttReutour,
    QttReutourUnite,
    QttVendu,
}

#[derive(Iden)]
enum TripBoxes {
    Table,
    TripId,
    BoxId,
    QttOut,
    QttIn,
}

#[derive(Iden)]
enum TripWastes {
    Table,
    TripId,
    ProductId,
    Kind,
    Qtt,
}

#[derive(Iden)]
enum Charges {
    Table,
    Id,
    Kind,
    Amount,
    Date,
}

#[derive(Iden)]
enum TripCharges {
    Table,
    TripId,
    ChargeId,
    Amount,
}

#[derive(Iden)]
enum Purchases {
    Table,
    Id,
    SupplierId,
    Date,
    Total,
}

#[derive(Iden)]
enum PurchaseProducts {
    Table,
    PurchaseId,
    ProductId,
    Qtt,
    QttUnite,
    Price,
}

#[derive(Iden)]
enum PurchaseBoxes {
    Table,
    Id,
    PurchaseId,
    BoxId,
    QttIn,
    QttOut,
}

#[derive(Iden)]
enum PurchaseWastes {
    Table,
    PurchaseId,
    ProductId,
    Kind,
    Qtt,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    EmployeeCin,
    Month,
    Year,
    Total,
    Credit,
    NetPay,
    Status,
}

fn auto_id<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn counter<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).integer().not_null().default(0).to_owned()
}

fn cents<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
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
        // 1. Warehouse balances
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Boxes::Table)
                    .if_not_exists()
                    .col(auto_id(Boxes::Id))
                    .col(ColumnDef::new(Boxes::Designation).string().not_null())
                    .col(ColumnDef::new(Boxes::Kind).string().not_null())
                    .col(counter(Boxes::InStock))
                    .col(counter(Boxes::Empty))
                    .col(counter(Boxes::Sent))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(auto_id(Products::Id))
                    .col(ColumnDef::new(Products::Designation).string().not_null())
                    .col(ColumnDef::new(Products::Genre).string().not_null())
                    .col(cents(Products::PriceUnite))
                    .col(counter(Products::CapacityByBox))
                    .col(counter(Products::Stock))
                    .col(counter(Products::UniteInStock))
                    .col(ColumnDef::new(Products::BoxId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-products-box_id")
                            .from(Products::Table, Products::BoxId)
                            .to(Boxes::Table, Boxes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-products-designation-unique")
                    .table(Products::Table)
                    .col(Products::Designation)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Wastes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Wastes::ProductId).integer().not_null())
                    .col(ColumnDef::new(Wastes::Kind).string().not_null())
                    .col(counter(Wastes::Qtt))
                    .primary_key(Index::create().col(Wastes::ProductId).col(Wastes::Kind))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wastes-product_id")
                            .from(Wastes::Table, Wastes::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Reference data
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Cin)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employees::Name).string().not_null())
                    .col(ColumnDef::new(Employees::Tel).string())
                    .col(ColumnDef::new(Employees::Address).string())
                    .col(cents(Employees::SalaryFix))
                    .col(ColumnDef::new(Employees::Role).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Trucks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Trucks::Matricule)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(counter(Trucks::Capacity))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(auto_id(Suppliers::Id))
                    .col(ColumnDef::new(Suppliers::Name).string().not_null())
                    .col(ColumnDef::new(Suppliers::Tel).string())
                    .col(ColumnDef::new(Suppliers::Address).string())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Trips and line items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(auto_id(Trips::Id))
                    .col(ColumnDef::new(Trips::TruckMatricule).string().not_null())
                    .col(ColumnDef::new(Trips::DriverId).string().not_null())
                    .col(ColumnDef::new(Trips::SellerId).string().not_null())
                    .col(ColumnDef::new(Trips::AssistantId).string())
                    .col(ColumnDef::new(Trips::Date).date().not_null())
                    .col(ColumnDef::new(Trips::Zone).string().not_null())
                    .col(
                        ColumnDef::new(Trips::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(cents(Trips::WaitedAmount))
                    .col(cents(Trips::ReceivedAmount))
                    .col(cents(Trips::Benefit))
                    .col(cents(Trips::Deff))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trips-truck_matricule")
                            .from(Trips::Table, Trips::TruckMatricule)
                            .to(Trucks::Table, Trucks::Matricule),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trips-driver_id")
                            .from(Trips::Table, Trips::DriverId)
                            .to(Employees::Table, Employees::Cin),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trips-seller_id")
                            .from(Trips::Table, Trips::SellerId)
                            .to(Employees::Table, Employees::Cin),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trips-assistant_id")
                            .from(Trips::Table, Trips::AssistantId)
                            .to(Employees::Table, Employees::Cin),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-trips-truck_matricule-date")
                    .table(Trips::Table)
                    .col(Trips::TruckMatricule)
                    .col(Trips::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TripProducts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TripProducts::TripId).integer().not_null())
                    .col(ColumnDef::new(TripProducts::ProductId).integer().not_null())
                    .col(counter(TripProducts::QttOut))
                    .col(counter(TripProducts::QttOutUnite))
                    .col(counter(TripProducts::QttReutour))
                    .col(counter(TripProducts::QttReutourUnite))
                    .col(counter(TripProducts::QttVendu))
                    .primary_key(
                        Index::create()
                            .col(TripProducts::TripId)
                            .col(TripProducts::ProductId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trip_products-trip_id")
                            .from(TripProducts::Table, TripProducts::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trip_products-product_id")
                            .from(TripProducts::Table, TripProducts::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TripBoxes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TripBoxes::TripId).integer().not_null())
                    .col(ColumnDef::new(TripBoxes::BoxId).integer().not_null())
                    .col(counter(TripBoxes::QttOut))
                    .col(counter(TripBoxes::QttIn))
                    .primary_key(Index::create().col(TripBoxes::TripId).col(TripBoxes::BoxId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trip_boxes-trip_id")
                            .from(TripBoxes::Table, TripBoxes::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trip_boxes-box_id")
                            .from(TripBoxes::Table, TripBoxes::BoxId)
                            .to(Boxes::Table, Boxes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TripWastes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TripWastes::TripId).integer().not_null())
                    .col(ColumnDef::new(TripWastes::ProductId).integer().not_null())
                    .col(ColumnDef::new(TripWastes::Kind).string().not_null())
                    .col(counter(TripWastes::Qtt))
                    .primary_key(
                        Index::create()
                            .col(TripWastes::TripId)
                            .col(TripWastes::ProductId)
                            .col(TripWastes::Kind),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trip_wastes-trip_id")
                            .from(TripWastes::Table, TripWastes::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trip_wastes-product_id")
                            .from(TripWastes::Table, TripWastes::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Charges::Table)
                    .if_not_exists()
                    .col(auto_id(Charges::Id))
                    .col(ColumnDef::new(Charges::Kind).string().not_null())
                    .col(cents(Charges::Amount))
                    .col(ColumnDef::new(Charges::Date).date().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TripCharges::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TripCharges::TripId).integer().not_null())
                    .col(ColumnDef::new(TripCharges::ChargeId).integer().not_null())
                    .col(cents(TripCharges::Amount))
                    .primary_key(
                        Index::create()
                            .col(TripCharges::TripId)
                            .col(TripCharges::ChargeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trip_charges-trip_id")
                            .from(TripCharges::Table, TripCharges::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trip_charges-charge_id")
                            .from(TripCharges::Table, TripCharges::ChargeId)
                            .to(Charges::Table, Charges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Purchases and line items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Purchases::Table)
                    .if_not_exists()
                    .col(auto_id(Purchases::Id))
                    .col(ColumnDef::new(Purchases::SupplierId).integer().not_null())
                    .col(ColumnDef::new(Purchases::Date).date().not_null())
                    .col(cents(Purchases::Total))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchases-supplier_id")
                            .from(Purchases::Table, Purchases::SupplierId)
                            .to(Suppliers::Table, Suppliers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchaseProducts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseProducts::PurchaseId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseProducts::ProductId)
                            .integer()
                            .not_null(),
                    )
                    .col(counter(PurchaseProducts::Qtt))
                    .col(counter(PurchaseProducts::QttUnite))
                    .col(cents(PurchaseProducts::Price))
                    .primary_key(
                        Index::create()
                            .col(PurchaseProducts::PurchaseId)
                            .col(PurchaseProducts::ProductId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchase_products-purchase_id")
                            .from(PurchaseProducts::Table, PurchaseProducts::PurchaseId)
                            .to(Purchases::Table, Purchases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchase_products-product_id")
                            .from(PurchaseProducts::Table, PurchaseProducts::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchaseBoxes::Table)
                    .if_not_exists()
                    .col(auto_id(PurchaseBoxes::Id))
                    .col(ColumnDef::new(PurchaseBoxes::PurchaseId).integer().not_null())
                    .col(ColumnDef::new(PurchaseBoxes::BoxId).integer().not_null())
                    .col(counter(PurchaseBoxes::QttIn))
                    .col(counter(PurchaseBoxes::QttOut))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchase_boxes-purchase_id")
                            .from(PurchaseBoxes::Table, PurchaseBoxes::PurchaseId)
                            .to(Purchases::Table, Purchases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchase_boxes-box_id")
                            .from(PurchaseBoxes::Table, PurchaseBoxes::BoxId)
                            .to(Boxes::Table, Boxes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchaseWastes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseWastes::PurchaseId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseWastes::ProductId).integer().not_null())
                    .col(ColumnDef::new(PurchaseWastes::Kind).string().not_null())
                    .col(counter(PurchaseWastes::Qtt))
                    .primary_key(
                        Index::create()
                            .col(PurchaseWastes::PurchaseId)
                            .col(PurchaseWastes::ProductId)
                            .col(PurchaseWastes::Kind),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchase_wastes-purchase_id")
                            .from(PurchaseWastes::Table, PurchaseWastes::PurchaseId)
                            .to(Purchases::Table, Purchases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchase_wastes-product_id")
                            .from(PurchaseWastes::Table, PurchaseWastes::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Payroll
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(auto_id(Payments::Id))
                    .col(ColumnDef::new(Payments::EmployeeCin).string().not_null())
                    .col(ColumnDef::new(Payments::Month).integer().not_null())
                    .col(ColumnDef::new(Payments::Year).integer().not_null())
                    .col(cents(Payments::Total))
                    .col(cents(Payments::Credit))
                    .col(cents(Payments::NetPay))
                    .col(
                        ColumnDef::new(Payments::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payments-employee_cin")
                            .from(Payments::Table, Payments::EmployeeCin)
                            .to(Employees::Table, Employees::Cin),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-employee_cin-month-year-unique")
                    .table(Payments::Table)
                    .col(Payments::EmployeeCin)
                    .col(Payments::Month)
                    .col(Payments::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse creation order so foreign keys never dangle.
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseWastes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseBoxes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseProducts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Purchases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TripCharges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Charges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TripWastes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TripBoxes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TripProducts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Suppliers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trucks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wastes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Boxes::Table).to_owned())
            .await?;
        Ok(())
    }
}
