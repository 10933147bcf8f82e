//! Trip inventory and settlement engine.
//!
//! The engine moves products, returnable boxes and waste between the depot
//! and the trucks, one trip at a time, and settles each closed trip against
//! the pay of the crew. All state lives in a SQL store reached through
//! `sea-orm`; every operation runs in one transaction.

pub use boxes::ReturnableBox;
pub use commands::{
    BoxLoad, BoxReturn, BoxTransfer, ChargeLine, CloseTripCmd, NewBoxCmd, NewEmployeeCmd,
    NewProductCmd, NewSupplierCmd, OpenTripCmd, PaymentCmd, ProductLoad, ProductReturn,
    ProductTransfer, PurchaseBoxLine, PurchaseCmd, PurchaseProductLine, TransferCmd, WasteLine,
};
pub use employees::{Employee, Role};
pub use error::{EngineError, ErrorKind};
pub use money::Money;
pub use notify::{LogNotifier, NotifyError, SupplierNotice, SupplierNotifier};
pub use ops::{Engine, EngineBuilder, StockField};
pub use payments::{Payment, PaymentStatus};
pub use products::Product;
pub use purchase_boxes::PurchaseBox;
pub use purchase_products::PurchaseProduct;
pub use purchase_wastes::PurchaseWaste;
pub use purchases::{Purchase, PurchaseDetail};
pub use settings::{EngineSettings, SentDriftPolicy};
pub use suppliers::Supplier;
pub use trip_boxes::TripBox;
pub use trip_charges::TripCharge;
pub use trip_products::TripProduct;
pub use trip_wastes::TripWaste;
pub use trips::{Trip, TripDetail};
pub use trucks::Truck;
pub use wastes::Waste;

mod boxes;
mod charges;
mod commands;
mod employees;
mod error;
mod money;
mod notify;
mod ops;
mod payments;
mod products;
mod purchase_boxes;
mod purchase_products;
mod purchase_wastes;
mod purchases;
mod settings;
mod settlement;
mod suppliers;
mod trip_boxes;
mod trip_charges;
mod trip_products;
mod trip_wastes;
mod trips;
mod trucks;
mod util;
mod wastes;

type ResultEngine<T> = Result<T, EngineError>;
