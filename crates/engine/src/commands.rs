//! Command structs for engine operations.
//!
//! These types group the parameters of the write operations (trips,
//! purchases, payroll and catalog entries), keeping call sites readable and
//! avoiding long argument lists. They deserialize from JSON so a thin request
//! layer can hand them over unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Money, PaymentStatus, Role};

/// Product requested when a trip is opened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLoad {
    pub product_id: i32,
    #[serde(default)]
    pub qtt_out: i32,
    #[serde(default)]
    pub qtt_out_unite: i32,
}

/// Boxes requested when a trip is opened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxLoad {
    pub box_id: i32,
    #[serde(default)]
    pub qtt_out: i32,
}

/// Open a trip for a truck.
#[derive(Clone, Debug, Deserialize)]
pub struct OpenTripCmd {
    pub truck: String,
    pub driver: String,
    pub seller: String,
    #[serde(default)]
    pub assistant: Option<String>,
    pub date: NaiveDate,
    pub zone: String,
    #[serde(default)]
    pub products: Vec<ProductLoad>,
    #[serde(default)]
    pub boxes: Vec<BoxLoad>,
}

impl OpenTripCmd {
    #[must_use]
    pub fn new(
        truck: impl Into<String>,
        driver: impl Into<String>,
        seller: impl Into<String>,
        date: NaiveDate,
        zone: impl Into<String>,
    ) -> Self {
        Self {
            truck: truck.into(),
            driver: driver.into(),
            seller: seller.into(),
            assistant: None,
            date,
            zone: zone.into(),
            products: Vec::new(),
            boxes: Vec::new(),
        }
    }

    #[must_use]
    pub fn assistant(mut self, cin: impl Into<String>) -> Self {
        self.assistant = Some(cin.into());
        self
    }

    #[must_use]
    pub fn product(mut self, product_id: i32, qtt_out: i32, qtt_out_unite: i32) -> Self {
        self.products.push(ProductLoad {
            product_id,
            qtt_out,
            qtt_out_unite,
        });
        self
    }

    #[must_use]
    pub fn box_line(mut self, box_id: i32, qtt_out: i32) -> Self {
        self.boxes.push(BoxLoad { box_id, qtt_out });
        self
    }
}

/// Returned product counted at close.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductReturn {
    pub product_id: i32,
    #[serde(default)]
    pub qtt_reutour: i32,
    #[serde(default)]
    pub qtt_reutour_unite: i32,
}

/// Boxes brought back at close.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxReturn {
    pub box_id: i32,
    #[serde(default)]
    pub qtt_in: i32,
}

/// Waste for a product, either declared on a trip or handed to a supplier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasteLine {
    pub product_id: i32,
    pub kind: String,
    pub qtt: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeLine {
    pub kind: String,
    pub amount: Money,
}

/// Close an open trip and settle it.
#[derive(Clone, Debug, Deserialize)]
pub struct CloseTripCmd {
    pub trip_id: i32,
    #[serde(default)]
    pub products: Vec<ProductReturn>,
    #[serde(default)]
    pub boxes: Vec<BoxReturn>,
    #[serde(default)]
    pub wastes: Vec<WasteLine>,
    #[serde(default)]
    pub charges: Vec<ChargeLine>,
    pub received_amount: Money,
}

impl CloseTripCmd {
    #[must_use]
    pub fn new(trip_id: i32, received_amount: Money) -> Self {
        Self {
            trip_id,
            products: Vec::new(),
            boxes: Vec::new(),
            wastes: Vec::new(),
            charges: Vec::new(),
            received_amount,
        }
    }

    #[must_use]
    pub fn product(mut self, product_id: i32, qtt_reutour: i32, qtt_reutour_unite: i32) -> Self {
        self.products.push(ProductReturn {
            product_id,
            qtt_reutour,
            qtt_reutour_unite,
        });
        self
    }

    #[must_use]
    pub fn box_line(mut self, box_id: i32, qtt_in: i32) -> Self {
        self.boxes.push(BoxReturn { box_id, qtt_in });
        self
    }

    #[must_use]
    pub fn waste(mut self, product_id: i32, kind: impl Into<String>, qtt: i32) -> Self {
        self.wastes.push(WasteLine {
            product_id,
            kind: kind.into(),
            qtt,
        });
        self
    }

    #[must_use]
    pub fn charge(mut self, kind: impl Into<String>, amount: Money) -> Self {
        self.charges.push(ChargeLine {
            kind: kind.into(),
            amount,
        });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTransfer {
    pub product_id: i32,
    #[serde(default)]
    pub additional_qtt: i32,
    #[serde(default)]
    pub additional_qtt_unite: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxTransfer {
    pub box_id: i32,
    #[serde(default)]
    pub additional_qtt: i32,
}

/// Move what is left of a trip's load onto another, open, trip.
#[derive(Clone, Debug, Deserialize)]
pub struct TransferCmd {
    pub source_trip: i32,
    pub destination_trip: i32,
    #[serde(default)]
    pub products: Vec<ProductTransfer>,
    #[serde(default)]
    pub boxes: Vec<BoxTransfer>,
}

impl TransferCmd {
    #[must_use]
    pub fn new(source_trip: i32, destination_trip: i32) -> Self {
        Self {
            source_trip,
            destination_trip,
            products: Vec::new(),
            boxes: Vec::new(),
        }
    }

    #[must_use]
    pub fn product(mut self, product_id: i32, additional_qtt: i32, additional_qtt_unite: i32) -> Self {
        self.products.push(ProductTransfer {
            product_id,
            additional_qtt,
            additional_qtt_unite,
        });
        self
    }

    #[must_use]
    pub fn box_line(mut self, box_id: i32, additional_qtt: i32) -> Self {
        self.boxes.push(BoxTransfer {
            box_id,
            additional_qtt,
        });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseProductLine {
    pub product_id: i32,
    pub qtt: i32,
    #[serde(default)]
    pub qtt_unite: i32,
    pub price: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseBoxLine {
    pub box_id: i32,
    #[serde(default)]
    pub qtt_in: i32,
    #[serde(default)]
    pub qtt_out: i32,
}

/// Book a delivery from a supplier.
#[derive(Clone, Debug, Deserialize)]
pub struct PurchaseCmd {
    pub supplier_id: i32,
    pub date: NaiveDate,
    #[serde(default)]
    pub products: Vec<PurchaseProductLine>,
    #[serde(default)]
    pub boxes: Vec<PurchaseBoxLine>,
    #[serde(default)]
    pub wastes: Vec<WasteLine>,
}

impl PurchaseCmd {
    #[must_use]
    pub fn new(supplier_id: i32, date: NaiveDate) -> Self {
        Self {
            supplier_id,
            date,
            products: Vec::new(),
            boxes: Vec::new(),
            wastes: Vec::new(),
        }
    }

    #[must_use]
    pub fn product(mut self, product_id: i32, qtt: i32, qtt_unite: i32, price: Money) -> Self {
        self.products.push(PurchaseProductLine {
            product_id,
            qtt,
            qtt_unite,
            price,
        });
        self
    }

    #[must_use]
    pub fn box_line(mut self, box_id: i32, qtt_in: i32, qtt_out: i32) -> Self {
        self.boxes.push(PurchaseBoxLine {
            box_id,
            qtt_in,
            qtt_out,
        });
        self
    }

    #[must_use]
    pub fn waste(mut self, product_id: i32, kind: impl Into<String>, qtt: i32) -> Self {
        self.wastes.push(WasteLine {
            product_id,
            kind: kind.into(),
            qtt,
        });
        self
    }
}

/// Compute and store the pay of an employee for one month.
#[derive(Clone, Debug, Deserialize)]
pub struct PaymentCmd {
    pub employee_cin: String,
    pub month: u32,
    pub year: i32,
    #[serde(default = "pending")]
    pub status: PaymentStatus,
}

fn pending() -> PaymentStatus {
    PaymentStatus::Pending
}

impl PaymentCmd {
    #[must_use]
    pub fn new(employee_cin: impl Into<String>, month: u32, year: i32) -> Self {
        Self {
            employee_cin: employee_cin.into(),
            month,
            year,
            status: PaymentStatus::Pending,
        }
    }

    #[must_use]
    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewProductCmd {
    pub designation: String,
    #[serde(default)]
    pub genre: String,
    pub price_unite: Money,
    pub capacity_by_box: i32,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub unite_in_stock: i32,
    #[serde(default)]
    pub box_id: Option<i32>,
}

impl NewProductCmd {
    #[must_use]
    pub fn new(designation: impl Into<String>, price_unite: Money, capacity_by_box: i32) -> Self {
        Self {
            designation: designation.into(),
            genre: String::new(),
            price_unite,
            capacity_by_box,
            stock: 0,
            unite_in_stock: 0,
            box_id: None,
        }
    }

    #[must_use]
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    #[must_use]
    pub fn stock(mut self, boxes: i32, units: i32) -> Self {
        self.stock = boxes;
        self.unite_in_stock = units;
        self
    }

    #[must_use]
    pub fn box_id(mut self, box_id: i32) -> Self {
        self.box_id = Some(box_id);
        self
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewBoxCmd {
    pub designation: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub in_stock: i32,
    #[serde(default)]
    pub empty: i32,
    #[serde(default)]
    pub sent: i32,
}

impl NewBoxCmd {
    #[must_use]
    pub fn new(designation: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            designation: designation.into(),
            kind: kind.into(),
            in_stock: 0,
            empty: 0,
            sent: 0,
        }
    }

    #[must_use]
    pub fn counts(mut self, in_stock: i32, empty: i32, sent: i32) -> Self {
        self.in_stock = in_stock;
        self.empty = empty;
        self.sent = sent;
        self
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewEmployeeCmd {
    pub cin: String,
    pub name: String,
    #[serde(default)]
    pub tel: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub salary_fix: Money,
    pub role: Role,
}

impl NewEmployeeCmd {
    #[must_use]
    pub fn new(
        cin: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        salary_fix: Money,
    ) -> Self {
        Self {
            cin: cin.into(),
            name: name.into(),
            tel: None,
            address: None,
            salary_fix,
            role,
        }
    }

    #[must_use]
    pub fn tel(mut self, tel: impl Into<String>) -> Self {
        self.tel = Some(tel.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewSupplierCmd {
    pub name: String,
    #[serde(default)]
    pub tel: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl NewSupplierCmd {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tel: None,
            address: None,
        }
    }

    #[must_use]
    pub fn tel(mut self, tel: impl Into<String>) -> Self {
        self.tel = Some(tel.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_payload_defaults_missing_lists() {
        let cmd: CloseTripCmd = serde_json::from_str(
            r#"{"trip_id": 3, "received_amount": 15000,
                "products": [{"product_id": 1, "qtt_reutour": 2}]}"#,
        )
        .unwrap();
        assert_eq!(cmd.trip_id, 3);
        assert_eq!(cmd.received_amount, Money::new(15_000));
        assert_eq!(cmd.products[0].qtt_reutour_unite, 0);
        assert!(cmd.boxes.is_empty());
        assert!(cmd.charges.is_empty());
    }

    #[test]
    fn payment_payload_defaults_to_pending() {
        let cmd: PaymentCmd =
            serde_json::from_str(r#"{"employee_cin": "AB1", "month": 3, "year": 2026}"#).unwrap();
        assert_eq!(cmd.status, PaymentStatus::Pending);
    }

    #[test]
    fn open_builder_collects_lines() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let cmd = OpenTripCmd::new("TR-1", "D1", "S1", date, "north")
            .assistant("A1")
            .product(1, 5, 0)
            .box_line(2, 4);
        assert_eq!(cmd.assistant.as_deref(), Some("A1"));
        assert_eq!(cmd.products.len(), 1);
        assert_eq!(cmd.boxes[0].qtt_out, 4);
    }
}
