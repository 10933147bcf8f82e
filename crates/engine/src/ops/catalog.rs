//! Reference data: products, boxes, trucks, employees, suppliers, and the
//! read side of the warehouse balances.

use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{
    Employee, EngineError, NewBoxCmd, NewEmployeeCmd, NewProductCmd, NewSupplierCmd, Product,
    ResultEngine, ReturnableBox, Supplier, Truck, Waste, boxes, employees, products, suppliers,
    trucks,
    util::{ensure_non_negative, ensure_non_negative_amount, is_unique_violation},
    wastes,
};

use super::{Engine, StockField, normalize_optional_text, normalize_required, with_tx};

impl Engine {
    /// Register a product. Designations are unique.
    pub async fn new_product(&self, cmd: NewProductCmd) -> ResultEngine<Product> {
        let designation = normalize_required(&cmd.designation, "product designation")?;
        ensure_non_negative_amount(cmd.price_unite, "price_unite")?;
        ensure_non_negative(cmd.capacity_by_box, "capacity_by_box")?;
        ensure_non_negative(cmd.stock, "stock")?;
        ensure_non_negative(cmd.unite_in_stock, "unite_in_stock")?;

        with_tx!(self, |db_tx| {
            let taken = products::Entity::find()
                .filter(products::Column::Designation.eq(designation.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey(format!("product {designation}")));
            }
            if let Some(box_id) = cmd.box_id {
                self.require_box(&db_tx, box_id).await?;
            }

            let product = Product {
                id: 0,
                designation: designation.clone(),
                genre: cmd.genre.trim().to_string(),
                price_unite: cmd.price_unite,
                capacity_by_box: cmd.capacity_by_box,
                stock: cmd.stock,
                unite_in_stock: cmd.unite_in_stock,
                box_id: cmd.box_id,
            };
            let model = products::ActiveModel::from(&product)
                .insert(&db_tx)
                .await
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        EngineError::ExistingKey(format!("product {designation}"))
                    } else {
                        err.into()
                    }
                })?;
            tracing::info!(product_id = model.id, %designation, "product created");
            Ok(Product::from(model))
        })
    }

    pub async fn new_box(&self, cmd: NewBoxCmd) -> ResultEngine<ReturnableBox> {
        let designation = normalize_required(&cmd.designation, "box designation")?;
        ensure_non_negative(cmd.in_stock, "in_stock")?;
        ensure_non_negative(cmd.empty, "empty")?;
        ensure_non_negative(cmd.sent, "sent")?;

        with_tx!(self, |db_tx| {
            let value = ReturnableBox {
                id: 0,
                designation,
                kind: cmd.kind.trim().to_string(),
                in_stock: cmd.in_stock,
                empty: cmd.empty,
                sent: cmd.sent,
            };
            let model = boxes::ActiveModel::from(&value).insert(&db_tx).await?;
            tracing::info!(box_id = model.id, "box created");
            Ok(ReturnableBox::from(model))
        })
    }

    pub async fn new_truck(&self, matricule: &str, capacity: i32) -> ResultEngine<Truck> {
        let matricule = normalize_required(matricule, "truck matricule")?;
        ensure_non_negative(capacity, "capacity")?;

        with_tx!(self, |db_tx| {
            if trucks::Entity::find_by_id(matricule.as_str())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(format!("truck {matricule}")));
            }
            let truck = Truck {
                matricule,
                capacity,
            };
            trucks::ActiveModel::from(&truck).insert(&db_tx).await?;
            tracing::info!(matricule = %truck.matricule, "truck created");
            Ok(truck)
        })
    }

    pub async fn new_employee(&self, cmd: NewEmployeeCmd) -> ResultEngine<Employee> {
        let cin = normalize_required(&cmd.cin, "employee cin")?;
        let name = normalize_required(&cmd.name, "employee name")?;
        ensure_non_negative_amount(cmd.salary_fix, "salary_fix")?;

        with_tx!(self, |db_tx| {
            if employees::Entity::find_by_id(cin.as_str())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(format!("employee {cin}")));
            }
            let employee = Employee {
                cin,
                name,
                tel: normalize_optional_text(cmd.tel.as_deref()),
                address: normalize_optional_text(cmd.address.as_deref()),
                salary_fix: cmd.salary_fix,
                role: cmd.role,
            };
            employees::ActiveModel::from(&employee).insert(&db_tx).await?;
            tracing::info!(cin = %employee.cin, role = employee.role.as_str(), "employee created");
            Ok(employee)
        })
    }

    pub async fn new_supplier(&self, cmd: NewSupplierCmd) -> ResultEngine<Supplier> {
        let name = normalize_required(&cmd.name, "supplier name")?;

        with_tx!(self, |db_tx| {
            let supplier = Supplier {
                id: 0,
                name,
                tel: normalize_optional_text(cmd.tel.as_deref()),
                address: normalize_optional_text(cmd.address.as_deref()),
            };
            let model = suppliers::ActiveModel::from(&supplier)
                .insert(&db_tx)
                .await?;
            tracing::info!(supplier_id = model.id, "supplier created");
            Ok(Supplier::from(model))
        })
    }

    pub async fn product(&self, id: i32) -> ResultEngine<Product> {
        with_tx!(self, |db_tx| {
            Ok(Product::from(self.require_product(&db_tx, id).await?))
        })
    }

    pub async fn products(&self) -> ResultEngine<Vec<Product>> {
        with_tx!(self, |db_tx| {
            let models = products::Entity::find()
                .order_by_asc(products::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Product::from).collect())
        })
    }

    #[doc(alias = "box")]
    pub async fn returnable_box(&self, id: i32) -> ResultEngine<ReturnableBox> {
        with_tx!(self, |db_tx| {
            Ok(ReturnableBox::from(self.require_box(&db_tx, id).await?))
        })
    }

    pub async fn boxes(&self) -> ResultEngine<Vec<ReturnableBox>> {
        with_tx!(self, |db_tx| {
            let models = boxes::Entity::find()
                .order_by_asc(boxes::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(ReturnableBox::from).collect())
        })
    }

    pub async fn employee(&self, cin: &str) -> ResultEngine<Employee> {
        with_tx!(self, |db_tx| {
            Employee::try_from(self.require_employee(&db_tx, cin).await?)
        })
    }

    pub async fn truck(&self, matricule: &str) -> ResultEngine<Truck> {
        with_tx!(self, |db_tx| {
            Ok(Truck::from(self.require_truck(&db_tx, matricule).await?))
        })
    }

    pub async fn supplier(&self, id: i32) -> ResultEngine<Supplier> {
        with_tx!(self, |db_tx| {
            Ok(Supplier::from(self.require_supplier(&db_tx, id).await?))
        })
    }

    /// Waste balance for a product and kind; zero when nothing was recorded.
    pub async fn waste_balance(&self, product_id: i32, kind: &str) -> ResultEngine<Waste> {
        let kind = normalize_required(kind, "waste kind")?;
        with_tx!(self, |db_tx| {
            self.require_product(&db_tx, product_id).await?;
            let field = StockField::Waste {
                product_id,
                kind: kind.clone(),
            };
            let qtt = self.read_counter(&db_tx, &field).await?;
            Ok(Waste {
                product_id,
                kind,
                qtt,
            })
        })
    }

    pub async fn wastes(&self) -> ResultEngine<Vec<Waste>> {
        with_tx!(self, |db_tx| {
            let models = wastes::Entity::find()
                .order_by_asc(wastes::Column::ProductId)
                .order_by_asc(wastes::Column::Kind)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Waste::from).collect())
        })
    }

    /// Record waste found outside a trip (damaged in the warehouse).
    pub async fn record_waste(&self, product_id: i32, kind: &str, qtt: i32) -> ResultEngine<Waste> {
        let kind = normalize_required(kind, "waste kind")?;
        if qtt <= 0 {
            return Err(EngineError::InvalidQuantity(format!(
                "waste {product_id}/{kind} must be > 0, got {qtt}"
            )));
        }
        with_tx!(self, |db_tx| {
            let field = StockField::Waste {
                product_id,
                kind: kind.clone(),
            };
            let balance = self.release(&db_tx, &field, qtt).await?;
            tracing::info!(product_id, %kind, qtt, balance, "waste recorded");
            Ok(Waste {
                product_id,
                kind,
                qtt: balance,
            })
        })
    }
}
