//! Outbound notices to suppliers.
//!
//! Delivery is somebody else's job: the engine hands a [`SupplierNotice`] to
//! a [`SupplierNotifier`] after the owning transaction has committed, and a
//! failing notifier is only logged.

use std::{error::Error, fmt::Debug};

use serde::Serialize;

use crate::{PurchaseBoxLine, WasteLine};

/// Boxes and waste sent back to a supplier with a purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SupplierNotice {
    pub purchase_id: i32,
    pub supplier_id: i32,
    pub boxes: Vec<PurchaseBoxLine>,
    pub wastes: Vec<WasteLine>,
}

pub type NotifyError = Box<dyn Error + Send + Sync>;

/// Sink for supplier notices.
pub trait SupplierNotifier: Send + Sync + Debug {
    fn notify(&self, notice: &SupplierNotice) -> Result<(), NotifyError>;
}

/// Default sink: writes the notice to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl SupplierNotifier for LogNotifier {
    fn notify(&self, notice: &SupplierNotice) -> Result<(), NotifyError> {
        let payload = serde_json::to_string(notice)?;
        tracing::info!(
            purchase_id = notice.purchase_id,
            supplier_id = notice.supplier_id,
            %payload,
            "supplier notice"
        );
        Ok(())
    }
}
