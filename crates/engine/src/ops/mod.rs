use std::{collections::BTreeMap, sync::Arc};

use sea_orm::DatabaseConnection;

use crate::{
    EngineError, EngineSettings, LogNotifier, ResultEngine, SupplierNotifier, WasteLine,
};

mod catalog;
mod lookup;
mod payroll;
mod purchases;
mod stock;
mod trips;

pub use stock::StockField;

/// Run a block inside a DB transaction, committing on success.
///
/// An early return (including `?`) drops the transaction, which rolls it
/// back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = sea_orm::TransactionTrait::begin(&$self.database).await?;
        let result: $crate::ResultEngine<_> = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    settings: EngineSettings,
    notifier: Arc<dyn SupplierNotifier>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }
}

fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Waste lines keyed by `(product, kind)`; repeated keys are summed.
fn merge_wastes(lines: &[WasteLine]) -> ResultEngine<BTreeMap<(i32, String), i32>> {
    let mut merged = BTreeMap::new();
    for line in lines {
        let kind = normalize_required(&line.kind, "waste kind")?;
        if line.qtt <= 0 {
            return Err(EngineError::InvalidQuantity(format!(
                "waste {}/{kind} must be > 0, got {}",
                line.product_id, line.qtt
            )));
        }
        *merged.entry((line.product_id, kind)).or_default() += line.qtt;
    }
    Ok(merged)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    settings: EngineSettings,
    notifier: Option<Arc<dyn SupplierNotifier>>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    pub fn settings(mut self, settings: EngineSettings) -> EngineBuilder {
        self.settings = settings;
        self
    }

    /// Replace the default [`LogNotifier`].
    pub fn notifier(mut self, notifier: Arc<dyn SupplierNotifier>) -> EngineBuilder {
        self.notifier = Some(notifier);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        if self.settings.commission_per_mille < 0 {
            return Err(EngineError::InvalidInput(format!(
                "commission_per_mille must be >= 0, got {}",
                self.settings.commission_per_mille
            )));
        }
        Ok(Engine {
            database: self.database,
            settings: self.settings,
            notifier: self.notifier.unwrap_or_else(|| Arc::new(LogNotifier)),
        })
    }
}
