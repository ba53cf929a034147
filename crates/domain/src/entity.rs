// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

/// The kind of business entity an audit log entry refers to.
///
/// The server tags every audit entry with a free-form `entity_type` string.
/// The types the back office works with are named variants; anything else is
/// carried through untouched as [`EntityType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    /// A cash register movement (cash or POS, in or out).
    CashMovement,
    /// A branch expense.
    Expense,
    /// A shipment from the central kitchen to a branch.
    CenterShipment,
    /// A supplier shipment received by a branch.
    Shipment,
    /// A single product line of a stock count.
    StockEntry,
    /// A waste (spoilage) entry.
    WasteEntry,
    /// A produce purchase.
    ProducePurchase,
    /// A payment to a produce supplier.
    ProducePayment,
    /// Any entity type without a dedicated variant.
    Other(String),
}

impl EntityType {
    /// Returns the wire name used by the audit log.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CashMovement => "cash_movement",
            Self::Expense => "expense",
            Self::CenterShipment => "center_shipment",
            Self::Shipment => "shipment",
            Self::StockEntry => "stock_entry",
            Self::WasteEntry => "waste_entry",
            Self::ProducePurchase => "produce_purchase",
            Self::ProducePayment => "produce_payment",
            Self::Other(name) => name,
        }
    }

    /// Returns the REST collection path records of this type are listed from.
    ///
    /// `None` for entity types the back office does not list directly.
    #[must_use]
    pub const fn collection_path(&self) -> Option<&'static str> {
        match self {
            Self::CashMovement => Some("/cash-movements"),
            Self::Expense => Some("/expenses"),
            Self::CenterShipment => Some("/center-shipments"),
            Self::Shipment => Some("/shipments"),
            Self::StockEntry => Some("/stock-entries"),
            Self::WasteEntry => Some("/waste-entries"),
            Self::ProducePurchase => Some("/produce-purchases"),
            Self::ProducePayment => Some("/produce-payments"),
            Self::Other(_) => None,
        }
    }

    /// All entity types with a dedicated variant.
    #[must_use]
    pub fn known() -> [Self; 8] {
        [
            Self::CashMovement,
            Self::Expense,
            Self::CenterShipment,
            Self::Shipment,
            Self::StockEntry,
            Self::WasteEntry,
            Self::ProducePurchase,
            Self::ProducePayment,
        ]
    }
}

impl From<&str> for EntityType {
    fn from(value: &str) -> Self {
        match value {
            "cash_movement" => Self::CashMovement,
            "expense" => Self::Expense,
            "center_shipment" => Self::CenterShipment,
            "shipment" => Self::Shipment,
            "stock_entry" => Self::StockEntry,
            "waste_entry" => Self::WasteEntry,
            "produce_purchase" => Self::ProducePurchase,
            "produce_payment" => Self::ProducePayment,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for EntityType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<EntityType> for String {
    fn from(value: EntityType) -> Self {
        match value {
            EntityType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for EntityType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
