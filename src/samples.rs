//! Realistic sample records: payment transactions with an optional processing
//! time, exact decimal amounts and a nested counterparty.
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use uuid::Uuid;

use crate::record;
use crate::registry::RecordTypeRegistry;
use crate::schema::{FieldKind, FieldSpec, ScalarType, Schema};
use crate::value::DecimalValue;

#[derive(Debug, Clone)]
pub struct Counterparty {
    pub id: Uuid,
    pub name: String,
    pub country: Option<String>,
}
record!(Counterparty { id, name, country });

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Uuid,
    pub created_at: DateTime<FixedOffset>,
    pub processed_at: Option<DateTime<FixedOffset>>,
    pub amount: DecimalValue,
    pub transaction_amount: DecimalValue,
    pub settled: bool,
    pub attempts: i64,
    pub tags: Vec<String>,
    pub counterparty: Option<Counterparty>,
}
record!(Transaction {
    id,
    created_at,
    processed_at,
    amount,
    transaction_amount,
    settled,
    attempts,
    tags,
    counterparty,
});

/// Makes both sample record types resolvable by name in schema descriptions.
pub fn register(registry: &RecordTypeRegistry) {
    registry.register::<Transaction>();
    registry.register::<Counterparty>();
}

pub fn counterparty_schema() -> Schema {
    Schema::new()
        .field("id", FieldSpec::scalar("id", ScalarType::Uuid))
        .field("name", FieldSpec::scalar("name", ScalarType::String))
        .field("country", FieldSpec::scalar("country", ScalarType::String).optional())
}

pub fn transaction_schema() -> Schema {
    Schema::new()
        .field("id", FieldSpec::scalar("id", ScalarType::Uuid))
        .field("created_at", FieldSpec::scalar("created_at", ScalarType::DateTime))
        .field("processed_at", FieldSpec::scalar("processed_at", ScalarType::DateTime).optional())
        .field("amount", FieldSpec::scalar("amount", ScalarType::Decimal))
        .field("transaction_amount", FieldSpec::scalar("transaction_amount", ScalarType::Decimal))
        .field("settled", FieldSpec::scalar("settled", ScalarType::Bool))
        .field("attempts", FieldSpec::scalar("attempts", ScalarType::Integer))
        .field("tags", FieldSpec::list_of("tags", FieldKind::Scalar(ScalarType::String)))
        .field(
            "counterparty",
            FieldSpec::record::<Counterparty>("counterparty", Arc::new(counterparty_schema())).optional(),
        )
}

/// Deterministic sample number `i`.
pub fn transaction(i: u64) -> Transaction {
    let created_at = Utc
        .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
        .fixed_offset()
        + TimeDelta::seconds(i as i64 * 37);
    let settled = i % 3 != 0;
    Transaction {
        id: Uuid::from_u128(0x5eed_0000_0000_4000_8000_0000_0000_0000 | i as u128),
        created_at,
        processed_at: settled.then(|| created_at + TimeDelta::milliseconds(1_250)),
        amount: DecimalValue::Finite(rust_decimal::Decimal::new(420_000 + i as i64, 4)),
        transaction_amount: DecimalValue::Finite(rust_decimal::Decimal::new(42, 0)),
        settled,
        attempts: (i % 4) as i64 + 1,
        tags: if i % 2 == 0 { vec!["card".into()] } else { vec!["sepa".into(), "retry".into()] },
        counterparty: (i % 5 != 0).then(|| Counterparty {
            id: Uuid::from_u128(0xc0ff_ee00_0000_4000_8000_0000_0000_0000 | (i % 7) as u128),
            name: format!("Merchant #{}", i % 7),
            country: (i % 7 != 3).then(|| "NL".to_string()),
        }),
    }
}

pub fn transactions(count: usize) -> Vec<Transaction> {
    (0..count as u64).map(transaction).collect()
}
