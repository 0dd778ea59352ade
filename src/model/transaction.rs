//! Models for the transactions endpoint

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::amount::normalize;

/// One page of the `/data/v2/transactions` response
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsPage {
    pub transactions: Vec<TransactionResponse>,
    pub next_page_token: Option<String>,
}

impl TransactionsPage {
    /// The continuation token, if upstream has more data.
    ///
    /// Tink signals the end with an empty string rather than omitting the field.
    #[must_use]
    pub fn continuation(&self) -> Option<&str> {
        self.next_page_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

/// An upstream transaction.
///
/// Every nested field is optional here so that a contract violation surfaces
/// as a [`RecordError`] naming the field instead of a page decode failure.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: Option<String>,
    pub dates: Option<Dates>,
    pub descriptions: Option<Descriptions>,
    pub amount: Option<Amount>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Dates {
    pub booked: Option<String>,
    pub value: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Descriptions {
    pub original: Option<String>,
    pub display: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Amount {
    pub value: Option<ScaledValue>,
    pub currency_code: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScaledValue {
    pub unscaled_value: Option<Numeric>,
    pub scale: Option<Numeric>,
}

/// Tink sends integers as JSON strings; plain numbers are accepted too.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Numeric {
    Integer(i64),
    Text(String),
}

impl Numeric {
    fn parse(&self, field: &'static str) -> Result<i64, RecordError> {
        match self {
            Numeric::Integer(n) => Ok(*n),
            Numeric::Text(s) => s.trim().parse().map_err(|_| RecordError::InvalidValue {
                field,
                value: s.clone(),
            }),
        }
    }
}

/// Why an upstream transaction could not be turned into a record
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid value for `{field}`: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// A normalised transaction
#[allow(clippy::module_name_repetitions)]
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
}

impl TryFrom<&TransactionResponse> for TransactionRecord {
    type Error = RecordError;

    fn try_from(tx: &TransactionResponse) -> Result<Self, Self::Error> {
        let booked = tx
            .dates
            .as_ref()
            .and_then(|d| d.booked.as_deref())
            .ok_or(RecordError::MissingField("dates.booked"))?;
        let date = NaiveDate::parse_from_str(booked, "%Y-%m-%d").map_err(|_| {
            RecordError::InvalidValue {
                field: "dates.booked",
                value: booked.to_string(),
            }
        })?;

        let description = tx
            .descriptions
            .as_ref()
            .and_then(|d| d.original.clone())
            .ok_or(RecordError::MissingField("descriptions.original"))?;

        let amount = tx
            .amount
            .as_ref()
            .ok_or(RecordError::MissingField("amount"))?;
        let value = amount
            .value
            .as_ref()
            .ok_or(RecordError::MissingField("amount.value"))?;
        let unscaled = value
            .unscaled_value
            .as_ref()
            .ok_or(RecordError::MissingField("amount.value.unscaledValue"))?
            .parse("amount.value.unscaledValue")?;
        let scale = value
            .scale
            .as_ref()
            .ok_or(RecordError::MissingField("amount.value.scale"))?
            .parse("amount.value.scale")?;
        let currency = amount
            .currency_code
            .clone()
            .ok_or(RecordError::MissingField("amount.currencyCode"))?;

        Ok(TransactionRecord {
            date,
            description,
            amount: normalize(unscaled, scale)?,
            currency,
        })
    }
}

// -- Tests ----------------------------------------------------------------------------
