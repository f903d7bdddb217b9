// src/models/invoice.rs

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::error::AppError;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    Cash,
    #[serde(rename = "UPI")]
    Upi,
}

impl PaymentType {
    pub fn label(self) -> &'static str {
        match self {
            PaymentType::Cash => "Cash",
            PaymentType::Upi => "UPI",
        }
    }
}

impl FromStr for PaymentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentType::Cash),
            "upi" => Ok(PaymentType::Upi),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "Chit User")]
    ChitUser,
    #[serde(rename = "Non-User")]
    NonUser,
}

impl UserType {
    pub fn label(self) -> &'static str {
        match self {
            UserType::ChitUser => "Chit User",
            UserType::NonUser => "Non-User",
        }
    }
}

impl FromStr for UserType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chit user" => Ok(UserType::ChitUser),
            "non-user" | "non user" => Ok(UserType::NonUser),
            _ => Err(()),
        }
    }
}

/// The fixed chit plan sizes offered by the plan amount select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAmount {
    OneLakh,
    TwoLakh,
    FiveLakh,
    TenLakh,
}

impl PlanAmount {
    pub const ALL: [PlanAmount; 4] = [
        PlanAmount::OneLakh,
        PlanAmount::TwoLakh,
        PlanAmount::FiveLakh,
        PlanAmount::TenLakh,
    ];

    /// Matches the raw select value. Anything else (including the "select"
    /// placeholder option) has no plan.
    pub fn from_value(value: &str) -> Option<Self> {
        match value.trim() {
            "100000" => Some(PlanAmount::OneLakh),
            "200000" => Some(PlanAmount::TwoLakh),
            "500000" => Some(PlanAmount::FiveLakh),
            "1000000" => Some(PlanAmount::TenLakh),
            _ => None,
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            PlanAmount::OneLakh => "100000",
            PlanAmount::TwoLakh => "200000",
            PlanAmount::FiveLakh => "500000",
            PlanAmount::TenLakh => "1000000",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlanAmount::OneLakh => "1,00,000",
            PlanAmount::TwoLakh => "2,00,000",
            PlanAmount::FiveLakh => "5,00,000",
            PlanAmount::TenLakh => "10,00,000",
        }
    }
}

// --- Field names ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    CustomerName,
    Date,
    ChitNumber,
    PlanName,
    PlanAmount,
    CashReceived,
    PaymentType,
    AgentName,
    UserType,
    Notes,
    Signature,
}

impl FieldName {
    pub const ALL: [FieldName; 11] = [
        FieldName::CustomerName,
        FieldName::Date,
        FieldName::ChitNumber,
        FieldName::PlanName,
        FieldName::PlanAmount,
        FieldName::CashReceived,
        FieldName::PaymentType,
        FieldName::AgentName,
        FieldName::UserType,
        FieldName::Notes,
        FieldName::Signature,
    ];

    /// The form control name, as used by the host and in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::CustomerName => "customerName",
            FieldName::Date => "date",
            FieldName::ChitNumber => "chitNumber",
            FieldName::PlanName => "planName",
            FieldName::PlanAmount => "planAmount",
            FieldName::CashReceived => "cashReceived",
            FieldName::PaymentType => "paymentType",
            FieldName::AgentName => "agentName",
            FieldName::UserType => "userType",
            FieldName::Notes => "notes",
            FieldName::Signature => "signature",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::UnknownField(s.to_string()))
    }
}

// --- Draft ---

pub const DEFAULT_CASH_RECEIVED: &str = "₹";
pub const DEFAULT_NOTES: &str = "Nil";
pub const DEFAULT_SIGNATURE: &str = "Ramesh.T";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub customer_name: String,
    pub date: Option<NaiveDate>,
    pub chit_number: String,
    pub plan_name: String,
    /// Raw select value; only the four plan sizes get a label.
    pub plan_amount: String,
    pub cash_received: String,
    pub payment_type: Option<PaymentType>,
    pub agent_name: String,
    pub user_type: Option<UserType>,
    pub notes: String,
    pub signature: String,
}

impl InvoiceDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            customer_name: String::new(),
            date: Some(today),
            chit_number: String::new(),
            plan_name: String::new(),
            plan_amount: String::new(),
            cash_received: DEFAULT_CASH_RECEIVED.to_string(),
            payment_type: Some(PaymentType::Cash),
            agent_name: String::new(),
            user_type: Some(UserType::ChitUser),
            notes: DEFAULT_NOTES.to_string(),
            signature: DEFAULT_SIGNATURE.to_string(),
        }
    }

    /// Sets a single field from its raw form value. Text fields take the value
    /// as given; the date and the two selects are parsed, and "" clears them.
    pub fn set(&mut self, field: FieldName, value: &str) -> Result<(), AppError> {
        match field {
            FieldName::CustomerName => self.customer_name = value.to_string(),
            FieldName::Date => self.date = parse_date(value)?,
            FieldName::ChitNumber => self.chit_number = value.to_string(),
            FieldName::PlanName => self.plan_name = value.to_string(),
            FieldName::PlanAmount => self.plan_amount = value.to_string(),
            FieldName::CashReceived => self.cash_received = value.to_string(),
            FieldName::PaymentType => {
                self.payment_type = parse_choice(field, value)?;
            }
            FieldName::AgentName => self.agent_name = value.to_string(),
            FieldName::UserType => {
                self.user_type = parse_choice(field, value)?;
            }
            FieldName::Notes => self.notes = value.to_string(),
            FieldName::Signature => self.signature = value.to_string(),
        }
        Ok(())
    }

    pub fn plan(&self) -> Option<PlanAmount> {
        PlanAmount::from_value(&self.plan_amount)
    }
}

fn parse_date(value: &str) -> Result<Option<NaiveDate>, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .map(Some)
        .map_err(|_| AppError::InvalidValue {
            field: FieldName::Date,
            value: value.to_string(),
        })
}

fn parse_choice<T: FromStr>(field: FieldName, value: &str) -> Result<Option<T>, AppError> {
    if value.trim().is_empty() {
        return Ok(None);
    }

    value.parse().map(Some).map_err(|_| AppError::InvalidValue {
        field,
        value: value.to_string(),
    })
}
