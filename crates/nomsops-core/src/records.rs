//! The five synthetic record types and the uniform field accessor the
//! filter engine works through

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::FieldValue;

/// Uniform access to a record's fields by name.
///
/// `field` covers every scalar the generic equality fallback or the sort
/// can touch; `field_set` covers membership fields (a sender's prisons)
/// that only dedicated predicate hooks understand.
pub trait Record: Clone {
    fn field(&self, name: &str) -> Option<FieldValue>;

    fn field_set(&self, _name: &str) -> Option<&[String]> {
        None
    }
}

/// One incoming payment credited (or pending) to a prisoner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credit {
    pub id: i64,
    /// When the payment arrived
    pub received_at: NaiveDateTime,
    /// `pending` or `credited`
    pub status: String,
    /// Amount in pence
    pub amount: i64,
    pub prison: String,
    pub prisoner_name: String,
    pub prisoner_number: String,
    /// `bank_transfer` or `online`
    pub source: String,
    pub sender_name: String,
    pub sender_sort_code: String,
    pub sender_account_number: String,
    pub sender_roll_number: String,
    pub card_number_last_digits: String,
    pub sender_email: String,
    pub postcode: String,
    pub ip_address: String,
}

impl Credit {
    pub fn received_date(&self) -> NaiveDate {
        self.received_at.date()
    }
}

impl Record for Credit {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Int(self.id)),
            "received_at" => Some(FieldValue::DateTime(self.received_at)),
            "status" => Some(FieldValue::text(&self.status)),
            "amount" => Some(FieldValue::Int(self.amount)),
            "prison" => Some(FieldValue::text(&self.prison)),
            "prisoner_name" => Some(FieldValue::text(&self.prisoner_name)),
            "prisoner_number" => Some(FieldValue::text(&self.prisoner_number)),
            "source" => Some(FieldValue::text(&self.source)),
            "sender_name" => Some(FieldValue::text(&self.sender_name)),
            "sender_sort_code" => Some(FieldValue::text(&self.sender_sort_code)),
            "sender_account_number" => Some(FieldValue::text(&self.sender_account_number)),
            "sender_roll_number" => Some(FieldValue::text(&self.sender_roll_number)),
            "card_number_last_digits" => Some(FieldValue::text(&self.card_number_last_digits)),
            "sender_email" => Some(FieldValue::text(&self.sender_email)),
            "postcode" => Some(FieldValue::text(&self.postcode)),
            "ip_address" => Some(FieldValue::text(&self.ip_address)),
            _ => None,
        }
    }
}

/// A payment source aggregated across the credits it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sender {
    pub id: i64,
    pub source: String,
    pub sender_name: String,
    pub sender_sort_code: String,
    pub sender_account_number: String,
    pub sender_roll_number: String,
    pub card_number_last_digits: String,
    pub sender_email: String,
    pub postcode: String,
    pub ip_address: String,
    /// Prisons this sender has credited
    pub prisons: Vec<String>,
    pub prisoner_count: usize,
    pub prison_count: usize,
    pub credit_count: usize,
    /// Total sent in pence
    pub credit_total: i64,
}

impl Record for Sender {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Int(self.id)),
            "source" => Some(FieldValue::text(&self.source)),
            "sender_name" => Some(FieldValue::text(&self.sender_name)),
            "sender_sort_code" => Some(FieldValue::text(&self.sender_sort_code)),
            "sender_account_number" => Some(FieldValue::text(&self.sender_account_number)),
            "sender_roll_number" => Some(FieldValue::text(&self.sender_roll_number)),
            "card_number_last_digits" => Some(FieldValue::text(&self.card_number_last_digits)),
            "sender_email" => Some(FieldValue::text(&self.sender_email)),
            "postcode" => Some(FieldValue::text(&self.postcode)),
            "ip_address" => Some(FieldValue::text(&self.ip_address)),
            "prisoner_count" => Some(FieldValue::Int(self.prisoner_count as i64)),
            "prison_count" => Some(FieldValue::Int(self.prison_count as i64)),
            "credit_count" => Some(FieldValue::Int(self.credit_count as i64)),
            "credit_total" => Some(FieldValue::Int(self.credit_total)),
            _ => None,
        }
    }

    fn field_set(&self, name: &str) -> Option<&[String]> {
        match name {
            "prisons" => Some(&self.prisons),
            _ => None,
        }
    }
}

/// A prisoner aggregated across the credits received for them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prisoner {
    pub id: i64,
    pub prison: String,
    pub prisoner_name: String,
    pub prisoner_number: String,
    pub sender_count: usize,
    pub credit_count: usize,
    /// Total received in pence
    pub credit_total: i64,
}

impl Record for Prisoner {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Int(self.id)),
            "prison" => Some(FieldValue::text(&self.prison)),
            "prisoner_name" => Some(FieldValue::text(&self.prisoner_name)),
            "prisoner_number" => Some(FieldValue::text(&self.prisoner_number)),
            "sender_count" => Some(FieldValue::Int(self.sender_count as i64)),
            "credit_count" => Some(FieldValue::Int(self.credit_count as i64)),
            "credit_total" => Some(FieldValue::Int(self.credit_total)),
            _ => None,
        }
    }
}

/// One outgoing payment sent on a prisoner's behalf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disbursement {
    pub id: i64,
    /// When the disbursement was entered
    pub created: NaiveDateTime,
    /// `bank_transfer` or `cheque`
    pub method: String,
    /// `entered`, `confirmed` or `sent`
    pub status: String,
    /// Amount in pence
    pub amount: i64,
    pub prison: String,
    pub prisoner_name: String,
    pub prisoner_number: String,
    pub recipient_name: String,
    pub recipient_email: String,
    pub sort_code: String,
    pub account_number: String,
    pub roll_number: String,
}

impl Disbursement {
    pub fn created_date(&self) -> NaiveDate {
        self.created.date()
    }
}

impl Record for Disbursement {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Int(self.id)),
            "created" => Some(FieldValue::DateTime(self.created)),
            "method" => Some(FieldValue::text(&self.method)),
            "status" => Some(FieldValue::text(&self.status)),
            "amount" => Some(FieldValue::Int(self.amount)),
            "prison" => Some(FieldValue::text(&self.prison)),
            "prisoner_name" => Some(FieldValue::text(&self.prisoner_name)),
            "prisoner_number" => Some(FieldValue::text(&self.prisoner_number)),
            "recipient_name" => Some(FieldValue::text(&self.recipient_name)),
            "recipient_email" => Some(FieldValue::text(&self.recipient_email)),
            "sort_code" => Some(FieldValue::text(&self.sort_code)),
            "account_number" => Some(FieldValue::text(&self.account_number)),
            "roll_number" => Some(FieldValue::text(&self.roll_number)),
            _ => None,
        }
    }
}

/// A disbursement recipient aggregated across the payments sent to them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: i64,
    pub recipient_name: String,
    pub recipient_email: String,
    /// Prisons disbursements were sent from
    pub prisons: Vec<String>,
    pub prisoner_count: usize,
    pub prison_count: usize,
    pub disbursement_count: usize,
    /// Total sent in pence
    pub disbursement_total: i64,
}

impl Record for Recipient {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Int(self.id)),
            "recipient_name" => Some(FieldValue::text(&self.recipient_name)),
            "recipient_email" => Some(FieldValue::text(&self.recipient_email)),
            "prisoner_count" => Some(FieldValue::Int(self.prisoner_count as i64)),
            "prison_count" => Some(FieldValue::Int(self.prison_count as i64)),
            "disbursement_count" => Some(FieldValue::Int(self.disbursement_count as i64)),
            "disbursement_total" => Some(FieldValue::Int(self.disbursement_total)),
            _ => None,
        }
    }

    fn field_set(&self, name: &str) -> Option<&[String]> {
        match name {
            "prisons" => Some(&self.prisons),
            _ => None,
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_credit() -> Credit {
        Credit {
            id: 1,
            received_at: NaiveDate::from_ymd_opt(2018, 2, 13)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            status: "pending".to_string(),
            amount: 2500,
            prison: "BXI".to_string(),
            prisoner_name: "JAMES HALLS".to_string(),
            prisoner_number: "A1409AE".to_string(),
            source: "online".to_string(),
            sender_name: "Mary Stevenson".to_string(),
            sender_sort_code: String::new(),
            sender_account_number: String::new(),
            sender_roll_number: String::new(),
            card_number_last_digits: "1028".to_string(),
            sender_email: "mary@example.com".to_string(),
            postcode: "SW1A 1AA".to_string(),
            ip_address: "151.101.16.144".to_string(),
        }
    }

    #[test]
    fn test_credit_scalar_fields() {
        let credit = sample_credit();
        assert_eq!(credit.field("status"), Some(FieldValue::text("pending")));
        assert_eq!(credit.field("amount"), Some(FieldValue::Int(2500)));
        assert_eq!(
            credit.field("received_at"),
            Some(FieldValue::DateTime(credit.received_at))
        );
        assert_eq!(credit.field("no_such_field"), None);
        assert_eq!(credit.field_set("prisons"), None);
    }

    #[test]
    fn test_sender_membership_field() {
        let sender = Sender {
            id: 3,
            source: "bank_transfer".to_string(),
            sender_name: "Harold Cross".to_string(),
            sender_sort_code: "102938".to_string(),
            sender_account_number: "91715388".to_string(),
            sender_roll_number: String::new(),
            card_number_last_digits: String::new(),
            sender_email: String::new(),
            postcode: String::new(),
            ip_address: String::new(),
            prisons: vec!["BXI".to_string(), "LEI".to_string()],
            prisoner_count: 2,
            prison_count: 2,
            credit_count: 5,
            credit_total: 12_000,
        };
        assert_eq!(
            sender.field_set("prisons"),
            Some(&["BXI".to_string(), "LEI".to_string()][..])
        );
        assert_eq!(sender.field("prisoner_count"), Some(FieldValue::Int(2)));
        assert_eq!(sender.field("credit_total"), Some(FieldValue::Int(12_000)));
    }
}
