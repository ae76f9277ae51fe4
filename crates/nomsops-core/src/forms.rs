//! The five filter forms, each a statically registered table of fields,
//! resolvers and hooks.
//!
//! Every filter group registers its resolve/describe/predicate logic
//! explicitly in its form table; nothing is discovered at runtime.

use chrono::NaiveDate;
use nomsops_utils::currency;

use crate::fields::{amount_to_pence, FieldKind, FieldSpec};
use crate::filter::{DescribeHook, FilterDescription, FormSpec, PredicateHook, StopFiltering};
use crate::query::QueryState;
use crate::records::{Credit, Disbursement, Prisoner, Recipient, Record, Sender};
use crate::types::{
    choice_label, AMOUNT_PATTERNS, CREDIT_STATUSES, DISBURSEMENT_STATUSES, METHODS, PRISONS,
    SOURCES,
};

// ==================== Shared Hook Logic ====================

fn format_chip_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Describe an active date range as one chip covering both bounds
fn describe_date_range(
    query: &QueryState,
    gte_field: &'static str,
    lt_field: &'static str,
    verb: &str,
    out: &mut Vec<FilterDescription>,
) {
    let since = query.date(gte_field);
    let before = query.date(lt_field);
    let label = match (since, before) {
        (Some(since), Some(before)) => format!(
            "{} between {} and {}",
            verb,
            format_chip_date(since),
            format_chip_date(before)
        ),
        (Some(since), None) => format!("{} since {}", verb, format_chip_date(since)),
        (None, Some(before)) => format!("{} before {}", verb, format_chip_date(before)),
        (None, None) => return,
    };
    out.push(FilterDescription {
        label,
        removal_query: query.query_string_without(&[gte_field, lt_field]),
    });
}

/// Describe an active choice field as `prefix: label`
fn describe_choice(
    query: &QueryState,
    field: &'static str,
    prefix: &str,
    choices: crate::types::Choices,
    lowercase: bool,
    out: &mut Vec<FilterDescription>,
) {
    let Some(key) = query.text(field) else { return };
    let mut label = choice_label(choices, key);
    if lowercase {
        label = label.to_lowercase();
    }
    out.push(FilterDescription {
        label: format!("{}: {}", prefix, label),
        removal_query: query.query_string_without(&[field]),
    });
}

/// Reject the record unless the named date-bearing field falls inside
/// the submitted bounds (both bounds inclusive of their own date)
fn date_range_test<R: Record>(
    query: &QueryState,
    record: &R,
    gte_field: &str,
    lt_field: &str,
    field: &str,
) -> Result<(), StopFiltering> {
    let Some(recorded) = record.field(field).and_then(|value| value.as_date()) else {
        return Ok(());
    };
    if let Some(since) = query.date(gte_field) {
        if recorded < since {
            return Err(StopFiltering);
        }
    }
    if let Some(before) = query.date(lt_field) {
        if recorded > before {
            return Err(StopFiltering);
        }
    }
    Ok(())
}

/// Case-insensitive substring match on a text field
fn contains_test<R: Record>(
    query: &QueryState,
    record: &R,
    field: &str,
) -> Result<(), StopFiltering> {
    let Some(needle) = query.text(field) else {
        return Ok(());
    };
    let haystack = record
        .field(field)
        .and_then(|value| value.as_text().map(str::to_string))
        .unwrap_or_default();
    if haystack.to_uppercase().contains(&needle.to_uppercase()) {
        Ok(())
    } else {
        Err(StopFiltering)
    }
}

/// Amount-pattern predicate: keeps records whose amount matches the
/// selected pattern's label
fn amount_pattern_filter<R: Record>(query: &QueryState, record: &R) -> Result<(), StopFiltering> {
    let Some(pattern) = query.text("amount_pattern") else {
        return Ok(());
    };
    let Some(amount) = record.field("amount").and_then(|value| value.as_int()) else {
        return Ok(());
    };
    let keep = match pattern {
        "not_integral" => amount % 100 != 0,
        "not_multiple_5" => amount % 500 != 0,
        "not_multiple_10" => amount % 1000 != 0,
        "gte_100" => amount >= 10_000,
        "exact" => query
            .text("amount_exact")
            .map(amount_to_pence)
            .is_some_and(|pence| amount == pence),
        "pence" => query.int("amount_pence").is_some_and(|pence| amount % 100 == pence),
        _ => true,
    };
    if keep {
        Ok(())
    } else {
        Err(StopFiltering)
    }
}

/// Membership test for aggregate records carrying a set of prisons
fn prison_membership_filter<R: Record>(query: &QueryState, record: &R) -> Result<(), StopFiltering> {
    let Some(prison) = query.text("prison") else {
        return Ok(());
    };
    let member = record
        .field_set("prisons")
        .is_some_and(|prisons| prisons.iter().any(|p| p == prison));
    if member {
        Ok(())
    } else {
        Err(StopFiltering)
    }
}

fn prisoner_name_filter<R: Record>(query: &QueryState, record: &R) -> Result<(), StopFiltering> {
    contains_test(query, record, "prisoner_name")
}

fn sender_name_filter<R: Record>(query: &QueryState, record: &R) -> Result<(), StopFiltering> {
    contains_test(query, record, "sender_name")
}

fn sender_email_filter<R: Record>(query: &QueryState, record: &R) -> Result<(), StopFiltering> {
    contains_test(query, record, "sender_email")
}

fn postcode_filter<R: Record>(query: &QueryState, record: &R) -> Result<(), StopFiltering> {
    contains_test(query, record, "postcode")
}

fn recipient_name_filter<R: Record>(query: &QueryState, record: &R) -> Result<(), StopFiltering> {
    contains_test(query, record, "recipient_name")
}

fn recipient_email_filter<R: Record>(query: &QueryState, record: &R) -> Result<(), StopFiltering> {
    contains_test(query, record, "recipient_email")
}

// ==================== Cross-field Resolvers ====================

/// Bank-transfer details only apply to bank transfers, card digits only
/// to card payments; values for the unselected source are discarded
fn resolve_sender_payment_fields(query: &mut QueryState) {
    if query.text("source") != Some("bank_transfer") {
        query.remove("sender_sort_code");
        query.remove("sender_account_number");
        query.remove("sender_roll_number");
    }
    if query.text("source") != Some("online") {
        query.remove("card_number_last_digits");
    }
}

/// The exact/pence sub-fields are gated by the selected pattern, and a
/// pattern that requires a missing sub-field is itself dropped
fn resolve_amount_fields(query: &mut QueryState) {
    match query.text("amount_pattern") {
        Some("exact") => {
            query.remove("amount_pence");
            if !query.is_active("amount_exact") {
                query.remove("amount_pattern");
            }
        }
        Some("pence") => {
            query.remove("amount_exact");
            if !query.is_active("amount_pence") {
                query.remove("amount_pattern");
            }
        }
        _ => {
            query.remove("amount_exact");
            query.remove("amount_pence");
        }
    }
}

/// Recipient bank details only apply to bank-transfer disbursements
fn resolve_recipient_bank_fields(query: &mut QueryState) {
    if query.text("method") != Some("bank_transfer") {
        query.remove("sort_code");
        query.remove("account_number");
        query.remove("roll_number");
    }
}

// ==================== Describe Hooks ====================

fn describe_received_at(query: &QueryState, out: &mut Vec<FilterDescription>) {
    describe_date_range(query, "received_at__gte", "received_at__lt", "Received", out);
}

fn describe_created(query: &QueryState, out: &mut Vec<FilterDescription>) {
    describe_date_range(query, "created__gte", "created__lt", "Entered", out);
}

fn describe_amount(query: &QueryState, out: &mut Vec<FilterDescription>) {
    let Some(pattern) = query.text("amount_pattern") else {
        return;
    };
    let label = match pattern {
        "exact" => {
            let pence = query.text("amount_exact").map(amount_to_pence).unwrap_or(0);
            format!("exactly {}", currency(pence))
        }
        "pence" => format!("exactly {} pence", query.int("amount_pence").unwrap_or(0)),
        other => choice_label(AMOUNT_PATTERNS, other).to_lowercase(),
    };
    out.push(FilterDescription {
        label: format!("Amount: {}", label),
        removal_query: query.query_string_without(&[
            "amount_pattern",
            "amount_exact",
            "amount_pence",
        ]),
    });
}

fn describe_credit_status(query: &QueryState, out: &mut Vec<FilterDescription>) {
    describe_choice(query, "status", "Status", CREDIT_STATUSES, true, out);
}

fn describe_disbursement_status(query: &QueryState, out: &mut Vec<FilterDescription>) {
    describe_choice(query, "status", "Status", DISBURSEMENT_STATUSES, true, out);
}

fn describe_source(query: &QueryState, out: &mut Vec<FilterDescription>) {
    describe_choice(query, "source", "Payment method", SOURCES, true, out);
}

fn describe_method(query: &QueryState, out: &mut Vec<FilterDescription>) {
    describe_choice(query, "method", "Sending method", METHODS, true, out);
}

fn describe_prison(query: &QueryState, out: &mut Vec<FilterDescription>) {
    describe_choice(query, "prison", "Prison", PRISONS, false, out);
}

// ==================== Credits ====================

pub static CREDIT_FORM: FormSpec<Credit> = FormSpec {
    name: "credits",
    fields: &[
        FieldSpec::new("received_at__gte", "Received since", FieldKind::Date),
        FieldSpec::new("received_at__lt", "Received before", FieldKind::Date),
        FieldSpec::new("status", "Credited status", FieldKind::Choice(CREDIT_STATUSES)),
        FieldSpec::new("amount_pattern", "Amount (£)", FieldKind::Choice(AMOUNT_PATTERNS)),
        FieldSpec::new("amount_exact", "Exact amount", FieldKind::Amount),
        FieldSpec::new(
            "amount_pence",
            "Exact number of pence",
            FieldKind::BoundedInt { min: 0, max: 99 },
        ),
        FieldSpec::new("prisoner_number", "Prisoner number", FieldKind::PrisonerNumber),
        FieldSpec::new("prisoner_name", "Prisoner name", FieldKind::Text),
        FieldSpec::new("prison", "Prison", FieldKind::Choice(PRISONS)),
        FieldSpec::new("source", "Payment method", FieldKind::Choice(SOURCES)),
        FieldSpec::new("sender_name", "Sender name", FieldKind::Text),
        FieldSpec::new("sender_sort_code", "Sender sort code", FieldKind::SortCode),
        FieldSpec::new("sender_account_number", "Sender account number", FieldKind::Text),
        FieldSpec::new("sender_roll_number", "Sender roll number", FieldKind::Text),
        FieldSpec::new(
            "card_number_last_digits",
            "Last 4 digits of card number",
            FieldKind::Text,
        ),
        FieldSpec::new("sender_email", "Sender email", FieldKind::Email),
        FieldSpec::new("postcode", "Sender postcode", FieldKind::Text),
        FieldSpec::new("ip_address", "Sender IP address", FieldKind::IpAddress),
    ],
    ordering_choices: &[
        ("received_at", "Received date (oldest to newest)"),
        ("-received_at", "Received date (newest to oldest)"),
        ("amount", "Amount sent (low to high)"),
        ("-amount", "Amount sent (high to low)"),
        ("source", "Payment source (A to Z)"),
        ("-source", "Payment source (Z to A)"),
        ("prison", "Prison (A to Z)"),
        ("-prison", "Prison (Z to A)"),
        ("prisoner_name", "Prisoner name (A to Z)"),
        ("-prisoner_name", "Prisoner name (Z to A)"),
        ("prisoner_number", "Prisoner number (A to Z)"),
        ("-prisoner_number", "Prisoner number (Z to A)"),
        ("status", "Status (A to Z)"),
        ("-status", "Status (Z to A)"),
    ],
    default_ordering: "-received_at",
    resolvers: &[resolve_amount_fields, resolve_sender_payment_fields],
    describers: &[
        DescribeHook {
            claims: &["received_at__gte", "received_at__lt"],
            describe: describe_received_at,
        },
        DescribeHook {
            claims: &["amount_pattern", "amount_exact", "amount_pence"],
            describe: describe_amount,
        },
        DescribeHook {
            claims: &["status"],
            describe: describe_credit_status,
        },
        DescribeHook {
            claims: &["source"],
            describe: describe_source,
        },
        DescribeHook {
            claims: &["prison"],
            describe: describe_prison,
        },
    ],
    predicates: &[
        PredicateHook {
            handles: &["received_at__gte", "received_at__lt"],
            test: credit_received_at_filter,
        },
        PredicateHook {
            handles: &["amount_pattern", "amount_exact", "amount_pence"],
            test: amount_pattern_filter::<Credit>,
        },
        PredicateHook {
            handles: &["prisoner_name"],
            test: prisoner_name_filter::<Credit>,
        },
        PredicateHook {
            handles: &["sender_name"],
            test: sender_name_filter::<Credit>,
        },
        PredicateHook {
            handles: &["sender_email"],
            test: sender_email_filter::<Credit>,
        },
        PredicateHook {
            handles: &["postcode"],
            test: postcode_filter::<Credit>,
        },
    ],
    sections: &[
        ("date", &["received_at__gte", "received_at__lt"]),
        ("amount", &["amount_pattern", "amount_exact", "amount_pence"]),
        (
            "source",
            &[
                "source",
                "sender_name",
                "sender_sort_code",
                "sender_account_number",
                "sender_roll_number",
                "card_number_last_digits",
                "sender_email",
                "postcode",
                "ip_address",
            ],
        ),
        ("prisoner", &["prisoner_number", "prisoner_name"]),
        ("prison", &["prison"]),
        ("status", &["status"]),
    ],
};

fn credit_received_at_filter(query: &QueryState, credit: &Credit) -> Result<(), StopFiltering> {
    date_range_test(
        query,
        credit,
        "received_at__gte",
        "received_at__lt",
        "received_at",
    )
}

// ==================== Senders ====================

pub static SENDER_FORM: FormSpec<Sender> = FormSpec {
    name: "senders",
    fields: &[
        FieldSpec::new("source", "Payment method", FieldKind::Choice(SOURCES)),
        FieldSpec::new("sender_name", "Sender name", FieldKind::Text),
        FieldSpec::new("sender_sort_code", "Sender sort code", FieldKind::SortCode),
        FieldSpec::new("sender_account_number", "Sender account number", FieldKind::Text),
        FieldSpec::new("sender_roll_number", "Sender roll number", FieldKind::Text),
        FieldSpec::new(
            "card_number_last_digits",
            "Last 4 digits of card number",
            FieldKind::Text,
        ),
        FieldSpec::new("sender_email", "Sender email", FieldKind::Email),
        FieldSpec::new("postcode", "Sender postcode", FieldKind::Text),
        FieldSpec::new("ip_address", "Sender IP address", FieldKind::IpAddress),
        FieldSpec::new("prison", "Prison", FieldKind::Choice(PRISONS)),
    ],
    ordering_choices: &[
        ("prisoner_count", "Number of prisoners (low to high)"),
        ("-prisoner_count", "Number of prisoners (high to low)"),
        ("prison_count", "Number of prisons (low to high)"),
        ("-prison_count", "Number of prisons (high to low)"),
        ("credit_count", "Number of credits (low to high)"),
        ("-credit_count", "Number of credits (high to low)"),
        ("credit_total", "Total sent (low to high)"),
        ("-credit_total", "Total sent (high to low)"),
    ],
    default_ordering: "-prisoner_count",
    resolvers: &[resolve_sender_payment_fields],
    describers: &[
        DescribeHook {
            claims: &["source"],
            describe: describe_source,
        },
        DescribeHook {
            claims: &["prison"],
            describe: describe_prison,
        },
    ],
    predicates: &[
        PredicateHook {
            handles: &["sender_name"],
            test: sender_name_filter::<Sender>,
        },
        PredicateHook {
            handles: &["sender_email"],
            test: sender_email_filter::<Sender>,
        },
        PredicateHook {
            handles: &["postcode"],
            test: postcode_filter::<Sender>,
        },
        PredicateHook {
            handles: &["prison"],
            test: prison_membership_filter::<Sender>,
        },
    ],
    sections: &[
        (
            "source",
            &[
                "source",
                "sender_name",
                "sender_sort_code",
                "sender_account_number",
                "sender_roll_number",
                "card_number_last_digits",
                "sender_email",
                "postcode",
                "ip_address",
            ],
        ),
        ("prison", &["prison"]),
    ],
};

// ==================== Prisoners ====================

pub static PRISONER_FORM: FormSpec<Prisoner> = FormSpec {
    name: "prisoners",
    fields: &[
        FieldSpec::new("prisoner_number", "Prisoner number", FieldKind::PrisonerNumber),
        FieldSpec::new("prisoner_name", "Prisoner name", FieldKind::Text),
        FieldSpec::new("prison", "Prison", FieldKind::Choice(PRISONS)),
    ],
    ordering_choices: &[
        ("sender_count", "Number of senders (low to high)"),
        ("-sender_count", "Number of senders (high to low)"),
        ("credit_count", "Number of credits (low to high)"),
        ("-credit_count", "Number of credits (high to low)"),
        ("credit_total", "Total received (low to high)"),
        ("-credit_total", "Total received (high to low)"),
        ("prisoner_name", "Prisoner name (A to Z)"),
        ("-prisoner_name", "Prisoner name (Z to A)"),
        ("prisoner_number", "Prisoner number (A to Z)"),
        ("-prisoner_number", "Prisoner number (Z to A)"),
    ],
    default_ordering: "-sender_count",
    resolvers: &[],
    describers: &[DescribeHook {
        claims: &["prison"],
        describe: describe_prison,
    }],
    predicates: &[PredicateHook {
        handles: &["prisoner_name"],
        test: prisoner_name_filter::<Prisoner>,
    }],
    sections: &[
        ("prisoner", &["prisoner_number", "prisoner_name"]),
        ("prison", &["prison"]),
    ],
};

// ==================== Disbursements ====================

pub static DISBURSEMENT_FORM: FormSpec<Disbursement> = FormSpec {
    name: "disbursements",
    fields: &[
        FieldSpec::new("created__gte", "Entered since", FieldKind::Date),
        FieldSpec::new("created__lt", "Entered before", FieldKind::Date),
        FieldSpec::new("status", "Status", FieldKind::Choice(DISBURSEMENT_STATUSES)),
        FieldSpec::new("method", "Sending method", FieldKind::Choice(METHODS)),
        FieldSpec::new("amount_pattern", "Amount (£)", FieldKind::Choice(AMOUNT_PATTERNS)),
        FieldSpec::new("amount_exact", "Exact amount", FieldKind::Amount),
        FieldSpec::new(
            "amount_pence",
            "Exact number of pence",
            FieldKind::BoundedInt { min: 0, max: 99 },
        ),
        FieldSpec::new("prisoner_number", "Prisoner number", FieldKind::PrisonerNumber),
        FieldSpec::new("prisoner_name", "Prisoner name", FieldKind::Text),
        FieldSpec::new("prison", "Prison", FieldKind::Choice(PRISONS)),
        FieldSpec::new("recipient_name", "Recipient name", FieldKind::Text),
        FieldSpec::new("recipient_email", "Recipient email", FieldKind::Email),
        FieldSpec::new("sort_code", "Sort code", FieldKind::SortCode),
        FieldSpec::new("account_number", "Account number", FieldKind::Text),
        FieldSpec::new("roll_number", "Roll number", FieldKind::Text),
    ],
    ordering_choices: &[
        ("created", "Date entered (oldest to newest)"),
        ("-created", "Date entered (newest to oldest)"),
        ("amount", "Amount sent (low to high)"),
        ("-amount", "Amount sent (high to low)"),
        ("prison", "Prison (A to Z)"),
        ("-prison", "Prison (Z to A)"),
        ("prisoner_name", "Prisoner name (A to Z)"),
        ("-prisoner_name", "Prisoner name (Z to A)"),
        ("prisoner_number", "Prisoner number (A to Z)"),
        ("-prisoner_number", "Prisoner number (Z to A)"),
        ("recipient_name", "Recipient name (A to Z)"),
        ("-recipient_name", "Recipient name (Z to A)"),
        ("status", "Status (A to Z)"),
        ("-status", "Status (Z to A)"),
    ],
    default_ordering: "-created",
    resolvers: &[resolve_amount_fields, resolve_recipient_bank_fields],
    describers: &[
        DescribeHook {
            claims: &["created__gte", "created__lt"],
            describe: describe_created,
        },
        DescribeHook {
            claims: &["amount_pattern", "amount_exact", "amount_pence"],
            describe: describe_amount,
        },
        DescribeHook {
            claims: &["status"],
            describe: describe_disbursement_status,
        },
        DescribeHook {
            claims: &["method"],
            describe: describe_method,
        },
        DescribeHook {
            claims: &["prison"],
            describe: describe_prison,
        },
    ],
    predicates: &[
        PredicateHook {
            handles: &["created__gte", "created__lt"],
            test: disbursement_created_filter,
        },
        PredicateHook {
            handles: &["amount_pattern", "amount_exact", "amount_pence"],
            test: amount_pattern_filter::<Disbursement>,
        },
        PredicateHook {
            handles: &["prisoner_name"],
            test: prisoner_name_filter::<Disbursement>,
        },
        PredicateHook {
            handles: &["recipient_name"],
            test: recipient_name_filter::<Disbursement>,
        },
        PredicateHook {
            handles: &["recipient_email"],
            test: recipient_email_filter::<Disbursement>,
        },
    ],
    sections: &[
        ("date", &["created__gte", "created__lt"]),
        ("amount", &["amount_pattern", "amount_exact", "amount_pence"]),
        ("method", &["method", "sort_code", "account_number", "roll_number"]),
        ("prisoner", &["prisoner_number", "prisoner_name"]),
        ("prison", &["prison"]),
        ("recipient", &["recipient_name", "recipient_email"]),
        ("status", &["status"]),
    ],
};

fn disbursement_created_filter(
    query: &QueryState,
    disbursement: &Disbursement,
) -> Result<(), StopFiltering> {
    date_range_test(query, disbursement, "created__gte", "created__lt", "created")
}

// ==================== Recipients ====================

pub static RECIPIENT_FORM: FormSpec<Recipient> = FormSpec {
    name: "recipients",
    fields: &[
        FieldSpec::new("recipient_name", "Recipient name", FieldKind::Text),
        FieldSpec::new("recipient_email", "Recipient email", FieldKind::Email),
        FieldSpec::new("prison", "Prison", FieldKind::Choice(PRISONS)),
    ],
    ordering_choices: &[
        ("prisoner_count", "Number of prisoners (low to high)"),
        ("-prisoner_count", "Number of prisoners (high to low)"),
        ("prison_count", "Number of prisons (low to high)"),
        ("-prison_count", "Number of prisons (high to low)"),
        ("disbursement_count", "Number of disbursements (low to high)"),
        ("-disbursement_count", "Number of disbursements (high to low)"),
        ("disbursement_total", "Total sent (low to high)"),
        ("-disbursement_total", "Total sent (high to low)"),
        ("recipient_name", "Recipient name (A to Z)"),
        ("-recipient_name", "Recipient name (Z to A)"),
    ],
    default_ordering: "-disbursement_count",
    resolvers: &[],
    describers: &[DescribeHook {
        claims: &["prison"],
        describe: describe_prison,
    }],
    predicates: &[
        PredicateHook {
            handles: &["recipient_name"],
            test: recipient_name_filter::<Recipient>,
        },
        PredicateHook {
            handles: &["recipient_email"],
            test: recipient_email_filter::<Recipient>,
        },
        PredicateHook {
            handles: &["prison"],
            test: prison_membership_filter::<Recipient>,
        },
    ],
    sections: &[
        ("recipient", &["recipient_name", "recipient_email"]),
        ("prison", &["prison"]),
    ],
};

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn credit(
        id: i64,
        day: u32,
        status: &str,
        amount: i64,
        prisoner_name: &str,
        source: &str,
    ) -> Credit {
        Credit {
            id,
            received_at: date(2018, 2, day).and_hms_opt(12, 0, 0).unwrap(),
            status: status.to_string(),
            amount,
            prison: if id % 2 == 0 { "BXI" } else { "LEI" }.to_string(),
            prisoner_name: prisoner_name.to_string(),
            prisoner_number: format!("A140{}AE", id),
            source: source.to_string(),
            sender_name: "Mary Stevenson".to_string(),
            sender_sort_code: if source == "bank_transfer" {
                "102938".to_string()
            } else {
                String::new()
            },
            sender_account_number: String::new(),
            sender_roll_number: String::new(),
            card_number_last_digits: String::new(),
            sender_email: "mary@example.com".to_string(),
            postcode: "SW1A 1AA".to_string(),
            ip_address: "151.101.16.144".to_string(),
        }
    }

    fn credits() -> Vec<Credit> {
        vec![
            credit(0, 13, "credited", 2500, "JAMES HALLS", "online"),
            credit(1, 14, "pending", 3000, "ARTHUR BENNET", "online"),
            credit(2, 10, "credited", 1050, "JAMES HALLS", "bank_transfer"),
            credit(3, 12, "credited", 10_000, "FRED SMITH", "online"),
            credit(4, 11, "pending", 2550, "WILLIAM KEYS", "online"),
        ]
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_no_params_full_list_newest_first() {
        let outcome = CREDIT_FORM.apply(&params(&[]), &credits());
        assert_eq!(outcome.objects.len(), 5);
        let days: Vec<u32> = outcome
            .objects
            .iter()
            .map(|c| {
                use chrono::Datelike;
                c.received_at.date().day()
            })
            .collect();
        assert_eq!(days, vec![14, 13, 12, 11, 10]);
        assert!(outcome.descriptions.is_empty());
    }

    #[test]
    fn test_status_filter() {
        let outcome = CREDIT_FORM.apply(&params(&[("status", "pending")]), &credits());
        assert_eq!(outcome.objects.len(), 2);
        assert!(outcome.objects.iter().all(|c| c.status == "pending"));
        assert_eq!(outcome.descriptions[0].label, "Status: pending");
    }

    #[test]
    fn test_exact_amount_filter() {
        let outcome = CREDIT_FORM.apply(
            &params(&[
                ("status", "pending"),
                ("amount_pattern", "exact"),
                ("amount_exact", "£25.50"),
            ]),
            &credits(),
        );
        assert_eq!(outcome.objects.len(), 1);
        assert_eq!(outcome.objects[0].amount, 2550);
    }

    #[test]
    fn test_exact_amount_without_value_drops_pattern() {
        let outcome = CREDIT_FORM.apply(&params(&[("amount_pattern", "exact")]), &credits());
        assert_eq!(outcome.objects.len(), 5);
        assert!(!outcome.query.is_active("amount_pattern"));
        assert!(outcome.descriptions.is_empty());
    }

    #[test]
    fn test_pence_filter() {
        let outcome = CREDIT_FORM.apply(
            &params(&[("amount_pattern", "pence"), ("amount_pence", "50")]),
            &credits(),
        );
        assert_eq!(outcome.objects.len(), 2);
        assert!(outcome.objects.iter().all(|c| c.amount % 100 == 50));
        assert_eq!(outcome.descriptions[0].label, "Amount: exactly 50 pence");
    }

    #[test]
    fn test_not_integral_keeps_broken_amounts() {
        let outcome = CREDIT_FORM.apply(&params(&[("amount_pattern", "not_integral")]), &credits());
        assert!(outcome.objects.iter().all(|c| c.amount % 100 != 0));
        assert_eq!(outcome.objects.len(), 2);
        assert_eq!(
            outcome.descriptions[0].label,
            "Amount: not a whole number"
        );
    }

    #[test]
    fn test_gte_100_keeps_large_amounts() {
        let outcome = CREDIT_FORM.apply(&params(&[("amount_pattern", "gte_100")]), &credits());
        assert_eq!(outcome.objects.len(), 1);
        assert_eq!(outcome.objects[0].amount, 10_000);
    }

    #[test]
    fn test_invalid_prisoner_number_is_ignored() {
        let outcome = CREDIT_FORM.apply(&params(&[("prisoner_number", "wrong!")]), &credits());
        assert_eq!(outcome.objects.len(), 5);
        assert!(outcome.descriptions.is_empty());
    }

    #[test]
    fn test_prisoner_number_uppercased_exact_match() {
        let outcome = CREDIT_FORM.apply(&params(&[("prisoner_number", "a1400ae")]), &credits());
        assert_eq!(outcome.objects.len(), 1);
        assert_eq!(outcome.objects[0].prisoner_number, "A1400AE");
        assert_eq!(
            outcome.descriptions[0].label,
            "Prisoner number: A1400AE"
        );
    }

    #[test]
    fn test_prisoner_name_substring_case_insensitive() {
        let outcome = CREDIT_FORM.apply(&params(&[("prisoner_name", "james")]), &credits());
        assert_eq!(outcome.objects.len(), 2);
        assert!(outcome
            .objects
            .iter()
            .all(|c| c.prisoner_name.contains("JAMES")));
    }

    #[test]
    fn test_sort_code_gated_by_source() {
        // without source=bank_transfer the sort code is discarded
        let ungated = CREDIT_FORM.apply(&params(&[("sender_sort_code", "10-29-38")]), &credits());
        assert_eq!(ungated.objects.len(), 5);
        assert!(!ungated.query.is_active("sender_sort_code"));

        let gated = CREDIT_FORM.apply(
            &params(&[("source", "bank_transfer"), ("sender_sort_code", "10-29-38")]),
            &credits(),
        );
        assert_eq!(gated.objects.len(), 1);
        assert_eq!(gated.objects[0].source, "bank_transfer");
    }

    #[test]
    fn test_date_range_filter_and_description() {
        let outcome = CREDIT_FORM.apply(
            &params(&[
                ("received_at__gte", "2018-02-11"),
                ("received_at__lt", "2018-02-13"),
            ]),
            &credits(),
        );
        assert_eq!(outcome.objects.len(), 3);
        assert_eq!(
            outcome.descriptions[0].label,
            "Received between 11 Feb 2018 and 13 Feb 2018"
        );
        assert_eq!(outcome.descriptions[0].removal_query, "");
    }

    #[test]
    fn test_split_date_equivalent_to_combined() {
        let combined = CREDIT_FORM.parse_query(&params(&[("received_at__gte", "2018-02-11")]));
        let split = CREDIT_FORM.parse_query(&params(&[
            ("received_at__gte_0", "11"),
            ("received_at__gte_1", "2"),
            ("received_at__gte_2", "2018"),
        ]));
        assert_eq!(
            combined.date("received_at__gte"),
            split.date("received_at__gte")
        );
        assert_eq!(combined.date("received_at__gte"), Some(date(2018, 2, 11)));
    }

    #[test]
    fn test_removal_query_keeps_other_filters() {
        let outcome = CREDIT_FORM.apply(
            &params(&[("status", "pending"), ("prison", "LEI"), ("ordering", "amount")]),
            &credits(),
        );
        let status_chip = outcome
            .descriptions
            .iter()
            .find(|d| d.label.starts_with("Status"))
            .unwrap();
        assert_eq!(status_chip.removal_query, "prison=LEI&ordering=amount");
    }

    #[test]
    fn test_sender_prison_membership() {
        let sender = Sender {
            id: 0,
            source: "online".to_string(),
            sender_name: "Mary Stevenson".to_string(),
            sender_sort_code: String::new(),
            sender_account_number: String::new(),
            sender_roll_number: String::new(),
            card_number_last_digits: "1028".to_string(),
            sender_email: "mary@example.com".to_string(),
            postcode: "SW1A 1AA".to_string(),
            ip_address: "151.101.16.144".to_string(),
            prisons: vec!["BXI".to_string()],
            prisoner_count: 1,
            prison_count: 1,
            credit_count: 2,
            credit_total: 5000,
        };
        let mut other = sender.clone();
        other.id = 1;
        other.sender_name = "Harold Cross".to_string();
        other.prisons = vec!["LEI".to_string()];
        let senders = vec![sender, other];

        let outcome = SENDER_FORM.apply(&params(&[("prison", "BXI")]), &senders);
        assert_eq!(outcome.objects.len(), 1);
        assert_eq!(outcome.objects[0].sender_name, "Mary Stevenson");
        assert_eq!(outcome.descriptions[0].label, "Prison: HMP Brixton");
    }

    #[test]
    fn test_disbursement_method_gating_and_range() {
        let disbursement = |id: i64, day: u32, method: &str, amount: i64| Disbursement {
            id,
            created: date(2018, 3, day).and_hms_opt(10, 0, 0).unwrap(),
            method: method.to_string(),
            status: "entered".to_string(),
            amount,
            prison: "BXI".to_string(),
            prisoner_name: "JAMES HALLS".to_string(),
            prisoner_number: "A1409AE".to_string(),
            recipient_name: "Jilly Black".to_string(),
            recipient_email: "jilly@example.com".to_string(),
            sort_code: if method == "bank_transfer" {
                "203040".to_string()
            } else {
                String::new()
            },
            account_number: String::new(),
            roll_number: String::new(),
        };
        let disbursements = vec![
            disbursement(0, 1, "cheque", 2000),
            disbursement(1, 5, "bank_transfer", 3000),
            disbursement(2, 9, "bank_transfer", 4000),
        ];

        // sort_code ignored without method=bank_transfer
        let ungated = DISBURSEMENT_FORM.apply(&params(&[("sort_code", "20-30-40")]), &disbursements);
        assert_eq!(ungated.objects.len(), 3);

        let outcome = DISBURSEMENT_FORM.apply(
            &params(&[("method", "bank_transfer"), ("created__gte", "2018-03-06")]),
            &disbursements,
        );
        assert_eq!(outcome.objects.len(), 1);
        assert_eq!(outcome.objects[0].id, 2);
        let labels: Vec<_> = outcome
            .descriptions
            .iter()
            .map(|d| d.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec!["Entered since 6 Mar 2018", "Sending method: bank transfer"]
        );
    }

    #[test]
    fn test_recipient_default_ordering() {
        let recipient = |id: i64, name: &str, count: usize| Recipient {
            id,
            recipient_name: name.to_string(),
            recipient_email: format!("{}@example.com", id),
            prisons: vec!["BXI".to_string()],
            prisoner_count: 1,
            prison_count: 1,
            disbursement_count: count,
            disbursement_total: count as i64 * 1000,
        };
        let recipients = vec![
            recipient(0, "Alice Aston", 2),
            recipient(1, "Bert Yardley", 5),
            recipient(2, "Cleo Marsh", 3),
        ];
        let outcome = RECIPIENT_FORM.apply(&params(&[]), &recipients);
        let counts: Vec<_> = outcome
            .objects
            .iter()
            .map(|r| r.disbursement_count)
            .collect();
        assert_eq!(counts, vec![5, 3, 2]);
    }

    #[test]
    fn test_round_trip_field_value() {
        let all = CREDIT_FORM.apply(&params(&[]), &credits());
        let sample = all.objects[2].clone();
        let outcome = CREDIT_FORM.apply(&params(&[("status", &sample.status)]), &credits());
        assert!(outcome.objects.iter().any(|c| c.id == sample.id));
    }
}
