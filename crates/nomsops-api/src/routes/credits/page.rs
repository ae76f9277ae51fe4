//! Credits HTML filter page

use axum::extract::{Query, State};
use axum::response::Html;
use std::collections::HashMap;

use crate::{
    choice_select, date_input, filter_form, filter_page, form_section, ordering_select,
    page_response, plain_header, render_chips, sort_header, text_input, AppState,
};
use nomsops_core::{
    choice_label, Credit, QueryState, AMOUNT_PATTERNS, CREDIT_FORM, CREDIT_STATUSES, PRISONS,
    SOURCES,
};
use nomsops_utils::{currency, format_sort_code};

const BASE_PATH: &str = "/filters/credits";

pub async fn page_credits(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let outcome = CREDIT_FORM.apply(&params, state.provider.credits());
    let chips = render_chips(BASE_PATH, &outcome.descriptions);
    let form = render_filter_form(&outcome.query);
    let table = render_results_table(&outcome.query, &outcome.objects);
    let inner = filter_page("Credits", outcome.objects.len(), &chips, &form, &table);
    Html(page_response("Credits", BASE_PATH, &inner))
}

fn render_filter_form(query: &QueryState) -> String {
    let section = |name: &str| CREDIT_FORM.is_section_selected(query, name);
    let sections = vec![
        form_section(
            "Date received",
            section("date"),
            &[
                date_input(query, "received_at__gte", "Received since"),
                date_input(query, "received_at__lt", "Received before"),
            ],
        ),
        form_section(
            "Amount",
            section("amount"),
            &[
                choice_select(query, "amount_pattern", "Amount (£)", AMOUNT_PATTERNS, "Any amount"),
                text_input(query, "amount_exact", "Exact amount", "for example £20 or 20.00"),
                text_input(query, "amount_pence", "Exact number of pence", "0 to 99"),
            ],
        ),
        form_section(
            "Payment source",
            section("source"),
            &[
                choice_select(query, "source", "Payment method", SOURCES, "Any method"),
                text_input(query, "sender_name", "Sender name", ""),
                text_input(query, "sender_sort_code", "Sender sort code", "for example 01-23-45"),
                text_input(query, "sender_account_number", "Sender account number", ""),
                text_input(query, "sender_roll_number", "Sender roll number", ""),
                text_input(query, "card_number_last_digits", "Last 4 digits of card number", ""),
                text_input(query, "sender_email", "Sender email", ""),
                text_input(query, "postcode", "Sender postcode", ""),
                text_input(query, "ip_address", "Sender IP address", ""),
            ],
        ),
        form_section(
            "Prisoner",
            section("prisoner"),
            &[
                text_input(query, "prisoner_number", "Prisoner number", "for example A1234AB"),
                text_input(query, "prisoner_name", "Prisoner name", ""),
            ],
        ),
        form_section(
            "Prison",
            section("prison"),
            &[choice_select(query, "prison", "Prison", PRISONS, "Any prison")],
        ),
        form_section(
            "Status",
            section("status"),
            &[choice_select(query, "status", "Credited status", CREDIT_STATUSES, "Any status")],
        ),
    ];
    filter_form(&sections, &ordering_select(query, CREDIT_FORM.ordering_choices))
}

fn status_badge(status: &str) -> String {
    let class = match status {
        "pending" => "bg-yellow-100 text-yellow-700",
        _ => "bg-green-100 text-green-700",
    };
    format!(
        r#"<span class='px-2 py-0.5 rounded-full text-xs {}'>{}</span>"#,
        class,
        choice_label(CREDIT_STATUSES, status)
    )
}

fn payment_detail(credit: &Credit) -> String {
    if credit.source == "bank_transfer" {
        format!("sort code {}", format_sort_code(&credit.sender_sort_code))
    } else if credit.card_number_last_digits.is_empty() {
        String::new()
    } else {
        format!("card **** {}", credit.card_number_last_digits)
    }
}

fn render_results_table(query: &QueryState, credits: &[Credit]) -> String {
    if credits.is_empty() {
        return r#"<div class='text-center py-12 text-gray-500'><p>No credits match these filters</p></div>"#
            .to_string();
    }

    let headers = [
        sort_header(BASE_PATH, query, "received_at", "Received"),
        sort_header(BASE_PATH, query, "amount", "Amount"),
        plain_header("Prisoner"),
        sort_header(BASE_PATH, query, "prison", "Prison"),
        plain_header("Sender"),
        sort_header(BASE_PATH, query, "status", "Status"),
    ]
    .join("");

    let rows: Vec<String> = credits
        .iter()
        .map(|credit| {
            format!(
                r#"<tr class='hover:bg-gray-50'>
                    <td class='px-3 py-2 text-sm whitespace-nowrap'>{}</td>
                    <td class='px-3 py-2 text-sm font-medium text-right'>{}</td>
                    <td class='px-3 py-2 text-sm'>{}<div class='text-xs text-gray-400'>{}</div></td>
                    <td class='px-3 py-2 text-sm'>{}</td>
                    <td class='px-3 py-2 text-sm'>{}<div class='text-xs text-gray-400'>{} {}</div></td>
                    <td class='px-3 py-2 text-sm'>{}</td>
                </tr>"#,
                credit.received_at.format("%-d %b %Y %H:%M"),
                currency(credit.amount),
                crate::escape_html(&credit.prisoner_name),
                credit.prisoner_number,
                choice_label(PRISONS, &credit.prison),
                crate::escape_html(&credit.sender_name),
                choice_label(SOURCES, &credit.source).to_lowercase(),
                payment_detail(credit),
                status_badge(&credit.status),
            )
        })
        .collect();

    format!(
        r#"<table class='min-w-full divide-y divide-gray-200'><thead class='bg-gray-50'><tr>{}</tr></thead><tbody class='divide-y divide-gray-100'>{}</tbody></table>"#,
        headers,
        rows.join("")
    )
}
