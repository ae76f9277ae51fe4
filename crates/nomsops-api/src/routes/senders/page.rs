//! Payment sources HTML filter page

use axum::extract::{Query, State};
use axum::response::Html;
use std::collections::HashMap;

use crate::{
    choice_select, escape_html, filter_form, filter_page, form_section, ordering_select,
    page_response, plain_header, render_chips, sort_header, text_input, AppState,
};
use nomsops_core::{choice_label, QueryState, Sender, PRISONS, SENDER_FORM, SOURCES};
use nomsops_utils::{currency, format_sort_code};

const BASE_PATH: &str = "/filters/senders";

pub async fn page_senders(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let outcome = SENDER_FORM.apply(&params, state.provider.senders());
    let chips = render_chips(BASE_PATH, &outcome.descriptions);
    let form = render_filter_form(&outcome.query);
    let table = render_results_table(&outcome.query, &outcome.objects);
    let inner = filter_page("Payment sources", outcome.objects.len(), &chips, &form, &table);
    Html(page_response("Payment sources", BASE_PATH, &inner))
}

fn render_filter_form(query: &QueryState) -> String {
    let sections = vec![
        form_section(
            "Payment source",
            SENDER_FORM.is_section_selected(query, "source"),
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
            "Prison",
            SENDER_FORM.is_section_selected(query, "prison"),
            &[choice_select(query, "prison", "Prison", PRISONS, "Any prison")],
        ),
    ];
    filter_form(&sections, &ordering_select(query, SENDER_FORM.ordering_choices))
}

fn payment_detail(sender: &Sender) -> String {
    if sender.source == "bank_transfer" {
        format!(
            "sort code {}, account {}",
            format_sort_code(&sender.sender_sort_code),
            sender.sender_account_number
        )
    } else {
        let mut parts = Vec::new();
        if !sender.card_number_last_digits.is_empty() {
            parts.push(format!("card **** {}", sender.card_number_last_digits));
        }
        if !sender.sender_email.is_empty() {
            parts.push(sender.sender_email.clone());
        }
        parts.join(", ")
    }
}

fn render_results_table(query: &QueryState, senders: &[Sender]) -> String {
    if senders.is_empty() {
        return r#"<div class='text-center py-12 text-gray-500'><p>No payment sources match these filters</p></div>"#
            .to_string();
    }

    let headers = [
        plain_header("Sender"),
        plain_header("Payment method"),
        plain_header("Prisons"),
        sort_header(BASE_PATH, query, "prisoner_count", "Prisoners"),
        sort_header(BASE_PATH, query, "credit_count", "Credits"),
        sort_header(BASE_PATH, query, "credit_total", "Total sent"),
    ]
    .join("");

    let rows: Vec<String> = senders
        .iter()
        .map(|sender| {
            let prisons: Vec<String> = sender
                .prisons
                .iter()
                .map(|prison| choice_label(PRISONS, prison))
                .collect();
            format!(
                r#"<tr class='hover:bg-gray-50'>
                    <td class='px-3 py-2 text-sm'>{}<div class='text-xs text-gray-400'>{}</div></td>
                    <td class='px-3 py-2 text-sm'>{}</td>
                    <td class='px-3 py-2 text-sm'>{}</td>
                    <td class='px-3 py-2 text-sm text-right'>{}</td>
                    <td class='px-3 py-2 text-sm text-right'>{}</td>
                    <td class='px-3 py-2 text-sm font-medium text-right'>{}</td>
                </tr>"#,
                escape_html(&sender.sender_name),
                escape_html(&payment_detail(sender)),
                choice_label(SOURCES, &sender.source),
                prisons.join(", "),
                sender.prisoner_count,
                sender.credit_count,
                currency(sender.credit_total),
            )
        })
        .collect();

    format!(
        r#"<table class='min-w-full divide-y divide-gray-200'><thead class='bg-gray-50'><tr>{}</tr></thead><tbody class='divide-y divide-gray-100'>{}</tbody></table>"#,
        headers,
        rows.join("")
    )
}
