//! Disbursements HTML filter page

use axum::extract::{Query, State};
use axum::response::Html;
use std::collections::HashMap;

use crate::{
    choice_select, date_input, escape_html, filter_form, filter_page, form_section,
    ordering_select, page_response, plain_header, render_chips, sort_header, text_input, AppState,
};
use nomsops_core::{
    choice_label, Disbursement, QueryState, AMOUNT_PATTERNS, DISBURSEMENT_FORM,
    DISBURSEMENT_STATUSES, METHODS, PRISONS,
};
use nomsops_utils::{currency, format_sort_code};

const BASE_PATH: &str = "/filters/disbursements";

pub async fn page_disbursements(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let outcome = DISBURSEMENT_FORM.apply(&params, state.provider.disbursements());
    let chips = render_chips(BASE_PATH, &outcome.descriptions);
    let form = render_filter_form(&outcome.query);
    let table = render_results_table(&outcome.query, &outcome.objects);
    let inner = filter_page("Disbursements", outcome.objects.len(), &chips, &form, &table);
    Html(page_response("Disbursements", BASE_PATH, &inner))
}

fn render_filter_form(query: &QueryState) -> String {
    let section = |name: &str| DISBURSEMENT_FORM.is_section_selected(query, name);
    let sections = vec![
        form_section(
            "Date entered",
            section("date"),
            &[
                date_input(query, "created__gte", "Entered since"),
                date_input(query, "created__lt", "Entered before"),
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
            "Sending method",
            section("method"),
            &[
                choice_select(query, "method", "Sending method", METHODS, "Any method"),
                text_input(query, "sort_code", "Sort code", "for example 01-23-45"),
                text_input(query, "account_number", "Account number", ""),
                text_input(query, "roll_number", "Roll number", ""),
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
            "Recipient",
            section("recipient"),
            &[
                text_input(query, "recipient_name", "Recipient name", ""),
                text_input(query, "recipient_email", "Recipient email", ""),
            ],
        ),
        form_section(
            "Status",
            section("status"),
            &[choice_select(query, "status", "Status", DISBURSEMENT_STATUSES, "Any status")],
        ),
    ];
    filter_form(&sections, &ordering_select(query, DISBURSEMENT_FORM.ordering_choices))
}

fn status_badge(status: &str) -> String {
    let class = match status {
        "entered" => "bg-yellow-100 text-yellow-700",
        "confirmed" => "bg-blue-100 text-blue-700",
        _ => "bg-green-100 text-green-700",
    };
    format!(
        r#"<span class='px-2 py-0.5 rounded-full text-xs {}'>{}</span>"#,
        class,
        choice_label(DISBURSEMENT_STATUSES, status)
    )
}

fn method_detail(disbursement: &Disbursement) -> String {
    if disbursement.method == "bank_transfer" {
        format!("sort code {}", format_sort_code(&disbursement.sort_code))
    } else {
        String::new()
    }
}

fn render_results_table(query: &QueryState, disbursements: &[Disbursement]) -> String {
    if disbursements.is_empty() {
        return r#"<div class='text-center py-12 text-gray-500'><p>No disbursements match these filters</p></div>"#
            .to_string();
    }

    let headers = [
        sort_header(BASE_PATH, query, "created", "Entered"),
        sort_header(BASE_PATH, query, "amount", "Amount"),
        plain_header("Prisoner"),
        sort_header(BASE_PATH, query, "prison", "Prison"),
        sort_header(BASE_PATH, query, "recipient_name", "Recipient"),
        plain_header("Method"),
        sort_header(BASE_PATH, query, "status", "Status"),
    ]
    .join("");

    let rows: Vec<String> = disbursements
        .iter()
        .map(|disbursement| {
            format!(
                r#"<tr class='hover:bg-gray-50'>
                    <td class='px-3 py-2 text-sm whitespace-nowrap'>{}</td>
                    <td class='px-3 py-2 text-sm font-medium text-right'>{}</td>
                    <td class='px-3 py-2 text-sm'>{}<div class='text-xs text-gray-400'>{}</div></td>
                    <td class='px-3 py-2 text-sm'>{}</td>
                    <td class='px-3 py-2 text-sm'>{}<div class='text-xs text-gray-400'>{}</div></td>
                    <td class='px-3 py-2 text-sm'>{}<div class='text-xs text-gray-400'>{}</div></td>
                    <td class='px-3 py-2 text-sm'>{}</td>
                </tr>"#,
                disbursement.created.format("%-d %b %Y"),
                currency(disbursement.amount),
                escape_html(&disbursement.prisoner_name),
                disbursement.prisoner_number,
                choice_label(PRISONS, &disbursement.prison),
                escape_html(&disbursement.recipient_name),
                escape_html(&disbursement.recipient_email),
                choice_label(METHODS, &disbursement.method),
                method_detail(disbursement),
                status_badge(&disbursement.status),
            )
        })
        .collect();

    format!(
        r#"<table class='min-w-full divide-y divide-gray-200'><thead class='bg-gray-50'><tr>{}</tr></thead><tbody class='divide-y divide-gray-100'>{}</tbody></table>"#,
        headers,
        rows.join("")
    )
}
