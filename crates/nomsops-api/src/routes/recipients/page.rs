//! Recipients HTML filter page

use axum::extract::{Query, State};
use axum::response::Html;
use std::collections::HashMap;

use crate::{
    choice_select, escape_html, filter_form, filter_page, form_section, ordering_select,
    page_response, plain_header, render_chips, sort_header, text_input, AppState,
};
use nomsops_core::{choice_label, QueryState, Recipient, PRISONS, RECIPIENT_FORM};
use nomsops_utils::currency;

const BASE_PATH: &str = "/filters/recipients";

pub async fn page_recipients(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let outcome = RECIPIENT_FORM.apply(&params, state.provider.recipients());
    let chips = render_chips(BASE_PATH, &outcome.descriptions);
    let form = render_filter_form(&outcome.query);
    let table = render_results_table(&outcome.query, &outcome.objects);
    let inner = filter_page("Recipients", outcome.objects.len(), &chips, &form, &table);
    Html(page_response("Recipients", BASE_PATH, &inner))
}

fn render_filter_form(query: &QueryState) -> String {
    let sections = vec![
        form_section(
            "Recipient",
            RECIPIENT_FORM.is_section_selected(query, "recipient"),
            &[
                text_input(query, "recipient_name", "Recipient name", ""),
                text_input(query, "recipient_email", "Recipient email", ""),
            ],
        ),
        form_section(
            "Prison",
            RECIPIENT_FORM.is_section_selected(query, "prison"),
            &[choice_select(query, "prison", "Prison", PRISONS, "Any prison")],
        ),
    ];
    filter_form(&sections, &ordering_select(query, RECIPIENT_FORM.ordering_choices))
}

fn render_results_table(query: &QueryState, recipients: &[Recipient]) -> String {
    if recipients.is_empty() {
        return r#"<div class='text-center py-12 text-gray-500'><p>No recipients match these filters</p></div>"#
            .to_string();
    }

    let headers = [
        sort_header(BASE_PATH, query, "recipient_name", "Recipient"),
        plain_header("Email"),
        plain_header("Prisons"),
        sort_header(BASE_PATH, query, "prisoner_count", "Prisoners"),
        sort_header(BASE_PATH, query, "disbursement_count", "Disbursements"),
        sort_header(BASE_PATH, query, "disbursement_total", "Total sent"),
    ]
    .join("");

    let rows: Vec<String> = recipients
        .iter()
        .map(|recipient| {
            let prisons: Vec<String> = recipient
                .prisons
                .iter()
                .map(|prison| choice_label(PRISONS, prison))
                .collect();
            format!(
                r#"<tr class='hover:bg-gray-50'>
                    <td class='px-3 py-2 text-sm'>{}</td>
                    <td class='px-3 py-2 text-sm'>{}</td>
                    <td class='px-3 py-2 text-sm'>{}</td>
                    <td class='px-3 py-2 text-sm text-right'>{}</td>
                    <td class='px-3 py-2 text-sm text-right'>{}</td>
                    <td class='px-3 py-2 text-sm font-medium text-right'>{}</td>
                </tr>"#,
                escape_html(&recipient.recipient_name),
                escape_html(&recipient.recipient_email),
                prisons.join(", "),
                recipient.prisoner_count,
                recipient.disbursement_count,
                currency(recipient.disbursement_total),
            )
        })
        .collect();

    format!(
        r#"<table class='min-w-full divide-y divide-gray-200'><thead class='bg-gray-50'><tr>{}</tr></thead><tbody class='divide-y divide-gray-100'>{}</tbody></table>"#,
        headers,
        rows.join("")
    )
}
