//! Prisoners HTML filter page

use axum::extract::{Query, State};
use axum::response::Html;
use std::collections::HashMap;

use crate::{
    choice_select, escape_html, filter_form, filter_page, form_section, ordering_select,
    page_response, render_chips, sort_header, text_input, AppState,
};
use nomsops_core::{choice_label, Prisoner, QueryState, PRISONER_FORM, PRISONS};
use nomsops_utils::currency;

const BASE_PATH: &str = "/filters/prisoners";

pub async fn page_prisoners(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let outcome = PRISONER_FORM.apply(&params, state.provider.prisoners());
    let chips = render_chips(BASE_PATH, &outcome.descriptions);
    let form = render_filter_form(&outcome.query);
    let table = render_results_table(&outcome.query, &outcome.objects);
    let inner = filter_page("Prisoners", outcome.objects.len(), &chips, &form, &table);
    Html(page_response("Prisoners", BASE_PATH, &inner))
}

fn render_filter_form(query: &QueryState) -> String {
    let sections = vec![
        form_section(
            "Prisoner",
            PRISONER_FORM.is_section_selected(query, "prisoner"),
            &[
                text_input(query, "prisoner_number", "Prisoner number", "for example A1234AB"),
                text_input(query, "prisoner_name", "Prisoner name", ""),
            ],
        ),
        form_section(
            "Prison",
            PRISONER_FORM.is_section_selected(query, "prison"),
            &[choice_select(query, "prison", "Prison", PRISONS, "Any prison")],
        ),
    ];
    filter_form(&sections, &ordering_select(query, PRISONER_FORM.ordering_choices))
}

fn render_results_table(query: &QueryState, prisoners: &[Prisoner]) -> String {
    if prisoners.is_empty() {
        return r#"<div class='text-center py-12 text-gray-500'><p>No prisoners match these filters</p></div>"#
            .to_string();
    }

    let headers = [
        sort_header(BASE_PATH, query, "prisoner_number", "Number"),
        sort_header(BASE_PATH, query, "prisoner_name", "Name"),
        crate::plain_header("Prison"),
        sort_header(BASE_PATH, query, "sender_count", "Senders"),
        sort_header(BASE_PATH, query, "credit_count", "Credits"),
        sort_header(BASE_PATH, query, "credit_total", "Total received"),
    ]
    .join("");

    let rows: Vec<String> = prisoners
        .iter()
        .map(|prisoner| {
            format!(
                r#"<tr class='hover:bg-gray-50'>
                    <td class='px-3 py-2 text-sm font-mono'>{}</td>
                    <td class='px-3 py-2 text-sm'>{}</td>
                    <td class='px-3 py-2 text-sm'>{}</td>
                    <td class='px-3 py-2 text-sm text-right'>{}</td>
                    <td class='px-3 py-2 text-sm text-right'>{}</td>
                    <td class='px-3 py-2 text-sm font-medium text-right'>{}</td>
                </tr>"#,
                prisoner.prisoner_number,
                escape_html(&prisoner.prisoner_name),
                choice_label(PRISONS, &prisoner.prison),
                prisoner.sender_count,
                prisoner.credit_count,
                currency(prisoner.credit_total),
            )
        })
        .collect();

    format!(
        r#"<table class='min-w-full divide-y divide-gray-200'><thead class='bg-gray-50'><tr>{}</tr></thead><tbody class='divide-y divide-gray-100'>{}</tbody></table>"#,
        headers,
        rows.join("")
    )
}
