//! HTTP server for the filter prototype
//!
//! Routes are organized into modules, one per record list:
//! - routes::credits, routes::senders, routes::prisoners,
//!   routes::recipients, routes::disbursements
//!
//! Each module follows a consistent structure:
//! - mod.rs: module declaration and exports
//! - api.rs: JSON API endpoint
//! - page.rs: HTML filter page

pub mod error;
pub mod routes;

use axum::response::Redirect;
use axum::{routing::get, Router};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use nomsops_config::Config;
use nomsops_core::{Choices, DataProvider, FilterDescription, FilterOutcome, QueryState, Record};

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn DataProvider>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::credits::{api_credits, page_credits};
    use routes::disbursements::{api_disbursements, page_disbursements};
    use routes::prisoners::{api_prisoners, page_prisoners};
    use routes::recipients::{api_recipients, page_recipients};
    use routes::senders::{api_senders, page_senders};

    Router::new()
        // JSON API endpoints
        .route("/api/health", get(health_check))
        .route("/api/credits", get(api_credits))
        .route("/api/senders", get(api_senders))
        .route("/api/prisoners", get(api_prisoners))
        .route("/api/recipients", get(api_recipients))
        .route("/api/disbursements", get(api_disbursements))
        // HTML filter pages
        .route("/", get(|| async { Redirect::to("/filters/credits") }))
        .route("/filters/credits", get(page_credits))
        .route("/filters/senders", get(page_senders))
        .route("/filters/prisoners", get(page_prisoners))
        .route("/filters/recipients", get(page_recipients))
        .route("/filters/disbursements", get(page_disbursements))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// JSON payload for the list endpoints
#[derive(Debug, Serialize)]
pub struct FilterResponse<R: Serialize> {
    pub objects: Vec<R>,
    pub total_count: usize,
    pub descriptions: Vec<FilterDescription>,
    pub ordering: String,
}

impl<R: Record + Serialize> FilterResponse<R> {
    pub fn from_outcome(outcome: FilterOutcome<R>) -> Self {
        FilterResponse {
            total_count: outcome.objects.len(),
            ordering: outcome.query.sort().query_value(),
            objects: outcome.objects,
            descriptions: outcome.descriptions,
        }
    }
}

// ==================== Template Functions ====================

/// Escape text destined for HTML attribute or element content
pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - nomsops</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        escape_html(title),
        content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str) -> String {
    let links = [
        ("/filters/credits", "Credits"),
        ("/filters/senders", "Payment sources"),
        ("/filters/prisoners", "Prisoners"),
        ("/filters/recipients", "Recipients"),
        ("/filters/disbursements", "Disbursements"),
    ];

    let mut nav = String::from(
        "<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>nomsops</h1><p class='text-xs text-gray-400'>transfer filter prototype</p></div><ul class='flex-1 py-2 space-y-1 px-2'>",
    );
    for (path, label) in &links {
        let active_class = if current_path.starts_with(path) {
            "bg-indigo-50 text-indigo-600"
        } else {
            "text-gray-600 hover:bg-gray-50"
        };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'><span>{}</span></a></li>"#,
            path, active_class, label
        ));
    }
    nav.push_str("</ul></div>");
    nav
}

/// Wrap page content with the base HTML shell and sidebar
pub fn page_response(title: &str, current_path: &str, inner_content: &str) -> String {
    base_html(
        title,
        &format!(
            r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            nav_sidebar(current_path),
            inner_content
        ),
    )
}

// ==================== Filter Page Widgets ====================

/// Removable chips for the active filters; each links back to the page
/// with that one filter taken out
pub fn render_chips(base_path: &str, descriptions: &[FilterDescription]) -> String {
    if descriptions.is_empty() {
        return String::new();
    }
    let chips: Vec<String> = descriptions
        .iter()
        .map(|description| {
            let href = if description.removal_query.is_empty() {
                base_path.to_string()
            } else {
                format!("{}?{}", base_path, description.removal_query)
            };
            format!(
                r#"<a href='{}' class='inline-flex items-center gap-1 px-3 py-1 bg-indigo-100 text-indigo-700 rounded-full text-sm hover:bg-indigo-200' title='Remove this filter'>{}<span class='font-bold'>&times;</span></a>"#,
                href,
                escape_html(&description.label)
            )
        })
        .collect();
    format!(
        r#"<div class='flex flex-wrap items-center gap-2 mb-4'><span class='text-sm text-gray-500'>Filtered by:</span>{}<a href='{}' class='text-sm text-gray-500 underline hover:text-gray-700'>Clear all</a></div>"#,
        chips.join(""),
        base_path
    )
}

/// A collapsible form section, opened when one of its fields is active
pub fn form_section(title: &str, open: bool, widgets: &[String]) -> String {
    format!(
        r#"<details {} class='border rounded-lg bg-white'><summary class='px-4 py-2 cursor-pointer font-medium text-sm'>{}</summary><div class='px-4 pb-4 space-y-3'>{}</div></details>"#,
        if open { "open" } else { "" },
        escape_html(title),
        widgets.join("")
    )
}

pub fn text_input(query: &QueryState, name: &str, label: &str, placeholder: &str) -> String {
    let value = query
        .get(name)
        .map(|value| value.query_value())
        .unwrap_or_default();
    format!(
        r#"<label class='block text-sm'><span class='text-gray-600'>{}</span><input type='text' name='{}' value='{}' placeholder='{}' class='mt-1 w-full px-3 py-1.5 border rounded-lg text-sm'></label>"#,
        escape_html(label),
        name,
        escape_html(&value),
        escape_html(placeholder)
    )
}

pub fn date_input(query: &QueryState, name: &str, label: &str) -> String {
    let value = query
        .get(name)
        .map(|value| value.query_value())
        .unwrap_or_default();
    format!(
        r#"<label class='block text-sm'><span class='text-gray-600'>{}</span><input type='date' name='{}' value='{}' class='mt-1 w-full px-3 py-1.5 border rounded-lg text-sm'></label>"#,
        escape_html(label),
        name,
        value
    )
}

/// A choice select with a leading blank option
pub fn choice_select(
    query: &QueryState,
    name: &str,
    label: &str,
    choices: Choices,
    blank_title: &str,
) -> String {
    let current = query.text(name);
    let mut options = format!("<option value=''>{}</option>", escape_html(blank_title));
    for (key, choice_label) in choices {
        options.push_str(&format!(
            "<option value='{}' {}>{}</option>",
            key,
            if current == Some(*key) { "selected" } else { "" },
            escape_html(choice_label)
        ));
    }
    format!(
        r#"<label class='block text-sm'><span class='text-gray-600'>{}</span><select name='{}' class='mt-1 w-full px-3 py-1.5 border rounded-lg text-sm bg-white'>{}</select></label>"#,
        escape_html(label),
        name,
        options
    )
}

/// The ordering select, always reflecting the effective sort
pub fn ordering_select(query: &QueryState, choices: Choices) -> String {
    let current = query.sort().query_value();
    let mut options = String::new();
    for (key, label) in choices {
        options.push_str(&format!(
            "<option value='{}' {}>{}</option>",
            key,
            if current == *key { "selected" } else { "" },
            escape_html(label)
        ));
    }
    format!(
        r#"<label class='block text-sm'><span class='text-gray-600'>Order by</span><select name='ordering' class='mt-1 w-full px-3 py-1.5 border rounded-lg text-sm bg-white'>{}</select></label>"#,
        options
    )
}

/// Query string that sorts by `key`, reversing direction when the
/// column is already the current ordering
pub fn reversed_ordering_query(query: &QueryState, key: &str) -> String {
    let mut toggled = query.clone();
    let current = query.sort();
    let next = if current.key == key && !current.descending {
        format!("-{}", key)
    } else {
        key.to_string()
    };
    toggled.insert("ordering", nomsops_core::FieldValue::Text(next));
    toggled.query_string()
}

/// A sortable results-table column header
pub fn sort_header(base_path: &str, query: &QueryState, key: &str, label: &str) -> String {
    let marker = if query.sort().key == key {
        if query.sort().descending {
            " &#9660;"
        } else {
            " &#9650;"
        }
    } else {
        ""
    };
    format!(
        r#"<th class='px-3 py-2 text-left text-xs font-semibold text-gray-600 uppercase'><a href='{}?{}' class='hover:text-indigo-600'>{}{}</a></th>"#,
        base_path,
        reversed_ordering_query(query, key),
        escape_html(label),
        marker
    )
}

pub fn plain_header(label: &str) -> String {
    format!(
        r#"<th class='px-3 py-2 text-left text-xs font-semibold text-gray-600 uppercase'>{}</th>"#,
        escape_html(label)
    )
}

/// Assemble a complete filter page body: heading with result count,
/// chips, the filter form and the results table
pub fn filter_page(
    title: &str,
    count: usize,
    chips: &str,
    form_html: &str,
    table_html: &str,
) -> String {
    format!(
        r#"<div class='flex items-center justify-between mb-4'>
            <h2 class='text-2xl font-bold'>{}</h2>
            <span class='text-sm text-gray-500'>{} result{}</span>
        </div>
        {}
        <div class='grid grid-cols-1 lg:grid-cols-4 gap-6'>
            <div class='lg:col-span-1'>{}</div>
            <div class='lg:col-span-3 bg-white rounded-xl shadow-sm overflow-x-auto'>{}</div>
        </div>"#,
        escape_html(title),
        count,
        if count == 1 { "" } else { "s" },
        chips,
        form_html,
        table_html
    )
}

/// Wrap form sections and the apply button into the GET form
pub fn filter_form(sections: &[String], ordering_widget: &str) -> String {
    format!(
        r#"<form method='get' class='space-y-3'>
            {}
            <div class='border rounded-lg bg-white px-4 py-3'>{}</div>
            <button type='submit' class='w-full px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700 text-sm font-medium'>Apply filters</button>
        </form>"#,
        sections.join("\n"),
        ordering_widget
    )
}

/// Start the HTTP server
///
/// This is the main entry point for the nomsops server. It creates the
/// router, binds to the configured address, and serves until stopped.
pub async fn start_server(config: Config, provider: Arc<dyn DataProvider>) {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { provider, config };

    let router = create_router(state);

    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("failed to bind {}: {}", addr, e);
            return;
        }
    };
    eprintln!("[INFO] Starting nomsops server on http://{}", addr);
    eprintln!("[INFO] Available routes:");
    eprintln!("[INFO]   - /filters/credits");
    eprintln!("[INFO]   - /filters/senders");
    eprintln!("[INFO]   - /filters/prisoners");
    eprintln!("[INFO]   - /filters/recipients");
    eprintln!("[INFO]   - /filters/disbursements");
    eprintln!("[INFO]   - /api/* (JSON API endpoints)");

    match axum::serve(listener, router).await {
        Ok(_) => eprintln!("[INFO] Server stopped gracefully"),
        Err(e) => eprintln!("[ERROR] Server error: {}", e),
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use nomsops_core::SortSpec;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }

    #[test]
    fn test_render_chips_links_to_removal_query() {
        let descriptions = vec![
            FilterDescription {
                label: "Status: pending".to_string(),
                removal_query: "prison=BXI".to_string(),
            },
            FilterDescription {
                label: "Prison: HMP Brixton".to_string(),
                removal_query: String::new(),
            },
        ];
        let html = render_chips("/filters/credits", &descriptions);
        assert!(html.contains("href='/filters/credits?prison=BXI'"));
        assert!(html.contains("href='/filters/credits'"));
        assert!(html.contains("Status: pending"));
    }

    #[test]
    fn test_render_chips_empty() {
        assert_eq!(render_chips("/filters/credits", &[]), "");
    }

    #[test]
    fn test_reversed_ordering_query_toggles() {
        let mut query = QueryState::new(SortSpec::parse("-received_at"));
        query.insert("status", nomsops_core::FieldValue::text("pending"));

        // different column: sort ascending by it
        assert_eq!(
            reversed_ordering_query(&query, "amount"),
            "status=pending&ordering=amount"
        );

        // same column ascending: flip to descending
        query.set_sort(SortSpec::parse("amount"));
        assert_eq!(
            reversed_ordering_query(&query, "amount"),
            "status=pending&ordering=-amount"
        );

        // same column descending: back to ascending
        query.set_sort(SortSpec::parse("-amount"));
        assert_eq!(
            reversed_ordering_query(&query, "amount"),
            "status=pending&ordering=amount"
        );
    }

    #[test]
    fn test_choice_select_marks_current() {
        let mut query = QueryState::new(SortSpec::parse("-received_at"));
        query.insert("status", nomsops_core::FieldValue::text("pending"));
        let html = choice_select(
            &query,
            "status",
            "Status",
            nomsops_core::CREDIT_STATUSES,
            "Any status",
        );
        assert!(html.contains("<option value='pending' selected>"));
        assert!(html.contains("<option value='credited' >"));
    }
}
