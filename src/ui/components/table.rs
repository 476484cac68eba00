//! Data table and pagination.

use crate::ui::{escape, query_value};

/// Table with an empty-state row. Cells are trusted HTML.
pub fn data_table(columns: &[&str], rows: &[Vec<String>], empty_message: &str) -> String {
    let head: String = columns
        .iter()
        .map(|c| format!("<th>{}</th>", escape(c)))
        .collect();
    let body = if rows.is_empty() {
        format!(
            r#"<tr><td colspan="{}" class="empty-row">{}</td></tr>"#,
            columns.len(),
            escape(empty_message)
        )
    } else {
        rows.iter()
            .map(|cells| {
                let cells: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
                format!("<tr>{cells}</tr>")
            })
            .collect()
    };
    format!(
        r#"<div class="table-wrap"><table class="table"><thead><tr>{head}</tr></thead><tbody>{body}</tbody></table></div>"#
    )
}

/// Previous/next links. `params` are the current filters, kept on every link.
pub fn pagination(path: &str, params: &[(&str, String)], page: u32, page_size: u32, total: u64) -> String {
    let page_size = page_size.max(1);
    let pages = total.div_ceil(u64::from(page_size)).max(1);
    if pages <= 1 {
        return String::new();
    }
    let href = |target: u64| {
        let mut query: Vec<String> = params
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| format!("{k}={}", query_value(v)))
            .collect();
        query.push(format!("page={target}"));
        format!("{path}?{}", query.join("&"))
    };
    let page = u64::from(page.max(1));
    let prev = if page > 1 {
        format!(r#"<a class="btn btn-outline btn-sm" href="{}">Previous</a>"#, escape(&href(page - 1)))
    } else {
        String::new()
    };
    let next = if page < pages {
        format!(r#"<a class="btn btn-outline btn-sm" href="{}">Next</a>"#, escape(&href(page + 1)))
    } else {
        String::new()
    };
    format!(r#"<nav class="pagination">{prev}<span>Page {page} of {pages}</span>{next}</nav>"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tables_explain_themselves() {
        let html = data_table(&["Name", "Actions"], &[], "No categories found");
        assert!(html.contains(r#"colspan="2""#));
        assert!(html.contains("No categories found"));
    }

    #[test]
    fn pagination_keeps_filters() {
        let html = pagination("/products", &[("search", "steel gate".into()), ("category", String::new())], 2, 12, 30);
        assert!(html.contains("Page 2 of 3"));
        assert!(html.contains("/products?search=steel+gate&amp;page=1"));
        assert!(html.contains("page=3"));
        assert!(pagination("/products", &[], 1, 12, 5).is_empty());
    }
}
