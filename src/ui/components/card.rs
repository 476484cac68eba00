//! Cards, stat tiles and page sections.

use crate::ui::escape;

/// Card container. `body` is trusted HTML.
pub fn card(title: Option<&str>, body: &str) -> String {
    let header = title
        .map(|t| format!(r#"<div class="card-header"><h3>{}</h3></div>"#, escape(t)))
        .unwrap_or_default();
    format!(r#"<div class="card">{header}<div class="card-content">{body}</div></div>"#)
}

/// Dashboard statistic tile.
pub fn stat_card(label: &str, value: impl std::fmt::Display, hint: Option<&str>) -> String {
    let hint = hint
        .map(|h| format!(r#"<p class="stat-hint">{}</p>"#, escape(h)))
        .unwrap_or_default();
    format!(
        r#"<div class="card stat-card"><p class="stat-label">{}</p><p class="stat-value">{}</p>{hint}</div>"#,
        escape(label),
        escape(&value.to_string()),
    )
}

/// Titled section with optional right-aligned actions.
pub fn section(title: &str, actions: &str, body: &str) -> String {
    format!(
        r#"<section class="section">
<div class="section-header"><h2>{}</h2><div class="section-actions">{actions}</div></div>
{body}
</section>"#,
        escape(title)
    )
}

/// Page heading with subtitle and actions.
pub fn page_header(title: &str, subtitle: &str, actions: &str) -> String {
    format!(
        r#"<div class="page-header"><div><h1>{}</h1><p class="muted">{}</p></div><div class="page-actions">{actions}</div></div>"#,
        escape(title),
        escape(subtitle)
    )
}

pub fn empty_state(title: &str, message: &str) -> String {
    format!(
        r#"<div class="empty-state"><h3>{}</h3><p>{}</p></div>"#,
        escape(title),
        escape(message)
    )
}

/// Inline error branch for a failed read.
pub fn error_banner(message: Option<&str>) -> String {
    message
        .map(|m| format!(r#"<div class="alert alert-error" role="alert">{}</div>"#, escape(m)))
        .unwrap_or_default()
}

/// `Home / Products / Gate`; the last crumb is not linked.
pub fn breadcrumb(crumbs: &[(&str, Option<&str>)]) -> String {
    let items: Vec<String> = crumbs
        .iter()
        .map(|(label, href)| match href {
            Some(href) => format!(r#"<a href="{}">{}</a>"#, escape(href), escape(label)),
            None => format!(r#"<span aria-current="page">{}</span>"#, escape(label)),
        })
        .collect();
    format!(
        r#"<nav class="breadcrumb" aria-label="Breadcrumb">{}</nav>"#,
        items.join(r#"<span class="sep">/</span>"#)
    )
}

/// `<img>` or a placeholder tile when there is no image.
pub fn image(src: Option<&str>, alt: &str, class: &str) -> String {
    match src {
        Some(src) => format!(
            r#"<img src="{}" alt="{}" class="{class}" loading="lazy">"#,
            escape(src),
            escape(alt)
        ),
        None => format!(r#"<div class="{class} img-placeholder" aria-hidden="true"></div>"#),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breadcrumb_links_all_but_last() {
        let html = breadcrumb(&[("Home", Some("/")), ("Products", Some("/products")), ("Gate", None)]);
        assert!(html.contains(r#"<a href="/products">Products</a>"#));
        assert!(html.contains(r#"<span aria-current="page">Gate</span>"#));
    }

    #[test]
    fn missing_image_renders_placeholder() {
        assert!(image(None, "x", "thumb").contains("img-placeholder"));
        assert!(image(Some("/a.jpg"), "A \"quoted\" alt", "thumb").contains("&quot;quoted&quot;"));
    }
}
