//! Page shells: public site, dashboard, and a bare error page.

use crate::config::SiteConfig;
use crate::domain::{Role, User};
use crate::session::Toast;
use crate::ui::escape;

/// Per-request data every shell needs.
#[derive(Debug, Clone)]
pub struct Chrome<'a> {
    pub site: &'a SiteConfig,
    pub user: Option<User>,
    /// Drained from the session; rendered once.
    pub toasts: Vec<Toast>,
}

/// Dashboard sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub href: &'static str,
    pub label: &'static str,
    pub admin_only: bool,
}

const fn nav(href: &'static str, label: &'static str) -> NavItem {
    NavItem {
        href,
        label,
        admin_only: false,
    }
}

pub const DASHBOARD_NAV: [NavItem; 13] = [
    nav("/dashboard", "Overview"),
    nav("/dashboard/analytics", "Analytics"),
    nav("/dashboard/products", "Products"),
    nav("/dashboard/categories", "Categories"),
    nav("/dashboard/materials", "Materials"),
    nav("/dashboard/services", "Services"),
    nav("/dashboard/quotations", "Quotations"),
    nav("/dashboard/bookings", "Bookings"),
    nav("/dashboard/portfolio", "Portfolio"),
    nav("/dashboard/hr", "HR & Staff"),
    nav("/dashboard/projects", "Projects"),
    NavItem {
        href: "/dashboard/users",
        label: "Users",
        admin_only: true,
    },
    nav("/", "View Site"),
];

/// Sidebar entries visible to `role`.
pub fn sidebar_items(role: Role) -> Vec<NavItem> {
    DASHBOARD_NAV
        .into_iter()
        .filter(|item| !item.admin_only || role == Role::Admin)
        .collect()
}

const PUBLIC_NAV: [(&str, &str); 6] = [
    ("/", "Home"),
    ("/about", "About"),
    ("/services", "Services"),
    ("/products", "Products"),
    ("/portfolio", "Portfolio"),
    ("/getquote", "Get a Quote"),
];

fn head(title: &str, site_name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} | {site}</title>
    <script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js" defer></script>
    <script src="/static/app.js" defer></script>
    <link rel="stylesheet" href="/static/app.css">
</head>"#,
        title = escape(title),
        site = escape(site_name)
    )
}

fn toasts(toasts: &[Toast]) -> String {
    let items: String = toasts
        .iter()
        .map(|t| {
            format!(
                r#"<div class="toast toast-{}" role="status">{}</div>"#,
                t.kind.as_str(),
                escape(&t.message)
            )
        })
        .collect();
    format!(r#"<div id="toasts" class="toast-container" aria-live="polite">{items}</div>"#)
}

/// Marketing/catalog pages: contact bar, navbar, footer.
pub fn public_page(chrome: &Chrome<'_>, title: &str, body: &str) -> String {
    let site = chrome.site;
    let links: String = PUBLIC_NAV
        .iter()
        .map(|(href, label)| format!(r#"<a href="{href}">{label}</a>"#))
        .collect();
    let account = match &chrome.user {
        Some(user) => {
            let dashboard = if user.role.is_back_office() {
                r#"<a href="/dashboard">Dashboard</a>"#
            } else {
                ""
            };
            format!(
                r#"{dashboard}<a href="/profile">{}</a><form method="post" action="/logout" class="inline-form"><button type="submit" class="btn btn-ghost btn-sm">Logout</button></form>"#,
                escape(&user.display_name())
            )
        }
        None => r#"<a href="/login">Login</a><a href="/register" class="btn btn-primary btn-sm">Register</a>"#.to_string(),
    };
    format!(
        r#"{head}
<body hx-boost="true">
<div class="contact-bar"><span>{phone}</span><span>{email}</span></div>
<header class="navbar">
    <a href="/" class="brand">{name}</a>
    <nav class="nav-links">{links}</nav>
    <div class="nav-account">{account}</div>
</header>
{toasts}
<main class="container">{body}</main>
<footer class="footer">
    <p>&copy; {name}. Steel fabrication, construction and furniture.</p>
    <p><a href="/getquote">Request a quotation</a> &middot; <a href="/portfolio">Our work</a></p>
</footer>
</body>
</html>"#,
        head = head(title, &site.name),
        phone = escape(&site.phone),
        email = escape(&site.email),
        name = escape(&site.name),
        toasts = toasts(&chrome.toasts),
    )
}

/// Back-office pages: role-filtered sidebar and a topbar with the user.
pub fn dashboard_page(chrome: &Chrome<'_>, title: &str, active: &str, body: &str) -> String {
    let role = chrome.user.as_ref().map(|u| u.role).unwrap_or_default();
    let items: String = sidebar_items(role)
        .iter()
        .map(|item| {
            let current = if item.href == active {
                r#" class="active" aria-current="page""#
            } else {
                ""
            };
            format!(r#"<a href="{}"{current}>{}</a>"#, item.href, item.label)
        })
        .collect();
    let user_name = chrome
        .user
        .as_ref()
        .map(User::display_name)
        .unwrap_or_default();
    format!(
        r#"{head}
<body hx-boost="true" class="dashboard">
<aside class="sidebar">
    <a href="/dashboard" class="brand">{name}</a>
    <nav>{items}</nav>
</aside>
<div class="dashboard-main">
    <header class="topbar">
        <span class="topbar-title">{title}</span>
        <div class="topbar-user">
            <span>{user}</span> {role_badge}
            <form method="post" action="/logout" class="inline-form"><button type="submit" class="btn btn-ghost btn-sm">Logout</button></form>
        </div>
    </header>
    {toasts}
    <main class="dashboard-content">{body}</main>
</div>
</body>
</html>"#,
        head = head(title, &chrome.site.name),
        name = escape(&chrome.site.name),
        title = escape(title),
        user = escape(&user_name),
        role_badge = super::components::badge::role(role),
        toasts = toasts(&chrome.toasts),
    )
}

/// Minimal page for errors rendered outside a session.
pub fn bare(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{}</title>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body><main class="container">{body}</main></body>
</html>"#,
        escape(title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            base_url: "https://example.com".into(),
            name: "Metal Works".into(),
            phone: "+977".into(),
            email: "hi@example.com".into(),
        }
    }

    #[test]
    fn users_entry_is_admin_only() {
        assert!(sidebar_items(Role::Admin).iter().any(|i| i.href == "/dashboard/users"));
        assert!(!sidebar_items(Role::Staff).iter().any(|i| i.href == "/dashboard/users"));
        assert_eq!(sidebar_items(Role::Staff).len(), DASHBOARD_NAV.len() - 1);
    }

    #[test]
    fn toasts_are_escaped_and_rendered() {
        let site = site();
        let chrome = Chrome {
            site: &site,
            user: None,
            toasts: vec![Toast::error("<b>bad</b>")],
        };
        let html = public_page(&chrome, "Home", "<p>hi</p>");
        assert!(html.contains(r#"class="toast toast-error""#));
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert!(html.contains(r#"href="/login""#));
    }

    #[test]
    fn dashboard_marks_active_entry() {
        let site = site();
        let chrome = Chrome {
            site: &site,
            user: Some(User {
                username: "sita".into(),
                role: Role::Staff,
                ..User::default()
            }),
            toasts: Vec::new(),
        };
        let html = dashboard_page(&chrome, "Categories", "/dashboard/categories", "");
        assert!(html.contains(r#"<a href="/dashboard/categories" class="active" aria-current="page">"#));
        assert!(!html.contains("/dashboard/users"));
    }
}
