//! Marketing and catalog pages.

use std::collections::HashMap;

use axum::extract::{Form, Multipart, Path, Query};
use axum::response::{Html, Redirect};
use serde::Deserialize;

use super::{Visit, degrade, number, read_form, see_other, settle, text};
use crate::domain::{
    CategoryRef, PortfolioFilter, PortfolioProject, ProductDetail, ProductFilter, ProductListItem,
    ReviewPayload, StoreService,
};
use crate::error::{AppError, AppResult};
use crate::forms::FormPayload;
use crate::ui::components::input::{self, Input};
use crate::ui::components::{
    ButtonSize, ButtonVariant, breadcrumb, button, card, data_table, empty_state, error_banner,
    page_header, pagination, section,
};
use crate::ui::{escape, format, query_value};

const PAGE_SIZE: u32 = 12;

const SERVICE_CHOICES: [&str; 6] = [
    "Gates & Shutters",
    "Metal Railings",
    "Staircases",
    "Interior Works",
    "Aluminum Works",
    "Custom Fabrication",
];

const URGENCY_CHOICES: [(&str, &str); 4] = [
    ("low", "Low"),
    ("medium", "Medium"),
    ("high", "High"),
    ("urgent", "Urgent"),
];

const BOOKING_TYPES: [&str; 4] = ["Installation", "Maintenance", "Repair", "Site Measurement"];

// ─────────────────────────────────────────────────────────────────────────────
// Cards
// ─────────────────────────────────────────────────────────────────────────────

fn product_card(visit: &Visit, product: &ProductListItem) -> String {
    let category = product
        .category
        .as_ref()
        .and_then(CategoryRef::label)
        .unwrap_or_default();
    let stock = if product.is_in_stock {
        ""
    } else {
        r#"<span class="badge badge-secondary">Out of stock</span>"#
    };
    format!(
        r#"<a class="product-card" href="/products/{slug}">
    {image}
    <div class="product-card-body">
        <p class="eyebrow">{category}</p>
        <h3>{name}</h3>
        <p class="price">{price}</p>
        <p class="rating">{stars} <span class="muted">({reviews})</span> {stock}</p>
    </div>
</a>"#,
        slug = query_value(&product.slug),
        image = card::image(
            visit.media(product.primary_image.as_deref()).as_deref(),
            &product.name,
            "product-thumb"
        ),
        category = escape(category),
        name = escape(&product.name),
        price = escape(&format::price(product)),
        stars = format::stars(product.average_rating),
        reviews = product.review_count,
    )
}

fn service_card(visit: &Visit, service: &StoreService) -> String {
    format!(
        r#"<div class="service-card">{image}<h3>{title}</h3><p class="eyebrow">{category}</p><p>{description}</p></div>"#,
        image = card::image(visit.media(service.cover()).as_deref(), &service.title, "service-thumb"),
        title = escape(&service.title),
        category = escape(&service.category),
        description = escape(&format::excerpt(&service.description, 180)),
    )
}

fn portfolio_card(visit: &Visit, project: &PortfolioProject) -> String {
    format!(
        r#"<a class="portfolio-card" href="/portfolio/{slug}">{image}<div class="portfolio-card-body"><p class="eyebrow">{category}</p><h3>{title}</h3><p class="muted">{location}</p></div></a>"#,
        slug = query_value(&project.slug),
        image = card::image(visit.media(project.cover()).as_deref(), &project.title, "portfolio-thumb"),
        category = escape(project.category_name().unwrap_or_default()),
        title = escape(&project.title),
        location = escape(format::or_dash(Some(project.location.as_str()))),
    )
}

fn grid(cards: &[String], empty_title: &str, empty_message: &str) -> String {
    if cards.is_empty() {
        return empty_state(empty_title, empty_message);
    }
    format!(r#"<div class="grid">{}</div>"#, cards.concat())
}

// ─────────────────────────────────────────────────────────────────────────────
// Home, about, services
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Featured products, services and featured work.
pub async fn home(visit: Visit) -> AppResult<Html<String>> {
    let backend = visit.backend();
    let catalog = backend.catalog();
    let services = backend.services();
    let portfolio = backend.portfolio();
    let featured_work = PortfolioFilter::featured();

    let (featured, service_list, work) = futures::join!(
        catalog.featured_products(),
        services.list(),
        portfolio.projects(&featured_work),
    );
    let featured = degrade(featured)?;
    let service_list = degrade(service_list)?;
    let (work, _) = degrade(work)?;

    let site = &visit.state.config.site;
    let hero = format!(
        r#"<section class="hero">
    <h1>{name}</h1>
    <p>Gates, railings, staircases, sheds and custom steel work, fabricated and installed.</p>
    <div class="hero-actions">{quote}{browse}</div>
</section>"#,
        name = escape(&site.name),
        quote = button::link("/getquote", "Get a Quote", ButtonVariant::Primary, ButtonSize::Lg),
        browse = button::link("/products", "Browse Products", ButtonVariant::Outline, ButtonSize::Lg),
    );

    let products: Vec<String> = featured.iter().take(8).map(|p| product_card(&visit, p)).collect();
    let services: Vec<String> = service_list
        .iter()
        .filter(|s| s.is_active)
        .take(6)
        .map(|s| service_card(&visit, s))
        .collect();
    let work: Vec<String> = work.iter().take(6).map(|p| portfolio_card(&visit, p)).collect();

    let body = [
        hero,
        section(
            "Featured Products",
            &button::link("/products", "View all", ButtonVariant::Link, ButtonSize::Sm),
            &grid(&products, "No featured products", "Check back soon."),
        ),
        section(
            "What We Do",
            &button::link("/services", "All services", ButtonVariant::Link, ButtonSize::Sm),
            &grid(&services, "No services listed", "Contact us for custom work."),
        ),
        section(
            "Recent Work",
            &button::link("/portfolio", "Portfolio", ButtonVariant::Link, ButtonSize::Sm),
            &grid(&work, "No projects yet", "Our portfolio is being updated."),
        ),
    ]
    .concat();

    Ok(visit.public("Home", &body))
}

/// GET /about
pub async fn about(visit: Visit) -> Html<String> {
    let site = &visit.state.config.site;
    let body = format!(
        r#"{header}
<div class="prose">
    <p>{name} designs, fabricates and installs steel and aluminium work for homes, shops and industry:
    gates and shutters, railings, staircases, trusses and sheds, and made-to-order furniture.</p>
    <p>Every job starts with a site visit and a written quotation. Our workshop handles cutting,
    welding, finishing and painting in-house, and our team installs on site.</p>
    <h2>Contact</h2>
    <p>Phone: {phone}<br>Email: {email}</p>
</div>
{cta}"#,
        header = page_header("About Us", "Quality metal work since day one", ""),
        name = escape(&site.name),
        phone = escape(&site.phone),
        email = escape(&site.email),
        cta = button::link("/getquote", "Request a Quote", ButtonVariant::Primary, ButtonSize::Md),
    );
    visit.public("About", &body)
}

/// GET /services - Active store services, ordered.
pub async fn services(visit: Visit) -> AppResult<Html<String>> {
    let services = visit.backend().services();
    let result = visit
        .session
        .load_list(|s| &mut s.services, services.list())
        .await;
    settle([result])?;

    let body = visit.session.with_store(|store| {
        let mut active: Vec<&StoreService> =
            store.services.items.iter().filter(|s| s.is_active).collect();
        active.sort_by_key(|s| s.order);
        let cards: Vec<String> = active.iter().map(|s| service_card(&visit, s)).collect();
        format!(
            "{}{}{}",
            page_header("Our Services", "Fabrication, construction and furniture", ""),
            error_banner(store.services.error.as_deref()),
            grid(&cards, "No services listed", "Contact us for custom work."),
        )
    });
    Ok(visit.public("Services", &body))
}

// ─────────────────────────────────────────────────────────────────────────────
// Products
// ─────────────────────────────────────────────────────────────────────────────

fn sort_products(items: &mut [&ProductListItem], sort: &str) {
    let price = |p: &ProductListItem| p.base_price.parse::<f64>().unwrap_or(0.0);
    match sort {
        "price-low" => items.sort_by(|a, b| price(a).total_cmp(&price(b))),
        "price-high" => items.sort_by(|a, b| price(b).total_cmp(&price(a))),
        "popular" => items.sort_by(|a, b| b.review_count.cmp(&a.review_count)),
        _ => items.sort_by(|a, b| b.id.cmp(&a.id)),
    }
}

/// GET /products - Filterable, paginated catalog.
pub async fn products(
    visit: Visit,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Html<String>> {
    let page = number(query.get("page").map(String::as_str)).unwrap_or(1).max(1);
    let filter = ProductFilter {
        category: text(query.get("category")),
        search: text(query.get("search")),
        product_type: text(query.get("product_type")),
        in_stock: query.get("in_stock").filter(|v| v.as_str() == "true").map(|_| true),
        min_price: number(query.get("min_price").map(String::as_str)),
        max_price: number(query.get("max_price").map(String::as_str)),
        page: Some(page),
        page_size: Some(PAGE_SIZE),
        ..ProductFilter::default()
    };
    let sort = query.get("sort").map_or("newest", String::as_str);

    let catalog = visit.backend().catalog();
    let (products, categories) = futures::join!(
        visit.session.load(|s| &mut s.products, catalog.products(&filter)),
        visit.session.load_list(|s| &mut s.categories, catalog.categories()),
    );
    settle([products, categories])?;

    let body = visit.session.with_store(|store| {
        let mut category_options = vec![(String::new(), "All categories".to_string())];
        category_options.extend(
            store
                .categories
                .items
                .iter()
                .filter(|c| c.is_active)
                .map(|c| (c.slug.clone(), c.name.clone())),
        );
        let sort_options: Vec<(String, String)> = [
            ("newest", "Newest"),
            ("price-low", "Price: low to high"),
            ("price-high", "Price: high to low"),
            ("popular", "Most reviewed"),
        ]
        .iter()
        .map(|(v, l)| ((*v).to_string(), (*l).to_string()))
        .collect();

        let filters = format!(
            r#"<form method="get" action="/products" class="filters">{search}{category}{sort}{stock}<button type="submit" class="btn btn-secondary">Filter</button></form>"#,
            search = Input::text("search", "Search", filter.search.as_deref().unwrap_or_default())
                .kind("search")
                .placeholder("Gates, railings, furniture...")
                .render(),
            category = input::select(
                "category",
                "Category",
                &category_options,
                filter.category.as_deref().unwrap_or_default()
            ),
            sort = input::select("sort", "Sort by", &sort_options, sort),
            stock = input::checkbox("in_stock", "In stock only", filter.in_stock == Some(true)),
        );

        let mut items: Vec<&ProductListItem> = store.products.items.iter().collect();
        sort_products(&mut items, sort);
        let cards: Vec<String> = items.iter().map(|p| product_card(&visit, p)).collect();

        let params = [
            ("search", filter.search.clone().unwrap_or_default()),
            ("category", filter.category.clone().unwrap_or_default()),
            ("sort", sort.to_string()),
            ("in_stock", if filter.in_stock == Some(true) { "true".into() } else { String::new() }),
        ];
        format!(
            "{}{}{}{}{}",
            page_header(
                "Products",
                &format!("{} products", store.products.total),
                &button::link("/getquote", "Custom Quote", ButtonVariant::Primary, ButtonSize::Md)
            ),
            filters,
            error_banner(store.products.error.as_deref()),
            grid(&cards, "No products found", "Try a different search or category."),
            pagination("/products", &params, page, PAGE_SIZE, store.products.total),
        )
    });
    Ok(visit.public("Products", &body))
}

fn product_body(visit: &Visit, product: &ProductDetail) -> String {
    let summary = &product.summary;
    let gallery: String = product
        .gallery()
        .iter()
        .map(|img| {
            card::image(
                visit.media(Some(img.image.as_str())).as_deref(),
                img.alt_text.as_deref().unwrap_or(&summary.name),
                "gallery-image",
            )
        })
        .collect();
    let gallery = if gallery.is_empty() {
        card::image(
            visit.media(summary.primary_image.as_deref()).as_deref(),
            &summary.name,
            "gallery-image",
        )
    } else {
        gallery
    };

    let dimensions: Vec<Vec<String>> = [
        ("Length", &product.length),
        ("Width", &product.width),
        ("Height", &product.height),
        ("Weight", &product.weight),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.as_ref().map(|v| vec![label.to_string(), escape(v)]))
    .chain(
        product
            .specifications
            .iter()
            .map(|s| vec![escape(&s.name), escape(&s.value)]),
    )
    .collect();

    let materials: String = product
        .materials
        .iter()
        .map(|m| format!(r#"<span class="chip">{}</span>"#, escape(&m.name)))
        .collect();

    let reviews: String = product
        .reviews
        .iter()
        .map(|r| {
            format!(
                r#"<article class="review"><p class="rating">{stars}</p><h4>{title}</h4><p>{comment}</p><p class="muted">{user} &middot; {date}{verified}</p></article>"#,
                stars = format::stars(f64::from(r.rating)),
                title = escape(format::or_dash(r.title.as_deref())),
                comment = escape(&r.comment),
                user = escape(format::or_na(r.user_name.as_deref())),
                date = format::date(r.created_at.as_deref()),
                verified = if r.is_verified_purchase { " &middot; Verified purchase" } else { "" },
            )
        })
        .collect();

    let slug = query_value(&summary.slug);
    let member_forms = if visit.session.is_authenticated() {
        let rating_options: Vec<(String, String)> = (1..=5)
            .rev()
            .map(|n| (n.to_string(), format!("{n} stars")))
            .collect();
        let review_form = input::form(
            &format!("/products/{slug}/reviews"),
            false,
            &[
                input::select("rating", "Rating", &rating_options, "5"),
                Input::text("title", "Title", "").render(),
                input::textarea("comment", "Comment", "", 3, true),
            ],
            "Submit Review",
        );
        let booking_types: Vec<(String, String)> = BOOKING_TYPES
            .iter()
            .map(|t| ((*t).to_string(), (*t).to_string()))
            .collect();
        let addresses = visit.session.user().map(|u| u.addresses).unwrap_or_default();
        let address_field = if addresses.is_empty() {
            r#"<p class="muted"><a href="/profile?tab=addresses">Add a service address</a> before booking.</p>"#
                .to_string()
        } else {
            let options: Vec<(String, String)> =
                addresses.iter().map(|a| (a.id.to_string(), a.to_string())).collect();
            let selected = addresses
                .iter()
                .find(|a| a.is_default_shipping)
                .map(|a| a.id.to_string())
                .unwrap_or_default();
            input::select("service_address", "Service address", &options, &selected)
        };
        let booking_form = input::form(
            "/bookings",
            false,
            &[
                format!(r#"<input type="hidden" name="product" value="{}">"#, summary.id),
                format!(r#"<input type="hidden" name="return_to" value="/products/{slug}">"#),
                input::select("service_type", "Service", &booking_types, "Installation"),
                input::textarea("description", "What do you need?", "", 3, true),
                Input::text("preferred_date", "Preferred date", "").kind("date").required().render(),
                Input::text("preferred_time", "Preferred time", "").kind("time").required().render(),
                address_field,
            ],
            "Book Service",
        );
        format!(
            "{}{}",
            card::card(Some("Write a review"), &review_form),
            card::card(Some("Book installation or service"), &booking_form)
        )
    } else {
        format!(
            r#"<p class="muted"><a href="/login?redirect=/products/{slug}">Log in</a> to review this product or book a service.</p>"#
        )
    };

    format!(
        r#"{crumbs}
<div class="product-detail">
    <div class="gallery">{gallery}</div>
    <div class="product-info">
        <p class="eyebrow">{category}</p>
        <h1>{name}</h1>
        <p class="rating">{stars} <span class="muted">({reviews_count} reviews)</span></p>
        <p class="price">{price}</p>
        <p>{description}</p>
        {customization}
        <div class="materials">{materials}</div>
        <div class="hero-actions">{quote}{customize}</div>
    </div>
</div>
{specs}
{reviews}
{member_forms}"#,
        crumbs = breadcrumb(&[("Home", Some("/")), ("Products", Some("/products")), (summary.name.as_str(), None)]),
        category = escape(summary.category.as_ref().and_then(CategoryRef::label).unwrap_or_default()),
        name = escape(&summary.name),
        stars = format::stars(summary.average_rating),
        reviews_count = summary.review_count,
        price = escape(&format::price(summary)),
        description = escape(format::or_dash(summary.description.as_deref())),
        customization = product
            .customization_note
            .as_deref()
            .map(|n| format!(r#"<p class="note">{}</p>"#, escape(n)))
            .unwrap_or_default(),
        quote = button::link(
            &format!("/getquote?product={}", summary.id),
            "Request Quote",
            ButtonVariant::Primary,
            ButtonSize::Md
        ),
        customize = if summary.is_customizable {
            button::link(
                &format!("/portfolio/{slug}/quote"),
                "Customize",
                ButtonVariant::Outline,
                ButtonSize::Md,
            )
        } else {
            String::new()
        },
        specs = section(
            "Specifications",
            "",
            &data_table(&["Property", "Value"], &dimensions, "No specifications listed")
        ),
        reviews = section(
            "Reviews",
            "",
            &if reviews.is_empty() {
                empty_state("No reviews yet", "Be the first to review this product.")
            } else {
                reviews
            }
        ),
    )
}

/// GET /products/{slug}
pub async fn product_detail(visit: Visit, Path(slug): Path<String>) -> AppResult<Html<String>> {
    let catalog = visit.backend().catalog();
    let result = visit
        .session
        .load_one(|s| &mut s.current_product, catalog.product(&slug))
        .await;
    match result {
        Err(err) if err.is_not_found() => {
            return Err(AppError::NotFound("Product not found".into()));
        }
        other => settle([other])?,
    }

    let product = visit.session.with_store(|store| {
        store
            .current_product
            .value
            .clone()
            .filter(|p| p.summary.slug == slug)
            .ok_or_else(|| store.current_product.error.clone().unwrap_or_default())
    });
    match product {
        Ok(product) => {
            let body = product_body(&visit, &product);
            Ok(visit.public(&product.summary.name, &body))
        }
        Err(message) => Ok(visit.public("Product", &error_banner(Some(message.as_str())))),
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    rating: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    comment: String,
}

/// POST /products/{slug}/reviews
pub async fn submit_review(
    visit: Visit,
    Path(slug): Path<String>,
    Form(form): Form<ReviewForm>,
) -> AppResult<Redirect> {
    let back = format!("/products/{}", query_value(&slug));
    let rating = number::<u8>(Some(form.rating.as_str())).filter(|r| (1..=5).contains(r));
    let Some(rating) = rating.filter(|_| !form.comment.trim().is_empty()) else {
        visit.session.error("Please choose a rating and write a comment");
        return Ok(see_other(&back));
    };
    let payload = ReviewPayload {
        rating,
        title: form.title.trim().to_string(),
        comment: form.comment.trim().to_string(),
    };
    let result = visit.backend().catalog().create_review(&slug, &payload).await;
    visit.flash(result, "Thank you for your review")?;
    Ok(see_other(&back))
}

// ─────────────────────────────────────────────────────────────────────────────
// Portfolio
// ─────────────────────────────────────────────────────────────────────────────

/// GET /portfolio - Projects, filterable by category slug.
pub async fn portfolio(
    visit: Visit,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Html<String>> {
    let filter = PortfolioFilter {
        category: text(query.get("category")),
        search: text(query.get("search")),
        ..PortfolioFilter::default()
    };
    let portfolio = visit.backend().portfolio();
    let (projects, categories) = futures::join!(
        visit.session.load(|s| &mut s.portfolio, portfolio.projects(&filter)),
        visit
            .session
            .load_list(|s| &mut s.portfolio_categories, portfolio.categories()),
    );
    settle([projects, categories])?;

    let body = visit.session.with_store(|store| {
        let active = filter.category.as_deref().unwrap_or_default();
        let mut tabs = vec![format!(
            r#"<a href="/portfolio" class="tab{}">All</a>"#,
            if active.is_empty() { " active" } else { "" }
        )];
        tabs.extend(store.portfolio_categories.items.iter().map(|c| {
            format!(
                r#"<a href="/portfolio?category={}" class="tab{}">{} <span class="muted">{}</span></a>"#,
                query_value(&c.slug),
                if c.slug == active { " active" } else { "" },
                escape(&c.name),
                c.project_count
            )
        }));
        let cards: Vec<String> = store
            .portfolio
            .items
            .iter()
            .map(|p| portfolio_card(&visit, p))
            .collect();
        format!(
            r#"{}<nav class="tabs">{}</nav>{}{}"#,
            page_header("Our Work", "Completed fabrication and construction projects", ""),
            tabs.concat(),
            error_banner(store.portfolio.error.as_deref()),
            grid(&cards, "No projects found", "Try another category."),
        )
    });
    Ok(visit.public("Portfolio", &body))
}

/// GET /portfolio/{slug}
pub async fn portfolio_detail(visit: Visit, Path(slug): Path<String>) -> AppResult<Html<String>> {
    let project = match visit.backend().portfolio().project(&slug).await {
        Ok(project) => project,
        Err(err) if err.is_not_found() => {
            return Err(AppError::NotFound("Project not found".into()));
        }
        Err(err) => return Err(err.into()),
    };

    let images: String = project
        .images
        .iter()
        .map(|img| {
            card::image(
                visit.media(Some(img.image.as_str())).as_deref(),
                img.alt_text.as_deref().unwrap_or(&project.title),
                "gallery-image",
            )
        })
        .collect();
    let facts = vec![
        vec!["Client".to_string(), escape(format::or_na(Some(project.client_name.as_str())))],
        vec!["Location".to_string(), escape(format::or_na(Some(project.location.as_str())))],
        vec!["Completed".to_string(), format::date(project.completion_date.as_deref())],
        vec![
            "Category".to_string(),
            escape(format::or_na(project.category_name())),
        ],
    ];
    let body = format!(
        r#"{crumbs}
<h1>{title}</h1>
<div class="gallery">{images}</div>
<div class="prose"><p>{description}</p></div>
{facts}
{cta}"#,
        crumbs = breadcrumb(&[("Home", Some("/")), ("Portfolio", Some("/portfolio")), (project.title.as_str(), None)]),
        title = escape(&project.title),
        images = if images.is_empty() {
            card::image(visit.media(project.cover()).as_deref(), &project.title, "gallery-image")
        } else {
            images
        },
        description = escape(format::or_dash(Some(project.description.as_str()))),
        facts = data_table(&["", ""], &facts, ""),
        cta = button::link("/getquote", "Start a similar project", ButtonVariant::Primary, ButtonSize::Md),
    );
    Ok(visit.public(&project.title, &body))
}

// ─────────────────────────────────────────────────────────────────────────────
// Quotations
// ─────────────────────────────────────────────────────────────────────────────

/// GET /getquote - Quotation request; guests also give contact details.
pub async fn quote_form(
    visit: Visit,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Html<String>> {
    let selected = query.get("product").cloned().unwrap_or_default();
    let catalog = visit.backend().catalog();
    let filter = ProductFilter {
        page_size: Some(100),
        ..ProductFilter::default()
    };
    let (products, _) = degrade(catalog.products(&filter).await)?;

    let mut product_options = vec![(String::new(), "No specific product".to_string())];
    product_options.extend(products.iter().map(|p| (p.id.to_string(), p.name.clone())));
    let mut service_options = vec![(String::new(), "Select a service".to_string())];
    service_options.extend(SERVICE_CHOICES.iter().map(|s| ((*s).to_string(), (*s).to_string())));
    let urgency: Vec<(String, String)> = URGENCY_CHOICES
        .iter()
        .map(|(v, l)| ((*v).to_string(), (*l).to_string()))
        .collect();
    let quote_types = vec![
        ("instant".to_string(), "Instant quote".to_string()),
        ("production".to_string(), "Production quote".to_string()),
    ];

    let mut fields = Vec::new();
    if !visit.session.is_authenticated() {
        fields.push(r#"<h2>Contact details</h2>"#.to_string());
        fields.push(Input::text("guest_name", "Full name", "").required().render());
        fields.push(Input::text("guest_email", "Email", "").kind("email").required().render());
        fields.push(Input::text("guest_phone", "Phone", "").kind("tel").required().render());
    }
    fields.extend([
        r#"<h2>Project</h2>"#.to_string(),
        input::select("quote_type", "Quote type", &quote_types, "instant"),
        Input::text("project_title", "Project title", "").required().render(),
        input::select("service_type", "Service", &service_options, ""),
        input::select("product", "Product", &product_options, &selected),
        input::textarea("description", "Describe what you need", "", 5, true),
        Input::text("quantity", "Quantity", "1").kind("number").render(),
        input::select("urgency", "Urgency", &urgency, "medium"),
        Input::text("custom_dimensions", "Dimensions", "").placeholder("e.g. 12ft x 6ft").render(),
        Input::text("preferred_materials", "Preferred materials", "").render(),
        Input::text("budget_range_min", "Budget from (Rs.)", "").kind("number").render(),
        Input::text("budget_range_max", "Budget to (Rs.)", "").kind("number").render(),
        Input::text("required_by", "Required by", "").kind("date").render(),
        input::file("upload_files", "Drawings or photos", true, "image/*,.pdf"),
    ]);

    let body = format!(
        "{}{}",
        page_header(
            "Get a quote",
            "Tell us what you're building. We'll review it and get back with a clear quote.",
            ""
        ),
        card::card(None, &input::form("/getquote", true, &fields, "Submit Request")),
    );
    Ok(visit.public("Get a Quote", &body))
}

/// POST /getquote
pub async fn submit_quote(visit: Visit, multipart: Multipart) -> AppResult<Redirect> {
    let form = read_form(multipart).await?.without_blank();
    if form.value("project_title").is_none() || form.value("description").is_none() {
        visit.session.error("Project title and description are required");
        return Ok(see_other("/getquote"));
    }
    let result = visit.backend().orders().create_quotation(form).await;
    let created = visit.flash(
        result,
        "Quotation request submitted. We will get back to you within 24 hours.",
    )?;
    if created.is_some() && visit.session.is_authenticated() {
        return Ok(see_other("/profile"));
    }
    Ok(see_other("/getquote"))
}

/// GET /portfolio/{slug}/quote - Customize a product: size, materials, quantity.
pub async fn custom_quote_form(visit: Visit, Path(slug): Path<String>) -> AppResult<Html<String>> {
    let product = match visit.backend().catalog().product(&slug).await {
        Ok(product) => product,
        Err(err) if err.is_not_found() => {
            return Err(AppError::NotFound("Product not found".into()));
        }
        Err(err) => return Err(err.into()),
    };

    let materials: String = product
        .materials
        .iter()
        .map(|m| {
            format!(
                r#"<label class="field checkbox"><input type="checkbox" name="materials" value="{name}"><span>{name}</span></label>"#,
                name = escape(&m.name),
            )
        })
        .collect();
    let fields = [
        Input::text("height", "Height (cm)", "").kind("number").render(),
        Input::text("width", "Width (cm)", "").kind("number").render(),
        Input::text("depth", "Depth (cm)", "").kind("number").render(),
        format!(r#"<fieldset class="field"><legend>Materials</legend>{materials}</fieldset>"#),
        Input::text("quantity", "Quantity", "1").kind("number").required().render(),
        input::textarea("notes", "Additional notes", "", 4, false),
    ];
    let summary = &product.summary;
    let slug = query_value(&summary.slug);
    let product_href = format!("/products/{slug}");
    let body = format!(
        "{}{}{}",
        breadcrumb(&[
            ("Products", Some("/products")),
            (summary.name.as_str(), Some(product_href.as_str())),
            ("Custom quote", None),
        ]),
        page_header(
            &format!("Customize {}", summary.name),
            "Give us your measurements and we will price it for you.",
            ""
        ),
        card::card(
            None,
            &input::form(&format!("/portfolio/{slug}/quote"), true, &fields, "Request Quote")
        ),
    );
    Ok(visit.public("Custom Quote", &body))
}

/// Multiline description the workshop reads for a customized product.
fn custom_description(product_name: &str, form: &mut FormPayload) -> String {
    let materials = form.take("materials");
    let materials = if materials.is_empty() {
        "Standard".to_string()
    } else {
        materials.join(", ")
    };
    let dim = |name: &str| form.value(name).unwrap_or_else(|| "-".to_string());
    format!(
        "Product: {product_name}\nDimensions: H:{h}cm x W:{w}cm x D:{d}cm\nSelected Materials: {materials}\nAdditional Notes: {notes}",
        h = dim("height"),
        w = dim("width"),
        d = dim("depth"),
        notes = form.value("notes").unwrap_or_default(),
    )
}

/// POST /portfolio/{slug}/quote
pub async fn submit_custom_quote(
    visit: Visit,
    Path(slug): Path<String>,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let mut form = read_form(multipart).await?;
    let back = format!("/portfolio/{}/quote", query_value(&slug));
    let product = match visit.backend().catalog().product(&slug).await {
        Ok(product) => product.summary,
        Err(err) => {
            visit.flash::<()>(Err(err), "")?;
            return Ok(see_other(&back));
        }
    };

    let quantity = number::<u32>(form.get("quantity")).filter(|q| *q >= 1).unwrap_or(1);
    let description = custom_description(&product.name, &mut form);
    let payload = FormPayload::new()
        .text("quote_type", "production")
        .text("project_title", format!("Custom Quote for {}", product.name))
        .text("product", product.id.to_string())
        .text("quantity", quantity.to_string())
        .text("description", description)
        .text("service_type", "Custom Fabrication");
    let result = visit.backend().orders().create_quotation(payload).await;
    let created = visit.flash(
        result,
        "Quote requested. Our engineers will get back to you within 24 hours.",
    )?;
    if created.is_some() {
        return Ok(see_other("/profile"));
    }
    Ok(see_other(&back))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items() -> Vec<ProductListItem> {
        serde_json::from_value(json!([
            { "id": 1, "name": "Sliding Gate", "slug": "sliding-gate", "base_price": "50000", "review_count": 2 },
            { "id": 2, "name": "Spiral Staircase", "slug": "spiral", "base_price": "90000", "review_count": 9 },
            { "id": 3, "name": "Balcony Railing", "slug": "railing", "base_price": "12000", "review_count": 0 }
        ]))
        .unwrap()
    }

    #[test]
    fn local_sorting() {
        let items = items();
        let mut refs: Vec<&ProductListItem> = items.iter().collect();
        sort_products(&mut refs, "price-low");
        assert_eq!(refs[0].id, 3);
        sort_products(&mut refs, "popular");
        assert_eq!(refs[0].id, 2);
        sort_products(&mut refs, "newest");
        assert_eq!(refs.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn custom_description_lists_choices() {
        let mut form = FormPayload::new()
            .text("height", "180")
            .text("width", " ")
            .text("materials", "Mild Steel")
            .text("materials", "Paint")
            .text("notes", "Black finish");
        let text = custom_description("Sliding Gate", &mut form);
        assert_eq!(
            text,
            "Product: Sliding Gate\nDimensions: H:180cm x W:-cm x D:-cm\nSelected Materials: Mild Steel, Paint\nAdditional Notes: Black finish"
        );
        assert!(form.get_all("materials").is_empty());
    }
}
