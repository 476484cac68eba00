//! Products, categories and materials.

use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query};
use axum::response::{Html, Redirect};

use super::{drop_blank, form_page, missing, row_actions, with_flags};
use crate::domain::{Category, CategoryRef, Material, ProductDetail, ProductFilter, ProductListItem};
use crate::error::{AppError, AppResult};
use crate::forms::FormPayload;
use crate::routes::{Visit, number, read_form, see_other, settle, text};
use crate::store::filter_by_text;
use crate::ui::components::badge::{self, BadgeVariant};
use crate::ui::components::input::{self, Input};
use crate::ui::components::{
    ButtonSize, ButtonVariant, button, card, data_table, empty_state, error_banner, page_header,
};
use crate::ui::{escape, flag, format, query_value};

/// The dashboard lists one large page and filters it locally.
const PRODUCT_FETCH: u32 = 100;

const PRODUCT_TYPES: [(&str, &str); 3] = [
    ("standard", "Standard Product"),
    ("custom", "Custom Product"),
    ("service", "Service"),
];

const PRODUCT_FLAGS: [&str; 4] = ["is_price_visible", "is_featured", "is_active", "is_customizable"];

const PRODUCT_NUMBERS: [&str; 7] = [
    "base_price",
    "stock_quantity",
    "low_stock_threshold",
    "length",
    "width",
    "height",
    "weight",
];

const PRODUCT_REQUIRED: [(&str, &str); 3] = [
    ("name", "Product name"),
    ("category", "Category"),
    ("base_price", "Base price"),
];

// ─────────────────────────────────────────────────────────────────────────────
// Shared
// ─────────────────────────────────────────────────────────────────────────────

fn view_mode(raw: Option<&String>) -> &'static str {
    if raw.is_some_and(|v| v == "table") { "table" } else { "grid" }
}

/// Grid/table switch that keeps the current search.
fn view_toggle(path: &str, search: &str, current: &str) -> String {
    let search = if search.is_empty() {
        String::new()
    } else {
        format!("&search={}", query_value(search))
    };
    let links: String = [("grid", "Grid"), ("table", "Table")]
        .iter()
        .map(|(mode, label)| {
            let variant = if *mode == current { "btn-secondary" } else { "btn-ghost" };
            format!(
                r#"<a href="{}" class="btn btn-sm {variant}">{label}</a>"#,
                escape(&format!("{path}?view={mode}{search}"))
            )
        })
        .collect();
    format!(r#"<div class="view-toggle">{links}</div>"#)
}

fn search_form(path: &str, search: &str, view: &str, extra: &str) -> String {
    format!(
        r#"<form method="get" action="{path}" class="filters">{}{extra}<input type="hidden" name="view" value="{view}"><button type="submit" class="btn btn-secondary">Search</button></form>"#,
        Input::text("search", "Search", search).kind("search").render(),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Products
// ─────────────────────────────────────────────────────────────────────────────

fn category_label(product: &ProductListItem) -> &str {
    product
        .category
        .as_ref()
        .and_then(CategoryRef::label)
        .unwrap_or_default()
}

/// Products whose name or category contains `query`, optionally limited to
/// one category name.
fn match_products<'a>(
    items: &'a [ProductListItem],
    query: &str,
    category: Option<&str>,
) -> Vec<&'a ProductListItem> {
    filter_by_text(items, query, |p| vec![p.name.as_str(), category_label(p)])
        .into_iter()
        .filter(|p| category.is_none_or(|c| category_label(p) == c))
        .collect()
}

fn stock(product: &ProductListItem) -> String {
    if !product.is_in_stock {
        badge::badge(BadgeVariant::Error, "Out of stock")
    } else if product.is_low_stock {
        badge::badge(BadgeVariant::Warning, "Low stock")
    } else {
        badge::badge(BadgeVariant::Success, "In stock")
    }
}

fn product_actions(product: &ProductListItem) -> String {
    row_actions(
        &format!("/dashboard/products/{}", product.slug),
        &format!("/dashboard/products/{}/delete", product.slug),
        "product",
    )
}

fn featured(product: &ProductListItem) -> String {
    if product.is_featured {
        badge::badge(BadgeVariant::Info, "Featured")
    } else {
        String::new()
    }
}

fn product_tile(visit: &Visit, product: &ProductListItem) -> String {
    format!(
        r#"<div class="admin-card">{image}<div class="admin-card-body"><h3>{name}</h3><p class="muted">{category}</p><p>{price}</p><div class="badges">{stock}{featured}</div>{actions}</div></div>"#,
        image = card::image(visit.media(product.primary_image.as_deref()).as_deref(), &product.name, "thumb"),
        name = escape(&product.name),
        category = escape(format::or_na(Some(category_label(product)))),
        price = escape(&format::price(product)),
        stock = stock(product),
        featured = featured(product),
        actions = product_actions(product),
    )
}

/// GET /dashboard/products
pub async fn products(
    visit: Visit,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Html<String>> {
    let search = text(query.get("search")).unwrap_or_default();
    let category = text(query.get("category"));
    let view = view_mode(query.get("view"));
    let filter = ProductFilter {
        page_size: Some(PRODUCT_FETCH),
        ..ProductFilter::default()
    };

    let catalog = visit.backend().catalog();
    let (products, categories) = futures::join!(
        visit.session.load(|s| &mut s.products, catalog.products(&filter)),
        visit.session.load_list(|s| &mut s.categories, catalog.categories()),
    );
    settle([products, categories])?;

    let body = visit.session.with_store(|store| {
        let matches = match_products(&store.products.items, &search, category.as_deref());

        let mut category_options = vec![(String::new(), "All categories".to_string())];
        category_options.extend(
            store
                .categories
                .items
                .iter()
                .map(|c| (c.name.clone(), c.name.clone())),
        );
        let category_select = input::select(
            "category",
            "Category",
            &category_options,
            category.as_deref().unwrap_or_default(),
        );

        let listing = if matches.is_empty() {
            empty_state("No products found", "Adjust the search or add a new product.")
        } else if view == "table" {
            let rows: Vec<Vec<String>> = matches
                .iter()
                .map(|p| {
                    vec![
                        card::image(visit.media(p.primary_image.as_deref()).as_deref(), &p.name, "thumb-sm"),
                        escape(&p.name),
                        escape(format::or_na(Some(category_label(p)))),
                        escape(&format::price(p)),
                        stock(p),
                        featured(p),
                        product_actions(p),
                    ]
                })
                .collect();
            data_table(
                &["Image", "Name", "Category", "Price", "Stock", "Featured", ""],
                &rows,
                "No products found",
            )
        } else {
            let tiles: String = matches.iter().map(|p| product_tile(&visit, p)).collect();
            format!(r#"<div class="admin-grid">{tiles}</div>"#)
        };

        format!(
            "{}{}{}{}{}",
            page_header(
                "Products",
                &format!("{} of {} products", matches.len(), store.products.total),
                &button::link("/dashboard/products/new", "Add Product", ButtonVariant::Primary, ButtonSize::Md),
            ),
            error_banner(store.products.error.as_deref()),
            search_form("/dashboard/products", &search, view, &category_select),
            view_toggle("/dashboard/products", &search, view),
            listing,
        )
    });
    Ok(visit.dashboard("Products", "/dashboard/products", &body))
}

fn material_choices(materials: &[Material], chosen: &[i64]) -> String {
    if materials.is_empty() {
        return String::new();
    }
    let boxes: String = materials
        .iter()
        .filter(|m| m.is_active || chosen.contains(&m.id))
        .map(|m| {
            format!(
                r#"<label class="chip"><input type="checkbox" name="materials" value="{}" {}> {}</label>"#,
                m.id,
                flag("checked", chosen.contains(&m.id)),
                escape(&m.name)
            )
        })
        .collect();
    format!(r#"<div class="field"><span>Materials</span><div class="chips">{boxes}</div></div>"#)
}

fn product_form(
    visit: &Visit,
    product: Option<&ProductDetail>,
    categories: &[Category],
    materials: &[Material],
) -> String {
    let summary = product.map(|p| &p.summary);
    let opt = |value: Option<&Option<String>>| value.and_then(Option::as_deref).unwrap_or_default().to_string();

    let category_id = summary
        .and_then(|s| s.category.as_ref())
        .and_then(CategoryRef::id)
        .map(|id| id.to_string())
        .unwrap_or_default();
    let mut category_options = vec![(String::new(), "Select category".to_string())];
    category_options.extend(categories.iter().map(|c| (c.id.to_string(), c.name.clone())));
    let type_options: Vec<(String, String)> = PRODUCT_TYPES
        .iter()
        .map(|(v, l)| ((*v).to_string(), (*l).to_string()))
        .collect();

    let stock_quantity = product.map(|p| p.stock_quantity.to_string()).unwrap_or_default();
    let low_stock = product
        .and_then(|p| p.low_stock_threshold)
        .map(|n| n.to_string())
        .unwrap_or_default();
    let chosen: Vec<i64> = product
        .map(|p| p.materials.iter().map(|m| m.id).collect())
        .unwrap_or_default();
    let length = opt(product.map(|p| &p.length));
    let width = opt(product.map(|p| &p.width));
    let height = opt(product.map(|p| &p.height));
    let weight = opt(product.map(|p| &p.weight));

    let gallery = product
        .map(|p| {
            p.gallery()
                .iter()
                .map(|img| {
                    card::image(
                        visit.media(Some(img.image.as_str())).as_deref(),
                        img.alt_text.as_deref().unwrap_or_default(),
                        if img.is_primary { "thumb primary" } else { "thumb" },
                    )
                })
                .collect::<String>()
        })
        .filter(|html| !html.is_empty())
        .map(|html| format!(r#"<div class="field"><span>Current images</span><div class="thumbs">{html}</div></div>"#))
        .unwrap_or_default();

    let fields = [
        Input::text("name", "Product name", summary.map_or("", |s| s.name.as_str()))
            .required()
            .render(),
        input::select("category", "Category *", &category_options, &category_id),
        input::select(
            "product_type",
            "Product type",
            &type_options,
            summary.map_or("standard", |s| s.product_type.as_str()),
        ),
        Input::text("base_price", "Base price (Rs.)", summary.map_or("", |s| s.base_price.as_str()))
            .kind("number")
            .required()
            .render(),
        input::checkbox("is_price_visible", "Show price", summary.is_none_or(|s| s.is_price_visible)),
        Input::text("stock_quantity", "Stock quantity", &stock_quantity)
            .kind("number")
            .render(),
        Input::text("low_stock_threshold", "Low stock threshold", &low_stock)
            .kind("number")
            .render(),
        input::textarea(
            "description",
            "Description",
            summary.and_then(|s| s.description.as_deref()).unwrap_or_default(),
            5,
            false,
        ),
        input::checkbox("is_featured", "Featured", summary.is_some_and(|s| s.is_featured)),
        input::checkbox("is_active", "Active", product.is_none_or(|p| p.is_active)),
        input::checkbox("is_customizable", "Customizable", summary.is_some_and(|s| s.is_customizable)),
        input::textarea(
            "customization_note",
            "Customization note",
            product.and_then(|p| p.customization_note.as_deref()).unwrap_or_default(),
            2,
            false,
        ),
        format!(
            r#"<div class="field-row">{}{}{}{}</div>"#,
            Input::text("length", "Length (cm)", &length).kind("number").render(),
            Input::text("width", "Width (cm)", &width).kind("number").render(),
            Input::text("height", "Height (cm)", &height).kind("number").render(),
            Input::text("weight", "Weight (kg)", &weight).kind("number").render(),
        ),
        material_choices(materials, &chosen),
        gallery,
        input::file("images", "Add images", true, "image/*"),
        Input::text("primary_image_index", "Primary image (position of the new upload)", "0")
            .kind("number")
            .render(),
        input::textarea(
            "meta_description",
            "Meta description",
            product.map_or("", |p| p.meta_description.as_str()),
            2,
            false,
        ),
        Input::text("meta_keywords", "Meta keywords", product.map_or("", |p| p.meta_keywords.as_str()))
            .render(),
    ];
    let (action, label) = match summary {
        Some(s) => (format!("/dashboard/products/{}", s.slug), "Save Changes"),
        None => ("/dashboard/products".to_string(), "Create Product"),
    };
    input::form(&action, true, &fields, label)
}

/// Normalizes a product submission: explicit flags, no blank numbers, one
/// alt text per uploaded image.
fn product_payload(form: FormPayload) -> FormPayload {
    let mut form = drop_blank(with_flags(form, &PRODUCT_FLAGS), &PRODUCT_NUMBERS);
    let uploads = form.files().iter().filter(|f| f.name == "images").count();
    let index = number::<usize>(form.take("primary_image_index").first().map(String::as_str));
    if uploads > 0 {
        let alt = form.value("name").unwrap_or_default();
        for _ in 0..uploads {
            form.push_text("alt_texts", alt.clone());
        }
        let index = index.filter(|i| *i < uploads).unwrap_or(0);
        form.push_text("primary_image_index", index.to_string());
    }
    form
}

/// GET /dashboard/products/new
pub async fn new_product(visit: Visit) -> AppResult<Html<String>> {
    let catalog = visit.backend().catalog();
    let (categories, materials) = futures::join!(
        visit.session.load_list(|s| &mut s.categories, catalog.categories()),
        visit.session.load_list(|s| &mut s.materials, catalog.materials()),
    );
    settle([categories, materials])?;
    let form = visit
        .session
        .with_store(|store| product_form(&visit, None, &store.categories.items, &store.materials.items));
    Ok(form_page(&visit, "Add Product", "/dashboard/products", "/dashboard/products", &form))
}

/// POST /dashboard/products
pub async fn create_product(visit: Visit, multipart: Multipart) -> AppResult<Redirect> {
    let form = product_payload(read_form(multipart).await?);
    if let Some(message) = missing(&form, &PRODUCT_REQUIRED) {
        visit.session.error(message);
        return Ok(see_other("/dashboard/products/new"));
    }
    let result = visit.backend().catalog().create_product(form).await;
    if let Some(product) = visit.flash(result, "Product created successfully")? {
        tracing::info!(name: "dashboard.product_created", slug = %product.slug, "Product created");
        visit.session.update_store(|s| s.products.prepended(product));
        return Ok(see_other("/dashboard/products"));
    }
    Ok(see_other("/dashboard/products/new"))
}

/// GET /dashboard/products/{slug}
pub async fn edit_product(visit: Visit, Path(slug): Path<String>) -> AppResult<Html<String>> {
    let catalog = visit.backend().catalog();
    let (product, categories, materials) = futures::join!(
        visit.session.load_one(|s| &mut s.current_product, catalog.product(&slug)),
        visit.session.load_list(|s| &mut s.categories, catalog.categories()),
        visit.session.load_list(|s| &mut s.materials, catalog.materials()),
    );
    if product.as_ref().is_err_and(|err| err.is_not_found()) {
        return Err(AppError::NotFound("Product not found".into()));
    }
    settle([product, categories, materials])?;

    let (title, form) = visit.session.with_store(|store| {
        match store.current_product.value.as_ref().filter(|p| p.summary.slug == slug) {
            Some(product) => (
                format!("Edit {}", product.summary.name),
                product_form(&visit, Some(product), &store.categories.items, &store.materials.items),
            ),
            None => (
                "Edit Product".to_string(),
                error_banner(store.current_product.error.as_deref()),
            ),
        }
    });
    Ok(form_page(&visit, &title, "/dashboard/products", "/dashboard/products", &form))
}

/// POST /dashboard/products/{slug}
pub async fn update_product(
    visit: Visit,
    Path(slug): Path<String>,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let back = format!("/dashboard/products/{slug}");
    let form = product_payload(read_form(multipart).await?);
    if let Some(message) = missing(&form, &PRODUCT_REQUIRED) {
        visit.session.error(message);
        return Ok(see_other(&back));
    }
    let result = visit.backend().catalog().update_product(&slug, form).await;
    if let Some(product) = visit.flash(result, "Product updated successfully")? {
        tracing::info!(name: "dashboard.product_updated", slug = %product.slug, "Product updated");
        // A rename changes the slug.
        let back = format!("/dashboard/products/{}", product.slug);
        visit.session.update_store(|s| {
            s.products.updated(product);
            s.current_product.clear();
        });
        return Ok(see_other(&back));
    }
    Ok(see_other(&back))
}

/// POST /dashboard/products/{slug}/delete
pub async fn delete_product(visit: Visit, Path(slug): Path<String>) -> AppResult<Redirect> {
    let result = visit.backend().catalog().delete_product(&slug).await;
    if visit.flash(result, "Product deleted successfully")?.is_some() {
        tracing::info!(name: "dashboard.product_deleted", slug = %slug, "Product deleted");
        visit.session.update_store(|s| s.products.removed(&slug));
    }
    Ok(see_other("/dashboard/products"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Categories
// ─────────────────────────────────────────────────────────────────────────────

fn match_categories<'a>(items: &'a [Category], query: &str) -> Vec<&'a Category> {
    filter_by_text(items, query, |c| {
        vec![c.name.as_str(), c.description.as_deref().unwrap_or_default()]
    })
}

fn category_actions(category: &Category) -> String {
    row_actions(
        &format!("/dashboard/categories/{}", category.id),
        &format!("/dashboard/categories/{}/delete", category.id),
        "category",
    )
}

fn category_fields(category: Option<&Category>) -> Vec<String> {
    vec![
        Input::text("name", "Name", category.map_or("", |c| c.name.as_str()))
            .required()
            .render(),
        input::textarea(
            "description",
            "Description",
            category.and_then(|c| c.description.as_deref()).unwrap_or_default(),
            3,
            false,
        ),
        input::file("image", "Image", false, "image/*"),
    ]
}

/// GET /dashboard/categories
pub async fn categories(
    visit: Visit,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Html<String>> {
    let search = text(query.get("search")).unwrap_or_default();
    let view = view_mode(query.get("view"));
    let catalog = visit.backend().catalog();
    settle([visit.session.load_list(|s| &mut s.categories, catalog.categories()).await])?;

    let body = visit.session.with_store(|store| {
        let matches = match_categories(&store.categories.items, &search);
        let listing = if matches.is_empty() {
            empty_state("No categories found", "Create one with the form alongside.")
        } else if view == "table" {
            let rows: Vec<Vec<String>> = matches
                .iter()
                .map(|c| {
                    vec![
                        card::image(visit.media(c.image.as_deref()).as_deref(), &c.name, "thumb-sm"),
                        escape(&c.name),
                        escape(&format::excerpt(c.description.as_deref().unwrap_or_default(), 80)),
                        c.product_count.to_string(),
                        badge::active(c.is_active),
                        category_actions(c),
                    ]
                })
                .collect();
            data_table(
                &["Image", "Name", "Description", "Products", "Status", ""],
                &rows,
                "No categories found",
            )
        } else {
            let tiles: String = matches
                .iter()
                .map(|c| {
                    format!(
                        r#"<div class="admin-card">{image}<div class="admin-card-body"><h3>{name}</h3><p class="muted">{description}</p><p>{count} products</p>{actions}</div></div>"#,
                        image = card::image(visit.media(c.image.as_deref()).as_deref(), &c.name, "thumb"),
                        name = escape(&c.name),
                        description = escape(&format::excerpt(c.description.as_deref().unwrap_or_default(), 120)),
                        count = c.product_count,
                        actions = category_actions(c),
                    )
                })
                .collect();
            format!(r#"<div class="admin-grid">{tiles}</div>"#)
        };

        format!(
            r#"{}{}{}{}<div class="split"><div>{}</div><aside>{}</aside></div>"#,
            page_header(
                "Categories",
                &format!("{} categories", store.categories.items.len()),
                ""
            ),
            error_banner(store.categories.error.as_deref()),
            search_form("/dashboard/categories", &search, view, ""),
            view_toggle("/dashboard/categories", &search, view),
            listing,
            card(
                Some("New Category"),
                &input::form("/dashboard/categories", true, &category_fields(None), "Create Category")
            ),
        )
    });
    Ok(visit.dashboard("Categories", "/dashboard/categories", &body))
}

/// POST /dashboard/categories
pub async fn create_category(visit: Visit, multipart: Multipart) -> AppResult<Redirect> {
    let form = read_form(multipart).await?.without_blank();
    if let Some(message) = missing(&form, &[("name", "Category name")]) {
        visit.session.error(message);
        return Ok(see_other("/dashboard/categories"));
    }
    let result = visit.backend().catalog().create_category(form).await;
    if let Some(category) = visit.flash(result, "Category created successfully")? {
        tracing::info!(name: "dashboard.category_created", id = category.id, "Category created");
        visit.session.update_store(|s| s.categories.inserted(category));
    }
    Ok(see_other("/dashboard/categories"))
}

/// GET /dashboard/categories/{id}
pub async fn edit_category(visit: Visit, Path(id): Path<i64>) -> AppResult<Html<String>> {
    let category = match visit.backend().catalog().category(id).await {
        Ok(category) => category,
        Err(err) if err.is_not_found() => return Err(AppError::NotFound("Category not found".into())),
        Err(err) => return Err(err.into()),
    };
    let mut fields = category_fields(Some(&category));
    if let Some(src) = visit.media(category.image.as_deref()) {
        fields.insert(
            2,
            format!(
                r#"<div class="field"><span>Current image</span>{}</div>{}"#,
                card::image(Some(src.as_str()), &category.name, "thumb"),
                input::checkbox("remove_image", "Remove current image", false)
            ),
        );
    }
    let form = input::form(&format!("/dashboard/categories/{id}"), true, &fields, "Save Changes");
    Ok(form_page(
        &visit,
        &format!("Edit {}", category.name),
        "/dashboard/categories",
        "/dashboard/categories",
        &form,
    ))
}

/// A ticked "remove" box clears the image unless a replacement was uploaded.
fn category_payload(mut form: FormPayload) -> FormPayload {
    let remove = form.take("remove_image").iter().any(|v| v == "true");
    if remove && !form.has_file("image") {
        form.push_text("image", "");
    }
    form
}

/// POST /dashboard/categories/{id}
pub async fn update_category(
    visit: Visit,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let back = format!("/dashboard/categories/{id}");
    let form = category_payload(read_form(multipart).await?);
    if let Some(message) = missing(&form, &[("name", "Category name")]) {
        visit.session.error(message);
        return Ok(see_other(&back));
    }
    let result = visit.backend().catalog().update_category(id, form).await;
    if let Some(category) = visit.flash(result, "Category updated successfully")? {
        visit.session.update_store(|s| s.categories.updated(category));
    }
    Ok(see_other(&back))
}

/// POST /dashboard/categories/{id}/delete
pub async fn delete_category(visit: Visit, Path(id): Path<i64>) -> AppResult<Redirect> {
    let result = visit.backend().catalog().delete_category(id).await;
    if visit.flash(result, "Category deleted successfully")?.is_some() {
        tracing::info!(name: "dashboard.category_deleted", id, "Category deleted");
        visit.session.update_store(|s| s.categories.removed(&id));
    }
    Ok(see_other("/dashboard/categories"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Materials
// ─────────────────────────────────────────────────────────────────────────────

fn material_form(material: Option<&Material>) -> String {
    let fields = [
        Input::text("name", "Name", material.map_or("", |m| m.name.as_str()))
            .required()
            .render(),
        input::textarea(
            "description",
            "Description",
            material.and_then(|m| m.description.as_deref()).unwrap_or_default(),
            3,
            false,
        ),
        input::file("image", "Image", false, "image/*"),
        input::checkbox("is_active", "Active", material.is_none_or(|m| m.is_active)),
    ];
    match material {
        Some(m) => input::form(&format!("/dashboard/materials/{}", m.id), true, &fields, "Save Changes"),
        None => input::form("/dashboard/materials", true, &fields, "Add Material"),
    }
}

/// GET /dashboard/materials - `?edit={id}` swaps the side form to that material.
pub async fn materials(
    visit: Visit,
    Query(query): Query<HashMap<String, String>>,
) -> AppResult<Html<String>> {
    let editing: Option<i64> = number(query.get("edit").map(String::as_str));
    let catalog = visit.backend().catalog();
    settle([visit.session.load_list(|s| &mut s.materials, catalog.materials()).await])?;

    let body = visit.session.with_store(|store| {
        let rows: Vec<Vec<String>> = store
            .materials
            .items
            .iter()
            .map(|m| {
                vec![
                    card::image(visit.media(m.image.as_deref()).as_deref(), &m.name, "thumb-sm"),
                    escape(&m.name),
                    escape(format::or_dash(m.description.as_deref())),
                    badge::active(m.is_active),
                    row_actions(
                        &format!("/dashboard/materials?edit={}", m.id),
                        &format!("/dashboard/materials/{}/delete", m.id),
                        "material",
                    ),
                ]
            })
            .collect();
        let current = editing.and_then(|id| store.materials.find(&id));
        let side = match current {
            Some(m) => card(Some(format!("Edit {}", m.name).as_str()), &material_form(Some(m))),
            None => card(Some("New Material"), &material_form(None)),
        };
        format!(
            r#"{}{}<div class="split"><div>{}</div><aside>{}</aside></div>"#,
            page_header("Materials", "Raw materials offered on products", ""),
            error_banner(store.materials.error.as_deref()),
            data_table(&["Image", "Name", "Description", "Status", ""], &rows, "No materials yet"),
            side,
        )
    });
    Ok(visit.dashboard("Materials", "/dashboard/materials", &body))
}

/// POST /dashboard/materials
pub async fn create_material(visit: Visit, multipart: Multipart) -> AppResult<Redirect> {
    let form = with_flags(read_form(multipart).await?.without_blank(), &["is_active"]);
    if let Some(message) = missing(&form, &[("name", "Material name")]) {
        visit.session.error(message);
        return Ok(see_other("/dashboard/materials"));
    }
    let result = visit.backend().catalog().create_material(form).await;
    if let Some(material) = visit.flash(result, "Material added successfully")? {
        visit.session.update_store(|s| s.materials.inserted(material));
    }
    Ok(see_other("/dashboard/materials"))
}

/// POST /dashboard/materials/{id}
pub async fn update_material(
    visit: Visit,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let form = with_flags(read_form(multipart).await?, &["is_active"]);
    if let Some(message) = missing(&form, &[("name", "Material name")]) {
        visit.session.error(message);
        return Ok(see_other(&format!("/dashboard/materials?edit={id}")));
    }
    let result = visit.backend().catalog().update_material(id, form).await;
    if let Some(material) = visit.flash(result, "Material updated successfully")? {
        visit.session.update_store(|s| s.materials.updated(material));
    }
    Ok(see_other("/dashboard/materials"))
}

/// POST /dashboard/materials/{id}/delete
pub async fn delete_material(visit: Visit, Path(id): Path<i64>) -> AppResult<Redirect> {
    let result = visit.backend().catalog().delete_material(id).await;
    if visit.flash(result, "Material deleted successfully")?.is_some() {
        visit.session.update_store(|s| s.materials.removed(&id));
    }
    Ok(see_other("/dashboard/materials"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FilePart;
    use axum::body::Bytes;
    use serde_json::json;

    fn upload(name: &str) -> FilePart {
        FilePart {
            name: name.to_string(),
            file_name: "gate.jpg".to_string(),
            content_type: Some("image/jpeg".to_string()),
            data: Bytes::from_static(b"jpeg"),
        }
    }

    #[test]
    fn product_search_covers_category_names() {
        let items: Vec<ProductListItem> = serde_json::from_value(json!([
            { "id": 1, "name": "Sliding Gate", "slug": "sliding-gate", "category": "Gates" },
            { "id": 2, "name": "Balcony Rail", "slug": "balcony-rail", "category": "Railings" },
            { "id": 3, "name": "Spiral Stair", "slug": "spiral", "category": 4 }
        ]))
        .unwrap();
        assert_eq!(match_products(&items, "rail", None).len(), 1);
        assert_eq!(match_products(&items, "GATES", None)[0].id, 1);
        assert_eq!(match_products(&items, "", Some("Railings"))[0].id, 2);
        assert_eq!(match_products(&items, "", None).len(), 3);
    }

    #[test]
    fn product_payload_labels_uploads() {
        let form = FormPayload::new()
            .text("name", "Sliding Gate")
            .text("base_price", "45000")
            .text("weight", "")
            .text("primary_image_index", "5")
            .file(upload("images"))
            .file(upload("images"));
        let form = product_payload(form);
        assert_eq!(form.get_all("alt_texts"), vec!["Sliding Gate", "Sliding Gate"]);
        assert_eq!(form.get("primary_image_index"), Some("0"));
        assert_eq!(form.get("weight"), None);
        assert_eq!(form.get("is_featured"), Some("false"));
    }

    #[test]
    fn product_payload_without_uploads_sends_no_index() {
        let form = product_payload(FormPayload::new().text("name", "Gate").text("primary_image_index", "0"));
        assert_eq!(form.get("primary_image_index"), None);
        assert!(form.get_all("alt_texts").is_empty());
    }

    #[test]
    fn category_search_reads_descriptions() {
        let items: Vec<Category> = serde_json::from_value(json!([
            { "id": 1, "name": "Gates", "slug": "gates", "description": "Sliding and swing" },
            { "id": 2, "name": "Railings", "slug": "railings" }
        ]))
        .unwrap();
        assert_eq!(match_categories(&items, "swing")[0].id, 1);
        assert_eq!(match_categories(&items, "rail")[0].id, 2);
    }

    #[test]
    fn removing_category_image_sends_blank() {
        let form = category_payload(FormPayload::new().text("name", "Gates").text("remove_image", "true"));
        assert_eq!(form.get("image"), Some(""));
        assert_eq!(form.get("remove_image"), None);

        let form = category_payload(
            FormPayload::new()
                .text("remove_image", "true")
                .file(upload("image")),
        );
        assert_eq!(form.get("image"), None);
    }

    #[test]
    fn table_view_is_opt_in() {
        assert_eq!(view_mode(Some(&"table".to_string())), "table");
        assert_eq!(view_mode(Some(&"cards".to_string())), "grid");
        assert_eq!(view_mode(None), "grid");
    }
}
