//! Documentation of the storefront catalog backend.
//!
//! REST API over an in-memory catalog: categories form a forest (parent
//! references, never a cycle), products hang off categories and vendors,
//! and the navigation tree is served from a TTL cache.
//!
//!
//!
//! # General Infrastructure
//! - Stateless axum handlers over one shared `AppState`
//! - Catalog lives in an in-memory arena behind a single lock; slug and SKU
//!   uniqueness checks run under the write lock, so they cannot race
//! - Category tree is memoized under a fixed key with a 1 hour default TTL
//!   and is invalidated synchronously on every category mutation
//! - With `REDIS_URL` set, the tree cache moves to Redis so multiple
//!   instances share the entry; otherwise it is per-process
//!
//!
//!
//! # Identifier derivation
//!
//! Slugs come from names (`"Home & Garden"` -> `home-garden`); collisions
//! get `-1`, `-2`, ... suffixes. Product SKUs are a 3-letter category
//! prefix plus 8 random hex chars (`ELE-03AF91BC`); variant SKUs append a
//! fragment of the variant value to the parent SKU.
//!
//!
//!
//! # Endpoints
//!
//! ```text
//! GET    /categories              list active (?parent=null | ?parent=<slug>)
//! GET    /categories/tree         cached nested navigation tree
//! POST   /categories              create
//! GET    /categories/{slug}
//! PUT    /categories/{slug}
//! DELETE /categories/{slug}       cascades to subtree, nulls products
//!
//! GET    /products                list active (?category=<slug>)
//! POST   /products
//! GET    /products/{slug}
//! PUT    /products/{slug}
//! DELETE /products/{slug}
//! POST   /products/{slug}/ratings
//! GET    /products/{slug}/images        POST to add, DELETE /{id} to remove
//! GET    /products/{slug}/variants      POST to add
//! GET    /products/{slug}/attributes    POST to add
//!
//! GET    /vendors                 POST, and GET/PUT/DELETE by {slug}
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{delete, get, post},
    Router,
};

use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub mod cache;
pub mod categories;
pub mod config;
pub mod error;
pub mod models;
pub mod products;
pub mod slug;
pub mod state;
pub mod store;
pub mod tree;
pub mod vendors;

use state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/categories/tree", get(categories::category_tree))
        .route(
            "/categories/{slug}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{slug}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/products/{slug}/ratings", post(products::rate_product))
        .route(
            "/products/{slug}/images",
            get(products::list_images).post(products::add_image),
        )
        .route(
            "/products/{slug}/images/{id}",
            delete(products::delete_image),
        )
        .route(
            "/products/{slug}/variants",
            get(products::list_variants).post(products::add_variant),
        )
        .route(
            "/products/{slug}/attributes",
            get(products::list_attributes).post(products::add_attribute),
        )
        .route(
            "/vendors",
            get(vendors::list_vendors).post(vendors::create_vendor),
        )
        .route(
            "/vendors/{slug}",
            get(vendors::get_vendor)
                .put(vendors::update_vendor)
                .delete(vendors::delete_vendor),
        )
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let router = app(state.clone()).layer(cors);

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
