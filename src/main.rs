#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use axum::body::Body;
    use axum::extract::{Request, State};
    use axum::response::IntoResponse;
    use axum::Router;
    use jotter::app::{App, AppState};
    use jotter::db::repository::MongoDocumentRepository;
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use std::sync::Arc;
    use tower_http::services::ServeDir;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jotter=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting Jotter server...");

    // Load Leptos options from Cargo.toml metadata
    let conf = get_configuration(None).unwrap();
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;
    let site_root = leptos_options.site_root.to_string();

    // Connect to MongoDB
    let mongo_uri =
        std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let mongo_db_name = std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "jotter".to_string());

    let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let mongo_db = mongo_client.database(&mongo_db_name);
    let document_repo: Arc<dyn jotter::db::repository::DocumentRepository> =
        Arc::new(MongoDocumentRepository::new(&mongo_db));

    tracing::info!("Connected to MongoDB at {}", mongo_uri);

    // Build application state
    let app_state = AppState {
        document_repo,
        leptos_options: leptos_options.clone(),
    };

    // Server function handler that injects AppState into context
    async fn server_fn_handler(
        State(app_state): State<AppState>,
        request: Request<Body>,
    ) -> impl IntoResponse {
        leptos_axum::handle_server_fns_with_context(
            move || provide_context(app_state.clone()),
            request,
        )
        .await
    }

    // Generate the Leptos route list for SSR
    let routes = generate_route_list(App);

    // Build the Axum router
    let app = Router::new()
        .route(
            "/api/{*fn_name}",
            axum::routing::get(server_fn_handler).post(server_fn_handler),
        )
        .leptos_routes_with_context(
            &app_state,
            routes,
            {
                let app_state = app_state.clone();
                move || provide_context(app_state.clone())
            },
            move || App(),
        )
        // Static files (including custom.css)
        .fallback_service(ServeDir::new(&site_root))
        .with_state(app_state);

    // Start the server
    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}

// When compiled for WASM (client-side), there's no main function.
// The hydrate() function in lib.rs handles client-side initialization.
#[cfg(not(feature = "ssr"))]
fn main() {
    // This is intentionally empty.
    // Client-side hydration is handled by lib.rs::hydrate()
}
