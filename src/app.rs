use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{
    achievements, audit, auth, education, health, orders, portfolios, positions, securities,
    transactions, users, watchlists,
};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/auth", auth::router())
        .nest("/api/users", users::router())
        .nest("/api/securities", securities::router())
        .nest("/api/portfolios", portfolios::router())
        .nest("/api/positions", positions::router())
        .nest("/api/orders", orders::router())
        .nest("/api/transactions", transactions::router())
        .nest("/api/watchlists", watchlists::router())
        .nest("/api/education", education::router())
        .nest("/api/achievements", achievements::router())
        .nest("/api/audit", audit::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
