// src/web/routes.rs
use crate::{
    state::AppState,
    web::{
        admin_handlers, auth_handlers, correcao_handlers, home_handlers, mw_admin, mw_auth,
        preferencias, redacao_handlers, tema_handlers,
    },
};
use axum::{
    middleware,
    response::Redirect,
    routing::{get, post},
    Router,
};
use time::Duration;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route("/login", get(auth_handlers::show_login_form).post(auth_handlers::handle_login))
        .route("/cadastro", get(auth_handlers::show_cadastro_form).post(auth_handlers::handle_cadastro))
        .route("/logout", get(auth_handlers::handle_logout))
        .route("/preferencias/modo-escuro", post(preferencias::alternar_modo_escuro))
        .route("/", get(|| async { Redirect::to("/home") }));

    // --- Rotas de Admin ---
    // mw_admin corre depois de mw_auth (aplicado no router pai)
    let admin_routes = Router::new()
        .route("/", get(admin_handlers::show_admin_page))
        .route("/usuarios/{id}/creditos", post(admin_handlers::handle_creditos))
        .route("/correcoes", get(correcao_handlers::show_correcoes))
        .route(
            "/corrigir/{id}",
            get(correcao_handlers::show_corrigir_form).post(correcao_handlers::handle_corrigir),
        )
        .route("/temas", get(tema_handlers::show_admin_temas).post(tema_handlers::handle_criar_tema))
        .route("/temas/novo", get(tema_handlers::show_novo_tema_form))
        .route(
            "/temas/{id}/editar",
            get(tema_handlers::show_editar_tema_form).post(tema_handlers::handle_editar_tema),
        )
        .route("/temas/{id}/apagar", post(tema_handlers::handle_apagar_tema))
        .route_layer(middleware::from_fn(mw_admin::require_admin));

    // --- Rotas Autenticadas ---
    let authenticated_routes = Router::new()
        .route("/home", get(home_handlers::home_page))
        .route("/temas/{id}", get(home_handlers::show_tema))
        .route(
            "/redacao/novo/{id}",
            get(redacao_handlers::show_nova_redacao).post(redacao_handlers::handle_nova_redacao),
        )
        .nest("/admin", admin_routes)
        // require_auth em TODAS as rotas acima, incluindo /admin/*
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}

/// Router completo com as camadas de trace, cookies e sessão.
pub fn create_app(app_state: AppState, session_store: SqliteStore) -> Router {
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)));

    create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CookieManagerLayer::new())
            .layer(session_layer),
    )
}
