// src/web/mw_auth.rs
use crate::{
    error::AppError,
    models::usuario::Usuario,
    services::user_service,
    state::AppState,
    web::preferencias,
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;
use tower_sessions::Session;

pub const SESSION_USER_ID: &str = "user_id";

/// Contexto da sessão autenticada, posto nas extensões do pedido por `require_auth`
/// e passado pelos handlers aos templates. Desaparece com o logout.
#[derive(Clone, Debug)]
pub struct SessaoAtual {
    pub usuario: Usuario,
    pub modo_escuro: bool,
}

// Middleware que verifica se o utilizador está logado
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = session
        .get::<String>(SESSION_USER_ID)
        .await
        .map_err(|e| {
            tracing::error!("Autenticação MW: Erro ao ler sessão: {:?}", e);
            AppError::SessionError(format!("Erro ao verificar sessão: {}", e))
        })?;

    let Some(user_id) = user_id else {
        tracing::debug!("Autenticação MW: Não autenticado. Redirecionando para /login");
        return Ok(Redirect::to("/login").into_response());
    };

    // O documento do utilizador é relido a cada pedido (créditos sempre atuais)
    let Some(usuario) = user_service::find_user_by_id(&state.db_pool, &user_id).await? else {
        tracing::warn!("Autenticação MW: user_id '{}' da sessão já não existe. Limpando sessão.", user_id);
        session
            .flush()
            .await
            .map_err(|e| AppError::SessionError(format!("Falha ao limpar sessão: {}", e)))?;
        return Ok(Redirect::to("/login").into_response());
    };

    tracing::debug!("Autenticação MW: Utilizador '{}' autenticado.", usuario.email);
    let modo_escuro = preferencias::modo_escuro(&cookies, &state.chave_cookies);
    request
        .extensions_mut()
        .insert(SessaoAtual { usuario, modo_escuro });

    Ok(next.run(request).await)
}
