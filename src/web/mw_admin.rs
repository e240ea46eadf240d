// src/web/mw_admin.rs
use crate::{error::AppError, web::mw_auth::SessaoAtual};
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};

/// Middleware que verifica se o utilizador logado é administrador.
/// Deve ser executado *depois* do middleware `require_auth`.
pub async fn require_admin(
    Extension(sessao): Extension<SessaoAtual>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if sessao.usuario.admin {
        tracing::debug!("Admin MW: Acesso admin concedido para {}", sessao.usuario.email);
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Admin MW: Acesso negado para {} (não é admin).", sessao.usuario.email);
        Err(AppError::Forbidden)
    }
}
