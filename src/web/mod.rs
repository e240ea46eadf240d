// src/web/mod.rs
pub mod admin_handlers;
pub mod auth_handlers;
pub mod correcao_handlers;
pub mod home_handlers;
pub mod mw_admin;
pub mod mw_auth;
pub mod preferencias;
pub mod redacao_handlers;
pub mod routes;
pub mod tema_handlers;


use axum::response::Redirect;
use serde::Deserialize;

// Mensagens de feedback passadas por query string (padrão Post/Redirect/Get)
#[derive(Deserialize, Debug, Default)]
pub struct FeedbackParams {
    pub aba: Option<String>,
    pub success: Option<String>,
    pub error: Option<String>,
}

pub fn redirect_sucesso(caminho: &str, mensagem: &str) -> Redirect {
    redirect_feedback(caminho, "success", mensagem)
}

pub fn redirect_erro(caminho: &str, mensagem: &str) -> Redirect {
    redirect_feedback(caminho, "error", mensagem)
}

fn redirect_feedback(caminho: &str, chave: &str, mensagem: &str) -> Redirect {
    let separador = if caminho.contains('?') { '&' } else { '?' };
    let redirect_url = format!(
        "{}{}{}={}",
        caminho,
        separador,
        chave,
        urlencoding::encode(mensagem)
    );
    Redirect::to(&redirect_url)
}
