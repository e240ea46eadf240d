// src/web/admin_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::credito::{validar_quantidade, AcaoCredito},
    services::{redacao_service, user_service},
    state::AppState,
    templates::{render, AdminPage},
    web::{mw_auth::SessaoAtual, redirect_erro, redirect_sucesso, FeedbackParams},
};
use axum::{
    extract::{Extension, Form, Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;

// A quantidade chega como texto: um campo vazio é válido para "zero"
#[derive(Deserialize, Debug)]
pub struct CreditosForm {
    #[serde(default)]
    quantidade: String,
    acao: String,
}

async fn aplicar_ajuste(state: &AppState, user_id: &str, form: &CreditosForm) -> AppResult<i64> {
    let acao: AcaoCredito = form.acao.parse()?;
    let quantidade = form.quantidade.trim();
    let quantidade = if quantidade.is_empty() {
        None
    } else {
        Some(quantidade.parse::<i64>().map_err(|_| {
            AppError::Validacao("A quantidade deve ser um número inteiro.".to_string())
        })?)
    };
    let quantidade = validar_quantidade(acao, quantidade)?;
    user_service::ajustar_creditos(&state.db_pool, user_id, quantidade, acao).await
}

/// Handler para GET /admin - painel com as abas de utilizadores e de redações
pub async fn show_admin_page(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    let aba = match params.aba.as_deref() {
        Some("redacoes") => "redacoes",
        _ => "usuarios",
    };
    tracing::debug!("GET /admin: Carregando aba {}", aba);

    let (usuarios, redacoes) = if aba == "usuarios" {
        (user_service::find_all_users(&state.db_pool).await?, Vec::new())
    } else {
        (Vec::new(), redacao_service::find_all_redacoes(&state.db_pool).await?)
    };

    let template = AdminPage {
        usuario: &sessao.usuario,
        modo_escuro: sessao.modo_escuro,
        aba,
        usuarios,
        redacoes,
        success_message: params.success,
        error_message: params.error,
    };
    render(&template)
}

/// Handler para POST /admin/usuarios/{id}/creditos
pub async fn handle_creditos(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(user_id): Path<String>,
    Form(form): Form<CreditosForm>,
) -> AppResult<Redirect> {
    tracing::info!(
        "POST /admin/usuarios/{}/creditos: {} pede '{}' ({})",
        user_id,
        sessao.usuario.email,
        form.acao,
        form.quantidade
    );

    let resultado = aplicar_ajuste(&state, &user_id, &form).await;

    // Post/Redirect/Get: erros do administrador voltam como mensagem no painel
    match resultado {
        Ok(saldo) => Ok(redirect_sucesso(
            "/admin",
            &format!("Créditos atualizados. Novo saldo: {}", saldo),
        )),
        Err(e @ (AppError::Validacao(_) | AppError::NotFound(_))) => {
            tracing::warn!("Ajuste de créditos recusado para {}: {}", user_id, e);
            Ok(redirect_erro("/admin", &e.mensagem_publica()))
        }
        Err(e) => Err(e),
    }
}
