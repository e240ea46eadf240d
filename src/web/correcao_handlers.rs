// src/web/correcao_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::redacao::{parse_nota, CorrecaoForm, RedacaoListada},
    services::redacao_service,
    state::AppState,
    templates::{render, AdminCorrecoesPage, AdminCorrigirPage},
    web::{mw_auth::SessaoAtual, redirect_sucesso, FeedbackParams},
};
use axum::{
    extract::{Extension, Form, Path, Query, State},
    response::{IntoResponse, Response},
};

async fn carregar_redacao(state: &AppState, redacao_id: &str) -> AppResult<RedacaoListada> {
    redacao_service::find_redacao_by_id(&state.db_pool, redacao_id)
        .await?
        .ok_or(AppError::NotFound("Redação"))
}

// GET /admin/correcoes
pub async fn show_correcoes(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    let redacoes = redacao_service::find_all_redacoes(&state.db_pool).await?;
    let template = AdminCorrecoesPage {
        usuario: &sessao.usuario,
        modo_escuro: sessao.modo_escuro,
        redacoes,
        success_message: params.success,
    };
    render(&template)
}

// GET /admin/corrigir/{id}
pub async fn show_corrigir_form(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(redacao_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let item = carregar_redacao(&state, &redacao_id).await?;

    // Numa nova correção os campos vêm preenchidos com a anterior
    let template = AdminCorrigirPage {
        usuario: &sessao.usuario,
        modo_escuro: sessao.modo_escuro,
        nota: item.redacao.nota.map(|n| n.to_string()).unwrap_or_default(),
        arquivo_corrigido_url: item.redacao.arquivo_corrigido_url.clone().unwrap_or_default(),
        item: &item,
        error: None,
        upload_pubkey: state.config.upload_pubkey.as_deref(),
    };
    render(&template)
}

// POST /admin/corrigir/{id}
pub async fn handle_corrigir(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(redacao_id): Path<String>,
    Form(form): Form<CorrecaoForm>,
) -> AppResult<Response> {
    tracing::info!("POST /admin/corrigir/{}: correção por {}", redacao_id, sessao.usuario.email);

    let resultado = match parse_nota(&form.nota) {
        Ok(nota) => {
            redacao_service::corrigir_redacao(&state.db_pool, &redacao_id, nota, &form.arquivo_corrigido_url)
                .await
        }
        Err(e) => Err(e),
    };

    match resultado {
        Ok(()) => Ok(redirect_sucesso("/admin/correcoes", "Correção enviada com sucesso!").into_response()),
        Err(e @ AppError::Validacao(_)) => {
            let item = carregar_redacao(&state, &redacao_id).await?;
            let template = AdminCorrigirPage {
                usuario: &sessao.usuario,
                modo_escuro: sessao.modo_escuro,
                item: &item,
                nota: form.nota,
                arquivo_corrigido_url: form.arquivo_corrigido_url,
                error: Some(e.mensagem_publica()),
                upload_pubkey: state.config.upload_pubkey.as_deref(),
            };
            Ok((e.status_code(), render(&template)?).into_response())
        }
        Err(e) => Err(e),
    }
}
