// src/web/redacao_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::redacao::NovaRedacaoForm,
    services::{redacao_service, tema_service},
    state::AppState,
    templates::{render, NovaRedacaoPage},
    web::{mw_auth::SessaoAtual, redirect_sucesso},
};
use axum::{
    extract::{Extension, Form, Path, State},
    response::{IntoResponse, Response},
};

// GET /redacao/novo/{id}
pub async fn show_nova_redacao(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(tema_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let tema = tema_service::find_tema_by_id(&state.db_pool, &tema_id)
        .await?
        .ok_or(AppError::NotFound("Tema"))?;

    // Sem créditos o formulário aparece, mas com o aviso e sem botão de envio
    let error = (!sessao.usuario.pode_enviar_redacao())
        .then(|| AppError::CreditosInsuficientes.mensagem_publica());

    let template = NovaRedacaoPage {
        usuario: &sessao.usuario,
        modo_escuro: sessao.modo_escuro,
        tema: &tema,
        titulo: String::new(),
        arquivo_url: String::new(),
        error,
        upload_pubkey: state.config.upload_pubkey.as_deref(),
    };
    render(&template)
}

// POST /redacao/novo/{id}
pub async fn handle_nova_redacao(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(tema_id): Path<String>,
    Form(form): Form<NovaRedacaoForm>,
) -> AppResult<Response> {
    tracing::info!("POST /redacao/novo/{}: envio de {}", tema_id, sessao.usuario.email);

    let resultado = redacao_service::enviar_redacao(
        &state.db_pool,
        &sessao.usuario.id,
        &tema_id,
        &form.titulo,
        &form.arquivo_url,
    )
    .await;

    match resultado {
        Ok(redacao) => {
            tracing::info!("Redação {} enviada por {}", redacao.id, sessao.usuario.email);
            Ok(redirect_sucesso("/home?aba=minhas-redacoes", "Redação enviada com sucesso!").into_response())
        }
        Err(e @ (AppError::Validacao(_) | AppError::CreditosInsuficientes)) => {
            // Erro mostrado no próprio formulário, mantendo o que o aluno escreveu
            let tema = tema_service::find_tema_by_id(&state.db_pool, &tema_id)
                .await?
                .ok_or(AppError::NotFound("Tema"))?;
            let template = NovaRedacaoPage {
                usuario: &sessao.usuario,
                modo_escuro: sessao.modo_escuro,
                tema: &tema,
                titulo: form.titulo,
                arquivo_url: form.arquivo_url,
                error: Some(e.mensagem_publica()),
                upload_pubkey: state.config.upload_pubkey.as_deref(),
            };
            Ok((e.status_code(), render(&template)?).into_response())
        }
        Err(e) => Err(e),
    }
}
