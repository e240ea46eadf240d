// src/web/home_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{estatisticas::Estatisticas, redacao::Redacao, tema::separar_destaque},
    services::{redacao_service, tema_service},
    state::AppState,
    templates::{render, HomePage, TemaPage},
    web::{mw_auth::SessaoAtual, FeedbackParams},
};
use axum::{
    extract::{Extension, Path, Query, State},
    response::IntoResponse,
};

const ABAS: [&str; 3] = ["temas", "minhas-redacoes", "desempenho"];

// GET /home?aba=...
pub async fn home_page(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    let aba = params
        .aba
        .as_deref()
        .and_then(|a| ABAS.iter().find(|x| **x == a).copied())
        .unwrap_or(ABAS[0]);
    tracing::debug!("GET /home: {} na aba {}", sessao.usuario.email, aba);

    let (destaque, temas) = if aba == "temas" {
        separar_destaque(tema_service::find_all_temas(&state.db_pool).await?)
    } else {
        (None, Vec::new())
    };

    let (redacoes, estatisticas) = if aba == "temas" {
        (Vec::new(), Estatisticas::default())
    } else {
        let redacoes = redacao_service::find_redacoes_by_user(&state.db_pool, &sessao.usuario.id).await?;
        let apenas: Vec<Redacao> = redacoes.iter().map(|r| r.redacao.clone()).collect();
        (redacoes, Estatisticas::calcular(&apenas))
    };

    let template = HomePage {
        usuario: &sessao.usuario,
        modo_escuro: sessao.modo_escuro,
        aba,
        destaque,
        temas,
        redacoes,
        estatisticas,
        success_message: params.success,
    };
    render(&template)
}

// GET /temas/{id}
pub async fn show_tema(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(tema_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let tema = tema_service::find_tema_by_id(&state.db_pool, &tema_id)
        .await?
        .ok_or(AppError::NotFound("Tema"))?;

    let template = TemaPage {
        usuario: &sessao.usuario,
        modo_escuro: sessao.modo_escuro,
        tema,
    };
    render(&template)
}
