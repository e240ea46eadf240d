// src/web/tema_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::tema::{conteudo_para_texto, DadosTema, Dificuldade, TemaForm},
    services::tema_service,
    state::AppState,
    templates::{render, AdminTemaFormPage, AdminTemasPage},
    web::{mw_auth::SessaoAtual, redirect_erro, redirect_sucesso, FeedbackParams},
};
use axum::{
    extract::{Extension, Form, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};

fn formulario<'a>(
    sessao: &'a SessaoAtual,
    tema_id: Option<String>,
    form: TemaForm,
    error: Option<String>,
) -> AdminTemaFormPage<'a> {
    AdminTemaFormPage {
        usuario: &sessao.usuario,
        modo_escuro: sessao.modo_escuro,
        tema_id,
        titulo: form.titulo,
        dificuldade: form.dificuldade,
        destaque: form.destaque.is_some(),
        conteudo: form.conteudo,
        dificuldades: Dificuldade::TODAS,
        error,
    }
}

// GET /admin/temas
pub async fn show_admin_temas(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    let temas = tema_service::find_all_temas(&state.db_pool).await?;
    let template = AdminTemasPage {
        usuario: &sessao.usuario,
        modo_escuro: sessao.modo_escuro,
        temas,
        success_message: params.success,
        error_message: params.error,
    };
    render(&template)
}

// GET /admin/temas/novo
pub async fn show_novo_tema_form(Extension(sessao): Extension<SessaoAtual>) -> AppResult<impl IntoResponse> {
    let vazio = TemaForm {
        titulo: String::new(),
        dificuldade: Dificuldade::Medio.as_str().to_string(),
        destaque: None,
        conteudo: String::new(),
    };
    render(&formulario(&sessao, None, vazio, None))
}

// POST /admin/temas
pub async fn handle_criar_tema(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Form(form): Form<TemaForm>,
) -> AppResult<Response> {
    tracing::info!("POST /admin/temas: {} cria '{}'", sessao.usuario.email, form.titulo);

    let dados = match DadosTema::try_from(&form) {
        Ok(d) => d,
        Err(e @ AppError::Validacao(_)) => {
            let pagina = formulario(&sessao, None, form, Some(e.mensagem_publica()));
            return Ok((e.status_code(), render(&pagina)?).into_response());
        }
        Err(e) => return Err(e),
    };

    tema_service::criar_tema(&state.db_pool, &dados, Some(&sessao.usuario.email)).await?;
    Ok(redirect_sucesso("/admin/temas", &format!("Tema '{}' criado.", dados.titulo)).into_response())
}

// GET /admin/temas/{id}/editar
pub async fn show_editar_tema_form(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(tema_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let tema = tema_service::find_tema_by_id(&state.db_pool, &tema_id)
        .await?
        .ok_or(AppError::NotFound("Tema"))?;

    let atual = TemaForm {
        titulo: tema.titulo,
        dificuldade: tema.dificuldade.as_str().to_string(),
        destaque: tema.destaque.then(|| "on".to_string()),
        conteudo: conteudo_para_texto(&tema.conteudo),
    };
    render(&formulario(&sessao, Some(tema.id), atual, None))
}

// POST /admin/temas/{id}/editar
pub async fn handle_editar_tema(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(tema_id): Path<String>,
    Form(form): Form<TemaForm>,
) -> AppResult<Response> {
    tracing::info!("POST /admin/temas/{}/editar por {}", tema_id, sessao.usuario.email);

    let dados = match DadosTema::try_from(&form) {
        Ok(d) => d,
        Err(e @ AppError::Validacao(_)) => {
            let pagina = formulario(&sessao, Some(tema_id), form, Some(e.mensagem_publica()));
            return Ok((e.status_code(), render(&pagina)?).into_response());
        }
        Err(e) => return Err(e),
    };

    tema_service::atualizar_tema(&state.db_pool, &tema_id, &dados).await?;
    Ok(redirect_sucesso("/admin/temas", &format!("Tema '{}' atualizado.", dados.titulo)).into_response())
}

// POST /admin/temas/{id}/apagar
pub async fn handle_apagar_tema(
    State(state): State<AppState>,
    Extension(sessao): Extension<SessaoAtual>,
    Path(tema_id): Path<String>,
) -> AppResult<Redirect> {
    tracing::info!("POST /admin/temas/{}/apagar por {}", tema_id, sessao.usuario.email);
    match tema_service::apagar_tema(&state.db_pool, &tema_id).await {
        Ok(()) => Ok(redirect_sucesso("/admin/temas", "Tema apagado.")),
        Err(AppError::NotFound(_)) => Ok(redirect_erro("/admin/temas", "Tema já não existe.")),
        Err(e) => Err(e),
    }
}
