// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::usuario::{CadastroForm, LoginForm, Usuario},
    services::auth_service,
    state::AppState,
    templates::{render, CadastroPage, LoginPage},
    web::{mw_auth::SESSION_USER_ID, preferencias},
};
use axum::{
    extract::{Form, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;
use tower_sessions::Session;

async fn iniciar_sessao(session: &Session, usuario: &Usuario) -> AppResult<()> {
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao rodar ID: {}", e)))?;
    session
        .insert(SESSION_USER_ID, &usuario.id)
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao inserir na sessão: {}", e)))?;
    Ok(())
}

async fn ja_autenticado(session: &Session) -> bool {
    session
        .get::<String>(SESSION_USER_ID)
        .await
        .ok()
        .flatten()
        .is_some()
}

// GET /login
pub async fn show_login_form(
    State(state): State<AppState>,
    session: Session,
    cookies: Cookies,
) -> AppResult<Response> {
    if ja_autenticado(&session).await {
        tracing::debug!("GET /login: Utilizador já logado, redirecionando para /home");
        return Ok(Redirect::to("/home").into_response());
    }

    let template = LoginPage {
        error: None,
        email: String::new(),
        modo_escuro: preferencias::modo_escuro(&cookies, &state.chave_cookies),
    };
    Ok(render(&template)?.into_response())
}

// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    tracing::info!("Tentativa de login para: {}", form.email);

    match auth_service::autenticar(&state.db_pool, &form.email, &form.senha).await {
        Ok(usuario) => {
            iniciar_sessao(&session, &usuario).await?;
            tracing::info!("✅ Login bem-sucedido para: {}", usuario.email);
            Ok(Redirect::to("/home").into_response())
        }
        Err(AppError::InvalidCredentials) => {
            // Renderiza novamente a página de login com mensagem genérica
            let template = LoginPage {
                error: Some(AppError::InvalidCredentials.mensagem_publica()),
                email: form.email,
                modo_escuro: preferencias::modo_escuro(&cookies, &state.chave_cookies),
            };
            Ok((
                AppError::InvalidCredentials.status_code(),
                render(&template)?,
            )
                .into_response())
        }
        Err(e) => {
            tracing::error!("Erro ao autenticar {}: {:?}", form.email, e);
            Err(e)
        }
    }
}

// GET /cadastro
pub async fn show_cadastro_form(
    State(state): State<AppState>,
    session: Session,
    cookies: Cookies,
) -> AppResult<Response> {
    if ja_autenticado(&session).await {
        return Ok(Redirect::to("/home").into_response());
    }
    let template = CadastroPage {
        error: None,
        email: String::new(),
        display_name: String::new(),
        photo_url: String::new(),
        modo_escuro: preferencias::modo_escuro(&cookies, &state.chave_cookies),
    };
    Ok(render(&template)?.into_response())
}

// POST /cadastro
pub async fn handle_cadastro(
    State(state): State<AppState>,
    session: Session,
    cookies: Cookies,
    Form(form): Form<CadastroForm>,
) -> AppResult<Response> {
    tracing::info!("Tentativa de cadastro para: {}", form.email);

    match auth_service::registar(&state.db_pool, &state.config, &form).await {
        Ok(usuario) => {
            iniciar_sessao(&session, &usuario).await?;
            tracing::info!("✅ Conta criada e sessão iniciada para: {}", usuario.email);
            Ok(Redirect::to("/home").into_response())
        }
        Err(e @ (AppError::Validacao(_) | AppError::EmailJaRegistado)) => {
            tracing::warn!("Cadastro recusado para {}: {}", form.email, e);
            let template = CadastroPage {
                error: Some(e.mensagem_publica()),
                email: form.email,
                display_name: form.display_name,
                photo_url: form.photo_url,
                modo_escuro: preferencias::modo_escuro(&cookies, &state.chave_cookies),
            };
            Ok((e.status_code(), render(&template)?).into_response())
        }
        Err(e) => Err(e),
    }
}

// GET /logout
pub async fn handle_logout(session: Session) -> AppResult<Redirect> {
    let user_id: Option<String> = session.get(SESSION_USER_ID).await.ok().flatten();

    // Apaga todos os dados da sessão atual
    session
        .delete()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao apagar sessão: {}", e)))?;

    if let Some(id) = user_id {
        tracing::info!("🚪 Utilizador '{}' desligado.", id);
    } else {
        tracing::info!("🚪 Sessão anónima desligada.");
    }

    Ok(Redirect::to("/login"))
}
