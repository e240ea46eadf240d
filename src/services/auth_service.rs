// src/services/auth_service.rs
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        redacao::validar_url_arquivo,
        usuario::{CadastroForm, Usuario},
    },
    services::user_service,
};
use sqlx::SqlitePool;

const TAMANHO_MINIMO_SENHA: usize = 6;

/// Verifica se a senha fornecida corresponde ao hash guardado.
pub async fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Verificando hash bcrypt...");
        bcrypt::verify(&password, &stored_hash)
    })
    .await
    .map_err(|e| {
        tracing::error!("Erro na task spawn_blocking (verify_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Erro bcrypt ao verificar senha: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Gera um hash bcrypt para uma senha.
pub async fn hash_password(password: &str) -> AppResult<String> {
    hash_password_with_cost(password, bcrypt::DEFAULT_COST).await
}

async fn hash_password_with_cost(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Gerando hash bcrypt...");
        bcrypt::hash(&password, cost)
    })
    .await
    .map_err(|e| {
        tracing::error!("Erro na task spawn_blocking (hash_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Erro bcrypt ao gerar hash: {:?}", e);
        AppError::PasswordHashingError
    })
}

fn validar_cadastro(form: &CadastroForm) -> AppResult<()> {
    let email = form.email.trim();
    let partes: Vec<&str> = email.split('@').collect();
    if partes.len() != 2 || partes[0].is_empty() || !partes[1].contains('.') {
        return Err(AppError::Validacao("Indique um email válido.".to_string()));
    }
    if form.senha.chars().count() < TAMANHO_MINIMO_SENHA {
        return Err(AppError::Validacao(format!(
            "A senha deve ter pelo menos {} caracteres.",
            TAMANHO_MINIMO_SENHA
        )));
    }
    if form.senha != form.confirmacao {
        return Err(AppError::Validacao("As senhas não coincidem.".to_string()));
    }
    // Foto é opcional; quando vem, tem de ser um URL http(s)
    if !form.photo_url.trim().is_empty() && validar_url_arquivo(&form.photo_url).is_err() {
        return Err(AppError::Validacao("URL da foto inválido.".to_string()));
    }
    Ok(())
}

/// Cria a conta (e o documento do utilizador). Admin se o email estiver em ADMIN_EMAILS.
pub async fn registar(db_pool: &SqlitePool, config: &Config, form: &CadastroForm) -> AppResult<Usuario> {
    validar_cadastro(form)?;

    if user_service::find_user_by_email(db_pool, &form.email).await?.is_some() {
        return Err(AppError::EmailJaRegistado);
    }

    let password_hash = hash_password(&form.senha).await?;
    let admin = config.is_admin_email(&form.email);
    user_service::create_user(
        db_pool,
        &form.email,
        &password_hash,
        Some(form.display_name.as_str()),
        Some(form.photo_url.as_str()),
        admin,
    )
    .await
}

/// Valida email e senha. Utilizador inexistente e senha errada dão o mesmo erro.
pub async fn autenticar(db_pool: &SqlitePool, email: &str, senha: &str) -> AppResult<Usuario> {
    let user = match user_service::find_user_by_email(db_pool, email).await? {
        Some(u) => u,
        None => {
            tracing::warn!("Utilizador não encontrado: {}", email);
            return Err(AppError::InvalidCredentials);
        }
    };

    if verify_password(senha, &user.password_hash).await? {
        Ok(user)
    } else {
        tracing::warn!("Senha incorreta para: {}", email);
        Err(AppError::InvalidCredentials)
    }
}

#[cfg(test)]
pub async fn hash_para_testes(password: &str) -> String {
    hash_password_with_cost(password, 4).await.unwrap()
}
