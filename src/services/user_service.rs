// src/services/user_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{credito::AcaoCredito, usuario::Usuario},
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Busca um utilizador na base de dados pelo seu ID.
pub async fn find_user_by_id(db_pool: &SqlitePool, user_id: &str) -> AppResult<Option<Usuario>> {
    tracing::debug!("Buscando utilizador por ID: {}", user_id);
    let user = sqlx::query_as::<_, Usuario>("SELECT * FROM users WHERE id = ?1")
        .bind(user_id)
        .fetch_optional(db_pool)
        .await?;

    if user.is_none() {
        tracing::debug!("Utilizador '{}' não encontrado.", user_id);
    }
    Ok(user)
}

pub async fn find_user_by_email(db_pool: &SqlitePool, email: &str) -> AppResult<Option<Usuario>> {
    let email = email.trim().to_lowercase();
    tracing::debug!("Buscando utilizador por email: {}", email);
    let user = sqlx::query_as::<_, Usuario>("SELECT * FROM users WHERE email = ?1")
        .bind(&email)
        .fetch_optional(db_pool)
        .await?;
    Ok(user)
}

/// Todos os utilizadores, dos mais recentes para os mais antigos.
pub async fn find_all_users(db_pool: &SqlitePool) -> AppResult<Vec<Usuario>> {
    tracing::debug!("Buscando todos os utilizadores...");
    let users = sqlx::query_as::<_, Usuario>(
        "SELECT * FROM users ORDER BY created_at DESC, rowid DESC",
    )
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Encontrados {} utilizadores.", users.len());
    Ok(users)
}

/// Cria o documento do utilizador no primeiro registo (0 créditos).
pub async fn create_user(
    db_pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    display_name: Option<&str>,
    photo_url: Option<&str>,
    admin: bool,
) -> AppResult<Usuario> {
    let email = email.trim().to_lowercase();
    tracing::info!("Tentando criar utilizador: {}", email);

    let id = Uuid::new_v4().to_string();
    let display_name = display_name.map(str::trim).filter(|n| !n.is_empty());
    let photo_url = photo_url.map(str::trim).filter(|u| !u.is_empty());

    let result = sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, display_name, photo_url, creditos, admin, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7)
        "#,
    )
    .bind(&id)
    .bind(&email)
    .bind(password_hash)
    .bind(display_name)
    .bind(photo_url)
    .bind(admin)
    .bind(Utc::now())
    .execute(db_pool)
    .await;

    if let Err(sqlx::Error::Database(db_err)) = &result {
        if db_err.is_unique_violation() {
            tracing::warn!("Falha ao criar user: email '{}' já existe.", email);
            return Err(AppError::EmailJaRegistado);
        }
    }
    result?;

    tracing::info!("✅ Utilizador '{}' criado com sucesso.", email);
    find_user_by_id(db_pool, &id)
        .await?
        .ok_or(AppError::InternalServerError)
}

/// Ajusta o saldo de créditos de um utilizador e devolve o novo saldo.
/// Leitura e escrita acontecem na mesma transação.
pub async fn ajustar_creditos(
    db_pool: &SqlitePool,
    user_id: &str,
    quantidade: i64,
    acao: AcaoCredito,
) -> AppResult<i64> {
    if quantidade < 0 {
        return Err(AppError::Validacao(
            "A quantidade de créditos não pode ser negativa.".to_string(),
        ));
    }
    tracing::info!(
        "Ajustando créditos de '{}': {} {}",
        user_id,
        acao.as_str(),
        quantidade
    );

    let mut tx = db_pool.begin().await?;

    // UPDATE sem efeito que devolve o saldo: trava a linha para escrita antes de a ler
    let saldo_atual: i64 = sqlx::query_scalar(
        "UPDATE users SET creditos = creditos WHERE id = ?1 RETURNING creditos",
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::NotFound("Utilizador"))?;

    let novo_saldo = acao.aplicar(saldo_atual, quantidade);

    sqlx::query("UPDATE users SET creditos = ?1 WHERE id = ?2")
        .bind(novo_saldo)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        "✅ Créditos de '{}': {} -> {}",
        user_id,
        saldo_atual,
        novo_saldo
    );
    Ok(novo_saldo)
}
