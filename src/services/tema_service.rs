// src/services/tema_service.rs
use crate::{
    error::{AppError, AppResult},
    models::tema::{DadosTema, Tema, TemaRow},
};
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

fn conteudo_json(dados: &DadosTema) -> AppResult<String> {
    serde_json::to_string(&dados.conteudo).map_err(|e| {
        tracing::error!("Erro ao serializar conteúdo do tema: {:?}", e);
        AppError::InternalServerError
    })
}

// Mantém no máximo um tema em destaque: ao marcar um, desmarca os outros.
async fn limpar_outros_destaques(tx: &mut Transaction<'_, Sqlite>, tema_id: &str) -> AppResult<()> {
    let removidos = sqlx::query("UPDATE temas SET destaque = 0 WHERE destaque = 1 AND id <> ?1")
        .bind(tema_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();
    if removidos > 0 {
        tracing::debug!("Destaque removido de {} tema(s).", removidos);
    }
    Ok(())
}

pub async fn find_tema_by_id(db_pool: &SqlitePool, tema_id: &str) -> AppResult<Option<Tema>> {
    tracing::debug!("Buscando tema: {}", tema_id);
    sqlx::query_as::<_, TemaRow>("SELECT * FROM temas WHERE id = ?1")
        .bind(tema_id)
        .fetch_optional(db_pool)
        .await?
        .map(Tema::try_from)
        .transpose()
}

/// Todos os temas, do mais recente para o mais antigo.
pub async fn find_all_temas(db_pool: &SqlitePool) -> AppResult<Vec<Tema>> {
    let rows = sqlx::query_as::<_, TemaRow>(
        "SELECT * FROM temas ORDER BY created_at DESC, rowid DESC",
    )
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Encontrados {} temas.", rows.len());
    rows.into_iter().map(Tema::try_from).collect()
}

pub async fn criar_tema(
    db_pool: &SqlitePool,
    dados: &DadosTema,
    criado_por: Option<&str>,
) -> AppResult<String> {
    tracing::info!("Criando tema '{}'", dados.titulo);
    let id = Uuid::new_v4().to_string();
    let agora = Utc::now();
    let conteudo = conteudo_json(dados)?;

    let mut tx = db_pool.begin().await?;
    if dados.destaque {
        limpar_outros_destaques(&mut tx, &id).await?;
    }
    sqlx::query(
        r#"
        INSERT INTO temas (id, titulo, dificuldade, destaque, conteudo, criado_por, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
        "#,
    )
    .bind(&id)
    .bind(&dados.titulo)
    .bind(dados.dificuldade.as_str())
    .bind(dados.destaque)
    .bind(&conteudo)
    .bind(criado_por)
    .bind(agora)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::info!("✅ Tema '{}' criado ({}).", dados.titulo, id);
    Ok(id)
}

pub async fn atualizar_tema(db_pool: &SqlitePool, tema_id: &str, dados: &DadosTema) -> AppResult<()> {
    tracing::info!("Atualizando tema {}", tema_id);
    let conteudo = conteudo_json(dados)?;

    let mut tx = db_pool.begin().await?;
    if dados.destaque {
        limpar_outros_destaques(&mut tx, tema_id).await?;
    }
    let rows_affected = sqlx::query(
        r#"
        UPDATE temas
        SET titulo = ?1, dificuldade = ?2, destaque = ?3, conteudo = ?4, updated_at = ?5
        WHERE id = ?6
        "#,
    )
    .bind(&dados.titulo)
    .bind(dados.dificuldade.as_str())
    .bind(dados.destaque)
    .bind(&conteudo)
    .bind(Utc::now())
    .bind(tema_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao atualizar: tema '{}' não encontrado.", tema_id);
        tx.rollback().await?;
        return Err(AppError::NotFound("Tema"));
    }
    tx.commit().await?;
    tracing::info!("✅ Tema {} atualizado.", tema_id);
    Ok(())
}

/// Apaga um tema. As redações já enviadas mantêm o `tema_id`.
pub async fn apagar_tema(db_pool: &SqlitePool, tema_id: &str) -> AppResult<()> {
    tracing::info!("Apagando tema {}", tema_id);
    let rows_affected = sqlx::query("DELETE FROM temas WHERE id = ?1")
        .bind(tema_id)
        .execute(db_pool)
        .await?
        .rows_affected();
    if rows_affected == 0 {
        return Err(AppError::NotFound("Tema"));
    }
    Ok(())
}
