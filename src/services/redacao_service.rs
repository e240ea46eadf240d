// src/services/redacao_service.rs
use crate::{
    error::{AppError, AppResult},
    models::redacao::{
        validar_titulo, validar_url_arquivo, Nota, Redacao, RedacaoListada, RedacaoListadaRow,
        RedacaoStatus,
    },
};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

const SELECT_LISTADA: &str = r#"
    SELECT
        r.id, r.titulo, r.arquivo_url, r.arquivo_corrigido_url, r.status,
        r.user_id, r.tema_id, r.nota, r.created_at,
        u.email AS autor_email,
        t.titulo AS tema_titulo
    FROM redacoes r
    LEFT JOIN users u ON u.id = r.user_id
    LEFT JOIN temas t ON t.id = r.tema_id
"#;

/// Cria uma redação `pendente` e debita um crédito ao autor.
///
/// O débito condicional (`creditos > 0`) decide o envio: sem créditos, nada é
/// gravado. Débito e inserção acontecem na mesma transação.
pub async fn enviar_redacao(
    db_pool: &SqlitePool,
    user_id: &str,
    tema_id: &str,
    titulo: &str,
    arquivo_url: &str,
) -> AppResult<Redacao> {
    let titulo = validar_titulo(titulo)?;
    let arquivo_url = validar_url_arquivo(arquivo_url)?;
    tracing::info!("Enviando redação '{}' de {} para o tema {}", titulo, user_id, tema_id);

    let mut tx = db_pool.begin().await?;

    // Primeira instrução da transação é uma escrita (nunca promover leitura a escrita)
    let saldo: Option<i64> = sqlx::query_scalar(
        "UPDATE users SET creditos = creditos - 1 WHERE id = ?1 AND creditos > 0 RETURNING creditos",
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(saldo) = saldo else {
        let existe: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        tx.rollback().await?;
        if existe.is_none() {
            return Err(AppError::NotFound("Utilizador"));
        }
        tracing::warn!("Envio recusado: '{}' não tem créditos.", user_id);
        return Err(AppError::CreditosInsuficientes);
    };

    let tema_existe: Option<i64> = sqlx::query_scalar("SELECT 1 FROM temas WHERE id = ?1")
        .bind(tema_id)
        .fetch_optional(&mut *tx)
        .await?;
    if tema_existe.is_none() {
        tx.rollback().await?;
        return Err(AppError::NotFound("Tema"));
    }

    let redacao = Redacao {
        id: Uuid::new_v4().to_string(),
        titulo,
        arquivo_url,
        arquivo_corrigido_url: None,
        status: RedacaoStatus::Pendente,
        user_id: user_id.to_string(),
        tema_id: tema_id.to_string(),
        nota: None,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO redacoes (id, titulo, arquivo_url, status, user_id, tema_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&redacao.id)
    .bind(&redacao.titulo)
    .bind(&redacao.arquivo_url)
    .bind(redacao.status.as_str())
    .bind(&redacao.user_id)
    .bind(&redacao.tema_id)
    .bind(redacao.created_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("✅ Redação {} enviada; saldo de {}: {}", redacao.id, user_id, saldo);
    Ok(redacao)
}

/// Corrige uma redação: estado, nota e arquivo corrigido mudam num único UPDATE.
/// Voltar a corrigir uma redação já corrigida substitui a nota e o arquivo.
pub async fn corrigir_redacao(
    db_pool: &SqlitePool,
    redacao_id: &str,
    nota: Nota,
    arquivo_corrigido_url: &str,
) -> AppResult<()> {
    let arquivo_corrigido_url = validar_url_arquivo(arquivo_corrigido_url)?;
    tracing::info!("Corrigindo redação {} com nota {}", redacao_id, nota);

    let rows_affected = sqlx::query(
        r#"
        UPDATE redacoes
        SET status = ?1, nota = ?2, arquivo_corrigido_url = ?3
        WHERE id = ?4
        "#,
    )
    .bind(RedacaoStatus::Corrigida.as_str())
    .bind(nota.valor())
    .bind(&arquivo_corrigido_url)
    .bind(redacao_id)
    .execute(db_pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao corrigir: redação '{}' não encontrada.", redacao_id);
        return Err(AppError::NotFound("Redação"));
    }
    tracing::info!("✅ Redação {} corrigida.", redacao_id);
    Ok(())
}

pub async fn find_redacao_by_id(db_pool: &SqlitePool, redacao_id: &str) -> AppResult<Option<RedacaoListada>> {
    let sql = format!("{} WHERE r.id = ?1", SELECT_LISTADA);
    sqlx::query_as::<_, RedacaoListadaRow>(&sql)
        .bind(redacao_id)
        .fetch_optional(db_pool)
        .await?
        .map(RedacaoListada::try_from)
        .transpose()
}

/// Redações de um aluno, da mais recente para a mais antiga.
pub async fn find_redacoes_by_user(db_pool: &SqlitePool, user_id: &str) -> AppResult<Vec<RedacaoListada>> {
    tracing::debug!("Buscando redações de {}", user_id);
    let sql = format!(
        "{} WHERE r.user_id = ?1 ORDER BY r.created_at DESC, r.rowid DESC",
        SELECT_LISTADA
    );
    sqlx::query_as::<_, RedacaoListadaRow>(&sql)
        .bind(user_id)
        .fetch_all(db_pool)
        .await?
        .into_iter()
        .map(RedacaoListada::try_from)
        .collect()
}

/// Todas as redações (admin), da mais recente para a mais antiga.
pub async fn find_all_redacoes(db_pool: &SqlitePool) -> AppResult<Vec<RedacaoListada>> {
    let sql = format!("{} ORDER BY r.created_at DESC, r.rowid DESC", SELECT_LISTADA);
    let redacoes: Vec<RedacaoListada> = sqlx::query_as::<_, RedacaoListadaRow>(&sql)
        .fetch_all(db_pool)
        .await?
        .into_iter()
        .map(RedacaoListada::try_from)
        .collect::<AppResult<_>>()?;
    tracing::debug!("Encontradas {} redações.", redacoes.len());
    Ok(redacoes)
}

/// Só a linha crua, para verificações diretas do estado guardado.
#[cfg(test)]
async fn find_row(
    db_pool: &SqlitePool,
    redacao_id: &str,
) -> Option<crate::models::redacao::RedacaoRow> {
    sqlx::query_as::<_, crate::models::redacao::RedacaoRow>("SELECT * FROM redacoes WHERE id = ?1")
        .bind(redacao_id)
        .fetch_optional(db_pool)
        .await
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{remover_test_file_pool, test_file_pool, test_pool};
    use crate::models::credito::AcaoCredito;
    use crate::models::tema::{DadosTema, Dificuldade};
    use crate::services::{tema_service, user_service};

    const ARQUIVO: &str = "https://ucarecdn.com/0f1e2d/";

    async fn preparar(creditos: i64) -> (SqlitePool, String, String) {
        let pool = test_pool().await;
        let user = user_service::create_user(&pool, "aluno@escola.pt", "h", None, None, false)
            .await
            .unwrap();
        if creditos > 0 {
            user_service::ajustar_creditos(&pool, &user.id, creditos, AcaoCredito::Adicionar)
                .await
                .unwrap();
        }
        let tema = DadosTema {
            titulo: "Tema X".into(),
            dificuldade: Dificuldade::Facil,
            destaque: false,
            conteudo: vec![],
        };
        let tema_id = tema_service::criar_tema(&pool, &tema, None).await.unwrap();
        (pool, user.id, tema_id)
    }

    async fn saldo(pool: &SqlitePool, user_id: &str) -> i64 {
        user_service::find_user_by_id(pool, user_id).await.unwrap().unwrap().creditos
    }

    async fn total_redacoes(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM redacoes")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn envio_debita_um_credito_e_segundo_envio_e_recusado() {
        let (pool, user_id, tema_id) = preparar(1).await;

        let redacao = enviar_redacao(&pool, &user_id, &tema_id, " Minha redação ", ARQUIVO)
            .await
            .unwrap();
        assert_eq!(redacao.status, RedacaoStatus::Pendente);
        assert_eq!(redacao.titulo, "Minha redação");
        assert!(redacao.nota.is_none());
        assert_eq!(saldo(&pool, &user_id).await, 0);

        let segunda = enviar_redacao(&pool, &user_id, &tema_id, "Outra", ARQUIVO).await;
        assert!(matches!(segunda, Err(AppError::CreditosInsuficientes)));
        assert_eq!(total_redacoes(&pool).await, 1);
        assert_eq!(saldo(&pool, &user_id).await, 0);
    }

    #[tokio::test]
    async fn sem_creditos_nada_e_gravado() {
        let (pool, user_id, tema_id) = preparar(0).await;
        let err = enviar_redacao(&pool, &user_id, &tema_id, "T", ARQUIVO).await;
        assert!(matches!(err, Err(AppError::CreditosInsuficientes)));
        assert_eq!(total_redacoes(&pool).await, 0);
        assert_eq!(saldo(&pool, &user_id).await, 0);
    }

    #[tokio::test]
    async fn erros_de_validacao_e_tema_inexistente_nao_gastam_creditos() {
        let (pool, user_id, tema_id) = preparar(2).await;
        assert!(matches!(
            enviar_redacao(&pool, &user_id, &tema_id, "  ", ARQUIVO).await,
            Err(AppError::Validacao(_))
        ));
        assert!(matches!(
            enviar_redacao(&pool, &user_id, &tema_id, "T", "").await,
            Err(AppError::Validacao(_))
        ));
        assert!(matches!(
            enviar_redacao(&pool, &user_id, "tema-fantasma", "T", ARQUIVO).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(saldo(&pool, &user_id).await, 2);
        assert_eq!(total_redacoes(&pool).await, 0);
    }

    #[tokio::test]
    async fn correcao_define_estado_nota_e_arquivo_juntos() {
        let (pool, user_id, tema_id) = preparar(1).await;
        let redacao = enviar_redacao(&pool, &user_id, &tema_id, "T", ARQUIVO).await.unwrap();

        let nota = Nota::try_from(840).unwrap();
        corrigir_redacao(&pool, &redacao.id, nota, "https://ucarecdn.com/corrigida/")
            .await
            .unwrap();

        let row = find_row(&pool, &redacao.id).await.unwrap();
        assert_eq!(row.status, "corrigida");
        assert_eq!(row.nota, Some(840));
        assert_eq!(row.arquivo_corrigido_url.as_deref(), Some("https://ucarecdn.com/corrigida/"));

        let listada = find_redacao_by_id(&pool, &redacao.id).await.unwrap().unwrap();
        assert!(listada.redacao.esta_corrigida());
        assert_eq!(listada.autor_email.as_deref(), Some("aluno@escola.pt"));
        assert_eq!(listada.tema_titulo.as_deref(), Some("Tema X"));
    }

    #[tokio::test]
    async fn correcao_invalida_nao_altera_a_redacao() {
        let (pool, user_id, tema_id) = preparar(1).await;
        let redacao = enviar_redacao(&pool, &user_id, &tema_id, "T", ARQUIVO).await.unwrap();

        let err = corrigir_redacao(&pool, &redacao.id, Nota::try_from(500).unwrap(), "nao-e-url").await;
        assert!(matches!(err, Err(AppError::Validacao(_))));
        let row = find_row(&pool, &redacao.id).await.unwrap();
        assert_eq!(row.status, "pendente");
        assert!(row.nota.is_none());

        let err = corrigir_redacao(&pool, "nao-existe", Nota::try_from(500).unwrap(), ARQUIVO).await;
        assert!(matches!(err, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn listagens_ordenadas_e_filtradas_por_dono() {
        let (pool, user_id, tema_id) = preparar(3).await;
        let outro = user_service::create_user(&pool, "outro@escola.pt", "h", None, None, false)
            .await
            .unwrap();
        user_service::ajustar_creditos(&pool, &outro.id, 1, AcaoCredito::Adicionar)
            .await
            .unwrap();

        enviar_redacao(&pool, &user_id, &tema_id, "Primeira", ARQUIVO).await.unwrap();
        enviar_redacao(&pool, &outro.id, &tema_id, "Do outro", ARQUIVO).await.unwrap();
        enviar_redacao(&pool, &user_id, &tema_id, "Segunda", ARQUIVO).await.unwrap();

        let minhas = find_redacoes_by_user(&pool, &user_id).await.unwrap();
        let titulos: Vec<_> = minhas.iter().map(|r| r.redacao.titulo.as_str()).collect();
        assert_eq!(titulos, vec!["Segunda", "Primeira"]);

        let todas = find_all_redacoes(&pool).await.unwrap();
        assert_eq!(todas.len(), 3);
        assert_eq!(todas[0].redacao.titulo, "Segunda");
    }

    #[tokio::test]
    async fn db_recusa_corrigida_sem_nota_valida() {
        let (pool, user_id, tema_id) = preparar(1).await;
        let redacao = enviar_redacao(&pool, &user_id, &tema_id, "Cidades", ARQUIVO).await.unwrap();

        let err = sqlx::query("UPDATE redacoes SET status = 'corrigida' WHERE id = ?1")
            .bind(&redacao.id)
            .execute(&pool)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("CHECK constraint failed"), "{}", err);

        let err = sqlx::query("UPDATE redacoes SET status = 'corrigida', nota = 1001 WHERE id = ?1")
            .bind(&redacao.id)
            .execute(&pool)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("CHECK constraint failed"), "{}", err);

        let row = find_row(&pool, &redacao.id).await.unwrap();
        assert_eq!(row.status, "pendente");
        assert!(row.nota.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn envios_simultaneos_de_alunos_diferentes() {
        let (pool, caminho) = test_file_pool().await;
        let tema = DadosTema {
            titulo: "Tema X".into(),
            dificuldade: Dificuldade::Medio,
            destaque: false,
            conteudo: vec![],
        };
        let tema_id = tema_service::criar_tema(&pool, &tema, None).await.unwrap();

        let mut alunos = Vec::new();
        for i in 0..5 {
            let aluno = user_service::create_user(&pool, &format!("aluno{}@escola.pt", i), "h", None, None, false)
                .await
                .unwrap();
            user_service::ajustar_creditos(&pool, &aluno.id, 20, AcaoCredito::Adicionar)
                .await
                .unwrap();
            alunos.push(aluno.id);
        }

        let mut tarefas = Vec::new();
        for user_id in &alunos {
            for n in 0..20 {
                let (pool, user_id, tema_id) = (pool.clone(), user_id.clone(), tema_id.clone());
                tarefas.push(tokio::spawn(async move {
                    enviar_redacao(&pool, &user_id, &tema_id, &format!("Redação {}", n), ARQUIVO).await
                }));
            }
        }
        for tarefa in tarefas {
            tarefa.await.unwrap().unwrap();
        }

        assert_eq!(total_redacoes(&pool).await, 100);
        for user_id in &alunos {
            assert_eq!(saldo(&pool, user_id).await, 0);
        }

        remover_test_file_pool(pool, &caminho).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn envios_simultaneos_nao_gastam_mais_do_que_o_saldo() {
        let (pool, caminho) = test_file_pool().await;
        let tema = DadosTema {
            titulo: "Tema Y".into(),
            dificuldade: Dificuldade::Facil,
            destaque: false,
            conteudo: vec![],
        };
        let tema_id = tema_service::criar_tema(&pool, &tema, None).await.unwrap();
        let aluno = user_service::create_user(&pool, "aluno@escola.pt", "h", None, None, false)
            .await
            .unwrap();
        user_service::ajustar_creditos(&pool, &aluno.id, 10, AcaoCredito::Adicionar)
            .await
            .unwrap();

        let tarefas: Vec<_> = (0..15)
            .map(|n| {
                let (pool, user_id, tema_id) = (pool.clone(), aluno.id.clone(), tema_id.clone());
                tokio::spawn(async move {
                    enviar_redacao(&pool, &user_id, &tema_id, &format!("Redação {}", n), ARQUIVO).await
                })
            })
            .collect();

        let (mut aceites, mut sem_creditos) = (0, 0);
        for tarefa in tarefas {
            match tarefa.await.unwrap() {
                Ok(_) => aceites += 1,
                Err(AppError::CreditosInsuficientes) => sem_creditos += 1,
                Err(e) => panic!("erro inesperado: {:?}", e),
            }
        }
        assert_eq!((aceites, sem_creditos), (10, 5));
        assert_eq!(total_redacoes(&pool).await, 10);
        assert_eq!(saldo(&pool, &aluno.id).await, 0);

        remover_test_file_pool(pool, &caminho).await;
    }
}
