// src/models/redacao.rs
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use std::{fmt, str::FromStr};

pub const NOTA_MAXIMA: i64 = 1000;

/// Estado de uma redação. `EmCorrecao` existe no modelo mas nenhum fluxo o produz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedacaoStatus {
    Pendente,
    EmCorrecao,
    Corrigida,
}

impl RedacaoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedacaoStatus::Pendente => "pendente",
            RedacaoStatus::EmCorrecao => "em_correcao",
            RedacaoStatus::Corrigida => "corrigida",
        }
    }

    pub fn rotulo(&self) -> &'static str {
        match self {
            RedacaoStatus::Pendente => "Pendente",
            RedacaoStatus::EmCorrecao => "Em correção",
            RedacaoStatus::Corrigida => "Corrigida",
        }
    }
}

impl FromStr for RedacaoStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendente" => Ok(RedacaoStatus::Pendente),
            "em_correcao" => Ok(RedacaoStatus::EmCorrecao),
            "corrigida" => Ok(RedacaoStatus::Corrigida),
            outro => {
                tracing::error!("Status de redação desconhecido na DB: {}", outro);
                Err(AppError::InternalServerError)
            }
        }
    }
}

/// Nota de uma redação, sempre entre 0 e 1000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Nota(i64);

impl Nota {
    pub fn valor(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Nota {
    type Error = AppError;

    fn try_from(valor: i64) -> Result<Self, Self::Error> {
        if (0..=NOTA_MAXIMA).contains(&valor) {
            Ok(Nota(valor))
        } else {
            Err(AppError::Validacao(format!(
                "A nota deve estar entre 0 e {}.",
                NOTA_MAXIMA
            )))
        }
    }
}

impl fmt::Display for Nota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Linha crua da tabela `redacoes`; convertida em `Redacao` após validação.
#[derive(Debug, Clone, FromRow)]
pub struct RedacaoRow {
    pub id: String,
    pub titulo: String,
    pub arquivo_url: String,
    pub arquivo_corrigido_url: Option<String>,
    pub status: String,
    pub user_id: String,
    pub tema_id: String,
    pub nota: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Redacao {
    pub id: String,
    pub titulo: String,
    pub arquivo_url: String,
    pub arquivo_corrigido_url: Option<String>,
    pub status: RedacaoStatus,
    pub user_id: String,
    pub tema_id: String,
    pub nota: Option<Nota>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<RedacaoRow> for Redacao {
    type Error = AppError;

    fn try_from(row: RedacaoRow) -> Result<Self, Self::Error> {
        Ok(Redacao {
            status: row.status.parse()?,
            nota: row.nota.map(Nota::try_from).transpose()?,
            id: row.id,
            titulo: row.titulo,
            arquivo_url: row.arquivo_url,
            arquivo_corrigido_url: row.arquivo_corrigido_url,
            user_id: row.user_id,
            tema_id: row.tema_id,
            created_at: row.created_at,
        })
    }
}

impl Redacao {
    pub fn esta_corrigida(&self) -> bool {
        self.status == RedacaoStatus::Corrigida
    }

    pub fn data_envio(&self) -> String {
        self.created_at.format("%d/%m/%Y").to_string()
    }

    /// Título a mostrar; redações antigas podem não ter título.
    pub fn titulo_exibicao(&self) -> String {
        if self.titulo.trim().is_empty() {
            format!("Redação - {}", self.data_envio())
        } else {
            self.titulo.clone()
        }
    }
}

/// Redação com dados do autor e do tema, para as listagens.
#[derive(Debug, Clone)]
pub struct RedacaoListada {
    pub redacao: Redacao,
    pub autor_email: Option<String>,
    pub tema_titulo: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct RedacaoListadaRow {
    #[sqlx(flatten)]
    pub redacao: RedacaoRow,
    pub autor_email: Option<String>,
    pub tema_titulo: Option<String>,
}

impl TryFrom<RedacaoListadaRow> for RedacaoListada {
    type Error = AppError;

    fn try_from(row: RedacaoListadaRow) -> Result<Self, Self::Error> {
        Ok(RedacaoListada {
            redacao: row.redacao.try_into()?,
            autor_email: row.autor_email,
            tema_titulo: row.tema_titulo,
        })
    }
}

// Formulário de envio de redação (aluno)
#[derive(Debug, Deserialize)]
pub struct NovaRedacaoForm {
    pub titulo: String,
    #[serde(default)]
    pub arquivo_url: String,
}

// Formulário de correção (admin). A nota chega como texto para validarmos nós.
#[derive(Debug, Deserialize)]
pub struct CorrecaoForm {
    pub nota: String,
    #[serde(default)]
    pub arquivo_corrigido_url: String,
}

pub fn validar_titulo(titulo: &str) -> Result<String, AppError> {
    let titulo = titulo.trim();
    if titulo.is_empty() {
        return Err(AppError::Validacao(
            "O título da redação não pode estar vazio.".to_string(),
        ));
    }
    Ok(titulo.to_string())
}

/// Aceita apenas URLs http(s) devolvidos pelo serviço de upload.
pub fn validar_url_arquivo(url: &str) -> Result<String, AppError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::Validacao("Nenhum arquivo enviado.".to_string()));
    }
    let resto = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match resto {
        Some(r) if !r.is_empty() && !r.starts_with('/') && !url.chars().any(char::is_whitespace) => {
            Ok(url.to_string())
        }
        _ => Err(AppError::Validacao("URL de arquivo inválido.".to_string())),
    }
}

pub fn parse_nota(texto: &str) -> Result<Nota, AppError> {
    let valor: i64 = texto
        .trim()
        .parse()
        .map_err(|_| AppError::Validacao("A nota deve ser um número inteiro.".to_string()))?;
    Nota::try_from(valor)
}
