// src/error.rs
use axum::{http::StatusCode, response::Html, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro de variável de ambiente: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Erro ao renderizar template: {0}")]
    TemplateError(#[from] askama::Error),

    #[error("Configuração inválida: {0}")]
    Configuracao(String),

    #[error("Erro ao processar password")]
    PasswordHashingError,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Erro na sessão: {0}")]
    SessionError(String),

    #[error("{0} não encontrado(a)")]
    NotFound(&'static str),

    #[error("Dados inválidos: {0}")]
    Validacao(String),

    #[error("Créditos insuficientes")]
    CreditosInsuficientes,

    #[error("Email já registado")]
    EmailJaRegistado,

    #[error("Erro interno inesperado")]
    InternalServerError,

    #[error("Acesso negado")]
    Forbidden,
}

impl AppError {
    /// Mensagem segura para mostrar ao utilizador (sem detalhes internos).
    pub fn mensagem_publica(&self) -> String {
        match self {
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => {
                "Erro ao aceder aos dados.".to_string()
            }
            AppError::EnvVarError(_) | AppError::Configuracao(_) => {
                "Erro de configuração.".to_string()
            }
            AppError::PasswordHashingError => "Erro ao processar credenciais.".to_string(),
            AppError::InvalidCredentials => "Email ou senha inválidos.".to_string(),
            AppError::SessionError(_) => "Erro na gestão da sua sessão.".to_string(),
            AppError::NotFound(what) => format!("{} não encontrado(a).", what),
            AppError::Validacao(msg) => msg.clone(),
            AppError::CreditosInsuficientes => {
                "Você não possui créditos suficientes para enviar uma redação.".to_string()
            }
            AppError::EmailJaRegistado => "Já existe uma conta com este email.".to_string(),
            AppError::Forbidden => "Não tem permissão para aceder a esta página.".to_string(),
            AppError::TemplateError(_) | AppError::InternalServerError => {
                "Ocorreu um erro inesperado.".to_string()
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validacao(_) | AppError::CreditosInsuficientes => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::EmailJaRegistado => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Como converter AppError numa resposta HTTP
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Erro processado: {:?}", self);
        } else {
            tracing::warn!("Pedido recusado ({}): {}", status.as_u16(), self);
        }

        let user_message = self.mensagem_publica();

        (status, Html(format!(r#"
            <!DOCTYPE html><html><head><title>Erro</title><style>body{{font-family:sans-serif;}}</style></head>
            <body><h1>Erro {status_code}</h1><p>{message}</p><a href="/home">Voltar para a página inicial</a></body></html>
         "#, status_code = status.as_u16(), message = user_message))).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;
