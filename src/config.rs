// src/config.rs
use crate::error::{AppError, AppResult};
use std::{env, net::SocketAddr};

const ENDERECO_PADRAO: &str = "0.0.0.0:3000";
const TAMANHO_MINIMO_SEGREDO: usize = 64;

/// Configuração da aplicação, lida das variáveis de ambiente (e do `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    pub endereco: SocketAddr,
    /// Emails que recebem a flag de admin ao criar conta.
    pub admin_emails: Vec<String>,
    /// Chave pública do widget de upload; sem ela, o formulário pede só o URL.
    pub upload_pubkey: Option<String>,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;
        let session_secret = env::var("SESSION_SECRET")?;
        let endereco = env::var("APP_ADDR").unwrap_or_else(|_| ENDERECO_PADRAO.to_string());
        let admin_emails = env::var("ADMIN_EMAILS").unwrap_or_default();
        let upload_pubkey = env::var("UPLOAD_PUBKEY").ok();

        Self::from_parts(
            database_url,
            session_secret,
            &endereco,
            &admin_emails,
            upload_pubkey,
        )
    }

    pub fn from_parts(
        database_url: String,
        session_secret: String,
        endereco: &str,
        admin_emails: &str,
        upload_pubkey: Option<String>,
    ) -> AppResult<Self> {
        if session_secret.len() < TAMANHO_MINIMO_SEGREDO {
            return Err(AppError::Configuracao(format!(
                "SESSION_SECRET deve ter pelo menos {} bytes",
                TAMANHO_MINIMO_SEGREDO
            )));
        }

        let endereco: SocketAddr = endereco
            .parse()
            .map_err(|e| AppError::Configuracao(format!("APP_ADDR inválido '{}': {}", endereco, e)))?;

        let admin_emails = admin_emails
            .split(',')
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        let upload_pubkey = upload_pubkey.filter(|k| !k.trim().is_empty());

        Ok(Self {
            database_url,
            session_secret,
            endereco,
            admin_emails,
            upload_pubkey,
        })
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segredo() -> String {
        "s".repeat(64)
    }

    #[test]
    fn aceita_configuracao_valida() {
        let cfg = Config::from_parts(
            "sqlite::memory:".into(),
            segredo(),
            "127.0.0.1:8080",
            " Prof@Escola.pt, ,outro@escola.pt ",
            Some("  ".into()),
        )
        .unwrap();

        assert_eq!(cfg.endereco.port(), 8080);
        assert_eq!(cfg.admin_emails, vec!["prof@escola.pt", "outro@escola.pt"]);
        assert!(cfg.is_admin_email("PROF@escola.pt"));
        assert!(!cfg.is_admin_email("aluno@escola.pt"));
        assert!(cfg.upload_pubkey.is_none());
    }

    #[test]
    fn rejeita_segredo_curto() {
        let err = Config::from_parts("x".into(), "curto".into(), ENDERECO_PADRAO, "", None);
        assert!(matches!(err, Err(AppError::Configuracao(_))));
    }

    #[test]
    fn rejeita_endereco_invalido() {
        let err = Config::from_parts("x".into(), segredo(), "porta-errada", "", None);
        assert!(matches!(err, Err(AppError::Configuracao(_))));
    }
}
