// src/models/usuario.rs
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;

// Representa um utilizador lido da tabela 'users'
#[derive(Debug, Clone, FromRow)]
pub struct Usuario {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub creditos: i64,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
}

impl Usuario {
    /// Nome a mostrar: o display name, ou o email quando não existe.
    pub fn nome_exibicao(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }

    /// Letra usada no avatar quando não há foto.
    pub fn inicial(&self) -> String {
        self.email
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".to_string())
    }

    pub fn pode_enviar_redacao(&self) -> bool {
        self.creditos > 0
    }
}

// Formulário de login
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub senha: String,
}

// Formulário de criação de conta
#[derive(Debug, Deserialize)]
pub struct CadastroForm {
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub photo_url: String,
    pub senha: String,
    pub confirmacao: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usuario(display_name: Option<&str>, creditos: i64) -> Usuario {
        Usuario {
            id: "u1".into(),
            email: "ana@escola.pt".into(),
            password_hash: String::new(),
            display_name: display_name.map(str::to_string),
            photo_url: None,
            creditos,
            admin: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn nome_exibicao_cai_para_o_email() {
        assert_eq!(usuario(Some("Ana"), 0).nome_exibicao(), "Ana");
        assert_eq!(usuario(Some("  "), 0).nome_exibicao(), "ana@escola.pt");
        assert_eq!(usuario(None, 0).nome_exibicao(), "ana@escola.pt");
        assert_eq!(usuario(None, 0).inicial(), "A");
    }

    #[test]
    fn so_envia_com_creditos() {
        assert!(!usuario(None, 0).pode_enviar_redacao());
        assert!(usuario(None, 1).pode_enviar_redacao());
    }
}
