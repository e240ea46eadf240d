// src/templates.rs
use crate::{
    error::AppResult,
    models::{
        estatisticas::Estatisticas,
        redacao::RedacaoListada,
        tema::{Dificuldade, Tema},
        usuario::Usuario,
    },
};
use askama::Template;
use axum::response::Html;

/// Renderiza um template Askama, registando a falha antes de a propagar.
pub fn render<T: Template>(template: &T) -> AppResult<Html<String>> {
    match template.render() {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            tracing::error!("Falha ao renderizar template: {}", e);
            Err(e.into())
        }
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub error: Option<String>,
    pub email: String,
    pub modo_escuro: bool,
}

#[derive(Template)]
#[template(path = "cadastro.html")]
pub struct CadastroPage {
    pub error: Option<String>,
    pub email: String,
    pub display_name: String,
    pub photo_url: String,
    pub modo_escuro: bool,
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage<'a> {
    pub usuario: &'a Usuario,
    pub modo_escuro: bool,
    pub aba: &'a str,
    pub destaque: Option<Tema>,
    pub temas: Vec<Tema>,
    pub redacoes: Vec<RedacaoListada>,
    pub estatisticas: Estatisticas,
    pub success_message: Option<String>,
}

#[derive(Template)]
#[template(path = "tema.html")]
pub struct TemaPage<'a> {
    pub usuario: &'a Usuario,
    pub modo_escuro: bool,
    pub tema: Tema,
}

#[derive(Template)]
#[template(path = "nova_redacao.html")]
pub struct NovaRedacaoPage<'a> {
    pub usuario: &'a Usuario,
    pub modo_escuro: bool,
    pub tema: &'a Tema,
    pub titulo: String,
    pub arquivo_url: String,
    pub error: Option<String>,
    pub upload_pubkey: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminPage<'a> {
    pub usuario: &'a Usuario,
    pub modo_escuro: bool,
    pub aba: &'a str,
    pub usuarios: Vec<Usuario>,
    pub redacoes: Vec<RedacaoListada>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "admin_correcoes.html")]
pub struct AdminCorrecoesPage<'a> {
    pub usuario: &'a Usuario,
    pub modo_escuro: bool,
    pub redacoes: Vec<RedacaoListada>,
    pub success_message: Option<String>,
}

#[derive(Template)]
#[template(path = "admin_corrigir.html")]
pub struct AdminCorrigirPage<'a> {
    pub usuario: &'a Usuario,
    pub modo_escuro: bool,
    pub item: &'a RedacaoListada,
    pub nota: String,
    pub arquivo_corrigido_url: String,
    pub error: Option<String>,
    pub upload_pubkey: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "admin_temas.html")]
pub struct AdminTemasPage<'a> {
    pub usuario: &'a Usuario,
    pub modo_escuro: bool,
    pub temas: Vec<Tema>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Template)]
#[template(path = "admin_tema_form.html")]
pub struct AdminTemaFormPage<'a> {
    pub usuario: &'a Usuario,
    pub modo_escuro: bool,
    /// `None` ao criar, `Some(id)` ao editar.
    pub tema_id: Option<String>,
    pub titulo: String,
    pub dificuldade: String,
    pub destaque: bool,
    pub conteudo: String,
    pub dificuldades: [Dificuldade; 3],
    pub error: Option<String>,
}

impl AdminTemaFormPage<'_> {
    pub fn acao(&self) -> String {
        match &self.tema_id {
            Some(id) => format!("/admin/temas/{}/editar", id),
            None => "/admin/temas".to_string(),
        }
    }
}
