// src/web/preferencias.rs
use crate::state::AppState;
use axum::{
    extract::{Form, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_cookies::{Cookie, Cookies, Key};

pub const COOKIE_MODO_ESCURO: &str = "modo_escuro";

pub fn modo_escuro(cookies: &Cookies, chave: &Key) -> bool {
    cookies
        .signed(chave)
        .get(COOKIE_MODO_ESCURO)
        .is_some_and(|c| c.value() == "1")
}

#[derive(Debug, Deserialize)]
pub struct AlternarForm {
    #[serde(default)]
    voltar: String,
}

// Só caminhos locais, para não servir de redirecionamento aberto
fn destino_seguro(voltar: &str) -> &str {
    if voltar.starts_with('/') && !voltar.starts_with("//") && !voltar.contains('\\') {
        voltar
    } else {
        "/home"
    }
}

// POST /preferencias/modo-escuro
pub async fn alternar_modo_escuro(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<AlternarForm>,
) -> Redirect {
    let ativo = !modo_escuro(&cookies, &state.chave_cookies);
    let cookie = Cookie::build((COOKIE_MODO_ESCURO, if ativo { "1" } else { "0" }))
        .path("/")
        .http_only(true)
        .permanent()
        .build();
    cookies.signed(&state.chave_cookies).add(cookie);
    tracing::debug!("Modo escuro {}", if ativo { "ativado" } else { "desativado" });

    Redirect::to(destino_seguro(&form.voltar))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn so_aceita_caminhos_locais() {
        assert_eq!(destino_seguro("/admin/temas"), "/admin/temas");
        assert_eq!(destino_seguro("//evil.com"), "/home");
        assert_eq!(destino_seguro("https://evil.com"), "/home");
        assert_eq!(destino_seguro("/\\evil.com"), "/home");
        assert_eq!(destino_seguro(""), "/home");
    }
}
