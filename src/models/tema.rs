// src/models/tema.rs
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

const PREFIXO_IMAGEM: &str = "imagem:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dificuldade {
    Facil,
    Medio,
    Dificil,
}

impl Dificuldade {
    pub const TODAS: [Dificuldade; 3] = [Dificuldade::Facil, Dificuldade::Medio, Dificuldade::Dificil];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dificuldade::Facil => "facil",
            Dificuldade::Medio => "medio",
            Dificuldade::Dificil => "dificil",
        }
    }

    pub fn rotulo(&self) -> &'static str {
        match self {
            Dificuldade::Facil => "Fácil",
            Dificuldade::Medio => "Médio",
            Dificuldade::Dificil => "Difícil",
        }
    }
}

impl FromStr for Dificuldade {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "facil" => Ok(Dificuldade::Facil),
            "medio" => Ok(Dificuldade::Medio),
            "dificil" => Ok(Dificuldade::Dificil),
            outro => Err(AppError::Validacao(format!("Dificuldade inválida: {}", outro))),
        }
    }
}

/// Bloco do texto de apoio de um tema. Guardado tal como foi escrito; blocos vazios
/// só são descartados na apresentação.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tipo", rename_all = "snake_case")]
pub enum BlocoConteudo {
    Texto {
        #[serde(default)]
        texto: String,
    },
    Imagem {
        #[serde(default)]
        url: Option<String>,
    },
}

impl BlocoConteudo {
    pub fn esta_vazio(&self) -> bool {
        match self {
            BlocoConteudo::Texto { texto } => texto.trim().is_empty(),
            BlocoConteudo::Imagem { url } => url.as_deref().map_or(true, |u| u.trim().is_empty()),
        }
    }

    pub fn texto(&self) -> Option<&str> {
        match self {
            BlocoConteudo::Texto { texto } => Some(texto),
            BlocoConteudo::Imagem { .. } => None,
        }
    }

    pub fn imagem_url(&self) -> Option<&str> {
        match self {
            BlocoConteudo::Imagem { url } => url.as_deref(),
            BlocoConteudo::Texto { .. } => None,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TemaRow {
    pub id: String,
    pub titulo: String,
    pub dificuldade: String,
    pub destaque: bool,
    pub conteudo: String,
    pub criado_por: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Tema {
    pub id: String,
    pub titulo: String,
    pub dificuldade: Dificuldade,
    pub destaque: bool,
    pub conteudo: Vec<BlocoConteudo>,
    pub criado_por: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TemaRow> for Tema {
    type Error = AppError;

    fn try_from(row: TemaRow) -> Result<Self, Self::Error> {
        let conteudo = serde_json::from_str(&row.conteudo).map_err(|e| {
            tracing::error!("Conteúdo inválido no tema {}: {}", row.id, e);
            AppError::InternalServerError
        })?;
        Ok(Tema {
            dificuldade: row.dificuldade.parse()?,
            conteudo,
            id: row.id,
            titulo: row.titulo,
            destaque: row.destaque,
            criado_por: row.criado_por,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Tema {
    /// Blocos a mostrar, pela ordem guardada, sem os vazios.
    pub fn blocos_visiveis(&self) -> Vec<&BlocoConteudo> {
        self.conteudo.iter().filter(|b| !b.esta_vazio()).collect()
    }

    /// Primeiro bloco de texto não vazio, usado como resumo nos cartões.
    pub fn resumo(&self) -> String {
        self.conteudo
            .iter()
            .filter(|b| !b.esta_vazio())
            .find_map(|b| b.texto())
            .map(|t| {
                let t = t.trim();
                if t.chars().count() > 160 {
                    format!("{}…", t.chars().take(160).collect::<String>())
                } else {
                    t.to_string()
                }
            })
            .unwrap_or_default()
    }
}

/// Separa o tema em destaque dos restantes. Espera a lista do mais recente para o
/// mais antigo; só o primeiro tema marcado ocupa o destaque, os outros marcados
/// voltam para a lista normal.
pub fn separar_destaque(temas: Vec<Tema>) -> (Option<Tema>, Vec<Tema>) {
    let mut destaque = None;
    let mut restantes = Vec::with_capacity(temas.len());
    for tema in temas {
        if tema.destaque && destaque.is_none() {
            destaque = Some(tema);
        } else {
            restantes.push(tema);
        }
    }
    (destaque, restantes)
}

/// Converte o texto do formulário em blocos: parágrafos separados por linha em
/// branco; um parágrafo `imagem: <url>` vira um bloco de imagem.
pub fn parse_conteudo(texto: &str) -> Vec<BlocoConteudo> {
    let texto = texto.replace("\r\n", "\n");
    let mut blocos = Vec::new();
    let mut paragrafo: Vec<&str> = Vec::new();

    for linha in texto.lines() {
        if linha.trim().is_empty() {
            fechar_paragrafo(&mut paragrafo, &mut blocos);
        } else {
            paragrafo.push(linha);
        }
    }
    fechar_paragrafo(&mut paragrafo, &mut blocos);

    blocos
}

fn fechar_paragrafo(paragrafo: &mut Vec<&str>, blocos: &mut Vec<BlocoConteudo>) {
    if paragrafo.is_empty() {
        return;
    }
    let junto = paragrafo.join("\n");
    let trimmed = junto.trim();
    let bloco = match trimmed.strip_prefix(PREFIXO_IMAGEM) {
        Some(url) if !trimmed.contains('\n') => {
            let url = url.trim();
            BlocoConteudo::Imagem {
                url: (!url.is_empty()).then(|| url.to_string()),
            }
        }
        _ => BlocoConteudo::Texto {
            texto: trimmed.to_string(),
        },
    };
    blocos.push(bloco);
    paragrafo.clear();
}

/// Inverso de `parse_conteudo`, para preencher o formulário de edição.
pub fn conteudo_para_texto(blocos: &[BlocoConteudo]) -> String {
    blocos
        .iter()
        .map(|b| match b {
            BlocoConteudo::Texto { texto } => texto.clone(),
            BlocoConteudo::Imagem { url } => {
                format!("{} {}", PREFIXO_IMAGEM, url.as_deref().unwrap_or_default())
                    .trim_end()
                    .to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

// Formulário de criação/edição de tema (admin)
#[derive(Debug, Deserialize)]
pub struct TemaForm {
    pub titulo: String,
    pub dificuldade: String,
    #[serde(default)]
    pub destaque: Option<String>,
    #[serde(default)]
    pub conteudo: String,
}

/// Dados validados de um tema, prontos a gravar.
#[derive(Debug, Clone)]
pub struct DadosTema {
    pub titulo: String,
    pub dificuldade: Dificuldade,
    pub destaque: bool,
    pub conteudo: Vec<BlocoConteudo>,
}

impl TryFrom<&TemaForm> for DadosTema {
    type Error = AppError;

    fn try_from(form: &TemaForm) -> Result<Self, Self::Error> {
        let titulo = form.titulo.trim();
        if titulo.is_empty() {
            return Err(AppError::Validacao("O título do tema é obrigatório.".to_string()));
        }
        Ok(DadosTema {
            titulo: titulo.to_string(),
            dificuldade: form.dificuldade.parse()?,
            // checkbox HTML: presente ("on") quando marcada
            destaque: form.destaque.is_some(),
            conteudo: parse_conteudo(&form.conteudo),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tema(id: &str, destaque: bool, conteudo: Vec<BlocoConteudo>) -> Tema {
        Tema {
            id: id.into(),
            titulo: format!("Tema {}", id),
            dificuldade: Dificuldade::Medio,
            destaque,
            conteudo,
            criado_por: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn texto(t: &str) -> BlocoConteudo {
        BlocoConteudo::Texto { texto: t.into() }
    }

    fn imagem(u: Option<&str>) -> BlocoConteudo {
        BlocoConteudo::Imagem { url: u.map(str::to_string) }
    }

    #[test]
    fn blocos_visiveis_mantem_ordem_e_salta_vazios() {
        let t = tema(
            "1",
            false,
            vec![
                texto("primeiro"),
                texto("   "),
                imagem(None),
                imagem(Some("https://img/1.png")),
                imagem(Some(" ")),
                texto("último"),
            ],
        );
        let visiveis = t.blocos_visiveis();
        assert_eq!(
            visiveis,
            vec![&texto("primeiro"), &imagem(Some("https://img/1.png")), &texto("último")]
        );
        // a apresentação não altera o que está guardado
        assert_eq!(t.conteudo.len(), 6);
    }

    #[test]
    fn apenas_um_tema_em_destaque() {
        let temas = vec![
            tema("a", false, vec![]),
            tema("b", true, vec![]),
            tema("c", true, vec![]),
            tema("d", false, vec![]),
        ];
        let (destaque, restantes) = separar_destaque(temas);
        assert_eq!(destaque.map(|t| t.id), Some("b".to_string()));
        let ids: Vec<_> = restantes.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d"]);

        let (nenhum, todos) = separar_destaque(vec![tema("x", false, vec![])]);
        assert!(nenhum.is_none());
        assert_eq!(todos.len(), 1);
    }

    #[test]
    fn parse_de_conteudo_do_formulario() {
        let entrada = "Primeiro parágrafo\ncontinua aqui.\r\n\r\nimagem: https://img/grafico.png\n\n\nimagem:\n\nFim.";
        let blocos = parse_conteudo(entrada);
        assert_eq!(
            blocos,
            vec![
                texto("Primeiro parágrafo\ncontinua aqui."),
                imagem(Some("https://img/grafico.png")),
                imagem(None),
                texto("Fim."),
            ]
        );
        assert_eq!(
            conteudo_para_texto(&blocos),
            "Primeiro parágrafo\ncontinua aqui.\n\nimagem: https://img/grafico.png\n\nimagem:\n\nFim."
        );
        assert!(parse_conteudo("  \n\n ").is_empty());
    }

    #[test]
    fn blocos_em_json_com_tag() {
        let json = serde_json::to_string(&vec![texto("a"), imagem(Some("https://x/y.png"))]).unwrap();
        assert_eq!(
            json,
            r#"[{"tipo":"texto","texto":"a"},{"tipo":"imagem","url":"https://x/y.png"}]"#
        );
        let lidos: Vec<BlocoConteudo> = serde_json::from_str(r#"[{"tipo":"imagem"}]"#).unwrap();
        assert_eq!(lidos, vec![imagem(None)]);
    }

    #[test]
    fn valida_formulario_de_tema() {
        let form = TemaForm {
            titulo: "  Educação financeira ".into(),
            dificuldade: "dificil".into(),
            destaque: Some("on".into()),
            conteudo: "Texto".into(),
        };
        let dados = DadosTema::try_from(&form).unwrap();
        assert_eq!(dados.titulo, "Educação financeira");
        assert_eq!(dados.dificuldade, Dificuldade::Dificil);
        assert!(dados.destaque);

        let vazio = TemaForm { titulo: " ".into(), ..form };
        assert!(DadosTema::try_from(&vazio).is_err());
    }

    #[test]
    fn resumo_usa_primeiro_texto_visivel() {
        let t = tema("1", false, vec![imagem(Some("https://i")), texto(" "), texto("Olá mundo")]);
        assert_eq!(t.resumo(), "Olá mundo");
    }
}
