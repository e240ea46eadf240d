// src/models/estatisticas.rs
use crate::models::redacao::{Redacao, NOTA_MAXIMA};

const PONTOS_HISTORICO: usize = 10;

/// Ponto do gráfico de evolução (data curta + nota).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PontoHistorico {
    pub data: String,
    pub nota: i64,
}

impl PontoHistorico {
    /// Altura (0–100) da barra no gráfico em HTML.
    pub fn altura(&self) -> i64 {
        (self.nota * 100 / NOTA_MAXIMA).clamp(0, 100)
    }
}

/// Desempenho de um aluno, calculado a partir das suas redações.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Estatisticas {
    pub redacoes_feitas: usize,
    pub media_geral: i64,
    pub melhor_nota: i64,
    pub ultima_nota: i64,
    pub historico: Vec<PontoHistorico>,
}

impl Estatisticas {
    /// `redacoes` deve vir ordenada da mais recente para a mais antiga.
    pub fn calcular(redacoes: &[Redacao]) -> Self {
        let corrigidas: Vec<(&Redacao, i64)> = redacoes
            .iter()
            .filter(|r| r.esta_corrigida())
            .filter_map(|r| r.nota.map(|n| (r, n.valor())))
            .collect();

        if corrigidas.is_empty() {
            return Estatisticas {
                redacoes_feitas: redacoes.len(),
                ..Default::default()
            };
        }

        let soma: i64 = corrigidas.iter().map(|(_, n)| n).sum();
        let media_geral = (soma as f64 / corrigidas.len() as f64).round() as i64;
        let melhor_nota = corrigidas.iter().map(|(_, n)| *n).max().unwrap_or_default();
        let ultima_nota = corrigidas
            .iter()
            .max_by_key(|(r, _)| r.created_at)
            .map(|(_, n)| *n)
            .unwrap_or_default();

        let mut ordenadas = corrigidas.clone();
        ordenadas.sort_by_key(|(r, _)| r.created_at);
        let inicio = ordenadas.len().saturating_sub(PONTOS_HISTORICO);
        let historico = ordenadas[inicio..]
            .iter()
            .map(|(r, n)| PontoHistorico {
                data: r.created_at.format("%d/%m").to_string(),
                nota: *n,
            })
            .collect();

        Estatisticas {
            redacoes_feitas: redacoes.len(),
            media_geral,
            melhor_nota,
            ultima_nota,
            historico,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::redacao::{Nota, RedacaoStatus};
    use chrono::{Duration, TimeZone, Utc};

    fn redacao(dia: i64, status: RedacaoStatus, nota: Option<i64>) -> Redacao {
        Redacao {
            id: format!("r{}", dia),
            titulo: "t".into(),
            arquivo_url: "https://x/y".into(),
            arquivo_corrigido_url: None,
            status,
            user_id: "u".into(),
            tema_id: "t".into(),
            nota: nota.map(|n| Nota::try_from(n).unwrap()),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap() + Duration::days(dia),
        }
    }

    #[test]
    fn sem_corrigidas_conta_apenas_o_total() {
        let lista = vec![
            redacao(2, RedacaoStatus::Pendente, None),
            redacao(1, RedacaoStatus::Pendente, None),
        ];
        let e = Estatisticas::calcular(&lista);
        assert_eq!(e.redacoes_feitas, 2);
        assert_eq!(e.media_geral, 0);
        assert!(e.historico.is_empty());
    }

    #[test]
    fn calcula_media_melhor_e_ultima() {
        let lista = vec![
            redacao(4, RedacaoStatus::Pendente, None),
            redacao(3, RedacaoStatus::Corrigida, Some(600)),
            redacao(2, RedacaoStatus::Corrigida, Some(900)),
            redacao(1, RedacaoStatus::Corrigida, Some(0)),
        ];
        let e = Estatisticas::calcular(&lista);
        assert_eq!(e.redacoes_feitas, 4);
        assert_eq!(e.media_geral, 500);
        assert_eq!(e.melhor_nota, 900);
        assert_eq!(e.ultima_nota, 600);
        assert_eq!(
            e.historico,
            vec![
                PontoHistorico { data: "02/01".into(), nota: 0 },
                PontoHistorico { data: "03/01".into(), nota: 900 },
                PontoHistorico { data: "04/01".into(), nota: 600 },
            ]
        );
    }

    #[test]
    fn historico_limitado_as_ultimas_dez() {
        let lista: Vec<_> = (0..15)
            .rev()
            .map(|d| redacao(d, RedacaoStatus::Corrigida, Some(d * 10)))
            .collect();
        let e = Estatisticas::calcular(&lista);
        assert_eq!(e.historico.len(), 10);
        assert_eq!(e.historico.first().map(|p| p.nota), Some(50));
        assert_eq!(e.historico.last().map(|p| p.nota), Some(140));
        assert_eq!(e.media_geral, 70);
    }

    #[test]
    fn altura_das_barras() {
        assert_eq!(PontoHistorico { data: "01/01".into(), nota: 500 }.altura(), 50);
        assert_eq!(PontoHistorico { data: "01/01".into(), nota: 1000 }.altura(), 100);
    }
}
