// src/models/credito.rs
use crate::error::AppError;
use std::str::FromStr;

/// Ação de um administrador sobre o saldo de créditos de um utilizador.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcaoCredito {
    Adicionar,
    Subtrair,
    Zerar,
}

impl AcaoCredito {
    /// Novo saldo após aplicar a ação. O resultado nunca é negativo.
    pub fn aplicar(self, saldo: i64, quantidade: i64) -> i64 {
        let saldo = saldo.max(0);
        let quantidade = quantidade.max(0);
        match self {
            AcaoCredito::Adicionar => saldo.saturating_add(quantidade),
            AcaoCredito::Subtrair => (saldo - quantidade).max(0),
            AcaoCredito::Zerar => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AcaoCredito::Adicionar => "add",
            AcaoCredito::Subtrair => "subtract",
            AcaoCredito::Zerar => "zero",
        }
    }
}

impl FromStr for AcaoCredito {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(AcaoCredito::Adicionar),
            "subtract" => Ok(AcaoCredito::Subtrair),
            "zero" => Ok(AcaoCredito::Zerar),
            outro => Err(AppError::Validacao(format!("Ação de crédito desconhecida: {}", outro))),
        }
    }
}

/// Valida a quantidade enviada no formulário de créditos. Campo vazio vale 0
/// (ajuste sem efeito); só quantidades negativas são recusadas.
pub fn validar_quantidade(acao: AcaoCredito, quantidade: Option<i64>) -> Result<i64, AppError> {
    match (acao, quantidade.unwrap_or(0)) {
        (AcaoCredito::Zerar, _) => Ok(0),
        (_, q) if q >= 0 => Ok(q),
        _ => Err(AppError::Validacao(
            "A quantidade de créditos não pode ser negativa.".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtrair_nunca_fica_negativo() {
        let saldo = AcaoCredito::Subtrair.aplicar(3, 2);
        assert_eq!(saldo, 1);
        assert_eq!(AcaoCredito::Subtrair.aplicar(saldo, 5), 0);
    }

    #[test]
    fn adicionar_e_zerar() {
        assert_eq!(AcaoCredito::Adicionar.aplicar(2, 3), 5);
        assert_eq!(AcaoCredito::Adicionar.aplicar(i64::MAX, 1), i64::MAX);
        assert_eq!(AcaoCredito::Zerar.aplicar(42, 7), 0);
    }

    #[test]
    fn sequencia_qualquer_mantem_saldo_nao_negativo() {
        let acoes = [
            (AcaoCredito::Adicionar, 4),
            (AcaoCredito::Subtrair, 10),
            (AcaoCredito::Adicionar, 1),
            (AcaoCredito::Zerar, 0),
            (AcaoCredito::Subtrair, 1),
            (AcaoCredito::Adicionar, -3),
        ];
        let mut saldo = 0;
        for (acao, q) in acoes {
            saldo = acao.aplicar(saldo, q);
            assert!(saldo >= 0, "saldo negativo depois de {:?}", acao);
        }
        assert_eq!(saldo, 0);
    }

    #[test]
    fn parse_de_formulario() {
        assert_eq!("add".parse::<AcaoCredito>().unwrap(), AcaoCredito::Adicionar);
        assert_eq!("zero".parse::<AcaoCredito>().unwrap(), AcaoCredito::Zerar);
        assert!("multiplicar".parse::<AcaoCredito>().is_err());
    }

    #[test]
    fn quantidade_zero_ou_vazia_nao_altera_o_saldo() {
        assert_eq!(validar_quantidade(AcaoCredito::Zerar, None).unwrap(), 0);
        assert_eq!(validar_quantidade(AcaoCredito::Zerar, Some(-4)).unwrap(), 0);
        assert_eq!(validar_quantidade(AcaoCredito::Adicionar, Some(3)).unwrap(), 3);
        assert_eq!(validar_quantidade(AcaoCredito::Subtrair, Some(0)).unwrap(), 0);
        assert_eq!(validar_quantidade(AcaoCredito::Adicionar, None).unwrap(), 0);
        assert!(validar_quantidade(AcaoCredito::Subtrair, Some(-2)).is_err());

        assert_eq!(AcaoCredito::Adicionar.aplicar(5, 0), 5);
        assert_eq!(AcaoCredito::Subtrair.aplicar(5, 0), 5);
    }
}
