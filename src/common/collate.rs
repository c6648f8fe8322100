// src/common/collate.rs

use std::cmp::Ordering;

/// Reduz uma string para comparação insensível a caixa e acento,
/// cobrindo o alfabeto que aparece em nomes de empresa pt-BR.
pub fn fold(s: &str) -> String {
    s.chars()
        .flat_map(|c| c.to_lowercase())
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Ordenação equivalente, para os dados deste sistema, ao
/// `localeCompare(..., "pt-BR")` do painel: acento e caixa não separam,
/// e o texto original desempata para a ordem ficar estável.
pub fn compare_ptbr(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_remove_acentos_e_caixa() {
        assert_eq!(fold("Ágil Comércio"), "agil comercio");
        assert_eq!(fold("AÇOUGUE São João"), "acougue sao joao");
    }

    #[test]
    fn ordena_sem_separar_acentuadas() {
        let mut nomes = vec!["Órbita", "alfa", "Ágil", "Beta"];
        nomes.sort_by(|a, b| compare_ptbr(a, b));
        assert_eq!(nomes, vec!["Ágil", "alfa", "Beta", "Órbita"]);
    }

    #[test]
    fn desempata_pelo_texto_original() {
        assert_eq!(compare_ptbr("abc", "abc"), Ordering::Equal);
        assert_ne!(compare_ptbr("Abc", "abc"), Ordering::Equal);
    }
}
