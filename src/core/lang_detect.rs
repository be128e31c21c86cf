use crate::core::curriculum::Language;
use whatlang::Lang;

/// Which supported language `text` is written in, if the detector is sure.
pub fn detect_language(text: &str) -> Option<Language> {
    let info = whatlang::detect(text)?;
    if !info.is_reliable() {
        return None;
    }
    match info.lang() {
        Lang::Spa => Some(Language::Spanish),
        Lang::Fra => Some(Language::French),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_french() {
        let text = "Bonjour, je m'appelle Jean et c'est une phrase française sans ambiguïté. \
                    J'habite à Lyon depuis trois ans et j'aime beaucoup cette ville.";
        assert_eq!(detect_language(text), Some(Language::French));
    }

    #[test]
    fn detects_spanish() {
        let text = "Hola, me llamo Juan y esto es una frase en español sin ambigüedad. \
                    Vivo en Sevilla desde hace tres años y me gusta mucho la ciudad.";
        assert_eq!(detect_language(text), Some(Language::Spanish));
    }

    #[test]
    fn english_is_not_a_supported_language() {
        let text = "This is plainly an English sentence about the weather and my garden.";
        assert_eq!(detect_language(text), None);
    }
}
