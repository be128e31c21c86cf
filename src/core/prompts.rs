use crate::core::curriculum::{Language, Level};
use crate::core::services::{PromptSource, ServiceError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

const PAIRS: usize = Language::ALL.len() * Level::ALL.len();

/// Built-in prompt catalogue; rotates through the prompts of each pair.
#[derive(Debug, Default)]
pub struct CatalogPromptSource {
    cursors: [AtomicUsize; PAIRS],
}

impl CatalogPromptSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn cursor(&self, language: Language, level: Level) -> &AtomicUsize {
        let lang = Language::ALL.iter().position(|l| *l == language).unwrap_or(0);
        let lvl = Level::ALL.iter().position(|l| *l == level).unwrap_or(0);
        &self.cursors[lang * Level::ALL.len() + lvl]
    }
}

#[async_trait]
impl PromptSource for CatalogPromptSource {
    async fn get_prompt(&self, language: Language, level: Level) -> Result<String, ServiceError> {
        let prompts = catalogue(language, level);
        if prompts.is_empty() {
            return Err(ServiceError::Unavailable(format!(
                "no prompts for {language} {level}"
            )));
        }
        let index = self
            .cursor(language, level)
            .fetch_add(1, Ordering::Relaxed)
            % prompts.len();
        Ok(prompts[index].to_string())
    }
}

fn catalogue(language: Language, level: Level) -> &'static [&'static str] {
    match (language, level) {
        (Language::Spanish, Level::A1) => &[
            "Preséntate: ¿cómo te llamas, de dónde eres y qué te gusta hacer?",
            "Describe a tu familia en cinco o seis frases.",
        ],
        (Language::Spanish, Level::A2) => &[
            "Cuenta qué hiciste el fin de semana pasado.",
            "Describe tu casa o tu piso y tu habitación favorita.",
        ],
        (Language::Spanish, Level::B1) => &[
            "Describe tu ciudad y explica qué recomendarías visitar.",
            "Escribe sobre un viaje que te haya marcado y por qué.",
        ],
        (Language::Spanish, Level::B2) => &[
            "¿Es mejor trabajar desde casa o en la oficina? Argumenta tu opinión.",
            "Escribe una carta formal para quejarte de un servicio que recibiste.",
        ],
        (Language::Spanish, Level::C1) => &[
            "Analiza el impacto de las redes sociales en la forma en que nos informamos.",
            "¿Debería ser gratuita la educación universitaria? Defiende tu postura.",
        ],
        (Language::Spanish, Level::C2) => &[
            "Redacta un ensayo sobre la relación entre lengua e identidad cultural.",
            "Reflexiona sobre si el progreso tecnológico nos hace más libres.",
        ],
        (Language::French, Level::A1) => &[
            "Présente-toi : ton nom, ton âge, ta ville et tes loisirs.",
            "Décris ta journée typique, du matin au soir.",
        ],
        (Language::French, Level::A2) => &[
            "Raconte tes dernières vacances.",
            "Écris un message à un ami pour l'inviter à ton anniversaire.",
        ],
        (Language::French, Level::B1) => &[
            "Décris ta ville et ce que tu aimes y faire.",
            "Raconte une expérience qui t'a fait changer d'avis sur quelque chose.",
        ],
        (Language::French, Level::B2) => &[
            "Faut-il interdire les voitures dans les centres-villes ? Donne ton avis.",
            "Écris une lettre formelle pour postuler à un emploi d'été.",
        ],
        (Language::French, Level::C1) => &[
            "Analyse les avantages et les limites du télétravail pour la société.",
            "La culture doit-elle être subventionnée par l'État ? Argumente.",
        ],
        (Language::French, Level::C2) => &[
            "Rédige un essai sur la place de la mémoire collective dans une nation.",
            "Peut-on encore parler de vie privée à l'ère numérique ?",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_pair_has_a_prompt() {
        let source = CatalogPromptSource::new();
        for language in Language::ALL {
            for level in Level::ALL {
                let prompt = source.get_prompt(language, level).await.unwrap();
                assert!(!prompt.is_empty());
            }
        }
    }

    #[tokio::test]
    async fn repeated_requests_rotate() {
        let source = CatalogPromptSource::new();
        let first = source.get_prompt(Language::French, Level::B1).await.unwrap();
        let second = source.get_prompt(Language::French, Level::B1).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn other_pairs_do_not_disturb_rotation() {
        let source = CatalogPromptSource::new();
        let first = source.get_prompt(Language::French, Level::B1).await.unwrap();
        source.get_prompt(Language::Spanish, Level::A1).await.unwrap();
        let second = source.get_prompt(Language::French, Level::B1).await.unwrap();
        assert_ne!(first, second);
    }
}
