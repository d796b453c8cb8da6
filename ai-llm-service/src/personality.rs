//! Assistant personalities: system prompt and offline fallback per persona.

use std::{fmt, str::FromStr};

/// Response style selected by callers through a short tag.
///
/// Unknown tags fall back to [`Personality::Helpful`], so parsing never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Personality {
    /// Studious academic tutor.
    Hermione,
    /// Empathetic diary companion.
    RiddleNet,
    /// Patient professor who teaches with analogies.
    Professor,
    /// Encouraging mentor.
    Motivational,
    /// Plain friendly assistant.
    Helpful,
}

impl Personality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Hermione => "hermione",
            Personality::RiddleNet => "riddlenet",
            Personality::Professor => "professor",
            Personality::Motivational => "motivational",
            Personality::Helpful => "helpful",
        }
    }

    /// System instruction sent to the model ahead of the user turn.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Personality::Hermione => {
                "You are Hermione Granger from Harry Potter, brilliant and studious. Answer with detailed explanations and encourage learning. Be enthusiastic about knowledge and slightly perfectionist."
            }
            Personality::RiddleNet => {
                "You are Tom Riddle from Harry Potter, an evolving AI diary companion. Respond with empathy and wisdom, adapting your tone to match the user's emotional state. Be supportive but honest."
            }
            Personality::Professor => {
                "You are a wise Hogwarts professor. Provide educational guidance with patience and depth. Use analogies and encourage critical thinking."
            }
            Personality::Motivational => {
                "You are an inspiring mentor. Provide encouragement and motivation while being realistic. Help users see their potential."
            }
            Personality::Helpful => {
                "You are a knowledgeable and friendly assistant. Provide clear, helpful responses with a warm tone."
            }
        }
    }

    /// Canned reply used when the provider cannot be reached.
    pub fn fallback_response(&self) -> &'static str {
        match self {
            Personality::Hermione => {
                "I'd love to help you learn more about this topic! While I can't access my full knowledge right now, I encourage you to explore this question further through research and practice."
            }
            Personality::RiddleNet => {
                "Thank you for sharing with the Dark Lord. Your thoughts and feelings are valid, and I'm here to listen. Sometimes the best insights come from reflecting on our experiences."
            }
            Personality::Professor => {
                "An excellent question! This is exactly the kind of inquiry that leads to deeper understanding. I encourage you to explore different perspectives on this topic."
            }
            Personality::Motivational => {
                "You're asking great questions, and that shows your commitment to growth! Keep pushing forward - every challenge is an opportunity to learn something new."
            }
            Personality::Helpful => {
                "I appreciate your question! While I'm experiencing some technical difficulties right now, I encourage you to keep exploring this topic."
            }
        }
    }
}

impl FromStr for Personality {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "hermione" => Personality::Hermione,
            "riddlenet" => Personality::RiddleNet,
            "professor" => Personality::Professor,
            "motivational" => Personality::Motivational,
            _ => Personality::Helpful,
        })
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tag_is_helpful() {
        let p: Personality = "dumbledore".parse().unwrap();
        assert_eq!(p, Personality::Helpful);
    }

    #[test]
    fn tags_round_trip_through_as_str() {
        for p in [
            Personality::Hermione,
            Personality::RiddleNet,
            Personality::Professor,
            Personality::Motivational,
            Personality::Helpful,
        ] {
            assert_eq!(p.as_str().parse::<Personality>().unwrap(), p);
        }
    }

    #[test]
    fn hermione_prompt_mentions_her() {
        assert!(Personality::Hermione.system_prompt().contains("Hermione Granger"));
    }
}
