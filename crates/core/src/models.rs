use serde::{Deserialize, Serialize};

/// Detail categories used by the router. The vocabulary is open: stores may
/// hold other categories, which are simply never selected by name here.
pub mod category {
    pub const GREETING: &str = "GREETING";
    pub const ETIQUETTE: &str = "ETIQUETTE";
    pub const DINING: &str = "DINING";
    pub const DOS_AND_DONTS: &str = "DOs & DONTs";
    pub const COMMON_MISTAKES: &str = "COMMON MISTAKES";
    pub const SITUATIONAL_TIPS: &str = "SITUATIONAL TIPS";
}

/// Topic values that split `DOs & DONTs` rows.
pub mod topic {
    pub const DO: &str = "Do";
    pub const DONT: &str = "Don't";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Greeting,
    Do,
    Dont,
    TopTips,
    OffTopic,
}

impl Intent {
    pub fn as_code(self) -> &'static str {
        match self {
            Self::Greeting => "GREETING",
            Self::Do => "DO",
            Self::Dont => "DONT",
            Self::TopTips => "TOP_TIPS",
            Self::OffTopic => "OFF_TOPIC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CulturalDetail {
    pub id: i64,
    pub country_id: i64,
    pub category: String,
    pub topic: String,
    pub description: String,
    pub is_strict: bool,
}

impl CulturalDetail {
    pub fn is_do_rule(&self) -> bool {
        self.category == category::DOS_AND_DONTS && self.topic == topic::DO
    }

    pub fn is_dont_rule(&self) -> bool {
        self.category == category::DOS_AND_DONTS && self.topic == topic::DONT
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: i64,
    pub country_id: i64,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub answer: String,
}

impl QuizQuestion {
    pub fn options(&self) -> [String; 4] {
        [
            self.option_a.clone(),
            self.option_b.clone(),
            self.option_c.clone(),
            self.option_d.clone(),
        ]
    }
}

/// Outcome of one chat turn. `active_country` is what the caller should send
/// back as context on the next turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub active_country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountrySummary {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideEntry {
    pub category: String,
    pub topic: String,
    pub description: String,
    pub is_strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryGuide {
    pub country: String,
    pub language: Option<String>,
    pub details: Vec<GuideEntry>,
}

impl CountryGuide {
    pub fn from_parts(country: &Country, details: Vec<CulturalDetail>) -> Self {
        Self {
            country: country.name.clone(),
            language: country.language.clone(),
            details: details
                .into_iter()
                .map(|detail| GuideEntry {
                    category: detail.category,
                    topic: detail.topic,
                    description: detail.description,
                    is_strict: detail.is_strict,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizItem {
    pub id: i64,
    pub question: String,
    pub options: [String; 4],
    pub answer: String,
}

impl From<QuizQuestion> for QuizItem {
    fn from(question: QuizQuestion) -> Self {
        Self {
            id: question.id,
            options: question.options(),
            question: question.question,
            answer: question.answer,
        }
    }
}
