use crate::models::{category, Country, CulturalDetail, Intent};

/// Categories sampled for a snapshot, in display order.
pub const SNAPSHOT_PRIORITY: [&str; 3] =
    [category::GREETING, category::ETIQUETTE, category::DINING];

pub const SNAPSHOT_FALLBACK: &str = "🔹 Be observant and respectful.";

pub const ONBOARDING_REPLY: &str =
    "Hi! I'm GeoPulse. Mention a country (like 'Japan' or 'Brazil') and I'll share local customs!";

pub const COUNTRY_PROMPT_REPLY: &str =
    "I can help with cultural guides. Which country are you curious about?";

/// Picks the first row per snapshot category, in store order.
pub fn top_tips(details: &[CulturalDetail]) -> String {
    let tips = SNAPSHOT_PRIORITY
        .iter()
        .filter_map(|wanted| details.iter().find(|detail| detail.category == *wanted))
        .map(|detail| format!("🔹 **{}**: {}", detail.topic, detail.description))
        .collect::<Vec<_>>();

    if tips.is_empty() {
        SNAPSHOT_FALLBACK.to_string()
    } else {
        tips.join("\n\n")
    }
}

pub fn no_country_reply(greeting: bool) -> &'static str {
    if greeting {
        ONBOARDING_REPLY
    } else {
        COUNTRY_PROMPT_REPLY
    }
}

/// Renders the reply for a resolved country. `OffTopic` never reads `details`.
pub fn compose_country_reply(
    intent: Intent,
    country: &Country,
    details: &[CulturalDetail],
) -> String {
    let name = country.name.as_str();

    match intent {
        Intent::OffTopic => format!(
            "I can only help with cultural etiquette questions about {name}. Ask me about greetings or dining!"
        ),
        Intent::Greeting => format!(
            "Hello! Ready to explore {name}? You can ask me 'Do I tip?', 'How to greet?', or just 'Tell me about {name}'."
        ),
        Intent::Do => {
            let rules = bullet_lines(details.iter().filter(|detail| detail.is_do_rule()));
            if rules.is_empty() {
                format!("I don't have specific 'Do' rules for {name}, but generally be respectful!")
            } else {
                format!("✅ **{name} (Do's)**:\n{rules}")
            }
        }
        Intent::Dont => {
            let rules = bullet_lines(details.iter().filter(|detail| detail.is_dont_rule()));
            if rules.is_empty() {
                format!("Just be polite! I don't have specific taboos recorded for {name}.")
            } else {
                format!("⛔ **{name} (Don'ts)**:\n{rules}")
            }
        }
        Intent::TopTips => format!(
            "🌏 **{name} Cultural Snapshot**:\n\n{}\n\n*Try asking: 'Can I tip here?'*",
            top_tips(details)
        ),
    }
}

/// True when the reply for `intent` had no matching rows and used fallback text.
pub fn used_fallback(intent: Intent, details: &[CulturalDetail]) -> bool {
    match intent {
        Intent::Do => !details.iter().any(CulturalDetail::is_do_rule),
        Intent::Dont => !details.iter().any(CulturalDetail::is_dont_rule),
        Intent::TopTips => !details
            .iter()
            .any(|detail| SNAPSHOT_PRIORITY.contains(&detail.category.as_str())),
        Intent::Greeting | Intent::OffTopic => false,
    }
}

fn bullet_lines<'a>(details: impl Iterator<Item = &'a CulturalDetail>) -> String {
    details
        .map(|detail| format!("• {}", detail.description))
        .collect::<Vec<_>>()
        .join("\n")
}
