use crate::models::Intent;

/// Ordered rule table; earlier rows win when several trigger sets match.
const INTENT_RULES: &[(&[&str], Intent)] = &[
    (
        &["hello", "hi", "hey", "start", "begin", "good morning"],
        Intent::Greeting,
    ),
    (&["do", "allowed", "okay", "can i", "should i"], Intent::Do),
    (
        &[
            "don't",
            "avoid",
            "illegal",
            "rude",
            "forbidden",
            "never",
            "taboo",
            "bad",
        ],
        Intent::Dont,
    ),
    (
        &[
            "tip",
            "guide",
            "advice",
            "help",
            "summary",
            "best practice",
            "tell me",
            "know about",
            "what is",
        ],
        Intent::TopTips,
    ),
    (
        &["math", "calculation", "weather", "physics", "code"],
        Intent::OffTopic,
    ),
];

const GREETING_PROBES: &[&str] = &["hi", "hello"];

/// Raw substring matching, no word boundaries: "code" inside "encode" counts.
pub fn classify_intent(text: &str) -> Intent {
    let lower = text.to_lowercase();

    INTENT_RULES
        .iter()
        .find(|(triggers, _)| contains_any(&lower, triggers))
        .map(|(_, intent)| *intent)
        .unwrap_or(Intent::TopTips)
}

/// Looser check used only when no country could be resolved.
pub fn looks_like_greeting(text: &str) -> bool {
    contains_any(&text.to_lowercase(), GREETING_PROBES)
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_wins_over_later_rules() {
        assert_eq!(classify_intent("Hello, what should I avoid?"), Intent::Greeting);
    }

    #[test]
    fn classifies_do_questions() {
        assert_eq!(classify_intent("Can I tip in Japan?"), Intent::Do);
        assert_eq!(classify_intent("is it OKAY to bargain"), Intent::Do);
    }

    #[test]
    fn classifies_dont_questions() {
        assert_eq!(classify_intent("what is rude in france"), Intent::Dont);
        assert_eq!(classify_intent("any taboos?"), Intent::Dont);
    }

    #[test]
    fn dont_contraction_still_matches_do_first() {
        // "don't" contains "do", so the DO rule fires before DONT is tested.
        assert_eq!(classify_intent("don't"), Intent::Do);
    }

    #[test]
    fn classifies_top_tips() {
        assert_eq!(classify_intent("tell me about France"), Intent::TopTips);
        assert_eq!(classify_intent("Give me a summary"), Intent::TopTips);
    }

    #[test]
    fn off_topic_only_after_other_rules() {
        assert_eq!(classify_intent("what's the weather"), Intent::OffTopic);
        assert_eq!(classify_intent("solve a math problem"), Intent::OffTopic);
        assert_eq!(classify_intent("please encode my file"), Intent::OffTopic);
    }

    #[test]
    fn unmatched_text_defaults_to_top_tips() {
        assert_eq!(classify_intent("France"), Intent::TopTips);
        assert_eq!(classify_intent(""), Intent::TopTips);
    }

    #[test]
    fn substring_matching_is_raw() {
        // "this" contains "hi".
        assert_eq!(classify_intent("this place"), Intent::Greeting);
    }

    #[test]
    fn intents_report_wire_codes() {
        assert_eq!(classify_intent("Can I tip?").as_code(), "DO");
        assert_eq!(classify_intent("anything taboo").as_code(), "GREETING");
        assert_eq!(Intent::Dont.as_code(), "DONT");
        assert_eq!(Intent::TopTips.as_code(), "TOP_TIPS");
        assert_eq!(Intent::OffTopic.as_code(), "OFF_TOPIC");
    }

    #[test]
    fn greeting_probe_is_case_insensitive() {
        assert!(looks_like_greeting("HELLO!"));
        assert!(looks_like_greeting("which one"));
        assert!(!looks_like_greeting("bonjour"));
    }
}
