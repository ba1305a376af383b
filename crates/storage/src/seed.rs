//! Reference dataset and the idempotent routine that loads it.
//!
//! Insertion order is significant: it becomes the listing order the chat
//! router scans when matching country names inside a message.

use anyhow::Result;
use geopulse_core::category::{
    COMMON_MISTAKES, DINING, DOS_AND_DONTS, ETIQUETTE, GREETING, SITUATIONAL_TIPS,
};
use geopulse_core::topic::{DO, DONT};
use serde::Serialize;
use tracing::info;

use crate::{KnowledgeRepository, NewCulturalDetail, NewQuizQuestion, QuizRepository};

struct CountrySeed {
    name: &'static str,
    language: &'static str,
    details: &'static [NewCulturalDetail<'static>],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Europe,
    Asia,
    LatinAmerica,
    Africa,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub countries_total: usize,
    pub countries_added: usize,
    pub details_added: usize,
    pub quiz_questions_added: usize,
}

const fn rule(
    category: &'static str,
    topic: &'static str,
    description: &'static str,
    is_strict: bool,
) -> NewCulturalDetail<'static> {
    NewCulturalDetail {
        category,
        topic,
        description,
        is_strict,
    }
}

const fn quiz(
    question: &'static str,
    options: [&'static str; 4],
    answer: &'static str,
) -> NewQuizQuestion<'static> {
    NewQuizQuestion {
        question,
        options,
        answer,
    }
}

const DETAILED_COUNTRIES: &[CountrySeed] = &[
    CountrySeed {
        name: "Afghanistan",
        language: "Pashto, Dari",
        details: &[
            rule(
                GREETING,
                "Handshake",
                "Handshakes are standard between men. Men do not make physical contact with women.",
                true,
            ),
            rule(
                ETIQUETTE,
                "Guests",
                "Hospitality is sacred. Guests are served the best food and seated in the place of honor.",
                true,
            ),
            rule(
                DINING,
                "Shared Dish",
                "Eating from a communal dish is common. Use your right hand only.",
                true,
            ),
            rule(DOS_AND_DONTS, DO, "Remove your shoes before entering a home or mosque.", true),
            rule(
                DOS_AND_DONTS,
                DONT,
                "Do not show the soles of your feet to anyone; it is considered offensive.",
                true,
            ),
            rule(
                COMMON_MISTAKES,
                "Photography",
                "Taking photos of women is culturally prohibited and very offensive.",
                true,
            ),
            rule(
                SITUATIONAL_TIPS,
                "Tea Time",
                "Business often happens over tea. Never rush the tea drinking process.",
                false,
            ),
        ],
    },
    CountrySeed {
        name: "China",
        language: "Mandarin",
        details: &[
            rule(
                GREETING,
                "Nod/Bow",
                "A slight nod or bow is common. Handshakes are also standard now.",
                false,
            ),
            rule(
                ETIQUETTE,
                "Face",
                "Protecting \"Face\" (honor) is crucial. Never embarrass someone publicly.",
                true,
            ),
            rule(
                DINING,
                "Chopsticks",
                "Don't leave chopsticks upright in rice (symbolizes death).",
                true,
            ),
            rule(
                DOS_AND_DONTS,
                DO,
                "Leave a little food on your plate to show the host gave enough.",
                false,
            ),
            rule(
                DOS_AND_DONTS,
                DONT,
                "Don't give clocks as gifts (sounds like \"funeral\").",
                true,
            ),
            rule(
                COMMON_MISTAKES,
                "Names",
                "Calling someone by their first name too soon is disrespectful. Use titles.",
                false,
            ),
            rule(
                SITUATIONAL_TIPS,
                "Business Cards",
                "Present your card with two hands and study theirs carefully.",
                true,
            ),
        ],
    },
    CountrySeed {
        name: "India",
        language: "Hindi, English",
        details: &[
            rule(
                GREETING,
                "Namaste",
                "Palms pressed together with a slight bow. Respectful for all.",
                true,
            ),
            rule(
                ETIQUETTE,
                "Feet",
                "Feet are unclean. Do not touch people or objects with them.",
                true,
            ),
            rule(
                DINING,
                "Right Hand",
                "Always eat with the right hand. Left is for hygiene.",
                true,
            ),
            rule(DOS_AND_DONTS, DO, "Remove shoes before entering a home.", true),
            rule(
                DOS_AND_DONTS,
                DONT,
                "Don't wink or whistle, it can be seen as rude or insulting.",
                false,
            ),
            rule(
                COMMON_MISTAKES,
                "Personal Space",
                "Personal space is smaller than in the West; don't back away if someone stands close.",
                false,
            ),
            rule(
                SITUATIONAL_TIPS,
                "Elders",
                "In social settings, always greet the eldest person first.",
                true,
            ),
        ],
    },
    CountrySeed {
        name: "Japan",
        language: "Japanese",
        details: &[
            rule(GREETING, "Bowing", "Bow to greet. Deeper bow = more respect.", true),
            rule(
                ETIQUETTE,
                "Shoes",
                "Always remove shoes at the entrance (Genkan) of homes.",
                true,
            ),
            rule(DINING, "Slurping", "Slurping noodles indicates they are delicious.", false),
            rule(DOS_AND_DONTS, DO, "Exchange business cards with two hands.", true),
            rule(
                DOS_AND_DONTS,
                DONT,
                "Don't tip; good service is standard and tipping causes confusion.",
                true,
            ),
            rule(
                COMMON_MISTAKES,
                "Trains",
                "Talking loud on the phone on a train is extremely rude.",
                true,
            ),
            rule(
                SITUATIONAL_TIPS,
                "Elevators",
                "The person closest to the buttons operates the door for everyone.",
                false,
            ),
        ],
    },
    CountrySeed {
        name: "France",
        language: "French",
        details: &[
            rule(GREETING, "Bonjour", "Say Bonjour immediately upon entering a shop.", true),
            rule(ETIQUETTE, "Volume", "Speak quietly in public.", false),
            rule(DINING, "Hands", "Hands visible on table.", true),
            rule(DOS_AND_DONTS, DO, "Use \"Monsieur/Madame\".", true),
            rule(DOS_AND_DONTS, DONT, "Don't eat on the street (mostly).", false),
            rule(
                COMMON_MISTAKES,
                "Service",
                "Expecting \"customer is king\" service; waiters are professionals, treat them as equals.",
                false,
            ),
            rule(
                SITUATIONAL_TIPS,
                "Dinner Party",
                "Arrive 15 minutes late (\"quart d'heure de politesse\") to give hosts time.",
                false,
            ),
        ],
    },
    CountrySeed {
        name: "United States",
        language: "English",
        details: &[
            rule(GREETING, "Handshake", "Firm handshake, smile, and \"How are you?\".", false),
            rule(ETIQUETTE, "Tipping", "Tipping 15-20% is mandatory in restaurants.", true),
            rule(DINING, "Style", "Fork in right hand (or switch) is common.", false),
            rule(DOS_AND_DONTS, DO, "Respect personal space (arm's length).", true),
            rule(DOS_AND_DONTS, DONT, "Don't smoke in public indoor areas.", true),
            rule(
                COMMON_MISTAKES,
                "Price Tags",
                "Forgetting that tax is added at the register, not on the tag.",
                false,
            ),
            rule(
                SITUATIONAL_TIPS,
                "Small Talk",
                "It is polite to chat with cashiers and strangers in lines.",
                false,
            ),
        ],
    },
    CountrySeed {
        name: "Brazil",
        language: "Portuguese",
        details: &[
            rule(GREETING, "Kiss/Hug", "Women kiss cheeks (1-3 times). Men hug back-slap.", false),
            rule(ETIQUETTE, "Time", "Punctuality is flexible for social events.", false),
            rule(
                DINING,
                "Napkins",
                "Use a napkin to hold food (sandwiches/pizza) if eating with hands.",
                true,
            ),
            rule(DOS_AND_DONTS, DO, "Dress smart-casual; appearance matters.", false),
            rule(DOS_AND_DONTS, DONT, "Don't use the \"OK\" hand sign (offensive).", true),
            rule(
                COMMON_MISTAKES,
                "Spanish",
                "Speaking Spanish to Brazilians; they speak Portuguese.",
                true,
            ),
            rule(
                SITUATIONAL_TIPS,
                "Conversation",
                "Interrupting is seen as enthusiasm, not rudeness.",
                false,
            ),
        ],
    },
    CountrySeed {
        name: "United Kingdom",
        language: "English",
        details: &[
            rule(GREETING, "Handshake", "Light handshake.", false),
            rule(ETIQUETTE, "Queue", "Never jump the queue.", true),
            rule(DINING, "Table Manners", "Knife in right, fork in left.", true),
            rule(DOS_AND_DONTS, DO, "Say please and thank you constantly.", true),
            rule(DOS_AND_DONTS, DONT, "Don't be loud or boastful.", true),
            rule(
                COMMON_MISTAKES,
                "Eye Contact",
                "Staring or prolonged eye contact on the Tube is considered rude.",
                false,
            ),
            rule(
                SITUATIONAL_TIPS,
                "Pub",
                "Buy \"rounds\" of drinks when with a group. Don't just buy for yourself.",
                true,
            ),
        ],
    },
];

const LATIN_AMERICA_RULES: &[NewCulturalDetail<'static>] = &[
    rule(GREETING, "Kiss/Handshake", "Warm greetings, eye contact, often a kiss on cheek.", false),
    rule(ETIQUETTE, "Time", "Time is often flexible (Polychronic).", false),
    rule(DINING, "Social", "Meals are long social events.", false),
    rule(DOS_AND_DONTS, DO, "Dress well and neatly.", false),
    rule(DOS_AND_DONTS, DONT, "Don't be offended by personal questions.", false),
    rule(
        COMMON_MISTAKES,
        "Rushing",
        "Trying to rush business or social interactions is rude.",
        false,
    ),
    rule(SITUATIONAL_TIPS, "Lunch", "Lunch is the main meal; allow 2 hours.", false),
];

const EUROPE_RULES: &[NewCulturalDetail<'static>] = &[
    rule(GREETING, "Handshake", "Firm handshake is standard.", true),
    rule(ETIQUETTE, "Privacy", "Respect personal space.", false),
    rule(DINING, "Continental", "Fork in left, knife in right.", true),
    rule(DOS_AND_DONTS, DO, "Say please and thank you.", true),
    rule(DOS_AND_DONTS, DONT, "Don't be loud in public areas.", true),
    rule(COMMON_MISTAKES, "Greetings", "Not greeting shopkeepers when entering.", true),
    rule(
        SITUATIONAL_TIPS,
        "Public Transport",
        "Keep your voice down and offer seats to elderly.",
        true,
    ),
];

const AFRICA_RULES: &[NewCulturalDetail<'static>] = &[
    rule(GREETING, "Handshake", "Handshakes are important and often lingering.", false),
    rule(ETIQUETTE, "Elders", "Great respect is shown to elders.", true),
    rule(DINING, "Right Hand", "Eat with right hand.", true),
    rule(DOS_AND_DONTS, DO, "Ask about family and health.", false),
    rule(DOS_AND_DONTS, DONT, "Don't use left hand for gestures.", true),
    rule(COMMON_MISTAKES, "Impatience", "Showing impatience is considered rude.", true),
    rule(SITUATIONAL_TIPS, "Photos", "Always ask permission before taking photos of people.", true),
];

const ASIA_RULES: &[NewCulturalDetail<'static>] = &[
    rule(GREETING, "Respect", "Bow or soft handshake. Respect hierarchy.", true),
    rule(ETIQUETTE, "Shoes", "Remove shoes indoors.", true),
    rule(DINING, "Sharing", "Dishes are often shared.", false),
    rule(DOS_AND_DONTS, DO, "Use both hands to give/receive.", true),
    rule(DOS_AND_DONTS, DONT, "Don't touch heads or point feet.", true),
    rule(COMMON_MISTAKES, "Anger", "Getting angry in public causes loss of face.", true),
    rule(SITUATIONAL_TIPS, "Temples", "Dress modestly (cover shoulders/knees).", true),
];

const COUNTRY_QUIZZES: &[(&str, &[NewQuizQuestion<'static>])] = &[
    (
        "Japan",
        &[
            quiz(
                "You finish your bowl of ramen and it was delicious. What is a polite way to show this?",
                [
                    "Leave a little bit left in the bowl",
                    "Slurp loudly while eating",
                    "Burp loudly after finishing",
                    "Ask for a doggy bag",
                ],
                "Slurp loudly while eating",
            ),
            quiz(
                "You are paying for a souvenir. How should you hand the money to the cashier?",
                [
                    "Directly into their hand",
                    "Place it on the small tray provided",
                    "Throw it on the counter",
                    "Hide it in a handshake",
                ],
                "Place it on the small tray provided",
            ),
        ],
    ),
    (
        "France",
        &[
            quiz(
                "You enter a small boutique in Paris. What is the very first thing you must do?",
                [
                    "Start looking at clothes",
                    "Ask 'How much is this?'",
                    "Say 'Bonjour' to the shopkeeper",
                    "Smile and wave",
                ],
                "Say 'Bonjour' to the shopkeeper",
            ),
            quiz(
                "At a dinner party, when should you start eating?",
                [
                    "As soon as you are served",
                    "When the host says 'Bon Appétit'",
                    "When everyone has their food",
                    "After the first toast",
                ],
                "When the host says 'Bon Appétit'",
            ),
        ],
    ),
    (
        "United States",
        &[quiz(
            "You receive a bill at a restaurant for $100. The service was good. How much should you tip?",
            [
                "Nothing, service is included",
                "$5 - $10",
                "$15 - $20",
                "Round up to the nearest dollar",
            ],
            "$15 - $20",
        )],
    ),
    (
        "India",
        &[quiz(
            "You are eating a traditional meal served on a banana leaf. Which hand do you use?",
            ["Left hand only", "Right hand only", "Both hands", "Fork and knife"],
            "Right hand only",
        )],
    ),
    (
        "China",
        &[quiz(
            "You are given a business card. What should you NOT do?",
            [
                "Receive it with two hands",
                "Read it carefully",
                "Put it immediately in your back pocket",
                "Smile and thank them",
            ],
            "Put it immediately in your back pocket",
        )],
    ),
];

const EUROPE_QUIZ: &[NewQuizQuestion<'static>] = &[
    quiz(
        "In a formal setting, what is the standard greeting?",
        ["High five", "Firm handshake", "Hug", "Wave"],
        "Firm handshake",
    ),
    quiz(
        "When dining, where should your hands usually be?",
        ["Hidden under the table", "Visible on the table", "In your pockets", "Holding your phone"],
        "Visible on the table",
    ),
];

const ASIA_QUIZ: &[NewQuizQuestion<'static>] = &[
    quiz(
        "What is the most common rule when entering a home?",
        [
            "Keep shoes on",
            "Remove shoes",
            "Wear outdoor sandals",
            "Clean your shoes before entering",
        ],
        "Remove shoes",
    ),
    quiz(
        "How should you generally interact with elders?",
        [
            "Treat them as equals",
            "Show high respect and hierarchy",
            "Speak loudly",
            "Avoid eye contact",
        ],
        "Show high respect and hierarchy",
    ),
];

const LATIN_AMERICA_QUIZ: &[NewQuizQuestion<'static>] = &[
    quiz(
        "How is time/punctuality often viewed socially?",
        [
            "Strictly punctual",
            "Flexible (Polychronic)",
            "Arrive 1 hour early",
            "Cancelled if 5 mins late",
        ],
        "Flexible (Polychronic)",
    ),
    quiz(
        "What is a common friendly greeting?",
        ["Stiff handshake", "Kiss on the cheek or hug", "Bow", "Salute"],
        "Kiss on the cheek or hug",
    ),
];

const AFRICA_QUIZ: &[NewQuizQuestion<'static>] = &[
    quiz(
        "Which hand should you use for eating communal food?",
        ["Left hand", "Right hand", "Both hands", "Spoon only"],
        "Right hand",
    ),
    quiz(
        "Before taking a photo of someone, what must you do?",
        ["Just take it", "Ask for permission", "Hide the camera", "Pay them first"],
        "Ask for permission",
    ),
];

/// Countries seeded from a regional template. "Albania" is appended last.
const TEMPLATED_COUNTRIES: &[&str] = &[
    "Algeria", "Andorra", "Angola", "Antigua and Barbuda", "Argentina", "Australia", "Austria",
    "Bahamas", "Bahrain", "Bangladesh", "Barbados", "Belarus", "Belgium", "Belize", "Benin",
    "Bhutan", "Bolivia", "Bosnia and Herzegovina", "Botswana", "Brunei", "Bulgaria",
    "Burkina Faso", "Burundi", "Cabo Verde", "Cambodia", "Cameroon", "Canada",
    "Central African Republic", "Chad", "Chile", "Colombia", "Comoros",
    "Congo (Democratic Republic)", "Congo (Republic)", "Costa Rica", "Croatia", "Cuba", "Cyprus",
    "Czech Republic", "Denmark", "Djibouti", "Dominica", "Dominican Republic", "East Timor",
    "Ecuador", "Egypt", "El Salvador", "Equatorial Guinea", "Eritrea", "Estonia", "Eswatini",
    "Ethiopia", "Fiji", "Finland", "Gabon", "Gambia", "Georgia", "Germany", "Ghana", "Greece",
    "Grenada", "Guatemala", "Guinea", "Guinea-Bissau", "Guyana", "Haiti", "Honduras", "Hungary",
    "Iceland", "Indonesia", "Iran", "Iraq", "Ireland", "Israel", "Italy", "Ivory Coast",
    "Jamaica", "Jordan", "Kazakhstan", "Kenya", "Kiribati", "Kosovo", "Kuwait", "Kyrgyzstan",
    "Laos", "Latvia", "Lebanon", "Lesotho", "Liberia", "Libya", "Liechtenstein", "Lithuania",
    "Luxembourg", "Madagascar", "Malawi", "Malaysia", "Maldives", "Mali", "Malta",
    "Marshall Islands", "Mauritania", "Mauritius", "Mexico", "Micronesia", "Moldova", "Monaco",
    "Mongolia", "Montenegro", "Morocco", "Mozambique", "Myanmar", "Namibia", "Nauru", "Nepal",
    "Netherlands", "New Zealand", "Nicaragua", "Niger", "Nigeria", "North Korea",
    "North Macedonia", "Norway", "Oman", "Pakistan", "Palau", "Palestine", "Panama",
    "Papua New Guinea", "Paraguay", "Peru", "Philippines", "Poland", "Portugal", "Qatar",
    "Romania", "Russia", "Rwanda", "Saint Kitts and Nevis", "Saint Lucia",
    "Saint Vincent and the Grenadines", "Samoa", "San Marino", "Sao Tome and Principe",
    "Saudi Arabia", "Senegal", "Serbia", "Seychelles", "Sierra Leone", "Singapore", "Slovakia",
    "Slovenia", "Solomon Islands", "Somalia", "South Africa", "South Korea", "South Sudan",
    "Spain", "Sri Lanka", "Sudan", "Suriname", "Sweden", "Switzerland", "Syria", "Taiwan",
    "Tajikistan", "Tanzania", "Thailand", "Togo", "Tonga", "Trinidad and Tobago", "Tunisia",
    "Turkey", "Turkmenistan", "Tuvalu", "Uganda", "Ukraine", "United Arab Emirates", "Uruguay",
    "Uzbekistan", "Vanuatu", "Vatican City", "Venezuela", "Vietnam", "Yemen", "Zambia",
    "Zimbabwe",
    "Albania",
];

const LATIN_AMERICA_MEMBERS: &[&str] = &[
    "Argentina", "Bolivia", "Chile", "Colombia", "Costa Rica", "Cuba", "Dominican Republic",
    "Ecuador", "El Salvador", "Guatemala", "Honduras", "Mexico", "Nicaragua", "Panama", "Paraguay",
    "Peru", "Uruguay", "Venezuela",
];

// "Congo" matches neither Congo entry in the list above; both fall through to Europe.
const AFRICA_MEMBERS: &[&str] = &[
    "Benin", "Botswana", "Burkina Faso", "Burundi", "Cameroon", "Chad", "Congo", "Egypt",
    "Ethiopia", "Gabon", "Ghana", "Kenya", "Liberia", "Libya", "Nigeria", "Rwanda", "Senegal",
    "South Africa", "Tanzania", "Uganda", "Zambia", "Zimbabwe",
];

const ASIA_MEMBERS: &[&str] = &[
    "Thailand", "Vietnam", "Laos", "Cambodia", "Myanmar", "Malaysia", "Indonesia", "Philippines",
    "Afghanistan", "Pakistan", "Bangladesh", "Sri Lanka", "Nepal",
];

const DETAILED_ASIA: &[&str] = &["Afghanistan", "China", "India", "Japan", "Thailand", "Vietnam"];
const DETAILED_LATIN_AMERICA: &[&str] = &["Brazil", "Argentina"];
const DETAILED_AFRICA: &[&str] = &["Egypt", "Nigeria", "South Africa"];

impl Region {
    fn for_detailed(name: &str) -> Self {
        if DETAILED_ASIA.contains(&name) {
            Self::Asia
        } else if DETAILED_LATIN_AMERICA.contains(&name) {
            Self::LatinAmerica
        } else if DETAILED_AFRICA.contains(&name) {
            Self::Africa
        } else {
            Self::Europe
        }
    }

    fn for_templated(name: &str) -> Self {
        if LATIN_AMERICA_MEMBERS.contains(&name) {
            Self::LatinAmerica
        } else if AFRICA_MEMBERS.contains(&name) {
            Self::Africa
        } else if ASIA_MEMBERS.contains(&name) {
            Self::Asia
        } else {
            // Oceania and everything unlisted use the western template.
            Self::Europe
        }
    }

    fn template(self) -> (&'static str, &'static [NewCulturalDetail<'static>]) {
        match self {
            Self::LatinAmerica => ("Spanish", LATIN_AMERICA_RULES),
            Self::Europe => ("Local Language", EUROPE_RULES),
            Self::Africa => ("English/French/Local", AFRICA_RULES),
            Self::Asia => ("Local/English", ASIA_RULES),
        }
    }

    fn quiz(self) -> &'static [NewQuizQuestion<'static>] {
        match self {
            Self::Europe => EUROPE_QUIZ,
            Self::Asia => ASIA_QUIZ,
            Self::LatinAmerica => LATIN_AMERICA_QUIZ,
            Self::Africa => AFRICA_QUIZ,
        }
    }
}

fn has_country_quiz(name: &str) -> bool {
    COUNTRY_QUIZZES.iter().any(|(country, _)| *country == name)
}

/// Loads the reference catalogue. Safe to run repeatedly: rows that already
/// exist are left untouched.
pub async fn seed_catalog<S>(store: &S) -> Result<SeedReport>
where
    S: KnowledgeRepository + QuizRepository,
{
    let mut report = SeedReport::default();
    let before = store.list_countries().await?.len();

    for seed in DETAILED_COUNTRIES {
        let country = store.upsert_country(seed.name, Some(seed.language)).await?;
        report.details_added += insert_details(store, country.id, seed.details).await?;

        if !has_country_quiz(seed.name) {
            let region = Region::for_detailed(seed.name);
            report.quiz_questions_added += insert_quiz(store, country.id, region.quiz()).await?;
        }
    }

    for name in TEMPLATED_COUNTRIES {
        if DETAILED_COUNTRIES.iter().any(|seed| seed.name == *name) {
            continue;
        }

        let region = Region::for_templated(name);
        let (language, details) = region.template();
        let country = store.upsert_country(name, Some(language)).await?;
        report.details_added += insert_details(store, country.id, details).await?;

        if !has_country_quiz(name) {
            report.quiz_questions_added += insert_quiz(store, country.id, region.quiz()).await?;
        }
    }

    for (name, questions) in COUNTRY_QUIZZES {
        let Some(country) = store.get_country_by_name(name).await? else {
            tracing::warn!(country = %name, "skipping quiz for unknown country");
            continue;
        };
        report.quiz_questions_added += insert_quiz(store, country.id, questions).await?;
    }

    report.countries_total = store.list_countries().await?.len();
    report.countries_added = report.countries_total.saturating_sub(before);

    info!(
        countries_total = report.countries_total,
        countries_added = report.countries_added,
        details_added = report.details_added,
        quiz_questions_added = report.quiz_questions_added,
        "catalog seeded"
    );

    Ok(report)
}

async fn insert_details<S: KnowledgeRepository>(
    store: &S,
    country_id: i64,
    details: &[NewCulturalDetail<'_>],
) -> Result<usize> {
    let mut added = 0;
    for detail in details {
        if store.upsert_detail(country_id, detail).await? {
            added += 1;
        }
    }
    Ok(added)
}

async fn insert_quiz<S: QuizRepository>(
    store: &S,
    country_id: i64,
    questions: &[NewQuizQuestion<'_>],
) -> Result<usize> {
    let mut added = 0;
    for question in questions {
        if store.upsert_quiz_question(country_id, question).await? {
            added += 1;
        }
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn regional_assignment_matches_membership_lists() {
        assert_eq!(Region::for_templated("Mexico"), Region::LatinAmerica);
        assert_eq!(Region::for_templated("Kenya"), Region::Africa);
        assert_eq!(Region::for_templated("Nepal"), Region::Asia);
        assert_eq!(Region::for_templated("Australia"), Region::Europe);
        assert_eq!(Region::for_templated("Congo (Republic)"), Region::Europe);
        assert_eq!(Region::for_detailed("Brazil"), Region::LatinAmerica);
        assert_eq!(Region::for_detailed("United Kingdom"), Region::Europe);
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = MemoryStore::new();

        let first = seed_catalog(&store).await.unwrap();
        assert_eq!(
            first.countries_total,
            DETAILED_COUNTRIES.len() + TEMPLATED_COUNTRIES.len()
        );
        assert_eq!(first.countries_added, first.countries_total);
        assert!(first.details_added > 0);

        let second = seed_catalog(&store).await.unwrap();
        assert_eq!(second.countries_total, first.countries_total);
        assert_eq!(second.countries_added, 0);
        assert_eq!(second.details_added, 0);
        assert_eq!(second.quiz_questions_added, 0);
    }

    #[tokio::test]
    async fn detailed_countries_come_first_in_listing_order() {
        let store = MemoryStore::new();
        seed_catalog(&store).await.unwrap();

        let names = store
            .list_countries()
            .await
            .unwrap()
            .into_iter()
            .map(|country| country.name)
            .collect::<Vec<_>>();

        assert_eq!(&names[..3], ["Afghanistan", "China", "India"]);
        assert_eq!(names.last().map(String::as_str), Some("Albania"));
    }

    #[tokio::test]
    async fn quizzes_prefer_country_specific_sets() {
        let store = MemoryStore::new();
        seed_catalog(&store).await.unwrap();

        let japan = store.get_country_by_name("Japan").await.unwrap().unwrap();
        let questions = store.list_quiz_questions(japan.id).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions[0].question.contains("ramen"));

        let brazil = store.get_country_by_name("Brazil").await.unwrap().unwrap();
        let questions = store.list_quiz_questions(brazil.id).await.unwrap();
        assert_eq!(questions[0].answer, "Flexible (Polychronic)");
    }
}
