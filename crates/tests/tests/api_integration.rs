use axum::http::StatusCode;
use geopulse_tests::{broken_store_app, get_json, post_json, seeded_app};
use serde_json::json;

#[tokio::test]
async fn health_reports_store_backend() {
    let (status, body) = get_json(seeded_app().await, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store_backend"], "memory");
    assert!(body["metrics"]["requests_total"].is_u64());
}

#[tokio::test]
async fn countries_are_listed_in_seed_order() {
    let (status, body) = get_json(seeded_app().await, "/api/countries").await;

    assert_eq!(status, StatusCode::OK);
    let countries = body.as_array().expect("array of countries");
    assert_eq!(countries.len(), 195);
    assert_eq!(countries[0]["name"], "Afghanistan");
    assert_eq!(countries[3]["name"], "Japan");
    assert!(countries[0]["id"].is_i64());
}

#[tokio::test]
async fn guide_returns_structured_details() {
    let (status, body) = get_json(seeded_app().await, "/api/guide/japan").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["country"], "Japan");
    assert_eq!(body["language"], "Japanese");

    let details = body["details"].as_array().expect("details array");
    assert_eq!(details.len(), 7);
    assert_eq!(details[0]["category"], "GREETING");
    assert_eq!(details[0]["topic"], "Bowing");
    assert_eq!(details[0]["is_strict"], true);
}

#[tokio::test]
async fn guide_accepts_aliases_and_encoded_names() {
    let app = seeded_app().await;

    let (status, body) = get_json(app.clone(), "/api/guide/USA").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["country"], "United States");

    let (status, body) = get_json(app, "/api/guide/antigua%20and%20barbuda").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["country"], "Antigua and Barbuda");
    assert_eq!(body["language"], "Local Language");
}

#[tokio::test]
async fn unknown_guide_is_not_found() {
    let (status, body) = get_json(seeded_app().await, "/api/guide/Atlantis").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "country_not_found");
    assert_eq!(body["message"], "Country 'Atlantis' not found");
}

#[tokio::test]
async fn quiz_returns_options_and_answer() {
    let app = seeded_app().await;

    let (status, body) = get_json(app.clone(), "/api/quiz/Japan").await;
    assert_eq!(status, StatusCode::OK);
    let questions = body.as_array().expect("quiz array");
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["options"].as_array().map(Vec::len), Some(4));
    assert_eq!(questions[0]["answer"], "Slurp loudly while eating");

    let (status, body) = get_json(app, "/api/quiz/kenya").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[1]["answer"], "Ask for permission");
}

#[tokio::test]
async fn quiz_for_unknown_country_is_empty_list() {
    let (status, body) = get_json(seeded_app().await, "/api/quiz/Atlantis").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn chat_greeting_without_country_onboards() {
    let (status, body) = post_json(
        seeded_app().await,
        "/api/chat",
        json!({ "message": "Hello!", "country": "general" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["response"]
        .as_str()
        .unwrap()
        .starts_with("Hi! I'm GeoPulse."));
    assert!(body["active_country"].is_null());
}

#[tokio::test]
async fn chat_without_context_field_prompts_for_country() {
    let (status, body) = post_json(
        seeded_app().await,
        "/api/chat",
        json!({ "message": "what should I wear?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "I can help with cultural guides. Which country are you curious about?"
    );
    assert!(body["active_country"].is_null());
}

#[tokio::test]
async fn chat_do_question_names_country_from_message() {
    let (status, body) = post_json(
        seeded_app().await,
        "/api/chat",
        json!({ "message": "Can I tip in Japan?", "country": "general" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "✅ **Japan (Do's)**:\n• Exchange business cards with two hands."
    );
    assert_eq!(body["active_country"], "Japan");
}

#[tokio::test]
async fn chat_snapshot_for_france() {
    let (status, body) = post_json(
        seeded_app().await,
        "/api/chat",
        json!({ "message": "tell me about France", "country": "general" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "🌏 **France Cultural Snapshot**:\n\n🔹 **Bonjour**: Say Bonjour immediately upon entering a shop.\n\n🔹 **Volume**: Speak quietly in public.\n\n🔹 **Hands**: Hands visible on table.\n\n*Try asking: 'Can I tip here?'*"
    );
    assert_eq!(body["active_country"], "France");
}

#[tokio::test]
async fn chat_off_topic_keeps_context_country() {
    let (status, body) = post_json(
        seeded_app().await,
        "/api/chat",
        json!({ "message": "what's the weather", "country": "Japan" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response = body["response"].as_str().unwrap();
    assert!(response.starts_with("I can only help with cultural etiquette questions"));
    assert!(response.contains("Japan"));
    assert_eq!(body["active_country"], "Japan");
}

#[tokio::test]
async fn chat_dont_question_uses_context() {
    let (status, body) = post_json(
        seeded_app().await,
        "/api/chat",
        json!({ "message": "what to avoid?", "country": "india" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "⛔ **India (Don'ts)**:\n• Don't wink or whistle, it can be seen as rude or insulting."
    );
    assert_eq!(body["active_country"], "India");
}

#[tokio::test]
async fn chat_matching_stays_substring_based() {
    let app = seeded_app().await;

    // "Niger" is seeded before "Nigeria" and is a substring of it.
    let (_, body) = post_json(
        app.clone(),
        "/api/chat",
        json!({ "message": "tell me about Nigeria", "country": "general" }),
    )
    .await;
    assert_eq!(body["active_country"], "Niger");

    // "kingdom" contains "do", so this routes to the DO rules.
    let (_, body) = post_json(
        app,
        "/api/chat",
        json!({
            "message": "Is it rude to stare in the United Kingdom?",
            "country": "general"
        }),
    )
    .await;
    assert_eq!(
        body["response"],
        "✅ **United Kingdom (Do's)**:\n• Say please and thank you constantly."
    );
}

#[tokio::test]
async fn chat_is_idempotent() {
    let app = seeded_app().await;
    let payload = json!({ "message": "How do people greet in Brazil?", "country": "Japan" });

    let (_, first) = post_json(app.clone(), "/api/chat", payload.clone()).await;
    let (_, second) = post_json(app, "/api/chat", payload).await;

    assert_eq!(first, second);
    assert_eq!(first["active_country"], "Brazil");
}

#[tokio::test]
async fn chat_rejects_oversized_messages() {
    let (status, body) = post_json(
        seeded_app().await,
        "/api/chat",
        json!({ "message": "a".repeat(2_001), "country": "general" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn store_failures_map_to_service_unavailable() {
    let app = broken_store_app().await;

    let (status, body) = post_json(
        app.clone(),
        "/api/chat",
        json!({ "message": "Can I tip in Japan?", "country": "general" }),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "store_unavailable");
    assert!(body["message"].is_string());

    let (status, body) = get_json(app.clone(), "/api/countries").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "store_unavailable");

    let (status, _) = get_json(app.clone(), "/api/guide/Japan").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = get_json(app.clone(), "/api/quiz/Japan").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, body) = get_json(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store_backend"], "sqlite");
    assert_eq!(body["metrics"]["store_errors_total"], 4);
}
