use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use geopulse_core::{
    classify_intent, compose_country_reply, looks_like_greeting, no_country_reply, top_tips,
    used_fallback, validate_country_name, ChatReply, Country, CountryGuide, CountrySummary, Intent,
    QuizItem,
};
use geopulse_observability::AppMetrics;
use geopulse_storage::{KnowledgeRepository, QuizRepository};
use tracing::{info, instrument, warn};

/// Context value meaning "no country selected yet".
pub const GENERAL_CONTEXT: &str = "general";

/// Stateless dialogue router over a shared store handle. Cloning is cheap;
/// every call re-queries the store.
pub struct GuideAgent<S>
where
    S: KnowledgeRepository + QuizRepository,
{
    store: Arc<S>,
    metrics: Arc<AppMetrics>,
}

impl<S> Clone for GuideAgent<S>
where
    S: KnowledgeRepository + QuizRepository,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<S> GuideAgent<S>
where
    S: KnowledgeRepository + QuizRepository,
{
    pub fn new(store: Arc<S>, metrics: Arc<AppMetrics>) -> Self {
        Self { store, metrics }
    }

    #[cfg(test)]
    fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Counts a failed store call before handing the error back.
    fn track_store<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(error) = &result {
            self.metrics.inc_store_error();
            warn!(error = %error, "knowledge store unavailable");
        }
        result
    }

    /// A country named anywhere in the message beats the caller's context.
    /// Among several names, the first one in store order wins.
    pub async fn resolve_country(
        &self,
        message: &str,
        context_country: &str,
    ) -> Result<Option<Country>> {
        let lower = message.to_lowercase();

        let countries = self.store.list_countries().await?;
        if let Some(country) = countries
            .into_iter()
            .find(|country| lower.contains(&country.name.to_lowercase()))
        {
            return Ok(Some(country));
        }

        if !context_country.is_empty() && context_country.to_lowercase() != GENERAL_CONTEXT {
            return self.store.get_country_by_name(context_country).await;
        }

        Ok(None)
    }

    pub async fn top_tips(&self, country: &Country) -> Result<String> {
        let details = self.store.get_details(country.id).await?;
        Ok(top_tips(&details))
    }

    #[instrument(skip(self, message), fields(message_len = message.len()))]
    pub async fn process_message(&self, message: &str, context_country: &str) -> Result<ChatReply> {
        let started = Instant::now();
        self.metrics.inc_request();

        let result = self.route(message, context_country).await;
        self.metrics.observe_latency(started.elapsed());

        self.track_store(result)
    }

    async fn route(&self, message: &str, context_country: &str) -> Result<ChatReply> {
        let Some(country) = self.resolve_country(message, context_country).await? else {
            self.metrics.inc_unresolved_country();
            info!(context = %context_country, "no country resolved");
            return Ok(ChatReply {
                response: no_country_reply(looks_like_greeting(message)).to_string(),
                active_country: None,
            });
        };

        let intent = classify_intent(message);

        let details = if intent == Intent::OffTopic {
            self.metrics.inc_off_topic();
            Vec::new()
        } else {
            self.store.get_details(country.id).await?
        };

        if used_fallback(intent, &details) {
            self.metrics.inc_fallback();
        }

        let response = compose_country_reply(intent, &country, &details);
        info!(
            country = %country.name,
            intent = intent.as_code(),
            details = details.len(),
            "chat handled"
        );

        Ok(ChatReply {
            response,
            active_country: Some(country.name),
        })
    }

    pub async fn countries(&self) -> Result<Vec<CountrySummary>> {
        let countries = self.track_store(self.store.list_countries().await)?;
        Ok(countries
            .into_iter()
            .map(|country| CountrySummary {
                id: country.id,
                name: country.name,
            })
            .collect())
    }

    /// Looks up a country by name or alias. Blank input is treated as unknown.
    pub async fn guide(&self, name: &str) -> Result<Option<CountryGuide>> {
        let Ok(canonical) = validate_country_name(name) else {
            return Ok(None);
        };
        let result = self.load_guide(&canonical).await;
        self.track_store(result)
    }

    async fn load_guide(&self, canonical: &str) -> Result<Option<CountryGuide>> {
        let Some(country) = self.store.get_country_by_name(canonical).await? else {
            return Ok(None);
        };

        let details = self.store.get_details(country.id).await?;
        Ok(Some(CountryGuide::from_parts(&country, details)))
    }

    /// Unknown countries yield an empty quiz rather than an error.
    pub async fn quiz(&self, name: &str) -> Result<Vec<QuizItem>> {
        let Ok(canonical) = validate_country_name(name) else {
            return Ok(Vec::new());
        };
        let result = self.load_quiz(&canonical).await;
        self.track_store(result)
    }

    async fn load_quiz(&self, canonical: &str) -> Result<Vec<QuizItem>> {
        let Some(country) = self.store.get_country_by_name(canonical).await? else {
            return Ok(Vec::new());
        };

        let questions = self.store.list_quiz_questions(country.id).await?;
        Ok(questions.into_iter().map(QuizItem::from).collect())
    }
}
