pub mod seed;

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use geopulse_core::{Country, CulturalDetail, QuizQuestion};
use parking_lot::RwLock;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

pub use seed::{seed_catalog, SeedReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCulturalDetail<'a> {
    pub category: &'a str,
    pub topic: &'a str,
    pub description: &'a str,
    pub is_strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewQuizQuestion<'a> {
    pub question: &'a str,
    pub options: [&'a str; 4],
    pub answer: &'a str,
}

/// Read side used by the chat router plus the upserts used for seeding.
///
/// Listing methods return rows in insertion order; the router depends on it
/// for first-match precedence.
pub trait KnowledgeRepository: Send + Sync {
    async fn list_countries(&self) -> Result<Vec<Country>>;
    async fn get_country_by_name(&self, name: &str) -> Result<Option<Country>>;
    async fn get_details(&self, country_id: i64) -> Result<Vec<CulturalDetail>>;
    async fn upsert_country(&self, name: &str, language: Option<&str>) -> Result<Country>;
    /// Returns `false` when a row with the same category and topic already exists.
    async fn upsert_detail(
        &self,
        country_id: i64,
        detail: &NewCulturalDetail<'_>,
    ) -> Result<bool>;
}

pub trait QuizRepository: Send + Sync {
    async fn list_quiz_questions(&self, country_id: i64) -> Result<Vec<QuizQuestion>>;
    /// Returns `false` when the country already has this question text.
    async fn upsert_quiz_question(
        &self,
        country_id: i64,
        question: &NewQuizQuestion<'_>,
    ) -> Result<bool>;
}

#[derive(Debug, Default)]
struct MemoryCatalog {
    countries: Vec<Country>,
    details: Vec<CulturalDetail>,
    quiz_questions: Vec<QuizQuestion>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    catalog: Arc<RwLock<MemoryCatalog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(len: usize) -> i64 {
    len as i64 + 1
}

/// Case-insensitive name match shared by both backends. Folding is Unicode
/// lowercase, the same rule the router applies to messages.
fn find_folded<'a>(countries: &'a [Country], name: &str) -> Option<&'a Country> {
    let wanted = name.to_lowercase();
    countries
        .iter()
        .find(|country| country.name.to_lowercase() == wanted)
}

impl KnowledgeRepository for MemoryStore {
    async fn list_countries(&self) -> Result<Vec<Country>> {
        Ok(self.catalog.read().countries.clone())
    }

    async fn get_country_by_name(&self, name: &str) -> Result<Option<Country>> {
        let catalog = self.catalog.read();
        let exact = catalog.countries.iter().find(|country| country.name == name);
        Ok(exact
            .or_else(|| find_folded(&catalog.countries, name))
            .cloned())
    }

    async fn get_details(&self, country_id: i64) -> Result<Vec<CulturalDetail>> {
        Ok(self
            .catalog
            .read()
            .details
            .iter()
            .filter(|detail| detail.country_id == country_id)
            .cloned()
            .collect())
    }

    async fn upsert_country(&self, name: &str, language: Option<&str>) -> Result<Country> {
        let mut catalog = self.catalog.write();
        if let Some(existing) = catalog.countries.iter().find(|country| country.name == name) {
            return Ok(existing.clone());
        }

        let country = Country {
            id: next_id(catalog.countries.len()),
            name: name.to_string(),
            language: language.map(str::to_string),
        };
        catalog.countries.push(country.clone());
        Ok(country)
    }

    async fn upsert_detail(
        &self,
        country_id: i64,
        detail: &NewCulturalDetail<'_>,
    ) -> Result<bool> {
        let mut catalog = self.catalog.write();
        if !catalog.countries.iter().any(|country| country.id == country_id) {
            anyhow::bail!("country {} does not exist", country_id);
        }

        let exists = catalog.details.iter().any(|row| {
            row.country_id == country_id
                && row.category == detail.category
                && row.topic == detail.topic
        });
        if exists {
            return Ok(false);
        }

        let id = next_id(catalog.details.len());
        catalog.details.push(CulturalDetail {
            id,
            country_id,
            category: detail.category.to_string(),
            topic: detail.topic.to_string(),
            description: detail.description.to_string(),
            is_strict: detail.is_strict,
        });
        Ok(true)
    }
}

impl QuizRepository for MemoryStore {
    async fn list_quiz_questions(&self, country_id: i64) -> Result<Vec<QuizQuestion>> {
        Ok(self
            .catalog
            .read()
            .quiz_questions
            .iter()
            .filter(|question| question.country_id == country_id)
            .cloned()
            .collect())
    }

    async fn upsert_quiz_question(
        &self,
        country_id: i64,
        question: &NewQuizQuestion<'_>,
    ) -> Result<bool> {
        let mut catalog = self.catalog.write();
        if !catalog.countries.iter().any(|country| country.id == country_id) {
            anyhow::bail!("country {} does not exist", country_id);
        }

        let exists = catalog
            .quiz_questions
            .iter()
            .any(|row| row.country_id == country_id && row.question == question.question);
        if exists {
            return Ok(false);
        }

        let [option_a, option_b, option_c, option_d] = question.options;
        let id = next_id(catalog.quiz_questions.len());
        catalog.quiz_questions.push(QuizQuestion {
            id,
            country_id,
            question: question.question.to_string(),
            option_a: option_a.to_string(),
            option_b: option_b.to_string(),
            option_c: option_c.to_string(),
            option_d: option_d.to_string(),
            answer: question.answer.to_string(),
        });
        Ok(true)
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite url {}", database_url))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to an in-memory database sees its own empty copy,
        // so keep exactly one alive for the lifetime of the pool.
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(8)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("failed connecting to sqlite at {}", database_url))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS countries (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              name TEXT NOT NULL UNIQUE,
              language TEXT
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cultural_details (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              country_id INTEGER NOT NULL REFERENCES countries(id),
              category TEXT NOT NULL,
              topic TEXT NOT NULL,
              description TEXT NOT NULL,
              is_strict BOOLEAN NOT NULL DEFAULT 0
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_cultural_details_key
            ON cultural_details(country_id, category, topic)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS quiz_questions (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              country_id INTEGER NOT NULL REFERENCES countries(id),
              question TEXT NOT NULL,
              option_a TEXT NOT NULL,
              option_b TEXT NOT NULL,
              option_c TEXT NOT NULL,
              option_d TEXT NOT NULL,
              answer TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_quiz_questions_key
            ON quiz_questions(country_id, question)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn country_from_row(row: &SqliteRow) -> Country {
    Country {
        id: row.get("id"),
        name: row.get("name"),
        language: row.get("language"),
    }
}

fn detail_from_row(row: &SqliteRow) -> CulturalDetail {
    CulturalDetail {
        id: row.get("id"),
        country_id: row.get("country_id"),
        category: row.get("category"),
        topic: row.get("topic"),
        description: row.get("description"),
        is_strict: row.get("is_strict"),
    }
}

fn quiz_from_row(row: &SqliteRow) -> QuizQuestion {
    QuizQuestion {
        id: row.get("id"),
        country_id: row.get("country_id"),
        question: row.get("question"),
        option_a: row.get("option_a"),
        option_b: row.get("option_b"),
        option_c: row.get("option_c"),
        option_d: row.get("option_d"),
        answer: row.get("answer"),
    }
}

impl KnowledgeRepository for SqliteStore {
    async fn list_countries(&self) -> Result<Vec<Country>> {
        let rows = sqlx::query("SELECT id, name, language FROM countries ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("failed listing countries")?;

        Ok(rows.iter().map(country_from_row).collect())
    }

    async fn get_country_by_name(&self, name: &str) -> Result<Option<Country>> {
        let row = sqlx::query("SELECT id, name, language FROM countries WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed looking up country {}", name))?;
        if let Some(row) = row {
            return Ok(Some(country_from_row(&row)));
        }

        // NOCASE only folds ASCII, so the case-insensitive pass runs here.
        let countries = self.list_countries().await?;
        Ok(find_folded(&countries, name).cloned())
    }

    async fn get_details(&self, country_id: i64) -> Result<Vec<CulturalDetail>> {
        let rows = sqlx::query(
            r#"
            SELECT id, country_id, category, topic, description, is_strict
            FROM cultural_details
            WHERE country_id = ?1
            ORDER BY id
            "#,
        )
        .bind(country_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("failed loading details for country {}", country_id))?;

        Ok(rows.iter().map(detail_from_row).collect())
    }

    async fn upsert_country(&self, name: &str, language: Option<&str>) -> Result<Country> {
        // The UNIQUE(name) conflict makes concurrent seeders converge on one row.
        sqlx::query("INSERT OR IGNORE INTO countries (name, language) VALUES (?1, ?2)")
            .bind(name)
            .bind(language)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed inserting country {}", name))?;

        let row = sqlx::query("SELECT id, name, language FROM countries WHERE name = ?1")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("failed reading back country {}", name))?;

        Ok(country_from_row(&row))
    }

    async fn upsert_detail(
        &self,
        country_id: i64,
        detail: &NewCulturalDetail<'_>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO cultural_details
              (country_id, category, topic, description, is_strict)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(country_id)
        .bind(detail.category)
        .bind(detail.topic)
        .bind(detail.description)
        .bind(detail.is_strict)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed inserting detail for country {}", country_id))?;

        Ok(result.rows_affected() == 1)
    }
}

impl QuizRepository for SqliteStore {
    async fn list_quiz_questions(&self, country_id: i64) -> Result<Vec<QuizQuestion>> {
        let rows = sqlx::query(
            r#"
            SELECT id, country_id, question, option_a, option_b, option_c, option_d, answer
            FROM quiz_questions
            WHERE country_id = ?1
            ORDER BY id
            "#,
        )
        .bind(country_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(quiz_from_row).collect())
    }

    async fn upsert_quiz_question(
        &self,
        country_id: i64,
        question: &NewQuizQuestion<'_>,
    ) -> Result<bool> {
        let [option_a, option_b, option_c, option_d] = question.options;
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO quiz_questions
              (country_id, question, option_a, option_b, option_c, option_d, answer)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(country_id)
        .bind(question.question)
        .bind(option_a)
        .bind(option_b)
        .bind(option_c)
        .bind(option_d)
        .bind(question.answer)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed inserting quiz question for country {}", country_id))?;

        Ok(result.rows_affected() == 1)
    }
}

#[derive(Clone)]
pub enum Store {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl Store {
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    pub async fn sqlite(database_url: &str) -> Result<Self> {
        let sqlite = SqliteStore::connect(database_url).await?;
        Ok(Self::Sqlite(sqlite))
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Memory(_) => "memory",
            Store::Sqlite(_) => "sqlite",
        }
    }
}

impl KnowledgeRepository for Store {
    async fn list_countries(&self) -> Result<Vec<Country>> {
        match self {
            Store::Memory(store) => store.list_countries().await,
            Store::Sqlite(store) => store.list_countries().await,
        }
    }

    async fn get_country_by_name(&self, name: &str) -> Result<Option<Country>> {
        match self {
            Store::Memory(store) => store.get_country_by_name(name).await,
            Store::Sqlite(store) => store.get_country_by_name(name).await,
        }
    }

    async fn get_details(&self, country_id: i64) -> Result<Vec<CulturalDetail>> {
        match self {
            Store::Memory(store) => store.get_details(country_id).await,
            Store::Sqlite(store) => store.get_details(country_id).await,
        }
    }

    async fn upsert_country(&self, name: &str, language: Option<&str>) -> Result<Country> {
        match self {
            Store::Memory(store) => store.upsert_country(name, language).await,
            Store::Sqlite(store) => store.upsert_country(name, language).await,
        }
    }

    async fn upsert_detail(
        &self,
        country_id: i64,
        detail: &NewCulturalDetail<'_>,
    ) -> Result<bool> {
        match self {
            Store::Memory(store) => store.upsert_detail(country_id, detail).await,
            Store::Sqlite(store) => store.upsert_detail(country_id, detail).await,
        }
    }
}

impl QuizRepository for Store {
    async fn list_quiz_questions(&self, country_id: i64) -> Result<Vec<QuizQuestion>> {
        match self {
            Store::Memory(store) => store.list_quiz_questions(country_id).await,
            Store::Sqlite(store) => store.list_quiz_questions(country_id).await,
        }
    }

    async fn upsert_quiz_question(
        &self,
        country_id: i64,
        question: &NewQuizQuestion<'_>,
    ) -> Result<bool> {
        match self {
            Store::Memory(store) => store.upsert_quiz_question(country_id, question).await,
            Store::Sqlite(store) => store.upsert_quiz_question(country_id, question).await,
        }
    }
}
