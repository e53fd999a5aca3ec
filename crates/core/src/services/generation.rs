//! AI question generation service.
//!
//! Calls the hosted generative-language API to top up deck buckets the
//! database could not fill. Generation is strictly best-effort on gameplay
//! paths: any failure (missing key, HTTP error, empty text, malformed JSON,
//! per-item save error) is logged and yields zero items.

use queple_common::{AppError, AppResult, GenerationConfig};
use queple_db::entities::{Gender, question};
use queple_db::repositories::{CategoryRepository, QuestionRepository};
use sea_orm::Set;
use serde::Deserialize;
use serde_json::json;

/// Depth ladder used in prompts, level 1 through 10.
const LEVEL_DESCRIPTIONS: [&str; 10] = [
    "Surface",
    "Getting Comfortable",
    "Opening Up",
    "Personal Territory",
    "Below the Surface",
    "Guarded Ground",
    "Deep Waters",
    "Raw Honesty",
    "Inner Sanctum",
    "Naked Truth",
];

/// Parameters for one bucket-generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Target gender of the bucket being filled.
    pub gender: Gender,
    /// How many questions to ask for.
    pub count: usize,
    pub min_level: i32,
    pub max_level: i32,
    pub allow_18_plus: bool,
    /// Category to attribute generated questions to, if the caller named one.
    pub category_id: Option<String>,
    /// User to credit as creator (the system user for anonymous requests).
    pub creator_id: String,
}

/// Generated item as returned by the model, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedItem {
    content: String,
    #[serde(default)]
    level: Option<i64>,
    #[serde(default)]
    for_gender: Option<Gender>,
    #[serde(default)]
    is_18_plus: Option<bool>,
}

/// Question generation service.
#[derive(Clone)]
pub struct GenerationService {
    config: GenerationConfig,
    http_client: reqwest::Client,
    question_repo: QuestionRepository,
    category_repo: CategoryRepository,
}

impl GenerationService {
    /// Create a new generation service.
    #[must_use]
    pub fn new(
        config: GenerationConfig,
        question_repo: QuestionRepository,
        category_repo: CategoryRepository,
    ) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
            question_repo,
            category_repo,
        }
    }

    /// Whether a model API key is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Generate and persist questions for a deficit bucket.
    ///
    /// Never fails: every error path logs and returns the questions saved so
    /// far (possibly none), leaving the caller to fall back to the static
    /// bank.
    pub async fn generate_for_bucket(&self, req: &GenerationRequest) -> Vec<question::Model> {
        match self.try_generate(req).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(error = %e, gender = ?req.gender, count = req.count,
                    "Question generation failed, bucket falls through to static bank");
                Vec::new()
            }
        }
    }

    async fn try_generate(&self, req: &GenerationRequest) -> AppResult<Vec<question::Model>> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(AppError::Config(
                "generation API key not configured".to_string(),
            ));
        };

        let prompt = build_bucket_prompt(req);

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "content": { "type": "STRING" },
                            "level": { "type": "INTEGER" },
                            "forGender": {
                                "type": "STRING",
                                "enum": ["MALE", "FEMALE", "BOTH"],
                            },
                            "is18Plus": { "type": "BOOLEAN" },
                        },
                        "required": ["content", "level", "forGender", "is18Plus"],
                    },
                },
            },
        });

        let text = self.call_model(api_key, &body).await?;
        let items = parse_generated_items(&text, req.gender)?;

        let category_id = self.resolve_category(req.category_id.as_deref()).await;

        let mut saved = Vec::with_capacity(items.len());
        for item in items {
            if !req.allow_18_plus && item.is_18_plus {
                tracing::debug!("Dropping generated adult question for an all-ages request");
                continue;
            }

            let active = question::ActiveModel {
                id: Set(crate::generate_id()),
                content: Set(item.content),
                for_gender: Set(item.for_gender),
                level: Set(item.level),
                is_18_plus: Set(item.is_18_plus),
                category_id: Set(category_id.clone()),
                creator_id: Set(req.creator_id.clone()),
                upvotes: Set(0),
                downvotes: Set(0),
                viewers_count: Set(0),
                created_at: Set(chrono::Utc::now().into()),
                updated_at: Set(None),
            };

            match self.question_repo.create(active).await {
                Ok(model) => saved.push(model),
                Err(e) => tracing::warn!(error = %e, "Failed to save generated question"),
            }
        }

        Ok(saved)
    }

    /// Raw prompt passthrough, returning the model's cleaned text.
    ///
    /// Unlike bucket generation this surfaces errors: the endpoint it backs
    /// is not a gameplay path.
    pub async fn generate_text(
        &self,
        user_prompt: &str,
        system_prompt: Option<&str>,
    ) -> AppResult<String> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(AppError::Config(
                "generation API key not configured".to_string(),
            ));
        };

        let mut body = json!({
            "contents": [{ "parts": [{ "text": user_prompt }] }],
        });
        if let Some(system) = system_prompt {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }

        let text = self.call_model(api_key, &body).await?;
        let cleaned = text.replace('"', "").trim().to_string();

        if cleaned.is_empty() {
            return Err(AppError::ExternalService(
                "Empty response from model".to_string(),
            ));
        }

        Ok(cleaned)
    }

    async fn call_model(&self, api_key: &str, body: &serde_json::Value) -> AppResult<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, api_key
        );

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Model request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Model API error: {status} - {body}"
            )));
        }

        #[derive(Deserialize)]
        struct GenerateResponse {
            #[serde(default)]
            candidates: Vec<Candidate>,
        }

        #[derive(Deserialize)]
        struct Candidate {
            content: CandidateContent,
        }

        #[derive(Deserialize)]
        struct CandidateContent {
            #[serde(default)]
            parts: Vec<Part>,
        }

        #[derive(Deserialize)]
        struct Part {
            #[serde(default)]
            text: String,
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse model response: {e}"))
        })?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::ExternalService(
                "Model response contained no text".to_string(),
            ));
        }

        Ok(text)
    }

    async fn resolve_category(&self, preferred: Option<&str>) -> String {
        if let Some(id) = preferred {
            return id.to_string();
        }
        match self.category_repo.find_first().await {
            Ok(Some(cat)) => cat.id,
            // Seeded default; only reachable against an unseeded store.
            _ => "c7".to_string(),
        }
    }
}

/// Strip markdown code fences the model sometimes wraps JSON in.
fn clean_json(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Description for a 1-based depth level, clamped into range.
fn level_description(level: i32) -> &'static str {
    let idx = level.clamp(1, 10) as usize - 1;
    LEVEL_DESCRIPTIONS[idx]
}

/// Validated question data ready for persistence.
struct ValidatedItem {
    content: String,
    level: i32,
    for_gender: Gender,
    is_18_plus: bool,
}

/// Parse the model's JSON-array payload, tolerating per-item sloppiness.
///
/// Items without content are dropped; a missing level defaults to 1 and a
/// missing gender to the requested bucket's.
fn parse_generated_items(text: &str, bucket_gender: Gender) -> AppResult<Vec<ValidatedItem>> {
    let cleaned = clean_json(text);

    let value: serde_json::Value = serde_json::from_str(&cleaned)
        .map_err(|e| AppError::ExternalService(format!("Model returned invalid JSON: {e}")))?;

    let serde_json::Value::Array(array) = value else {
        return Err(AppError::ExternalService(
            "Model response is not a JSON array".to_string(),
        ));
    };

    let items = array
        .into_iter()
        .filter_map(|entry| {
            let item: GeneratedItem = match serde_json::from_value(entry) {
                Ok(item) => item,
                Err(e) => {
                    tracing::debug!(error = %e, "Dropping malformed generated item");
                    return None;
                }
            };
            if item.content.trim().is_empty() {
                return None;
            }
            Some(ValidatedItem {
                content: item.content,
                level: item.level.map_or(1, |l| l.clamp(1, 10) as i32),
                for_gender: item.for_gender.unwrap_or(bucket_gender),
                is_18_plus: item.is_18_plus.unwrap_or(false),
            })
        })
        .collect();

    Ok(items)
}

/// Build the structured prompt for a deficit bucket.
fn build_bucket_prompt(req: &GenerationRequest) -> String {
    let audience = match req.gender {
        Gender::Both => "COUPLE to answer together".to_string(),
        Gender::Male => "MALE partner to answer".to_string(),
        Gender::Female => "FEMALE partner to answer".to_string(),
    };

    let adult_progression = if req.allow_18_plus {
        "\n18+ INTIMACY PROGRESSION (MANDATORY):\n\
         - Level 1-2: NOT 18+. Keep it light and non-sexual.\n\
         - Level 3-4: Light physical intimacy (kissing, cuddling, touch, physical attraction).\n\
         - Level 5-6: Moderate sexual intimacy (detailed preferences, foreplay).\n\
         - Level 7-8: Intense sexual exploration (kinks, adventurous physical acts).\n\
         - Level 10: EXTREMELY explicit. The most raw sexual truths, deepest fantasies, and no-filter physical questions.\n"
    } else {
        ""
    };

    format!(
        "You are a world-class relationship therapist and connection expert.\n\
         Goal: Generate unique, deep questions for a couple.\n\
         Generate {count} unique questions.\n\
         \n\
         Target Audience: The question is specifically for the {audience}.\n\
         \n\
         Gender Nuance Rules:\n\
         - If MALE: Focus on masculine psychology, logic-based scenarios, hobbies, protective instincts, or communication styles associated with men.\n\
         - If FEMALE: Focus on feminine psychology, emotional nuances, care rituals, self-image, or specific female experiences.\n\
         - If BOTH: Focus on shared experiences and mutual growth.\n\
         \n\
         Scale: 1 (Surface) to 10 (Naked Truth).\n\
         Selected Level: {min_level} ({min_desc}) to {max_level} ({max_desc})\n\
         Category: {category}\n\
         18+ Intimacy Mode: {adult_mode}\n\
         {adult_progression}\n\
         Rules:\n\
         - Return ONLY the question text.\n\
         - BE COMPACT: Keep the question to 1-3 sentences maximum. Get straight to the point.\n\
         - EXCEPTION: 'Case Study' questions can be longer (3-5 sentences) to properly set up the scenario.\n\
         - If adult mode is enabled, the question MUST strictly follow the INTIMACY PROGRESSION listed above for Level maximum {max_level}.\n\
         - If adult mode is disabled, keep it purely emotional or psychological.\n\
         - Level 10 must always be \"shattering\" in its transparency, regardless of adult mode.",
        count = req.count,
        min_level = req.min_level,
        min_desc = level_description(req.min_level),
        max_level = req.max_level,
        max_desc = level_description(req.max_level),
        category = req
            .category_id
            .as_deref()
            .map_or("Varied", |_| "Matching provided ID"),
        adult_mode = if req.allow_18_plus { "ENABLED" } else { "DISABLED" },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_request(gender: Gender, allow_18_plus: bool) -> GenerationRequest {
        GenerationRequest {
            gender,
            count: 3,
            min_level: 1,
            max_level: 5,
            allow_18_plus,
            category_id: None,
            creator_id: "u1".to_string(),
        }
    }

    #[test]
    fn test_clean_json_strips_fences() {
        let fenced = "```json\n[{\"content\":\"hi\"}]\n```";
        assert_eq!(clean_json(fenced), "[{\"content\":\"hi\"}]");

        let bare = "[1, 2]";
        assert_eq!(clean_json(bare), "[1, 2]");
    }

    #[test]
    fn test_parse_generated_items() {
        let text = r#"[
            {"content": "What scares you?", "level": 4, "forGender": "FEMALE", "is18Plus": false},
            {"content": "What drives you?", "level": 99, "forGender": "MALE", "is18Plus": false}
        ]"#;

        let items = parse_generated_items(text, Gender::Both).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].for_gender, Gender::Female);
        // Out-of-range levels are clamped.
        assert_eq!(items[1].level, 10);
    }

    #[test]
    fn test_parse_tolerates_missing_fields() {
        let text = r#"[{"content": "Just a question"}]"#;

        let items = parse_generated_items(text, Gender::Male).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].level, 1);
        assert_eq!(items[0].for_gender, Gender::Male);
        assert!(!items[0].is_18_plus);
    }

    #[test]
    fn test_parse_drops_empty_content() {
        let text = r#"[{"content": "  "}, {"content": "ok"}]"#;

        let items = parse_generated_items(text, Gender::Both).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let text = r#"{"content": "not an array"}"#;

        let result = parse_generated_items(text, Gender::Both);
        assert!(matches!(result, Err(AppError::ExternalService(_))));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let result = parse_generated_items("not json at all", Gender::Both);
        assert!(matches!(result, Err(AppError::ExternalService(_))));
    }

    #[test]
    fn test_prompt_includes_progression_only_in_adult_mode() {
        let adult = build_bucket_prompt(&test_request(Gender::Both, true));
        assert!(adult.contains("INTIMACY PROGRESSION"));
        assert!(adult.contains("18+ Intimacy Mode: ENABLED"));

        let tame = build_bucket_prompt(&test_request(Gender::Both, false));
        assert!(!tame.contains("INTIMACY PROGRESSION (MANDATORY)"));
        assert!(tame.contains("18+ Intimacy Mode: DISABLED"));
    }

    #[test]
    fn test_prompt_names_the_bucket_audience() {
        let prompt = build_bucket_prompt(&test_request(Gender::Female, false));
        assert!(prompt.contains("FEMALE partner to answer"));
    }

    #[test]
    fn test_level_description_clamps() {
        assert_eq!(level_description(1), "Surface");
        assert_eq!(level_description(10), "Naked Truth");
        assert_eq!(level_description(0), "Surface");
        assert_eq!(level_description(42), "Naked Truth");
    }
}
