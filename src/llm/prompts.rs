use super::{CompletionRequest, Result, TextGenerator};
use tracing::{debug, warn};

pub const ANALYSIS_FALLBACK: &str = "Unable to analyze symptoms at this time.";

/// Common supplement names and misspellings, checked before asking the model.
static DIRECT_SEARCH_MATCHES: &[(&str, &[&str])] = &[
    ("zink", &["zinc"]),
    ("zinc", &["zinc"]),
    ("vitamin c", &["vitamin c"]),
    ("iron", &["iron"]),
    ("calcium", &["calcium"]),
    ("magnesium", &["magnesium"]),
    ("omega", &["omega-3"]),
    ("omega-3", &["omega-3"]),
    ("omega 3", &["omega-3"]),
    ("probiotic", &["probiotics"]),
    ("probiotics", &["probiotics"]),
    ("collagen", &["collagen"]),
    ("turmeric", &["turmeric"]),
    ("melatonin", &["melatonin"]),
    ("glucosamine", &["joint pain", "arthritis"]),
];

/// Short, non-diagnostic explanation of the user's symptoms.
pub async fn get_ai_analysis(generator: &dyn TextGenerator, symptoms: &str) -> Result<String> {
    let prompt = format!(
        r#"You are a medical assistant (NOT a doctor) helping users understand their symptoms and suggesting wellness products.

User symptoms: "{symptoms}"

Provide a brief, helpful analysis that:
1. Acknowledges their symptoms with empathy
2. Explains what these symptoms are often linked to
3. Uses language like "often linked to", "may help with", "commonly used for"
4. Stays under 100 words
5. Does NOT diagnose diseases

Always end with: "This is not medical advice. Consult a healthcare professional for proper diagnosis.""#
    );

    let request = CompletionRequest::new(
        "You are a helpful medical assistant. Provide supportive, non-diagnostic health information.",
        prompt,
    )
    .temperature(0.7)
    .max_tokens(200);

    let reply = generator.complete(&request).await?;
    if reply.trim().is_empty() {
        return Ok(ANALYSIS_FALLBACK.to_string());
    }
    Ok(reply)
}

/// Health keywords for the symptom table. Never fails: errors yield no keywords.
pub async fn extract_keywords(generator: &dyn TextGenerator, symptoms: &str) -> Vec<String> {
    let prompt = format!(
        r#"Extract health-related keywords from: "{symptoms}"

Return only comma-separated keywords (3-5 max) that match health conditions, symptoms, or body parts.
Examples: tired → fatigue, energy, weak
joint pain → joint, pain, arthritis
hair loss → hair, weak, nutrition

Keywords:"#
    );

    let request = CompletionRequest::new(
        "Extract health keywords only. Return comma-separated list.",
        prompt,
    )
    .temperature(0.3)
    .max_tokens(50);

    match generator.complete(&request).await {
        Ok(reply) => parse_keyword_list(&reply),
        Err(e) => {
            warn!(error = %e, "Keyword extraction failed");
            Vec::new()
        }
    }
}

/// Keywords for AI product search. Direct matches short-circuit the model call.
pub async fn extract_search_keywords(generator: &dyn TextGenerator, query: &str) -> Vec<String> {
    let direct = direct_search_matches(query);
    if !direct.is_empty() {
        debug!(?direct, "Direct search matches found");
        return direct;
    }

    let prompt = format!(
        r#"Extract health supplement keywords from: "{query}"

Common supplements and their keywords:
- Zinc/Zink → zinc, immune, minerals
- Vitamin C → vitamin c, immune, antioxidant
- Iron → iron, anemia, energy, blood
- Calcium → calcium, bone health, bones
- Magnesium → magnesium, muscle, sleep
- Omega-3 → omega-3, heart health, brain
- Probiotics → probiotics, digestive health, gut
- Collagen → collagen, skin health, anti-aging

Return only relevant keywords (max 3) that match actual supplement names or health benefits.
Keywords:"#
    );

    let request = CompletionRequest::new(
        "Extract supplement keywords only. Return comma-separated list.",
        prompt,
    )
    .temperature(0.1)
    .max_tokens(50);

    match generator.complete(&request).await {
        Ok(reply) => {
            let keywords = parse_keyword_list(&reply);
            debug!(?keywords, "Extracted search keywords");
            keywords
        }
        Err(e) => {
            warn!(error = %e, "Search keyword extraction failed");
            Vec::new()
        }
    }
}

/// First direct-match key contained in the query, mapped to its keywords.
pub fn direct_search_matches(query: &str) -> Vec<String> {
    let query = query.trim().to_lowercase();
    DIRECT_SEARCH_MATCHES
        .iter()
        .find(|(key, _)| query.contains(key))
        .map(|(_, values)| values.iter().map(|v| v.to_string()).collect())
        .unwrap_or_default()
}

/// Split a comma-separated model reply into lowercase keywords.
pub fn parse_keyword_list(reply: &str) -> Vec<String> {
    reply
        .split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Scripted {
        reply: Option<String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl Scripted {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply
                .clone()
                .ok_or_else(|| LlmError::Decode("scripted failure".to_string()))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    #[test]
    fn keyword_list_is_trimmed_and_lowercased() {
        assert_eq!(
            parse_keyword_list(" Fatigue, ENERGY ,, weak "),
            vec!["fatigue", "energy", "weak"]
        );
        assert!(parse_keyword_list("  ").is_empty());
    }

    #[test]
    fn direct_matches_use_first_hit() {
        assert_eq!(direct_search_matches("Zink tablets"), vec!["zinc"]);
        assert_eq!(direct_search_matches("omega 3 oil"), vec!["omega-3"]);
        assert_eq!(
            direct_search_matches("glucosamine"),
            vec!["joint pain", "arthritis"]
        );
        assert!(direct_search_matches("something for my knees").is_empty());
    }

    #[tokio::test]
    async fn failed_extraction_yields_no_keywords() {
        let generator = Scripted::failing();
        assert!(extract_keywords(&generator, "tired").await.is_empty());
    }

    #[tokio::test]
    async fn extraction_uses_low_temperature() {
        let generator = Scripted::ok("tired, energy");
        let keywords = extract_keywords(&generator, "I'm always tired").await;

        assert_eq!(keywords, vec!["tired", "energy"]);
        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen[0].temperature, 0.3);
        assert_eq!(seen[0].max_tokens, 50);
        assert!(seen[0].messages[1].content.contains("I'm always tired"));
    }

    #[tokio::test]
    async fn empty_analysis_falls_back() {
        let generator = Scripted::ok("   ");
        let analysis = get_ai_analysis(&generator, "headache").await.unwrap();
        assert_eq!(analysis, ANALYSIS_FALLBACK);
    }

    #[tokio::test]
    async fn analysis_errors_propagate() {
        let generator = Scripted::failing();
        assert!(get_ai_analysis(&generator, "headache").await.is_err());
    }

    #[tokio::test]
    async fn direct_search_skips_the_model() {
        let generator = Scripted::ok("unused");
        let keywords = extract_search_keywords(&generator, "best zinc").await;

        assert_eq!(keywords, vec!["zinc"]);
        assert_eq!(generator.calls(), 0);
    }
}
