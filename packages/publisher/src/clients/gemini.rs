//! Gemini-backed implementation of the [`AI`] trait.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::article_from_markdown;
use crate::error::AiError;
use crate::security::SecretString;
use crate::traits::ai::AI;
use crate::types::content::{Anchor, Article, TeamPair};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const ARTICLE_MODEL: &str = "gemini-2.5-pro";
const FAST_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Client for the Generative Language REST API.
///
/// Holds the API key as an explicit injected handle; the heavier model
/// writes articles, the fast one handles extraction and captions.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    article_model: String,
    fast_model: String,
}

impl GeminiClient {
    /// Create a client with the default endpoint and models.
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            article_model: ARTICLE_MODEL.to_string(),
            fast_model: FAST_MODEL.to_string(),
        }
    }

    /// Point at a different endpoint (useful against a stub server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the model pair.
    pub fn with_models(
        mut self,
        article_model: impl Into<String>,
        fast_model: impl Into<String>,
    ) -> Self {
        self.article_model = article_model.into();
        self.fast_model = fast_model.into();
        self
    }

    /// One generateContent round trip, returning the first candidate text.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, AiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(model, prompt_len = prompt.len(), "calling generateContent");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AiError::Http(Box::new(e)))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AiError::Empty);
        }
        Ok(text)
    }
}

#[async_trait]
impl AI for GeminiClient {
    async fn generate_article(&self, source_url: &str, anchor: &Anchor) -> Result<Article, AiError> {
        let prompt = article_prompt(source_url, anchor);
        let raw_md = self.generate(&self.article_model, &prompt).await?;
        Ok(article_from_markdown(&raw_md, anchor))
    }

    async fn extract_teams(&self, source_url: &str) -> Result<TeamPair, AiError> {
        let prompt = teams_prompt(source_url);
        let text = self.generate(&self.fast_model, &prompt).await?;
        parse_team_pair(&text)
    }

    async fn caption(&self, heading: &str, teams: Option<&TeamPair>) -> Result<String, AiError> {
        let prompt = caption_prompt(heading, teams);
        let text = self.generate(&self.fast_model, &prompt).await?;
        Ok(clean_caption(&text))
    }
}

fn article_prompt(source_url: &str, anchor: &Anchor) -> String {
    format!(
        "You are an expert writer of SEO match-preview articles. Read the \
         analysis at {source_url} and write a 700-800 word blog post based \
         strictly on that material.\n\n\
         You MUST place one internal HTML link with anchor text \
         \"{text}\" pointing at {url} somewhere in the middle of the body \
         (never the first or last paragraph, never repeated). Example: \
         <a href=\"{url}\">{text}</a>\n\n\
         Formatting rules:\n\
         1. Strict markdown: one `# ` H1 title, `## ` section headings, \
         `### ` for small subsections, bold with `**text**`, markdown \
         tables where useful.\n\
         2. No code blocks and no stray `*` or `#` characters.\n\
         3. Return only the article, no preamble and no closing note.",
        text = anchor.text,
        url = anchor.url,
    )
}

fn teams_prompt(source_url: &str) -> String {
    format!(
        "You analyse football match articles. Read {source_url} and return \
         ONLY the two competing team names, standard English spelling, one \
         per line, no \"vs\", no numbering, no extra words:\n\n\
         Team 1:\nTeam 2:"
    )
}

fn caption_prompt(heading: &str, teams: Option<&TeamPair>) -> String {
    let context = match teams {
        Some(pair) => format!(" The match is {} vs {}.", pair.home, pair.away),
        None => String::new(),
    };
    format!(
        "Rewrite the heading \"{heading}\" as one short descriptive sentence \
         suitable as an image caption for a match-preview article.{context} \
         Return exactly one sentence, no numbering, no quotes, and do not \
         repeat the heading verbatim."
    )
}

/// Parse the two-line team answer, tolerating the label prefixes the
/// model sometimes echoes back.
fn parse_team_pair(text: &str) -> Result<TeamPair, AiError> {
    let mut labels = text
        .lines()
        .map(|l| {
            l.trim()
                .trim_start_matches("Team 1:")
                .trim_start_matches("Team 2:")
                .trim()
        })
        .filter(|l| !l.is_empty());

    match (labels.next(), labels.next()) {
        (Some(home), Some(away)) => Ok(TeamPair::new(home, away)),
        _ => Err(AiError::Malformed {
            reason: format!("expected two team names, got: {text:?}"),
        }),
    }
}

/// Strip list numbering and keep only the first line of a caption.
fn clean_caption(text: &str) -> String {
    let lead = Regex::new(r"^[-\d.\s]+").unwrap();
    let first_line = text.lines().next().unwrap_or_default();
    lead.replace(first_line.trim(), "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_team_pair_plain() {
        let pair = parse_team_pair("Arsenal\nChelsea").unwrap();
        assert_eq!(pair, TeamPair::new("Arsenal", "Chelsea"));
    }

    #[test]
    fn test_parse_team_pair_with_labels() {
        let pair = parse_team_pair("Team 1: Real Madrid\nTeam 2: Barcelona\n").unwrap();
        assert_eq!(pair, TeamPair::new("Real Madrid", "Barcelona"));
        assert!(pair.is_complete());
    }

    #[test]
    fn test_parse_team_pair_one_line_is_malformed() {
        let err = parse_team_pair("Arsenal").unwrap_err();
        assert!(matches!(err, AiError::Malformed { .. }));
    }

    #[test]
    fn test_clean_caption() {
        assert_eq!(
            clean_caption("1. A tight derby awaits both sides.\nExtra line."),
            "A tight derby awaits both sides."
        );
        assert_eq!(clean_caption("- Short caption"), "Short caption");
    }
}
