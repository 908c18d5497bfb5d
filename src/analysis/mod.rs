/*!
 * AI analysis of sentence cards.
 *
 * Each sentence is sent to the language model together with its neighbours.
 * The model answers with a CEFR level, grammar features, two translations, an
 * explanation and a list of slang terms; the terms are then resolved into
 * dictionary cards.
 *
 * - `prompts`: system and user prompt construction
 * - `response`: JSON extraction from free-form model output
 * - `cache`: per-sentence result cache
 */

pub mod cache;
pub mod prompts;
pub mod response;

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app_config::AnalysisConfig;
use crate::errors::AnalysisError;
use crate::providers::openrouter::{ChatMessage, ChatRequest, ChatResponse};
use crate::providers::Provider;
use crate::sentences::{SentenceCard, SentenceContext};
use crate::slang::{SlangCard, SlangLookup};

pub use cache::AnalysisCache;
pub use prompts::{build_user_prompt, AnalysisPrompt};
pub use response::{extract_json, parse_structured_response};

/// A grammar rule found in the sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarFeature {
    /// Rule name in English
    pub rule: String,
    /// Rule name in the explanation language
    #[serde(default, alias = "russian")]
    pub translation: String,
}

/// One translation of the sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationVariant {
    /// "natural" or "literal"
    pub style: String,
    pub text: String,
}

/// The document returned by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiAnalysis {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_cefr")]
    pub cefr: String,
    #[serde(default)]
    pub features: Vec<GrammarFeature>,
    #[serde(default)]
    pub translations: Vec<TranslationVariant>,
    #[serde(default)]
    pub explanation: String,
    /// Plain slang terms, resolved later into cards
    #[serde(default)]
    pub slang: Vec<String>,
}

/// Analysis with slang terms resolved into dictionary cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub text: String,
    pub cefr: String,
    pub features: Vec<GrammarFeature>,
    pub translations: Vec<TranslationVariant>,
    pub explanation: String,
    pub slang: Vec<SlangCard>,
}

impl AnalysisResult {
    /// The result returned for blank input
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            cefr: default_cefr(),
            features: Vec::new(),
            translations: Vec::new(),
            explanation: String::new(),
            slang: Vec::new(),
        }
    }

    fn from_analysis(analysis: AiAnalysis, slang: Vec<SlangCard>) -> Self {
        Self {
            text: analysis.text,
            cefr: analysis.cefr,
            features: analysis.features,
            translations: analysis.translations,
            explanation: analysis.explanation,
            slang,
        }
    }
}

fn default_cefr() -> String {
    "A1".to_string()
}

/// Sentence analysis backed by a chat provider and an optional slang dictionary
#[derive(Debug)]
pub struct AnalysisService<P, S>
where
    P: Provider<Request = ChatRequest, Response = ChatResponse>,
    S: SlangLookup,
{
    provider: P,
    slang: Option<S>,
    cache: AnalysisCache,
    config: AnalysisConfig,
    system_prompt: String,
}

impl<P, S> AnalysisService<P, S>
where
    P: Provider<Request = ChatRequest, Response = ChatResponse>,
    S: SlangLookup,
{
    /// Create a service; `slang` is `None` when enrichment is disabled
    pub fn new(provider: P, slang: Option<S>, config: AnalysisConfig) -> Self {
        let system_prompt = AnalysisPrompt::sentence_analyst().render(&config.explanation_language);
        Self {
            provider,
            slang,
            cache: AnalysisCache::new(config.cache_enabled),
            config,
            system_prompt,
        }
    }

    /// The result cache
    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    /// The underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn build_request(&self, context: &SentenceContext, series_name: Option<&str>) -> ChatRequest {
        ChatRequest::new(self.config.model.clone())
            .add_message(ChatMessage::system(self.system_prompt.clone()))
            .add_message(ChatMessage::user(build_user_prompt(context, series_name)))
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
    }

    /// Ask the model about one sentence, without cache or slang resolution
    pub async fn analyze_sentence(
        &self,
        context: &SentenceContext,
        series_name: Option<&str>,
    ) -> Result<AiAnalysis, AnalysisError> {
        let request = self.build_request(context, series_name);
        let response = self.provider.complete(request).await?;
        let content = P::extract_text(&response);
        parse_structured_response(&content)
    }

    /// Resolve slang terms into cards; failed lookups are logged and skipped
    pub async fn enrich_slang(&self, terms: &[String]) -> Vec<SlangCard> {
        let Some(slang) = &self.slang else {
            return Vec::new();
        };

        let mut cards = Vec::new();
        for term in terms.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            match slang.lookup(term).await {
                Ok(found) => cards.extend(found),
                Err(e) => warn!("Failed to look up slang '{}': {}", term, e),
            }
        }
        cards
    }

    /// Full analysis of one sentence, served from the cache when possible
    pub async fn create_translation_guide(
        &self,
        context: &SentenceContext,
        series_name: Option<&str>,
    ) -> Result<AnalysisResult, AnalysisError> {
        if context.text.trim().is_empty() {
            return Ok(AnalysisResult::empty());
        }

        if let Some(cached) = self.cache.get(context) {
            return Ok(cached);
        }

        let analysis = self.analyze_sentence(context, series_name).await?;
        let slang = self.enrich_slang(&analysis.slang).await;
        let result = AnalysisResult::from_analysis(analysis, slang);

        self.cache.store(context, &result);
        Ok(result)
    }

    /// Analyse every card with bounded concurrency; results keep card order
    pub async fn analyze_cards(
        &self,
        cards: &[SentenceCard],
        series_name: Option<&str>,
        progress_callback: impl Fn(usize, usize),
    ) -> Vec<Result<AnalysisResult, AnalysisError>> {
        let total = cards.len();
        let concurrency = self.config.concurrent_requests.max(1);
        info!("Analysing {} sentences ({} concurrent requests)", total, concurrency);

        let mut results: Vec<(usize, Result<AnalysisResult, AnalysisError>)> = stream::iter(0..total)
            .map(|index| async move {
                let context = SentenceContext::from_cards(cards, index).unwrap_or_default();
                (index, self.create_translation_guide(&context, series_name).await)
            })
            .buffer_unordered(concurrency)
            .enumerate()
            .map(|(done, item)| {
                progress_callback(done + 1, total);
                item
            })
            .collect()
            .await;

        results.sort_by_key(|(index, _)| *index);

        let (hits, misses, rate) = self.cache.stats();
        debug!("Analysis cache: {} hits, {} misses ({:.0}% hit rate)", hits, misses, rate * 100.0);

        results.into_iter().map(|(_, result)| result).collect()
    }
}
