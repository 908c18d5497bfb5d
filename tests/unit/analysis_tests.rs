/*!
 * Tests for the analysis service with mock collaborators
 */

use std::sync::{Arc, Mutex};

use subsense::analysis::{build_user_prompt, AnalysisService};
use subsense::app_config::AnalysisConfig;
use subsense::errors::AnalysisError;
use subsense::providers::mock::MockProvider;
use subsense::providers::openrouter::ChatRequest;
use subsense::sentences::{normalize_to_sentences, NormalizeOptions, SentenceContext};
use crate::common::{cues, mock_slang::MockSlang};

fn service(provider: MockProvider, slang: Option<MockSlang>) -> AnalysisService<MockProvider, MockSlang> {
    AnalysisService::new(provider, slang, AnalysisConfig::default())
}

fn slang_response(request: &ChatRequest) -> String {
    MockProvider::analysis_json(&MockProvider::quoted_sentence(request), &["gonna", "broken", "yeet", " "])
}

#[tokio::test]
async fn test_createTranslationGuide_withWorkingProvider_shouldReturnAnalysis() {
    let service = service(MockProvider::working(), None);
    let context = SentenceContext::new("I like tea.", "Hello.", "Me too.");

    let result = service.create_translation_guide(&context, Some("Friends")).await.unwrap();

    assert_eq!(result.text, "I like tea.");
    assert_eq!(result.cefr, "B1");
    assert_eq!(result.features.len(), 1);
    assert_eq!(result.translations.len(), 2);
    assert_eq!(result.translations[0].style, "natural");
    assert!(result.slang.is_empty());
}

#[tokio::test]
async fn test_createTranslationGuide_withBlankText_shouldSkipProvider() {
    let service = service(MockProvider::working(), None);
    let context = SentenceContext::new("   ", "prev", "next");

    let result = service.create_translation_guide(&context, None).await.unwrap();

    assert_eq!(result.cefr, "A1");
    assert!(result.text.is_empty());
    assert!(result.translations.is_empty());
    assert_eq!(service.provider().request_count(), 0);
    assert!(service.cache().is_empty());
}

#[tokio::test]
async fn test_createTranslationGuide_withRepeatedContext_shouldUseCache() {
    let service = service(MockProvider::working(), None);
    let context = SentenceContext::new("Same sentence.", "Before.", "After.");
    let padded = SentenceContext::new("  Same sentence. ", "Before.", " After.");

    let first = service.create_translation_guide(&context, None).await.unwrap();
    let second = service.create_translation_guide(&padded, None).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(service.provider().request_count(), 1);
    let (hits, misses, _) = service.cache().stats();
    assert_eq!((hits, misses), (1, 1));

    let other_context = SentenceContext::new("Same sentence.", "Different.", "After.");
    service.create_translation_guide(&other_context, None).await.unwrap();
    assert_eq!(service.provider().request_count(), 2);
}

#[tokio::test]
async fn test_createTranslationGuide_withCacheDisabled_shouldCallProviderEveryTime() {
    let config = AnalysisConfig { cache_enabled: false, ..AnalysisConfig::default() };
    let service: AnalysisService<MockProvider, MockSlang> = AnalysisService::new(MockProvider::working(), None, config);
    let context = SentenceContext::new("Again.", "", "");

    service.create_translation_guide(&context, None).await.unwrap();
    service.create_translation_guide(&context, None).await.unwrap();

    assert_eq!(service.provider().request_count(), 2);
    assert!(!service.cache().is_enabled());
}

#[tokio::test]
async fn test_createTranslationGuide_withSlangTerms_shouldSkipFailedLookups() {
    let slang = MockSlang::new()
        .with_definition("gonna", "going to")
        .with_definition("yeet", "to throw")
        .with_failure("broken");
    let service = service(MockProvider::working().with_custom_response(slang_response), Some(slang.clone()));
    let context = SentenceContext::new("I'm gonna yeet it.", "", "");

    let result = service.create_translation_guide(&context, None).await.unwrap();

    let terms: Vec<&str> = result.slang.iter().map(|card| card.term.as_str()).collect();
    assert_eq!(terms, vec!["gonna", "yeet"]);
    assert_eq!(result.slang[0].definition, "going to");
    assert_eq!(slang.calls(), 3);
}

#[tokio::test]
async fn test_createTranslationGuide_withSlangDisabled_shouldReturnNoSlangCards() {
    let service = service(MockProvider::working().with_custom_response(slang_response), None);
    let context = SentenceContext::new("I'm gonna go.", "", "");

    let result = service.create_translation_guide(&context, None).await.unwrap();
    assert!(result.slang.is_empty());
}

#[tokio::test]
async fn test_createTranslationGuide_withWrappedJson_shouldParse() {
    let service = service(MockProvider::wrapped(), None);
    let context = SentenceContext::new("Wrapped answer.", "", "");

    let result = service.create_translation_guide(&context, None).await.unwrap();
    assert_eq!(result.text, "Wrapped answer.");
}

#[tokio::test]
async fn test_createTranslationGuide_withBadAnswers_shouldFailWithoutCaching() {
    let context = SentenceContext::new("Fails.", "", "");

    let malformed = service(MockProvider::malformed(), None);
    let result = malformed.create_translation_guide(&context, None).await;
    assert!(matches!(result, Err(AnalysisError::InvalidResponse(_))));
    assert!(malformed.cache().is_empty());

    let empty = service(MockProvider::empty(), None);
    let result = empty.create_translation_guide(&context, None).await;
    assert!(matches!(result, Err(AnalysisError::InvalidResponse(_))));

    let failing = service(MockProvider::failing(), None);
    let result = failing.create_translation_guide(&context, None).await;
    assert!(matches!(result, Err(AnalysisError::Provider(_))));
}

#[tokio::test]
async fn test_analyzeCards_withSlowProvider_shouldKeepCardOrder() {
    let cards = normalize_to_sentences(
        &cues(&["One. Two.", "Three. Four.", "Five. Six."]),
        &NormalizeOptions::default(),
    );
    let service = service(MockProvider::slow(5), None);
    let progress = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&progress);

    let results = service
        .analyze_cards(&cards, None, move |done, total| recorder.lock().unwrap().push((done, total)))
        .await;

    let texts: Vec<String> = results.into_iter().map(|r| r.unwrap().text).collect();
    assert_eq!(texts, vec!["One.", "Two.", "Three.", "Four.", "Five.", "Six."]);

    let progress = progress.lock().unwrap();
    assert_eq!(progress.len(), 6);
    assert_eq!(progress.last(), Some(&(6, 6)));
}

#[tokio::test]
async fn test_analyzeCards_withIntermittentProvider_shouldReportFailuresPerCard() {
    let cards = normalize_to_sentences(&cues(&["A one. A two. A three. A four. A five. A six."]), &NormalizeOptions::default());
    let service = service(MockProvider::intermittent(3), None);

    let results = service.analyze_cards(&cards, Some("Show"), |_, _| {}).await;

    assert_eq!(results.len(), 6);
    assert_eq!(results.iter().filter(|r| r.is_err()).count(), 2);
    for (card, result) in cards.iter().zip(&results) {
        if let Ok(analysis) = result {
            assert_eq!(analysis.text, card.text);
        }
    }
}

#[test]
fn test_buildUserPrompt_shouldIncludeContextAndSeries() {
    let context = SentenceContext::new("Now.", "Before.", "After.");
    let prompt = build_user_prompt(&context, Some(" Lost "));

    assert!(prompt.contains("\"Now.\""));
    assert!(prompt.contains("Before."));
    assert!(prompt.contains("After."));
    assert!(prompt.contains("(from the series \"Lost\")"));
    assert!(!build_user_prompt(&context, Some("  ")).contains("series"));
}
