/*!
 * Integration tests for the analysis pipeline with mock collaborators
 */

use anyhow::Result;

use subsense::analysis::AnalysisService;
use subsense::app_config::Config;
use subsense::app_controller::{analyze_cues, Controller};
use subsense::providers::mock::MockProvider;
use subsense::providers::openrouter::ChatRequest;
use subsense::subtitle_processor::parse;
use crate::common::{self, mock_slang::MockSlang};

fn slang_response(request: &ChatRequest) -> String {
    MockProvider::analysis_json(&MockProvider::quoted_sentence(request), &["gonna"])
}

fn mock_service(provider: MockProvider, slang: Option<MockSlang>, config: &Config) -> AnalysisService<MockProvider, MockSlang> {
    AnalysisService::new(provider, slang, config.analysis.clone())
}

#[tokio::test]
async fn test_analyzeWith_forWholeFile_shouldAnalyseEveryCardInOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;
    let controller = Controller::new_for_test()?;
    let service = mock_service(MockProvider::working(), None, controller.config());

    let analyzed = controller.analyze_with(&service, &path, None, Some("Show")).await?;

    assert_eq!(analyzed.len(), 3);
    for item in &analyzed {
        let analysis = item.analysis.as_ref().expect("analysis present");
        assert_eq!(analysis.text, item.card.text);
        assert!(item.error.is_none());
    }
    assert_eq!(service.provider().request_count(), 3);
    Ok(())
}

#[tokio::test]
async fn test_analyzeWith_forSingleIndex_shouldAnalyseOneCard() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;
    let controller = Controller::new_for_test()?;
    let slang = MockSlang::new().with_definition("gonna", "going to");
    let service = mock_service(
        MockProvider::working().with_custom_response(slang_response),
        Some(slang),
        controller.config(),
    );

    let analyzed = controller.analyze_with(&service, &path, Some(1), None).await?;

    assert_eq!(analyzed.len(), 1);
    assert_eq!(analyzed[0].card.id, 2);
    let analysis = analyzed[0].analysis.as_ref().expect("analysis present");
    assert_eq!(analysis.text, "I'm fine.");
    assert_eq!(analysis.slang.len(), 1);
    assert_eq!(analysis.slang[0].permalink, "https://urbandictionary.com/define.php?term=gonna");
    Ok(())
}

#[tokio::test]
async fn test_analyzeWith_withIndexOutOfRange_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;
    let controller = Controller::new_for_test()?;
    let service = mock_service(MockProvider::working(), None, controller.config());

    let result = controller.analyze_with(&service, &path, Some(3), None).await;

    assert!(result.is_err());
    assert_eq!(service.provider().request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_analyzeCues_withFailingProvider_shouldRecordErrorsPerCard() -> Result<()> {
    let config = Config::default();
    let cues = parse(common::SAMPLE_SRT, "sample.srt")?;
    let service = mock_service(MockProvider::failing(), None, &config);

    let analyzed = analyze_cues(&service, cues, &config, None, None).await?;

    assert_eq!(analyzed.len(), 3);
    assert!(analyzed.iter().all(|item| item.analysis.is_none()));
    assert!(analyzed.iter().all(|item| item.error.as_deref().is_some_and(|e| e.contains("500"))));
    Ok(())
}

#[tokio::test]
async fn test_analyzedSentence_serialization_shouldOmitMissingParts() -> Result<()> {
    let config = Config::default();
    let cues = parse("One sentence.", "line.txt")?;
    let service = mock_service(MockProvider::working(), None, &config);

    let analyzed = analyze_cues(&service, cues, &config, Some(0), None).await?;
    let json = serde_json::to_value(&analyzed[0])?;

    assert_eq!(json["card"]["text"], "One sentence.");
    assert_eq!(json["analysis"]["cefr"], "B1");
    assert!(json.get("error").is_none());
    Ok(())
}
