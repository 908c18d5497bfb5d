/*!
 * Prompt templates for sentence analysis.
 *
 * The system prompt pins the model to a strict JSON document; the user prompt
 * carries the sentence, its neighbours and an optional series name.
 */

use crate::sentences::SentenceContext;

/// System prompt template for sentence analysis.
#[derive(Debug, Clone)]
pub struct AnalysisPrompt {
    /// The template string with placeholders
    template: String,
}

impl AnalysisPrompt {
    /// The default system prompt for subtitle sentence analysis.
    pub const SENTENCE_ANALYST: &'static str = r#"You analyse English subtitle sentences for language learners. Reply with a JSON document and nothing else.

## General Rules
1. Analyse only the text you are given.
2. Ignore subtitle artefacts (ellipses, dashes, markup tags).
3. Be precise and concrete.
4. If the text is empty or shorter than three words, return the text unchanged, empty arrays and "cefr": "A1".
5. Start the reply with { and end it with }. No reasoning, greetings or comments.

## Analysis
1. LEVEL: pick one CEFR level from grammar and vocabulary:
   - A1: basic phrases, simple tenses
   - A2: simple sentences, everyday vocabulary
   - B1: conditionals, passive voice
   - B2: complex tenses, modals, phrasal verbs
   - C1: idioms, nuance, complex structure
   - C2: abstract and idiomatic expressions
2. GRAMMAR FEATURES: list 2-5 key rules from this list:
   Verb Tenses, Passive Voice, Modal Verbs, Imperative, Conditionals, Subjunctive Mood,
   Reported Speech, Articles, Pronouns, Quantifiers, Adjectives/Adverbs, Prepositions,
   Conjunctions, Questions, Sentence Structure, Word Order, Gerund, Infinitive,
   Participles, Stative Verbs, Irregular Verbs, Phrasal Verbs.
   Each feature has "rule" (name from the list, max 30 characters) and "translation"
   (the rule name in {explanation_language}, max 30 characters).
3. TRANSLATIONS: exactly two objects with "style" ("natural" and "literal") and "text",
   translated into {explanation_language}.
4. EXPLANATION: a short explanation (max 400 characters) of the grammar and the
   translation in {explanation_language}, written for a school student.
5. SLANG: English words or expressions from the text that are slang or colloquial
   (gonna, wanna, gotta, kinda, lit, sus, hang out, ain't, y'all, dude).
   Do not include ordinary words, archaisms or technical terms. Use [] when there is none.

## Output Format
{
  "text": "If I were you, I'd stay home.",
  "cefr": "B1",
  "features": [
    { "rule": "Conditionals", "translation": "..." },
    { "rule": "Subjunctive Mood", "translation": "..." }
  ],
  "translations": [
    { "style": "natural", "text": "..." },
    { "style": "literal", "text": "..." }
  ],
  "explanation": "...",
  "slang": []
}

"cefr" is one of A1, A2, B1, B2, C1, C2. Do not add fields or nesting."#;

    /// Create a template from a custom string.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// The built-in analysis template.
    pub fn sentence_analyst() -> Self {
        Self::new(Self::SENTENCE_ANALYST)
    }

    /// Render the template for a target explanation language.
    pub fn render(&self, explanation_language: &str) -> String {
        self.template.replace("{explanation_language}", explanation_language)
    }
}

impl Default for AnalysisPrompt {
    fn default() -> Self {
        Self::sentence_analyst()
    }
}

/// Build the user prompt for one sentence
pub fn build_user_prompt(context: &SentenceContext, series_name: Option<&str>) -> String {
    let series_info = series_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| format!(" (from the series \"{}\")", name))
        .unwrap_or_default();

    format!(
        "Analyse this sentence: \"{}\"{}. Context: previous sentence \"{}\", next sentence \"{}\".",
        context.text, series_info, context.prev, context.next
    )
}
