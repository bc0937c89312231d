use crate::config::{Settings, VoiceConfig};
use crate::finder::{Finder, InstructionsView};
use crate::matcher::{ScoredRecipe, SearchOutcome};
use crate::recipe::{normalize, Loader, RecipeSource, Vocabulary};
use crate::utils::sanitize::truncate;
use crate::voice::{Recognizer, Speaker, Utterance};
use crate::{Error, Result};
use tracing::warn;

const EMPTY_QUERY_MESSAGE: &str = "Please enter ingredients";
const NO_RESULTS_MESSAGE: &str = "No recipes found";

/// Search and print the ranking
pub async fn search(finder: &Finder, query: &str) -> Result<()> {
    let outcome = finder.search(query).await;
    print!("{}", format_outcome(&outcome));
    Ok(())
}

/// Print suggestions for the token before the cursor
pub fn suggest(finder: &Finder, text: &str, cursor: Option<usize>) -> Result<()> {
    let cursor = cursor.unwrap_or_else(|| text.chars().count());
    let suggestions = finder.suggest(text, cursor);

    if suggestions.suggestions.is_empty() {
        println!("No suggestions");
        return Ok(());
    }

    for suggestion in &suggestions.suggestions {
        println!("{suggestion}");
    }

    let completion = finder.commit(text, cursor, &suggestions.suggestions[0]);
    println!("\nFirst suggestion gives: {}", completion.text);
    Ok(())
}

/// Search, then print (and optionally speak) the instructions of result `number`
pub async fn instructions(
    finder: &Finder,
    speaker: &Speaker,
    voice: &VoiceConfig,
    query: &str,
    number: usize,
    speak: bool,
) -> Result<()> {
    let outcome = finder.search(query).await;
    if outcome.is_empty_query() {
        return Err(Error::Validation(EMPTY_QUERY_MESSAGE.to_string()));
    }

    let index = number
        .checked_sub(1)
        .ok_or_else(|| Error::Validation("Result numbers start at 1".to_string()))?;
    let instructions = finder.instructions(index).await.ok_or_else(|| {
        Error::NotFound(format!(
            "Result {number} (search returned {} results)",
            outcome.results().len()
        ))
    })?;

    println!("{}\n", instructions.title);
    match &instructions.view {
        InstructionsView::Steps(steps) => {
            for (i, step) in steps.iter().enumerate() {
                println!("{:>3}. {}", i + 1, step);
            }
        }
        InstructionsView::Text(text) => println!("{text}"),
    }

    if speak {
        let utterance = Utterance::new(instructions.speech, voice);
        match speaker.speak(&utterance).await {
            Ok(()) => speaker.wait().await,
            Err(e) if e.is_voice_unsupported() => println!("\n{e}"),
            Err(e) => warn!("Speech output failed: {}", e.log_safe()),
        }
    }

    Ok(())
}

/// Capture a transcript and search for it
pub async fn listen(finder: &Finder, recognizer: &Recognizer) -> Result<()> {
    let transcript = recognizer.listen().await?;
    println!("Heard: {transcript}\n");
    search(finder, &transcript).await
}

/// Load a source strictly (errors are reported, not swallowed) and summarize it
pub async fn validate(settings: &Settings, location: Option<String>) -> Result<()> {
    let location = location.unwrap_or_else(|| settings.source.location.clone());
    let source = RecipeSource::parse(&location)?;
    let loader = Loader::new(&settings.source)?;

    let raw = match loader.load(&source).await {
        Ok(raw) => raw,
        Err(e) => {
            println!("\x1b[31m\u{2717}\x1b[0m Invalid recipe source: {}", e);
            return Err(e);
        }
    };

    let mut vocabulary = Vocabulary::new();
    let recipes: Vec<_> = raw
        .records
        .iter()
        .map(|record| normalize(record, &mut vocabulary))
        .collect();

    let untitled = recipes
        .iter()
        .filter(|r| r.title == crate::recipe::normalize::UNTITLED)
        .count();
    let without_ingredients = recipes.iter().filter(|r| r.ingredients.is_empty()).count();
    let without_instructions = recipes
        .iter()
        .filter(|r| r.instructions.trim().is_empty())
        .count();

    println!("\x1b[32m\u{2713}\x1b[0m Valid recipe source: {}", source);
    println!("  Recipes: {}", recipes.len());
    println!("  Known ingredients: {}", vocabulary.len());
    println!("  Untitled: {untitled}");
    println!("  Without ingredients: {without_ingredients}");
    println!("  Without instructions: {without_instructions}");

    Ok(())
}

fn format_outcome(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::EmptyQuery => format!("{EMPTY_QUERY_MESSAGE}\n"),
        SearchOutcome::Ranked(results) if results.is_empty() => {
            format!("{NO_RESULTS_MESSAGE}\n")
        }
        SearchOutcome::Ranked(results) => format_results(results),
    }
}

fn format_results(results: &[ScoredRecipe]) -> String {
    let mut out = format!("\nFound {} recipes:\n\n", results.len());
    out.push_str(&format!(
        "{:<4} {:>5} {:<40} {:<30}\n",
        "#", "Match", "Title", "Matched"
    ));
    out.push_str(&format!("{}\n", "-".repeat(82)));

    for (i, scored) in results.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:>4}% {:<40} {:<30}\n",
            i + 1,
            scored.percent(),
            truncate(&scored.recipe.title, 38),
            truncate(&scored.matched.join(", "), 30)
        ));
    }

    out.push_str("\nTo see instructions: pantry instructions <QUERY> <#>\n");
    out
}
