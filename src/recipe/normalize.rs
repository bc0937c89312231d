use super::raw::{Field, RawRecipe};
use super::vocabulary::Vocabulary;
use super::Recipe;

pub const UNTITLED: &str = "Untitled";
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x300?text=No+Image";

/// Build the canonical recipe for a raw record and record its ingredients in
/// the vocabulary. Missing or malformed fields fall back to defaults.
pub fn normalize(raw: &RawRecipe, vocabulary: &mut Vocabulary) -> Recipe {
    let steps = resolve_steps(&raw.steps, &raw.instructions);
    let instructions = resolve_instructions(&steps, &raw.instructions);
    let ingredients = resolve_ingredients(&raw.ingredients);

    vocabulary.extend(ingredients.iter().map(String::as_str));

    Recipe {
        title: resolve_title(raw),
        image: resolve_image(raw),
        ingredients,
        steps,
        instructions,
    }
}

pub fn resolve_title(raw: &RawRecipe) -> String {
    [&raw.title, &raw.name, &raw.recipe_name]
        .into_iter()
        .find_map(Field::non_empty_text)
        .unwrap_or(UNTITLED)
        .to_string()
}

pub fn resolve_image(raw: &RawRecipe) -> String {
    [&raw.image, &raw.img]
        .into_iter()
        .find_map(Field::non_empty_text)
        .unwrap_or(PLACEHOLDER_IMAGE)
        .to_string()
}

/// Steps come from `steps`, then a list under `instructions`, then the lines
/// of an `instructions` string.
pub fn resolve_steps(steps: &Field, instructions: &Field) -> Vec<String> {
    if let Some(items) = steps
        .non_empty_sequence()
        .or_else(|| instructions.non_empty_sequence())
    {
        return items.iter().map(|s| s.trim().to_string()).collect();
    }

    match instructions {
        Field::Text(text) if !text.trim().is_empty() => text
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Steps joined by spaces, or the raw instruction text when there are none
pub fn resolve_instructions(steps: &[String], instructions: &Field) -> String {
    let joined = steps.join(" ");
    if !joined.is_empty() {
        return joined;
    }

    match instructions {
        Field::Text(text) => text.clone(),
        _ => String::new(),
    }
}

pub fn resolve_ingredients(ingredients: &Field) -> Vec<String> {
    match ingredients {
        Field::Sequence(items) => items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect(),
        Field::Text(text) => text
            .split([',', ';', '\n'])
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect(),
        Field::Absent => Vec::new(),
    }
}
