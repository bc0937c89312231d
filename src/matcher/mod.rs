// Ingredient matching and ranking

use crate::recipe::Recipe;
use serde::Serialize;
use std::cmp::Ordering;

/// A recipe annotated with how well it matched one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    /// Matched ingredients over total ingredients, in [0, 1]
    pub score: f64,
    /// The recipe's ingredients that contain a query token, in recipe order
    pub matched: Vec<String>,
}

impl ScoredRecipe {
    /// Score as a whole percentage for display
    pub fn percent(&self) -> u32 {
        (self.score * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The query had no ingredient tokens
    EmptyQuery,
    /// Matching recipes, best first. May be empty.
    Ranked(Vec<ScoredRecipe>),
}

impl SearchOutcome {
    pub fn results(&self) -> &[ScoredRecipe] {
        match self {
            SearchOutcome::EmptyQuery => &[],
            SearchOutcome::Ranked(results) => results,
        }
    }

    pub fn into_results(self) -> Vec<ScoredRecipe> {
        match self {
            SearchOutcome::EmptyQuery => Vec::new(),
            SearchOutcome::Ranked(results) => results,
        }
    }

    pub fn is_empty_query(&self) -> bool {
        matches!(self, SearchOutcome::EmptyQuery)
    }

    pub fn has_no_matches(&self) -> bool {
        matches!(self, SearchOutcome::Ranked(results) if results.is_empty())
    }
}

/// Lower-case, split on commas, trim, drop blanks
pub fn tokenize_query(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Score one recipe against already tokenized query terms.
/// An ingredient matches when it contains any token, case-insensitively.
pub fn score_recipe(recipe: &Recipe, tokens: &[String]) -> ScoredRecipe {
    let matched: Vec<String> = recipe
        .ingredients
        .iter()
        .filter(|ingredient| {
            let ingredient = ingredient.to_lowercase();
            tokens.iter().any(|token| ingredient.contains(token.as_str()))
        })
        .cloned()
        .collect();

    let score = matched.len() as f64 / recipe.ingredients.len().max(1) as f64;

    ScoredRecipe {
        recipe: recipe.clone(),
        score,
        matched,
    }
}

/// Rank every recipe with at least one matching ingredient, best first.
/// Ties keep collection order.
pub fn search(query: &str, recipes: &[Recipe]) -> SearchOutcome {
    let tokens = tokenize_query(query);
    if tokens.is_empty() {
        return SearchOutcome::EmptyQuery;
    }

    let mut results: Vec<ScoredRecipe> = recipes
        .iter()
        .map(|recipe| score_recipe(recipe, &tokens))
        .filter(|scored| scored.score > 0.0)
        .collect();

    // stable
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    SearchOutcome::Ranked(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(title: &str, ingredients: &[&str]) -> Recipe {
        Recipe {
            title: title.to_string(),
            image: String::new(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            steps: Vec::new(),
            instructions: String::new(),
        }
    }

    #[test]
    fn test_tokenize_query() {
        assert_eq!(tokenize_query(" Rice, ,DAL ,"), vec!["rice", "dal"]);
        assert!(tokenize_query(" , ,").is_empty());
        assert!(tokenize_query("").is_empty());
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let scored = score_recipe(
            &recipe("Chai", &["Water", "Tea Leaves", "Milk", "sugar"]),
            &["tea".to_string(), "wat".to_string()],
        );
        assert_eq!(scored.matched, vec!["Water", "Tea Leaves"]);
        assert_eq!(scored.score, 0.5);
        assert_eq!(scored.percent(), 50);
    }

    #[test]
    fn test_recipe_without_ingredients_scores_zero() {
        let scored = score_recipe(&recipe("Air", &[]), &["salt".to_string()]);
        assert_eq!(scored.score, 0.0);
        assert!(scored.matched.is_empty());
    }

    #[test]
    fn test_ranking_is_descending_and_stable() {
        let recipes = vec![
            recipe("A", &["rice", "dal", "ghee", "salt"]),
            recipe("B", &["rice", "salt"]),
            recipe("C", &["bread"]),
            recipe("D", &["rice", "milk"]),
        ];

        let outcome = search("rice", &recipes);
        let titles: Vec<_> = outcome
            .results()
            .iter()
            .map(|r| r.recipe.title.as_str())
            .collect();
        assert_eq!(titles, vec!["B", "D", "A"]);
    }

    #[test]
    fn test_empty_query_is_distinct_from_no_matches() {
        let recipes = vec![recipe("A", &["rice"])];

        assert!(search("", &recipes).is_empty_query());
        assert!(search(" , ", &recipes).is_empty_query());

        let outcome = search("zzzNoSuchIngredientzzz", &recipes);
        assert!(!outcome.is_empty_query());
        assert!(outcome.has_no_matches());
    }
}
