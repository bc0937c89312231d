use serde_json::Value;

/// The shape a raw record field arrived in
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field {
    /// An ordered list, every entry already turned into text
    Sequence(Vec<String>),
    /// A single string, possibly delimited
    Text(String),
    /// Missing, null, or a shape no field accepts
    #[default]
    Absent,
}

impl Field {
    /// Text value if present and non-empty
    pub fn non_empty_text(&self) -> Option<&str> {
        match self {
            Field::Text(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Sequence value if present and non-empty
    pub fn non_empty_sequence(&self) -> Option<&[String]> {
        match self {
            Field::Sequence(items) if !items.is_empty() => Some(items),
            _ => None,
        }
    }
}

impl From<Option<&Value>> for Field {
    fn from(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Array(items)) => Field::Sequence(items.iter().map(entry_text).collect()),
            Some(Value::String(s)) => Field::Text(s.clone()),
            _ => Field::Absent,
        }
    }
}

/// Text form of one sequence entry
fn entry_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A recipe record as found in the source, one field per known key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecipe {
    pub title: Field,
    pub name: Field,
    pub recipe_name: Field,
    pub image: Field,
    pub img: Field,
    pub steps: Field,
    pub instructions: Field,
    pub ingredients: Field,
}

impl RawRecipe {
    /// Read the known keys of a record; anything that is not an object has no fields
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };

        Self {
            title: map.get("title").into(),
            name: map.get("name").into(),
            recipe_name: map.get("recipe_name").into(),
            image: map.get("image").into(),
            img: map.get("img").into(),
            steps: map.get("steps").into(),
            instructions: map.get("instructions").into(),
            ingredients: map.get("ingredients").into(),
        }
    }
}

/// The whole source document, flattened into one list of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCollection {
    pub records: Vec<RawRecipe>,
}

impl RawCollection {
    /// Accepts either a list of records or an object of named record lists.
    /// Group values that are not lists count as a single record.
    pub fn from_value(value: &Value) -> Self {
        let records = match value {
            Value::Array(items) => items.iter().map(RawRecipe::from_value).collect(),
            Value::Object(groups) => groups
                .values()
                .flat_map(|group| match group {
                    Value::Array(items) => items.iter().collect::<Vec<_>>(),
                    single => vec![single],
                })
                .map(RawRecipe::from_value)
                .collect(),
            _ => Vec::new(),
        };

        Self { records }
    }

    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(Self::from_value(&value))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_shapes() {
        let record = json!({
            "ingredients": ["salt", 2, null],
            "instructions": "Boil.",
            "title": 42,
        });
        let raw = RawRecipe::from_value(&record);

        assert_eq!(
            raw.ingredients,
            Field::Sequence(vec!["salt".to_string(), "2".to_string(), String::new()])
        );
        assert_eq!(raw.instructions, Field::Text("Boil.".to_string()));
        assert_eq!(raw.title, Field::Absent);
        assert_eq!(raw.steps, Field::Absent);
    }

    #[test]
    fn test_non_object_record_has_no_fields() {
        assert_eq!(RawRecipe::from_value(&json!("soup")), RawRecipe::default());
    }

    #[test]
    fn test_grouped_collection_flattens_in_document_order() {
        let doc = json!({
            "soups": [{"title": "Tomato Soup"}, {"title": "Lentil Soup"}],
            "desserts": [{"title": "Kheer"}],
            "single": {"title": "Toast"},
        });
        let collection = RawCollection::from_value(&doc);

        let titles: Vec<_> = collection
            .records
            .iter()
            .map(|r| r.title.non_empty_text().unwrap_or_default().to_string())
            .collect();
        assert_eq!(titles, vec!["Tomato Soup", "Lentil Soup", "Kheer", "Toast"]);
    }

    #[test]
    fn test_scalar_document_is_empty() {
        assert!(RawCollection::from_value(&json!(7)).is_empty());
    }
}
