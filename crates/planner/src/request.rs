use serde::Serialize;
use validator::Validate;

pub const MAX_DAYS: u32 = 14;
pub const MAX_PEOPLE: u32 = 10;

/// Parameters of a single generation session.
///
/// Only constructible through [`GenerationRequest::new`], so every value in
/// circulation has passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[validate(range(min = 1, max = MAX_DAYS, message = "Days must be between 1 and 14"))]
    days: u32,
    #[validate(range(min = 1, max = MAX_PEOPLE, message = "People must be between 1 and 10"))]
    people: u32,
    excluded_ingredients: String,
}

impl GenerationRequest {
    pub fn new(days: u32, people: u32, excluded_ingredients: impl Into<String>) -> crate::Result<Self> {
        let request = Self {
            days,
            people,
            excluded_ingredients: excluded_ingredients.into(),
        };

        request.validate()?;

        Ok(request)
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn people(&self) -> u32 {
        self.people
    }

    /// Raw exclusion text as entered, possibly empty or whitespace-only.
    pub fn excluded_ingredients(&self) -> &str {
        &self.excluded_ingredients
    }

    /// Trimmed exclusion list, `None` when nothing meaningful was entered.
    pub fn exclusions(&self) -> Option<&str> {
        let trimmed = self.excluded_ingredients.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
