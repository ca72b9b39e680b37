//! User profile store: onboarding details, style preferences and saved items.

use serde::{Deserialize, Serialize};
use swipey_core::{Product, ProductId};
use thiserror::Error;

use super::PROFILE_STORAGE_KEY;
use crate::storage::Persist;

/// Youngest accepted age.
pub const MIN_AGE: u32 = 13;
/// Oldest accepted age.
pub const MAX_AGE: u32 = 120;

/// Gender choices offered during onboarding. The store accepts any value.
pub const GENDER_OPTIONS: &[&str] = &["Male", "Female", "Other"];

/// A selectable style preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleOption {
    pub id: &'static str,
    pub label: &'static str,
}

/// Styles offered during onboarding.
pub const STYLE_OPTIONS: &[StyleOption] = &[
    StyleOption { id: "casual", label: "Casual" },
    StyleOption { id: "formal", label: "Formal" },
    StyleOption { id: "sporty", label: "Sporty" },
    StyleOption { id: "luxury", label: "Luxury" },
    StyleOption { id: "minimal", label: "Minimal" },
    StyleOption { id: "vintage", label: "Vintage" },
    StyleOption { id: "streetwear", label: "Streetwear" },
    StyleOption { id: "bohemian", label: "Bohemian" },
    StyleOption { id: "classic", label: "Classic" },
    StyleOption { id: "modern", label: "Modern" },
];

impl StyleOption {
    /// Look up a style by id.
    #[must_use]
    pub fn find(id: &str) -> Option<&'static Self> {
        STYLE_OPTIONS.iter().find(|style| style.id == id)
    }
}

/// The persisted profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    name: String,
    age: Option<u32>,
    gender: String,
    preferred_styles: Vec<String>,
    saved_items: Vec<Product>,
    is_profile_complete: bool,
    has_seen_welcome: bool,
}

impl Persist for Profile {
    const STORAGE_KEY: &'static str = PROFILE_STORAGE_KEY;
}

impl Profile {
    /// Complete onboarding with validated details.
    pub fn set_profile(&mut self, details: ProfileDetails) {
        self.name = details.name;
        self.age = Some(details.age);
        self.gender = details.gender;
        self.preferred_styles = details.preferred_styles;
        self.is_profile_complete = true;
    }

    /// Overwrite the fields present in `patch`.
    pub fn update_profile(&mut self, patch: ProfilePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(age) = patch.age {
            self.age = Some(age);
        }
        if let Some(gender) = patch.gender {
            self.gender = gender;
        }
        if let Some(styles) = patch.preferred_styles {
            self.set_preferred_styles(styles);
        }
    }

    /// Add a style unless already present.
    pub fn add_preferred_style(&mut self, style: impl Into<String>) {
        let style = style.into();
        if !self.preferred_styles.contains(&style) {
            self.preferred_styles.push(style);
        }
    }

    pub fn remove_preferred_style(&mut self, style: &str) {
        self.preferred_styles.retain(|s| s != style);
    }

    /// Replace the style list, dropping repeats.
    pub fn set_preferred_styles(&mut self, styles: Vec<String>) {
        self.preferred_styles.clear();
        for style in styles {
            self.add_preferred_style(style);
        }
    }

    /// Save a product. Saving an already saved id does nothing.
    ///
    /// Returns whether the product was added.
    pub fn add_saved_item(&mut self, product: Product) -> bool {
        if self.is_saved(&product.id) {
            return false;
        }
        self.saved_items.push(product);
        true
    }

    /// Unsave a product. Returns whether it was saved.
    pub fn remove_saved_item(&mut self, id: &ProductId) -> bool {
        let before = self.saved_items.len();
        self.saved_items.retain(|p| &p.id != id);
        self.saved_items.len() != before
    }

    #[must_use]
    pub fn is_saved(&self, id: &ProductId) -> bool {
        self.saved_items.iter().any(|p| &p.id == id)
    }

    pub const fn mark_welcome_seen(&mut self) {
        self.has_seen_welcome = true;
    }

    /// Reset to the state before onboarding, saved items included.
    pub fn clear_profile(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn age(&self) -> Option<u32> {
        self.age
    }

    #[must_use]
    pub fn gender(&self) -> &str {
        &self.gender
    }

    #[must_use]
    pub fn preferred_styles(&self) -> &[String] {
        &self.preferred_styles
    }

    #[must_use]
    pub fn saved_items(&self) -> &[Product] {
        &self.saved_items
    }

    #[must_use]
    pub const fn is_profile_complete(&self) -> bool {
        self.is_profile_complete
    }

    #[must_use]
    pub const fn has_seen_welcome(&self) -> bool {
        self.has_seen_welcome
    }
}

// =============================================================================
// Input
// =============================================================================

/// Validated onboarding details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDetails {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub preferred_styles: Vec<String>,
}

/// Onboarding form input before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub name: String,
    pub age: Option<u32>,
    pub gender: String,
    pub preferred_styles: Vec<String>,
}

/// Partial profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub preferred_styles: Option<Vec<String>>,
}

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_messages(.errors))]
pub struct ProfileValidationError {
    pub errors: Vec<FieldError>,
}

impl ProfileValidationError {
    /// Error message for `field`, if it failed.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message)
        .collect::<Vec<_>>()
        .join("; ")
}

const NAME_REQUIRED: FieldError = FieldError {
    field: "name",
    message: "Name is required",
};
const AGE_INVALID: FieldError = FieldError {
    field: "age",
    message: "Please enter a valid age (13-120)",
};
const GENDER_REQUIRED: FieldError = FieldError {
    field: "gender",
    message: "Please select a gender",
};

const fn age_in_range(age: u32) -> bool {
    age >= MIN_AGE && age <= MAX_AGE
}

impl ProfileDraft {
    /// Check the draft and trim it into [`ProfileDetails`].
    ///
    /// # Errors
    ///
    /// Returns every failing field at once.
    pub fn validate(self) -> Result<ProfileDetails, ProfileValidationError> {
        let mut errors = Vec::new();
        let name = self.name.trim().to_string();
        let gender = self.gender.trim().to_string();

        if name.is_empty() {
            errors.push(NAME_REQUIRED);
        }
        let age = self.age.filter(|age| age_in_range(*age));
        if age.is_none() {
            errors.push(AGE_INVALID);
        }
        if gender.is_empty() {
            errors.push(GENDER_REQUIRED);
        }

        match age {
            Some(age) if errors.is_empty() => Ok(ProfileDetails {
                name,
                age,
                gender,
                preferred_styles: self.preferred_styles,
            }),
            _ => Err(ProfileValidationError { errors }),
        }
    }
}

impl ProfilePatch {
    /// Check the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once.
    pub fn validate(&self) -> Result<(), ProfileValidationError> {
        let mut errors = Vec::new();
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            errors.push(NAME_REQUIRED);
        }
        if self.age.is_some_and(|age| !age_in_range(age)) {
            errors.push(AGE_INVALID);
        }
        if self.gender.as_deref().is_some_and(|g| g.trim().is_empty()) {
            errors.push(GENDER_REQUIRED);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProfileValidationError { errors })
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.preferred_styles.is_none()
    }
}
