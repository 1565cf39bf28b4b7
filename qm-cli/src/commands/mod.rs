//! CLI command implementations.

pub mod config;
pub mod discover;
pub mod present;

use console::{style, StyledObject};

use qm_services::presenter::Category;

/// Color a presenter label by its category.
pub fn styled_label(label: &str, category: Category) -> StyledObject<&str> {
    match category {
        Category::Neutral => style(label).cyan(),
        Category::Warning => style(label).yellow(),
        Category::Success => style(label).green(),
        Category::Danger => style(label).red(),
    }
}

/// Truncate a string to a maximum length, appending an ellipsis if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}
