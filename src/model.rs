//! Content and gameplay data types
//!
//! Pages and their sections are immutable ground truth once loaded; everything
//! that changes during play lives in the session or room state.

use serde::{Deserialize, Serialize};

/// Which part of a fake page a section represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionCategory {
    Headline,
    Body,
    Quote,
    Statistic,
    Attribution,
    Metadata,
}

/// Overall page flavor (affects rendering only, not gameplay)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    News,
    Blog,
    Social,
    Wiki,
}

/// A single section of a fake web page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSection {
    pub id: String,
    pub text: String,
    /// Ground truth: true sections should be archived, false ones avoided
    pub is_true: bool,
    pub category: SectionCategory,
    /// 1 (decays first) to 5 (decays last)
    pub decay_order: u8,
    /// Energy spent to select this section
    pub archive_cost: i32,
}

/// Complete page content (returned by a content source)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub id: String,
    pub title: String,
    pub content_type: ContentType,
    pub author: String,
    pub date: String,
    pub url: String,
    pub sections: Vec<PageSection>,
    /// 1-10
    pub difficulty: u32,
    /// Seconds until full decay
    pub decay_duration: u32,
}

impl PageContent {
    /// Minimum shape required to be playable without crashing the renderer.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
            && !self.title.is_empty()
            && !self.sections.is_empty()
            && self.sections.iter().all(|s| !s.id.is_empty())
    }

    pub fn section(&self, section_id: &str) -> Option<&PageSection> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// Number of true sections - used as the solo archive energy budget.
    pub fn true_section_count(&self) -> usize {
        self.sections.iter().filter(|s| s.is_true).count()
    }
}

/// An item the player has archived (append-only history)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedItem {
    pub section_id: String,
    pub section_text: String,
    pub was_correct: bool,
    pub points_earned: i32,
    pub level: u32,
    /// Unix timestamp (ms) when archived
    pub timestamp: f64,
}

/// Final results of a solo game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub total_score: i64,
    /// Percentage of archived items that were correct
    pub accuracy: u32,
    pub pages_completed: u32,
    pub total_archived: u32,
    pub best_combo: u32,
    /// Seconds
    pub time_played: u32,
    pub level: u32,
}

/// Stable identity supplied by the external identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    /// Stable player id
    pub player_id: String,
    pub username: String,
    pub avatar_url: String,
}

impl PlayerProfile {
    pub fn new(player_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            username: username.into(),
            avatar_url: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: &str, is_true: bool) -> PageSection {
        PageSection {
            id: id.to_string(),
            text: "text".to_string(),
            is_true,
            category: SectionCategory::Body,
            decay_order: 3,
            archive_cost: 1,
        }
    }

    #[test]
    fn test_page_validation() {
        let mut page = PageContent {
            id: "p1".to_string(),
            title: "Title".to_string(),
            content_type: ContentType::News,
            author: "A".to_string(),
            date: "2026-02-13".to_string(),
            url: "https://example.com".to_string(),
            sections: vec![section("s1", true), section("s2", false)],
            difficulty: 1,
            decay_duration: 60,
        };
        assert!(page.is_valid());
        assert_eq!(page.true_section_count(), 1);

        page.sections.clear();
        assert!(!page.is_valid());
    }

    #[test]
    fn test_section_lookup() {
        let page = PageContent {
            id: "p1".to_string(),
            title: "Title".to_string(),
            content_type: ContentType::Wiki,
            author: "A".to_string(),
            date: "d".to_string(),
            url: "u".to_string(),
            sections: vec![section("s1", true)],
            difficulty: 1,
            decay_duration: 60,
        };
        assert!(page.section("s1").is_some());
        assert!(page.section("nope").is_none());
    }
}
