//! Content source contract
//!
//! The core consumes opaque page content; where it comes from (remote store,
//! LLM pipeline) is an external concern. [`CachedContent`] is the guaranteed-
//! valid fallback used whenever a fetch fails, stalls past the loading
//! deadline, or returns malformed data.

use crate::model::{ContentType, PageContent, PageSection, SectionCategory};

/// Anything that can hand out playable pages
pub trait ContentSource {
    /// Look up a specific page
    fn page_by_id(&self, id: &str) -> Option<PageContent>;

    /// A page near the requested difficulty, excluding ids already played.
    /// Must always return something when the source has any pages at all.
    fn pick_page(&self, exclude: &[String], difficulty: u32) -> Option<PageContent>;
}

/// In-memory page cache with hand-curated fallback pages
#[derive(Debug, Clone)]
pub struct CachedContent {
    pages: Vec<PageContent>,
}

impl Default for CachedContent {
    fn default() -> Self {
        Self { pages: fallback_pages() }
    }
}

impl CachedContent {
    pub fn new(pages: Vec<PageContent>) -> Self {
        let pages: Vec<_> = pages.into_iter().filter(PageContent::is_valid).collect();
        if pages.is_empty() {
            log::warn!("no valid pages supplied, using fallback set");
            return Self::default();
        }
        Self { pages }
    }

    pub fn pages(&self) -> &[PageContent] {
        &self.pages
    }
}

impl ContentSource for CachedContent {
    fn page_by_id(&self, id: &str) -> Option<PageContent> {
        self.pages.iter().find(|p| p.id == id).cloned()
    }

    fn pick_page(&self, exclude: &[String], difficulty: u32) -> Option<PageContent> {
        let candidates: Vec<_> = self
            .pages
            .iter()
            .filter(|p| !exclude.contains(&p.id))
            .collect();
        let pool = if candidates.is_empty() {
            self.pages.iter().collect::<Vec<_>>()
        } else {
            candidates
        };
        // Closest difficulty wins; ties resolve by page order, so every
        // client with the same cache picks the same page
        pool.into_iter()
            .min_by_key(|p| p.difficulty.abs_diff(difficulty))
            .cloned()
    }
}

fn section(
    id: &str,
    text: &str,
    is_true: bool,
    category: SectionCategory,
    decay_order: u8,
) -> PageSection {
    PageSection {
        id: id.to_string(),
        text: text.to_string(),
        is_true,
        category,
        decay_order,
        archive_cost: 1,
    }
}

/// Hand-curated pages that are always available, used for demo mode and as
/// the loading-failure fallback.
pub fn fallback_pages() -> Vec<PageContent> {
    vec![
        PageContent {
            id: "demo-news-1".to_string(),
            title: "Scientists Discover New High-Temperature Superconductor".to_string(),
            content_type: ContentType::News,
            author: "Michael Torres".to_string(),
            date: "February 13, 2026".to_string(),
            url: "https://sciencedaily-report.com/physics/superconductor-2026".to_string(),
            difficulty: 1,
            decay_duration: 55,
            sections: vec![
                section(
                    "d1-s1",
                    "A team of researchers at the Max Planck Institute for Chemistry has \
                     announced the discovery of a new material that exhibits superconducting \
                     properties at relatively high temperatures.",
                    true,
                    SectionCategory::Headline,
                    5,
                ),
                section(
                    "d1-s2",
                    "The material achieves superconductivity at -23°C under standard \
                     atmospheric pressure, making it the first room-temperature \
                     ambient-pressure superconductor confirmed by peer review.",
                    false,
                    SectionCategory::Body,
                    3,
                ),
                section(
                    "d1-s3",
                    "Current superconductors require either extreme cold or enormous \
                     pressures to function, severely limiting their practical applications.",
                    true,
                    SectionCategory::Body,
                    3,
                ),
                section(
                    "d1-s4",
                    "\"If this result is replicated independently, it would represent a \
                     paradigm shift in condensed matter physics,\" said Dr. Anna Müller, a \
                     physicist not involved in the study.",
                    true,
                    SectionCategory::Quote,
                    4,
                ),
                section(
                    "d1-s5",
                    "The global superconductor market was valued at approximately $8.4 \
                     billion in 2024 and is projected to grow to $14 billion by 2030.",
                    false,
                    SectionCategory::Statistic,
                    2,
                ),
            ],
        },
        PageContent {
            id: "demo-social-2".to_string(),
            title: "Thread: The wildest facts about deep-sea creatures".to_string(),
            content_type: ContentType::Social,
            author: "OceanNerd_Maya".to_string(),
            date: "February 12, 2026".to_string(),
            url: "https://threads.social/@oceannerd_maya/deep-sea-thread".to_string(),
            difficulty: 2,
            decay_duration: 50,
            sections: vec![
                section(
                    "d2-s1",
                    "THREAD: I've spent 6 years studying deep-sea biology and these facts \
                     still blow my mind.",
                    true,
                    SectionCategory::Headline,
                    5,
                ),
                section(
                    "d2-s2",
                    "The Mariana Trench is about 36,000 feet deep — if you placed Mount \
                     Everest at the bottom, the peak would still be over a mile underwater.",
                    true,
                    SectionCategory::Body,
                    3,
                ),
                section(
                    "d2-s3",
                    "Anglerfish can grow up to nine feet long and have been documented \
                     attacking small submarines near hydrothermal vents.",
                    false,
                    SectionCategory::Body,
                    2,
                ),
                section(
                    "d2-s4",
                    "Giant squid eyes are the size of dinner plates, the largest eyes in \
                     the animal kingdom.",
                    true,
                    SectionCategory::Body,
                    4,
                ),
            ],
        },
        PageContent {
            id: "demo-wiki-3".to_string(),
            title: "Carrington Event".to_string(),
            content_type: ContentType::Wiki,
            author: "Community editors".to_string(),
            date: "Last edited January 30, 2026".to_string(),
            url: "https://wikipedia.org/wiki/Carrington_Event".to_string(),
            difficulty: 4,
            decay_duration: 40,
            sections: vec![
                section(
                    "d3-s1",
                    "The Carrington Event of September 1859 was the most intense \
                     geomagnetic storm in recorded history.",
                    true,
                    SectionCategory::Headline,
                    5,
                ),
                section(
                    "d3-s2",
                    "Telegraph systems across Europe and North America failed, with some \
                     operators reporting sparks and small fires at their stations.",
                    true,
                    SectionCategory::Body,
                    3,
                ),
                section(
                    "d3-s3",
                    "The storm knocked out the transatlantic telegraph cable for three \
                     years, severing communication between the continents until 1862.",
                    false,
                    SectionCategory::Body,
                    2,
                ),
                section(
                    "d3-s4",
                    "Auroras were visible as far south as the Caribbean.",
                    true,
                    SectionCategory::Body,
                    4,
                ),
                section(
                    "d3-s5",
                    "A storm of similar magnitude today is estimated to cause trillions of \
                     dollars in damage to electrical grids and satellites.",
                    true,
                    SectionCategory::Statistic,
                    1,
                ),
            ],
        },
    ]
}
