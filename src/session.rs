//! Solo session state machine
//!
//! Sequences menu -> loading -> playing -> revealing -> (next page | gameover).
//! The session owns the decay engine for the active page; the host calls
//! [`Session::tick`] every frame with the wall-clock time and reacts to the
//! returned signal.

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::decay::{DecayCurve, DecayEngine};
use crate::difficulty::difficulty_for_level;
use crate::model::{ArchivedItem, GameResult, PageContent};
use crate::scoring::{self, RoundOutcome};

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Menu,
    Loading,
    Playing,
    Revealing,
    GameOver,
}

/// What a tick wants the host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    /// Content loading passed its deadline; load fallback content now
    NeedsFallbackContent,
    /// Decay finished and the round auto-resolved; show the reveal
    RoundResolved,
}

/// One solo play session
#[derive(Debug, Clone)]
pub struct Session {
    phase: GamePhase,
    demo_mode: bool,

    level: u32,
    selected_level_id: Option<String>,
    score: i64,
    combo: u32,
    best_combo: u32,
    last_result: Option<GameResult>,

    archive_energy: i32,
    max_archive_energy: i32,

    page: Option<PageContent>,
    engine: DecayEngine,
    decay_progress: f32,

    selected: Vec<String>,
    archive: Vec<ArchivedItem>,
    last_outcome: Option<RoundOutcome>,

    started_at_ms: Option<f64>,
    pages_completed: u32,
    /// Preloaded pages when playing a specific level
    level_pages: Vec<PageContent>,
    level_page_index: usize,

    loading_deadline_ms: Option<f64>,
    /// One-shot guard so timer completion and a manual archive never both
    /// resolve the same round
    round_resolved: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            phase: GamePhase::Menu,
            demo_mode: false,
            level: 1,
            selected_level_id: None,
            score: 0,
            combo: 0,
            best_combo: 0,
            last_result: None,
            archive_energy: consts::BASE_ARCHIVE_ENERGY,
            max_archive_energy: consts::BASE_ARCHIVE_ENERGY,
            page: None,
            engine: DecayEngine::new(consts::MIN_DECAY_DURATION_SECS, DecayCurve::Linear),
            decay_progress: 0.0,
            selected: Vec::new(),
            archive: Vec::new(),
            last_outcome: None,
            started_at_ms: None,
            pages_completed: 0,
            level_pages: Vec::new(),
            level_page_index: 0,
            loading_deadline_ms: None,
            round_resolved: false,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn best_combo(&self) -> u32 {
        self.best_combo
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn archive_energy(&self) -> i32 {
        self.archive_energy
    }

    pub fn decay_progress(&self) -> f32 {
        self.decay_progress
    }

    pub fn current_page(&self) -> Option<&PageContent> {
        self.page.as_ref()
    }

    pub fn selected_sections(&self) -> &[String] {
        &self.selected
    }

    pub fn archive_history(&self) -> &[ArchivedItem] {
        &self.archive
    }

    /// Outcome of the most recently resolved round (available in Revealing)
    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn last_result(&self) -> Option<&GameResult> {
        self.last_result.as_ref()
    }

    pub fn pages_completed(&self) -> u32 {
        self.pages_completed
    }

    /// Quick-play or demo: enter loading and wait for content.
    pub fn start_game(&mut self, demo_mode: bool, now_ms: f64) {
        *self = Self {
            phase: GamePhase::Loading,
            demo_mode,
            started_at_ms: Some(now_ms),
            loading_deadline_ms: Some(now_ms + consts::CONTENT_LOAD_TIMEOUT_MS),
            ..Self::default()
        };
        log::info!("session started (demo={demo_mode})");
    }

    /// Start a specific level with its preloaded page sequence.
    pub fn start_level_game(
        &mut self,
        level_id: &str,
        difficulty: u32,
        pages: Vec<PageContent>,
        now_ms: f64,
    ) {
        let Some(first) = pages.first().cloned() else {
            return;
        };
        *self = Self {
            selected_level_id: Some(level_id.to_string()),
            level: difficulty.clamp(1, consts::MAX_LEVEL),
            started_at_ms: Some(now_ms),
            level_pages: pages,
            ..Self::default()
        };
        self.enter_playing(first, now_ms);
        log::info!("level session started (level={level_id})");
    }

    /// Content arrived while loading. Rejects invalid pages (caller should
    /// retry with fallback content).
    pub fn content_loaded(&mut self, page: PageContent, now_ms: f64) -> bool {
        if self.phase != GamePhase::Loading || !page.is_valid() {
            return false;
        }
        self.enter_playing(page, now_ms);
        true
    }

    /// Next preloaded level page, if any remain.
    pub fn next_level_page(&self) -> Option<PageContent> {
        self.level_pages.get(self.level_page_index + 1).cloned()
    }

    fn enter_playing(&mut self, page: PageContent, now_ms: f64) {
        let config = difficulty_for_level(self.level);
        let duration = if page.decay_duration > 0 {
            page.decay_duration
        } else {
            config.decay_duration
        };

        // Solo energy budget: one point per true section on the page
        let energy = page.true_section_count().max(1) as i32;
        self.archive_energy = energy;
        self.max_archive_energy = energy;

        self.selected.clear();
        self.decay_progress = 0.0;
        self.round_resolved = false;
        self.last_outcome = None;
        self.loading_deadline_ms = None;
        self.page = Some(page);

        // Exactly one engine start per playing entry
        self.engine = DecayEngine::new(duration, config.decay_curve);
        self.engine.start(now_ms);
        self.phase = GamePhase::Playing;
    }

    /// Advance timers. Call once per animation frame.
    pub fn tick(&mut self, now_ms: f64) -> Option<SessionSignal> {
        match self.phase {
            GamePhase::Loading => {
                if let Some(deadline) = self.loading_deadline_ms
                    && now_ms >= deadline
                {
                    // Fire once; the host loads fallback content
                    self.loading_deadline_ms = None;
                    log::warn!("content load deadline passed, requesting fallback");
                    return Some(SessionSignal::NeedsFallbackContent);
                }
                None
            }
            GamePhase::Playing => {
                let out = self.engine.tick(now_ms)?;
                self.decay_progress = out.progress;
                if out.completed {
                    self.resolve_decay_complete(now_ms);
                    return Some(SessionSignal::RoundResolved);
                }
                None
            }
            _ => None,
        }
    }

    /// Mark a section. Costs its archive energy up front; refused when the
    /// budget cannot cover it.
    pub fn select_section(&mut self, section_id: &str) -> bool {
        if self.phase != GamePhase::Playing
            || self.selected.iter().any(|id| id == section_id)
        {
            return false;
        }
        let Some(cost) = self
            .page
            .as_ref()
            .and_then(|p| p.section(section_id))
            .map(|s| s.archive_cost)
        else {
            return false;
        };
        if self.archive_energy < cost {
            return false;
        }
        self.selected.push(section_id.to_string());
        self.archive_energy -= cost;
        true
    }

    /// Unmark a section, refunding its energy exactly.
    pub fn deselect_section(&mut self, section_id: &str) -> bool {
        let Some(pos) = self.selected.iter().position(|id| id == section_id) else {
            return false;
        };
        let Some(cost) = self
            .page
            .as_ref()
            .and_then(|p| p.section(section_id))
            .map(|s| s.archive_cost)
        else {
            return false;
        };
        self.selected.remove(pos);
        self.archive_energy = (self.archive_energy + cost).min(self.max_archive_energy);
        true
    }

    /// Player commits their selections. Requires at least one selection.
    pub fn archive_selected(&mut self, now_ms: f64) -> bool {
        if self.phase != GamePhase::Playing || self.round_resolved || self.selected.is_empty() {
            return false;
        }
        self.resolve_round(now_ms);
        true
    }

    fn resolve_decay_complete(&mut self, now_ms: f64) {
        if self.round_resolved {
            return;
        }
        if self.selected.is_empty() {
            // Timeout path: flat penalty, combo gone
            let outcome = scoring::timeout_outcome();
            self.score = scoring::apply_round(self.score, outcome.round_points);
            self.combo = 0;
            self.last_outcome = Some(outcome);
            self.round_resolved = true;
            self.phase = GamePhase::Revealing;
            log::debug!("round timed out with no selections");
        } else {
            // Auto-archive whatever is selected
            self.resolve_round(now_ms);
        }
    }

    fn resolve_round(&mut self, now_ms: f64) {
        let Some(page) = self.page.as_ref() else {
            return;
        };
        let sections: Vec<_> = self
            .selected
            .iter()
            .filter_map(|id| page.section(id))
            .collect();
        let outcome = scoring::score_archive(&sections, self.decay_progress, self.combo);

        for verdict in &outcome.sections {
            let text = page
                .section(&verdict.section_id)
                .map(|s| s.text.clone())
                .unwrap_or_default();
            self.archive.push(ArchivedItem {
                section_id: verdict.section_id.clone(),
                section_text: text,
                was_correct: verdict.was_correct,
                points_earned: verdict.points,
                level: self.level,
                timestamp: now_ms,
            });
        }

        self.score = scoring::apply_round(self.score, outcome.round_points);
        self.combo = outcome.combo;
        self.best_combo = self.best_combo.max(outcome.combo);
        self.last_outcome = Some(outcome);
        self.round_resolved = true;
        self.engine.pause(now_ms);
        self.phase = GamePhase::Revealing;
    }

    /// Player acknowledges the reveal. Moves to the next page, or ends the
    /// game when the page quota is exhausted (or no content remains).
    pub fn advance(&mut self, next_page: Option<PageContent>, now_ms: f64) {
        if self.phase != GamePhase::Revealing {
            return;
        }
        self.pages_completed += 1;

        if self.pages_completed >= consts::PAGES_PER_GAME {
            self.finish(now_ms);
            return;
        }
        let Some(page) = next_page.filter(PageContent::is_valid) else {
            self.finish(now_ms);
            return;
        };

        // Ramp up after the first few pages
        if self.pages_completed >= 3 {
            self.level = (self.level + 1).min(consts::MAX_LEVEL);
        }
        if !self.level_pages.is_empty() {
            self.level_page_index += 1;
        }
        self.enter_playing(page, now_ms);
    }

    fn finish(&mut self, now_ms: f64) {
        let correct = self.archive.iter().filter(|a| a.was_correct).count();
        let accuracy = if self.archive.is_empty() {
            0
        } else {
            (correct * 100 / self.archive.len()) as u32
        };
        let time_played = self
            .started_at_ms
            .map(|t| ((now_ms - t) / 1000.0).round().max(0.0) as u32)
            .unwrap_or(0);

        self.last_result = Some(GameResult {
            total_score: self.score,
            accuracy,
            pages_completed: self.pages_completed,
            total_archived: self.archive.len() as u32,
            best_combo: self.best_combo,
            time_played,
            level: self.level,
        });
        self.phase = GamePhase::GameOver;
        log::info!(
            "game over: score={} accuracy={}% pages={}",
            self.score,
            accuracy,
            self.pages_completed
        );
    }

    /// Replay with the same level/mode context, or drop back to the menu when
    /// there is none.
    pub fn play_again(&mut self, now_ms: f64) {
        if self.phase != GamePhase::GameOver {
            return;
        }
        let demo = self.demo_mode;
        if let Some(level_id) = self.selected_level_id.clone()
            && !self.level_pages.is_empty()
        {
            let pages = std::mem::take(&mut self.level_pages);
            let level = self.level;
            self.start_level_game(&level_id, level, pages, now_ms);
        } else if demo || self.started_at_ms.is_some() {
            self.start_game(demo, now_ms);
        } else {
            self.reset();
        }
    }

    /// Back to the menu, dropping all session state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
