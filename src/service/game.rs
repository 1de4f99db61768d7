//! Request handlers
//!
//! [`GameService`] turns requests into engine calls: it resolves slugs and
//! levels against the repositories, validates parameters, and maps every
//! failure onto an [`ApiError`]. User-scoped handlers take the identity that
//! [`crate::auth::with_identity`] resolved.

use super::error::WriteContext;
use super::types::{
    CategoryScore, CategorySummary, CountResponse, DailyRequest, EndlessRequest,
    EndlessSubmitRequest, GuessRequest, HighScoreResponse, LevelsRequest, ProgressRequest,
    ProgressResponse, PuzzleRef, SolutionResponse,
};
use super::{ApiError, Clock, SystemClock};
use crate::config::Settings;
use crate::core::{Category, CategoryId, GameMode, NewProgress, Puzzle, PuzzleCard, UserId};
use crate::engine::{self, Anchor, EndlessBatch, EngineError, GuessEvaluation, LevelWindow};
use crate::store::{CategoryScope, Store, StoreError};
use rand::Rng;
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

const CATEGORY_NOT_FOUND: &str = "Category not found";
const PUZZLE_NOT_FOUND: &str = "Puzzle does not exist";
const USER_NOT_FOUND: &str = "User not found";
const NEGATIVE_SCORE: &str = "Score must be non-negative";

pub struct GameService<S, C = SystemClock> {
    store: S,
    clock: C,
    settings: Settings,
}

impl<S: Store> GameService<S, SystemClock> {
    pub fn new(store: S, settings: Settings) -> Self {
        Self::with_clock(store, SystemClock, settings)
    }
}

impl<S: Store, C: Clock> GameService<S, C> {
    pub fn with_clock(store: S, clock: C, settings: Settings) -> Self {
        Self {
            store,
            clock,
            settings,
        }
    }

    #[inline]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[inline]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Score a guess against a puzzle's solution
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown slug or level, `Validation` for a missing
    /// or empty message.
    pub fn guess(&self, request: &GuessRequest) -> Result<GuessEvaluation, ApiError> {
        let puzzle = self.resolve_puzzle(&request.puzzle)?;
        let message = request
            .message
            .as_deref()
            .filter(|message| !message.is_empty())
            .ok_or_else(|| ApiError::validation("No message attribute"))?;

        let evaluation = engine::evaluate_guess(&puzzle.solution, message);
        debug!(
            category = %puzzle.category,
            position = puzzle.position,
            score = evaluation.score,
            "guess evaluated"
        );
        Ok(evaluation)
    }

    /// Acronym, clue and par score of one puzzle
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown slug or level.
    pub fn puzzle(&self, puzzle: &PuzzleRef) -> Result<PuzzleCard, ApiError> {
        Ok(PuzzleCard::from(&self.resolve_puzzle(puzzle)?))
    }

    /// The hidden sentence of one puzzle
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown slug or level.
    pub fn solution(&self, puzzle: &PuzzleRef) -> Result<SolutionResponse, ApiError> {
        let puzzle = self.resolve_puzzle(puzzle)?;
        Ok(SolutionResponse {
            solution: puzzle.solution,
        })
    }

    /// Number of puzzles in a category
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown slug.
    pub fn puzzle_count(&self, slug: &str) -> Result<CountResponse, ApiError> {
        let category = self.category(slug, CategoryScope::Any)?;
        Ok(CountResponse {
            count: self.store.puzzle_count(category.id)?,
        })
    }

    /// Active categories, optionally personalised for a user
    ///
    /// With a user, their own categories are included and `mode` adds the
    /// endless high score or the daily completion badge.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user is unknown.
    pub fn categories(
        &self,
        user: Option<&UserId>,
        mode: Option<GameMode>,
    ) -> Result<Vec<CategorySummary>, ApiError> {
        if let Some(user) = user {
            self.require_user(user)?;
        }
        let mut summaries: Vec<CategorySummary> = self
            .store
            .active_categories(user)?
            .into_iter()
            .map(CategorySummary::from)
            .collect();

        match (user, mode) {
            (Some(user), Some(GameMode::Endless)) => {
                let scores = self.store.high_scores(user)?;
                for summary in &mut summaries {
                    summary.high_score = scores.get(&CategoryId(summary.id)).copied();
                }
            }
            (Some(user), Some(GameMode::Daily)) => {
                let today = self.clock.today();
                let played: FxHashSet<u64> = self
                    .store
                    .categories_played_on(user, GameMode::Daily, today)?
                    .into_iter()
                    .map(|category| category.0)
                    .collect();
                for summary in &mut summaries {
                    if played.contains(&summary.id) {
                        summary.badge = Some(CategorySummary::COMPLETED_BADGE.to_string());
                    }
                }
            }
            _ => {}
        }
        Ok(summaries)
    }

    /// A page of levels for the user
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown user or slug.
    pub fn levels(&self, user: &UserId, request: &LevelsRequest) -> Result<LevelWindow, ApiError> {
        self.require_user(user)?;
        let category = self.category(&request.slug, CategoryScope::Any)?;
        let anchor = Anchor::from_params(
            request.center_position,
            request.after_position,
            request.before_position,
        );

        let window = engine::level_window(
            &self.store,
            user,
            category.id,
            anchor,
            self.settings.batch_size,
        )?;
        debug!(
            user = %user,
            category = %category.slug,
            ?anchor,
            items = window.items.len(),
            "level window"
        );
        Ok(window)
    }

    /// Record a finished puzzle
    ///
    /// A second submission for the same puzzle (the same day, or ever for
    /// levels mode) returns the existing record instead of writing a new one.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown user, slug or level, `Validation` for a
    /// negative score or a missing `attempts_data`, `Internal` if the write
    /// fails.
    pub fn submit_progress(
        &self,
        user: &UserId,
        request: &ProgressRequest,
    ) -> Result<ProgressResponse, ApiError> {
        self.require_user(user)?;
        if request.score < 0 {
            return Err(ApiError::validation(NEGATIVE_SCORE));
        }
        let puzzle = self.resolve_puzzle(&PuzzleRef {
            slug: request.slug.clone(),
            level_num: request.level_num,
        })?;
        let attempts_data = request
            .attempts_data
            .clone()
            .ok_or_else(|| ApiError::validation("Missing attempts_data in request body"))?;

        let context = WriteContext {
            user,
            category: puzzle.category,
            puzzle: Some(puzzle.id),
            mode: request.game_mode,
        };
        let today = self.clock.today();
        let existing = self
            .store
            .find_progress(user, Some(puzzle.id), request.game_mode, today)
            .map_err(|err| context.fail(&err, "Failed to save progress"))?;
        if let Some(existing) = existing {
            debug!(user = %user, id = %existing.id, "progress already recorded");
            return Ok(ProgressResponse::replayed(existing.id));
        }

        let inserted = self.store.insert_progress(NewProgress {
            user: user.clone(),
            category: puzzle.category,
            puzzle: Some(puzzle.id),
            mode: request.game_mode,
            score: request.score,
            attempts_data: Some(attempts_data),
            day: today,
        });
        match inserted {
            Ok(record) => {
                info!(
                    user = %user,
                    puzzle = %puzzle.id,
                    mode = %request.game_mode,
                    score = request.score,
                    "progress recorded"
                );
                Ok(ProgressResponse::created(record.id))
            }
            Err(StoreError::Duplicate(id)) => Ok(ProgressResponse::replayed(id)),
            Err(err) => Err(context.fail(&err, "Failed to save progress")),
        }
    }

    /// A random endless batch, skipping the positions already played
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown user or a category the user cannot see, or
    /// when every puzzle is excluded.
    pub fn endless_levels(
        &self,
        user: &UserId,
        request: &EndlessRequest,
    ) -> Result<EndlessBatch, ApiError> {
        self.endless_levels_with(user, request, &mut rand::rng())
    }

    /// [`Self::endless_levels`] with a caller-supplied random source
    ///
    /// # Errors
    ///
    /// Same as [`Self::endless_levels`].
    pub fn endless_levels_with<R: Rng + ?Sized>(
        &self,
        user: &UserId,
        request: &EndlessRequest,
        rng: &mut R,
    ) -> Result<EndlessBatch, ApiError> {
        self.require_user(user)?;
        let category = self.category(&request.slug, CategoryScope::VisibleTo(user))?;
        if !request.last_position.is_empty() {
            info!(positions = ?request.last_position, "filtering out played positions");
        }

        let batch = engine::sample_puzzles(
            &self.store,
            category.id,
            &request.last_position,
            self.settings.endless_limit,
            rng,
        )?;
        debug!(
            user = %user,
            category = %category.slug,
            count = batch.count,
            available = batch.total_available,
            "endless batch"
        );
        Ok(batch)
    }

    /// Submit an endless score; the stored high score only ever rises
    ///
    /// # Errors
    ///
    /// `Validation` for a negative score, `NotFound` for an unknown user or
    /// slug, `Internal` if the update fails.
    pub fn endless_submit(
        &self,
        user: &UserId,
        request: &EndlessSubmitRequest,
    ) -> Result<HighScoreResponse, ApiError> {
        self.require_user(user)?;
        if request.score < 0 {
            return Err(ApiError::validation(NEGATIVE_SCORE));
        }
        let category = self.category(&request.slug, CategoryScope::Any)?;

        let context = WriteContext {
            user,
            category: category.id,
            puzzle: None,
            mode: GameMode::Endless,
        };
        let high_score = engine::reconcile_high_score(&self.store, user, category.id, request.score)
            .map_err(|err| context.fail(&err, "Failed to update score"))?;
        info!(
            user = %user,
            category = %category.slug,
            score = request.score,
            high_score,
            "endless score submitted"
        );

        Ok(HighScoreResponse {
            success: true,
            high_score,
        })
    }

    /// Every category the user can play with their endless high score
    ///
    /// # Errors
    ///
    /// `NotFound` if the user is unknown.
    pub fn endless_scores(&self, user: &UserId) -> Result<Vec<CategoryScore>, ApiError> {
        self.require_user(user)?;
        let scores = self.store.high_scores(user)?;
        Ok(self
            .store
            .active_categories(Some(user))?
            .into_iter()
            .map(|category| CategoryScore {
                high_score: scores.get(&category.id).copied().unwrap_or(0),
                category_slug: category.slug,
            })
            .collect())
    }

    /// Today's puzzle for a system category
    ///
    /// # Errors
    ///
    /// `Validation` for an empty slug, `NotFound` for an unknown slug or an
    /// empty category.
    pub fn daily(&self, request: &DailyRequest) -> Result<PuzzleCard, ApiError> {
        if request.slug.is_empty() {
            return Err(ApiError::validation("Missing slug parameter"));
        }
        let category = self.category(&request.slug, CategoryScope::System)?;
        let today = self.clock.today();

        engine::daily_puzzle(&self.store, category.id, today, self.settings.daily_epoch).map_err(
            |err| match err {
                EngineError::NoPuzzlesAvailable => {
                    ApiError::not_found("No puzzles available for this category")
                }
                EngineError::Store(err) => err.into(),
            },
        )
    }

    fn require_user(&self, user: &UserId) -> Result<(), ApiError> {
        if self.store.user_exists(user)? {
            Ok(())
        } else {
            warn!(user = %user, "user not found");
            Err(ApiError::not_found(USER_NOT_FOUND))
        }
    }

    fn category(&self, slug: &str, scope: CategoryScope<'_>) -> Result<Category, ApiError> {
        if slug.is_empty() {
            return Err(ApiError::validation("Missing required parameter: slug"));
        }
        self.store.category_by_slug(slug, scope)?.ok_or_else(|| {
            debug!(slug, "category not found");
            ApiError::not_found(CATEGORY_NOT_FOUND)
        })
    }

    fn resolve_puzzle(&self, puzzle: &PuzzleRef) -> Result<Puzzle, ApiError> {
        let category = self.category(&puzzle.slug, CategoryScope::Any)?;
        let Ok(position) = u32::try_from(puzzle.level_num) else {
            return Err(ApiError::not_found(PUZZLE_NOT_FOUND));
        };
        self.store
            .puzzle_at(category.id, position)?
            .ok_or_else(|| ApiError::not_found(PUZZLE_NOT_FOUND))
    }
}
