//! Application state: the quiz catalog and the session ledger.
//!
//! This module owns:
//!   - the catalog store (immutable after load, id-indexed, insertion-ordered)
//!   - the session ledger (append-only result history + derived profile)
//!   - the profile-update broadcast used by WebSocket subscribers
//!
//! The catalog merges an optional TOML bank ahead of the built-in seeds.
//! Entries failing validation are skipped at load time, never at query time.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::config::{load_catalog_config_from_env, CatalogConfig};
use crate::domain::{Question, Quiz, QuizResult, UserProfile};
use crate::seeds::seed_quizzes;
use crate::util::now_millis;

/// How many profile updates a slow subscriber may fall behind before it
/// has to resync from a fresh snapshot.
const UPDATE_CHANNEL_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogStore,
    pub ledger: SessionLedger,
}

impl AppState {
    /// Build state from env: load the optional catalog bank, merge seeds,
    /// start an empty ledger.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg_opt = load_catalog_config_from_env();
        Self {
            catalog: CatalogStore::build(cfg_opt.as_ref()),
            ledger: SessionLedger::new(),
        }
    }
}

/// The quiz catalog. Read-only after construction, so queries take no lock;
/// the whole store is shared as cheap `Arc` clones.
#[derive(Clone)]
pub struct CatalogStore {
    quizzes: Arc<Vec<Quiz>>,
    by_id: Arc<HashMap<String, usize>>,
}

impl CatalogStore {
    /// Assemble the catalog: config-bank quizzes first (ids defaulting to
    /// fresh UUIDs), then built-in seeds for any id not already taken.
    /// Every entry passes through `Quiz::validate`; failures are logged and
    /// skipped so a bad answer index can never surface at query time.
    pub fn build(cfg: Option<&CatalogConfig>) -> Self {
        let mut quizzes: Vec<Quiz> = Vec::new();
        let mut by_id: HashMap<String, usize> = HashMap::new();
        let mut bank = 0usize;

        if let Some(cfg) = cfg {
            for qc in &cfg.quizzes {
                let id = qc.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
                if by_id.contains_key(&id) {
                    error!(target: "quiz", %id, "Skipping bank quiz: duplicate id.");
                    continue;
                }
                let quiz = Quiz {
                    id: id.clone(),
                    title: qc.title.clone(),
                    description: qc.description.clone(),
                    category: qc.category.clone(),
                    question_count: qc
                        .question_count
                        .unwrap_or(qc.questions.len() as u32),
                    duration: qc.duration.clone().unwrap_or_default(),
                    questions: qc
                        .questions
                        .iter()
                        .map(|q| Question {
                            id: q.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string()),
                            text: q.text.clone(),
                            options: q.options.clone(),
                            correct_answer_index: q.correct_answer_index,
                            explanation: q.explanation.clone(),
                        })
                        .collect(),
                    is_popular: qc.is_popular,
                    created_at: now_millis(),
                };
                if let Err(e) = quiz.validate() {
                    error!(target: "quiz", %id, error = %e, "Skipping bank quiz: failed validation.");
                    continue;
                }
                by_id.insert(id, quizzes.len());
                quizzes.push(quiz);
                bank += 1;
            }
        }

        // Always append built-in seeds, but don't overwrite bank ids.
        let mut seed = 0usize;
        for quiz in seed_quizzes() {
            if by_id.contains_key(&quiz.id) {
                continue;
            }
            if let Err(e) = quiz.validate() {
                error!(target: "quiz", id = %quiz.id, error = %e, "Skipping seed quiz: failed validation.");
                continue;
            }
            by_id.insert(quiz.id.clone(), quizzes.len());
            quizzes.push(quiz);
            seed += 1;
        }

        let popular = quizzes.iter().filter(|q| q.is_popular).count();
        info!(target: "quiz", total = quizzes.len(), bank, seed, popular, "Startup catalog inventory");

        Self {
            quizzes: Arc::new(quizzes),
            by_id: Arc::new(by_id),
        }
    }

    /// Exact, case-sensitive id lookup. Unknown ids are a normal miss.
    pub fn get_by_id(&self, id: &str) -> Option<Quiz> {
        self.by_id.get(id).map(|&i| self.quizzes[i].clone())
    }

    /// The full catalog in insertion order.
    pub fn all(&self) -> Vec<Quiz> {
        self.quizzes.as_ref().clone()
    }

    /// Quizzes flagged popular, in catalog order.
    pub fn popular(&self) -> Vec<Quiz> {
        self.quizzes.iter().filter(|q| q.is_popular).cloned().collect()
    }

    /// Case-insensitive exact match on the category label.
    pub fn by_category(&self, category: &str) -> Vec<Quiz> {
        self.quizzes
            .iter()
            .filter(|q| q.category.eq_ignore_ascii_case(category))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring match on title or description. The empty
    /// query matches everything (plain substring semantics, no special case).
    pub fn search(&self, query: &str) -> Vec<Quiz> {
        let needle = query.to_lowercase();
        self.quizzes
            .iter()
            .filter(|q| {
                q.title.to_lowercase().contains(&needle)
                    || q.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Distinct category labels in catalog order (for the discover screen).
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for q in self.quizzes.iter() {
            if !seen.iter().any(|c| c.eq_ignore_ascii_case(&q.category)) {
                seen.push(q.category.clone());
            }
        }
        seen
    }
}

/// Pushed to subscribers after every accepted submission.
#[derive(Clone, Debug)]
pub struct ProfileUpdate {
    pub profile: UserProfile,
    pub result: QuizResult,
}

struct LedgerInner {
    results: Vec<QuizResult>,
    profile: UserProfile,
}

/// Append-only result history plus the derived profile. The single shared
/// mutable resource in the app: writes serialize on one lock, and the
/// profile is recomputed inside the same critical section so readers never
/// observe a torn update.
#[derive(Clone)]
pub struct SessionLedger {
    inner: Arc<RwLock<LedgerInner>>,
    updates: broadcast::Sender<ProfileUpdate>,
}

impl SessionLedger {
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(RwLock::new(LedgerInner {
                results: Vec::new(),
                profile: UserProfile::default(),
            })),
            updates,
        }
    }

    /// Append a result and update the profile. Deliberately tolerant: no
    /// dedup, no check that the quiz id still exists in the catalog, and
    /// degenerate results (zero questions) count as percentage 0.
    /// Returns the profile as of this submission.
    #[instrument(level = "info", skip(self, result), fields(quiz_id = %result.quiz_id, score = result.score, total = result.total_questions))]
    pub async fn submit(&self, result: QuizResult) -> UserProfile {
        let mut inner = self.inner.write().await;
        let percentage = result.percentage();
        inner.profile.completed_quizzes += 1;
        inner.profile.best_score = inner.profile.best_score.max(percentage);
        inner.profile.total_score += u64::from(result.score);
        inner.results.push(result.clone());
        let profile = inner.profile.clone();
        info!(target: "quiz", %percentage, completed = profile.completed_quizzes, "Result recorded");
        // Sent while the write lock is held: subscribers observe updates in
        // the order submissions were serialized.
        let _ = self.updates.send(ProfileUpdate { profile: profile.clone(), result });
        profile
    }

    /// The `limit` most recent results, newest completion first; ties on
    /// `completed_at` break toward the most recent submission.
    #[instrument(level = "debug", skip(self))]
    pub async fn recent_results(&self, limit: usize) -> Vec<QuizResult> {
        let inner = self.inner.read().await;
        let mut indexed: Vec<(usize, &QuizResult)> = inner.results.iter().enumerate().collect();
        indexed.sort_by(|a, b| (b.1.completed_at, b.0).cmp(&(a.1.completed_at, a.0)));
        indexed.into_iter().take(limit).map(|(_, r)| r.clone()).collect()
    }

    /// Latest derived profile snapshot.
    pub async fn profile(&self) -> UserProfile {
        self.inner.read().await.profile.clone()
    }

    /// Subscribe to profile updates. Callers wanting "current value first"
    /// semantics read `profile()` after subscribing, then drain the receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<ProfileUpdate> {
        self.updates.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CatalogStore {
        CatalogStore::build(None)
    }

    fn result(quiz_id: &str, score: u32, total: u32, completed_at: i64) -> QuizResult {
        QuizResult {
            quiz_id: quiz_id.into(),
            score,
            total_questions: total,
            time_spent: 60_000,
            completed_at,
        }
    }

    #[test]
    fn get_by_id_returns_each_catalog_quiz() {
        let store = catalog();
        for quiz in store.all() {
            let found = store.get_by_id(&quiz.id).unwrap();
            assert_eq!(found.id, quiz.id);
            assert_eq!(found.title, quiz.title);
        }
        assert!(store.get_by_id("no-such-quiz").is_none());
        // Case-sensitive on purpose.
        assert!(store.get_by_id("Basic-Science").is_none());
    }

    #[test]
    fn every_question_has_a_valid_answer_index() {
        for quiz in catalog().all() {
            assert!(quiz.validate().is_ok(), "quiz {} failed validation", quiz.id);
        }
    }

    #[test]
    fn popular_is_the_flagged_subset_in_catalog_order() {
        let ids: Vec<String> = catalog().popular().into_iter().map(|q| q.id).collect();
        assert_eq!(ids, vec!["basic-science", "world-history"]);
    }

    #[test]
    fn category_lookup_is_case_insensitive() {
        let store = catalog();
        let lower: Vec<String> = store.by_category("science").into_iter().map(|q| q.id).collect();
        let upper: Vec<String> = store.by_category("SCIENCE").into_iter().map(|q| q.id).collect();
        assert_eq!(lower, upper);
        assert_eq!(lower, vec!["basic-science"]);
        assert!(store.by_category("geography").is_empty());
    }

    #[test]
    fn search_empty_query_matches_everything() {
        let store = catalog();
        assert_eq!(store.search("").len(), store.all().len());
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let store = catalog();
        let ids: Vec<String> = store.search("quiz").into_iter().map(|q| q.id).collect();
        assert_eq!(ids, vec!["basic-science", "world-history"]);
        // "mathematical" only appears in the description.
        let ids: Vec<String> = store.search("MATHEMATICAL").into_iter().map(|q| q.id).collect();
        assert_eq!(ids, vec!["basic-math"]);
        assert!(store.search("astrophysics").is_empty());
    }

    #[test]
    fn categories_are_distinct_in_catalog_order() {
        assert_eq!(catalog().categories(), vec!["Science", "History", "Math"]);
    }

    #[test]
    fn bank_quizzes_merge_ahead_of_seeds_and_invalid_entries_are_skipped() {
        let cfg: CatalogConfig = toml::from_str(
            r#"
            [[quizzes]]
            id = "geography"
            title = "Geography Quiz"
            category = "Geography"

            [[quizzes.questions]]
            text = "Capital of France?"
            options = ["Paris", "Lyon"]
            correct_answer_index = 0

            [[quizzes]]
            id = "broken"
            title = "Broken Quiz"
            category = "Test"

            [[quizzes.questions]]
            text = "?"
            options = ["only"]
            correct_answer_index = 3

            [[quizzes]]
            id = "basic-math"
            title = "Overriding Mathematics"
            category = "Math"
            "#,
        )
        .unwrap();
        let store = CatalogStore::build(Some(&cfg));

        // Bank first, then seeds; "broken" skipped; bank's basic-math wins.
        let ids: Vec<String> = store.all().into_iter().map(|q| q.id).collect();
        assert_eq!(
            ids,
            vec!["geography", "basic-math", "basic-science", "world-history"]
        );
        assert!(store.get_by_id("broken").is_none());
        assert_eq!(store.get_by_id("basic-math").unwrap().title, "Overriding Mathematics");
        // question_count defaults to the shipped question count for bank entries.
        assert_eq!(store.get_by_id("geography").unwrap().question_count, 1);
    }

    #[tokio::test]
    async fn profile_aggregates_across_submissions() {
        let ledger = SessionLedger::new();
        // Percentages 80, 60, 90 in that order.
        ledger.submit(result("basic-science", 8, 10, 1)).await;
        ledger.submit(result("world-history", 6, 10, 2)).await;
        let profile = ledger.submit(result("basic-math", 9, 10, 3)).await;

        assert_eq!(profile.completed_quizzes, 3);
        assert_eq!(profile.best_score, 90);
        assert_eq!(profile.total_score, 8 + 6 + 9);
        // Best score is a running max, not "latest".
        let profile = ledger.submit(result("basic-math", 1, 10, 4)).await;
        assert_eq!(profile.best_score, 90);
    }

    #[tokio::test]
    async fn recent_results_orders_by_completion_then_submission() {
        let ledger = SessionLedger::new();
        ledger.submit(result("a", 1, 10, 100)).await;
        ledger.submit(result("b", 2, 10, 300)).await;
        ledger.submit(result("c", 3, 10, 200)).await;
        // Tie on completed_at with "c": most recent submission wins.
        ledger.submit(result("d", 4, 10, 200)).await;

        let recent: Vec<String> = ledger
            .recent_results(2)
            .await
            .into_iter()
            .map(|r| r.quiz_id)
            .collect();
        assert_eq!(recent, vec!["b", "d"]);

        let all: Vec<String> = ledger
            .recent_results(10)
            .await
            .into_iter()
            .map(|r| r.quiz_id)
            .collect();
        assert_eq!(all, vec!["b", "d", "c", "a"]);

        assert!(ledger.recent_results(0).await.is_empty());
    }

    #[tokio::test]
    async fn degenerate_result_counts_as_zero_percent() {
        let ledger = SessionLedger::new();
        let profile = ledger.submit(result("vanished-quiz", 5, 0, 1)).await;
        assert_eq!(profile.completed_quizzes, 1);
        assert_eq!(profile.best_score, 0);
        assert_eq!(profile.total_score, 5);
    }

    #[tokio::test]
    async fn profile_rederives_from_full_history() {
        let ledger = SessionLedger::new();
        for (i, (score, total)) in [(8u32, 10u32), (6, 10), (5, 0), (9, 10), (0, 4)]
            .into_iter()
            .enumerate()
        {
            ledger.submit(result("q", score, total, i as i64)).await;
        }

        let history = ledger.recent_results(usize::MAX).await;
        let from_scratch = history.iter().fold((0u32, 0u32, 0u64), |acc, r| {
            (acc.0 + 1, acc.1.max(r.percentage()), acc.2 + u64::from(r.score))
        });

        let profile = ledger.profile().await;
        assert_eq!(profile.completed_quizzes, from_scratch.0);
        assert_eq!(profile.best_score, from_scratch.1);
        assert_eq!(profile.total_score, from_scratch.2);
    }

    #[tokio::test]
    async fn concurrent_submissions_are_not_lost() {
        let ledger = SessionLedger::new();
        let mut handles = Vec::new();
        for i in 0..32u32 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger.submit(result("race", i % 5, 10, i as i64)).await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let profile = ledger.profile().await;
        assert_eq!(profile.completed_quizzes, 32);
        let expected_total: u64 = (0..32u32).map(|i| u64::from(i % 5)).sum();
        assert_eq!(profile.total_score, expected_total);
        assert_eq!(profile.best_score, 40); // 4 of 10
        assert_eq!(ledger.recent_results(usize::MAX).await.len(), 32);
    }

    #[tokio::test]
    async fn subscribers_observe_updates_in_submission_order() {
        let ledger = SessionLedger::new();
        let mut rx = ledger.subscribe();

        ledger.submit(result("a", 8, 10, 1)).await;
        ledger.submit(result("b", 6, 10, 2)).await;

        let first = rx.recv().await.unwrap();
        assert_eq!(first.result.quiz_id, "a");
        assert_eq!(first.profile.completed_quizzes, 1);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.result.quiz_id, "b");
        assert_eq!(second.profile.completed_quizzes, 2);
        assert_eq!(second.profile.best_score, 80);
    }
}
