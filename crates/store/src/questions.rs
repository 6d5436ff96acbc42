//! Typed store for reflective questions.
//!
//! Generation renders the two templates for a year and writes them through;
//! the pure rendering lives in `memoir_core::prompts`, so this module owns
//! only ids and persistence. Answers are partial updates that set all three
//! answer fields at once, keeping the answered/answer invariant.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tokio::sync::watch;

use memoir_core::prompts;
use memoir_core::question::{self, AiQuestion};

use crate::document::{Collection, Document, DocumentStore, Snapshot};
use crate::error::StoreError;
use crate::id::TickIdFactory;

/// Question operations over a [`DocumentStore`] backend.
#[derive(Clone)]
pub struct QuestionStore {
    store: Arc<dyn DocumentStore>,
    ids: Arc<TickIdFactory>,
}

impl QuestionStore {
    pub fn new(store: Arc<dyn DocumentStore>, ids: Arc<TickIdFactory>) -> Self {
        Self { store, ids }
    }

    /// Render and persist the two questions for a year, unanswered.
    ///
    /// The pair shares one id base with `a`/`b` suffixes; the base comes
    /// from the monotonic tick factory, so repeated generation within the
    /// same millisecond still yields distinct ids.
    pub async fn generate_for_year(
        &self,
        owner: &str,
        year: i32,
    ) -> Result<Vec<AiQuestion>, StoreError> {
        let [first, second] = prompts::questions_for_year(year);
        let (first_id, second_id) = self.ids.next_suffixed_pair();

        let mut written = Vec::with_capacity(prompts::QUESTIONS_PER_YEAR);
        for (id, prompt) in [(first_id, first), (second_id, second)] {
            let data = serde_json::to_value(AiQuestion {
                id: id.clone(),
                question: prompt.question,
                related_entry: None,
                kind: prompt.kind,
                answered: false,
                answer: None,
                answered_at: None,
            })?;
            let document = self
                .store
                .put(owner, Collection::AiQuestions, &id, data)
                .await?;
            written.push(question_from_document(document)?);
        }

        tracing::info!(owner = %owner, year, "reflective questions generated");
        Ok(written)
    }

    /// Record an answer via a partial update.
    ///
    /// Blank text is rejected before any store call. Answering an already
    /// answered question overwrites the previous answer.
    pub async fn answer(
        &self,
        owner: &str,
        question_id: &str,
        content: &str,
    ) -> Result<AiQuestion, StoreError> {
        question::validate_answer(content).map_err(StoreError::Validation)?;

        let patch = json!({
            "answered": true,
            "answer": content,
            "answered_at": Utc::now(),
        });
        let document = self
            .store
            .merge(owner, Collection::AiQuestions, question_id, patch)
            .await?;

        tracing::info!(owner = %owner, question_id = %question_id, "question answered");
        question_from_document(document)
    }

    /// All questions for an owner, oldest generation first (ids are ticks).
    pub async fn list(&self, owner: &str) -> Result<Vec<AiQuestion>, StoreError> {
        let snapshot = self.store.list(owner, Collection::AiQuestions).await?;
        snapshot.into_iter().map(question_from_document).collect()
    }

    /// Live subscription to the owner's questions.
    pub async fn subscribe(&self, owner: &str) -> Result<watch::Receiver<Snapshot>, StoreError> {
        self.store.watch(owner, Collection::AiQuestions).await
    }
}

/// Decode a stored document into an [`AiQuestion`]; the document id wins.
pub fn question_from_document(document: Document) -> Result<AiQuestion, StoreError> {
    let mut question: AiQuestion = serde_json::from_value(document.data)?;
    question.id = document.id;
    Ok(question)
}

/// Decode a watch snapshot, skipping documents that no longer parse.
pub fn questions_from_snapshot(snapshot: &Snapshot) -> Vec<AiQuestion> {
    snapshot
        .iter()
        .filter_map(|document| match question_from_document(document.clone()) {
            Ok(question) => Some(question),
            Err(err) => {
                tracing::warn!(document_id = %document.id, error = %err, "skipping malformed question document");
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use assert_matches::assert_matches;
    use std::collections::HashSet;

    const OWNER: &str = "user-1";

    fn question_store() -> QuestionStore {
        QuestionStore::new(
            Arc::new(MemoryStore::new()),
            Arc::new(TickIdFactory::new()),
        )
    }

    #[tokio::test]
    async fn generate_writes_two_pending_questions() {
        let store = question_store();
        let questions = store.generate_for_year(OWNER, 2015).await.unwrap();

        assert_eq!(questions.len(), 2);
        for q in &questions {
            assert!(!q.answered);
            assert!(q.answer.is_none());
            assert!(q.answered_at.is_none());
            assert!(q.question.contains("2015"));
        }
        assert_eq!(store.list(OWNER).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn generated_pair_shares_a_base_with_distinct_suffixes() {
        let store = question_store();
        let questions = store.generate_for_year(OWNER, 2015).await.unwrap();

        let a = &questions[0].id;
        let b = &questions[1].id;
        assert!(a.ends_with('a'));
        assert!(b.ends_with('b'));
        assert_eq!(a[..a.len() - 1], b[..b.len() - 1]);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn back_to_back_generations_never_collide() {
        let store = question_store();
        // Two calls land in the same millisecond; ids must still differ.
        let first = store.generate_for_year(OWNER, 2015).await.unwrap();
        let second = store.generate_for_year(OWNER, 2015).await.unwrap();

        let ids: HashSet<String> = first
            .iter()
            .chain(second.iter())
            .map(|q| q.id.clone())
            .collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(store.list(OWNER).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn answer_sets_all_three_answer_fields() {
        let store = question_store();
        let questions = store.generate_for_year(OWNER, 2015).await.unwrap();

        let answered = store
            .answer(OWNER, &questions[0].id, "It was the year we moved.")
            .await
            .unwrap();

        assert!(answered.answered);
        assert_eq!(answered.answer.as_deref(), Some("It was the year we moved."));
        assert!(answered.answered_at.is_some());
        assert_eq!(answered.question, questions[0].question);
    }

    #[tokio::test]
    async fn answer_leaves_the_other_question_untouched() {
        let store = question_store();
        let questions = store.generate_for_year(OWNER, 2015).await.unwrap();
        store
            .answer(OWNER, &questions[0].id, "An answer.")
            .await
            .unwrap();

        let all = store.list(OWNER).await.unwrap();
        let other = all.iter().find(|q| q.id == questions[1].id).unwrap();
        assert!(!other.answered);
        assert!(other.answer.is_none());
    }

    #[tokio::test]
    async fn blank_answer_writes_nothing() {
        let store = question_store();
        let questions = store.generate_for_year(OWNER, 2015).await.unwrap();

        let result = store.answer(OWNER, &questions[0].id, "   ").await;
        assert_matches!(result, Err(StoreError::Validation(_)));

        let all = store.list(OWNER).await.unwrap();
        assert!(all.iter().all(|q| !q.answered));
    }

    #[tokio::test]
    async fn answering_a_missing_question_is_not_found() {
        let store = question_store();
        let result = store.answer(OWNER, "ghost", "An answer.").await;
        assert_matches!(
            result,
            Err(StoreError::NotFound { entity: "question", .. })
        );
    }

    #[tokio::test]
    async fn answering_twice_silently_overwrites() {
        let store = question_store();
        let questions = store.generate_for_year(OWNER, 2015).await.unwrap();
        store.answer(OWNER, &questions[0].id, "First take.").await.unwrap();

        let again = store
            .answer(OWNER, &questions[0].id, "Second take.")
            .await
            .unwrap();
        assert!(again.answered);
        assert_eq!(again.answer.as_deref(), Some("Second take."));
    }

    #[tokio::test]
    async fn subscribe_re_emits_after_generation() {
        let store = question_store();
        let mut rx = store.subscribe(OWNER).await.unwrap();

        store.generate_for_year(OWNER, 1999).await.unwrap();
        rx.changed().await.unwrap();

        let questions = questions_from_snapshot(&rx.borrow_and_update());
        assert_eq!(questions.len(), 2);
    }
}
