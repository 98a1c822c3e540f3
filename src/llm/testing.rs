//! In-process completion fakes for unit tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{CompletionService, SafetySetting};
use crate::composer::prompt::QUESTION_LABEL;
use crate::constants::messages::NOT_FOUND;
use crate::data::market::MarketRecord;
use crate::error::LlmError;

pub(crate) enum Behaviour {
    Reply(String),
    Fail,
    /// Answers like a well-behaved model would for these records
    MatchRecords(Vec<MarketRecord>),
}

pub(crate) struct FakeCompletion {
    behaviour: Behaviour,
    calls: AtomicUsize,
    pub last_prompt: Mutex<Option<String>>,
    pub last_safety: Mutex<Vec<SafetySetting>>,
}

impl FakeCompletion {
    pub fn new(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_safety: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub(crate) fn question_of(prompt: &str) -> String {
    prompt
        .lines()
        .find_map(|line| line.strip_prefix(QUESTION_LABEL))
        .map(|q| q.trim_matches('"').to_string())
        .unwrap_or_default()
}

pub(crate) fn answer_for(question: &str, records: &[MarketRecord]) -> String {
    let question = question.to_lowercase();
    let hit = |field: &Option<crate::data::FieldValue>| {
        field
            .as_ref()
            .map(|v| v.to_string().to_lowercase())
            .filter(|v| !v.is_empty())
            .map(|v| question.contains(&v))
            .unwrap_or(false)
    };

    records
        .iter()
        .find(|r| hit(&r.kod) || hit(&r.aciklama))
        .map(MarketRecord::render)
        .unwrap_or_else(|| NOT_FOUND.to_string())
}

#[async_trait]
impl CompletionService for FakeCompletion {
    fn name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, prompt: &str, safety: &[SafetySetting]) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        *self.last_safety.lock().unwrap() = safety.to_vec();

        match &self.behaviour {
            Behaviour::Reply(text) => Ok(text.clone()),
            Behaviour::Fail => Err(LlmError::Http {
                status: 500,
                body: "upstream exploded".to_string(),
            }),
            Behaviour::MatchRecords(records) => Ok(answer_for(&question_of(prompt), records)),
        }
    }
}
