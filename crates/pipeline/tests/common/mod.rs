#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ethix_core::prompt::Prompt;
use ethix_db::InMemoryCompanyStore;
use ethix_llm::{CompletionClient, ModelError};
use ethix_pipeline::{RetryPolicy, ScoringPipeline};

/// One scripted model outcome.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Unavailable,
    Quota,
}

impl Reply {
    pub fn text(s: &str) -> Self {
        Reply::Text(s.to_string())
    }
}

/// A [`CompletionClient`] that answers from a per-company script.
///
/// Replies are keyed by company name. Each call pops the next reply; the
/// last one repeats. Companies without a script get the default reply.
pub struct ScriptedModel {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    default: Reply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedModel {
    pub fn new(default: Reply) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            default,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn script(self, company_name: &str, replies: Vec<Reply>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(company_name.to_string(), replies.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_reply(&self, prompt: &Prompt) -> Reply {
        let mut scripts = self.scripts.lock().unwrap();
        let entry = scripts
            .iter_mut()
            .find(|(name, _)| prompt.user.starts_with(&format!("Company name: {name}.")));
        match entry {
            Some((_, queue)) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some((_, queue)) => queue.front().cloned().unwrap_or_else(|| self.default.clone()),
            None => self.default.clone(),
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedModel {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.clone());
        match self.next_reply(prompt) {
            Reply::Text(text) => Ok(text),
            Reply::Unavailable => Err(ModelError::Unavailable("scripted outage".into())),
            Reply::Quota => Err(ModelError::QuotaExceeded("scripted quota".into())),
        }
    }
}

/// Retry policy with negligible delays.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 2,
        base_delay: std::time::Duration::from_millis(1),
    }
}

pub fn pipeline(store: Arc<InMemoryCompanyStore>, model: Arc<ScriptedModel>) -> ScoringPipeline {
    ScoringPipeline::new(store, model).with_retry(fast_retry())
}
