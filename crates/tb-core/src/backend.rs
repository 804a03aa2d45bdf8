use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::BackendError;

/// Text-in, text-out reasoning engine. One blocking call per request, no retries.
pub trait ReasoningBackend {
    /// `system_prompt` may be empty, meaning "no system instruction".
    fn complete(&self, user_prompt: &str, system_prompt: &str) -> Result<String, BackendError>;
}

impl<B: ReasoningBackend + ?Sized> ReasoningBackend for &B {
    fn complete(&self, user_prompt: &str, system_prompt: &str) -> Result<String, BackendError> {
        (**self).complete(user_prompt, system_prompt)
    }
}

/// One recorded request to a [`ScriptedBackend`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub user_prompt: String,
    pub system_prompt: String,
}

/// Fake backend that replays queued responses in order and records every call.
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a failure after the responses already scripted.
    pub fn then_fail(self, message: &str) -> Self {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Err(message.to_string()));
        }
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().map(|q| q.len()).unwrap_or_default()
    }
}

impl ReasoningBackend for ScriptedBackend {
    fn complete(&self, user_prompt: &str, system_prompt: &str) -> Result<String, BackendError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(Call {
                user_prompt: user_prompt.to_string(),
                system_prompt: system_prompt.to_string(),
            });
        }
        let next = self
            .responses
            .lock()
            .map_err(|_| BackendError::Script("response queue poisoned".to_string()))?
            .pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(BackendError::Script(message)),
            None => Err(BackendError::Script("no scripted response left".to_string())),
        }
    }
}
