/*!
 * Mock backend implementations for testing.
 *
 * This module provides a mock translation backend that simulates different behaviors:
 * - `MockBackend::scripted(...)` - returns pre-seeded responses in order
 * - `MockBackend::echoing()` - translates each payload line mechanically
 * - `MockBackend::failing(...)` - always fails with a provider error
 * - `MockBackend::flaky_start(n)` - fails the first n calls, then echoes
 */

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::translation::core::TranslationBackend;

/// Behavior mode for the mock backend
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Pop pre-seeded responses in order; fails when the script runs dry
    Scripted,
    /// Translate every payload line mechanically, preserving line count
    Echoing,
    /// Always fail with the given message
    Failing { message: String },
    /// Fail the first `failures` calls, echo afterwards
    FlakyStart { failures: usize },
}

/// Mock backend for testing the batch pipeline without network access
#[derive(Debug)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Scripted responses, popped front to back
    script: StdMutex<VecDeque<String>>,
    /// Payload and target language of every call, in call order
    calls: StdMutex<Vec<(String, String)>>,
    /// Number of calls received
    call_count: AtomicUsize,
}

impl MockBackend {
    /// Create a new mock backend with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            script: StdMutex::new(VecDeque::new()),
            calls: StdMutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Create a mock that returns the given responses in order
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::new(MockBehavior::Scripted);
        {
            let mut script = mock.script.lock().unwrap();
            script.extend(responses.into_iter().map(Into::into));
        }
        mock
    }

    /// Create a mock that echoes every payload line as a translation
    pub fn echoing() -> Self {
        Self::new(MockBehavior::Echoing)
    }

    /// Create a failing mock that always errors with the given message
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockBehavior::Failing { message: message.into() })
    }

    /// Create a mock that fails the first `failures` calls, then echoes
    pub fn flaky_start(failures: usize) -> Self {
        Self::new(MockBehavior::FlakyStart { failures })
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Payloads received so far, in call order
    pub fn recorded_payloads(&self) -> Vec<String> {
        self.calls.lock().unwrap()
            .iter()
            .map(|(payload, _)| payload.clone())
            .collect()
    }

    /// Target languages received so far, in call order
    pub fn recorded_languages(&self) -> Vec<String> {
        self.calls.lock().unwrap()
            .iter()
            .map(|(_, language)| language.clone())
            .collect()
    }

    /// Mechanical per-line translation that preserves the line count
    fn echo(payload: &str, target_language: &str) -> String {
        payload.lines()
            .map(|line| format!("[TRANSLATED to {}] {}", target_language, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn translate_payload(&self, payload: &str, target_language: &str) -> Result<String, ProviderError> {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);
        {
            let mut calls = self.calls.lock().unwrap();
            calls.push((payload.to_string(), target_language.to_string()));
        }

        match &self.behavior {
            MockBehavior::Scripted => {
                self.script.lock().unwrap()
                    .pop_front()
                    .ok_or_else(|| ProviderError::RequestFailed("mock script exhausted".to_string()))
            }

            MockBehavior::Echoing => Ok(Self::echo(payload, target_language)),

            MockBehavior::Failing { message } => Err(ProviderError::ApiError {
                status_code: 500,
                message: message.clone(),
            }),

            MockBehavior::FlakyStart { failures } => {
                if count < *failures {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated transient failure (request #{})", count + 1),
                    })
                } else {
                    Ok(Self::echo(payload, target_language))
                }
            }
        }
    }
}
