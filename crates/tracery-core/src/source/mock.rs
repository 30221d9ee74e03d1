use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::types::SourceRow;

use super::LedgerSource;

/// A scripted reply for one `run_query` call.
pub(crate) enum MockReply {
    Rows(Vec<SourceRow>),
    Transport,
    Server(u16),
    /// Never resolves; exercises the fetcher's per-attempt timeout.
    Hang,
}

/// A mock query source for testing. Replays a scripted sequence of replies
/// populated via the builder pattern and counts how often it was called.
pub(crate) struct MockSource {
    script: Mutex<VecDeque<MockReply>>,
    calls: AtomicUsize,
}

impl MockSource {
    pub(crate) fn builder() -> MockSourceBuilder {
        MockSourceBuilder {
            script: VecDeque::new(),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub(crate) struct MockSourceBuilder {
    script: VecDeque<MockReply>,
}

impl MockSourceBuilder {
    pub(crate) fn reply(mut self, reply: MockReply) -> Self {
        self.script.push_back(reply);
        self
    }

    pub(crate) fn rows(self, rows: Vec<SourceRow>) -> Self {
        self.reply(MockReply::Rows(rows))
    }

    pub(crate) fn transport_error(self) -> Self {
        self.reply(MockReply::Transport)
    }

    pub(crate) fn server_error(self, status: u16) -> Self {
        self.reply(MockReply::Server(status))
    }

    pub(crate) fn build(self) -> MockSource {
        MockSource {
            script: Mutex::new(self.script),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LedgerSource for MockSource {
    async fn run_query(&self, _sql: &str) -> Result<Vec<SourceRow>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .script
            .lock()
            .expect("mock script lock is never poisoned")
            .pop_front();

        match reply {
            Some(MockReply::Rows(rows)) => Ok(rows),
            Some(MockReply::Transport) => {
                Err(SourceError::Transport("connection reset by peer".into()))
            }
            Some(MockReply::Server(status)) => Err(SourceError::Server {
                status,
                message: "scripted server error".into(),
            }),
            Some(MockReply::Hang) => {
                std::future::pending::<()>().await;
                unreachable!("pending future never resolves")
            }
            // A well-scripted test never reaches past the end of the script;
            // failing permanently here makes an overrun visible immediately.
            None => Err(SourceError::InvalidResponse(
                "mock script exhausted".into(),
            )),
        }
    }
}
