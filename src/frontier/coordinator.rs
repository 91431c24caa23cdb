// src/frontier/coordinator.rs
// =============================================================================
// A single task that owns all frontier state while workers fetch pages.
//
// Workers never touch the Frontier or SectionOrder directly. Instead they
// send a Command over a channel and wait for the reply:
//
//   worker                        coordinator task
//   ------                        ----------------
//   next()      --Next-->         dequeue, mark visited, count toward limit
//               <--lease--
//   (fetch the page)
//   complete()  --Complete-->     settle the redirect target, and for a new
//               <--completion--   page enqueue its links at depth + 1
//   classify()  --Classify-->     assign section/page numbers
//               <--numbers--
//
// Because only one task ever mutates the frontier, the "never queued twice"
// and "never revisited" rules hold without any locks.
//
// Every handed-out URL is wrapped in a Lease. The lease must be completed
// (fetch succeeded) or released (fetch failed). A lease dropped without
// either, e.g. because its worker panicked, releases itself, so the other
// workers are never left waiting on a fetch that will not finish.
//
// When to stop:
// - once `limit` URLs have been handed out, or
// - once the queue is empty AND no fetch is still in flight
// If the queue is empty but another worker is still fetching, a next()
// request is parked: that fetch may discover more links.
//
// Rust concepts:
// - mpsc channel: many senders (workers), one receiver (coordinator)
// - oneshot channel: carries exactly one reply back to the caller
// =============================================================================

use super::normalize::NormalizedUrl;
use super::order::SectionOrder;
use super::queue::{Completion, Frontier, FrontierEntry};
use crate::error::CoordinatorError;
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Capacity of the command channel. Workers wait for replies anyway, so
/// this only needs to cover one command per worker.
const COMMAND_BUFFER: usize = 64;

/// Snapshot of frontier counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrontierStats {
    /// URLs still waiting in the queue
    pub pending: usize,
    /// URLs marked visited (handed out, plus redirect targets)
    pub visited: usize,
    /// URLs handed out to workers, counted against the limit
    pub dispatched: usize,
}

enum Command {
    Next(oneshot::Sender<Option<FrontierEntry>>),
    Complete {
        url: NormalizedUrl,
        depth: usize,
        final_url: String,
        discovered: Vec<String>,
        reply: oneshot::Sender<Completion>,
    },
    Release,
    Classify {
        section: String,
        url: NormalizedUrl,
        reply: oneshot::Sender<(usize, usize)>,
    },
    Stats(oneshot::Sender<FrontierStats>),
}

/// Cheap, cloneable way for workers to reach the coordinator.
#[derive(Debug, Clone)]
pub struct FrontierHandle {
    tx: mpsc::Sender<Command>,
}

impl FrontierHandle {
    /// Asks for the next URL to fetch.
    ///
    /// Returns Ok(None) when the crawl is over for this worker.
    pub async fn next(&self) -> Result<Option<Lease>, CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Next(reply)).await?;
        let entry = rx.await.map_err(|_| CoordinatorError::Closed)?;

        Ok(entry.map(|entry| Lease {
            entry,
            handle: self.clone(),
            settled: false,
        }))
    }

    /// Returns (section number, page number) for a fetched page.
    pub async fn classify(
        &self,
        section: &str,
        url: &NormalizedUrl,
    ) -> Result<(usize, usize), CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Classify {
            section: section.to_string(),
            url: url.clone(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| CoordinatorError::Closed)
    }

    pub async fn stats(&self) -> Result<FrontierStats, CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Stats(reply)).await?;
        rx.await.map_err(|_| CoordinatorError::Closed)
    }

    async fn send(&self, command: Command) -> Result<(), CoordinatorError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| CoordinatorError::Closed)
    }
}

/// A URL handed out to one worker, in flight until it is settled.
#[derive(Debug)]
pub struct Lease {
    entry: FrontierEntry,
    handle: FrontierHandle,
    settled: bool,
}

impl Lease {
    pub fn entry(&self) -> &FrontierEntry {
        &self.entry
    }

    /// Reports a successful fetch.
    ///
    /// `final_url` is where redirects ended up, `discovered` are the raw
    /// links found on the page. The links are only followed when the reply
    /// is Completion::New.
    pub async fn complete(
        mut self,
        final_url: &str,
        discovered: Vec<String>,
    ) -> Result<Completion, CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.handle
            .send(Command::Complete {
                url: self.entry.url.clone(),
                depth: self.entry.depth,
                final_url: final_url.to_string(),
                discovered,
                reply,
            })
            .await?;
        self.settled = true;
        rx.await.map_err(|_| CoordinatorError::Closed)
    }

    /// Reports a failed fetch: nothing was found, but it is no longer in flight.
    pub async fn release(mut self) -> Result<(), CoordinatorError> {
        self.handle.send(Command::Release).await?;
        self.settled = true;
        Ok(())
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        debug!(url = %self.entry.url, "lease dropped before it was settled");
        // Drop cannot await, so only fall back to a task when the channel is full
        if let Err(TrySendError::Full(command)) = self.handle.tx.try_send(Command::Release) {
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                let tx = self.handle.tx.clone();
                runtime.spawn(async move {
                    let _ = tx.send(command).await;
                });
            }
        }
    }
}

// Moves the frontier into a new coordinator task
//
// Parameters:
//   frontier: the seeded frontier (the task becomes its only owner)
//   limit: how many URLs may be handed out in total
//
// Returns: a handle for workers, and the task itself. The task runs until
// every FrontierHandle (and every Lease) has been dropped, then returns
// the final counters.
pub fn spawn_coordinator(
    frontier: Frontier,
    limit: usize,
) -> (FrontierHandle, JoinHandle<FrontierStats>) {
    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let coordinator = Coordinator {
        frontier,
        order: SectionOrder::new(),
        limit,
        dispatched: 0,
        in_flight: 0,
        waiting: VecDeque::new(),
    };

    let task = tokio::spawn(coordinator.run(rx));
    (FrontierHandle { tx }, task)
}

struct Coordinator {
    frontier: Frontier,
    order: SectionOrder,
    limit: usize,
    dispatched: usize,
    in_flight: usize,
    waiting: VecDeque<oneshot::Sender<Option<FrontierEntry>>>,
}

impl Coordinator {
    async fn run(mut self, mut rx: mpsc::Receiver<Command>) -> FrontierStats {
        while let Some(command) = rx.recv().await {
            self.handle(command);
        }
        self.stats()
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Next(reply) => {
                self.waiting.push_back(reply);
                self.serve_waiting();
            }
            Command::Complete {
                url,
                depth,
                final_url,
                discovered,
                reply,
            } => {
                self.in_flight = self.in_flight.saturating_sub(1);

                let completion = self.frontier.settle(&url, &final_url);
                if completion == Completion::New {
                    let offered = discovered.len();
                    let queued = discovered
                        .iter()
                        .filter(|link| self.frontier.enqueue_at(link, depth + 1))
                        .count();
                    debug!(offered, queued, pending = self.frontier.len(), "links reported");
                }

                let _ = reply.send(completion);
                self.serve_waiting();
            }
            Command::Release => {
                self.in_flight = self.in_flight.saturating_sub(1);
                self.serve_waiting();
            }
            Command::Classify {
                section,
                url,
                reply,
            } => {
                let section_number = self.order.section_number(&section);
                let page_number = self.order.page_number(&section, &url);
                let _ = reply.send((section_number, page_number));
            }
            Command::Stats(reply) => {
                let _ = reply.send(self.stats());
            }
        }
    }

    // Answers as many parked next() requests as possible.
    fn serve_waiting(&mut self) {
        while !self.waiting.is_empty() {
            if let Some(entry) = self.take_next() {
                let Some(reply) = self.waiting.pop_front() else {
                    break;
                };
                if reply.send(Some(entry)).is_err() {
                    warn!("worker went away before receiving its URL");
                    self.in_flight = self.in_flight.saturating_sub(1);
                }
            } else if self.is_exhausted() {
                for reply in self.waiting.drain(..) {
                    let _ = reply.send(None);
                }
            } else {
                // queue is empty but a fetch in flight may still add links
                break;
            }
        }
    }

    fn take_next(&mut self) -> Option<FrontierEntry> {
        if self.dispatched >= self.limit {
            return None;
        }

        let entry = self.frontier.dequeue_next()?;
        self.frontier.mark_visited_url(entry.url.clone());
        self.dispatched += 1;
        self.in_flight += 1;
        Some(entry)
    }

    fn is_exhausted(&self) -> bool {
        self.dispatched >= self.limit || (!self.frontier.has_pending() && self.in_flight == 0)
    }

    fn stats(&self) -> FrontierStats {
        FrontierStats {
            pending: self.frontier.len(),
            visited: self.frontier.visited_count(),
            dispatched: self.dispatched,
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not Arc<Mutex<Frontier>>?
//    - It would work, but every worker would need to remember to lock,
//      check, and update in the right order
//    - With one owner, every rule about the frontier lives in one place
//      (Coordinator::handle) and runs one command at a time
//
// 2. What happens when a oneshot receiver is gone?
//    - send() returns Err with the value we tried to send
//    - For replies nobody is waiting for, we just ignore it (let _ = ...)
//
// 3. When does the coordinator task end?
//    - rx.recv() returns None once every Sender (every FrontierHandle
//      clone) has been dropped
//    - That is the signal that no worker can ask for anything anymore
// -----------------------------------------------------------------------------
