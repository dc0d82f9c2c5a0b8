#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
};

use listsync::{
    engine::traits::{ConfirmPrompt, RemoteSource},
    entities::fuel_card::{FuelCard, FuelCardInput},
    error::RemoteError,
    record::{ListRequest, Page, Record},
};
use tokio::{sync::oneshot, time::Duration};

pub fn card(id: u64, pan: &str, matricula: &str) -> FuelCard {
    FuelCard {
        id,
        pan: pan.to_string(),
        matricula: matricula.to_string(),
        provider: "Cepsa".to_string(),
        active: true,
    }
}

pub fn input(pan: &str, matricula: &str) -> FuelCardInput {
    FuelCardInput {
        pan: pan.to_string(),
        matricula: matricula.to_string(),
        provider: "Cepsa".to_string(),
        active: true,
    }
}

#[derive(Default)]
pub struct SourceState {
    pub records: Vec<FuelCard>,
    pub list_calls: Vec<ListRequest>,
    pub create_calls: usize,
    pub update_calls: Vec<u64>,
    pub delete_calls: Vec<u64>,
    /// Delay per list call, consumed in order; empty means no delay.
    pub list_delays: VecDeque<Duration>,
    /// Gates per list call, consumed in order; a gated call waits for its sender.
    pub list_gates: VecDeque<oneshot::Receiver<()>>,
    pub mutation_delay: Duration,
    pub fail_next_list: Option<RemoteError>,
    pub fail_next_mutation: Option<RemoteError>,
    pub next_id: u64,
}

/// In-memory backend that filters server-side with `Record::matches`.
#[derive(Clone, Default)]
pub struct FakeSource {
    state: Arc<Mutex<SourceState>>,
}

impl FakeSource {
    pub fn with_records(records: Vec<FuelCard>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let source = Self::default();
        {
            let mut state = source.state();
            state.records = records;
            state.next_id = next_id;
        }
        source
    }

    pub fn state(&self) -> MutexGuard<'_, SourceState> {
        self.state.lock().expect("source state lock")
    }

    pub fn list_calls(&self) -> Vec<ListRequest> {
        self.state().list_calls.clone()
    }

    pub fn push_list_delay(&self, delay: Duration) {
        self.state().list_delays.push_back(delay);
    }

    /// Holds the next list call until the returned sender fires.
    pub fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.state().list_gates.push_back(gate);
        release
    }
}

impl RemoteSource for FakeSource {
    type Record = FuelCard;
    type Payload = FuelCardInput;

    async fn list(&self, req: ListRequest) -> Result<Page<FuelCard>, RemoteError> {
        let (gate, delay, outcome) = {
            let mut state = self.state();
            state.list_calls.push(req.clone());
            let gate = state.list_gates.pop_front();
            let delay = state.list_delays.pop_front().unwrap_or_default();
            let outcome = match state.fail_next_list.take() {
                Some(err) => Err(err),
                None => {
                    let items: Vec<FuelCard> = state
                        .records
                        .iter()
                        .filter(|r| r.matches(&req.query))
                        .filter(|r| match req.scope.as_deref() {
                            Some(scope) => r.field_value("status").as_deref() == Some(scope),
                            None => true,
                        })
                        .cloned()
                        .collect();
                    Ok(Page::complete(items))
                }
            };
            (gate, delay, outcome)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        outcome
    }

    async fn create(&self, payload: FuelCardInput) -> Result<FuelCard, RemoteError> {
        let (delay, outcome) = {
            let mut state = self.state();
            state.create_calls += 1;
            let outcome = match state.fail_next_mutation.take() {
                Some(err) => Err(err),
                None => {
                    let id = state.next_id;
                    state.next_id += 1;
                    let rec = payload.into_record(id);
                    state.records.insert(0, rec.clone());
                    Ok(rec)
                }
            };
            (state.mutation_delay, outcome)
        };
        tokio::time::sleep(delay).await;
        outcome
    }

    async fn update(&self, id: u64, payload: FuelCardInput) -> Result<FuelCard, RemoteError> {
        let (delay, outcome) = {
            let mut state = self.state();
            state.update_calls.push(id);
            let outcome = match state.fail_next_mutation.take() {
                Some(err) => Err(err),
                None => {
                    let rec = payload.into_record(id);
                    match state.records.iter_mut().find(|r| r.id == id) {
                        Some(slot) => {
                            *slot = rec.clone();
                            Ok(rec)
                        }
                        None => Err(RemoteError::new(Some(404), Some("Not found".to_string()))),
                    }
                }
            };
            (state.mutation_delay, outcome)
        };
        tokio::time::sleep(delay).await;
        outcome
    }

    async fn delete(&self, id: u64) -> Result<(), RemoteError> {
        let (delay, outcome) = {
            let mut state = self.state();
            state.delete_calls.push(id);
            let outcome = match state.fail_next_mutation.take() {
                Some(err) => Err(err),
                None => {
                    state.records.retain(|r| r.id != id);
                    Ok(())
                }
            };
            (state.mutation_delay, outcome)
        };
        tokio::time::sleep(delay).await;
        outcome
    }
}

/// Prompt with a fixed answer that records what it was asked.
#[derive(Clone)]
pub struct RecordingPrompt {
    pub answer: bool,
    pub asked: Arc<Mutex<Vec<String>>>,
}

impl RecordingPrompt {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().expect("prompt lock").clone()
    }
}

impl ConfirmPrompt for RecordingPrompt {
    async fn confirm(&self, message: String) -> bool {
        self.asked.lock().expect("prompt lock").push(message);
        self.answer
    }
}

pub fn ids(records: &[FuelCard]) -> Vec<u64> {
    records.iter().map(|r| r.id).collect()
}
