//! In-memory session store for jobs and their screening results.
//!
//! Nothing here survives a restart. Results for a job are replaced
//! wholesale under the write lock (single-writer discipline); batches
//! carry a generation so work against a re-processed JD is discarded.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::candidate::{AnalysisFailure, CandidateRecord};
use crate::models::job::JobDescription;
use crate::screening::ranker;

struct JobEntry {
    jd: JobDescription,
    /// Bumped whenever the JD is re-processed; stale batches are dropped.
    generation: u64,
    next_seq: u64,
    /// Always kept ranked.
    records: Vec<CandidateRecord>,
    failures: Vec<AnalysisFailure>,
}

/// Snapshot handed to a batch run. Results commit only if the job's
/// generation still matches when the batch finishes.
#[derive(Clone)]
pub struct BatchTicket {
    pub jd_text: Arc<str>,
    pub keywords: Arc<[String]>,
    pub degraded: bool,
    pub generation: u64,
    pub first_seq: u64,
}

/// Everything known about one job, cloned out for the results endpoint.
pub struct JobResults {
    pub jd: JobDescription,
    pub candidates: Vec<CandidateRecord>,
    pub failures: Vec<AnalysisFailure>,
}

#[derive(Clone, Default)]
pub struct SessionStore {
    jobs: Arc<RwLock<HashMap<Uuid, JobEntry>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new job, or replaces the JD of an existing one. Replacing
    /// bumps the generation and clears previous results, so in-flight
    /// batches against the old JD cannot contaminate the new one.
    pub async fn upsert_job(&self, jd: JobDescription) -> Uuid {
        let mut jobs = self.jobs.write().await;
        let id = jd.id;
        match jobs.get_mut(&id) {
            Some(entry) => {
                entry.jd = jd;
                entry.generation += 1;
                entry.next_seq = 0;
                entry.records.clear();
                entry.failures.clear();
            }
            None => {
                jobs.insert(
                    id,
                    JobEntry {
                        jd,
                        generation: 0,
                        next_seq: 0,
                        records: Vec::new(),
                        failures: Vec::new(),
                    },
                );
            }
        }
        id
    }

    /// Snapshots the JD for a batch and reserves `count` submission-order
    /// slots starting at the returned `first_seq`.
    pub async fn begin_batch(&self, id: Uuid, count: u64) -> Option<BatchTicket> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs.get_mut(&id)?;
        let first_seq = entry.next_seq;
        entry.next_seq += count;
        Some(BatchTicket {
            jd_text: Arc::from(entry.jd.raw_text.as_str()),
            keywords: entry.jd.keywords.clone().into(),
            degraded: entry.jd.degraded_keywords,
            generation: entry.generation,
            first_seq,
        })
    }

    /// Commits a finished batch: appends its outcomes and rebuilds the
    /// ranked list wholesale. Returns false (dropping the results) when the
    /// job is gone or was re-processed since the ticket was issued.
    pub async fn commit_batch(
        &self,
        id: Uuid,
        generation: u64,
        records: Vec<CandidateRecord>,
        failures: Vec<AnalysisFailure>,
    ) -> bool {
        let mut jobs = self.jobs.write().await;
        let Some(entry) = jobs.get_mut(&id) else {
            return false;
        };
        if entry.generation != generation {
            return false;
        }
        entry.records.extend(records);
        entry.records = ranker::rank(std::mem::take(&mut entry.records));
        entry.failures.extend(failures);
        true
    }

    pub async fn results(&self, id: Uuid) -> Option<JobResults> {
        let jobs = self.jobs.read().await;
        jobs.get(&id).map(|entry| JobResults {
            jd: entry.jd.clone(),
            candidates: entry.records.clone(),
            failures: entry.failures.clone(),
        })
    }
}
