//! Decision Recorder
//!
//! Sequence-numbered decision bookkeeping: the latest record per agent, a
//! bounded ring of one-line summaries and optional append-only JSONL output.

use std::collections::{BTreeMap, VecDeque};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use npc_types::{generate_decision_id, AiDebugSnapshot, DecisionRecord, DecisionResult, NpcContext};

use crate::config::RecorderConfig;
use crate::error::BrainError;

/// Records decisions for any number of agents.
pub struct DecisionRecorder {
    writer: Option<BufWriter<File>>,
    next_sequence: u64,
    latest: BTreeMap<String, DecisionRecord>,
    recent: VecDeque<String>,
    recent_capacity: usize,
}

impl DecisionRecorder {
    /// Creates a recorder that keeps records in memory only.
    pub fn new(recent_capacity: usize) -> Self {
        Self {
            writer: None,
            next_sequence: 1,
            latest: BTreeMap::new(),
            recent: VecDeque::with_capacity(recent_capacity),
            recent_capacity,
        }
    }

    pub fn from_config(config: &RecorderConfig) -> Self {
        Self::new(config.recent_capacity)
    }

    /// Also appends every record as JSONL to `path`, truncating it first.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        self.writer = Some(BufWriter::new(file));
        Ok(self)
    }

    /// Number of decisions recorded so far.
    pub fn record_count(&self) -> u64 {
        self.next_sequence - 1
    }

    /// Records one decision and returns the stored record.
    pub fn record(
        &mut self,
        agent_id: &str,
        ctx: &NpcContext,
        result: &DecisionResult,
    ) -> Result<DecisionRecord, BrainError> {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let record = DecisionRecord {
            decision_id: generate_decision_id(sequence),
            sequence,
            agent_id: agent_id.to_string(),
            simulation_time_seconds: ctx.simulation_time_seconds,
            command: result.command,
            trace: result.trace.clone(),
        };

        if self.recent_capacity > 0 {
            self.recent.push_back(record.summary());
            while self.recent.len() > self.recent_capacity {
                self.recent.pop_front();
            }
        }

        if let Some(ref mut writer) = self.writer {
            writeln!(writer, "{}", record.to_jsonl()?)?;
        }

        self.latest.insert(record.agent_id.clone(), record.clone());
        Ok(record)
    }

    /// Latest record for an agent.
    pub fn latest(&self, agent_id: &str) -> Option<&DecisionRecord> {
        self.latest.get(agent_id)
    }

    /// Most recent summaries, oldest first.
    pub fn recent(&self) -> Vec<String> {
        self.recent.iter().cloned().collect()
    }

    /// Debug snapshot for one agent, if it has decided at least once.
    pub fn snapshot(&self, agent_id: &str) -> Option<AiDebugSnapshot> {
        self.latest(agent_id)
            .map(|record| AiDebugSnapshot::from_record(record, self.recent()))
    }

    /// Debug snapshot of whichever agent decided last, or an empty snapshot
    /// labelled with the given planner and policy.
    pub fn latest_snapshot(&self, planner_name: &str, policy_name: &str) -> AiDebugSnapshot {
        self.latest
            .values()
            .max_by_key(|record| record.sequence)
            .map(|record| AiDebugSnapshot::from_record(record, self.recent()))
            .unwrap_or_else(|| AiDebugSnapshot::empty(planner_name, policy_name))
    }

    /// Flush the buffer to disk
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for DecisionRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionRecorder")
            .field("writes_file", &self.writer.is_some())
            .field("next_sequence", &self.next_sequence)
            .field("agents", &self.latest.len())
            .field("recent_capacity", &self.recent_capacity)
            .finish()
    }
}

impl Drop for DecisionRecorder {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("failed to flush decision recorder: {}", e);
        }
    }
}

/// Reads context snapshots, one JSON object per line. Blank lines are skipped.
pub fn read_contexts(reader: impl BufRead) -> Result<Vec<NpcContext>, BrainError> {
    read_lines(reader, NpcContext::from_jsonl)
}

/// Reads decision records, one JSON object per line. Blank lines are skipped.
pub fn read_records(reader: impl BufRead) -> Result<Vec<DecisionRecord>, BrainError> {
    read_lines(reader, DecisionRecord::from_jsonl)
}

fn read_lines<T>(
    reader: impl BufRead,
    parse: impl Fn(&str) -> Result<T, serde_json::Error>,
) -> Result<Vec<T>, BrainError> {
    let mut items = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        items.push(parse(&line)?);
    }
    Ok(items)
}
