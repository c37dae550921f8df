//! Offline queue ordering
//!
//! Reads a queue description from a JSON file, runs it through the ordering
//! engine, and prints each position with its reason. Handy for checking how
//! a meeting's settings would order a given stack without running one.
//!
//! Input file shape:
//!
//! ```json
//! {
//!   "progressive_stack": true,
//!   "invite_tags": ["new_to_group"],
//!   "recent_speakers": ["bob"],
//!   "queue": [
//!     { "user": "alice", "kind": "HAND", "tags": ["new_to_group"] },
//!     { "user": "bob", "kind": "HAND", "offset_sec": 5 },
//!     { "user": "charlie", "kind": "DIRECT_RESPONSE", "offset_sec": 10 }
//!   ]
//! }
//! ```

use crate::commands::OrderArgs;
use anyhow::{Context, Result};
use chrono::Duration;
use serde::Deserialize;
use stackline_application::Clock;
use stackline_domain::{
    ordering_reason, MeetingId, MeetingSettings, QueueItem, QueueItemKind, StackOrdering, UserId,
};
use stackline_infrastructure::{StacklineConfig, SystemClock};
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Deserialize)]
#[serde(default)]
struct StackFile {
    progressive_stack: Option<bool>,
    invite_tags: Option<Vec<String>>,
    recent_speakers: Vec<String>,
    queue: Vec<StackRequest>,
}

impl Default for StackFile {
    fn default() -> Self {
        Self {
            progressive_stack: None,
            invite_tags: None,
            recent_speakers: Vec::new(),
            queue: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StackRequest {
    user: String,
    kind: QueueItemKind,
    #[serde(default)]
    tags: BTreeSet<String>,
    /// Seconds after the first request that this one was raised.
    #[serde(default)]
    offset_sec: i64,
}

pub fn run(args: OrderArgs, config: &StacklineConfig) -> Result<()> {
    let contents = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let file: StackFile = serde_json::from_str(&contents)
        .with_context(|| format!("parsing {}", args.file.display()))?;

    // File-level settings override the configured meeting defaults
    let mut settings: MeetingSettings = config.meeting.to_settings();
    if let Some(progressive) = file.progressive_stack {
        settings.progressive_stack = progressive;
    }
    if let Some(tags) = file.invite_tags {
        settings.invite_tags = tags.into_iter().collect();
    }

    let mut users = NameDirectory::new();
    let recent: HashSet<UserId> = file
        .recent_speakers
        .iter()
        .map(|name| users.id_for(name))
        .collect();

    let meeting = MeetingId::generate();
    let base = SystemClock.now();
    let items: Vec<QueueItem> = file
        .queue
        .iter()
        .map(|request| {
            QueueItem::new(
                meeting,
                users.id_for(&request.user),
                request.kind,
                request.tags.clone(),
                base + Duration::seconds(request.offset_sec),
            )
        })
        .collect();

    let ordering = StackOrdering::new(&settings, &recent);
    for (index, item) in ordering.sort(items).into_iter().enumerate() {
        println!(
            "{:>2}. {:<12} {:<24} {}",
            index + 1,
            users.name_of(item.user_id),
            format!("({})", item.kind),
            ordering_reason(&item, &settings, &recent)
        );
    }
    Ok(())
}

/// Two-way mapping between file names and generated user ids.
struct NameDirectory {
    ids: HashMap<String, UserId>,
    names: HashMap<UserId, String>,
}

impl NameDirectory {
    fn new() -> Self {
        Self {
            ids: HashMap::new(),
            names: HashMap::new(),
        }
    }

    fn id_for(&mut self, name: &str) -> UserId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = UserId::generate();
        self.ids.insert(name.to_string(), id);
        self.names.insert(id, name.to_string());
        id
    }

    fn name_of(&self, id: UserId) -> &str {
        self.names.get(&id).map(String::as_str).unwrap_or("?")
    }
}
