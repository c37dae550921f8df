//! Scripted demo meeting
//!
//! Drives a small assembly through the full facilitation flow — join by
//! PIN, stacking with points and direct responses, speaker turns, a
//! consensus proposal — and prints the ordered queue and minutes along the
//! way. Uses a manually advanced clock so two runs produce the same story.

use crate::commands::{DemoArgs, ExportArg};
use anyhow::Result;
use chrono::Duration;
use stackline_application::{
    Clock, ConsensusResolver, ExportFormat, IncidentService, ManualClock, MeetingEvent,
    MeetingEventLog, MeetingExporter, MeetingService, NoMeetingEventLog, QueueLifecycle,
    QueueView,
};
use stackline_domain::{
    IncidentStatus, MeetingId, MeetingSettings, QueueItemKind, Role, UserId, VoteType,
};
use stackline_infrastructure::{InMemoryStore, JsonlMeetingLog, KeyedLock, StacklineConfig};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

struct Demo {
    store: Arc<InMemoryStore>,
    clock: Arc<ManualClock>,
    meetings: MeetingService<InMemoryStore>,
    queue: QueueLifecycle<InMemoryStore, InMemoryStore>,
    view: QueueView<InMemoryStore, InMemoryStore>,
    consensus: ConsensusResolver<InMemoryStore, InMemoryStore>,
    incidents: IncidentService<InMemoryStore, InMemoryStore>,
    meeting_locks: KeyedLock<MeetingId>,
    events: Box<dyn MeetingEventLog>,
}

pub async fn run(args: DemoArgs, config: &StacklineConfig) -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
    let clock_dyn: Arc<dyn Clock> = clock.clone();

    let event_log_path = args.event_log.clone().or_else(|| config.event_log.clone());
    let events: Box<dyn MeetingEventLog> = match &event_log_path {
        Some(path) => match JsonlMeetingLog::new(path) {
            Some(log) => {
                info!("Writing meeting events to {}", log.path().display());
                Box::new(log)
            }
            None => Box::new(NoMeetingEventLog),
        },
        None => Box::new(NoMeetingEventLog),
    };

    let demo = Demo {
        meetings: MeetingService::new(store.clone(), clock_dyn.clone()),
        queue: QueueLifecycle::new(store.clone(), store.clone(), clock_dyn.clone()),
        view: QueueView::new(store.clone(), store.clone(), clock_dyn.clone()),
        consensus: ConsensusResolver::new(store.clone(), store.clone(), clock_dyn.clone()),
        incidents: IncidentService::new(store.clone(), store.clone(), clock_dyn),
        meeting_locks: KeyedLock::new(),
        store,
        clock,
        events,
    };

    // Configured meeting defaults, with the progressive stack forced on so
    // the demo can show it
    let mut settings = config.meeting.to_settings();
    settings.progressive_stack = true;
    settings.invite_tags.insert("new_to_group".to_string());

    demo.run_script(settings, args.export).await
}

impl Demo {
    async fn run_script(&self, settings: MeetingSettings, export: ExportArg) -> Result<()> {
        // Dana facilitates
        let dana = UserId::generate();
        let meeting = self
            .meetings
            .create("Stackline demo assembly", None, settings, dana)
            .await?;

        println!("Created meeting \"{}\" (PIN {})", meeting.title, meeting.pin);

        let mut names = NameTable::new();
        names.insert(dana, "Dana");
        let alice = self.join_named(&mut names, &meeting.pin, "Alice").await?;
        let bob = self.join_named(&mut names, &meeting.pin, "Bob").await?;
        let charlie = self.join_named(&mut names, &meeting.pin, "Charlie").await?;

        // Everyone stacks up: two hands, then a direct response that
        // queue-jumps, then a point of process that tops everything
        self.stack(meeting.id, alice, QueueItemKind::Hand, &[]).await?;
        self.clock.advance(Duration::seconds(10));
        self.stack(meeting.id, bob, QueueItemKind::Hand, &["new_to_group"])
            .await?;
        self.clock.advance(Duration::seconds(10));
        self.stack(meeting.id, charlie, QueueItemKind::DirectResponse, &[])
            .await?;
        self.clock.advance(Duration::seconds(10));
        self.stack(meeting.id, dana, QueueItemKind::PointProcess, &[])
            .await?;

        println!();
        println!("The stack after everyone joins:");
        self.print_queue(meeting.id, &names).await?;

        // Work through the first two turns
        self.next_speaker(meeting.id, dana, &names).await?;
        self.clock.advance(Duration::seconds(45));
        self.next_speaker(meeting.id, dana, &names).await?;
        self.clock.advance(Duration::seconds(90));

        println!();
        println!("After two turns (recent speakers now feed the progressive stack):");
        self.print_queue(meeting.id, &names).await?;

        // A proposal goes before the group and reaches consensus
        let proposal = self
            .consensus
            .create_proposal(
                meeting.id,
                bob,
                "Rotate facilitation every month",
                Some("Share the load and the skills.".to_string()),
            )
            .await?;
        println!();
        println!("Proposal by {}: \"{}\"", names.get(bob), proposal.title);

        for (user, vote) in [
            (dana, VoteType::Agree),
            (alice, VoteType::Agree),
            (bob, VoteType::Agree),
            (charlie, VoteType::StandAside),
        ] {
            let receipt = self
                .consensus
                .cast_vote(proposal.id, user, vote, None)
                .await?;
            println!("  {} votes {:?} (proposal now {})", names.get(user), vote, receipt.proposal_status);
            self.events.log(MeetingEvent::new(
                "vote_cast",
                meeting.id,
                serde_json::json!({ "proposal_id": proposal.id.to_string(), "vote": format!("{:?}", vote) }),
            ));
            self.clock.advance(Duration::seconds(15));
        }

        // An anonymous incident report comes in and gets triaged
        let receipt = self
            .incidents
            .report(
                meeting.id,
                charlie,
                "accessibility",
                "No captions on the shared screen.",
                false,
                true,
            )
            .await?;
        println!();
        println!("Anonymous incident report filed (status: {})", receipt.status);
        self.incidents
            .set_status(
                receipt.id,
                dana,
                IncidentStatus::Resolved,
                Some("captions enabled".to_string()),
            )
            .await?;
        let stats = self.incidents.stats(meeting.id, dana).await?;
        println!(
            "Incident stats: {} total, {} urgent, {:?}",
            stats.total, stats.urgent, stats.by_status
        );

        self.meetings.end(meeting.id, dana).await?;
        self.events.log(MeetingEvent::new(
            "meeting_ended",
            meeting.id,
            serde_json::json!({}),
        ));

        let format = match export {
            ExportArg::Markdown => ExportFormat::Markdown,
            ExportArg::Csv => ExportFormat::Csv,
        };
        let exporter = MeetingExporter::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
        );
        let minutes = exporter.export(meeting.id, format).await?;

        println!();
        println!("=== Minutes ===");
        println!("{}", minutes);
        Ok(())
    }

    async fn join_named(
        &self,
        names: &mut NameTable,
        pin: &str,
        name: &'static str,
    ) -> Result<UserId> {
        let user = UserId::generate();
        names.insert(user, name);
        let participant = self.meetings.join(pin, user, Role::Participant).await?;
        println!("{} joined as {:?}", name, participant.role);
        self.events.log(MeetingEvent::new(
            "participant_joined",
            participant.meeting_id,
            serde_json::json!({ "name": name }),
        ));
        Ok(user)
    }

    async fn stack(
        &self,
        meeting: MeetingId,
        user: UserId,
        kind: QueueItemKind,
        tags: &[&str],
    ) -> Result<()> {
        let tags: BTreeSet<String> = tags.iter().map(|t| t.to_string()).collect();
        // Queue writes are serialized per meeting
        let _guard = self.meeting_locks.acquire(meeting).await;
        let item = self.queue.join(meeting, user, kind, tags).await?;
        self.events.log(MeetingEvent::new(
            "queue_joined",
            meeting,
            serde_json::json!({ "item_id": item.id.to_string(), "kind": format!("{}", kind) }),
        ));
        Ok(())
    }

    /// Give the floor to whoever tops the stack and finish their turn.
    async fn next_speaker(
        &self,
        meeting: MeetingId,
        facilitator: UserId,
        names: &NameTable,
    ) -> Result<()> {
        let _guard = self.meeting_locks.acquire(meeting).await;
        let Some(entry) = self.view.ordered_queue(meeting).await?.into_iter().next() else {
            return Ok(());
        };

        let item = self.queue.start_speaking(entry.item.id, facilitator).await?;
        println!();
        println!("{} has the floor ({})", names.get(item.user_id), item.kind);
        self.events.log(MeetingEvent::new(
            "speaker_started",
            meeting,
            serde_json::json!({ "item_id": item.id.to_string() }),
        ));

        self.clock.advance(Duration::seconds(60));
        self.queue.end_speaking(item.id, facilitator).await?;
        self.events.log(MeetingEvent::new(
            "speaker_finished",
            meeting,
            serde_json::json!({ "item_id": item.id.to_string() }),
        ));
        Ok(())
    }

    async fn print_queue(&self, meeting: MeetingId, names: &NameTable) -> Result<()> {
        for entry in self.view.ordered_queue(meeting).await? {
            println!(
                "  {}. {:<8} {:<22} {}",
                entry.position,
                names.get(entry.item.user_id),
                format!("({})", entry.item.kind),
                entry.reason
            );
        }
        Ok(())
    }
}

/// Display names for the demo's generated user ids.
struct NameTable {
    names: std::collections::HashMap<UserId, &'static str>,
}

impl NameTable {
    fn new() -> Self {
        Self {
            names: std::collections::HashMap::new(),
        }
    }

    fn insert(&mut self, user: UserId, name: &'static str) {
        self.names.insert(user, name);
    }

    fn get(&self, user: UserId) -> &'static str {
        self.names.get(&user).copied().unwrap_or("?")
    }
}
