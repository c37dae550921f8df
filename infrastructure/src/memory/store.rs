//! In-memory repository adapter
//!
//! Implements all three domain repository traits over a single
//! `RwLock`-protected state. Collections keep insertion order, which the
//! queue repository contract requires for stable FIFO tie-breaking.
//!
//! The store itself only serializes individual reads and writes; callers
//! wrap check-then-write sequences in [`crate::sync::KeyedLock`] guards per
//! meeting or proposal.

use async_trait::async_trait;
use stackline_domain::{
    IncidentId, IncidentReport, IncidentRepository, Meeting, MeetingId, MeetingRepository,
    Participant, Proposal, ProposalId, ProposalRepository, QueueItem, QueueItemId,
    QueueItemRepository, QueueItemStatus, RepositoryError, UserId, Vote,
};
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    meetings: Vec<Meeting>,
    participants: Vec<Participant>,
    items: Vec<QueueItem>,
    proposals: Vec<Proposal>,
    votes: Vec<Vote>,
    incidents: Vec<IncidentReport>,
}

/// In-memory store backing every repository trait.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MeetingRepository for InMemoryStore {
    async fn insert_meeting(&self, meeting: Meeting) -> Result<(), RepositoryError> {
        self.state.write().await.meetings.push(meeting);
        Ok(())
    }

    async fn find_meeting(&self, id: MeetingId) -> Result<Option<Meeting>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.meetings.iter().find(|m| m.id == id).cloned())
    }

    async fn find_meeting_by_pin(&self, pin: &str) -> Result<Option<Meeting>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.meetings.iter().find(|m| m.pin == pin).cloned())
    }

    async fn update_meeting(&self, meeting: Meeting) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        match state.meetings.iter_mut().find(|m| m.id == meeting.id) {
            Some(slot) => {
                *slot = meeting;
                Ok(())
            }
            None => Err(RepositoryError::Storage(format!(
                "update of unknown meeting {}",
                meeting.id
            ))),
        }
    }

    async fn insert_participant(&self, participant: Participant) -> Result<(), RepositoryError> {
        self.state.write().await.participants.push(participant);
        Ok(())
    }

    async fn find_participant(
        &self,
        meeting: MeetingId,
        user: UserId,
    ) -> Result<Option<Participant>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .participants
            .iter()
            .find(|p| p.meeting_id == meeting && p.user_id == user)
            .cloned())
    }

    async fn update_participant(&self, participant: Participant) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        match state
            .participants
            .iter_mut()
            .find(|p| p.meeting_id == participant.meeting_id && p.user_id == participant.user_id)
        {
            Some(slot) => {
                *slot = participant;
                Ok(())
            }
            None => Err(RepositoryError::Storage(format!(
                "update of unknown participant {} in meeting {}",
                participant.user_id, participant.meeting_id
            ))),
        }
    }

    async fn participants(&self, meeting: MeetingId) -> Result<Vec<Participant>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .participants
            .iter()
            .filter(|p| p.meeting_id == meeting)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl QueueItemRepository for InMemoryStore {
    async fn insert_item(&self, item: QueueItem) -> Result<(), RepositoryError> {
        self.state.write().await.items.push(item);
        Ok(())
    }

    async fn find_item(&self, id: QueueItemId) -> Result<Option<QueueItem>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.items.iter().find(|i| i.id == id).cloned())
    }

    async fn update_item(&self, item: QueueItem) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        match state.items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => {
                *slot = item;
                Ok(())
            }
            None => Err(RepositoryError::Storage(format!(
                "update of unknown queue item {}",
                item.id
            ))),
        }
    }

    async fn items_for_meeting(
        &self,
        meeting: MeetingId,
    ) -> Result<Vec<QueueItem>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .items
            .iter()
            .filter(|i| i.meeting_id == meeting)
            .cloned()
            .collect())
    }

    async fn items_with_status(
        &self,
        meeting: MeetingId,
        status: QueueItemStatus,
    ) -> Result<Vec<QueueItem>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .items
            .iter()
            .filter(|i| i.meeting_id == meeting && i.status == status)
            .cloned()
            .collect())
    }

    async fn items_for_user(
        &self,
        meeting: MeetingId,
        user: UserId,
    ) -> Result<Vec<QueueItem>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .items
            .iter()
            .filter(|i| i.meeting_id == meeting && i.user_id == user)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProposalRepository for InMemoryStore {
    async fn insert_proposal(&self, proposal: Proposal) -> Result<(), RepositoryError> {
        self.state.write().await.proposals.push(proposal);
        Ok(())
    }

    async fn find_proposal(&self, id: ProposalId) -> Result<Option<Proposal>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.proposals.iter().find(|p| p.id == id).cloned())
    }

    async fn update_proposal(&self, proposal: Proposal) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        match state.proposals.iter_mut().find(|p| p.id == proposal.id) {
            Some(slot) => {
                *slot = proposal;
                Ok(())
            }
            None => Err(RepositoryError::Storage(format!(
                "update of unknown proposal {}",
                proposal.id
            ))),
        }
    }

    async fn proposals_for_meeting(
        &self,
        meeting: MeetingId,
    ) -> Result<Vec<Proposal>, RepositoryError> {
        let state = self.state.read().await;
        let mut proposals: Vec<Proposal> = state
            .proposals
            .iter()
            .filter(|p| p.meeting_id == meeting)
            .cloned()
            .collect();
        proposals.sort_by_key(|p| std::cmp::Reverse(p.created_at));
        Ok(proposals)
    }

    async fn upsert_vote(&self, vote: Vote) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        match state
            .votes
            .iter_mut()
            .find(|v| v.proposal_id == vote.proposal_id && v.user_id == vote.user_id)
        {
            Some(slot) => *slot = vote,
            None => state.votes.push(vote),
        }
        Ok(())
    }

    async fn votes_for_proposal(&self, proposal: ProposalId) -> Result<Vec<Vote>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .votes
            .iter()
            .filter(|v| v.proposal_id == proposal)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl IncidentRepository for InMemoryStore {
    async fn insert_incident(&self, incident: IncidentReport) -> Result<(), RepositoryError> {
        self.state.write().await.incidents.push(incident);
        Ok(())
    }

    async fn find_incident(
        &self,
        id: IncidentId,
    ) -> Result<Option<IncidentReport>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.incidents.iter().find(|i| i.id == id).cloned())
    }

    async fn update_incident(&self, incident: IncidentReport) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        match state.incidents.iter_mut().find(|i| i.id == incident.id) {
            Some(slot) => {
                *slot = incident;
                Ok(())
            }
            None => Err(RepositoryError::Storage(format!(
                "update of unknown incident {}",
                incident.id
            ))),
        }
    }

    async fn incidents_for_meeting(
        &self,
        meeting: MeetingId,
    ) -> Result<Vec<IncidentReport>, RepositoryError> {
        let state = self.state.read().await;
        let mut incidents: Vec<IncidentReport> = state
            .incidents
            .iter()
            .filter(|i| i.meeting_id == meeting)
            .cloned()
            .collect();
        incidents.sort_by_key(|i| std::cmp::Reverse(i.created_at));
        Ok(incidents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stackline_domain::{MeetingSettings, QueueItemKind, VoteType};
    use std::collections::BTreeSet;

    fn meeting() -> Meeting {
        Meeting::new("Test", None, "ABC123", MeetingSettings::default(), Utc::now())
    }

    #[tokio::test]
    async fn test_meeting_roundtrip_by_id_and_pin() {
        let store = InMemoryStore::new();
        let meeting = meeting();
        store.insert_meeting(meeting.clone()).await.unwrap();

        let by_id = store.find_meeting(meeting.id).await.unwrap().unwrap();
        assert_eq!(by_id.title, "Test");
        let by_pin = store.find_meeting_by_pin("ABC123").await.unwrap().unwrap();
        assert_eq!(by_pin.id, meeting.id);
        assert!(store.find_meeting_by_pin("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_meeting_is_a_storage_error() {
        let store = InMemoryStore::new();
        let err = store.update_meeting(meeting()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Storage(_)));
    }

    #[tokio::test]
    async fn test_items_preserve_insertion_order() {
        let store = InMemoryStore::new();
        let meeting_id = MeetingId::generate();
        let at = Utc::now();
        let first = QueueItem::new(
            meeting_id,
            UserId::generate(),
            QueueItemKind::Hand,
            BTreeSet::new(),
            at,
        );
        let second = QueueItem::new(
            meeting_id,
            UserId::generate(),
            QueueItemKind::Hand,
            BTreeSet::new(),
            at,
        );
        store.insert_item(first.clone()).await.unwrap();
        store.insert_item(second.clone()).await.unwrap();

        let waiting = store
            .items_with_status(meeting_id, QueueItemStatus::Waiting)
            .await
            .unwrap();
        assert_eq!(waiting[0].id, first.id);
        assert_eq!(waiting[1].id, second.id);
    }

    #[tokio::test]
    async fn test_vote_upsert_overwrites_in_place() {
        let store = InMemoryStore::new();
        let proposal = ProposalId::generate();
        let user = UserId::generate();

        store
            .upsert_vote(Vote::new(proposal, user, VoteType::Agree, None, Utc::now()))
            .await
            .unwrap();
        store
            .upsert_vote(Vote::new(
                proposal,
                user,
                VoteType::Block,
                Some("unacceptable".into()),
                Utc::now(),
            ))
            .await
            .unwrap();

        let votes = store.votes_for_proposal(proposal).await.unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].vote, VoteType::Block);
    }

    #[tokio::test]
    async fn test_incidents_for_meeting_newest_first() {
        let store = InMemoryStore::new();
        let meeting_id = MeetingId::generate();
        let reporter = UserId::generate();
        let older = IncidentReport::new(
            meeting_id,
            reporter,
            "conduct",
            "first",
            false,
            false,
            Utc::now(),
        );
        let newer = IncidentReport::new(
            meeting_id,
            reporter,
            "conduct",
            "second",
            false,
            false,
            Utc::now() + chrono::Duration::seconds(5),
        );
        store.insert_incident(older).await.unwrap();
        store.insert_incident(newer).await.unwrap();

        let incidents = store.incidents_for_meeting(meeting_id).await.unwrap();
        assert_eq!(incidents[0].description, "second");
        assert_eq!(incidents[1].description, "first");
    }

    #[tokio::test]
    async fn test_proposals_for_meeting_newest_first() {
        let store = InMemoryStore::new();
        let meeting_id = MeetingId::generate();
        let proposer = UserId::generate();
        let older = Proposal::new(meeting_id, proposer, "old", None, Utc::now());
        let newer = Proposal::new(
            meeting_id,
            proposer,
            "new",
            None,
            Utc::now() + chrono::Duration::seconds(5),
        );
        store.insert_proposal(older).await.unwrap();
        store.insert_proposal(newer).await.unwrap();

        let proposals = store.proposals_for_meeting(meeting_id).await.unwrap();
        assert_eq!(proposals[0].title, "new");
        assert_eq!(proposals[1].title, "old");
    }
}
