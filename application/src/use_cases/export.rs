//! Meeting export
//!
//! Renders a meeting's record — participants, queue history, proposals and
//! votes — as markdown minutes or CSV event rows.

use crate::use_cases::meetings::MeetingError;
use stackline_domain::{
    FacilitationError, MeetingId, MeetingRepository, ProposalRepository, QueueItemRepository,
};
use std::fmt::Write as _;
use std::sync::Arc;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Csv,
}

/// Renders meeting minutes from repository records.
pub struct MeetingExporter<M, Q, P> {
    meetings: Arc<M>,
    queue: Arc<Q>,
    proposals: Arc<P>,
}

impl<M, Q, P> MeetingExporter<M, Q, P>
where
    M: MeetingRepository,
    Q: QueueItemRepository,
    P: ProposalRepository,
{
    pub fn new(meetings: Arc<M>, queue: Arc<Q>, proposals: Arc<P>) -> Self {
        Self {
            meetings,
            queue,
            proposals,
        }
    }

    pub async fn export(
        &self,
        meeting_id: MeetingId,
        format: ExportFormat,
    ) -> Result<String, MeetingError> {
        let meeting = self
            .meetings
            .find_meeting(meeting_id)
            .await?
            .ok_or(FacilitationError::MeetingNotFound(meeting_id))?;
        let participants = self.meetings.participants(meeting_id).await?;
        let items = self.queue.items_for_meeting(meeting_id).await?;
        let proposals = self.proposals.proposals_for_meeting(meeting_id).await?;

        let mut out = String::new();
        match format {
            ExportFormat::Markdown => {
                writeln!(out, "# {}", meeting.title).ok();
                writeln!(out).ok();
                writeln!(out, "**Meeting Date:** {}", meeting.created_at.to_rfc3339()).ok();
                writeln!(
                    out,
                    "**Status:** {}",
                    if meeting.is_active { "Active" } else { "Ended" }
                )
                .ok();
                writeln!(out).ok();

                writeln!(out, "## Participants").ok();
                for participant in &participants {
                    writeln!(out, "- {} ({:?})", participant.user_id, participant.role).ok();
                }
                writeln!(out).ok();

                writeln!(out, "## Speaking Queue History").ok();
                for (index, item) in items.iter().enumerate() {
                    writeln!(
                        out,
                        "{}. **{}** - {} ({})",
                        index + 1,
                        item.user_id,
                        item.kind,
                        item.status.as_str()
                    )
                    .ok();
                }
                writeln!(out).ok();

                writeln!(out, "## Proposals and Decisions").ok();
                for proposal in &proposals {
                    let votes = self.proposals.votes_for_proposal(proposal.id).await?;
                    writeln!(out, "### {}", proposal.title).ok();
                    writeln!(out, "**Status:** {}", proposal.status).ok();
                    writeln!(out, "**Proposed by:** {}", proposal.proposer_id).ok();
                    writeln!(out).ok();
                    writeln!(out, "**Votes:**").ok();
                    for vote in &votes {
                        writeln!(out, "- {}: {:?}", vote.user_id, vote.vote).ok();
                    }
                    writeln!(out).ok();
                }
            }
            ExportFormat::Csv => {
                writeln!(out, "Type,Timestamp,User,Content,Status").ok();
                for item in &items {
                    writeln!(
                        out,
                        "{:?},{},{},\"Queue item\",{}",
                        item.kind,
                        item.created_at.to_rfc3339(),
                        item.user_id,
                        item.status.as_str()
                    )
                    .ok();
                }
                for proposal in &proposals {
                    writeln!(
                        out,
                        "PROPOSAL,{},{},\"{}\",{}",
                        proposal.created_at.to_rfc3339(),
                        proposal.proposer_id,
                        proposal.title.replace('"', "\"\""),
                        proposal.status
                    )
                    .ok();
                    let votes = self.proposals.votes_for_proposal(proposal.id).await?;
                    for vote in &votes {
                        writeln!(
                            out,
                            "VOTE,{},{},\"{:?}\",RECORDED",
                            vote.cast_at.to_rfc3339(),
                            vote.user_id,
                            vote.vote
                        )
                        .ok();
                    }
                }
            }
        }
        Ok(out)
    }
}
