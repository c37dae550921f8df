//! Application layer for stackline
//!
//! Use cases orchestrating the facilitation domain — queue lifecycle,
//! ordered queue reads, rate limiting, consensus resolution, meeting
//! lifecycle, and minutes export — plus the ports they depend on.
//!
//! All mutating use cases are check-then-write sequences; callers serialize
//! them per meeting (queue operations) or per proposal (votes), e.g. with
//! the infrastructure layer's keyed locks.

pub mod ports;
pub mod use_cases;

pub use ports::clock::{Clock, ManualClock};
pub use ports::event_log::{MeetingEvent, MeetingEventLog, NoMeetingEventLog};
pub use use_cases::export::{ExportFormat, MeetingExporter};
pub use use_cases::incidents::{IncidentError, IncidentReceipt, IncidentService};
pub use use_cases::meetings::{MeetingError, MeetingService};
pub use use_cases::proposals::{ConsensusResolver, ProposalError, VoteReceipt};
pub use use_cases::queue::{QueueError, QueueLifecycle};
pub use use_cases::queue_view::{OrderedQueueEntry, QueueView};
pub use use_cases::rate_limit::DirectResponseRateLimiter;
