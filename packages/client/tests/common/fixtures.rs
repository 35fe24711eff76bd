//! Builders for test documents.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jobjet_client::common::{RoomId, UserId};
use jobjet_client::domains::chat::{ChatMessage, ChatRoomSummary};
use jobjet_client::domains::jobs::{Job, JobType};
use jobjet_client::domains::profile::{UserProfile, UserRole};

pub fn profile(name: &str, email: &str, role: UserRole) -> UserProfile {
    UserProfile {
        id: UserId::new(),
        email: email.to_string(),
        name: name.to_string(),
        role,
    }
}

/// 2024-05-01 at `hour`:`minute` UTC.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, 0).unwrap()
}

pub fn room(participants: &[UserId], last_message_time: DateTime<Utc>) -> ChatRoomSummary {
    let mut room = ChatRoomSummary::new(RoomId::new(), participants.iter().copied());
    room.last_message_time = last_message_time;
    room
}

pub fn message(
    room: &ChatRoomSummary,
    sender: UserId,
    receiver: UserId,
    content: &str,
    timestamp: DateTime<Utc>,
) -> ChatMessage {
    let mut message = ChatMessage::outgoing(room.id, sender, receiver, content);
    message.timestamp = timestamp;
    message
}

/// A job posted `minutes_ago` before noon.
pub fn job(title: &str, company: &str, location: &str, job_type: JobType, minutes_ago: i64) -> Job {
    Job::builder()
        .title(title)
        .company(company)
        .description(format!("{} at {}", title, company))
        .location(location)
        .salary("Competitive")
        .posted_by(UserId::new())
        .posted_date(at(12, 0) - Duration::minutes(minutes_ago))
        .job_type(job_type)
        .build()
}
