pub mod client;
pub mod rate_limit;

pub use client::PulseClient;
pub use rate_limit::{Clock, RateLimiter, SystemClock};

use crate::error::Result;
use crate::models::Room;

/// Room enrollment operations the batch run drives (currently backed by Pulse)
#[allow(async_fn_in_trait)]
pub trait EnrollmentApi {
    /// List every room of the organization. Failures are fatal to the run.
    async fn list_rooms(&mut self) -> Result<Vec<Room>>;

    /// Issue a fresh enrollment code for one room; `None` on any failure.
    async fn regenerate_code(&mut self, room_id: &str) -> Option<String>;
}

impl<C: Clock> EnrollmentApi for PulseClient<C> {
    async fn list_rooms(&mut self) -> Result<Vec<Room>> {
        PulseClient::list_rooms(self).await
    }

    async fn regenerate_code(&mut self, room_id: &str) -> Option<String> {
        PulseClient::regenerate_code(self, room_id).await
    }
}
