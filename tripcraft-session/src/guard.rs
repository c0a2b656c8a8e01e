use std::future::Future;
use std::time::Duration;
use tokio::time::Sleep;

/// Shortest time a submission is shown as "planning".
pub const PLANNING_FLOOR: Duration = Duration::from_secs(10);

/// Puts a floor under how long an operation appears to take.
///
/// The floor never stretches a slower operation: a successful result is
/// released at max(floor, completion). Failures are released immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimumDurationGuard {
    floor: Duration,
}

impl MinimumDurationGuard {
    pub fn new(floor: Duration) -> Self {
        Self { floor }
    }

    pub fn floor(&self) -> Duration {
        self.floor
    }

    /// A timer that resolves once the floor has passed
    pub fn delay(&self) -> Sleep {
        tokio::time::sleep(self.floor)
    }

    /// Run `op` with the floor timer started alongside it
    pub async fn enforce<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let floor = async {
            self.delay().await;
            Ok::<(), E>(())
        };
        let (value, ()) = tokio::try_join!(op, floor)?;
        Ok(value)
    }
}

impl Default for MinimumDurationGuard {
    fn default() -> Self {
        Self::new(PLANNING_FLOOR)
    }
}
