//! Schedule Controller
//!
//! Maps the configured sweep interval onto a single named recurring timer.

use crate::error::Result;
use crate::platform::Timer;
use crate::store::{load_interval_minutes, Store};

/// Timer state after a schedule update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleState {
    Disabled,
    Every { minutes: u32 },
}

pub struct ScheduleController<'a, T> {
    timer: &'a T,
    alarm_name: &'a str,
}

impl<'a, T: Timer> ScheduleController<'a, T> {
    pub fn new(timer: &'a T, alarm_name: &'a str) -> Self {
        Self { timer, alarm_name }
    }

    /// Register the sweep timer for `interval_minutes`; 0 clears it.
    ///
    /// Any previous registration is cancelled first, so at most one timer
    /// is ever active under the alarm name.
    pub async fn apply(&self, interval_minutes: u32) -> Result<ScheduleState> {
        self.timer.cancel(self.alarm_name).await?;

        if interval_minutes == 0 {
            log::info!("periodic rule check disabled");
            return Ok(ScheduleState::Disabled);
        }

        self.timer
            .schedule_recurring(self.alarm_name, interval_minutes)
            .await?;
        log::info!("periodic rule check every {} minute(s)", interval_minutes);
        Ok(ScheduleState::Every {
            minutes: interval_minutes,
        })
    }

    /// Re-apply the interval stored in settings.
    pub async fn apply_from_store<S: Store>(&self, store: &S) -> Result<ScheduleState> {
        let minutes = load_interval_minutes(store).await?;
        self.apply(minutes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::INTERVAL_KEY;
    use crate::memory::{MemoryPlatform, MemoryStore, PlatformCall};
    use serde_json::json;

    const ALARM: &str = "tabmagic-rule-check";

    #[tokio::test]
    async fn zero_clears_then_new_interval_registers_once() {
        let platform = MemoryPlatform::new();
        let controller = ScheduleController::new(&platform, ALARM);

        assert_eq!(controller.apply(5).await.unwrap(), ScheduleState::Every { minutes: 5 });
        assert_eq!(controller.apply(0).await.unwrap(), ScheduleState::Disabled);
        assert!(platform.active_alarms().is_empty());

        assert_eq!(controller.apply(15).await.unwrap(), ScheduleState::Every { minutes: 15 });
        let alarms = platform.active_alarms();
        assert_eq!(alarms.len(), 1);
        assert_eq!(alarms.get(ALARM), Some(&15));
    }

    #[tokio::test]
    async fn reschedule_supersedes() {
        let platform = MemoryPlatform::new();
        let controller = ScheduleController::new(&platform, ALARM);
        controller.apply(1).await.unwrap();
        controller.apply(30).await.unwrap();

        assert_eq!(platform.active_alarms().get(ALARM), Some(&30));
        let calls = platform.calls();
        assert_eq!(
            &calls[2..],
            &[
                PlatformCall::CancelTimer { name: ALARM.into() },
                PlatformCall::ScheduleRecurring {
                    name: ALARM.into(),
                    period_minutes: 30
                },
            ]
        );
    }

    #[tokio::test]
    async fn applies_stored_interval() {
        let platform = MemoryPlatform::new();
        let store = MemoryStore::new();
        store.set(INTERVAL_KEY, json!(60)).await.unwrap();
        let controller = ScheduleController::new(&platform, ALARM);

        assert_eq!(
            controller.apply_from_store(&store).await.unwrap(),
            ScheduleState::Every { minutes: 60 }
        );
    }

    #[tokio::test]
    async fn absent_interval_disables() {
        let platform = MemoryPlatform::new();
        let controller = ScheduleController::new(&platform, ALARM);
        assert_eq!(
            controller.apply_from_store(&MemoryStore::new()).await.unwrap(),
            ScheduleState::Disabled
        );
        assert!(platform.active_alarms().is_empty());
    }
}
