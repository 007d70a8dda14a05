//! Once-a-day scheduling for the persistent mode.

use chrono::{DateTime, Days, Local, TimeZone};
use engine_logging::{engine_error, engine_info, engine_warn};

use crate::app;
use crate::config::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid schedule {expression:?}: {reason}")]
pub struct ScheduleError {
    expression: String,
    reason: &'static str,
}

/// Fire time parsed from a `<minute> <hour> * * *` cron expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    minute: u32,
    hour: u32,
}

impl DailySchedule {
    pub fn parse(expression: &str) -> Result<Self, ScheduleError> {
        let invalid = |reason| ScheduleError {
            expression: expression.to_string(),
            reason,
        };

        let fields: Vec<&str> = expression.split_whitespace().collect();
        let [minute, hour, day, month, weekday] = fields.as_slice() else {
            return Err(invalid("expected five fields"));
        };
        if [day, month, weekday].iter().any(|field| **field != "*") {
            return Err(invalid("only daily schedules are supported"));
        }
        let minute: u32 = minute
            .parse()
            .ok()
            .filter(|m| *m < 60)
            .ok_or_else(|| invalid("minute must be 0-59"))?;
        let hour: u32 = hour
            .parse()
            .ok()
            .filter(|h| *h < 24)
            .ok_or_else(|| invalid("hour must be 0-23"))?;
        Ok(Self { minute, hour })
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// First fire time strictly after `now`, in `now`'s time zone.
    ///
    /// Local times that do not exist (DST gaps) are skipped.
    pub fn next_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let zone = now.timezone();
        let today = now.date_naive();
        (0..=2)
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .filter_map(|day| day.and_hms_opt(self.hour, self.minute, 0))
            .filter_map(|naive| zone.from_local_datetime(&naive).earliest())
            .find(|candidate| candidate > now)
    }
}

/// Runs the daily upload at every fire time until Ctrl-C.
pub async fn run_scheduled(config: &AppConfig) -> anyhow::Result<()> {
    let schedule = DailySchedule::parse(&config.schedule)?;

    engine_info!("Daily image uploader started");
    engine_info!("Images per day: {}", config.images_per_day);
    engine_info!(
        "Schedule: {} (daily at {:02}:{:02})",
        config.schedule,
        schedule.hour(),
        schedule.minute()
    );
    engine_info!("Sources: {}", app::catalog(config).source_names().join(", "));

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let now = Local::now();
        let Some(next) = schedule.next_after(&now) else {
            anyhow::bail!("no upcoming fire time for schedule {:?}", config.schedule);
        };
        engine_info!("Next run scheduled for {}", next.to_rfc3339());
        let wait = (next - now).to_std().unwrap_or_default();

        tokio::select! {
            signal = &mut shutdown => {
                if let Err(err) = signal {
                    engine_warn!("Failed to listen for Ctrl-C: {}", err);
                }
                engine_info!("Shutting down gracefully...");
                return Ok(());
            }
            _ = tokio::time::sleep(wait) => {}
        }

        engine_info!("Running scheduled daily upload...");
        match app::run_once(config, config.images_per_day).await {
            Ok(outcome) if outcome.succeeded() => {}
            Ok(outcome) => match outcome.state.failure() {
                Some(failure) => engine_error!("Scheduled run failed: {}", failure),
                None => engine_error!("Scheduled run did not complete"),
            },
            Err(err) => engine_error!("Scheduled run could not start: {:#}", err),
        }
    }
}
