use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::{task, time};

use crate::capability::Scheduler;
use crate::event::Event;

pub struct TimerScheduler {
    events: UnboundedSender<Event>,
}

impl TimerScheduler {
    pub fn new(events: UnboundedSender<Event>) -> TimerScheduler {
        TimerScheduler { events }
    }
}

impl Scheduler for TimerScheduler {
    fn schedule(&self, delay: Duration, event: Event) {
        let events = self.events.clone();

        task::spawn(async move {
            time::sleep(delay).await;
            let _ = events.send(event);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test(start_paused = true)]
    async fn test_schedule_delivers_after_delay() {
        let (events, mut receiver) = unbounded_channel();
        let scheduler = TimerScheduler::new(events);

        scheduler.schedule(Duration::from_secs(5), Event::Retry { generation: 3 });

        time::sleep(Duration::from_secs(4)).await;
        assert!(receiver.try_recv().is_err());

        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(receiver.try_recv(), Ok(Event::Retry { generation: 3 }));
    }
}
