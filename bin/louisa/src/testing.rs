use std::cell::RefCell;
use std::time::Duration;

use transport::QoS;

use crate::capability::{Scheduler, Transport};
use crate::command::Command;
use crate::event::Event;
use crate::presenter::{Presenter, Snapshot};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Connect(u64),
    Subscribe(Vec<String>, QoS),
    Publish(Command),
    Disconnect,
}

#[derive(Default)]
pub struct FakeTransport {
    calls: RefCell<Vec<Call>>,
}

impl FakeTransport {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn connects(&self) -> Vec<u64> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Connect(attempt) => Some(*attempt),
                _ => None,
            })
            .collect()
    }

    pub fn publishes(&self) -> Vec<Command> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Publish(command) => Some(command.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Transport for FakeTransport {
    fn connect(&self, attempt: u64) {
        self.calls.borrow_mut().push(Call::Connect(attempt));
    }

    fn subscribe(&self, topics: &[String], qos: QoS) {
        self.calls
            .borrow_mut()
            .push(Call::Subscribe(topics.to_vec(), qos));
    }

    fn publish(&self, command: &Command) {
        self.calls.borrow_mut().push(Call::Publish(command.clone()));
    }

    fn disconnect(&self) {
        self.calls.borrow_mut().push(Call::Disconnect);
    }
}

#[derive(Default)]
pub struct FakeScheduler {
    scheduled: RefCell<Vec<(Duration, Event)>>,
}

impl FakeScheduler {
    pub fn scheduled(&self) -> Vec<(Duration, Event)> {
        self.scheduled.borrow().clone()
    }
}

impl Scheduler for FakeScheduler {
    fn schedule(&self, delay: Duration, event: Event) {
        self.scheduled.borrow_mut().push((delay, event));
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    pub snapshots: Vec<Snapshot>,
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, snapshot: &Snapshot) {
        self.snapshots.push(snapshot.clone());
    }
}
