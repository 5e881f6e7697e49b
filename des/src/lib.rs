//! Minimal discrete-event engine shared by the simulations in this workspace.
//!
//! Agents receive every event in time order and answer with a [`Response`]
//! holding follow-up events. Events scheduled for the same time are
//! delivered in the order they were scheduled.

pub mod parallel;

use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct Event<T> {
    t: usize,
    seq: u64,
    data: T,
}

impl<T> PartialEq for Event<T> {
    fn eq(&self, other: &Self) -> bool {
        self.t == other.t && self.seq == other.seq
    }
}

impl<T> Eq for Event<T> {}

impl<T> Ord for Event<T> {
    // Reversed so the max-heap pops the earliest (t, seq) first
    fn cmp(&self, other: &Self) -> Ordering {
        other.t.cmp(&self.t).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for Event<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// What an agent hands back to the loop after seeing an event
pub struct Response<T, S> {
    events: Vec<(usize, T)>,
    agents: Vec<Box<dyn Agent<T, S>>>,
}

impl<T, S> Response<T, S> {
    pub fn new() -> Response<T, S> {
        Response {
            events: Vec::new(),
            agents: Vec::new(),
        }
    }

    /// Schedule a single follow-up event
    pub fn event(t: usize, data: T) -> Response<T, S> {
        Response {
            events: vec![(t, data)],
            agents: Vec::new(),
        }
    }

    /// Schedule several follow-up events
    pub fn events(events: Vec<(usize, T)>) -> Response<T, S> {
        Response {
            events,
            agents: Vec::new(),
        }
    }

    /// Add new agents to the simulation
    pub fn with_agents(mut self, agents: Vec<Box<dyn Agent<T, S>>>) -> Response<T, S> {
        self.agents.extend(agents);
        self
    }
}

impl<T, S> Default for Response<T, S> {
    fn default() -> Self {
        Response::new()
    }
}

pub trait Agent<T, S> {
    fn act(&mut self, _current_t: usize, _data: &T) -> Response<T, S> {
        Response::new()
    }

    /// Observable state, collected when the run is over
    fn stats(&self) -> S;
}

pub struct EventLoop<T, S> {
    queue: BinaryHeap<Event<T>>,
    next_seq: u64,
    current_t: usize,
    agents: Vec<Box<dyn Agent<T, S>>>,
}

impl<T, S> EventLoop<T, S> {
    pub fn new(events: Vec<(usize, T)>, agents: Vec<Box<dyn Agent<T, S>>>) -> EventLoop<T, S> {
        let mut event_loop = EventLoop {
            queue: BinaryHeap::new(),
            next_seq: 0,
            current_t: 0,
            agents,
        };
        for (t, data) in events {
            event_loop.schedule(t, data);
        }
        event_loop
    }

    fn schedule(&mut self, t: usize, data: T) {
        self.queue.push(Event {
            t,
            seq: self.next_seq,
            data,
        });
        self.next_seq += 1;
    }

    fn broadcast(&mut self) {
        let Some(event) = self.queue.pop() else {
            return;
        };
        self.current_t = event.t;

        let mut scheduled = Vec::new();
        let mut new_agents = Vec::new();
        for agent in &mut self.agents {
            let response = agent.act(self.current_t, &event.data);
            scheduled.extend(response.events);
            new_agents.extend(response.agents);
        }

        for (t, data) in scheduled {
            // Nothing may be scheduled in the past
            if t >= self.current_t {
                self.schedule(t, data);
            }
        }
        self.agents.extend(new_agents);
    }

    /// Process events until the queue is empty or the next event is past `until`
    pub fn run(&mut self, until: usize) {
        while let Some(next) = self.queue.peek() {
            if next.t > until {
                break;
            }
            self.broadcast();
        }
    }

    pub fn current_t(&self) -> usize {
        self.current_t
    }

    pub fn stats(&self) -> Vec<S> {
        self.agents.iter().map(|agent| agent.stats()).collect()
    }
}
