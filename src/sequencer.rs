use crate::events::Event;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SequencerState {
    /// No transition pending.
    Idle,
    /// Waiting for both the generation to finish and the minimum duration to elapse.
    Armed {
        elapsed: f32,
        min_duration_elapsed: bool,
        generation_finished: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ArrivalCountdown {
    elapsed: f32,
    duration: u32,
}

/// Gates the "transition ready" notification behind a minimum on-screen duration and the end of
/// the maze generation, and runs the reaper's arrival countdown afterwards.
#[derive(Clone, Debug)]
pub struct TransitionSequencer {
    min_duration: f32,
    state: SequencerState,
    /// Arrival duration to start counting down from once the transition fires.
    pending_arrival: Option<u32>,
    arrival: Option<ArrivalCountdown>,
}

impl TransitionSequencer {
    pub fn new(min_duration: f32) -> Self {
        Self {
            min_duration,
            state: SequencerState::Idle,
            pending_arrival: None,
            arrival: None,
        }
    }

    pub fn min_duration(&self) -> f32 {
        self.min_duration
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, SequencerState::Armed { .. })
    }

    pub fn is_arrival_counting_down(&self) -> bool {
        self.arrival.is_some()
    }

    /// Starts waiting for a new transition. Any arrival countdown of the previous level is dropped.
    pub fn arm(&mut self) {
        self.state = SequencerState::Armed {
            elapsed: 0.,
            min_duration_elapsed: false,
            generation_finished: false,
        };
        self.pending_arrival = None;
        self.arrival = None;
    }

    /// Signals the end of the generation. `arrival` is the duration of the arrival countdown, if
    /// the level has one.
    pub fn finish_generation(&mut self, arrival: Option<u32>) {
        match &mut self.state {
            SequencerState::Armed {
                generation_finished,
                ..
            } => {
                *generation_finished = true;
                self.pending_arrival = arrival;
            }
            SequencerState::Idle => {
                log::warn!("Generation finished without a pending transition");
            }
        }
    }

    /// Advances all countdowns by `dt` seconds, returning the events that fired during this step.
    pub fn tick(&mut self, dt: f32) -> Vec<Event> {
        let mut events = vec![];

        // The arrival countdown started by a firing only advances on later ticks
        if let Some(arrival) = &mut self.arrival {
            arrival.elapsed += dt;
            if arrival.elapsed >= arrival.duration as f32 {
                log::debug!("Arrival countdown of {}s finished", arrival.duration);
                events.push(Event::Arrival);
                self.arrival = None;
            }
        }

        if let SequencerState::Armed {
            elapsed,
            min_duration_elapsed,
            generation_finished,
        } = &mut self.state
        {
            if !*min_duration_elapsed {
                *elapsed += dt;
                if *elapsed >= self.min_duration {
                    *min_duration_elapsed = true;
                }
            }

            if *min_duration_elapsed && *generation_finished {
                log::debug!("Transition ready after {:.2}s", elapsed);
                events.push(Event::TransitionReady);
                self.state = SequencerState::Idle;

                if let Some(duration) = self.pending_arrival.take() {
                    events.push(Event::ArrivalCountdownStarted(duration));
                    self.arrival = Some(ArrivalCountdown {
                        elapsed: 0.,
                        duration,
                    });
                }
            }
        }

        events
    }
}

#[cfg(test)]
mod test {
    use super::{SequencerState, TransitionSequencer};
    use crate::events::Event;

    #[test]
    fn idle_never_fires() {
        let mut seq = TransitionSequencer::new(1.);
        for _ in 0..10 {
            assert!(seq.tick(1.).is_empty());
        }
        assert_eq!(seq.state(), SequencerState::Idle);
    }

    #[test]
    fn waits_for_min_duration() {
        let mut seq = TransitionSequencer::new(3.);
        seq.arm();
        seq.finish_generation(None);
        assert!(seq.tick(1.).is_empty());
        assert!(seq.tick(1.).is_empty());
        assert!(seq.tick(0.5).is_empty());
        assert_eq!(seq.tick(0.5), vec![Event::TransitionReady]);
        assert!(!seq.is_armed());
        // Only once
        assert!(seq.tick(10.).is_empty());
    }

    #[test]
    fn waits_for_generation() {
        let mut seq = TransitionSequencer::new(1.);
        seq.arm();
        assert!(seq.tick(5.).is_empty());
        assert!(seq.tick(5.).is_empty());
        seq.finish_generation(None);
        assert_eq!(seq.tick(0.), vec![Event::TransitionReady]);
        assert!(seq.tick(1.).is_empty());
    }

    #[test]
    fn arming_resets_the_elapsed_time() {
        let mut seq = TransitionSequencer::new(2.);
        seq.arm();
        assert!(seq.tick(1.5).is_empty());
        seq.arm();
        seq.finish_generation(None);
        assert!(seq.tick(1.).is_empty());
        assert_eq!(seq.tick(1.), vec![Event::TransitionReady]);
    }

    #[test]
    fn arrival_countdown() {
        let mut seq = TransitionSequencer::new(1.);
        seq.arm();
        seq.finish_generation(Some(5));
        assert_eq!(
            seq.tick(1.),
            vec![Event::TransitionReady, Event::ArrivalCountdownStarted(5)]
        );
        assert!(seq.is_arrival_counting_down());
        for _ in 0..4 {
            assert!(seq.tick(1.).is_empty());
        }
        assert_eq!(seq.tick(1.), vec![Event::Arrival]);
        assert!(!seq.is_arrival_counting_down());
        assert!(seq.tick(100.).is_empty());
    }

    #[test]
    fn no_arrival_without_timer() {
        let mut seq = TransitionSequencer::new(0.);
        seq.arm();
        seq.finish_generation(None);
        assert_eq!(seq.tick(0.1), vec![Event::TransitionReady]);
        assert!(!seq.is_arrival_counting_down());
    }

    #[test]
    fn rearming_cancels_arrival() {
        let mut seq = TransitionSequencer::new(0.);
        seq.arm();
        seq.finish_generation(Some(2));
        seq.tick(0.);
        seq.arm();
        assert!(!seq.is_arrival_counting_down());
        assert!(seq.tick(5.).is_empty());
    }
}
