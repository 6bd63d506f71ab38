//! Background execution of the slow workflow calls.
//!
//! A front end submits a [`Command`] and keeps handling input; the result
//! arrives later as an [`Event`] on the channel returned by
//! [`Dispatcher::new`]. At most one generation per word and one scoring per
//! exercise run at a time.

use std::{
  collections::HashSet,
  sync::{Arc, Mutex, PoisonError},
};

use tokio::{
  sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
  task::JoinHandle,
};
use tracing::debug;
use wordbook_core::{
  direction::Direction,
  exercise::Exercise,
  grader::Grader,
  id::{ExerciseId, WordId},
  store::VocabStore,
};

use crate::{Error, Evaluation, Service};

#[derive(Debug, Clone)]
pub enum Command {
  CreateExercise { word_id: WordId, direction: Direction },
  EvaluateExercise { exercise_id: ExerciseId, answer: String },
}

impl Command {
  pub fn slot(&self) -> Slot {
    match self {
      Self::CreateExercise { word_id, .. } => Slot::Word(*word_id),
      Self::EvaluateExercise { exercise_id, .. } => Slot::Exercise(*exercise_id),
    }
  }
}

/// What a running call is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
  Word(WordId),
  Exercise(ExerciseId),
}

#[derive(Debug)]
pub enum Event {
  ExerciseCreated(Exercise),
  ExerciseScored { exercise_id: ExerciseId, evaluation: Evaluation },
  Failed { slot: Slot, error: Error },
  /// The submission was dropped because the same slot is still running.
  Busy(Slot),
}

type InFlight = Arc<Mutex<HashSet<Slot>>>;

/// Releases a slot when the task finishes, including by panic.
struct SlotGuard {
  slot:      Slot,
  in_flight: InFlight,
}

impl Drop for SlotGuard {
  fn drop(&mut self) {
    self
      .in_flight
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(&self.slot);
  }
}

pub struct Dispatcher<S, G> {
  service:   Arc<Service<S, G>>,
  events:    UnboundedSender<Event>,
  in_flight: InFlight,
}

impl<S, G> Dispatcher<S, G>
where
  S: VocabStore + 'static,
  G: Grader + 'static,
{
  pub fn new(service: Arc<Service<S, G>>) -> (Self, UnboundedReceiver<Event>) {
    let (events, rx) = mpsc::unbounded_channel();
    let dispatcher = Self { service, events, in_flight: Arc::default() };
    (dispatcher, rx)
  }

  pub fn service(&self) -> &Arc<Service<S, G>> { &self.service }

  /// Whether a call for `slot` is still running.
  pub fn is_busy(&self, slot: Slot) -> bool {
    self.in_flight.lock().unwrap_or_else(PoisonError::into_inner).contains(&slot)
  }

  /// Spawn `command` on the runtime. Returns `None`, after emitting
  /// [`Event::Busy`], when the same slot is already running.
  ///
  /// Must be called from within a tokio runtime.
  pub fn submit(&self, command: Command) -> Option<JoinHandle<()>> {
    let slot = command.slot();
    let claimed = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner).insert(slot);
    if !claimed {
      debug!(?slot, "call already in flight");
      let _ = self.events.send(Event::Busy(slot));
      return None;
    }

    let guard = SlotGuard { slot, in_flight: self.in_flight.clone() };
    let service = self.service.clone();
    let events = self.events.clone();

    Some(tokio::spawn(async move {
      let event = match command {
        Command::CreateExercise { word_id, direction } => {
          match service.create_exercise(word_id, direction).await {
            Ok(exercise) => Event::ExerciseCreated(exercise),
            Err(error) => Event::Failed { slot, error },
          }
        }
        Command::EvaluateExercise { exercise_id, answer } => {
          match service.evaluate_exercise(exercise_id, &answer).await {
            Ok(evaluation) => Event::ExerciseScored { exercise_id, evaluation },
            Err(error) => Event::Failed { slot, error },
          }
        }
      };
      // Free the slot first so a listener can resubmit straight away.
      drop(guard);
      // The receiver may have gone away; the work is persisted either way.
      let _ = events.send(event);
    }))
  }
}
