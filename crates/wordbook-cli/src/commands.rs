//! Subcommand handlers. Output goes to stdout as plain text.

use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use tokio::net::TcpListener;
use tracing::{info, warn};
use wordbook_ai::{DeepLTranslator, deepl::FAILURE_PREFIX};
use wordbook_api::{ApiState, LanguageCodes};
use wordbook_core::{
  example::Example,
  exercise::Exercise,
  id::{ExerciseId, WordId},
  translate::Translator,
  word::Word,
};
use wordbook_service::{Command as Job, Dispatcher, Evaluation, Event};

use crate::{AppService, Command, settings::Settings};

pub async fn run(command: Command, settings: &Settings, service: Arc<AppService>) -> Result<()> {
  match command {
    Command::Translate { text, from, to } => {
      let translator = translator(settings)?;
      let from = from.unwrap_or_else(|| settings.source_lang.clone());
      let to = to.unwrap_or_else(|| settings.target_lang.clone());
      println!("{}", translator.translate(&from, &to, &text).await);
    }

    Command::Add { term, translation, group } => {
      let translation = match translation {
        Some(t) => t,
        None => {
          let translated = translator(settings)?
            .translate(&settings.source_lang, &settings.target_lang, &term)
            .await;
          if translated.starts_with(FAILURE_PREFIX) {
            bail!("{translated}");
          }
          translated
        }
      };
      let word = service.add_or_update(&term, &translation, group.as_deref()).await?;
      println!("{}", word_line(&word));
    }

    Command::List { all } => {
      for word in service.list_words(all).await? {
        println!("{}", word_line(&word));
      }
    }

    Command::Groups => {
      for group in service.list_groups().await? {
        println!("{group}");
      }
    }

    Command::Show { id } => show(&service, WordId(id)).await?,

    Command::Note { id, notes } => {
      let word = service.update_notes(WordId(id), &notes).await?;
      println!("{}", word_line(&word));
    }

    Command::Group { id, group } => {
      let word = service.update_group(WordId(id), group.as_deref()).await?;
      println!("{}", word_line(&word));
    }

    Command::Learned(args) => {
      let word = service.set_learned(WordId(args.id), args.on).await?;
      println!("{}", word_line(&word));
    }

    Command::Example { id, text } => {
      let example = service.add_manual_example(WordId(id), &text).await?;
      println!("{}", example_line(&example));
    }

    Command::Practice { id, direction } => {
      settings.require_api_key()?;
      let job = Job::CreateExercise { word_id: WordId(id), direction };
      report(dispatch(service, job).await?)?;
    }

    Command::Answer { exercise, answer } => {
      settings.require_api_key()?;
      let job = Job::EvaluateExercise { exercise_id: ExerciseId(exercise), answer };
      report(dispatch(service, job).await?)?;
    }

    Command::Delete { id } => {
      service.delete_word(WordId(id)).await?;
      println!("deleted word {id}");
    }

    Command::Serve { host, port } => {
      let host = host.unwrap_or_else(|| settings.host.clone());
      let port = port.unwrap_or(settings.port);
      serve(settings, service, &host, port).await?;
    }
  }

  Ok(())
}

fn translator(settings: &Settings) -> Result<DeepLTranslator> {
  settings.require_deepl_key()?;
  DeepLTranslator::new(settings.deepl_api_key.clone(), settings.deepl_base_url.clone())
    .context("failed to build DeepL client")
}

// ─── Practice ─────────────────────────────────────────────────────────────────

/// Run one job on the dispatcher and wait for its event.
async fn dispatch(service: Arc<AppService>, job: Job) -> Result<Event> {
  let (dispatcher, mut events) = Dispatcher::new(service);
  if let Some(handle) = dispatcher.submit(job) {
    handle.await.context("practice task panicked")?;
  }
  events.recv().await.context("practice task finished without a result")
}

fn report(event: Event) -> Result<()> {
  match event {
    Event::ExerciseCreated(exercise) => {
      print_exercise(&exercise);
      println!();
      println!("answer with: wordbook answer {} \"<translation>\"", exercise.id);
    }
    Event::ExerciseScored { evaluation, .. } => print_evaluation(&evaluation),
    Event::Failed { error, .. } => return Err(error.into()),
    Event::Busy(slot) => bail!("{slot:?} is already being processed"),
  }
  Ok(())
}

fn print_evaluation(evaluation: &Evaluation) {
  println!("score: {}", evaluation.score);
  if !evaluation.feedback.is_empty() {
    println!("{}", evaluation.feedback);
  }
  if evaluation.promoted {
    println!("word marked as learned");
  }
}

// ─── Display ──────────────────────────────────────────────────────────────────

async fn show(service: &AppService, id: WordId) -> Result<()> {
  let word = service.get_word(id).await?;
  println!("{}", word_line(&word));
  if !word.notes.is_empty() {
    println!("notes: {}", word.notes);
  }
  println!("average: {:.2}", service.average_score(id).await?);

  let examples = service.list_examples(id).await?;
  if !examples.is_empty() {
    println!("\nexamples:");
    for example in &examples {
      println!("  {}", example_line(example));
    }
  }

  let exercises = service.list_exercises(id).await?;
  if !exercises.is_empty() {
    println!("\nexercises:");
    for exercise in &exercises {
      let state = match exercise.score() {
        Some(score) => score.to_string(),
        None => "pending".to_owned(),
      };
      println!("  #{} {} [{state}] {}", exercise.id, exercise.direction, exercise.sentence);
    }
  }
  Ok(())
}

fn word_line(word: &Word) -> String {
  let group = word.group.as_deref().map(|g| format!("  [{g}]")).unwrap_or_default();
  let learned = if word.is_learned() { "  (learned)" } else { "" };
  format!("{:>4}  {} = {}{group}{learned}", word.id, word.term, word.translation)
}

fn example_line(example: &Example) -> String {
  match example.score() {
    Some(score) => format!("[{}] {} ({score})", example.origin(), example.text),
    None => format!("[{}] {}", example.origin(), example.text),
  }
}

fn print_exercise(exercise: &Exercise) {
  println!("exercise #{} ({}) for \"{}\"", exercise.id, exercise.direction, exercise.source_term);
  println!("  {}", exercise.sentence);
}

// ─── Serve ────────────────────────────────────────────────────────────────────

async fn serve(settings: &Settings, service: Arc<AppService>, host: &str, port: u16) -> Result<()> {
  if settings.api_key.trim().is_empty() {
    warn!("no completion API key configured; practice endpoints will fail");
  }
  if settings.deepl_api_key.trim().is_empty() {
    warn!("no DeepL API key configured; /api/translate will return an error text");
  }

  let translator =
    DeepLTranslator::new(settings.deepl_api_key.clone(), settings.deepl_base_url.clone())
      .context("failed to build DeepL client")?;
  let state = ApiState {
    service,
    translator: Arc::new(translator),
    languages: Arc::new(LanguageCodes {
      source: settings.source_lang.clone(),
      target: settings.target_lang.clone(),
    }),
  };
  let app = axum::Router::new().nest("/api", wordbook_api::api_router(state));

  let address = format!("{host}:{port}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  info!("listening on http://{address}/api");

  axum::serve(listener, app).await.context("server error")
}
