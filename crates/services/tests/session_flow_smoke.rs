use std::sync::Arc;

use chrono::Duration;

use dictee_core::Clock;
use dictee_core::model::{Lesson, LessonId, MatchPolicy, Sentence, TrainerSettings};
use dictee_core::time::fixed_now;
use services::{Phase, PracticeService, ProgressOverviewService};
use storage::catalog::InMemoryCatalog;
use storage::repository::{InMemoryProgressStore, ProgressRepository};

fn lesson_id(name: &str) -> LessonId {
    LessonId::new(name).unwrap()
}

fn build_lesson(name: &str, texts: &[&str]) -> Lesson {
    let sentences = texts
        .iter()
        .enumerate()
        .map(|(i, text)| Sentence::new(u32::try_from(i).unwrap() + 1, *text).unwrap())
        .collect();
    Lesson::new(lesson_id(name), sentences, "audio").unwrap()
}

fn build_catalog() -> Arc<InMemoryCatalog> {
    let catalog = InMemoryCatalog::new();
    catalog.insert_lesson(build_lesson(
        "dagen",
        &[
            "Welke dag is het vandaag?",
            "Het is vandaag dinsdag.",
            "Dan is het weekend.",
        ],
    ));
    catalog.insert_audio(lesson_id("dagen"), 1, "audio/sentence_01.mp3");
    Arc::new(catalog)
}

fn exact_settings() -> TrainerSettings {
    TrainerSettings::new(MatchPolicy::Exact, 0.85, true).unwrap()
}

#[test]
fn strict_session_runs_to_completion_and_persists() {
    let store = Arc::new(InMemoryProgressStore::new());
    let service = PracticeService::new(
        Clock::fixed(fixed_now()),
        build_catalog(),
        Arc::clone(&store) as Arc<dyn ProgressRepository>,
        exact_settings(),
    );

    let mut session = service.select_lesson(&lesson_id("dagen")).unwrap();

    // Sentence 1 has audio registered, the others do not; absence is a
    // warning, never a blocker.
    let prompt = service.current_prompt(&session).unwrap();
    assert_eq!(prompt.index, 1);
    assert_eq!(prompt.total, 3);
    assert!(prompt.audio.is_some());

    let inputs = [
        "welke dag is het vandaag",  // perfect
        "het is vandaag maandag",    // 3 of 4
        "dan is het weekend",        // perfect
    ];
    for input in inputs {
        session.start_listening().unwrap();
        session.finish_listening().unwrap();
        let outcome = service.submit_transcription(&mut session, input).unwrap();
        assert!(outcome.record.is_some());
        service.next_sentence(&mut session).unwrap();
    }

    assert!(session.is_complete());
    assert_eq!(session.scores(), &[100.0, 75.0, 100.0]);
    // mean of 100, 75, 100 = 91.666... → 91.67
    assert_eq!(session.average(), Some(91.67));

    let data = store.load().unwrap();
    let progress = data.lesson(&lesson_id("dagen")).unwrap();
    assert!(progress.completed);
    assert_eq!(progress.scores, vec![100.0, 75.0, 100.0]);
    assert_eq!(
        progress.weak_sentences.iter().copied().collect::<Vec<_>>(),
        vec![2]
    );

    let overview = ProgressOverviewService::new(store).overview().unwrap();
    assert_eq!(overview.lessons[0].average, Some(91.67));
}

#[test]
fn repeated_weak_submissions_do_not_duplicate_bookmarks() {
    let store = Arc::new(InMemoryProgressStore::new());
    let service = PracticeService::new(
        Clock::fixed(fixed_now()),
        build_catalog(),
        Arc::clone(&store) as Arc<dyn ProgressRepository>,
        exact_settings(),
    );

    // Two separate sessions, both stumbling on sentence 3.
    for _ in 0..2 {
        let mut session = service.select_lesson(&lesson_id("dagen")).unwrap();
        for input in ["welke dag is het vandaag", "het is vandaag dinsdag", "dan"] {
            session.start_listening().unwrap();
            session.finish_listening().unwrap();
            service.submit_transcription(&mut session, input).unwrap();
            service.next_sentence(&mut session).unwrap();
        }
        assert!(session.is_complete());
    }

    let data = store.load().unwrap();
    let progress = data.lesson(&lesson_id("dagen")).unwrap();
    assert_eq!(progress.scores.len(), 6);
    assert_eq!(
        progress.weak_sentences.iter().copied().collect::<Vec<_>>(),
        vec![3]
    );
}

#[test]
fn streak_advances_across_days_but_not_within_one() {
    let store = Arc::new(InMemoryProgressStore::new());
    let catalog = build_catalog();

    let day_one = Clock::fixed(fixed_now());
    let service = PracticeService::new(
        day_one,
        Arc::clone(&catalog) as Arc<dyn storage::catalog::LessonCatalog>,
        Arc::clone(&store) as Arc<dyn ProgressRepository>,
        exact_settings(),
    );
    let _ = service.select_lesson(&lesson_id("dagen")).unwrap();
    let _ = service.select_lesson(&lesson_id("dagen")).unwrap();
    assert_eq!(store.load().unwrap().streak.streak, 1);

    let day_two = Clock::fixed(fixed_now() + Duration::days(1));
    let service = PracticeService::new(
        day_two,
        Arc::clone(&catalog) as Arc<dyn storage::catalog::LessonCatalog>,
        Arc::clone(&store) as Arc<dyn ProgressRepository>,
        exact_settings(),
    );
    let _ = service.select_lesson(&lesson_id("dagen")).unwrap();

    let streak = store.load().unwrap().streak;
    assert_eq!(streak.streak, 2);
    assert_eq!(
        streak.last_practice,
        Some((fixed_now() + Duration::days(1)).date_naive())
    );
}

#[test]
fn progress_survives_a_store_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");

    {
        let store = Arc::new(storage::json_store::JsonProgressStore::new(&path));
        let service = PracticeService::new(
            Clock::fixed(fixed_now()),
            build_catalog(),
            store as Arc<dyn ProgressRepository>,
            exact_settings(),
        );
        let mut session = service.select_lesson(&lesson_id("dagen")).unwrap();
        session.start_listening().unwrap();
        session.finish_listening().unwrap();
        service
            .submit_transcription(&mut session, "welke dag is het")
            .unwrap();
    }

    // A fresh process sees the same history.
    let store = Arc::new(storage::json_store::JsonProgressStore::new(&path));
    let data = store.load().unwrap();
    let progress = data.lesson(&lesson_id("dagen")).unwrap();
    assert_eq!(progress.scores, vec![80.0]);
    assert!(progress.weak_sentences.contains(&1));
    assert!(!progress.completed);
    assert_eq!(data.streak.streak, 1);
}
