//! End-to-end bot flow: search → picker → navigation → selection → delivery
//!
//! Runs the real handlers against a mocked lyrics provider, a fake audio
//! backend and the recording messenger.
//!
//! Run with: cargo test --test bot_flow_test

mod common;

use common::{songs_json, FakeBackend, TestEnvironment};
use lyrics_seeker::telegram::{handle_search, route_action, PickerCallback, RouteOutcome};
use lyrics_seeker::testing::{Outbound, RecordingMessenger};
use pretty_assertions::assert_eq;
use serde_json::json;
use teloxide::types::{CallbackQueryId, ChatId, InlineKeyboardButtonKind, InlineKeyboardMarkup, MessageId};

const CHAT: ChatId = ChatId(123456789);

/// Callback data of every button of a keyboard, row by row.
fn tokens(keyboard: &InlineKeyboardMarkup) -> Vec<String> {
    keyboard
        .inline_keyboard
        .iter()
        .flatten()
        .filter_map(|button| match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
            _ => None,
        })
        .collect()
}

fn labels(keyboard: &InlineKeyboardMarkup) -> Vec<String> {
    keyboard.inline_keyboard.iter().flatten().map(|b| b.text.clone()).collect()
}

/// Message id of the picker (the "searching" message that got edited).
fn picker_id(messenger: &RecordingMessenger) -> MessageId {
    messenger
        .outbound()
        .iter()
        .find_map(|op| match op {
            Outbound::Text { message_id, .. } => Some(*message_id),
            _ => None,
        })
        .unwrap()
}

async fn search(env: &TestEnvironment, messenger: &RecordingMessenger, query: &str) {
    handle_search(&env.store, &env.lyrics, messenger, CHAT, query)
        .await
        .unwrap();
}

async fn press(env: &TestEnvironment, messenger: &RecordingMessenger, message_id: MessageId, data: &str) -> RouteOutcome {
    let callback_id = CallbackQueryId("callback-1".to_string());
    route_action(
        &env.store,
        &env.ctx,
        messenger,
        PickerCallback {
            callback_id: &callback_id,
            chat_id: CHAT,
            message_id,
            data,
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_twenty_three_hits_paginate() {
    let env = TestEnvironment::new(FakeBackend::writing(&["{base}.webm"])).await;
    env.mock_search("beatles", songs_json(23)).await;
    let messenger = RecordingMessenger::new();

    search(&env, &messenger, "beatles").await;
    let picker = picker_id(&messenger);

    let edits = messenger.edits(CHAT);
    assert_eq!(edits.len(), 1);
    let (id, header, keyboard) = &edits[0];
    assert_eq!(*id, picker);
    assert_eq!(header, "🎧 Pick a song (page 1/3):");
    let keyboard = keyboard.as_ref().unwrap();
    let page_labels = labels(keyboard);
    assert_eq!(page_labels[0], "1. Song 0 - Artist");
    assert_eq!(page_labels[9], "10. Song 9 - Artist");
    assert_eq!(tokens(keyboard)[10..].to_vec(), vec!["cancel", "pg:1"]);

    assert_eq!(press(&env, &messenger, picker, "pg:2").await, RouteOutcome::Navigated(2));
    let (_, header, keyboard) = messenger.edits(CHAT).pop().unwrap();
    let keyboard = keyboard.unwrap();
    assert_eq!(header, "🎧 Pick a song (page 3/3):");
    assert_eq!(
        tokens(&keyboard),
        vec!["sel:20", "sel:21", "sel:22", "pg:1", "cancel"]
    );
    assert_eq!(labels(&keyboard)[0], "21. Song 20 - Artist");

    // Out of range: nothing changes
    let edits_before = messenger.edits(CHAT).len();
    assert_eq!(press(&env, &messenger, picker, "pg:3").await, RouteOutcome::Unchanged);
    assert_eq!(messenger.edits(CHAT).len(), edits_before);
    assert_eq!(env.store.get(CHAT).unwrap().len(), 23);
}

#[tokio::test]
async fn test_select_from_second_page_delivers_global_index() {
    let env = TestEnvironment::new(FakeBackend::writing(&["{base}.m4a"])).await;
    env.mock_search("artist", songs_json(23)).await;
    env.mock_detail(json!({
        "trackName": "Song 14",
        "artistName": "Artist",
        "plainLyrics": "line one\nline two"
    }))
    .await;
    let messenger = RecordingMessenger::new();

    search(&env, &messenger, "artist").await;
    let picker = picker_id(&messenger);
    press(&env, &messenger, picker, "pg:1").await;
    messenger.clear();

    let outcome = press(&env, &messenger, picker, "sel:14").await;
    let RouteOutcome::Fulfilled(report) = outcome else {
        panic!("expected fulfillment, got {:?}", outcome);
    };
    assert!(report.audio_sent);
    assert_eq!(report.lyrics_chunks_sent, 1);
    assert!(report.link_sent);

    let outbound = messenger.outbound();
    assert_eq!(
        outbound[0],
        Outbound::CallbackAnswer {
            callback_id: "callback-1".to_string(),
            text: None
        }
    );
    assert!(matches!(&outbound[1], Outbound::Edit { text, keyboard: None, .. } if text == "⏳ Downloading audio…"));
    assert!(matches!(
        &outbound[2],
        Outbound::Audio { file_name, title, file_existed: true, .. }
            if file_name == "Song 14 - Artist.m4a" && title == "Song 14"
    ));
    assert_eq!(messenger.deleted(CHAT), vec![picker]);
    assert_eq!(
        messenger.texts(CHAT),
        vec!["line one\nline two", "Or manage it in the web app:"]
    );
    assert_eq!(env.leftover_entries(), 0);
}

#[tokio::test]
async fn test_selection_out_of_bounds_is_not_found() {
    let env = TestEnvironment::new(FakeBackend::writing(&["{base}.webm"])).await;
    env.mock_search("three", songs_json(3)).await;
    let messenger = RecordingMessenger::new();

    search(&env, &messenger, "three").await;
    let picker = picker_id(&messenger);
    messenger.clear();

    assert_eq!(press(&env, &messenger, picker, "sel:4").await, RouteOutcome::NotFound);
    assert_eq!(messenger.callback_answers(), vec![Some("❌ Song not found.".to_string())]);
    assert!(messenger.edits(CHAT).is_empty());
    assert_eq!(env.store.get(CHAT).unwrap().len(), 3);
    assert!(env.backend.dirs().is_empty());
}

#[tokio::test]
async fn test_buttons_without_stored_results_expire() {
    let env = TestEnvironment::new(FakeBackend::writing(&["{base}.webm"])).await;
    let messenger = RecordingMessenger::new();
    let old_picker = MessageId(77);

    assert_eq!(press(&env, &messenger, old_picker, "sel:0").await, RouteOutcome::Expired);
    assert_eq!(press(&env, &messenger, old_picker, "pg:1").await, RouteOutcome::Expired);

    let expired = Some("⌛ Session expired, please search again.".to_string());
    assert_eq!(messenger.callback_answers(), vec![expired.clone(), expired]);
    assert!(messenger.edits(CHAT).is_empty());
    assert!(env.store.is_empty());
}

#[tokio::test]
async fn test_cancel_closes_picker_and_keeps_results() {
    let env = TestEnvironment::new(FakeBackend::writing(&["{base}.webm"])).await;
    env.mock_search("sun", songs_json(5)).await;
    let messenger = RecordingMessenger::new();

    search(&env, &messenger, "sun").await;
    let picker = picker_id(&messenger);

    assert_eq!(press(&env, &messenger, picker, "cancel").await, RouteOutcome::Cancelled);
    let (id, text, keyboard) = messenger.edits(CHAT).pop().unwrap();
    assert_eq!(id, picker);
    assert_eq!(text, "❌ Search cancelled.");
    assert_eq!(keyboard, None);
    assert_eq!(env.store.get(CHAT).unwrap().len(), 5);
}

#[tokio::test]
async fn test_new_search_replaces_results() {
    let env = TestEnvironment::new(FakeBackend::writing(&["{base}.webm"])).await;
    env.mock_search("many", songs_json(23)).await;
    env.mock_search("few", songs_json(2)).await;
    let messenger = RecordingMessenger::new();

    search(&env, &messenger, "many").await;
    let old_picker = picker_id(&messenger);
    search(&env, &messenger, "few").await;

    assert_eq!(env.store.get(CHAT).unwrap().len(), 2);
    assert_eq!(press(&env, &messenger, old_picker, "sel:15").await, RouteOutcome::NotFound);
}

#[tokio::test]
async fn test_no_matches_and_failures_are_reported() {
    let env = TestEnvironment::new(FakeBackend::writing(&["{base}.webm"])).await;
    env.mock_search("nothing here", json!([])).await;
    let messenger = RecordingMessenger::new();

    search(&env, &messenger, "nothing here").await;
    let (_, text, keyboard) = messenger.edits(CHAT).pop().unwrap();
    assert_eq!(text, "❌ No songs found. Try another title or artist.");
    assert_eq!(keyboard, None);
    assert_eq!(env.store.get(CHAT).map(|set| set.len()), Some(0));

    // No mock for this query: the provider answers 404
    search(&env, &messenger, "unmocked").await;
    let (_, text, _) = messenger.edits(CHAT).pop().unwrap();
    assert_eq!(text, "⚠️ Failed to search lyrics. Please try again.");
}

#[tokio::test]
async fn test_blank_message_gets_usage() {
    let env = TestEnvironment::new(FakeBackend::writing(&[])).await;
    let messenger = RecordingMessenger::new();

    search(&env, &messenger, "   ").await;

    let texts = messenger.texts(CHAT);
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("🎵 Send me a song title"));
    assert!(env.store.is_empty());
}

#[tokio::test]
async fn test_unknown_callback_data_is_ignored() {
    let env = TestEnvironment::new(FakeBackend::writing(&[])).await;
    env.mock_search("sun", songs_json(5)).await;
    let messenger = RecordingMessenger::new();
    search(&env, &messenger, "sun").await;
    messenger.clear();

    for data in ["send_1", "pg:-1", "sel:abc", ""] {
        assert_eq!(press(&env, &messenger, MessageId(1), data).await, RouteOutcome::Ignored);
    }
    assert_eq!(messenger.callback_answers(), vec![None, None, None, None]);
    assert!(messenger.edits(CHAT).is_empty());
}

#[tokio::test]
async fn test_missing_audio_is_reported_and_cleaned_up() {
    let env = TestEnvironment::new(FakeBackend::writing(&["{base}.webm.part", "{base}.temp"])).await;
    env.mock_search("sun", songs_json(1)).await;
    let messenger = RecordingMessenger::new();
    search(&env, &messenger, "sun").await;
    let picker = picker_id(&messenger);
    messenger.clear();

    let RouteOutcome::Fulfilled(report) = press(&env, &messenger, picker, "sel:0").await else {
        panic!("expected fulfillment");
    };

    assert!(!report.audio_sent);
    assert_eq!(messenger.audio_count(), 0);
    assert_eq!(messenger.texts(CHAT), vec!["⚠️ Audio not found."]);
    assert_eq!(messenger.deleted(CHAT), vec![picker]);
    assert_eq!(env.backend.dirs().len(), 1);
    assert_eq!(env.leftover_entries(), 0);
}

#[tokio::test]
async fn test_failed_upload_still_cleans_up() {
    let env = TestEnvironment::new(FakeBackend::writing(&["{base}.opus"])).await;
    env.mock_search("sun", songs_json(1)).await;
    let messenger = RecordingMessenger::new().failing_audio();
    search(&env, &messenger, "sun").await;
    let picker = picker_id(&messenger);

    let RouteOutcome::Fulfilled(report) = press(&env, &messenger, picker, "sel:0").await else {
        panic!("expected fulfillment");
    };

    assert!(!report.audio_sent);
    assert!(report.link_sent);
    assert!(messenger.texts(CHAT).contains(&"⚠️ Failed to send audio.".to_string()));
    assert_eq!(env.leftover_entries(), 0);
}

#[tokio::test]
async fn test_download_failure_is_reported_and_cleaned_up() {
    let env = TestEnvironment::new(FakeBackend::failing()).await;
    env.mock_search("sun", songs_json(1)).await;
    let messenger = RecordingMessenger::new();
    search(&env, &messenger, "sun").await;
    let picker = picker_id(&messenger);

    let RouteOutcome::Fulfilled(report) = press(&env, &messenger, picker, "sel:0").await else {
        panic!("expected fulfillment");
    };

    assert!(!report.audio_sent);
    assert!(messenger.texts(CHAT).contains(&"⚠️ Failed to download audio.".to_string()));
    assert_eq!(env.leftover_entries(), 0);
}
