#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;

use chrono_tz::Tz;
use teloxide::utils::command::BotCommands;

use common::{
    bot_user, create_test_context, create_test_store, invocation, user, FakePlatform, Sent,
};
use roster_bot::bot::commands::{parse_command, Command};
use roster_bot::bot::handlers::message::dispatch_command;
use roster_bot::bot::handlers::tracking::observe_member;
use roster_bot::bot::topic_of;
use roster_bot::platform::Destination;
use roster_bot::services::scheduler::{default_presets, PresetRunner};

const CHAT: i64 = -1001234567890;

#[tokio::test]
async fn test_ping_replies_in_invoking_topic() {
    let platform = FakePlatform::new();
    let (store, _temp_dir) = create_test_store();
    let ctx = create_test_context(platform.clone(), store);

    let mut inv = invocation(CHAT, 1);
    inv.topic_id = Some(5);
    dispatch_command(&ctx, &inv, Command::Ping).await.unwrap();

    assert_eq!(
        platform.sent(),
        vec![Sent::Message {
            to: Destination::chat(CHAT).in_topic(Some(5)),
            text: "pong ✅".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_reply_thread_without_topics_answers_in_main_chat() {
    let platform = FakePlatform::new();
    let (store, _temp_dir) = create_test_store();
    let ctx = create_test_context(platform.clone(), store);

    // A reply in a plain group carries the replied-to message as its thread.
    let mut inv = invocation(CHAT, 1);
    inv.topic_id = topic_of(Some(812), false);
    dispatch_command(&ctx, &inv, Command::Ping).await.unwrap();

    assert_eq!(
        platform.sent(),
        vec![Sent::Message {
            to: Destination::chat(CHAT),
            text: "pong ✅".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_multiline_poll_text_is_routed_to_poll() {
    let platform = FakePlatform::new();
    let (store, _temp_dir) = create_test_store();
    let ctx = create_test_context(platform.clone(), store);

    let cmd = parse_command("/poll\nLunch?\nPho\nBun", "roster_bot").unwrap();
    dispatch_command(&ctx, &invocation(CHAT, 1), cmd).await.unwrap();

    assert_eq!(
        platform.polls(),
        vec![Sent::Poll {
            to: Destination::chat(CHAT),
            question: "Lunch?".to_string(),
            choices: vec!["Pho".to_string(), "Bun".to_string()],
            anonymous: false,
        }]
    );
}

#[tokio::test]
async fn test_help_lists_commands() {
    let platform = FakePlatform::new();
    let (store, _temp_dir) = create_test_store();
    let ctx = create_test_context(platform.clone(), store);

    dispatch_command(&ctx, &invocation(CHAT, 1), Command::Help).await.unwrap();

    let text = platform.last_message();
    assert!(text.contains("/sync"));
    assert!(text.contains("/poll"));
    assert!(text.contains("privacy mode"));
}

#[tokio::test]
async fn test_chat_id_reports_chat_and_topic() {
    let platform = FakePlatform::new();
    let (store, _temp_dir) = create_test_store();
    let ctx = create_test_context(platform.clone(), store);

    let mut inv = invocation(CHAT, 1);
    inv.topic_id = Some(77);
    dispatch_command(&ctx, &inv, Command::ChatId).await.unwrap();

    let text = platform.last_message();
    assert!(text.contains(&format!("<code>{CHAT}</code>")));
    assert!(text.contains("<code>77</code>"));
}

#[tokio::test]
async fn test_sync_adds_human_admins() {
    let platform = FakePlatform::with_admins(vec![
        user(1, Some("owner"), "Owner"),
        user(2, None, "Helper"),
        bot_user(3, "roster_bot"),
    ]);
    let (store, _temp_dir) = create_test_store();
    let ctx = create_test_context(platform.clone(), store.clone());

    dispatch_command(&ctx, &invocation(CHAT, 1), Command::Sync).await.unwrap();

    let ids: Vec<i64> = store.get_all(CHAT).iter().map(|m| m.member_id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(platform.last_message(), "✅ Synced 2 admins");
}

#[tokio::test]
async fn test_sync_denied_for_non_admin() {
    let platform = FakePlatform::with_admins(vec![user(1, Some("owner"), "Owner")]);
    let (store, _temp_dir) = create_test_store();
    let ctx = create_test_context(platform.clone(), store.clone());

    dispatch_command(&ctx, &invocation(CHAT, 99), Command::Sync).await.unwrap();

    assert!(store.get_all(CHAT).is_empty());
    assert!(platform.last_message().starts_with("⛔"));
}

#[tokio::test]
async fn test_sync_fails_closed_when_admin_lookup_fails() {
    let platform = FakePlatform::with_admins(vec![user(1, Some("owner"), "Owner")]);
    *platform.fail_admin_lookup.lock().unwrap() = true;
    let (store, _temp_dir) = create_test_store();
    let ctx = create_test_context(platform.clone(), store.clone());

    dispatch_command(&ctx, &invocation(CHAT, 1), Command::Sync).await.unwrap();

    assert!(store.get_all(CHAT).is_empty());
    assert!(platform.last_message().starts_with("⛔"));
}

#[tokio::test]
async fn test_mention_all_on_empty_roster_explains() {
    let platform = FakePlatform::new();
    let (store, _temp_dir) = create_test_store();
    let ctx = create_test_context(platform.clone(), store);

    dispatch_command(&ctx, &invocation(CHAT, 1), Command::All).await.unwrap();

    let messages = platform.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Nobody is on the roster"));
    assert!(messages[0].contains("Suggestion"));
}

#[tokio::test]
async fn test_mention_all_pages_the_roster() {
    let platform = FakePlatform::new();
    let (store, _temp_dir) = create_test_store();
    for id in 1..=73 {
        store.upsert(CHAT, id, None, &format!("Member {id}")).unwrap();
    }
    let ctx = create_test_context(platform.clone(), store);

    dispatch_command(&ctx, &invocation(CHAT, 1), Command::All).await.unwrap();

    let messages = platform.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].matches("tg://user?id=").count(), 50);
    assert_eq!(messages[1].matches("tg://user?id=").count(), 23);
    assert!(messages[1].starts_with("🔔 <b>Mention all</b> (part 2/2):"));
}

#[tokio::test]
async fn test_mention_all_admin_gate() {
    let platform = FakePlatform::with_admins(vec![user(1, Some("owner"), "Owner")]);
    let (store, _temp_dir) = create_test_store();
    store.upsert(CHAT, 5, Some("alice"), "Alice").unwrap();
    let mut ctx = create_test_context(platform.clone(), store);
    ctx.mention_all_admin_only = true;

    dispatch_command(&ctx, &invocation(CHAT, 5), Command::All).await.unwrap();
    assert!(platform.last_message().starts_with("⛔"));

    dispatch_command(&ctx, &invocation(CHAT, 1), Command::All).await.unwrap();
    assert!(platform.last_message().contains("@alice"));
}

#[tokio::test]
async fn test_poll_command_sends_poll() {
    let platform = FakePlatform::new();
    let (store, _temp_dir) = create_test_store();
    let ctx = create_test_context(platform.clone(), store);

    let cmd = Command::parse("/poll anon Lunch? | Pho | Bun", "roster_bot").unwrap();
    dispatch_command(&ctx, &invocation(CHAT, 1), cmd).await.unwrap();

    assert_eq!(
        platform.sent(),
        vec![Sent::Poll {
            to: Destination::chat(CHAT),
            question: "Lunch?".to_string(),
            choices: vec!["Pho".to_string(), "Bun".to_string()],
            anonymous: true,
        }]
    );
}

#[tokio::test]
async fn test_poll_command_reports_validation_error() {
    let platform = FakePlatform::new();
    let (store, _temp_dir) = create_test_store();
    let ctx = create_test_context(platform.clone(), store);

    dispatch_command(&ctx, &invocation(CHAT, 1), Command::Poll("Lunch? | Pho".to_string()))
        .await
        .unwrap();

    assert!(platform.polls().is_empty());
    let text = platform.last_message();
    assert!(text.starts_with("❌ A poll needs at least 2 choices"));
    assert!(text.contains("/poll Title"));
}

#[tokio::test]
async fn test_presets_listing() {
    let platform = FakePlatform::new();
    let (store, _temp_dir) = create_test_store();
    let mut ctx = create_test_context(platform.clone(), store);

    dispatch_command(&ctx, &invocation(CHAT, 1), Command::Presets).await.unwrap();
    assert!(platform.last_message().contains("No recurring polls"));

    ctx.presets = default_presets(Some(10), None);
    dispatch_command(&ctx, &invocation(CHAT, 1), Command::Presets).await.unwrap();
    let text = platform.last_message();
    assert!(text.contains("<b>football</b>"));
    assert!(text.contains("every Wed"));
    assert!(text.contains("(topic 10)"));
}

#[tokio::test]
async fn test_preset_requires_poll_chat_admin() {
    let platform = FakePlatform::with_admins(vec![user(1, Some("owner"), "Owner")]);
    let (store, _temp_dir) = create_test_store();
    let mut ctx = create_test_context(platform.clone(), store.clone());
    ctx.presets = default_presets(None, None);
    ctx.runner = Some(Arc::new(PresetRunner::new(
        platform.clone(),
        store,
        CHAT,
        Tz::UTC,
        50,
    )));

    dispatch_command(&ctx, &invocation(CHAT, 2), Command::Preset("football".to_string()))
        .await
        .unwrap();
    assert!(platform.polls().is_empty());
    assert!(platform.last_message().starts_with("⛔"));

    dispatch_command(&ctx, &invocation(CHAT, 1), Command::Preset("Badminton".to_string()))
        .await
        .unwrap();
    assert_eq!(platform.polls().len(), 1);

    dispatch_command(&ctx, &invocation(CHAT, 1), Command::Preset("tennis".to_string()))
        .await
        .unwrap();
    assert!(platform.last_message().contains("Available presets: football, badminton, monthly"));
}

#[tokio::test]
async fn test_preset_without_poll_chat() {
    let platform = FakePlatform::new();
    let (store, _temp_dir) = create_test_store();
    let ctx = create_test_context(platform.clone(), store);

    dispatch_command(&ctx, &invocation(CHAT, 1), Command::Preset("football".to_string()))
        .await
        .unwrap();
    assert!(platform.last_message().contains("not configured"));
}

#[tokio::test]
async fn test_observed_members_are_taggable() {
    let (store, _temp_dir) = create_test_store();

    assert!(observe_member(&store, CHAT, &user(7, Some("alice"), "Alice A")).await);
    assert!(!observe_member(&store, CHAT, &bot_user(8, "other_bot")).await);

    let members = store.get_all(CHAT);
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].mention(), "@alice");
}
