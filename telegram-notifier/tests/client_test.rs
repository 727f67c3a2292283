//! TelegramNotifier against a mockito Bot API server.

mod common;

use std::path::Path;

use common::{config_for, message_body, CHAT_ID, TOKEN};
use mockito::Matcher;
use serde_json::json;
use telegram_notifier::{
    Bot, MediaOptions, MessageOptions, NotifyError, ParseMode, TelegramNotifier,
};

fn path(method: &str) -> String {
    format!("/bot{}/{}", TOKEN, method)
}

#[tokio::test]
async fn test_send_message_success() {
    common::init_test_tracing();
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", path("sendMessage").as_str())
        .match_body(Matcher::PartialJson(json!({
            "chat_id": CHAT_ID,
            "text": "Hello, World!",
            "parse_mode": "HTML",
            "disable_web_page_preview": false,
            "disable_notification": true
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(message_body(101, "Hello, World!"))
        .expect(1)
        .create_async()
        .await;

    let notifier = TelegramNotifier::new(config_for(&server.url(), 3)).unwrap();
    let options = MessageOptions {
        disable_notification: true,
        ..MessageOptions::default()
    };
    let response = notifier.send_message("Hello, World!", &options).await.unwrap();

    assert!(response.ok);
    let message = response.result.unwrap();
    assert_eq!(message.message_id, 101);
    assert_eq!(message.chat.id, 424242);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_message_with_overrides() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", path("sendMessage").as_str())
        .match_body(Matcher::PartialJson(json!({
            "parse_mode": "MarkdownV2",
            "disable_web_page_preview": true,
            "reply_to_message_id": 55
        })))
        .with_status(200)
        .with_body(message_body(102, "*hi*"))
        .create_async()
        .await;

    let notifier = TelegramNotifier::new(config_for(&server.url(), 0)).unwrap();
    let options = MessageOptions {
        parse_mode: Some(ParseMode::MarkdownV2),
        disable_web_page_preview: true,
        disable_notification: false,
        reply_to_message_id: Some(55),
    };
    notifier.send_message("*hi*", &options).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_error_envelope() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", path("sendMessage").as_str())
        .with_status(200)
        .with_body(r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#)
        .create_async()
        .await;

    let notifier = TelegramNotifier::new(config_for(&server.url(), 3)).unwrap();
    let err = notifier
        .send_message("hello", &MessageOptions::default())
        .await
        .unwrap_err();

    match err {
        NotifyError::Telegram(msg) => {
            assert_eq!(msg, "Telegram API error: Bad Request: chat not found")
        }
        other => panic!("expected telegram error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", path("sendMessage").as_str())
        .with_status(400)
        .with_body(r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#)
        .expect(1)
        .create_async()
        .await;

    let notifier = TelegramNotifier::new(config_for(&server.url(), 3)).unwrap();
    let err = notifier
        .send_message("hello", &MessageOptions::default())
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("HTTP 400"));
    assert!(msg.contains("chat not found"));
    assert!(!msg.contains(TOKEN));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_retried_then_surfaces() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", path("sendMessage").as_str())
        .with_status(500)
        .with_body("oops")
        .expect(3)
        .create_async()
        .await;

    let notifier = TelegramNotifier::new(config_for(&server.url(), 2)).unwrap();
    let err = notifier
        .send_message("hello", &MessageOptions::default())
        .await
        .unwrap_err();

    match err {
        NotifyError::Telegram(msg) => {
            assert_eq!(msg, "Failed to send message: HTTP 500 Internal Server Error")
        }
        other => panic!("expected telegram error, got {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limit_is_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", path("getMe").as_str())
        .with_status(429)
        .with_body(r#"{"ok":false,"error_code":429,"description":"Too Many Requests: retry after 1"}"#)
        .expect(2)
        .create_async()
        .await;

    let notifier = TelegramNotifier::new(config_for(&server.url(), 1)).unwrap();
    let err = notifier.get_me().await.unwrap_err();

    assert!(err.to_string().contains("Too Many Requests"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_failure_hides_token() {
    let notifier = TelegramNotifier::new(config_for("http://127.0.0.1:1", 0)).unwrap();

    let err = notifier
        .send_message("hello", &MessageOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::Telegram(_)));
    assert!(err.to_string().starts_with("Telegram error: Failed to send message: "));
    assert!(!err.to_string().contains(TOKEN));
}

#[tokio::test]
async fn test_validation_happens_before_network() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let notifier = TelegramNotifier::new(config_for(&server.url(), 0)).unwrap();

    let blank = notifier.send_message("   ", &MessageOptions::default()).await;
    assert!(matches!(blank, Err(NotifyError::Validation(_))));

    let too_long = notifier
        .edit_message_text(1, &"x".repeat(4097), &MessageOptions::default())
        .await;
    assert!(matches!(too_long, Err(NotifyError::Validation(_))));

    let missing = notifier
        .send_photo(Path::new("/definitely/not/here.jpg"), &MediaOptions::default())
        .await;
    match missing {
        Err(NotifyError::Validation(msg)) => {
            assert_eq!(msg, "Photo file not found: /definitely/not/here.jpg")
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    let missing = notifier
        .send_document(Path::new("/definitely/not/here.pdf"), &MediaOptions::default())
        .await;
    assert!(matches!(missing, Err(NotifyError::Validation(_))));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_edit_message_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", path("editMessageText").as_str())
        .match_body(Matcher::PartialJson(json!({
            "chat_id": CHAT_ID,
            "message_id": 5,
            "text": "updated",
            "parse_mode": "Markdown"
        })))
        .with_status(200)
        .with_body(message_body(5, "updated"))
        .create_async()
        .await;

    let notifier = TelegramNotifier::new(config_for(&server.url(), 0)).unwrap();
    let response = notifier
        .edit_message_text(
            5,
            "updated",
            &MessageOptions::with_parse_mode(ParseMode::Markdown),
        )
        .await
        .unwrap();

    assert_eq!(response.result.unwrap().text.as_deref(), Some("updated"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_photo_multipart() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("photo.jpg");
    std::fs::write(&photo, b"fake-jpeg-bytes").unwrap();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", path("sendPhoto").as_str())
        .match_header("content-type", Matcher::Regex("multipart/form-data".to_string()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="photo"; filename="photo.jpg""#.to_string()),
            Matcher::Regex("fake-jpeg-bytes".to_string()),
            Matcher::Regex(r#"name="caption""#.to_string()),
            Matcher::Regex("Sunset".to_string()),
            Matcher::Regex(CHAT_ID.to_string()),
        ]))
        .with_status(200)
        .with_body(message_body(200, ""))
        .create_async()
        .await;

    let notifier = TelegramNotifier::new(config_for(&server.url(), 0)).unwrap();
    let options = MediaOptions {
        caption: Some("Sunset".to_string()),
        parse_mode: None,
    };
    let response = notifier.send_photo(&photo, &options).await.unwrap();

    assert_eq!(response.result.unwrap().message_id, 200);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_document_without_caption() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("report.csv");
    std::fs::write(&report, "a,b\n1,2\n").unwrap();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", path("sendDocument").as_str())
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="document"; filename="report.csv""#.to_string()),
            Matcher::Regex(r#"name="parse_mode""#.to_string()),
        ]))
        .with_status(200)
        .with_body(message_body(201, ""))
        .create_async()
        .await;

    let notifier = TelegramNotifier::new(config_for(&server.url(), 0)).unwrap();
    notifier
        .send_document(&report, &MediaOptions::default())
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_retried_with_rebuilt_body() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("report.txt");
    std::fs::write(&report, "payload").unwrap();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", path("sendDocument").as_str())
        .match_body(Matcher::Regex("payload".to_string()))
        .with_status(503)
        .expect(2)
        .create_async()
        .await;

    let notifier = TelegramNotifier::new(config_for(&server.url(), 1)).unwrap();
    let err = notifier
        .send_document(&report, &MediaOptions::default())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Failed to send document: HTTP 503"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_me_and_test_connection() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", path("getMe").as_str())
        .with_status(200)
        .with_body(
            r#"{"ok":true,"result":{"id":42,"is_bot":true,"first_name":"Notifier","username":"notify_bot","can_join_groups":true,"can_read_all_group_messages":false,"supports_inline_queries":false}}"#,
        )
        .expect(2)
        .create_async()
        .await;

    let notifier = TelegramNotifier::new(config_for(&server.url(), 0)).unwrap();
    let me = notifier.get_me().await.unwrap().result.unwrap();
    assert_eq!(me.id, 42);
    assert_eq!(me.username.as_deref(), Some("notify_bot"));

    notifier.test_connection().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_test_connection_rejects_bad_token() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", path("getMe").as_str())
        .with_status(401)
        .with_body(r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#)
        .create_async()
        .await;

    let notifier = TelegramNotifier::new(config_for(&server.url(), 3)).unwrap();
    let err = notifier.test_connection().await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Telegram error: Failed to get bot info: HTTP 401 Unauthorized: Unauthorized"
    );
}

#[tokio::test]
async fn test_progress_bar_over_http() {
    let mut server = mockito::Server::new_async().await;
    let send = server
        .mock("POST", path("sendMessage").as_str())
        .match_body(Matcher::PartialJson(json!({"parse_mode": "MarkdownV2"})))
        .with_status(200)
        .with_body(message_body(900, "progress"))
        .expect(1)
        .create_async()
        .await;
    let edit = server
        .mock("POST", path("editMessageText").as_str())
        .match_body(Matcher::PartialJson(json!({"message_id": 900, "parse_mode": "MarkdownV2"})))
        .with_status(200)
        .with_body(message_body(900, "progress"))
        .expect(3)
        .create_async()
        .await;

    let notifier = TelegramNotifier::new(config_for(&server.url(), 0)).unwrap();
    let mut bar = notifier.progress_bar(vec!["a", "b", "c"]).unwrap();
    let mut seen = Vec::new();
    while let Some(item) = bar.next().await {
        seen.push(item.unwrap());
    }

    assert_eq!(seen, vec!["a", "b", "c"]);
    send.assert_async().await;
    edit.assert_async().await;
}

#[tokio::test]
async fn test_progress_bar_stops_on_failure_envelope() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", path("editMessageText").as_str())
        .with_status(200)
        .with_body(r#"{"ok":false,"error_code":400,"description":"Bad Request: message to edit not found"}"#)
        .create_async()
        .await;

    let notifier = TelegramNotifier::new(config_for(&server.url(), 0)).unwrap();
    let mut bar = notifier.progress_bar(1..=3).unwrap().with_message_id(31);

    match bar.next().await {
        Some(Err(NotifyError::Telegram(msg))) => {
            assert!(msg.contains("message to edit not found"))
        }
        other => panic!("expected telegram error, got {:?}", other.map(|r| r.is_ok())),
    }
    assert!(bar.next().await.is_none());
}
