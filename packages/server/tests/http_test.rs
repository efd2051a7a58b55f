//! Integration tests for the chat relay over real HTTP.
//!
//! Each test starts the server in-process on an ephemeral port and drives it
//! with `reqwest`. Session cookies are carried by hand, and event streams are
//! read frame by frame from the raw response body.

use std::{net::SocketAddr, pin::Pin, sync::Arc, time::Duration};

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use lantern_server::{config::ServerConfig, ui::Server};
use lantern_shared::time::SystemClock;
use reqwest::{StatusCode, header};
use serde_json::Value;
use tokio::{net::TcpListener, sync::oneshot};

const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Helper struct to manage the in-process server lifecycle
struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    async fn start_with(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, signal) = oneshot::channel::<()>();

        let server = Server::new(config, Arc::new(SystemClock));
        tokio::spawn(async move {
            let _ = server
                .serve(listener, async {
                    let _ = signal.await;
                })
                .await;
        });

        TestServer {
            addr,
            shutdown: Some(shutdown),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// A browser-like client holding one session cookie
struct TestClient {
    http: reqwest::Client,
    base: String,
    cookie: Option<String>,
}

impl TestClient {
    fn new(server: &TestServer) -> Self {
        TestClient {
            http: reqwest::Client::new(),
            base: server.url(""),
            cookie: None,
        }
    }

    /// Create a client and open its event stream (which also mints its session)
    async fn connect(server: &TestServer) -> (Self, EventStream) {
        let mut client = Self::new(server);
        let events = client.open_events().await;
        (client, events)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base, path));
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    fn remember_cookie(&mut self, response: &reqwest::Response) {
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }
    }

    async fn open_events(&mut self) -> EventStream {
        let response = self
            .request(reqwest::Method::GET, "/events")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        self.remember_cookie(&response);
        EventStream {
            body: Box::pin(response.bytes_stream()),
            buffer: String::new(),
        }
    }

    async fn post_form(&mut self, path: &str, form: &[(&str, &str)]) -> (StatusCode, String) {
        let response = self
            .request(reqwest::Method::POST, path)
            .form(form)
            .send()
            .await
            .unwrap();
        self.remember_cookie(&response);
        let status = response.status();
        (status, response.text().await.unwrap())
    }

    async fn send(&mut self, message: &str) -> (StatusCode, String) {
        self.post_form("/send", &[("message", message)]).await
    }

    async fn set_nickname(&mut self, nickname: &str) -> (StatusCode, String) {
        self.post_form("/set-nickname", &[("nickname", nickname)])
            .await
    }
}

/// Incremental reader of `data:` frames from an SSE response body
struct EventStream {
    body: Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>,
    buffer: String,
}

impl EventStream {
    /// Next JSON message, skipping keep-alive comments
    async fn next_message(&mut self) -> Value {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let block: String = self.buffer.drain(..end + 2).collect();
                let data: Vec<&str> = block
                    .lines()
                    .filter_map(|line| line.strip_prefix("data:"))
                    .map(|data| data.strip_prefix(' ').unwrap_or(data))
                    .collect();
                if data.is_empty() {
                    continue;
                }
                return serde_json::from_str(&data.join("\n")).unwrap();
            }

            let chunk = tokio::time::timeout(FRAME_TIMEOUT, self.body.next())
                .await
                .expect("timed out waiting for an event")
                .expect("event stream ended")
                .unwrap();
            self.buffer.push_str(&String::from_utf8_lossy(&chunk));
        }
    }

    /// Read messages until one whose content contains `needle`
    async fn expect_content_containing(&mut self, needle: &str) -> Value {
        loop {
            let message = self.next_message().await;
            if content(&message).contains(needle) {
                return message;
            }
        }
    }

    /// Read messages up to the one with exactly `marker` as content, returning those before it
    async fn messages_until(&mut self, marker: &str) -> Vec<Value> {
        let mut seen = Vec::new();
        loop {
            let message = self.next_message().await;
            if content(&message) == marker {
                return seen;
            }
            seen.push(message);
        }
    }
}

fn content(message: &Value) -> &str {
    message["content"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが {"status":"ok"} を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body: Value = reqwest::get(server.url("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn test_first_visit_sets_http_only_session_cookie() {
    // テスト項目: 初回アクセスで HttpOnly / SameSite=Lax の session_id Cookie が発行され、再送すると再発行されない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::new(&server);

    // when (操作):
    let first = client
        .request(reqwest::Method::GET, "/join")
        .send()
        .await
        .unwrap();
    let set_cookie = first
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    client.remember_cookie(&first);
    let second = client
        .request(reqwest::Method::GET, "/join")
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(first.status(), StatusCode::OK);
    assert!(set_cookie.starts_with("session_id="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(second.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_plain_message_reaches_everyone_escaped() {
    // テスト項目: 通常メッセージはエスケープされ、author 付きで全員に届く
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut alice, mut alice_events) = TestClient::connect(&server).await;
    let (_bob, mut bob_events) = TestClient::connect(&server).await;
    alice.set_nickname("alice").await;

    // when (操作):
    let (status, body) = alice.send("<b>hello</b>").await;

    // then (期待する結果):
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Message sent");
    let to_bob = bob_events
        .expect_content_containing("hello")
        .await;
    assert_eq!(to_bob["content"], "&lt;b&gt;hello&lt;/b&gt;");
    assert_eq!(to_bob["fromApp"], false);
    assert_eq!(to_bob["private"], false);
    assert_eq!(to_bob["kind"], "text");
    assert_eq!(to_bob["author"]["nickname"], "alice");
    assert!(to_bob["author"]["color"].is_string());
    let to_alice = alice_events.expect_content_containing("hello").await;
    assert_eq!(to_alice, to_bob);
}

#[tokio::test]
async fn test_nicknames_and_members_listing() {
    // テスト項目: ニックネーム変更が全員に通知され、;members は送信者にだけ届く
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut alice, mut alice_events) = TestClient::connect(&server).await;
    let (mut bob, mut bob_events) = TestClient::connect(&server).await;

    // when (操作):
    let (status, body) = alice.set_nickname("alice").await;
    bob.set_nickname("bob").await;
    alice.send(";members").await;
    alice.send("marker").await;

    // then (期待する結果):
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Nickname set to alice");

    let notice = bob_events
        .expect_content_containing("changed nickname to [alice]")
        .await;
    assert_eq!(notice["fromApp"], true);
    assert!(notice["author"].is_null());
    assert!(content(&notice).contains("(no previous nicknames)"));

    let members = alice_events
        .expect_content_containing("Online members")
        .await;
    assert_eq!(members["private"], true);
    assert!(content(&members).contains("[alice]"));
    assert!(content(&members).contains("[bob]"));

    let before_marker = bob_events.messages_until("marker").await;
    assert!(
        before_marker
            .iter()
            .all(|m| !content(m).contains("Online members"))
    );
}

#[tokio::test]
async fn test_whisper_reaches_exactly_sender_and_recipient() {
    // テスト項目: whisper は送信者と宛先の 2 人にだけ届く
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut alice, mut alice_events) = TestClient::connect(&server).await;
    let (mut bob, mut bob_events) = TestClient::connect(&server).await;
    let (mut carol, mut carol_events) = TestClient::connect(&server).await;
    alice.set_nickname("alice").await;
    bob.set_nickname("bob").await;
    carol.set_nickname("carol").await;

    // when (操作):
    alice.send(";whisper bob meet at <noon>").await;
    alice.send("marker").await;

    // then (期待する結果):
    let expected = "(whisper to @bob) [alice]: meet at &lt;noon&gt;";
    let to_bob = bob_events.expect_content_containing("whisper to").await;
    assert_eq!(content(&to_bob), expected);
    assert_eq!(to_bob["private"], true);
    let to_alice = alice_events.expect_content_containing("whisper to").await;
    assert_eq!(content(&to_alice), expected);

    let carol_saw = carol_events.messages_until("marker").await;
    assert!(carol_saw.iter().all(|m| !content(m).contains("whisper")));
}

#[tokio::test]
async fn test_whisper_to_unknown_nickname() {
    // テスト項目: 存在しない宛先への whisper は送信者に "User <nick> not found" を返す
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut alice, mut alice_events) = TestClient::connect(&server).await;

    // when (操作):
    alice.send(";whisper ghost boo").await;

    // then (期待する結果):
    let reply = alice_events.expect_content_containing("not found").await;
    assert_eq!(content(&reply), "User ghost not found");
    assert_eq!(reply["private"], true);
}

#[tokio::test]
async fn test_invalid_nickname_is_rejected() {
    // テスト項目: 空白を含むニックネーム、他人が使用中のニックネームは 400
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::new(&server);
    let mut mallory = TestClient::new(&server);
    alice.set_nickname("alice").await;

    // when (操作):
    let (spaced, _) = mallory.set_nickname("bad name").await;
    let (empty, _) = mallory.set_nickname("").await;
    let (taken, _) = mallory.set_nickname("alice").await;

    // then (期待する結果):
    assert_eq!(spaced, StatusCode::BAD_REQUEST);
    assert_eq!(empty, StatusCode::BAD_REQUEST);
    assert_eq!(taken, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_message_is_rejected() {
    // テスト項目: 空メッセージは 400 "Message is required"
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::new(&server);

    // when (操作):
    let (status, body) = client.send("").await;

    // then (期待する結果):
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Message is required");
}

#[tokio::test]
async fn test_flooding_is_answered_with_429() {
    // テスト項目: 連投すると 429 になり、送信者に警告が届く
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut spammer, mut events) = TestClient::connect(&server).await;

    // when (操作):
    let mut statuses = Vec::new();
    for i in 0..6 {
        let (status, _) = spammer.send(&format!("spam {}", i)).await;
        statuses.push(status);
    }

    // then (期待する結果):
    assert_eq!(&statuses[..5], &[StatusCode::OK; 5]);
    assert_eq!(statuses[5], StatusCode::TOO_MANY_REQUESTS);
    let warning = events.expect_content_containing("too quickly").await;
    assert_eq!(warning["private"], true);
}

#[tokio::test]
async fn test_unknown_image_is_404() {
    // テスト項目: 存在しない画像 ID は 404
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let response = reqwest::get(server.url("/image/0-deadbeef")).await.unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_then_fetch_image() {
    // テスト項目: アップロードした画像が全員に通知され、ID で取得できる
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut uploader, mut events) = TestClient::connect(&server).await;
    uploader.set_nickname("painter").await;
    let png: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

    // when (操作):
    let form = reqwest::multipart::Form::new().part(
        "image",
        reqwest::multipart::Part::bytes(png.to_vec()).file_name("dot.png"),
    );
    let response = uploader
        .request(reqwest::Method::POST, "/upload-image")
        .multipart(form)
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "Image uploaded");

    let message = loop {
        let message = events.next_message().await;
        if message["kind"] == "image" {
            break message;
        }
    };
    assert_eq!(message["author"]["nickname"], "painter");
    let id = content(&message).to_string();

    let image = reqwest::get(server.url(&format!("/image/{}", id)))
        .await
        .unwrap();
    assert_eq!(image.status(), StatusCode::OK);
    assert_eq!(image.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(image.bytes().await.unwrap().as_ref(), png);
}

#[tokio::test]
async fn test_upload_without_image_field_is_rejected() {
    // テスト項目: image フィールドの無いフォームは 400
    // given (前提条件):
    let server = TestServer::start().await;
    let client = TestClient::new(&server);
    let form = reqwest::multipart::Form::new().text("caption", "no file here");

    // when (操作):
    let response = client
        .request(reqwest::Method::POST, "/upload-image")
        .multipart(form)
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Upload `bytes` as the `image` field of a multipart form
async fn upload(client: &TestClient, bytes: Vec<u8>) -> reqwest::Response {
    let form = reqwest::multipart::Form::new().part(
        "image",
        reqwest::multipart::Part::bytes(bytes).file_name("upload.png"),
    );
    client
        .request(reqwest::Method::POST, "/upload-image")
        .multipart(form)
        .send()
        .await
        .unwrap()
}

/// A PNG-looking payload of exactly `len` bytes
fn png_of_len(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    let header = b"\x89PNG\r\n\x1a\n";
    bytes[..header.len()].copy_from_slice(header);
    bytes
}

#[tokio::test]
async fn test_upload_at_exactly_max_size_is_accepted() {
    // テスト項目: 上限（10 MiB）ちょうどの画像は multipart の枠を含めても受け付けられる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = TestClient::new(&server);
    let max = ServerConfig::DEFAULT_MAX_UPLOAD_BYTES;

    // when (操作):
    let response = upload(&client, png_of_len(max)).await;

    // then (期待する結果):
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "Image uploaded");
}

#[tokio::test]
async fn test_upload_one_byte_over_max_size_is_rejected() {
    // テスト項目: 上限を 1 バイト超える画像は 400 で、配信されない
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut client, mut events) = TestClient::connect(&server).await;
    let max = ServerConfig::DEFAULT_MAX_UPLOAD_BYTES;

    // when (操作):
    let response = upload(&client, png_of_len(max + 1)).await;
    client.send("marker").await;

    // then (期待する結果):
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.text().await.unwrap().contains("exceeds"));
    let frames = events.messages_until("marker").await;
    assert!(frames.iter().all(|m| m["kind"] != "image"));
}

#[tokio::test]
async fn test_upload_far_over_body_limit_is_rejected_with_400() {
    // テスト項目: リクエスト本文の上限すら超える画像も 400 になる
    // given (前提条件):
    let server = TestServer::start_with(ServerConfig {
        max_upload_bytes: 1024,
        ..ServerConfig::default()
    })
    .await;
    let client = TestClient::new(&server);

    // when (操作):
    let response = upload(&client, png_of_len(80 * 1024)).await;

    // then (期待する結果):
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bodyless_posts_are_treated_as_empty_values() {
    // テスト項目: 本文も Content-Type も無い POST は空の値として扱われ 400 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = TestClient::new(&server);

    // when (操作):
    let send = client
        .request(reqwest::Method::POST, "/send")
        .send()
        .await
        .unwrap();
    let nickname = client
        .request(reqwest::Method::POST, "/set-nickname")
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(send.status(), StatusCode::BAD_REQUEST);
    assert_eq!(send.text().await.unwrap(), "Message is required");
    assert_eq!(nickname.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_join_and_leave_are_announced() {
    // テスト項目: /join と /leave が入室・退室の通知をブロードキャストする
    // given (前提条件):
    let server = TestServer::start().await;
    let (_observer, mut events) = TestClient::connect(&server).await;
    let mut visitor = TestClient::new(&server);
    visitor.set_nickname("visitor").await;

    // when (操作):
    let joined = visitor
        .request(reqwest::Method::GET, "/join")
        .send()
        .await
        .unwrap();
    let left = visitor
        .request(reqwest::Method::POST, "/leave")
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(joined.status(), StatusCode::OK);
    assert_eq!(left.status(), StatusCode::OK);
    let join_notice = events.expect_content_containing("has joined the room").await;
    assert!(content(&join_notice).ends_with("([visitor]) has joined the room"));
    let leave_notice = events.expect_content_containing("has left the room").await;
    assert!(content(&leave_notice).starts_with("[visitor] ("));
}

#[tokio::test]
async fn test_reconnect_moves_delivery_to_new_stream() {
    // テスト項目: 同じセッションで再接続すると古いストリームが終了し、新しいストリームに配信される
    // given (前提条件):
    let server = TestServer::start().await;
    let (mut client, mut old_events) = TestClient::connect(&server).await;

    // when (操作):
    let mut new_events = client.open_events().await;
    client.send("after reconnect").await;

    // then (期待する結果):
    let message = new_events
        .expect_content_containing("after reconnect")
        .await;
    assert_eq!(message["kind"], "text");
    let old_end = tokio::time::timeout(FRAME_TIMEOUT, old_events.body.next()).await;
    assert!(matches!(old_end, Ok(None)));
}
