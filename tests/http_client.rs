use std::{
    io::{BufRead, BufReader, Read, Write},
    net::TcpListener,
    thread::{self, JoinHandle},
};

use maia_board::{ApiError, Device, HttpClient, ModelType, PredictionApi, Settings};

/// Serve exactly one HTTP request with a canned response and hand back the
/// raw request line and body.
fn one_shot(status: &str, body: &'static str) -> (String, JoinHandle<(String, String)>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api", listener.local_addr().unwrap());
    let status = status.to_string();

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();

        let mut content_length = 0;
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).unwrap();
            let header = header.trim_end();
            if header.is_empty() {
                break;
            }
            if let Some((name, value)) = header.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap();
                }
            }
        }
        let mut request_body = vec![0; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();

        (
            request_line.trim_end().to_string(),
            String::from_utf8(request_body).unwrap(),
        )
    });

    (url, handle)
}

fn client(url: &str) -> HttpClient {
    HttpClient::new(&Settings::new(url, "maia-board-test").unwrap()).unwrap()
}

#[test]
fn status_is_a_get() {
    let (url, server) = one_shot("200 OK", r#"{"success": true, "initialized": true, "config": {}}"#);
    let status = client(&url).status().unwrap();
    let (line, _) = server.join().unwrap();

    assert_eq!(line, "GET /api/status HTTP/1.1");
    assert!(status.success && status.initialized);
}

#[test]
fn init_posts_model_and_device() {
    let (url, server) = one_shot(
        "200 OK",
        r#"{"success": true, "message": "Modèle blitz initialisé avec succès sur GPU"}"#,
    );
    let response = client(&url).initialize(ModelType::Blitz, Device::Gpu).unwrap();
    let (line, body) = server.join().unwrap();

    assert_eq!(line, "POST /api/init HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["model_type"], "blitz");
    assert_eq!(body["device"], "gpu");
    assert!(response.success);
    assert_eq!(response.message, "Modèle blitz initialisé avec succès sur GPU");
}

#[test]
fn predict_round_trip() {
    let (url, server) = one_shot(
        "200 OK",
        r#"{"success": true, "win_probability": 0.73, "move_probabilities": {"e2e4": 0.41},
            "top_moves": [{"move": "e2e4", "probability": 0.41}]}"#,
    );
    let response = client(&url)
        .predict(maia_board::START_FEN, 1500, 1700, 1)
        .unwrap();
    let (line, body) = server.join().unwrap();

    assert_eq!(line, "POST /api/predict HTTP/1.1");
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["fen"], maia_board::START_FEN);
    assert_eq!(body["elo_self"], 1500);
    assert_eq!(body["elo_opponent"], 1700);
    assert_eq!(body["top_k"], 1);

    let result = response.into_result().unwrap();
    assert_eq!(result.top_moves[0].mv, "e2e4");
}

#[test]
fn error_status_carries_server_message() {
    let (url, server) = one_shot(
        "400 BAD REQUEST",
        r#"{"success": false, "message": "Le modèle n'est pas initialisé. Veuillez d'abord l'initialiser."}"#,
    );
    let err = client(&url)
        .predict(maia_board::START_FEN, 1500, 1500, 5)
        .unwrap_err();
    server.join().unwrap();

    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(
                message.as_deref(),
                Some("Le modèle n'est pas initialisé. Veuillez d'abord l'initialiser.")
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn validate_reports_invalid() {
    let (url, server) = one_shot(
        "200 OK",
        r#"{"success": true, "valid": false, "message": "FEN invalide: bad"}"#,
    );
    let response = client(&url).validate_fen("junk").unwrap();
    let (line, body) = server.join().unwrap();

    assert_eq!(line, "POST /api/validate_fen HTTP/1.1");
    assert_eq!(body, r#"{"fen":"junk"}"#);
    assert!(!response.valid);
    assert_eq!(response.message.as_deref(), Some("FEN invalide: bad"));
}

#[test]
fn closed_port_is_unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&url).status().unwrap_err();
    assert!(matches!(err, ApiError::Unreachable(_)), "{err:?}");
}

#[test]
fn garbage_body_is_a_json_error() {
    let (url, server) = one_shot("200 OK", "not json");
    let err = client(&url).status().unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, ApiError::Json(_)), "{err:?}");
}
