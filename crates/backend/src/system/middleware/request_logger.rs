use axum::body::to_bytes;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_number;

/// Максимальный размер тела ответа, который буферизуется для замера
const MAX_LOGGED_BODY: usize = 64 * 1024 * 1024;

/// Middleware для логирования HTTP запросов
///
/// Одна строка на запрос: длительность, размер ответа, статус, метод и путь.
/// Ответы со статусом не 2xx пишутся на уровне warn.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Читаем тело ответа, чтобы узнать реальный размер
    let bytes = match to_bytes(body, MAX_LOGGED_BODY).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                "{:>5}ms | {:>12} | {} {:>6} {} | body error: {}",
                start.elapsed().as_millis(),
                "error",
                parts.status.as_u16(),
                method,
                uri.path(),
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let duration = start.elapsed();
    let size = format_number(bytes.len());

    if parts.status.is_success() {
        tracing::info!(
            "{:>5}ms | {:>12} | {} {:>6} {}",
            duration.as_millis(),
            size,
            parts.status.as_u16(),
            method,
            uri.path()
        );
    } else {
        tracing::warn!(
            "{:>5}ms | {:>12} | {} {:>6} {}",
            duration.as_millis(),
            size,
            parts.status.as_u16(),
            method,
            uri.path()
        );
    }

    Response::from_parts(parts, Body::from(bytes))
}
